//! # h5acq
//!
//! Reader and writer for physiological signal acquisition files backed
//! by HDF5. The crate maps patient, recording and per-channel metadata
//! onto groups with typed attributes, and appends sample batches to one
//! growable `f64` dataset per channel; the heavy lifting of hierarchical
//! storage is delegated to the HDF5 library.
//!
//! ## Writing an acquisition file
//!
//! ```rust
//! use h5acq::{AcqWriter, Result};
//!
//! fn main() -> Result<()> {
//!     let mut writer = AcqWriter::create("quickstart_write.h5")?;
//!
//!     // Fill the header in place; it is persisted on close.
//!     let header = writer.header_mut();
//!     header.patient.name = "Robert".to_string();
//!     header.recording.sample_rate = 200.0;
//!     header.set_channel_count(2);
//!     header.channels[0].label = "DC01".to_string();
//!     header.channels[1].label = "DC02".to_string();
//!
//!     // Append two batches; datasets grow on every call.
//!     writer.write(&[vec![0.0, 0.1, 0.2], vec![1.0, 1.1, 1.2]])?;
//!     writer.write(&[vec![0.3, 0.4], vec![1.3, 1.4]])?;
//!
//!     // Sample counts are caller-maintained, not derived.
//!     writer.header_mut().recording.nr_of_samples = 5;
//!     for chn in &mut writer.header_mut().channels {
//!         chn.nr_of_samples = 5;
//!     }
//!     writer.close()?;
//!
//!     # std::fs::remove_file("quickstart_write.h5").ok();
//!     Ok(())
//! }
//! ```
//!
//! ## Reading it back
//!
//! ```rust
//! use h5acq::{AcqReader, Result};
//!
//! # fn build() -> Result<()> {
//! #     h5acq::doctest_utils::create_demo_acquisition("quickstart_read.h5")
//! # }
//! fn main() -> Result<()> {
//!     # build()?;
//!     let reader = AcqReader::open("quickstart_read.h5")?;
//!
//!     let header = reader.header();
//!     println!("patient: {}", header.patient.name);
//!     for chn in &header.channels {
//!         println!("  {} [{}], {} samples", chn.label, chn.dimension, chn.nr_of_samples);
//!     }
//!
//!     // Inclusive zero-based range, one sub-sequence per channel.
//!     let data = reader.read_double(0, 49)?;
//!     assert_eq!(data.len(), header.recording.nr_of_channels);
//!     assert_eq!(data[0].len(), 50);
//!
//!     # std::fs::remove_file("quickstart_read.h5").ok();
//!     Ok(())
//! }
//! ```
//!
//! One file must not be open in a writer and a reader at the same time;
//! both own their handle exclusively for their whole scope.

pub mod error;
pub mod reader;
pub mod schema;
pub mod types;
pub mod writer;

#[doc(hidden)]
pub mod doctest_utils; // For internal doctest support

// Re-export main types for convenience
pub use error::{AcqError, Result};
pub use reader::AcqReader;
pub use types::{AcqHeader, ChannelInfo, Patient, Recording};
pub use writer::AcqWriter;

/// Library version
///
/// ```rust
/// let version = h5acq::version();
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
