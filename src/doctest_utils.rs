// Internal utilities for documentation tests
// This file contains helper functions to generate fixture files for doctests

use std::path::Path;

use crate::{AcqWriter, Result};

/// Creates a small two-channel acquisition file for documentation examples.
///
/// Each channel holds 100 samples of a ramp; all header counts are set.
pub fn create_demo_acquisition<P: AsRef<Path>>(path: P) -> Result<()> {
    let mut writer = AcqWriter::create(path)?;

    let header = writer.header_mut();
    header.patient.name = "Doc Patient".to_string();
    header.patient.gender = "X".to_string();
    header.patient.id = "DOC001".to_string();
    header.recording.sample_rate = 100.0;
    header.set_channel_count(2);
    for (i, chn) in header.channels.iter_mut().enumerate() {
        chn.label = format!("DC{:02}", i + 1);
        chn.dimension = "V".to_string();
        chn.sampling_rate = 100.0;
        chn.nr_of_samples = 100;
    }
    header.recording.nr_of_samples = 100;

    let signals: Vec<Vec<f64>> = (0..2)
        .map(|c| (0..100).map(|j| (c * 100 + j) as f64 / 100.0).collect())
        .collect();
    writer.write(&signals)?;

    writer.close()
}
