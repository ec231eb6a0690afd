use std::path::Path;

use hdf5::{Dataset, File, Group};
use ndarray::{s, ArrayView1};

use crate::error::{AcqError, Result};
use crate::schema;
use crate::types::{AcqHeader, ChannelInfo};

/// Chunk size of the per-channel sample datasets, in samples.
///
/// Appends resize the dataset in place, so the chunk size only bounds
/// how much HDF5 allocates per extension.
const SAMPLES_CHUNK: usize = 4096;

/// Per-channel on-disk storage, created lazily on the first write.
struct ChannelStorage {
    group: Group,
    samples: Dataset,
    written: usize,
}

/// Writer for HDF5-backed acquisition files.
///
/// The writer owns the container handle for the lifetime of one
/// acquisition: it is acquired on construction and released, with the
/// header flushed, when the writer is closed or dropped.
///
/// # Workflow
///
/// 1. Create the writer with [`AcqWriter::create`]
/// 2. Fill in the header via [`header_mut`](AcqWriter::header_mut)
/// 3. Append sample batches with [`write`](AcqWriter::write)
/// 4. Set the final sample counts on the header
/// 5. Close with [`close`](AcqWriter::close)
///
/// # Examples
///
/// ```rust
/// use h5acq::AcqWriter;
///
/// let mut writer = AcqWriter::create("basic_writer.h5")?;
///
/// let header = writer.header_mut();
/// header.patient.name = "Jane Doe".to_string();
/// header.recording.sample_rate = 200.0;
/// header.set_channel_count(2);
/// header.channels[0].label = "DC01".to_string();
/// header.channels[1].label = "DC02".to_string();
///
/// writer.write(&[vec![0.0, 0.5, 1.0], vec![0.0, -0.5, -1.0]])?;
///
/// writer.header_mut().recording.nr_of_samples = 3;
/// for chn in &mut writer.header_mut().channels {
///     chn.nr_of_samples = 3;
/// }
/// writer.close()?;
///
/// # std::fs::remove_file("basic_writer.h5").ok();
/// # Ok::<(), h5acq::AcqError>(())
/// ```
pub struct AcqWriter {
    _file: File,
    patient_group: Group,
    recording_group: Group,
    channels_group: Group,
    header: AcqHeader,
    storage: Vec<ChannelStorage>,
    flushed: bool,
}

impl AcqWriter {
    /// Creates a new acquisition file at `path`.
    ///
    /// The container is created (or truncated if it exists) and the
    /// writer starts with a default [`AcqHeader`]; nothing is persisted
    /// until samples are written or the writer is closed.
    ///
    /// # Errors
    ///
    /// [`AcqError::FileAccess`] when the path cannot be created or
    /// opened (missing directory, permissions, locked file).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use h5acq::AcqWriter;
    ///
    /// match AcqWriter::create("/nonexistent-dir/recording.h5") {
    ///     Ok(_) => println!("file created"),
    ///     Err(e) => eprintln!("failed to create file: {}", e),
    /// }
    /// ```
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(&path)
            .map_err(|e| AcqError::FileAccess(format!("{}: {}", path.as_ref().display(), e)))?;

        let patient_group = file.create_group(schema::PATIENT_GROUP)?;
        let recording_group = file.create_group(schema::RECORDING_GROUP)?;
        let channels_group = file.create_group(schema::CHANNELS_GROUP)?;

        log::debug!("created acquisition file {}", path.as_ref().display());

        Ok(AcqWriter {
            _file: file,
            patient_group,
            recording_group,
            channels_group,
            header: AcqHeader::default(),
            storage: Vec::new(),
            flushed: false,
        })
    }

    /// The header as filled in so far.
    pub fn header(&self) -> &AcqHeader {
        &self.header
    }

    /// Mutable access to the header.
    ///
    /// The header is persisted when the writer is closed, so fields may
    /// be filled in any order before that point.
    pub fn header_mut(&mut self) -> &mut AcqHeader {
        &mut self.header
    }

    /// Appends one batch of samples to every channel.
    ///
    /// `signals` holds one sample sequence per channel, in channel
    /// order; its length must equal `recording.nr_of_channels`. The
    /// first call creates the per-channel datasets, later calls extend
    /// them. Batches from successive calls concatenate in call order.
    ///
    /// Per-channel batch lengths are NOT cross-checked: channels end up
    /// with equal totals only if the caller keeps batches aligned, and
    /// readers observe whatever was appended.
    ///
    /// # Errors
    ///
    /// * [`AcqError::ShapeMismatch`] when `signals.len()` differs from
    ///   the declared channel count. Previously appended data is left
    ///   untouched.
    /// * [`AcqError::FormatError`] when the declared channel count was
    ///   lowered after datasets were already created.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use h5acq::AcqWriter;
    ///
    /// let mut writer = AcqWriter::create("batched_writer.h5")?;
    /// writer.header_mut().set_channel_count(2);
    ///
    /// // Two batches of unequal size; totals per channel: 3 samples.
    /// writer.write(&[vec![0.0, 0.1], vec![1.0, 1.1]])?;
    /// writer.write(&[vec![0.2], vec![1.2]])?;
    ///
    /// writer.close()?;
    /// # std::fs::remove_file("batched_writer.h5").ok();
    /// # Ok::<(), h5acq::AcqError>(())
    /// ```
    pub fn write(&mut self, signals: &[Vec<f64>]) -> Result<()> {
        let expected = self.header.recording.nr_of_channels;
        if signals.len() != expected {
            return Err(AcqError::ShapeMismatch {
                expected,
                actual: signals.len(),
            });
        }

        self.ensure_channel_storage()?;

        for (store, batch) in self.storage.iter_mut().zip(signals) {
            append_samples(&store.samples, store.written, batch)?;
            store.written += batch.len();
        }

        log::trace!(
            "appended batch of {} sample(s) to {} channel(s)",
            signals.first().map_or(0, Vec::len),
            expected
        );
        Ok(())
    }

    /// Closes the writer, persisting the header.
    ///
    /// Flushes the patient, recording and channel attributes to their
    /// groups and creates empty datasets for channels that never
    /// received samples, so a writer that is opened and closed without
    /// any [`write`](AcqWriter::write) still produces a valid
    /// header-only file.
    ///
    /// The sample counts are persisted exactly as set on the header;
    /// the writer does not reconcile them with the number of samples
    /// actually appended. Callers are responsible for setting
    /// `recording.nr_of_samples` and each channel's `nr_of_samples`
    /// before closing.
    ///
    /// Dropping the writer performs the same flush best-effort; use
    /// `close` to observe flush errors.
    pub fn close(mut self) -> Result<()> {
        self.flush_header()
    }

    /// Creates group + dataset storage for declared channels that do
    /// not have any yet. Lowering the declared count below the number
    /// of channels already holding data is refused.
    fn ensure_channel_storage(&mut self) -> Result<()> {
        let wanted = self.header.recording.nr_of_channels;
        if wanted < self.storage.len() {
            return Err(AcqError::FormatError(format!(
                "recording declares {} channel(s) but {} already hold data",
                wanted,
                self.storage.len()
            )));
        }

        for index in self.storage.len()..wanted {
            let group = self
                .channels_group
                .create_group(&schema::channel_group_name(index))?;
            let samples = group
                .new_dataset::<f64>()
                .shape((0..,))
                .chunk((SAMPLES_CHUNK,))
                .create(schema::SAMPLES_DATASET)?;
            self.storage.push(ChannelStorage {
                group,
                samples,
                written: 0,
            });
        }
        Ok(())
    }

    fn flush_header(&mut self) -> Result<()> {
        // Marked up front so a failed flush is not retried from Drop.
        self.flushed = true;

        self.ensure_channel_storage()?;

        let patient = &self.header.patient;
        schema::write_str_attr(&self.patient_group, "Name", &patient.name)?;
        schema::write_str_attr(&self.patient_group, "Gender", &patient.gender)?;
        schema::write_str_attr(
            &self.patient_group,
            "BirthDate",
            &schema::encode_date(patient.birth_date),
        )?;
        schema::write_str_attr(&self.patient_group, "Id", &patient.id)?;

        let recording = &self.header.recording;
        schema::write_i64_attr(
            &self.recording_group,
            "NrOfChannels",
            recording.nr_of_channels as i64,
        )?;
        schema::write_f64_attr(&self.recording_group, "SampleRate", recording.sample_rate)?;
        schema::write_i64_attr(&self.recording_group, "NrOfSamples", recording.nr_of_samples)?;

        for (index, store) in self.storage.iter().enumerate() {
            let chn = self
                .header
                .channels
                .get(index)
                .cloned()
                .unwrap_or_else(ChannelInfo::default);
            schema::write_str_attr(&store.group, "Label", &chn.label)?;
            schema::write_str_attr(&store.group, "Dimension", &chn.dimension)?;
            schema::write_f64_attr(&store.group, "Offset", chn.offset)?;
            schema::write_f64_attr(&store.group, "Amplification", chn.amplification)?;
            schema::write_f64_attr(&store.group, "SamplingRate", chn.sampling_rate)?;
            schema::write_i64_attr(&store.group, "NrOfSamples", chn.nr_of_samples)?;
        }

        log::debug!(
            "flushed header for {} channel(s)",
            self.header.recording.nr_of_channels
        );
        Ok(())
    }
}

impl Drop for AcqWriter {
    fn drop(&mut self) {
        if !self.flushed {
            let _ = self.flush_header();
        }
    }
}

/// Extends `dataset` by `data.len()` samples starting at `offset`.
fn append_samples(dataset: &Dataset, offset: usize, data: &[f64]) -> Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    let new_len = offset + data.len();
    dataset.resize((new_len,))?;
    dataset.write_slice(ArrayView1::from(data), s![offset..new_len])?;
    Ok(())
}
