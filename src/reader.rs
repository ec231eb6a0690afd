use std::path::Path;

use hdf5::{Dataset, File, Group};
use ndarray::s;

use crate::error::{AcqError, Result};
use crate::schema;
use crate::types::{AcqHeader, ChannelInfo, Patient, Recording};

/// Read-only view of an HDF5-backed acquisition file.
///
/// Opening a reader parses the complete header eagerly; sample data is
/// re-materialized from the container on every
/// [`read_double`](AcqReader::read_double) call.
///
/// # Examples
///
/// ```rust
/// use h5acq::AcqReader;
///
/// # h5acq::doctest_utils::create_demo_acquisition("reader_basic.h5")?;
/// let reader = AcqReader::open("reader_basic.h5")?;
///
/// let header = reader.header();
/// println!("patient: {}", header.patient.name);
/// println!("channels: {}", header.recording.nr_of_channels);
///
/// // First ten samples of every channel.
/// let data = reader.read_double(0, 9)?;
/// assert_eq!(data.len(), header.recording.nr_of_channels);
/// assert_eq!(data[0].len(), 10);
///
/// # std::fs::remove_file("reader_basic.h5").ok();
/// # Ok::<(), h5acq::AcqError>(())
/// ```
pub struct AcqReader {
    _file: File,
    header: AcqHeader,
    samples: Vec<Dataset>,
}

impl AcqReader {
    /// Opens an existing acquisition file read-only.
    ///
    /// The header snapshot is reconstructed before the reader is
    /// returned; on any failure no partially-parsed reader escapes.
    ///
    /// # Errors
    ///
    /// * [`AcqError::FileAccess`] when the path does not exist.
    /// * [`AcqError::FormatError`] when the file is not a container of
    ///   this schema (missing groups/attributes, wrong types).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use h5acq::{AcqError, AcqReader};
    ///
    /// match AcqReader::open("does_not_exist.h5") {
    ///     Err(AcqError::FileAccess(msg)) => println!("no such file: {}", msg),
    ///     other => panic!("expected FileAccess, got {:?}", other.map(|_| ())),
    /// }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AcqError::FileAccess(format!(
                "{}: file not found",
                path.display()
            )));
        }

        let file = File::open(path).map_err(|e| {
            AcqError::FormatError(format!(
                "{}: not a valid acquisition container: {}",
                path.display(),
                e
            ))
        })?;

        let patient = read_patient(&file)?;
        let recording = read_recording(&file)?;

        let channels_group = named_group(&file, schema::CHANNELS_GROUP)?;
        let mut channels = Vec::with_capacity(recording.nr_of_channels);
        let mut samples = Vec::with_capacity(recording.nr_of_channels);
        for index in 0..recording.nr_of_channels {
            let name = schema::channel_group_name(index);
            let group = channels_group
                .group(&name)
                .map_err(|e| AcqError::FormatError(format!("missing group {name}: {e}")))?;
            channels.push(read_channel(&group)?);
            samples.push(group.dataset(schema::SAMPLES_DATASET).map_err(|e| {
                AcqError::FormatError(format!("missing dataset {name}/Samples: {e}"))
            })?);
        }

        log::debug!(
            "opened acquisition file {} with {} channel(s)",
            path.display(),
            recording.nr_of_channels
        );

        Ok(AcqReader {
            _file: file,
            header: AcqHeader {
                patient,
                recording,
                channels,
            },
            samples,
        })
    }

    /// The header snapshot taken when the file was opened.
    pub fn header(&self) -> &AcqHeader {
        &self.header
    }

    /// Reads the inclusive sample range `[start, end]` from every
    /// channel, in channel order.
    ///
    /// Indices are zero-based. Values are returned as `f64`, the type
    /// they are stored in, so no precision is lost.
    ///
    /// # Errors
    ///
    /// [`AcqError::OutOfRange`] when `start > end` or `end` is at or
    /// beyond any channel's stored length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use h5acq::AcqReader;
    ///
    /// # h5acq::doctest_utils::create_demo_acquisition("reader_ranges.h5")?;
    /// let reader = AcqReader::open("reader_ranges.h5")?;
    ///
    /// let head = reader.read_double(0, 4)?;
    /// let tail = reader.read_double(95, 99)?;
    /// assert_eq!(head[0].len(), 5);
    /// assert_eq!(tail[0].len(), 5);
    ///
    /// assert!(reader.read_double(90, 120).is_err());
    ///
    /// # std::fs::remove_file("reader_ranges.h5").ok();
    /// # Ok::<(), h5acq::AcqError>(())
    /// ```
    pub fn read_double(&self, start: usize, end: usize) -> Result<Vec<Vec<f64>>> {
        if start > end {
            return Err(AcqError::OutOfRange {
                start,
                end,
                len: self.samples.first().map_or(0, |ds| ds.size()),
            });
        }

        let mut out = Vec::with_capacity(self.samples.len());
        for dataset in &self.samples {
            let len = dataset.size();
            if end >= len {
                return Err(AcqError::OutOfRange { start, end, len });
            }
            let values = dataset.read_slice_1d::<f64, _>(s![start..=end])?;
            out.push(values.to_vec());
        }
        Ok(out)
    }
}

fn named_group(file: &File, name: &str) -> Result<Group> {
    file.group(name)
        .map_err(|e| AcqError::FormatError(format!("missing group {name}: {e}")))
}

fn read_patient(file: &File) -> Result<Patient> {
    let group = named_group(file, schema::PATIENT_GROUP)?;
    Ok(Patient {
        name: schema::read_str_attr(&group, "Name")?,
        gender: schema::read_str_attr(&group, "Gender")?,
        birth_date: schema::parse_date(&schema::read_str_attr(&group, "BirthDate")?)?,
        id: schema::read_str_attr(&group, "Id")?,
    })
}

fn read_recording(file: &File) -> Result<Recording> {
    let group = named_group(file, schema::RECORDING_GROUP)?;
    let nr_of_channels = schema::read_i64_attr(&group, "NrOfChannels")?;
    let nr_of_channels = usize::try_from(nr_of_channels).map_err(|_| {
        AcqError::FormatError(format!("negative channel count: {nr_of_channels}"))
    })?;
    Ok(Recording {
        nr_of_channels,
        sample_rate: schema::read_f64_attr(&group, "SampleRate")?,
        nr_of_samples: schema::read_i64_attr(&group, "NrOfSamples")?,
    })
}

fn read_channel(group: &Group) -> Result<ChannelInfo> {
    Ok(ChannelInfo {
        label: schema::read_str_attr(group, "Label")?,
        dimension: schema::read_str_attr(group, "Dimension")?,
        offset: schema::read_f64_attr(group, "Offset")?,
        amplification: schema::read_f64_attr(group, "Amplification")?,
        sampling_rate: schema::read_f64_attr(group, "SamplingRate")?,
        nr_of_samples: schema::read_i64_attr(group, "NrOfSamples")?,
    })
}
