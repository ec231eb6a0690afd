use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use h5acq::{AcqError, AcqHeader, AcqReader, AcqWriter};
use tempfile::TempDir;

// Fills a header the way an acquisition frontend would: five DC leads
// sampled at 200 Hz with a +/-10 V range mapped onto 16-bit raw units.
fn fill_header(header: &mut AcqHeader) {
    header.patient.name = "Robert".to_string();
    header.patient.gender = "Male".to_string();
    header.patient.birth_date = NaiveDate::from_ymd_opt(1969, 1, 12).unwrap();
    header.patient.id = "8475805".to_string();
    header.recording.sample_rate = 200.0;
    header.set_channel_count(5);
    for (i, chn) in header.channels.iter_mut().enumerate() {
        chn.label = format!("DC{:02}", i + 1);
        chn.dimension = "V".to_string();
        chn.offset = 0.0;
        chn.amplification = (10.0 - -10.0) / (i16::MAX as f64 - i16::MIN as f64);
        chn.sampling_rate = 200.0;
    }
}

// One ramp batch per channel: channel c covers values [start, start+len)
// shifted by c * len, everything scaled by 1/len.
fn ramp_batch(channels: usize, start: usize, len: usize) -> Vec<Vec<f64>> {
    (0..channels)
        .map(|c| {
            (0..len)
                .map(|j| (c * len + start + j) as f64 / len as f64)
                .collect()
        })
        .collect()
}

#[test]
fn test_write_and_read_no_data_acquisition_file() {
    let dir = TempDir::new().unwrap();
    let filename = dir.path().join("no_data_acquisition.h5");

    // Write phase: header only, no samples ever written.
    {
        let mut writer = AcqWriter::create(&filename).unwrap();
        fill_header(writer.header_mut());
        writer.close().unwrap();
    }

    // Read phase: every field must come back exactly.
    {
        let reader = AcqReader::open(&filename).unwrap();
        let header = reader.header();

        assert_eq!(header.patient.name, "Robert");
        assert_eq!(header.patient.gender, "Male");
        assert_eq!(
            header.patient.birth_date,
            NaiveDate::from_ymd_opt(1969, 1, 12).unwrap()
        );
        assert_eq!(header.patient.id, "8475805");

        assert_eq!(header.recording.nr_of_channels, 5);
        assert_eq!(header.recording.sample_rate, 200.0);
        assert_eq!(header.recording.nr_of_samples, 0);

        let labels: Vec<&str> = header.channels.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["DC01", "DC02", "DC03", "DC04", "DC05"]);
        for chn in &header.channels {
            assert_eq!(chn.dimension, "V");
            assert_eq!(chn.offset, 0.0);
            // f64 attributes round-trip bit-exact.
            assert_eq!(
                chn.amplification,
                (10.0 - -10.0) / (i16::MAX as f64 - i16::MIN as f64)
            );
            assert_eq!(chn.sampling_rate, 200.0);
            assert_eq!(chn.nr_of_samples, 0);
        }
    }
}

/// 100 samples per channel are written in two batches of 50, then the
/// total is recorded on the recording and channel objects by hand.
#[test]
fn test_write_and_read_with_data_acquisition_file() {
    let dir = TempDir::new().unwrap();
    let filename = dir.path().join("with_data_acquisition.h5");

    {
        let mut writer = AcqWriter::create(&filename).unwrap();
        fill_header(writer.header_mut());

        writer.write(&ramp_batch(5, 0, 50)).unwrap();
        writer.write(&ramp_batch(5, 50, 50)).unwrap();

        writer.header_mut().recording.nr_of_samples = 100;
        for chn in &mut writer.header_mut().channels {
            chn.nr_of_samples = 100;
        }
        writer.close().unwrap();
    }

    {
        let reader = AcqReader::open(&filename).unwrap();
        let header = reader.header();

        assert_eq!(header.patient.name, "Robert");
        assert_eq!(header.recording.nr_of_samples, 100);
        let labels: Vec<&str> = header.channels.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["DC01", "DC02", "DC03", "DC04", "DC05"]);
        for chn in &header.channels {
            assert_eq!(chn.nr_of_samples, 100);
        }

        // First batch of channel 0: j/50 for j in 0..50.
        let data = reader.read_double(0, 49).unwrap();
        assert_eq!(data.len(), 5);
        assert_eq!(data[0].len(), 50);
        for (j, &expected) in [0.0, 0.02, 0.04, 0.06, 0.08].iter().enumerate() {
            assert_abs_diff_eq!(data[0][j], expected, epsilon = 1e-12);
        }
        // Channel 1 starts its ramp at 50/50.
        assert_abs_diff_eq!(data[1][0], 1.0, epsilon = 1e-12);

        // Second batch of channel 0: j/50 for j in 50..100.
        let data = reader.read_double(50, 99).unwrap();
        for (j, &expected) in [1.0, 1.02, 1.04, 1.06, 1.08].iter().enumerate() {
            assert_abs_diff_eq!(data[0][j], expected, epsilon = 1e-12);
        }
        // Last sample of the last channel: (5 * 50 + 49) / 50.
        assert_abs_diff_eq!(data[4][49], 299.0 / 50.0, epsilon = 1e-12);
    }
}

#[test]
fn test_write_shape_mismatch_leaves_data_intact() {
    let dir = TempDir::new().unwrap();
    let filename = dir.path().join("shape_mismatch.h5");

    {
        let mut writer = AcqWriter::create(&filename).unwrap();
        fill_header(writer.header_mut());
        writer.write(&ramp_batch(5, 0, 10)).unwrap();

        // Three channels against a five-channel recording.
        let err = writer.write(&ramp_batch(3, 0, 10)).unwrap_err();
        match err {
            AcqError::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, 5);
                assert_eq!(actual, 3);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }

        writer.close().unwrap();
    }

    {
        let reader = AcqReader::open(&filename).unwrap();

        // The rejected batch must not have touched the datasets.
        let data = reader.read_double(0, 9).unwrap();
        assert_eq!(data.len(), 5);
        assert_abs_diff_eq!(data[0][9], 0.9, epsilon = 1e-12);
        assert!(matches!(
            reader.read_double(0, 10),
            Err(AcqError::OutOfRange { len: 10, .. })
        ));
    }
}

#[test]
fn test_read_double_rejects_invalid_ranges() {
    let dir = TempDir::new().unwrap();
    let filename = dir.path().join("invalid_ranges.h5");

    {
        let mut writer = AcqWriter::create(&filename).unwrap();
        fill_header(writer.header_mut());
        writer.write(&ramp_batch(5, 0, 20)).unwrap();
        writer.close().unwrap();
    }

    let reader = AcqReader::open(&filename).unwrap();

    match reader.read_double(10, 5).unwrap_err() {
        AcqError::OutOfRange { start, end, .. } => {
            assert_eq!((start, end), (10, 5));
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }

    assert!(matches!(
        reader.read_double(0, 20),
        Err(AcqError::OutOfRange { len: 20, .. })
    ));
    assert!(matches!(
        reader.read_double(500, 600),
        Err(AcqError::OutOfRange { .. })
    ));

    // The store stays readable after failed calls.
    assert_eq!(reader.read_double(0, 19).unwrap()[0].len(), 20);
}

#[test]
fn test_open_missing_or_invalid_file() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("not_there.h5");
    assert!(matches!(
        AcqReader::open(&missing),
        Err(AcqError::FileAccess(_))
    ));

    // A file that is not HDF5 at all.
    let garbage = dir.path().join("garbage.h5");
    std::fs::write(&garbage, b"definitely not an acquisition file").unwrap();
    assert!(matches!(
        AcqReader::open(&garbage),
        Err(AcqError::FormatError(_))
    ));

    // A valid HDF5 file that does not follow the schema.
    let foreign = dir.path().join("foreign.h5");
    {
        let file = hdf5::File::create(&foreign).unwrap();
        file.create_group("SomethingElse").unwrap();
    }
    assert!(matches!(
        AcqReader::open(&foreign),
        Err(AcqError::FormatError(_))
    ));
}

#[test]
fn test_reader_idempotent_header_snapshots() {
    let dir = TempDir::new().unwrap();
    let filename = dir.path().join("idempotent.h5");

    {
        let mut writer = AcqWriter::create(&filename).unwrap();
        fill_header(writer.header_mut());
        writer.write(&ramp_batch(5, 0, 50)).unwrap();
        writer.header_mut().recording.nr_of_samples = 50;
        for chn in &mut writer.header_mut().channels {
            chn.nr_of_samples = 50;
        }
        writer.close().unwrap();
    }

    let first = AcqReader::open(&filename).unwrap();
    let second = AcqReader::open(&filename).unwrap();
    assert_eq!(first.header(), second.header());
}
