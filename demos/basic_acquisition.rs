//! Writes a small five-channel acquisition file and reads it back.
//!
//! Run with: cargo run --example basic_acquisition

use chrono::NaiveDate;
use h5acq::{AcqReader, AcqWriter, Result};

fn main() -> Result<()> {
    let path = "basic_acquisition.h5";
    let channels = 5;
    let samples = 200;

    // Write phase.
    {
        let mut writer = AcqWriter::create(path)?;

        let header = writer.header_mut();
        header.patient.name = "Robert".to_string();
        header.patient.gender = "Male".to_string();
        header.patient.birth_date = NaiveDate::from_ymd_opt(1969, 1, 12).unwrap();
        header.patient.id = "8475805".to_string();
        header.recording.sample_rate = 200.0;
        header.set_channel_count(channels);
        for (i, chn) in header.channels.iter_mut().enumerate() {
            chn.label = format!("DC{:02}", i + 1);
            chn.dimension = "V".to_string();
            chn.amplification = 20.0 / 65535.0;
            chn.sampling_rate = 200.0;
        }

        // One second of a sine wave per channel, each lead phase-shifted.
        let signals: Vec<Vec<f64>> = (0..channels)
            .map(|c| {
                (0..samples)
                    .map(|i| {
                        let t = i as f64 / samples as f64;
                        (2.0 * std::f64::consts::PI * (t + c as f64 * 0.1)).sin()
                    })
                    .collect()
            })
            .collect();
        writer.write(&signals)?;

        writer.header_mut().recording.nr_of_samples = samples as i64;
        for chn in &mut writer.header_mut().channels {
            chn.nr_of_samples = samples as i64;
        }
        writer.close()?;
    }

    // Read phase.
    {
        let reader = AcqReader::open(path)?;
        let header = reader.header();

        println!("patient: {} ({})", header.patient.name, header.patient.id);
        println!(
            "recording: {} channel(s) at {} Hz, {} sample(s)",
            header.recording.nr_of_channels,
            header.recording.sample_rate,
            header.recording.nr_of_samples
        );

        let data = reader.read_double(0, 9)?;
        for (chn, series) in header.channels.iter().zip(&data) {
            println!(
                "  {} [{}]: first samples {:?}",
                chn.label,
                chn.dimension,
                &series[..3]
            );
        }
    }

    std::fs::remove_file(path).ok();
    Ok(())
}
