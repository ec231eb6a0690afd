//! Simulates realtime capture: many small appends, then chunked readback.
//!
//! Run with: cargo run --example streaming_write

use h5acq::{AcqReader, AcqWriter, Result};

fn main() -> Result<()> {
    let path = "streaming_write.h5";
    let channels = 2;
    let batch_len = 50;
    let batches = 40;

    {
        let mut writer = AcqWriter::create(path)?;

        let header = writer.header_mut();
        header.patient.id = "STREAM001".to_string();
        header.recording.sample_rate = 100.0;
        header.set_channel_count(channels);
        for (i, chn) in header.channels.iter_mut().enumerate() {
            chn.label = format!("Lead{:02}", i + 1);
            chn.dimension = "uV".to_string();
            chn.sampling_rate = 100.0;
        }

        // Each iteration stands in for one acquisition callback.
        for batch in 0..batches {
            let signals: Vec<Vec<f64>> = (0..channels)
                .map(|c| {
                    (0..batch_len)
                        .map(|i| {
                            let t = (batch * batch_len + i) as f64 / 100.0;
                            30.0 * (2.0 * std::f64::consts::PI * (8.0 + c as f64) * t).sin()
                        })
                        .collect()
                })
                .collect();
            writer.write(&signals)?;

            if (batch + 1) % 10 == 0 {
                println!("streamed {} sample(s) per channel", (batch + 1) * batch_len);
            }
        }

        let total = (batches * batch_len) as i64;
        writer.header_mut().recording.nr_of_samples = total;
        for chn in &mut writer.header_mut().channels {
            chn.nr_of_samples = total;
        }
        writer.close()?;
    }

    {
        let reader = AcqReader::open(path)?;
        let total = reader.header().recording.nr_of_samples as usize;

        let chunk = 256;
        let mut position = 0;
        while position < total {
            let end = (position + chunk).min(total) - 1;
            let data = reader.read_double(position, end)?;
            let mean: f64 =
                data[0].iter().sum::<f64>() / data[0].len() as f64;
            println!(
                "samples {:4}..={:4}  channel 0 mean {:+.4}",
                position, end, mean
            );
            position += chunk;
        }
    }

    std::fs::remove_file(path).ok();
    Ok(())
}
