//! On-disk layout of the acquisition container.
//!
//! One file holds three top-level groups: [`PATIENT_GROUP`] and
//! [`RECORDING_GROUP`] carry their metadata as typed attributes, and
//! [`CHANNELS_GROUP`] holds one sub-group per channel, keyed by
//! zero-based index. Each channel group carries the channel attributes
//! plus a growable 1-D `f64` dataset named [`SAMPLES_DATASET`].
//!
//! Strings are variable-length UTF-8 attributes; counts are `i64`;
//! rates and scale factors are `f64`; the birth date is an ISO-8601
//! `YYYY-MM-DD` string.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use hdf5::types::VarLenUnicode;
use hdf5::Group;

use crate::error::{AcqError, Result};

/// Group holding the patient attributes.
pub const PATIENT_GROUP: &str = "Patient";
/// Group holding the recording attributes.
pub const RECORDING_GROUP: &str = "Recording";
/// Group holding one sub-group per channel.
pub const CHANNELS_GROUP: &str = "Channels";
/// Per-channel sample dataset name.
pub const SAMPLES_DATASET: &str = "Samples";

/// Name of the sub-group for the channel at `index`.
///
/// Index-keyed names keep the channel order independent of label
/// collation; the label itself lives in the `Label` attribute.
pub fn channel_group_name(index: usize) -> String {
    format!("Channel{index:02}")
}

pub(crate) fn write_str_attr(group: &Group, name: &str, value: &str) -> Result<()> {
    let value = to_var_len_unicode(value)?;
    group
        .new_attr::<VarLenUnicode>()
        .create(name)?
        .write_scalar(&value)?;
    Ok(())
}

pub(crate) fn write_i64_attr(group: &Group, name: &str, value: i64) -> Result<()> {
    group.new_attr::<i64>().create(name)?.write_scalar(&value)?;
    Ok(())
}

pub(crate) fn write_f64_attr(group: &Group, name: &str, value: f64) -> Result<()> {
    group.new_attr::<f64>().create(name)?.write_scalar(&value)?;
    Ok(())
}

pub(crate) fn read_str_attr(group: &Group, name: &str) -> Result<String> {
    let value: VarLenUnicode = group
        .attr(name)
        .and_then(|a| a.read_scalar())
        .map_err(|e| bad_attr(name, &e))?;
    Ok(value.to_string())
}

pub(crate) fn read_i64_attr(group: &Group, name: &str) -> Result<i64> {
    group
        .attr(name)
        .and_then(|a| a.read_scalar::<i64>())
        .map_err(|e| bad_attr(name, &e))
}

pub(crate) fn read_f64_attr(group: &Group, name: &str) -> Result<f64> {
    group
        .attr(name)
        .and_then(|a| a.read_scalar::<f64>())
        .map_err(|e| bad_attr(name, &e))
}

fn bad_attr(name: &str, err: &hdf5::Error) -> AcqError {
    AcqError::FormatError(format!("missing or invalid attribute {name}: {err}"))
}

pub(crate) fn to_var_len_unicode(value: &str) -> Result<VarLenUnicode> {
    VarLenUnicode::from_str(value)
        .map_err(|e| AcqError::FormatError(format!("invalid utf-8 attribute value: {e}")))
}

/// Formats a birth date as `YYYY-MM-DD`.
pub(crate) fn encode_date(date: NaiveDate) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Parses a `YYYY-MM-DD` attribute back into a date.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    let invalid = || AcqError::FormatError(format!("invalid date attribute: {s:?}"));

    let mut parts = s.splitn(3, '-');
    let year = parts
        .next()
        .and_then(|p| p.parse::<i32>().ok())
        .ok_or_else(invalid)?;
    let month = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .ok_or_else(invalid)?;
    let day = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(1969, 1, 12).unwrap();
        assert_eq!(encode_date(date), "1969-01-12");
        assert_eq!(parse_date("1969-01-12").unwrap(), date);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("").is_err());
        assert!(parse_date("12-JAN-1969").is_err());
        assert!(parse_date("1969-13-01").is_err());
        assert!(parse_date("1969-01").is_err());
    }

    #[test]
    fn test_channel_group_names_are_ordered() {
        assert_eq!(channel_group_name(0), "Channel00");
        assert_eq!(channel_group_name(4), "Channel04");
        assert_eq!(channel_group_name(123), "Channel123");
    }
}
