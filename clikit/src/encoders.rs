//! Encoders for data output.
//!
//! Time-delta and timestamp formatting plus YAML/JSON document dumping
//! with consistent conventions: YAML output carries an explicit document
//! start marker, timestamps render in UTC.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;

use crate::error::{Error, Result};

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Formats a time delta in seconds as `HH:MM:SS` with fractional seconds.
///
/// With `with_prefix` the value carries a `+` or `-` sign; a negative
/// delta without a prefix cannot be represented and is an error. Deltas
/// of a day or more wrap, matching wall-clock time formatting.
///
/// # Errors
///
/// Returns [`Error::Encoding`] for negative values when `with_prefix` is
/// false, and for non-finite input.
///
/// # Examples
///
/// ```
/// use clikit::encoders::format_timedelta;
///
/// assert_eq!(format_timedelta(90.0, true).unwrap(), "+00:01:30");
/// assert_eq!(format_timedelta(-0.5, true).unwrap(), "-00:00:00.500000");
/// assert!(format_timedelta(-1.0, false).is_err());
/// ```
pub fn format_timedelta(seconds: f64, with_prefix: bool) -> Result<String> {
    if !seconds.is_finite() {
        return Err(Error::Encoding(format!(
            "timedelta value is not finite: {seconds}"
        )));
    }
    let negative = seconds < 0.0;
    if negative && !with_prefix {
        return Err(Error::Encoding(
            "negative timedelta requires a prefix".to_string(),
        ));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total_micros = (seconds.abs() * MICROS_PER_SECOND).round() as u64;
    let micros = total_micros % 1_000_000;
    let total_seconds = total_micros / 1_000_000;
    let hours = (total_seconds / 3600) % 24;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    let clock = if micros > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}.{micros:06}")
    } else {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    };

    if with_prefix {
        let prefix = if negative { '-' } else { '+' };
        Ok(format!("{prefix}{clock}"))
    } else {
        Ok(clock)
    }
}

/// Formats a [`chrono::Duration`] like [`format_timedelta`].
///
/// # Errors
///
/// See [`format_timedelta`].
pub fn format_duration(duration: Duration, with_prefix: bool) -> Result<String> {
    #[allow(clippy::cast_precision_loss)]
    let seconds = duration.num_microseconds().map_or_else(
        || duration.num_seconds() as f64,
        |micros| micros as f64 / MICROS_PER_SECOND,
    );
    format_timedelta(seconds, with_prefix)
}

/// Renders a timestamp in UTC as an RFC 3339 string.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use clikit::encoders::format_datetime_utc;
///
/// let timestamp = Utc.with_ymd_and_hms(2023, 6, 1, 12, 30, 0).unwrap();
/// assert_eq!(format_datetime_utc(&timestamp), "2023-06-01T12:30:00+00:00");
/// ```
#[must_use]
pub fn format_datetime_utc<Tz: TimeZone>(value: &DateTime<Tz>) -> String {
    value.with_timezone(&Utc).to_rfc3339()
}

/// Dumps a value as a YAML document with an explicit `---` start marker.
///
/// # Errors
///
/// Returns [`Error::Encoding`] when the value cannot be serialized.
///
/// # Examples
///
/// ```
/// use clikit::encoders::yaml_dump;
///
/// let document = yaml_dump(&[1, 2, 3]).unwrap();
/// assert!(document.starts_with("---\n"));
/// ```
pub fn yaml_dump<T: Serialize>(value: &T) -> Result<String> {
    let document =
        serde_yaml::to_string(value).map_err(|error| Error::Encoding(error.to_string()))?;
    if document.starts_with("---") {
        Ok(document)
    } else {
        Ok(format!("---\n{document}"))
    }
}

/// Dumps a value as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`Error::Encoding`] when the value cannot be serialized.
pub fn json_dump<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|error| Error::Encoding(error.to_string()))
}
