use log::error;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Retrieves the current time, in seconds since the UNIX epoch.
/// Otherwise known as "unix time".
///
/// It can fail if the clock isn't ready.
pub fn unix_now() -> Result<u64, TimeError> {
  match SystemTime::now().duration_since(UNIX_EPOCH) {
    Ok(t) => Ok(t.as_secs()),
    Err(e) => {
      error!("Error determining the time in UNIX land: {:?}", e);
      Err(TimeError::ClockNotReady)
    }
  }
}

/// Builds a `SystemTime` from a seconds + nanoseconds pair, as carried
/// by NetFlow v5 headers. Returns `None` if the result does not fit in
/// a `SystemTime`.
pub fn from_unix_parts(secs: u64, nanos: u32) -> Option<SystemTime> {
  UNIX_EPOCH
    .checked_add(Duration::from_secs(secs))?
    .checked_add(Duration::from_nanos(nanos as u64))
}

/// Builds a `SystemTime` from milliseconds since the UNIX epoch.
pub fn from_unix_millis(millis: u64) -> Option<SystemTime> {
  UNIX_EPOCH.checked_add(Duration::from_millis(millis))
}

/// Builds a `SystemTime` from microseconds since the UNIX epoch.
pub fn from_unix_micros(micros: u64) -> Option<SystemTime> {
  UNIX_EPOCH.checked_add(Duration::from_micros(micros))
}

/// Builds a `SystemTime` from nanoseconds since the UNIX epoch.
pub fn from_unix_nanos(nanos: u64) -> Option<SystemTime> {
  UNIX_EPOCH.checked_add(Duration::from_nanos(nanos))
}

/// Converts a `SystemTime` to nanoseconds since the UNIX epoch.
/// Times before the epoch clamp to zero.
pub fn unix_nanos(time: SystemTime) -> u128 {
  time
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_nanos())
    .unwrap_or(0)
}

/// Error type for time functions.
#[derive(Error, Debug)]
pub enum TimeError {
  /// The clock isn't ready yet.
  #[error("Clock not ready")]
  ClockNotReady,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unix_parts_round_trip() {
    let t = from_unix_parts(1_700_000_000, 500).unwrap();
    assert_eq!(unix_nanos(t), 1_700_000_000_000_000_500);
  }

  #[test]
  fn sub_second_units_agree() {
    assert_eq!(from_unix_millis(1_500), from_unix_micros(1_500_000));
    assert_eq!(from_unix_micros(7), from_unix_nanos(7_000));
  }

  #[test]
  fn out_of_range_seconds_are_rejected() {
    assert!(from_unix_parts(u64::MAX, 0).is_none());
    assert!(from_unix_millis(1_500).is_some());
  }

  #[test]
  fn clock_is_ready() {
    assert!(unix_now().unwrap() > 1_600_000_000);
  }
}
