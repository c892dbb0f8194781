use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::constants::{GPS_EPOCH_UNIX_SECONDS, MILLIS_PER_WEEK, SECONDS_PER_WEEK};

const MILLIS_PER_SECOND: i64 = 1_000;
const NANOS_PER_MILLI: u32 = 1_000_000;
const SECONDS_PER_DAY: f64 = 86_400.0;
/// Clock skew tolerated between host and receiver around a week boundary
const WEEK_ROLLOVER_MARGIN_MS: i64 = 10 * 60 * 1_000;

/// Unix epoch time attached to every decoded record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
    pub sec: i64,
    pub nsec: u32,
}

/// Where record timestamps come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeSource {
    /// Receiver time of week, placed in the GPS week around the wall clock
    #[default]
    Device,
    /// Wall clock at decode time, receiver time is ignored
    Local,
}

impl Timestamp {
    pub fn now() -> Self {
        Self::from_datetime(&Utc::now())
    }

    pub fn from_datetime(datetime: &DateTime<Utc>) -> Self {
        Self {
            sec: datetime.timestamp(),
            nsec: datetime.timestamp_subsec_nanos(),
        }
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sec, self.nsec)
    }

    pub fn as_secs_f64(self) -> f64 {
        self.sec as f64 + f64::from(self.nsec) * 1e-9
    }

    /// Converts a receiver time of week (ms) using the current wall clock to
    /// pick the GPS week.
    pub fn from_tow(tow_ms: u32, leap_seconds: i64) -> Self {
        Self::from_tow_at(tow_ms, leap_seconds, &Utc::now())
    }

    /// Converts a receiver time of week (ms), placing it in the GPS week of
    /// `now`.
    ///
    /// Close to a week boundary the receiver and the wall clock can disagree
    /// on the week. A time of week near the end of the week while `now` just
    /// started the next one is taken from the previous week, and one near the
    /// start while `now` is about to end the week from the next.
    pub fn from_tow_at(tow_ms: u32, leap_seconds: i64, now: &DateTime<Utc>) -> Self {
        let week_ms = SECONDS_PER_WEEK * MILLIS_PER_SECOND;
        let gps_offset_ms = (GPS_EPOCH_UNIX_SECONDS - leap_seconds) * MILLIS_PER_SECOND;
        let gps_now_ms = now.timestamp_millis() - gps_offset_ms;
        let tow_ms = i64::from(tow_ms % MILLIS_PER_WEEK);

        let mut week = gps_now_ms.div_euclid(week_ms);
        let now_tow_ms = gps_now_ms.rem_euclid(week_ms);
        let near_start = |ms: i64| ms < WEEK_ROLLOVER_MARGIN_MS;
        let near_end = |ms: i64| ms >= week_ms - WEEK_ROLLOVER_MARGIN_MS;
        if near_end(tow_ms) && near_start(now_tow_ms) {
            week -= 1;
        } else if near_start(tow_ms) && near_end(now_tow_ms) {
            week += 1;
        }

        let unix_ms = week * week_ms + tow_ms + gps_offset_ms;
        Self {
            sec: unix_ms.div_euclid(MILLIS_PER_SECOND),
            nsec: unix_ms.rem_euclid(MILLIS_PER_SECOND) as u32 * NANOS_PER_MILLI,
        }
    }

    /// Places a UTC time of day (seconds since midnight) on the date of `now`.
    ///
    /// A time more than twelve hours ahead of `now` belongs to the previous day.
    pub fn from_utc_time_of_day(seconds: f64, now: &DateTime<Utc>) -> Option<Self> {
        if !(0.0..SECONDS_PER_DAY + 1.0).contains(&seconds) {
            return None;
        }
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let millis = (seconds * MILLIS_PER_SECOND as f64).round() as i64;
        let mut datetime = midnight + Duration::milliseconds(millis);
        if datetime - *now > Duration::hours(12) {
            datetime -= Duration::days(1);
        }
        Some(Self::from_datetime(&datetime))
    }
}
