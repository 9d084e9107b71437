use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::data_types::fixture::MatchStatus;

pub mod config;
pub mod logging;

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;
const MATCH_LENGTH_HOURS: i64 = 2;

pub struct DateTimeUtils {}

impl DateTimeUtils {
    pub fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn millis_to_str(millis: i64) -> String {
        match Utc.timestamp_millis_opt(millis).single() {
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => millis.to_string(),
        }
    }

    /// Feed dates are ISO-8601 with an offset, e.g. `2024-05-01T19:00:00Z`.
    pub fn parse_utc(iso_datetime: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(iso_datetime)
            .ok()
            .map(|datetime| datetime.with_timezone(&Utc))
    }

    /// Whole days until kickoff, rounded up, never negative.
    pub fn days_left(kickoff: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        let remaining = (kickoff - now).num_milliseconds();
        if remaining <= 0 {
            return 0;
        }

        (remaining + DAY_MILLIS - 1) / DAY_MILLIS
    }

    pub fn match_status(kickoff: DateTime<Utc>, now: DateTime<Utc>) -> MatchStatus {
        if now < kickoff {
            MatchStatus::Upcoming
        } else if now > kickoff + Duration::hours(MATCH_LENGTH_HOURS) {
            MatchStatus::Finished
        } else {
            MatchStatus::Live
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(iso: &str) -> DateTime<Utc> {
        DateTimeUtils::parse_utc(iso).unwrap()
    }

    #[test]
    fn days_left_rounds_up_and_floors_at_zero() {
        let kickoff = at("2024-05-01T19:00:00Z");

        assert_eq!(DateTimeUtils::days_left(kickoff, at("2024-05-01T18:00:00Z")), 1);
        assert_eq!(DateTimeUtils::days_left(kickoff, at("2024-04-29T19:00:00Z")), 2);
        assert_eq!(DateTimeUtils::days_left(kickoff, at("2024-04-29T18:59:00Z")), 3);
        assert_eq!(DateTimeUtils::days_left(kickoff, at("2024-05-02T19:00:00Z")), 0);
    }

    #[test]
    fn status_window_is_two_hours() {
        let kickoff = at("2024-05-01T19:00:00Z");

        assert_eq!(
            DateTimeUtils::match_status(kickoff, at("2024-05-01T18:59:59Z")),
            MatchStatus::Upcoming
        );
        assert_eq!(
            DateTimeUtils::match_status(kickoff, at("2024-05-01T20:30:00Z")),
            MatchStatus::Live
        );
        assert_eq!(
            DateTimeUtils::match_status(kickoff, at("2024-05-01T21:00:01Z")),
            MatchStatus::Finished
        );
    }

    #[test]
    fn unparsable_dates_are_none() {
        assert!(DateTimeUtils::parse_utc("May 1st").is_none());
        assert!(DateTimeUtils::parse_utc("2024-05-01T21:00:00+02:00").is_some());
    }
}
