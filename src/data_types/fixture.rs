use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};

use crate::{
    data_types::common::{DocumentId, Identifiable, MatchId, UserId},
    util::DateTimeUtils,
};

/// One row of the static schedule feed.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub utc_date: String,
    pub home_team: String,
    pub away_team: String,
    pub matchday: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Live,
    Finished,
}

/// A fixture the user's team plays in.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackedMatch {
    pub id: MatchId,
    pub utc_date: String,
    pub home_team: String,
    pub away_team: String,
    pub opponent: String,
    pub user_team: String,
    pub is_home: bool,
    pub matchday: i64,
}

impl TrackedMatch {
    pub fn kickoff(&self) -> Option<DateTime<Utc>> {
        DateTimeUtils::parse_utc(&self.utc_date)
    }

    pub fn days_left(&self, now: DateTime<Utc>) -> i64 {
        self.kickoff()
            .map(|kickoff| DateTimeUtils::days_left(kickoff, now))
            .unwrap_or(0)
    }

    pub fn status(&self, now: DateTime<Utc>) -> Option<MatchStatus> {
        self.kickoff()
            .map(|kickoff| DateTimeUtils::match_status(kickoff, now))
    }
}

impl Identifiable for TrackedMatch {
    fn as_id(&self) -> &str {
        &self.id
    }
}

/// Persisted per-user state of a match. `percent` is written by the progress aggregator only.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(rename = "_id")]
    pub key: DocumentId,
    pub user_id: UserId,
    pub match_id: MatchId,
    pub percent: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_home: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matchday: Option<i64>,

    pub created_at: i64,
    pub updated_at: i64,
}

impl MatchRecord {
    pub fn key(user_id: &str, match_id: &str) -> DocumentId {
        format!("{}/{}", user_id, match_id)
    }

    pub fn placeholder(user_id: &str, match_id: &str, now_millis: i64) -> Self {
        Self {
            key: MatchRecord::key(user_id, match_id),
            user_id: user_id.to_string(),
            match_id: match_id.to_string(),
            percent: 0.0,
            utc_date: None,
            home_team: None,
            away_team: None,
            opponent: None,
            is_home: None,
            matchday: None,
            created_at: now_millis,
            updated_at: now_millis,
        }
    }

    /// Copies the fixture fields, leaving `percent` untouched.
    pub fn set_details(&mut self, tracked: &TrackedMatch, now_millis: i64) {
        self.utc_date = Some(tracked.utc_date.clone());
        self.home_team = Some(tracked.home_team.clone());
        self.away_team = Some(tracked.away_team.clone());
        self.opponent = Some(tracked.opponent.clone());
        self.is_home = Some(tracked.is_home);
        self.matchday = Some(tracked.matchday);
        self.updated_at = now_millis;
    }

    pub fn kickoff(&self) -> Option<DateTime<Utc>> {
        self.utc_date
            .as_deref()
            .and_then(DateTimeUtils::parse_utc)
    }
}

impl Identifiable for MatchRecord {
    fn as_id(&self) -> &str {
        &self.key
    }
}
