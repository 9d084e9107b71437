use async_trait::async_trait;
use ::mongodb::bson::oid::ObjectId;

use crate::{
    data_types::{
        common::DrillId,
        drill::{Drill, DrillUpdate, NewDrill},
        fixture::{MatchRecord, TrackedMatch},
        preferences::UserPreferences,
    },
    error::Result,
    processors::progress::Percent,
};

pub mod fitzone_db;
pub mod memory;
pub mod mongodb;

/// Drills and per-user match records. Every call is atomic for a single document;
/// nothing spans documents.
#[async_trait]
pub trait DrillStore: Send + Sync {
    /// Drills of a match, oldest first.
    async fn list(&self, user_id: &str, match_id: &str) -> Result<Vec<Drill>>;

    async fn get(&self, user_id: &str, match_id: &str, drill_id: &str) -> Result<Option<Drill>>;

    async fn create(&self, user_id: &str, match_id: &str, drill: &NewDrill) -> Result<DrillId>;

    /// Sets the present fields only. `NotFound` when the drill does not exist.
    async fn update(
        &self,
        user_id: &str,
        match_id: &str,
        drill_id: &str,
        fields: &DrillUpdate,
    ) -> Result<()>;

    /// `NotFound` when the drill does not exist.
    async fn delete(&self, user_id: &str, match_id: &str, drill_id: &str) -> Result<()>;

    /// Creates a zero-percent record when absent, otherwise does nothing.
    async fn ensure_match_record_exists(&self, user_id: &str, match_id: &str) -> Result<()>;

    async fn get_match_record(&self, user_id: &str, match_id: &str)
        -> Result<Option<MatchRecord>>;

    /// Records of a user ordered by kickoff.
    async fn list_match_records(&self, user_id: &str) -> Result<Vec<MatchRecord>>;

    /// Writes the denormalized fixture fields, creating the record when needed.
    async fn store_match_details(&self, user_id: &str, tracked: &TrackedMatch) -> Result<()>;

    /// `NotFound` when the record does not exist.
    async fn store_percent(&self, user_id: &str, match_id: &str, percent: Percent) -> Result<()>;

    /// Removes the record and its drills. Returns whether a record was removed.
    async fn delete_match_record(&self, user_id: &str, match_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait PreferencesStore: Send + Sync {
    async fn get_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>>;

    /// Creates or replaces the whole record.
    async fn put_preferences(&self, preferences: &UserPreferences) -> Result<()>;

    async fn delete_preferences(&self, user_id: &str) -> Result<bool>;
}

pub(crate) fn new_drill_id() -> DrillId {
    format!("drill_{}", ObjectId::new().to_hex())
}
