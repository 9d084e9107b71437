use std::sync::Arc;

use chrono::Utc;

use data_types::{
    drill::{Drill, DrillStats, DrillUpdate, NewDrill},
    fixture::{MatchRecord, TrackedMatch},
    preferences::{PreferencesUpdate, UserPreferences},
};
use database::{fitzone_db::FitzoneDB, memory::MemoryStore, DrillStore, PreferencesStore};
use feed::{ScheduleFeed, ScheduleSource};
use maintenance::cleanup::MatchCleanup;
use processors::{
    drills::{DrillChange, DrillService, GeneratedTraining},
    matcher::track_fixtures,
    preferences::PreferencesService,
    schedule::{ScheduleFilter, SchedulePlanner, ScheduleView},
    statistics::drill_stats,
};
use util::config::{Backend, Config};

pub use error::{Error, FeedError, Result};
pub use session::Session;

pub mod data_types;
pub mod database;
pub mod error;
pub mod feed;
pub mod maintenance;
pub mod processors;
pub mod server;
pub mod session;
pub mod util;

pub struct App {
    drills: Arc<dyn DrillStore>,
    preferences: Arc<dyn PreferencesStore>,
    feed: ScheduleFeed,
    cleanup_after_days: i64,
}

impl App {
    const CC: &'static str = "App";

    pub async fn from_config(config: &Config) -> Result<Self> {
        let feed = ScheduleFeed::new(ScheduleSource::parse(&config.schedule.source));

        let app = match config.database.backend {
            Backend::Mongodb => {
                let db = Arc::new(
                    FitzoneDB::new(&config.database.uri, &config.database.name).await?,
                );
                App::with_store(db, feed)
            }
            Backend::Memory => {
                logwarn!("using the in-memory store, nothing will be persisted");
                App::with_store(Arc::new(MemoryStore::new()), feed)
            }
        };

        Ok(app.with_cleanup_after_days(config.maintenance.cleanup_after_days))
    }

    pub fn with_store<S>(store: Arc<S>, feed: ScheduleFeed) -> Self
    where
        S: DrillStore + PreferencesStore + 'static,
    {
        Self {
            drills: store.clone(),
            preferences: store,
            feed,
            cleanup_after_days: 30,
        }
    }

    pub fn with_cleanup_after_days(mut self, days: i64) -> Self {
        self.cleanup_after_days = days;
        self
    }

    fn drill_service(&self) -> DrillService<'_> {
        DrillService::new(self.drills.as_ref())
    }

    fn preferences_service(&self) -> PreferencesService<'_> {
        PreferencesService::new(self.preferences.as_ref())
    }

    fn planner(&self) -> SchedulePlanner<'_> {
        SchedulePlanner::new(self.drills.as_ref(), self.preferences.as_ref())
    }

    // ===== Schedule =====

    pub async fn schedule(&self, session: &Session, filter: ScheduleFilter) -> Result<ScheduleView> {
        let planner = self.planner();

        // Preferences first: without a team there is nothing to fetch the feed for.
        let favorite_team = planner.favorite_team(session).await?;
        let fixtures = self.feed.fetch().await?;

        Ok(planner
            .plan(session, favorite_team, &fixtures, filter, Utc::now())
            .await)
    }

    pub async fn tracked_matches(&self, session: &Session) -> Result<Vec<TrackedMatch>> {
        let favorite_team = self.planner().favorite_team(session).await?;
        let fixtures = self.feed.fetch().await?;

        Ok(track_fixtures(&fixtures, &favorite_team))
    }

    pub async fn match_records(&self, session: &Session) -> Result<Vec<MatchRecord>> {
        self.drills.list_match_records(session.user_id()).await
    }

    // ===== Drills =====

    pub async fn list_drills(&self, session: &Session, match_id: &str) -> Result<Vec<Drill>> {
        self.drill_service().list(session, match_id).await
    }

    pub async fn add_drill(
        &self,
        session: &Session,
        match_id: &str,
        new_drill: &NewDrill,
    ) -> Result<DrillChange> {
        self.drill_service().add(session, match_id, new_drill).await
    }

    pub async fn update_drill(
        &self,
        session: &Session,
        match_id: &str,
        drill_id: &str,
        update: &DrillUpdate,
    ) -> Result<DrillChange> {
        self.drill_service()
            .update(session, match_id, drill_id, update)
            .await
    }

    pub async fn adjust_reps(
        &self,
        session: &Session,
        match_id: &str,
        drill_id: &str,
        delta: i64,
    ) -> Result<DrillChange> {
        self.drill_service()
            .adjust_reps(session, match_id, drill_id, delta)
            .await
    }

    pub async fn delete_drill(
        &self,
        session: &Session,
        match_id: &str,
        drill_id: &str,
    ) -> Result<DrillChange> {
        self.drill_service().delete(session, match_id, drill_id).await
    }

    pub async fn generate_training(
        &self,
        session: &Session,
        match_id: &str,
    ) -> Result<GeneratedTraining> {
        self.drill_service().generate_training(session, match_id).await
    }

    pub async fn match_progress(&self, session: &Session, match_id: &str) -> Result<f64> {
        self.drill_service().progress(session, match_id).await
    }

    pub async fn match_stats(&self, session: &Session, match_id: &str) -> Result<DrillStats> {
        Ok(drill_stats(&self.list_drills(session, match_id).await?))
    }

    // ===== Preferences =====

    pub async fn preferences(&self, session: &Session) -> Result<Option<UserPreferences>> {
        self.preferences_service().get(session).await
    }

    pub async fn has_preferences(&self, session: &Session) -> Result<bool> {
        self.preferences_service().has_preferences(session).await
    }

    pub async fn save_preferences(
        &self,
        session: &Session,
        league: &str,
        team: &str,
    ) -> Result<UserPreferences> {
        self.preferences_service().save(session, league, team).await
    }

    pub async fn update_preferences(
        &self,
        session: &Session,
        update: &PreferencesUpdate,
    ) -> Result<UserPreferences> {
        self.preferences_service().update(session, update).await
    }

    pub async fn delete_preferences(&self, session: &Session) -> Result<bool> {
        self.preferences_service().delete(session).await
    }

    // ===== Maintenance =====

    pub async fn cleanup_old_matches(&self, session: &Session, days_old: Option<i64>) -> Result<usize> {
        MatchCleanup::new(self.drills.as_ref())
            .cleanup_old_matches(
                session,
                days_old.unwrap_or(self.cleanup_after_days),
                Utc::now(),
            )
            .await
    }
}
