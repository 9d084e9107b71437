use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex, MutexGuard,
    },
};

use async_trait::async_trait;

use crate::{
    data_types::{
        common::{DocumentId, DrillId, Identifiable, UserId},
        drill::{Drill, DrillUpdate, NewDrill},
        fixture::{MatchRecord, TrackedMatch},
        preferences::UserPreferences,
    },
    error::{Error, Result},
    processors::progress::Percent,
    util::DateTimeUtils,
};

use super::{new_drill_id, DrillStore, PreferencesStore};

/// Process-local store with the same contract as [`super::fitzone_db::FitzoneDB`].
/// Writes can be switched off to exercise failure paths.
pub struct MemoryStore {
    preferences: Mutex<HashMap<UserId, UserPreferences>>,
    matches: Mutex<HashMap<DocumentId, MatchRecord>>,
    drills: Mutex<Vec<Drill>>,
    fail_writes: AtomicBool,
    creates_left: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| Error::Unavailable("memory store lock poisoned".to_string()))
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            preferences: Default::default(),
            matches: Default::default(),
            drills: Default::default(),
            fail_writes: AtomicBool::new(false),
            creates_left: AtomicUsize::new(usize::MAX),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Lets `creates` more drills through, then fails every create. Other writes keep working.
    pub fn fail_creates_after(&self, creates: usize) {
        self.creates_left.store(creates, Ordering::SeqCst);
    }

    fn take_create(&self) -> Result<()> {
        self.creates_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .map(|_| ())
            .map_err(|_| Error::Unavailable("drill creation is disabled".to_string()))
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Unavailable("writes are disabled".to_string()));
        }

        Ok(())
    }

    fn is_drill(drill: &Drill, user_id: &str, match_id: &str, drill_id: &str) -> bool {
        drill.as_id() == drill_id && drill.user_id == user_id && drill.match_id == match_id
    }
}

#[async_trait]
impl DrillStore for MemoryStore {
    async fn list(&self, user_id: &str, match_id: &str) -> Result<Vec<Drill>> {
        let mut drills: Vec<Drill> = lock(&self.drills)?
            .iter()
            .filter(|drill| drill.user_id == user_id && drill.match_id == match_id)
            .cloned()
            .collect();

        drills.sort_by_key(|drill| drill.created_at);

        Ok(drills)
    }

    async fn get(&self, user_id: &str, match_id: &str, drill_id: &str) -> Result<Option<Drill>> {
        Ok(lock(&self.drills)?
            .iter()
            .find(|drill| MemoryStore::is_drill(drill, user_id, match_id, drill_id))
            .cloned())
    }

    async fn create(&self, user_id: &str, match_id: &str, drill: &NewDrill) -> Result<DrillId> {
        self.check_writable()?;
        self.take_create()?;

        let drill = Drill::from_new(
            new_drill_id(),
            user_id,
            match_id,
            drill,
            DateTimeUtils::now_millis(),
        );
        let id = drill.id.clone();
        lock(&self.drills)?.push(drill);

        Ok(id)
    }

    async fn update(
        &self,
        user_id: &str,
        match_id: &str,
        drill_id: &str,
        fields: &DrillUpdate,
    ) -> Result<()> {
        self.check_writable()?;

        let mut drills = lock(&self.drills)?;
        let drill = drills
            .iter_mut()
            .find(|drill| MemoryStore::is_drill(drill, user_id, match_id, drill_id))
            .ok_or_else(|| Error::not_found(format!("drill {}", drill_id)))?;

        drill.apply(fields, DateTimeUtils::now_millis());

        Ok(())
    }

    async fn delete(&self, user_id: &str, match_id: &str, drill_id: &str) -> Result<()> {
        self.check_writable()?;

        let mut drills = lock(&self.drills)?;
        let before = drills.len();
        drills.retain(|drill| !MemoryStore::is_drill(drill, user_id, match_id, drill_id));

        if drills.len() == before {
            return Err(Error::not_found(format!("drill {}", drill_id)));
        }

        Ok(())
    }

    async fn ensure_match_record_exists(&self, user_id: &str, match_id: &str) -> Result<()> {
        let key = MatchRecord::key(user_id, match_id);
        let mut matches = lock(&self.matches)?;

        if !matches.contains_key(&key) {
            self.check_writable()?;
            matches.insert(
                key,
                MatchRecord::placeholder(user_id, match_id, DateTimeUtils::now_millis()),
            );
        }

        Ok(())
    }

    async fn get_match_record(
        &self,
        user_id: &str,
        match_id: &str,
    ) -> Result<Option<MatchRecord>> {
        Ok(lock(&self.matches)?
            .get(&MatchRecord::key(user_id, match_id))
            .cloned())
    }

    async fn list_match_records(&self, user_id: &str) -> Result<Vec<MatchRecord>> {
        let mut records: Vec<MatchRecord> = lock(&self.matches)?
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();

        records.sort_by(|a, b| (&a.utc_date, &a.key).cmp(&(&b.utc_date, &b.key)));

        Ok(records)
    }

    async fn store_match_details(&self, user_id: &str, tracked: &TrackedMatch) -> Result<()> {
        self.check_writable()?;

        let now = DateTimeUtils::now_millis();
        lock(&self.matches)?
            .entry(MatchRecord::key(user_id, &tracked.id))
            .or_insert_with(|| MatchRecord::placeholder(user_id, &tracked.id, now))
            .set_details(tracked, now);

        Ok(())
    }

    async fn store_percent(&self, user_id: &str, match_id: &str, percent: Percent) -> Result<()> {
        self.check_writable()?;

        let mut matches = lock(&self.matches)?;
        let record = matches
            .get_mut(&MatchRecord::key(user_id, match_id))
            .ok_or_else(|| Error::not_found(format!("match {}", match_id)))?;

        record.percent = percent.value();
        record.updated_at = DateTimeUtils::now_millis();

        Ok(())
    }

    async fn delete_match_record(&self, user_id: &str, match_id: &str) -> Result<bool> {
        self.check_writable()?;

        lock(&self.drills)?
            .retain(|drill| !(drill.user_id == user_id && drill.match_id == match_id));

        Ok(lock(&self.matches)?
            .remove(&MatchRecord::key(user_id, match_id))
            .is_some())
    }
}

#[async_trait]
impl PreferencesStore for MemoryStore {
    async fn get_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        Ok(lock(&self.preferences)?.get(user_id).cloned())
    }

    async fn put_preferences(&self, preferences: &UserPreferences) -> Result<()> {
        self.check_writable()?;

        lock(&self.preferences)?.insert(preferences.as_id().to_string(), preferences.clone());

        Ok(())
    }

    async fn delete_preferences(&self, user_id: &str) -> Result<bool> {
        self.check_writable()?;

        Ok(lock(&self.preferences)?.remove(user_id).is_some())
    }
}
