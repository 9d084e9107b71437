use chrono::{DateTime, Duration, Utc};

use crate::{
    data_types::fixture::{MatchRecord, MatchStatus},
    database::DrillStore,
    error::{Error, Result},
    logln,
    session::Session,
    util::DateTimeUtils,
};

/// Removes finished matches, with their drills, once they are older than a cutoff.
/// Only runs when asked to.
pub struct MatchCleanup<'a> {
    store: &'a dyn DrillStore,
}

impl<'a> MatchCleanup<'a> {
    const CC: &'static str = "Cleanup";

    pub fn new(store: &'a dyn DrillStore) -> Self {
        Self { store }
    }

    pub fn is_stale(record: &MatchRecord, cutoff: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match record.kickoff() {
            Some(kickoff) => {
                kickoff < cutoff
                    && DateTimeUtils::match_status(kickoff, now) == MatchStatus::Finished
            }
            // Placeholders without a kickoff are never removed.
            None => false,
        }
    }

    /// Returns the number of match records deleted.
    pub async fn cleanup_old_matches(
        &self,
        session: &Session,
        days_old: i64,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        if days_old < 0 {
            return Err(Error::invalid(format!("days must not be negative, got {}", days_old)));
        }

        let cutoff = Duration::try_days(days_old)
            .and_then(|age| now.checked_sub_signed(age))
            .ok_or_else(|| Error::invalid(format!("{} days is out of range", days_old)))?;
        let records = self.store.list_match_records(session.user_id()).await?;

        let mut deleted = 0;
        for record in records
            .iter()
            .filter(|record| MatchCleanup::is_stale(record, cutoff, now))
        {
            if self
                .store
                .delete_match_record(session.user_id(), &record.match_id)
                .await?
            {
                deleted += 1;
            }
        }

        logln!(
            "removed {} matches of {} older than {} days",
            deleted,
            session.user_id(),
            days_old
        );

        Ok(deleted)
    }
}
