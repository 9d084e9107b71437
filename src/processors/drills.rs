use serde_derive::Serialize;

use crate::{
    data_types::{
        common::DrillId,
        drill::{clamp_reps, Drill, DrillUpdate, NewDrill, DEFAULT_TRAINING},
    },
    database::DrillStore,
    error::{Error, Result},
    logln, logvbln, logwarn,
    processors::progress::ProgressAggregator,
    session::Session,
};

/// Outcome of a drill mutation. `percent` is the freshly persisted aggregate and the only
/// value callers should display.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrillChange {
    pub drill_id: DrillId,
    pub percent: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTraining {
    pub drill_ids: Vec<DrillId>,
    pub percent: f64,
}

/// Drill lifecycle for one match. Every mutation ends with a full progress recompute.
pub struct DrillService<'a> {
    store: &'a dyn DrillStore,
}

impl<'a> DrillService<'a> {
    const CC: &'static str = "Drills";

    pub fn new(store: &'a dyn DrillStore) -> Self {
        Self { store }
    }

    fn aggregator(&self) -> ProgressAggregator<'a> {
        ProgressAggregator::new(self.store)
    }

    pub async fn list(&self, session: &Session, match_id: &str) -> Result<Vec<Drill>> {
        self.store.list(session.user_id(), match_id).await
    }

    async fn get(&self, session: &Session, match_id: &str, drill_id: &str) -> Result<Drill> {
        self.store
            .get(session.user_id(), match_id, drill_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("drill {}", drill_id)))
    }

    pub async fn add(
        &self,
        session: &Session,
        match_id: &str,
        new_drill: &NewDrill,
    ) -> Result<DrillChange> {
        new_drill.validate()?;

        // The match record has to exist before any drill is written under it.
        self.store
            .ensure_match_record_exists(session.user_id(), match_id)
            .await?;

        let drill_id = self
            .store
            .create(session.user_id(), match_id, new_drill)
            .await?;
        logln!("added {} '{}' to {}", drill_id, new_drill.r#type, match_id);

        let percent = self.aggregator().recompute(session.user_id(), match_id).await?;

        Ok(DrillChange { drill_id, percent })
    }

    pub async fn update(
        &self,
        session: &Session,
        match_id: &str,
        drill_id: &str,
        update: &DrillUpdate,
    ) -> Result<DrillChange> {
        let current = self.get(session, match_id, drill_id).await?;
        let resolved = update.resolve(&current)?;

        if !resolved.is_empty() {
            self.store
                .update(session.user_id(), match_id, drill_id, &resolved)
                .await?;
            logvbln!("updated {} with {:?}", drill_id, resolved);
        }

        let percent = self.aggregator().recompute(session.user_id(), match_id).await?;

        Ok(DrillChange {
            drill_id: drill_id.to_string(),
            percent,
        })
    }

    /// Increment or decrement, clamped to `[0, targetReps]`.
    pub async fn adjust_reps(
        &self,
        session: &Session,
        match_id: &str,
        drill_id: &str,
        delta: i64,
    ) -> Result<DrillChange> {
        let current = self.get(session, match_id, drill_id).await?;
        let completed_reps = clamp_reps(
            current.completed_reps.saturating_add(delta),
            current.target_reps,
        );

        self.update(
            session,
            match_id,
            drill_id,
            &DrillUpdate::completed_reps(completed_reps),
        )
        .await
    }

    pub async fn delete(
        &self,
        session: &Session,
        match_id: &str,
        drill_id: &str,
    ) -> Result<DrillChange> {
        self.store
            .delete(session.user_id(), match_id, drill_id)
            .await?;
        logln!("deleted {} from {}", drill_id, match_id);

        let percent = self.aggregator().recompute(session.user_id(), match_id).await?;

        Ok(DrillChange {
            drill_id: drill_id.to_string(),
            percent,
        })
    }

    /// Adds the default training set, then recomputes once over the full list. A failed
    /// create still recomputes over the drills that were written before returning the error.
    pub async fn generate_training(
        &self,
        session: &Session,
        match_id: &str,
    ) -> Result<GeneratedTraining> {
        self.store
            .ensure_match_record_exists(session.user_id(), match_id)
            .await?;

        let mut drill_ids = Vec::with_capacity(DEFAULT_TRAINING.len());
        for template in DEFAULT_TRAINING.iter() {
            match self
                .store
                .create(session.user_id(), match_id, &template.to_new_drill())
                .await
            {
                Ok(drill_id) => drill_ids.push(drill_id),
                Err(err) => {
                    // Drills created so far stay, so the stored percent has to follow them.
                    logwarn!(
                        "generation for {} stopped after {} drills: {}",
                        match_id,
                        drill_ids.len(),
                        err
                    );
                    if let Err(recompute_err) =
                        self.aggregator().recompute(session.user_id(), match_id).await
                    {
                        logwarn!("unable to recompute {}: {}", match_id, recompute_err);
                    }
                    return Err(err);
                }
            }
        }
        logln!("generated {} drills for {}", drill_ids.len(), match_id);

        let percent = self.aggregator().recompute(session.user_id(), match_id).await?;

        Ok(GeneratedTraining { drill_ids, percent })
    }

    /// Last persisted percent; 0 for a match without a record.
    pub async fn progress(&self, session: &Session, match_id: &str) -> Result<f64> {
        Ok(self
            .store
            .get_match_record(session.user_id(), match_id)
            .await?
            .map(|record| record.percent)
            .unwrap_or(0.0))
    }
}
