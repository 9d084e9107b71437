use crate::{
    data_types::drill::Drill,
    database::DrillStore,
    error::Result,
    logvbln,
};

/// Completion of a match in `[0, 100]`. Only this module can build one, so stored
/// percentages always come from [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percent(f64);

impl Percent {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Mean of per-drill completion, each capped at 100%. No drills means 0.
pub fn aggregate(drills: &[Drill]) -> Percent {
    if drills.is_empty() {
        return Percent(0.0);
    }

    let total: f64 = drills.iter().map(Drill::completion).sum();

    Percent((total / drills.len() as f64 * 100.0).clamp(0.0, 100.0))
}

pub struct ProgressAggregator<'a> {
    store: &'a dyn DrillStore,
}

impl<'a> ProgressAggregator<'a> {
    const CC: &'static str = "Progress";

    pub fn new(store: &'a dyn DrillStore) -> Self {
        Self { store }
    }

    /// Recomputes from the full drill list and persists before returning. On a failed
    /// write the stored value stays as it was and the error is returned.
    pub async fn recompute(&self, user_id: &str, match_id: &str) -> Result<f64> {
        let drills = self.store.list(user_id, match_id).await?;
        let percent = aggregate(&drills);

        self.store.ensure_match_record_exists(user_id, match_id).await?;
        self.store.store_percent(user_id, match_id, percent).await?;

        logvbln!(
            "match {} at {:.1}% over {} drills",
            match_id,
            percent.value(),
            drills.len()
        );

        Ok(percent.value())
    }
}
