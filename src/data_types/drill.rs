use std::collections::BTreeMap;

use serde_derive::{Deserialize, Serialize};

use crate::{
    data_types::common::{DrillId, Identifiable, MatchId, UserId},
    error::{Error, Result},
};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Drill {
    #[serde(rename = "_id")]
    pub id: DrillId,
    pub user_id: UserId,
    pub match_id: MatchId,

    pub r#type: String,
    pub target_reps: i64,
    pub completed_reps: i64,

    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub estimated_time: String,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Drill {
    pub fn from_new(
        id: DrillId,
        user_id: &str,
        match_id: &str,
        new_drill: &NewDrill,
        now_millis: i64,
    ) -> Self {
        Self {
            id,
            user_id: user_id.to_string(),
            match_id: match_id.to_string(),
            r#type: new_drill.r#type.clone(),
            target_reps: new_drill.target_reps,
            completed_reps: 0,
            category: new_drill.category.clone(),
            emoji: new_drill.emoji.clone(),
            estimated_time: new_drill.estimated_time.clone(),
            created_at: now_millis,
            updated_at: now_millis,
        }
    }

    /// Share of the target done, capped at 1.
    pub fn completion(&self) -> f64 {
        if self.target_reps <= 0 {
            return 0.0;
        }

        (self.completed_reps as f64 / self.target_reps as f64).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.completed_reps >= self.target_reps
    }

    pub fn apply(&mut self, update: &DrillUpdate, now_millis: i64) {
        if let Some(r#type) = &update.r#type {
            self.r#type = r#type.clone();
        }
        if let Some(target_reps) = update.target_reps {
            self.target_reps = target_reps;
        }
        if let Some(completed_reps) = update.completed_reps {
            self.completed_reps = completed_reps;
        }
        if let Some(category) = &update.category {
            self.category = category.clone();
        }
        if let Some(emoji) = &update.emoji {
            self.emoji = emoji.clone();
        }
        if let Some(estimated_time) = &update.estimated_time {
            self.estimated_time = estimated_time.clone();
        }
        self.updated_at = now_millis;
    }
}

impl Identifiable for Drill {
    fn as_id(&self) -> &str {
        &self.id
    }
}

pub fn clamp_reps(reps: i64, target_reps: i64) -> i64 {
    reps.clamp(0, target_reps.max(0))
}

/// Fields supplied by the user when adding a drill. Completion always starts at zero.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewDrill {
    pub r#type: String,
    pub target_reps: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub estimated_time: String,
}

impl NewDrill {
    pub fn validate(&self) -> Result<()> {
        if self.r#type.trim().is_empty() {
            return Err(Error::invalid("drill type must not be empty"));
        }
        if self.target_reps < 1 {
            return Err(Error::invalid(format!(
                "targetReps must be at least 1, got {}",
                self.target_reps
            )));
        }

        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrillUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_reps: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_reps: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
}

impl DrillUpdate {
    pub fn completed_reps(completed_reps: i64) -> Self {
        Self {
            completed_reps: Some(completed_reps),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == DrillUpdate::default()
    }

    /// Validates against the stored drill and returns the update to persist, with
    /// `completedReps` clamped to `[0, targetReps]`.
    pub fn resolve(&self, current: &Drill) -> Result<DrillUpdate> {
        let mut resolved = self.clone();

        if let Some(r#type) = &self.r#type {
            if r#type.trim().is_empty() {
                return Err(Error::invalid("drill type must not be empty"));
            }
        }

        let target_reps = self.target_reps.unwrap_or(current.target_reps);
        if target_reps < 1 {
            return Err(Error::invalid(format!(
                "targetReps must be at least 1, got {}",
                target_reps
            )));
        }

        let completed_reps = self.completed_reps.unwrap_or(current.completed_reps);
        let clamped = clamp_reps(completed_reps, target_reps);
        if self.completed_reps.is_some() || clamped != current.completed_reps {
            resolved.completed_reps = Some(clamped);
        }

        Ok(resolved)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrillStats {
    pub total_drills: usize,
    pub completed_drills: usize,
    pub total_target_reps: i64,
    pub total_completed_reps: i64,
    /// Completed drills over all drills, in percent.
    pub completion_rate: f64,
    pub drill_types: BTreeMap<String, usize>,
}

pub struct DrillTemplate {
    pub r#type: &'static str,
    pub target_reps: i64,
    pub category: &'static str,
    pub emoji: &'static str,
    pub estimated_time: &'static str,
}

impl DrillTemplate {
    pub fn to_new_drill(&self) -> NewDrill {
        NewDrill {
            r#type: self.r#type.to_string(),
            target_reps: self.target_reps,
            category: self.category.to_string(),
            emoji: self.emoji.to_string(),
            estimated_time: self.estimated_time.to_string(),
        }
    }
}

pub const DEFAULT_TRAINING: [DrillTemplate; 4] = [
    DrillTemplate {
        r#type: "Push-ups",
        target_reps: 50,
        category: "Strength",
        emoji: "💪",
        estimated_time: "5 min",
    },
    DrillTemplate {
        r#type: "Soccer Drills",
        target_reps: 20,
        category: "Cardio",
        emoji: "⚽",
        estimated_time: "12 min",
    },
    DrillTemplate {
        r#type: "Squats",
        target_reps: 30,
        category: "Strength",
        emoji: "🏋️",
        estimated_time: "8 min",
    },
    DrillTemplate {
        r#type: "Running",
        target_reps: 5,
        category: "Cardio",
        emoji: "🏃",
        estimated_time: "20 min",
    },
];

pub const CUSTOM_DRILL: DrillTemplate = DrillTemplate {
    r#type: "New Workout",
    target_reps: 10,
    category: "Custom",
    emoji: "🎯",
    estimated_time: "-- min",
};

#[cfg(test)]
mod tests {
    use super::*;

    fn drill(target_reps: i64, completed_reps: i64) -> Drill {
        let mut drill = Drill::from_new(
            "d1".into(),
            "u1",
            "m1",
            &NewDrill {
                r#type: "Squats".into(),
                target_reps,
                category: String::new(),
                emoji: String::new(),
                estimated_time: String::new(),
            },
            0,
        );
        drill.completed_reps = completed_reps;
        drill
    }

    #[test]
    fn zero_target_is_rejected() {
        let mut new_drill = CUSTOM_DRILL.to_new_drill();
        new_drill.target_reps = 0;
        assert!(matches!(new_drill.validate(), Err(Error::InvalidInput(_))));

        let update = DrillUpdate {
            target_reps: Some(0),
            ..Default::default()
        };
        assert!(update.resolve(&drill(10, 3)).is_err());
    }

    #[test]
    fn completed_reps_are_clamped() {
        let current = drill(10, 3);

        let resolved = DrillUpdate::completed_reps(14).resolve(&current).unwrap();
        assert_eq!(resolved.completed_reps, Some(10));

        let resolved = DrillUpdate::completed_reps(-2).resolve(&current).unwrap();
        assert_eq!(resolved.completed_reps, Some(0));
    }

    #[test]
    fn lowering_target_clamps_existing_completion() {
        let update = DrillUpdate {
            target_reps: Some(4),
            ..Default::default()
        };

        let resolved = update.resolve(&drill(10, 8)).unwrap();
        assert_eq!(resolved.target_reps, Some(4));
        assert_eq!(resolved.completed_reps, Some(4));

        let resolved = update.resolve(&drill(10, 2)).unwrap();
        assert_eq!(resolved.completed_reps, None);
    }

    #[test]
    fn completion_caps_at_one() {
        assert_eq!(drill(4, 4).completion(), 1.0);
        assert_eq!(drill(4, 9).completion(), 1.0);
        assert_eq!(drill(10, 5).completion(), 0.5);
    }

    #[test]
    fn templates_are_valid_drills() {
        for template in DEFAULT_TRAINING.iter().chain(std::iter::once(&CUSTOM_DRILL)) {
            assert!(template.to_new_drill().validate().is_ok());
        }
    }
}
