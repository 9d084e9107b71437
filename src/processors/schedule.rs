use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_derive::Serialize;

use crate::{
    data_types::fixture::{Fixture, MatchStatus, TrackedMatch},
    database::{DrillStore, PreferencesStore},
    error::{Error, Result},
    logvbln, logwarn,
    processors::matcher::track_fixtures,
    session::Session,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleFilter {
    #[default]
    All,
    Home,
    Away,
}

impl ScheduleFilter {
    pub fn accepts(self, tracked: &TrackedMatch) -> bool {
        match self {
            ScheduleFilter::All => true,
            ScheduleFilter::Home => tracked.is_home,
            ScheduleFilter::Away => !tracked.is_home,
        }
    }
}

impl FromStr for ScheduleFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(ScheduleFilter::All),
            "home" => Ok(ScheduleFilter::Home),
            "away" => Ok(ScheduleFilter::Away),
            other => Err(Error::invalid(format!("unknown schedule filter '{}'", other))),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMatch {
    #[serde(flatten)]
    pub tracked: TrackedMatch,
    pub progress: f64,
    pub days_left: i64,
    pub status: Option<MatchStatus>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub favorite_team: String,
    pub upcoming: Vec<ScheduledMatch>,
    pub completed: Vec<ScheduledMatch>,
    /// Mean progress over upcoming matches, 0 without any.
    pub average_progress: f64,
}

pub struct SchedulePlanner<'a> {
    drills: &'a dyn DrillStore,
    preferences: &'a dyn PreferencesStore,
}

impl<'a> SchedulePlanner<'a> {
    const CC: &'static str = "Schedule";

    pub fn new(drills: &'a dyn DrillStore, preferences: &'a dyn PreferencesStore) -> Self {
        Self {
            drills,
            preferences,
        }
    }

    /// The favorite team of the session user, or `PreferencesMissing`.
    pub async fn favorite_team(&self, session: &Session) -> Result<String> {
        match self.preferences.get_preferences(session.user_id()).await? {
            Some(preferences) if preferences.has_favorite_team() => Ok(preferences.favorite_team),
            _ => Err(Error::PreferencesMissing),
        }
    }

    /// Builds the view for `favorite_team`, as returned by [`Self::favorite_team`].
    pub async fn plan(
        &self,
        session: &Session,
        favorite_team: String,
        fixtures: &[Fixture],
        filter: ScheduleFilter,
        now: DateTime<Utc>,
    ) -> ScheduleView {
        let mut tracked = track_fixtures(fixtures, &favorite_team);
        tracked.sort_by(|a, b| {
            let (ka, kb) = (a.kickoff(), b.kickoff());
            (ka.is_none(), ka, &a.utc_date).cmp(&(kb.is_none(), kb, &b.utc_date))
        });
        logvbln!(
            "{} of {} fixtures involve {}",
            tracked.len(),
            fixtures.len(),
            favorite_team
        );

        let mut view = ScheduleView {
            favorite_team,
            ..Default::default()
        };

        for tracked in tracked.into_iter().filter(|t| filter.accepts(t)) {
            let progress = self.progress_of(session, &tracked).await;
            let scheduled = ScheduledMatch {
                progress,
                days_left: tracked.days_left(now),
                status: tracked.status(now),
                tracked,
            };

            if scheduled.days_left > 0 {
                view.upcoming.push(scheduled);
            } else {
                view.completed.push(scheduled);
            }
        }

        if !view.upcoming.is_empty() {
            view.average_progress = view.upcoming.iter().map(|m| m.progress).sum::<f64>()
                / view.upcoming.len() as f64;
        }

        view
    }

    // A failed lookup shows the match at 0% rather than failing the whole schedule.
    async fn progress_of(&self, session: &Session, tracked: &TrackedMatch) -> f64 {
        match self
            .drills
            .get_match_record(session.user_id(), &tracked.id)
            .await
        {
            Ok(Some(record)) => {
                if record.utc_date.is_none() {
                    if let Err(err) = self
                        .drills
                        .store_match_details(session.user_id(), tracked)
                        .await
                    {
                        logwarn!("unable to store details of {}: {}", tracked.id, err);
                    }
                }
                record.percent
            }
            Ok(None) => 0.0,
            Err(err) => {
                logwarn!("unable to read progress of {}: {}", tracked.id, err);
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{database::memory::MemoryStore, util::DateTimeUtils};

    fn fixture(utc_date: &str, home_team: &str, away_team: &str) -> Fixture {
        Fixture {
            utc_date: utc_date.into(),
            home_team: home_team.into(),
            away_team: away_team.into(),
            matchday: 1,
        }
    }

    #[test]
    fn filter_from_query_string() {
        assert_eq!("home".parse::<ScheduleFilter>().unwrap(), ScheduleFilter::Home);
        assert_eq!("AWAY".parse::<ScheduleFilter>().unwrap(), ScheduleFilter::Away);
        assert_eq!("all".parse::<ScheduleFilter>().unwrap(), ScheduleFilter::All);
        assert!("neutral".parse::<ScheduleFilter>().is_err());
    }

    #[tokio::test]
    async fn plan_uses_the_team_it_is_given() {
        // No preferences stored: the caller already resolved the team.
        let store = MemoryStore::new();
        let planner = SchedulePlanner::new(&store, &store);
        let session = Session::new("u1").unwrap();
        let now = DateTimeUtils::parse_utc("2024-06-15T12:00:00Z").unwrap();

        let fixtures = [
            fixture("2024-06-20T19:00:00Z", "Chelsea", "Arsenal FC"),
            fixture("2024-05-01T19:00:00Z", "Arsenal FC", "Spurs"),
            fixture("2024-06-21T19:00:00Z", "Everton", "Spurs"),
            fixture("not a date", "Arsenal", "Fulham"),
        ];
        let view = planner
            .plan(&session, "Arsenal".into(), &fixtures, ScheduleFilter::All, now)
            .await;

        assert_eq!(view.favorite_team, "Arsenal");
        assert_eq!(view.upcoming.len(), 1);
        assert_eq!(view.upcoming[0].days_left, 6);
        assert_eq!(view.upcoming[0].tracked.opponent, "Chelsea");
        assert_eq!(view.completed.len(), 2);
        // Unparsable dates sort last.
        assert_eq!(view.completed[1].tracked.utc_date, "not a date");
        assert!(matches!(
            planner.favorite_team(&session).await,
            Err(Error::PreferencesMissing)
        ));
    }
}
