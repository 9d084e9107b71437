use crate::{
    data_types::fixture::{Fixture, TrackedMatch},
    processors::{fixture_id::fixture_match_id, team_names::teams_match},
};

/// `Some` when the favorite team plays in the fixture. A home-side match wins when both
/// sides match.
pub fn track_fixture(fixture: &Fixture, favorite_team: &str) -> Option<TrackedMatch> {
    let is_home = teams_match(&fixture.home_team, favorite_team);
    if !is_home && !teams_match(&fixture.away_team, favorite_team) {
        return None;
    }

    let (user_team, opponent) = if is_home {
        (&fixture.home_team, &fixture.away_team)
    } else {
        (&fixture.away_team, &fixture.home_team)
    };

    Some(TrackedMatch {
        id: fixture_match_id(fixture),
        utc_date: fixture.utc_date.clone(),
        home_team: fixture.home_team.clone(),
        away_team: fixture.away_team.clone(),
        opponent: opponent.clone(),
        user_team: user_team.clone(),
        is_home,
        matchday: fixture.matchday,
    })
}

/// Keeps feed order.
pub fn track_fixtures(fixtures: &[Fixture], favorite_team: &str) -> Vec<TrackedMatch> {
    fixtures
        .iter()
        .filter_map(|fixture| track_fixture(fixture, favorite_team))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(utc_date: &str, home_team: &str, away_team: &str) -> Fixture {
        Fixture {
            utc_date: utc_date.into(),
            home_team: home_team.into(),
            away_team: away_team.into(),
            matchday: 1,
        }
    }

    #[test]
    fn home_fixture_for_favorite() {
        let tracked = track_fixture(
            &fixture("2024-05-01T19:00:00Z", "Arsenal FC", "Chelsea"),
            "Arsenal",
        )
        .unwrap();

        assert!(tracked.is_home);
        assert_eq!(tracked.opponent, "Chelsea");
        assert_eq!(tracked.user_team, "Arsenal FC");
        assert_eq!(tracked.id, "2024_05_01T19_00_00Z_Arsenal_FC_vs_Chelsea");
    }

    #[test]
    fn away_fixture_for_favorite() {
        let tracked = track_fixture(
            &fixture("2024-05-04T14:00:00Z", "Manchester United FC", "Arsenal FC"),
            "Arsenal",
        )
        .unwrap();

        assert!(!tracked.is_home);
        assert_eq!(tracked.opponent, "Manchester United FC");
        assert_eq!(tracked.user_team, "Arsenal FC");
    }

    #[test]
    fn unrelated_fixtures_are_skipped() {
        let fixtures = vec![
            fixture("2024-05-01T19:00:00Z", "Arsenal FC", "Chelsea"),
            fixture("2024-05-02T19:00:00Z", "Liverpool", "Everton"),
            fixture("2024-05-03T19:00:00Z", "Fulham", "Arsenal"),
        ];

        let tracked = track_fixtures(&fixtures, "Arsenal");
        assert_eq!(tracked.len(), 2);
        assert!(tracked[0].is_home);
        assert!(!tracked[1].is_home);
    }
}
