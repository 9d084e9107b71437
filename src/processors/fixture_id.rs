use crate::data_types::{common::MatchId, fixture::Fixture};

/// Stable id for a fixture: `<utcDate>_<homeTeam>_vs_<awayTeam>` with every character
/// outside `[A-Za-z0-9_]` replaced by `_`. Uses the feed's literal text, so a feed that
/// reformats dates or names produces new ids.
pub fn generate_match_id(utc_date: &str, home_team: &str, away_team: &str) -> MatchId {
    format!("{}_{}_vs_{}", utc_date, home_team, away_team)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

pub fn fixture_match_id(fixture: &Fixture) -> MatchId {
    generate_match_id(&fixture.utc_date, &fixture.home_team, &fixture.away_team)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_non_word_characters() {
        assert_eq!(
            generate_match_id("2024-05-01T19:00:00Z", "Arsenal FC", "Chelsea"),
            "2024_05_01T19_00_00Z_Arsenal_FC_vs_Chelsea"
        );
        assert_eq!(
            generate_match_id("2024-05-01", "Brighton & Hove Albion", "Málaga"),
            "2024_05_01_Brighton___Hove_Albion_vs_M_laga"
        );
    }

    #[test]
    fn same_fields_same_id() {
        let fixture = Fixture {
            utc_date: "2024-05-01T19:00:00Z".into(),
            home_team: "Arsenal FC".into(),
            away_team: "Chelsea".into(),
            matchday: 35,
        };
        let mut other_round = fixture.clone();
        other_round.matchday = 36;

        assert_eq!(fixture_match_id(&fixture), fixture_match_id(&other_round));
    }

    #[test]
    fn reformatted_feed_changes_id() {
        assert_ne!(
            generate_match_id("2024-05-01T19:00:00Z", "Arsenal FC", "Chelsea"),
            generate_match_id("2024-05-01T19:00:00.000Z", "Arsenal FC", "Chelsea")
        );
    }
}
