//! Comparison keys for free-text team names. Keys are never shown to users.

/// Club-name tokens dropped during normalization, tried in this order at every position.
const CLUB_SUFFIXES: [&str; 9] = [
    "afc", "fc", "cf", "united", "city", "town", "rovers", "wanderers", "albion",
];

/// Lower-cases, removes every club suffix token and all whitespace. Removal can join
/// characters into a new token, so the pass repeats until nothing changes.
pub fn normalize_team_name(team_name: &str) -> String {
    let mut key = team_name.to_lowercase();

    loop {
        let next = strip_once(&key);
        if next == key {
            return key;
        }
        key = next;
    }
}

fn strip_once(name: &str) -> String {
    let mut stripped = String::with_capacity(name.len());
    let mut rest = name;

    while let Some(c) = rest.chars().next() {
        if let Some(token) = CLUB_SUFFIXES.iter().find(|token| rest.starts_with(*token)) {
            rest = &rest[token.len()..];
            continue;
        }

        if !c.is_whitespace() {
            stripped.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    stripped.trim().to_string()
}

/// Same club when either key contains the other. Tolerates "Man City" vs "Manchester City",
/// at the price of matching short names inside unrelated longer ones. A name that is
/// nothing but suffixes ("FC") reduces to an empty key and matches every team; only a
/// missing name never matches.
pub fn teams_match(team1: &str, team2: &str) -> bool {
    if team1.is_empty() || team2.is_empty() {
        return false;
    }

    let normalized1 = normalize_team_name(team1);
    let normalized2 = normalize_team_name(team2);

    normalized1.contains(&normalized2) || normalized2.contains(&normalized1)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const NAMES: [&str; 14] = [
        "Arsenal FC",
        "Arsenal",
        "Manchester City",
        "Man City",
        "Manchester United FC",
        "Luton Town",
        "Brighton & Hove Albion",
        "Wolverhampton Wanderers",
        "AFC Bournemouth",
        "  Crystal   Palace ",
        "ci ty",
        "FC",
        "",
        "Kansas City Chiefs",
    ];

    #[test]
    fn strips_suffixes_and_whitespace() {
        assert_eq!(normalize_team_name("Arsenal FC"), "arsenal");
        assert_eq!(normalize_team_name("AFC Bournemouth"), "bournemouth");
        assert_eq!(normalize_team_name("Wolverhampton Wanderers"), "wolverhampton");
        assert_eq!(normalize_team_name("  Crystal   Palace "), "crystalpalace");
        assert_eq!(normalize_team_name("Brighton & Hove Albion"), "brighton&hove");
        assert_eq!(normalize_team_name(""), "");
    }

    #[test]
    fn joined_suffixes_are_stripped_again() {
        assert_eq!(normalize_team_name("ci ty"), "");
        for name in NAMES {
            let once = normalize_team_name(name);
            assert_eq!(normalize_team_name(&once), once, "{:?}", name);
        }
    }

    /// Team-like names: words, club tokens, whitespace and non-ASCII letters mixed freely.
    fn team_name() -> impl Strategy<Value = String> {
        let piece = prop_oneof![
            Just("FC".to_string()),
            Just("afc".to_string()),
            Just("City".to_string()),
            Just("united".to_string()),
            Just("Wanderers".to_string()),
            Just("ci ty".to_string()),
            Just(" ".to_string()),
            "[a-zA-Z]{1,8}",
            "[ßéüÅİ&'.-]{1,3}",
            any::<String>(),
        ];

        proptest::collection::vec(piece, 0..6).prop_map(|pieces| pieces.concat())
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(name in team_name()) {
            let once = normalize_team_name(&name);
            prop_assert_eq!(normalize_team_name(&once), once);
        }

        #[test]
        fn matching_is_symmetric(a in team_name(), b in team_name()) {
            prop_assert_eq!(teams_match(&a, &b), teams_match(&b, &a));
        }

        #[test]
        fn a_name_matches_itself(name in team_name()) {
            prop_assert_eq!(teams_match(&name, &name), !name.is_empty());
        }
    }

    #[test]
    fn containment_matches() {
        assert!(teams_match("Arsenal FC", "Arsenal"));
        assert!(teams_match("Man City", "Manchester City"));
        assert!(!teams_match("Chelsea", "Arsenal"));
    }

    #[test]
    fn suffix_only_names_match_everything() {
        assert!(teams_match("FC", "Arsenal"));
        assert!(teams_match("City", "Chelsea"));
        assert!(teams_match("Chelsea", "City"));
    }

    #[test]
    fn missing_names_never_match() {
        assert!(!teams_match("", "Arsenal"));
        assert!(!teams_match("Arsenal", ""));
        assert!(!teams_match("", ""));
    }

    #[test]
    fn known_false_positive_is_kept() {
        // Suffix stripping makes both Manchester clubs the same key.
        assert!(teams_match("Manchester United", "Manchester City"));
    }
}
