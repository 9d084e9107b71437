use serde_derive::{Deserialize, Serialize};

use crate::{
    data_types::common::{Identifiable, UserId},
    error::{Error, Result},
};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(rename = "_id")]
    pub user_id: UserId,
    pub favorite_league: String,
    pub favorite_team: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserPreferences {
    pub fn has_favorite_team(&self) -> bool {
        !self.favorite_team.trim().is_empty()
    }
}

impl Identifiable for UserPreferences {
    fn as_id(&self) -> &str {
        &self.user_id
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    #[serde(default)]
    pub favorite_league: Option<String>,
    #[serde(default)]
    pub favorite_team: Option<String>,
}

pub const SPORTS_CATALOG: [(&str, &[&str]); 2] = [
    (
        "Premier League",
        &[
            "Arsenal",
            "Chelsea",
            "Liverpool",
            "Manchester City",
            "Manchester United",
            "Tottenham",
            "Newcastle",
            "Brighton",
            "Aston Villa",
            "West Ham",
            "Crystal Palace",
            "Fulham",
            "Wolves",
            "Everton",
            "Brentford",
            "Nottingham Forest",
            "Sheffield United",
            "Burnley",
            "Luton Town",
            "Bournemouth",
        ],
    ),
    (
        "NFL",
        &[
            "Arizona Cardinals",
            "Atlanta Falcons",
            "Baltimore Ravens",
            "Buffalo Bills",
            "Carolina Panthers",
            "Chicago Bears",
            "Cincinnati Bengals",
            "Cleveland Browns",
            "Dallas Cowboys",
            "Denver Broncos",
            "Detroit Lions",
            "Green Bay Packers",
            "Houston Texans",
            "Indianapolis Colts",
            "Jacksonville Jaguars",
            "Kansas City Chiefs",
            "Las Vegas Raiders",
            "Los Angeles Chargers",
            "Los Angeles Rams",
            "Miami Dolphins",
            "Minnesota Vikings",
            "New England Patriots",
            "New Orleans Saints",
            "New York Giants",
            "New York Jets",
            "Philadelphia Eagles",
            "Pittsburgh Steelers",
            "San Francisco 49ers",
            "Seattle Seahawks",
            "Tampa Bay Buccaneers",
            "Tennessee Titans",
            "Washington Commanders",
        ],
    ),
];

pub fn leagues() -> impl Iterator<Item = &'static str> {
    SPORTS_CATALOG.iter().map(|(league, _)| *league)
}

pub fn teams_for(league: &str) -> Option<&'static [&'static str]> {
    SPORTS_CATALOG
        .iter()
        .find(|(name, _)| *name == league)
        .map(|(_, teams)| *teams)
}

/// The team has to be listed under the chosen league.
pub fn validate_choice(league: &str, team: &str) -> Result<()> {
    let teams = teams_for(league)
        .ok_or_else(|| Error::invalid(format!("unknown league '{}'", league)))?;

    if !teams.contains(&team) {
        return Err(Error::invalid(format!(
            "'{}' is not a {} team",
            team, league
        )));
    }

    Ok(())
}
