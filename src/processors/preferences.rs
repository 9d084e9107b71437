use crate::{
    data_types::preferences::{validate_choice, PreferencesUpdate, UserPreferences},
    database::PreferencesStore,
    error::{Error, Result},
    logln,
    session::Session,
    util::DateTimeUtils,
};

pub struct PreferencesService<'a> {
    store: &'a dyn PreferencesStore,
}

impl<'a> PreferencesService<'a> {
    const CC: &'static str = "Preferences";

    pub fn new(store: &'a dyn PreferencesStore) -> Self {
        Self { store }
    }

    pub async fn get(&self, session: &Session) -> Result<Option<UserPreferences>> {
        self.store.get_preferences(session.user_id()).await
    }

    pub async fn has_preferences(&self, session: &Session) -> Result<bool> {
        Ok(self.get(session).await?.is_some())
    }

    /// Creates or replaces both choices. `createdAt` survives a replace.
    pub async fn save(&self, session: &Session, league: &str, team: &str) -> Result<UserPreferences> {
        validate_choice(league, team)?;

        let now = DateTimeUtils::now_millis();
        let created_at = self
            .get(session)
            .await?
            .map(|existing| existing.created_at)
            .unwrap_or(now);

        let preferences = UserPreferences {
            user_id: session.user_id().to_string(),
            favorite_league: league.to_string(),
            favorite_team: team.to_string(),
            created_at,
            updated_at: now,
        };
        self.store.put_preferences(&preferences).await?;
        logln!("{} follows {} ({})", session.user_id(), team, league);

        Ok(preferences)
    }

    /// Partial update of an existing record; the resulting pair must still be valid.
    pub async fn update(&self, session: &Session, update: &PreferencesUpdate) -> Result<UserPreferences> {
        let mut preferences = self
            .get(session)
            .await?
            .ok_or_else(|| Error::not_found(format!("preferences of {}", session.user_id())))?;

        if let Some(league) = &update.favorite_league {
            preferences.favorite_league = league.clone();
        }
        if let Some(team) = &update.favorite_team {
            preferences.favorite_team = team.clone();
        }
        validate_choice(&preferences.favorite_league, &preferences.favorite_team)?;

        preferences.updated_at = DateTimeUtils::now_millis();
        self.store.put_preferences(&preferences).await?;

        Ok(preferences)
    }

    pub async fn delete(&self, session: &Session) -> Result<bool> {
        self.store.delete_preferences(session.user_id()).await
    }
}
