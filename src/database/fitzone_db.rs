use ::mongodb::{
    bson::{self, doc, Document},
    Client, Collection,
};
use async_trait::async_trait;

use crate::{
    data_types::{
        common::{DrillId, Identifiable},
        drill::{Drill, DrillUpdate, NewDrill},
        fixture::{MatchRecord, TrackedMatch},
        preferences::UserPreferences,
    },
    error::{Error, Result},
    logvbln,
    processors::progress::Percent,
    util::DateTimeUtils,
};

use super::{mongodb::MongoDatabase, new_drill_id, DrillStore, PreferencesStore};

pub struct FitzoneDB {
    db_conn: MongoDatabase,
}

impl FitzoneDB {
    const CC: &'static str = "FitzoneDB";

    const PREFERENCES: &'static str = "user_preferences";
    const MATCHES: &'static str = "match_progress";
    const DRILLS: &'static str = "drills";

    pub async fn new(db_url: &str, db_name: &str) -> Result<FitzoneDB> {
        let db = Client::with_uri_str(db_url).await?.database(db_name);

        logvbln!("connected to {} / {}", db_url, db_name);

        Ok(Self {
            db_conn: MongoDatabase::new(&db),
        })
    }

    fn preferences(&self) -> Collection<UserPreferences> {
        self.db_conn.typed_collection(FitzoneDB::PREFERENCES)
    }

    fn matches(&self) -> Collection<MatchRecord> {
        self.db_conn.typed_collection(FitzoneDB::MATCHES)
    }

    fn drills(&self) -> Collection<Drill> {
        self.db_conn.typed_collection(FitzoneDB::DRILLS)
    }

    fn drill_query(user_id: &str, match_id: &str, drill_id: &str) -> Document {
        doc! {"_id": drill_id, "userId": user_id, "matchId": match_id}
    }
}

#[async_trait]
impl DrillStore for FitzoneDB {
    async fn list(&self, user_id: &str, match_id: &str) -> Result<Vec<Drill>> {
        self.db_conn
            .find_all(
                &self.drills(),
                doc! {"userId": user_id, "matchId": match_id},
                doc! {"createdAt": 1, "_id": 1},
            )
            .await
    }

    async fn get(&self, user_id: &str, match_id: &str, drill_id: &str) -> Result<Option<Drill>> {
        self.db_conn
            .find_one(
                &self.drills(),
                FitzoneDB::drill_query(user_id, match_id, drill_id),
            )
            .await
    }

    async fn create(&self, user_id: &str, match_id: &str, drill: &NewDrill) -> Result<DrillId> {
        let drill = Drill::from_new(
            new_drill_id(),
            user_id,
            match_id,
            drill,
            DateTimeUtils::now_millis(),
        );

        self.drills().insert_one(&drill, None).await?;

        Ok(drill.id)
    }

    async fn update(
        &self,
        user_id: &str,
        match_id: &str,
        drill_id: &str,
        fields: &DrillUpdate,
    ) -> Result<()> {
        let mut set = bson::to_document(fields)?;
        set.insert("updatedAt", DateTimeUtils::now_millis());

        let matched = self
            .db_conn
            .set_fields(
                &self.drills(),
                FitzoneDB::drill_query(user_id, match_id, drill_id),
                set,
            )
            .await?;

        if matched == 0 {
            return Err(Error::not_found(format!("drill {}", drill_id)));
        }

        Ok(())
    }

    async fn delete(&self, user_id: &str, match_id: &str, drill_id: &str) -> Result<()> {
        let result = self
            .drills()
            .delete_one(FitzoneDB::drill_query(user_id, match_id, drill_id), None)
            .await?;

        if result.deleted_count == 0 {
            return Err(Error::not_found(format!("drill {}", drill_id)));
        }

        Ok(())
    }

    async fn ensure_match_record_exists(&self, user_id: &str, match_id: &str) -> Result<()> {
        let placeholder =
            MatchRecord::placeholder(user_id, match_id, DateTimeUtils::now_millis());

        self.db_conn
            .insert_if_absent(
                &self.matches(),
                placeholder.as_id(),
                bson::to_document(&placeholder)?,
            )
            .await
    }

    async fn get_match_record(
        &self,
        user_id: &str,
        match_id: &str,
    ) -> Result<Option<MatchRecord>> {
        self.db_conn
            .find_one(
                &self.matches(),
                doc! {"_id": MatchRecord::key(user_id, match_id)},
            )
            .await
    }

    async fn list_match_records(&self, user_id: &str) -> Result<Vec<MatchRecord>> {
        self.db_conn
            .find_all(
                &self.matches(),
                doc! {"userId": user_id},
                doc! {"utcDate": 1, "_id": 1},
            )
            .await
    }

    async fn store_match_details(&self, user_id: &str, tracked: &TrackedMatch) -> Result<()> {
        self.ensure_match_record_exists(user_id, &tracked.id).await?;

        self.db_conn
            .set_fields(
                &self.matches(),
                doc! {"_id": MatchRecord::key(user_id, &tracked.id)},
                doc! {
                    "utcDate": tracked.utc_date.as_str(),
                    "homeTeam": tracked.home_team.as_str(),
                    "awayTeam": tracked.away_team.as_str(),
                    "opponent": tracked.opponent.as_str(),
                    "isHome": tracked.is_home,
                    "matchday": tracked.matchday,
                    "updatedAt": DateTimeUtils::now_millis(),
                },
            )
            .await?;

        Ok(())
    }

    async fn store_percent(&self, user_id: &str, match_id: &str, percent: Percent) -> Result<()> {
        let matched = self
            .db_conn
            .set_fields(
                &self.matches(),
                doc! {"_id": MatchRecord::key(user_id, match_id)},
                doc! {"percent": percent.value(), "updatedAt": DateTimeUtils::now_millis()},
            )
            .await?;

        if matched == 0 {
            return Err(Error::not_found(format!("match {}", match_id)));
        }

        Ok(())
    }

    async fn delete_match_record(&self, user_id: &str, match_id: &str) -> Result<bool> {
        self.drills()
            .delete_many(doc! {"userId": user_id, "matchId": match_id}, None)
            .await?;

        let result = self
            .matches()
            .delete_one(doc! {"_id": MatchRecord::key(user_id, match_id)}, None)
            .await?;

        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl PreferencesStore for FitzoneDB {
    async fn get_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        self.db_conn
            .find_one(&self.preferences(), doc! {"_id": user_id})
            .await
    }

    async fn put_preferences(&self, preferences: &UserPreferences) -> Result<()> {
        self.db_conn
            .upsert_one(&self.preferences(), preferences.as_id(), preferences)
            .await
    }

    async fn delete_preferences(&self, user_id: &str) -> Result<bool> {
        let result = self
            .preferences()
            .delete_one(doc! {"_id": user_id}, None)
            .await?;

        Ok(result.deleted_count > 0)
    }
}
