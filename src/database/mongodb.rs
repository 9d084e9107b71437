use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOptions, ReplaceOptions, UpdateOptions},
    Collection, Database,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    database: Database,
}

impl MongoDatabase {
    pub fn new(db: &Database) -> Self {
        Self {
            database: db.clone(),
        }
    }

    pub fn typed_collection<T>(&self, name: &str) -> Collection<T> {
        self.database.collection(name)
    }

    pub async fn find_one<T>(&self, collection: &Collection<T>, query: Document) -> Result<Option<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        Ok(collection.find_one(query, None).await?)
    }

    pub async fn find_all<T>(
        &self,
        collection: &Collection<T>,
        query: Document,
        sort: Document,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        let cursor = collection
            .find(query, FindOptions::builder().sort(sort).build())
            .await?;

        Ok(cursor.try_collect().await?)
    }

    // Inserts doc_id if it doesn't exist, otherwise it replaces it
    pub async fn upsert_one<T>(&self, collection: &Collection<T>, doc_id: &str, doc: &T) -> Result<()>
    where
        T: Serialize + Send + Sync,
    {
        collection
            .replace_one(
                doc! {"_id": doc_id},
                doc,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await?;

        Ok(())
    }

    // Inserts `doc` under doc_id only when absent; an existing document is left alone
    pub async fn insert_if_absent<T>(
        &self,
        collection: &Collection<T>,
        doc_id: &str,
        mut doc: Document,
    ) -> Result<()>
    where
        T: Send + Sync,
    {
        doc.remove("_id");

        collection
            .update_one(
                doc! {"_id": doc_id},
                doc! {"$setOnInsert": doc},
                UpdateOptions::builder().upsert(true).build(),
            )
            .await?;

        Ok(())
    }

    /// Returns how many documents matched.
    pub async fn set_fields<T>(
        &self,
        collection: &Collection<T>,
        query: Document,
        fields: Document,
    ) -> Result<u64>
    where
        T: Send + Sync,
    {
        let result = collection
            .update_one(query, doc! {"$set": fields}, None)
            .await?;

        Ok(result.matched_count)
    }
}
