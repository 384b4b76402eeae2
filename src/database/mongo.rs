//! MongoDB database wrapper and key-value store.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, ReplaceOptions};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::KvStore;

/// Database wrapper for MongoDB operations.
#[derive(Debug, Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Connect to MongoDB with the given URI and database name.
    ///
    /// # Errors
    /// Returns error if connection fails.
    pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        // Ping the database to verify connection
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("Successfully connected to MongoDB");

        Ok(Self {
            db: client.database(db_name),
        })
    }

    /// Get a typed collection from the database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

/// One stored key-value pair. The storage key doubles as `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct KvEntry {
    #[serde(rename = "_id")]
    key: String,
    value: String,
}

/// `KvStore` over the `kv` collection.
#[derive(Debug, Clone)]
pub struct MongoStore {
    collection: Collection<KvEntry>,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("kv"),
        }
    }
}

#[async_trait]
impl KvStore for MongoStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entry = self.collection.find_one(doc! { "_id": key }).await?;
        Ok(entry.map(|e| e.value))
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let entry = KvEntry {
            key: key.to_string(),
            value: value.to_string(),
        };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(doc! { "_id": key }, &entry)
            .with_options(options)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.collection.delete_one(doc! { "_id": key }).await?;
        Ok(())
    }
}
