use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

mod memory;
mod rest;

pub use memory::MemoryBackend;
pub use rest::{Credentials, RestBackend};

/// A single table row as the backend sees it.
pub type Row = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("request to the table API failed: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("could not read the table API response: {0}")]
    Deserialize(#[source] reqwest::Error),
    #[error("table API answered {status}: {message}")]
    Api { status: u16, message: String },
    #[error("no row with id {id} in {table}")]
    NotFound { table: String, id: i64 },
    #[error("the insert into {0} returned no row")]
    EmptyResponse(String),
    #[error("record for {0} is not a JSON object")]
    NotAnObject(String),
    #[error("record conversion failed: {0}")]
    Conversion(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

impl Order {
    pub fn ascending(column: &str) -> Self {
        Self {
            column: column.to_owned(),
            direction: Direction::Ascending,
        }
    }

    pub fn descending(column: &str) -> Self {
        Self {
            column: column.to_owned(),
            direction: Direction::Descending,
        }
    }
}

#[async_trait]
pub trait TableBackend: Send + Sync {
    /// Inserts a row, returns it as stored (with `id` and `created_at`).
    async fn insert(&self, table: &str, row: Row) -> Result<Row, TableError>;

    async fn select(&self, table: &str, order: &Order) -> Result<Vec<Row>, TableError>;

    async fn update(&self, table: &str, id: i64, patch: Row) -> Result<Row, TableError>;

    /// Removes the row with `id`, returns true if a row was removed.
    async fn delete(&self, table: &str, id: i64) -> Result<bool, TableError>;

    fn is_remote(&self) -> bool;
}

/// Typed access to a table backend.
#[derive(Clone)]
pub struct Tables {
    backend: Arc<dyn TableBackend>,
}

impl Tables {
    pub fn new(backend: impl TableBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Uses the hosted API when credentials are available, an in-memory store otherwise.
    pub fn connect(credentials: Option<Credentials>) -> Self {
        match credentials {
            Some(credentials) => {
                tracing::info!(url = %credentials.url, "using hosted table API");
                Self::new(RestBackend::new(credentials))
            }
            None => {
                tracing::warn!(
                    "table API credentials missing, records are kept in memory for this session only"
                );
                Self::in_memory()
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    pub fn is_remote(&self) -> bool {
        self.backend.is_remote()
    }

    pub async fn insert<N, R>(&self, table: &str, record: &N) -> Result<R, TableError>
    where
        N: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let row = self.backend.insert(table, to_row(table, record)?).await?;
        from_row(row)
    }

    pub async fn select<R: DeserializeOwned>(
        &self,
        table: &str,
        order: &Order,
    ) -> Result<Vec<R>, TableError> {
        self.backend
            .select(table, order)
            .await?
            .into_iter()
            .map(from_row)
            .collect()
    }

    pub async fn update<N, R>(&self, table: &str, id: i64, record: &N) -> Result<R, TableError>
    where
        N: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let row = self.backend.update(table, id, to_row(table, record)?).await?;
        from_row(row)
    }

    pub async fn delete(&self, table: &str, id: i64) -> Result<bool, TableError> {
        self.backend.delete(table, id).await
    }
}

fn to_row<N: Serialize + ?Sized>(table: &str, record: &N) -> Result<Row, TableError> {
    match serde_json::to_value(record)? {
        Value::Object(row) => Ok(row),
        _ => Err(TableError::NotAnObject(table.to_owned())),
    }
}

fn from_row<R: DeserializeOwned>(row: Row) -> Result<R, TableError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Serialize)]
    struct NewNote<'a> {
        body: &'a str,
    }

    #[derive(Debug, Deserialize)]
    struct Note {
        id: i64,
        body: String,
        created_at: String,
    }

    #[tokio::test]
    async fn typed_round_trip_through_memory() {
        let tables = Tables::in_memory();
        assert!(!tables.is_remote());

        let saved: Note = tables.insert("notes", &NewNote { body: "first" }).await.unwrap();
        assert_eq!(saved.id, 1);
        assert_eq!(saved.body, "first");
        assert!(!saved.created_at.is_empty());

        let updated: Note = tables
            .update("notes", saved.id, &NewNote { body: "edited" })
            .await
            .unwrap();
        assert_eq!(updated.body, "edited");
        assert_eq!(updated.created_at, saved.created_at);

        let notes: Vec<Note> = tables.select("notes", &Order::descending("created_at")).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert!(tables.delete("notes", saved.id).await.unwrap());
        assert!(!tables.delete("notes", saved.id).await.unwrap());
    }

    #[tokio::test]
    async fn non_object_records_are_rejected() {
        let tables = Tables::in_memory();
        let error = tables
            .insert::<_, Note>("notes", &vec!["not", "an", "object"])
            .await
            .unwrap_err();
        assert!(matches!(error, TableError::NotAnObject(table) if table == "notes"));
    }

    #[test]
    fn connect_without_credentials_stays_local() {
        assert!(!Tables::connect(None).is_remote());
        let credentials = Credentials::from_parts(Some("https://db.example".into()), Some("key".into()));
        assert!(Tables::connect(credentials).is_remote());
    }
}
