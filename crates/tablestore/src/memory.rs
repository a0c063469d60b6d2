use std::{cmp::Ordering, collections::HashMap};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{Direction, Order, Row, TableBackend, TableError};

/// Stand-in for the hosted API, rows live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<String, MemoryTable>>,
}

#[derive(Debug, Default)]
struct MemoryTable {
    last_id: i64,
    rows: Vec<Row>,
}

impl MemoryTable {
    fn position(&self, id: i64) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.get("id").and_then(Value::as_i64) == Some(id))
    }
}

#[async_trait]
impl TableBackend for MemoryBackend {
    async fn insert(&self, table: &str, mut row: Row) -> Result<Row, TableError> {
        let mut tables = self.tables.lock().await;
        let entry = tables.entry(table.to_owned()).or_default();
        entry.last_id += 1;
        row.insert("id".to_owned(), Value::from(entry.last_id));
        row.entry("created_at").or_insert_with(|| {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
        });
        entry.rows.push(row.clone());
        Ok(row)
    }

    async fn select(&self, table: &str, order: &Order) -> Result<Vec<Row>, TableError> {
        let tables = self.tables.lock().await;
        let mut rows = tables
            .get(table)
            .map(|entry| entry.rows.clone())
            .unwrap_or_default();
        rows.sort_by(|a, b| {
            compare_values(a.get(&order.column), b.get(&order.column))
                .then_with(|| compare_values(a.get("id"), b.get("id")))
        });
        if order.direction == Direction::Descending {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn update(&self, table: &str, id: i64, patch: Row) -> Result<Row, TableError> {
        let mut tables = self.tables.lock().await;
        let not_found = || TableError::NotFound {
            table: table.to_owned(),
            id,
        };
        let entry = tables.get_mut(table).ok_or_else(not_found)?;
        let index = entry.position(id).ok_or_else(not_found)?;
        let row = &mut entry.rows[index];
        for (column, value) in patch {
            if column != "id" && column != "created_at" {
                row.insert(column, value);
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: i64) -> Result<bool, TableError> {
        let mut tables = self.tables.lock().await;
        let Some(entry) = tables.get_mut(table) else {
            return Ok(false);
        };
        match entry.position(id) {
            Some(index) => {
                entry.rows.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn is_remote(&self) -> bool {
        false
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.total_cmp(&b)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(row) => row,
            other => panic!("not an object: {other}"),
        }
    }

    #[tokio::test]
    async fn ids_increase_per_table() {
        let backend = MemoryBackend::default();
        let a = backend.insert("phrases", row(json!({"text": "a"}))).await.unwrap();
        let b = backend.insert("phrases", row(json!({"text": "b"}))).await.unwrap();
        let c = backend.insert("vocabulary", row(json!({"text": "c"}))).await.unwrap();
        assert_eq!(a["id"], 1);
        assert_eq!(b["id"], 2);
        assert_eq!(c["id"], 1);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let backend = MemoryBackend::default();
        backend.insert("phrases", row(json!({}))).await.unwrap();
        assert!(backend.delete("phrases", 1).await.unwrap());
        let next = backend.insert("phrases", row(json!({}))).await.unwrap();
        assert_eq!(next["id"], 2);
    }

    #[tokio::test]
    async fn descending_order_lists_newest_first() {
        let backend = MemoryBackend::default();
        for (text, created_at) in [
            ("old", "2024-01-01T00:00:00Z"),
            ("new", "2024-03-01T00:00:00Z"),
            ("mid", "2024-02-01T00:00:00Z"),
        ] {
            backend
                .insert("phrases", row(json!({"text": text, "created_at": created_at})))
                .await
                .unwrap();
        }
        let rows = backend
            .select("phrases", &Order::descending("created_at"))
            .await
            .unwrap();
        let texts: Vec<&str> = rows.iter().filter_map(|row| row["text"].as_str()).collect();
        assert_eq!(texts, ["new", "mid", "old"]);

        let rows = backend
            .select("phrases", &Order::ascending("created_at"))
            .await
            .unwrap();
        assert_eq!(rows[0]["text"], "old");
    }

    #[tokio::test]
    async fn equal_timestamps_fall_back_to_id() {
        let backend = MemoryBackend::default();
        for text in ["first", "second"] {
            backend
                .insert(
                    "phrases",
                    row(json!({"text": text, "created_at": "2024-01-01T00:00:00Z"})),
                )
                .await
                .unwrap();
        }
        let rows = backend
            .select("phrases", &Order::descending("created_at"))
            .await
            .unwrap();
        assert_eq!(rows[0]["text"], "second");
    }

    #[tokio::test]
    async fn update_keeps_identity_columns() {
        let backend = MemoryBackend::default();
        let saved = backend.insert("vocabulary", row(json!({"word": "chat"}))).await.unwrap();
        let updated = backend
            .update(
                "vocabulary",
                1,
                row(json!({"word": "chien", "id": 42, "created_at": "never"})),
            )
            .await
            .unwrap();
        assert_eq!(updated["word"], "chien");
        assert_eq!(updated["id"], 1);
        assert_eq!(updated["created_at"], saved["created_at"]);
    }

    #[tokio::test]
    async fn missing_rows() {
        let backend = MemoryBackend::default();
        let error = backend.update("vocabulary", 7, Row::new()).await.unwrap_err();
        assert!(matches!(error, TableError::NotFound { id: 7, .. }));
        assert!(!backend.delete("vocabulary", 7).await.unwrap());
        assert!(backend
            .select("vocabulary", &Order::descending("created_at"))
            .await
            .unwrap()
            .is_empty());
    }
}
