//! Record store for the scouting pipeline
//!
//! Contacts, events and intel notes are stored as JSON documents in SQLite,
//! one table per collection. Single file, works offline.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::path::Path;
use uuid::Uuid;

/// Collections in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Contacts,
    Events,
    Intel,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Contacts => "contacts",
            Table::Events => "events",
            Table::Intel => "intel",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "contacts" => Ok(Table::Contacts),
            "events" => Ok(Table::Events),
            "intel" => Ok(Table::Intel),
            other => Err(anyhow::anyhow!("Unknown table: {}", other)),
        }
    }
}

/// Field-equality constraints, all of which must hold
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub eq: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.eq.push((field.to_string(), value.into()));
        self
    }

    pub fn matches(&self, record: &Value) -> bool {
        self.eq
            .iter()
            .all(|(field, want)| record.get(field).unwrap_or(&Value::Null) == want)
    }
}

/// Sort on a single field. Records missing the field sort last.
#[derive(Debug, Clone)]
pub struct Order {
    pub field: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            ascending: true,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            ascending: false,
        }
    }

    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let a = a.get(&self.field).filter(|v| !v.is_null());
        let b = b.get(&self.field).filter(|v| !v.is_null());
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ord = compare_values(a, b);
                if self.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Opaque record store: insert, update, delete, query
pub trait RecordStore {
    /// Insert a JSON object, returning its new id
    fn insert(&self, table: Table, record: Value) -> Result<String>;

    /// Merge `patch` into the record with `id`
    fn update(&self, table: Table, id: &str, patch: Value) -> Result<()>;

    fn delete(&self, table: Table, id: &str) -> Result<()>;

    fn query(&self, table: Table, filter: &Filter, order: Option<&Order>) -> Result<Vec<Value>>;
}

const SCHEMA: &str = r#"
-- Contacts: people in the outreach pipeline
CREATE TABLE IF NOT EXISTS contacts (
    id TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
);

-- Events: the terrain calendar
CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
);

-- Intel: saved market intelligence
CREATE TABLE IF NOT EXISTS intel (
    id TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
);
"#;

/// Open the database and create the schema
pub fn init_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database at {:?}", path))?;

    conn.execute_batch(SCHEMA)?;

    Ok(conn)
}

/// SQLite-backed [`RecordStore`]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: init_db(path)?,
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn load(&self, table: Table, id: &str) -> Result<Option<Value>> {
        let sql = format!("SELECT body FROM {} WHERE id = ?1", table.name());
        let body: Option<String> = self
            .conn
            .query_row(&sql, params![id], |row| row.get(0))
            .optional()?;
        body.map(|b| serde_json::from_str(&b).context("Corrupt record body"))
            .transpose()
    }
}

impl RecordStore for SqliteStore {
    fn insert(&self, table: Table, record: Value) -> Result<String> {
        let Value::Object(mut fields) = record else {
            return Err(anyhow::anyhow!("{} records must be JSON objects", table.name()));
        };

        let id = Uuid::new_v4().to_string();
        fields.insert("id".to_string(), Value::String(id.clone()));
        fields
            .entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)));

        let body = serde_json::to_string(&Value::Object(fields))?;
        let sql = format!("INSERT INTO {} (id, body) VALUES (?1, ?2)", table.name());
        self.conn
            .execute(&sql, params![id, body])
            .with_context(|| format!("Failed to insert into {}", table.name()))?;

        tracing::info!("Inserted {} into {}", id, table.name());
        Ok(id)
    }

    fn update(&self, table: Table, id: &str, patch: Value) -> Result<()> {
        let Value::Object(patch) = patch else {
            return Err(anyhow::anyhow!("Patch for {} must be a JSON object", id));
        };

        let mut record = self
            .load(table, id)?
            .ok_or_else(|| anyhow::anyhow!("No record {} in {}", id, table.name()))?;

        if let Value::Object(fields) = &mut record {
            merge(fields, patch);
        }

        let sql = format!("UPDATE {} SET body = ?2 WHERE id = ?1", table.name());
        self.conn
            .execute(&sql, params![id, serde_json::to_string(&record)?])
            .with_context(|| format!("Failed to update {} in {}", id, table.name()))?;

        tracing::info!("Updated {} in {}", id, table.name());
        Ok(())
    }

    fn delete(&self, table: Table, id: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", table.name());
        let removed = self.conn.execute(&sql, params![id])?;
        if removed == 0 {
            return Err(anyhow::anyhow!("No record {} in {}", id, table.name()));
        }
        tracing::info!("Deleted {} from {}", id, table.name());
        Ok(())
    }

    fn query(&self, table: Table, filter: &Filter, order: Option<&Order>) -> Result<Vec<Value>> {
        let sql = format!("SELECT body FROM {} ORDER BY rowid", table.name());
        let mut stmt = self.conn.prepare(&sql)?;

        let bodies = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(bodies.len());
        for body in bodies {
            let record: Value = serde_json::from_str(&body).context("Corrupt record body")?;
            if filter.matches(&record) {
                records.push(record);
            }
        }

        if let Some(order) = order {
            records.sort_by(|a, b| order.compare(a, b));
        }

        Ok(records)
    }
}

fn merge(fields: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        // The id is the store's, never the caller's
        if key == "id" {
            continue;
        }
        fields.insert(key, value);
    }
}
