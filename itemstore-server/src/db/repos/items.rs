//! Item repository
//!
//! CRUD over the `items` table:
//! - list: every row, storage order, no pagination
//! - update: COALESCE per column, so absent fields keep their stored value
//! - delete: idempotent, no not-found signal

use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::DbError;

/// Name used when a create request carries none.
pub const DEFAULT_ITEM_NAME: &str = "Untitled";

/// Item record from database. `name`/`value` are nullable columns and
/// serialize as `null` when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Item {
    pub id: String,
    pub name: Option<String>,
    pub value: Option<String>,
}

/// Fields for a new item, defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub value: String,
}

impl NewItem {
    /// Build from a request body.
    ///
    /// Falsy `name`/`value` (absent, null, false, 0, "") fall back to
    /// [`DEFAULT_ITEM_NAME`] and to the JSON text of the whole body. Fields
    /// are only read from object bodies.
    pub fn from_body(body: &JsonValue) -> Self {
        let name = field(body, "name")
            .and_then(truthy_text)
            .unwrap_or_else(|| DEFAULT_ITEM_NAME.to_string());
        let value = field(body, "value")
            .and_then(truthy_text)
            .unwrap_or_else(|| body.to_string());

        Self { name, value }
    }
}

/// Partial update; `None` keeps the stored column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl ItemPatch {
    /// Absent or null fields are left alone; anything else overwrites, including "".
    pub fn from_body(body: &JsonValue) -> Self {
        Self {
            name: field(body, "name").and_then(present_text),
            value: field(body, "value").and_then(present_text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.value.is_none()
    }
}

fn field<'b>(body: &'b JsonValue, key: &str) -> Option<&'b JsonValue> {
    body.as_object().and_then(|map| map.get(key))
}

/// Text form of a JSON value: strings verbatim, everything else as JSON.
fn as_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn present_text(value: &JsonValue) -> Option<String> {
    (!value.is_null()).then(|| as_text(value))
}

fn truthy_text(value: &JsonValue) -> Option<String> {
    let truthy = match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    };
    truthy.then(|| as_text(value))
}

/// Item repository
pub struct ItemRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All items in storage order.
    pub async fn list(&self) -> Result<Vec<Item>, DbError> {
        let items: Vec<Item> = sqlx::query_as("SELECT id, name, value FROM items")
            .fetch_all(self.pool)
            .await?;
        Ok(items)
    }

    pub async fn get(&self, id: &str) -> Result<Item, DbError> {
        sqlx::query_as("SELECT id, name, value FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "item",
                id: id.to_owned(),
            })
    }

    /// Insert under a freshly generated UUID.
    pub async fn create(&self, new: NewItem) -> Result<Item, DbError> {
        let item = Item {
            id: Uuid::new_v4().to_string(),
            name: Some(new.name),
            value: Some(new.value),
        };

        sqlx::query("INSERT INTO items (id, name, value) VALUES ($1, $2, $3)")
            .bind(&item.id)
            .bind(&item.name)
            .bind(&item.value)
            .execute(self.pool)
            .await?;

        tracing::debug!(item_id = %item.id, "item created");
        Ok(item)
    }

    /// Apply a patch and return the row as stored afterwards.
    pub async fn update(&self, id: &str, patch: ItemPatch) -> Result<Item, DbError> {
        sqlx::query_as(
            r#"
            UPDATE items
            SET name = COALESCE($2, name),
                value = COALESCE($3, value)
            WHERE id = $1
            RETURNING id, name, value
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.value)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "item",
            id: id.to_owned(),
        })
    }

    /// Delete by id (idempotent).
    pub async fn delete(&self, id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        tracing::debug!(item_id = %id, rows = result.rows_affected(), "item delete");
        Ok(())
    }
}
