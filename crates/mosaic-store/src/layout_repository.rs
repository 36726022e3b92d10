//! Layout repository — persistence for the `dashboard_layouts` table.
//!
//! One row per role. The ordered ids are stored as a JSON array of strings;
//! rows that no longer decode surface as `DbError::Corrupt` rather than a
//! panic or a silently empty layout.

use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use mosaic_core::widget::WidgetId;

use crate::{now_rfc3339, Db, DbError};

pub struct LayoutRepository<'a> {
    db: &'a Db,
}

impl<'a> LayoutRepository<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// The stored order for a role; `None` means no prior arrangement.
    pub fn get(&self, role: &str) -> Result<Option<Vec<WidgetId>>, DbError> {
        let raw: Option<String> = self
            .db
            .conn()
            .query_row(
                "SELECT ordered_ids FROM dashboard_layouts WHERE role = ?1",
                params![role],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            None => Ok(None),
            Some(raw) => decode_ordered_ids(role, &raw).map(Some),
        }
    }

    /// Overwrite the stored order for a role (upsert).
    pub fn save(&self, role: &str, order: &[WidgetId]) -> Result<(), DbError> {
        if role.trim().is_empty() {
            return Err(DbError::Validation("layout role is required".into()));
        }
        let encoded = encode_ordered_ids(order)?;
        self.db.conn().execute(
            "INSERT INTO dashboard_layouts (role, ordered_ids, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(role) DO UPDATE SET
                 ordered_ids = excluded.ordered_ids,
                 updated_at = excluded.updated_at",
            params![role, encoded, now_rfc3339()],
        )?;
        Ok(())
    }
}

fn encode_ordered_ids(order: &[WidgetId]) -> Result<String, DbError> {
    let ids: Vec<&str> = order.iter().map(WidgetId::as_str).collect();
    serde_json::to_string(&ids)
        .map_err(|err| DbError::Validation(format!("encode ordered ids: {err}")))
}

fn decode_ordered_ids(role: &str, raw: &str) -> Result<Vec<WidgetId>, DbError> {
    let value = serde_json::from_str::<Value>(raw)
        .map_err(|err| DbError::Corrupt(format!("layout for role {role}: invalid json ({err})")))?;
    let Some(items) = value.as_array() else {
        return Err(DbError::Corrupt(format!(
            "layout for role {role}: ordered_ids is not an array"
        )));
    };

    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(id) => ids.push(WidgetId::new(id.clone())),
            Value::Number(num) => match num.as_i64() {
                Some(id) => ids.push(WidgetId::from(id)),
                None => {
                    return Err(DbError::Corrupt(format!(
                        "layout for role {role}: non-integer id {num}"
                    )));
                }
            },
            other => {
                return Err(DbError::Corrupt(format!(
                    "layout for role {role}: unexpected id entry {other}"
                )));
            }
        }
    }
    Ok(ids)
}
