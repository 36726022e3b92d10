//! Widget repository — persistence for the `widgets` table.

use rusqlite::params;
use serde_json::Value;
use uuid::Uuid;

use mosaic_core::widget::{ConfigPayload, Widget, WidgetId};

use crate::{now_rfc3339, Db, DbError};

/// One row of the `widgets` table.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetRecord {
    pub id: String,
    pub role: String,
    pub kind: String,
    pub name: String,
    pub config: ConfigPayload,
    pub position: i64,
    pub created_at: String,
}

impl WidgetRecord {
    #[must_use]
    pub fn new(role: &str, kind: &str, name: &str) -> Self {
        Self {
            id: String::new(),
            role: role.to_owned(),
            kind: kind.to_owned(),
            name: name.to_owned(),
            config: ConfigPayload::Missing,
            position: 0,
            created_at: String::new(),
        }
    }

    #[must_use]
    pub fn with_structured_config(mut self, value: Value) -> Self {
        self.config = ConfigPayload::Structured(value);
        self
    }

    #[must_use]
    pub fn with_raw_config(mut self, raw: impl Into<String>) -> Self {
        self.config = ConfigPayload::Raw(raw.into());
        self
    }

    #[must_use]
    pub fn at_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }
}

pub struct WidgetRepository<'a> {
    db: &'a Db,
}

impl<'a> WidgetRepository<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Insert a widget. A missing id gets a fresh uuid; `created_at` is set
    /// here.
    pub fn create(&self, record: &mut WidgetRecord) -> Result<(), DbError> {
        if record.role.trim().is_empty() {
            return Err(DbError::Validation("widget role is required".into()));
        }
        if record.kind.trim().is_empty() {
            return Err(DbError::Validation("widget type is required".into()));
        }
        if record.name.trim().is_empty() {
            return Err(DbError::Validation("widget name is required".into()));
        }

        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        record.created_at = now_rfc3339();

        let (config, config_format) = encode_config(&record.config)?;
        self.db.conn().execute(
            "INSERT INTO widgets (id, role, kind, name, config, config_format, position, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.role,
                record.kind,
                record.name,
                config,
                config_format,
                record.position,
                record.created_at,
            ],
        )?;
        Ok(())
    }

    /// The catalog for a role, in authoritative (position) order.
    pub fn list_for_role(&self, role: &str) -> Result<Vec<Widget>, DbError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT id, kind, name, config, config_format FROM widgets
             WHERE role = ?1 ORDER BY position, rowid",
        )?;
        let rows = stmt.query_map(params![role], |row| {
            let id: String = row.get(0)?;
            let kind: String = row.get(1)?;
            let name: String = row.get(2)?;
            let config: Option<String> = row.get(3)?;
            let config_format: String = row.get(4)?;
            Ok((id, kind, name, config, config_format))
        })?;

        let mut widgets = Vec::new();
        for row in rows {
            let (id, kind, name, config, config_format) = row?;
            widgets.push(Widget {
                id: WidgetId::from(id),
                kind,
                name,
                config: decode_config(config, &config_format),
            });
        }
        Ok(widgets)
    }

    pub fn delete(&self, id: &str) -> Result<(), DbError> {
        let affected = self
            .db
            .conn()
            .execute("DELETE FROM widgets WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(DbError::WidgetNotFound);
        }
        Ok(())
    }
}

fn encode_config(config: &ConfigPayload) -> Result<(Option<String>, &'static str), DbError> {
    match config {
        ConfigPayload::Missing => Ok((None, "none")),
        ConfigPayload::Raw(raw) => Ok((Some(raw.clone()), "raw")),
        ConfigPayload::Structured(value) => {
            let encoded = serde_json::to_string(value)
                .map_err(|err| DbError::Validation(format!("encode widget config: {err}")))?;
            Ok((Some(encoded), "json"))
        }
    }
}

fn decode_config(config: Option<String>, config_format: &str) -> ConfigPayload {
    let Some(config) = config else {
        return ConfigPayload::Missing;
    };
    match config_format {
        // A json row that no longer parses degrades to a raw payload; the
        // config normalizer downstream turns it into a documented default.
        "json" => match serde_json::from_str::<Value>(&config) {
            Ok(value) => ConfigPayload::Structured(value),
            Err(_) => ConfigPayload::Raw(config),
        },
        _ => ConfigPayload::Raw(config),
    }
}
