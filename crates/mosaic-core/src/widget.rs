//! Widget and catalog model — the authoritative per-role widget set.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

/// Stable widget identity.
///
/// Upstream payloads may declare ids as strings or integers; integers are
/// normalized to their decimal string form so ordering comparisons are
/// always string comparisons.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(String);

impl WidgetId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for WidgetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for WidgetId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// Raw configuration as declared by the catalog, before normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigPayload {
    /// Already-structured data, used as-is.
    Structured(Value),
    /// A string that still needs decoding.
    Raw(String),
    #[default]
    Missing,
}

/// One pluggable dashboard unit.
///
/// `kind` is an open string domain: new kinds may appear in a catalog
/// without this crate being updated. `name` is the fallback display title.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: WidgetId,
    pub kind: String,
    pub name: String,
    pub config: ConfigPayload,
}

impl Widget {
    #[must_use]
    pub fn new(id: impl Into<WidgetId>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            name: name.into(),
            config: ConfigPayload::Missing,
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
}

/// Parse a catalog payload into widgets, tolerating malformed entries.
///
/// Entries that are not objects, have no usable id, an empty kind, or a
/// duplicate id are skipped with a warning. Parsing never fails outright:
/// a non-array payload yields an empty catalog plus a warning.
#[must_use]
pub fn parse_catalog(value: &Value) -> (Vec<Widget>, Vec<String>) {
    let mut warnings = Vec::new();
    let Some(items) = value.as_array() else {
        warnings.push("catalog payload was not an array; no widgets loaded".to_owned());
        return (Vec::new(), warnings);
    };

    let mut widgets = Vec::new();
    let mut seen = BTreeSet::new();
    for (index, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            warnings.push(format!("widgets[{index}] ignored (not an object)"));
            continue;
        };

        let Some(id) = parse_widget_id(obj.get("id")) else {
            warnings.push(format!("widgets[{index}] ignored (missing or empty id)"));
            continue;
        };
        if !seen.insert(id.clone()) {
            warnings.push(format!("widgets[{index}] ignored (duplicate id={id})"));
            continue;
        }

        let kind = obj
            .get("type")
            .or_else(|| obj.get("kind"))
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if kind.is_empty() {
            warnings.push(format!("widgets[{index}] ignored (empty type, id={id})"));
            continue;
        }

        let name = obj
            .get("name")
            .or_else(|| obj.get("title"))
            .and_then(Value::as_str)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| id.as_str().to_owned());

        widgets.push(Widget {
            id,
            kind: kind.to_owned(),
            name,
            config: parse_config_payload(obj.get("config")),
        });
    }

    (widgets, warnings)
}

fn parse_widget_id(value: Option<&Value>) -> Option<WidgetId> {
    match value? {
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(WidgetId::new(trimmed))
            }
        }
        Value::Number(num) => num.as_i64().map(WidgetId::from),
        _ => None,
    }
}

fn parse_config_payload(value: Option<&Value>) -> ConfigPayload {
    match value {
        None | Some(Value::Null) => ConfigPayload::Missing,
        Some(Value::String(raw)) => ConfigPayload::Raw(raw.clone()),
        Some(other) => ConfigPayload::Structured(other.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{parse_catalog, ConfigPayload, Widget, WidgetId};
    use serde_json::json;

    #[test]
    fn numeric_ids_normalize_to_strings() {
        assert_eq!(WidgetId::from(42).as_str(), "42");
        assert_eq!(WidgetId::from("42"), WidgetId::from(42));
    }

    #[test]
    fn parse_catalog_accepts_well_formed_entries() {
        let payload = json!([
            {"id": "revenue", "type": "stats", "name": "Revenue", "config": {"unit": "USD"}},
            {"id": 7, "type": "list", "name": "Recent", "config": "{\"max\": 5}"},
        ]);
        let (widgets, warnings) = parse_catalog(&payload);
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[0].id, WidgetId::from("revenue"));
        assert!(matches!(widgets[0].config, ConfigPayload::Structured(_)));
        assert_eq!(widgets[1].id, WidgetId::from("7"));
        assert!(matches!(widgets[1].config, ConfigPayload::Raw(_)));
    }

    #[test]
    fn parse_catalog_skips_malformed_entries_with_warnings() {
        let payload = json!([
            "not-an-object",
            {"type": "stats", "name": "No Id"},
            {"id": "a", "type": "", "name": "Empty Kind"},
            {"id": "b", "type": "list"},
            {"id": "b", "type": "list", "name": "Duplicate"},
        ]);
        let (widgets, warnings) = parse_catalog(&payload);
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].id, WidgetId::from("b"));
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().any(|w| w.contains("duplicate id=b")));
    }

    #[test]
    fn parse_catalog_defaults_missing_name_to_id() {
        let payload = json!([{"id": "cpu", "type": "chart"}]);
        let (widgets, _) = parse_catalog(&payload);
        assert_eq!(widgets[0].name, "cpu");
    }

    #[test]
    fn parse_catalog_tolerates_non_array_payload() {
        let (widgets, warnings) = parse_catalog(&json!({"oops": true}));
        assert!(widgets.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn widget_builders_set_config_payload() {
        let widget = Widget::new("a", "stats", "A").with_raw_config("{}");
        assert!(matches!(widget.config, ConfigPayload::Raw(_)));
    }
}
