//! Widget factory: explicit kind-to-renderer dispatch with a placeholder
//! fallback.
//!
//! Dispatch is an exact string match against a registration table. Adding a
//! widget kind is a localized `register` call, never a shape guess. Unknown
//! kinds and undecodable configs both degrade to a placeholder directive
//! with distinct, observable reasons.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::config::{normalize_config, NormalizedConfig};
use crate::widget::{Widget, WidgetId};

/// Why a widget rendered as a placeholder instead of its own panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderReason {
    UnknownKind,
    InvalidConfig,
}

impl PlaceholderReason {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownKind => "widget type not recognized",
            Self::InvalidConfig => "configuration invalid",
        }
    }
}

/// Safe fallback output carrying enough context to diagnose the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderDirective {
    pub widget_id: WidgetId,
    pub name: String,
    pub raw_kind: String,
    pub reason: PlaceholderReason,
    pub detail: Option<String>,
}

/// A concrete typed render request for one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelDirective {
    pub widget_id: WidgetId,
    pub kind: String,
    pub title: String,
    pub body: PanelBody,
}

/// One render directive per reconciled widget id.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderDirective {
    Panel(PanelDirective),
    Placeholder(PlaceholderDirective),
}

impl RenderDirective {
    #[must_use]
    pub fn widget_id(&self) -> &WidgetId {
        match self {
            Self::Panel(panel) => &panel.widget_id,
            Self::Placeholder(placeholder) => &placeholder.widget_id,
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Typed bodies produced by the stock renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelBody {
    Stats(StatsSpec),
    List(ListSpec),
    Chart(ChartSpec),
    Table(TableSpec),
    Note(NoteSpec),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsSpec {
    pub label: String,
    pub value: String,
    pub unit: Option<String>,
    pub trend_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSpec {
    pub items: Vec<String>,
    pub max_visible: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub series: Vec<f64>,
    pub y_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSpec {
    pub text: String,
}

/// Rendering strategy for one widget kind.
///
/// `render` receives the already-normalized config and must be total:
/// missing fields get defaults, never errors.
pub trait WidgetRenderer: Send + Sync {
    fn kind(&self) -> &str;
    fn render(&self, widget: &Widget, config: &Value) -> PanelBody;
}

/// The dispatch table from kind tag to renderer.
pub struct WidgetRegistry {
    renderers: BTreeMap<String, Box<dyn WidgetRenderer>>,
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WidgetRegistry {
    /// A registry with no renderers; everything renders as a placeholder.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            renderers: BTreeMap::new(),
        }
    }

    /// The stock renderer set: stats, list, chart, table, note.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(StatsRenderer));
        registry.register(Box::new(ListRenderer));
        registry.register(Box::new(ChartRenderer));
        registry.register(Box::new(TableRenderer));
        registry.register(Box::new(NoteRenderer));
        registry
    }

    /// Add or replace the renderer for its kind.
    pub fn register(&mut self, renderer: Box<dyn WidgetRenderer>) {
        self.renderers.insert(renderer.kind().to_owned(), renderer);
    }

    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.renderers.contains_key(kind)
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        self.renderers.keys().map(String::as_str).collect()
    }

    /// Produce the render directive for one widget.
    #[must_use]
    pub fn render(&self, widget: &Widget) -> RenderDirective {
        let Some(renderer) = self.renderers.get(widget.kind.as_str()) else {
            return RenderDirective::Placeholder(PlaceholderDirective {
                widget_id: widget.id.clone(),
                name: widget.name.clone(),
                raw_kind: widget.kind.clone(),
                reason: PlaceholderReason::UnknownKind,
                detail: None,
            });
        };

        let normalized = normalize_config(&widget.config);
        if let NormalizedConfig::Defaulted { reason, .. } = &normalized {
            return RenderDirective::Placeholder(PlaceholderDirective {
                widget_id: widget.id.clone(),
                name: widget.name.clone(),
                raw_kind: widget.kind.clone(),
                reason: PlaceholderReason::InvalidConfig,
                detail: Some(reason.clone()),
            });
        }

        RenderDirective::Panel(PanelDirective {
            widget_id: widget.id.clone(),
            kind: widget.kind.clone(),
            title: widget.name.clone(),
            body: renderer.render(widget, normalized.value()),
        })
    }
}

// ---------------------------------------------------------------------------
// Stock renderers
// ---------------------------------------------------------------------------

struct StatsRenderer;

impl WidgetRenderer for StatsRenderer {
    fn kind(&self) -> &str {
        "stats"
    }

    fn render(&self, widget: &Widget, config: &Value) -> PanelBody {
        PanelBody::Stats(StatsSpec {
            label: string_field(config, "label").unwrap_or_else(|| widget.name.clone()),
            value: string_field(config, "value").unwrap_or_else(|| "--".to_owned()),
            unit: string_field(config, "unit"),
            trend_pct: config.get("trend_pct").and_then(Value::as_f64),
        })
    }
}

struct ListRenderer;

impl WidgetRenderer for ListRenderer {
    fn kind(&self) -> &str {
        "list"
    }

    fn render(&self, _widget: &Widget, config: &Value) -> PanelBody {
        let items = config
            .get("items")
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(display_string).collect())
            .unwrap_or_default();
        let max_visible = config
            .get("max")
            .and_then(Value::as_u64)
            .map(|max| max as usize)
            .filter(|max| *max > 0)
            .unwrap_or(10);
        PanelBody::List(ListSpec { items, max_visible })
    }
}

struct ChartRenderer;

impl WidgetRenderer for ChartRenderer {
    fn kind(&self) -> &str {
        "chart"
    }

    fn render(&self, _widget: &Widget, config: &Value) -> PanelBody {
        let series = config
            .get("series")
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(Value::as_f64).collect())
            .unwrap_or_default();
        PanelBody::Chart(ChartSpec {
            series,
            y_label: string_field(config, "y_label"),
        })
    }
}

struct TableRenderer;

impl WidgetRenderer for TableRenderer {
    fn kind(&self) -> &str {
        "table"
    }

    fn render(&self, _widget: &Widget, config: &Value) -> PanelBody {
        let columns = config
            .get("columns")
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(display_string).collect())
            .unwrap_or_default();
        let rows = config
            .get("rows")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .filter_map(Value::as_array)
                    .map(|cells| cells.iter().filter_map(display_string).collect())
                    .collect()
            })
            .unwrap_or_default();
        PanelBody::Table(TableSpec { columns, rows })
    }
}

struct NoteRenderer;

impl WidgetRenderer for NoteRenderer {
    fn kind(&self) -> &str {
        "note"
    }

    fn render(&self, _widget: &Widget, config: &Value) -> PanelBody {
        PanelBody::Note(NoteSpec {
            text: string_field(config, "text").unwrap_or_default(),
        })
    }
}

fn string_field(config: &Value, key: &str) -> Option<String> {
    config
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn display_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(num) => Some(num.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
