//! Two-stage widget config normalization.
//!
//! Already-structured payloads pass through untouched; string payloads are
//! decoded as JSON; anything undecodable degrades to an empty-object default
//! carrying the decode error. Structural failures become values, never
//! errors or panics.

use serde_json::{Map, Value};

use crate::widget::ConfigPayload;

/// Outcome of normalizing a widget's raw configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedConfig {
    /// Payload arrived already structured (or absent) and is used as-is.
    Structured(Value),
    /// Payload arrived as a string and decoded cleanly.
    Decoded(Value),
    /// Payload was a string that failed to decode; an empty object stands in.
    Defaulted { value: Value, reason: String },
}

impl NormalizedConfig {
    /// The usable configuration in every variant.
    #[must_use]
    pub fn value(&self) -> &Value {
        match self {
            Self::Structured(value) | Self::Decoded(value) => value,
            Self::Defaulted { value, .. } => value,
        }
    }

    /// True when the widget should be treated as degraded.
    #[must_use]
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted { .. })
    }

    #[must_use]
    pub fn defaulted_reason(&self) -> Option<&str> {
        match self {
            Self::Defaulted { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Normalize a raw config payload.
///
/// A missing payload (or an all-whitespace string) is an empty structured
/// object, not a failure; only a present-but-undecodable string counts as
/// invalid configuration.
#[must_use]
pub fn normalize_config(payload: &ConfigPayload) -> NormalizedConfig {
    match payload {
        ConfigPayload::Structured(value) => NormalizedConfig::Structured(value.clone()),
        ConfigPayload::Missing => NormalizedConfig::Structured(empty_object()),
        ConfigPayload::Raw(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return NormalizedConfig::Structured(empty_object());
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(value) => NormalizedConfig::Decoded(value),
                Err(err) => NormalizedConfig::Defaulted {
                    value: empty_object(),
                    reason: format!("invalid config json: {err}"),
                },
            }
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{normalize_config, NormalizedConfig};
    use crate::widget::ConfigPayload;
    use serde_json::json;

    #[test]
    fn structured_payload_passes_through_unchanged() {
        let payload = ConfigPayload::Structured(json!({"unit": "USD"}));
        let normalized = normalize_config(&payload);
        assert_eq!(normalized, NormalizedConfig::Structured(json!({"unit": "USD"})));
        assert!(!normalized.is_defaulted());
    }

    #[test]
    fn raw_string_decodes_to_structured_data() {
        let payload = ConfigPayload::Raw("{\"max\": 5}".to_owned());
        let normalized = normalize_config(&payload);
        assert_eq!(normalized, NormalizedConfig::Decoded(json!({"max": 5})));
    }

    #[test]
    fn undecodable_string_defaults_with_reason() {
        let payload = ConfigPayload::Raw("{nope".to_owned());
        let normalized = normalize_config(&payload);
        assert!(normalized.is_defaulted());
        assert_eq!(normalized.value(), &json!({}));
        assert!(normalized
            .defaulted_reason()
            .map(|reason| reason.contains("invalid config json"))
            .unwrap_or(false));
    }

    #[test]
    fn missing_and_blank_payloads_are_empty_objects_not_failures() {
        for payload in [ConfigPayload::Missing, ConfigPayload::Raw("   ".to_owned())] {
            let normalized = normalize_config(&payload);
            assert!(!normalized.is_defaulted());
            assert_eq!(normalized.value(), &json!({}));
        }
    }
}
