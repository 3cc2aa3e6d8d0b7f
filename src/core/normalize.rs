use crate::domain::model::{PositionReading, StructuredInterpretation};
use serde_json::{Map, Value};

/// Model output as a structured reading: JSON gets normalized, anything
/// else is kept whole as the overview.
pub fn parse_model_output(raw: &str) -> StructuredInterpretation {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value) => normalize(&value),
        Err(e) => {
            tracing::warn!("⚠️ Model output is not JSON ({}), keeping raw text as overview", e);
            StructuredInterpretation::from_raw_text(raw)
        }
    }
}

/// Backfill every field of the reading from whatever shape upstream sent.
pub fn normalize(value: &Value) -> StructuredInterpretation {
    let Value::Object(obj) = value else {
        return StructuredInterpretation::from_raw_text(&text(Some(value)));
    };

    let positions = match obj.get("positions") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(position)
            .collect(),
        _ => Vec::new(),
    };

    StructuredInterpretation {
        overview: text(obj.get("overview")),
        positions,
        synthesis: text(obj.get("synthesis")),
        actions_next_7_days: list(first_of(
            obj,
            &["actions_7days", "actionsNext7Days", "actions"],
        )),
        tone: text(obj.get("tone")),
    }
}

fn position(obj: &Map<String, Value>) -> PositionReading {
    PositionReading {
        label: text(obj.get("label")),
        card: text(obj.get("card")),
        key_themes: list(first_of(obj, &["keyThemes", "key_themes", "themes"])),
        opportunities: text(obj.get("opportunities")),
        cautions: text(obj.get("cautions")),
    }
}

fn first_of<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| obj.get(*key))
}

fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| text(Some(item)))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

fn list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| text(Some(item)))
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}
