use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Error payload returned by the external backend on non-success responses.
///
/// `detail` is either a list (one entry per failed field, each with a `msg`)
/// or a single string.
#[derive(Deserialize, Debug, Default)]
pub struct UpstreamErrorBody {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl UpstreamErrorBody {
    /// Flatten `detail` into human-readable messages.
    pub fn messages(&self) -> Vec<String> {
        match &self.detail {
            serde_json::Value::Array(items) => items.iter().map(detail_item_message).collect(),
            serde_json::Value::String(s) => vec![s.clone()],
            serde_json::Value::Null => Vec::new(),
            other => vec![other.to_string()],
        }
    }
}

fn detail_item_message(item: &serde_json::Value) -> String {
    if let Some(s) = item.as_str() {
        return s.to_string();
    }
    let msg = item.get("msg").and_then(|m| m.as_str());
    let loc = item.get("loc").and_then(|l| l.as_array()).map(|parts| {
        parts
            .iter()
            .map(|p| p.as_str().map(str::to_string).unwrap_or_else(|| p.to_string()))
            .collect::<Vec<_>>()
            .join(".")
    });
    match (loc, msg) {
        (Some(loc), Some(msg)) if !loc.is_empty() => format!("{loc}: {msg}"),
        (_, Some(msg)) => msg.to_string(),
        _ => item.to_string(),
    }
}
