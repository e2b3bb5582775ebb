use chrono::{DateTime, Utc};
use plan_canvas::model::GraphState;
use plan_canvas::persistence::GraphSnapshot;

use crate::ExportError;

/// `<base>-<YYYY-MM-DD>.<ext>`, dated in UTC.
pub fn file_name(base: &str, at: DateTime<Utc>, ext: &str) -> String {
    format!("{base}-{}.{ext}", at.format("%Y-%m-%d"))
}

/// A generated JSON backup file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonDocument {
    pub file_name: String,
    pub contents: String,
}

impl JsonDocument {
    pub const MIME: &'static str = "application/json";
}

pub fn export_json(graph: &GraphState, base: &str) -> Result<JsonDocument, ExportError> {
    export_json_at(graph, base, Utc::now())
}

/// Serializes `{version, exportedAt, nodes, edges}`.
pub fn export_json_at(
    graph: &GraphState,
    base: &str,
    now: DateTime<Utc>,
) -> Result<JsonDocument, ExportError> {
    let contents = GraphSnapshot::at(graph, now).to_json_pretty()?;
    Ok(JsonDocument {
        file_name: file_name(base, now, "json"),
        contents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_uses_utc_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();
        assert_eq!(file_name("program-plan", at, "png"), "program-plan-2024-03-09.png");
    }

    #[test]
    fn json_has_version_and_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap();
        let doc = export_json_at(&GraphState::default(), "plan", at).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc.contents).unwrap();
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["exportedAt"], "2024-03-09T08:00:00.000Z");
        assert_eq!(value["nodes"], serde_json::json!([]));
        assert_eq!(doc.file_name, "plan-2024-03-09.json");
    }
}
