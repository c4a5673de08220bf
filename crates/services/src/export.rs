use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use qrlearn_core::defaults::DATA_VERSION;
use qrlearn_core::model::{History, Question, Statistics};

use crate::error::ExportError;

/// Everything the app persists, as one portable document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub questions: Vec<Question>,
    pub statistics: Statistics,
    pub history: History,
    /// ISO-8601 with millisecond precision, e.g. `2023-11-14T22:13:20.000Z`.
    pub export_date: String,
    pub version: String,
}

impl ExportDocument {
    #[must_use]
    pub fn new(
        questions: Vec<Question>,
        statistics: Statistics,
        history: History,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            questions,
            statistics,
            history,
            export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            version: DATA_VERSION.to_string(),
        }
    }

    /// Pretty-printed JSON, two-space indented.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Json` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested download name, `qr-learning-data-<epoch millis>.json`.
    #[must_use]
    pub fn file_name(exported_at: DateTime<Utc>) -> String {
        format!("qr-learning-data-{}.json", exported_at.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use qrlearn_core::defaults::default_questions;
    use qrlearn_core::time::fixed_now;

    #[test]
    fn document_uses_wire_names() {
        let doc = ExportDocument::new(
            default_questions(),
            Statistics::default(),
            History::default(),
            fixed_now(),
        );
        let json = doc.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["exportDate"], "2023-11-14T22:13:20.000Z");
        assert_eq!(value["version"], "3.0");
        assert_eq!(value["questions"][0]["correctAnswer"], "START");
        assert_eq!(value["statistics"]["totalCompletions"], 0);
        assert!(value["statistics"]["bestTime"].is_null());
        assert_eq!(value["history"], serde_json::json!([]));
        assert!(json.contains("\n  \"questions\""));
    }

    #[test]
    fn file_name_uses_millis() {
        assert_eq!(
            ExportDocument::file_name(fixed_now()),
            "qr-learning-data-1700000000000.json"
        );
    }
}
