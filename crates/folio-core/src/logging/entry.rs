//! One rendered log event.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A log event as a self-contained JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 timestamp with milliseconds (e.g. "2026-01-21T14:30:45.123Z")
    pub ts: String,

    /// trace, debug, info, warn or error
    pub level: String,

    /// Module path of the call site (e.g. "folio_core::effects::skills")
    pub target: String,

    pub msg: String,

    /// Structured fields recorded with the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,

    /// Enclosing spans, outermost first, joined with " > "
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<String>,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(
        level: impl Into<String>,
        target: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            level: level.into(),
            target: target.into(),
            msg: msg.into(),
            fields: None,
            span: None,
        }
    }

    pub fn with_fields(mut self, fields: Value) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_span(mut self, span: impl Into<String>) -> Self {
        self.span = Some(span.into());
        self
    }

    /// Serialize to a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serialization() {
        let entry = LogEntry::new("info", "folio_core::effects", "page effects wired");

        let json = entry.to_json_line().unwrap();
        assert!(json.contains("\"level\":\"info\""));
        assert!(json.contains("\"msg\":\"page effects wired\""));
        assert!(!json.contains("\"fields\""));
        assert!(!json.contains("\"span\""));

        let parsed = LogEntry::from_json_line(&json).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_entry_with_fields() {
        let entry = LogEntry::new("debug", "folio_core::effects::skills", "skill bars observed")
            .with_fields(serde_json::json!({ "count": 4, "threshold": 0.5 }))
            .with_span("boot");

        let json = entry.to_json_line().unwrap();
        assert!(json.contains("\"count\":4"));
        assert!(json.contains("\"threshold\":0.5"));
        assert!(json.contains("\"span\":\"boot\""));
    }

    #[test]
    fn test_timestamp_is_rfc3339_millis() {
        let entry = LogEntry::new("warn", "t", "m");
        let parsed = chrono::DateTime::parse_from_rfc3339(&entry.ts).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
        assert!(entry.ts.ends_with('Z'));
    }
}
