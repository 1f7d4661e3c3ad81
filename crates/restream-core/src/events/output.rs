//! Output line events (`ffmpeg_output` channel).

use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::domain::LineCategory;

/// One line of process output addressed to a stream.
///
/// Wire shape: `{ "url": "...", "output": "...", "type": "..." }`.
/// Every field is optional on the wire; missing or `null` fields decode to
/// their defaults instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputEvent {
    /// Identifier of the target stream record.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// The line text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub output: String,
    /// Category tag.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: LineCategory,
}

impl OutputEvent {
    /// Create a new output event.
    pub fn new(
        url: impl Into<String>,
        output: impl Into<String>,
        kind: impl Into<LineCategory>,
    ) -> Self {
        Self {
            url: url.into(),
            output: output.into(),
            kind: kind.into(),
        }
    }

    /// Decode a raw channel payload.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_payload() {
        let event = OutputEvent::from_value(json!({
            "url": "https://youtu.be/abc",
            "output": "frame=  120 fps= 30",
            "type": "stderr",
        }))
        .unwrap();

        assert_eq!(event.url, "https://youtu.be/abc");
        assert_eq!(event.output, "frame=  120 fps= 30");
        assert_eq!(event.kind, LineCategory::Stderr);
    }

    #[test]
    fn test_missing_fields_decode_to_defaults() {
        let event = OutputEvent::from_value(json!({ "url": "a" })).unwrap();
        assert_eq!(event.output, "");
        assert_eq!(event.kind, LineCategory::Info);
    }

    #[test]
    fn test_null_fields_decode_to_defaults() {
        let event =
            OutputEvent::from_value(json!({ "url": "a", "output": null, "type": null })).unwrap();
        assert_eq!(event, OutputEvent::new("a", "", LineCategory::Info));
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        assert!(OutputEvent::from_value(json!("just a string")).is_err());
        assert!(OutputEvent::from_value(json!({ "url": 42 })).is_err());
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let json = serde_json::to_string(&OutputEvent::new("a", "hi", "info")).unwrap();
        assert!(json.contains("\"type\":\"info\""));
    }
}
