use crate::domain::errors::CallError;
use crate::domain::value_objects::{JsonPayload, PayloadSource};
use serde_json::{Map, Value};

/// Parses and combines the JSON fragments that make up a request body
pub struct PayloadMerger;

impl PayloadMerger {
    /// Parses one fragment. Absent or blank text and a JSON `null` are an
    /// empty object.
    pub fn parse(source: PayloadSource, text: Option<&str>) -> Result<JsonPayload, CallError> {
        let text = match text {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Ok(JsonPayload::default()),
        };

        serde_json::from_str::<Option<Map<String, Value>>>(text)
            .map(|map| JsonPayload(map.unwrap_or_default()))
            .map_err(|error| CallError::PayloadParse {
                origin: source,
                error,
            })
    }

    /// Shallow union of both fragments; inline values win on key collision.
    pub fn merge(file: JsonPayload, inline: JsonPayload) -> JsonPayload {
        let mut merged = file.0;
        for (key, value) in inline.0 {
            merged.insert(key, value);
        }
        JsonPayload(merged)
    }

    /// Parses both sources and merges them into the final body, if any.
    pub fn body(file: Option<&str>, inline: Option<&str>) -> Result<Option<Vec<u8>>, CallError> {
        let file = Self::parse(PayloadSource::File, file)?;
        let inline = Self::parse(PayloadSource::Inline, inline)?;
        let merged = Self::merge(file, inline);

        if merged.is_empty() {
            return Ok(None);
        }
        merged
            .to_bytes()
            .map(Some)
            .map_err(CallError::BodySerialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> JsonPayload {
        match value {
            Value::Object(map) => JsonPayload(map),
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn inline_overrides_file() {
        let merged = PayloadMerger::merge(
            payload(json!({"a": 1, "b": 2})),
            payload(json!({"b": 3, "c": 4})),
        );
        assert_eq!(merged, payload(json!({"a": 1, "b": 3, "c": 4})));
    }

    #[test]
    fn nested_objects_are_replaced_not_merged() {
        let merged = PayloadMerger::merge(
            payload(json!({"user": {"name": "a", "age": 3}})),
            payload(json!({"user": {"name": "b"}})),
        );
        assert_eq!(merged, payload(json!({"user": {"name": "b"}})));
    }

    #[test]
    fn absent_and_blank_sources_are_empty() {
        assert!(PayloadMerger::parse(PayloadSource::File, None).unwrap().is_empty());
        assert!(PayloadMerger::parse(PayloadSource::Inline, Some("  \n")).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_names_its_source() {
        let err = PayloadMerger::parse(PayloadSource::Inline, Some("{oops")).unwrap_err();
        match err {
            CallError::PayloadParse { origin, .. } => assert_eq!(origin, PayloadSource::Inline),
            other => panic!("unexpected error: {other}"),
        }
        assert!(
            PayloadMerger::body(Some("[1, 2]"), None)
                .unwrap_err()
                .to_string()
                .starts_with("parsing json-file JSON")
        );
    }

    #[test]
    fn null_fragment_is_empty() {
        assert!(PayloadMerger::parse(PayloadSource::File, Some("null")).unwrap().is_empty());
        assert_eq!(PayloadMerger::body(Some(" null "), Some("null")).unwrap(), None);
        assert_eq!(
            PayloadMerger::body(Some("null"), Some(r#"{"a": 1}"#)).unwrap(),
            Some(br#"{"a":1}"#.to_vec())
        );
    }

    #[test]
    fn empty_merge_produces_no_body() {
        assert_eq!(PayloadMerger::body(None, Some("{}")).unwrap(), None);
    }

    #[test]
    fn body_is_compact_json() {
        let body = PayloadMerger::body(Some(r#"{"a": 1}"#), Some(r#"{"b": true}"#))
            .unwrap()
            .unwrap();
        assert_eq!(body, br#"{"a":1,"b":true}"#);
    }
}
