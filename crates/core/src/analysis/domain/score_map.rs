use serde_json::Value;

use crate::analysis::domain::transport_error::TransportError;

/// Named percentage scores, in the order the service returned them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreMap {
    entries: Vec<(String, f64)>,
}

impl ScoreMap {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Interprets a response body.
    ///
    /// An object carrying an `error` key is a rejection. Non-numeric
    /// entries are skipped.
    pub fn from_json(body: &Value) -> Result<Self, TransportError> {
        let Value::Object(fields) = body else {
            return Err(TransportError::InvalidResponse(format!(
                "expected a JSON object, got {body}"
            )));
        };

        if let Some(error) = fields.get("error") {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(TransportError::Rejected(message));
        }

        let mut entries = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            match value.as_f64() {
                Some(score) => entries.push((name.clone(), score)),
                None => log::warn!("Ignoring non-numeric score {name:?}: {value}"),
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keeps_response_order() {
        let body: Value =
            serde_json::from_str(r#"{"overall": 91.5, "eyes": 97, "jaw_line": 84}"#).unwrap();
        let scores = ScoreMap::from_json(&body).unwrap();

        let names: Vec<&str> = scores.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["overall", "eyes", "jaw_line"]);
        assert_eq!(scores.get("eyes"), Some(97.0));
    }

    #[test]
    fn test_error_key_is_rejection() {
        let body = json!({"error": "No face detected"});
        assert_eq!(
            ScoreMap::from_json(&body),
            Err(TransportError::Rejected("No face detected".into()))
        );
    }

    #[test]
    fn test_non_object_is_invalid() {
        let result = ScoreMap::from_json(&json!([1, 2, 3]));
        assert!(matches!(result, Err(TransportError::InvalidResponse(_))));
    }

    #[test]
    fn test_non_numeric_entries_skipped() {
        let scores = ScoreMap::from_json(&json!({"eyes": 90, "note": "ok"})).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get("note"), None);
    }

    #[test]
    fn test_empty_object_is_empty_map() {
        let scores = ScoreMap::from_json(&json!({})).unwrap();
        assert!(scores.is_empty());
    }
}
