use crate::reporter::model::CaseResult;
use serde::ser::{Serialize, SerializeMap, Serializer};

const RESERVED_KEYS: &[&str] = &["case_id", "status_id", "comment", "elapsed", "version"];

impl Serialize for CaseResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("case_id", &self.case_id)?;
        map.serialize_entry("status_id", &self.status_id)?;
        if let Some(comment) = &self.comment {
            map.serialize_entry("comment", comment)?;
        }
        if let Some(elapsed) = &self.elapsed {
            map.serialize_entry("elapsed", elapsed)?;
        }
        if let Some(version) = &self.version {
            map.serialize_entry("version", version)?;
        }
        for (key, value) in &self.custom_fields {
            let shadowed = RESERVED_KEYS.contains(&key.as_str())
                || self.steps.as_ref().map_or(false, |steps| &steps.key == key);
            if !shadowed {
                map.serialize_entry(key, value)?;
            }
        }
        if let Some(steps) = &self.steps {
            map.serialize_entry(&steps.key, &steps.entries)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use crate::reporter::model::{CaseResult, StepResult, StepResults};
    use serde_json::json;

    #[test]
    fn test_flat_result_with_custom_fields() {
        let mut result = CaseResult::duplicate_failure("12", 1);
        result.comment = Some("C12 Status code is 200".to_owned());
        result.elapsed = Some("2s".to_owned());
        result.version = Some("1.0".to_owned());
        result.custom_fields.insert("custom_env".to_owned(), "staging".to_owned());
        result.custom_fields.insert("status_id".to_owned(), "9".to_owned());

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "case_id": "12",
                "status_id": 1,
                "comment": "C12 Status code is 200",
                "elapsed": "2s",
                "version": "1.0",
                "custom_env": "staging"
            })
        );
    }

    #[test]
    fn test_step_result_uses_configured_key() {
        let mut result = CaseResult::duplicate_failure("1", 5);
        result.steps = Some(StepResults {
            key: "custom_step_results".to_owned(),
            entries: vec![
                StepResult { status_id: 5, content: "C1 first".to_owned() },
                StepResult { status_id: 1, content: "C1 second".to_owned() },
            ],
        });

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "case_id": "1",
                "status_id": 5,
                "custom_step_results": [
                    { "status_id": 5, "content": "C1 first" },
                    { "status_id": 1, "content": "C1 second" }
                ]
            })
        );
    }

    #[test]
    fn test_duplicate_failure_has_only_id_and_status() {
        let result = CaseResult::duplicate_failure("7", 5);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "case_id": "7", "status_id": 5 })
        );
    }
}
