use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned identifier of a [`TodoItem`].
pub type TodoId = i64;

/// One persisted to-do entry, as stored and as pushed to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    #[serde(alias = "Id")]
    pub id: TodoId,
    #[serde(default, alias = "Title", deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, alias = "Description", deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, alias = "IsCompleted")]
    pub is_completed: bool,
}

/// Payload of an add command. Any `id` the UI sends along is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDraft {
    #[serde(default, alias = "Title", deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, alias = "Description", deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, alias = "IsCompleted")]
    pub is_completed: bool,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }

    /// Attach the id the store assigned on insert.
    pub fn into_item(self, id: TodoId) -> TodoItem {
        TodoItem {
            id,
            title: self.title,
            description: self.description,
            is_completed: self.is_completed,
        }
    }
}

/// JSON `null` reads as an empty string, matching rows written without a description.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_serializes_lower_camel_case() {
        let item = TodoItem {
            id: 7,
            title: "Buy milk".into(),
            description: String::new(),
            is_completed: false,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "Buy milk",
                "description": "",
                "isCompleted": false
            })
        );
    }

    #[test]
    fn item_accepts_pascal_case_fields() {
        let item: TodoItem = serde_json::from_str(
            r#"{"Id": 3, "Title": "Walk dog", "Description": "twice", "IsCompleted": true}"#,
        )
        .unwrap();
        assert_eq!(item.id, 3);
        assert_eq!(item.title, "Walk dog");
        assert_eq!(item.description, "twice");
        assert!(item.is_completed);
    }

    #[test]
    fn draft_ignores_id_and_defaults_missing_fields() {
        let draft: TodoDraft = serde_json::from_str(r#"{"id": 99, "title": "Call mom"}"#).unwrap();
        assert_eq!(draft, TodoDraft::new("Call mom"));
        assert!(!draft.is_completed);
        assert!(draft.description.is_empty());
    }

    #[test]
    fn null_description_reads_as_empty() {
        let item: TodoItem =
            serde_json::from_str(r#"{"id": 1, "title": "", "description": null}"#).unwrap();
        assert_eq!(item.description, "");
        assert_eq!(item.title, "");
        assert!(!item.is_completed);
    }
}
