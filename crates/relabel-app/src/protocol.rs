// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{EditableField, RecordKind, SearchResult, SourceType};

/// Path the HTTP listener serves requests on.
pub const API_PATH: &str = "/api/translations";

/// A request on the single client/server channel, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Request {
    Search(SearchRequest),
    Update {
        #[serde(default, deserialize_with = "lenient_record")]
        record: UpdateRecord,
    },
}

impl Request {
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Search(_) => "search",
            Self::Update { .. } => "update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub search_term: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub table_name: String,
    #[serde(default, deserialize_with = "lenient_source_type")]
    pub source_type: SourceType,
}

/// Update payload: the target record plus the edited fields, flattened the
/// way the wire format carries them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateRecord {
    #[serde(
        rename = "sys_id",
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        rename = "recordType",
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub record_type: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl UpdateRecord {
    pub fn new(id: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            id: Some(id.into()),
            record_type: Some(kind.as_str().to_owned()),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: EditableField, value: impl Into<String>) -> Self {
        self.fields
            .insert(field.as_str().to_owned(), Value::String(value.into()));
        self
    }

    pub fn kind(&self) -> RecordKind {
        RecordKind::from_discriminator(self.record_type.as_deref())
    }

    /// Trimmed identifier, `None` when missing or blank.
    pub fn identifier(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Value supplied for a field. Null, arrays and objects count as absent;
    /// numbers and booleans are taken as their text form.
    pub fn value_for(&self, field: EditableField) -> Option<String> {
        text_form(self.fields.get(field.as_str())?)
    }
}

fn text_form(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// Request fields decode leniently: a wrongly typed value reaches the services
// as "not supplied" and is answered with a message instead of a 400.

fn lenient_optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(text_form))
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_text(deserializer)?.unwrap_or_default())
}

fn lenient_source_type<'de, D>(deserializer: D) -> std::result::Result<SourceType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|raw| SourceType::parse(raw.trim()))
        .unwrap_or_default())
}

fn lenient_record<'de, D>(deserializer: D) -> std::result::Result<UpdateRecord, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).map_err(D::Error::custom),
        _ => Ok(UpdateRecord::default()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub selected_table: String,
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub applied_tables: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub debug_messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<SearchResult>,
}

impl UpdateOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            record: None,
        }
    }

    pub fn saved(message: impl Into<String>, record: SearchResult) -> Self {
        Self {
            success: true,
            message: message.into(),
            record: Some(record),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    #[serde(default)]
    pub update_response: UpdateOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub debug_messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Search(SearchResponse),
    Update(UpdateResponse),
}

impl Response {
    pub fn server_error(&self) -> Option<&str> {
        match self {
            Self::Search(response) => response.server_error.as_deref(),
            Self::Update(response) => response.server_error.as_deref(),
        }
    }
}

/// The channel the view-model talks through. An `Err` means the request
/// never produced a response (connection refused, timeout, undecodable
/// body); server-side failures arrive as data inside `Ok`.
pub trait Transport {
    fn search(&mut self, request: &SearchRequest) -> Result<SearchResponse>;
    fn update(&mut self, record: &UpdateRecord) -> Result<UpdateResponse>;
}

#[cfg(test)]
mod tests {
    use super::{Request, SearchRequest, UpdateRecord};
    use crate::{EditableField, RecordKind, SourceType};
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn update_request_decodes_flattened_fields() -> Result<()> {
        let request: Request = serde_json::from_value(json!({
            "action": "update",
            "record": {
                "sys_id": "abc",
                "recordType": "choice",
                "label": "New Label",
                "hint": null,
                "sequence": 4
            }
        }))?;

        let Request::Update { record } = request else {
            panic!("expected update request");
        };
        assert_eq!(record.identifier(), Some("abc"));
        assert_eq!(record.kind(), RecordKind::Choice);
        assert_eq!(
            record.value_for(EditableField::Label).as_deref(),
            Some("New Label")
        );
        assert_eq!(record.value_for(EditableField::Hint), None);
        assert_eq!(record.value_for(EditableField::Help), None);
        Ok(())
    }

    #[test]
    fn search_request_defaults_missing_fields() -> Result<()> {
        let request: Request = serde_json::from_value(json!({
            "action": "search",
            "searchTerm": "login"
        }))?;
        assert_eq!(
            request,
            Request::Search(SearchRequest {
                search_term: "login".to_owned(),
                table_name: String::new(),
                source_type: SourceType::All,
            })
        );
        Ok(())
    }

    #[test]
    fn update_record_builder_serializes_wire_shape() -> Result<()> {
        let record = UpdateRecord::new("d1", RecordKind::Documentation)
            .with_field(EditableField::Help, "");
        let json = serde_json::to_value(Request::Update { record })?;
        assert_eq!(
            json,
            json!({
                "action": "update",
                "record": {"sys_id": "d1", "recordType": "documentation", "help": ""}
            })
        );
        Ok(())
    }

    #[test]
    fn update_without_usable_record_decodes_as_unidentified() -> Result<()> {
        for body in [
            json!({"action": "update"}),
            json!({"action": "update", "record": null}),
            json!({"action": "update", "record": "abc"}),
        ] {
            let request: Request = serde_json::from_value(body.clone())?;
            let Request::Update { record } = request else {
                panic!("expected update request for {body}");
            };
            assert_eq!(record.identifier(), None, "{body}");
            assert_eq!(record.kind(), RecordKind::Documentation);
        }
        Ok(())
    }

    #[test]
    fn update_identifier_accepts_numbers_and_drops_other_shapes() -> Result<()> {
        let request: Request = serde_json::from_value(json!({
            "action": "update",
            "record": {"sys_id": 42, "recordType": null, "label": "x"}
        }))?;
        let Request::Update { record } = request else {
            panic!("expected update request");
        };
        assert_eq!(record.identifier(), Some("42"));
        assert_eq!(record.kind(), RecordKind::Documentation);
        assert_eq!(record.value_for(EditableField::Label).as_deref(), Some("x"));

        let request: Request = serde_json::from_value(json!({
            "action": "update",
            "record": {"sys_id": {"value": "abc"}, "recordType": "choice"}
        }))?;
        let Request::Update { record } = request else {
            panic!("expected update request");
        };
        assert_eq!(record.identifier(), None);
        assert_eq!(record.kind(), RecordKind::Choice);
        Ok(())
    }

    #[test]
    fn search_request_tolerates_null_and_mistyped_fields() -> Result<()> {
        let request: Request = serde_json::from_str(
            r#"{"action":"search","searchTerm":null,"tableName":7,"sourceType":"tables"}"#,
        )?;
        assert_eq!(
            request,
            Request::Search(SearchRequest {
                search_term: String::new(),
                table_name: "7".to_owned(),
                source_type: SourceType::All,
            })
        );

        let request: Request = serde_json::from_str(
            r#"{"action":"search","searchTerm":"state","tableName":"task","sourceType":"choice"}"#,
        )?;
        let Request::Search(search) = request else {
            panic!("expected search request");
        };
        assert_eq!(search.source_type, SourceType::Choice);
        Ok(())
    }

    #[test]
    fn blank_identifier_is_missing() {
        let record = UpdateRecord {
            id: Some("   ".to_owned()),
            ..UpdateRecord::default()
        };
        assert_eq!(record.identifier(), None);
    }
}
