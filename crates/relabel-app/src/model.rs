// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditableField {
    Label,
    Plural,
    Hint,
    Help,
}

impl EditableField {
    /// Priority order, also used when picking a default bulk field.
    pub const ALL: [Self; 4] = [Self::Label, Self::Plural, Self::Hint, Self::Help];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Plural => "plural",
            Self::Hint => "hint",
            Self::Help => "help",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "label" => Some(Self::Label),
            "plural" => Some(Self::Plural),
            "hint" => Some(Self::Hint),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

const DOCUMENTATION_FIELDS: [EditableField; 4] = EditableField::ALL;
const CHOICE_FIELDS: [EditableField; 1] = [EditableField::Label];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Documentation,
    Choice,
}

impl RecordKind {
    pub const ALL: [Self; 2] = [Self::Documentation, Self::Choice];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Documentation => "documentation",
            Self::Choice => "choice",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "documentation" => Some(Self::Documentation),
            "choice" => Some(Self::Choice),
            _ => None,
        }
    }

    /// Routes an update discriminator; anything unrecognized is documentation.
    pub fn from_discriminator(value: Option<&str>) -> Self {
        value
            .and_then(|raw| Self::parse(raw.trim()))
            .unwrap_or(Self::Documentation)
    }

    pub const fn editable_fields(self) -> &'static [EditableField] {
        match self {
            Self::Documentation => &DOCUMENTATION_FIELDS,
            Self::Choice => &CHOICE_FIELDS,
        }
    }

    pub fn is_editable(self, field: EditableField) -> bool {
        self.editable_fields().contains(&field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    All,
    Documentation,
    Choice,
}

impl SourceType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Documentation => "documentation",
            Self::Choice => "choice",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "documentation" => Some(Self::Documentation),
            "choice" => Some(Self::Choice),
            _ => None,
        }
    }

    pub fn includes(self, kind: RecordKind) -> bool {
        match self {
            Self::All => true,
            Self::Documentation => kind == RecordKind::Documentation,
            Self::Choice => kind == RecordKind::Choice,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDocEntry {
    #[serde(rename = "sys_id")]
    pub id: RecordId,
    #[serde(rename = "name")]
    pub table_name: String,
    #[serde(rename = "element")]
    pub element_name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub plural: String,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub editable_fields: Vec<EditableField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceEntry {
    #[serde(rename = "sys_id")]
    pub id: RecordId,
    #[serde(rename = "name")]
    pub table_name: String,
    #[serde(rename = "element")]
    pub element_name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub dependent_value: String,
    #[serde(default)]
    pub sequence: i64,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub editable_fields: Vec<EditableField>,
}

/// One translatable record as seen by the editor, tagged by `recordType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "recordType", rename_all = "lowercase")]
pub enum SearchResult {
    Documentation(FieldDocEntry),
    Choice(ChoiceEntry),
}

impl SearchResult {
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Documentation(_) => RecordKind::Documentation,
            Self::Choice(_) => RecordKind::Choice,
        }
    }

    pub fn id(&self) -> &RecordId {
        match self {
            Self::Documentation(entry) => &entry.id,
            Self::Choice(entry) => &entry.id,
        }
    }

    pub fn table_name(&self) -> &str {
        match self {
            Self::Documentation(entry) => &entry.table_name,
            Self::Choice(entry) => &entry.table_name,
        }
    }

    pub fn element_name(&self) -> &str {
        match self {
            Self::Documentation(entry) => &entry.element_name,
            Self::Choice(entry) => &entry.element_name,
        }
    }

    pub fn language(&self) -> &str {
        match self {
            Self::Documentation(entry) => &entry.language,
            Self::Choice(entry) => &entry.language,
        }
    }

    pub fn scope(&self) -> &str {
        match self {
            Self::Documentation(entry) => &entry.scope,
            Self::Choice(entry) => &entry.scope,
        }
    }

    /// The list carried on the record itself; empty when the sender left it
    /// out.
    pub fn declared_editable_fields(&self) -> &[EditableField] {
        match self {
            Self::Documentation(entry) => &entry.editable_fields,
            Self::Choice(entry) => &entry.editable_fields,
        }
    }

    /// Editable fields as sent by the server, or the variant's own set when
    /// the server sent none.
    pub fn editable_fields(&self) -> &[EditableField] {
        let declared = self.declared_editable_fields();
        if declared.is_empty() {
            self.kind().editable_fields()
        } else {
            declared
        }
    }

    /// Canonical value of an editable field; `None` when the variant has no
    /// such column.
    pub fn field(&self, field: EditableField) -> Option<&str> {
        match (self, field) {
            (Self::Documentation(entry), EditableField::Label) => Some(&entry.label),
            (Self::Documentation(entry), EditableField::Plural) => Some(&entry.plural),
            (Self::Documentation(entry), EditableField::Hint) => Some(&entry.hint),
            (Self::Documentation(entry), EditableField::Help) => Some(&entry.help),
            (Self::Choice(entry), EditableField::Label) => Some(&entry.label),
            (Self::Choice(_), _) => None,
        }
    }

    pub fn set_field(&mut self, field: EditableField, value: impl Into<String>) -> bool {
        let slot = match (self, field) {
            (Self::Documentation(entry), EditableField::Label) => &mut entry.label,
            (Self::Documentation(entry), EditableField::Plural) => &mut entry.plural,
            (Self::Documentation(entry), EditableField::Hint) => &mut entry.hint,
            (Self::Documentation(entry), EditableField::Help) => &mut entry.help,
            (Self::Choice(entry), EditableField::Label) => &mut entry.label,
            (Self::Choice(_), _) => return false,
        };
        *slot = value.into();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ChoiceEntry, EditableField, FieldDocEntry, RecordKind, SearchResult, SourceType,
    };
    use crate::RecordId;

    fn choice() -> SearchResult {
        SearchResult::Choice(ChoiceEntry {
            id: RecordId::new("c1"),
            table_name: "incident".to_owned(),
            element_name: "state".to_owned(),
            label: "New".to_owned(),
            value: "1".to_owned(),
            dependent_value: String::new(),
            sequence: 1,
            language: "en".to_owned(),
            scope: "global".to_owned(),
            editable_fields: Vec::new(),
        })
    }

    #[test]
    fn unknown_discriminator_routes_to_documentation() {
        assert_eq!(RecordKind::from_discriminator(None), RecordKind::Documentation);
        assert_eq!(
            RecordKind::from_discriminator(Some("sys_choice")),
            RecordKind::Documentation
        );
        assert_eq!(
            RecordKind::from_discriminator(Some("choice")),
            RecordKind::Choice
        );
    }

    #[test]
    fn choice_only_exposes_label() {
        let mut result = choice();
        assert_eq!(result.editable_fields(), &[EditableField::Label]);
        assert_eq!(result.field(EditableField::Help), None);
        assert!(!result.set_field(EditableField::Hint, "nope"));
        assert!(result.set_field(EditableField::Label, "Fresh"));
        assert_eq!(result.field(EditableField::Label), Some("Fresh"));
    }

    #[test]
    fn serialized_result_carries_record_type_tag() -> anyhow::Result<()> {
        let result = SearchResult::Documentation(FieldDocEntry {
            id: RecordId::new("d1"),
            table_name: "task".to_owned(),
            element_name: "short_description".to_owned(),
            label: "Short description".to_owned(),
            plural: String::new(),
            hint: String::new(),
            help: String::new(),
            language: "en".to_owned(),
            scope: "global".to_owned(),
            editable_fields: RecordKind::Documentation.editable_fields().to_vec(),
        });

        let json = serde_json::to_value(&result)?;
        assert_eq!(json["recordType"], "documentation");
        assert_eq!(json["sys_id"], "d1");
        assert_eq!(json["name"], "task");
        assert_eq!(json["element"], "short_description");
        assert_eq!(
            json["editableFields"],
            serde_json::json!(["label", "plural", "hint", "help"])
        );
        Ok(())
    }

    #[test]
    fn source_type_filters_kinds() {
        assert!(SourceType::All.includes(RecordKind::Choice));
        assert!(!SourceType::Documentation.includes(RecordKind::Choice));
        assert_eq!(SourceType::parse("choice"), Some(SourceType::Choice));
        assert_eq!(SourceType::parse("other"), None);
    }
}
