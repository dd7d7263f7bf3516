// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use relabel_app::{ChoiceEntry, FieldDocEntry, RecordKind, SearchResult};
use relabel_db::{ChoiceRow, DocumentationRow, ScopeRecord, StoredRecord};

/// The scope's code, else its display name, else "".
pub fn scope_label(scope: Option<&ScopeRecord>) -> String {
    let Some(scope) = scope else {
        return String::new();
    };
    if scope.scope.trim().is_empty() {
        scope.name.trim().to_owned()
    } else {
        scope.scope.trim().to_owned()
    }
}

pub fn documentation_result(row: DocumentationRow) -> SearchResult {
    let scope = scope_label(row.scope.as_ref());
    SearchResult::Documentation(FieldDocEntry {
        id: row.id,
        table_name: row.table_name,
        element_name: row.element,
        label: row.label,
        plural: row.plural,
        hint: row.hint,
        help: row.help,
        language: row.language,
        scope,
        editable_fields: RecordKind::Documentation.editable_fields().to_vec(),
    })
}

pub fn choice_result(row: ChoiceRow) -> SearchResult {
    let scope = scope_label(row.scope.as_ref());
    SearchResult::Choice(ChoiceEntry {
        id: row.id,
        table_name: row.table_name,
        element_name: row.element,
        label: row.label,
        value: row.value,
        dependent_value: row.dependent_value,
        sequence: row.sequence,
        language: row.language,
        scope,
        editable_fields: RecordKind::Choice.editable_fields().to_vec(),
    })
}

pub fn stored_result(record: StoredRecord) -> SearchResult {
    match record {
        StoredRecord::Documentation(row) => documentation_result(row),
        StoredRecord::Choice(row) => choice_result(row),
    }
}
