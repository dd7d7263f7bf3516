// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use relabel_app::{EditableField, RecordId, RecordKind, TableId};
use relabel_db::{ChoiceRow, DocumentationRow, Store, StoredRecord, TableRecord, TextQuery, WriteMode};

/// What the services need from a catalog: table lookups, term search,
/// fetch by id and update by id.
pub trait RecordStore {
    fn find_table(&self, name: &str) -> Result<Option<TableRecord>>;
    fn get_table(&self, id: &TableId) -> Result<Option<TableRecord>>;
    fn search_documentation(&self, query: &TextQuery<'_>) -> Result<Vec<DocumentationRow>>;
    fn search_choices(&self, query: &TextQuery<'_>) -> Result<Vec<ChoiceRow>>;
    fn get_record(&self, kind: RecordKind, id: &RecordId) -> Result<Option<StoredRecord>>;
    fn update_record(
        &self,
        kind: RecordKind,
        id: &RecordId,
        changes: &[(EditableField, String)],
        mode: WriteMode,
    ) -> Result<()>;
}

impl RecordStore for Store {
    fn find_table(&self, name: &str) -> Result<Option<TableRecord>> {
        Store::find_table(self, name)
    }

    fn get_table(&self, id: &TableId) -> Result<Option<TableRecord>> {
        Store::get_table(self, id)
    }

    fn search_documentation(&self, query: &TextQuery<'_>) -> Result<Vec<DocumentationRow>> {
        Store::search_documentation(self, query)
    }

    fn search_choices(&self, query: &TextQuery<'_>) -> Result<Vec<ChoiceRow>> {
        Store::search_choices(self, query)
    }

    fn get_record(&self, kind: RecordKind, id: &RecordId) -> Result<Option<StoredRecord>> {
        Store::get_record(self, kind, id)
    }

    fn update_record(
        &self,
        kind: RecordKind,
        id: &RecordId,
        changes: &[(EditableField, String)],
        mode: WriteMode,
    ) -> Result<()> {
        Store::update_record(self, kind, id, changes, mode)
    }
}
