// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use crate::{EditableField, SearchResult};

/// Unsaved edits for one result, keyed by exactly that result's editable
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    values: BTreeMap<EditableField, String>,
}

impl Draft {
    pub fn for_record(record: &SearchResult, fields: &[EditableField]) -> Self {
        let values = fields
            .iter()
            .map(|field| {
                let value = record.field(*field).unwrap_or_default().to_owned();
                (*field, value)
            })
            .collect();
        Self { values }
    }

    pub fn contains(&self, field: EditableField) -> bool {
        self.values.contains_key(&field)
    }

    pub fn get(&self, field: EditableField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Sets a pending value. Fields outside the draft are rejected so the key
    /// set never drifts from the editable fields.
    pub fn set(&mut self, field: EditableField, value: impl Into<String>) -> bool {
        match self.values.get_mut(&field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = EditableField> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EditableField, &str)> {
        self.values
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }

    pub fn differs_from(&self, record: &SearchResult) -> bool {
        self.values
            .iter()
            .any(|(field, value)| value.as_str() != record.field(*field).unwrap_or_default())
    }
}
