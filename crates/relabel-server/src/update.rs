// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use relabel_app::{EditableField, RecordId, UpdateOutcome, UpdateRecord};
use relabel_db::WriteMode;

use crate::serialize::stored_result;
use crate::{DebugLog, RecordStore};

const UPDATED: &str = "Translation updated.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateFailure {
    MissingIdentifier,
    RecordNotFound,
    NoChangesDetected,
    UpdateFailed,
}

impl UpdateFailure {
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingIdentifier => "Missing record identifier.",
            Self::RecordNotFound => "Record not found.",
            Self::NoChangesDetected => "No changes detected.",
            Self::UpdateFailed => "Unable to update record.",
        }
    }

    fn outcome(self) -> UpdateOutcome {
        UpdateOutcome::failed(self.message())
    }
}

/// Applies the supplied editable fields to one record. Writes are always
/// silent. Only failures to read the store are `Err`; everything else is an
/// outcome.
pub fn update<S: RecordStore + ?Sized>(
    store: &S,
    record: &UpdateRecord,
    log: &mut DebugLog,
) -> Result<UpdateOutcome> {
    let kind = record.kind();
    let Some(id) = record.identifier().map(RecordId::new) else {
        log.warn("update without a record identifier");
        return Ok(UpdateFailure::MissingIdentifier.outcome());
    };

    if store.get_record(kind, &id)?.is_none() {
        log.warn(format!("{} {id} not found", kind.as_str()));
        return Ok(UpdateFailure::RecordNotFound.outcome());
    }

    let changes = kind
        .editable_fields()
        .iter()
        .filter_map(|field| record.value_for(*field).map(|value| (*field, value)))
        .collect::<Vec<(EditableField, String)>>();
    if changes.is_empty() {
        log.info(format!("no editable fields supplied for {id}"));
        return Ok(UpdateFailure::NoChangesDetected.outcome());
    }

    if let Err(error) = store.update_record(kind, &id, &changes, WriteMode::Silent) {
        log.error(format!("update of {id} failed: {error:#}"));
        return Ok(UpdateFailure::UpdateFailed.outcome());
    }

    let Some(saved) = store.get_record(kind, &id)? else {
        log.error(format!("{id} vanished after update"));
        return Ok(UpdateFailure::UpdateFailed.outcome());
    };

    let fields = changes
        .iter()
        .map(|(field, _)| field.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    log.info(format!("updated {} {id} ({fields})", kind.as_str()));
    Ok(UpdateOutcome::saved(UPDATED, stored_result(saved)))
}
