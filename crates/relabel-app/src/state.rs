// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{
    BulkState, Draft, EditableField, RecordId, SearchRequest, SearchResponse, SearchResult,
    SourceType, Transport, UpdateRecord, UpdateResponse,
};

const SEARCH_UNAVAILABLE: &str = "Unable to search translations right now.";
const SAVE_UNREACHABLE: &str = "Unable to reach the server.";
const SAVE_FAILED: &str = "Unable to save changes.";
const SAVED: &str = "Changes saved.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Clean,
    Dirty,
    Saving,
    Failed,
}

/// A search result plus the editor's local state for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    record: SearchResult,
    editable_fields: Vec<EditableField>,
    draft: Draft,
    saving: bool,
    message: Option<String>,
    error: Option<String>,
}

impl ResultRow {
    pub fn new(record: SearchResult) -> Self {
        let editable_fields = record.editable_fields().to_vec();
        let draft = Draft::for_record(&record, &editable_fields);
        Self {
            record,
            editable_fields,
            draft,
            saving: false,
            message: None,
            error: None,
        }
    }

    pub fn record(&self) -> &SearchResult {
        &self.record
    }

    pub fn id(&self) -> &RecordId {
        self.record.id()
    }

    pub fn editable_fields(&self) -> &[EditableField] {
        &self.editable_fields
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.draft.differs_from(&self.record)
    }

    pub fn status(&self) -> RowStatus {
        if self.saving {
            RowStatus::Saving
        } else if !self.is_dirty() {
            RowStatus::Clean
        } else if self.error.is_some() {
            RowStatus::Failed
        } else {
            RowStatus::Dirty
        }
    }

    fn reset_draft(&mut self) {
        self.draft = Draft::for_record(&self.record, &self.editable_fields);
        self.message = None;
        self.error = None;
    }

    fn update_payload(&self) -> UpdateRecord {
        self.draft.iter().fold(
            UpdateRecord::new(self.id().as_str(), self.record.kind()),
            |payload, (field, value)| payload.with_field(field, value),
        )
    }

    fn apply_saved(&mut self, saved: Option<SearchResult>) {
        match saved {
            Some(record) => {
                if !record.declared_editable_fields().is_empty() {
                    self.editable_fields = record.declared_editable_fields().to_vec();
                }
                self.record = record;
            }
            None => {
                for (field, value) in self.draft.iter() {
                    self.record.set_field(field, value);
                }
            }
        }
        self.draft = Draft::for_record(&self.record, &self.editable_fields);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub term: String,
    pub table_name: String,
    pub source_type: SourceType,
    pub last_search_term: String,
    pub is_searching: bool,
    pub results: Vec<ResultRow>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// A dispatched search. Only the ticket of the most recent dispatch is
/// allowed to land its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    sequence: u64,
    request: SearchRequest,
}

impl SearchTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    id: RecordId,
    payload: UpdateRecord,
}

impl SaveTicket {
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn payload(&self) -> &UpdateRecord {
        &self.payload
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing to send: the row was clean, already saving, or missing.
    Skipped,
    Saved,
    Failed,
    /// The row disappeared (a newer search replaced results) before the
    /// response arrived.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Editor {
    pub search: SearchState,
    pub bulk: BulkState,
    dispatched: u64,
}

impl Editor {
    pub fn new(table_name: &str) -> Self {
        Self {
            search: SearchState {
                table_name: table_name.to_owned(),
                ..SearchState::default()
            },
            ..Self::default()
        }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.search.results
    }

    pub fn row(&self, index: usize) -> Option<&ResultRow> {
        self.search.results.get(index)
    }

    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        self.search.error = None;
        self.search.message = None;

        let term = self.search.term.trim().to_owned();
        let table_name = self.search.table_name.trim().to_owned();
        if term.is_empty() {
            self.fail_search_input("Enter text to search.");
            return None;
        }
        if table_name.is_empty() {
            self.fail_search_input("Select a table to search.");
            return None;
        }

        self.dispatched += 1;
        self.search.is_searching = true;
        tracing::debug!(
            target: "relabel",
            sequence = self.dispatched,
            term = %term,
            table = %table_name,
            "search dispatched"
        );
        Some(SearchTicket {
            sequence: self.dispatched,
            request: SearchRequest {
                search_term: term,
                table_name,
                source_type: self.search.source_type,
            },
        })
    }

    /// Lands a search response. Returns `false` when the ticket is stale and
    /// the response was dropped.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<SearchResponse>,
    ) -> bool {
        if ticket.sequence != self.dispatched {
            tracing::debug!(
                target: "relabel",
                sequence = ticket.sequence,
                latest = self.dispatched,
                "dropping stale search response"
            );
            return false;
        }

        self.search.is_searching = false;
        match outcome {
            Err(error) => {
                tracing::warn!(target: "relabel", error = %format!("{error:#}"), "search request failed");
                self.search.error = Some(SEARCH_UNAVAILABLE.to_owned());
            }
            Ok(payload) => self.apply_search_response(ticket, payload),
        }
        self.bulk.refresh_options(&self.search.results);
        true
    }

    pub fn search<T: Transport + ?Sized>(&mut self, transport: &mut T) -> bool {
        let Some(ticket) = self.begin_search() else {
            return false;
        };
        let outcome = transport.search(ticket.request());
        self.finish_search(&ticket, outcome)
    }

    pub fn edit(&mut self, index: usize, field: EditableField, value: impl Into<String>) -> bool {
        self.search
            .results
            .get_mut(index)
            .is_some_and(|row| row.draft.set(field, value))
    }

    pub fn reset_draft(&mut self, index: usize) {
        if let Some(row) = self.search.results.get_mut(index) {
            row.reset_draft();
        }
    }

    /// Marks the row as saving and returns the payload to send, or `None`
    /// when the row is clean or already saving.
    pub fn begin_save(&mut self, index: usize) -> Option<SaveTicket> {
        let row = self.search.results.get_mut(index)?;
        if row.saving || !row.is_dirty() {
            return None;
        }

        row.saving = true;
        row.message = None;
        row.error = None;
        let payload = row.update_payload();
        tracing::debug!(target: "relabel", id = %row.id(), "saving translation");
        Some(SaveTicket {
            id: row.id().clone(),
            payload,
        })
    }

    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        outcome: Result<UpdateResponse>,
    ) -> SaveOutcome {
        let Some(row) = self
            .search
            .results
            .iter_mut()
            .find(|row| row.saving && row.id() == &ticket.id)
        else {
            tracing::debug!(target: "relabel", id = %ticket.id, "save settled for a row no longer shown");
            return SaveOutcome::Discarded;
        };

        row.saving = false;
        let outcome = match outcome {
            Err(error) => {
                tracing::warn!(target: "relabel", id = %ticket.id, error = %format!("{error:#}"), "update request failed");
                row.error = Some(SAVE_UNREACHABLE.to_owned());
                SaveOutcome::Failed
            }
            Ok(response) => {
                for line in &response.debug_messages {
                    tracing::debug!(target: "relabel", server = %line);
                }
                if let Some(server_error) = response.server_error {
                    row.error = Some(server_error);
                    SaveOutcome::Failed
                } else if !response.update_response.success {
                    let message = response.update_response.message;
                    row.error = Some(if message.is_empty() {
                        SAVE_FAILED.to_owned()
                    } else {
                        message
                    });
                    SaveOutcome::Failed
                } else {
                    row.apply_saved(response.update_response.record);
                    row.message = Some(SAVED.to_owned());
                    SaveOutcome::Saved
                }
            }
        };

        self.bulk.refresh_options(&self.search.results);
        outcome
    }

    pub fn save<T: Transport + ?Sized>(&mut self, index: usize, transport: &mut T) -> SaveOutcome {
        let Some(ticket) = self.begin_save(index) else {
            return SaveOutcome::Skipped;
        };
        let outcome = transport.update(ticket.payload());
        self.finish_save(ticket, outcome)
    }

    fn fail_search_input(&mut self, message: &str) {
        self.search.error = Some(message.to_owned());
        self.search.results.clear();
        self.bulk.refresh_options(&self.search.results);
    }

    fn apply_search_response(&mut self, ticket: &SearchTicket, payload: SearchResponse) {
        for line in &payload.debug_messages {
            tracing::debug!(target: "relabel", server = %line);
        }
        if let Some(server_error) = payload.server_error {
            self.search.error = Some(server_error);
            self.search.results.clear();
            return;
        }

        self.search.results = payload.results.into_iter().map(ResultRow::new).collect();
        if !payload.selected_table.is_empty() {
            self.search.table_name = payload.selected_table;
        }

        if let Some(error_message) = payload.error_message.filter(|message| !message.is_empty()) {
            self.search.error = Some(error_message);
        } else {
            self.search.message = Some(match self.search.results.len() {
                0 => "No matches found.".to_owned(),
                1 => "1 match found.".to_owned(),
                count => format!("{count} matches found."),
            });
        }

        self.search.last_search_term = if payload.search_term.is_empty() {
            ticket.request.search_term.clone()
        } else {
            payload.search_term
        };
    }
}
