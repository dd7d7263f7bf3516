// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{EditableField, Editor, ResultRow, SaveOutcome, Transport};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkState {
    pub field: Option<EditableField>,
    pub value: String,
    options: Vec<EditableField>,
    pub applying: bool,
    pub applied_count: usize,
    pub failed_count: usize,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl BulkState {
    /// Fields at least one visible result can take, in priority order.
    pub fn options(&self) -> &[EditableField] {
        &self.options
    }

    pub fn refresh_options(&mut self, rows: &[ResultRow]) {
        self.options = EditableField::ALL
            .into_iter()
            .filter(|field| rows.iter().any(|row| row.draft().contains(*field)))
            .collect();

        if !self.field.is_some_and(|field| self.options.contains(&field)) {
            self.field = self.options.first().copied();
        }
    }

    pub fn select_field(&mut self, field: EditableField) -> bool {
        if !self.options.contains(&field) {
            return false;
        }
        self.field = Some(field);
        true
    }

    fn start(&mut self) {
        self.applying = true;
        self.applied_count = 0;
        self.failed_count = 0;
        self.message = None;
        self.error = None;
    }

    fn reject(&mut self, message: String) {
        self.applied_count = 0;
        self.failed_count = 0;
        self.message = None;
        self.error = Some(message);
    }

    fn finish(&mut self, field: EditableField) {
        self.applying = false;
        self.message = match self.applied_count {
            0 => None,
            1 => Some(format!("Applied {} to 1 result.", field.as_str())),
            count => Some(format!("Applied {} to {count} results.", field.as_str())),
        };
        self.error = match self.failed_count {
            0 => None,
            1 => Some("1 result could not be saved.".to_owned()),
            count => Some(format!("{count} results could not be saved.")),
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkSummary {
    pub eligible: usize,
    pub applied: usize,
    pub failed: usize,
}

impl Editor {
    /// Writes the bulk value into every eligible row and saves them one at a
    /// time, in row order. A failed row never stops the rest.
    pub fn bulk_apply<T: Transport + ?Sized>(&mut self, transport: &mut T) -> BulkSummary {
        let Some(field) = self
            .bulk
            .field
            .filter(|field| self.bulk.options().contains(field))
        else {
            self.bulk.reject("Choose a field to apply.".to_owned());
            return BulkSummary::default();
        };

        let eligible = self
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.is_saving() && row.draft().contains(field))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        if eligible.is_empty() {
            self.bulk.reject(format!(
                "No results can take a {} value.",
                field.as_str()
            ));
            return BulkSummary::default();
        }

        let value = self.bulk.value.clone();
        self.bulk.start();
        tracing::info!(
            target: "relabel",
            field = field.as_str(),
            rows = eligible.len(),
            "bulk apply started"
        );

        let summary = eligible.iter().fold(
            BulkSummary {
                eligible: eligible.len(),
                ..BulkSummary::default()
            },
            |mut summary, &index| {
                self.edit(index, field, value.as_str());
                match self.save(index, transport) {
                    SaveOutcome::Saved | SaveOutcome::Skipped => summary.applied += 1,
                    SaveOutcome::Failed | SaveOutcome::Discarded => summary.failed += 1,
                }
                summary
            },
        );

        self.bulk.applied_count = summary.applied;
        self.bulk.failed_count = summary.failed;
        self.bulk.finish(field);
        tracing::info!(
            target: "relabel",
            field = field.as_str(),
            applied = summary.applied,
            failed = summary.failed,
            "bulk apply finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::BulkSummary;
    use crate::{
        ChoiceEntry, EditableField, Editor, FieldDocEntry, RecordId, SearchRequest,
        SearchResponse, SearchResult, Transport, UpdateOutcome, UpdateRecord, UpdateResponse,
    };
    use anyhow::{Result, anyhow};
    use std::collections::BTreeSet;

    fn documentation(id: &str, help: &str) -> SearchResult {
        SearchResult::Documentation(FieldDocEntry {
            id: RecordId::new(id),
            table_name: "incident".to_owned(),
            element_name: id.to_owned(),
            label: format!("Label {id}"),
            plural: String::new(),
            hint: String::new(),
            help: help.to_owned(),
            language: "en".to_owned(),
            scope: "global".to_owned(),
            editable_fields: Vec::new(),
        })
    }

    fn choice(id: &str) -> SearchResult {
        SearchResult::Choice(ChoiceEntry {
            id: RecordId::new(id),
            table_name: "incident".to_owned(),
            element_name: "state".to_owned(),
            label: "Open".to_owned(),
            value: id.to_owned(),
            dependent_value: String::new(),
            sequence: 0,
            language: "en".to_owned(),
            scope: String::new(),
            editable_fields: Vec::new(),
        })
    }

    /// Echoes the submitted record back as saved, except for ids listed in
    /// `failing`.
    struct Recording {
        rows: Vec<SearchResult>,
        failing: BTreeSet<String>,
        in_flight: usize,
        max_in_flight: usize,
        calls: Vec<String>,
    }

    impl Recording {
        fn new(rows: &[SearchResult], failing: &[&str]) -> Self {
            Self {
                rows: rows.to_vec(),
                failing: failing.iter().map(|id| (*id).to_owned()).collect(),
                in_flight: 0,
                max_in_flight: 0,
                calls: Vec::new(),
            }
        }
    }

    impl Transport for Recording {
        fn search(&mut self, _request: &SearchRequest) -> Result<SearchResponse> {
            Ok(SearchResponse {
                results: self.rows.clone(),
                selected_table: "incident".to_owned(),
                ..SearchResponse::default()
            })
        }

        fn update(&mut self, record: &UpdateRecord) -> Result<UpdateResponse> {
            self.in_flight += 1;
            self.max_in_flight = self.max_in_flight.max(self.in_flight);
            let id = record
                .identifier()
                .ok_or_else(|| anyhow!("missing id"))?
                .to_owned();
            self.calls.push(id.clone());

            let response = if self.failing.contains(&id) {
                UpdateOutcome::failed("Unable to update record.")
            } else {
                let mut saved = self
                    .rows
                    .iter()
                    .find(|row| row.id().as_str() == id)
                    .cloned()
                    .ok_or_else(|| anyhow!("unknown id {id}"))?;
                for field in saved.kind().editable_fields() {
                    if let Some(value) = record.value_for(*field) {
                        saved.set_field(*field, value);
                    }
                }
                UpdateOutcome::saved("Translation updated.", saved)
            };
            self.in_flight -= 1;
            Ok(UpdateResponse {
                update_response: response,
                ..UpdateResponse::default()
            })
        }
    }

    fn loaded(transport: &mut Recording) -> Editor {
        let mut editor = Editor::new("incident");
        editor.search.term = "label".to_owned();
        assert!(editor.search(transport));
        editor
    }

    #[test]
    fn options_follow_visible_results() {
        let rows = vec![choice("c1"), choice("c2")];
        let mut transport = Recording::new(&rows, &[]);
        let editor = loaded(&mut transport);

        assert_eq!(editor.bulk.options(), &[EditableField::Label]);
        assert_eq!(editor.bulk.field, Some(EditableField::Label));
    }

    #[test]
    fn field_outside_options_resets_to_default() {
        let rows = vec![documentation("d1", "x")];
        let mut transport = Recording::new(&rows, &[]);
        let mut editor = loaded(&mut transport);
        assert!(editor.bulk.select_field(EditableField::Help));

        transport.rows = vec![choice("c1")];
        editor.search.term = "open".to_owned();
        assert!(editor.search(&mut transport));
        assert_eq!(editor.bulk.field, Some(EditableField::Label));
        assert!(!editor.bulk.select_field(EditableField::Help));
    }

    #[test]
    fn partial_failure_is_tallied_and_sequence_continues() {
        let rows = vec![
            documentation("d1", "old"),
            documentation("d2", "old"),
            documentation("d3", "old"),
        ];
        let mut transport = Recording::new(&rows, &["d2"]);
        let mut editor = loaded(&mut transport);
        editor.bulk.select_field(EditableField::Help);
        editor.bulk.value = String::new();

        let summary = editor.bulk_apply(&mut transport);

        assert_eq!(
            summary,
            BulkSummary {
                eligible: 3,
                applied: 2,
                failed: 1,
            }
        );
        assert_eq!(transport.calls, vec!["d1", "d2", "d3"]);
        assert_eq!(transport.max_in_flight, 1);
        assert!(!editor.bulk.applying);
        assert_eq!(editor.bulk.applied_count, 2);
        assert_eq!(editor.bulk.failed_count, 1);
        assert!(editor.bulk.message.is_some());
        assert!(editor.bulk.error.is_some());

        assert_eq!(editor.rows()[0].record().field(EditableField::Help), Some(""));
        assert_eq!(editor.rows()[1].record().field(EditableField::Help), Some("old"));
        assert_eq!(editor.rows()[1].draft().get(EditableField::Help), Some(""));
        assert_eq!(editor.rows()[2].record().field(EditableField::Help), Some(""));
    }

    #[test]
    fn only_rows_with_the_field_are_eligible() {
        let rows = vec![documentation("d1", "old"), choice("c1")];
        let mut transport = Recording::new(&rows, &[]);
        let mut editor = loaded(&mut transport);
        editor.bulk.select_field(EditableField::Help);
        editor.bulk.value = "Shared help".to_owned();

        let summary = editor.bulk_apply(&mut transport);

        assert_eq!(summary.eligible, 1);
        assert_eq!(transport.calls, vec!["d1"]);
        assert_eq!(editor.bulk.message.as_deref(), Some("Applied help to 1 result."));
        assert!(editor.bulk.error.is_none());
    }

    #[test]
    fn rows_already_holding_the_value_count_as_applied() {
        let rows = vec![documentation("d1", "same"), documentation("d2", "old")];
        let mut transport = Recording::new(&rows, &[]);
        let mut editor = loaded(&mut transport);
        editor.bulk.select_field(EditableField::Help);
        editor.bulk.value = "same".to_owned();

        let summary = editor.bulk_apply(&mut transport);

        assert_eq!(summary.applied, 2);
        assert_eq!(transport.calls, vec!["d2"]);
    }

    #[test]
    fn no_eligible_rows_fails_without_calls() {
        let mut transport = Recording::new(&[], &[]);
        let mut editor = loaded(&mut transport);
        editor.bulk.field = Some(EditableField::Label);

        let summary = editor.bulk_apply(&mut transport);

        assert_eq!(summary, BulkSummary::default());
        assert!(transport.calls.is_empty());
        assert!(editor.bulk.error.is_some());
        assert!(!editor.bulk.applying);
    }

    #[test]
    fn rejected_apply_clears_previous_tallies() {
        let rows = vec![documentation("d1", "old"), documentation("d2", "old")];
        let mut transport = Recording::new(&rows, &["d2"]);
        let mut editor = loaded(&mut transport);
        editor.bulk.select_field(EditableField::Help);
        editor.bulk.value = "new".to_owned();
        editor.bulk_apply(&mut transport);
        assert_eq!(editor.bulk.applied_count, 1);
        assert_eq!(editor.bulk.failed_count, 1);

        editor.bulk.field = None;
        let summary = editor.bulk_apply(&mut transport);

        assert_eq!(summary, BulkSummary::default());
        assert_eq!(editor.bulk.applied_count, 0);
        assert_eq!(editor.bulk.failed_count, 0);
        assert!(editor.bulk.message.is_none());
        assert_eq!(editor.bulk.error.as_deref(), Some("Choose a field to apply."));
        assert_eq!(transport.calls, vec!["d1", "d2"]);
    }

    #[test]
    fn rows_mid_save_are_skipped() {
        let rows = vec![documentation("d1", "old")];
        let mut transport = Recording::new(&rows, &[]);
        let mut editor = loaded(&mut transport);
        editor.edit(0, EditableField::Label, "Pending");
        let _ticket = editor.begin_save(0).expect("dirty row saves");
        editor.bulk.select_field(EditableField::Help);

        let summary = editor.bulk_apply(&mut transport);

        assert_eq!(summary.eligible, 0);
        assert!(transport.calls.is_empty());
        assert_eq!(
            editor.bulk.error.as_deref(),
            Some("No results can take a help value.")
        );
    }
}
