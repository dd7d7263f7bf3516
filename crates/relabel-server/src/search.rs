// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use relabel_app::{RecordKind, SearchRequest, SearchResponse};
use relabel_db::TextQuery;

use crate::resolver::{LookupFailure, resolve_hierarchy};
use crate::serialize::{choice_result, documentation_result};
use crate::{DebugLog, RecordStore};

pub const DEFAULT_MAX_RESULTS: usize = 50;
pub const MIN_CHOICE_RESULTS: usize = 10;

const EMPTY_TERM: &str = "Enter text to search for translations.";
const EMPTY_TABLE: &str = "Provide a table to search within.";

/// Choice results get half the documentation cap, never fewer than
/// [`MIN_CHOICE_RESULTS`].
pub fn choice_cap(max_results: usize) -> usize {
    MIN_CHOICE_RESULTS.max(max_results / 2)
}

/// Drops `^` (the query-string separator), collapses whitespace runs to a
/// single space and trims.
pub fn sanitize_term(raw: &str) -> String {
    raw.replace('^', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercases and keeps only `[a-z0-9_]`.
pub fn sanitize_table_name(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '_')
        .collect()
}

/// Runs one search. Input problems come back as `errorMessage`; only store
/// failures are `Err`.
pub fn search<S: RecordStore + ?Sized>(
    store: &S,
    request: &SearchRequest,
    max_results: usize,
    log: &mut DebugLog,
) -> Result<SearchResponse> {
    let term = sanitize_term(&request.search_term);
    let table_name = sanitize_table_name(&request.table_name);
    let mut response = SearchResponse {
        selected_table: table_name.clone(),
        search_term: term.clone(),
        ..SearchResponse::default()
    };

    if term.is_empty() {
        response.error_message = Some(EMPTY_TERM.to_owned());
        return Ok(response);
    }
    if table_name.is_empty() {
        response.error_message = Some(EMPTY_TABLE.to_owned());
        return Ok(response);
    }

    let tables = resolve_hierarchy(store, &table_name, log)?;
    if tables.is_empty() {
        response.error_message = Some(
            LookupFailure::TableNotFound {
                name: table_name.clone(),
            }
            .message(),
        );
        return Ok(response);
    }

    if request.source_type.includes(RecordKind::Documentation) {
        let rows = store.search_documentation(&TextQuery {
            term: &term,
            tables: &tables,
            limit: max_results,
        })?;
        log.debug(format!("{} documentation matches", rows.len()));
        response
            .results
            .extend(rows.into_iter().map(documentation_result));
    }

    if request.source_type.includes(RecordKind::Choice) {
        let rows = store.search_choices(&TextQuery {
            term: &term,
            tables: &tables,
            limit: choice_cap(max_results),
        })?;
        log.debug(format!("{} choice matches", rows.len()));
        response.results.extend(rows.into_iter().map(choice_result));
    }

    log.info(format!(
        "search {term:?} in {table_name} returned {} results",
        response.results.len()
    ));
    response.applied_tables = tables;
    Ok(response)
}
