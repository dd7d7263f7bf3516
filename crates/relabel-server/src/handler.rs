// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use relabel_app::{
    Request, Response, SearchRequest, SearchResponse, Transport, UpdateOutcome, UpdateRecord,
    UpdateResponse,
};
use relabel_db::Store;

use crate::search::{self, DEFAULT_MAX_RESULTS};
use crate::{DebugLog, RecordStore, update};

const UNEXPECTED_ERROR: &str = "Unexpected server error.";

/// Entry point for every request. Errors raised while handling never escape:
/// they come back as `serverError` on the response.
pub struct Handler<S = Store> {
    store: S,
    max_results: usize,
    debug_messages: bool,
}

impl<S: RecordStore> Handler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_results: DEFAULT_MAX_RESULTS,
            debug_messages: false,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Result<Self> {
        if max_results == 0 {
            bail!("max results must be positive");
        }
        if max_results > relabel_db::MAX_QUERY_ROWS {
            bail!(
                "max results must be at most {}, got {max_results}",
                relabel_db::MAX_QUERY_ROWS
            );
        }
        self.max_results = max_results;
        Ok(self)
    }

    pub fn with_debug_messages(mut self, enabled: bool) -> Self {
        self.debug_messages = enabled;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn handle(&self, request: &Request) -> Response {
        match request {
            Request::Search(search) => Response::Search(self.handle_search(search)),
            Request::Update { record } => Response::Update(self.handle_update(record)),
        }
    }

    pub fn handle_search(&self, request: &SearchRequest) -> SearchResponse {
        let mut log = DebugLog::new(self.debug_messages);
        log.debug(format!(
            "search term={:?} table={:?} source={}",
            request.search_term,
            request.table_name,
            request.source_type.as_str()
        ));

        let mut response = match search::search(&self.store, request, self.max_results, &mut log)
        {
            Ok(response) => response,
            Err(error) => {
                log.error(format!("search failed: {error:#}"));
                SearchResponse {
                    selected_table: search::sanitize_table_name(&request.table_name),
                    search_term: search::sanitize_term(&request.search_term),
                    server_error: Some(server_error_text(&error)),
                    ..SearchResponse::default()
                }
            }
        };
        response.debug_messages = log.into_lines();
        response
    }

    pub fn handle_update(&self, record: &UpdateRecord) -> UpdateResponse {
        let mut log = DebugLog::new(self.debug_messages);
        log.debug(format!(
            "update id={:?} kind={}",
            record.id.as_deref().unwrap_or_default(),
            record.kind().as_str()
        ));

        let (update_response, server_error) = match update::update(&self.store, record, &mut log) {
            Ok(outcome) => (outcome, None),
            Err(error) => {
                log.error(format!("update failed: {error:#}"));
                let text = server_error_text(&error);
                (UpdateOutcome::failed(text.clone()), Some(text))
            }
        };
        UpdateResponse {
            update_response,
            server_error,
            debug_messages: log.into_lines(),
        }
    }
}

impl<S: RecordStore> Transport for Handler<S> {
    fn search(&mut self, request: &SearchRequest) -> Result<SearchResponse> {
        Ok(self.handle_search(request))
    }

    fn update(&mut self, record: &UpdateRecord) -> Result<UpdateResponse> {
        Ok(self.handle_update(record))
    }
}

fn server_error_text(error: &anyhow::Error) -> String {
    let text = error.to_string();
    if text.trim().is_empty() {
        UNEXPECTED_ERROR.to_owned()
    } else {
        text
    }
}
