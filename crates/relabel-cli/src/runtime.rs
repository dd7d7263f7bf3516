// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use relabel_app::{
    BulkSummary, Editor, ResultRow, SearchRequest, SearchResponse, Transport, UpdateRecord,
    UpdateResponse,
};
use relabel_client::HttpTransport;
use relabel_db::Store;
use relabel_server::Handler;
use std::fmt::Write as _;

use crate::config::Config;

/// Where commands send their requests: the in-process handler over a local
/// store, or a remote `relabel serve`.
pub enum Backend {
    Local(Handler<Store>),
    Remote(HttpTransport),
}

impl Backend {
    pub fn describe(&self) -> String {
        match self {
            Self::Local(_) => "local database".to_owned(),
            Self::Remote(transport) => transport.endpoint().to_string(),
        }
    }
}

impl Transport for Backend {
    fn search(&mut self, request: &SearchRequest) -> Result<SearchResponse> {
        match self {
            Self::Local(handler) => handler.search(request),
            Self::Remote(transport) => transport.search(request),
        }
    }

    fn update(&mut self, record: &UpdateRecord) -> Result<UpdateResponse> {
        match self {
            Self::Local(handler) => handler.update(record),
            Self::Remote(transport) => transport.update(record),
        }
    }
}

/// Opens the configured database, or a seeded in-memory one for `--demo`.
pub fn open_store(config: &Config, demo: bool) -> Result<Store> {
    let store = if demo {
        Store::open_memory()?
    } else {
        let db_path = config.db_path()?;
        Store::open(&db_path).with_context(|| {
            format!(
                "open database {} -- if this path is wrong, set [storage].db_path or RELABEL_DB_PATH",
                db_path.display()
            )
        })?
    };
    store.bootstrap()?;
    if demo {
        store.seed_demo_data()?;
    }
    Ok(store)
}

pub fn local_handler(store: Store, config: &Config) -> Result<Handler<Store>> {
    Ok(Handler::new(store)
        .with_max_results(config.max_results())?
        .with_debug_messages(config.debug_messages()))
}

/// Remote when `[client].server_url` is set, unless `--demo` forces the
/// seeded in-memory store.
pub fn connect(config: &Config, demo: bool) -> Result<Backend> {
    if !demo && let Some(server_url) = config.server_url() {
        let transport = HttpTransport::new(server_url, config.client_timeout()?)
            .with_context(|| format!("configure client for {server_url}"))?;
        return Ok(Backend::Remote(transport));
    }

    let store = open_store(config, demo)?;
    Ok(Backend::Local(local_handler(store, config)?))
}

pub fn render_row(row: &ResultRow) -> String {
    let record = row.record();
    let mut out = format!(
        "{:<13} {}  {}.{}",
        record.kind().as_str(),
        record.id(),
        record.table_name(),
        record.element_name()
    );
    if !record.language().is_empty() {
        let _ = write!(out, " [{}]", record.language());
    }
    if !record.scope().is_empty() {
        let _ = write!(out, " ({})", record.scope());
    }
    for field in row.editable_fields() {
        let value = record.field(*field).unwrap_or_default();
        let _ = write!(out, "\n    {:<7} {value:?}", field.as_str());
    }
    if let Some(message) = row.message() {
        let _ = write!(out, "\n    -> {message}");
    }
    if let Some(error) = row.error() {
        let _ = write!(out, "\n    !! {error}");
    }
    out
}

/// Results followed by the search message or error.
pub fn render_search(editor: &Editor) -> String {
    let mut out = String::new();
    for row in editor.rows() {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    if let Some(error) = &editor.search.error {
        let _ = writeln!(out, "error: {error}");
    } else if let Some(message) = &editor.search.message {
        let _ = writeln!(out, "{message}");
    }
    out
}

pub fn render_bulk(editor: &Editor, summary: BulkSummary) -> String {
    let mut out = format!(
        "eligible {}, applied {}, failed {}\n",
        summary.eligible, summary.applied, summary.failed
    );
    if let Some(message) = &editor.bulk.message {
        let _ = writeln!(out, "{message}");
    }
    if let Some(error) = &editor.bulk.error {
        let _ = writeln!(out, "error: {error}");
    }
    for row in editor.rows().iter().filter(|row| row.error().is_some()) {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out
}
