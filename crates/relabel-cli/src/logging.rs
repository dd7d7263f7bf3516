// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "RELABEL_LOG";

/// Picks `RELABEL_LOG` when set and non-empty, else the configured filter.
fn resolve_filter(env_value: Option<String>, configured: &str) -> Result<EnvFilter> {
    match env_value.filter(|value| !value.trim().is_empty()) {
        Some(value) => EnvFilter::try_new(&value)
            .with_context(|| format!("parse {LOG_ENV} filter {value:?}")),
        None => EnvFilter::try_new(configured)
            .with_context(|| format!("parse [log].filter {configured:?}")),
    }
}

pub fn init(configured: &str) -> Result<()> {
    let filter = resolve_filter(env::var(LOG_ENV).ok(), configured)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}
