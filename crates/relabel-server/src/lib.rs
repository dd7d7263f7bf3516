// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod debug;
mod handler;
pub mod http;
pub mod resolver;
pub mod search;
pub mod serialize;
mod store;
pub mod update;

pub use debug::DebugLog;
pub use handler::Handler;
pub use http::HttpServer;
pub use relabel_app::API_PATH;
pub use resolver::{LookupFailure, MAX_ANCESTRY_HOPS, resolve_hierarchy};
pub use search::{DEFAULT_MAX_RESULTS, choice_cap, sanitize_table_name, sanitize_term};
pub use store::RecordStore;
pub use update::UpdateFailure;
