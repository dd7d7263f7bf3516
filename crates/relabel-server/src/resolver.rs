// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{DebugLog, RecordStore};

/// Parent links followed past the starting table before giving up.
pub const MAX_ANCESTRY_HOPS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    TableNotFound { name: String },
}

impl LookupFailure {
    pub fn message(&self) -> String {
        match self {
            Self::TableNotFound { name } => format!("Table \"{name}\" was not found."),
        }
    }
}

/// Table names from `table_name` up through its ancestors, most specific
/// first. Empty when the table does not exist.
///
/// The walk stops at a missing or dangling parent, a parent with a blank
/// name, or after [`MAX_ANCESTRY_HOPS`]. Names are not deduplicated, so a
/// cyclic ancestry repeats until the hop limit.
pub fn resolve_hierarchy<S: RecordStore + ?Sized>(
    store: &S,
    table_name: &str,
    log: &mut DebugLog,
) -> Result<Vec<String>> {
    let Some(mut table) = store.find_table(table_name)? else {
        log.warn(format!("table {table_name} not found"));
        return Ok(Vec::new());
    };

    let mut names = vec![table.name.clone()];
    for hop in 0..MAX_ANCESTRY_HOPS {
        let Some(parent_id) = table.super_class.clone() else {
            break;
        };
        let Some(parent) = store.get_table(&parent_id)? else {
            log.warn(format!("{} extends missing table {parent_id}", table.name));
            break;
        };
        if parent.name.trim().is_empty() {
            log.warn(format!("{} extends a table with no name", table.name));
            break;
        }

        names.push(parent.name.clone());
        table = parent;
        if hop + 1 == MAX_ANCESTRY_HOPS && table.super_class.is_some() {
            log.warn(format!(
                "stopped resolving {table_name} after {MAX_ANCESTRY_HOPS} parents"
            ));
        }
    }

    log.debug(format!("resolved {table_name} to {}", names.join(", ")));
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::{LookupFailure, MAX_ANCESTRY_HOPS, resolve_hierarchy};
    use crate::DebugLog;
    use anyhow::Result;
    use relabel_db::Store;
    use relabel_testkit::{Catalog, TableFixture};

    fn store_with(tables: Vec<TableFixture>) -> Result<Store> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        Catalog {
            tables,
            ..Catalog::default()
        }
        .install(store.raw_connection())?;
        Ok(store)
    }

    #[test]
    fn walks_up_to_root() -> Result<()> {
        let store = store_with(vec![
            TableFixture::new("t1", "task", "Task", None),
            TableFixture::new("t2", "incident", "Incident", Some("t1")),
            TableFixture::new("t3", "u_major_incident", "Major", Some("t2")),
        ])?;
        let names = resolve_hierarchy(&store, "u_major_incident", &mut DebugLog::default())?;
        assert_eq!(names, vec!["u_major_incident", "incident", "task"]);
        Ok(())
    }

    #[test]
    fn unknown_table_is_empty() -> Result<()> {
        let store = store_with(Vec::new())?;
        let names = resolve_hierarchy(&store, "incident", &mut DebugLog::default())?;
        assert!(names.is_empty());
        Ok(())
    }

    #[test]
    fn dangling_parent_stops_walk() -> Result<()> {
        let store = store_with(vec![TableFixture::new(
            "t2",
            "incident",
            "Incident",
            Some("gone"),
        )])?;
        let mut log = DebugLog::new(true);
        let names = resolve_hierarchy(&store, "incident", &mut log)?;
        assert_eq!(names, vec!["incident"]);
        assert!(log.lines().iter().any(|line| line.starts_with("[WARN]")));
        Ok(())
    }

    #[test]
    fn blank_parent_name_stops_walk() -> Result<()> {
        let store = store_with(vec![
            TableFixture::new("t1", " ", "", None),
            TableFixture::new("t2", "incident", "Incident", Some("t1")),
        ])?;
        let names = resolve_hierarchy(&store, "incident", &mut DebugLog::default())?;
        assert_eq!(names, vec!["incident"]);
        Ok(())
    }

    #[test]
    fn cycle_is_bounded_by_hop_limit() -> Result<()> {
        let store = store_with(vec![
            TableFixture::new("a", "u_a", "A", Some("b")),
            TableFixture::new("b", "u_b", "B", Some("a")),
        ])?;
        let names = resolve_hierarchy(&store, "u_a", &mut DebugLog::default())?;
        assert_eq!(names.len(), MAX_ANCESTRY_HOPS + 1);
        assert_eq!(names[0], "u_a");
        assert_eq!(names[1], "u_b");
        assert_eq!(names[2], "u_a");
        Ok(())
    }

    #[test]
    fn not_found_message_quotes_name() {
        let failure = LookupFailure::TableNotFound {
            name: "nope".to_owned(),
        };
        assert_eq!(failure.message(), "Table \"nope\" was not found.");
    }
}
