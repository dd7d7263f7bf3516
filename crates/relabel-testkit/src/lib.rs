// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use std::path::PathBuf;

/// Timestamp stamped on every fixture row.
pub const FIXTURE_TIMESTAMP: &str = "2026-01-15T09:30:00Z";

const LABEL_SUBJECTS: [&str; 12] = [
    "Approval",
    "Assignment",
    "Billing",
    "Contact",
    "Delivery",
    "Escalation",
    "Fulfillment",
    "Location",
    "Priority",
    "Resolution",
    "Review",
    "Vendor",
];

const LABEL_QUALIFIERS: [&str; 8] = [
    "status", "date", "group", "notes", "owner", "code", "type", "reason",
];

const HELP_TEMPLATES: [&str; 4] = [
    "Shows the current {}.",
    "Set by the assignee when the {} changes.",
    "Used in reports that summarize the {}.",
    "Leave empty if the {} does not apply.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFixture {
    pub id: String,
    pub scope: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFixture {
    pub id: String,
    pub name: String,
    pub label: String,
    pub super_class: Option<String>,
}

impl TableFixture {
    pub fn new(id: &str, name: &str, label: &str, super_class: Option<&str>) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            label: label.to_owned(),
            super_class: super_class.map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationFixture {
    pub id: String,
    pub table: String,
    pub element: String,
    pub label: String,
    pub plural: String,
    pub hint: String,
    pub help: String,
    pub language: String,
    pub scope: Option<String>,
}

impl DocumentationFixture {
    pub fn new(id: &str, table: &str, element: &str, label: &str) -> Self {
        Self {
            id: id.to_owned(),
            table: table.to_owned(),
            element: element.to_owned(),
            label: label.to_owned(),
            plural: String::new(),
            hint: String::new(),
            help: String::new(),
            language: "en".to_owned(),
            scope: Some("scope_global".to_owned()),
        }
    }

    pub fn plural(mut self, value: &str) -> Self {
        value.clone_into(&mut self.plural);
        self
    }

    pub fn hint(mut self, value: &str) -> Self {
        value.clone_into(&mut self.hint);
        self
    }

    pub fn help(mut self, value: &str) -> Self {
        value.clone_into(&mut self.help);
        self
    }

    pub fn language(mut self, value: &str) -> Self {
        value.clone_into(&mut self.language);
        self
    }

    pub fn scope(mut self, scope_id: Option<&str>) -> Self {
        self.scope = scope_id.map(str::to_owned);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceFixture {
    pub id: String,
    pub table: String,
    pub element: String,
    pub label: String,
    pub value: String,
    pub dependent_value: String,
    pub sequence: i64,
    pub language: String,
    pub scope: Option<String>,
}

impl ChoiceFixture {
    pub fn new(id: &str, table: &str, element: &str, label: &str, value: &str) -> Self {
        Self {
            id: id.to_owned(),
            table: table.to_owned(),
            element: element.to_owned(),
            label: label.to_owned(),
            value: value.to_owned(),
            dependent_value: String::new(),
            sequence: 0,
            language: "en".to_owned(),
            scope: Some("scope_global".to_owned()),
        }
    }

    pub fn sequence(mut self, value: i64) -> Self {
        self.sequence = value;
        self
    }

    pub fn dependent_value(mut self, value: &str) -> Self {
        value.clone_into(&mut self.dependent_value);
        self
    }

    pub fn scope(mut self, scope_id: Option<&str>) -> Self {
        self.scope = scope_id.map(str::to_owned);
        self
    }
}

/// A set of catalog rows written straight into a bootstrapped database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub scopes: Vec<ScopeFixture>,
    pub tables: Vec<TableFixture>,
    pub documentation: Vec<DocumentationFixture>,
    pub choices: Vec<ChoiceFixture>,
}

impl Catalog {
    pub fn install(&self, conn: &Connection) -> Result<()> {
        for scope in &self.scopes {
            conn.execute(
                "INSERT INTO sys_scope (sys_id, scope, name, sys_updated_on) VALUES (?, ?, ?, ?)",
                params![scope.id, scope.scope, scope.name, FIXTURE_TIMESTAMP],
            )
            .with_context(|| format!("insert scope fixture {}", scope.id))?;
        }

        for table in &self.tables {
            conn.execute(
                "
                INSERT INTO sys_db_object (sys_id, name, label, super_class, sys_updated_on)
                VALUES (?, ?, ?, ?, ?)
                ",
                params![
                    table.id,
                    table.name,
                    table.label,
                    table.super_class,
                    FIXTURE_TIMESTAMP
                ],
            )
            .with_context(|| format!("insert table fixture {}", table.name))?;
        }

        for doc in &self.documentation {
            conn.execute(
                "
                INSERT INTO sys_documentation (
                  sys_id, name, element, label, plural, hint, help, language, sys_scope,
                  sys_updated_on
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
                params![
                    doc.id,
                    doc.table,
                    doc.element,
                    doc.label,
                    doc.plural,
                    doc.hint,
                    doc.help,
                    doc.language,
                    doc.scope,
                    FIXTURE_TIMESTAMP
                ],
            )
            .with_context(|| format!("insert documentation fixture {}", doc.id))?;
        }

        for choice in &self.choices {
            conn.execute(
                "
                INSERT INTO sys_choice (
                  sys_id, name, element, label, value, dependent_value, sequence, language,
                  sys_scope, sys_updated_on
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
                params![
                    choice.id,
                    choice.table,
                    choice.element,
                    choice.label,
                    choice.value,
                    choice.dependent_value,
                    choice.sequence,
                    choice.language,
                    choice.scope,
                    FIXTURE_TIMESTAMP
                ],
            )
            .with_context(|| format!("insert choice fixture {}", choice.id))?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Generates bulk documentation and choice rows with stable, seed-derived
/// labels.
#[derive(Debug, Clone)]
pub struct CatalogFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl CatalogFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Labels always end with a qualifier word, so a caller can search on
    /// `qualifier` to hit every generated row.
    pub fn documentation(
        &mut self,
        table: &str,
        index: usize,
        qualifier: &str,
    ) -> DocumentationFixture {
        let subject = self.pick(&LABEL_SUBJECTS);
        let label = format!("{subject} {qualifier}");
        let help = self
            .pick(&HELP_TEMPLATES)
            .replace("{}", &label.to_lowercase());
        DocumentationFixture::new(
            &format!("doc_{table}_{index:04}"),
            table,
            &format!("u_{}_{index:04}", subject.to_lowercase()),
            &label,
        )
        .help(&help)
    }

    pub fn choice(&mut self, table: &str, element: &str, index: usize) -> ChoiceFixture {
        let subject = self.pick(&LABEL_SUBJECTS);
        let qualifier = self.pick(&LABEL_QUALIFIERS);
        ChoiceFixture::new(
            &format!("choice_{table}_{element}_{index:04}"),
            table,
            element,
            &format!("{subject} {qualifier}"),
            &format!("{index}"),
        )
        .sequence(index as i64)
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("relabel-test.db");
    Ok((dir, path))
}
