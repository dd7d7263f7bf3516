// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use relabel_app::{EditableField, RecordId, RecordKind, ScopeId, TableId};
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const APP_NAME: &str = "relabel";

/// Upper bound on any single text query, whatever limit the caller asks for.
pub const MAX_QUERY_ROWS: usize = 1000;

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("sys_scope", &["sys_id", "scope", "name", "sys_updated_on"]),
    (
        "sys_db_object",
        &["sys_id", "name", "label", "super_class", "sys_updated_on"],
    ),
    (
        "sys_documentation",
        &[
            "sys_id",
            "name",
            "element",
            "label",
            "plural",
            "hint",
            "help",
            "language",
            "sys_scope",
            "sys_updated_on",
        ],
    ),
    (
        "sys_choice",
        &[
            "sys_id",
            "name",
            "element",
            "label",
            "value",
            "dependent_value",
            "sequence",
            "language",
            "sys_scope",
            "sys_updated_on",
        ],
    ),
    (
        "sys_audit",
        &[
            "id",
            "tablename",
            "documentkey",
            "fieldname",
            "oldvalue",
            "newvalue",
            "sys_created_on",
        ],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequiredIndex {
    name: &'static str,
    create_sql: &'static str,
}

const REQUIRED_INDEXES: &[RequiredIndex] = &[
    RequiredIndex {
        name: "idx_sys_db_object_name",
        create_sql: "CREATE UNIQUE INDEX IF NOT EXISTS idx_sys_db_object_name ON sys_db_object (name);",
    },
    RequiredIndex {
        name: "idx_sys_documentation_name_element",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_sys_documentation_name_element ON sys_documentation (name, element);",
    },
    RequiredIndex {
        name: "idx_sys_choice_name_element",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_sys_choice_name_element ON sys_choice (name, element, value);",
    },
    RequiredIndex {
        name: "idx_sys_audit_documentkey",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_sys_audit_documentkey ON sys_audit (documentkey);",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRecord {
    pub id: TableId,
    pub name: String,
    pub label: String,
    pub super_class: Option<TableId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRecord {
    pub id: ScopeId,
    pub scope: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationRow {
    pub id: RecordId,
    pub table_name: String,
    pub element: String,
    pub label: String,
    pub plural: String,
    pub hint: String,
    pub help: String,
    pub language: String,
    pub scope: Option<ScopeRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRow {
    pub id: RecordId,
    pub table_name: String,
    pub element: String,
    pub label: String,
    pub value: String,
    pub dependent_value: String,
    pub sequence: i64,
    pub language: String,
    pub scope: Option<ScopeRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredRecord {
    Documentation(DocumentationRow),
    Choice(ChoiceRow),
}

impl StoredRecord {
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Documentation(_) => RecordKind::Documentation,
            Self::Choice(_) => RecordKind::Choice,
        }
    }

    pub fn id(&self) -> &RecordId {
        match self {
            Self::Documentation(row) => &row.id,
            Self::Choice(row) => &row.id,
        }
    }

    pub fn field(&self, field: EditableField) -> Option<&str> {
        match (self, field) {
            (Self::Documentation(row), EditableField::Label) => Some(&row.label),
            (Self::Documentation(row), EditableField::Plural) => Some(&row.plural),
            (Self::Documentation(row), EditableField::Hint) => Some(&row.hint),
            (Self::Documentation(row), EditableField::Help) => Some(&row.help),
            (Self::Choice(row), EditableField::Label) => Some(&row.label),
            (Self::Choice(_), _) => None,
        }
    }
}

/// A case-insensitive "contains" match over records whose table is one of
/// `tables`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextQuery<'a> {
    pub term: &'a str,
    pub tables: &'a [String],
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Writes the record only.
    #[default]
    Silent,
    /// Also appends one `sys_audit` row per changed field.
    Audited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub table_name: String,
    pub document_key: RecordId,
    pub field_name: String,
    pub old_value: String,
    pub new_value: String,
    pub created_at: OffsetDateTime,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
            tracing::info!(target: "relabel", "created catalog schema");
        }

        ensure_required_indexes(&self.conn)?;
        Ok(())
    }

    /// Loads the demo catalog. The catalog tables must be empty.
    pub fn seed_demo_data(&self) -> Result<()> {
        if self.record_count()? > 0 {
            bail!("database already holds catalog records; demo data needs an empty catalog");
        }

        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin demo seed transaction")?;
        tx.execute_batch(include_str!("sql/demo.sql"))
            .context("insert demo catalog")?;
        tx.commit().context("commit demo catalog")?;
        tracing::info!(
            target: "relabel",
            records = self.record_count()?,
            "seeded demo catalog"
        );
        Ok(())
    }

    /// Number of translatable records, documentation and choices together.
    pub fn record_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "
                SELECT (SELECT COUNT(*) FROM sys_documentation)
                     + (SELECT COUNT(*) FROM sys_choice)
                ",
                [],
                |row| row.get(0),
            )
            .context("count catalog records")?;
        usize::try_from(count).context("convert record count")
    }

    pub fn find_table(&self, name: &str) -> Result<Option<TableRecord>> {
        self.conn
            .query_row(
                "
                SELECT sys_id, name, COALESCE(label, ''), super_class
                FROM sys_db_object
                WHERE name = ?
                ",
                params![name],
                table_from_row,
            )
            .optional()
            .with_context(|| format!("query table {name}"))
    }

    pub fn get_table(&self, id: &TableId) -> Result<Option<TableRecord>> {
        self.conn
            .query_row(
                "
                SELECT sys_id, name, COALESCE(label, ''), super_class
                FROM sys_db_object
                WHERE sys_id = ?
                ",
                params![id.as_str()],
                table_from_row,
            )
            .optional()
            .with_context(|| format!("load table {id}"))
    }

    /// Documentation whose label, plural, hint or help contains the term,
    /// ordered by table then element.
    pub fn search_documentation(&self, query: &TextQuery<'_>) -> Result<Vec<DocumentationRow>> {
        if query.tables.is_empty() || query.limit == 0 {
            return Ok(Vec::new());
        }

        let pattern = like_pattern(&query.term.to_lowercase());
        let sql = format!(
            "
            SELECT d.sys_id, d.name, COALESCE(d.element, ''), COALESCE(d.label, ''),
                   COALESCE(d.plural, ''), COALESCE(d.hint, ''), COALESCE(d.help, ''),
                   d.language, s.sys_id, COALESCE(s.scope, ''), COALESCE(s.name, '')
            FROM sys_documentation d
            LEFT JOIN sys_scope s ON s.sys_id = d.sys_scope
            WHERE d.name IN ({tables})
              AND (
                casefold(d.label) LIKE ? ESCAPE '\\'
                OR casefold(d.plural) LIKE ? ESCAPE '\\'
                OR casefold(d.hint) LIKE ? ESCAPE '\\'
                OR casefold(d.help) LIKE ? ESCAPE '\\'
              )
            ORDER BY d.name ASC, d.element ASC, d.language ASC, d.sys_id ASC
            LIMIT {limit}
            ",
            tables = placeholders(query.tables.len()),
            limit = query.limit.min(MAX_QUERY_ROWS),
        );

        let mut stmt = self
            .conn
            .prepare(&sql)
            .context("prepare documentation search")?;
        let bound = query
            .tables
            .iter()
            .map(String::as_str)
            .chain(std::iter::repeat_n(pattern.as_str(), 4));
        let rows = stmt
            .query_map(params_from_iter(bound), documentation_from_row)
            .context("search documentation")?;
        let rows = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("collect documentation matches")?;

        tracing::debug!(
            target: "relabel",
            term = query.term,
            tables = query.tables.len(),
            matches = rows.len(),
            "documentation search"
        );
        Ok(rows)
    }

    /// Choices whose label contains the term, ordered by table, element, then
    /// value.
    pub fn search_choices(&self, query: &TextQuery<'_>) -> Result<Vec<ChoiceRow>> {
        if query.tables.is_empty() || query.limit == 0 {
            return Ok(Vec::new());
        }

        let pattern = like_pattern(&query.term.to_lowercase());
        let sql = format!(
            "
            SELECT c.sys_id, c.name, COALESCE(c.element, ''), COALESCE(c.label, ''),
                   COALESCE(c.value, ''), COALESCE(c.dependent_value, ''), c.sequence,
                   c.language, s.sys_id, COALESCE(s.scope, ''), COALESCE(s.name, '')
            FROM sys_choice c
            LEFT JOIN sys_scope s ON s.sys_id = c.sys_scope
            WHERE c.name IN ({tables})
              AND casefold(c.label) LIKE ? ESCAPE '\\'
            ORDER BY c.name ASC, c.element ASC, c.value ASC, c.sys_id ASC
            LIMIT {limit}
            ",
            tables = placeholders(query.tables.len()),
            limit = query.limit.min(MAX_QUERY_ROWS),
        );

        let mut stmt = self.conn.prepare(&sql).context("prepare choice search")?;
        let bound = query
            .tables
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(pattern.as_str()));
        let rows = stmt
            .query_map(params_from_iter(bound), choice_from_row)
            .context("search choices")?;
        let rows = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("collect choice matches")?;

        tracing::debug!(
            target: "relabel",
            term = query.term,
            tables = query.tables.len(),
            matches = rows.len(),
            "choice search"
        );
        Ok(rows)
    }

    pub fn get_record(&self, kind: RecordKind, id: &RecordId) -> Result<Option<StoredRecord>> {
        match kind {
            RecordKind::Documentation => self
                .conn
                .query_row(
                    "
                    SELECT d.sys_id, d.name, COALESCE(d.element, ''), COALESCE(d.label, ''),
                           COALESCE(d.plural, ''), COALESCE(d.hint, ''), COALESCE(d.help, ''),
                           d.language, s.sys_id, COALESCE(s.scope, ''), COALESCE(s.name, '')
                    FROM sys_documentation d
                    LEFT JOIN sys_scope s ON s.sys_id = d.sys_scope
                    WHERE d.sys_id = ?
                    ",
                    params![id.as_str()],
                    documentation_from_row,
                )
                .optional()
                .with_context(|| format!("load documentation {id}"))
                .map(|row| row.map(StoredRecord::Documentation)),
            RecordKind::Choice => self
                .conn
                .query_row(
                    "
                    SELECT c.sys_id, c.name, COALESCE(c.element, ''), COALESCE(c.label, ''),
                           COALESCE(c.value, ''), COALESCE(c.dependent_value, ''), c.sequence,
                           c.language, s.sys_id, COALESCE(s.scope, ''), COALESCE(s.name, '')
                    FROM sys_choice c
                    LEFT JOIN sys_scope s ON s.sys_id = c.sys_scope
                    WHERE c.sys_id = ?
                    ",
                    params![id.as_str()],
                    choice_from_row,
                )
                .optional()
                .with_context(|| format!("load choice {id}"))
                .map(|row| row.map(StoredRecord::Choice)),
        }
    }

    /// Writes `changes` onto one record. Fields the kind cannot hold are
    /// rejected before anything is written.
    pub fn update_record(
        &self,
        kind: RecordKind,
        id: &RecordId,
        changes: &[(EditableField, String)],
        mode: WriteMode,
    ) -> Result<()> {
        if changes.is_empty() {
            bail!("no fields to update on {} {id}", kind.as_str());
        }
        if let Some((field, _)) = changes.iter().find(|(field, _)| !kind.is_editable(*field)) {
            bail!(
                "{} records do not have an editable {} field",
                kind.as_str(),
                field.as_str()
            );
        }

        let table = record_table(kind);
        let now = now_rfc3339()?;
        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin update transaction")?;

        let previous = match mode {
            WriteMode::Silent => None,
            WriteMode::Audited => Some(
                self.get_record(kind, id)?
                    .ok_or_else(|| anyhow!("{} {id} not found", kind.as_str()))?,
            ),
        };

        let assignments = changes
            .iter()
            .map(|(field, _)| format!("{} = ?", field.as_str()))
            .chain(std::iter::once("sys_updated_on = ?".to_owned()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {table} SET {assignments} WHERE sys_id = ?");
        let bound = changes
            .iter()
            .map(|(_, value)| value.as_str())
            .chain([now.as_str(), id.as_str()]);
        let updated = tx
            .execute(&sql, params_from_iter(bound))
            .with_context(|| format!("update {} {id}", kind.as_str()))?;
        if updated == 0 {
            bail!("{} {id} not found", kind.as_str());
        }

        if let Some(previous) = previous {
            for (field, value) in changes {
                let old_value = previous.field(*field).unwrap_or_default();
                if old_value == value {
                    continue;
                }
                tx.execute(
                    "
                    INSERT INTO sys_audit (
                      tablename, documentkey, fieldname, oldvalue, newvalue, sys_created_on
                    ) VALUES (?, ?, ?, ?, ?, ?)
                    ",
                    params![table, id.as_str(), field.as_str(), old_value, value, now],
                )
                .with_context(|| format!("audit {} change on {id}", field.as_str()))?;
            }
        }

        tx.commit().context("commit update transaction")?;
        tracing::info!(
            target: "relabel",
            kind = kind.as_str(),
            id = %id,
            fields = changes.len(),
            audited = matches!(mode, WriteMode::Audited),
            "record updated"
        );
        Ok(())
    }

    pub fn list_audit(&self, id: &RecordId) -> Result<Vec<AuditEntry>> {
        let mut stmt = self
            .conn
            .prepare(
                "
                SELECT tablename, documentkey, fieldname, oldvalue, newvalue, sys_created_on
                FROM sys_audit
                WHERE documentkey = ?
                ORDER BY id ASC
                ",
            )
            .context("prepare audit query")?;
        let rows = stmt
            .query_map(params![id.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .with_context(|| format!("query audit for {id}"))?;

        let mut entries = Vec::new();
        for row in rows {
            let (table_name, document_key, field_name, old_value, new_value, created_at) =
                row.context("read audit row")?;
            entries.push(AuditEntry {
                table_name,
                document_key: RecordId::new(document_key),
                field_name,
                old_value,
                new_value,
                created_at: parse_datetime(&created_at)?,
            });
        }
        Ok(entries)
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("RELABEL_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set RELABEL_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("relabel.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

/// Wraps `term` for `LIKE ... ESCAPE '\'`, escaping the wildcard characters
/// so they match literally.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

const fn record_table(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Documentation => "sys_documentation",
        RecordKind::Choice => "sys_choice",
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn table_from_row(row: &Row<'_>) -> rusqlite::Result<TableRecord> {
    let super_class: Option<String> = row.get(3)?;
    Ok(TableRecord {
        id: TableId::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        label: row.get(2)?,
        super_class: super_class
            .filter(|id| !id.trim().is_empty())
            .map(TableId::new),
    })
}

fn scope_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Option<ScopeRecord>> {
    let id: Option<String> = row.get(offset)?;
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(Some(ScopeRecord {
        id: ScopeId::new(id),
        scope: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
    }))
}

fn documentation_from_row(row: &Row<'_>) -> rusqlite::Result<DocumentationRow> {
    Ok(DocumentationRow {
        id: RecordId::new(row.get::<_, String>(0)?),
        table_name: row.get(1)?,
        element: row.get(2)?,
        label: row.get(3)?,
        plural: row.get(4)?,
        hint: row.get(5)?,
        help: row.get(6)?,
        language: row.get(7)?,
        scope: scope_from_row(row, 8)?,
    })
}

fn choice_from_row(row: &Row<'_>) -> rusqlite::Result<ChoiceRow> {
    Ok(ChoiceRow {
        id: RecordId::new(row.get::<_, String>(0)?),
        table_name: row.get(1)?,
        element: row.get(2)?,
        label: row.get(3)?,
        value: row.get(4)?,
        dependent_value: row.get(5)?,
        sequence: row.get(6)?,
        language: row.get(7)?,
        scope: scope_from_row(row, 8)?,
    })
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            bail!("database is missing required table `{table}`; is this a relabel catalog?");
        }

        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn ensure_required_indexes(conn: &Connection) -> Result<()> {
    for index in REQUIRED_INDEXES {
        conn.execute_batch(index.create_sql)
            .with_context(|| format!("ensure required index `{}`", index.name))?;
    }

    let existing_indexes = index_names(conn)?;
    let missing = REQUIRED_INDEXES
        .iter()
        .filter(|index| !existing_indexes.contains(index.name))
        .map(|index| index.name)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        bail!("database is missing required indexes: {}", missing.join(", "));
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn index_names(conn: &Connection) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(
            "
            SELECT name
            FROM sqlite_master
            WHERE type = 'index'
              AND name NOT LIKE 'sqlite_%'
            ",
        )
        .context("prepare index names query")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query index names")?;
    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .context("collect index names")
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")?;

    // LIKE only folds ASCII; labels in other languages need full lowercasing.
    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|value| value.to_lowercase())),
    )
    .context("register casefold function")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}

fn parse_datetime(raw: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).with_context(|| format!("parse timestamp {raw:?}"))
}
