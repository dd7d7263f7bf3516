// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use relabel_app::{EditableField, Editor, RecordKind, SourceType, Transport, UpdateRecord};
use relabel_server::HttpServer;
use runtime::Backend;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `relabel --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    logging::init(config.log_filter())?;

    match options.command {
        Some(Command::Serve { listen }) => serve(&config, options.demo, listen, options.check_only),
        Some(command) => {
            let mut backend = runtime::connect(&config, options.demo)?;
            tracing::debug!(target: "relabel", backend = %backend.describe(), "connected");
            if options.check_only {
                return Ok(());
            }
            execute(command, &mut backend)
        }
        None if options.check_only => {
            runtime::connect(&config, options.demo)?;
            Ok(())
        }
        None => {
            print_help();
            Ok(())
        }
    }
}

fn serve(config: &Config, demo: bool, listen: Option<String>, check_only: bool) -> Result<()> {
    let store = runtime::open_store(config, demo)?;
    let handler = runtime::local_handler(store, config)?;
    let listen = listen.unwrap_or_else(|| config.listen().to_owned());
    let server = HttpServer::bind(&listen)?;
    tracing::info!(
        target: "relabel",
        addr = %server.local_addr()?,
        path = relabel_server::API_PATH,
        "serving translations"
    );
    if check_only {
        return Ok(());
    }
    server.serve(&handler)
}

fn execute(command: Command, backend: &mut Backend) -> Result<()> {
    match command {
        Command::Serve { .. } => Err(anyhow!("serve runs against the local store only")),
        Command::Search {
            table,
            term,
            source,
        } => {
            let mut editor = Editor::new(&table);
            editor.search.term = term;
            editor.search.source_type = source;
            editor.search(backend);
            print!("{}", runtime::render_search(&editor));
            match editor.search.error {
                Some(error) => bail!("{error}"),
                None => Ok(()),
            }
        }
        Command::Set { id, kind, fields } => {
            let record = fields.into_iter().fold(
                UpdateRecord::new(id.as_str(), kind),
                |record, (field, value)| record.with_field(field, value),
            );
            let response = backend.update(&record)?;
            if let Some(error) = response.server_error {
                bail!("{error}");
            }
            let outcome = response.update_response;
            if !outcome.success {
                bail!("{}", outcome.message);
            }
            println!("{}", outcome.message);
            if let Some(saved) = outcome.record {
                println!("{}", runtime::render_row(&relabel_app::ResultRow::new(saved)));
            }
            Ok(())
        }
        Command::Bulk {
            table,
            term,
            source,
            field,
            value,
        } => {
            let mut editor = Editor::new(&table);
            editor.search.term = term;
            editor.search.source_type = source;
            editor.search(backend);
            if let Some(error) = &editor.search.error {
                bail!("{error}");
            }
            if !editor.bulk.select_field(field) {
                bail!(
                    "none of the {} results can take a {} value",
                    editor.rows().len(),
                    field.as_str()
                );
            }
            editor.bulk.value = value;
            let summary = editor.bulk_apply(backend);
            print!("{}", runtime::render_bulk(&editor, summary));
            if summary.failed > 0 {
                bail!("bulk apply left {} of {} results unsaved", summary.failed, summary.eligible);
            }
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Serve {
        listen: Option<String>,
    },
    Search {
        table: String,
        term: String,
        source: SourceType,
    },
    Set {
        id: String,
        kind: RecordKind,
        fields: Vec<(EditableField, String)>,
    },
    Bulk {
        table: String,
        term: String,
        source: SourceType,
        field: EditableField,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    command: Option<Command>,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
        command: None,
    };
    let mut positionals = Vec::new();
    let mut listen = None;
    let mut kind = None;
    let mut source = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--listen" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--listen requires HOST:PORT"))?;
                listen = Some(value.as_ref().to_owned());
            }
            "--kind" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--kind requires documentation or choice"))?;
                kind = Some(RecordKind::parse(value.as_ref()).ok_or_else(|| {
                    anyhow!(
                        "unknown record kind {:?}; use documentation or choice",
                        value.as_ref()
                    )
                })?);
            }
            "--source" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--source requires all, documentation or choice"))?;
                source = Some(SourceType::parse(value.as_ref()).ok_or_else(|| {
                    anyhow!(
                        "unknown source {:?}; use all, documentation or choice",
                        value.as_ref()
                    )
                })?);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            flag if flag.starts_with("--") => {
                bail!("unknown argument {flag:?}; run with --help to see supported options");
            }
            positional => positionals.push(positional.to_owned()),
        }
    }

    options.command = parse_command(positionals, listen, kind, source)?;
    Ok(options)
}

fn parse_command(
    positionals: Vec<String>,
    listen: Option<String>,
    kind: Option<RecordKind>,
    source: Option<SourceType>,
) -> Result<Option<Command>> {
    let mut words = positionals.into_iter();
    let Some(name) = words.next() else {
        if listen.is_some() || kind.is_some() || source.is_some() {
            bail!("--listen, --kind and --source need a command; run with --help");
        }
        return Ok(None);
    };
    let rest = words.collect::<Vec<_>>();

    if listen.is_some() && name != "serve" {
        bail!("--listen only applies to `serve`");
    }
    if kind.is_some() && name != "set" {
        bail!("--kind only applies to `set`");
    }
    if source.is_some() && !matches!(name.as_str(), "search" | "bulk") {
        bail!("--source only applies to `search` and `bulk`");
    }

    let command = match name.as_str() {
        "serve" => {
            if !rest.is_empty() {
                bail!("serve takes no positional arguments, got {rest:?}");
            }
            Command::Serve { listen }
        }
        "search" => {
            let [table, term @ ..] = rest.as_slice() else {
                bail!("usage: relabel search TABLE TERM...");
            };
            if term.is_empty() {
                bail!("usage: relabel search TABLE TERM...");
            }
            Command::Search {
                table: table.clone(),
                term: term.join(" "),
                source: source.unwrap_or_default(),
            }
        }
        "set" => {
            let [id, assignments @ ..] = rest.as_slice() else {
                bail!("usage: relabel set ID FIELD=VALUE... [--kind documentation|choice]");
            };
            if assignments.is_empty() {
                bail!("usage: relabel set ID FIELD=VALUE... [--kind documentation|choice]");
            }
            let fields = assignments
                .iter()
                .map(|assignment| parse_assignment(assignment))
                .collect::<Result<Vec<_>>>()?;
            Command::Set {
                id: id.clone(),
                kind: kind.unwrap_or(RecordKind::Documentation),
                fields,
            }
        }
        "bulk" => {
            let [table, term, field, value] = rest.as_slice() else {
                bail!("usage: relabel bulk TABLE TERM FIELD VALUE");
            };
            Command::Bulk {
                table: table.clone(),
                term: term.clone(),
                source: source.unwrap_or_default(),
                field: parse_field(field)?,
                value: value.clone(),
            }
        }
        other => bail!("unknown command {other:?}; run with --help to see supported commands"),
    };
    Ok(Some(command))
}

fn parse_assignment(raw: &str) -> Result<(EditableField, String)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected FIELD=VALUE, got {raw:?}"))?;
    Ok((parse_field(field)?, value.to_owned()))
}

fn parse_field(raw: &str) -> Result<EditableField> {
    EditableField::parse(raw)
        .ok_or_else(|| anyhow!("unknown field {raw:?}; use label, plural, hint or help"))
}

fn print_help() {
    println!("relabel: search and edit field translations");
    println!();
    println!("commands:");
    println!("  serve [--listen ADDR]                 Serve the local store over HTTP");
    println!("  search TABLE TERM... [--source S]     Search a table and its ancestors");
    println!("  set ID FIELD=VALUE... [--kind K]      Update one record");
    println!("  bulk TABLE TERM FIELD VALUE [--source S]");
    println!("                                        Search, then write VALUE into every result");
    println!();
    println!("options:");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Use seeded demo data (in-memory)");
    println!("  --check                  Validate config + DB + connection, then exit");
    println!("  --help                   Show this help");
}
