//! `acm` command-line host.
//!
//! # Responsibility
//! - Drive the access-control matrix core from a terminal: metadata,
//!   matrix editing, report rendering and JSON export.
//! - Resolve configuration from `ACM_*` environment, overridden by flags.
//!
//! # Invariants
//! - `add`/`edit` go through the same editor flow as the UI host.
//! - Field keys outside the matrix schema are rejected before any write.

#![forbid(unsafe_code)]

use std::path::PathBuf;

use acm_core::db::open_db;
use acm_core::{
    init_logging_from_config, parse_matrix_kind, parse_metadata_field, render_html,
    render_markdown, schema_for, today_utc, AppConfig, AppShell, EditorTableBody, InputMode,
    MatrixEditor, MatrixKind, MetadataField, MetadataInput, RecordId, SqliteBlobRepository, View,
    CONFIGURATION_NOTE,
};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

/// Access control matrix builder for CMMC Level 2 documentation.
#[derive(Parser, Debug)]
#[command(name = "acm", version, about, long_about = None)]
struct Cli {
    /// SQLite file holding the saved matrices.
    #[arg(long, global = true, value_name = "PATH", env = "ACM_DB_PATH")]
    db: Option<PathBuf>,

    /// Directory for rolling log files; logging is off when unset.
    #[arg(long, global = true, value_name = "DIR", env = "ACM_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, value_name = "LEVEL", env = "ACM_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the navigable views.
    Views,
    /// Show or change report metadata.
    Meta {
        #[command(subcommand)]
        command: MetaCommands,
    },
    /// Describe the columns of a matrix (tech|shared|cmmc).
    Schema { matrix: String },
    /// Print a matrix table.
    List { matrix: String },
    /// Append a record.
    Add {
        matrix: String,
        /// Column value as `key=value`; repeatable.
        #[arg(long = "field", short = 'f', value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Overwrite columns of an existing record.
    Edit {
        matrix: String,
        id: String,
        /// Column value as `key=value`; repeatable.
        #[arg(long = "field", short = 'f', value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Remove a record immediately.
    Delete { matrix: String, id: String },
    /// Render the access control matrix report.
    Report {
        #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,
        /// Write to a file instead of stdout.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Write the dated JSON export.
    Export {
        #[arg(long, value_name = "DIR", env = "ACM_EXPORT_DIR")]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum MetaCommands {
    Show,
    Set { field: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Markdown,
    Html,
}

type Shell<'conn> = AppShell<SqliteBlobRepository<'conn>>;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli);
    init_logging_from_config(&config).map_err(|err| anyhow!(err))?;

    match cli.command {
        Commands::Views => {
            print_views();
            Ok(())
        }
        Commands::Schema { matrix } => run_schema(&matrix),
        Commands::Meta { command } => with_shell(&config, |shell| run_meta(shell, command)),
        Commands::List { matrix } => with_shell(&config, |shell| run_list(shell, &matrix)),
        Commands::Add { matrix, fields } => {
            with_shell(&config, |shell| run_add(shell, &matrix, &fields))
        }
        Commands::Edit { matrix, id, fields } => {
            with_shell(&config, |shell| run_edit(shell, &matrix, &id, &fields))
        }
        Commands::Delete { matrix, id } => {
            with_shell(&config, |shell| run_delete(shell, &matrix, &id))
        }
        Commands::Report { format, out } => {
            with_shell(&config, |shell| run_report(shell, format, out))
        }
        Commands::Export { dir } => {
            let dir = dir.unwrap_or_else(|| config.export_dir.clone());
            with_shell(&config, |shell| run_export(shell, dir))
        }
    }
}

/// Opens storage and runs one command against the loaded shell.
fn with_shell<T>(
    config: &AppConfig,
    run: impl FnOnce(&mut Shell<'_>) -> Result<T>,
) -> Result<T> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let repo = SqliteBlobRepository::try_new(&conn).context("storage is not ready")?;
    let mut shell = AppShell::open(repo).context("failed to load saved matrices")?;
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        config.db_path.display()
    );
    run(&mut shell)
}

fn resolve_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config
}

fn print_views() {
    for view in View::ALL {
        println!("{:<8} {:<28} {}", view.id(), view.label(), view.description());
    }
}

fn run_meta(shell: &mut Shell<'_>, command: MetaCommands) -> Result<()> {
    match command {
        MetaCommands::Show => {
            let metadata = &shell.state().metadata;
            for field in MetadataField::ALL {
                println!("{}", metadata_line(field, metadata.get(field)));
            }
            println!();
            println!("Note: {CONFIGURATION_NOTE}");
        }
        MetaCommands::Set { field, value } => {
            let field = parse_metadata_field(&field).ok_or_else(|| {
                let known = MetadataField::ALL.map(MetadataField::wire_name).join(", ");
                anyhow!("unknown metadata field `{field}` (expected one of: {known})")
            })?;
            shell
                .set_metadata_field(field, value)
                .context("failed to save metadata")?;
            println!("Saved {}.", field.label());
        }
    }
    Ok(())
}

fn metadata_line(field: MetadataField, value: &str) -> String {
    let label = match field.input() {
        MetadataInput::Date => format!("{} (YYYY-MM-DD):", field.label()),
        MetadataInput::Text => format!("{}:", field.label()),
    };
    format!("{label:<34} {value}")
}

fn run_schema(matrix: &str) -> Result<()> {
    let schema = schema_for(parse_matrix(matrix)?);
    println!("{}", schema.title);
    println!("{}", schema.description);
    if let Some(note) = schema.educational_note {
        println!("Note: {note}");
    }
    println!();
    for column in schema.columns {
        let input = match column.input {
            InputMode::FreeText => String::from("text"),
            InputMode::Choice(choices) => format!("one of: {}", choices.join(" | ")),
        };
        println!("{:<14} {:<36} {}", column.key, column.label, input);
    }
    Ok(())
}

fn run_list(shell: &Shell<'_>, matrix: &str) -> Result<()> {
    let kind = parse_matrix(matrix)?;
    let editor = MatrixEditor::new(schema_for(kind));
    let table = editor.table(&shell.rows(kind));
    // The id column stands in for the action buttons.
    let data_headers = &table.headers[..table.headers.len() - 1];
    println!("{:<36}  {}", "Id", data_headers.join(" | "));
    match table.body {
        EditorTableBody::Empty(marker) => println!("{marker}"),
        EditorTableBody::Rows(rows) => {
            for row in rows {
                println!("{}  {}", row.id, row.cells.join(" | "));
            }
        }
    }
    Ok(())
}

fn run_add(shell: &mut Shell<'_>, matrix: &str, fields: &[String]) -> Result<()> {
    let kind = parse_matrix(matrix)?;
    let overrides = parse_field_args(kind, fields)?;
    let mut editor = MatrixEditor::new(schema_for(kind));
    editor.open_add();
    for (key, value) in overrides {
        editor.change_field(&key, value);
    }
    let intent = editor
        .save()
        .ok_or_else(|| anyhow!("editor form closed unexpectedly"))?;
    match shell.apply(kind, intent).context("failed to save entry")? {
        Some(id) => println!("Added {id}"),
        None => println!("Nothing added."),
    }
    Ok(())
}

fn run_edit(shell: &mut Shell<'_>, matrix: &str, id: &str, fields: &[String]) -> Result<()> {
    let kind = parse_matrix(matrix)?;
    let id = parse_id(id)?;
    let overrides = parse_field_args(kind, fields)?;
    let row = shell
        .rows(kind)
        .into_iter()
        .find(|row| row.id == id)
        .ok_or_else(|| anyhow!("no {kind} entry with id {id}"))?;

    let mut editor = MatrixEditor::new(schema_for(kind));
    editor.open_edit(&row);
    for (key, value) in overrides {
        editor.change_field(&key, value);
    }
    let intent = editor
        .save()
        .ok_or_else(|| anyhow!("editor form closed unexpectedly"))?;
    shell.apply(kind, intent).context("failed to save entry")?;
    println!("Updated {id}");
    Ok(())
}

fn run_delete(shell: &mut Shell<'_>, matrix: &str, id: &str) -> Result<()> {
    let kind = parse_matrix(matrix)?;
    let id = parse_id(id)?;
    let existed = shell.rows(kind).iter().any(|row| row.id == id);
    let editor = MatrixEditor::new(schema_for(kind));
    shell
        .apply(kind, editor.delete(id))
        .context("failed to delete entry")?;
    if existed {
        println!("Deleted {id}");
    } else {
        println!("No {kind} entry with id {id}; nothing changed.");
    }
    Ok(())
}

fn run_report(shell: &Shell<'_>, format: ReportFormat, out: Option<PathBuf>) -> Result<()> {
    let doc = shell.render_report();
    let rendered = match format {
        ReportFormat::Markdown => render_markdown(&doc),
        ReportFormat::Html => render_html(&doc),
    };
    match out {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn run_export(shell: &Shell<'_>, dir: PathBuf) -> Result<()> {
    let export = shell.export(today_utc()).context("failed to build export")?;
    let path = export
        .write_to_dir(&dir)
        .with_context(|| format!("failed to write export into `{}`", dir.display()))?;
    println!("Exported to {}", path.display());
    Ok(())
}

fn parse_matrix(value: &str) -> Result<MatrixKind> {
    parse_matrix_kind(value)
        .ok_or_else(|| anyhow!("unknown matrix `{value}` (expected tech, shared or cmmc)"))
}

fn parse_id(value: &str) -> Result<RecordId> {
    RecordId::parse_str(value.trim()).with_context(|| format!("invalid record id `{value}`"))
}

/// Splits `key=value` arguments, rejecting keys outside the schema.
fn parse_field_args(kind: MatrixKind, args: &[String]) -> Result<Vec<(String, String)>> {
    let schema = schema_for(kind);
    args.iter()
        .map(|arg| {
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| anyhow!("field `{arg}` must look like key=value"))?;
            let key = key.trim();
            if schema.column(key).is_none() {
                let known = schema.keys().collect::<Vec<_>>().join(", ");
                bail!("unknown {kind} field `{key}` (expected one of: {known})");
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}
