use std::collections::BTreeMap;
use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use leia_models::{LeiaMessage, SchemaKey};
use leia_validator::LeiaMessageViolation;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationOutput<'a> {
    schema_key: &'a SchemaKey,
    valid: bool,
    violations: &'a [LeiaMessageViolation],
}

pub fn print_violations(
    schema_key: &SchemaKey,
    violations: &[LeiaMessageViolation],
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => print_json(&ValidationOutput {
            schema_key,
            valid: violations.is_empty(),
            violations,
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VIOLATION"]);
            for violation in violations {
                table.add_row(vec![violation.field_path.clone(), violation.message.clone()]);
            }
            println!("{schema_key}: {}", validity(violations));
            if !violations.is_empty() {
                println!("{table}");
            }
        }
        OutputFormat::Pretty => {
            println!("{schema_key}: {}", validity(violations));
            for violation in violations {
                println!("  {violation}");
            }
        }
    }
}

pub fn print_messages(messages: &BTreeMap<SchemaKey, LeiaMessage>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&messages.values().collect::<Vec<_>>()),
        OutputFormat::Table => {
            let mut table = new_table(vec!["SCHEMA", "TAGS", "MESSAGE"]);
            for message in messages.values() {
                table.add_row(vec![
                    message.schema_key.to_string(),
                    join_tags(message),
                    message.message.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for message in messages.values() {
                println!(
                    "schema={} tags=[{}] message={}",
                    message.schema_key,
                    join_tags(message),
                    message.message
                );
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotOutput<'a> {
    name: &'a str,
    schemas: usize,
    updated_at: i64,
}

pub fn print_snapshot(name: &str, schemas: usize, updated_at: i64, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&SnapshotOutput {
            name,
            schemas,
            updated_at,
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["REFRESHER", "SCHEMAS", "UPDATED AT (MS)"]);
            table.add_row(vec![
                name.to_string(),
                schemas.to_string(),
                updated_at.to_string(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("refresher={name} schemas={schemas} updated_at={updated_at}");
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn validity(violations: &[LeiaMessageViolation]) -> &'static str {
    if violations.is_empty() {
        "valid"
    } else {
        "invalid"
    }
}

fn join_tags(message: &LeiaMessage) -> String {
    message
        .tags
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
