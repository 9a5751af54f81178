//! Output coordinator: routes to table/JSON/YAML rendering
//! and respects `--quiet` ("silences both streams"). Grounded in the
//! teacher's `OutputContext` (`examples/joyshmitz-beads_rust/src/output/
//! context.rs`), narrowed to the three formats this spec names.

use clap::ValueEnum;
use serde::Serialize;

use crate::ops::InfoReport;
use crate::output::table;
use crate::output::theme::Theme;
use crate::output::view::RecordView;
use crate::storage::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lower")]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

pub struct OutputContext {
    format: OutputFormat,
    quiet: bool,
    theme: Theme,
}

impl OutputContext {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        OutputContext {
            format,
            quiet,
            theme: Theme,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn views(records: &[Record], no_values: bool) -> Vec<RecordView> {
        records
            .iter()
            .map(|r| RecordView::from_record(r, no_values))
            .collect()
    }

    /// `list` output: a numbered key/value listing.
    pub fn print_listing(&self, records: &[Record], no_values: bool) {
        if self.quiet {
            return;
        }
        let views = Self::views(records, no_values);
        match self.format {
            OutputFormat::Table => println!("{}", table::render_listing(&views)),
            OutputFormat::Json => self.print_json(&views),
            OutputFormat::Yaml => self.print_yaml(&views),
        }
    }

    /// `history list` output: one key's full history, oldest first.
    pub fn print_history(&self, records: &[Record], no_values: bool) {
        if self.quiet {
            return;
        }
        let views = Self::views(records, no_values);
        match self.format {
            OutputFormat::Table => println!("{}", table::render_history(&views)),
            OutputFormat::Json => self.print_json(&views),
            OutputFormat::Yaml => self.print_yaml(&views),
        }
    }

    /// `get` output: a single resolved value.
    pub fn print_value(&self, value: &str) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Table => println!("{value}"),
            OutputFormat::Json => self.print_json(&serde_json::json!({ "value": value })),
            OutputFormat::Yaml => self.print_yaml(&serde_json::json!({ "value": value })),
        }
    }

    /// `info` output.
    pub fn print_info(&self, report: &InfoReport) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Table => {
                println!("Database:   {}", report.db_path.display());
                println!("Backup:     {}", report.backup_path.display());
                println!("Keys:       {}", report.total_keys);
                println!("Records:    {}", report.total_records);
                println!(
                    "History:    keep {} version(s), prune tombstones after {} day(s)",
                    report.config.history_length, report.config.prune_history_after_days
                );
            }
            OutputFormat::Json => self.print_json(report),
            OutputFormat::Yaml => self.print_yaml(report),
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet && self.format == OutputFormat::Table {
            println!("{}", self.theme.success(message));
        }
    }

    pub fn error(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", self.theme.error(message));
        }
    }

    fn print_json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => eprintln!("failed to render JSON output: {err}"),
        }
    }

    fn print_yaml<T: Serialize>(&self, value: &T) {
        match serde_yaml::to_string(value) {
            Ok(rendered) => print!("{rendered}"),
            Err(err) => eprintln!("failed to render YAML output: {err}"),
        }
    }
}
