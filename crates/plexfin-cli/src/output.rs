use clap::ValueEnum;
use owo_colors::OwoColorize;
use plexfin_models::MigrationSummary;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "✓".green(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({"type": "success", "message": msg.as_ref()}));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "!".yellow(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({"type": "warning", "message": msg.as_ref()}));
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", "✗".red(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({"type": "error", "message": msg.as_ref()}));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => {
                println!("{}", msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({"type": "info", "message": msg.as_ref()}));
            }
        }
    }

    /// Final migration summary; printed even in quiet mode so a scripted run
    /// always has the counts.
    pub fn summary(&self, summary: &MigrationSummary, dry_run: bool) {
        match self.format {
            OutputFormat::Human => {
                let heading = if dry_run {
                    "Migration summary (dry run)".bold().to_string()
                } else {
                    "Migration summary".bold().to_string()
                };
                println!("{}", heading);
                println!("  {} {}", "marked:".green(), summary.marked);
                println!("  {} {}", "skipped:".blue(), summary.skipped);
                println!("  {} {}", "missing:".yellow(), summary.missing);
                if summary.failed > 0 {
                    println!("  {} {}", "failed:".red(), summary.failed);
                }
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "summary",
                    "dry_run": dry_run,
                    "marked": summary.marked,
                    "skipped": summary.skipped,
                    "missing": summary.missing,
                    "failed": summary.failed,
                }));
            }
        }
    }

    fn print_json(&self, value: &serde_json::Value) {
        let rendered = match self.format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(value),
            _ => serde_json::to_string(value),
        };
        if let Ok(s) = rendered {
            println!("{}", s);
        }
    }
}
