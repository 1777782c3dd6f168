use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use notegloss::note::{FIELD_COLLOCATION, FIELD_EXAMPLE, FIELD_IPA, FIELD_MEANING};
use notegloss::{
    CollectingSink, DiagnosticSink, EnrichConfig, EnrichReport, Enricher, HttpSources, LaneFailure,
    LaneOutcome, MemoryEditor, NoteRecord, SourceKind, TracingSink, fill_editor,
};
use serde_json::json;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "notegloss",
    about = "Fill flashcard notes from public word APIs",
    version
)]
pub struct Cli {
    /// Emit JSON instead of human-readable output.
    #[arg(long, global = true)]
    json: bool,

    /// Per-request timeout in seconds (overrides NOTEGLOSS_TIMEOUT_SECS).
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Number of concordance examples to keep (overrides NOTEGLOSS_MAX_EXAMPLES).
    #[arg(long, global = true)]
    max_examples: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enrich a fresh note for each word and print its fields.
    Lookup {
        /// One or more words to look up.
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Enrich a note stored as a JSON object of field name to HTML.
    Fill {
        /// Path to the note JSON file.
        path: PathBuf,
        /// Write the enriched note back to the file instead of printing it.
        #[arg(long)]
        in_place: bool,
    },
}

/// Forwards failures to both the tracing log and an in-memory list for the report.
struct CliSink {
    collected: CollectingSink,
}

impl DiagnosticSink for CliSink {
    fn lane_failed(&self, failure: &LaneFailure) {
        TracingSink.lane_failed(failure);
        self.collected.lane_failed(failure);
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut config = EnrichConfig::from_env()?;
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs.max(1));
    }
    if let Some(limit) = cli.max_examples {
        config.max_examples = limit.max(1);
    }
    info!(
        timeout_secs = config.timeout.as_secs(),
        max_examples = config.max_examples,
        dictionary = %config.endpoints.dictionary,
        "Configured sources"
    );

    let sources = HttpSources::new(config)?;
    let sink = Arc::new(CliSink {
        collected: CollectingSink::new(),
    });
    let enricher = Enricher::with_sink(sources, sink.clone());
    let runtime = tokio::runtime::Runtime::new()?;

    let outcome = match cli.command {
        Command::Lookup { words } => runtime.block_on(handle_lookup(&enricher, words, cli.json)),
        Command::Fill { path, in_place } => {
            runtime.block_on(handle_fill(&enricher, path, in_place, cli.json))
        }
    };
    outcome?;

    let failures = sink.collected.failures();
    if !failures.is_empty() && !cli.json {
        eprintln!();
        for failure in failures {
            eprintln!(
                "warning: {} lookup for {:?} failed: {}",
                failure.source, failure.word, failure.message
            );
        }
    }
    Ok(())
}

async fn handle_lookup(
    enricher: &Enricher<HttpSources>,
    words: Vec<String>,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let mut payload = Vec::new();
    for word in words {
        let mut editor = MemoryEditor::new(NoteRecord::with_word(word.clone()));
        let report = fill_editor(&mut editor, enricher).await;
        let note = editor.into_note();
        if as_json {
            payload.push(json!({
                "word": word,
                "note": note,
                "lanes": report.as_ref().map(report_to_json),
            }));
        } else {
            print_note(&word, &note, report.as_ref());
        }
    }
    if as_json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }
    Ok(())
}

async fn handle_fill(
    enricher: &Enricher<HttpSources>,
    path: PathBuf,
    in_place: bool,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let raw = fs::read_to_string(&path)
        .map_err(|err| format!("Failed to read note {}: {err}", path.display()))?;
    let note: NoteRecord = serde_json::from_str(&raw)
        .map_err(|err| format!("Note {} is not a JSON object of fields: {err}", path.display()))?;

    let mut editor = MemoryEditor::new(note);
    let report = fill_editor(&mut editor, enricher).await;
    let note = editor.into_note();
    let rendered = serde_json::to_string_pretty(&note)?;

    if in_place {
        fs::write(&path, format!("{rendered}\n"))?;
        info!(path = %path.display(), "Wrote enriched note");
        if !as_json {
            if let Some(report) = &report {
                print_summary(report);
            }
        }
    } else if as_json {
        println!("{rendered}");
    } else {
        print_note(note.word(), &note, report.as_ref());
    }
    Ok(())
}

fn report_to_json(report: &EnrichReport) -> serde_json::Value {
    let lanes: serde_json::Map<String, serde_json::Value> = SourceKind::ALL
        .iter()
        .map(|source| {
            let value = match report.outcome(*source) {
                LaneOutcome::Succeeded => json!({"ok": true}),
                LaneOutcome::Failed(message) => json!({"ok": false, "error": message}),
            };
            (source.to_string(), value)
        })
        .collect();
    serde_json::Value::Object(lanes)
}

fn print_note(word: &str, note: &NoteRecord, report: Option<&EnrichReport>) {
    println!("Word: {word}");
    let Some(report) = report else {
        println!("  (nothing to look up)");
        return;
    };
    for field in [FIELD_IPA, FIELD_MEANING, FIELD_EXAMPLE, FIELD_COLLOCATION] {
        let value = note.get_field(field).unwrap_or_default();
        if value.is_empty() {
            println!("{field}: <empty>");
        } else {
            println!("{field}: {value}");
        }
    }
    print_summary(report);
}

fn print_summary(report: &EnrichReport) {
    println!(
        "Sources: {}/{} succeeded",
        report.succeeded(),
        SourceKind::ALL.len()
    );
}
