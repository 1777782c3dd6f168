//! Fan-out/fan-in over the three sources.
//!
//! Every lane runs to a terminal state on its own: a failure is reported to the
//! [`DiagnosticSink`] and never reaches the other lanes or the caller. The
//! coordinator returns only once all three lanes are terminal.

use crate::error::{SourceKind, SourceUnavailable};
use crate::note::{
    CollocationSlot, DefinitionSlot, EditorContext, ExampleSlot, FIELD_COLLOCATION, FIELD_EXAMPLE,
    FIELD_IPA, FIELD_MEANING, FIELD_WORD, LaneSlots, NoteRecord,
};
use crate::render::{render_collocation, render_examples, render_meanings};
use crate::sources::LexicalSources;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// A lane that ended in failure, as handed to the diagnostic sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneFailure {
    pub word: String,
    pub source: SourceKind,
    pub message: String,
}

pub trait DiagnosticSink: Send + Sync {
    fn lane_failed(&self, failure: &LaneFailure);
}

/// Reports failures as `tracing` warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn lane_failed(&self, failure: &LaneFailure) {
        warn!(
            word = %failure.word,
            source = %failure.source,
            error = %failure.message,
            "Failed to fetch word information"
        );
    }
}

/// Keeps every reported failure in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    failures: Mutex<Vec<LaneFailure>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> Vec<LaneFailure> {
        self.failures.lock().clone()
    }
}

impl DiagnosticSink for CollectingSink {
    fn lane_failed(&self, failure: &LaneFailure) {
        self.failures.lock().push(failure.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaneOutcome {
    Succeeded,
    Failed(String),
}

impl LaneOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LaneOutcome::Succeeded)
    }
}

/// Terminal state of every lane after one enrichment call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichReport {
    pub word: String,
    pub dictionary: LaneOutcome,
    pub concordance: LaneOutcome,
    pub collocation: LaneOutcome,
}

impl EnrichReport {
    pub fn outcome(&self, source: SourceKind) -> &LaneOutcome {
        match source {
            SourceKind::Dictionary => &self.dictionary,
            SourceKind::Concordance => &self.concordance,
            SourceKind::Collocation => &self.collocation,
        }
    }

    pub fn succeeded(&self) -> usize {
        SourceKind::ALL
            .iter()
            .filter(|source| self.outcome(**source).is_success())
            .count()
    }
}

pub struct Enricher<S> {
    sources: S,
    sink: Arc<dyn DiagnosticSink>,
}

impl<S: LexicalSources> Enricher<S> {
    pub fn new(sources: S) -> Self {
        Self::with_sink(sources, Arc::new(TracingSink))
    }

    pub fn with_sink(sources: S, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sources, sink }
    }

    pub fn sources(&self) -> &S {
        &self.sources
    }

    /// Queries all three sources concurrently and merges successes into `note`.
    pub async fn enrich(&self, word: &str, note: &mut NoteRecord) -> EnrichReport {
        let LaneSlots {
            definitions,
            examples,
            collocations,
        } = note.lanes();
        let (dictionary, concordance, collocation) = tokio::join!(
            self.definition_lane(word, definitions),
            self.example_lane(word, examples),
            self.collocation_lane(word, collocations),
        );
        EnrichReport {
            word: word.to_string(),
            dictionary,
            concordance,
            collocation,
        }
    }

    async fn definition_lane(&self, word: &str, mut slot: DefinitionSlot<'_>) -> LaneOutcome {
        debug!(word, source = %SourceKind::Dictionary, "Lane running");
        match self.sources.definitions(word).await {
            Ok(info) => {
                if let Some(ipa) = info.ipa.as_deref() {
                    slot.replace_ipa(ipa);
                }
                slot.append_meaning(&render_meanings(&info.meanings));
                debug!(word, meanings = info.meanings.len(), "Dictionary lane succeeded");
                LaneOutcome::Succeeded
            }
            Err(err) => self.fail(word, err),
        }
    }

    async fn example_lane(&self, word: &str, mut slot: ExampleSlot<'_>) -> LaneOutcome {
        debug!(word, source = %SourceKind::Concordance, "Lane running");
        match self.sources.examples(word).await {
            Ok(lines) => {
                slot.append(&render_examples(&lines));
                debug!(word, lines = lines.len(), "Concordance lane succeeded");
                LaneOutcome::Succeeded
            }
            Err(err) => self.fail(word, err),
        }
    }

    async fn collocation_lane(&self, word: &str, mut slot: CollocationSlot<'_>) -> LaneOutcome {
        debug!(word, source = %SourceKind::Collocation, "Lane running");
        match self.sources.collocations(word).await {
            Ok(document) => {
                slot.append(render_collocation(&document));
                debug!(word, "Collocation lane succeeded");
                LaneOutcome::Succeeded
            }
            Err(err) => self.fail(word, err),
        }
    }

    fn fail(&self, word: &str, err: SourceUnavailable) -> LaneOutcome {
        let failure = LaneFailure {
            word: word.to_string(),
            source: err.origin,
            message: err.reason.to_string(),
        };
        self.sink.lane_failed(&failure);
        LaneOutcome::Failed(failure.message)
    }
}

/// Editor trigger: reads `Word`, enriches the note, writes back the fields of
/// the lanes that succeeded and refreshes the display exactly once.
///
/// A blank word skips every source but still refreshes.
pub async fn fill_editor<E, S>(editor: &mut E, enricher: &Enricher<S>) -> Option<EnrichReport>
where
    E: EditorContext,
    S: LexicalSources,
{
    let word = editor.get_field(FIELD_WORD).trim().to_lowercase();
    if word.is_empty() {
        debug!("Word field is empty; nothing to look up");
        editor.refresh_display();
        return None;
    }

    let mut note = NoteRecord::with_word(word.clone());
    for field in [FIELD_IPA, FIELD_MEANING, FIELD_EXAMPLE, FIELD_COLLOCATION] {
        note.set_field(field, editor.get_field(field));
    }

    let report = enricher.enrich(&word, &mut note).await;

    let mut written: Vec<&str> = Vec::new();
    if report.dictionary.is_success() {
        written.extend([FIELD_IPA, FIELD_MEANING]);
    }
    if report.concordance.is_success() {
        written.push(FIELD_EXAMPLE);
    }
    if report.collocation.is_success() {
        written.push(FIELD_COLLOCATION);
    }
    for field in written {
        if let Some(html) = note.get_field(field) {
            editor.set_field(field, html);
        }
    }

    editor.refresh_display();
    Some(report)
}
