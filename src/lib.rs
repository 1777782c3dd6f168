pub mod config;
pub mod enrich;
pub mod error;
pub mod model;
pub mod note;
pub mod parse;
pub mod render;
pub mod sources;

pub use config::{EnrichConfig, Endpoints};
pub use enrich::{
    CollectingSink, DiagnosticSink, EnrichReport, Enricher, LaneFailure, LaneOutcome, TracingSink,
    fill_editor,
};
pub use error::{ConfigError, FailureReason, SourceKind, SourceUnavailable};
pub use model::{CollocationDocument, ExampleLine, Meaning, WordInfo};
pub use note::{EditorContext, MemoryEditor, NoteRecord};
pub use sources::{HttpSources, LexicalSources};

