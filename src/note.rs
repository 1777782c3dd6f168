//! The note being enriched and the editor surface that owns it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FIELD_WORD: &str = "Word";
pub const FIELD_IPA: &str = "IPA";
pub const FIELD_MEANING: &str = "Meaning";
pub const FIELD_EXAMPLE: &str = "Example";
pub const FIELD_COLLOCATION: &str = "Collocation";

/// Field name → HTML mapping for one flashcard note.
///
/// The fields written by enrichment are stored separately from the rest so
/// [`NoteRecord::lanes`] can hand out disjoint mutable borrows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct NoteRecord {
    word: String,
    ipa: String,
    meaning: String,
    example: String,
    collocation: String,
    extra: BTreeMap<String, String>,
}

impl NoteRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_word(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Self::default()
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&str> {
        match name {
            FIELD_WORD => Some(&self.word),
            FIELD_IPA => Some(&self.ipa),
            FIELD_MEANING => Some(&self.meaning),
            FIELD_EXAMPLE => Some(&self.example),
            FIELD_COLLOCATION => Some(&self.collocation),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    pub fn set_field(&mut self, name: &str, html: impl Into<String>) {
        let html = html.into();
        match name {
            FIELD_WORD => self.word = html,
            FIELD_IPA => self.ipa = html,
            FIELD_MEANING => self.meaning = html,
            FIELD_EXAMPLE => self.example = html,
            FIELD_COLLOCATION => self.collocation = html,
            other => {
                self.extra.insert(other.to_string(), html);
            }
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// Splits the record into the write capabilities of the three lanes.
    pub fn lanes(&mut self) -> LaneSlots<'_> {
        LaneSlots {
            definitions: DefinitionSlot {
                ipa: &mut self.ipa,
                meaning: &mut self.meaning,
            },
            examples: ExampleSlot {
                example: &mut self.example,
            },
            collocations: CollocationSlot {
                collocation: &mut self.collocation,
            },
        }
    }
}

impl From<BTreeMap<String, String>> for NoteRecord {
    fn from(mut fields: BTreeMap<String, String>) -> Self {
        let mut take = |name: &str| fields.remove(name).unwrap_or_default();
        let word = take(FIELD_WORD);
        let ipa = take(FIELD_IPA);
        let meaning = take(FIELD_MEANING);
        let example = take(FIELD_EXAMPLE);
        let collocation = take(FIELD_COLLOCATION);
        Self {
            word,
            ipa,
            meaning,
            example,
            collocation,
            extra: fields,
        }
    }
}

impl From<NoteRecord> for BTreeMap<String, String> {
    fn from(note: NoteRecord) -> Self {
        let mut fields = note.extra;
        fields.insert(FIELD_WORD.to_string(), note.word);
        fields.insert(FIELD_IPA.to_string(), note.ipa);
        fields.insert(FIELD_MEANING.to_string(), note.meaning);
        fields.insert(FIELD_EXAMPLE.to_string(), note.example);
        fields.insert(FIELD_COLLOCATION.to_string(), note.collocation);
        fields
    }
}

pub struct LaneSlots<'a> {
    pub definitions: DefinitionSlot<'a>,
    pub examples: ExampleSlot<'a>,
    pub collocations: CollocationSlot<'a>,
}

/// `IPA` and `Meaning`, owned by the dictionary lane.
pub struct DefinitionSlot<'a> {
    ipa: &'a mut String,
    meaning: &'a mut String,
}

impl DefinitionSlot<'_> {
    pub fn replace_ipa(&mut self, ipa: &str) {
        ipa.clone_into(self.ipa);
    }

    pub fn append_meaning(&mut self, html: &str) {
        self.meaning.push_str(html);
    }
}

/// `Example`, owned by the concordance lane.
pub struct ExampleSlot<'a> {
    example: &'a mut String,
}

impl ExampleSlot<'_> {
    pub fn append(&mut self, html: &str) {
        self.example.push_str(html);
    }
}

/// `Collocation`, owned by the collocation lane.
pub struct CollocationSlot<'a> {
    collocation: &'a mut String,
}

impl CollocationSlot<'_> {
    pub fn append(&mut self, html: &str) {
        self.collocation.push_str(html);
    }
}

/// Host editor surface the enrichment trigger runs against.
pub trait EditorContext {
    /// Current HTML of a field; unknown fields read as empty.
    fn get_field(&self, name: &str) -> String;
    fn set_field(&mut self, name: &str, html: &str);
    fn refresh_display(&mut self);
}

/// Headless editor over an in-memory note. Counts refreshes.
#[derive(Debug, Default)]
pub struct MemoryEditor {
    pub note: NoteRecord,
    refreshes: usize,
}

impl MemoryEditor {
    pub fn new(note: NoteRecord) -> Self {
        Self { note, refreshes: 0 }
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    pub fn into_note(self) -> NoteRecord {
        self.note
    }
}

impl EditorContext for MemoryEditor {
    fn get_field(&self, name: &str) -> String {
        self.note.get_field(name).unwrap_or_default().to_string()
    }

    fn set_field(&mut self, name: &str, html: &str) {
        self.note.set_field(name, html);
    }

    fn refresh_display(&mut self) {
        self.refreshes += 1;
    }
}
