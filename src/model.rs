use serde::Serialize;

/// Normalized result of a dictionary lookup.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct WordInfo {
    pub headword: String,
    pub ipa: Option<String>,
    pub meanings: Vec<Meaning>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Meaning {
    pub part_of_speech: String,
    pub definition: String,
}

impl Meaning {
    pub fn new(part_of_speech: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            part_of_speech: part_of_speech.into(),
            definition: definition.into(),
        }
    }
}

/// One concordance line: the full sentence plus the keyword-in-context span.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ExampleLine {
    pub keyword: Option<String>,
    pub text: String,
}

impl ExampleLine {
    pub fn new(keyword: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            keyword: keyword.map(str::to_string),
            text: text.into(),
        }
    }
}

/// Collocation markup after sanitization, ready to be used as field HTML.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct CollocationDocument {
    pub raw_markup: String,
}

impl CollocationDocument {
    pub fn as_html(&self) -> &str {
        &self.raw_markup
    }
}
