//! Turns raw response bodies from the three services into normalized models.

use crate::error::FailureReason;
use crate::model::{CollocationDocument, ExampleLine, Meaning, WordInfo};
use scraper::{ElementRef, Html, Node};
use serde::Deserialize;

#[derive(Deserialize)]
struct DictionaryEntry {
    word: String,
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<PhoneticVariant>,
    meanings: Vec<MeaningGroup>,
}

#[derive(Deserialize)]
struct PhoneticVariant {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct MeaningGroup {
    #[serde(rename = "partOfSpeech")]
    part_of_speech: String,
    definitions: Vec<DefinitionRecord>,
}

#[derive(Deserialize)]
struct DefinitionRecord {
    definition: String,
}

/// Parses a dictionaryapi.dev entries response. Only the first entry is used.
pub fn parse_dictionary(body: &[u8]) -> Result<WordInfo, FailureReason> {
    let entries: Vec<DictionaryEntry> = serde_json::from_slice(body)?;
    let entry = entries.into_iter().next().ok_or(FailureReason::Empty)?;

    let ipa = non_empty(entry.phonetic).or_else(|| {
        entry
            .phonetics
            .into_iter()
            .find_map(|variant| non_empty(variant.text))
    });

    let meanings = entry
        .meanings
        .into_iter()
        .flat_map(|group| {
            let part_of_speech = group.part_of_speech;
            group
                .definitions
                .into_iter()
                .map(move |record| Meaning::new(part_of_speech.clone(), record.definition))
        })
        .collect();

    Ok(WordInfo {
        headword: entry.word,
        ipa,
        meanings,
    })
}

#[derive(Deserialize)]
struct ConcordanceResponse {
    #[serde(rename = "Lines", default)]
    lines: Option<Vec<ConcordanceLine>>,
}

#[derive(Deserialize)]
struct ConcordanceLine {
    #[serde(rename = "Left", default)]
    left: Option<Vec<Option<Segment>>>,
    #[serde(rename = "Kwic", default)]
    kwic: Option<Vec<Option<Segment>>>,
    #[serde(rename = "Right", default)]
    right: Option<Vec<Option<Segment>>>,
}

#[derive(Deserialize)]
struct Segment {
    #[serde(rename = "Str", default)]
    text: Option<String>,
}

/// Parses a SkELL concordance response into example lines, in result order.
///
/// A missing, null or empty `Lines` list is reported as [`FailureReason::Empty`].
pub fn parse_concordance(body: &[u8]) -> Result<Vec<ExampleLine>, FailureReason> {
    let response: ConcordanceResponse = serde_json::from_slice(body)?;
    let lines = response.lines.unwrap_or_default();
    if lines.is_empty() {
        return Err(FailureReason::Empty);
    }
    Ok(lines.into_iter().map(example_from_line).collect())
}

fn example_from_line(line: ConcordanceLine) -> ExampleLine {
    let left = first_segment(line.left);
    let keyword = first_segment(line.kwic);
    let right = first_segment(line.right);

    let mut text = String::new();
    for piece in [&left, &keyword, &right].into_iter().flatten() {
        text.push_str(piece);
    }
    ExampleLine { keyword, text }
}

fn first_segment(segments: Option<Vec<Option<Segment>>>) -> Option<String> {
    segments
        .and_then(|segments| segments.into_iter().next().flatten())
        .and_then(|segment| non_empty(segment.text))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Sanitizes ozdic collocation markup.
///
/// Tag names come out lowercase, links are unwrapped, `<tt>` becomes `<kbd>` and
/// every `<b>` gets a `<br>` on both sides.
pub fn sanitize_collocation(markup: &str) -> CollocationDocument {
    let fragment = Html::parse_fragment(markup);
    let mut out = String::with_capacity(markup.len() + 64);
    write_children(fragment.root_element(), &mut out);
    CollocationDocument { raw_markup: out }
}

fn write_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => escape_into(text, out, false),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(child, out);
                }
            }
            _ => {}
        }
    }
}

fn write_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name().to_ascii_lowercase();
    match name.as_str() {
        "a" => write_children(element, out),
        "b" => {
            out.push_str("<br>");
            write_tag("b", element, out);
            out.push_str("<br>");
        }
        "tt" => write_tag("kbd", element, out),
        other => write_tag(other, element, out),
    }
}

fn write_tag(name: &str, element: ElementRef<'_>, out: &mut String) {
    out.push('<');
    out.push_str(name);
    for (key, value) in element.value().attrs() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_into(value, out, true);
        out.push('"');
    }
    out.push('>');
    if VOID_ELEMENTS.contains(&name) {
        return;
    }
    write_children(element, out);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

pub(crate) fn escape_into(text: &str, out: &mut String, attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
