//! Pure HTML renderers for the normalized models.

use crate::model::{CollocationDocument, ExampleLine, Meaning};
use crate::parse::escape_into;

pub const MAX_DEFINITIONS_PER_GROUP: usize = 3;

const PART_OF_SPEECH_OPEN: &str =
    "<span style='color:gray; font-weight:bold; font-style:italic;'>";
const KEYWORD_OPEN: &str = "<span style='color:red; font-weight:bold;'>";
const SPAN_CLOSE: &str = "</span>";

/// Groups meanings by part of speech (first-seen order) and renders one block
/// per group with at most [`MAX_DEFINITIONS_PER_GROUP`] definitions.
pub fn render_meanings(meanings: &[Meaning]) -> String {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for meaning in meanings {
        let pos = meaning.part_of_speech.as_str();
        match groups.iter_mut().find(|(label, _)| *label == pos) {
            Some((_, definitions)) => definitions.push(meaning.definition.as_str()),
            None => groups.push((pos, vec![meaning.definition.as_str()])),
        }
    }

    let mut html = String::new();
    for (pos, definitions) in groups {
        html.push_str("<p>");
        html.push_str(PART_OF_SPEECH_OPEN);
        escape_into(pos, &mut html, false);
        html.push_str(SPAN_CLOSE);
        html.push_str("<ul>");
        for definition in definitions.into_iter().take(MAX_DEFINITIONS_PER_GROUP) {
            html.push_str("<li>");
            escape_into(definition, &mut html, false);
            html.push_str("</li>");
        }
        html.push_str("</ul></p>");
    }
    html
}

/// Renders every line as a list item. Callers truncate beforehand.
pub fn render_examples(lines: &[ExampleLine]) -> String {
    let mut html = String::from("<ul>");
    for line in lines {
        html.push_str("<li><p>");
        render_example_text(line, &mut html);
        html.push_str("</p></li>");
    }
    html.push_str("</ul>");
    html
}

fn render_example_text(line: &ExampleLine, out: &mut String) {
    let keyword = line
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty());
    let Some(keyword) = keyword else {
        escape_into(&line.text, out, false);
        return;
    };
    // No verbatim match (casing, tokenization) leaves the text as-is.
    match line.text.find(keyword) {
        Some(start) => {
            let end = start + keyword.len();
            escape_into(&line.text[..start], out, false);
            out.push_str(KEYWORD_OPEN);
            escape_into(keyword, out, false);
            out.push_str(SPAN_CLOSE);
            escape_into(&line.text[end..], out, false);
        }
        None => escape_into(&line.text, out, false),
    }
}

pub fn render_collocation(document: &CollocationDocument) -> &str {
    document.as_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meanings_are_grouped_in_first_seen_order_and_capped() {
        let meanings = vec![
            Meaning::new("noun", "d1"),
            Meaning::new("verb", "d2"),
            Meaning::new("noun", "d3"),
            Meaning::new("noun", "d4"),
            Meaning::new("noun", "d5"),
        ];
        let html = render_meanings(&meanings);
        assert_eq!(html.matches("<p>").count(), 2);
        let noun = html.find(">noun<").unwrap();
        let verb = html.find(">verb<").unwrap();
        assert!(noun < verb);

        let noun_block = &html[..verb];
        assert_eq!(noun_block.matches("<li>").count(), 3);
        assert!(noun_block.contains("<li>d1</li><li>d3</li><li>d4</li>"));
        assert!(!html.contains("d5"));

        let verb_block = &html[verb..];
        assert_eq!(verb_block.matches("<li>").count(), 1);
        assert!(verb_block.contains("<li>d2</li>"));
    }

    #[test]
    fn grouping_keeps_exactly_one_block_per_part_of_speech() {
        let meanings = vec![
            Meaning::new("noun", "d1"),
            Meaning::new("verb", "d2"),
            Meaning::new("noun", "d3"),
            Meaning::new("noun", "d4"),
        ];
        let html = render_meanings(&meanings);
        assert_eq!(
            html,
            "<p><span style='color:gray; font-weight:bold; font-style:italic;'>noun</span>\
             <ul><li>d1</li><li>d3</li><li>d4</li></ul></p>\
             <p><span style='color:gray; font-weight:bold; font-style:italic;'>verb</span>\
             <ul><li>d2</li></ul></p>"
        );
    }

    #[test]
    fn empty_meanings_render_nothing() {
        assert_eq!(render_meanings(&[]), "");
    }

    #[test]
    fn definitions_are_escaped() {
        let html = render_meanings(&[Meaning::new("noun", "a < b & c")]);
        assert!(html.contains("<li>a &lt; b &amp; c</li>"));
    }

    #[test]
    fn first_keyword_occurrence_is_highlighted() {
        let line = ExampleLine::new(Some(" test "), "a test of the test");
        let html = render_examples(&[line]);
        assert_eq!(
            html,
            "<ul><li><p>a <span style='color:red; font-weight:bold;'>test</span> of the test</p></li></ul>"
        );
    }

    #[test]
    fn missing_keyword_leaves_text_unmodified() {
        let html = render_examples(&[
            ExampleLine::new(Some("Example"), "an example sentence"),
            ExampleLine::new(None, "no keyword"),
        ]);
        assert_eq!(
            html,
            "<ul><li><p>an example sentence</p></li><li><p>no keyword</p></li></ul>"
        );
    }

    #[test]
    fn collocation_markup_is_used_directly() {
        let doc = CollocationDocument {
            raw_markup: "<br><b>heavy</b><br> rain".to_string(),
        };
        assert_eq!(render_collocation(&doc), "<br><b>heavy</b><br> rain");
    }
}
