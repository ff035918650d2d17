use gpui::{FontWeight, Hsla, StyledText, TextRun, font};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use crate::i18n::format_template;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InlineSpan {
    pub text: String,
    pub strong: bool,
    pub emphasis: bool,
}

/// Flattens inline markdown into styled spans. Block structure is dropped;
/// paragraphs are joined with a space.
pub fn parse_inline(source: &str) -> Vec<InlineSpan> {
    let mut spans: Vec<InlineSpan> = Vec::new();
    let mut strong = 0usize;
    let mut emphasis = 0usize;
    let mut paragraphs = 0usize;

    for event in Parser::new(source) {
        let text = match event {
            Event::Start(Tag::Strong) => {
                strong += 1;
                continue;
            }
            Event::End(TagEnd::Strong) => {
                strong = strong.saturating_sub(1);
                continue;
            }
            Event::Start(Tag::Emphasis) => {
                emphasis += 1;
                continue;
            }
            Event::End(TagEnd::Emphasis) => {
                emphasis = emphasis.saturating_sub(1);
                continue;
            }
            Event::Start(Tag::Paragraph) => {
                paragraphs += 1;
                if paragraphs == 1 {
                    continue;
                }
                " ".to_string()
            }
            Event::Text(text) | Event::Code(text) => text.to_string(),
            Event::SoftBreak => " ".to_string(),
            Event::HardBreak => "\n".to_string(),
            _ => continue,
        };
        push_span(&mut spans, text, strong > 0, emphasis > 0);
    }

    spans
}

/// Parses `template` first and interpolates afterwards, so parameter values
/// never introduce markup of their own.
pub fn render_template(template: &str, params: &[(&str, &str)]) -> Vec<InlineSpan> {
    parse_inline(template)
        .into_iter()
        .map(|span| InlineSpan {
            text: format_template(&span.text, params),
            ..span
        })
        .collect()
}

pub fn plain_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}

pub fn styled_text(spans: &[InlineSpan], color: Hsla, strong_color: Hsla) -> StyledText {
    let mut text = String::new();
    let mut runs = Vec::with_capacity(spans.len());

    for span in spans.iter().filter(|span| !span.text.is_empty()) {
        text.push_str(&span.text);
        let mut run = TextRun {
            len: span.text.len(),
            font: font(".SystemUIFont"),
            color,
            background_color: None,
            underline: None,
            strikethrough: None,
        };
        if span.strong {
            run.font.weight = FontWeight::BOLD;
            run.color = strong_color;
        }
        if span.emphasis {
            run.font.style = gpui::FontStyle::Italic;
        }
        runs.push(run);
    }

    StyledText::new(text).with_runs(runs)
}

fn push_span(spans: &mut Vec<InlineSpan>, text: String, strong: bool, emphasis: bool) {
    if let Some(last) = spans.last_mut()
        && last.strong == strong
        && last.emphasis == emphasis
    {
        last.text.push_str(&text);
        return;
    }
    spans.push(InlineSpan {
        text,
        strong,
        emphasis,
    });
}
