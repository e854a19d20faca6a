//! PDF rendering
//!
//! A4 pages with the builtin Helvetica faces. Builtin fonts only cover
//! WinAnsi, so text is reduced to printable ASCII before drawing.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

use super::{Report, REPORT_TITLE};
use crate::error::{AdvisorError, Result};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LAYER: &str = "Layer 1";

/// Characters per wrapped body line at 11pt across the printable width
const WRAP_COLUMNS: usize = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Style {
    Title,
    Heading,
    Body,
    Gap,
}

impl Style {
    const fn font_size(self) -> f32 {
        match self {
            Self::Title => 16.0,
            Self::Heading => 12.0,
            Self::Body | Self::Gap => 11.0,
        }
    }

    /// Vertical space consumed, in millimetres
    const fn advance(self) -> f32 {
        match self {
            Self::Title => 10.0,
            Self::Heading => 8.0,
            Self::Body => 6.0,
            Self::Gap => 4.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Line {
    style: Style,
    text: String,
}

impl Line {
    fn new(style: Style, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    fn gap() -> Self {
        Self::new(Style::Gap, "")
    }
}

fn to_ascii(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '*',
            '\u{20B9}' => 'R',
            '\t' => ' ',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}

/// Greedy word wrap; words longer than `width` are split
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let (head, tail) = word.split_at(width);
            lines.push(head.to_string());
            word = tail;
        }

        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn layout(report: &Report) -> Vec<Line> {
    let mut lines = vec![
        Line::new(Style::Title, REPORT_TITLE),
        Line::new(Style::Body, report.generated_label()),
    ];

    for section in report.sections() {
        lines.push(Line::gap());
        lines.push(Line::new(Style::Heading, section.title));
        for raw in &section.lines {
            let wrapped = wrap(&to_ascii(raw), WRAP_COLUMNS);
            if wrapped.is_empty() {
                lines.push(Line::gap());
            }
            lines.extend(wrapped.into_iter().map(|t| Line::new(Style::Body, t)));
        }
    }
    lines
}

/// Split lines into pages so that none crosses the bottom margin
fn paginate(lines: Vec<Line>) -> Vec<Vec<Line>> {
    let usable = PAGE_HEIGHT - 2.0 * MARGIN;
    let mut pages = vec![Vec::new()];
    let mut used = 0.0_f32;

    for line in lines {
        let advance = line.style.advance();
        if used + advance > usable && !pages.last().is_some_and(Vec::is_empty) {
            pages.push(Vec::new());
            used = 0.0;
        }
        used += advance;
        if let Some(page) = pages.last_mut() {
            page.push(line);
        }
    }
    pages
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self> {
        Ok(Self {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| AdvisorError::Report(e.to_string()))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| AdvisorError::Report(e.to_string()))?,
        })
    }

    const fn for_style(&self, style: Style) -> &IndirectFontRef {
        match style {
            Style::Title | Style::Heading => &self.bold,
            Style::Body | Style::Gap => &self.regular,
        }
    }
}

pub(super) fn render(report: &Report) -> Result<Vec<u8>> {
    let pages = paginate(layout(report));

    let (doc, first_page, first_layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
    let fonts = Fonts::load(&doc)?;

    for (index, lines) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
            doc.get_page(page).get_layer(layer)
        };

        let mut y = PAGE_HEIGHT - MARGIN;
        for line in lines {
            y -= line.style.advance();
            if line.style != Style::Gap {
                layer.use_text(
                    line.text.as_str(),
                    line.style.font_size(),
                    Mm(MARGIN),
                    Mm(y),
                    fonts.for_style(line.style),
                );
            }
        }
    }

    tracing::debug!(pages = pages.len(), "Rendered PDF report");

    doc.save_to_bytes()
        .map_err(|e| AdvisorError::Report(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskProfile, UserProfile};
    use rust_decimal_macros::dec;

    fn report(explanation: &str) -> Report {
        let profile = UserProfile::new(30, dec!(50000), RiskProfile::Low, "retirement");
        Report::new(profile, explanation)
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.iter().all(|l| l.len() <= 10));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap("   ", 4).is_empty());
    }

    #[test]
    fn test_to_ascii() {
        assert_eq!(to_ascii("It\u{2019}s \u{2014} fine"), "It's - fine");
        assert_eq!(to_ascii("\u{1F4C8}"), "?");
    }

    #[test]
    fn test_long_explanation_spills_onto_new_pages() {
        let explanation = vec!["Diversify across equity, debt and gold."; 120].join("\n");
        let pages = paginate(layout(&report(&explanation)));

        assert!(pages.len() > 1);
        let usable = PAGE_HEIGHT - 2.0 * MARGIN;
        for page in &pages {
            let height: f32 = page.iter().map(|l| l.style.advance()).sum();
            assert!(height <= usable);
        }
        assert_eq!(pages[0][0].style, Style::Title);
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = report("Short and sweet.").render_pdf().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
