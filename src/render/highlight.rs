// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Longest-first span resolution and markup rendering.

use memchr::memmem;

use crate::model::{Annotations, PiiType, Relevance};

use super::text::escape_html;

pub const DEFAULT_HIGH_COLOR: &str = "#4a90e2";
pub const DEFAULT_LOW_COLOR: &str = "#ffa726";

/// The annotation that claimed a marked segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark<'a> {
    pub key: &'a str,
    pub pii_type: PiiType,
    pub relevance: Relevance,
}

/// A contiguous piece of the passage, either plain or claimed by one annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub mark: Option<Mark<'a>>,
}

/// Colors used by [`render_html`], one per relevance level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightPalette {
    pub high: String,
    pub low: String,
}

impl Default for HighlightPalette {
    fn default() -> Self {
        Self { high: DEFAULT_HIGH_COLOR.to_owned(), low: DEFAULT_LOW_COLOR.to_owned() }
    }
}

impl HighlightPalette {
    pub fn color_for(&self, relevance: Relevance) -> &str {
        match relevance {
            Relevance::High => &self.high,
            Relevance::Low => &self.low,
        }
    }
}

/// Splits `context` into plain and marked segments.
///
/// Keys are applied longest-first (byte length; ties keep `piis` order). Every non-overlapping
/// occurrence of a key is claimed unless it overlaps a range already claimed by an earlier key, so
/// a short key nested inside a longer key's match never splits it. Empty keys are ignored.
///
/// Two equal-length keys overlapping at the same position resolve to whichever comes first in
/// `piis`; callers must not rely on that.
pub fn highlight_segments<'a>(context: &'a str, piis: &'a Annotations) -> Vec<Segment<'a>> {
    let mut keys = piis.iter().filter(|(key, _)| !key.is_empty()).collect::<Vec<_>>();
    keys.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));

    // Sorted by start, pairwise disjoint.
    let mut claimed = Vec::<(usize, usize, Mark<'a>)>::new();
    for (key, annotation) in keys {
        let mark = Mark {
            key: key.as_str(),
            pii_type: annotation.pii_type(),
            relevance: annotation.relevance(),
        };
        for start in memmem::find_iter(context.as_bytes(), key.as_bytes()) {
            let end = start + key.len();
            let slot = claimed.partition_point(|(s, _, _)| *s < start);
            let overlaps_prev = slot > 0 && claimed[slot - 1].1 > start;
            let overlaps_next = claimed.get(slot).is_some_and(|(s, _, _)| *s < end);
            if overlaps_prev || overlaps_next {
                continue;
            }
            claimed.insert(slot, (start, end, mark));
        }
    }

    let mut segments = Vec::with_capacity(claimed.len() * 2 + 1);
    let mut cursor = 0usize;
    for (start, end, mark) in claimed {
        if start > cursor {
            segments.push(Segment { text: &context[cursor..start], mark: None });
        }
        segments.push(Segment { text: &context[start..end], mark: Some(mark) });
        cursor = end;
    }
    if cursor < context.len() {
        segments.push(Segment { text: &context[cursor..], mark: None });
    }
    segments
}

/// Renders `context` as HTML with every marked segment wrapped in a colored `<span>`.
pub fn render_html(context: &str, piis: &Annotations, palette: &HighlightPalette) -> String {
    let mut out = String::with_capacity(context.len() * 2);
    for segment in highlight_segments(context, piis) {
        match segment.mark {
            Some(mark) => {
                out.push_str("<span style='background-color:");
                out.push_str(palette.color_for(mark.relevance));
                out.push_str("; color:white; padding:2px 4px; border-radius:4px'>");
                out.push_str(&escape_html(segment.text));
                out.push_str("</span>");
            }
            None => out.push_str(&escape_html(segment.text)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{highlight_segments, render_html, HighlightPalette, Segment};
    use crate::model::{Annotation, Annotations, PiiType, Relevance};

    fn annotations(entries: &[(&str, Relevance)]) -> Annotations {
        entries
            .iter()
            .map(|(key, relevance)| ((*key).to_owned(), Annotation::new(PiiType::Name, *relevance)))
            .collect()
    }

    fn marked_texts<'a>(segments: &[Segment<'a>]) -> Vec<&'a str> {
        segments.iter().filter(|s| s.mark.is_some()).map(|s| s.text).collect()
    }

    fn palette() -> HighlightPalette {
        HighlightPalette { high: "H".to_owned(), low: "L".to_owned() }
    }

    fn wrap(color: &str, text: &str) -> String {
        format!(
            "<span style='background-color:{color}; color:white; padding:2px 4px; border-radius:4px'>{text}</span>"
        )
    }

    #[test]
    fn longest_key_wins_over_nested_shorter_key() {
        let context = "John Smith lives in Smith";
        let piis = annotations(&[("Smith", Relevance::High), ("John Smith", Relevance::High)]);

        let segments = highlight_segments(context, &piis);
        assert_eq!(marked_texts(&segments), vec!["John Smith", "Smith"]);
        assert_eq!(segments[0].mark.map(|m| m.key), Some("John Smith"));
        assert_eq!(segments[2].mark.map(|m| m.key), Some("Smith"));

        let html = render_html(context, &piis, &palette());
        let expected = format!("{} lives in {}", wrap("H", "John Smith"), wrap("H", "Smith"));
        assert_eq!(html, expected);
    }

    #[test]
    fn segments_cover_whole_context() {
        let context = "Ann, Bob and Ann again";
        let piis = annotations(&[("Ann", Relevance::High), ("Bob", Relevance::Low)]);
        let segments = highlight_segments(context, &piis);

        let joined = segments.iter().map(|s| s.text).collect::<String>();
        assert_eq!(joined, context);
        assert_eq!(marked_texts(&segments), vec!["Ann", "Bob", "Ann"]);
    }

    #[test]
    fn relevance_selects_color() {
        let piis = annotations(&[("Ann", Relevance::High), ("Bob", Relevance::Low)]);
        let html = render_html("Ann Bob", &piis, &palette());
        assert_eq!(html, format!("{} {}", wrap("H", "Ann"), wrap("L", "Bob")));
    }

    #[test]
    fn default_palette_uses_blue_and_orange() {
        let palette = HighlightPalette::default();
        assert_eq!(palette.color_for(Relevance::High), "#4a90e2");
        assert_eq!(palette.color_for(Relevance::Low), "#ffa726");
    }

    #[test]
    fn absent_and_empty_keys_are_not_marked() {
        let piis = annotations(&[("", Relevance::High), ("Zed", Relevance::High)]);
        let segments = highlight_segments("plain text", &piis);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].mark.is_none());
    }

    #[test]
    fn repeated_key_occurrences_do_not_overlap() {
        let piis = annotations(&[("aa", Relevance::Low)]);
        let segments = highlight_segments("aaa", &piis);
        assert_eq!(marked_texts(&segments), vec!["aa"]);
        assert_eq!(segments.last().map(|s| s.text), Some("a"));
    }

    #[test]
    fn partially_overlapping_shorter_key_is_skipped_only_where_it_collides() {
        let piis = annotations(&[("New York", Relevance::High), ("York City", Relevance::Low)]);
        let segments = highlight_segments("New York City; York City", &piis);
        // "York City" (9 bytes) goes first and claims both of its occurrences, so the 8-byte
        // "New York" collides at position 0.
        assert_eq!(marked_texts(&segments), vec!["York City", "York City"]);
    }

    #[test]
    fn html_output_escapes_passage_text() {
        let piis = annotations(&[("<b>", Relevance::High)]);
        let html = render_html("x <b> & y", &piis, &palette());
        assert_eq!(html, format!("x {} &amp; y", wrap("H", "&lt;b&gt;")));
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let piis = annotations(&[("Zoë", Relevance::High)]);
        let segments = highlight_segments("Grüße an Zoë!", &piis);
        assert_eq!(
            segments.iter().map(|s| s.text).collect::<Vec<_>>(),
            vec!["Grüße an ", "Zoë", "!"]
        );
    }
}
