//! Redaction overlays: resolve a list of literal terms against the rendered
//! text and produce opaque rectangles covering each first occurrence.

use shy_core::{MatchStrategy, Rect};
use shy_text::TextLayout;

/// A resolved redaction: byte range plus the rectangle spanning the first
/// character's top-left to the last character's bottom-right.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub rect: Rect,
}

/// Resolve `terms` against `text`, first occurrence only per term.
///
/// All-or-nothing: any term that fails to resolve (absent, or empty) aborts
/// the whole pass and yields no spans — a partially resolved list would draw
/// boxes over the wrong regions.
pub fn locate(
    text: &str,
    terms: &[String],
    strategy: MatchStrategy,
    layout: &TextLayout,
) -> Vec<HighlightSpan> {
    if terms.is_empty() {
        return Vec::new();
    }

    let mut pairs = Vec::with_capacity(terms.len());
    for term in terms {
        let Some(last) = term.chars().last() else {
            return Vec::new();
        };
        let Some(start) = text.find(term.as_str()) else {
            return Vec::new();
        };
        let end = match strategy {
            // First occurrence of the term's last character at or after the
            // match start. See `MatchStrategy::TrailingChar` for the caveat.
            MatchStrategy::TrailingChar => {
                let Some(rel) = text[start..].find(last) else {
                    return Vec::new();
                };
                start + rel + last.len_utf8()
            }
            MatchStrategy::ExactLength => start + term.len(),
        };
        pairs.push((start, end));
    }

    pairs
        .into_iter()
        .map(|(start, end)| {
            let a = layout.caret(start);
            let b = layout.caret(end);
            let ra = Rect {
                x: a.x,
                y: a.y,
                w: 0.0,
                h: a.height,
            };
            let rb = Rect {
                x: b.x,
                y: b.y,
                w: 0.0,
                h: b.height,
            };
            HighlightSpan {
                start,
                end,
                rect: ra.union(&rb),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shy_text::{MonospaceEngine, measure, set_shape_engine};

    fn mono() {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| set_shape_engine(Box::new(MonospaceEngine)));
    }

    fn terms(ts: &[&str]) -> Vec<String> {
        ts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_terms_no_spans() {
        mono();
        let text = "abc def";
        let layout = measure(text, 10.0, None, None);
        assert!(locate(text, &[], MatchStrategy::TrailingChar, &layout).is_empty());
    }

    #[test]
    fn absent_term_aborts_whole_pass() {
        mono();
        let text = "abc def";
        let layout = measure(text, 10.0, None, None);
        assert!(locate(text, &terms(&["xyz"]), MatchStrategy::TrailingChar, &layout).is_empty());
        // even when another term would resolve
        assert!(
            locate(
                text,
                &terms(&["abc", "xyz"]),
                MatchStrategy::TrailingChar,
                &layout
            )
            .is_empty()
        );
    }

    #[test]
    fn spans_come_back_in_input_order_covering_whole_words() {
        mono();
        let text = "Lorem ipsum sit";
        let layout = measure(text, 10.0, None, None);
        let spans = locate(
            text,
            &terms(&["Lorem", "sit"]),
            MatchStrategy::TrailingChar,
            &layout,
        );
        assert_eq!(spans.len(), 2);

        // "Lorem": bytes 0..5, five clusters of 6px
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].end, 5);
        assert_eq!(spans[0].rect.x, 0.0);
        assert_eq!(spans[0].rect.w, 30.0);

        // "sit": bytes 12..15 at the end of the line
        assert_eq!(spans[1].start, 12);
        assert_eq!(spans[1].end, 15);
        assert_eq!(spans[1].rect.x, 72.0);
        assert_eq!(spans[1].rect.w, 18.0);
    }

    #[test]
    fn trailing_char_stops_at_repeated_character() {
        mono();
        // "noon": the last character 'n' first occurs at the match start, so
        // the trailing-char strategy covers a single character.
        let text = "around noon time";
        let layout = measure(text, 10.0, None, None);

        let fragile = locate(
            text,
            &terms(&["noon"]),
            MatchStrategy::TrailingChar,
            &layout,
        );
        assert_eq!(fragile.len(), 1);
        assert_eq!(fragile[0].end - fragile[0].start, 1);
        assert_eq!(fragile[0].rect.w, 6.0);

        let exact = locate(text, &terms(&["noon"]), MatchStrategy::ExactLength, &layout);
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].end - exact[0].start, 4);
        assert_eq!(exact[0].rect.w, 24.0);
    }

    #[test]
    fn first_occurrence_only() {
        mono();
        let text = "dup text dup";
        let layout = measure(text, 10.0, None, None);
        let spans = locate(text, &terms(&["dup"]), MatchStrategy::ExactLength, &layout);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 0);
    }

    #[test]
    fn empty_term_aborts() {
        mono();
        let text = "abc";
        let layout = measure(text, 10.0, None, None);
        assert!(locate(text, &terms(&[""]), MatchStrategy::TrailingChar, &layout).is_empty());
    }
}
