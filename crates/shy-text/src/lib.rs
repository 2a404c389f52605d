//! Text measurement for Shy.
//!
//! `measure` is the layout prober: a pure, memoized function from
//! `(text, font size, width constraint, line limit)` to a [`TextLayout`] —
//! line count, per-line byte ranges, and per-offset caret geometry. The
//! shaping backend behind it is a seam: cosmic-text in production, a
//! deterministic monospace engine in tests (`set_shape_engine`).

use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use ahash::AHasher;
use lru::LruCache;
use once_cell::sync::OnceCell;

mod engine;
mod layout;

pub use engine::{CosmicEngine, MonospaceEngine, ShapeEngine, ShapedText};
pub use layout::{Caret, Cluster, Line, TextLayout};

/// Line height as a multiple of the font size (matches the render metrics).
pub const LINE_HEIGHT_FACTOR: f32 = 1.3;
/// Nominal advance per cluster as a multiple of the font size, used by the
/// monospace engine and by width estimation.
pub const ADVANCE_FACTOR: f32 = 0.6;

const MEASURE_CACHE_CAP: usize = 256;

struct TextService {
    engine: Option<Box<dyn ShapeEngine>>,
    cache: LruCache<u64, Arc<TextLayout>>,
    generation: u64,
}

static SERVICE: OnceCell<Mutex<TextService>> = OnceCell::new();

fn service() -> &'static Mutex<TextService> {
    SERVICE.get_or_init(|| {
        Mutex::new(TextService {
            engine: None,
            cache: LruCache::new(NonZeroUsize::new(MEASURE_CACHE_CAP).unwrap()),
            generation: 0,
        })
    })
}

/// Install a shaping engine, replacing the default cosmic-text one. Clears
/// the measurement cache; keys carry the engine generation so stale entries
/// can never resurface.
pub fn set_shape_engine(engine: Box<dyn ShapeEngine>) {
    let mut svc = service().lock().unwrap();
    svc.engine = Some(engine);
    svc.generation += 1;
    svc.cache.clear();
}

fn cache_key(
    generation: u64,
    text: &str,
    font_px: f32,
    max_width: Option<f32>,
    max_lines: Option<usize>,
) -> u64 {
    let mut h = AHasher::default();
    generation.hash(&mut h);
    text.hash(&mut h);
    font_px.to_bits().hash(&mut h);
    max_width.map(f32::to_bits).hash(&mut h);
    max_lines.hash(&mut h);
    h.finish()
}

/// Measure `text` at `font_px` against an optional width constraint and an
/// optional line limit.
///
/// A non-positive `max_width` yields a zero-line measurement; callers must
/// treat it as "not truncated" rather than derive substring bounds from it.
pub fn measure(
    text: &str,
    font_px: f32,
    max_width: Option<f32>,
    max_lines: Option<usize>,
) -> Arc<TextLayout> {
    if let Some(w) = max_width
        && w <= 0.0
    {
        return Arc::new(TextLayout::empty(font_px));
    }

    let mut svc = service().lock().unwrap();
    let key = cache_key(svc.generation, text, font_px, max_width, max_lines);
    if let Some(hit) = svc.cache.get(&key) {
        return hit.clone();
    }

    let engine = svc
        .engine
        .get_or_insert_with(|| Box::new(CosmicEngine::new()));
    let ShapedText {
        mut lines,
        line_height,
    } = engine.shape(text, font_px, max_width);
    if let Some(n) = max_lines {
        lines.truncate(n);
    }

    let layout = Arc::new(TextLayout::new(text.len(), font_px, line_height, lines));
    svc.cache.put(key, layout.clone());
    layout
}

/// Trim `text` to a single line of at most `max_width`, appending an
/// ellipsis when anything was cut.
pub fn ellipsize(text: &str, font_px: f32, max_width: f32) -> String {
    const ELLIPSIS: &str = "…";

    if max_width <= 0.0 {
        return String::new();
    }
    let layout = measure(text, font_px, None, None);
    if layout.width() <= max_width {
        return text.to_string();
    }
    let ell_w = measure(ELLIPSIS, font_px, None, None).width();
    let budget = (max_width - ell_w).max(0.0);

    let mut end = 0usize;
    if let Some(line) = layout.lines().first() {
        for c in &line.clusters {
            if c.x + c.w > budget {
                break;
            }
            end = c.end;
        }
    }
    let mut out = text[..end].to_string();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono() {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| set_shape_engine(Box::new(MonospaceEngine)));
    }

    // font 10px → advance 6, line height 13

    #[test]
    fn wraps_on_spaces_and_tracks_offsets() {
        mono();
        let text = "aaaa bbbb cccc";
        let m = measure(text, 10.0, Some(60.0), None);
        assert_eq!(m.line_count(), 2);
        assert_eq!(m.line_start(0), 0);
        assert_eq!(m.line_start(1), 10);
        assert_eq!(m.line_start(2), text.len());
        assert_eq!(m.line_end(0, false), 9);
        assert_eq!(m.line_end(0, true), 10);
        assert_eq!(m.height(), 26.0);
        assert_eq!(m.width(), 54.0);
    }

    #[test]
    fn caret_positions() {
        mono();
        let m = measure("aaaa bbbb cccc", 10.0, Some(60.0), None);
        let c = m.caret(5);
        assert_eq!(c.x, 30.0);
        assert_eq!(c.y, 0.0);
        assert_eq!(c.height, 13.0);

        // start of second line
        let c = m.caret(10);
        assert_eq!(c.x, 0.0);
        assert_eq!(c.y, 13.0);

        // inside trailing whitespace: right edge of the line
        let c = m.caret(9);
        assert_eq!(c.x, 54.0);
        assert_eq!(c.y, 0.0);
    }

    #[test]
    fn zero_width_measures_zero_lines() {
        mono();
        assert_eq!(measure("abc", 10.0, Some(0.0), None).line_count(), 0);
        assert_eq!(measure("abc", 10.0, Some(-4.0), None).line_count(), 0);
        assert_eq!(measure("abc", 10.0, Some(0.0), None).height(), 0.0);
    }

    #[test]
    fn line_limit_truncates_measurement() {
        mono();
        let m = measure("aaaa bbbb cccc", 10.0, Some(60.0), Some(1));
        assert_eq!(m.line_count(), 1);
        assert_eq!(m.height(), 13.0);
        // the boundary offset past the limited region is the whole text
        assert_eq!(m.line_start(1), 14);
    }

    #[test]
    fn unconstrained_is_single_line() {
        mono();
        let m = measure("hello", 10.0, None, None);
        assert_eq!(m.line_count(), 1);
        assert_eq!(m.width(), 30.0);
    }

    #[test]
    fn hard_newlines_break_lines() {
        mono();
        let m = measure("ab\ncd", 10.0, None, None);
        assert_eq!(m.line_count(), 2);
        assert_eq!(m.line_start(1), 3);
        assert_eq!(m.line_end(0, false), 2);
    }

    #[test]
    fn empty_text_measures_empty() {
        mono();
        let m = measure("", 10.0, Some(100.0), None);
        assert_eq!(m.line_count(), 0);
        assert_eq!(m.height(), 0.0);
    }

    #[test]
    fn measurements_are_memoized() {
        mono();
        let a = measure("memo me", 10.0, Some(120.0), Some(2));
        let b = measure("memo me", 10.0, Some(120.0), Some(2));
        assert!(Arc::ptr_eq(&a, &b));

        // different constraint, different measurement
        let c = measure("memo me", 10.0, Some(121.0), Some(2));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn ellipsize_trims_and_marks() {
        mono();
        assert_eq!(ellipsize("short", 10.0, 600.0), "short");
        let cut = ellipsize("abcdefghij", 10.0, 30.0);
        assert!(cut.starts_with("abcd"));
        assert!(cut.ends_with('…'));
        assert_eq!(ellipsize("anything", 10.0, 0.0), "");
    }
}
