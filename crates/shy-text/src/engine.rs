use cosmic_text::{Attrs, Buffer, FontSystem, Metrics, Shaping};

use crate::layout::{Cluster, Line};
use crate::{ADVANCE_FACTOR, LINE_HEIGHT_FACTOR};

/// Raw engine output before line limiting and caching.
pub struct ShapedText {
    pub lines: Vec<Line>,
    pub line_height: f32,
}

/// The shaping backend seam. The production engine wraps cosmic-text; tests
/// install `MonospaceEngine` so measurements never depend on system fonts.
pub trait ShapeEngine: Send + 'static {
    fn shape(&mut self, text: &str, font_px: f32, max_width: Option<f32>) -> ShapedText;
}

/// cosmic-text backed engine. One `FontSystem` is retained for the process;
/// a temporary `Buffer` is constructed per call (measurements themselves are
/// memoized a level up).
pub struct CosmicEngine {
    fs: FontSystem,
}

impl CosmicEngine {
    pub fn new() -> Self {
        Self {
            fs: FontSystem::new(),
        }
    }
}

impl Default for CosmicEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeEngine for CosmicEngine {
    fn shape(&mut self, text: &str, font_px: f32, max_width: Option<f32>) -> ShapedText {
        let line_height = font_px * LINE_HEIGHT_FACTOR;

        let mut buf = Buffer::new(&mut self.fs, Metrics::new(font_px, line_height));
        {
            let mut b = buf.borrow_with(&mut self.fs);
            b.set_size(max_width, None);
            b.set_text(text, &Attrs::new(), Shaping::Advanced, None);
            b.shape_until_scroll(true);
        }

        // Buffer lines split on '\n'; glyph byte offsets are relative to
        // their hard line, so map each run back to global text offsets.
        let mut hard_starts = vec![0usize];
        for (i, ch) in text.char_indices() {
            if ch == '\n' {
                hard_starts.push(i + 1);
            }
        }

        let mut lines: Vec<Line> = Vec::new();
        for run in buf.layout_runs() {
            let base = hard_starts.get(run.line_i).copied().unwrap_or(0);
            let y = lines.len() as f32 * line_height;
            let mut clusters = Vec::with_capacity(run.glyphs.len());
            for g in run.glyphs {
                clusters.push(Cluster {
                    start: base + g.start,
                    end: base + g.end,
                    x: g.x,
                    w: g.w,
                });
            }
            let start = clusters.first().map(|c| c.start).unwrap_or(base);
            let end = clusters.last().map(|c| c.end).unwrap_or(start);
            let width = clusters.last().map(|c| c.x + c.w).unwrap_or(0.0);
            lines.push(Line {
                start,
                end,
                y,
                width,
                clusters,
            });
        }

        ShapedText { lines, line_height }
    }
}

/// Deterministic fixed-advance engine: every cluster advances by
/// `0.6 × font_px`, lines are `1.3 × font_px` tall, wrapping is greedy on
/// spaces. Install via `set_shape_engine` in tests.
pub struct MonospaceEngine;

impl ShapeEngine for MonospaceEngine {
    fn shape(&mut self, text: &str, font_px: f32, max_width: Option<f32>) -> ShapedText {
        let line_height = font_px * LINE_HEIGHT_FACTOR;
        let advance = font_px * ADVANCE_FACTOR;
        let cap = max_width
            .map(|w| ((w / advance).floor() as usize).max(1))
            .unwrap_or(usize::MAX);

        let mut lines: Vec<Line> = Vec::new();
        if text.is_empty() {
            return ShapedText { lines, line_height };
        }

        let mut seg_start = 0usize;
        for (i, ch) in text.char_indices() {
            if ch == '\n' {
                wrap_segment(text, seg_start, i, cap, advance, line_height, &mut lines);
                seg_start = i + 1;
            }
        }
        wrap_segment(
            text,
            seg_start,
            text.len(),
            cap,
            advance,
            line_height,
            &mut lines,
        );

        ShapedText { lines, line_height }
    }
}

/// Greedy wrap of one hard-break-free segment.
fn wrap_segment(
    text: &str,
    start: usize,
    end: usize,
    cap: usize,
    advance: f32,
    line_height: f32,
    out: &mut Vec<Line>,
) {
    let mut line_start = start;
    let mut line_chars = 0usize;
    let mut last_space: Option<usize> = None;

    for (off, ch) in text[start..end].char_indices() {
        let abs = start + off;
        if line_chars == cap {
            let (line_end, next_start) = match last_space {
                Some(sp) if sp >= line_start => (sp, sp + 1),
                _ => (abs, abs),
            };
            emit_line(text, line_start, line_end, advance, line_height, out);
            line_chars = text[next_start..abs].chars().count();
            line_start = next_start;
            last_space = None;
        }
        if ch == ' ' {
            last_space = Some(abs);
        }
        line_chars += 1;
    }
    emit_line(text, line_start, end, advance, line_height, out);
}

fn emit_line(
    text: &str,
    start: usize,
    end: usize,
    advance: f32,
    line_height: f32,
    out: &mut Vec<Line>,
) {
    let y = out.len() as f32 * line_height;
    let mut clusters = Vec::new();
    let mut x = 0.0f32;
    for (off, ch) in text[start..end].char_indices() {
        let abs = start + off;
        clusters.push(Cluster {
            start: abs,
            end: abs + ch.len_utf8(),
            x,
            w: advance,
        });
        x += advance;
    }
    out.push(Line {
        start,
        end,
        y,
        width: x,
        clusters,
    });
}
