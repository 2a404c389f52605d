/// Caret geometry at a byte offset: the left edge of the cluster holding the
/// offset, at the top of its line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Caret {
    pub x: f32,
    pub y: f32,
    pub height: f32,
}

/// One shaped cluster: byte range plus horizontal extent within its line.
#[derive(Clone, Copy, Debug)]
pub struct Cluster {
    pub start: usize,
    pub end: usize,
    pub x: f32,
    pub w: f32,
}

/// One laid-out line. `end` excludes trailing whitespace consumed by the line
/// break; the whitespace bytes sit between `end` and the next line's `start`.
#[derive(Clone, Debug)]
pub struct Line {
    pub start: usize,
    pub end: usize,
    pub y: f32,
    pub width: f32,
    pub clusters: Vec<Cluster>,
}

/// A measured text block: line count, per-line byte ranges and per-offset
/// caret geometry. Pure data derived from (text, font size, width constraint,
/// line limit); `measure` memoizes instances of this.
#[derive(Clone, Debug, Default)]
pub struct TextLayout {
    text_len: usize,
    font_px: f32,
    line_height: f32,
    lines: Vec<Line>,
}

impl TextLayout {
    pub(crate) fn new(text_len: usize, font_px: f32, line_height: f32, lines: Vec<Line>) -> Self {
        Self {
            text_len,
            font_px,
            line_height,
            lines,
        }
    }

    /// Zero-line measurement, produced for degenerate width constraints.
    /// Callers treat this as "nothing to truncate".
    pub fn empty(font_px: f32) -> Self {
        Self {
            text_len: 0,
            font_px,
            line_height: font_px * crate::LINE_HEIGHT_FACTOR,
            lines: Vec::new(),
        }
    }

    pub fn font_px(&self) -> f32 {
        self.font_px
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    pub fn width(&self) -> f32 {
        self.lines.iter().map(|l| l.width).fold(0.0, f32::max)
    }

    /// Byte offset at which line `i` starts. `i == line_count()` yields the
    /// end of the text, so `line_start(visible_lines)` is always the first
    /// offset past the visible region.
    pub fn line_start(&self, i: usize) -> usize {
        match self.lines.get(i) {
            Some(l) => l.start,
            None => self.text_len,
        }
    }

    /// Byte offset at which line `i` ends; with `include_trailing_whitespace`
    /// the offset extends over whitespace consumed by the line break.
    pub fn line_end(&self, i: usize, include_trailing_whitespace: bool) -> usize {
        if self.lines.is_empty() {
            return 0;
        }
        let i = i.min(self.lines.len() - 1);
        if include_trailing_whitespace {
            self.line_start(i + 1)
        } else {
            self.lines[i].end
        }
    }

    /// Caret geometry at `byte`. Offsets past a line's last cluster sit at
    /// the line's right edge; offsets past the text sit at the end of the
    /// last line.
    pub fn caret(&self, byte: usize) -> Caret {
        let Some(idx) = self.lines.iter().rposition(|l| l.start <= byte) else {
            return Caret {
                x: 0.0,
                y: 0.0,
                height: self.line_height,
            };
        };
        let line = &self.lines[idx];
        let x = if let Some(c) = line
            .clusters
            .iter()
            .find(|c| c.start <= byte && byte < c.end)
        {
            c.x
        } else if byte >= line.clusters.last().map(|c| c.end).unwrap_or(line.start) {
            line.width
        } else {
            0.0
        };
        Caret {
            x,
            y: line.y,
            height: self.line_height,
        }
    }
}
