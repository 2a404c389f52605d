use crate::{Color, Modifier, Rect};
use std::rc::Rc;

pub type ViewId = u64;

pub type Callback = Rc<dyn Fn()>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextOverflow {
    #[default]
    Visible,
    Clip,
    Ellipsis,
}

/// How a redaction term's end offset is resolved against the text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchStrategy {
    /// First occurrence of the term's last character at or after the match
    /// start. Fragile when that character recurs inside the term ("noon"):
    /// the resolved span stops at the first recurrence.
    #[default]
    TrailingChar,
    /// `start + term.len()`: the span always covers the whole term.
    ExactLength,
}

/// Resolved geometry an expandable node reports back to its state each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExpandMetrics {
    pub collapsed_height: f32,
    pub expanded_height: f32,
    pub truncated: bool,
}

#[derive(Clone)]
pub enum ViewKind {
    Surface,
    Box,
    Row,
    Column,
    Text {
        text: String,
        color: Color,
        font_size: f32, // dp (converted to px in layout/paint)
        soft_wrap: bool,
        max_lines: Option<usize>,
        overflow: TextOverflow,
    },
    Expandable {
        text: String,
        color: Color,
        font_size: f32, // dp
        more_text: String,
        more_color: Color,
        visible_lines: usize,
        redacted: Vec<String>,
        matching: MatchStrategy,
        expanded: bool,
        /// Current interpolated height in px, when a transition is configured.
        /// `None` means "rest height for the current state".
        height_px: Option<f32>,
        on_toggle: Option<Callback>,
        report: Option<Rc<dyn Fn(ExpandMetrics)>>,
    },
}

impl std::fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Surface => write!(f, "Surface"),
            ViewKind::Box => write!(f, "Box"),
            ViewKind::Row => write!(f, "Row"),
            ViewKind::Column => write!(f, "Column"),
            ViewKind::Text {
                text,
                color,
                font_size,
                soft_wrap,
                max_lines,
                overflow,
            } => f
                .debug_struct("Text")
                .field("text", text)
                .field("color", color)
                .field("font_size", font_size)
                .field("soft_wrap", soft_wrap)
                .field("max_lines", max_lines)
                .field("overflow", overflow)
                .finish(),
            ViewKind::Expandable {
                text,
                more_text,
                visible_lines,
                redacted,
                matching,
                expanded,
                height_px,
                ..
            } => f
                .debug_struct("Expandable")
                .field("text", text)
                .field("more_text", more_text)
                .field("visible_lines", visible_lines)
                .field("redacted", redacted)
                .field("matching", matching)
                .field("expanded", expanded)
                .field("height_px", height_px)
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    pub id: ViewId,
    pub kind: ViewKind,
    pub modifier: Modifier,
    pub children: Vec<View>,
    pub semantics: Option<crate::semantics::Semantics>,
}

impl View {
    pub fn new(id: ViewId, kind: ViewKind) -> Self {
        View {
            id,
            kind,
            modifier: Modifier::default(),
            children: vec![],
            semantics: None,
        }
    }
    pub fn modifier(mut self, m: Modifier) -> Self {
        self.modifier = m;
        self
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
    pub fn semantics(mut self, s: crate::semantics::Semantics) -> Self {
        self.semantics = Some(s);
        self
    }
}

/// Renderable scene
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub clear_color: Color,
    pub nodes: Vec<SceneNode>,
}

#[derive(Clone, Debug)]
pub enum SceneNode {
    Rect {
        rect: Rect,
        color: Color,
        radius: f32,
    },
    Border {
        rect: Rect,
        color: Color,
        width: f32,
        radius: f32,
    },
    Text {
        rect: Rect,
        text: String,
        color: Color,
        size: f32,
    },
    PushClip {
        rect: Rect,
        radius: f32,
    },
    PopClip,
}
