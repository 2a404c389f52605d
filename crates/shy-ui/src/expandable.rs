//! The expandable "read more" text widget.
//!
//! Collapsed, the widget shows at most `visible_lines` lines with a trailing
//! affordance overlaid where the text was cut; tapping toggles between the
//! collapsed and the full-height rendering, optionally interpolating the
//! height over a configured duration. Text that fits entirely degrades to a
//! plain label with no affordance and no tap target.

use std::cell::{Cell, RefCell};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::rc::Rc;
use std::time::Duration;

use shy_core::*;
use shy_text::TextLayout;
use unicode_segmentation::UnicodeSegmentation;

/// Configuration surface of [`ShyText`].
#[derive(Clone, Debug)]
pub struct ShySpec {
    pub visible_lines: usize,
    pub more_text: String,
    pub duration: Duration,
    pub easing: Easing,
    pub redacted: Vec<String>,
    pub matching: MatchStrategy,
    pub font_size: f32, // dp
}

impl ShySpec {
    pub fn lines(visible_lines: usize) -> Self {
        if visible_lines == 0 {
            log::warn!("ShySpec: visible_lines must be positive; clamping to 1");
        }
        Self {
            visible_lines: visible_lines.max(1),
            more_text: "...".into(),
            duration: Duration::ZERO,
            easing: Easing::EaseInOut,
            redacted: Vec::new(),
            matching: MatchStrategy::default(),
            font_size: 16.0,
        }
    }
    pub fn more_text(mut self, s: impl Into<String>) -> Self {
        self.more_text = s.into();
        self
    }
    pub fn animated(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
    pub fn easing(mut self, e: Easing) -> Self {
        self.easing = e;
        self
    }
    pub fn redact<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.redacted = terms.into_iter().map(Into::into).collect();
        self
    }
    pub fn matching(mut self, m: MatchStrategy) -> Self {
        self.matching = m;
        self
    }
    pub fn font_size(mut self, dp: f32) -> Self {
        self.font_size = dp;
        self
    }
}

/// Per-instance widget state. Owned by the composition (remembered under a
/// key derived from the text, so new text composes fresh, collapsed state).
pub struct ShyState {
    expanded: Signal<bool>,
    anim: RefCell<Option<AnimatedValue<f32>>>,
    heights: Cell<Option<(f32, f32)>>, // (collapsed, expanded) px
    anim_spec: Cell<AnimationSpec>,
}

impl ShyState {
    pub fn new() -> Self {
        Self {
            expanded: signal(false),
            anim: RefCell::new(None),
            heights: Cell::new(None),
            anim_spec: Cell::new(AnimationSpec::immediate()),
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }

    pub fn is_animating(&self) -> bool {
        self.anim
            .borrow()
            .as_ref()
            .map(|a| a.is_animating())
            .unwrap_or(false)
    }

    /// The only mutation path for the expansion state. Retargets the height
    /// transition from its current (possibly mid-flight) value.
    pub fn toggle(&self) {
        let next = !self.expanded.get();
        self.expanded.set(next);

        let spec = self.anim_spec.get();
        if spec.duration.is_zero() {
            return;
        }
        if let Some((collapsed, expanded)) = self.heights.get() {
            let target = if next { expanded } else { collapsed };
            let rest = if next { collapsed } else { expanded };
            let mut slot = self.anim.borrow_mut();
            let a = slot.get_or_insert_with(|| AnimatedValue::new(rest, spec));
            a.set_target(target);
        }
    }

    /// Advance the height transition one frame; `true` while mid-flight.
    pub fn tick(&self) -> bool {
        self.anim
            .borrow_mut()
            .as_mut()
            .map(|a| a.update())
            .unwrap_or(false)
    }

    pub(crate) fn height_px(&self) -> Option<f32> {
        if self.anim_spec.get().duration.is_zero() {
            return None;
        }
        self.anim.borrow().as_ref().map(|a| *a.get())
    }

    /// Layout feeds resolved heights back each frame. Outside a transition
    /// the animated value resyncs to the rest height of the current state
    /// (text, width or style changes re-measure).
    pub(crate) fn report(&self, m: ExpandMetrics, spec: AnimationSpec) {
        self.anim_spec.set(spec);
        if !m.truncated {
            self.heights.set(None);
            *self.anim.borrow_mut() = None;
            return;
        }
        self.heights.set(Some((m.collapsed_height, m.expanded_height)));
        if spec.duration.is_zero() {
            return;
        }
        let target = if self.expanded.get() {
            m.expanded_height
        } else {
            m.collapsed_height
        };
        let mut slot = self.anim.borrow_mut();
        match slot.as_mut() {
            None => {
                *slot = Some(AnimatedValue::new(target, spec));
            }
            Some(a) => {
                if !a.is_animating() && *a.get() != target {
                    a.snap_to(target);
                }
            }
        }
    }
}

impl Default for ShyState {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the collapsed rendering cuts the text and where the affordance goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TruncationPlan {
    pub truncated: bool,
    /// Collapsed visible text is `&text[..visible_end]`.
    pub visible_end: usize,
    /// Byte offset whose caret anchors the affordance text.
    pub anchor: usize,
}

/// Decide the collapsed substring and the affordance insertion point from the
/// full and the line-limited measurements.
pub fn plan_truncation(
    text: &str,
    full: &TextLayout,
    limited: &TextLayout,
    visible_lines: usize,
    more_text: &str,
) -> TruncationPlan {
    let visible_lines = visible_lines.max(1);
    let needed = full.line_count() > visible_lines && !limited.is_empty();
    if !needed {
        return TruncationPlan {
            truncated: false,
            visible_end: text.len(),
            anchor: text.len(),
        };
    }

    let n_more = more_text.graphemes(true).count();
    let cut_boundary = full.line_start(visible_lines);
    let anchor_boundary = full.line_end(visible_lines - 1, true);

    TruncationPlan {
        truncated: true,
        // reserve the affordance's length plus one character so it replaces
        // trailing text instead of overflowing the visible-line box
        visible_end: back_up(text, cut_boundary, n_more + 1),
        anchor: back_up(text, anchor_boundary, n_more),
    }
}

/// Walk back `n` grapheme boundaries from `from`, clamping at the start of
/// the text (a too-long affordance yields an empty visible substring, never
/// a negative-length one).
fn back_up(text: &str, from: usize, n: usize) -> usize {
    let mut b = from.min(text.len());
    for _ in 0..n {
        if b == 0 {
            break;
        }
        b = text[..b]
            .grapheme_indices(true)
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0);
    }
    b
}

/// Compose an expandable text view.
#[allow(non_snake_case)]
pub fn ShyText(text: impl Into<String>, spec: ShySpec, modifier: Modifier) -> View {
    let text = text.into();
    let key = {
        let mut h = DefaultHasher::new();
        text.hash(&mut h);
        h.finish()
    };
    let state = remember_with_key(format!("shytext:{key:016x}"), ShyState::new);
    state.tick();

    let anim_spec = AnimationSpec::tween(spec.duration, spec.easing);
    let on_toggle: Callback = {
        let state = state.clone();
        Rc::new(move || state.toggle())
    };
    let report: Rc<dyn Fn(ExpandMetrics)> = {
        let state = state.clone();
        Rc::new(move |m| state.report(m, anim_spec))
    };

    let th = theme();
    View::new(
        0,
        ViewKind::Expandable {
            text,
            color: th.on_surface,
            font_size: spec.font_size,
            more_text: spec.more_text,
            more_color: th.primary,
            visible_lines: spec.visible_lines.max(1),
            redacted: spec.redacted,
            matching: spec.matching,
            expanded: state.is_expanded(),
            height_px: state.height_px(),
            on_toggle: Some(on_toggle),
            report: Some(report),
        },
    )
    .modifier(modifier.fill_max_width())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shy_text::{MonospaceEngine, measure, set_shape_engine};

    fn mono() {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| set_shape_engine(Box::new(MonospaceEngine)));
    }

    // font 10px → advance 6, line height 13; width 60 → 10 chars per line

    #[test]
    fn fitting_text_is_not_truncated() {
        mono();
        let text = "aaaa bbbb";
        let full = measure(text, 10.0, Some(60.0), None);
        let limited = measure(text, 10.0, Some(60.0), Some(3));
        let plan = plan_truncation(text, &full, &limited, 3, "...");
        assert!(!plan.truncated);
        assert_eq!(plan.visible_end, text.len());
    }

    #[test]
    fn overflowing_text_is_cut_before_the_boundary() {
        mono();
        let text = "aaaa bbbb cccc dddd eeee";
        let full = measure(text, 10.0, Some(60.0), None);
        assert_eq!(full.line_count(), 3);
        let limited = measure(text, 10.0, Some(60.0), Some(1));
        let plan = plan_truncation(text, &full, &limited, 1, "...");
        assert!(plan.truncated);
        // boundary is the start of line 1 (byte 10); back up len("...") + 1
        assert_eq!(plan.visible_end, 6);
        assert_eq!(plan.anchor, 7);
        assert!(plan.visible_end < text.len());
        // the anchor caret sits inside the first (visible) line
        assert_eq!(full.caret(plan.anchor).y, 0.0);
    }

    #[test]
    fn too_long_affordance_clamps_to_empty() {
        mono();
        let text = "aa bb cc dd ee ff";
        let full = measure(text, 10.0, Some(30.0), None);
        assert!(full.line_count() > 1);
        let limited = measure(text, 10.0, Some(30.0), Some(1));
        let plan = plan_truncation(text, &full, &limited, 1, "a much longer affordance");
        assert!(plan.truncated);
        assert_eq!(plan.visible_end, 0);
        assert_eq!(plan.anchor, 0);
    }

    #[test]
    fn zero_width_measurement_bypasses_truncation() {
        mono();
        let text = "aaaa bbbb cccc";
        let full = measure(text, 10.0, Some(0.0), None);
        let limited = measure(text, 10.0, Some(0.0), Some(1));
        let plan = plan_truncation(text, &full, &limited, 1, "...");
        assert!(!plan.truncated);
        assert_eq!(plan.visible_end, text.len());
    }

    #[test]
    fn toggle_is_a_pure_flip() {
        let state = ShyState::new();
        assert!(!state.is_expanded());
        state.toggle();
        assert!(state.is_expanded());
        state.toggle();
        assert!(!state.is_expanded());
    }

    #[test]
    fn back_up_respects_grapheme_boundaries() {
        let text = "héllo"; // 'é' is two bytes; grapheme starts: 0, 1, 3, 4, 5
        assert_eq!(back_up(text, text.len(), 1), 5);
        assert_eq!(back_up(text, text.len(), 4), 1);
        assert_eq!(back_up(text, text.len(), 5), 0);
        assert_eq!(back_up(text, text.len(), 99), 0);
    }
}
