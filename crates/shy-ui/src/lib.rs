#![allow(non_snake_case)]
//! Widgets, layout and paint.

pub mod expandable;
pub mod redact;
pub mod tests;

use std::collections::HashMap;
use std::cmp::Ordering;

use shy_core::*;
use taffy::style::{AlignItems, Display, FlexDirection, JustifyContent, Style};

pub use expandable::{ShySpec, ShyState, ShyText, TruncationPlan, plan_truncation};
pub use redact::{HighlightSpan, locate};

pub fn Surface(modifier: Modifier, child: View) -> View {
    let mut v = View::new(0, ViewKind::Surface).modifier(modifier);
    v.children = vec![child];
    v
}

pub fn Box(modifier: Modifier) -> View {
    View::new(0, ViewKind::Box).modifier(modifier)
}

pub fn Row(modifier: Modifier) -> View {
    View::new(0, ViewKind::Row).modifier(modifier)
}

pub fn Column(modifier: Modifier) -> View {
    View::new(0, ViewKind::Column).modifier(modifier)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(
        0,
        ViewKind::Text {
            text: text.into(),
            color: theme().on_surface,
            font_size: 16.0, // dp (converted to px in layout/paint)
            soft_wrap: false,
            max_lines: None,
            overflow: TextOverflow::Visible,
        },
    )
}

/// Extension trait for child building
pub trait ViewExt: Sized {
    fn child(self, children: impl IntoChildren) -> Self;
}

impl ViewExt for View {
    fn child(self, children: impl IntoChildren) -> Self {
        self.with_children(children.into_children())
    }
}

pub trait IntoChildren {
    fn into_children(self) -> Vec<View>;
}

impl IntoChildren for View {
    fn into_children(self) -> Vec<View> {
        vec![self]
    }
}

impl IntoChildren for Vec<View> {
    fn into_children(self) -> Vec<View> {
        self
    }
}

impl<const N: usize> IntoChildren for [View; N] {
    fn into_children(self) -> Vec<View> {
        self.into()
    }
}

// Tuple implementations
macro_rules! impl_into_children_tuple {
    ($($idx:tt $t:ident),+) => {
        impl<$($t: IntoChildren),+> IntoChildren for ($($t,)+) {
            fn into_children(self) -> Vec<View> {
                let mut v = Vec::new();
                $(v.extend(self.$idx.into_children());)+
                v
            }
        }
    };
}

impl_into_children_tuple!(0 A, 1 B);
impl_into_children_tuple!(0 A, 1 B, 2 C);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E);

/// Layout and paint one composed tree (Taffy 0.9 API).
pub fn layout_and_paint(
    root: &View,
    size_px_u32: (u32, u32),
) -> (Scene, Vec<HitRegion>, Vec<SemNode>) {
    // font dp -> px with TextScale applied
    let font_px = |dp_font: f32| dp_to_px(dp_font) * text_scale().0;

    // Assign ids
    let mut id = 1u64;
    fn stamp(mut v: View, id: &mut u64) -> View {
        v.id = *id;
        *id += 1;
        v.children = v.children.into_iter().map(|c| stamp(c, id)).collect();
        v
    }
    let root = stamp(root.clone(), &mut id);

    // Build Taffy tree (with per-node contexts for measurement)
    use taffy::prelude::*;
    #[derive(Clone)]
    enum NodeCtx {
        Text {
            text: String,
            font_dp: f32,
            soft_wrap: bool,
            max_lines: Option<usize>,
        },
        Expandable {
            text: String,
            font_dp: f32,
            visible_lines: usize,
            expanded: bool,
            height_px: Option<f32>,
        },
        Container,
    }

    let mut taffy: TaffyTree<NodeCtx> = TaffyTree::new();
    let mut nodes_map: HashMap<ViewId, taffy::NodeId> = HashMap::new();

    fn style_from_modifier(m: &Modifier, kind: &ViewKind, px: &dyn Fn(f32) -> f32) -> Style {
        use taffy::prelude::*;
        let mut s = Style::default();

        s.display = Display::Flex;
        s.flex_direction = match kind {
            ViewKind::Row => FlexDirection::Row,
            _ => FlexDirection::Column,
        };

        // Defaults
        s.align_items = if matches!(kind, ViewKind::Row | ViewKind::Column | ViewKind::Surface) {
            Some(AlignItems::Stretch)
        } else {
            Some(AlignItems::FlexStart)
        };
        s.justify_content = Some(JustifyContent::FlexStart);

        if let Some(g) = m.flex_grow {
            s.flex_grow = g;
        }
        if let Some(a) = m.align_self {
            s.align_self = Some(a);
        }
        if let Some(j) = m.justify_content {
            s.justify_content = Some(j);
        }
        if let Some(a) = m.align_items_container {
            s.align_items = Some(a);
        }

        // Padding (content box)
        if let Some(pv_dp) = m.padding_values {
            s.padding = taffy::geometry::Rect {
                left: length(px(pv_dp.left)),
                right: length(px(pv_dp.right)),
                top: length(px(pv_dp.top)),
                bottom: length(px(pv_dp.bottom)),
            };
        } else if let Some(p_dp) = m.padding {
            let v = length(px(p_dp));
            s.padding = taffy::geometry::Rect {
                left: v,
                right: v,
                top: v,
                bottom: v,
            };
        }

        // Explicit size — highest priority
        let mut width_set = false;
        let mut height_set = false;
        if let Some(sz_dp) = m.size {
            if sz_dp.width.is_finite() {
                s.size.width = length(px(sz_dp.width.max(0.0)));
                width_set = true;
            }
            if sz_dp.height.is_finite() {
                s.size.height = length(px(sz_dp.height.max(0.0)));
                height_set = true;
            }
        }
        if let Some(w_dp) = m.width {
            s.size.width = length(px(w_dp.max(0.0)));
            width_set = true;
        }
        if let Some(h_dp) = m.height {
            s.size.height = length(px(h_dp.max(0.0)));
            height_set = true;
        }

        // Axis-aware fill: main axis fill -> weight (flex: 1 1 0%), cross
        // axis fill -> tight (min==max==100%)
        let is_row = matches!(kind, ViewKind::Row);
        let want_fill_w = m.fill_max || m.fill_max_w;
        let want_fill_h = m.fill_max || m.fill_max_h;

        if is_row {
            if want_fill_w && !width_set {
                s.flex_grow = s.flex_grow.max(1.0);
                s.flex_shrink = s.flex_shrink.max(1.0);
                s.flex_basis = length(0.0);
                s.min_size.width = length(0.0);
            }
            if want_fill_h && !height_set {
                s.min_size.height = percent(1.0);
                s.max_size.height = percent(1.0);
            }
        } else {
            // column-like main axis (vertical)
            if want_fill_h && !height_set {
                s.flex_grow = s.flex_grow.max(1.0);
                s.flex_shrink = s.flex_shrink.max(1.0);
                s.flex_basis = length(0.0);
                s.min_size.height = length(0.0);
            }
            if want_fill_w && !width_set {
                s.min_size.width = percent(1.0);
                s.max_size.width = percent(1.0);
            }
        }

        s
    }

    fn build_node(
        v: &View,
        t: &mut TaffyTree<NodeCtx>,
        nodes_map: &mut HashMap<ViewId, taffy::NodeId>,
    ) -> taffy::NodeId {
        let px_helper = |dp_val: f32| dp_to_px(dp_val);
        let style = style_from_modifier(&v.modifier, &v.kind, &px_helper);

        let node = match &v.kind {
            ViewKind::Text {
                text,
                font_size: font_dp,
                soft_wrap,
                max_lines,
                ..
            } => t
                .new_leaf_with_context(
                    style,
                    NodeCtx::Text {
                        text: text.clone(),
                        font_dp: *font_dp,
                        soft_wrap: *soft_wrap,
                        max_lines: *max_lines,
                    },
                )
                .unwrap(),
            ViewKind::Expandable {
                text,
                font_size: font_dp,
                visible_lines,
                expanded,
                height_px,
                ..
            } => t
                .new_leaf_with_context(
                    style,
                    NodeCtx::Expandable {
                        text: text.clone(),
                        font_dp: *font_dp,
                        visible_lines: *visible_lines,
                        expanded: *expanded,
                        height_px: *height_px,
                    },
                )
                .unwrap(),
            _ => {
                let children: Vec<_> = v
                    .children
                    .iter()
                    .map(|c| build_node(c, t, nodes_map))
                    .collect();
                let n = t.new_with_children(style, &children).unwrap();
                t.set_node_context(n, Some(NodeCtx::Container)).ok();
                n
            }
        };

        nodes_map.insert(v.id, node);
        node
    }

    let root_node = build_node(&root, &mut taffy, &mut nodes_map);

    {
        let mut rs = taffy.style(root_node).unwrap().clone();
        rs.size.width = length(size_px_u32.0 as f32);
        rs.size.height = length(size_px_u32.1 as f32);
        taffy.set_style(root_node, rs).unwrap();
    }

    let available = taffy::geometry::Size {
        width: AvailableSpace::Definite(size_px_u32.0 as f32),
        height: AvailableSpace::Definite(size_px_u32.1 as f32),
    };

    // Measure function for intrinsic content
    taffy
        .compute_layout_with_measure(root_node, available, |known, avail, _node, ctx, _style| {
            let definite_w = |known: Option<f32>| {
                known.or(match avail.width {
                    AvailableSpace::Definite(w) => Some(w),
                    _ => None,
                })
            };
            match ctx {
                Some(NodeCtx::Text {
                    text,
                    font_dp,
                    soft_wrap,
                    max_lines,
                }) => {
                    let size_px_val = font_px(*font_dp);
                    let line_h = size_px_val * shy_text::LINE_HEIGHT_FACTOR;
                    let wrap_w = if *soft_wrap { definite_w(known.width) } else { None };
                    let layout = shy_text::measure(text, size_px_val, wrap_w, *max_lines);
                    let n_lines = layout.line_count().max(1);
                    taffy::geometry::Size {
                        width: known.width.unwrap_or_else(|| layout.width()),
                        height: line_h * n_lines as f32,
                    }
                }
                Some(NodeCtx::Expandable {
                    text,
                    font_dp,
                    visible_lines,
                    expanded,
                    height_px,
                }) => {
                    let size_px_val = font_px(*font_dp);
                    match definite_w(known.width) {
                        None => {
                            // intrinsic pass: content-hugging estimate
                            taffy::geometry::Size {
                                width: text.len() as f32
                                    * size_px_val
                                    * shy_text::ADVANCE_FACTOR,
                                height: size_px_val * shy_text::LINE_HEIGHT_FACTOR,
                            }
                        }
                        Some(w) => {
                            let full = shy_text::measure(text, size_px_val, Some(w), None);
                            let limited = shy_text::measure(
                                text,
                                size_px_val,
                                Some(w),
                                Some(*visible_lines),
                            );
                            let truncated =
                                full.line_count() > *visible_lines && !limited.is_empty();
                            let h = if !truncated {
                                full.height()
                            } else if let Some(h) = height_px {
                                *h
                            } else if *expanded {
                                full.height()
                            } else {
                                limited.height()
                            };
                            taffy::geometry::Size {
                                width: w,
                                height: h.max(0.0),
                            }
                        }
                    }
                }
                Some(NodeCtx::Container) | None => taffy::geometry::Size::ZERO,
            }
        })
        .unwrap();

    fn layout_of(node: taffy::NodeId, t: &TaffyTree<impl Clone>) -> shy_core::Rect {
        let l = t.layout(node).unwrap();
        shy_core::Rect {
            x: l.location.x,
            y: l.location.y,
            w: l.size.width,
            h: l.size.height,
        }
    }

    fn mul_alpha(c: Color, a: f32) -> Color {
        let mut out = c;
        out.3 = ((c.3 as f32) * a).clamp(0.0, 255.0) as u8;
        out
    }

    let mut scene = Scene {
        clear_color: theme().background,
        nodes: vec![],
    };
    let mut hits: Vec<HitRegion> = vec![];
    let mut sems: Vec<SemNode> = vec![];

    fn walk(
        v: &View,
        t: &TaffyTree<impl Clone>,
        nodes: &HashMap<ViewId, taffy::NodeId>,
        scene: &mut Scene,
        hits: &mut Vec<HitRegion>,
        sems: &mut Vec<SemNode>,
        parent_offset_px: (f32, f32),
        alpha_accum: f32,
        font_px: &dyn Fn(f32) -> f32,
    ) {
        let local = layout_of(nodes[&v.id], t);
        let rect = local.offset(parent_offset_px.0, parent_offset_px.1);

        // Convert padding from dp to px for content rect
        let content_rect = {
            if let Some(pv_dp) = v.modifier.padding_values {
                shy_core::Rect {
                    x: rect.x + dp_to_px(pv_dp.left),
                    y: rect.y + dp_to_px(pv_dp.top),
                    w: (rect.w - dp_to_px(pv_dp.left) - dp_to_px(pv_dp.right)).max(0.0),
                    h: (rect.h - dp_to_px(pv_dp.top) - dp_to_px(pv_dp.bottom)).max(0.0),
                }
            } else if let Some(p_dp) = v.modifier.padding {
                let p_px = dp_to_px(p_dp);
                shy_core::Rect {
                    x: rect.x + p_px,
                    y: rect.y + p_px,
                    w: (rect.w - 2.0 * p_px).max(0.0),
                    h: (rect.h - 2.0 * p_px).max(0.0),
                }
            } else {
                rect
            }
        };

        let base_px = (parent_offset_px.0 + local.x, parent_offset_px.1 + local.y);

        // Background/border
        if let Some(bg) = v.modifier.background {
            scene.nodes.push(SceneNode::Rect {
                rect,
                color: mul_alpha(bg, alpha_accum),
                radius: v.modifier.clip_rounded.map(dp_to_px).unwrap_or(0.0),
            });
        }
        if let Some(b) = &v.modifier.border {
            scene.nodes.push(SceneNode::Border {
                rect,
                color: mul_alpha(b.color, alpha_accum),
                width: dp_to_px(b.width),
                radius: dp_to_px(b.radius.max(v.modifier.clip_rounded.unwrap_or(0.0))),
            });
        }

        let this_alpha = v.modifier.alpha.unwrap_or(1.0);
        let alpha_accum = (alpha_accum * this_alpha).clamp(0.0, 1.0);

        match &v.kind {
            ViewKind::Text {
                text,
                color,
                font_size: font_dp,
                soft_wrap,
                max_lines,
                overflow,
            } => {
                let size_px_val = font_px(*font_dp);
                let line_h = size_px_val * shy_text::LINE_HEIGHT_FACTOR;
                let wrap_w = if *soft_wrap { Some(content_rect.w) } else { None };
                let layout = shy_text::measure(text, size_px_val, wrap_w, *max_lines);

                // Vertical centering for single line within content box
                let mut draw_box = content_rect;
                if layout.line_count() <= 1 {
                    let dy_px = (draw_box.h - line_h) * 0.5;
                    if dy_px.is_finite() && dy_px > 0.0 {
                        draw_box.y += dy_px;
                        draw_box.h = line_h;
                    }
                }

                let cut_by_limit = match max_lines {
                    Some(n) => {
                        shy_text::measure(text, size_px_val, wrap_w, None).line_count() > *n
                    }
                    None => false,
                };
                let want_ellipsis = *overflow == TextOverflow::Ellipsis
                    && (cut_by_limit || layout.width() > content_rect.w + 0.5);
                let need_clip = *overflow == TextOverflow::Clip
                    && layout.width() > content_rect.w + 0.5;
                if need_clip {
                    scene.nodes.push(SceneNode::PushClip {
                        rect: draw_box,
                        radius: 0.0,
                    });
                }

                for (i, line) in layout.lines().iter().enumerate() {
                    let mut ln = text[line.start..line.end].to_string();
                    if want_ellipsis && i + 1 == layout.line_count() {
                        ln = shy_text::ellipsize(&ln, size_px_val, content_rect.w);
                    }
                    scene.nodes.push(SceneNode::Text {
                        rect: shy_core::Rect {
                            x: draw_box.x,
                            y: draw_box.y + line.y,
                            w: content_rect.w,
                            h: line_h,
                        },
                        text: ln,
                        color: mul_alpha(*color, alpha_accum),
                        size: size_px_val,
                    });
                }

                if need_clip {
                    scene.nodes.push(SceneNode::PopClip);
                }

                sems.push(SemNode {
                    id: v.id,
                    role: Role::Text,
                    label: Some(text.clone()),
                    rect,
                    enabled: true,
                });
            }

            ViewKind::Expandable {
                text,
                color,
                font_size: font_dp,
                more_text,
                more_color,
                visible_lines,
                redacted,
                matching,
                expanded,
                on_toggle,
                report,
                ..
            } => {
                let size_px_val = font_px(*font_dp);
                let line_h = size_px_val * shy_text::LINE_HEIGHT_FACTOR;
                let full = shy_text::measure(text, size_px_val, Some(content_rect.w), None);
                let limited = shy_text::measure(
                    text,
                    size_px_val,
                    Some(content_rect.w),
                    Some(*visible_lines),
                );
                let plan =
                    plan_truncation(text, &full, &limited, *visible_lines, more_text);

                if plan.truncated {
                    scene.nodes.push(SceneNode::PushClip {
                        rect,
                        radius: v.modifier.clip_rounded.map(dp_to_px).unwrap_or(0.0),
                    });
                }

                let shown: &str = if plan.truncated && !*expanded {
                    &text[..plan.visible_end]
                } else {
                    text
                };
                let body = if shown.len() == text.len() {
                    full.clone()
                } else {
                    shy_text::measure(shown, size_px_val, Some(content_rect.w), None)
                };
                for line in body.lines() {
                    scene.nodes.push(SceneNode::Text {
                        rect: shy_core::Rect {
                            x: content_rect.x,
                            y: content_rect.y + line.y,
                            w: content_rect.w,
                            h: line_h,
                        },
                        text: shown[line.start..line.end].to_string(),
                        color: mul_alpha(*color, alpha_accum),
                        size: size_px_val,
                    });
                }

                // The affordance overlays the cut, on the same baseline
                if plan.truncated && !*expanded && !more_text.is_empty() {
                    let anchor = full.caret(plan.anchor);
                    let more_w = more_text.chars().count() as f32
                        * size_px_val
                        * shy_text::ADVANCE_FACTOR;
                    scene.nodes.push(SceneNode::Text {
                        rect: shy_core::Rect {
                            x: content_rect.x + anchor.x,
                            y: content_rect.y + anchor.y,
                            w: more_w,
                            h: line_h,
                        },
                        text: more_text.clone(),
                        color: mul_alpha(*more_color, alpha_accum),
                        size: size_px_val,
                    });
                }

                // Redaction overlays, positioned against the full layout.
                // The fitting case renders as a plain label, overlays included
                // only while the widget is in its truncating mode.
                if plan.truncated && !redacted.is_empty() {
                    let fill = theme().redaction;
                    for span in locate(text, redacted, *matching, &full) {
                        scene.nodes.push(SceneNode::Rect {
                            rect: span.rect.offset(content_rect.x, content_rect.y),
                            color: mul_alpha(fill, alpha_accum),
                            radius: 0.0,
                        });
                    }
                }

                if plan.truncated {
                    scene.nodes.push(SceneNode::PopClip);
                }

                // Tap target spans the node's current (possibly mid-transition) rect
                if plan.truncated && let Some(cb) = on_toggle {
                    hits.push(HitRegion {
                        id: v.id,
                        rect,
                        on_click: Some(cb.clone()),
                        z_index: v.modifier.z_index,
                    });
                }

                if let Some(rep) = report {
                    rep(ExpandMetrics {
                        collapsed_height: limited.height(),
                        expanded_height: full.height(),
                        truncated: plan.truncated,
                    });
                }

                sems.push(SemNode {
                    id: v.id,
                    role: Role::Text,
                    label: Some(text.clone()),
                    rect,
                    enabled: true,
                });
            }

            _ => {
                if v.semantics.is_some() {
                    sems.push(SemNode {
                        id: v.id,
                        role: Role::Container,
                        label: None,
                        rect,
                        enabled: true,
                    });
                }
            }
        }

        for c in &v.children {
            walk(
                c, t, nodes, scene, hits, sems, base_px, alpha_accum, font_px,
            );
        }
    }

    walk(
        &root,
        &taffy,
        &nodes_map,
        &mut scene,
        &mut hits,
        &mut sems,
        (0.0, 0.0),
        1.0,
        &font_px,
    );

    // Ensure visual order: low z_index first. Topmost is found by iter().rev().
    hits.sort_by(|a, b| a.z_index.partial_cmp(&b.z_index).unwrap_or(Ordering::Equal));

    (scene, hits, sems)
}

/// Method styling
pub trait TextStyle {
    fn color(self, c: Color) -> View;
    fn size(self, dp_font: f32) -> View;
    fn max_lines(self, n: usize) -> View;
    fn single_line(self) -> View;
    fn soft_wrap(self) -> View;
    fn overflow_ellipsize(self) -> View;
    fn overflow_clip(self) -> View;
}
impl TextStyle for View {
    fn color(mut self, c: Color) -> View {
        if let ViewKind::Text {
            color: text_color, ..
        } = &mut self.kind
        {
            *text_color = c;
        }
        self
    }
    fn size(mut self, dp_font: f32) -> View {
        if let ViewKind::Text {
            font_size: text_size_dp,
            ..
        } = &mut self.kind
        {
            *text_size_dp = dp_font;
        }
        self
    }
    fn max_lines(mut self, n: usize) -> View {
        if let ViewKind::Text {
            max_lines,
            soft_wrap,
            ..
        } = &mut self.kind
        {
            *max_lines = Some(n);
            *soft_wrap = true;
        }
        self
    }
    fn single_line(mut self) -> View {
        if let ViewKind::Text {
            soft_wrap,
            max_lines,
            ..
        } = &mut self.kind
        {
            *soft_wrap = false;
            *max_lines = Some(1);
        }
        self
    }
    fn soft_wrap(mut self) -> View {
        if let ViewKind::Text { soft_wrap, .. } = &mut self.kind {
            *soft_wrap = true;
        }
        self
    }
    fn overflow_ellipsize(mut self) -> View {
        if let ViewKind::Text { overflow, .. } = &mut self.kind {
            *overflow = TextOverflow::Ellipsis;
        }
        self
    }
    fn overflow_clip(mut self) -> View {
        if let ViewKind::Text { overflow, .. } = &mut self.kind {
            *overflow = TextOverflow::Clip;
        }
        self
    }
}
