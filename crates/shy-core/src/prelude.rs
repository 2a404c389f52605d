pub use crate::animation::*;
pub use crate::color::Color;
pub use crate::error::{ErrorBoundary, ErrorInfo};
pub use crate::geometry::{Rect, Size, Vec2};
pub use crate::locals::{
    Density, Dp, TextScale, Theme, density, dp_to_px, text_scale, theme, with_density,
    with_text_scale, with_theme,
};
pub use crate::modifier::Modifier;
pub use crate::runtime::{
    ComposeGuard, Frame, HitRegion, Scheduler, SemNode, dispatch_tap, remember, remember_state,
    remember_state_with_key, remember_with_key,
};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::semantics::{Role, Semantics};
pub use crate::signal::{Signal, signal};
pub use crate::view::{
    Callback, ExpandMetrics, MatchStrategy, Scene, SceneNode, TextOverflow, View, ViewId, ViewKind,
};
pub use taffy::{AlignItems, AlignSelf, JustifyContent};
