//! # State, signals, and the animation clock
//!
//! Shy uses a small reactive core instead of an explicit widget tree with
//! mutable fields. The main pieces:
//!
//! - `Signal<T>` — observable, reactive value.
//! - `remember*` — lifecycle-aware storage bound to composition.
//! - `AnimatedValue<T>` — clock-driven interpolation toward a target.
//!
//! ## Signals
//!
//! `Signal<T>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use shy_core::*;
//!
//! let expanded = signal(false);
//! expanded.set(true);
//! expanded.update(|v| *v = !*v);
//! assert_eq!(expanded.get(), false);
//! ```
//!
//! ## Remembered state
//!
//! UI state is held in `remember_*` slots rather than globals:
//!
//! - `remember` and `remember_state` are order-based: the Nth call in a
//!   composition pass always refers to the Nth stored value.
//! - `remember_with_key` and `remember_state_with_key` are key-based and more
//!   stable across conditional branches. Widgets that must drop their state
//!   when their content changes (an expandable resets to collapsed on new
//!   text) fold the content into the key.
//!
//! ## Animated values
//!
//! `AnimatedValue<T>` interpolates from its current value toward a target
//! over an `AnimationSpec`, reading time from the thread's installed `Clock`.
//! Retargeting mid-flight restarts from the current interpolated value; it
//! never snaps and never queues. Tests install `TestClock` and drive it
//! deterministically.

pub mod animation;
pub mod color;
pub mod error;
pub mod geometry;
pub mod locals;
pub mod modifier;
pub mod prelude;
pub mod runtime;
pub mod scope;
pub mod semantics;
pub mod signal;
pub mod view;

pub use color::*;
pub use error::*;
pub use geometry::*;
pub use locals::*;
pub use modifier::*;
pub use prelude::*;
pub use runtime::*;
pub use semantics::*;
pub use signal::*;
pub use view::*;
