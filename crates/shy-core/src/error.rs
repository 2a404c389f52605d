#![allow(non_snake_case)]
use crate::View;
use std::panic::{AssertUnwindSafe, catch_unwind};

pub struct ErrorInfo {
    pub message: String,
}

/// Contain panics raised while composing `content`, rendering `fallback`
/// instead. Degenerate widget inputs never panic by contract; this guards
/// against user composition closures.
pub fn ErrorBoundary(
    fallback: impl Fn(ErrorInfo) -> View + 'static,
    content: impl Fn() -> View + 'static,
) -> View {
    match catch_unwind(AssertUnwindSafe(&content)) {
        Ok(view) => view,
        Err(err) => {
            let message = if let Some(s) = err.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = err.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic".to_string()
            };
            log::error!("composition panicked: {message}");

            fallback(ErrorInfo { message })
        }
    }
}
