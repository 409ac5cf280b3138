//! Location-path routing and screen resolution.
//!
//! # Responsibility
//! - Parse location paths into the ids they encode.
//! - Pick the deepest screen whose entities still exist.
//!
//! # Invariants
//! - Parsing never fails; unknown paths are the root route.
//! - Missing entities fall back to the nearest existing ancestor screen;
//!   only store failures surface as errors.

mod route;
mod screen;

pub use route::Route;
pub use screen::{resolve_screen, Screen};
