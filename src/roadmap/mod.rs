//! Roadmap explorer support
//!
//! Turns a topic tree and a mastery snapshot into a positioned graph for
//! rendering. Layout is pure and recomputed from scratch on every change.

pub mod layout;
pub mod models;
pub mod render;

pub use layout::{layout, layout_with, LayoutConfig};
pub use models::*;
pub use render::render_tree;
