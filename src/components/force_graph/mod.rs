//! Force-directed layout of a note graph, drawn to a 2d canvas.
//!
//! The layout (`simulation`) and interaction (`state`) are plain data
//! transformations; only `render` and [`ForceGraphCanvas`] touch the browser.

mod animation;
mod component;
mod error;
mod model;
mod render;
mod simulation;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use render::GraphStyle;
pub use types::{GraphData, sample_hero_graph, sample_knowledge_graph};
