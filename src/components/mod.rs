//! Reusable views.

pub mod force_graph;
/// Landing page graph demo.
pub mod hero_demo;
