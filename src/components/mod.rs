//! Reusable view components.

pub mod graph_view;
pub mod legend;
