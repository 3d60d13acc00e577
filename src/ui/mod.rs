//! egui rendering. Everything here reads [`crate::state::AppState`]; only the
//! side panel and top bar write to it.

pub mod dashboard;
pub mod panels;
pub mod pie;
pub mod plot;
