//! Shared egui UI modules.
//!
//! The shell is split the usual way: a state tree the renderer consumes, a
//! controller that bridges the intake pipeline and the ticket hydrator to
//! that state, and the egui renderer itself. The core pipeline never touches
//! egui types; the controller implements the surface traits against the
//! state tree.

/// Maintains app state and bridges core logic to the egui UI.
pub mod controller;
/// Shared state types for the egui UI.
pub mod state;
/// Palette and visuals.
pub mod style;
/// egui renderer and app entry types.
pub mod ui;
