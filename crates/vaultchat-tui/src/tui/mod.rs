//! Chat transcript rendering for the terminal.
//!
//! Messages are rendered into a retained [`view::Element`] tree, annotated
//! with document references and lowered into `ratatui` lines for drawing.

pub mod commands;
pub mod context;
pub mod references;
pub mod theme;
pub mod trigger;
pub mod view;
pub mod widgets;
