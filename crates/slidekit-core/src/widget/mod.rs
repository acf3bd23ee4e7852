//! Widget state for interactive elements.
//!
//! Elements remain pure data. The widget manager layers selection, hover
//! and editing focus on top of them for the interaction session.

mod manager;
mod state;

pub use manager::WidgetManager;
pub use state::{EditingKind, WidgetState};
