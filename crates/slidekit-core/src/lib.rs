//! Slidekit Core Library
//!
//! Platform-agnostic document model, geometry, snapping, interaction and
//! history for the slidekit slide editor.

pub mod config;
pub mod document;
pub mod editor;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod history;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod snap;
pub mod theme;
pub mod viewport;
pub mod widget;

pub use config::EditorConfig;
pub use document::{Background, Deck, Slide};
pub use editor::{AssetLoad, Editor, SubscriptionId};
pub use elements::{ElementContent, ElementId, ElementKind, ElementPatch, Geometry, SerializableColor, SlideElement};
pub use error::{ConfigError, EditError, EditResult};
pub use geometry::ResizeHandle;
pub use history::{ActionKind, History, HistorySummary};
pub use input::{InputEvent, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{GestureState, InteractionSession, LivePatch, LivePatchEvent};
pub use selection::{Handle, HandleKind};
pub use snap::{Guide, GuideAxis, SnapResult};
pub use theme::{ResolvedTheme, StyleBundle, ThemeTable};
pub use viewport::Viewport;
pub use widget::{EditingKind, WidgetManager, WidgetState};
