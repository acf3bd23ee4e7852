//! Render modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Consumption surface a visual tree is produced for.
///
/// The mode never changes which primitives an element maps to. It only
/// decides interactivity and chart legends; sizes come from the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Editor,
    Thumbnail,
    Presentation,
    Export,
}

impl RenderMode {
    pub const ALL: [RenderMode; 4] = [
        RenderMode::Editor,
        RenderMode::Thumbnail,
        RenderMode::Presentation,
        RenderMode::Export,
    ];

    /// Whether elements accept pointer and focus interaction.
    pub fn is_interactive(self) -> bool {
        matches!(self, RenderMode::Editor)
    }

    /// Whether charts draw their legend.
    pub fn shows_legend(self) -> bool {
        !matches!(self, RenderMode::Thumbnail)
    }

    pub fn name(self) -> &'static str {
        match self {
            RenderMode::Editor => "editor",
            RenderMode::Thumbnail => "thumbnail",
            RenderMode::Presentation => "presentation",
            RenderMode::Export => "export",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown render mode '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for RenderMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenderMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}
