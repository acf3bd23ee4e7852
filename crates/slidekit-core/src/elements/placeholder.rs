//! Layout placeholder payload.

use serde::{Deserialize, Serialize};

/// What a placeholder stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderRole {
    Title,
    Subtitle,
    #[default]
    Body,
    Footer,
}

impl PlaceholderRole {
    pub fn default_prompt(self) -> &'static str {
        match self {
            PlaceholderRole::Title => "Click to add title",
            PlaceholderRole::Subtitle => "Click to add subtitle",
            PlaceholderRole::Body => "Click to add content",
            PlaceholderRole::Footer => "Footer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderContent {
    pub role: PlaceholderRole,
    pub prompt: String,
}

impl PlaceholderContent {
    pub fn new(role: PlaceholderRole) -> Self {
        Self {
            role,
            prompt: role.default_prompt().to_string(),
        }
    }
}
