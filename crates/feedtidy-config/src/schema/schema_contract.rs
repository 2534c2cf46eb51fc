//! Host page contract: what to match and what to write.

use serde::{Deserialize, Serialize};

/// Selectors identifying feed entries and their parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Class carried by every feed entry.
    #[serde(default = "default_item_class")]
    pub item_class: String,

    /// Title element inside an entry.
    #[serde(default = "default_title_selector")]
    pub title: String,

    /// Expandable body element inside an entry.
    #[serde(default = "default_body_selector")]
    pub body: String,

    /// Layout spacers rendered between entries. A sibling is a spacer when it
    /// carries every class of at least one rule.
    #[serde(default = "default_spacers")]
    pub spacers: Vec<Vec<String>>,
}

fn default_item_class() -> String {
    "infiniteLoadingItem".to_string()
}

fn default_title_selector() -> String {
    "p.line-clamp-2".to_string()
}

fn default_body_selector() -> String {
    ".editor-content".to_string()
}

fn default_spacers() -> Vec<Vec<String>> {
    vec![
        vec![
            "flex".to_string(),
            "mt-4".to_string(),
            "w-full".to_string(),
            "items-start".to_string(),
        ],
        vec!["relative".to_string(), "mr-3".to_string()],
    ]
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            item_class: default_item_class(),
            title: default_title_selector(),
            body: default_body_selector(),
            spacers: default_spacers(),
        }
    }
}

/// Title suffixes classifying a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    #[serde(default = "default_mention_marker")]
    pub mention: String,

    #[serde(default = "default_reaction_marker")]
    pub reaction: String,
}

fn default_mention_marker() -> String {
    "であなたにメンションしました".to_string()
}

fn default_reaction_marker() -> String {
    "であなたにリアクションしました".to_string()
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            mention: default_mention_marker(),
            reaction: default_reaction_marker(),
        }
    }
}

/// Attributes the engine writes as state flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeConfig {
    /// On the body: expansion applied.
    #[serde(default = "default_expanded_attr")]
    pub expanded: String,

    /// On the entry: entry is hidden.
    #[serde(default = "default_hidden_attr")]
    pub hidden: String,

    /// On the entry: entry is a suppressed duplicate.
    #[serde(default = "default_duplicate_attr")]
    pub duplicate: String,

    /// On the body: host clamp classes removed by expansion, space separated.
    #[serde(default = "default_clamp_attr")]
    pub stripped_classes: String,

    /// On the ellipsis marker element.
    #[serde(default = "default_ellipsis_attr")]
    pub ellipsis: String,
}

fn default_expanded_attr() -> String {
    "data-vc-expanded".to_string()
}

fn default_hidden_attr() -> String {
    "data-vc-hidden".to_string()
}

fn default_duplicate_attr() -> String {
    "data-vc-duplicate".to_string()
}

fn default_clamp_attr() -> String {
    "data-vc-clamp".to_string()
}

fn default_ellipsis_attr() -> String {
    "data-vc-ellipsis".to_string()
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            expanded: default_expanded_attr(),
            hidden: default_hidden_attr(),
            duplicate: default_duplicate_attr(),
            stripped_classes: default_clamp_attr(),
            ellipsis: default_ellipsis_attr(),
        }
    }
}
