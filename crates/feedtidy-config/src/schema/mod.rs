//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

mod schema_contract;
mod schema_timing;

pub use schema_contract::*;
pub use schema_timing::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub markers: MarkerConfig,

    #[serde(default)]
    pub attributes: AttributeConfig,

    #[serde(default)]
    pub expansion: ExpansionConfig,

    #[serde(default)]
    pub dedupe: DedupeConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub style: StyleConfig,
}

/// How a mention body is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionMode {
    /// Fixed visual clamp of `clamp_lines` lines plus an ellipsis marker.
    #[default]
    Clamp,
    /// Unbounded: show the whole body.
    ShowAll,
}

/// Expansion transform configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionConfig {
    #[serde(default)]
    pub mode: ExpansionMode,

    #[serde(default = "default_clamp_lines")]
    pub clamp_lines: u32,

    /// Host clamp classes removed from the body before expanding.
    #[serde(default = "default_strip_classes")]
    pub strip_classes: Vec<String>,

    /// Class added in `show_all` mode.
    #[serde(default = "default_show_all_class")]
    pub show_all_class: String,

    /// Class of the ellipsis marker element.
    #[serde(default = "default_ellipsis_class")]
    pub ellipsis_class: String,

    #[serde(default = "default_ellipsis_text")]
    pub ellipsis_text: String,
}

fn default_clamp_lines() -> u32 {
    10
}

fn default_strip_classes() -> Vec<String> {
    vec![
        "line-clamp-2".to_string(),
        "line-clamp-3".to_string(),
        "line-clamp-4".to_string(),
    ]
}

fn default_show_all_class() -> String {
    "line-clamp-none".to_string()
}

fn default_ellipsis_class() -> String {
    "vc-ellipsis".to_string()
}

fn default_ellipsis_text() -> String {
    "\u{2026}".to_string()
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            mode: ExpansionMode::default(),
            clamp_lines: default_clamp_lines(),
            strip_classes: default_strip_classes(),
            show_all_class: default_show_all_class(),
            ellipsis_class: default_ellipsis_class(),
            ellipsis_text: default_ellipsis_text(),
        }
    }
}

/// Duplicate detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupeConfig {
    /// Number of non-empty body lines forming the body key.
    #[serde(default = "default_key_lines")]
    pub key_lines: usize,

    /// Keys shorter than this (in characters) never take part in dedupe.
    #[serde(default = "default_min_key_chars")]
    pub min_key_chars: usize,
}

fn default_key_lines() -> usize {
    5
}

fn default_min_key_chars() -> usize {
    10
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            key_lines: default_key_lines(),
            min_key_chars: default_min_key_chars(),
        }
    }
}

/// Injected style sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Id of the injected `<style>` element; also the idempotency key.
    #[serde(default = "default_style_element_id")]
    pub element_id: String,
}

fn default_style_element_id() -> String {
    "vc-expand-style".to_string()
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            element_id: default_style_element_id(),
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
