//! Serializable document description, doubling as an element builder.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use feedtidy_protocols::BoundingBox;
use serde::{Deserialize, Serialize};

use crate::document::MemoryDocument;
use crate::error::FixtureError;

/// One element and its subtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementSpec {
    #[serde(default = "default_tag")]
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, String>,

    /// Own text, rendered before the children.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<BoundingBox>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_height: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_height: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

fn default_tag() -> String {
    "div".to_string()
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add classes; a space separated list adds each of them.
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn rect(mut self, rect: BoundingBox) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Layout heights reported after paint.
    pub fn layout(mut self, scroll_height: f64, client_height: f64) -> Self {
        self.scroll_height = Some(scroll_height);
        self.client_height = Some(client_height);
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// A whole document: location plus head and body content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFixture {
    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default)]
    pub head: Vec<ElementSpec>,

    #[serde(default)]
    pub body: Vec<ElementSpec>,
}

fn default_location() -> String {
    "about:blank".to_string()
}

impl DocumentFixture {
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        if !path.exists() {
            return Err(FixtureError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn build(&self) -> MemoryDocument {
        let mut doc = MemoryDocument::with_location(self.location.clone());
        let head = doc.head_id();
        let body = doc.body_id();
        for spec in &self.head {
            doc.append_spec(head, spec);
        }
        for spec in &self.body {
            doc.append_spec(body, spec);
        }
        doc
    }
}
