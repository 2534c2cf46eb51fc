//! Compound selectors (`tag.class.class`, `#id`).
//!
//! Only what the feed contract needs: one compound selector, no combinators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Selector {
    /// Selector matching any element carrying `class`.
    pub fn class(class: impl Into<String>) -> Self {
        Self {
            tag: None,
            id: None,
            classes: vec![class.into()],
        }
    }

    pub fn parse(input: &str) -> Result<Self, DomError> {
        let invalid = |message: &str| DomError::InvalidSelector {
            selector: input.to_string(),
            message: message.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty selector"));
        }
        if trimmed.chars().any(char::is_whitespace) || trimmed.contains(['>', '+', '~', ',']) {
            return Err(invalid("combinators are not supported"));
        }

        let mut selector = Selector::default();
        let mut rest = trimmed;

        let head_end = rest.find(['.', '#']).unwrap_or(rest.len());
        let head = &rest[..head_end];
        if !head.is_empty() && head != "*" {
            selector.tag = Some(head.to_ascii_lowercase());
        }
        rest = &rest[head_end..];

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return Err(invalid("dangling '.' or '#'"));
            }
            match marker {
                '.' => selector.classes.push(name.to_string()),
                '#' => {
                    if selector.id.is_some() {
                        return Err(invalid("more than one id"));
                    }
                    selector.id = Some(name.to_string());
                }
                _ => unreachable!("split only on '.' and '#'"),
            }
            rest = &body[end..];
        }

        Ok(selector)
    }

    /// Match against an element's tag, id attribute and class list.
    pub fn matches(
        &self,
        tag: &str,
        id: Option<&str>,
        mut has_class: impl FnMut(&str) -> bool,
    ) -> bool {
        if let Some(ref want) = self.tag {
            if !want.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(ref want) = self.id {
            if id != Some(want.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| has_class(class))
    }
}

impl FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref tag) = self.tag {
            f.write_str(tag)?;
        }
        if let Some(ref id) = self.id {
            write!(f, "#{}", id)?;
        }
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        if self.tag.is_none() && self.id.is_none() && self.classes.is_empty() {
            f.write_str("*")?;
        }
        Ok(())
    }
}
