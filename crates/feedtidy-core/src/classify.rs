//! Notification classification from the title suffix.

use feedtidy_config::MarkerConfig;
use serde::{Deserialize, Serialize};

use crate::text::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    None,
    Mention,
    Reaction,
}

impl Classification {
    /// Only mentions get their preview expanded.
    pub fn is_expand_eligible(self) -> bool {
        matches!(self, Self::Mention)
    }

    /// Mentions and reactions are both duplicated by the host feed.
    pub fn is_dedupe_eligible(self) -> bool {
        matches!(self, Self::Mention | Self::Reaction)
    }
}

/// Matches normalized titles against the configured markers.
#[derive(Debug, Clone)]
pub struct Classifier {
    mention: String,
    reaction: String,
}

impl Classifier {
    pub fn new(markers: &MarkerConfig) -> Self {
        Self {
            mention: normalize(&markers.mention),
            reaction: normalize(&markers.reaction),
        }
    }

    pub fn classify(&self, title: &str) -> Classification {
        let title = normalize(title);
        if Self::ends_with_marker(&title, &self.mention) {
            Classification::Mention
        } else if Self::ends_with_marker(&title, &self.reaction) {
            Classification::Reaction
        } else {
            Classification::None
        }
    }

    pub fn is_mention_notification(&self, title: &str) -> bool {
        self.classify(title).is_expand_eligible()
    }

    pub fn is_dedupe_eligible(&self, title: &str) -> bool {
        self.classify(title).is_dedupe_eligible()
    }

    fn ends_with_marker(title: &str, marker: &str) -> bool {
        !marker.is_empty() && title.ends_with(marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&MarkerConfig::default())
    }

    #[test]
    fn test_mention() {
        let c = classifier();
        assert_eq!(
            c.classify("横田さんがクラスであなたにメンションしました"),
            Classification::Mention
        );
        assert!(c.is_mention_notification("横田さんがクラスであなたにメンションしました"));
    }

    #[test]
    fn test_mention_with_incidental_whitespace() {
        let c = classifier();
        assert!(c.is_mention_notification("  横田さんがクラスで\n  あなたに メンションしました \n"));
    }

    #[test]
    fn test_reaction_is_dedupe_only() {
        let c = classifier();
        let title = "横田さんがクラスであなたにリアクションしました";
        assert_eq!(c.classify(title), Classification::Reaction);
        assert!(!c.is_mention_notification(title));
        assert!(c.is_dedupe_eligible(title));
    }

    #[test]
    fn test_other_notifications() {
        let c = classifier();
        assert_eq!(c.classify("新しい課題が追加されました"), Classification::None);
        assert!(!c.is_dedupe_eligible("新しい課題が追加されました"));
        assert_eq!(c.classify(""), Classification::None);
    }

    #[test]
    fn test_marker_must_be_suffix() {
        let c = classifier();
        assert_eq!(
            c.classify("であなたにメンションしました、と表示されました"),
            Classification::None
        );
    }

    #[test]
    fn test_empty_markers_never_match() {
        let c = Classifier::new(&MarkerConfig {
            mention: String::new(),
            reaction: " ".to_string(),
        });
        assert_eq!(c.classify("anything"), Classification::None);
    }
}
