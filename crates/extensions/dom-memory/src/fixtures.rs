//! Ready-made notification feed elements.
//!
//! Shapes follow the host page contract the default configuration expects:
//! `div.infiniteLoadingItem > p.line-clamp-2 + div.editor-content.line-clamp-3`.

use feedtidy_protocols::BoundingBox;

use crate::fixture::ElementSpec;

/// Mention title ending with the default mention marker.
pub const MENTION_TITLE: &str = "横田さんがクラスであなたにメンションしました";

/// Reaction title ending with the default reaction marker.
pub const REACTION_TITLE: &str = "横田さんがクラスであなたにリアクションしました";

pub const ENTRY_HEIGHT: f64 = 10.0;

const LINE_HEIGHT: f64 = 20.0;
const HOST_CLAMP_LINES: f64 = 3.0;

/// A feed entry laid out at `top`.
///
/// The body reports one line-height per text line as its scroll height and a
/// three-line box as its client height.
pub fn notification(title: &str, body: &str, top: f64) -> ElementSpec {
    let lines = body.lines().count().max(1) as f64;
    ElementSpec::new("div")
        .class("infiniteLoadingItem")
        .rect(BoundingBox::new(0.0, top, 100.0, ENTRY_HEIGHT))
        .child(ElementSpec::new("p").class("line-clamp-2").text(title))
        .child(
            ElementSpec::new("div")
                .class("editor-content line-clamp-3")
                .text(body)
                .layout(lines * LINE_HEIGHT, HOST_CLAMP_LINES * LINE_HEIGHT),
        )
}

/// Entry without a body element, as seen while the host is mid-mount.
pub fn title_only(title: &str, top: f64) -> ElementSpec {
    ElementSpec::new("div")
        .class("infiniteLoadingItem")
        .rect(BoundingBox::new(0.0, top, 100.0, ENTRY_HEIGHT))
        .child(ElementSpec::new("p").class("line-clamp-2").text(title))
}

/// Layout spacer the host renders between entries.
pub fn spacer(classes: &str) -> ElementSpec {
    ElementSpec::new("div").class(classes)
}

/// `n` numbered lines, `行1` .. `行n`.
pub fn numbered_lines(n: usize) -> String {
    (1..=n)
        .map(|i| format!("行{}", i))
        .collect::<Vec<_>>()
        .join("\n")
}
