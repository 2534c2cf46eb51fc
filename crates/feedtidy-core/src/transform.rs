//! Attribute and inline-style writes applied to entries.
//!
//! Every transform is idempotent and has an inverse: [`reset`] undoes
//! [`expand`] and [`suppress`], [`release`] undoes [`suppress`]. Spacer
//! removal is the one write that is not undone.

use feedtidy_config::{ExpansionMode, FeedConfig};
use feedtidy_protocols::{Document, DomResult, NodeId, Selector};
use tracing::trace;

use crate::entry::{EntryContract, FeedEntry};

const FLAG_ON: &str = "true";

/// Inline properties written on an expanded body (clamp mode).
const CLAMP_STYLES: &[(&str, &str)] = &[
    ("display", "-webkit-box"),
    ("-webkit-box-orient", "vertical"),
    ("overflow", "hidden"),
    ("max-height", "none"),
];

/// Inline properties written on an expanded body (show-all mode).
const SHOW_ALL_STYLES: &[(&str, &str)] = &[("max-height", "none"), ("overflow", "visible")];

/// Every property an expansion may have written.
const BODY_STYLE_PROPERTIES: &[&str] = &[
    "display",
    "-webkit-box-orient",
    "-webkit-line-clamp",
    "overflow",
    "max-height",
];

/// Inline properties zeroing a suppressed entry's box.
const SUPPRESS_STYLES: &[(&str, &str)] = &[
    ("height", "0px"),
    ("min-height", "0px"),
    ("margin", "0px"),
    ("padding", "0px"),
    ("border", "0px"),
    ("box-shadow", "none"),
    ("background", "none"),
    ("overflow", "hidden"),
];

/// Whether `attr` is set to `"true"` on `node`.
pub fn is_flagged<D: Document>(doc: &D, node: NodeId, attr: &str) -> bool {
    doc.attribute(node, attr).as_deref() == Some(FLAG_ON)
}

/// Expand a mention body: drop the host clamp classes, apply the configured
/// mode, flag the body.
pub fn expand<D: Document>(doc: &mut D, body: NodeId, config: &FeedConfig) -> DomResult<()> {
    let attrs = &config.attributes;
    let expansion = &config.expansion;

    let mut stripped = Vec::new();
    for class in &expansion.strip_classes {
        if doc.remove_class(body, class)? {
            stripped.push(class.as_str());
        }
    }
    if !stripped.is_empty() {
        doc.set_attribute(body, &attrs.stripped_classes, &stripped.join(" "))?;
    }

    match expansion.mode {
        ExpansionMode::Clamp => {
            for (name, value) in CLAMP_STYLES {
                doc.set_style_property(body, name, value)?;
            }
            doc.set_style_property(
                body,
                "-webkit-line-clamp",
                &expansion.clamp_lines.to_string(),
            )?;
        }
        ExpansionMode::ShowAll => {
            doc.add_class(body, &expansion.show_all_class)?;
            for (name, value) in SHOW_ALL_STYLES {
                doc.set_style_property(body, name, value)?;
            }
        }
    }

    doc.set_attribute(body, &attrs.expanded, FLAG_ON)
}

/// Collapse a duplicate entry to a zero box and remove the spacers the host
/// rendered in front of it. Returns the number of spacers removed.
///
/// The entry stays in the tree; the host's virtualization keeps track of it.
pub fn suppress<D: Document>(
    doc: &mut D,
    entry: NodeId,
    config: &FeedConfig,
    contract: &EntryContract,
) -> DomResult<usize> {
    doc.set_attribute(entry, &config.attributes.duplicate, FLAG_ON)?;
    doc.set_attribute(entry, &config.attributes.hidden, FLAG_ON)?;
    for (name, value) in SUPPRESS_STYLES {
        doc.set_style_property(entry, name, value)?;
    }

    let mut removed = 0;
    while let Some(previous) = doc.previous_sibling(entry) {
        if !contract.is_spacer(&*doc, previous) {
            break;
        }
        doc.remove_node(previous)?;
        removed += 1;
    }
    if removed > 0 {
        trace!(%entry, removed, "removed spacers before duplicate");
    }
    Ok(removed)
}

/// Undo [`suppress`] (spacers excepted).
pub fn release<D: Document>(doc: &mut D, entry: NodeId, config: &FeedConfig) -> DomResult<()> {
    doc.remove_attribute(entry, &config.attributes.duplicate)?;
    doc.remove_attribute(entry, &config.attributes.hidden)?;
    for (name, _) in SUPPRESS_STYLES {
        doc.remove_style_property(entry, name)?;
    }
    Ok(())
}

/// Clear everything the engine ever wrote on an entry, so that a recycled
/// node is evaluated from a clean slate.
pub fn reset<D: Document>(doc: &mut D, entry: &FeedEntry, config: &FeedConfig) -> DomResult<()> {
    let attrs = &config.attributes;

    release(doc, entry.node, config)?;

    let markers = doc.query_selector_all(
        entry.node,
        &Selector::class(config.expansion.ellipsis_class.clone()),
    );
    for marker in markers {
        doc.remove_node(marker)?;
    }

    let Some(body) = entry.body_node else {
        return Ok(());
    };

    if is_flagged(&*doc, body, &attrs.expanded) {
        if config.expansion.mode == ExpansionMode::ShowAll {
            doc.remove_class(body, &config.expansion.show_all_class)?;
        }
        for name in BODY_STYLE_PROPERTIES {
            doc.remove_style_property(body, name)?;
        }
        doc.remove_attribute(body, &attrs.expanded)?;
    }

    if let Some(stripped) = doc.attribute(body, &attrs.stripped_classes) {
        for class in stripped.split_whitespace() {
            doc.add_class(body, class)?;
        }
        doc.remove_attribute(body, &attrs.stripped_classes)?;
    }

    Ok(())
}

/// After layout: append the ellipsis marker behind an expanded body whose
/// content overflows its clamped box. Returns whether a marker was added.
pub fn append_ellipsis_if_truncated<D: Document>(
    doc: &mut D,
    body: NodeId,
    config: &FeedConfig,
) -> DomResult<bool> {
    let attrs = &config.attributes;

    if !doc.is_connected(body) || !is_flagged(&*doc, body, &attrs.expanded) {
        return Ok(false);
    }
    if doc
        .next_sibling(body)
        .is_some_and(|next| is_flagged(&*doc, next, &attrs.ellipsis))
    {
        return Ok(false);
    }

    let (Some(scroll_height), Some(client_height)) =
        (doc.scroll_height(body), doc.client_height(body))
    else {
        return Ok(false);
    };
    if scroll_height <= client_height {
        return Ok(false);
    }

    let marker = doc.create_element("span");
    doc.add_class(marker, &config.expansion.ellipsis_class)?;
    doc.set_attribute(marker, &attrs.ellipsis, FLAG_ON)?;
    doc.set_text_content(marker, &config.expansion.ellipsis_text)?;
    doc.insert_after(body, marker)?;
    Ok(true)
}
