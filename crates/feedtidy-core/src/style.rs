//! One-time style sheet injection.

use feedtidy_config::FeedConfig;
use feedtidy_protocols::{Document, DomResult};
use tracing::debug;

/// Style sheet the engine's attributes hook into.
pub fn stylesheet(config: &FeedConfig) -> String {
    let attrs = &config.attributes;
    format!(
        "{body}[{expanded}=\"true\"] {{ max-height: none; }}\n\
         .{ellipsis} {{ display: block; opacity: 0.6; pointer-events: none; }}\n\
         [{hidden}=\"true\"] {{ pointer-events: none; }}\n",
        body = config.selectors.body,
        expanded = attrs.expanded,
        ellipsis = config.expansion.ellipsis_class,
        hidden = attrs.hidden,
    )
}

/// Insert the style element into the head, once. The element id is the
/// idempotency key. Returns whether an element was inserted.
pub fn inject_style<D: Document>(doc: &mut D, config: &FeedConfig) -> DomResult<bool> {
    let element_id = &config.style.element_id;
    if doc.get_element_by_id(element_id).is_some() {
        return Ok(false);
    }
    let Some(parent) = doc.head().or_else(|| doc.body()) else {
        return Ok(false);
    };

    let style = doc.create_element("style");
    doc.set_attribute(style, "id", element_id)?;
    doc.set_text_content(style, &stylesheet(config))?;
    doc.append_child(parent, style)?;
    debug!(id = %element_id, "style injected");
    Ok(true)
}
