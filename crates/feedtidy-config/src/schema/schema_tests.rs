use super::*;
use std::time::Duration;

#[test]
fn test_config_default() {
    let config = FeedConfig::default();
    assert_eq!(config.selectors.item_class, "infiniteLoadingItem");
    assert_eq!(config.selectors.title, "p.line-clamp-2");
    assert_eq!(config.selectors.body, ".editor-content");
    assert_eq!(config.style.element_id, "vc-expand-style");
}

#[test]
fn test_marker_defaults() {
    let markers = MarkerConfig::default();
    assert!(markers.mention.ends_with("メンションしました"));
    assert!(markers.reaction.ends_with("リアクションしました"));
}

#[test]
fn test_attribute_defaults() {
    let attrs = AttributeConfig::default();
    assert_eq!(attrs.expanded, "data-vc-expanded");
    assert_eq!(attrs.hidden, "data-vc-hidden");
    assert_eq!(attrs.duplicate, "data-vc-duplicate");
}

#[test]
fn test_expansion_defaults() {
    let expansion = ExpansionConfig::default();
    assert_eq!(expansion.mode, ExpansionMode::Clamp);
    assert_eq!(expansion.clamp_lines, 10);
    assert_eq!(expansion.strip_classes.len(), 3);
}

#[test]
fn test_dedupe_defaults() {
    let dedupe = DedupeConfig::default();
    assert_eq!(dedupe.key_lines, 5);
    assert_eq!(dedupe.min_key_chars, 10);
}

#[test]
fn test_spacer_defaults() {
    let selectors = SelectorConfig::default();
    assert_eq!(selectors.spacers.len(), 2);
    assert!(selectors.spacers[1].contains(&"mr-3".to_string()));
}

#[test]
fn test_timing_durations() {
    let timing = TimingConfig::default();
    assert_eq!(timing.init_delay(), Duration::from_millis(1200));
    assert_eq!(timing.debounce(), Duration::from_millis(200));
    assert_eq!(timing.rescan_interval(), Duration::from_secs(2));
    assert_eq!(timing.discovery_interval(), Duration::from_millis(500));
    assert_eq!(timing.discovery_max_attempts, 40);
    assert!(timing.dedupe_delay() > Duration::ZERO);
}

#[test]
fn test_timing_immediate() {
    let timing = TimingConfig::immediate();
    assert_eq!(timing.init_delay(), Duration::ZERO);
    assert_eq!(timing.expand_delay(), Duration::ZERO);
    assert_eq!(timing.dedupe_delay(), Duration::ZERO);
    assert_eq!(timing.debounce(), Duration::from_millis(200));
}

#[test]
fn test_expansion_mode_serialization() {
    let json = serde_json::to_string(&ExpansionMode::ShowAll).unwrap();
    assert_eq!(json, "\"show_all\"");
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config: FeedConfig = toml::from_str(
        r#"
        [timing]
        debounce_ms = 50
        "#,
    )
    .unwrap();
    assert_eq!(config.timing.debounce_ms, 50);
    assert_eq!(config.timing.rescan_interval_ms, 2000);
    assert_eq!(config.dedupe.key_lines, 5);
}
