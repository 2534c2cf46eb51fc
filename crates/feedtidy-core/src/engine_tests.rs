use super::*;
use std::time::Duration;

use feedtidy_config::TimingConfig;
use feedtidy_dom_memory::fixtures::{
    notification, numbered_lines, spacer, title_only, MENTION_TITLE, REACTION_TITLE,
};
use feedtidy_dom_memory::{ElementSpec, MemoryDocument};
use feedtidy_protocols::Selector;

use crate::session::ActivationWindow;

const DUPLICATE_BODY: &str = "来週の小テストについて\n範囲は第三章まで";

struct Feed {
    doc: MemoryDocument,
    container: NodeId,
}

impl Feed {
    fn new() -> Self {
        let mut doc = MemoryDocument::new();
        let body = doc.body_id();
        let container = doc.append_spec(body, &ElementSpec::new("div").id("feed"));
        Self { doc, container }
    }

    fn push(&mut self, spec: ElementSpec) -> NodeId {
        self.doc.append_spec(self.container, &spec)
    }
}

fn reconciler() -> Reconciler {
    Reconciler::new(FeedConfig::default()).unwrap()
}

fn active_session() -> (ReconciliationSession, Instant) {
    let now = Instant::now();
    (ReconciliationSession::new(ActivationWindow::immediate(now)), now)
}

fn body_of(doc: &MemoryDocument, entry: NodeId) -> NodeId {
    doc.query_selector(entry, &Selector::class("editor-content"))
        .unwrap()
}

#[test]
fn test_mention_expanded() {
    let mut feed = Feed::new();
    let entry = feed.push(notification(MENTION_TITLE, "本文", 0.0));
    let (mut session, now) = active_session();
    let r = reconciler();

    let report = r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert_eq!(report.entries, 1);
    assert_eq!(report.expanded, 1);

    let body = body_of(&feed.doc, entry);
    assert_eq!(
        feed.doc.attribute(body, "data-vc-expanded").as_deref(),
        Some("true")
    );
    assert!(!feed.doc.has_class(body, "line-clamp-3"));
    assert_eq!(
        feed.doc.attribute(body, "data-vc-clamp").as_deref(),
        Some("line-clamp-3")
    );
}

#[test]
fn test_clamp_mode_styles() {
    let mut feed = Feed::new();
    let entry = feed.push(notification(MENTION_TITLE, &numbered_lines(12), 0.0));
    let (mut session, now) = active_session();

    reconciler().reconcile(&mut feed.doc, feed.container, &mut session, now);

    let body = body_of(&feed.doc, entry);
    let styles = feed.doc.styles(body);
    assert_eq!(styles.get("-webkit-line-clamp").map(String::as_str), Some("10"));
    assert_eq!(styles.get("overflow").map(String::as_str), Some("hidden"));
    assert_eq!(styles.get("display").map(String::as_str), Some("-webkit-box"));
    assert!(session.has_pending_measurements());
}

#[test]
fn test_show_all_mode() {
    let mut config = FeedConfig::default();
    config.expansion.mode = ExpansionMode::ShowAll;
    let r = Reconciler::new(config).unwrap();

    let mut feed = Feed::new();
    let entry = feed.push(notification(MENTION_TITLE, &numbered_lines(12), 0.0));
    let (mut session, now) = active_session();

    r.reconcile(&mut feed.doc, feed.container, &mut session, now);

    let body = body_of(&feed.doc, entry);
    assert!(feed.doc.has_class(body, "line-clamp-none"));
    assert_eq!(feed.doc.style_property(body, "-webkit-line-clamp"), None);
    assert!(!session.has_pending_measurements());
}

#[test]
fn test_reaction_not_expanded_but_deduped() {
    let mut feed = Feed::new();
    let a = feed.push(notification(REACTION_TITLE, DUPLICATE_BODY, 0.0));
    let b = feed.push(notification(REACTION_TITLE, DUPLICATE_BODY, 20.0));
    let (mut session, now) = active_session();

    let report = reconciler().reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert_eq!(report.expanded, 0);
    assert_eq!(report.suppressed, 1);

    assert_eq!(feed.doc.attribute(body_of(&feed.doc, a), "data-vc-expanded"), None);
    assert_eq!(feed.doc.attribute(a, "data-vc-duplicate"), None);
    assert_eq!(
        feed.doc.attribute(b, "data-vc-duplicate").as_deref(),
        Some("true")
    );
}

#[test]
fn test_unrelated_entries_untouched() {
    let mut feed = Feed::new();
    feed.push(notification("お知らせが届きました", DUPLICATE_BODY, 0.0));
    feed.push(notification("お知らせが届きました", DUPLICATE_BODY, 20.0));
    let (mut session, now) = active_session();
    let before = feed.doc.revision();

    let report = reconciler().reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert!(report.is_noop());
    assert_eq!(feed.doc.revision(), before);
}

#[test]
fn test_second_pass_writes_nothing() {
    let mut feed = Feed::new();
    feed.push(spacer("flex mt-4 md:mt-6 w-full items-start"));
    feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 0.0));
    feed.push(spacer("flex mt-4 md:mt-6 w-full items-start"));
    feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 20.0));
    feed.push(notification(REACTION_TITLE, "別の本文がここに入ります", 40.0));
    let (mut session, now) = active_session();
    let r = reconciler();

    let first = r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert!(!first.is_noop());
    let revision = feed.doc.revision();

    let second = r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert!(second.is_noop(), "{:?}", second);
    assert_eq!(feed.doc.revision(), revision);
}

#[test]
fn test_smaller_top_wins_regardless_of_dom_order() {
    let mut feed = Feed::new();
    let lower = feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 50.0));
    let upper = feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 10.0));
    let (mut session, now) = active_session();

    reconciler().reconcile(&mut feed.doc, feed.container, &mut session, now);

    assert_eq!(feed.doc.attribute(upper, "data-vc-duplicate"), None);
    assert_eq!(
        feed.doc.attribute(lower, "data-vc-duplicate").as_deref(),
        Some("true")
    );
}

#[test]
fn test_distinct_keys_never_duplicates() {
    let mut feed = Feed::new();
    let a = feed.push(notification(MENTION_TITLE, "一つ目の本文がここにあります", 0.0));
    let b = feed.push(notification(MENTION_TITLE, "二つ目の本文がここにあります", 20.0));
    let (mut session, now) = active_session();

    let report = reconciler().reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert_eq!(report.suppressed, 0);
    assert_eq!(feed.doc.attribute(a, "data-vc-hidden"), None);
    assert_eq!(feed.doc.attribute(b, "data-vc-hidden"), None);
}

#[test]
fn test_short_keys_not_deduped() {
    let mut feed = Feed::new();
    feed.push(notification(MENTION_TITLE, "了解です", 0.0));
    let b = feed.push(notification(MENTION_TITLE, "了解です", 20.0));
    let (mut session, now) = active_session();

    let report = reconciler().reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert_eq!(report.suppressed, 0);
    assert_eq!(feed.doc.attribute(b, "data-vc-duplicate"), None);
}

#[test]
fn test_duplicate_scenario() {
    let mut feed = Feed::new();
    let text = numbered_lines(12);
    let a = feed.push(notification(MENTION_TITLE, &text, 0.0));
    let b = feed.push(notification(MENTION_TITLE, &text, 20.0));
    let (mut session, now) = active_session();

    let report = reconciler().reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert_eq!(report.expanded, 2);
    assert_eq!(report.suppressed, 1);

    assert_eq!(
        feed.doc.attribute(body_of(&feed.doc, a), "data-vc-expanded").as_deref(),
        Some("true")
    );
    assert_eq!(feed.doc.attribute(a, "data-vc-hidden"), None);
    assert!(feed.doc.bounding_client_rect(a).unwrap().is_measurable());

    assert_eq!(feed.doc.attribute(b, "data-vc-hidden").as_deref(), Some("true"));
    assert_eq!(feed.doc.style_property(b, "height").as_deref(), Some("0px"));
    assert_eq!(feed.doc.bounding_client_rect(b).unwrap().height, 0.0);
    assert_eq!(session.suppressed_key(b), Some("行1\n行2\n行3\n行4\n行5"));
}

#[test]
fn test_restyled_duplicate_is_collapsed_again() {
    let mut feed = Feed::new();
    feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 0.0));
    let b = feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 20.0));
    let (mut session, now) = active_session();
    let r = reconciler();

    r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert!(!feed.doc.bounding_client_rect(b).unwrap().is_measurable());

    // Host re-render drops the inline styles but keeps the flags and content.
    let styles: Vec<String> = feed.doc.styles(b).into_keys().collect();
    for name in &styles {
        feed.doc.remove_style_property(b, name).unwrap();
    }
    assert!(feed.doc.bounding_client_rect(b).unwrap().is_measurable());

    let report = r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert_eq!(report.suppressed, 0);
    assert_eq!(report.released, 0);
    assert_eq!(feed.doc.style_property(b, "height").as_deref(), Some("0px"));
    assert!(!feed.doc.bounding_client_rect(b).unwrap().is_measurable());
}

#[test]
fn test_spacers_before_duplicate_removed() {
    let mut feed = Feed::new();
    let first_spacer = feed.push(spacer("flex mt-4 md:mt-6 w-full items-start"));
    feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 0.0));
    let gap = feed.push(spacer("flex mt-4 md:mt-6 w-full items-start"));
    let avatar = feed.push(spacer("relative mr-3"));
    let b = feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 20.0));
    let (mut session, now) = active_session();

    let report = reconciler().reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert_eq!(report.spacers_removed, 2);
    assert!(!feed.doc.is_connected(gap));
    assert!(!feed.doc.is_connected(avatar));
    assert!(feed.doc.is_connected(first_spacer));
    assert!(feed.doc.is_connected(b));
}

#[test]
fn test_recycled_node_is_reset() {
    let mut feed = Feed::new();
    feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 0.0));
    let b = feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 20.0));
    let (mut session, now) = active_session();
    let r = reconciler();

    r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert_eq!(feed.doc.attribute(b, "data-vc-hidden").as_deref(), Some("true"));

    let body_selector = Selector::class("editor-content");
    assert!(feed.doc.replace_text(b, &body_selector, "まったく別の通知の本文です"));
    let report = r.reconcile(&mut feed.doc, feed.container, &mut session, now);

    assert_eq!(report.resets, 1);
    assert_eq!(feed.doc.attribute(b, "data-vc-hidden"), None);
    assert_eq!(feed.doc.attribute(b, "data-vc-duplicate"), None);
    assert_eq!(feed.doc.style_property(b, "height"), None);
    assert_eq!(session.suppressed_key(b), None);
    // Still a mention, so it is expanded again from the new content.
    assert_eq!(
        feed.doc.attribute(body_of(&feed.doc, b), "data-vc-expanded").as_deref(),
        Some("true")
    );
}

#[test]
fn test_reset_restores_clamp_classes() {
    let mut feed = Feed::new();
    let a = feed.push(notification(MENTION_TITLE, "本文その一です", 0.0));
    let (mut session, now) = active_session();
    let r = reconciler();

    r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    let title = feed
        .doc
        .query_selector(a, &Selector::parse("p.line-clamp-2").unwrap())
        .unwrap();
    feed.doc.set_text_content(title, "お知らせが届きました").unwrap();

    let report = r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert_eq!(report.resets, 1);
    assert_eq!(report.expanded, 0);

    let body = body_of(&feed.doc, a);
    assert!(feed.doc.has_class(body, "line-clamp-3"));
    assert_eq!(feed.doc.attribute(body, "data-vc-expanded"), None);
    assert_eq!(feed.doc.attribute(body, "data-vc-clamp"), None);
    assert!(feed.doc.styles(body).is_empty());
}

#[test]
fn test_released_when_keeper_disappears() {
    let mut feed = Feed::new();
    let a = feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 0.0));
    let b = feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 20.0));
    let (mut session, now) = active_session();
    let r = reconciler();

    r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    feed.doc.remove_node(a).unwrap();

    let report = r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert_eq!(report.released, 1);
    assert_eq!(report.evicted, 1);
    assert_eq!(feed.doc.attribute(b, "data-vc-duplicate"), None);
    assert!(feed.doc.bounding_client_rect(b).unwrap().is_measurable());

    let again = r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert!(again.is_noop());
    assert_eq!(session.tracked_entries(), 1);
}

#[test]
fn test_missing_body_is_skipped() {
    let mut feed = Feed::new();
    let a = feed.push(title_only(MENTION_TITLE, 0.0));
    let b = feed.push(title_only(MENTION_TITLE, 20.0));
    let (mut session, now) = active_session();

    let report = reconciler().reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert!(report.is_noop());
    assert_eq!(feed.doc.attribute(a, "data-vc-hidden"), None);
    assert_eq!(feed.doc.attribute(b, "data-vc-hidden"), None);
}

#[test]
fn test_inert_before_activation() {
    let mut feed = Feed::new();
    let a = feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 0.0));
    let b = feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 20.0));
    let start = Instant::now();
    let timing = TimingConfig::default();
    let mut session = ReconciliationSession::new(ActivationWindow::starting_at(start, &timing));
    let r = reconciler();

    let report = r.reconcile(&mut feed.doc, feed.container, &mut session, start);
    assert!(!report.expansion_active);
    assert!(!report.dedupe_active);
    assert!(report.is_noop());

    let expand_only = start + Duration::from_millis(900);
    let report = r.reconcile(&mut feed.doc, feed.container, &mut session, expand_only);
    assert!(report.expansion_active);
    assert!(!report.dedupe_active);
    assert_eq!(report.expanded, 2);
    assert_eq!(feed.doc.attribute(b, "data-vc-duplicate"), None);

    let both = start + Duration::from_millis(2300);
    let report = r.reconcile(&mut feed.doc, feed.container, &mut session, both);
    assert!(report.dedupe_active);
    assert_eq!(report.suppressed, 1);
    assert_eq!(feed.doc.attribute(a, "data-vc-duplicate"), None);
}

#[test]
fn test_measure_pending_appends_ellipsis_once() {
    let mut feed = Feed::new();
    let long = feed.push(notification(MENTION_TITLE, &numbered_lines(12), 0.0));
    let short = feed.push(notification(MENTION_TITLE, "短い本文です", 20.0));
    let (mut session, now) = active_session();
    let r = reconciler();

    r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    assert_eq!(r.measure_pending(&mut feed.doc, &mut session), 1);
    assert!(!session.has_pending_measurements());
    assert_eq!(r.measure_pending(&mut feed.doc, &mut session), 0);

    let snapshot = r.snapshot(&feed.doc, feed.container);
    let state = |node| snapshot.iter().find(|s| s.node == node).unwrap();
    assert!(state(long).ellipsis);
    assert!(!state(short).ellipsis);
}

#[test]
fn test_snapshot() {
    let mut feed = Feed::new();
    let a = feed.push(notification(MENTION_TITLE, DUPLICATE_BODY, 0.0));
    let b = feed.push(notification(REACTION_TITLE, DUPLICATE_BODY, 20.0));
    let (mut session, now) = active_session();
    let r = reconciler();

    r.reconcile(&mut feed.doc, feed.container, &mut session, now);
    let snapshot = r.snapshot(&feed.doc, feed.container);

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].node, a);
    assert_eq!(snapshot[0].classification, Classification::Mention);
    assert!(snapshot[0].expanded);
    assert!(!snapshot[0].duplicate);
    assert_eq!(snapshot[1].node, b);
    assert_eq!(snapshot[1].classification, Classification::Reaction);
    assert!(snapshot[1].duplicate);
    assert!(snapshot[1].hidden);
    assert_eq!(snapshot[1].body_key, "来週の小テストについて\n範囲は第三章まで");
}

#[test]
fn test_find_container() {
    let feed_with_entry = {
        let mut feed = Feed::new();
        feed.push(notification(MENTION_TITLE, "本文", 0.0));
        feed
    };
    let r = reconciler();
    assert_eq!(
        r.find_container(&feed_with_entry.doc),
        Some(feed_with_entry.container)
    );

    let empty = Feed::new();
    assert_eq!(r.find_container(&empty.doc), None);
}

#[test]
fn test_reconcile_entry_as_root() {
    let mut feed = Feed::new();
    let a = feed.push(notification(MENTION_TITLE, "本文その一です", 0.0));
    let (mut session, now) = active_session();

    let report = reconciler().reconcile(&mut feed.doc, a, &mut session, now);
    assert_eq!(report.entries, 1);
    assert_eq!(report.expanded, 1);
}

#[test]
fn test_snapshot_serialization() {
    let mut feed = Feed::new();
    feed.push(notification(REACTION_TITLE, DUPLICATE_BODY, 0.0));
    let snapshot = reconciler().snapshot(&feed.doc, feed.container);

    let json = serde_json::to_value(&snapshot[0]).unwrap();
    assert_eq!(json["classification"], "reaction");
    assert_eq!(json["expanded"], false);

    let report = PassReport {
        entries: 2,
        suppressed: 1,
        ..PassReport::default()
    };
    let json = serde_json::to_value(report).unwrap();
    assert_eq!(json["suppressed"], 1);
    assert_eq!(json["dedupe_active"], false);
}
