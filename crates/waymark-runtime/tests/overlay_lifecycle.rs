//! Subscription lifetime and deferred-check ordering.

use std::rc::Rc;
use waymark_core::{DocumentExtent, GuidedTour, Orientation, Rect, TargetRect, TourConfig, TourStep};
use waymark_runtime::testing::FakePage;
use waymark_runtime::{HostEvent, TourOverlay, TourSequencer};

fn setup(host: &Rc<FakePage>) -> (TourOverlay<FakePage>, TourSequencer) {
    let sequencer = TourSequencer::new();
    let overlay = TourOverlay::new(Rc::clone(host), sequencer.clone(), TourConfig::default());
    overlay.attach();
    (overlay, sequencer)
}

#[test]
fn detach_releases_both_streams_together() {
    let host = FakePage::shared();
    host.place_element("#a", Rect::new(100.0, 0.0, 50.0, 20.0));
    let (overlay, sequencer) = setup(&host);

    overlay.detach();

    sequencer.start_tour(
        GuidedTour::new("t", vec![TourStep::new("x").selector("#a")]).use_orb(true),
    );
    assert_eq!(overlay.current_step(), None);
    assert!(!overlay.orb_active(), "orb stream released too");
}

#[test]
fn attach_is_idempotent() {
    let host = FakePage::shared();
    host.place_element("#a", Rect::new(100.0, 0.0, 50.0, 20.0));
    let (overlay, sequencer) = setup(&host);
    overlay.attach();
    overlay.attach();

    // One subscription pair means one resolution per publish; the stream
    // itself dedups identical snapshots, so just assert the state landed.
    sequencer.start_tour(GuidedTour::new("t", vec![TourStep::new("x").selector("#a")]));
    assert!(overlay.current_step().is_some());

    overlay.detach();
    assert!(!overlay.is_attached());
}

#[test]
fn deferred_check_reads_state_current_at_run_time() {
    let host = FakePage::shared();
    host.set_viewport(0.0, 800.0);
    host.place_element_with_extent(
        "#a",
        Rect::new(1200.0, 0.0, 100.0, 30.0),
        DocumentExtent::new(1200.0, 30.0),
    );
    host.place_element_with_extent(
        "#b",
        Rect::new(2000.0, 0.0, 100.0, 30.0),
        DocumentExtent::new(2000.0, 30.0),
    );
    host.set_callout_extent(None);
    let (overlay, sequencer) = setup(&host);

    // Activate step 1 but advance to step 2 before the render settles:
    // the single coalesced check must use step 2's rect and orientation.
    sequencer.start_tour(GuidedTour::new(
        "t",
        vec![
            TourStep::new("one").selector("#a"),
            TourStep::new("two")
                .selector("#b")
                .orientation(Orientation::Bottom),
        ],
    ));
    sequencer.next_step();
    overlay.run_post_layout();

    // Bottom-anchored formula against #b, not the top-anchored one
    // against #a.
    assert_eq!(host.scroll_calls(), vec![2000.0]);
}

#[test]
fn resize_before_post_layout_feeds_the_fresh_rect() {
    let host = FakePage::shared();
    host.set_viewport(0.0, 800.0);
    host.place_element_with_extent(
        "#a",
        Rect::new(1200.0, 0.0, 100.0, 30.0),
        DocumentExtent::new(1200.0, 30.0),
    );
    host.set_callout_extent(None);
    let (overlay, sequencer) = setup(&host);

    sequencer.start_tour(GuidedTour::new(
        "t",
        vec![TourStep::new("x").selector("#a")],
    ));

    // The page reflows before the deferred check runs.
    host.place_element_with_extent(
        "#a",
        Rect::new(1500.0, 0.0, 100.0, 30.0),
        DocumentExtent::new(1500.0, 30.0),
    );
    overlay.handle_event(HostEvent::Resized);
    overlay.run_post_layout();

    assert_eq!(host.scroll_calls(), vec![1500.0 + 30.0 - 800.0]);
}

#[test]
fn plain_viewport_events_never_scroll() {
    let host = FakePage::shared();
    host.set_viewport(0.0, 800.0);
    host.place_element_with_extent(
        "#a",
        Rect::new(1200.0, 0.0, 100.0, 30.0),
        DocumentExtent::new(1200.0, 30.0),
    );
    host.set_callout_extent(None);
    let (overlay, sequencer) = setup(&host);

    sequencer.start_tour(GuidedTour::new(
        "t",
        vec![TourStep::new("x").selector("#a")],
    ));
    overlay.run_post_layout();
    host.clear_scroll_calls();

    // Resize/scroll re-layout only; no re-scroll even though the target
    // is still off-screen.
    overlay.handle_event(HostEvent::Resized);
    overlay.handle_event(HostEvent::Scrolled);
    overlay.run_post_layout();
    assert!(host.scroll_calls().is_empty());
}

#[test]
fn orb_hover_expands_and_scrolls_selector_steps() {
    let host = FakePage::shared();
    host.set_viewport(0.0, 800.0);
    host.place_element_with_extent(
        "#a",
        Rect::new(1200.0, 0.0, 100.0, 30.0),
        DocumentExtent::new(1200.0, 30.0),
    );
    host.set_callout_extent(None);
    let (overlay, sequencer) = setup(&host);

    sequencer.start_tour(
        GuidedTour::new("t", vec![TourStep::new("x").selector("#a")]).use_orb(true),
    );
    overlay.run_post_layout();
    assert!(
        host.scroll_calls().is_empty(),
        "orb mode never auto-scrolls"
    );

    overlay.handle_event(HostEvent::OrbHover);
    overlay.run_post_layout();
    assert_eq!(host.scroll_calls().len(), 1);

    let frame = overlay.frame();
    assert!(frame.orb.is_none());
    assert!(frame.callout.is_some());
}

#[test]
fn full_flow_emits_no_panics_under_an_active_subscriber() {
    // The runtime traces step transitions and scroll decisions; run one
    // full flow with a real subscriber installed so those paths execute.
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry());

    let host = FakePage::shared();
    host.set_viewport(0.0, 800.0);
    host.place_element_with_extent(
        "#a",
        Rect::new(1200.0, 0.0, 100.0, 30.0),
        DocumentExtent::new(1200.0, 30.0),
    );
    host.set_callout_extent(None);
    let (overlay, sequencer) = setup(&host);

    sequencer.start_tour(GuidedTour::new(
        "t",
        vec![TourStep::new("x").selector("#a")],
    ));
    overlay.handle_event(HostEvent::Resized);
    overlay.run_post_layout();
    sequencer.next_step();

    assert_eq!(host.scroll_calls().len(), 1);
}

#[test]
fn vanished_selector_degrades_to_absent_not_error() {
    let host = FakePage::shared();
    host.place_element("#a", Rect::new(100.0, 0.0, 50.0, 20.0));
    let (overlay, sequencer) = setup(&host);

    sequencer.start_tour(GuidedTour::new(
        "t",
        vec![TourStep::new("x").selector("#a").use_highlight_padding(true)],
    ));
    assert!(overlay.target_rect().is_resolved());

    host.remove_element("#a");
    overlay.handle_event(HostEvent::Scrolled);

    assert_eq!(overlay.target_rect(), TargetRect::Absent);
    // The spotlight collapses to the zero box; the callout loses its
    // pixel position but keeps rendering.
    let frame = overlay.frame();
    assert_eq!(frame.backdrop.unwrap().spotlight, Rect::ZERO);
    assert_eq!(frame.callout.unwrap().position, None);

    // The next reflow finds the element again.
    host.place_element("#a", Rect::new(300.0, 0.0, 50.0, 20.0));
    overlay.handle_event(HostEvent::Resized);
    assert!(overlay.target_rect().is_resolved());
}
