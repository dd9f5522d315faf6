// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests for `PageViewer` against a recording host.

mod common;

use common::{
    RecordingHost, Unit, display_request, on_page, ptr, selection, settle_duration, size,
};
use kurbo::{Point, Size};
use mekbay_gesture::{PointerId, WheelInput};
use mekbay_page_viewer::{PageViewer, Transition, ViewerConfig, ViewerOptions, ViewerPhase};
use mekbay_view2d::ViewportConfig;

type Viewer = PageViewer<Unit, RecordingHost>;

/// 600x800 sheets without gaps. In a 600x800 container exactly one fits.
fn single_sheet() -> ViewerConfig {
    ViewerConfig {
        viewport: ViewportConfig {
            page_size: Size::new(600.0, 800.0),
            page_gap: 0.0,
            scale_floor: 0.6,
            ..ViewportConfig::default()
        },
        ..ViewerConfig::default()
    }
}

/// Same sheets; a 1200x800 container shows two side by side.
fn two_sheets() -> ViewerConfig {
    ViewerConfig {
        viewport: ViewportConfig {
            scale_floor: 0.7,
            ..single_sheet().viewport
        },
        ..single_sheet()
    }
}

fn start(config: ViewerConfig, container: Size, units: &[Unit]) -> (Viewer, RecordingHost) {
    let mut host = RecordingHost::new();
    let mut viewer = Viewer::new(config);
    let events = viewer.initialize(&mut host, container, units.to_vec());
    let request = display_request(&events).expect("initialize requests a display");
    assert!(viewer.complete_display(&request, &mut host));
    (viewer, host)
}

fn navigate(viewer: &mut Viewer, host: &mut RecordingHost, unit: Unit) {
    let events = viewer.show_unit(&unit, host);
    let request = display_request(&events).expect("unit is outside the window");
    assert!(viewer.complete_display(&request, host));
}

/// Drags pointer 1 horizontally from `from_x` through `xs`, 100ms apart, and
/// releases `release_after_ms` after the last move.
fn drag(
    viewer: &mut Viewer,
    host: &mut RecordingHost,
    from_x: f64,
    xs: &[f64],
    release_after_ms: u64,
) -> mekbay_page_viewer::ViewerEvents<Unit> {
    let mut t = 0;
    viewer.pointer_down(ptr(1, from_x, 400.0, t), host);
    let mut last = from_x;
    for &x in xs {
        t += 100;
        viewer.pointer_move(ptr(1, x, 400.0, t), host);
        last = x;
    }
    viewer.pointer_up(ptr(1, last, 400.0, t + release_after_ms), host)
}

#[test]
fn initialize_mounts_window_and_selects_first_unit() {
    let (viewer, host) = start(two_sheets(), size(1200.0, 800.0), &[1, 2, 3, 4]);
    assert_eq!(viewer.phase(), ViewerPhase::Displaying);
    assert_eq!(viewer.visible_page_count(), 2);
    assert_eq!(host.mounted_units(), [1, 2]);
    assert_eq!(host.selected_units(), [1]);
    assert_eq!(viewer.selected_unit(), Some(&1));
    assert!(viewer.engine().swipe_enabled());
}

#[test]
fn slow_swipe_past_threshold_commits_and_wraps() {
    let (mut viewer, mut host) = start(single_sheet(), size(600.0, 800.0), &[10, 20, 30]);
    navigate(&mut viewer, &mut host, 30);
    assert_eq!(viewer.view_start(), 2);

    viewer.pointer_down(ptr(1, 300.0, 400.0, 0), &mut host);
    viewer.pointer_move(ptr(1, 250.0, 400.0, 100), &mut host);
    assert_eq!(viewer.phase(), ViewerPhase::Swiping);
    // Neighbours on both sides were preloaded, and the leading one mounted.
    assert!(host.preloaded.contains(&20));
    assert!(host.preloaded.contains(&10));
    assert_eq!(host.mounted_units(), [30, 10]);

    viewer.pointer_move(ptr(1, 150.0, 400.0, 300), &mut host);
    let events = viewer.pointer_up(ptr(1, 150.0, 400.0, 600), &mut host);
    assert_eq!(settle_duration(&events), Some(250));
    assert_eq!(
        host.last_swipe_offset(),
        Some((-600.0, Some(Transition::ease_out(250))))
    );
    assert_eq!(viewer.phase(), ViewerPhase::Settling);

    let events = viewer.finish_swipe(&mut host);
    assert_eq!(viewer.view_start(), 0);
    assert_eq!(selection(&events), Some(10));
    let request = display_request(&events).expect("commit requests a display");
    assert_eq!(request.units, [10]);
    assert!(viewer.complete_display(&request, &mut host));

    assert_eq!(viewer.phase(), ViewerPhase::Displaying);
    assert_eq!(host.mounted_units(), [10]);
    assert_eq!(host.last_swipe_offset(), Some((0.0, None)));
}

#[test]
fn short_slow_swipe_snaps_back() {
    let (mut viewer, mut host) = start(single_sheet(), size(600.0, 800.0), &[10, 20, 30]);

    let events = drag(&mut viewer, &mut host, 300.0, &[260.0], 400);
    assert_eq!(settle_duration(&events), Some(200));
    assert_eq!(
        host.last_swipe_offset(),
        Some((0.0, Some(Transition::ease_out(200))))
    );

    let events = viewer.finish_swipe(&mut host);
    assert!(display_request(&events).is_none());
    assert_eq!(viewer.view_start(), 0);
    assert_eq!(viewer.selected_unit(), Some(&10));
    assert_eq!(host.mounted_units(), [10]);
    // The neighbour mounted for the swipe is gone, overlays included.
    assert!(host.destroyed_interactions.iter().any(|(u, _)| *u == 20));
    assert!(!viewer.has_overlays(&20));
}

#[test]
fn quick_flick_commits_one_page() {
    let (mut viewer, mut host) = start(single_sheet(), size(600.0, 800.0), &[10, 20, 30]);

    viewer.pointer_down(ptr(1, 300.0, 400.0, 0), &mut host);
    viewer.pointer_move(ptr(1, 285.0, 400.0, 10), &mut host);
    let events = viewer.pointer_up(ptr(1, 285.0, 400.0, 20), &mut host);
    assert_eq!(settle_duration(&events), Some(250));

    let events = viewer.finish_swipe(&mut host);
    assert_eq!(viewer.view_start(), 1);
    assert_eq!(display_request(&events).map(|r| r.units), Some(vec![20]));
}

#[test]
fn dragging_right_retreats_and_selects_rightmost() {
    let (mut viewer, mut host) = start(two_sheets(), size(1200.0, 800.0), &[1, 2, 3, 4]);

    let events = drag(&mut viewer, &mut host, 300.0, &[400.0, 1000.0], 500);
    assert_eq!(settle_duration(&events), Some(250));
    let events = viewer.finish_swipe(&mut host);
    assert_eq!(viewer.view_start(), 3);
    let request = display_request(&events).expect("commit requests a display");
    assert_eq!(request.units, [4, 1]);
    // Unit 1 is still shown, so the selection stays put.
    assert_eq!(selection(&events), None);
    assert!(viewer.complete_display(&request, &mut host));
    assert_eq!(host.mounted_units(), [4, 1]);
}

#[test]
fn overlays_survive_a_window_shift() {
    let (mut viewer, mut host) = start(two_sheets(), size(1200.0, 800.0), &[1, 2, 3, 4]);
    let overlay_of_2 = host.interaction_of(2).expect("unit 2 is mounted");

    viewer.pointer_down(ptr(1, 900.0, 400.0, 0), &mut host);
    viewer.pointer_move(ptr(1, 800.0, 400.0, 100), &mut host);
    assert_eq!(host.mounted_units(), [1, 2, 3]);
    let overlay_of_3 = host.interaction_of(3).expect("unit 3 is mounted");
    viewer.pointer_move(ptr(1, 200.0, 400.0, 300), &mut host);
    assert_eq!(host.mounted_units(), [1, 2, 3, 4]);
    viewer.pointer_up(ptr(1, 200.0, 400.0, 900), &mut host);

    let events = viewer.finish_swipe(&mut host);
    assert_eq!(selection(&events), Some(2));
    let request = display_request(&events).expect("commit requests a display");
    assert!(viewer.complete_display(&request, &mut host));

    assert_eq!(host.mounted_units(), [2, 3]);
    assert_eq!(host.interaction_of(2), Some(overlay_of_2));
    assert_eq!(host.interaction_of(3), Some(overlay_of_3));
    let mut destroyed: Vec<Unit> = host.destroyed_interactions.iter().map(|(u, _)| *u).collect();
    destroyed.sort_unstable();
    assert_eq!(destroyed, [1, 4]);
    assert_eq!(host.selected_units(), [2]);
}

#[test]
fn stale_display_completion_is_discarded() {
    let (mut viewer, mut host) = start(single_sheet(), size(600.0, 800.0), &[10, 20, 30]);

    let first = display_request(&viewer.show_unit(&20, &mut host)).expect("navigates");
    let second = display_request(&viewer.show_unit(&30, &mut host)).expect("navigates");
    assert!(second.version > first.version);

    assert!(!viewer.complete_display(&first, &mut host));
    assert_eq!(host.mounted_units(), [10]);
    assert!(viewer.complete_display(&second, &mut host));
    assert_eq!(host.mounted_units(), [30]);
    // A request renders at most once.
    assert!(!viewer.complete_display(&second, &mut host));
}

#[test]
fn swipe_is_disabled_while_a_display_is_pending() {
    let (mut viewer, mut host) = start(single_sheet(), size(600.0, 800.0), &[10, 20, 30]);
    let request = display_request(&viewer.show_unit(&20, &mut host)).expect("navigates");
    assert!(!viewer.engine().swipe_enabled());
    assert!(viewer.complete_display(&request, &mut host));
    assert!(viewer.engine().swipe_enabled());
}

#[test]
fn per_sheet_zoom_is_restored_when_not_syncing() {
    let (mut viewer, mut host) = start(single_sheet(), size(600.0, 800.0), &[10, 20, 30]);
    let wheel_in = WheelInput {
        position: Point::new(300.0, 400.0),
        delta_y: -100.0,
    };
    assert!(viewer.wheel(wheel_in, &mut host));
    let zoomed = viewer.view_state().scale;
    assert!(zoomed > 1.0);

    navigate(&mut viewer, &mut host, 20);
    assert_eq!(viewer.view_state().scale, 1.0);
    assert_eq!(viewer.saved_view(&10).map(|v| v.scale), Some(zoomed));

    navigate(&mut viewer, &mut host, 10);
    assert_eq!(viewer.view_state().scale, zoomed);
}

#[test]
fn synced_zoom_carries_over_between_sheets() {
    let config = ViewerConfig {
        options: ViewerOptions {
            sync_zoom: true,
            ..ViewerOptions::default()
        },
        ..single_sheet()
    };
    let (mut viewer, mut host) = start(config, size(600.0, 800.0), &[10, 20, 30]);
    viewer.zoom_in(&mut host);
    let zoomed = viewer.view_state().scale;

    navigate(&mut viewer, &mut host, 20);
    assert_eq!(viewer.view_state().scale, zoomed);
    // Swiping is only offered at minimum zoom.
    viewer.pointer_down(ptr(1, 300.0, 400.0, 0), &mut host);
    viewer.pointer_move(ptr(1, 200.0, 400.0, 50), &mut host);
    assert_eq!(viewer.phase(), ViewerPhase::Displaying);
}

#[test]
fn resize_that_changes_page_count_rerenders() {
    let (mut viewer, mut host) = start(two_sheets(), size(600.0, 800.0), &[1, 2, 3, 4]);
    assert_eq!(host.mounted_units(), [1]);

    let events = viewer.handle_resize(size(1200.0, 800.0), &mut host);
    let request = display_request(&events).expect("page count changed");
    assert_eq!(request.units, [1, 2]);
    assert!(viewer.complete_display(&request, &mut host));
    assert_eq!(host.mounted_units(), [1, 2]);

    let events = viewer.handle_resize(size(1210.0, 800.0), &mut host);
    assert!(display_request(&events).is_none());
}

#[test]
fn drag_lock_aborts_swipe_and_blocks_new_gestures() {
    let (mut viewer, mut host) = start(single_sheet(), size(600.0, 800.0), &[10, 20, 30]);
    viewer.pointer_down(ptr(1, 300.0, 400.0, 0), &mut host);
    viewer.pointer_move(ptr(1, 250.0, 400.0, 100), &mut host);
    assert_eq!(viewer.phase(), ViewerPhase::Swiping);

    let events = viewer.set_menu_drag_lock(true, &mut host);
    assert_eq!(settle_duration(&events), Some(200));
    assert_eq!(host.released, [PointerId(1)]);
    viewer.finish_swipe(&mut host);
    assert_eq!(host.mounted_units(), [10]);

    let captured = host.captured.len();
    viewer.pointer_down(ptr(2, 300.0, 400.0, 500), &mut host);
    assert_eq!(host.captured.len(), captured);

    viewer.set_menu_drag_lock(false, &mut host);
    viewer.pointer_down(ptr(2, 300.0, 400.0, 600), &mut host);
    assert_eq!(host.captured.last(), Some(&PointerId(2)));
}

#[test]
fn picker_lock_ignores_taps() {
    let (mut viewer, mut host) = start(two_sheets(), size(1200.0, 800.0), &[1, 2, 3, 4]);
    assert!(viewer.set_picker_lock(true, &mut host).is_empty());
    viewer.pointer_down(on_page(1, 900.0, 400.0, 0), &mut host);
    let events = viewer.pointer_up(on_page(1, 900.0, 400.0, 30), &mut host);
    assert!(events.is_empty());
    assert_eq!(viewer.selected_unit(), Some(&1));
}

#[test]
fn drawing_mode_disables_swipe() {
    let (mut viewer, mut host) = start(single_sheet(), size(600.0, 800.0), &[10, 20, 30]);
    viewer.set_drawing_mode(true);
    assert!(!viewer.engine().swipe_enabled());
    viewer.pointer_down(ptr(1, 300.0, 400.0, 0), &mut host);
    viewer.pointer_move(ptr(1, 200.0, 400.0, 50), &mut host);
    assert_eq!(viewer.phase(), ViewerPhase::Displaying);
}

#[test]
fn tap_selects_the_page_under_the_pointer() {
    let (mut viewer, mut host) = start(two_sheets(), size(1200.0, 800.0), &[1, 2, 3, 4]);

    viewer.pointer_down(on_page(1, 900.0, 400.0, 0), &mut host);
    let events = viewer.pointer_up(on_page(1, 900.0, 400.0, 30), &mut host);
    assert_eq!(selection(&events), Some(2));
    assert_eq!(host.selected_units(), [2]);

    // The tail of a moved gesture never selects.
    viewer.pointer_down(on_page(1, 100.0, 400.0, 1000), &mut host);
    viewer.pointer_move(on_page(1, 100.0, 460.0, 1050), &mut host);
    let events = viewer.pointer_up(on_page(1, 100.0, 460.0, 1100), &mut host);
    assert_eq!(selection(&events), None);
    assert_eq!(viewer.selected_unit(), Some(&2));
}

#[test]
fn show_unit_inside_window_only_moves_selection() {
    let (mut viewer, mut host) = start(two_sheets(), size(1200.0, 800.0), &[1, 2, 3, 4]);
    let events = viewer.show_unit(&2, &mut host);
    assert_eq!(selection(&events), Some(2));
    assert!(display_request(&events).is_none());
    assert_eq!(host.selected_units(), [2]);
}

#[test]
fn set_units_keeps_a_surviving_selection() {
    let (mut viewer, mut host) = start(single_sheet(), size(600.0, 800.0), &[10, 20, 30]);
    navigate(&mut viewer, &mut host, 20);

    let events = viewer.set_units(vec![20, 40], &mut host);
    assert_eq!(selection(&events), None);
    let request = display_request(&events).expect("unit list changed");
    assert!(viewer.complete_display(&request, &mut host));
    assert_eq!(viewer.units(), [20, 40]);
    assert_eq!(viewer.selected_unit(), Some(&20));
    assert_eq!(viewer.window_units(), [20]);
    assert_eq!(host.mounted_units(), [20]);

    let events = viewer.set_units(vec![50], &mut host);
    assert_eq!(selection(&events), Some(50));
}

#[test]
fn uninitialized_viewer_ignores_everything() {
    let mut host = RecordingHost::new();
    let mut viewer = Viewer::new(single_sheet());
    assert!(viewer.pointer_down(ptr(1, 0.0, 0.0, 0), &mut host).is_empty());
    assert!(viewer.show_unit(&1, &mut host).is_empty());
    assert!(viewer.finish_swipe(&mut host).is_empty());
    assert!(host.captured.is_empty());
    assert!(host.transforms.is_empty());
    assert_eq!(viewer.phase(), ViewerPhase::Uninitialized);
}

#[test]
fn detach_tears_down_pages_and_overlays() {
    let (mut viewer, mut host) = start(two_sheets(), size(1200.0, 800.0), &[1, 2, 3, 4]);
    viewer.detach(&mut host);
    assert!(host.mounted.is_empty());
    assert_eq!(host.destroyed_canvases.len(), 2);
    assert_eq!(viewer.phase(), ViewerPhase::Uninitialized);
}

#[test]
fn detach_mid_pinch_releases_every_capture() {
    let (mut viewer, mut host) = start(single_sheet(), size(600.0, 800.0), &[1, 2, 3]);
    viewer.pointer_down(ptr(5, 200.0, 400.0, 0), &mut host);
    viewer.pointer_down(ptr(6, 400.0, 400.0, 5), &mut host);
    assert_eq!(host.captured, [PointerId(5), PointerId(6)]);

    viewer.detach(&mut host);
    assert_eq!(host.released, host.captured);
    assert_eq!(viewer.phase(), ViewerPhase::Uninitialized);
}
