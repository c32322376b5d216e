#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{Element, ElementKind};

const W: f64 = 1080.0;
const H: f64 = 1440.0;

fn element_at(x: f64, y: f64, w: f64, h: f64) -> Element {
    let mut el = Element::new_default(ElementKind::Paragraph, None, W, H);
    el.set_rect(Rect::new(x, y, w, h));
    el
}

// =============================================================
// ResizeAnchor
// =============================================================

#[test]
fn anchor_signs() {
    assert_eq!((ResizeAnchor::Nw.x_sign(), ResizeAnchor::Nw.y_sign()), (-1, -1));
    assert_eq!((ResizeAnchor::N.x_sign(), ResizeAnchor::N.y_sign()), (0, -1));
    assert_eq!((ResizeAnchor::E.x_sign(), ResizeAnchor::E.y_sign()), (1, 0));
    assert_eq!((ResizeAnchor::Se.x_sign(), ResizeAnchor::Se.y_sign()), (1, 1));
    assert_eq!((ResizeAnchor::Sw.x_sign(), ResizeAnchor::Sw.y_sign()), (-1, 1));
}

#[test]
fn handle_points_sit_on_edges() {
    let r = Rect::new(100.0, 200.0, 300.0, 100.0);
    assert_eq!(ResizeAnchor::Nw.handle_point(r), Point::new(100.0, 200.0));
    assert_eq!(ResizeAnchor::N.handle_point(r), Point::new(250.0, 200.0));
    assert_eq!(ResizeAnchor::E.handle_point(r), Point::new(400.0, 250.0));
    assert_eq!(ResizeAnchor::Se.handle_point(r), Point::new(400.0, 300.0));
    assert_eq!(ResizeAnchor::W.handle_point(r), Point::new(100.0, 250.0));
}

#[test]
fn all_lists_eight_distinct_anchors() {
    for (i, a) in ResizeAnchor::ALL.iter().enumerate() {
        for (j, b) in ResizeAnchor::ALL.iter().enumerate() {
            assert_eq!(i == j, a == b);
        }
    }
}

// =============================================================
// resize
// =============================================================

#[test]
fn se_grows_width_and_height() {
    let r = ResizeAnchor::Se.resize(Rect::new(100.0, 100.0, 200.0, 100.0), 50.0, 20.0, W, H);
    assert_eq!(r, Rect::new(100.0, 100.0, 250.0, 120.0));
}

#[test]
fn nw_moves_origin_against_delta() {
    let r = ResizeAnchor::Nw.resize(Rect::new(100.0, 100.0, 200.0, 100.0), 30.0, 10.0, W, H);
    assert_eq!(r, Rect::new(130.0, 110.0, 170.0, 90.0));
}

#[test]
fn edge_handles_touch_one_axis() {
    let orig = Rect::new(100.0, 100.0, 200.0, 100.0);
    let e = ResizeAnchor::E.resize(orig, 40.0, 999.0, W, H);
    assert_eq!(e, Rect::new(100.0, 100.0, 240.0, 100.0));
    let n = ResizeAnchor::N.resize(orig, 999.0, -20.0, W, H);
    assert_eq!(n, Rect::new(100.0, 80.0, 200.0, 120.0));
}

#[test]
fn width_floor_keeps_right_edge_for_west_handles() {
    let r = ResizeAnchor::W.resize(Rect::new(100.0, 100.0, 200.0, 100.0), 500.0, 0.0, W, H);
    assert_eq!(r.width, 100.0);
    assert_eq!(r.right(), 300.0);
}

#[test]
fn height_floor_applies() {
    let r = ResizeAnchor::S.resize(Rect::new(100.0, 100.0, 200.0, 100.0), 0.0, -500.0, W, H);
    assert_eq!(r.height, 30.0);
    assert_eq!(r.y, 100.0);
}

#[test]
fn resize_is_clamped_into_canvas() {
    let r = ResizeAnchor::Nw.resize(Rect::new(50.0, 50.0, 200.0, 100.0), -200.0, -200.0, W, H);
    assert_eq!(r.x, 0.0);
    assert_eq!(r.y, 0.0);
    let r = ResizeAnchor::Se.resize(Rect::new(900.0, 1300.0, 150.0, 100.0), 500.0, 500.0, W, H);
    assert!(r.right() <= W);
    assert!(r.bottom() <= H);
}

#[test]
fn west_drag_past_canvas_keeps_right_edge() {
    let orig = Rect::new(20.0, 100.0, 200.0, 80.0);
    let r = ResizeAnchor::Nw.resize(orig, -100.0, 0.0, W, H);
    assert_eq!(r, Rect::new(0.0, 100.0, 220.0, 80.0));
    assert_eq!(r.right(), orig.right());
}

#[test]
fn north_drag_past_canvas_keeps_bottom_edge() {
    let orig = Rect::new(100.0, 40.0, 200.0, 100.0);
    let r = ResizeAnchor::N.resize(orig, 0.0, -300.0, W, H);
    assert_eq!(r, Rect::new(100.0, 0.0, 200.0, 140.0));
}

#[test]
fn east_and_south_stop_at_canvas_border() {
    let orig = Rect::new(900.0, 1300.0, 150.0, 100.0);
    let r = ResizeAnchor::Se.resize(orig, 500.0, 500.0, W, H);
    assert_eq!(r, Rect::new(900.0, 1300.0, 180.0, 140.0));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn miss_returns_none() {
    let page = Page::new(vec![element_at(100.0, 100.0, 200.0, 100.0)]);
    assert!(hit_test(Point::new(500.0, 500.0), &page, None, 8.0).is_none());
}

#[test]
fn body_hit() {
    let el = element_at(100.0, 100.0, 200.0, 100.0);
    let id = el.id;
    let page = Page::new(vec![el]);
    let hit = hit_test(Point::new(150.0, 150.0), &page, None, 8.0).unwrap();
    assert_eq!(hit, Hit { element_id: id, part: HitPart::Body });
}

#[test]
fn topmost_body_wins() {
    let below = element_at(100.0, 100.0, 200.0, 100.0);
    let above = element_at(150.0, 150.0, 200.0, 100.0);
    let above_id = above.id;
    let page = Page::new(vec![below, above]);
    let hit = hit_test(Point::new(160.0, 160.0), &page, None, 8.0).unwrap();
    assert_eq!(hit.element_id, above_id);
}

#[test]
fn handles_ignored_without_selection() {
    let el = element_at(100.0, 100.0, 200.0, 100.0);
    let page = Page::new(vec![el]);
    let hit = hit_test(Point::new(96.0, 96.0), &page, None, 8.0);
    assert!(hit.is_none());
}

#[test]
fn selected_handle_hit_within_radius() {
    let el = element_at(100.0, 100.0, 200.0, 100.0);
    let id = el.id;
    let page = Page::new(vec![el]);
    let hit = hit_test(Point::new(96.0, 96.0), &page, Some(id), 8.0).unwrap();
    assert_eq!(hit.part, HitPart::ResizeHandle(ResizeAnchor::Nw));
    let hit = hit_test(Point::new(303.0, 150.0), &page, Some(id), 8.0).unwrap();
    assert_eq!(hit.part, HitPart::ResizeHandle(ResizeAnchor::E));
}

#[test]
fn selected_handle_beats_element_above() {
    let selected = element_at(100.0, 100.0, 200.0, 100.0);
    let sel_id = selected.id;
    let cover = element_at(250.0, 150.0, 200.0, 100.0);
    let page = Page::new(vec![selected, cover]);
    let hit = hit_test(Point::new(300.0, 200.0), &page, Some(sel_id), 8.0).unwrap();
    assert_eq!(hit, Hit { element_id: sel_id, part: HitPart::ResizeHandle(ResizeAnchor::Se) });
}

#[test]
fn stale_selection_falls_back_to_bodies() {
    let el = element_at(100.0, 100.0, 200.0, 100.0);
    let id = el.id;
    let page = Page::new(vec![el]);
    let hit = hit_test(Point::new(150.0, 150.0), &page, Some(uuid::Uuid::new_v4()), 8.0).unwrap();
    assert_eq!(hit.element_id, id);
}
