#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::doc::{Item, LinearGradient, Paint, RadialGradient, Stop};

// =============================================================
// Helpers
// =============================================================

fn two_stops() -> Vec<Stop> {
    vec![Stop::new(0.0, "#000000"), Stop::new(1.0, "#ffffff")]
}

fn radial_fill_item(label: &str) -> Item {
    Item {
        id: Uuid::new_v4(),
        x: 0.0,
        y: 0.0,
        width: 10.0,
        height: 10.0,
        fill: Paint::Radial(RadialGradient {
            center: Point::new(5.0, 5.0),
            focus: None,
            radius1: 3.0,
            radius2: 3.0,
            stops: two_stops(),
        }),
        stroke: Paint::None,
        props: json!({ "label": label }),
        version: 1,
    }
}

fn linear_fill_item() -> Item {
    Item {
        id: Uuid::new_v4(),
        x: 0.0,
        y: 0.0,
        width: 10.0,
        height: 10.0,
        fill: Paint::Linear(LinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 0.0),
            stops: two_stops(),
        }),
        stroke: Paint::None,
        props: json!({}),
        version: 1,
    }
}

fn d(item: ItemId, role: PointRole, channel: Channel) -> Draggable {
    Draggable::new(item, role, 0, channel)
}

// =============================================================
// Construction, membership
// =============================================================

#[test]
fn new_dragger_carries_one_draggable() {
    let mut doc = DocStore::new();
    let item = linear_fill_item();
    let id = item.id;
    doc.insert(item);
    let dragger = Dragger::new(
        Point::new(0.0, 0.0),
        d(id, PointRole::LinearStart, Channel::Fill),
        &doc,
    );
    assert_eq!(dragger.draggables().len(), 1);
    assert_eq!(dragger.position, dragger.original_position);
    assert!(dragger.has_role(PointRole::LinearStart));
    assert!(dragger.has_point(&id, PointRole::LinearStart, 0, Channel::Fill));
    assert!(!dragger.has_point(&id, PointRole::LinearStart, 0, Channel::Stroke));
}

#[test]
fn add_draggable_prepends() {
    let mut doc = DocStore::new();
    let a = linear_fill_item();
    let b = linear_fill_item();
    let (ida, idb) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    let mut dragger = Dragger::new(
        Point::new(0.0, 0.0),
        d(ida, PointRole::LinearStart, Channel::Fill),
        &doc,
    );
    dragger.add_draggable(d(idb, PointRole::LinearEnd, Channel::Fill), &doc);
    assert_eq!(dragger.draggables()[0].item, idb);
    assert_eq!(dragger.draggables()[1].item, ida);
}

#[test]
fn split_rest_keeps_the_first() {
    let mut doc = DocStore::new();
    let a = linear_fill_item();
    let b = linear_fill_item();
    let (ida, idb) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    let mut dragger = Dragger::new(
        Point::new(0.0, 0.0),
        d(ida, PointRole::LinearStart, Channel::Fill),
        &doc,
    );
    dragger.add_draggable(d(idb, PointRole::LinearEnd, Channel::Fill), &doc);
    let rest = dragger.split_rest(&doc);
    assert_eq!(dragger.draggables().len(), 1);
    assert_eq!(dragger.draggables()[0].item, idb);
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].item, ida);
}

// =============================================================
// Merge compatibility across draggers
// =============================================================

#[test]
fn draggers_of_different_items_may_merge() {
    let mut doc = DocStore::new();
    let a = linear_fill_item();
    let b = linear_fill_item();
    let (ida, idb) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    let da = Dragger::new(Point::new(0.0, 0.0), d(ida, PointRole::LinearStart, Channel::Fill), &doc);
    let db = Dragger::new(Point::new(0.0, 0.0), d(idb, PointRole::LinearEnd, Channel::Fill), &doc);
    assert!(da.may_merge(&db));
    assert!(db.may_merge(&da));
}

#[test]
fn merge_fails_if_any_pair_is_incompatible() {
    let mut doc = DocStore::new();
    let a = linear_fill_item();
    let b = linear_fill_item();
    let (ida, idb) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    // One dragger holds points of both items.
    let mut da = Dragger::new(Point::new(0.0, 0.0), d(ida, PointRole::LinearStart, Channel::Fill), &doc);
    da.add_draggable(d(idb, PointRole::LinearStart, Channel::Fill), &doc);
    // The other holds the end of item b: b-start vs b-end is incompatible.
    let db = Dragger::new(Point::new(0.0, 0.0), d(idb, PointRole::LinearEnd, Channel::Fill), &doc);
    assert!(!da.may_merge(&db));
}

#[test]
fn merge_joins_focus_detects_center_focus_pairs() {
    let mut doc = DocStore::new();
    let item = radial_fill_item("r");
    let id = item.id;
    doc.insert(item);
    let center = Dragger::new(Point::new(5.0, 5.0), d(id, PointRole::RadialCenter, Channel::Fill), &doc);
    let focus = Dragger::new(Point::new(5.0, 5.0), d(id, PointRole::RadialFocus, Channel::Fill), &doc);
    assert!(center.merge_joins_focus(&focus));
    assert!(focus.merge_joins_focus(&center));
    let r1 = Dragger::new(Point::new(8.0, 5.0), d(id, PointRole::RadialRadius1, Channel::Fill), &doc);
    assert!(!center.merge_joins_focus(&r1));
}

// =============================================================
// fire_draggables
// =============================================================

#[test]
fn fire_writes_position_for_all_draggables() {
    let mut doc = DocStore::new();
    let a = linear_fill_item();
    let b = linear_fill_item();
    let (ida, idb) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    let mut dragger = Dragger::new(Point::new(0.0, 0.0), d(ida, PointRole::LinearStart, Channel::Fill), &doc);
    dragger.add_draggable(d(idb, PointRole::LinearEnd, Channel::Fill), &doc);
    dragger.position = Point::new(3.0, 4.0);
    dragger.fire_draggables(&mut doc, false, false, false);
    assert_eq!(
        doc.get_coord(&ida, PointRole::LinearStart, 0, Channel::Fill),
        Some(Point::new(3.0, 4.0))
    );
    assert_eq!(
        doc.get_coord(&idb, PointRole::LinearEnd, 0, Channel::Fill),
        Some(Point::new(3.0, 4.0))
    );
}

#[test]
fn fire_skips_snapped_focus() {
    let mut doc = DocStore::new();
    let item = radial_fill_item("r");
    let id = item.id;
    doc.insert(item);
    let mut dragger = Dragger::new(Point::new(5.0, 5.0), d(id, PointRole::RadialFocus, Channel::Fill), &doc);
    dragger.position = Point::new(9.0, 5.0);
    // Snapped focus must not escape during an unrelated edit.
    dragger.fire_draggables(&mut doc, false, false, false);
    assert!(doc.focus_snapped(&id, Channel::Fill));
    // Unless the write is the merge that joins focus and center.
    dragger.fire_draggables(&mut doc, false, false, true);
    assert!(!doc.focus_snapped(&id, Channel::Fill));
}

#[test]
fn fire_with_write_bumps_versions() {
    let mut doc = DocStore::new();
    let item = linear_fill_item();
    let id = item.id;
    doc.insert(item);
    let mut dragger = Dragger::new(Point::new(0.0, 0.0), d(id, PointRole::LinearStart, Channel::Fill), &doc);
    dragger.position = Point::new(1.0, 1.0);
    dragger.fire_draggables(&mut doc, true, false, false);
    assert_eq!(doc.get(&id).map(|i| i.version), Some(2));
}

// =============================================================
// Tips, touched items
// =============================================================

#[test]
fn tip_names_single_point() {
    let mut doc = DocStore::new();
    let item = radial_fill_item("my circle");
    let id = item.id;
    doc.insert(item);
    let dragger = Dragger::new(Point::new(5.0, 5.0), d(id, PointRole::RadialCenter, Channel::Fill), &doc);
    assert_eq!(dragger.tip(), "Drag gradient point center of my circle");
}

#[test]
fn tip_counts_shared_points() {
    let mut doc = DocStore::new();
    let a = linear_fill_item();
    let b = linear_fill_item();
    let (ida, idb) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    let mut dragger = Dragger::new(Point::new(0.0, 0.0), d(ida, PointRole::LinearStart, Channel::Fill), &doc);
    dragger.add_draggable(d(idb, PointRole::LinearStart, Channel::Fill), &doc);
    assert_eq!(dragger.tip(), "Drag gradient point shared by 2 gradients");
}

#[test]
fn touched_items_deduplicates() {
    let mut doc = DocStore::new();
    let item = radial_fill_item("r");
    let id = item.id;
    doc.insert(item);
    let mut dragger = Dragger::new(Point::new(5.0, 5.0), d(id, PointRole::RadialCenter, Channel::Fill), &doc);
    dragger.add_draggable(d(id, PointRole::RadialFocus, Channel::Fill), &doc);
    assert_eq!(dragger.touched_items(), vec![id]);
}
