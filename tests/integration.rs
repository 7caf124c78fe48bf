//! Integration tests for anchor-ui.
//!
//! These tests exercise the public API from outside the crate: layout rules,
//! the per-frame event state machine, tree invariants, persistence and the
//! headless testing toolkit working together.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;

use anchor_ui::dom::{Entity, EntityId, EntityTree};
use anchor_ui::event::{EventKind, MouseButton};
use anchor_ui::geometry::{Rect, Vec2};
use anchor_ui::layout::{calc_dest_rect, Anchor, LayoutInput};
use anchor_ui::style::{EntityState, StyleSheet, Theme};
use anchor_ui::testing::{layout_to_string, Pilot};
use anchor_ui::widget::WidgetValue;
use anchor_ui::widgets::*;
use anchor_ui::{UiConfig, UiError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A padding-free panel attached to `parent`.
fn panel(tree: &mut EntityTree, parent: EntityId, anchor: Anchor, size: Vec2, offset: Vec2) -> EntityId {
    let mut entity = Entity::new(anchor, size, offset);
    entity.set_padding(Vec2::ZERO);
    let id = tree.spawn(entity, Panel::new(PanelSkin::Simple));
    tree.add_child(parent, id).unwrap();
    id
}

/// Route `log` output through the test harness; `RUST_LOG=trace` shows dispatch.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn counter() -> (Rc<Cell<u32>>, impl FnMut(&mut EntityTree, EntityId) + 'static) {
    let count = Rc::new(Cell::new(0));
    let inner = Rc::clone(&count);
    (count, move |_: &mut EntityTree, _: EntityId| inner.set(inner.get() + 1))
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

#[test]
fn test_panel_children_scenario() {
    init_logging();
    let mut pilot = Pilot::new(800, 600);
    let root = pilot.ui().root();
    let tree = pilot.tree_mut();
    let parent = panel(tree, root, Anchor::TopLeft, Vec2::new(400.0, 300.0), Vec2::ZERO);
    let first = panel(tree, parent, Anchor::TopLeft, Vec2::new(100.0, 50.0), Vec2::new(10.0, 10.0));
    let second = panel(tree, parent, Anchor::Auto, Vec2::new(0.0, 50.0), Vec2::ZERO);

    assert_eq!(tree.dest_rect(first), Some(Rect::new(10, 10, 100, 50)));
    assert_eq!(tree.dest_rect(second), Some(Rect::new(0, 50, 400, 50)));

    let (downs, on_down) = counter();
    tree.on(first, EventKind::MouseDown, on_down).unwrap();

    pilot.move_to(20.0, 20.0);
    assert_eq!(pilot.tree().entity(first).unwrap().state(), EntityState::MouseHover);
    pilot.press(MouseButton::Left);
    assert_eq!(pilot.tree().entity(first).unwrap().state(), EntityState::MouseDown);
    assert_eq!(downs.get(), 1);

    pilot.idle();
    assert_eq!(downs.get(), 1, "held button does not fire again");
}

// ---------------------------------------------------------------------------
// Layout rules
// ---------------------------------------------------------------------------

#[test]
fn test_layout_is_deterministic() {
    let input = LayoutInput {
        anchor: Anchor::BottomRight,
        offset: Vec2::new(5.0, 7.0),
        size: Vec2::new(0.25, 40.0),
        ..LayoutInput::default()
    };
    let parent = Rect::new(10, 10, 400, 300);
    let a = calc_dest_rect(&input, parent, None);
    let b = calc_dest_rect(&input, parent, None);
    assert_eq!(a, b);
    assert_eq!(a, Rect::new(305, 263, 100, 40));
}

#[test]
fn test_percent_and_absolute_sizes() {
    let mut tree = EntityTree::new(Theme::builtin());
    tree.set_viewport(Rect::new(0, 0, 800, 600));
    let root = tree.root();
    let parent = panel(&mut tree, root, Anchor::TopLeft, Vec2::new(200.0, 200.0), Vec2::ZERO);
    let half = panel(&mut tree, parent, Anchor::TopLeft, Vec2::new(0.5, 10.0), Vec2::ZERO);
    let fixed = panel(&mut tree, parent, Anchor::TopLeft, Vec2::new(150.0, 10.0), Vec2::ZERO);
    let fill = panel(&mut tree, parent, Anchor::TopLeft, Vec2::new(0.0, 10.0), Vec2::ZERO);

    assert_eq!(tree.dest_rect(half).unwrap().width, 100);
    assert_eq!(tree.dest_rect(fixed).unwrap().width, 150);
    assert_eq!(tree.dest_rect(fill).unwrap().width, 200);
}

#[test]
fn test_auto_anchor_stacking() {
    let mut tree = EntityTree::new(Theme::builtin());
    tree.set_viewport(Rect::new(0, 0, 800, 600));
    let root = tree.root();
    let parent = panel(&mut tree, root, Anchor::TopLeft, Vec2::new(400.0, 300.0), Vec2::ZERO);
    let rows: Vec<EntityId> = (0..3)
        .map(|_| panel(&mut tree, parent, Anchor::Auto, Vec2::new(0.0, 40.0), Vec2::ZERO))
        .collect();

    let rects: Vec<Rect> = rows.iter().map(|id| tree.dest_rect(*id).unwrap()).collect();
    assert_eq!(rects[0].y, 0);
    assert_eq!(rects[1].y, rects[0].bottom());
    assert_eq!(rects[2].y, rects[1].bottom());
}

#[test]
fn test_auto_inline_wraps_on_overflow() {
    let mut tree = EntityTree::new(Theme::builtin());
    tree.set_viewport(Rect::new(0, 0, 800, 600));
    let root = tree.root();
    let parent = panel(&mut tree, root, Anchor::TopLeft, Vec2::new(400.0, 300.0), Vec2::ZERO);
    let cells: Vec<EntityId> = (0..3)
        .map(|_| panel(&mut tree, parent, Anchor::AutoInline, Vec2::new(150.0, 40.0), Vec2::ZERO))
        .collect();

    let dump = layout_to_string(&mut tree, parent);
    insta::assert_snapshot!(dump, @r###"
    Panel "" 0,0 400x300
      Panel "" 0,0 150x40
      Panel "" 150,0 150x40
      Panel "" 0,40 150x40
    "###);
    assert_eq!(cells.len(), 3);
}

#[test]
fn test_recompute_bumps_version_once() {
    let mut tree = EntityTree::new(Theme::builtin());
    tree.set_viewport(Rect::new(0, 0, 800, 600));
    let root = tree.root();
    let id = panel(&mut tree, root, Anchor::Center, Vec2::new(100.0, 100.0), Vec2::ZERO);
    tree.update_layout();

    tree.entity_mut(id).unwrap().set_offset(Vec2::new(10.0, 0.0));
    assert!(tree.entity(id).unwrap().is_dirty());
    let before = tree.entity(id).unwrap().layout_version();
    assert!(tree.recompute_if_stale(id));
    assert!(!tree.entity(id).unwrap().is_dirty());
    assert_eq!(tree.entity(id).unwrap().layout_version(), before + 1);

    assert!(!tree.recompute_if_stale(id));
    assert_eq!(tree.entity(id).unwrap().layout_version(), before + 1);
}

#[test]
fn test_auto_height_panel_fits_children() {
    let mut tree = EntityTree::new(Theme::builtin());
    tree.set_viewport(Rect::new(0, 0, 800, 600));
    let root = tree.root();
    let mut entity = Entity::new(Anchor::TopLeft, Vec2::new(300.0, 10.0), Vec2::ZERO);
    entity.set_padding(Vec2::ZERO);
    let parent = tree.spawn(entity, Panel::new(PanelSkin::Default).with_auto_height(true));
    tree.add_child(root, parent).unwrap();
    for _ in 0..2 {
        panel(&mut tree, parent, Anchor::Auto, Vec2::new(0.0, 50.0), Vec2::ZERO);
    }
    tree.update_layout();
    tree.update_layout();
    assert_eq!(tree.dest_rect(parent).unwrap().height, 100 + 4);
}

// ---------------------------------------------------------------------------
// Style sheets
// ---------------------------------------------------------------------------

#[test]
fn test_style_fallback_to_default_state() {
    let mut sheet = StyleSheet::new();
    sheet.set("Scale", 1.0_f32, EntityState::Default);
    let hover = sheet.get("Scale", EntityState::MouseHover, true).copied();
    assert_eq!(hover.and_then(|p| p.as_float()), Some(1.0));
    assert_eq!(sheet.get("Scale", EntityState::MouseHover, false), None);

    sheet.set("Scale", 2.0_f32, EntityState::MouseHover);
    let hover = sheet.get("Scale", EntityState::MouseHover, true).copied();
    assert_eq!(hover.and_then(|p| p.as_float()), Some(2.0));
    let down = sheet.get("Scale", EntityState::MouseDown, true).copied();
    assert_eq!(down.and_then(|p| p.as_float()), Some(1.0));
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[test]
fn test_front_sibling_receives_press() {
    let mut pilot = Pilot::new(800, 600);
    let root = pilot.ui().root();
    let tree = pilot.tree_mut();
    let back = panel(tree, root, Anchor::TopLeft, Vec2::new(200.0, 200.0), Vec2::ZERO);
    let front = panel(tree, root, Anchor::TopLeft, Vec2::new(200.0, 200.0), Vec2::new(100.0, 100.0));
    let (back_downs, on_back) = counter();
    let (front_downs, on_front) = counter();
    tree.on(back, EventKind::MouseDown, on_back).unwrap();
    tree.on(front, EventKind::MouseDown, on_front).unwrap();

    pilot.move_to(150.0, 150.0);
    pilot.press(MouseButton::Left);
    assert_eq!(front_downs.get(), 1);
    assert_eq!(back_downs.get(), 0);
    assert_eq!(pilot.ui().target(), Some(front));
    assert_eq!(pilot.ui().active(), front);
}

#[test]
fn test_button_click_through_label() {
    let mut pilot = Pilot::new(800, 600);
    let root = pilot.ui().root();
    let ok = pilot.ui_mut().spawn(
        Entity::new(Anchor::TopCenter, Vec2::new(200.0, 70.0), Vec2::ZERO),
        Button::new("OK"),
    );
    pilot.tree_mut().add_child(root, ok).unwrap();
    let (clicks, on_click) = counter();
    pilot.tree_mut().on(ok, EventKind::Click, on_click).unwrap();

    pilot.click_at(400.0, 35.0);
    assert_eq!(clicks.get(), 1);
    let surface = pilot.draw();
    assert_eq!(surface.texture_dests("button_default_hover"), vec![Rect::new(300, 0, 200, 70)]);
    assert_eq!(surface.texts(), vec!["OK"]);
}

#[test]
fn test_strict_clicks_need_press_and_release_on_target() {
    let mut pilot = Pilot::new(800, 600);
    let root = pilot.ui().root();
    let tree = pilot.tree_mut();
    let a = panel(tree, root, Anchor::TopLeft, Vec2::new(100.0, 100.0), Vec2::ZERO);
    let (clicks, on_click) = counter();
    tree.on(a, EventKind::Click, on_click).unwrap();

    pilot.move_to(300.0, 300.0);
    pilot.press(MouseButton::Left);
    pilot.move_to(50.0, 50.0);
    pilot.release(MouseButton::Left);
    assert_eq!(clicks.get(), 0);

    pilot.ui_mut().set_promiscuous_clicks(true);
    pilot.move_to(300.0, 300.0);
    pilot.press(MouseButton::Left);
    pilot.move_to(50.0, 50.0);
    pilot.release(MouseButton::Left);
    assert_eq!(clicks.get(), 1);
}

#[test]
fn test_tap_in_one_frame_toggles_checkbox() {
    let mut pilot = Pilot::new(800, 600);
    let root = pilot.ui().root();
    let cb = pilot.ui_mut().spawn(
        Entity::new(Anchor::TopLeft, Vec2::new(300.0, 40.0), Vec2::new(50.0, 50.0)),
        CheckBox::new("Music", false),
    );
    pilot.tree_mut().add_child(root, cb).unwrap();
    let (clicks, on_click) = counter();
    pilot.tree_mut().on(cb, EventKind::Click, on_click).unwrap();

    pilot.tap_at(60.0, 60.0);
    assert_eq!(clicks.get(), 1);
    assert_eq!(pilot.tree().value(cb), Some(WidgetValue::Bool(true)));
    assert_eq!(pilot.ui().active(), cb);
    pilot.idle();
    assert_eq!(clicks.get(), 1);
}

#[test]
fn test_callback_may_clear_siblings_mid_update() {
    init_logging();
    let mut pilot = Pilot::new(800, 600);
    let root = pilot.ui().root();
    let tree = pilot.tree_mut();
    let holder = panel(tree, root, Anchor::TopLeft, Vec2::new(400.0, 400.0), Vec2::ZERO);
    let a = panel(tree, holder, Anchor::TopLeft, Vec2::new(100.0, 100.0), Vec2::ZERO);
    let _b = panel(tree, holder, Anchor::TopLeft, Vec2::new(100.0, 100.0), Vec2::new(200.0, 0.0));
    tree.on(a, EventKind::Click, move |tree, _| tree.clear_children(holder)).unwrap();

    pilot.click_at(50.0, 50.0);
    pilot.idle();
    assert!(pilot.tree().children(holder).is_empty());
}

#[test]
fn test_scroll_panel_wheel() {
    init_logging();
    let mut pilot = Pilot::new(800, 600);
    let root = pilot.ui().root();
    let mut entity = Entity::new(Anchor::TopLeft, Vec2::new(200.0, 100.0), Vec2::ZERO);
    entity.set_padding(Vec2::ZERO);
    let list = pilot
        .tree_mut()
        .spawn(entity, Panel::new(PanelSkin::ListBackground).with_overflow(Overflow::Scroll));
    pilot.tree_mut().add_child(root, list).unwrap();
    for _ in 0..4 {
        panel(pilot.tree_mut(), list, Anchor::Auto, Vec2::new(0.0, 50.0), Vec2::ZERO);
    }

    pilot.move_to(50.0, 50.0);
    pilot.scroll(-2);
    let offset = pilot.tree().widget_as::<Panel>(list).unwrap().scroll().offset;
    assert_eq!(offset, (0, 40));
}

#[test]
fn test_scroll_panel_clips_rows() {
    let mut pilot = Pilot::new(800, 600);
    let root = pilot.ui().root();
    let mut entity = Entity::new(Anchor::TopLeft, Vec2::new(200.0, 100.0), Vec2::new(0.0, 100.0));
    entity.set_padding(Vec2::ZERO);
    let list = pilot
        .tree_mut()
        .spawn(entity, Panel::new(PanelSkin::Simple).with_overflow(Overflow::Scroll));
    pilot.tree_mut().add_child(root, list).unwrap();
    let rows: Vec<_> = (0..4)
        .map(|_| panel(pilot.tree_mut(), list, Anchor::Auto, Vec2::new(0.0, 50.0), Vec2::ZERO))
        .collect();
    let (clicks, on_click) = counter();
    pilot.tree_mut().on(rows[0], EventKind::Click, on_click).unwrap();

    pilot.move_to(10.0, 150.0);
    pilot.scroll(-5);
    pilot.click_at(10.0, 20.0);
    assert_eq!(clicks.get(), 0, "row 0 is scrolled above the list");
    assert_eq!(pilot.ui().target(), None);

    // The list plus the two rows still inside it; rows 0 and 1 are skipped.
    let drawn = pilot.draw().texture_dests("panel_simple");
    assert_eq!(
        drawn,
        vec![Rect::new(0, 100, 200, 100), Rect::new(0, 100, 200, 50), Rect::new(0, 150, 200, 50)]
    );
}

#[test]
fn test_wheel_fires_once_per_notch() {
    let mut pilot = Pilot::new(800, 600);
    let root = pilot.ui().root();
    let tree = pilot.tree_mut();
    let active = panel(tree, root, Anchor::TopLeft, Vec2::new(100.0, 100.0), Vec2::ZERO);
    let target = panel(tree, root, Anchor::TopLeft, Vec2::new(100.0, 100.0), Vec2::new(200.0, 0.0));
    let (active_wheels, on_active) = counter();
    let (target_wheels, on_target) = counter();
    let (global_wheels, on_global) = counter();
    tree.on(active, EventKind::MouseWheel, on_active).unwrap();
    tree.on(target, EventKind::MouseWheel, on_target).unwrap();
    pilot.ui_mut().on_global(EventKind::MouseWheel, on_global);

    pilot.click_at(10.0, 10.0);
    assert_eq!(pilot.ui().active(), active);
    pilot.move_to(210.0, 10.0);
    pilot.scroll(-1);
    assert_eq!((target_wheels.get(), active_wheels.get(), global_wheels.get()), (1, 0, 1));
}

// ---------------------------------------------------------------------------
// Tree integrity
// ---------------------------------------------------------------------------

#[test]
fn test_add_then_remove_restores_children() {
    let mut tree = EntityTree::new(Theme::builtin());
    let root = tree.root();
    let a = panel(&mut tree, root, Anchor::Auto, Vec2::ZERO, Vec2::ZERO);
    let b = panel(&mut tree, root, Anchor::Auto, Vec2::ZERO, Vec2::ZERO);
    let before = tree.children(root).to_vec();

    let extra = tree.spawn(Entity::default(), Paragraph::new("x"));
    tree.insert_child(root, extra, 1).unwrap();
    assert_eq!(tree.index_in_parent(extra), Some(1));
    tree.remove_child(root, extra).unwrap();
    assert_eq!(tree.children(root), before.as_slice());
    assert_eq!(before, vec![a, b]);
    for (i, child) in tree.children(root).iter().enumerate() {
        assert_eq!(tree.index_in_parent(*child), Some(i));
    }
}

#[test]
fn test_soft_errors_follow_policy() {
    let mut strict = Pilot::new(100, 100);
    let root = strict.ui().root();
    let tree = strict.tree_mut();
    let a = panel(tree, root, Anchor::Auto, Vec2::ZERO, Vec2::ZERO);
    assert!(matches!(tree.add_child(root, a), Err(UiError::AlreadyParented)));
    assert!(matches!(tree.get_child(root, "nope"), Err(UiError::NotFound { .. })));

    let mut lenient = Pilot::with_config(UiConfig::new().with_silent_soft_errors(true), 100, 100)
        .unwrap();
    let root = lenient.ui().root();
    let tree = lenient.tree_mut();
    let a = panel(tree, root, Anchor::Auto, Vec2::ZERO, Vec2::ZERO);
    assert!(tree.add_child(root, a).is_ok());
    assert_eq!(tree.get_child(root, "nope").unwrap(), None);
    assert_eq!(tree.children(root), &[a]);
    assert!(matches!(tree.relative_point(a, Vec2::new(-50.0, -50.0)), Err(UiError::PointOutsideEntity { .. })));
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn test_layout_round_trip_keeps_behavior() {
    init_logging();
    let mut pilot = Pilot::new(800, 600);
    let root = pilot.ui().root();
    let menu = pilot.ui_mut().spawn(
        Entity::new(Anchor::TopLeft, Vec2::new(400.0, 0.0), Vec2::ZERO).with_identifier("menu"),
        Panel::new(PanelSkin::Fancy).with_auto_height(true),
    );
    pilot.tree_mut().add_child(root, menu).unwrap();
    let sound = pilot.ui_mut().spawn(
        Entity::default().with_identifier("sound"),
        CheckBox::new("Sound", false),
    );
    pilot.tree_mut().add_child(menu, sound).unwrap();
    let text = pilot.ui().save_layout().unwrap();

    let mut restored = Pilot::new(800, 600);
    restored.ui_mut().load_layout(&text).unwrap();
    let sound = restored.tree().find_by_identifier("sound").unwrap();
    let rect = restored.tree_mut().dest_rect(sound).unwrap();
    let original_sound = pilot.tree().find_by_identifier("sound").unwrap();
    assert_eq!(rect, pilot.tree_mut().dest_rect(original_sound).unwrap());

    let changes = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&changes);
    restored
        .tree_mut()
        .on(sound, EventKind::ValueChange, move |tree, id| seen.borrow_mut().push(tree.value(id)))
        .unwrap();
    restored.click_at((rect.x + 5) as f32, (rect.y + 5) as f32);
    assert_eq!(*changes.borrow(), vec![Some(WidgetValue::Bool(true))]);
}
