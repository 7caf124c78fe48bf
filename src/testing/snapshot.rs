//! Snapshot helpers.
//!
//! [`layout_to_string`] dumps a subtree's resolved destination rectangles as
//! indented plain text, one entity per line, for `insta` snapshot assertions.

use std::fmt::Write;

use crate::dom::node::EntityId;
use crate::dom::tree::EntityTree;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render the layout of `id` and its descendants.
///
/// Each line reads `Kind "identifier" x,y wxh`, indented two spaces per depth.
/// Entities whose own visibility flag is off are suffixed with `hidden`.
/// Layout is brought up to date first.
///
/// # Examples
///
/// ```ignore
/// let dump = layout_to_string(&mut tree, tree.root());
/// insta::assert_snapshot!(dump, @r###"
/// Panel "root" 0,0 800x600
/// "###);
/// ```
pub fn layout_to_string(tree: &mut EntityTree, id: EntityId) -> String {
    tree.update_layout();
    let mut out = String::new();
    write_entity(tree, id, 0, &mut out);
    // Drop the trailing newline.
    out.pop();
    out
}

fn write_entity(tree: &mut EntityTree, id: EntityId, depth: usize, out: &mut String) {
    let Some(rect) = tree.dest_rect(id) else {
        return;
    };
    let kind = tree.widget(id).map_or("?", |w| w.widget_type());
    let (identifier, visible) = tree
        .entity(id)
        .map_or((String::new(), false), |e| (e.identifier.clone(), e.is_visible()));

    let _ = write!(
        out,
        "{:indent$}{kind} \"{identifier}\" {},{} {}x{}",
        "",
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        indent = depth * 2
    );
    if !visible {
        out.push_str(" hidden");
    }
    out.push('\n');

    for child in tree.children(id).to_vec() {
        write_entity(tree, child, depth + 1, out);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::Entity;
    use crate::geometry::{Rect, Vec2};
    use crate::layout::anchor::Anchor;
    use crate::style::theme::Theme;
    use crate::widgets::panel::{Panel, PanelSkin};

    fn sample() -> (EntityTree, EntityId) {
        let mut tree = EntityTree::new(Theme::builtin());
        tree.set_viewport(Rect::new(0, 0, 800, 600));
        let mut boxed = Entity::new(Anchor::TopLeft, Vec2::new(200.0, 100.0), Vec2::new(10.0, 20.0))
            .with_identifier("box");
        boxed.set_padding(Vec2::ZERO);
        let panel = tree.spawn(boxed, Panel::new(PanelSkin::Simple));
        tree.add_child(tree.root(), panel).unwrap();
        for name in ["a", "b"] {
            let row = tree.spawn(
                Entity::new(Anchor::Auto, Vec2::new(0.0, 40.0), Vec2::ZERO).with_identifier(name),
                Panel::new(PanelSkin::None),
            );
            tree.add_child(panel, row).unwrap();
        }
        (tree, panel)
    }

    #[test]
    fn dumps_nested_rects() {
        let (mut tree, _) = sample();
        let root = tree.root();
        insta::assert_snapshot!(layout_to_string(&mut tree, root), @r###"
        Panel "root" 0,0 800x600
          Panel "box" 10,20 200x100
            Panel "a" 10,20 200x40
            Panel "b" 10,60 200x40
        "###);
    }

    #[test]
    fn marks_hidden_entities() {
        let (mut tree, panel) = sample();
        let b = tree.children(panel)[1];
        tree.set_visible(b, false);
        let dump = layout_to_string(&mut tree, panel);
        assert_eq!(dump.lines().last(), Some("  Panel \"b\" 10,60 200x40 hidden"));
    }
}
