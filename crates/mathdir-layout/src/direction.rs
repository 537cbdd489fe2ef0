//! Directional layout pass.
//!
//! Rearranges a glyph tree for a target [`Direction`]:
//!
//! - `SupSub` nodes swap base and script so scripts sit on the visual left
//!   in RTL;
//! - `Radical` nodes are mirrored, with their own text counter-mirrored so
//!   glyphs stay readable;
//! - `OperatorLimits` sub-trees are never touched.
//!
//! Every node carries `transform_state`, so applying a direction twice is a
//! no-op and applying the opposite direction exactly undoes the first pass.

use mathdir_glyph::{Direction, GlyphKind, GlyphNode, GlyphTree};

/// Counts from one layout pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutReport {
    /// Sup-sub nodes whose children were swapped (or swapped back).
    pub swapped: usize,
    /// Radicals whose mirror was applied (or removed).
    pub mirrored: usize,
    /// Sup-sub nodes without exactly two children, left as-is.
    pub malformed: usize,
    /// Operator-limits sub-trees skipped.
    pub limits_skipped: usize,
}

impl LayoutReport {
    /// True when the pass changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.swapped == 0 && self.mirrored == 0
    }
}

/// Rearrange `tree` in place for `direction`.
pub fn apply_direction(tree: &mut GlyphTree, direction: Direction) -> LayoutReport {
    let mut report = LayoutReport::default();
    visit(&mut tree.root, direction, false, &mut report);

    tracing::debug!(
        direction = %direction,
        swapped = report.swapped,
        mirrored = report.mirrored,
        malformed = report.malformed,
        limits_skipped = report.limits_skipped,
        "Applied direction"
    );

    report
}

/// `in_radical`: the nearest enclosing mirrored frame is a radical.
fn visit(node: &mut GlyphNode, direction: Direction, in_radical: bool, report: &mut LayoutReport) {
    match node.kind {
        GlyphKind::OperatorLimits => {
            report.limits_skipped += 1;
        }
        GlyphKind::SupSub => {
            let well_formed = node.children.len() == 2;
            if well_formed {
                arrange_sup_sub(node, direction, in_radical, report);
            } else {
                report.malformed += 1;
                tracing::debug!(children = node.children.len(), "Skipping malformed sup-sub");
            }
            // Compensated children restore an unmirrored frame
            let child_in_radical = in_radical && !well_formed;
            for child in &mut node.children {
                visit(child, direction, child_in_radical, report);
            }
        }
        GlyphKind::Radical => {
            arrange_radical(node, direction, report);
            for child in &mut node.children {
                visit(child, direction, direction.is_rtl(), report);
            }
        }
        GlyphKind::Fraction | GlyphKind::Leaf | GlyphKind::Group => {
            for child in &mut node.children {
                visit(child, direction, in_radical, report);
            }
        }
    }
}

fn arrange_sup_sub(node: &mut GlyphNode, direction: Direction, in_radical: bool, report: &mut LayoutReport) {
    match direction {
        Direction::Rtl if node.transform_state != Some(Direction::Rtl) => {
            node.children.swap(0, 1);
            if in_radical {
                for child in &mut node.children {
                    child.counter_mirrored = true;
                }
            }
            node.transform_state = Some(Direction::Rtl);
            report.swapped += 1;
        }
        Direction::Ltr if node.transform_state == Some(Direction::Rtl) => {
            node.children.swap(0, 1);
            for child in &mut node.children {
                child.counter_mirrored = false;
            }
            node.transform_state = None;
            report.swapped += 1;
        }
        _ => {}
    }
}

fn arrange_radical(node: &mut GlyphNode, direction: Direction, report: &mut LayoutReport) {
    let mirror = match direction {
        Direction::Rtl if node.transform_state != Some(Direction::Rtl) => true,
        Direction::Ltr if node.transform_state == Some(Direction::Rtl) => false,
        _ => return,
    };

    node.mirrored = mirror;
    node.transform_state = mirror.then_some(Direction::Rtl);
    for child in &mut node.children {
        compensate(child, mirror);
    }
    report.mirrored += 1;
}

/// Set counter-mirrors on leaves in the radical's own scope.
///
/// A nested radical is compensated itself but not entered: its own pass
/// handles its contents. Well-formed sup-subs compensate their own children;
/// malformed ones are transparent. Operator limits are never mutated.
fn compensate(node: &mut GlyphNode, on: bool) {
    match node.kind {
        GlyphKind::OperatorLimits => {}
        GlyphKind::SupSub if node.children.len() == 2 => {}
        GlyphKind::Leaf | GlyphKind::Radical => node.counter_mirrored = on,
        GlyphKind::SupSub | GlyphKind::Fraction | GlyphKind::Group => {
            for child in &mut node.children {
                compensate(child, on);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathdir_glyph::{DEFAULT_LIMIT_OPERATORS, GlyphSource, TexSource, force_limits};
    use pretty_assertions::assert_eq;

    fn render(source: &str) -> GlyphTree {
        let source = force_limits(source, DEFAULT_LIMIT_OPERATORS);
        TexSource::new().render(&source).unwrap()
    }

    #[test]
    fn test_superscript_moves_before_base() {
        let mut tree = render("x^{2}");
        let original = tree.clone();

        let report = apply_direction(&mut tree, Direction::Rtl);
        assert_eq!(report.swapped, 1);

        let supsub = &tree.root.children[0];
        assert_eq!(supsub.transform_state, Some(Direction::Rtl));
        assert!(supsub.children[0].has_class("sup"));
        assert_eq!(supsub.children[1].text, "x");

        apply_direction(&mut tree, Direction::Ltr);
        assert_eq!(tree, original);
    }

    #[test]
    fn test_rtl_twice_is_noop() {
        let mut tree = render(r"a^2 + \sqrt{b_1}");
        apply_direction(&mut tree, Direction::Rtl);
        let once = tree.clone();

        let report = apply_direction(&mut tree, Direction::Rtl);
        assert!(report.is_noop());
        assert_eq!(tree, once);
    }

    #[test]
    fn test_ltr_on_fresh_tree_is_noop() {
        let mut tree = render(r"x^2\sqrt{y}");
        let original = tree.clone();
        let report = apply_direction(&mut tree, Direction::Ltr);
        assert!(report.is_noop());
        assert_eq!(tree, original);
    }

    #[test]
    fn test_operator_limits_untouched() {
        let mut tree = render(r"\sum_{i=1}^{n} i^2");
        let limits = tree.find(GlyphKind::OperatorLimits).cloned().unwrap();

        let report = apply_direction(&mut tree, Direction::Rtl);
        assert_eq!(report.limits_skipped, 1);
        assert_eq!(report.swapped, 1);
        assert_eq!(tree.find(GlyphKind::OperatorLimits), Some(&limits));
        assert_eq!(tree.root.children[1].transform_state, Some(Direction::Rtl));
    }

    #[test]
    fn test_nested_scripts_inside_limits_skipped() {
        let mut tree = render(r"\int_{a^2}^{b} x");
        let report = apply_direction(&mut tree, Direction::Rtl);
        assert_eq!(report.swapped, 0);
        assert_eq!(report.limits_skipped, 1);
    }

    #[test]
    fn test_radical_mirror_and_compensation() {
        let mut tree = render(r"\sqrt{x}");
        apply_direction(&mut tree, Direction::Rtl);

        let radical = &tree.root.children[0];
        assert!(radical.mirrored);
        assert!(radical.flip_parity());
        let leaf = &radical.children[0].children[0];
        assert!(leaf.counter_mirrored);
        assert!(leaf.flip_parity());
    }

    #[test]
    fn test_sup_sub_inside_radical_compensated() {
        let mut tree = render(r"\sqrt{x^2}");
        apply_direction(&mut tree, Direction::Rtl);

        let supsub = tree.find(GlyphKind::SupSub).unwrap();
        assert!(supsub.children.iter().all(|c| c.counter_mirrored));
        assert!(!supsub.counter_mirrored);
        // Leaves under the swapped children are outside the radical scope
        let script = &supsub.children[0];
        assert!(script.children.iter().all(|c| !c.counter_mirrored));
    }

    #[test]
    fn test_sup_sub_outside_radical_not_compensated() {
        let mut tree = render("x^2");
        apply_direction(&mut tree, Direction::Rtl);
        let supsub = &tree.root.children[0];
        assert!(supsub.children.iter().all(|c| !c.counter_mirrored));
    }

    #[test]
    fn test_nested_radicals_mirror_independently() {
        let mut tree = render(r"\sqrt{\sqrt{x}}");
        let original = tree.clone();

        let report = apply_direction(&mut tree, Direction::Rtl);
        assert_eq!(report.mirrored, 2);
        let outer = &tree.root.children[0];
        assert!(outer.flip_parity());
        let inner = &outer.children[0].children[0];
        assert_eq!(inner.kind, GlyphKind::Radical);
        assert!(inner.mirrored);
        assert!(inner.counter_mirrored);
        assert!(inner.children[0].children[0].counter_mirrored);

        apply_direction(&mut tree, Direction::Ltr);
        assert_eq!(tree, original);
    }

    #[test]
    fn test_malformed_sup_sub_left_alone() {
        let mut tree = GlyphTree::new(vec![
            GlyphNode::new(GlyphKind::SupSub).with_children(vec![
                GlyphNode::leaf("a", "mord"),
                GlyphNode::leaf("b", "mord"),
                GlyphNode::new(GlyphKind::SupSub).with_children(vec![
                    GlyphNode::leaf("c", "mord"),
                    GlyphNode::leaf("2", "mnum"),
                ]),
            ]),
        ]);

        let report = apply_direction(&mut tree, Direction::Rtl);
        assert_eq!(report.malformed, 1);
        assert_eq!(report.swapped, 1);
        let malformed = &tree.root.children[0];
        assert_eq!(malformed.transform_state, None);
        assert_eq!(malformed.children[0].text, "a");
        assert_eq!(malformed.children[2].children[0].text, "2");
    }

    #[test]
    fn test_malformed_sup_sub_inside_radical_compensated() {
        let malformed = GlyphNode::new(GlyphKind::SupSub).with_children(vec![
            GlyphNode::leaf("a", "mord"),
            GlyphNode::leaf("b", "mord"),
            GlyphNode::leaf("c", "mord"),
        ]);
        let radical =
            GlyphNode::new(GlyphKind::Radical).with_children(vec![GlyphNode::group(vec![malformed])]);
        let mut tree = GlyphTree::new(vec![radical]);
        let original = tree.clone();

        let report = apply_direction(&mut tree, Direction::Rtl);
        assert_eq!(report.malformed, 1);
        let malformed = tree.find(GlyphKind::SupSub).unwrap();
        assert!(!malformed.counter_mirrored);
        assert!(malformed.children.iter().all(|c| c.counter_mirrored));

        apply_direction(&mut tree, Direction::Ltr);
        assert_eq!(tree, original);
    }

    #[test]
    fn test_classes_never_rewritten() {
        let mut tree = render(r"\sqrt[3]{x^2}");
        let mut before = Vec::new();
        tree.root.walk(&mut |n: &GlyphNode| before.push(n.classes.clone()));
        before.sort();

        apply_direction(&mut tree, Direction::Rtl);
        let mut after = Vec::new();
        tree.root.walk(&mut |n: &GlyphNode| after.push(n.classes.clone()));
        after.sort();

        assert_eq!(before, after);
    }
}
