//! Separating-axis overlap test for polygon views
//!
//! The tricky part of Map Jump: given two convex [`PolyView`]s, decide
//! whether they overlap and find the minimum translation vector that pushes
//! the first clear of the second. Contact classification in the resolver
//! depends on which face the MTV came from, so the axis of least penetration
//! is tracked with a strict `<` comparison: when two axes tie exactly (a
//! perfect corner hit), the first axis in edge-iteration order wins.

use glam::Vec2;

use super::polygon::PolyView;

/// Result of an overlap test
#[derive(Debug, Clone, Copy, Default)]
pub struct Contact {
    /// Displacement that moves the first argument clear of the second
    pub mtv: Vec2,
    /// World-space separating axis the MTV lies along
    pub normal: Vec2,
    /// Whether the shapes overlap; `mtv`/`normal` are zero when false
    pub collides: bool,
}

impl Contact {
    fn miss() -> Self {
        Self::default()
    }
}

/// Project both views onto each edge normal of `a`, tightening the running
/// minimum overlap. Returns false as soon as a separating axis is found.
fn project_onto(a: &PolyView<'_>, b: &PolyView<'_>, min_overlap: &mut f32, out: &mut Contact) -> bool {
    for edge in 0..a.len() {
        let normal = a.normal(edge);

        let mut a_min = f32::INFINITY;
        let mut a_max = f32::NEG_INFINITY;
        for i in 0..a.len() {
            let d = normal.dot(a.point(i));
            a_min = a_min.min(d);
            a_max = a_max.max(d);
        }

        let mut b_min = f32::INFINITY;
        let mut b_max = f32::NEG_INFINITY;
        for i in 0..b.len() {
            let d = normal.dot(b.point(i));
            b_min = b_min.min(d);
            b_max = b_max.max(d);
        }

        // exact comparison: touching intervals still count as overlapping
        if a_max < b_min || b_max < a_min {
            return false;
        }

        let overlap = (a_max - b_min).min(b_max - a_min);
        if overlap < *min_overlap {
            *min_overlap = overlap;
            out.mtv = normal * overlap;
            out.normal = normal;
        }
    }

    true
}

/// SAT overlap test. On overlap, `mtv` moves `a` out of `b` along the axis
/// of least penetration, oriented away from `b`'s center.
pub fn collide(a: &PolyView<'_>, b: &PolyView<'_>) -> Contact {
    let mut res = Contact {
        collides: true,
        ..Contact::default()
    };
    let mut min_overlap = f32::INFINITY;

    if !project_onto(a, b, &mut min_overlap, &mut res)
        || !project_onto(b, a, &mut min_overlap, &mut res)
    {
        return Contact::miss();
    }

    // the tracked normal can point either way; push a away from b
    let center_diff = b.center() - a.center();
    if res.normal.dot(center_diff) > 0.0 {
        res.mtv = -res.mtv;
        res.normal = -res.normal;
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::polygon::ShapeSet;
    use glam::Vec2;
    use proptest::prelude::*;

    fn square<'p>(shapes: &'p ShapeSet, offset: Vec2, size: f32) -> PolyView<'p> {
        PolyView::new(&shapes.square, offset, Vec2::splat(size), 0.0)
    }

    #[test]
    fn test_disjoint_squares_miss() {
        let shapes = ShapeSet::new();
        let a = square(&shapes, Vec2::ZERO, 10.0);
        let b = square(&shapes, Vec2::new(20.0, 0.0), 10.0);
        let c = collide(&a, &b);
        assert!(!c.collides);
        assert_eq!(c.mtv, Vec2::ZERO);
    }

    #[test]
    fn test_overlap_pushes_along_least_penetration() {
        let shapes = ShapeSet::new();
        // a overlaps b's left side by 2 units, vertical overlap is 10
        let a = square(&shapes, Vec2::ZERO, 10.0);
        let b = square(&shapes, Vec2::new(8.0, 0.0), 10.0);
        let c = collide(&a, &b);
        assert!(c.collides);
        assert!((c.mtv - Vec2::new(-2.0, 0.0)).length() < 1e-4);
        assert!((c.normal - Vec2::new(-1.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_mtv_points_away_from_second_center() {
        let shapes = ShapeSet::new();
        // a sits above b, overlapping 3 units vertically
        let a = square(&shapes, Vec2::new(0.0, 7.0), 10.0);
        let b = square(&shapes, Vec2::ZERO, 10.0);
        let c = collide(&a, &b);
        assert!(c.collides);
        assert!((c.mtv - Vec2::new(0.0, 3.0)).length() < 1e-4);
    }

    #[test]
    fn test_exact_touch_counts_as_contact() {
        let shapes = ShapeSet::new();
        // b's left face exactly on a's right face
        let a = square(&shapes, Vec2::ZERO, 10.0);
        let b = square(&shapes, Vec2::new(10.0, 0.0), 10.0);
        let c = collide(&a, &b);
        assert!(c.collides);
        assert!(c.mtv.length() < 1e-6);
    }

    #[test]
    fn test_corner_tie_keeps_first_axis() {
        let shapes = ShapeSet::new();
        // perfectly diagonal corner overlap: both axes overlap by 0.1,
        // so the first minimum found (a's bottom edge axis) must win
        let a = square(&shapes, Vec2::ZERO, 1.0);
        let b = square(&shapes, Vec2::new(0.9, 0.9), 1.0);
        let c = collide(&a, &b);
        assert!(c.collides);
        assert!((c.normal - Vec2::new(0.0, -1.0)).length() < 1e-6);
        assert!((c.mtv - Vec2::new(0.0, -0.1)).length() < 1e-4);
    }

    #[test]
    fn test_triangle_square_overlap() {
        let shapes = ShapeSet::new();
        let spike = PolyView::new(
            &shapes.triangle,
            Vec2::new(0.0, 0.0),
            Vec2::new(64.0, 32.0),
            0.0,
        );
        // square dropped onto the spike tip
        let a = square(&shapes, Vec2::new(12.0, 30.0), 40.0);
        let c = collide(&a, &spike);
        assert!(c.collides);
        // pushed up and out, away from the triangle
        assert!(c.mtv.y > 0.0);
        let moved = PolyView {
            offset: a.offset + c.mtv,
            ..a
        };
        let after = collide(&moved, &spike);
        assert!(!after.collides || after.mtv.length() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_sat_symmetry(
            ax in -50.0f32..50.0,
            ay in -50.0f32..50.0,
            bx in -50.0f32..50.0,
            by in -50.0f32..50.0,
            asz in 5.0f32..40.0,
            bsz in 5.0f32..40.0,
        ) {
            let shapes = ShapeSet::new();
            let a = square(&shapes, Vec2::new(ax, ay), asz);
            let b = square(&shapes, Vec2::new(bx, by), bsz);
            // coincident centers leave the MTV orientation undefined
            prop_assume!(a.center() != b.center());
            let ab = collide(&a, &b);
            let ba = collide(&b, &a);
            prop_assert_eq!(ab.collides, ba.collides);
            if ab.collides {
                prop_assert!((ab.mtv + ba.mtv).length() < 1e-3);
            }
        }

        #[test]
        fn prop_separation_idempotence(
            ax in -20.0f32..20.0,
            ay in -20.0f32..20.0,
            sz in 5.0f32..40.0,
        ) {
            let shapes = ShapeSet::new();
            let a = square(&shapes, Vec2::new(ax, ay), sz);
            let b = square(&shapes, Vec2::ZERO, 30.0);
            let c = collide(&a, &b);
            if c.collides {
                let moved = PolyView { offset: a.offset + c.mtv, ..a };
                let after = collide(&moved, &b);
                prop_assert!(!after.collides || after.mtv.length() < 1e-3);
            }
        }
    }
}
