//! Shared convex polygons and their affine views
//!
//! A [`Polygon`] is an immutable counter-clockwise point list built once at
//! startup; every block and the player hold a [`PolyView`] that borrows one
//! of the shared shapes and applies its own offset/scale/rotation. Normals
//! are derived from world-space edges on every query so a view can be moved
//! or rotated freely between queries.

use glam::Vec2;

use crate::rotate_vec;

/// An immutable convex outline in local space, counter-clockwise
#[derive(Debug, Clone)]
pub struct Polygon {
    points: Vec<Vec2>,
    centroid: Vec2,
}

impl Polygon {
    /// Build from a CCW point list. Degenerate inputs (fewer than 3 points,
    /// zero-length edges) are rejected upstream by level construction.
    pub fn new(points: Vec<Vec2>) -> Self {
        debug_assert!(points.len() >= 3);
        let centroid = points.iter().sum::<Vec2>() / points.len() as f32;
        Self { points, centroid }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn point(&self, i: usize) -> Vec2 {
        self.points[i]
    }

    /// Arithmetic mean of the points
    #[inline]
    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

/// The shape registry: one square and one triangle shared by every view.
///
/// Owned by the caller and passed into level/player construction, so the
/// "construct once, share by reference" lifecycle is explicit.
#[derive(Debug)]
pub struct ShapeSet {
    pub square: Polygon,
    pub triangle: Polygon,
}

impl ShapeSet {
    /// Unit shapes with the local origin at the lower-left corner
    pub fn new() -> Self {
        Self {
            square: Polygon::new(vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ]),
            triangle: Polygon::new(vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.5, 1.0),
            ]),
        }
    }
}

impl Default for ShapeSet {
    fn default() -> Self {
        Self::new()
    }
}

/// A non-owning affine view of a shared [`Polygon`]:
/// scale, then rotate by `angle`, then translate to `offset`.
#[derive(Debug, Clone, Copy)]
pub struct PolyView<'p> {
    pub poly: &'p Polygon,
    pub offset: Vec2,
    pub scale: Vec2,
    pub angle: f32,
}

impl<'p> PolyView<'p> {
    pub fn new(poly: &'p Polygon, offset: Vec2, scale: Vec2, angle: f32) -> Self {
        Self {
            poly,
            offset,
            scale,
            angle,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.poly.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.poly.is_empty()
    }

    /// Map a local-space point to world space
    #[inline]
    pub fn transform(&self, pt: Vec2) -> Vec2 {
        rotate_vec(pt * self.scale, self.angle) + self.offset
    }

    /// World-space vertex `i`
    #[inline]
    pub fn point(&self, i: usize) -> Vec2 {
        self.transform(self.poly.point(i))
    }

    /// Outward unit normal of the world-space edge from vertex `i` to `i+1`.
    /// Computed as `(dy, -dx)` normalized; outward-ness relies on the source
    /// polygon's CCW ordering. Never cached.
    #[inline]
    pub fn normal(&self, i: usize) -> Vec2 {
        let first = self.point(i);
        let second = self.point((i + 1) % self.poly.len());
        let d = second - first;
        Vec2::new(d.y, -d.x).normalize()
    }

    /// World-space centroid
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.transform(self.poly.centroid())
    }

    /// World-space bounding extents over all transformed points.
    /// Valid for rotated views (spikes), unlike `offset ± scale`.
    pub fn aabb(&self) -> (Vec2, Vec2) {
        let mut min = self.point(0);
        let mut max = min;
        for i in 1..self.poly.len() {
            let p = self.point(i);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }
}
