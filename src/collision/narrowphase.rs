use glam::Vec3;

use super::{
    clipping::{clip_polygon, rectangle_planes},
    contact::{CollisionManifold, ContactPoints},
};
use crate::{
    core::shape::{Shape, ShapeKind},
    error::PhysicsResult,
    utils::math::closest_points_on_segments,
};

/// Exact test for one ordered pair of variants. Writes `manifold` only on overlap.
pub type PairTest = fn(&Shape, &Shape, &mut CollisionManifold) -> PhysicsResult<bool>;

/// Narrow-phase dispatcher keyed by `(variant, variant)`.
///
/// Adding a shape kind means adding a row and a column here; the detectors
/// themselves never branch on shape type.
pub struct NarrowPhase;

impl NarrowPhase {
    const PAIR_TESTS: [[Option<PairTest>; ShapeKind::COUNT]; ShapeKind::COUNT] = [
        // Box
        [Some(SatBoxBox::detect as PairTest), None],
        // Sphere
        [None, None],
    ];

    pub fn pair_test(a: &ShapeKind, b: &ShapeKind) -> Option<PairTest> {
        Self::PAIR_TESTS[a.table_index()][b.table_index()]
    }

    /// Returns `Ok(true)` and fills `manifold` when the shapes overlap.
    ///
    /// Unsupported pairs and noclip shapes report no overlap.
    pub fn detect(a: &Shape, b: &Shape, manifold: &mut CollisionManifold) -> PhysicsResult<bool> {
        if a.noclip || b.noclip {
            return Ok(false);
        }
        match Self::pair_test(&a.kind, &b.kind) {
            Some(test) => test(a, b, manifold),
            None => Ok(false),
        }
    }
}

/// Which feature produced the minimum-overlap axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feature {
    FaceA(usize),
    FaceB(usize),
    Edge(usize, usize),
}

/// Separating axis test between two oriented boxes, with clipped contact points.
pub struct SatBoxBox;

impl SatBoxBox {
    /// Squared length under which an edge cross product counts as parallel.
    const PARALLEL_EPSILON: f32 = 1e-6;
    /// Edge axes must beat the best face axis by this factor to be chosen.
    const EDGE_RELATIVE_TOLERANCE: f32 = 0.95;
    const EDGE_ABSOLUTE_TOLERANCE: f32 = 1e-3;
    /// Clipped points up to this far above the reference face still count.
    const CONTACT_TOLERANCE: f32 = 1e-3;

    pub fn detect(a: &Shape, b: &Shape, manifold: &mut CollisionManifold) -> PhysicsResult<bool> {
        let (ShapeKind::Box { half_extents: half_a }, ShapeKind::Box { half_extents: half_b }) =
            (a.kind, b.kind)
        else {
            return Ok(false);
        };

        let axes_a = a.axes();
        let axes_b = b.axes();
        let half_a = half_a.to_array();
        let half_b = half_b.to_array();
        let t = b.center - a.center;

        let mut min_overlap = f32::MAX;
        let mut min_axis = Vec3::ZERO;
        let mut feature = Feature::FaceA(0);

        for (i, axis) in axes_a.iter().enumerate() {
            let Some(overlap) = Self::overlap_on_axis(*axis, &axes_a, &half_a, &axes_b, &half_b, t)
            else {
                return Ok(false);
            };
            if overlap < min_overlap {
                min_overlap = overlap;
                min_axis = *axis;
                feature = Feature::FaceA(i);
            }
        }

        for (j, axis) in axes_b.iter().enumerate() {
            let Some(overlap) = Self::overlap_on_axis(*axis, &axes_a, &half_a, &axes_b, &half_b, t)
            else {
                return Ok(false);
            };
            if overlap < min_overlap {
                min_overlap = overlap;
                min_axis = *axis;
                feature = Feature::FaceB(j);
            }
        }

        let best_face_overlap = min_overlap;
        for i in 0..3 {
            for j in 0..3 {
                let cross = axes_a[i].cross(axes_b[j]);
                if cross.length_squared() < Self::PARALLEL_EPSILON {
                    continue;
                }
                let axis = cross.normalize();
                let Some(overlap) = Self::overlap_on_axis(axis, &axes_a, &half_a, &axes_b, &half_b, t)
                else {
                    return Ok(false);
                };
                let preferred = best_face_overlap * Self::EDGE_RELATIVE_TOLERANCE
                    - Self::EDGE_ABSOLUTE_TOLERANCE;
                if overlap < min_overlap && overlap < preferred {
                    min_overlap = overlap;
                    min_axis = axis;
                    feature = Feature::Edge(i, j);
                }
            }
        }

        let normal = if min_axis.dot(t) < 0.0 { -min_axis } else { min_axis };

        let mut points = match feature {
            Feature::FaceA(i) => Self::face_contacts(
                a.center, &axes_a, &half_a, i, normal, b.center, &axes_b, &half_b,
            )?,
            Feature::FaceB(j) => Self::face_contacts(
                b.center, &axes_b, &half_b, j, -normal, a.center, &axes_a, &half_a,
            )?,
            Feature::Edge(i, j) => {
                let point = Self::edge_contact(a.center, &axes_a, &half_a, i, b.center, &axes_b, &half_b, j, normal);
                ContactPoints::from_slice(&[point])?
            }
        };

        if points.is_empty() {
            let reach_a = Self::projected_extent(normal, &axes_a, &half_a);
            points.try_push(a.center + normal * (reach_a - min_overlap * 0.5))?;
        }

        manifold.clear();
        manifold.depth = min_overlap;
        manifold.normal = normal;
        for point in points.iter() {
            manifold.add_contact_point(*point)?;
        }
        Ok(true)
    }

    fn projected_extent(axis: Vec3, axes: &[Vec3; 3], half: &[f32; 3]) -> f32 {
        axes.iter()
            .zip(half.iter())
            .map(|(local, h)| local.dot(axis).abs() * h)
            .sum()
    }

    /// `Some(overlap)` when the projections overlap on `axis`, `None` when it separates.
    fn overlap_on_axis(
        axis: Vec3,
        axes_a: &[Vec3; 3],
        half_a: &[f32; 3],
        axes_b: &[Vec3; 3],
        half_b: &[f32; 3],
        t: Vec3,
    ) -> Option<f32> {
        let extent_a = Self::projected_extent(axis, axes_a, half_a);
        let extent_b = Self::projected_extent(axis, axes_b, half_b);
        let overlap = extent_a + extent_b - t.dot(axis).abs();
        (overlap > 0.0).then_some(overlap)
    }

    /// Clips the incident face against the side planes of the reference face.
    ///
    /// `ref_normal` points out of the reference box toward the incident box.
    #[allow(clippy::too_many_arguments)]
    fn face_contacts(
        ref_center: Vec3,
        ref_axes: &[Vec3; 3],
        ref_half: &[f32; 3],
        ref_index: usize,
        ref_normal: Vec3,
        inc_center: Vec3,
        inc_axes: &[Vec3; 3],
        inc_half: &[f32; 3],
    ) -> PhysicsResult<ContactPoints> {
        let face_center = ref_center + ref_normal * ref_half[ref_index];
        let u = (ref_index + 1) % 3;
        let v = (ref_index + 2) % 3;
        let planes = rectangle_planes(face_center, ref_axes[u], ref_axes[v], ref_half[u], ref_half[v]);

        let mut inc_index = 0;
        let mut best_alignment = f32::MIN;
        for (k, axis) in inc_axes.iter().enumerate() {
            let alignment = axis.dot(ref_normal).abs();
            if alignment > best_alignment {
                best_alignment = alignment;
                inc_index = k;
            }
        }
        let inc_normal = -inc_axes[inc_index] * inc_axes[inc_index].dot(ref_normal).signum();
        let inc_face = inc_center + inc_normal * inc_half[inc_index];
        let iu = (inc_index + 1) % 3;
        let iv = (inc_index + 2) % 3;
        let du = inc_axes[iu] * inc_half[iu];
        let dv = inc_axes[iv] * inc_half[iv];
        let quad = ContactPoints::from_slice(&[
            inc_face + du + dv,
            inc_face - du + dv,
            inc_face - du - dv,
            inc_face + du - dv,
        ])?;

        let clipped = clip_polygon(&quad, &planes)?;
        let mut contacts = ContactPoints::new();
        for point in clipped.iter() {
            let separation = ref_normal.dot(*point - face_center);
            if separation <= Self::CONTACT_TOLERANCE {
                contacts.try_push(*point - ref_normal * (separation * 0.5))?;
            }
        }
        Ok(contacts)
    }

    /// Midpoint of the closest points between the two crossing edges.
    #[allow(clippy::too_many_arguments)]
    fn edge_contact(
        center_a: Vec3,
        axes_a: &[Vec3; 3],
        half_a: &[f32; 3],
        edge_a: usize,
        center_b: Vec3,
        axes_b: &[Vec3; 3],
        half_b: &[f32; 3],
        edge_b: usize,
        normal: Vec3,
    ) -> Vec3 {
        let support_edge = |center: Vec3, axes: &[Vec3; 3], half: &[f32; 3], edge: usize, dir: Vec3| {
            let mut mid = center;
            for k in 0..3 {
                if k != edge {
                    let sign = if axes[k].dot(dir) >= 0.0 { 1.0 } else { -1.0 };
                    mid += axes[k] * half[k] * sign;
                }
            }
            let reach = axes[edge] * half[edge];
            (mid - reach, mid + reach)
        };

        let (p1, q1) = support_edge(center_a, axes_a, half_a, edge_a, normal);
        let (p2, q2) = support_edge(center_b, axes_b, half_b, edge_b, -normal);
        let (on_a, on_b) = closest_points_on_segments(p1, q1, p2, q2);
        (on_a + on_b) * 0.5
    }
}
