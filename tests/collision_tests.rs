use approx::assert_abs_diff_eq;
use boxdrop::{
    config::MAX_COLLISION_CONTACTS, BroadPhase, CollisionManifold, NarrowPhase, PhysicsError,
    Quat, SatBoxBox, Shape, Vec3,
};

/// Small deterministic generator so every run sees the same configurations.
struct Lcg(u64);

impl Lcg {
    fn next_f32(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 40) as f32) / ((1u64 << 24) as f32)
    }

    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    fn vec3(&mut self, lo: f32, hi: f32) -> Vec3 {
        Vec3::new(self.range(lo, hi), self.range(lo, hi), self.range(lo, hi))
    }

    fn rotation(&mut self) -> Quat {
        let axis = self.vec3(-1.0, 1.0).try_normalize().unwrap_or(Vec3::Y);
        Quat::from_axis_angle(axis, self.range(0.0, std::f32::consts::TAU))
    }
}

fn random_box(rng: &mut Lcg) -> Shape {
    Shape::new_box(1.0, rng.vec3(0.2, 1.5))
        .with_center(rng.vec3(-2.0, 2.0))
        .with_orientation(rng.rotation())
}

#[test]
fn overlapping_unit_boxes_report_face_contact() {
    let a = Shape::new_box(1.0, Vec3::ONE);
    let b = Shape::new_box(1.0, Vec3::ONE).with_center(Vec3::new(1.5, 0.0, 0.0));
    let mut manifold = CollisionManifold::new();

    assert!(NarrowPhase::detect(&a, &b, &mut manifold).unwrap());

    assert_abs_diff_eq!(manifold.depth, 0.5, epsilon = 1e-5);
    assert_abs_diff_eq!(manifold.normal.x.abs(), 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(manifold.normal.y, 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(manifold.normal.z, 0.0, epsilon = 1e-5);
    assert!((1..=MAX_COLLISION_CONTACTS).contains(&manifold.num_points()));
}

#[test]
fn separated_boxes_leave_manifold_untouched() {
    let a = Shape::new_box(1.0, Vec3::splat(0.5));
    let b = Shape::new_box(1.0, Vec3::splat(0.5)).with_center(Vec3::new(3.0, 0.0, 0.0));
    let mut manifold = CollisionManifold::new();
    manifold.depth = 42.0;

    assert!(!SatBoxBox::detect(&a, &b, &mut manifold).unwrap());
    assert_eq!(manifold.depth, 42.0);
    assert_eq!(manifold.num_points(), 0);
}

#[test]
fn broad_phase_never_rejects_an_exact_overlap() {
    let mut rng = Lcg(0x5eed);
    let mut manifold = CollisionManifold::new();
    let mut overlaps = 0;

    for _ in 0..500 {
        let a = random_box(&mut rng);
        let b = random_box(&mut rng);
        if NarrowPhase::detect(&a, &b, &mut manifold).unwrap() {
            overlaps += 1;
            assert!(BroadPhase::test(&a, &b), "broad-phase rejected {a:?} vs {b:?}");
        }
    }
    assert!(overlaps > 0);
}

#[test]
fn detected_overlaps_are_well_formed() {
    let mut rng = Lcg(0xb0c5);
    let mut manifold = CollisionManifold::new();

    for _ in 0..500 {
        let a = random_box(&mut rng);
        let b = random_box(&mut rng);
        let detected: Result<bool, PhysicsError> = NarrowPhase::detect(&a, &b, &mut manifold);
        if detected.unwrap() {
            assert!(manifold.depth >= 0.0);
            assert_abs_diff_eq!(manifold.normal.length(), 1.0, epsilon = 1e-4);
            assert!((1..=MAX_COLLISION_CONTACTS).contains(&manifold.num_points()));
            // Normal points from a toward b.
            assert!(manifold.normal.dot(b.center - a.center) >= -1e-3);
        }
    }
}

#[test]
fn swapping_the_pair_flips_the_normal() {
    let a = Shape::new_box(1.0, Vec3::ONE);
    let b = Shape::new_box(1.0, Vec3::ONE)
        .with_center(Vec3::new(0.3, 1.6, -0.2))
        .with_orientation(Quat::from_rotation_y(0.4));
    let mut forward = CollisionManifold::new();
    let mut backward = CollisionManifold::new();

    assert!(NarrowPhase::detect(&a, &b, &mut forward).unwrap());
    assert!(NarrowPhase::detect(&b, &a, &mut backward).unwrap());

    assert_abs_diff_eq!(forward.depth, backward.depth, epsilon = 1e-4);
    assert_abs_diff_eq!(forward.normal.dot(backward.normal), -1.0, epsilon = 1e-4);
}

#[test]
fn noclip_and_sphere_pairs_never_collide() {
    let mut manifold = CollisionManifold::new();
    let ghost = Shape::new_box(1.0, Vec3::ONE).with_noclip(true);
    let solid = Shape::new_box(1.0, Vec3::ONE);
    let ball = Shape::new_sphere(1.0, 1.0);

    assert!(!BroadPhase::test(&ghost, &solid));
    assert!(!NarrowPhase::detect(&ghost, &solid, &mut manifold).unwrap());
    assert!(!NarrowPhase::detect(&solid, &ball, &mut manifold).unwrap());
    assert!(!NarrowPhase::detect(&ball, &ball.clone(), &mut manifold).unwrap());
}
