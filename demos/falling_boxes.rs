use std::collections::VecDeque;

use boxdrop::{config::STATIC_MASS, *};

const FRAME_DT: f32 = 1.0 / 60.0;
const MAX_SHAPES: usize = 100;
const SPAWN_EVERY: u32 = 6;

/// Cheap deterministic jitter so the demo needs no RNG crate.
struct Jitter(u32);

impl Jitter {
    fn next(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (self.0 >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0
    }
}

fn main() -> Result<(), PhysicsError> {
    let mut engine = PhysicsEngine::new();
    engine.add_shape(
        Shape::new_box(STATIC_MASS, Vec3::new(100.0, 4.0, 100.0)).with_center(Vec3::new(0.0, -4.0, 0.0)),
    );

    // Ground is the anchor and never evicted; boxes leave oldest first.
    let mut spawned: VecDeque<ShapeHandle> = VecDeque::new();
    let mut jitter = Jitter(7);

    for frame in 0..1800u32 {
        if frame % SPAWN_EVERY == 0 {
            if engine.world().len() > MAX_SHAPES {
                if let Some(oldest) = spawned.pop_front() {
                    engine.remove_shape(oldest);
                }
            }
            let velocity = Vec3::new(jitter.next() * 3.0, 0.0, jitter.next() * 3.0);
            let spin = Vec3::new(jitter.next(), jitter.next(), jitter.next());
            let handle = engine.add_shape(
                Shape::new_box(1.0, Vec3::ONE)
                    .with_center(Vec3::new(0.0, 20.0, 0.0))
                    .with_velocity(velocity)
                    .with_angular_velocity(spin),
            );
            spawned.push_back(handle);
        }

        engine.tick(FRAME_DT)?;

        if frame % 300 == 0 {
            let profile = engine.world().last_profile();
            println!(
                "frame {frame}: {} shapes, {} asleep, {} contacts, {:.2} ms",
                profile.shape_count,
                profile.asleep_count,
                profile.contact_points,
                profile.total_time.as_secs_f32() * 1000.0
            );
        }
    }

    let lowest = engine
        .world()
        .shapes()
        .iter()
        .filter(|shape| !shape.is_static())
        .map(|shape| shape.center.y)
        .fold(f32::MAX, f32::min);
    println!("Simulated 30 seconds, lowest box center at y = {lowest:.3}");
    Ok(())
}
