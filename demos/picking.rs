use boxdrop::{config::STATIC_MASS, *};

fn main() -> Result<(), PhysicsError> {
    let mut world = PhysicsWorld::new();
    world.add_shape(
        Shape::new_box(STATIC_MASS, Vec3::new(100.0, 4.0, 100.0)).with_center(Vec3::new(0.0, -4.0, 0.0)),
    );
    for i in 0..4 {
        world.add_shape(Shape::new_box(1.0, Vec3::ONE).with_center(Vec3::new(i as f32 * 3.0 - 4.5, 1.0, -10.0)));
    }

    for _ in 0..60 {
        world.step(10)?;
    }

    // Camera at eye height looking down -Z, sweeping across the row.
    let eye = Vec3::new(0.0, 1.0, 0.0);
    for x in [-4.5, -1.5, 1.5, 4.5, 9.0] {
        let target = Vec3::new(x, 1.0, -10.0);
        let end = eye + (target - eye).normalize() * 50.0;
        match world.pick(eye, end) {
            Some(hit) => {
                // Nudge the picked shape upward like a gameplay "grab".
                if let Some(shape) = world.shape_mut(hit.handle) {
                    shape.wake();
                    shape.velocity += Vec3::new(0.0, 4.0, 0.0);
                }
                println!("aim x = {x:>4}: hit {:?} at {:.2} ({:.2?})", hit.handle, hit.distance, hit.point);
            }
            None => println!("aim x = {x:>4}: nothing"),
        }
    }

    world.step(10)?;
    Ok(())
}
