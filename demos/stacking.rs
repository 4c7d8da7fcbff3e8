use boxdrop::{config::STATIC_MASS, *};

fn main() -> Result<(), PhysicsError> {
    let mut world = PhysicsWorld::new();

    world.add_shape(
        Shape::new_box(STATIC_MASS, Vec3::new(20.0, 1.0, 20.0)).with_center(Vec3::new(0.0, -1.0, 0.0)),
    );

    let stack: Vec<ShapeHandle> = (0..5)
        .map(|i| {
            world.add_shape(
                Shape::new_box(1.0, Vec3::splat(0.5)).with_center(Vec3::new(0.0, i as f32 * 1.05 + 0.5, 0.0)),
            )
        })
        .collect();

    for _ in 0..300 {
        world.step(substeps_for_frame(1.0 / 60.0))?;
    }

    for (level, handle) in stack.iter().enumerate() {
        if let Some(shape) = world.shape(*handle) {
            println!(
                "box {level}: y = {:.3}, {:?}",
                shape.center.y,
                shape.sleep_state()
            );
        }
    }
    println!("Simulated stack of boxes for 5 seconds");
    Ok(())
}
