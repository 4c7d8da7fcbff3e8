use glam::Vec3;

use crate::{
    config::MAX_COLLISION_CONTACTS,
    error::{PhysicsError, PhysicsResult},
};

/// Fixed-capacity ordered point buffer.
///
/// Storage is an inline array of `MAX_COLLISION_CONTACTS` entries, so the cap
/// holds by construction; pushing past it returns
/// [`PhysicsError::ContactCapacityExceeded`] in every build.
#[derive(Debug, Clone, Copy)]
pub struct ContactPoints {
    points: [Vec3; MAX_COLLISION_CONTACTS],
    len: usize,
}

impl Default for ContactPoints {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactPoints {
    pub const CAPACITY: usize = MAX_COLLISION_CONTACTS;

    pub fn new() -> Self {
        Self {
            points: [Vec3::ZERO; MAX_COLLISION_CONTACTS],
            len: 0,
        }
    }

    pub fn from_slice(points: &[Vec3]) -> PhysicsResult<Self> {
        let mut buffer = Self::new();
        for point in points {
            buffer.try_push(*point)?;
        }
        Ok(buffer)
    }

    pub fn try_push(&mut self, point: Vec3) -> PhysicsResult<()> {
        let slot = self
            .points
            .get_mut(self.len)
            .ok_or(PhysicsError::ContactCapacityExceeded {
                capacity: Self::CAPACITY,
            })?;
        *slot = point;
        self.len += 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[Vec3] {
        &self.points[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec3> {
        self.as_slice().iter()
    }
}

/// Result of one pairwise narrow-phase test.
///
/// A single instance is reused as scratch for every pair in a sweep. Its
/// contents are meaningful only between a detection call that returned `true`
/// and the resolution call that follows it.
#[derive(Debug, Clone, Default)]
pub struct CollisionManifold {
    /// Penetration depth along `normal`, never negative.
    pub depth: f32,
    /// Unit vector pointing from the first shape toward the second.
    pub normal: Vec3,
    /// Running sum of the contact points; divide by `num_points` for a centroid.
    pub contact_point: Vec3,
    contact_points: ContactPoints,
}

impl CollisionManifold {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.depth = 0.0;
        self.normal = Vec3::ZERO;
        self.contact_point = Vec3::ZERO;
        self.contact_points.clear();
    }

    pub fn add_contact_point(&mut self, point: Vec3) -> PhysicsResult<()> {
        if let Err(err) = self.contact_points.try_push(point) {
            log::error!("{err}");
            return Err(err);
        }
        self.contact_point += point;
        Ok(())
    }

    pub fn num_points(&self) -> usize {
        self.contact_points.len()
    }

    pub fn contact_points(&self) -> &[Vec3] {
        self.contact_points.as_slice()
    }

    pub fn centroid(&self) -> Option<Vec3> {
        match self.num_points() {
            0 => None,
            n => Some(self.contact_point / n as f32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seventeenth_point_is_rejected() {
        let mut manifold = CollisionManifold::new();
        for i in 0..MAX_COLLISION_CONTACTS {
            manifold
                .add_contact_point(Vec3::splat(i as f32))
                .expect("within capacity");
        }

        let err = manifold.add_contact_point(Vec3::ONE).unwrap_err();
        assert_eq!(
            err,
            PhysicsError::ContactCapacityExceeded {
                capacity: MAX_COLLISION_CONTACTS
            }
        );
        assert_eq!(manifold.num_points(), MAX_COLLISION_CONTACTS);
    }

    #[test]
    fn centroid_averages_running_sum() {
        let mut manifold = CollisionManifold::new();
        assert!(manifold.centroid().is_none());
        manifold.add_contact_point(Vec3::new(1.0, 0.0, 0.0)).unwrap();
        manifold.add_contact_point(Vec3::new(3.0, 2.0, 0.0)).unwrap();
        assert_eq!(manifold.contact_point, Vec3::new(4.0, 2.0, 0.0));
        assert_eq!(manifold.centroid(), Some(Vec3::new(2.0, 1.0, 0.0)));

        manifold.clear();
        assert_eq!(manifold.num_points(), 0);
        assert_eq!(manifold.contact_point, Vec3::ZERO);
    }
}
