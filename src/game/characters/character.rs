// The single playable entity

use super::stats::MovementStats;
use crate::core::math::{normalize_axes, wrap_point};
use glam::{IVec2, Vec2};

/// Position of the playable entity on a toroidal field
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub position: Vec2,
    /// Pixels per tick
    pub speed: f32,
    field: Vec2,
}

impl Entity {
    /// Create an entity at the centre of a `field`-sized play field
    pub fn new(field: Vec2, speed: f32) -> Self {
        Self {
            position: field * 0.5,
            speed,
            field,
        }
    }

    /// Create an entity whose speed follows the configured walk delay
    pub fn with_walk_delay(field: Vec2, stats: &MovementStats, walk_delay_ms: u32) -> Self {
        Self::new(field, stats.speed_for(walk_delay_ms))
    }

    pub fn field(&self) -> Vec2 {
        self.field
    }

    /// Move one tick along `axes`, wrapping at the field edges
    ///
    /// Diagonals are normalized so every direction moves at the same speed.
    pub fn integrate(&mut self, axes: IVec2) {
        let step = normalize_axes(axes) * self.speed;
        self.position = wrap_point(self.position + step, self.field);
    }

    /// Vector from the entity to `point`
    pub fn offset_to(&self, point: Vec2) -> Vec2 {
        point - self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FIELD: Vec2 = Vec2::new(640.0, 480.0);

    #[test]
    fn test_spawns_at_centre() {
        let entity = Entity::new(FIELD, 1.0);
        assert_eq!(entity.position, Vec2::new(320.0, 240.0));
    }

    #[test]
    fn test_wraps_right_edge() {
        let mut entity = Entity::new(FIELD, 1.0);
        entity.position.x = FIELD.x - 0.1;
        entity.integrate(IVec2::new(1, 0));
        assert_relative_eq!(entity.position.x, 0.9, epsilon = 1e-3);
    }

    #[test]
    fn test_wraps_top_edge() {
        let mut entity = Entity::new(FIELD, 2.0);
        entity.position.y = 1.0;
        entity.integrate(IVec2::new(0, -1));
        assert_relative_eq!(entity.position.y, 479.0);
        assert!(entity.position.y < FIELD.y);
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let mut entity = Entity::new(FIELD, 1.0);
        let start = entity.position;
        entity.integrate(IVec2::new(1, 1));
        assert_relative_eq!((entity.position - start).length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_idle_does_not_move() {
        let mut entity = Entity::with_walk_delay(FIELD, &MovementStats::default(), 250);
        let start = entity.position;
        entity.integrate(IVec2::ZERO);
        assert_eq!(entity.position, start);
        assert_relative_eq!(entity.speed, 1.25);
    }

    #[test]
    fn test_offset_to_pointer() {
        let entity = Entity::new(FIELD, 1.0);
        assert_eq!(entity.offset_to(Vec2::new(330.0, 200.0)), Vec2::new(10.0, -40.0));
    }
}
