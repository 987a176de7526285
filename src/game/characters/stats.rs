// Movement stats
//
// Speed is tied to the walk cycle: a slower walk animation moves the entity
// slower, so the stride looks the same at any configured walk delay.

/// Fixed movement tuning for the playable entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStats {
    /// Pixels per tick at the reference walk delay
    pub base_speed: f32,
    /// Walk delay the base speed was tuned for (ms)
    pub base_walk_delay_ms: u32,
}

pub const BASE_STATS: MovementStats = MovementStats {
    base_speed: 1.25,
    base_walk_delay_ms: 250,
};

impl Default for MovementStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl MovementStats {
    /// Pixels per tick for a configured walk delay
    pub fn speed_for(&self, walk_delay_ms: u32) -> f32 {
        if walk_delay_ms == 0 {
            return self.base_speed;
        }
        self.base_speed * self.base_walk_delay_ms as f32 / walk_delay_ms as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_delay_keeps_base_speed() {
        let stats = MovementStats::default();
        assert_relative_eq!(stats.speed_for(250), 1.25);
    }

    #[test]
    fn test_slower_walk_cycle_moves_slower() {
        let stats = MovementStats::default();
        assert_relative_eq!(stats.speed_for(500), 0.625);
        assert_relative_eq!(stats.speed_for(125), 2.5);
        assert_relative_eq!(stats.speed_for(0), 1.25);
    }
}
