//! Looping road corridor
//!
//! A fixed ring of segments scrolls toward the camera. A segment that passes
//! the reset threshold jumps back by the full ring length, so the same N
//! pieces give the illusion of an endless road.

use serde::{Deserialize, Serialize};

use super::state::{Obstacle, Pickup};
use crate::config::WorldConfig;

/// One road piece plus its paired scenery strip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSegment {
    /// Stable identity; the scene bridge keys road and scenery nodes by it
    pub id: u32,
    /// Longitudinal position (+z is toward/behind the camera)
    pub z: f32,
}

/// Ring of world segments
#[derive(Debug, Clone)]
pub struct WorldSegmentRecycler {
    segments: Vec<WorldSegment>,
    reset_threshold: f32,
    total_length: f32,
}

impl WorldSegmentRecycler {
    pub fn new(config: &WorldConfig) -> Self {
        let segments = (0..config.segment_count)
            .map(|i| WorldSegment {
                id: i,
                z: (config.trailing_segments as f32 - i as f32) * config.segment_length,
            })
            .collect();
        Self {
            segments,
            reset_threshold: config.reset_threshold,
            total_length: config.total_length(),
        }
    }

    pub fn segments(&self) -> &[WorldSegment] {
        &self.segments
    }

    pub fn reset_threshold(&self) -> f32 {
        self.reset_threshold
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Shift every segment by `delta` and wrap the ones that left the
    /// window `(threshold - total_length, threshold]`.
    pub fn advance(&mut self, delta: f32) {
        let (threshold, total) = (self.reset_threshold, self.total_length);
        for segment in &mut self.segments {
            segment.z = wrap(segment.z + delta, threshold, total);
        }
    }
}

fn wrap(z: f32, threshold: f32, total: f32) -> f32 {
    if z > threshold {
        let wrapped = z - total;
        if wrapped <= threshold {
            return wrapped;
        }
    } else if z > threshold - total {
        return z;
    }
    // Slow path for deltas larger than the ring (or negative deltas)
    let mut back = (threshold - z).rem_euclid(total);
    if back >= total {
        back = 0.0;
    }
    let wrapped = threshold - back;
    if wrapped <= threshold - total {
        threshold
    } else {
        wrapped
    }
}

/// Move obstacles and pickups with the road
pub fn scroll_entities(obstacles: &mut [Obstacle], pickups: &mut [Pickup], delta: f32) {
    if delta == 0.0 {
        return;
    }
    for obstacle in obstacles.iter_mut() {
        obstacle.z += delta;
    }
    for pickup in pickups.iter_mut() {
        pickup.z += delta;
    }
}

/// Lateral placement of the scenery strip paired with every segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneryLayout {
    /// Fences sit on the road edges at +-fence_x
    pub fence_x: f32,
    /// Sand strip centres at +-sand_x
    pub sand_x: f32,
    /// Water plane centres at +-water_x
    pub water_x: f32,
    pub sand_width: f32,
    pub water_width: f32,
    pub sand_y: f32,
    pub water_y: f32,
    pub fence_y: f32,
}

impl SceneryLayout {
    pub fn new(config: &WorldConfig) -> Self {
        let fence_x = config.road_width / 2.0;
        let sand_x = fence_x + config.sand_width / 2.0;
        let water_x = sand_x + config.sand_width / 2.0 + config.water_width / 2.0;
        Self {
            fence_x,
            sand_x,
            water_x,
            sand_width: config.sand_width,
            water_width: config.water_width,
            // Water sits just under the sand so the shoreline doesn't z-fight
            sand_y: -1.0,
            water_y: -1.05,
            fence_y: -0.8,
        }
    }
}
