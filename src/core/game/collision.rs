//=========================================================================
// Collision
//=========================================================================
//
// Axis-aligned bounding boxes in a y-up frame (bottom = height above
// ground) and the two hit rules:
//
//   Ground: horizontal overlap AND player.bottom < obstacle.top - tolerance
//   Flying: horizontal overlap AND player not shielded by ducking
//
// Flying obstacles ignore vertical position entirely; ducking is the
// only way past them.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::obstacle::Obstacle;

//=== Rect ================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Rect {
    /// Builds a rect from its lower-left corner and size.
    pub fn from_origin(left: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            right: left + width,
            bottom,
            top: bottom + height,
        }
    }

    /// Strict overlap of the horizontal ranges. Touching edges do not count.
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.right > other.left && self.left < other.right
    }
}

//=== Hit Rules ===========================================================

/// Returns `true` if the player collides with `obstacle` this frame.
///
/// `shielded` is whether the player is ducking or inside the duck grace
/// window; it only matters for flying obstacles.
pub fn player_hits(player: &Rect, obstacle: &Obstacle, shielded: bool, tolerance: f64) -> bool {
    let target = obstacle.rect();
    if !player.overlaps_horizontally(&target) {
        return false;
    }

    if obstacle.is_flying() {
        !shielded
    } else {
        player.bottom < target.top - tolerance
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
