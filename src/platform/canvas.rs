//=========================================================================
// Canvas
//
// CPU-side RGBA framebuffer the window surface paints snapshots into.
//
// Coordinates:
// ```text
//   (0,0) ─────────────────────────── x
//     │            sky
//     │     ┌──┐
//     │     │  │ entity (bottom measured up from the ground line)
//   ──┴─────┴──┴────────────────────── ground_row
//     │            ground
//     y
// ```
//
// Entities are clipped to the canvas; anything partially off screen is
// drawn only where it overlaps.
//
//=========================================================================

//=== Internal Imports ====================================================

use crate::core::render::{EntityView, Snapshot};

//=== Constants ===========================================================

/// Height of the ground band below the ground line.
const GROUND_BAND: u32 = 24;

pub(crate) type Rgba = [u8; 4];

pub(crate) const SKY: Rgba = [0x5b, 0xce, 0xfa, 0xff];
pub(crate) const GROUND: Rgba = [0x6b, 0x4f, 0x2a, 0xff];

/// Fill color for a sprite name.
pub(crate) fn sprite_color(sprite: &str) -> Rgba {
    match sprite {
        "runner" => [0xff, 0x99, 0x33, 0xff],
        "tree" => [0x2e, 0x8b, 0x57, 0xff],
        "tower" => [0x70, 0x70, 0x80, 0xff],
        "building" => [0xa0, 0x52, 0x2d, 0xff],
        "bird" => [0x1e, 0x22, 0x27, 0xff],
        _ => [0xff, 0x00, 0xff, 0xff],
    }
}

//=== Canvas ==============================================================

pub(crate) struct Canvas {
    width: u32,
    height: u32,
    ground_row: i32,
    frame: Vec<u8>,
}

impl Canvas {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            width,
            height,
            ground_row: height.saturating_sub(GROUND_BAND) as i32,
            frame: vec![0; width as usize * height as usize * 4],
        };
        canvas.clear();
        canvas
    }

    //--- Accessors --------------------------------------------------------

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub(crate) fn frame(&self) -> &[u8] {
        &self.frame
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut color = [0; 4];
        color.copy_from_slice(&self.frame[i..i + 4]);
        Some(color)
    }

    //--- Painting ---------------------------------------------------------

    /// Sky above the ground line, ground below it.
    pub(crate) fn clear(&mut self) {
        let (width, height) = (self.width as i32, self.height as i32);
        self.fill_rect(0, 0, width, self.ground_row, SKY);
        self.fill_rect(0, self.ground_row, width, height - self.ground_row, GROUND);
    }

    /// Repaints the whole frame from a snapshot.
    pub(crate) fn paint(&mut self, snapshot: &Snapshot) {
        self.clear();
        for (_, obstacle) in &snapshot.obstacles {
            self.draw_entity(obstacle);
        }
        self.draw_entity(&snapshot.player);
    }

    fn draw_entity(&mut self, entity: &EntityView) {
        let top = self.ground_row - entity.bottom - entity.height;
        let color = sprite_color(entity.sprite);
        self.fill_rect(entity.left, top, entity.width, entity.height, color);
    }

    //--- fill_rect() ------------------------------------------------------
    //
    // Fills `w x h` pixels at (x, y) in screen space, clipped to the
    // canvas. Negative or empty sizes draw nothing.
    //
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width as i32);
        let y1 = y.saturating_add(h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.width as usize * 4;
        for row in y0 as usize..y1 as usize {
            let start = row * stride + x0 as usize * 4;
            let end = row * stride + x1 as usize * 4;
            for pixel in self.frame[start..end].chunks_exact_mut(4) {
                pixel.copy_from_slice(&color);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn entity(left: i32, bottom: i32, width: i32, height: i32, sprite: &'static str) -> EntityView {
        EntityView {
            left,
            bottom,
            width,
            height,
            sprite,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            player: entity(50, 0, 44, 80, "runner"),
            obstacles: vec![(1, entity(300, 0, 42, 60, "tree"))],
        }
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn clear_paints_sky_and_ground() {
        let canvas = Canvas::new(100, 100);
        assert_eq!(canvas.frame().len(), 100 * 100 * 4);
        assert_eq!(canvas.pixel(10, 10), Some(SKY));
        assert_eq!(canvas.pixel(10, 99), Some(GROUND));
    }

    #[test]
    fn paint_draws_player_and_obstacles_above_ground() {
        let mut canvas = Canvas::new(800, 300);
        canvas.paint(&snapshot());

        // Ground line is at row 276; the player spans rows 196..276.
        assert_eq!(canvas.pixel(60, 270), Some(sprite_color("runner")));
        assert_eq!(canvas.pixel(60, 196), Some(sprite_color("runner")));
        assert_eq!(canvas.pixel(60, 195), Some(SKY));
        assert_eq!(canvas.pixel(310, 250), Some(sprite_color("tree")));
        assert_eq!(canvas.pixel(310, 200), Some(SKY));
        assert_eq!(canvas.pixel(310, 280), Some(GROUND));
    }

    #[test]
    fn raised_entities_move_up() {
        let mut canvas = Canvas::new(800, 300);
        let mut jumping = snapshot();
        jumping.player.bottom = 100;
        canvas.paint(&jumping);

        assert_eq!(canvas.pixel(60, 270), Some(SKY));
        assert_eq!(canvas.pixel(60, 170), Some(sprite_color("runner")));
    }

    #[test]
    fn repaint_erases_previous_positions() {
        let mut canvas = Canvas::new(800, 300);
        canvas.paint(&snapshot());

        let mut moved = snapshot();
        moved.obstacles[0].1.left = 500;
        canvas.paint(&moved);

        assert_eq!(canvas.pixel(310, 250), Some(SKY));
        assert_eq!(canvas.pixel(510, 250), Some(sprite_color("tree")));
    }

    #[test]
    fn partially_off_screen_entities_are_clipped() {
        let mut canvas = Canvas::new(200, 100);
        let snapshot = Snapshot {
            player: entity(-30, 0, 44, 40, "runner"),
            obstacles: vec![(1, entity(180, 0, 96, 300, "bird"))],
        };
        canvas.paint(&snapshot);

        assert_eq!(canvas.pixel(0, 70), Some(sprite_color("runner")));
        assert_eq!(canvas.pixel(199, 0), Some(sprite_color("bird")));
    }

    #[test]
    fn unknown_sprite_is_visible() {
        assert_ne!(sprite_color("unknown"), SKY);
        assert_ne!(sprite_color("unknown"), GROUND);
    }
}
