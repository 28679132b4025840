use crate::gpu::GPU;

pub const NUM_SPRITES: usize = 64;
pub const SPRITE_SIZE: usize = 16;

/// 16x16 palette indices, indexed `[row][column]`. Index 0 is transparent.
pub type SpriteData = [[u8; SPRITE_SIZE]; SPRITE_SIZE];

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Sprite {
  pub data: SpriteData,
  pub x: i16,
  pub y: i16,
  pub enabled: bool,
}

impl GPU {
  pub fn sprite(&self, id: usize) -> Option<&Sprite> {
    self.sprites.get(id)
  }

  /// Replace a sprite's pixels. Unknown ids are ignored.
  pub fn load_sprite(&mut self, id: usize, data: &SpriteData) {
    if let Some(sprite) = self.sprites.get_mut(id) {
      sprite.data = *data;
    }
  }

  pub fn set_sprite_position(&mut self, id: usize, x: i16, y: i16) {
    if let Some(sprite) = self.sprites.get_mut(id) {
      sprite.x = x;
      sprite.y = y;
    }
  }

  pub fn enable_sprite(&mut self, id: usize, enabled: bool) {
    if let Some(sprite) = self.sprites.get_mut(id) {
      sprite.enabled = enabled;
    }
  }

  /// Composite one enabled sprite at its position, skipping transparent and
  /// off-screen pixels.
  pub fn draw_sprite(&mut self, id: usize) {
    let sprite = match self.sprites.get(id) {
      Some(s) if s.enabled => *s,
      _ => return,
    };

    for (row, line) in sprite.data.iter().enumerate() {
      for (col, &index) in line.iter().enumerate() {
        if index == 0 {
          continue;
        }
        let px = i32::from(sprite.x) + col as i32;
        let py = i32::from(sprite.y) + row as i32;
        let color = self.indexed_color(index);
        self.set_pixel(px, py, color);
      }
    }
  }

  /// Master switch for `draw_all_sprites`. Sprites start enabled.
  pub fn enable_sprites(&mut self, enabled: bool) {
    self.sprites_enabled = enabled;
  }

  pub fn sprites_enabled(&self) -> bool {
    self.sprites_enabled
  }

  /// Composite every enabled sprite in ascending id order, so higher ids end
  /// up on top. Does nothing while sprites are switched off.
  pub fn draw_all_sprites(&mut self) {
    if !self.sprites_enabled {
      return;
    }
    for id in 0..NUM_SPRITES {
      self.draw_sprite(id);
    }
  }
}
