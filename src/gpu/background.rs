use crate::gpu::GPU;

/// Background layer selector.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Layer {
  One,
  Two,
}

impl Layer {
  fn index(self) -> usize {
    match self {
      Layer::One => 0,
      Layer::Two => 1,
    }
  }
}

/// A screen-sized grid of palette indices with a wrapping scroll offset.
#[derive(Debug, Clone)]
pub struct Background {
  width: usize,
  height: usize,
  tiles: Vec<u8>,
  scroll_x: i32,
  scroll_y: i32,
  enabled: bool,
}

impl Background {
  pub fn new(width: usize, height: usize, enabled: bool) -> Background {
    Background {
      width,
      height,
      tiles: vec![0; width * height],
      scroll_x: 0,
      scroll_y: 0,
      enabled,
    }
  }

  pub fn enabled(&self) -> bool {
    self.enabled
  }

  /// Current scroll offset, always within the layer's bounds.
  pub fn scroll(&self) -> (i32, i32) {
    (self.scroll_x, self.scroll_y)
  }

  /// Stored palette index, ignoring scroll. Out-of-range cells read as 0.
  pub fn get(&self, x: usize, y: usize) -> u8 {
    if x < self.width && y < self.height {
      self.tiles[y * self.width + x]
    } else {
      0
    }
  }

  /// Palette index seen at screen position (x, y) with scrolling applied.
  fn sample(&self, x: usize, y: usize) -> u8 {
    let sx = (x + self.scroll_x as usize) % self.width;
    let sy = (y + self.scroll_y as usize) % self.height;
    self.tiles[sy * self.width + sx]
  }

  /// Offsets stay in `0..width` and `0..height`, so reducing the delta first
  /// keeps the sum in range.
  fn scroll_by(&mut self, dx: i32, dy: i32) {
    let (w, h) = (self.width as i32, self.height as i32);
    self.scroll_x = (self.scroll_x + dx.rem_euclid(w)).rem_euclid(w);
    self.scroll_y = (self.scroll_y + dy.rem_euclid(h)).rem_euclid(h);
  }
}

impl GPU {
  pub fn background(&self, layer: Layer) -> &Background {
    &self.backgrounds[layer.index()]
  }

  /// Write a palette index into a layer. Out-of-range cells are ignored.
  pub fn set_background_pixel(&mut self, layer: Layer, x: i32, y: i32, index: u8) {
    let bg = &mut self.backgrounds[layer.index()];
    if x < 0 || y < 0 || x as usize >= bg.width || y as usize >= bg.height {
      return;
    }
    let idx = y as usize * bg.width + x as usize;
    bg.tiles[idx] = index;
  }

  /// Turn compositing of a layer on or off. Layer one starts enabled, layer
  /// two disabled.
  pub fn enable_layer(&mut self, layer: Layer, enabled: bool) {
    self.backgrounds[layer.index()].enabled = enabled;
  }

  /// Move a layer's scroll offset, wrapping in both directions.
  pub fn scroll_background(&mut self, layer: Layer, dx: i32, dy: i32) {
    self.backgrounds[layer.index()].scroll_by(dx, dy);
  }

  /// Composite an enabled layer over the framebuffer. Index 0 is
  /// transparent.
  pub fn render_background(&mut self, layer: Layer) {
    let i = layer.index();
    if !self.backgrounds[i].enabled {
      return;
    }
    for y in 0..self.height {
      for x in 0..self.width {
        let index = self.backgrounds[i].sample(x, y);
        if index != 0 {
          let color = self.indexed_color(index);
          self.framebuffer[y * self.width + x] = color;
        }
      }
    }
  }
}
