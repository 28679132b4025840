mod background;
mod draw;
pub mod palette;
mod sprite;

pub use self::background::{Background, Layer};
pub use self::palette::{rgb565_to_rgb, rgb_to_rgb565, Rgb};
pub use self::sprite::{Sprite, SpriteData, NUM_SPRITES, SPRITE_SIZE};

/// Pixel format of the framebuffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
  /// 320x200, one palette index per pixel.
  Indexed,
  /// 640x480, one RGB565 color per pixel.
  Rgb565,
}

impl Mode {
  pub fn dimensions(self) -> (usize, usize) {
    match self {
      Mode::Indexed => (320, 200),
      Mode::Rgb565 => (640, 480),
    }
  }
}

pub struct GPU {
  mode: Mode,
  width: usize,
  height: usize,

  /// Row-major pixels. Palette indices in indexed mode, colors otherwise.
  framebuffer: Vec<u16>,
  palette: [u16; palette::PALETTE_SIZE],

  sprites: Vec<Sprite>,
  sprites_enabled: bool,
  backgrounds: [Background; 2],

  vblank: bool,
  frame_count: u64,
}

impl GPU {
  pub fn new(mode: Mode) -> GPU {
    let (width, height) = mode.dimensions();
    GPU {
      mode,
      width,
      height,
      framebuffer: vec![0; width * height],
      palette: palette::greyscale(),
      sprites: vec![Sprite::default(); NUM_SPRITES],
      sprites_enabled: true,
      backgrounds: [
        Background::new(width, height, true),
        Background::new(width, height, false),
      ],
      vblank: false,
      frame_count: 0,
    }
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.height
  }

  /// Raw framebuffer contents, row-major.
  pub fn framebuffer(&self) -> &[u16] {
    &self.framebuffer
  }

  fn index(&self, x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 {
      return None;
    }
    let (x, y) = (x as usize, y as usize);
    if x < self.width && y < self.height {
      Some(y * self.width + x)
    } else {
      None
    }
  }

  /// Set a pixel, ignoring coordinates off the screen.
  pub fn set_pixel(&mut self, x: i32, y: i32, color: u16) {
    let color = self.store(color);
    if let Some(idx) = self.index(x, y) {
      self.framebuffer[idx] = color;
    }
  }

  /// Read a pixel. Off-screen reads return 0.
  pub fn get_pixel(&self, x: i32, y: i32) -> u16 {
    self.index(x, y).map_or(0, |idx| self.framebuffer[idx])
  }

  pub fn clear_screen(&mut self, color: u16) {
    let color = self.store(color);
    for p in self.framebuffer.iter_mut() {
      *p = color;
    }
  }

  /// Truncate `color` to what a framebuffer cell holds in this mode.
  fn store(&self, color: u16) -> u16 {
    match self.mode {
      Mode::Indexed => color & 0xff,
      Mode::Rgb565 => color,
    }
  }

  /// The framebuffer value a palette index composites as.
  fn indexed_color(&self, index: u8) -> u16 {
    match self.mode {
      Mode::Indexed => u16::from(index),
      Mode::Rgb565 => self.palette[index as usize],
    }
  }

  pub fn set_palette_color(&mut self, index: u8, r: u8, g: u8, b: u8) {
    self.palette[index as usize] = rgb_to_rgb565(r, g, b);
  }

  pub fn palette(&self, index: u8) -> u16 {
    self.palette[index as usize]
  }

  pub fn palette_rgb(&self, index: u8) -> Rgb {
    rgb565_to_rgb(self.palette[index as usize])
  }

  /// Resolve one framebuffer value to RGB888.
  pub fn resolve(&self, value: u16) -> Rgb {
    match self.mode {
      Mode::Indexed => self.palette_rgb((value & 0xff) as u8),
      Mode::Rgb565 => rgb565_to_rgb(value),
    }
  }

  /// The framebuffer as packed RGB888 bytes, row-major, for presentation.
  pub fn framebuffer_rgb(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(self.framebuffer.len() * 3);
    for &value in self.framebuffer.iter() {
      let (r, g, b) = self.resolve(value);
      out.push(r);
      out.push(g);
      out.push(b);
    }
    out
  }

  /// Mark the end of a frame.
  pub fn vsync(&mut self) {
    self.vblank = true;
    self.frame_count += 1;
  }

  pub fn vblank(&self) -> bool {
    self.vblank
  }

  /// Read and clear the VBlank flag.
  pub fn take_vblank(&mut self) -> bool {
    let v = self.vblank;
    self.vblank = false;
    v
  }

  pub fn frame_count(&self) -> u64 {
    self.frame_count
  }
}
