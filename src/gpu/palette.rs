/// 8-bit RGB triple.
pub type Rgb = (u8, u8, u8);

/// Number of palette entries.
pub const PALETTE_SIZE: usize = 256;

/// Pack RGB888 into RGB565 by truncating each channel.
pub fn rgb_to_rgb565(r: u8, g: u8, b: u8) -> u16 {
  (u16::from(r & 0xf8) << 8) | (u16::from(g & 0xfc) << 3) | u16::from(b >> 3)
}

/// Unpack RGB565 into RGB888, leaving the dropped low bits at zero.
pub fn rgb565_to_rgb(color: u16) -> Rgb {
  let r = (((color >> 11) & 0x1f) << 3) as u8;
  let g = (((color >> 5) & 0x3f) << 2) as u8;
  let b = ((color & 0x1f) << 3) as u8;
  (r, g, b)
}

/// Black-to-white ramp where entry `i` is grey level `i`.
pub fn greyscale() -> [u16; PALETTE_SIZE] {
  let mut palette = [0; PALETTE_SIZE];
  for (i, entry) in palette.iter_mut().enumerate() {
    let level = i as u8;
    *entry = rgb_to_rgb565(level, level, level);
  }
  palette
}
