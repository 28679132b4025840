/// Size of the flat address space.
pub const MEM_SIZE: usize = 0x10000;

pub struct Memory {
  data: Vec<u8>,
}

impl Memory {
  pub fn new() -> Memory {
    Memory {
      data: vec![0; MEM_SIZE],
    }
  }

  /// Read a byte at address `addr`.
  pub fn rb(&self, addr: u16) -> u8 {
    self.data[addr as usize]
  }

  /// Read a 2-byte little-endian word from `addr`.
  pub fn rw(&self, addr: u16) -> u16 {
    let a = u16::from(self.rb(addr));
    let b = u16::from(self.rb(addr.wrapping_add(1)));
    (b << 8) | a
  }

  /// Write `value` at address `addr`.
  pub fn wb(&mut self, addr: u16, value: u8) {
    self.data[addr as usize] = value;
  }

  /// Write a 2-byte little-endian word to `addr`.
  pub fn ww(&mut self, addr: u16, value: u16) {
    self.wb(addr, (value & 0xff) as u8);
    self.wb(addr.wrapping_add(1), ((value >> 8) & 0xff) as u8);
  }

  /// Write an arbitrary number of bytes to memory, wrapping at the top.
  pub fn write(&mut self, addr: u16, values: &[u8]) {
    let mut cur = addr;
    for v in values {
      self.wb(cur, *v);
      cur = cur.wrapping_add(1);
    }
  }

  /// The whole address space, for host-side viewers.
  pub fn as_slice(&self) -> &[u8] {
    &self.data
  }
}

impl Default for Memory {
  fn default() -> Memory {
    Memory::new()
  }
}
