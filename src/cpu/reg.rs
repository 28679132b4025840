use std::fmt;

use crate::cpu::Registers;

pub const Z: u8 = 0x80;
pub const C: u8 = 0x40;
pub const V: u8 = 0x20;
pub const N: u8 = 0x10;
pub const I: u8 = 0x08;

/// Start of the stack page.
pub const STACK_BASE: u16 = 0x0100;

/// Program counter after reset, just past the zero page and the stack.
pub const ORIGIN: u16 = 0x0200;

/// General-purpose register names.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Reg {
  A,
  B,
  C,
  D,
  X,
  Y,
}

impl Registers {
  pub fn new() -> Registers {
    Registers {
      a: 0,
      b: 0,
      c: 0,
      d: 0,
      x: 0,
      y: 0,
      f: 0,

      pc: ORIGIN,
      sp: 0xff,
    }
  }

  pub fn get(&self, r: Reg) -> u8 {
    match r {
      Reg::A => self.a,
      Reg::B => self.b,
      Reg::C => self.c,
      Reg::D => self.d,
      Reg::X => self.x,
      Reg::Y => self.y,
    }
  }

  /// Write the low byte of `value` to `r` and recompute Z and N from it.
  pub fn set(&mut self, r: Reg, value: u16) {
    let value = (value & 0xff) as u8;
    match r {
      Reg::A => self.a = value,
      Reg::B => self.b = value,
      Reg::C => self.c = value,
      Reg::D => self.d = value,
      Reg::X => self.x = value,
      Reg::Y => self.y = value,
    }
    self.update_zn(value);
  }

  pub fn update_zn(&mut self, value: u8) {
    self.flag(Z, value == 0);
    self.flag(N, value & 0x80 != 0);
  }

  /// Set or clear `mask` in the flag register.
  pub fn flag(&mut self, mask: u8, on: bool) {
    if on {
      self.f |= mask;
    } else {
      self.f &= !mask;
    }
  }

  pub fn z(&self) -> bool {
    //! Zero flag
    self.f & Z != 0
  }
  pub fn c(&self) -> bool {
    //! Carry flag
    self.f & C != 0
  }
  pub fn v(&self) -> bool {
    //! Overflow flag
    self.f & V != 0
  }
  pub fn n(&self) -> bool {
    //! Negative flag
    self.f & N != 0
  }
  pub fn i(&self) -> bool {
    //! Interrupt flag, stored but never acted on
    self.f & I != 0
  }
}

impl Default for Registers {
  fn default() -> Registers {
    Registers::new()
  }
}

impl fmt::Display for Registers {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    writeln!(
      f,
      "A={:02X} B={:02X} C={:02X} D={:02X}",
      self.a, self.b, self.c, self.d
    )?;
    writeln!(
      f,
      "X={:02X} Y={:02X} SP={:02X} PC={:04X}",
      self.x, self.y, self.sp, self.pc
    )?;
    write!(
      f,
      "Flags: Z={} C={} V={} N={}",
      self.z() as u8,
      self.c() as u8,
      self.v() as u8,
      self.n() as u8
    )
  }
}
