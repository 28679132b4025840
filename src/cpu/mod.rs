mod cpu;
pub mod reg;

use crate::error::CpuError;
use crate::mem::Memory;

pub use self::reg::{Reg, ORIGIN};

/// Number of I/O ports.
pub const PORTS: usize = 256;

pub struct CPU {
  pub regs: Registers,
  pub mem: Memory,

  /// I/O ports, shared with the host through `port`/`set_port`.
  pub io: [u8; PORTS],

  /// Instructions executed since construction.
  pub cycles: u64,

  halted: bool,
  fault: Option<CpuError>,
}

#[cfg(test)]
mod optest;

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Registers {
  /// General-purpose registers.
  pub a: u8,
  pub b: u8,
  pub c: u8,
  pub d: u8,
  pub x: u8,
  pub y: u8,
  pub f: u8, // Flag register.

  /// Program counter.
  pub pc: u16,

  /// Stack pointer, an offset into page 0x01.
  pub sp: u8,
}
