use crate::cpu::CPU;
use crate::error::CpuError;
use crate::gpu::GPU;

/// Port holding the X coordinate of the next plotted pixel.
pub const PORT_X: u8 = 0x80;
/// Port holding the Y coordinate of the next plotted pixel.
pub const PORT_Y: u8 = 0x81;
/// Writing a non-zero palette index here plots a pixel at (X, Y).
pub const PORT_DRAW: u8 = 0x82;

pub const DEFAULT_CYCLES_PER_FRAME: u64 = 1000;

/// A CPU wired to a GPU through the draw ports.
pub struct Machine {
  pub cpu: CPU,
  pub gpu: GPU,
  cycles_per_frame: u64,
}

impl Machine {
  pub fn new(cpu: CPU, gpu: GPU) -> Machine {
    Machine {
      cpu,
      gpu,
      cycles_per_frame: DEFAULT_CYCLES_PER_FRAME,
    }
  }

  pub fn cycles_per_frame(mut self, cycles: u64) -> Machine {
    self.cycles_per_frame = cycles;
    self
  }

  /// Run one instruction and service the draw port.
  pub fn step(&mut self) -> Result<bool, CpuError> {
    let ran = self.cpu.step()?;
    self.service_ports();
    Ok(ran)
  }

  fn service_ports(&mut self) {
    let color = self.cpu.port(PORT_DRAW);
    if color == 0 {
      return;
    }
    let x = usize::from(self.cpu.port(PORT_X)) % self.gpu.width();
    let y = usize::from(self.cpu.port(PORT_Y)) % self.gpu.height();
    trace!("port draw ({}, {}) = {}", x, y, color);
    self.gpu.set_pixel(x as i32, y as i32, u16::from(color));
    self.cpu.set_port(PORT_DRAW, 0);
  }

  /// Step until halted, or until `max_cycles` instructions have run.
  pub fn run(&mut self, max_cycles: Option<u64>) -> Result<u64, CpuError> {
    let mut count = 0;
    while !self.cpu.halted() && max_cycles.map_or(true, |max| count < max) {
      self.step()?;
      count += 1;
    }
    Ok(count)
  }

  /// Step up to one frame's worth of instructions, stopping early on halt,
  /// then signal VBlank. Return the number of instructions executed.
  pub fn run_frame(&mut self) -> Result<u64, CpuError> {
    let mut count = 0;
    while count < self.cycles_per_frame && !self.cpu.halted() {
      self.step()?;
      count += 1;
    }
    self.gpu.vsync();
    debug!(
      "frame {}: {} instructions",
      self.gpu.frame_count(),
      count
    );
    Ok(count)
  }

  /// Run up to `frames` frames, stopping after the one where the CPU halts.
  pub fn run_frames(&mut self, frames: u64) -> Result<u64, CpuError> {
    let mut total = 0;
    for _ in 0..frames {
      total += self.run_frame()?;
      if self.cpu.halted() {
        break;
      }
    }
    Ok(total)
  }
}
