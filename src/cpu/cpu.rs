use crate::cpu::reg::{self, Reg, STACK_BASE};
use crate::cpu::{Registers, CPU, PORTS};
use crate::error::CpuError;
use crate::mem::{Memory, MEM_SIZE};
use crate::opcode::{self, Cond, Op};

impl CPU {
  pub fn new() -> CPU {
    CPU {
      regs: Registers::new(),
      mem: Memory::new(),
      io: [0; PORTS],
      cycles: 0,
      halted: false,
      fault: None,
    }
  }

  pub fn halted(&self) -> bool {
    self.halted
  }

  /// The error that stopped the CPU, if any.
  pub fn fault(&self) -> Option<CpuError> {
    self.fault
  }

  /// Copy `program` into memory at `origin` and point the PC at it.
  pub fn load_program(
    &mut self,
    program: &[u8],
    origin: u16,
  ) -> Result<(), CpuError> {
    if origin as usize + program.len() > MEM_SIZE {
      return Err(CpuError::ProgramTooLarge {
        len: program.len(),
        origin,
      });
    }
    self.mem.write(origin, program);
    self.regs.pc = origin;
    debug!("loaded {} bytes at 0x{:04x}", program.len(), origin);
    Ok(())
  }

  pub fn port(&self, port: u8) -> u8 {
    self.io[port as usize]
  }

  pub fn set_port(&mut self, port: u8, value: u8) {
    self.io[port as usize] = value;
  }

  /// Run one instruction.
  /// Return false without touching any state once the CPU has halted.
  pub fn step(&mut self) -> Result<bool, CpuError> {
    if self.halted {
      return Ok(false);
    }

    let pc = self.regs.pc;
    let code = self.bump();
    let op = match opcode::decode(code) {
      Some(op) => op,
      None => {
        let err = CpuError::UnknownOpcode { opcode: code, pc };
        warn!("{}", err);
        self.halted = true;
        self.fault = Some(err);
        return Err(err);
      }
    };

    let operand = match op.width {
      0 => 0,
      1 => u16::from(self.bump()),
      _ => self.bump_word(),
    };
    trace!("{:04x}: {}", pc, op.render(operand));

    self.exec(op.op, operand);
    self.cycles += 1;
    Ok(true)
  }

  /// Step until halted, or until `max_cycles` instructions have run.
  /// Return the number of instructions executed by this call.
  pub fn run(&mut self, max_cycles: Option<u64>) -> Result<u64, CpuError> {
    let mut count = 0;
    while !self.halted {
      if let Some(max) = max_cycles {
        if count >= max {
          break;
        }
      }
      self.step()?;
      count += 1;
    }
    Ok(count)
  }

  /// Return the next byte at the program counter,
  /// and increment the program counter.
  fn bump(&mut self) -> u8 {
    let result = self.mem.rb(self.regs.pc);
    self.regs.pc = self.regs.pc.wrapping_add(1);
    result
  }

  fn bump_word(&mut self) -> u16 {
    let a = self.bump();
    let b = self.bump();
    u16::from(a) | (u16::from(b) << 8)
  }

  fn push(&mut self, value: u8) {
    self.mem.wb(STACK_BASE + u16::from(self.regs.sp), value);
    self.regs.sp = self.regs.sp.wrapping_sub(1);
  }

  fn pop(&mut self) -> u8 {
    self.regs.sp = self.regs.sp.wrapping_add(1);
    self.mem.rb(STACK_BASE + u16::from(self.regs.sp))
  }

  /// Push high byte first so that a pair of pops reads low then high.
  fn push_word(&mut self, value: u16) {
    self.push((value >> 8) as u8);
    self.push((value & 0xff) as u8);
  }

  fn pop_word(&mut self) -> u16 {
    let lo = self.pop();
    let hi = self.pop();
    (u16::from(hi) << 8) | u16::from(lo)
  }

  fn add(&mut self, r: Reg, n: u8, overflow: bool) {
    let a = u16::from(self.regs.get(r));
    let b = u16::from(n);
    let result = a + b;
    self.regs.flag(reg::C, result > 0xff);
    if overflow {
      self.regs.flag(reg::V, (a ^ result) & (b ^ result) & 0x80 != 0);
    }
    self.regs.set(r, result);
  }

  /// Set C on borrow and return the wrapped difference.
  fn sub(&mut self, a: u8, b: u8) -> u16 {
    self.regs.flag(reg::C, a < b);
    u16::from(a.wrapping_sub(b))
  }

  fn cmp(&mut self, r: Reg, n: u8) {
    let result = self.sub(self.regs.get(r), n);
    self.regs.update_zn(result as u8);
  }

  fn condition(&self, cond: Cond) -> bool {
    match cond {
      Cond::Always => true,
      Cond::Zero => self.regs.z(),
      Cond::NotZero => !self.regs.z(),
      Cond::Carry => self.regs.c(),
      Cond::NotCarry => !self.regs.c(),
      Cond::Negative => self.regs.n(),
    }
  }

  /// Apply `op` with its already-fetched operand.
  fn exec(&mut self, op: Op, operand: u16) {
    let imm = (operand & 0xff) as u8;
    match op {
      Op::Nop => (),
      Op::MovImm(r) => self.regs.set(r, operand),
      Op::MovReg(dst, src) => {
        let v = self.regs.get(src);
        self.regs.set(dst, u16::from(v));
      }
      Op::Load(r) => {
        let v = self.mem.rb(operand);
        self.regs.set(r, u16::from(v));
      }
      Op::Store(r) => self.mem.wb(operand, self.regs.get(r)),
      Op::LoadIndexed(r, index) => {
        let v = self.mem.rb(u16::from(self.regs.get(index)));
        self.regs.set(r, u16::from(v));
      }
      Op::StoreIndexed(r, index) => {
        self.mem.wb(u16::from(self.regs.get(index)), self.regs.get(r))
      }
      Op::Push(r) => {
        let v = self.regs.get(r);
        self.push(v);
      }
      Op::Pop(r) => {
        let v = self.pop();
        self.regs.set(r, u16::from(v));
      }
      Op::AddReg(dst, src) => {
        let n = self.regs.get(src);
        self.add(dst, n, true);
      }
      Op::AddImm(r) => self.add(r, imm, false),
      Op::SubReg(dst, src) => {
        let result = self.sub(self.regs.get(dst), self.regs.get(src));
        self.regs.set(dst, result);
      }
      Op::SubImm(r) => {
        let result = self.sub(self.regs.get(r), imm);
        self.regs.set(r, result);
      }
      Op::Inc(r) => {
        let v = self.regs.get(r).wrapping_add(1);
        self.regs.set(r, u16::from(v));
      }
      Op::Dec(r) => {
        let v = self.regs.get(r).wrapping_sub(1);
        self.regs.set(r, u16::from(v));
      }
      Op::And(dst, src) => {
        let v = self.regs.get(dst) & self.regs.get(src);
        self.regs.set(dst, u16::from(v));
      }
      Op::Or(dst, src) => {
        let v = self.regs.get(dst) | self.regs.get(src);
        self.regs.set(dst, u16::from(v));
      }
      Op::Xor(dst, src) => {
        let v = self.regs.get(dst) ^ self.regs.get(src);
        self.regs.set(dst, u16::from(v));
      }
      Op::Not(r) => {
        let v = !self.regs.get(r);
        self.regs.set(r, u16::from(v));
      }
      Op::Shl(r) => {
        let v = u16::from(self.regs.get(r));
        self.regs.flag(reg::C, v & 0x80 != 0);
        self.regs.set(r, v << 1);
      }
      Op::Shr(r) => {
        let v = u16::from(self.regs.get(r));
        self.regs.flag(reg::C, v & 0x01 != 0);
        self.regs.set(r, v >> 1);
      }
      Op::CmpReg(r1, r2) => {
        let n = self.regs.get(r2);
        self.cmp(r1, n);
      }
      Op::CmpImm(r) => self.cmp(r, imm),
      Op::Jump(cond) => {
        if self.condition(cond) {
          self.regs.pc = operand;
        }
      }
      Op::Call => {
        let ret = self.regs.pc;
        self.push_word(ret);
        self.regs.pc = operand;
      }
      Op::Ret => self.regs.pc = self.pop_word(),
      Op::In(r) => {
        let v = self.io[imm as usize];
        self.regs.set(r, u16::from(v));
      }
      Op::Out(r) => self.io[imm as usize] = self.regs.get(r),
      Op::Halt => {
        debug!("halted at 0x{:04x} after {} cycles", self.regs.pc, self.cycles);
        self.halted = true;
      }
    }
  }
}

impl Default for CPU {
  fn default() -> CPU {
    CPU::new()
  }
}
