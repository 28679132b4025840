use crate::cpu::reg::{self, Reg};
use crate::cpu::CPU;
use crate::error::CpuError;

fn init() -> CPU {
  let mut cpu = CPU::new();
  // Start in RAM away from the stack and the default origin.
  cpu.regs.pc = 0x4000;
  cpu
}

/// Execute `bytes` as a single instruction and check that the PC moved past
/// exactly `bytes.len()` bytes (no jumps).
fn run(cpu: &mut CPU, bytes: &[u8]) {
  let start = cpu.regs.pc;
  let cycles = cpu.cycles;
  cpu.mem.write(start, bytes);
  assert_eq!(cpu.step(), Ok(true));
  // Test time.
  assert_eq!(cpu.cycles, cycles + 1);
  // Test that the PC was incremented.
  assert_eq!(cpu.regs.pc, start + bytes.len() as u16);
}

#[test]
fn nop() {
  let mut cpu = init();
  let f = cpu.regs.f;
  run(&mut cpu, &[0x00]);
  assert_eq!(cpu.regs.f, f);
}

#[test]
fn mov_r_imm() {
  macro_rules! run_test {
    ($reg:ident, $opcode:expr) => {{
      let mut cpu = init();
      run(&mut cpu, &[$opcode, 0x82]);
      assert_eq!(cpu.regs.$reg, 0x82);
      assert!(cpu.regs.n());
      assert!(!cpu.regs.z());
    }};
  }
  run_test!(a, 0x01);
  run_test!(b, 0x02);
  run_test!(c, 0x03);
  run_test!(d, 0x04);
  run_test!(x, 0x05);
  run_test!(y, 0x06);
}

#[test]
fn mov_r1_r2() {
  macro_rules! reg_reg {
    ($r1:ident, $r2:ident, $opcode:expr) => {{
      let mut cpu = init();
      cpu.regs.$r2 = 0x42;
      cpu.regs.f = reg::C | reg::V;
      run(&mut cpu, &[$opcode]);
      assert_eq!(cpu.regs.$r1, 0x42);
      assert_eq!(cpu.regs.$r2, 0x42);
      // Carry and overflow survive a plain register write.
      assert_eq!(cpu.regs.f, reg::C | reg::V);
    }};
  }
  reg_reg!(a, b, 0x10);
  reg_reg!(a, c, 0x11);
  reg_reg!(b, a, 0x12);
  reg_reg!(c, a, 0x13);
}

#[test]
fn load_store_absolute() {
  let mut cpu = init();
  cpu.mem.wb(0x1234, 0x00);
  cpu.regs.a = 0x7f;
  run(&mut cpu, &[0x20, 0x34, 0x12]);
  assert_eq!(cpu.regs.a, 0);
  assert!(cpu.regs.z());

  cpu.regs.b = 0x99;
  run(&mut cpu, &[0x23, 0x00, 0x30]);
  assert_eq!(cpu.mem.rb(0x3000), 0x99);

  cpu.mem.wb(0x3001, 0x11);
  run(&mut cpu, &[0x21, 0x01, 0x30]);
  assert_eq!(cpu.regs.b, 0x11);

  cpu.regs.a = 0x55;
  run(&mut cpu, &[0x22, 0x02, 0x30]);
  assert_eq!(cpu.mem.rb(0x3002), 0x55);
}

#[test]
fn load_store_indexed() {
  let mut cpu = init();
  cpu.regs.x = 0x10;
  cpu.regs.y = 0x20;
  cpu.mem.wb(0x0010, 0xab);
  run(&mut cpu, &[0x24]);
  assert_eq!(cpu.regs.a, 0xab);

  run(&mut cpu, &[0x27]);
  assert_eq!(cpu.mem.rb(0x0020), 0xab);

  cpu.mem.wb(0x0020, 0x01);
  run(&mut cpu, &[0x25]);
  assert_eq!(cpu.regs.a, 0x01);

  cpu.regs.x = 0x30;
  run(&mut cpu, &[0x26]);
  assert_eq!(cpu.mem.rb(0x0030), 0x01);
}

#[test]
fn push_pop() {
  let mut cpu = init();
  cpu.regs.a = 0x12;
  cpu.regs.b = 0x34;
  run(&mut cpu, &[0x30]);
  assert_eq!(cpu.mem.rb(0x01ff), 0x12);
  assert_eq!(cpu.regs.sp, 0xfe);
  run(&mut cpu, &[0x31]);
  assert_eq!(cpu.mem.rb(0x01fe), 0x34);
  assert_eq!(cpu.regs.sp, 0xfd);

  run(&mut cpu, &[0x32]);
  assert_eq!(cpu.regs.a, 0x34);
  run(&mut cpu, &[0x33]);
  assert_eq!(cpu.regs.b, 0x12);
  assert_eq!(cpu.regs.sp, 0xff);
}

#[test]
fn stack_pointer_wraps() {
  let mut cpu = init();
  cpu.regs.sp = 0x00;
  cpu.regs.a = 0x77;
  run(&mut cpu, &[0x30]);
  assert_eq!(cpu.mem.rb(0x0100), 0x77);
  assert_eq!(cpu.regs.sp, 0xff);
  run(&mut cpu, &[0x33]);
  assert_eq!(cpu.regs.sp, 0x00);
  assert_eq!(cpu.regs.b, 0x77);
}

#[test]
fn add() {
  macro_rules! add {
    ($bytes:expr, $a:expr, $b:expr, $result:expr, $c:expr) => {{
      let mut cpu = init();
      cpu.regs.a = $a;
      cpu.regs.b = $b;
      run(&mut cpu, &$bytes);
      assert_eq!(cpu.regs.a, $result);
      assert_eq!(cpu.regs.c(), $c);
      assert_eq!(cpu.regs.z(), $result == 0);
    }};
  }
  add!([0x40], 250, 10, 4, true);
  add!([0x40], 1, 2, 3, false);
  add!([0x40], 0x80, 0x80, 0, true);
  add!([0x41, 10], 250, 0, 4, true);
  add!([0x41, 3], 5, 0, 8, false);
  add!([0x41, 1], 255, 0, 0, true);
}

#[test]
fn add_overflow() {
  let mut cpu = init();
  cpu.regs.a = 0x7f;
  cpu.regs.b = 0x01;
  run(&mut cpu, &[0x40]);
  assert_eq!(cpu.regs.a, 0x80);
  assert!(cpu.regs.v());
  assert!(cpu.regs.n());
  assert!(!cpu.regs.c());

  cpu.regs.a = 0x10;
  cpu.regs.b = 0x10;
  run(&mut cpu, &[0x40]);
  assert!(!cpu.regs.v());

  // The immediate form leaves V alone.
  cpu.regs.f = reg::V;
  cpu.regs.a = 0x01;
  run(&mut cpu, &[0x41, 0x01]);
  assert!(cpu.regs.v());
}

#[test]
fn sub() {
  let mut cpu = init();
  cpu.regs.a = 5;
  cpu.regs.b = 7;
  run(&mut cpu, &[0x42]);
  assert_eq!(cpu.regs.a, 0xfe);
  assert!(cpu.regs.c());
  assert!(cpu.regs.n());

  run(&mut cpu, &[0x43, 0xfe]);
  assert_eq!(cpu.regs.a, 0);
  assert!(!cpu.regs.c());
  assert!(cpu.regs.z());
}

#[test]
fn inc_dec() {
  macro_rules! step_reg {
    ($reg:ident, $opcode:expr, $start:expr, $result:expr) => {{
      let mut cpu = init();
      cpu.regs.$reg = $start;
      cpu.regs.f = reg::C;
      run(&mut cpu, &[$opcode]);
      assert_eq!(cpu.regs.$reg, $result);
      assert_eq!(cpu.regs.z(), $result == 0);
      // No carry out of INC/DEC.
      assert!(cpu.regs.c());
    }};
  }
  step_reg!(a, 0x44, 0x01, 0x02);
  step_reg!(b, 0x45, 0xff, 0x00);
  step_reg!(x, 0x46, 0x7f, 0x80);
  step_reg!(y, 0x47, 0x00, 0x01);
  step_reg!(a, 0x48, 0x01, 0x00);
  step_reg!(b, 0x49, 0x00, 0xff);
  step_reg!(x, 0x4a, 0x80, 0x7f);
  step_reg!(y, 0x4b, 0x10, 0x0f);
}

#[test]
fn logic() {
  macro_rules! logic {
    ($opcode:expr, $a:expr, $b:expr, $result:expr) => {{
      let mut cpu = init();
      cpu.regs.a = $a;
      cpu.regs.b = $b;
      run(&mut cpu, &[$opcode]);
      assert_eq!(cpu.regs.a, $result);
      assert_eq!(cpu.regs.z(), $result == 0);
      assert_eq!(cpu.regs.n(), $result & 0x80 != 0);
    }};
  }
  logic!(0x50, 0b1100_1100, 0b1010_1010, 0b1000_1000);
  logic!(0x50, 0x0f, 0xf0, 0x00);
  logic!(0x51, 0b1100_0000, 0b0000_0011, 0b1100_0011);
  logic!(0x52, 0xff, 0x0f, 0xf0);
  logic!(0x52, 0x3c, 0x3c, 0x00);
  logic!(0x53, 0x0f, 0x00, 0xf0);
  logic!(0x53, 0xff, 0x00, 0x00);
}

#[test]
fn shifts() {
  let mut cpu = init();
  cpu.regs.a = 0x81;
  run(&mut cpu, &[0x54]);
  assert_eq!(cpu.regs.a, 0x02);
  assert!(cpu.regs.c());

  run(&mut cpu, &[0x54]);
  assert_eq!(cpu.regs.a, 0x04);
  assert!(!cpu.regs.c());

  cpu.regs.a = 0x01;
  run(&mut cpu, &[0x55]);
  assert_eq!(cpu.regs.a, 0x00);
  assert!(cpu.regs.c());
  assert!(cpu.regs.z());

  cpu.regs.a = 0x80;
  run(&mut cpu, &[0x55]);
  assert_eq!(cpu.regs.a, 0x40);
  assert!(!cpu.regs.c());
}

#[test]
fn cmp() {
  let mut cpu = init();
  cpu.regs.a = 10;
  cpu.regs.b = 10;
  run(&mut cpu, &[0x60]);
  assert_eq!(cpu.regs.a, 10);
  assert!(cpu.regs.z());
  assert!(!cpu.regs.c());

  run(&mut cpu, &[0x61, 11]);
  assert_eq!(cpu.regs.a, 10);
  assert!(!cpu.regs.z());
  assert!(cpu.regs.c());
  assert!(cpu.regs.n());

  run(&mut cpu, &[0x61, 3]);
  assert!(!cpu.regs.z());
  assert!(!cpu.regs.c());
  assert!(!cpu.regs.n());
}

#[test]
fn jumps() {
  macro_rules! jump {
    ($opcode:expr, $f:expr, $taken:expr) => {{
      let mut cpu = init();
      cpu.regs.f = $f;
      cpu.mem.write(0x4000, &[$opcode, 0x34, 0x12]);
      assert_eq!(cpu.step(), Ok(true));
      let expected = if $taken { 0x1234 } else { 0x4003 };
      assert_eq!(cpu.regs.pc, expected);
    }};
  }
  jump!(0x70, 0, true);
  jump!(0x71, reg::Z, true);
  jump!(0x71, 0, false);
  jump!(0x72, 0, true);
  jump!(0x72, reg::Z, false);
  jump!(0x73, reg::C, true);
  jump!(0x73, 0, false);
  jump!(0x74, 0, true);
  jump!(0x74, reg::C, false);
  jump!(0x75, reg::N, true);
  jump!(0x75, reg::Z, false);
}

#[test]
fn call_ret() {
  let mut cpu = init();
  cpu.mem.write(0x4000, &[0x80, 0x00, 0x50, 0x00]);
  cpu.mem.wb(0x5000, 0x81);
  assert_eq!(cpu.step(), Ok(true));
  assert_eq!(cpu.regs.pc, 0x5000);
  assert_eq!(cpu.regs.sp, 0xfd);
  // High byte pushed first.
  assert_eq!(cpu.mem.rb(0x01ff), 0x40);
  assert_eq!(cpu.mem.rb(0x01fe), 0x03);

  assert_eq!(cpu.step(), Ok(true));
  assert_eq!(cpu.regs.pc, 0x4003);
  assert_eq!(cpu.regs.sp, 0xff);
}

#[test]
fn io() {
  let mut cpu = init();
  cpu.set_port(0x10, 0x80);
  cpu.regs.f = reg::C;
  run(&mut cpu, &[0x90, 0x10]);
  assert_eq!(cpu.regs.a, 0x80);
  assert!(cpu.regs.n());
  assert!(cpu.regs.c());

  cpu.regs.a = 0;
  let f = cpu.regs.f;
  run(&mut cpu, &[0x91, 0x82]);
  assert_eq!(cpu.port(0x82), 0);
  cpu.regs.a = 7;
  run(&mut cpu, &[0x91, 0x82]);
  assert_eq!(cpu.port(0x82), 7);
  assert_eq!(cpu.regs.f, f);
}

#[test]
fn halt() {
  let mut cpu = init();
  run(&mut cpu, &[0xff]);
  assert!(cpu.halted());
  let regs = cpu.regs.clone();
  assert_eq!(cpu.step(), Ok(false));
  assert_eq!(cpu.regs, regs);
  assert_eq!(cpu.cycles, 1);
}

#[test]
fn unknown_opcode() {
  let mut cpu = init();
  cpu.mem.wb(0x4000, 0x99);
  let err = CpuError::UnknownOpcode {
    opcode: 0x99,
    pc: 0x4000,
  };
  assert_eq!(cpu.step(), Err(err));
  assert!(cpu.halted());
  assert_eq!(cpu.fault(), Some(err));
  assert_eq!(cpu.regs.pc, 0x4001);
  assert_eq!(cpu.cycles, 0);
  assert_eq!(cpu.step(), Ok(false));
}

#[test]
fn pc_wraps() {
  let mut cpu = init();
  cpu.regs.pc = 0xffff;
  cpu.mem.wb(0xffff, 0x01);
  cpu.mem.wb(0x0000, 0x2a);
  assert_eq!(cpu.step(), Ok(true));
  assert_eq!(cpu.regs.get(Reg::A), 0x2a);
  assert_eq!(cpu.regs.pc, 0x0001);
}

#[test]
fn run_counts_and_budget() {
  let mut cpu = CPU::new();
  // MOV A, 0; ADD A, 1; CMP A, 10; JNZ 0x0202; HLT
  let program = [0x01, 0x00, 0x41, 0x01, 0x61, 0x0a, 0x72, 0x02, 0x02, 0xff];
  cpu.load_program(&program, 0x0200).unwrap();
  assert_eq!(cpu.run(Some(4)), Ok(4));
  assert_eq!(cpu.regs.a, 1);
  assert!(!cpu.halted());

  let rest = cpu.run(None).unwrap();
  assert_eq!(cpu.regs.a, 10);
  assert!(cpu.halted());
  assert_eq!(4 + rest, 1 + 3 * 10 + 1);
  assert_eq!(cpu.cycles, 32);
  assert_eq!(cpu.run(None), Ok(0));
}

#[test]
fn run_stops_on_unknown_opcode() {
  let mut cpu = CPU::new();
  cpu.load_program(&[0x00, 0x00, 0x99, 0x00], 0x0200).unwrap();
  assert_eq!(
    cpu.run(None),
    Err(CpuError::UnknownOpcode {
      opcode: 0x99,
      pc: 0x0202
    })
  );
  assert_eq!(cpu.cycles, 2);
  assert_eq!(cpu.regs.pc, 0x0203);
}

#[test]
fn load_program() {
  let mut cpu = CPU::new();
  cpu.load_program(&[1, 2, 3], 0x3000).unwrap();
  assert_eq!(cpu.regs.pc, 0x3000);
  assert_eq!(cpu.mem.rb(0x3002), 3);

  assert!(cpu.load_program(&[0; 0x10], 0xfff8).is_err());
  assert!(cpu.load_program(&[0; 8], 0xfff8).is_ok());
}
