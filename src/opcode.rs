//! The Neiler-8 instruction set, shared by the assembler and the CPU.

use crate::cpu::reg::Reg;

/// Branch condition tested by the jump family.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Cond {
  Always,
  Zero,
  NotZero,
  Carry,
  NotCarry,
  Negative,
}

/// Semantics of an opcode.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Op {
  Nop,
  MovImm(Reg),
  MovReg(Reg, Reg),
  Load(Reg),
  Store(Reg),
  LoadIndexed(Reg, Reg),
  StoreIndexed(Reg, Reg),
  Push(Reg),
  Pop(Reg),
  AddReg(Reg, Reg),
  AddImm(Reg),
  SubReg(Reg, Reg),
  SubImm(Reg),
  Inc(Reg),
  Dec(Reg),
  And(Reg, Reg),
  Or(Reg, Reg),
  Xor(Reg, Reg),
  Not(Reg),
  Shl(Reg),
  Shr(Reg),
  CmpReg(Reg, Reg),
  CmpImm(Reg),
  Jump(Cond),
  Call,
  Ret,
  In(Reg),
  Out(Reg),
  Halt,
}

#[derive(Debug)]
pub struct Opcode {
  /// Source syntax. Lower-case words are operand placeholders.
  pub pattern: &'static str,
  pub code: u8,
  /// Number of operand bytes following the opcode.
  pub width: u8,
  pub op: Op,
}

impl Opcode {
  /// Split the pattern around its operand placeholder.
  /// Patterns without an operand return the whole pattern and an empty
  /// suffix.
  pub fn split(&self) -> (&'static str, &'static str) {
    let p = self.pattern;
    match p.find(|c: char| c.is_ascii_lowercase()) {
      Some(start) => {
        let end = p[start..]
          .find(|c: char| !c.is_ascii_lowercase())
          .map_or(p.len(), |n| start + n);
        (&p[..start], &p[end..])
      }
      None => (p, ""),
    }
  }

  /// Format the instruction with a concrete operand, for trace output.
  pub fn render(&self, operand: u16) -> String {
    let (prefix, suffix) = self.split();
    match self.width {
      0 => self.pattern.to_string(),
      1 => format!("{}0x{:02X}{}", prefix, operand, suffix),
      _ => format!("{}0x{:04X}{}", prefix, operand, suffix),
    }
  }
}

macro_rules! op {
  ($pattern:expr, $code:expr, $width:expr, $op:expr) => {
    Opcode {
      pattern: $pattern,
      code: $code,
      width: $width,
      op: $op,
    }
  };
}

/// The full instruction table.
///
/// The assembler takes the first entry that matches a line, so entries whose
/// text is fully literal come before operand forms sharing the same leading
/// text (`ADD A, B` before `ADD A, imm`, `LOAD A, [X]` before
/// `LOAD A, [addr]`). Reordering them changes what gets assembled.
pub static OPCODES: [Opcode; 54] = [
  op!("NOP", 0x00, 0, Op::Nop),
  // Data movement.
  op!("MOV A, B", 0x10, 0, Op::MovReg(Reg::A, Reg::B)),
  op!("MOV A, C", 0x11, 0, Op::MovReg(Reg::A, Reg::C)),
  op!("MOV B, A", 0x12, 0, Op::MovReg(Reg::B, Reg::A)),
  op!("MOV C, A", 0x13, 0, Op::MovReg(Reg::C, Reg::A)),
  op!("MOV A, imm", 0x01, 1, Op::MovImm(Reg::A)),
  op!("MOV B, imm", 0x02, 1, Op::MovImm(Reg::B)),
  op!("MOV C, imm", 0x03, 1, Op::MovImm(Reg::C)),
  op!("MOV D, imm", 0x04, 1, Op::MovImm(Reg::D)),
  op!("MOV X, imm", 0x05, 1, Op::MovImm(Reg::X)),
  op!("MOV Y, imm", 0x06, 1, Op::MovImm(Reg::Y)),
  // Load/store.
  op!("LOAD A, [X]", 0x24, 0, Op::LoadIndexed(Reg::A, Reg::X)),
  op!("LOAD A, [Y]", 0x25, 0, Op::LoadIndexed(Reg::A, Reg::Y)),
  op!("STORE A, [X]", 0x26, 0, Op::StoreIndexed(Reg::A, Reg::X)),
  op!("STORE A, [Y]", 0x27, 0, Op::StoreIndexed(Reg::A, Reg::Y)),
  op!("LOAD A, [addr]", 0x20, 2, Op::Load(Reg::A)),
  op!("LOAD B, [addr]", 0x21, 2, Op::Load(Reg::B)),
  op!("STORE A, [addr]", 0x22, 2, Op::Store(Reg::A)),
  op!("STORE B, [addr]", 0x23, 2, Op::Store(Reg::B)),
  // Stack.
  op!("PUSH A", 0x30, 0, Op::Push(Reg::A)),
  op!("PUSH B", 0x31, 0, Op::Push(Reg::B)),
  op!("POP A", 0x32, 0, Op::Pop(Reg::A)),
  op!("POP B", 0x33, 0, Op::Pop(Reg::B)),
  // Arithmetic.
  op!("ADD A, B", 0x40, 0, Op::AddReg(Reg::A, Reg::B)),
  op!("ADD A, imm", 0x41, 1, Op::AddImm(Reg::A)),
  op!("SUB A, B", 0x42, 0, Op::SubReg(Reg::A, Reg::B)),
  op!("SUB A, imm", 0x43, 1, Op::SubImm(Reg::A)),
  op!("INC A", 0x44, 0, Op::Inc(Reg::A)),
  op!("INC B", 0x45, 0, Op::Inc(Reg::B)),
  op!("INC X", 0x46, 0, Op::Inc(Reg::X)),
  op!("INC Y", 0x47, 0, Op::Inc(Reg::Y)),
  op!("DEC A", 0x48, 0, Op::Dec(Reg::A)),
  op!("DEC B", 0x49, 0, Op::Dec(Reg::B)),
  op!("DEC X", 0x4a, 0, Op::Dec(Reg::X)),
  op!("DEC Y", 0x4b, 0, Op::Dec(Reg::Y)),
  // Logic.
  op!("AND A, B", 0x50, 0, Op::And(Reg::A, Reg::B)),
  op!("OR A, B", 0x51, 0, Op::Or(Reg::A, Reg::B)),
  op!("XOR A, B", 0x52, 0, Op::Xor(Reg::A, Reg::B)),
  op!("NOT A", 0x53, 0, Op::Not(Reg::A)),
  op!("SHL A", 0x54, 0, Op::Shl(Reg::A)),
  op!("SHR A", 0x55, 0, Op::Shr(Reg::A)),
  // Comparison.
  op!("CMP A, B", 0x60, 0, Op::CmpReg(Reg::A, Reg::B)),
  op!("CMP A, imm", 0x61, 1, Op::CmpImm(Reg::A)),
  // Jumps.
  op!("JMP addr", 0x70, 2, Op::Jump(Cond::Always)),
  op!("JZ addr", 0x71, 2, Op::Jump(Cond::Zero)),
  op!("JNZ addr", 0x72, 2, Op::Jump(Cond::NotZero)),
  op!("JC addr", 0x73, 2, Op::Jump(Cond::Carry)),
  op!("JNC addr", 0x74, 2, Op::Jump(Cond::NotCarry)),
  op!("JN addr", 0x75, 2, Op::Jump(Cond::Negative)),
  // Subroutines.
  op!("CALL addr", 0x80, 2, Op::Call),
  op!("RET", 0x81, 0, Op::Ret),
  // I/O.
  op!("IN A, port", 0x90, 1, Op::In(Reg::A)),
  op!("OUT port, A", 0x91, 1, Op::Out(Reg::A)),
  // System.
  op!("HLT", 0xff, 0, Op::Halt),
];

/// Iterate over every opcode in assembler precedence order.
pub fn all() -> impl Iterator<Item = &'static Opcode> {
  OPCODES.iter()
}

/// Look up an opcode byte.
pub fn decode(code: u8) -> Option<&'static Opcode> {
  all().find(|o| o.code == code)
}
