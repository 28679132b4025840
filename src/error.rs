use std::error::Error;
use std::fmt;

/// Errors raised while assembling source text.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AsmError {
  /// An operand matched none of the literal forms and no bound label.
  Parse { line: usize, token: String },
  /// No opcode pattern matches the line. Only raised in strict mode.
  UnmatchedMnemonic { line: usize, text: String },
}

impl AsmError {
  /// 1-based source line the error was found on.
  pub fn line(&self) -> usize {
    match *self {
      AsmError::Parse { line, .. } => line,
      AsmError::UnmatchedMnemonic { line, .. } => line,
    }
  }
}

impl fmt::Display for AsmError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      AsmError::Parse { line, token } => {
        write!(f, "line {}: cannot parse value: {}", line, token)
      }
      AsmError::UnmatchedMnemonic { line, text } => {
        write!(f, "line {}: unknown instruction: {}", line, text)
      }
    }
  }
}

impl Error for AsmError {}

/// Errors raised by the CPU.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CpuError {
  /// The byte fetched at `pc` is not in the opcode table. Fatal.
  UnknownOpcode { opcode: u8, pc: u16 },
  /// The image does not fit between `origin` and the top of memory.
  ProgramTooLarge { len: usize, origin: u16 },
}

impl fmt::Display for CpuError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      CpuError::UnknownOpcode { opcode, pc } => {
        write!(f, "unknown opcode: 0x{:02X} at PC=0x{:04X}", opcode, pc)
      }
      CpuError::ProgramTooLarge { len, origin } => write!(
        f,
        "program of {} bytes does not fit in memory at 0x{:04X}",
        len, origin
      ),
    }
  }
}

impl Error for CpuError {}
