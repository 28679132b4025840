//! Two-pass assembler for Neiler-8 source text.
//!
//! Each line holds at most one instruction or one label definition. A `;`
//! starts a comment. Pass one binds every label to the address its line
//! would occupy; pass two emits bytes with all labels resolved. Both passes
//! count from the CPU's reset origin, so an image runs without relocation.

mod operand;

use std::collections::HashMap;

use crate::cpu::ORIGIN;
use crate::error::AsmError;
use crate::opcode::{self, Opcode};

use self::operand::Value;

/// Output of a successful assembly run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Assembly {
  pub bytes: Vec<u8>,
  /// Upper-cased label names mapped to their addresses.
  pub labels: HashMap<String, u16>,
}

impl Assembly {
  pub fn label_count(&self) -> usize {
    self.labels.len()
  }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Pass {
  /// Bind labels. Forward references assemble with a placeholder value.
  Collect,
  /// Emit final bytes. Every label must resolve.
  Emit,
}

#[derive(Debug, Default)]
pub struct Assembler {
  labels: HashMap<String, u16>,
  strict: bool,
}

/// Assemble `source` with default options.
pub fn assemble(source: &str) -> Result<Assembly, AsmError> {
  Assembler::new().assemble(source)
}

/// Strip the comment, upper-case, and put whitespace in the canonical form
/// the opcode patterns are written in.
fn normalize(line: &str) -> String {
  let code = match line.find(';') {
    Some(idx) => &line[..idx],
    None => line,
  };
  code
    .to_uppercase()
    .replace(',', ", ")
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
    .replace(" ,", ",")
    .replace("[ ", "[")
    .replace(" ]", "]")
}

/// Find the first opcode whose pattern matches `text`, along with the raw
/// operand text.
///
/// Operand-less patterns must match the whole line. Operand patterns must
/// match the literal text on both sides of the placeholder and leave
/// something in between.
fn match_opcode(text: &str) -> Option<(&'static Opcode, &str)> {
  for op in opcode::all() {
    let (prefix, suffix) = op.split();
    if op.width == 0 {
      if text == prefix {
        return Some((op, ""));
      }
    } else if text.len() > prefix.len() + suffix.len()
      && text.starts_with(prefix)
      && text.ends_with(suffix)
    {
      return Some((op, &text[prefix.len()..text.len() - suffix.len()]));
    }
  }
  None
}

impl Assembler {
  pub fn new() -> Assembler {
    Assembler::default()
  }

  /// Fail on lines that match no instruction instead of skipping them.
  pub fn strict(mut self, strict: bool) -> Assembler {
    self.strict = strict;
    self
  }

  pub fn assemble(&mut self, source: &str) -> Result<Assembly, AsmError> {
    self.labels.clear();
    let lines: Vec<String> = source.lines().map(normalize).collect();

    let mut addr = ORIGIN;
    for (idx, text) in lines.iter().enumerate() {
      let code = self.assemble_line(idx + 1, text, addr, Pass::Collect)?;
      addr = addr.wrapping_add(code.len() as u16);
    }

    let mut bytes = Vec::new();
    let mut addr = ORIGIN;
    for (idx, text) in lines.iter().enumerate() {
      let code = self.assemble_line(idx + 1, text, addr, Pass::Emit)?;
      addr = addr.wrapping_add(code.len() as u16);
      bytes.extend(code);
    }

    debug!(
      "assembled {} bytes, {} labels",
      bytes.len(),
      self.labels.len()
    );
    Ok(Assembly {
      bytes,
      labels: self.labels.clone(),
    })
  }

  fn assemble_line(
    &mut self,
    line: usize,
    text: &str,
    addr: u16,
    pass: Pass,
  ) -> Result<Vec<u8>, AsmError> {
    if text.is_empty() {
      return Ok(vec![]);
    }

    if let Some(name) = text.strip_suffix(':').map(str::trim_end) {
      if operand::is_identifier(name) {
        if pass == Pass::Collect {
          self.bind(name, addr);
        }
        return Ok(vec![]);
      }
    }

    let (op, raw) = match match_opcode(text) {
      Some(m) => m,
      None if self.strict => {
        return Err(AsmError::UnmatchedMnemonic {
          line,
          text: text.to_string(),
        });
      }
      None => {
        if pass == Pass::Emit {
          debug!("line {}: skipping unknown instruction: {}", line, text);
        }
        return Ok(vec![]);
      }
    };

    let mut code = vec![op.code];
    if op.width == 0 {
      return Ok(code);
    }

    let token = raw.rsplit(',').next().unwrap_or(raw).trim();
    let value = match operand::parse(token, &self.labels) {
      Value::Number(n) => n,
      Value::Unbound if pass == Pass::Collect => 0,
      Value::Unbound | Value::Invalid => {
        return Err(AsmError::Parse {
          line,
          token: token.to_string(),
        });
      }
    };

    if op.width == 2 {
      code.push((value & 0xff) as u8);
      code.push(((value >> 8) & 0xff) as u8);
    } else {
      code.push((value & 0xff) as u8);
    }
    Ok(code)
  }

  fn bind(&mut self, name: &str, addr: u16) {
    trace!("label {} = 0x{:04x}", name, addr);
    if let Some(prev) = self.labels.insert(name.to_string(), addr) {
      if prev != addr {
        warn!(
          "label {} redefined: 0x{:04x} -> 0x{:04x}",
          name, prev, addr
        );
      }
    }
  }
}
