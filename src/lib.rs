#[macro_use]
extern crate log;

pub mod asm;
pub mod cpu;
pub mod error;
pub mod gpu;
pub mod machine;
pub mod mem;
pub mod opcode;
