// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)

//! This crate implements the core of a Chip-8 interpreter: memory, registers,
//! the call stack, both timers, the framebuffer and the keypad, driven one
//! instruction at a time by [CPU::tick].
//!
//! Windowing, audio and input mapping are left to the host. The host loads a
//! program, feeds key states in, calls [CPU::tick], and reads frames back out.
//! ```rust
//! # use chip8_core::prelude::*;
//! # fn main() -> Result<()> {
//! let mut cpu = CPU::new();
//! cpu.load_program_bytes(&[0x6a, 0x05, 0x3a, 0x05])?;
//! cpu.tick()?.tick()?;
//! assert_eq!(0x206, cpu.pc());
//! # Ok(())
//! # }
//! ```

pub mod cpu;
pub mod error;

pub use cpu::{
    flags::Flags,
    instruction::Insn,
    mem::{Mem, Region},
    screen::Screen,
    timing::Timing,
    CPU,
};
pub use error::{Error, Result};

/// Common imports for chip8-core
pub mod prelude {
    use super::*;
    pub use cpu::{
        mem::{Region::*, FONT, PROGRAM_START},
        screen::{HEIGHT, WIDTH},
    };
    pub use super::{Error, Flags, Insn, Mem, Region, Result, Screen, Timing, CPU};
}
