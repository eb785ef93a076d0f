// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for chip8-core

use crate::cpu::mem::Region;
use std::ops::Range;
use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chip8-core.
///
/// Every error raised by [crate::CPU::tick] is fatal: the interpreter halts,
/// and reports [Error::Halted] until it is reset.
#[derive(Debug, Error)]
pub enum Error {
    /// Represents an unimplemented operation
    #[error("opcode {word:04x} not recognized")]
    UnimplementedInstruction {
        /// The offending word
        word: u16,
    },
    /// Tried to call a subroutine with all 16 stack frames in use
    #[error("stack overflow: call to {addr:03x} from {pc:03x}")]
    StackOverflow {
        /// Address of the call instruction
        pc: u16,
        /// The subroutine being called
        addr: u16,
    },
    /// Tried to return with nothing on the stack
    #[error("stack underflow: return from {pc:03x} with an empty stack")]
    StackUnderflow {
        /// Address of the return instruction
        pc: u16,
    },
    /// Tried to access memory outside of the address space
    #[error("range {range:04x?} is not present in memory")]
    InvalidAddressRange {
        /// The offending range
        range: Range<usize>,
    },
    /// Tried to write into a region that's fixed after startup
    #[error("range {range:04x?} overlaps read-only region {region}")]
    ReadOnlyRegion {
        /// The offending range
        range: Range<usize>,
        /// The [Region] it overlaps
        region: Region,
    },
    /// The program doesn't fit in program memory
    #[error("program of {len} bytes does not fit in {max} bytes of program memory")]
    ProgramTooLarge {
        /// Length of the program
        len: usize,
        /// Size of the program region
        max: usize,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to access key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Tried to convert string into [crate::Timing], but it did not match.
    #[error("no suitable conversion of \"{timing}\" into Timing")]
    InvalidTiming {
        /// The string which failed to become a timing
        timing: String,
    },
    /// The interpreter hit a fatal error, and must be reset
    #[error("interpreter halted at {pc:03x}, reset to continue")]
    Halted {
        /// The program counter at the time of the fault
        pc: u16,
    },
    /// A deserialized snapshot doesn't describe a valid machine
    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot {
        /// What was wrong with it
        reason: String,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
