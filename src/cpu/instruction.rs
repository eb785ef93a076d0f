// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(clippy::bad_bit_mask)]
//! Contains the definition of a Chip-8 [Insn]

use imperative_rs::InstructionSet;
use std::fmt::Display;

/// A decoded Chip-8 instruction, one variant per opcode.
///
/// Field names follow the opcode patterns: `x`/`y` pick registers, `B` is an
/// immediate byte, `A` a 12-bit address, `n` a nibble. A word that matches
/// no pattern fails to decode, and [crate::CPU::tick] reports it as
/// [crate::Error::UnimplementedInstruction], halting the interpreter.
///
/// # Examples
/// ```rust
/// # use chip8_core::*;
/// use imperative_rs::InstructionSet;
/// let (len, insn) = Insn::decode(&[0x8a, 0xb4]).unwrap();
/// assert_eq!(2, len);
/// assert_eq!(Insn::add { x: 0xa, y: 0xb }, insn);
/// assert!(Insn::decode(&[0x8a, 0xb8]).is_err());
/// ```
#[allow(non_camel_case_types, non_snake_case, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq)]
pub enum Insn {
    /// `00E0`: blank the framebuffer
    #[opcode = "0x00e0"]
    cls,
    /// `00EE`: pop a return address; fails on an empty stack
    #[opcode = "0x00ee"]
    ret,
    /// `1NNN`: pc = NNN
    #[opcode = "0x1AAA"]
    jmp { A: u16 },
    /// `2NNN`: push pc, then pc = NNN; fails when all 16 frames are used
    #[opcode = "0x2AAA"]
    call { A: u16 },
    /// `3XNN`: skip when VX == NN
    #[opcode = "0x3xBB"]
    seb { B: u8, x: usize },
    /// `4XNN`: skip when VX != NN
    #[opcode = "0x4xBB"]
    sneb { B: u8, x: usize },
    /// `5XY0`: skip when VX == VY
    #[opcode = "0x5xy0"]
    se { y: usize, x: usize },
    /// `6XNN`: VX = NN
    #[opcode = "0x6xBB"]
    movb { B: u8, x: usize },
    /// `7XNN`: VX += NN, wrapping, VF untouched
    #[opcode = "0x7xBB"]
    addb { B: u8, x: usize },
    /// `8XY0`: VX = VY
    #[opcode = "0x8xy0"]
    mov { x: usize, y: usize },
    /// `8XY1`: VX |= VY
    #[opcode = "0x8xy1"]
    or { y: usize, x: usize },
    /// `8XY2`: VX &= VY
    #[opcode = "0x8xy2"]
    and { y: usize, x: usize },
    /// `8XY3`: VX ^= VY
    #[opcode = "0x8xy3"]
    xor { y: usize, x: usize },
    /// `8XY4`: VX += VY, VF = carry
    #[opcode = "0x8xy4"]
    add { y: usize, x: usize },
    /// `8XY5`: VX -= VY, VF = VX > VY
    #[opcode = "0x8xy5"]
    sub { y: usize, x: usize },
    /// `8XY6`: VX >>= 1, VF = the bit shifted out (VY ignored)
    #[opcode = "0x8xy6"]
    shr { y: usize, x: usize },
    /// `8XY7`: VX = VY - VX, VF = VY > VX
    #[opcode = "0x8xy7"]
    bsub { y: usize, x: usize },
    /// `8XYE`: VX <<= 1, VF = the bit shifted out (VY ignored)
    #[opcode = "0x8xye"]
    shl { y: usize, x: usize },
    /// `9XY0`: skip when VX != VY
    #[opcode = "0x9xy0"]
    sne { y: usize, x: usize },
    /// `ANNN`: I = NNN
    #[opcode = "0xaAAA"]
    movI { A: u16 },
    /// `BNNN`: pc = NNN + V0
    #[opcode = "0xbAAA"]
    jmpr { A: u16 },
    /// `CXNN`: VX = random byte & NN
    #[opcode = "0xcxBB"]
    rand { B: u8, x: usize },
    /// `DXYN`: XOR an N-row sprite from I onto the screen at (VX, VY), VF = collision
    #[opcode = "0xdxyn"]
    draw { y: usize, x: usize, n: u8 },
    /// `EX9E`: skip when key VX is held; fails if VX > 0xF
    #[opcode = "0xex9e"]
    sek { x: usize },
    /// `EXA1`: skip when key VX is not held; fails if VX > 0xF
    #[opcode = "0xexa1"]
    snek { x: usize },
    /// `FX07`: VX = delay timer
    #[opcode = "0xfx07"]
    getdt { x: usize },
    /// `FX0A`: VX = lowest held key; re-runs until one is held
    #[opcode = "0xfx0a"]
    waitk { x: usize },
    /// `FX15`: delay timer = VX
    #[opcode = "0xfx15"]
    setdt { x: usize },
    /// `FX18`: sound timer = VX
    #[opcode = "0xfx18"]
    movst { x: usize },
    /// `FX1E`: I += VX, wrapping
    #[opcode = "0xfx1e"]
    addI { x: usize },
    /// `FX29`: I = address of the font glyph for VX
    #[opcode = "0xfx29"]
    font { x: usize },
    /// `FX33`: write the decimal digits of VX to I, I+1, I+2
    #[opcode = "0xfx33"]
    bcd { x: usize },
    /// `FX55`: copy V0..=VX out to memory at I; I is kept
    #[opcode = "0xfx55"]
    dmao { x: usize },
    /// `FX65`: copy memory at I into V0..=VX; I is kept
    #[opcode = "0xfx65"]
    dmai { x: usize },
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::cls               => write!(f, "cls    "),
            Insn::ret               => write!(f, "ret    "),
            Insn::jmp { A }         => write!(f, "jmp    {A:03x}"),
            Insn::call { A }        => write!(f, "call   {A:03x}"),
            Insn::seb { B, x }      => write!(f, "se     #{B:02x}, v{x:X}"),
            Insn::sneb { B, x }     => write!(f, "sne    #{B:02x}, v{x:X}"),
            Insn::se { y, x }       => write!(f, "se     v{y:X}, v{x:X}"),
            Insn::movb { B, x }     => write!(f, "mov    #{B:02x}, v{x:X}"),
            Insn::addb { B, x }     => write!(f, "add    #{B:02x}, v{x:X}"),
            Insn::mov { x, y }      => write!(f, "mov    v{y:X}, v{x:X}"),
            Insn::or { y, x }       => write!(f, "or     v{y:X}, v{x:X}"),
            Insn::and { y, x }      => write!(f, "and    v{y:X}, v{x:X}"),
            Insn::xor { y, x }      => write!(f, "xor    v{y:X}, v{x:X}"),
            Insn::add { y, x }      => write!(f, "add    v{y:X}, v{x:X}"),
            Insn::sub { y, x }      => write!(f, "sub    v{y:X}, v{x:X}"),
            Insn::shr { y: _, x }   => write!(f, "shr    v{x:X}"),
            Insn::bsub { y, x }     => write!(f, "bsub   v{y:X}, v{x:X}"),
            Insn::shl { y: _, x }   => write!(f, "shl    v{x:X}"),
            Insn::sne { y, x }      => write!(f, "sne    v{y:X}, v{x:X}"),
            Insn::movI { A }        => write!(f, "mov    ${A:03x}, I"),
            Insn::jmpr { A }        => write!(f, "jmp    ${A:03x}+v0"),
            Insn::rand { B, x }     => write!(f, "rand   #{B:02x}, v{x:X}"),
            Insn::draw { y, x, n }  => write!(f, "draw   #{n:x}, v{x:X}, v{y:X}"),
            Insn::sek { x }         => write!(f, "sek    v{x:X}"),
            Insn::snek { x }        => write!(f, "snek   v{x:X}"),
            Insn::getdt { x }       => write!(f, "mov    DT, v{x:X}"),
            Insn::waitk { x }       => write!(f, "waitk  v{x:X}"),
            Insn::setdt { x }       => write!(f, "mov    v{x:X}, DT"),
            Insn::movst { x }       => write!(f, "mov    v{x:X}, ST"),
            Insn::addI { x }        => write!(f, "add    v{x:X}, I"),
            Insn::font { x }        => write!(f, "font   v{x:X}, I"),
            Insn::bcd { x }         => write!(f, "bcd    v{x:X}, &I"),
            Insn::dmao { x }        => write!(f, "dmao   v{x:X}"),
            Insn::dmai { x }        => write!(f, "dmai   v{x:X}"),
        }
    }
}
