// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! Contains some handy utils for reading and writing

use crate::error::{Error, Result};
use owo_colors::{OwoColorize, Style};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
};

/// Size of the Chip-8 address space
pub const MEMORY_SIZE: usize = 0x1000;
/// Address at which programs are loaded, and execution begins
pub const PROGRAM_START: u16 = 0x200;
/// Length of a single font glyph, in bytes
pub const GLYPH_LEN: u16 = 5;

/// The built-in hexadecimal font, glyphs `0` through `F`
#[rustfmt::skip]
pub const FONT: [u8; 0x50] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Represents a named region in memory
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Character ROM. Read-only once the [Mem] is constructed.
    Charset,
    /// Program memory
    Program,
}

impl Region {
    /// Gets the address range covered by this [Region]
    /// # Examples
    /// ```rust
    /// # use chip8_core::prelude::*;
    /// assert_eq!(0x000..0x050, Charset.range());
    /// assert_eq!(0x200..0x1000, Program.range());
    /// ```
    pub fn range(self) -> Range<usize> {
        match self {
            Region::Charset => 0..FONT.len(),
            Region::Program => PROGRAM_START as usize..MEMORY_SIZE,
        }
    }

    /// Reports whether this region may be written to after startup
    pub fn is_writable(self) -> bool {
        !matches!(self, Region::Charset)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::Program => "Program",
            }
        )
    }
}

/// Stores the 4 KiB Chip-8 address space
///
/// Every access is bounds-checked. Out of range accesses, and writes into the
/// [Region::Charset], are reported as errors rather than wrapped or ignored.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "MemSnapshot"))]
pub struct Mem {
    memory: Vec<u8>,
}

/// The serialized form of [Mem], checked before it becomes one
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct MemSnapshot {
    memory: Vec<u8>,
}

#[cfg(feature = "serde")]
impl TryFrom<MemSnapshot> for Mem {
    type Error = Error;

    fn try_from(snapshot: MemSnapshot) -> Result<Self> {
        let MemSnapshot { memory } = snapshot;
        if memory.len() != MEMORY_SIZE {
            return Err(Error::InvalidSnapshot {
                reason: format!("memory is {} bytes, expected {MEMORY_SIZE}", memory.len()),
            });
        }
        if memory[Region::Charset.range()] != FONT {
            return Err(Error::InvalidSnapshot {
                reason: format!("{} does not hold the font", Region::Charset),
            });
        }
        Ok(Mem { memory })
    }
}

impl Mem {
    /// Constructs a zeroed [Mem] with the font loaded into [Region::Charset]
    /// # Examples
    /// ```rust
    /// # use chip8_core::prelude::*;
    /// let mem = Mem::new();
    /// assert_eq!(&FONT[..], mem.get_region(Charset));
    /// ```
    pub fn new() -> Self {
        let mut memory = vec![0; MEMORY_SIZE];
        memory[Region::Charset.range()].copy_from_slice(&FONT);
        log::debug!("charset loaded at {:03x?}", Region::Charset.range());
        Mem { memory }
    }

    /// Gets the length of the backing memory
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns true if the backing memory contains no elements
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Gets a slice of memory, or [Error::InvalidAddressRange] if any of it
    /// falls outside the address space
    /// # Examples
    /// ```rust
    /// # use chip8_core::prelude::*;
    /// let mem = Mem::new();
    /// assert_eq!(&[0xf0, 0x90], mem.grab(0..2).unwrap());
    /// assert!(mem.grab(0xfff..0x1001).is_err());
    /// ```
    pub fn grab(&self, range: Range<usize>) -> Result<&[u8]> {
        self.memory
            .get(range.clone())
            .ok_or(Error::InvalidAddressRange { range })
    }

    /// Reads a single byte
    /// # Examples
    /// ```rust
    /// # use chip8_core::prelude::*;
    /// let mem = Mem::new();
    /// // The top row of the `1` glyph
    /// assert_eq!(0x20, mem.read(5).unwrap());
    /// assert!(mem.read(0x1000).is_err());
    /// ```
    pub fn read(&self, addr: u16) -> Result<u8> {
        let addr = addr as usize;
        Ok(self.grab(addr..addr + 1)?[0])
    }

    /// Reads a big-endian word
    /// # Examples
    /// ```rust
    /// # use chip8_core::prelude::*;
    /// let mem = Mem::new();
    /// assert_eq!(0xf090, mem.read_word(0).unwrap());
    /// ```
    pub fn read_word(&self, addr: u16) -> Result<u16> {
        let addr = addr as usize;
        let word = self.grab(addr..addr + 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    /// Writes a single byte
    pub fn write(&mut self, addr: u16, data: u8) -> Result<()> {
        self.write_slice(addr, &[data])
    }

    /// Writes a run of bytes starting at `addr`.
    ///
    /// Fails without writing anything if the run leaves the address space or
    /// touches a read-only [Region].
    /// # Examples
    /// ```rust
    /// # use chip8_core::prelude::*;
    /// let mut mem = Mem::new();
    /// mem.write_slice(0x300, &[1, 5, 7]).unwrap();
    /// assert_eq!(&[1, 5, 7], mem.grab(0x300..0x303).unwrap());
    /// // The font can't be overwritten
    /// assert!(mem.write_slice(0x4e, &[0, 0, 0]).is_err());
    /// ```
    pub fn write_slice(&mut self, addr: u16, data: &[u8]) -> Result<()> {
        let range = addr as usize..addr as usize + data.len();
        let protected = Region::Charset.range();
        if !data.is_empty() && range.start < protected.end && protected.start < range.end {
            return Err(Error::ReadOnlyRegion {
                range,
                region: Region::Charset,
            });
        }
        self.memory
            .get_mut(range.clone())
            .ok_or(Error::InvalidAddressRange { range })?
            .copy_from_slice(data);
        Ok(())
    }

    /// Gets the contents of a named [Region]
    pub fn get_region(&self, region: Region) -> &[u8] {
        &self.memory[region.range()]
    }

    /// Zeroes a writable [Region]. The charset is left alone.
    pub fn clear_region(&mut self, region: Region) -> &mut Self {
        if region.is_writable() {
            self.memory[region.range()].fill(0);
        }
        self
    }

    /// Replaces the contents of [Region::Program] with `program`
    ///
    /// Returns [Error::ProgramTooLarge] (and leaves memory untouched) if the
    /// program doesn't fit.
    /// # Examples
    /// ```rust
    /// # use chip8_core::prelude::*;
    /// let mut mem = Mem::new();
    /// mem.load_program(&[0x12, 0x00]).unwrap();
    /// assert_eq!(0x1200, mem.read_word(PROGRAM_START).unwrap());
    /// assert!(mem.load_program(&[0; 0xe01]).is_err());
    /// ```
    pub fn load_program(&mut self, program: &[u8]) -> Result<&mut Self> {
        let region = Region::Program.range();
        if program.len() > region.len() {
            return Err(Error::ProgramTooLarge {
                len: program.len(),
                max: region.len(),
            });
        }
        self.clear_region(Region::Program);
        self.memory[region.start..region.start + program.len()].copy_from_slice(program);
        log::info!(
            "loaded {} byte program at {:03x}",
            program.len(),
            region.start
        );
        Ok(self)
    }

    /// Creates a window into the Mem which implements Display
    pub fn window(&self, range: Range<usize>) -> Result<MemWindow> {
        Ok(MemWindow {
            start: range.start,
            mem: self.grab(range)?,
        })
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Mem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mem")
            .field("len", &self.memory.len())
            .finish_non_exhaustive()
    }
}

impl Display for Mem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            MemWindow {
                start: 0,
                mem: &self.memory
            }
        )
    }
}

/// A hex-dump view of part of a [Mem]
pub struct MemWindow<'a> {
    start: usize,
    mem: &'a [u8],
}

impl<'a> Display for MemWindow<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Green phosphor style formatting, for taste
        let term: Style = Style::new().bold().green().on_black();
        for (index, byte) in self.mem.iter().enumerate() {
            if index % 16 == 0 {
                write!(f, "{:>03x}{} ", (self.start + index).style(term), ":".style(term))?
            }
            write!(f, "{byte:02x}")?;
            write!(
                f,
                "{}",
                match index % 16 {
                    0xf => "\n",
                    0x7 => "  ",
                    _ if index % 2 == 1 => " ",
                    _ => "",
                }
            )?
        }
        Ok(())
    }
}
