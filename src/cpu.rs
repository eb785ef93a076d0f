// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod screen;
pub mod timing;

use self::{flags::Flags, instruction::Insn, mem::Mem, screen::Screen, timing::Timing};
use crate::error::{Error, Result};
use imperative_rs::InstructionSet;
use owo_colors::OwoColorize;
use rand::{rngs::StdRng, SeedableRng};
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Depth of the call stack
pub const STACK_DEPTH: usize = 16;

/// Represents the entire state of the interpreter: registers, stack, timers,
/// memory, screen, and keypad.
///
/// The host drives it one instruction at a time with [CPU::tick].
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CpuSnapshot"))]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Timing], trace logging, etc.
    pub flags: Flags,
    // memory
    mem: Mem,
    screen: Screen,
    stack: [Adr; STACK_DEPTH],
    sp: usize,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: [bool; 16],
    // Execution data
    opcode: u16,
    cycle: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    rng: StdRng,
}

/// The serialized form of a [CPU]. The RNG isn't saved; a restored CPU is
/// seeded from entropy.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct CpuSnapshot {
    flags: Flags,
    mem: Mem,
    screen: Screen,
    stack: [Adr; STACK_DEPTH],
    sp: usize,
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    keys: [bool; 16],
    opcode: u16,
    cycle: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<CpuSnapshot> for CPU {
    type Error = Error;

    fn try_from(s: CpuSnapshot) -> Result<Self> {
        if s.sp > STACK_DEPTH {
            return Err(Error::InvalidSnapshot {
                reason: format!("stack pointer {} is deeper than {STACK_DEPTH}", s.sp),
            });
        }
        Ok(CPU {
            flags: s.flags,
            mem: s.mem,
            screen: s.screen,
            stack: s.stack,
            sp: s.sp,
            pc: s.pc,
            i: s.i,
            v: s.v,
            delay: s.delay,
            sound: s.sound,
            keys: s.keys,
            opcode: s.opcode,
            cycle: s.cycle,
            rng: StdRng::from_entropy(),
        })
    }
}

// public interface
impl CPU {
    /// Constructs a new CPU with zeroed state and the font loaded
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let cpu = CPU::new();
    /// assert_eq!(0x200, cpu.pc());
    /// dbg!(cpu);
    /// ```
    pub fn new() -> Self {
        let cpu = CPU {
            flags: Flags::default(),
            mem: Mem::new(),
            screen: Screen::new(),
            stack: [0; STACK_DEPTH],
            sp: 0,
            pc: mem::PROGRAM_START,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; 16],
            opcode: 0,
            cycle: 0,
            rng: StdRng::from_entropy(),
        };
        log::debug!("cpu initialized");
        cpu
    }

    /// Loads a program into the CPU's program space
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        self.load_program_bytes(&std::fs::read(rom)?)
    }

    /// Loads bytes into the CPU's program space
    ///
    /// Returns [Error::ProgramTooLarge] if the program won't fit between
    /// `0x200` and the end of memory.
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let mut cpu = CPU::new();
    /// cpu.load_program_bytes(&[0x00, 0xe0]).unwrap();
    /// assert!(cpu.load_program_bytes(&[0; 0x1000]).is_err());
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.mem.load_program(rom)?;
        Ok(self)
    }

    /// Reseeds the random number generator used by `Cxbb`
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let (mut a, mut b) = (CPU::new(), CPU::new());
    /// for cpu in [&mut a, &mut b] {
    ///     cpu.seed(8);
    ///     cpu.load_program_bytes(&[0xc0, 0xff]).unwrap();
    ///     cpu.tick().unwrap();
    /// }
    /// assert_eq!(a.v(), b.v());
    /// ```
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Sets the state of a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let mut cpu = CPU::default();
    /// assert!(cpu.set_key(0x7, true).unwrap());
    /// // it was already pressed, so nothing's changed.
    /// assert!(!cpu.set_key(0x7, true).unwrap());
    /// assert!(cpu.set_key(0x10, true).is_err());
    /// ```
    pub fn set_key(&mut self, key: usize, pressed: bool) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        let changed = *keyref != pressed;
        *keyref = pressed;
        Ok(changed)
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    pub fn press(&mut self, key: usize) -> Result<bool> {
        self.set_key(key, true)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let mut cpu = CPU::default();
    /// // press key `7`
    /// cpu.press(0x7).unwrap();
    /// // release key `7`
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(changed); // key released
    /// // try releasing `7` again
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(!changed); // key was not held
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        self.set_key(key, false)
    }

    /// Gets the state of every key
    pub fn keys(&self) -> &[bool] {
        &self.keys
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, cpu.v()[4]);
    /// assert!(cpu.set_v(0x10, 0).is_err());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        if let Some(gpr) = self.v.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::InvalidRegister { reg })
        }
    }

    /// Gets a slice of the entire general purpose registers
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x0, 0x41).unwrap();
    /// assert_eq!(
    ///     cpu.v(),
    ///     [0x41, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    /// )
    /// ```
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the stack pointer (the number of return addresses on the stack)
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Gets the live portion of the call stack, oldest frame first
    pub fn stack(&self) -> &[Adr] {
        &self.stack[..self.sp]
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Reports whether the sound timer is running (the buzzer should sound)
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the most recently fetched opcode
    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    /// Gets the number of cycles the CPU has executed
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0x0, cpu.cycle());
    /// ```
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Gets the CPU's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Lowers the screen's dirty flag, once the host has drawn it
    pub fn clear_dirty(&mut self) {
        self.screen.clear_dirty()
    }

    /// Gets the screen if it has changed since the last frame, and marks it clean
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x00, 0xe0]).unwrap();
    /// assert!(cpu.frame().is_none());
    /// cpu.tick().unwrap();
    /// assert!(cpu.frame().is_some());
    /// assert!(cpu.frame().is_none());
    /// ```
    pub fn frame(&mut self) -> Option<&Screen> {
        if self.screen.is_dirty() {
            self.screen.clear_dirty();
            Some(&self.screen)
        } else {
            None
        }
    }

    /// Takes the sound-stop event, reporting whether the sound timer has run
    /// out since the last time this was called
    pub fn take_sound_stop(&mut self) -> bool {
        std::mem::take(&mut self.flags.sound_stopped)
    }

    /// Resets the emulator.
    ///
    /// Touches the stack, pc, registers, timers, keys, screen, cycle count,
    /// and the halted and sound_stopped [Flags].
    ///
    /// Does not touch memory (the loaded program survives), [Timing], or debug mode.
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x00, 0x00]).unwrap();
    /// assert!(cpu.tick().is_err());
    /// assert!(cpu.flags.halted);
    /// cpu.reset();
    /// assert!(!cpu.flags.halted);
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn reset(&mut self) {
        self.flags = Flags {
            halted: false,
            sound_stopped: false,
            ..self.flags.clone()
        };
        // clear the stack
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        // Reset the program counter
        self.pc = mem::PROGRAM_START;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        // I/O
        self.keys = [false; 16];
        self.screen = Screen::new();
        // Execution data
        self.opcode = 0;
        self.cycle = 0;
    }

    /// Counts both timers down by one, raising the sound-stop event when the
    /// sound timer runs out.
    ///
    /// Under [Timing::Instruction], [CPU::tick] calls this after every
    /// instruction. Under [Timing::External], the host should call it at 60Hz.
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x60, 0x01, 0xf0, 0x18]).unwrap();
    /// cpu.tick().unwrap(); // v0 = 1
    /// cpu.flags.timing = Timing::External;
    /// cpu.tick().unwrap(); // sound = v0
    /// assert_eq!(1, cpu.sound());
    /// cpu.tick_timers();
    /// assert_eq!(0, cpu.sound());
    /// assert!(cpu.take_sound_stop());
    /// assert!(!cpu.take_sound_stop());
    /// ```
    pub fn tick_timers(&mut self) -> &mut Self {
        self.delay = self.delay.saturating_sub(1);
        if self.sound > 0 {
            self.sound -= 1;
            if self.sound == 0 {
                log::debug!("sound timer expired at cycle {}", self.cycle);
                self.flags.sound_stopped = true;
            }
        }
        self
    }

    /// Runs `steps` instructions
    ///
    /// Under [Timing::External], also ticks the timers once afterward, so that
    /// a host calling this at 60Hz gets correct timer behavior.
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.multistep(0x20)
    ///     .expect("The program should only have valid opcodes.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(0x20, cpu.cycle());
    /// ```
    pub fn multistep(&mut self, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.tick()?;
        }
        if self.flags.timing == Timing::External {
            self.tick_timers();
        }
        Ok(self)
    }

    /// Executes a single instruction
    ///
    /// Returns [Error::UnimplementedInstruction] if the instruction at `pc` is
    /// unimplemented, or any other [Error] the instruction raised. Every
    /// such error halts the CPU: until [CPU::reset], further calls return
    /// [Error::Halted].
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.tick()
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    /// Returns [Error::UnimplementedInstruction] if the instruction is not implemented.
    /// ```rust
    /// # use chip8_core::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0xff, 0xff, // invalid!
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// dbg!(cpu.tick())
    ///     .expect_err("Should return Error::UnimplementedInstruction { 0xffff }");
    /// ```
    pub fn tick(&mut self) -> Result<&mut Self> {
        if self.flags.halted {
            return Err(Error::Halted { pc: self.pc });
        }
        if let Err(e) = self.step() {
            log::error!("halted at {:03x} ({:04x}): {e}", self.pc, self.opcode);
            self.flags.halted = true;
            return Err(e);
        }
        Ok(self)
    }

    /// Fetches, decodes, and executes the instruction at pc, then runs the timers
    fn step(&mut self) -> Result<()> {
        self.cycle += 1;
        // fetch opcode
        self.opcode = self.mem.read_word(self.pc)?;
        // decode opcode
        let insn = match Insn::decode(&self.opcode.to_be_bytes()) {
            Ok((_, insn)) => insn,
            Err(_) => {
                return Err(Error::UnimplementedInstruction { word: self.opcode });
            }
        };
        if self.flags.debug {
            log::debug!(
                "{:3} {:03x}: {:04x} {insn}",
                self.cycle,
                self.pc,
                self.opcode
            );
        }
        self.execute(insn)?;
        if self.flags.timing == Timing::Instruction {
            self.tick_timers();
        }
        Ok(())
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use chip8_core::*;
    /// let cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.sp,
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle.bright_black(),
        );
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("stack", &self.stack())
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("opcode", &self.opcode)
            .field("cycle", &self.cycle)
            .field("screen", &self.screen)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with sane defaults
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0000` | Location of font memory.
    /// | pc     |`0x0200` | Start location.
    ///
    /// # Examples
    /// ```rust
    /// use chip8_core::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        Self::new()
    }
}
