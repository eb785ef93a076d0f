// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Testing methods on chip8-core's structs
use chip8_core::prelude::*;
use std::{collections::hash_map::DefaultHasher, hash::Hash};

mod cpu {
    use super::*;

    #[test]
    fn clone() {
        let mut cpu = CPU::default();
        cpu.load_program_bytes(&[0x6a, 0x05]).unwrap();
        let mut cpu2 = cpu.clone();
        cpu.tick().unwrap();
        cpu2.tick().unwrap();
        assert_eq!(cpu.v(), cpu2.v());
        assert_eq!(cpu.pc(), cpu2.pc());
    }
    #[test]
    fn debug() {
        println!("{:?}", CPU::default());
    }
    #[test]
    fn dump() {
        CPU::default().dump();
    }
    #[test]
    fn press_invalid_key() {
        let mut cpu = CPU::default();
        cpu.press(0x21345134)
            .expect_err("This should produce an Error::InvalidKey");
        // no change has been made, everything is safe.
        assert_eq!(&[false; 16], cpu.keys());
    }
    #[test]
    fn release_invalid_key() {
        let mut cpu = CPU::default();
        cpu.release(0x21345134)
            .expect_err("This should produce an Error::InvalidKey");
        assert_eq!(&[false; 16], cpu.keys());
    }
    #[test]
    fn set_invalid_reg() {
        let mut cpu = CPU::default();
        cpu.set_v(0x21345134, 0xff)
            .expect_err("This should produce an Error::InvalidRegister");
        // no change has been made
        assert_eq!(&[0; 16], cpu.v());
    }
}

mod flags {
    use super::*;
    //#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[test]
    fn clone() {
        let cf1 = Flags {
            debug: false,
            halted: false,
            timing: Timing::External,
            sound_stopped: false,
        };
        let cf2 = cf1.clone();
        assert_eq!(cf1, cf2)
    }
    #[test]
    fn debug() {
        println!("{:?}", Flags::default());
    }
    #[test]
    fn default() {
        assert_eq!(
            Flags::default(),
            Flags {
                debug: false,
                halted: false,
                timing: Timing::Instruction,
                sound_stopped: false,
            }
        )
    }
    #[test]
    fn eq() {
        let cf1 = Flags::default();
        let cf2 = Flags {
            debug: true,
            halted: true,
            ..Default::default()
        };
        assert_ne!(cf1, cf2);
    }
    #[test]
    fn ord() {
        let cf1 = Flags::default();
        let cf2 = Flags {
            debug: true,
            ..Default::default()
        };
        assert!(cf1 < cf2);
        assert_eq!(Flags::default(), cf1.min(cf2));
    }
    #[test]
    fn hash() {
        let mut hasher = DefaultHasher::new();
        Flags::default().hash(&mut hasher);
        println!("{:?}", hasher);
    }
}

mod region {
    use super::*;
    //  #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[test]
    fn copy() {
        let r1 = Program;
        let r2 = r1;
        assert_eq!(r1, r2);
    }
    #[test]
    #[allow(clippy::clone_on_copy)]
    fn clone() {
        let r1 = Program;
        let r2 = r1.clone();
        assert_eq!(r1, r2);
    }
    #[test]
    fn display() {
        assert_eq!("Charset Program", format!("{Charset} {Program}"));
    }
    #[test]
    fn debug() {
        println!("{Charset:?}{Program:?}");
    }
    #[test]
    fn ord() {
        assert_eq!(Program, Charset.max(Program));
        assert!(Charset < Program);
    }
    #[test]
    fn hash() {
        let mut hasher = DefaultHasher::new();
        Program.hash(&mut hasher);
        println!("{hasher:?}");
    }
    #[test]
    fn writable() {
        assert!(!Charset.is_writable());
        assert!(Program.is_writable());
    }
}

mod timing {
    use super::*;

    #[test]
    fn from_str() {
        assert_eq!(Timing::Instruction, "instruction".parse::<Timing>().unwrap());
        assert_eq!(Timing::Instruction, "Cycle".parse::<Timing>().unwrap());
        assert_eq!(Timing::External, "external".parse::<Timing>().unwrap());
        assert_eq!(Timing::External, "FRAME".parse::<Timing>().unwrap());
        assert_eq!(Timing::External, "60hz".parse::<Timing>().unwrap());
    }
    #[test]
    fn from_str_invalid() {
        assert!(matches!(
            "sometimes".parse::<Timing>(),
            Err(Error::InvalidTiming { timing }) if timing == "sometimes"
        ));
    }
    #[test]
    fn default() {
        assert_eq!(Timing::Instruction, Timing::default());
    }
}

mod mem {
    use super::*;

    #[test]
    fn display() {
        let mem = Mem::default();
        println!("{mem}");
        println!("{}", mem.window(0x000..0x050).unwrap());
    }
    #[test]
    fn debug() {
        println!("{:?}", Mem::new());
    }
    #[test]
    fn clone() {
        let mut mem = Mem::new();
        mem.write(0x300, 0xc5).unwrap();
        let mem2 = mem.clone();
        assert_eq!(mem, mem2);
    }
    #[test]
    fn len() {
        let mem = Mem::new();
        assert_eq!(0x1000, mem.len());
        assert!(!mem.is_empty());
    }
    #[test]
    fn window_out_of_bounds() {
        assert!(Mem::new().window(0xff0..0x1010).is_err());
    }
    #[test]
    fn read() {
        let mut mem = Mem::new();
        mem.write(0xfff, 0x12).unwrap();
        assert_eq!(0x12, mem.read(0xfff).unwrap());
        assert!(mem.read_word(0xfff).is_err());
    }
    #[test]
    fn clear_region() {
        let mut mem = Mem::new();
        mem.load_program(&[0xff; 0x10]).unwrap();
        mem.clear_region(Program).clear_region(Charset);
        assert!(mem.get_region(Program).iter().all(|&b| b == 0));
        assert_eq!(&FONT[..], mem.get_region(Charset));
    }
}

mod screen {
    use super::*;

    #[test]
    fn display() {
        let screen = Screen::default();
        let text = screen.to_string();
        // Two rows of pixels per line
        assert_eq!(HEIGHT / 2, text.lines().count());
    }
    #[test]
    fn debug() {
        println!("{:?}", Screen::new());
    }
    #[test]
    fn get() {
        let screen = Screen::new();
        assert_eq!(WIDTH * HEIGHT, screen.pixels().len());
        assert_eq!(Some(false), screen.get(WIDTH - 1, HEIGHT - 1));
        assert_eq!(None, screen.get(0, HEIGHT));
    }
    #[test]
    fn clear() {
        let mut screen = Screen::new();
        assert!(!screen.is_dirty());
        screen.clear();
        assert!(screen.is_dirty());
        screen.clear_dirty();
        assert!(!screen.is_dirty());
    }
}

mod insn {
    use super::*;
    use imperative_rs::InstructionSet;

    #[test]
    #[allow(clippy::clone_on_copy)]
    fn clone() {
        let opcode = Insn::decode(&[0xef, 0xa1]).unwrap().1; // random valid opcode
        let clone = opcode.clone();
        assert_eq!(opcode, clone);
    }
    #[test]
    fn debug() {
        println!("{:?}", Insn::decode(b"AA")) // "sne #41, v1"
    }
    #[test]
    fn display() {
        let (_, insn) = Insn::decode(&[0xd0, 0x15]).unwrap();
        assert_eq!("draw   #5, v0, v1", insn.to_string());
    }
}

#[test]
fn error() {
    let error = Error::ReadOnlyRegion {
        range: 0x10..0x20,
        region: Charset,
    };
    // Print it with Display and Debug
    println!("{error} {error:?}");
    let error = Error::UnimplementedInstruction { word: 0xffff };
    assert_eq!("opcode ffff not recognized", error.to_string());
}
