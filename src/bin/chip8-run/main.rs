// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! chip8-run: runs a Chip-8 program in the terminal
//!
//! The screen is printed with half-block characters. Keys can be held down
//! for the whole run with `--key`.

use chip8_core::{error::Result, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{
    path::PathBuf,
    process::ExitCode,
    time::{Duration, Instant},
};

#[cfg(test)]
mod tests;

pub fn main() -> Result<ExitCode> {
    env_logger::init();
    let options = Arguments::parse_args_default_or_exit();
    let mut state = State::new(options)?;
    let result = run(&mut state);
    state.cpu.dump();
    print!("{}", state.cpu.screen());
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{}", e.bold().red());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Runs frames until the cycle limit is reached, or the interpreter halts
fn run(state: &mut State) -> Result<()> {
    for result in state {
        result?;
    }
    Ok(())
}

/// Parses a hexadecimal string into a key number
fn parse_hex(value: &str) -> std::result::Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(value, 16)
}

#[derive(Clone, Debug, PartialEq, Eq, Options)]
struct Arguments {
    #[options(help = "Load a ROM to run.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Log every instruction (set RUST_LOG=debug to see them).")]
    pub debug: bool,

    #[options(help = "Set the instructions-per-frame rate (at least 1).", default = "10")]
    pub speed: usize,
    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,
    #[options(help = "Decrement timers per (instruction, frame).")]
    pub timing: Option<Timing>,
    #[options(help = "Stop after this many instructions.")]
    pub cycles: Option<usize>,

    #[options(
        help = "Hold a key (0-f) down for the whole run. May be repeated.",
        parse(try_from_str = "parse_hex"),
        meta = "KEY"
    )]
    pub key: Vec<u8>,
    #[options(no_short, help = "Seed the random number generator.")]
    pub seed: Option<u64>,
    #[options(help = "Redraw the screen whenever it changes.")]
    pub watch: bool,
}

#[derive(Debug)]
struct State {
    pub speed: usize,
    pub rate: u64,
    pub remaining: Option<usize>,
    pub watch: bool,
    pub cpu: CPU,
    pub ft: Instant,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let mut cpu = CPU::new();
        cpu.flags = Flags {
            debug: options.debug,
            timing: options.timing.unwrap_or_default(),
            ..Default::default()
        };
        if let Some(seed) = options.seed {
            cpu.seed(seed);
        }
        cpu.load_program(&options.file)?;
        for key in options.key {
            cpu.press(key as usize)?;
        }
        Ok(State {
            speed: options.speed.max(1),
            rate: options.frame_rate.max(1),
            remaining: options.cycles,
            watch: options.watch,
            cpu,
            ft: Instant::now(),
        })
    }
    /// Runs one frame's worth of instructions, or whatever's left of the cycle limit
    fn tick_cpu(&mut self) -> Result<()> {
        let steps = match self.remaining {
            Some(remaining) => {
                let steps = remaining.min(self.speed);
                self.remaining = Some(remaining - steps);
                steps
            }
            None => self.speed,
        };
        self.cpu.multistep(steps)?;
        if self.cpu.take_sound_stop() {
            log::info!("sound stopped at cycle {}", self.cpu.cycle());
        }
        Ok(())
    }
    fn frame(&mut self) {
        if !self.watch {
            return;
        }
        if let Some(screen) = self.cpu.frame() {
            // Home the cursor, so frames overwrite each other
            print!("\x1b[H{screen}");
        }
    }
    fn wait_for_next_frame(&mut self) {
        let rate = Duration::from_nanos(1_000_000_000 / self.rate + 1);
        std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
        self.ft += rate;
    }
}

impl Iterator for State {
    type Item = Result<()>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            return None;
        }
        self.wait_for_next_frame();
        if let Err(e) = self.tick_cpu() {
            return Some(Err(e));
        }
        self.frame();
        Some(Ok(()))
    }
}
