// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Tests for the frame loop
use super::*;
use std::fs;

/// Writes `rom` to a temp file, and builds a [State] that runs it quickly
fn setup_environment(name: &str, rom: &[u8], speed: usize, cycles: Option<usize>) -> State {
    let file = std::env::temp_dir().join(format!("chip8-run-{}-{name}", std::process::id()));
    fs::write(&file, rom).expect("Temp dir should be writable");
    let state = State::new(Arguments {
        file: file.clone(),
        help: false,
        debug: false,
        speed,
        frame_rate: 1000,
        timing: None,
        cycles,
        key: vec![],
        seed: Some(0),
        watch: false,
    })
    .expect("ROM should load");
    fs::remove_file(file).expect("Temp file should be removable");
    state
}

#[test]
fn runs_to_cycle_limit() {
    // jmp 200
    let mut state = setup_environment("limit.ch8", &[0x12, 0x00], 10, Some(25));
    run(&mut state).expect("Spinning is not an error");
    assert_eq!(25, state.cpu.cycle());
}

#[test]
fn zero_speed_still_finishes() {
    let mut state = setup_environment("zero.ch8", &[0x12, 0x00], 0, Some(3));
    assert_eq!(1, state.speed);
    run(&mut state).expect("Spinning is not an error");
    assert_eq!(3, state.cpu.cycle());
}

#[test]
fn fatal_error_is_reported() {
    // mov #05, vA; then an invalid word
    let mut state = setup_environment("fatal.ch8", &[0x6a, 0x05, 0xff, 0xff], 10, None);
    assert!(matches!(
        run(&mut state),
        Err(Error::UnimplementedInstruction { word: 0xffff })
    ));
    assert!(state.cpu.flags.halted);
    assert_eq!(0x05, state.cpu.v()[0xa]);
}

#[test]
fn held_keys() {
    // waitk v0
    let rom = [0xf0, 0x0a, 0x12, 0x02];
    let file = std::env::temp_dir().join(format!("chip8-run-{}-keys.ch8", std::process::id()));
    fs::write(&file, rom).unwrap();
    let mut state = State::new(Arguments {
        file: file.clone(),
        help: false,
        debug: false,
        speed: 4,
        frame_rate: 1000,
        timing: Some(Timing::External),
        cycles: Some(4),
        key: vec![0xb, 0x7],
        seed: None,
        watch: false,
    })
    .unwrap();
    fs::remove_file(file).unwrap();
    run(&mut state).unwrap();
    assert_eq!(0x7, state.cpu.v()[0]);
    assert_eq!(0x202, state.cpu.pc());
}
