// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Saving and restoring a [CPU] through serde
#![cfg(feature = "serde")]
use chip8_core::prelude::*;
use serde_json::{json, Value};

fn setup_environment() -> CPU {
    let mut cpu = CPU::default();
    cpu.load_program_bytes(&[
        0x6a, 0x05, // mov  #05, vA
        0x22, 0x08, // call 208
        0x12, 0x04, // jmp  204
        0x00, 0x00, // padding
        0xfa, 0x29, // font vA, I
        0xd0, 0x05, // draw #5, v0, v0
        0x12, 0x0c, // jmp  20c
    ])
    .expect("Test program should fit in memory");
    cpu.multistep(4).expect("Test program should run");
    cpu
}

fn snapshot(cpu: &CPU) -> Value {
    serde_json::to_value(cpu).expect("CPU should serialize")
}

fn restore(snapshot: Value) -> serde_json::Result<CPU> {
    serde_json::from_value(snapshot)
}

#[test]
fn round_trip() {
    let mut cpu = setup_environment();
    let mut restored = restore(snapshot(&cpu)).expect("Snapshot should be valid");
    assert_eq!(cpu.pc(), restored.pc());
    assert_eq!(cpu.stack(), restored.stack());
    assert_eq!(cpu.v(), restored.v());
    assert_eq!(cpu.i(), restored.i());
    assert_eq!(cpu.mem(), restored.mem());
    assert_eq!(cpu.screen(), restored.screen());
    // Both carry on the same way
    cpu.multistep(8).unwrap();
    restored.multistep(8).unwrap();
    assert_eq!(cpu.pc(), restored.pc());
    assert_eq!(cpu.cycle(), restored.cycle());
}

#[test]
fn stack_too_deep() {
    let mut value = snapshot(&setup_environment());
    value["sp"] = json!(40);
    assert!(restore(value).is_err());
}

#[test]
fn stack_full() {
    let mut value = snapshot(&setup_environment());
    value["sp"] = json!(16);
    let cpu = restore(value).expect("A full stack is valid");
    assert_eq!(16, cpu.stack().len());
}

#[test]
fn memory_too_short() {
    let mut value = snapshot(&setup_environment());
    value["mem"]["memory"] = json!([0, 0]);
    assert!(restore(value).is_err());
}

#[test]
fn font_overwritten() {
    let mut value = snapshot(&setup_environment());
    value["mem"]["memory"][0] = json!(0x00);
    assert!(restore(value).is_err());
}

#[test]
fn screen_too_short() {
    let mut value = snapshot(&setup_environment());
    value["screen"]["pixels"] = json!(vec![1; 64]);
    assert!(restore(value).is_err());
}

#[test]
fn screen_bad_pixel() {
    let mut value = snapshot(&setup_environment());
    value["screen"]["pixels"][0] = json!(2);
    assert!(restore(value).is_err());
}

#[test]
fn error_message() {
    let mut value = snapshot(&setup_environment());
    value["sp"] = json!(17);
    let error = restore(value).expect_err("sp is past the end of the stack");
    assert!(error.to_string().contains("invalid snapshot"));
}
