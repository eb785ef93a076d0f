// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Selects how the [super::CPU]'s timers keep time

use crate::error::Error;
use std::str::FromStr;

/// Selects who is responsible for counting down the delay and sound timers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Timers count down once per executed instruction
    #[default]
    Instruction,
    /// Timers only count down when the host calls [super::CPU::tick_timers]
    External,
}

impl FromStr for Timing {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "instruction" | "cycle" => Ok(Timing::Instruction),
            "external" | "frame" | "60hz" => Ok(Timing::External),
            _ => Err(Error::InvalidTiming {
                timing: s.to_string(),
            }),
        }
    }
}
