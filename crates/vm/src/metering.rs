use types::Word;

use crate::instruction::Instruction;

/// Outcome returned by metering hooks to indicate whether execution should continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterResult {
    Continue,
    Halt,
}

/// Pluggable metering interface. The CPU reports every executed instruction
/// with its clock cost; the meter decides when the run has to stop.
pub trait Metering: std::fmt::Debug {
    /// Called after each instruction executes.
    fn on_instruction(&mut self, _pc: Word, _instr: &Instruction, _cost: u64) -> MeterResult {
        MeterResult::Continue
    }
}

/// Default metering that performs no accounting. A program run under it only
/// stops on halt, block or error.
#[derive(Debug, Default)]
pub struct NoopMeter;

impl Metering for NoopMeter {}

/// Fixed clock budget for one dispatch of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlice {
    budget: u64,
    remaining: u64,
}

impl TimeSlice {
    pub fn new(budget: u64) -> Self {
        Self {
            budget,
            remaining: budget,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn consumed(&self) -> u64 {
        self.budget - self.remaining
    }
}

impl Metering for TimeSlice {
    fn on_instruction(&mut self, _pc: Word, _instr: &Instruction, cost: u64) -> MeterResult {
        self.remaining = self.remaining.saturating_sub(cost);
        if self.remaining == 0 {
            MeterResult::Halt
        } else {
            MeterResult::Continue
        }
    }
}
