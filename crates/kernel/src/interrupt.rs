use log::{info, warn};
use serde::Serialize;
use types::{HypoError, Result, Word};
use vm::registers::Register;

use crate::kernel::Kernel;
use crate::pcb::{Pcb, WaitReason};

pub const INTERRUPT_NONE: Word = 0;
pub const INTERRUPT_RUN_PROGRAM: Word = 1;
pub const INTERRUPT_SHUTDOWN: Word = 2;
pub const INTERRUPT_INPUT_COMPLETION: Word = 3;
pub const INTERRUPT_OUTPUT_COMPLETION: Word = 4;

/// External event delivered to the kernel between scheduling cycles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interrupt {
    None,
    RunProgram { program: String, priority: Word },
    Shutdown,
    InputCompletion { pid: Word, input: char },
    OutputCompletion { pid: Word },
}

impl Interrupt {
    pub fn id(&self) -> Word {
        match self {
            Interrupt::None => INTERRUPT_NONE,
            Interrupt::RunProgram { .. } => INTERRUPT_RUN_PROGRAM,
            Interrupt::Shutdown => INTERRUPT_SHUTDOWN,
            Interrupt::InputCompletion { .. } => INTERRUPT_INPUT_COMPLETION,
            Interrupt::OutputCompletion { .. } => INTERRUPT_OUTPUT_COMPLETION,
        }
    }
}

/// What an interrupt handler did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum InterruptOutcome {
    Ignored,
    Created { pid: Word },
    /// The process got its character and is ready again.
    InputDelivered { pid: Word },
    /// The process's character was written out; it is ready again.
    Output { pid: Word, value: Word },
    /// No waiting process had this PID.
    PidNotFound { pid: Word },
    ShutDown { terminated: Vec<Word> },
}

impl Kernel {
    /// Interrupt service routine dispatch.
    ///
    /// Process creation failures come back as errors for the caller to log;
    /// an unknown PID on a completion is not an error.
    pub fn handle_interrupt(&mut self, interrupt: &Interrupt) -> Result<InterruptOutcome> {
        match interrupt {
            Interrupt::None => Ok(InterruptOutcome::Ignored),
            Interrupt::RunProgram { program, priority } => {
                let pcb = self.create_process(program, *priority)?;
                Ok(InterruptOutcome::Created {
                    pid: pcb.pid(&self.vm.memory),
                })
            }
            Interrupt::Shutdown => self.isr_shutdown(),
            Interrupt::InputCompletion { pid, input } => self.isr_input_completion(*pid, *input),
            Interrupt::OutputCompletion { pid } => self.isr_output_completion(*pid),
        }
    }

    fn isr_input_completion(&mut self, pid: Word, input: char) -> Result<InterruptOutcome> {
        let Some(pcb) = self.take_waiting(pid, WaitReason::InputCompletion)? else {
            return Ok(InterruptOutcome::PidNotFound { pid });
        };
        let memory = &mut self.vm.memory;
        pcb.set_gpr(memory, Register::R1, Word::from(u32::from(input)));
        pcb.set_reason(memory, WaitReason::None);
        self.ready.insert(memory, pcb)?;
        info!("pid {} received input {:?}", pid, input);
        Ok(InterruptOutcome::InputDelivered { pid })
    }

    fn isr_output_completion(&mut self, pid: Word) -> Result<InterruptOutcome> {
        let Some(pcb) = self.take_waiting(pid, WaitReason::OutputCompletion)? else {
            return Ok(InterruptOutcome::PidNotFound { pid });
        };
        let memory = &mut self.vm.memory;
        let value = pcb.gpr(memory, Register::R1);
        pcb.set_reason(memory, WaitReason::None);
        self.ready.insert(memory, pcb)?;
        match u32::try_from(value).ok().and_then(char::from_u32) {
            Some(c) => info!("pid {} output {:?}", pid, c),
            None => info!("pid {} output {}", pid, value),
        }
        Ok(InterruptOutcome::Output { pid, value })
    }

    /// Pulls `pid` out of the wait queue. A process waiting for the other kind
    /// of completion is still released.
    fn take_waiting(&mut self, pid: Word, expected: WaitReason) -> Result<Option<Pcb>> {
        match self.waiting.search_and_remove(&mut self.vm.memory, pid) {
            Ok(pcb) => {
                let reason = pcb.reason(&self.vm.memory);
                if reason != Some(expected) {
                    warn!("pid {} was waiting for {:?}, got {:?}", pid, reason, expected);
                }
                Ok(Some(pcb))
            }
            Err(HypoError::PidNotFound) => {
                warn!("no waiting process with pid {}", pid);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Terminates every process. Waiting processes are first made ready so
    /// that every termination goes through the ready queue.
    fn isr_shutdown(&mut self) -> Result<InterruptOutcome> {
        while let Some(pcb) = self.waiting.pop(&mut self.vm.memory)? {
            pcb.set_reason(&mut self.vm.memory, WaitReason::None);
            self.ready.insert(&mut self.vm.memory, pcb)?;
        }
        let mut terminated = Vec::new();
        while let Some(pcb) = self.ready.select(&mut self.vm.memory)? {
            terminated.push(pcb.pid(&self.vm.memory));
            self.terminate_process(pcb)?;
        }
        self.shut_down = true;
        info!("shutdown: terminated {:?}", terminated);
        Ok(InterruptOutcome::ShutDown { terminated })
    }
}
