use log::{debug, info, warn};
use serde::Serialize;
use types::{HypoError, Result, Status, Word};
use vm::metering::TimeSlice;

use crate::kernel::Kernel;
use crate::pcb::{Pcb, ProcessState, WaitReason};
use crate::syscall::KernelSyscalls;
use crate::task::context::{dispatch, save_context};

/// What happened to the process that held the CPU during a cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum CycleOutcome {
    /// Time slice used up; back in the ready queue.
    Preempted,
    /// Parked in the wait queue.
    Blocked(WaitReason),
    /// Halted normally.
    Terminated,
    /// Killed by a runtime error.
    Faulted(HypoError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub pid: Word,
    pub outcome: CycleOutcome,
    /// Clock after the cycle.
    pub clock: u64,
}

impl Kernel {
    /// Runs one scheduling cycle. Returns `None` when nothing is ready.
    pub fn run_once(&mut self) -> Result<Option<CycleReport>> {
        let Some(pcb) = self.ready.select(&mut self.vm.memory)? else {
            debug!("ready queue empty, idle cycle");
            return Ok(None);
        };
        let pid = pcb.pid(&self.vm.memory);

        dispatch(&mut self.vm.cpu, &self.vm.memory, pcb);
        pcb.set_state(&mut self.vm.memory, ProcessState::Running);
        self.running = Some(pcb);
        debug!("dispatched pid {} at pc {}", pid, self.vm.cpu.regs.pc);

        let mut meter = TimeSlice::new(self.config.time_slice);
        let mut syscalls = KernelSyscalls::new(&mut self.user_pool, pcb);
        let status = self.vm.run(&mut meter, &mut syscalls);
        self.running = None;

        let outcome = match status {
            Ok(Status::Halted) => {
                info!("pid {} halted", pid);
                self.terminate_process(pcb)?;
                CycleOutcome::Terminated
            }
            Ok(Status::WaitingForInput) => self.park(pcb, WaitReason::InputCompletion)?,
            Ok(Status::WaitingForOutput) => self.park(pcb, WaitReason::OutputCompletion)?,
            Ok(Status::TimeSliceExpired | Status::Ok) => {
                save_context(&self.vm.cpu, &mut self.vm.memory, pcb);
                self.ready.insert(&mut self.vm.memory, pcb)?;
                CycleOutcome::Preempted
            }
            Err(e) => {
                warn!("pid {} faulted at pc {}: {}", pid, self.vm.cpu.regs.pc, e);
                self.terminate_process(pcb)?;
                CycleOutcome::Faulted(e)
            }
        };

        Ok(Some(CycleReport {
            pid,
            outcome,
            clock: self.clock(),
        }))
    }

    fn park(&mut self, pcb: Pcb, reason: WaitReason) -> Result<CycleOutcome> {
        save_context(&self.vm.cpu, &mut self.vm.memory, pcb);
        pcb.set_reason(&mut self.vm.memory, reason);
        self.waiting.insert(&mut self.vm.memory, pcb)?;
        Ok(CycleOutcome::Blocked(reason))
    }
}
