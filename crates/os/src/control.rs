use kernel::{CycleOutcome, CycleReport, Interrupt, InterruptOutcome, Kernel};
use log::{debug, error, info, warn};
use serde::Serialize;
use types::{HypoError, Word};

/// A character a process wrote through io_putc.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessOutput {
    pub pid: Word,
    pub value: Word,
}

/// What a whole run of the control loop did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub cycles: u64,
    pub idle_cycles: u64,
    pub created: Vec<Word>,
    pub terminated: Vec<Word>,
    pub faulted: Vec<(Word, HypoError)>,
    pub outputs: Vec<ProcessOutput>,
    pub failed_events: u64,
}

impl RunSummary {
    /// Characters written by `pid`, in order.
    pub fn output_of(&self, pid: Word) -> String {
        self.outputs
            .iter()
            .filter(|o| o.pid == pid)
            .filter_map(|o| u32::try_from(o.value).ok().and_then(char::from_u32))
            .collect()
    }

    fn record_cycle(&mut self, report: &CycleReport) {
        self.cycles += 1;
        match report.outcome {
            CycleOutcome::Terminated => self.terminated.push(report.pid),
            CycleOutcome::Faulted(e) => self.faulted.push((report.pid, e)),
            CycleOutcome::Preempted | CycleOutcome::Blocked(_) => {}
        }
    }

    fn record_interrupt(&mut self, outcome: InterruptOutcome) {
        match outcome {
            InterruptOutcome::Created { pid } => self.created.push(pid),
            InterruptOutcome::Output { pid, value } => {
                self.outputs.push(ProcessOutput { pid, value })
            }
            InterruptOutcome::ShutDown { terminated } => self.terminated.extend(terminated),
            InterruptOutcome::Ignored
            | InterruptOutcome::InputDelivered { .. }
            | InterruptOutcome::PidNotFound { .. } => {}
        }
    }
}

/// Drives the kernel: one interrupt, then one scheduling cycle, until the
/// events run out.
///
/// Once the script is exhausted the loop keeps scheduling until nothing is
/// ready or `max_cycles` is reached, then shuts the kernel down. A process
/// still waiting at that point can never be released and is terminated by
/// the shutdown.
#[derive(Debug)]
pub struct ControlLoop {
    max_cycles: u64,
}

impl ControlLoop {
    pub const DEFAULT_MAX_CYCLES: u64 = 10_000;

    pub fn new(max_cycles: u64) -> Self {
        Self { max_cycles }
    }

    pub fn run(
        &self,
        kernel: &mut Kernel,
        events: impl IntoIterator<Item = Interrupt>,
    ) -> Result<RunSummary, HypoError> {
        let mut summary = RunSummary::default();
        let mut events = events.into_iter();

        while !kernel.is_shut_down() && summary.cycles + summary.idle_cycles < self.max_cycles {
            let event = match events.next() {
                Some(event) => event,
                None if kernel.ready_queue().is_empty() => break,
                None => Interrupt::None,
            };
            self.deliver(kernel, &event, &mut summary);
            if kernel.is_shut_down() {
                break;
            }

            match kernel.run_once()? {
                Some(report) => {
                    debug!("cycle {}: {:?}", summary.cycles + 1, report);
                    summary.record_cycle(&report);
                }
                None => summary.idle_cycles += 1,
            }
        }

        if !kernel.is_shut_down() {
            if summary.cycles + summary.idle_cycles >= self.max_cycles {
                warn!("stopping after {} cycles", self.max_cycles);
            }
            self.deliver(kernel, &Interrupt::Shutdown, &mut summary);
        }
        info!(
            "run finished: {} cycles, {} terminated, {} faulted",
            summary.cycles,
            summary.terminated.len(),
            summary.faulted.len()
        );
        Ok(summary)
    }

    fn deliver(&self, kernel: &mut Kernel, event: &Interrupt, summary: &mut RunSummary) {
        match kernel.handle_interrupt(event) {
            Ok(outcome) => summary.record_interrupt(outcome),
            Err(e) => {
                error!("interrupt {} failed: {}", event.id(), e);
                summary.failed_events += 1;
            }
        }
    }
}

impl Default for ControlLoop {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_CYCLES)
    }
}
