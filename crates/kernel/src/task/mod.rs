// Process lifecycle (kernel side)
// -------------------------------
// READY --select--> RUNNING --time slice expired--> READY
//                   RUNNING --io_getc / io_putc--> WAITING --completion--> READY
//                   RUNNING --halt / fault--> TERMINATED
//
// launch.rs:  create_process(program, priority)
//   1) PCB from the OS pool, zeroed, PID + priority + READY.
//   2) Program image through the loader; its entry point becomes the saved PC.
//   3) Stack from the user pool. SP starts one below the stack (empty, grows up).
//   4) PSR = user mode, then into the ready queue.
//   Any failure gives back what was already allocated and does not use up a PID.
//
// context.rs: save_context / dispatch
//   Copy GPR0..7, SP, PC and PSR between the CPU and the PCB. Dispatch also
//   forces user mode and arms the CPU's stack bounds for the process.
//
// run.rs:     run_once()
//   One scheduling cycle: take the ready queue head, dispatch it, run it for
//   one time slice, then requeue, park or terminate it based on the outcome.
//
// terminate_process frees the stack to the user pool and the PCB to the OS
// pool. Nothing else refers to a terminated PCB afterwards.

pub mod context;
pub mod launch;
pub mod run;

pub use context::{dispatch, save_context};
pub use run::{CycleOutcome, CycleReport};
