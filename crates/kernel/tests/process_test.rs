use kernel::{
    Config, CycleOutcome, Interrupt, InterruptOutcome, Kernel, ProcessState, ProgramImage,
    StaticLoader, WaitReason,
};
use types::{HypoError, Word};
use vm::decoder::encode;
use vm::instruction::{Instruction, OperandSpec as Op};
use vm::isa::Opcode;
use vm::registers::{Psr, Register::*};

fn w(opcode: Opcode, op1: Op, op2: Op) -> Word {
    encode(&Instruction::new(opcode, op1, op2))
}

fn w1(opcode: Opcode, op1: Op) -> Word {
    encode(&Instruction::unary(opcode, op1))
}

const HALT: Word = 0;

fn sys(call_id: Word) -> [Word; 2] {
    [w1(Opcode::SystemCall, Op::immediate()), call_id]
}

/// 150 two-unit moves and a halt: more than one time slice of work.
fn long_program() -> Vec<Word> {
    let mut code = Vec::new();
    for _ in 0..150 {
        code.push(w(Opcode::Move, Op::register(R0), Op::immediate()));
        code.push(1);
    }
    code.push(HALT);
    code
}

fn boot_with(programs: &[(&str, Word, Vec<Word>)]) -> Kernel {
    boot_config(Config::default(), programs)
}

fn boot_config(config: Config, programs: &[(&str, Word, Vec<Word>)]) -> Kernel {
    let mut loader = StaticLoader::new();
    for (name, start, code) in programs {
        loader.insert(*name, ProgramImage::contiguous(*start, code));
    }
    Kernel::boot(config, Box::new(loader)).unwrap()
}

fn free_words(kernel: &Kernel) -> (Word, Word) {
    (
        kernel.os_pool().free_words(kernel.memory()).unwrap(),
        kernel.user_pool().free_words(kernel.memory()).unwrap(),
    )
}

#[test]
fn test_move_add_halt_scenario() {
    let add = vec![
        w(Opcode::Move, Op::register(R0), Op::immediate()),
        5,
        w(Opcode::Add, Op::register(R0), Op::immediate()),
        2,
        HALT,
    ];
    let mut kernel = boot_with(&[("add", 0, add)]);
    let pcb = kernel.create_process("add", 128).unwrap();
    assert_eq!(pcb.pid(kernel.memory()), 1);

    let report = kernel.run_once().unwrap().unwrap();
    assert_eq!(report.pid, 1);
    assert_eq!(report.outcome, CycleOutcome::Terminated);
    assert_eq!(kernel.registers().gpr[0], 7);
    assert_eq!(kernel.registers().psr, Psr::UserMode);
    assert!(kernel.ready_pcbs().unwrap().is_empty());
    assert_eq!(free_words(&kernel), (5500, 2000));
}

#[test]
fn test_create_process_initial_state() {
    let mut kernel = boot_with(&[("p", 40, vec![HALT])]);
    let pcb = kernel.create_process("p", 99).unwrap();
    let snap = kernel.pcb_snapshot(pcb);

    assert_eq!(snap.address.index(), 4500);
    assert_eq!(snap.pid, 1);
    assert_eq!(snap.state, Some(ProcessState::Ready));
    assert_eq!(snap.priority, 99);
    assert_eq!(snap.pc, 40);
    assert_eq!(snap.stack_start, 2500);
    assert_eq!(snap.stack_size, Config::STACK_SIZE);
    assert_eq!(snap.sp, 2499);
    assert_eq!(snap.psr, Psr::UserMode.code());
    assert_eq!(kernel.ready_pcbs().unwrap(), vec![pcb]);
}

#[test]
fn test_failed_create_consumes_nothing() {
    let mut kernel = boot_with(&[("p", 0, vec![HALT])]);
    kernel.create_process("p", 1).unwrap();
    let before = free_words(&kernel);

    assert_eq!(kernel.create_process("missing", 1), Err(HypoError::FileOpen));
    assert_eq!(free_words(&kernel), before);
    assert_eq!(kernel.next_pid(), 2);

    let pcb = kernel.create_process("p", 1).unwrap();
    assert_eq!(pcb.pid(kernel.memory()), 2);
}

#[test]
fn test_stack_exhaustion_rolls_back_pcb() {
    let config = Config {
        stack_size: 2000,
        ..Config::default()
    };
    let image = vec![w(Opcode::Move, Op::register(R0), Op::immediate()), 42, HALT];
    let mut kernel = boot_config(config, &[("p", 0, vec![HALT]), ("q", 100, image)]);
    kernel.create_process("p", 1).unwrap();

    assert_eq!(kernel.create_process("q", 1), Err(HypoError::NoFreeMemory));
    assert_eq!(free_words(&kernel), (5500 - 22, 0));
    assert_eq!(kernel.next_pid(), 2);
    assert_eq!(kernel.ready_pcbs().unwrap().len(), 1);
    // The image stays in the program area; only pool memory is rolled back.
    assert_eq!(kernel.memory().load(101), Ok(42));
}

#[test]
fn test_time_slice_preempts_and_resumes() {
    let mut kernel = boot_with(&[("long", 0, long_program())]);
    let pcb = kernel.create_process("long", 128).unwrap();

    let report = kernel.run_once().unwrap().unwrap();
    assert_eq!(report.outcome, CycleOutcome::Preempted);
    assert_eq!(report.clock, 200);
    assert_eq!(pcb.pc(kernel.memory()), 200);
    assert_eq!(pcb.state(kernel.memory()), Some(ProcessState::Ready));
    assert_eq!(kernel.ready_pcbs().unwrap(), vec![pcb]);

    let report = kernel.run_once().unwrap().unwrap();
    assert_eq!(report.outcome, CycleOutcome::Terminated);
    assert_eq!(kernel.clock(), 200 + 100 + 12);
}

#[test]
fn test_higher_priority_runs_first() {
    let mut kernel = boot_with(&[("a", 0, vec![HALT]), ("b", 100, vec![HALT])]);
    kernel.create_process("a", 10).unwrap();
    kernel.create_process("b", 200).unwrap();

    assert_eq!(kernel.run_once().unwrap().unwrap().pid, 2);
    assert_eq!(kernel.run_once().unwrap().unwrap().pid, 1);
    assert_eq!(kernel.run_once().unwrap(), None);
}

#[test]
fn test_equal_priority_round_robin() {
    let mut kernel = boot_with(&[("a", 0, long_program()), ("b", 400, long_program())]);
    kernel.create_process("a", 128).unwrap();
    kernel.create_process("b", 128).unwrap();

    let order: Vec<Word> = (0..4).map(|_| kernel.run_once().unwrap().unwrap().pid).collect();
    assert_eq!(order, vec![1, 2, 1, 2]);
}

#[test]
fn test_getc_blocks_until_input_completion() {
    let mut code = sys(8).to_vec();
    code.extend([w(Opcode::Move, Op::register(R2), Op::register(R1)), HALT]);
    let mut kernel = boot_with(&[("getc", 0, code)]);
    let pcb = kernel.create_process("getc", 128).unwrap();

    let report = kernel.run_once().unwrap().unwrap();
    assert_eq!(report.outcome, CycleOutcome::Blocked(WaitReason::InputCompletion));
    assert_eq!(kernel.waiting_pcbs().unwrap(), vec![pcb]);
    assert_eq!(pcb.reason(kernel.memory()), Some(WaitReason::InputCompletion));
    assert_eq!(pcb.pc(kernel.memory()), 2);
    assert_eq!(kernel.run_once().unwrap(), None);

    let outcome = kernel
        .handle_interrupt(&Interrupt::InputCompletion { pid: 1, input: 'A' })
        .unwrap();
    assert_eq!(outcome, InterruptOutcome::InputDelivered { pid: 1 });
    assert_eq!(pcb.gpr(kernel.memory(), R1), 65);
    assert!(kernel.waiting_pcbs().unwrap().is_empty());
    assert_eq!(kernel.ready_pcbs().unwrap(), vec![pcb]);

    let report = kernel.run_once().unwrap().unwrap();
    assert_eq!(report.outcome, CycleOutcome::Terminated);
    assert_eq!(kernel.registers().get(R2), 65);
}

#[test]
fn test_putc_reports_output() {
    let mut code = vec![w(Opcode::Move, Op::register(R1), Op::immediate()), 72];
    code.extend(sys(9));
    code.push(HALT);
    let mut kernel = boot_with(&[("putc", 0, code)]);
    kernel.create_process("putc", 128).unwrap();

    let report = kernel.run_once().unwrap().unwrap();
    assert_eq!(report.outcome, CycleOutcome::Blocked(WaitReason::OutputCompletion));

    let outcome = kernel.handle_interrupt(&Interrupt::OutputCompletion { pid: 1 }).unwrap();
    assert_eq!(outcome, InterruptOutcome::Output { pid: 1, value: 72 });
    assert_eq!(kernel.run_once().unwrap().unwrap().outcome, CycleOutcome::Terminated);
}

#[test]
fn test_completion_for_unknown_pid_is_ignored() {
    let mut kernel = boot_with(&[("p", 0, vec![HALT])]);
    kernel.create_process("p", 1).unwrap();

    let outcome = kernel.handle_interrupt(&Interrupt::OutputCompletion { pid: 42 }).unwrap();
    assert_eq!(outcome, InterruptOutcome::PidNotFound { pid: 42 });
    let outcome = kernel
        .handle_interrupt(&Interrupt::InputCompletion { pid: 1, input: 'x' })
        .unwrap();
    // pid 1 exists but is ready, not waiting.
    assert_eq!(outcome, InterruptOutcome::PidNotFound { pid: 1 });
    assert_eq!(kernel.ready_pcbs().unwrap().len(), 1);
}

#[test]
fn test_mem_alloc_and_free_syscalls() {
    let mut code = vec![w(Opcode::Move, Op::register(R2), Op::immediate()), 5];
    code.extend(sys(4));
    code.extend([w(Opcode::Move, Op::register(R4), Op::register(R1))]);
    code.extend(sys(5));
    code.push(HALT);
    let mut kernel = boot_with(&[("mem", 0, code)]);
    kernel.create_process("mem", 128).unwrap();

    kernel.run_once().unwrap().unwrap();
    // Stack takes 2500..2509, so the allocation lands right after it.
    assert_eq!(kernel.registers().get(R4), 2510);
    assert_eq!(kernel.registers().get(R0), 0);
    assert_eq!(free_words(&kernel), (5500, 2000));
}

#[test]
fn test_mem_alloc_rejects_bad_size() {
    let mut code = vec![w(Opcode::Move, Op::register(R2), Op::immediate()), 0];
    code.extend(sys(4));
    code.push(HALT);
    let mut kernel = boot_with(&[("mem", 0, code)]);
    kernel.create_process("mem", 128).unwrap();

    kernel.run_once().unwrap().unwrap();
    assert_eq!(kernel.registers().get(R0), HypoError::InvalidMemorySize.code());
}

#[test]
fn test_mem_free_outside_pool_reports_error() {
    let mut code = vec![
        w(Opcode::Move, Op::register(R1), Op::immediate()),
        100,
        w(Opcode::Move, Op::register(R2), Op::immediate()),
        4,
    ];
    code.extend(sys(5));
    code.push(HALT);
    let mut kernel = boot_with(&[("mem", 0, code)]);
    kernel.create_process("mem", 128).unwrap();

    kernel.run_once().unwrap().unwrap();
    assert_eq!(kernel.registers().get(R0), HypoError::InvalidMemoryAddress.code());
}

#[test]
fn test_mem_free_twice_is_refused() {
    let mut code = vec![w(Opcode::Move, Op::register(R2), Op::immediate()), 10];
    code.extend(sys(4));
    code.extend(sys(5));
    code.extend(sys(5));
    code.extend([
        w(Opcode::Move, Op::register(R5), Op::register(R0)),
        w(Opcode::Move, Op::register(R2), Op::immediate()),
        5000,
    ]);
    code.extend(sys(4));
    code.push(HALT);
    let mut kernel = boot_with(&[("mem", 0, code)]);
    kernel.create_process("mem", 128).unwrap();

    let report = kernel.run_once().unwrap().unwrap();
    assert_eq!(report.outcome, CycleOutcome::Terminated);
    assert_eq!(kernel.registers().get(R5), HypoError::InvalidSizeOrMemoryAddress.code());
    assert_eq!(kernel.registers().get(R0), HypoError::NoFreeMemory.code());
    assert_eq!(free_words(&kernel), (5500, 2000));
}

#[test]
fn test_corrupted_free_list_fails_the_syscall() {
    // [2510] is the user pool head once the stack is taken; link it to itself.
    let mut code = vec![w(Opcode::Move, Op::direct(), Op::immediate()), 2510, 2510];
    code.extend([w(Opcode::Move, Op::register(R2), Op::immediate()), 5000]);
    code.extend(sys(4));
    code.push(HALT);
    let mut kernel = boot_with(&[("mem", 0, code)]);
    kernel.create_process("mem", 128).unwrap();

    let report = kernel.run_once().unwrap().unwrap();
    assert_eq!(report.outcome, CycleOutcome::Terminated);
    assert_eq!(kernel.registers().get(R0), HypoError::InvalidMemoryAddress.code());
    assert_eq!(kernel.registers().get(R1), HypoError::InvalidMemoryAddress.code());
    assert_eq!(kernel.os_pool().free_words(kernel.memory()).unwrap(), 5500);
}

#[test]
fn test_bad_free_node_size_fails_the_syscall() {
    let mut code = vec![w(Opcode::Move, Op::direct(), Op::immediate()), 2511, Word::MIN];
    code.extend([w(Opcode::Move, Op::register(R2), Op::immediate()), 2]);
    code.extend(sys(4));
    code.push(HALT);
    let mut kernel = boot_with(&[("mem", 0, code)]);
    kernel.create_process("mem", 128).unwrap();

    let report = kernel.run_once().unwrap().unwrap();
    assert_eq!(report.outcome, CycleOutcome::Terminated);
    assert_eq!(kernel.registers().get(R0), HypoError::InvalidMemoryAddress.code());
}

#[test]
fn test_unknown_syscall_sets_invalid_id() {
    let mut code = sys(99).to_vec();
    code.push(HALT);
    let mut kernel = boot_with(&[("p", 0, code)]);
    kernel.create_process("p", 128).unwrap();

    let report = kernel.run_once().unwrap().unwrap();
    assert_eq!(report.outcome, CycleOutcome::Terminated);
    assert_eq!(kernel.registers().get(R0), HypoError::InvalidId.code());
}

#[test]
fn test_process_inquiry() {
    let mut code = sys(3).to_vec();
    code.push(HALT);
    let mut kernel = boot_with(&[("p", 0, code)]);
    kernel.create_process("p", 77).unwrap();

    kernel.run_once().unwrap().unwrap();
    let regs = kernel.registers();
    assert_eq!(regs.gpr[0], 0);
    assert_eq!(regs.gpr[1], 1);
    assert_eq!(regs.gpr[2], 77);
    assert_eq!(regs.gpr[3], ProcessState::Running.code());
}

#[test]
fn test_fault_terminates_only_the_faulting_process() {
    let bad = vec![
        w(Opcode::Move, Op::register(R1), Op::immediate()),
        0,
        w(Opcode::Divide, Op::register(R0), Op::register(R1)),
        HALT,
    ];
    let mut kernel = boot_with(&[("bad", 0, bad), ("good", 100, vec![HALT])]);
    kernel.create_process("bad", 200).unwrap();
    let good = kernel.create_process("good", 10).unwrap();

    let report = kernel.run_once().unwrap().unwrap();
    assert_eq!(report.pid, 1);
    assert_eq!(report.outcome, CycleOutcome::Faulted(HypoError::DivideByZero));
    assert_eq!(kernel.ready_pcbs().unwrap(), vec![good]);

    assert_eq!(kernel.run_once().unwrap().unwrap().outcome, CycleOutcome::Terminated);
    assert_eq!(free_words(&kernel), (5500, 2000));
}

#[test]
fn test_stack_in_process() {
    let ok = vec![w1(Opcode::Push, Op::immediate()), 5, w1(Opcode::Pop, Op::register(R0)), HALT];
    let mut kernel = boot_with(&[("ok", 0, ok)]);
    kernel.create_process("ok", 1).unwrap();
    assert_eq!(kernel.run_once().unwrap().unwrap().outcome, CycleOutcome::Terminated);
    assert_eq!(kernel.registers().get(R0), 5);

    let mut overflow = Vec::new();
    for i in 0..11 {
        overflow.push(w1(Opcode::Push, Op::immediate()));
        overflow.push(i);
    }
    overflow.push(HALT);
    let mut kernel = boot_with(&[("overflow", 0, overflow)]);
    kernel.create_process("overflow", 1).unwrap();
    assert_eq!(
        kernel.run_once().unwrap().unwrap().outcome,
        CycleOutcome::Faulted(HypoError::StackOverflow)
    );
}

#[test]
fn test_shutdown_releases_everything() {
    let mut getc = sys(8).to_vec();
    getc.push(HALT);
    let mut kernel = boot_with(&[("getc", 0, getc), ("long", 100, long_program())]);
    kernel.create_process("getc", 200).unwrap();
    kernel.create_process("long", 10).unwrap();
    kernel.run_once().unwrap().unwrap();
    assert_eq!(kernel.waiting_pcbs().unwrap().len(), 1);

    let outcome = kernel.handle_interrupt(&Interrupt::Shutdown).unwrap();
    assert_eq!(outcome, InterruptOutcome::ShutDown { terminated: vec![1, 2] });
    assert!(kernel.is_shut_down());
    assert!(kernel.ready_pcbs().unwrap().is_empty());
    assert!(kernel.waiting_pcbs().unwrap().is_empty());
    assert_eq!(free_words(&kernel), (5500, 2000));
}

#[test]
fn test_run_program_interrupt() {
    let mut kernel = boot_with(&[("p", 0, vec![HALT])]);
    let outcome = kernel
        .handle_interrupt(&Interrupt::RunProgram {
            program: "p".into(),
            priority: 5,
        })
        .unwrap();
    assert_eq!(outcome, InterruptOutcome::Created { pid: 1 });
    assert_eq!(kernel.handle_interrupt(&Interrupt::None).unwrap(), InterruptOutcome::Ignored);

    let err = kernel.handle_interrupt(&Interrupt::RunProgram {
        program: "nope".into(),
        priority: 5,
    });
    assert_eq!(err, Err(HypoError::FileOpen));
}

#[test]
fn test_snapshot_reflects_queues() {
    let mut kernel = boot_with(&[("p", 0, vec![HALT])]);
    kernel.create_process("p", 3).unwrap();
    let snapshot = kernel.snapshot().unwrap();
    assert_eq!(snapshot.ready.len(), 1);
    assert_eq!(snapshot.ready[0].pid, 1);
    assert!(snapshot.waiting.is_empty());
    assert_eq!(snapshot.user_free.len(), 1);
    assert_eq!(snapshot.user_free[0].size, 1990);
}
