use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::*;
use kernel::{Config, Interrupt, Kernel};
use os::{ControlLoop, FileLoader, Report, RunSummary, logger, parse_script};
use types::Word;

/// Runs HYPO programs under the multitasking kernel.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Program files to start at boot, optionally suffixed with `@priority`
    programs: Vec<String>,

    /// Interrupt script, one event per line (run / input / output / none / shutdown)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Directory program names are resolved against
    #[arg(short = 'd', long, default_value = ".")]
    program_dir: PathBuf,

    /// JSON machine configuration; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the time slice in clock units
    #[arg(long)]
    time_slice: Option<u64>,

    /// Override the per-process stack size in words
    #[arg(long)]
    stack_size: Option<Word>,

    /// Override the priority used when none is given
    #[arg(long)]
    priority: Option<Word>,

    /// Stop scheduling after this many cycles
    #[arg(long, default_value_t = ControlLoop::DEFAULT_MAX_CYCLES)]
    max_cycles: u64,

    /// Print the final summary and machine snapshot as JSON
    #[arg(long)]
    json: bool,

    /// More logging; repeat for debug and instruction traces
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    logger::init(logger::level_for(args.verbose)).context("installing logger")?;

    let config = load_config(&args)?;
    let mut events = Vec::new();
    for program in &args.programs {
        events.push(program_event(program, config.default_priority)?);
    }
    if let Some(path) = &args.script {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        let script = parse_script(&text, config.default_priority)
            .with_context(|| format!("parsing script {}", path.display()))?;
        events.extend(script);
    }
    if events.is_empty() {
        bail!("nothing to run: pass program files or --script");
    }

    let loader = FileLoader::new(&args.program_dir);
    let mut kernel = Kernel::boot(config, Box::new(loader)).context("booting kernel")?;
    let summary = ControlLoop::new(args.max_cycles)
        .run(&mut kernel, events)
        .context("kernel state corrupted")?;

    if args.json {
        println!("{}", Report::capture(&kernel, &summary)?.to_json()?);
    } else {
        print_summary(&summary, kernel.clock());
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(time_slice) = args.time_slice {
        config.time_slice = time_slice;
    }
    if let Some(stack_size) = args.stack_size {
        config.stack_size = stack_size;
    }
    if let Some(priority) = args.priority {
        config.default_priority = priority;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn program_event(arg: &str, default_priority: Word) -> Result<Interrupt> {
    let (program, priority) = match arg.rsplit_once('@') {
        Some((program, priority)) => (
            program,
            priority
                .parse()
                .with_context(|| format!("bad priority in {:?}", arg))?,
        ),
        None => (arg, default_priority),
    };
    Ok(Interrupt::RunProgram {
        program: program.to_string(),
        priority,
    })
}

fn print_summary(summary: &RunSummary, clock: u64) {
    println!("{}", "HYPO run summary".bold().blue());
    println!("{}", "================".blue());
    for pid in &summary.created {
        let output = summary.output_of(*pid);
        if output.is_empty() {
            println!("  pid {}", pid);
        } else {
            println!("  pid {} output {:?}", pid, output);
        }
    }
    for (pid, e) in &summary.faulted {
        println!("  {} pid {}: {}", "fault".red().bold(), pid, e);
    }
    if summary.failed_events > 0 {
        println!("  {} {} events failed", "warning".yellow().bold(), summary.failed_events);
    }
    println!(
        "{} cycles ({} idle), clock {}, {} terminated",
        summary.cycles,
        summary.idle_cycles,
        clock,
        summary.terminated.len()
    );
}
