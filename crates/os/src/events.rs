//! Scripted interrupt source.
//!
//! One event per line; `#` starts a comment:
//!
//! ```text
//! run add.hypo 128
//! none
//! input 1 A
//! output 2
//! shutdown
//! ```

use anyhow::{Context, Result, anyhow, bail};
use kernel::Interrupt;
use types::Word;

/// Parses a whole script. Errors name the offending line.
pub fn parse_script(text: &str, default_priority: Word) -> Result<Vec<Interrupt>> {
    let mut events = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let event = parse_event(line, default_priority)
            .with_context(|| format!("line {}: {:?}", n + 1, line))?;
        events.push(event);
    }
    Ok(events)
}

pub fn parse_event(line: &str, default_priority: Word) -> Result<Interrupt> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let Some((&keyword, args)) = fields.split_first() else {
        bail!("empty event");
    };
    let event = match (keyword, args) {
        ("none" | "0", []) => Interrupt::None,
        ("run" | "1", [program]) => Interrupt::RunProgram {
            program: program.to_string(),
            priority: default_priority,
        },
        ("run" | "1", [program, priority]) => Interrupt::RunProgram {
            program: program.to_string(),
            priority: priority.parse().context("priority")?,
        },
        ("shutdown" | "2", []) => Interrupt::Shutdown,
        ("input" | "3", [pid, input]) => Interrupt::InputCompletion {
            pid: pid.parse().context("pid")?,
            input: single_char(input)?,
        },
        ("output" | "4", [pid]) => Interrupt::OutputCompletion {
            pid: pid.parse().context("pid")?,
        },
        _ => bail!("unknown event or wrong number of arguments"),
    };
    Ok(event)
}

fn single_char(text: &str) -> Result<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(anyhow!("expected a single character, got {:?}", text)),
    }
}
