//! Interactive step debugger.
//!
//! Implements the core's [`StepDebugger`] capability with a small command
//! loop on stdin. The driver consults it after every instruction; answering
//! `c` detaches it for the rest of the run.

use std::io::{self, BufRead, Write};

use simulator_core::{Machine, StepDebugger};

use crate::print::{format_cpu, format_data, format_program};

const HELP_TEXT: &str = "\
Available commands:
  h     help
  c     continue (leave interactive debug mode)
  s     step to the next instruction (empty line works too)
  r     print registers
  d     print data memory
  t, p  print text (program) memory
  m     print registers and data memory
";

/// What a debugger command asks for: either resume the simulation (staying
/// attached or not), or print something and prompt again.
enum Reply {
    Resume { keep: bool },
    Print(String),
}

fn reply(command: &str, machine: &Machine) -> Reply {
    match command {
        "c" => Reply::Resume { keep: false },
        "" | "s" => Reply::Resume { keep: true },
        "h" => Reply::Print(HELP_TEXT.to_owned()),
        "r" => Reply::Print(format_cpu(machine)),
        "d" => Reply::Print(format_data(machine)),
        "t" | "p" => Reply::Print(format_program(machine)),
        "m" => Reply::Print(format!("{}{}", format_cpu(machine), format_data(machine))),
        other => Reply::Print(format!("unknown command '{other}' (h for help)\n")),
    }
}

/// Step debugger reading operator commands from stdin.
///
/// End of input detaches, so piped runs never hang on the prompt.
#[derive(Debug, Default)]
pub struct InteractiveDebugger;

impl InteractiveDebugger {
    /// Creates the debugger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StepDebugger for InteractiveDebugger {
    fn keep_debugging(&mut self, machine: &Machine) -> bool {
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("DEBUG? ");
            let _ = io::stdout().flush();

            line.clear();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return false,
                Ok(_) => {}
            }

            match reply(line.trim(), machine) {
                Reply::Resume { keep } => return keep,
                Reply::Print(text) => print!("{text}"),
            }
        }
    }
}
