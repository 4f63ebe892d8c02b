//! The fetch/decode/execute loop.
//!
//! The driver exclusively owns the machine for the duration of a run. It is
//! the only place a run ends: handlers report `HALT` or a fault upward, and
//! the driver turns them into a [`RunOutcome`] or a propagated [`Fault`].
//! Observation hooks are injected collaborators, so the core runs and tests
//! without any interactive dependency.

use crate::decoder::{decode, Instruction};
use crate::execute::{execute, StepOutcome};
use crate::fault::{Fault, FaultKind};
use crate::state::{Machine, RunState};

/// Interactive collaborator consulted after each executed instruction.
pub trait StepDebugger {
    /// Decides whether to stay attached. It may block on operator input;
    /// returning `false` detaches for the remainder of the run, and a
    /// detached debugger is never consulted again.
    fn keep_debugging(&mut self, machine: &Machine) -> bool;
}

/// Passive observer of each instruction about to execute.
pub trait TraceSink {
    /// Called once per fetched instruction, before its handler runs.
    fn on_step(&mut self, machine: &Machine, instr: &Instruction, addr: u32);
}

/// Summary of a run that ended at `HALT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Instructions executed, the `HALT` included.
    pub steps: u64,
    /// Text address of the `HALT` instruction.
    pub halt_address: u32,
}

/// Fetches, decodes, and executes exactly one instruction.
///
/// The program counter advances past the instruction before it executes, so
/// handlers observe the updated `pc` while faults report the instruction's
/// own address.
///
/// # Errors
///
/// Any fatal [`Fault`], including [`FaultKind::TextSegmentation`] when `pc`
/// has left the text segment.
pub fn step(machine: &mut Machine) -> Result<StepOutcome, Fault> {
    let addr = machine.pc();
    let word = fetch(machine, addr)?;
    machine.set_pc(addr.wrapping_add(1));
    let instr = decode(word);
    execute(machine, &instr, addr)
}

fn fetch(machine: &Machine, addr: u32) -> Result<u32, Fault> {
    machine
        .fetch(addr)
        .ok_or_else(|| Fault::new(FaultKind::TextSegmentation, addr))
}

/// The simulation loop with its optional collaborators attached.
#[derive(Default)]
pub struct Driver<'a> {
    debugger: Option<&'a mut dyn StepDebugger>,
    tracer: Option<&'a mut dyn TraceSink>,
}

impl<'a> Driver<'a> {
    /// A driver with no collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a step debugger for this run.
    #[must_use]
    pub fn with_debugger(mut self, debugger: &'a mut dyn StepDebugger) -> Self {
        self.debugger = Some(debugger);
        self
    }

    /// Attaches a trace sink for this run.
    #[must_use]
    pub fn with_tracer(mut self, tracer: &'a mut dyn TraceSink) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Runs the machine until `HALT` or a fatal fault.
    ///
    /// # Errors
    ///
    /// The first fatal [`Fault`] raised by any instruction. The machine is
    /// left as the faulting instruction left it; only the caller decides
    /// whether that ends the process.
    pub fn run(mut self, machine: &mut Machine) -> Result<RunOutcome, Fault> {
        let mut state = RunState::Running;
        let mut steps = 0u64;
        let mut halt_address = 0u32;

        while state.is_running() {
            let addr = machine.pc();
            let word = fetch(machine, addr)?;
            machine.set_pc(addr.wrapping_add(1));
            let instr = decode(word);

            if let Some(tracer) = self.tracer.as_mut() {
                tracer.on_step(machine, &instr, addr);
            }

            match execute(machine, &instr, addr)? {
                StepOutcome::Continue => {}
                StepOutcome::Halted => {
                    state = RunState::Halted;
                    halt_address = addr;
                }
            }
            steps += 1;

            if state.is_running() {
                if let Some(debugger) = self.debugger.as_mut() {
                    if !debugger.keep_debugging(machine) {
                        // Detaching is one-way for the rest of the run.
                        self.debugger = None;
                    }
                }
            }
        }

        Ok(RunOutcome {
            steps,
            halt_address,
        })
    }
}
