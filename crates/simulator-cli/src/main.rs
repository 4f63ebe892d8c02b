//! CLI entry point for the `srm-sim` binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use simulator_cli::debug::InteractiveDebugger;
use simulator_cli::image::{encode_image, parse_image};
use simulator_cli::print::{format_cpu, format_data, format_program};
use simulator_core::{format_instruction, Driver, Instruction, Machine, TraceSink};
#[cfg(test)]
use tempfile as _;
use thiserror as _;

const USAGE_TEXT: &str = "\
Usage: srm-sim <command> [options]

Commands:
  run <image> [-d] [-t] [--dump <file>]  Load and execute a program image
  show <image>                           Print the program and initial data

Options:
  -d, --debug        Attach the interactive step debugger
  -t, --trace        Trace each executed instruction
      --dump <file>  Write a reloadable binary dump after the run
  -h, --help         Show this help message

Examples:
  srm-sim run program.bin
  srm-sim run program.bin -d --dump dump.prog
  srm-sim show program.bin
";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(RunArgs),
    Show(ShowArgs),
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    image: PathBuf,
    debug: bool,
    trace: bool,
    dump: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
struct ShowArgs {
    image: PathBuf,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParseResult::Command),
        "show" => parse_show_args(args)
            .map(Command::Show)
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

#[allow(clippy::while_let_on_iterator)]
fn parse_run_args(mut args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut image: Option<PathBuf> = None;
    let mut debug = false;
    let mut trace = false;
    let mut dump: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--debug" || arg == "-d" {
            debug = true;
            continue;
        }

        if arg == "--trace" || arg == "-t" {
            trace = true;
            continue;
        }

        if arg == "--dump" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --dump".to_string())?;
            dump = Some(PathBuf::from(value));
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if image.is_some() {
            return Err("multiple image paths provided".to_string());
        }
        image = Some(PathBuf::from(arg));
    }

    let image = image.ok_or_else(|| "missing image path".to_string())?;
    Ok(RunArgs {
        image,
        debug,
        trace,
        dump,
    })
}

fn parse_show_args(args: impl Iterator<Item = OsString>) -> Result<ShowArgs, String> {
    let mut image: Option<PathBuf> = None;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if image.is_some() {
            return Err("multiple image paths provided".to_string());
        }
        image = Some(PathBuf::from(arg));
    }

    let image = image.ok_or_else(|| "missing image path".to_string())?;
    Ok(ShowArgs { image })
}

fn load_machine(path: &Path) -> Result<Machine, i32> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", path.display());
            return Err(1);
        }
    };
    let program = match parse_image(&bytes) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("error: {}: {e}", path.display());
            return Err(1);
        }
    };
    let mut machine = Machine::new();
    machine.load(program);
    Ok(machine)
}

struct ConsoleTracer;

impl TraceSink for ConsoleTracer {
    fn on_step(&mut self, _machine: &Machine, instr: &Instruction, addr: u32) {
        println!("TRACE: Executing: {addr:#06x}: {}", format_instruction(instr));
    }
}

fn run_run(args: RunArgs) -> Result<(), i32> {
    let mut machine = load_machine(&args.image)?;

    let mut tracer = ConsoleTracer;
    let mut debugger = InteractiveDebugger::new();
    let mut driver = Driver::new();
    if args.trace {
        driver = driver.with_tracer(&mut tracer);
    }
    if args.debug {
        driver = driver.with_debugger(&mut debugger);
    }

    match driver.run(&mut machine) {
        Ok(outcome) => {
            println!(
                "WARNING: HALT reached at address {:#06x}",
                outcome.halt_address
            );
        }
        Err(fault) => {
            eprintln!("ERROR: {fault}");
            return Err(1);
        }
    }

    print!("{}", format_cpu(&machine));
    print!("{}", format_data(&machine));

    if let Some(path) = args.dump {
        if let Err(e) = fs::write(&path, encode_image(&machine)) {
            eprintln!("error: failed to write dump {}: {e}", path.display());
            return Err(1);
        }
    }

    Ok(())
}

fn run_show(args: &ShowArgs) -> Result<(), i32> {
    let machine = load_machine(&args.image)?;
    print!("{}", format_program(&machine));
    print!("{}", format_data(&machine));
    Ok(())
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(Command::Run(args))) => match run_run(args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Ok(ParseResult::Command(Command::Show(args))) => match run_show(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}
