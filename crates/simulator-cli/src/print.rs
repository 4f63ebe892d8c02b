//! Human-readable listings of machine state.
//!
//! These render the post-run reports and the debugger's `r`/`d`/`p` views:
//! registers and data in hex-and-decimal columns, three per row, and the
//! program as one disassembled line per instruction.

#![allow(clippy::cast_possible_wrap)]

use simulator_core::{disassemble, Machine, Register};

/// Formats the program counter, condition code, and register file.
#[must_use]
pub fn format_cpu(machine: &Machine) -> String {
    let mut out = String::from("\n*** CPU ***\n");
    out.push_str(&format!(
        "PC: {:#010x}  CC: {}\n",
        machine.pc(),
        machine.cc().letter()
    ));
    for row in Register::ALL.chunks(3) {
        out.push('\n');
        for reg in row {
            let value = machine.reg(*reg);
            out.push_str(&format!("R{:02} {value:#010x} {}\t", reg.index(), value as i32));
        }
    }
    out.push('\n');
    out
}

/// Formats the data segment with its size and static/stack split.
#[must_use]
pub fn format_data(machine: &Machine) -> String {
    let mut out = format!(
        "\n*** DATA (size: {}, end = {:#010x} ({})) ***\n",
        machine.datasize(),
        machine.dataend(),
        machine.dataend()
    );
    for (row_index, row) in machine.data_words().chunks(3).enumerate() {
        out.push('\n');
        for (col, value) in row.iter().enumerate() {
            let addr = row_index * 3 + col;
            out.push_str(&format!("{addr:#06x}: {value:#010x} {}\t", *value as i32));
        }
    }
    out.push('\n');
    out
}

/// Formats the text segment as a disassembly listing.
#[must_use]
pub fn format_program(machine: &Machine) -> String {
    let mut out = format!("\n*** PROGRAM (size: {}) ***\n", machine.textsize());
    for (addr, word) in machine.text_words().iter().enumerate() {
        out.push_str(&format!("{addr:#06x}: {}\n", disassemble(*word)));
    }
    out
}
