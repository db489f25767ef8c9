//! # Flag Instructions
//!
//! CLC, SEC, CLI, SEI, CLD, SED, CLV. Each sets or clears exactly one flag.

use crate::{Cpu, Instruction, MemoryBus};

/// Executes a set/clear flag instruction.
pub(crate) fn execute_flag_op<M: MemoryBus>(cpu: &mut Cpu<M>, instruction: Instruction) {
    match instruction {
        Instruction::Clc => cpu.flag_c = false,
        Instruction::Sec => cpu.flag_c = true,
        Instruction::Cli => cpu.flag_i = false,
        Instruction::Sei => cpu.flag_i = true,
        // D is kept in P for PHP/PLP but has no effect on arithmetic
        Instruction::Cld => cpu.flag_d = false,
        Instruction::Sed => cpu.flag_d = true,
        Instruction::Clv => cpu.flag_v = false,
        _ => {}
    }
}
