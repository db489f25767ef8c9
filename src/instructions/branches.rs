//! # Branch Instructions
//!
//! All branch instructions use relative addressing with a signed 8-bit offset.
//! The resolver has already computed the target and whether it lies in a different
//! page from the instruction that follows the branch.
//!
//! Cycle timing:
//! - 2 cycles if branch not taken
//! - 3 cycles if branch taken to same page
//! - 4 cycles if branch taken to different page

use crate::addressing::Operand;
use crate::{Cpu, Instruction, MemoryBus};

/// Evaluates the flag test for a branch instruction.
///
/// Non-branch instructions never branch.
pub(crate) fn condition_met<M: MemoryBus>(cpu: &Cpu<M>, instruction: Instruction) -> bool {
    match instruction {
        Instruction::Bcc => !cpu.flag_c,
        Instruction::Bcs => cpu.flag_c,
        Instruction::Beq => cpu.flag_z,
        Instruction::Bne => !cpu.flag_z,
        Instruction::Bmi => cpu.flag_n,
        Instruction::Bpl => !cpu.flag_n,
        Instruction::Bvs => cpu.flag_v,
        Instruction::Bvc => !cpu.flag_v,
        _ => false,
    }
}

/// Moves PC to the branch target when `taken`, charging the extra cycles.
pub(crate) fn execute_branch<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand, taken: bool) {
    if !taken {
        return;
    }

    if let Some(target) = operand.address() {
        cpu.pc = target;
        cpu.pending_cycles += 1;
        if operand.page_crossed {
            cpu.pending_cycles += 1;
        }
    }
}
