//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - JMP: Jump (absolute and indirect)
//! - JSR: Jump to Subroutine
//! - RTS: Return from Subroutine
//! - RTI: Return from Interrupt
//! - BRK: Force Interrupt

use crate::addressing::Operand;
use crate::cpu::{BREAK, IRQ_VECTOR, UNUSED};
use crate::{Cpu, MemoryBus};

/// Executes the JMP instruction. No flags are affected.
pub(crate) fn execute_jmp<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    if let Some(target) = operand.address() {
        cpu.pc = target;
    }
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Pushes the address of the last byte of the JSR (PC - 1), high byte first, then
/// jumps to the target.
///
/// ```text
/// 0x8000: JSR $1234    ; pushes 0x8002, PC = 0x1234
/// ```
pub(crate) fn execute_jsr<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    if let Some(target) = operand.address() {
        let return_addr = cpu.pc.wrapping_sub(1);
        cpu.push_word(return_addr);
        cpu.pc = target;
    }
}

/// Executes the RTS (Return from Subroutine) instruction.
///
/// Pulls the return address (low byte first) and resumes one past it.
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let return_addr = cpu.pull_word();
    cpu.pc = return_addr.wrapping_add(1);
}

/// Executes the RTI (Return from Interrupt) instruction.
///
/// Pulls P (bits 4 and 5 discarded), then PC. Unlike RTS, the pulled PC is used
/// as-is.
pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let status = cpu.pull();
    cpu.set_status(status);
    cpu.pc = cpu.pull_word();
}

/// Executes the BRK (Force Interrupt) instruction.
///
/// BRK is a two-byte instruction: the byte after the opcode is padding and the
/// pushed return address skips it. P is pushed with the Break and unused bits
/// set, I is set, and PC is loaded from the IRQ/BRK vector.
pub(crate) fn execute_brk<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let return_addr = cpu.pc.wrapping_add(1);
    cpu.push_word(return_addr);
    cpu.push(cpu.status() | BREAK | UNUSED);
    cpu.flag_i = true;
    cpu.pc = cpu.read_word(IRQ_VECTOR);
}
