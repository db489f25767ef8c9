//! # Register Transfer Instructions
//!
//! TAX, TAY, TXA, TYA, TSX set N and Z from the copied value. TXS does not touch
//! the flags.

use crate::{Cpu, MemoryBus};

pub(crate) fn execute_tax<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.a;
    cpu.set_nz(cpu.x);
}

pub(crate) fn execute_tay<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.y = cpu.a;
    cpu.set_nz(cpu.y);
}

pub(crate) fn execute_txa<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.a = cpu.x;
    cpu.set_nz(cpu.a);
}

pub(crate) fn execute_tya<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.a = cpu.y;
    cpu.set_nz(cpu.a);
}

pub(crate) fn execute_tsx<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.sp;
    cpu.set_nz(cpu.x);
}

/// Executes TXS. Flags are unaffected.
pub(crate) fn execute_txs<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.sp = cpu.x;
}
