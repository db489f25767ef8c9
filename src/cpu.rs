//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the 6502 processor state and
//! the fetch-decode-execute loop.
//!
//! ## CPU State
//!
//! - **Registers**: Accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of next instruction
//! - **Stack pointer** (SP): 8-bit offset into stack page (0x0100-0x01FF)
//! - **Status flags**: N, V, D, I, Z, C (Break and the unused bit only exist on the
//!   copies of P pushed to the stack)
//! - **Cycle counter**: u64 monotonically increasing cycle count
//!
//! ## Execution Model
//!
//! One instruction moves through `FETCH -> ADDRESS_RESOLVE -> EXECUTE`, then the
//! CPU services any pending interrupt. In virtual time (`step`,
//! `run_for_cycles`) the next fetch follows immediately. In real time (`run`) the
//! CPU arms the `CycleGate` with the cycles just spent and waits for the clock to
//! count them down before fetching again.

use crate::addressing::{IndexRegister, OperandLocation};
use crate::opcodes::{decode, OpcodeEntry};
use crate::{instructions, CycleGate, MemoryBus, PowerSwitch};

/// Carry flag mask.
pub const CARRY: u8 = 0b0000_0001;
/// Zero flag mask.
pub const ZERO: u8 = 0b0000_0010;
/// Interrupt disable flag mask.
pub const IRQ_DISABLE: u8 = 0b0000_0100;
/// Decimal flag mask.
pub const DECIMAL: u8 = 0b0000_1000;
/// Break bit, present only in pushed copies of P.
pub const BREAK: u8 = 0b0001_0000;
/// Unused bit, present only in pushed copies of P.
pub const UNUSED: u8 = 0b0010_0000;
/// Overflow flag mask.
pub const OVERFLOW: u8 = 0b0100_0000;
/// Negative flag mask.
pub const NEGATIVE: u8 = 0b1000_0000;

/// NMI vector address.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector address.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector address.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Base of the hardware stack page.
pub const STACK_PAGE: u16 = 0x0100;

/// Cycles spent entering an interrupt handler.
const INTERRUPT_CYCLES: u32 = 7;

/// 6502 CPU state and execution context.
///
/// Generic over the memory implementation via the `MemoryBus` trait.
///
/// # Examples
///
/// ```
/// use nes6502::{Cpu, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00);
/// memory.write(0xFFFD, 0x80);
///
/// let mut cpu = Cpu::new(memory);
/// assert_eq!(cpu.pc(), 0x0000);
///
/// cpu.boot();
/// assert_eq!(cpu.pc(), 0x8000);
/// assert_eq!(cpu.sp(), 0xFF);
/// assert!(cpu.flag_i());
/// ```
pub struct Cpu<M: MemoryBus> {
    /// Accumulator register
    pub(crate) a: u8,

    /// X index register
    pub(crate) x: u8,

    /// Y index register
    pub(crate) y: u8,

    /// Program counter (address of next instruction)
    pub(crate) pc: u16,

    /// Stack pointer (0x0100 + sp gives full stack address)
    pub(crate) sp: u8,

    pub(crate) flag_n: bool,
    pub(crate) flag_v: bool,
    pub(crate) flag_d: bool,
    pub(crate) flag_i: bool,
    pub(crate) flag_z: bool,
    pub(crate) flag_c: bool,

    /// Total CPU cycles executed
    pub(crate) cycles: u64,

    /// Cycles owed by the instruction in flight
    pub(crate) pending_cycles: u32,

    /// Latched NMI edge, serviced after the current instruction
    nmi_pending: bool,

    /// Memory bus implementation
    pub(crate) memory: M,
}

impl<M: MemoryBus> Cpu<M> {
    /// Creates a powered-down CPU attached to `memory`.
    ///
    /// All registers are zero and the Interrupt Disable flag is set. Call `boot`
    /// to load PC from the reset vector.
    pub fn new(memory: M) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: 0,
            flag_n: false,
            flag_v: false,
            flag_d: false,
            flag_i: true,
            flag_z: false,
            flag_c: false,
            cycles: 0,
            pending_cycles: 0,
            nmi_pending: false,
            memory,
        }
    }

    /// Power-on: loads PC from the reset vector at 0xFFFC/0xFFFD and sets SP to 0xFF.
    pub fn boot(&mut self) {
        self.sp = 0xFF;
        self.pc = self.read_word(RESET_VECTOR);
        log::info!("cpu: boot, reset vector -> PC=0x{:04X}", self.pc);
    }

    /// Soft reset: SP drops by three (the suppressed pushes), I is set, and PC is
    /// reloaded from the reset vector. Other registers keep their values.
    pub fn reset(&mut self) {
        self.sp = self.sp.wrapping_sub(3);
        self.flag_i = true;
        self.nmi_pending = false;
        self.pc = self.read_word(RESET_VECTOR);
        log::info!("cpu: reset, PC=0x{:04X}", self.pc);
    }

    /// Executes one instruction, then services a pending NMI or IRQ.
    ///
    /// Returns the number of cycles consumed, interrupt entry included.
    ///
    /// # Examples
    ///
    /// ```
    /// use nes6502::{Cpu, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFC, 0x00);
    /// mem.write(0xFFFD, 0x80);
    /// mem.write(0x8000, 0xEA); // NOP
    ///
    /// let mut cpu = Cpu::new(mem);
    /// cpu.boot();
    ///
    /// assert_eq!(cpu.step(), 2);
    /// assert_eq!(cpu.pc(), 0x8001);
    /// ```
    pub fn step(&mut self) -> u32 {
        let pc = self.pc;
        let (opcode, entry) = self.decode_next_instruction();
        let mut cycles = self.execute_instruction(entry);

        log::trace!(
            "{:04X}  {:02X}  {}  {} cycles",
            pc,
            opcode,
            entry.instruction.mnemonic(),
            cycles
        );

        cycles += self.poll_interrupts();
        cycles
    }

    /// Runs the CPU for a specified number of cycles in virtual time.
    ///
    /// Returns the cycles actually consumed, which may overshoot the budget by
    /// part of one instruction.
    ///
    /// # Examples
    ///
    /// ```
    /// use nes6502::{Cpu, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFC, 0x00);
    /// mem.write(0xFFFD, 0x80);
    /// for addr in 0x8000..0x8010 {
    ///     mem.write(addr, 0xEA); // NOP, 2 cycles
    /// }
    ///
    /// let mut cpu = Cpu::new(mem);
    /// cpu.boot();
    ///
    /// assert_eq!(cpu.run_for_cycles(10), 10);
    /// assert_eq!(cpu.pc(), 0x8005);
    /// ```
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> u64 {
        let start_cycles = self.cycles;
        let target_cycles = start_cycles.saturating_add(cycle_budget);

        while self.cycles < target_cycles {
            self.step();
        }

        self.cycles - start_cycles
    }

    /// Runs gated by `gate` until `power` is switched off.
    ///
    /// Each iteration waits for the gate to open, executes one instruction, and
    /// re-arms the gate with that instruction's cycle count.
    pub fn run(&mut self, gate: &CycleGate, power: &PowerSwitch) {
        while gate.wait(power) {
            let cycles = self.step();
            gate.arm(cycles);
        }
    }

    /// Latches a non-maskable interrupt, serviced after the current instruction.
    pub fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Enters the IRQ handler now unless interrupts are disabled.
    ///
    /// Returns the cycles spent (0 when masked).
    pub fn irq(&mut self) -> u32 {
        if self.flag_i {
            return 0;
        }
        self.interrupt(IRQ_VECTOR);
        self.cycles += INTERRUPT_CYCLES as u64;
        INTERRUPT_CYCLES
    }

    // ========== Fetch / Decode / Execute ==========

    /// Reads the opcode at PC, advances PC, and looks the opcode up in the matrix.
    fn decode_next_instruction(&mut self) -> (u8, &'static OpcodeEntry) {
        let opcode = self.fetch_byte();
        (opcode, decode(opcode))
    }

    /// Resolves the operand and runs the instruction, returning its cycle cost.
    pub(crate) fn execute_instruction(&mut self, entry: &OpcodeEntry) -> u32 {
        self.pending_cycles = entry.base_cycles as u32;

        let operand = self.resolve(entry.addressing_mode);
        if operand.page_crossed && entry.instruction.pays_page_penalty() {
            self.pending_cycles += 1;
        }

        instructions::execute(self, entry.instruction, operand);

        self.cycles += self.pending_cycles as u64;
        self.pending_cycles
    }

    fn poll_interrupts(&mut self) -> u32 {
        if self.nmi_pending {
            self.nmi_pending = false;
            self.interrupt(NMI_VECTOR);
        } else if !self.flag_i && self.memory.irq_active() {
            self.interrupt(IRQ_VECTOR);
        } else {
            return 0;
        }
        self.cycles += INTERRUPT_CYCLES as u64;
        INTERRUPT_CYCLES
    }

    /// Hardware interrupt entry: push PC and P (Break clear), set I, jump via vector.
    fn interrupt(&mut self, vector: u16) {
        log::debug!(
            "cpu: interrupt via 0x{:04X} from PC=0x{:04X}",
            vector,
            self.pc
        );
        self.push_word(self.pc);
        self.push((self.status() | UNUSED) & !BREAK);
        self.flag_i = true;
        self.pc = self.read_word(vector);
    }

    // ========== Bus Helpers ==========

    pub(crate) fn fetch_byte(&mut self) -> u8 {
        let value = self.memory.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    pub(crate) fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte() as u16;
        let hi = self.fetch_byte() as u16;
        (hi << 8) | lo
    }

    pub(crate) fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.memory.read(addr) as u16;
        let hi = self.memory.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Reads the operand at `location`.
    ///
    /// Implied operands carry no data and read as zero.
    pub(crate) fn load(&mut self, location: OperandLocation) -> u8 {
        match location {
            OperandLocation::Implied => 0,
            OperandLocation::Accumulator => self.a,
            OperandLocation::Register(IndexRegister::X) => self.x,
            OperandLocation::Register(IndexRegister::Y) => self.y,
            OperandLocation::Memory(addr) => self.memory.read(addr),
        }
    }

    /// Writes the operand at `location`; memory operands go out on the bus.
    pub(crate) fn store(&mut self, location: OperandLocation, value: u8) {
        match location {
            OperandLocation::Implied => {}
            OperandLocation::Accumulator => self.a = value,
            OperandLocation::Register(IndexRegister::X) => self.x = value,
            OperandLocation::Register(IndexRegister::Y) => self.y = value,
            OperandLocation::Memory(addr) => self.memory.write(addr, value),
        }
    }

    // ========== Stack Helpers ==========

    pub(crate) fn push(&mut self, value: u8) {
        self.memory.write(STACK_PAGE | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn pull(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.memory.read(STACK_PAGE | self.sp as u16)
    }

    /// Pushes high byte first so the word sits little-endian in memory.
    pub(crate) fn push_word(&mut self, value: u16) {
        self.push((value >> 8) as u8);
        self.push(value as u8);
    }

    pub(crate) fn pull_word(&mut self) -> u16 {
        let lo = self.pull() as u16;
        let hi = self.pull() as u16;
        (hi << 8) | lo
    }

    // ========== Flag Helpers ==========

    pub(crate) fn set_nz(&mut self, value: u8) {
        self.flag_z = value == 0;
        self.flag_n = value & 0x80 != 0;
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the stack pointer value.
    ///
    /// The full stack address is 0x0100 + SP. The stack grows downward from 0x01FF.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Returns the status register as a packed byte.
    ///
    /// Bit layout (NV-BDIZC). Bits 4 and 5 always read as 0 here; they are only
    /// set on copies pushed by PHP, BRK and interrupts.
    ///
    /// # Examples
    ///
    /// ```
    /// use nes6502::{Cpu, FlatMemory};
    ///
    /// let cpu = Cpu::new(FlatMemory::new());
    /// assert_eq!(cpu.status(), 0b0000_0100); // I flag only
    /// ```
    pub fn status(&self) -> u8 {
        let mut status = 0;

        if self.flag_n {
            status |= NEGATIVE;
        }
        if self.flag_v {
            status |= OVERFLOW;
        }
        if self.flag_d {
            status |= DECIMAL;
        }
        if self.flag_i {
            status |= IRQ_DISABLE;
        }
        if self.flag_z {
            status |= ZERO;
        }
        if self.flag_c {
            status |= CARRY;
        }

        status
    }

    /// Returns the total number of CPU cycles executed since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns a reference to the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Returns a mutable reference to the memory bus.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Consumes the CPU, returning its memory bus.
    pub fn into_memory(self) -> M {
        self.memory
    }

    // ========== Status Flag Getters ==========

    /// Returns true if the Negative flag is set.
    pub fn flag_n(&self) -> bool {
        self.flag_n
    }

    /// Returns true if the Overflow flag is set.
    pub fn flag_v(&self) -> bool {
        self.flag_v
    }

    /// Returns true if the Decimal mode flag is set.
    pub fn flag_d(&self) -> bool {
        self.flag_d
    }

    /// Returns true if the Interrupt Disable flag is set.
    pub fn flag_i(&self) -> bool {
        self.flag_i
    }

    /// Returns true if the Zero flag is set.
    pub fn flag_z(&self) -> bool {
        self.flag_z
    }

    /// Returns true if the Carry flag is set.
    pub fn flag_c(&self) -> bool {
        self.flag_c
    }

    // ========== Setters ==========

    /// Sets the accumulator.
    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    /// Sets the X index register.
    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    /// Sets the Y index register.
    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    /// Sets the program counter.
    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Sets the stack pointer.
    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// Loads all flags from a packed status byte. Bits 4 and 5 are ignored.
    pub fn set_status(&mut self, value: u8) {
        self.flag_n = value & NEGATIVE != 0;
        self.flag_v = value & OVERFLOW != 0;
        self.flag_d = value & DECIMAL != 0;
        self.flag_i = value & IRQ_DISABLE != 0;
        self.flag_z = value & ZERO != 0;
        self.flag_c = value & CARRY != 0;
    }

    /// Sets the Negative flag.
    pub fn set_flag_n(&mut self, value: bool) {
        self.flag_n = value;
    }

    /// Sets the Overflow flag.
    pub fn set_flag_v(&mut self, value: bool) {
        self.flag_v = value;
    }

    /// Sets the Decimal mode flag.
    pub fn set_flag_d(&mut self, value: bool) {
        self.flag_d = value;
    }

    /// Sets the Interrupt Disable flag.
    pub fn set_flag_i(&mut self, value: bool) {
        self.flag_i = value;
    }

    /// Sets the Zero flag.
    pub fn set_flag_z(&mut self, value: bool) {
        self.flag_z = value;
    }

    /// Sets the Carry flag.
    pub fn set_flag_c(&mut self, value: bool) {
        self.flag_c = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Device, FlatMemory};

    fn setup_cpu() -> Cpu<FlatMemory> {
        let mut mem = FlatMemory::new();
        mem.write(0xFFFC, 0x00);
        mem.write(0xFFFD, 0x80);
        mem.write(0xFFFA, 0x00);
        mem.write(0xFFFB, 0x90);
        mem.write(0xFFFE, 0x00);
        mem.write(0xFFFF, 0xA0);
        let mut cpu = Cpu::new(mem);
        cpu.boot();
        cpu
    }

    #[test]
    fn test_cpu_construction_state() {
        let cpu = Cpu::new(FlatMemory::new());

        assert_eq!(cpu.pc(), 0x0000);
        assert_eq!(cpu.sp(), 0x00);
        assert_eq!(cpu.a(), 0x00);
        assert_eq!(cpu.x(), 0x00);
        assert_eq!(cpu.y(), 0x00);
        assert_eq!(cpu.cycles(), 0);
        assert!(cpu.flag_i());
        assert!(!cpu.flag_n());
        assert!(!cpu.flag_v());
        assert!(!cpu.flag_d());
        assert!(!cpu.flag_z());
        assert!(!cpu.flag_c());
    }

    #[test]
    fn test_boot_loads_reset_vector() {
        let cpu = setup_cpu();
        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn test_reset_drops_stack_pointer() {
        let mut cpu = setup_cpu();
        cpu.set_pc(0x1234);
        cpu.set_flag_i(false);
        cpu.set_a(0x42);

        cpu.reset();

        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(cpu.sp(), 0xFC);
        assert!(cpu.flag_i());
        assert_eq!(cpu.a(), 0x42);
    }

    #[test]
    fn test_status_round_trip_ignores_break_bits() {
        let mut cpu = setup_cpu();
        cpu.set_status(0xFF);

        assert_eq!(cpu.status(), 0xCF);
        assert!(cpu.flag_n() && cpu.flag_v() && cpu.flag_d());
        assert!(cpu.flag_i() && cpu.flag_z() && cpu.flag_c());
    }

    #[test]
    fn test_stack_pointer_wraps() {
        let mut cpu = setup_cpu();
        cpu.set_sp(0x00);

        cpu.push(0xAB);
        assert_eq!(cpu.sp(), 0xFF);
        assert_eq!(cpu.memory_mut().read(0x0100), 0xAB);

        assert_eq!(cpu.pull(), 0xAB);
        assert_eq!(cpu.sp(), 0x00);
    }

    #[test]
    fn test_nmi_serviced_after_instruction() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, 0xEA); // NOP
        cpu.nmi();

        let cycles = cpu.step();

        assert_eq!(cycles, 2 + 7);
        assert_eq!(cpu.pc(), 0x9000);
        assert_eq!(cpu.sp(), 0xFC);
        assert!(cpu.flag_i());

        // Pushed return address is the instruction after the NOP
        assert_eq!(cpu.memory_mut().read(0x01FF), 0x80);
        assert_eq!(cpu.memory_mut().read(0x01FE), 0x01);
        // Pushed P has the unused bit set and Break clear
        let pushed = cpu.memory_mut().read(0x01FD);
        assert_eq!(pushed & (BREAK | UNUSED), UNUSED);
    }

    #[test]
    fn test_irq_masked_by_i_flag() {
        let mut cpu = setup_cpu();
        assert_eq!(cpu.irq(), 0);
        assert_eq!(cpu.pc(), 0x8000);

        cpu.set_flag_i(false);
        assert_eq!(cpu.irq(), 7);
        assert_eq!(cpu.pc(), 0xA000);
        assert!(cpu.flag_i());
    }

    #[test]
    fn test_direct_irq_counts_its_cycles() {
        let mut cpu = setup_cpu();
        cpu.set_flag_i(false);

        let spent = cpu.irq();
        assert_eq!(cpu.cycles(), spent as u64);
    }

    #[test]
    fn test_run_for_cycles_saturates_budget() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[0xEA; 4]);
        cpu.cycles = u64::MAX - 4;

        assert_eq!(cpu.run_for_cycles(u64::MAX), 4);
        assert_eq!(cpu.pc(), 0x8002);
    }

    struct IrqLine;

    impl Device for IrqLine {
        fn read(&mut self, _addr: u16) -> Option<u8> {
            None
        }

        fn write(&mut self, _addr: u16, _value: u8) {}

        fn has_interrupt(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_level_irq_from_bus_device() {
        let mut bus = crate::Bus::new();
        bus.attach(IrqLine);
        bus.register_read(|addr| match addr {
            0xFFFE => Some(0x00),
            0xFFFF => Some(0xC0),
            _ => None,
        });
        bus.write(0x0000, 0xEA); // NOP at 0x0000

        let mut cpu = Cpu::new(bus);
        cpu.set_sp(0xFF);
        cpu.set_flag_i(false);

        let cycles = cpu.step();
        assert_eq!(cycles, 9);
        assert_eq!(cpu.pc(), 0xC000);

        // I is now set, so the asserted line is ignored
        cpu.memory_mut().write(0x0000, 0xEA);
        cpu.set_pc(0x0000);
        assert_eq!(cpu.step(), 2);
    }
}
