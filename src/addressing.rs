//! # Addressing Modes
//!
//! The 6502 addressing modes and the resolver that turns one into an operand
//! location. Resolution happens right after the opcode fetch: the resolver reads
//! any operand bytes at PC, advances PC past them, and hands the instruction an
//! `Operand` naming where its data lives.
//!
//! Store and read-modify-write instructions write back through the same location,
//! so a memory operand always goes out on the bus and reaches peripherals.

use crate::{Cpu, MemoryBus};

/// 6502 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implied, Stack, Accumulator
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand, operation implied by instruction.
    ///
    /// Examples: CLC, TAX, NOP
    Implied,

    /// Operand is the stack page; the instruction pushes or pulls itself.
    ///
    /// Examples: PHA, PLP, RTS, BRK
    Stack,

    /// Operates directly on the accumulator register.
    ///
    /// Examples: LSR A, ROL A, ASL A
    Accumulator,

    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10
    Immediate,

    /// 8-bit address in zero page (0x00-0xFF).
    ZeroPage,

    /// Zero page address indexed by X register, wrapping within zero page.
    ZeroPageX,

    /// Zero page address indexed by Y register, wrapping within zero page.
    ZeroPageY,

    /// Signed 8-bit offset for branch instructions, relative to the next instruction.
    Relative,

    /// Full 16-bit address.
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// Read instructions pay +1 cycle if the index crosses a page boundary.
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// Read instructions pay +1 cycle if the index crosses a page boundary.
    AbsoluteY,

    /// Indirect jump through 16-bit pointer. Only used by JMP.
    ///
    /// The pointer's high byte is fetched without carrying into the next page:
    /// JMP ($10FF) reads $10FF and $1000.
    Indirect,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X)
    IndirectX,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y
    IndirectY,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub fn operand_bytes(self) -> u8 {
        match self {
            AddressingMode::Implied | AddressingMode::Stack | AddressingMode::Accumulator => 0,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
            _ => 1,
        }
    }
}

/// Index register selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRegister {
    X,
    Y,
}

/// Where an instruction's operand lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandLocation {
    /// No data operand (implied and stack instructions).
    Implied,
    /// The accumulator.
    Accumulator,
    /// An index register.
    Register(IndexRegister),
    /// A bus address: the effective address for loads, stores, jumps and branches.
    Memory(u16),
}

/// Result of addressing-mode resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    /// Operand storage.
    pub location: OperandLocation,

    /// Whether indexing (or a branch offset) moved into a different page.
    pub page_crossed: bool,
}

impl Operand {
    /// An operand that did not cross a page.
    pub fn at(location: OperandLocation) -> Self {
        Self {
            location,
            page_crossed: false,
        }
    }

    /// The effective address, if the operand is in memory.
    pub fn address(&self) -> Option<u16> {
        match self.location {
            OperandLocation::Memory(addr) => Some(addr),
            _ => None,
        }
    }
}

fn crosses_page(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

impl<M: MemoryBus> Cpu<M> {
    /// Resolves `mode` at the current PC, advancing PC past the operand bytes.
    pub(crate) fn resolve(&mut self, mode: AddressingMode) -> Operand {
        match mode {
            AddressingMode::Implied | AddressingMode::Stack => {
                Operand::at(OperandLocation::Implied)
            }
            AddressingMode::Accumulator => Operand::at(OperandLocation::Accumulator),
            AddressingMode::Immediate => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                Operand::at(OperandLocation::Memory(addr))
            }
            AddressingMode::ZeroPage => {
                let zp = self.fetch_byte();
                Operand::at(OperandLocation::Memory(zp as u16))
            }
            AddressingMode::ZeroPageX => {
                let zp = self.fetch_byte().wrapping_add(self.x);
                Operand::at(OperandLocation::Memory(zp as u16))
            }
            AddressingMode::ZeroPageY => {
                let zp = self.fetch_byte().wrapping_add(self.y);
                Operand::at(OperandLocation::Memory(zp as u16))
            }
            AddressingMode::Relative => {
                let offset = self.fetch_byte() as i8;
                let target = self.pc.wrapping_add_signed(offset as i16);
                Operand {
                    location: OperandLocation::Memory(target),
                    page_crossed: crosses_page(self.pc, target),
                }
            }
            AddressingMode::Absolute => {
                let addr = self.fetch_word();
                Operand::at(OperandLocation::Memory(addr))
            }
            AddressingMode::AbsoluteX => {
                let base = self.fetch_word();
                self.indexed(base, self.x)
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_word();
                self.indexed(base, self.y)
            }
            AddressingMode::Indirect => {
                let ptr = self.fetch_word();
                let lo = self.memory.read(ptr) as u16;
                // No carry into the high byte of the pointer
                let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
                let hi = self.memory.read(hi_addr) as u16;
                Operand::at(OperandLocation::Memory((hi << 8) | lo))
            }
            AddressingMode::IndirectX => {
                let zp = self.fetch_byte().wrapping_add(self.x);
                let addr = self.read_zero_page_word(zp);
                Operand::at(OperandLocation::Memory(addr))
            }
            AddressingMode::IndirectY => {
                let zp = self.fetch_byte();
                let base = self.read_zero_page_word(zp);
                self.indexed(base, self.y)
            }
        }
    }

    fn indexed(&self, base: u16, index: u8) -> Operand {
        let addr = base.wrapping_add(index as u16);
        Operand {
            location: OperandLocation::Memory(addr),
            page_crossed: crosses_page(base, addr),
        }
    }

    /// Reads a little-endian pointer from zero page; the high byte wraps to 0x00.
    fn read_zero_page_word(&mut self, zp: u8) -> u16 {
        let lo = self.memory.read(zp as u16) as u16;
        let hi = self.memory.read(zp.wrapping_add(1) as u16) as u16;
        (hi << 8) | lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    fn cpu_with(bytes: &[u8]) -> Cpu<FlatMemory> {
        let mut mem = FlatMemory::new();
        mem.load(0x8000, bytes);
        let mut cpu = Cpu::new(mem);
        cpu.set_pc(0x8000);
        cpu
    }

    #[test]
    fn test_operand_sizes() {
        assert_eq!(AddressingMode::Implied.operand_bytes(), 0);
        assert_eq!(AddressingMode::Accumulator.operand_bytes(), 0);
        assert_eq!(AddressingMode::IndirectY.operand_bytes(), 1);
        assert_eq!(AddressingMode::Indirect.operand_bytes(), 2);
    }

    #[test]
    fn test_zero_page_x_wraps() {
        let mut cpu = cpu_with(&[0xF0]);
        cpu.set_x(0x20);

        let operand = cpu.resolve(AddressingMode::ZeroPageX);
        assert_eq!(operand.location, OperandLocation::Memory(0x0010));
        assert_eq!(cpu.pc(), 0x8001);
    }

    #[test]
    fn test_absolute_x_page_cross() {
        let mut cpu = cpu_with(&[0xFF, 0x12]);
        cpu.set_x(0x01);

        let operand = cpu.resolve(AddressingMode::AbsoluteX);
        assert_eq!(operand.address(), Some(0x1300));
        assert!(operand.page_crossed);
        assert_eq!(cpu.pc(), 0x8002);
    }

    #[test]
    fn test_indirect_page_wrap_quirk() {
        let mut cpu = cpu_with(&[0xFF, 0x10]);
        cpu.memory_mut().write(0x10FF, 0x34);
        cpu.memory_mut().write(0x1000, 0x12);
        cpu.memory_mut().write(0x1100, 0x56);

        let operand = cpu.resolve(AddressingMode::Indirect);
        assert_eq!(operand.address(), Some(0x1234));
    }

    #[test]
    fn test_indirect_x_pointer_wraps_in_zero_page() {
        let mut cpu = cpu_with(&[0xFE]);
        cpu.set_x(0x01);
        cpu.memory_mut().write(0x00FF, 0x00);
        cpu.memory_mut().write(0x0000, 0x20);

        let operand = cpu.resolve(AddressingMode::IndirectX);
        assert_eq!(operand.address(), Some(0x2000));
    }

    #[test]
    fn test_indirect_y() {
        let mut cpu = cpu_with(&[0x40]);
        cpu.set_y(0x10);
        cpu.memory_mut().write(0x0040, 0xF8);
        cpu.memory_mut().write(0x0041, 0x20);

        let operand = cpu.resolve(AddressingMode::IndirectY);
        assert_eq!(operand.address(), Some(0x2108));
        assert!(operand.page_crossed);
    }

    #[test]
    fn test_relative_backwards() {
        let mut cpu = cpu_with(&[0xFC]); // -4

        let operand = cpu.resolve(AddressingMode::Relative);
        assert_eq!(operand.address(), Some(0x7FFD));
        assert!(operand.page_crossed);
    }

    #[test]
    fn test_immediate_points_at_operand_byte() {
        let mut cpu = cpu_with(&[0x42]);
        let operand = cpu.resolve(AddressingMode::Immediate);

        assert_eq!(operand.location, OperandLocation::Memory(0x8000));
        assert_eq!(cpu.pc(), 0x8001);
    }
}
