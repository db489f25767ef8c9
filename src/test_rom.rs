//! # Conformance Test Status Protocol
//!
//! CPU conformance ROMs report through cartridge RAM:
//!
//! | Address       | Contents                                         |
//! |---------------|--------------------------------------------------|
//! | 0x6000        | status: 0x80 running, 0x81 reset requested, <0x80 result |
//! | 0x6001-0x6003 | signature `DE B0 61`                             |
//! | 0x6004..      | NUL-terminated result text                       |
//!
//! A result code of zero means every test passed. The status byte is only
//! trusted once the signature is present and the ROM has reported itself running.

use crate::{Cpu, CycleGate, MemoryBus, PowerSwitch};

/// Address of the status byte.
pub const STATUS_ADDR: u16 = 0x6000;

/// Address of the first signature byte.
pub const SIGNATURE_ADDR: u16 = 0x6001;

/// Signature marking valid status RAM.
pub const SIGNATURE: [u8; 3] = [0xDE, 0xB0, 0x61];

/// Address of the result text.
pub const MESSAGE_ADDR: u16 = 0x6004;

const STATUS_RUNNING: u8 = 0x80;
const STATUS_RESET_REQUESTED: u8 = 0x81;

/// Last address the result text may occupy (end of cartridge RAM).
const MESSAGE_END: u16 = 0x7FFF;

/// Final result reported by a test ROM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    /// Result code; zero means passed
    pub code: u8,

    /// Text the ROM left at 0x6004
    pub message: String,
}

impl TestReport {
    /// Returns true if the ROM reported success.
    pub fn passed(&self) -> bool {
        self.code == 0
    }
}

/// Decoded contents of the status block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestStatus {
    /// Signature not (yet) written
    NotStarted,

    /// Tests in progress
    Running,

    /// The ROM asks for a reset after a short delay
    ResetRequested,

    /// Tests complete
    Finished(TestReport),
}

impl TestStatus {
    /// Reads the status block through the bus.
    ///
    /// # Examples
    ///
    /// ```
    /// use nes6502::{FlatMemory, MemoryBus, TestStatus};
    ///
    /// let mut mem = FlatMemory::new();
    /// assert_eq!(TestStatus::read(&mut mem), TestStatus::NotStarted);
    ///
    /// mem.load(0x6000, &[0x80, 0xDE, 0xB0, 0x61]);
    /// assert_eq!(TestStatus::read(&mut mem), TestStatus::Running);
    /// ```
    pub fn read<M: MemoryBus>(memory: &mut M) -> TestStatus {
        let signed = SIGNATURE
            .iter()
            .zip(SIGNATURE_ADDR..)
            .all(|(&expected, addr)| memory.read(addr) == expected);
        if !signed {
            return TestStatus::NotStarted;
        }

        match memory.read(STATUS_ADDR) {
            STATUS_RUNNING => TestStatus::Running,
            STATUS_RESET_REQUESTED => TestStatus::ResetRequested,
            code if code < STATUS_RUNNING => TestStatus::Finished(TestReport {
                code,
                message: read_message(memory),
            }),
            // Other values are reserved; keep waiting
            _ => TestStatus::Running,
        }
    }
}

fn read_message<M: MemoryBus>(memory: &mut M) -> String {
    let bytes: Vec<u8> = (MESSAGE_ADDR..=MESSAGE_END)
        .map(|addr| memory.read(addr))
        .take_while(|&b| b != 0)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Tracks status transitions across instructions.
#[derive(Debug, Default)]
struct TestMonitor {
    started: bool,
    reset_requested: bool,
}

impl TestMonitor {
    /// Inspects the status block after an instruction.
    ///
    /// Returns the report once the ROM finishes. A fresh reset request resets
    /// the CPU.
    fn observe<M: MemoryBus>(&mut self, cpu: &mut Cpu<M>) -> Option<TestReport> {
        match TestStatus::read(cpu.memory_mut()) {
            TestStatus::NotStarted => None,
            TestStatus::Running => {
                if !self.started {
                    log::debug!("test rom: running");
                }
                self.started = true;
                self.reset_requested = false;
                None
            }
            TestStatus::ResetRequested => {
                self.started = true;
                if !self.reset_requested {
                    log::debug!("test rom: reset requested");
                    self.reset_requested = true;
                    cpu.reset();
                }
                None
            }
            TestStatus::Finished(report) if self.started => {
                log::info!(
                    "test rom: finished with code {} ({})",
                    report.code,
                    report.message.trim_end()
                );
                Some(report)
            }
            TestStatus::Finished(_) => None,
        }
    }
}

impl<M: MemoryBus> Cpu<M> {
    /// Runs gated by `gate` until the test ROM reports a result or `power` is
    /// switched off.
    pub fn run_test(&mut self, gate: &CycleGate, power: &PowerSwitch) -> Option<TestReport> {
        let mut monitor = TestMonitor::default();
        while gate.wait(power) {
            let cycles = self.step();
            gate.arm(cycles);
            if let Some(report) = monitor.observe(self) {
                return Some(report);
            }
        }
        None
    }

    /// Runs in virtual time until the test ROM reports a result or the cycle
    /// budget is spent.
    pub fn run_test_for_cycles(&mut self, cycle_budget: u64) -> Option<TestReport> {
        let mut monitor = TestMonitor::default();
        let target_cycles = self.cycles.saturating_add(cycle_budget);

        while self.cycles < target_cycles {
            self.step();
            if let Some(report) = monitor.observe(self) {
                return Some(report);
            }
        }
        None
    }
}
