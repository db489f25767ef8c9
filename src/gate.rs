//! # Cycle Gate
//!
//! The countdown that paces the CPU to emulated cycles. The CPU thread arms the
//! gate with the cycle cost of the instruction it just executed; the clock thread
//! counts that down one CPU cycle per `divisor` ticks and opens the gate when it
//! reaches zero.
//!
//! Both sides touch the gate concurrently, so the counter and the ready flag are
//! atomics. The tick counter is only advanced by the clock thread.

use std::hint;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::PowerSwitch;

/// Shared cycle countdown between the clock and the CPU.
///
/// # Examples
///
/// ```
/// use nes6502::CycleGate;
///
/// let gate = CycleGate::new(3);
/// gate.arm(2);
/// assert!(!gate.is_ready());
///
/// // Two CPU cycles at three ticks each
/// for _ in 0..5 {
///     gate.tick();
/// }
/// assert!(!gate.is_ready());
/// gate.tick();
/// assert!(gate.is_ready());
/// ```
#[derive(Debug)]
pub struct CycleGate {
    /// CPU cycles left before the next instruction may run
    pending: AtomicU32,

    /// Set when `pending` reaches zero, cleared by the CPU on entry
    ready: AtomicBool,

    /// Ticks since the last CPU cycle
    ticks: AtomicU32,

    /// Clock ticks per CPU cycle
    divisor: u32,
}

impl CycleGate {
    /// Creates an open gate that counts one CPU cycle every `divisor` ticks.
    ///
    /// A divisor of zero is treated as one.
    pub fn new(divisor: u32) -> Self {
        Self {
            pending: AtomicU32::new(0),
            ready: AtomicBool::new(true),
            ticks: AtomicU32::new(0),
            divisor: divisor.max(1),
        }
    }

    /// Clock-side tick. Every `divisor` ticks, one pending cycle is retired.
    pub fn tick(&self) {
        let ticks = self.ticks.load(Ordering::Relaxed) + 1;
        if ticks < self.divisor {
            self.ticks.store(ticks, Ordering::Relaxed);
            return;
        }
        self.ticks.store(0, Ordering::Relaxed);

        let retired = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |p| p.checked_sub(1));
        if retired == Ok(1) {
            self.ready.store(true, Ordering::Release);
        }
    }

    /// CPU-side: closes the gate for `cycles` CPU cycles.
    ///
    /// Arming with zero cycles leaves the gate open.
    pub fn arm(&self, cycles: u32) {
        // Close before publishing the count so the clock's reopen cannot be lost
        self.ready.store(cycles == 0, Ordering::Release);
        self.pending.store(cycles, Ordering::Release);
    }

    /// Spins until the gate opens, consuming the ready flag.
    ///
    /// Returns `false` without waiting further once `power` is switched off.
    pub fn wait(&self, power: &PowerSwitch) -> bool {
        loop {
            if !power.is_on() {
                return false;
            }
            if self.ready.swap(false, Ordering::AcqRel) {
                return true;
            }
            hint::spin_loop();
        }
    }

    /// Returns true if the next instruction may run.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// CPU cycles still owed by the last instruction.
    pub fn pending(&self) -> u32 {
        self.pending.load(Ordering::Acquire)
    }

    /// Clock ticks per CPU cycle.
    pub fn divisor(&self) -> u32 {
        self.divisor
    }
}
