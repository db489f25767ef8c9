//! # Clock
//!
//! A fixed-rate tick source. Components register tick callbacks; every tick fires
//! them once, in registration order.
//!
//! The clock can be driven three ways:
//!
//! - `tick` / `advance` fire ticks synchronously (virtual time, used by tests)
//! - `run` paces ticks to the wall clock, catching up on owed ticks rather than
//!   dropping them when the host thread is descheduled
//! - `run_unthrottled` ticks as fast as the host allows

use std::hint;
use std::time::{Duration, Instant};

use crate::{EmulatorError, PowerSwitch};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Tick rate and CPU divisor for a machine.
///
/// # Examples
///
/// ```
/// use nes6502::ClockConfig;
///
/// let ntsc = ClockConfig::default();
/// assert_eq!(ntsc, ClockConfig::NTSC);
/// assert_eq!(ntsc.cpu_hz(), 1_789_772);
/// assert!(ntsc.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockConfig {
    /// Master tick frequency in Hz
    pub tick_hz: u64,

    /// Master ticks per CPU cycle
    pub cpu_divisor: u32,
}

impl ClockConfig {
    /// NTSC timing: 5.369318 MHz master tick, CPU at one third of it.
    pub const NTSC: ClockConfig = ClockConfig {
        tick_hz: 5_369_318,
        cpu_divisor: 3,
    };

    /// PAL timing. The real PAL CPU divides by 3.2; the gate rounds to 3.
    pub const PAL: ClockConfig = ClockConfig {
        tick_hz: 5_320_342,
        cpu_divisor: 3,
    };

    /// Checks that the configuration yields a usable tick interval.
    pub fn validate(&self) -> Result<(), EmulatorError> {
        if self.tick_hz == 0 {
            return Err(EmulatorError::InvalidClockConfig("tick rate is zero"));
        }
        if self.tick_hz > NANOS_PER_SEC {
            return Err(EmulatorError::InvalidClockConfig(
                "tick rate above 1 GHz cannot be paced",
            ));
        }
        if self.cpu_divisor == 0 {
            return Err(EmulatorError::InvalidClockConfig("CPU divisor is zero"));
        }
        Ok(())
    }

    /// Wall-clock duration of one tick, rounded down to whole nanoseconds.
    pub fn interval(&self) -> Duration {
        Duration::from_nanos(NANOS_PER_SEC / self.tick_hz.max(1))
    }

    /// Effective CPU frequency in Hz.
    pub fn cpu_hz(&self) -> u64 {
        self.tick_hz / self.cpu_divisor.max(1) as u64
    }

    /// Ticks that should have fired `elapsed` after start.
    fn ticks_due(&self, elapsed: Duration) -> u64 {
        (elapsed.as_nanos() * self.tick_hz as u128 / NANOS_PER_SEC as u128) as u64
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig::NTSC
    }
}

/// A registered tick handler.
pub type TickCallback = Box<dyn FnMut() + Send>;

/// Fixed-rate tick source with an ordered callback list.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
/// use nes6502::{Clock, ClockConfig};
///
/// let count = Arc::new(AtomicU32::new(0));
/// let mut clock = Clock::new(ClockConfig::NTSC).unwrap();
///
/// let c = Arc::clone(&count);
/// clock.on_tick(move || {
///     c.fetch_add(1, Ordering::Relaxed);
/// });
///
/// clock.advance(10);
/// assert_eq!(count.load(Ordering::Relaxed), 10);
/// assert_eq!(clock.ticks(), 10);
/// ```
pub struct Clock {
    config: ClockConfig,
    callbacks: Vec<TickCallback>,
    ticks: u64,
}

impl Clock {
    /// Creates a clock with no callbacks.
    pub fn new(config: ClockConfig) -> Result<Self, EmulatorError> {
        config.validate()?;
        Ok(Self {
            config,
            callbacks: Vec::new(),
            ticks: 0,
        })
    }

    /// Registers a tick callback. Callbacks fire in registration order.
    pub fn on_tick<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Fires every callback once.
    pub fn tick(&mut self) {
        for callback in self.callbacks.iter_mut() {
            callback();
        }
        self.ticks += 1;
    }

    /// Fires `ticks` ticks back to back.
    pub fn advance(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Paces ticks to the wall clock until `power` is switched off.
    ///
    /// Owed ticks are derived from total elapsed time, so a late wake-up fires
    /// every tick it missed.
    pub fn run(&mut self, power: &PowerSwitch) {
        log::debug!(
            "clock: real-time start, {} Hz, {} callbacks",
            self.config.tick_hz,
            self.callbacks.len()
        );

        let start = Instant::now();
        let mut fired: u64 = 0;

        while power.is_on() {
            let due = self.config.ticks_due(start.elapsed());
            while fired < due && power.is_on() {
                self.tick();
                fired += 1;
            }
            hint::spin_loop();
        }

        log::debug!(
            "clock: stopped after {} ticks in {:?}",
            fired,
            start.elapsed()
        );
    }

    /// Ticks without pacing until `power` is switched off.
    pub fn run_unthrottled(&mut self, power: &PowerSwitch) {
        log::debug!(
            "clock: unthrottled start, {} callbacks",
            self.callbacks.len()
        );

        let first = self.ticks;
        while power.is_on() {
            self.tick();
        }

        log::debug!("clock: stopped after {} ticks", self.ticks - first);
    }

    /// Total ticks fired.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of registered callbacks.
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    pub fn config(&self) -> ClockConfig {
        self.config
    }
}
