//! # System Wiring
//!
//! Puts the CPU and the clock on their own threads, joined by a shared
//! `CycleGate` and a cooperative `PowerSwitch`.
//!
//! All peripheral registration (bus interceptors, clock callbacks) happens on the
//! `System` before `start`; once threads are running, the CPU thread owns the bus
//! and the clock thread owns the callback list.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::{Clock, ClockConfig, Cpu, CycleGate, EmulatorError, MemoryBus, TestReport};

/// Cooperative power flag shared by every emulator thread.
///
/// # Examples
///
/// ```
/// use nes6502::PowerSwitch;
///
/// let power = PowerSwitch::new();
/// let other = power.clone();
/// assert!(other.is_on());
///
/// power.power_off();
/// assert!(!other.is_on());
/// ```
#[derive(Debug, Clone)]
pub struct PowerSwitch {
    on: Arc<AtomicBool>,
}

impl PowerSwitch {
    /// Creates a switch in the on position.
    pub fn new() -> Self {
        Self {
            on: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether the emulator is still powered.
    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::Acquire)
    }

    /// Cuts power; both run loops exit at their next check.
    pub fn power_off(&self) {
        self.on.store(false, Ordering::Release);
    }
}

impl Default for PowerSwitch {
    fn default() -> Self {
        Self::new()
    }
}

/// How the clock thread paces ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pacing {
    /// Ticks follow the wall clock at `ClockConfig::tick_hz`
    #[default]
    RealTime,

    /// Ticks fire as fast as the host allows
    Unthrottled,
}

/// Top-level machine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemConfig {
    pub clock: ClockConfig,
    pub pacing: Pacing,
}

/// A CPU and clock wired together but not yet running.
///
/// # Examples
///
/// ```
/// use nes6502::{Bus, Cpu, Pacing, RomDevice, System, SystemConfig};
///
/// // Tight loop: JMP $8000
/// let mut image = vec![0; 0x4000];
/// image[..3].copy_from_slice(&[0x4C, 0x00, 0x80]);
/// image[0x3FFC] = 0x00;
/// image[0x3FFD] = 0x80;
///
/// let mut bus = Bus::new();
/// bus.attach(RomDevice::new(0x8000, image));
/// let mut cpu = Cpu::new(bus);
/// cpu.boot();
///
/// let config = SystemConfig {
///     pacing: Pacing::Unthrottled,
///     ..SystemConfig::default()
/// };
/// let running = System::new(cpu, config).unwrap().start().unwrap();
/// let stopped = running.power_off().unwrap();
/// assert!(stopped.report.is_none());
/// ```
pub struct System<M: MemoryBus> {
    cpu: Cpu<M>,
    clock: Clock,
    gate: Arc<CycleGate>,
    power: PowerSwitch,
    config: SystemConfig,
}

impl<M: MemoryBus + Send + 'static> System<M> {
    /// Wires `cpu` to a new clock built from `config`.
    ///
    /// The gate's tick callback is registered first, so it runs ahead of any
    /// callback added through `clock_mut`.
    pub fn new(cpu: Cpu<M>, config: SystemConfig) -> Result<Self, EmulatorError> {
        let mut clock = Clock::new(config.clock)?;
        let gate = Arc::new(CycleGate::new(config.clock.cpu_divisor));

        let clock_gate = Arc::clone(&gate);
        clock.on_tick(move || clock_gate.tick());

        Ok(Self {
            cpu,
            clock,
            gate,
            power: PowerSwitch::new(),
            config,
        })
    }

    pub fn cpu(&self) -> &Cpu<M> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu<M> {
        &mut self.cpu
    }

    /// The clock, for registering additional tick callbacks before start.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// A handle to the power switch; switching it off stops both threads.
    pub fn power(&self) -> PowerSwitch {
        self.power.clone()
    }

    pub fn gate(&self) -> Arc<CycleGate> {
        Arc::clone(&self.gate)
    }

    pub fn config(&self) -> SystemConfig {
        self.config
    }

    /// Starts the clock and CPU threads running `Cpu::run`.
    pub fn start(self) -> Result<RunningSystem<M>, EmulatorError> {
        self.spawn(|cpu, gate, power| {
            cpu.run(gate, power);
            None
        })
    }

    /// Starts the clock and CPU threads running `Cpu::run_test`.
    ///
    /// The system powers itself off once the test ROM reports a result.
    pub fn start_test(self) -> Result<RunningSystem<M>, EmulatorError> {
        self.spawn(|cpu, gate, power| {
            let report = cpu.run_test(gate, power);
            power.power_off();
            report
        })
    }

    fn spawn<F>(self, body: F) -> Result<RunningSystem<M>, EmulatorError>
    where
        F: FnOnce(&mut Cpu<M>, &CycleGate, &PowerSwitch) -> Option<TestReport> + Send + 'static,
    {
        let System {
            mut cpu,
            mut clock,
            gate,
            power,
            config,
        } = self;

        log::info!(
            "system: starting, {} Hz tick / {} per CPU cycle, {:?} pacing",
            config.clock.tick_hz,
            config.clock.cpu_divisor,
            config.pacing
        );

        let clock_power = power.clone();
        let clock_thread = thread::Builder::new()
            .name("clock".to_string())
            .spawn(move || {
                match config.pacing {
                    Pacing::RealTime => clock.run(&clock_power),
                    Pacing::Unthrottled => clock.run_unthrottled(&clock_power),
                }
                clock
            })
            .map_err(|e| EmulatorError::ThreadSpawn(e.to_string()))?;

        let cpu_power = power.clone();
        let cpu_thread = thread::Builder::new()
            .name("cpu".to_string())
            .spawn(move || {
                let report = body(&mut cpu, &gate, &cpu_power);
                (cpu, report)
            });

        let cpu_thread = match cpu_thread {
            Ok(handle) => handle,
            Err(e) => {
                power.power_off();
                // The clock thread exits on its own once power is off
                let _ = clock_thread.join();
                return Err(EmulatorError::ThreadSpawn(e.to_string()));
            }
        };

        Ok(RunningSystem {
            power,
            clock_thread,
            cpu_thread,
        })
    }
}

/// State handed back when a running system stops.
pub struct Stopped<M: MemoryBus> {
    /// The CPU, with its bus
    pub cpu: Cpu<M>,

    /// The clock, with its tick total
    pub clock: Clock,

    /// Conformance result, for systems started with `start_test`
    pub report: Option<TestReport>,
}

/// Handles to a started system's threads.
pub struct RunningSystem<M: MemoryBus> {
    power: PowerSwitch,
    clock_thread: JoinHandle<Clock>,
    cpu_thread: JoinHandle<(Cpu<M>, Option<TestReport>)>,
}

impl<M: MemoryBus> RunningSystem<M> {
    /// A handle to the running system's power switch.
    pub fn power(&self) -> PowerSwitch {
        self.power.clone()
    }

    /// Returns true once the CPU thread has exited.
    pub fn is_finished(&self) -> bool {
        self.cpu_thread.is_finished()
    }

    /// Switches power off and joins both threads.
    pub fn power_off(self) -> Result<Stopped<M>, EmulatorError> {
        self.power.power_off();
        self.join()
    }

    /// Waits for the CPU thread to stop on its own, then stops the clock.
    ///
    /// Blocks forever for a system started with `start` unless some other holder
    /// of the power switch turns it off.
    pub fn join(self) -> Result<Stopped<M>, EmulatorError> {
        let cpu_result = self.cpu_thread.join();
        self.power.power_off();
        let clock_result = self.clock_thread.join();

        let (cpu, report) = cpu_result.map_err(|_| EmulatorError::ThreadPanicked("cpu"))?;
        let clock = clock_result.map_err(|_| EmulatorError::ThreadPanicked("clock"))?;

        log::info!(
            "system: powered off after {} CPU cycles, {} ticks",
            cpu.cycles(),
            clock.ticks()
        );

        Ok(Stopped { cpu, clock, report })
    }
}
