//! Integration tests for the memory-mapped bus.
//!
//! Tests cover:
//! - 2 KiB RAM mirroring below 0x2000
//! - First-responder read dispatch and broadcast writes above 0x2000
//! - Open-bus reads
//! - The isolated video read channel
//! - Devices attached through `Bus::attach`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use nes6502::{Bus, Cpu, Device, MemoryBus, RamDevice, RomDevice};

#[test]
fn test_ram_mirroring() {
    let mut bus = Bus::new();
    bus.write(0x0812, 0x5C);

    assert_eq!(bus.read(0x0012), 0x5C);
    assert_eq!(bus.read(0x1012), 0x5C);
    assert_eq!(bus.read(0x1812), 0x5C);

    bus.write(0x1FFF, 0x01);
    assert_eq!(bus.read(0x07FF), 0x01);
}

#[test]
fn test_ram_never_consults_interceptors() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut bus = Bus::new();

    let seen = Arc::clone(&calls);
    bus.register_read(move |_| {
        seen.fetch_add(1, Ordering::Relaxed);
        Some(0xFF)
    });

    bus.write(0x0000, 0x12);
    assert_eq!(bus.read(0x0000), 0x12);
    assert_eq!(calls.load(Ordering::Relaxed), 0);
}

#[test]
fn test_first_responder_wins() {
    let b_calls = Arc::new(AtomicUsize::new(0));
    let mut bus = Bus::new();

    bus.register_read(|addr| if addr == 0x6000 { Some(0x42) } else { None });
    let seen = Arc::clone(&b_calls);
    bus.register_read(move |_| {
        seen.fetch_add(1, Ordering::Relaxed);
        Some(0x99)
    });

    assert_eq!(bus.read(0x6000), 0x42);
    assert_eq!(b_calls.load(Ordering::Relaxed), 0);

    // A declines 0x6001, so B answers
    assert_eq!(bus.read(0x6001), 0x99);
    assert_eq!(b_calls.load(Ordering::Relaxed), 1);
}

#[test]
fn test_writes_broadcast_to_every_interceptor() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut bus = Bus::new();

    for id in 0..3 {
        let log = Arc::clone(&log);
        bus.register_write(move |addr, value| log.lock().unwrap().push((id, addr, value)));
    }

    bus.write(0x4016, 0x01);
    bus.write(0x0010, 0x02); // RAM, not broadcast

    assert_eq!(
        *log.lock().unwrap(),
        vec![(0, 0x4016, 0x01), (1, 0x4016, 0x01), (2, 0x4016, 0x01)]
    );
}

#[test]
fn test_open_bus_returns_last_value() {
    let mut bus = Bus::new();
    bus.write(0x0003, 0xA7);
    assert_eq!(bus.read(0x0003), 0xA7);

    // Nothing claims 0x5000
    assert_eq!(bus.read(0x5000), 0xA7);
    assert_eq!(bus.data_latch(), 0xA7);
    assert_eq!(bus.address_latch(), 0x5000);
}

#[test]
fn test_ppu_channel_is_isolated() {
    let mut bus = Bus::new();
    bus.register_ppu_read(|addr| if addr < 0x2000 { Some(0x3C) } else { None });

    assert_eq!(bus.ppu_read(0x0010), 0x3C);
    // The CPU side at the same address is plain RAM
    assert_eq!(bus.read(0x0010), 0x00);
}

#[test]
fn test_rom_device_serves_chr_on_ppu_channel() {
    let mut bus = Bus::new();
    bus.attach(RomDevice::new(0x8000, vec![0xEA; 0x4000]).with_chr(vec![0x18; 0x2000]));

    assert_eq!(bus.ppu_read(0x1000), 0x18);
    assert_eq!(bus.read(0xC000), 0xEA);
}

#[test]
fn test_attached_ram_and_rom() {
    let mut bus = Bus::new();
    let ram = bus.attach(RamDevice::new(0x6000, 0x2000));
    bus.attach(RomDevice::new(0x8000, vec![0x11; 0x8000]));

    bus.write(0x6010, 0x77);
    assert_eq!(bus.read(0x6010), 0x77);
    assert_eq!(ram.with(|r| r.bytes()[0x10]), 0x77);

    // ROM ignores writes
    bus.write(0x8000, 0x00);
    assert_eq!(bus.read(0x8000), 0x11);
}

#[test]
fn test_load_folds_into_ram() {
    let mut bus = Bus::new();
    bus.load(0x0800, &[1, 2, 3]).unwrap();

    assert_eq!(bus.read(0x0000), 1);
    assert_eq!(bus.ram()[2], 3);
    assert!(bus.load(0xFFFF, &[1, 2]).is_err());
}

struct Register {
    value: u8,
    reads: usize,
}

impl Device for Register {
    fn read(&mut self, addr: u16) -> Option<u8> {
        (addr == 0x2002).then(|| {
            self.reads += 1;
            self.value
        })
    }

    fn write(&mut self, addr: u16, value: u8) {
        if addr == 0x2002 {
            self.value = value;
        }
    }
}

#[test]
fn test_cpu_store_reaches_device() {
    let mut bus = Bus::new();
    let register = bus.attach(Register { value: 0, reads: 0 });
    // LDA #$5A; STA $2002; LDA $2002
    bus.load(0x0000, &[0xA9, 0x5A, 0x8D, 0x02, 0x20, 0xAD, 0x02, 0x20])
        .unwrap();

    let mut cpu = Cpu::new(bus);
    cpu.set_sp(0xFF);
    cpu.run_for_cycles(10);

    assert_eq!(register.with(|r| r.value), 0x5A);
    assert_eq!(register.with(|r| r.reads), 1);
    assert_eq!(cpu.a(), 0x5A);
}
