//! Fuzz target for bus dispatch.
//!
//! Replays arbitrary read/write sequences against a bus with cartridge RAM and
//! ROM attached, checking RAM mirroring and first-responder semantics against a
//! shadow model.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nes6502::{Bus, MemoryBus, RamDevice, RomDevice};

#[derive(Debug, Arbitrary)]
enum BusOp {
    Read(u16),
    Write(u16, u8),
}

fuzz_target!(|ops: Vec<BusOp>| {
    let mut bus = Bus::new();
    bus.attach(RamDevice::new(0x6000, 0x2000));
    bus.attach(RomDevice::new(0x8000, vec![0xA5; 0x8000]));

    let mut internal = [0u8; 0x800];
    let mut work = [0u8; 0x2000];
    let mut last = 0u8;

    for op in ops {
        match op {
            BusOp::Write(addr, value) => {
                bus.write(addr, value);
                last = value;
                match addr {
                    0x0000..=0x1FFF => internal[(addr % 0x800) as usize] = value,
                    0x6000..=0x7FFF => work[(addr - 0x6000) as usize] = value,
                    _ => {}
                }
            }
            BusOp::Read(addr) => {
                let expected = match addr {
                    0x0000..=0x1FFF => internal[(addr % 0x800) as usize],
                    0x6000..=0x7FFF => work[(addr - 0x6000) as usize],
                    0x8000..=0xFFFF => 0xA5,
                    // Open bus
                    _ => last,
                };
                let value = bus.read(addr);
                assert_eq!(value, expected, "read 0x{:04X}", addr);
                last = value;
            }
        }
    }
});
