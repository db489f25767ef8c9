//! WebAssembly bindings for the emulator.
//!
//! This module provides JavaScript-callable interfaces to the CPU and bus,
//! enabling browser-based execution of cartridge images.

pub mod api;

pub use api::{Emulator, JsError};
