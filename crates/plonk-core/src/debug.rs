//! Debug utilities for tracing challenge and point values
//!
//! Enable with `--features debug`; output goes through `log::trace!`.

extern crate alloc;

use crate::field::{FieldElement, FieldParams};
use crate::types::G1Point;
use alloc::format;
use alloc::string::String;

/// Format a field element as a 0x-prefixed hex string
pub fn fr_to_hex<P: FieldParams>(fe: &FieldElement<P>) -> String {
    let mut s = String::from("0x");
    for byte in fe.to_be_bytes() {
        s.push_str(&format!("{:02x}", byte));
    }
    s
}

/// Format a G1 point as (0xX, 0xY)
pub fn g1_to_hex(g1: &G1Point) -> String {
    let x_hex: String = g1.0[0..32].iter().map(|b| format!("{:02x}", b)).collect();
    let y_hex: String = g1.0[32..64].iter().map(|b| format!("{:02x}", b)).collect();
    format!("(0x{}, 0x{})", x_hex, y_hex)
}

/// Trace a field element (only when debug feature enabled)
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! dbg_fr {
    ($name:expr, $fr:expr) => {
        log::trace!("{} = {}", $name, $crate::debug::fr_to_hex($fr));
    };
}

/// Trace a field element (noop when debug feature disabled)
#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! dbg_fr {
    ($name:expr, $fr:expr) => {};
}

/// Debug trace macro
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        log::trace!($($arg)*);
    };
}

/// Debug trace macro (noop when debug feature disabled)
#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Trace a G1 point
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! dbg_g1 {
    ($name:expr, $g1:expr) => {
        log::trace!("{} = {}", $name, $crate::debug::g1_to_hex($g1));
    };
}

/// Trace a G1 point (noop when disabled)
#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! dbg_g1 {
    ($name:expr, $g1:expr) => {};
}
