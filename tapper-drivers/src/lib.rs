//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in tapper-core:
//!
//! - Step/dir stepper carriers (A4988, DRV8825)
//! - `embedded-io` UARTs as the host byte channel

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod serial;
pub mod stepper;
