//! Minimal HAL crate for the STM32F303RE microcontroller (Nucleo-F303RE board).
//!
//! Brings the clock tree from its reset state into an application selected configuration,
//! gates peripheral bus clocks and drives GPIO pins.
//!
//! Every operation takes the register set as an explicit [`Registers`] argument instead of
//! addressing the hardware by name. On target this is [`registers::Device`] (feature `device`),
//! on the host it is the simulated [`registers::sim::RegisterFile`].
//!
//! All register state is global and unsynchronized. If the HAL is used from more than one
//! execution context (e.g. main loop and an interrupt handler touching the same port), the
//! caller is responsible for mutual exclusion.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod clock;
pub mod delay;
pub mod flash;
pub mod gpio;
pub mod led;
pub mod rcc;
pub mod registers;
pub mod uart;

mod error;

pub use error::{ClockError, Error, GpioError};
pub use led::Led;
pub use registers::Registers;
