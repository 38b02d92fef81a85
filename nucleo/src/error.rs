use thiserror::Error;

use crate::clock::{Oscillator, SysClkSource};
use crate::gpio::{AltFunction, Gpio};

/// Clock tree configuration failures.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    #[error("{0:?} not ready before timeout")]
    ClockSourceNotReady(Oscillator),
    #[error("system clock did not switch to {0:?}")]
    ClockSourceNotSelected(SysClkSource),
}

/// GPIO configuration failures.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    #[error("{af:?} not available on {pin:?}")]
    InvalidAlternateFunction { pin: Gpio, af: AltFunction },
    #[error("lock sequence on {0:?} failed")]
    LockFailed(Gpio),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    #[error(transparent)]
    Clock(#[from] ClockError),
    #[error(transparent)]
    Gpio(#[from] GpioError),
}
