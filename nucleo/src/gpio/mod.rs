//! GPIO peripheral.
//!
//! Example usage:
//!
//! ```ignore
//! let config = GpioConfig::new(PA5, Mode::Output);
//! gpio::init(&mut regs, &config)?;
//!
//! gpio::write(&mut regs, PA5, State::Set);
//! let level: State = gpio::read(&mut regs, PC13);
//! ```

pub mod af;
mod mode;
mod pinout;
mod port;

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};

pub use mode::*;
pub use pinout::*;
pub use port::{Pin, Port};

use crate::error::GpioError;
use crate::rcc;
use crate::registers::bits::gpio::LCKK;
use crate::registers::{GpioRegister, Register, Registers};

/// GPIO pin tuple struct.
///
/// Can be used to [configure][init()], [read][read()] from or
/// [write][write()] to a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gpio(pub Port, pub Pin);

impl Gpio {
    #[inline]
    pub const fn port(self) -> Port {
        self.0
    }

    #[inline]
    pub const fn pin(self) -> Pin {
        self.1
    }

    #[inline]
    fn register(self, reg: GpioRegister) -> Register {
        Register::Gpio(self.0, reg)
    }

    #[inline]
    fn mask(self) -> u32 {
        self.1.mask()
    }
}

/// Pin configuration, applied by [`init`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioConfig {
    pub pin: Gpio,
    pub mode: Mode,
    pub pull: Pull,
    pub output_type: OutputType,
    pub speed: Speed,
    /// Only programmed when set, the current selection is kept otherwise.
    pub alternate_function: Option<AltFunction>,
}

impl GpioConfig {
    /// Push-pull, high speed, no pull resistor.
    #[inline]
    pub fn new(pin: Gpio, mode: Mode) -> Self {
        Self {
            pin,
            mode,
            pull: Pull::default(),
            output_type: OutputType::default(),
            speed: Speed::default(),
            alternate_function: None,
        }
    }

    pub fn with_pull(self, pull: Pull) -> Self {
        Self { pull, ..self }
    }

    pub fn with_output_type(self, output_type: OutputType) -> Self {
        Self {
            output_type,
            ..self
        }
    }

    pub fn with_speed(self, speed: Speed) -> Self {
        Self { speed, ..self }
    }

    pub fn with_alternate_function(self, af: AltFunction) -> Self {
        Self {
            alternate_function: Some(af),
            ..self
        }
    }
}

/// Configure a pin.
///
/// Enables the clock of the port, then programs mode, output type, speed, pull resistors and the
/// alternate function. Only the fields of the given pin change.
///
/// # Errors
///
/// [`GpioError::InvalidAlternateFunction`] if the alternate function is not available on the pin
/// (see [`af`]). The port clock and the mode, output type, speed and pull fields are already
/// programmed at that point and stay so, only the alternate function selection is left untouched.
pub fn init<R: Registers>(regs: &mut R, config: &GpioConfig) -> Result<(), GpioError> {
    let pin = config.pin;
    rcc::enable_gpio(regs, pin.0);

    let nr = pin.1 as u32;
    regs.write_field(
        pin.register(GpioRegister::Moder),
        0b11 << (nr * 2),
        nr * 2,
        config.mode.bits(),
    );
    regs.write_field(
        pin.register(GpioRegister::Otyper),
        pin.mask(),
        nr,
        config.output_type.bits(),
    );
    regs.write_field(
        pin.register(GpioRegister::Ospeedr),
        0b11 << (nr * 2),
        nr * 2,
        config.speed.bits(),
    );
    regs.write_field(
        pin.register(GpioRegister::Pupdr),
        0b11 << (nr * 2),
        nr * 2,
        config.pull.bits(),
    );

    if let Some(af) = config.alternate_function {
        if !af::supports(pin, af) {
            warn!("{} not available on {}", af, pin);
            return Err(GpioError::InvalidAlternateFunction { pin, af });
        }
        let (reg, shift) = if nr < 8 {
            (GpioRegister::Afrl, nr * 4)
        } else {
            (GpioRegister::Afrh, (nr - 8) * 4)
        };
        regs.write_field(pin.register(reg), 0xF << shift, shift, af.bits());
    }

    trace!("configured {}", config);
    Ok(())
}

/// Set the output level of a pin.
///
/// Single write to `BSRR` / `BRR`, other pins of the port are not affected.
/// Assumes the pin was configured as [output][Mode::Output] before calling this.
#[inline]
pub fn write<R: Registers>(regs: &mut R, pin: Gpio, state: State) {
    match state {
        State::Set => regs.write(pin.register(GpioRegister::Bsrr), pin.mask()),
        State::Reset => regs.write(pin.register(GpioRegister::Brr), pin.mask()),
    }
}

/// Read the input level of a pin.
#[inline]
pub fn read<R: Registers>(regs: &mut R, pin: Gpio) -> State {
    regs.is_set(pin.register(GpioRegister::Idr), pin.mask()).into()
}

/// Read the level the pin is driven to.
#[inline]
pub fn output_state<R: Registers>(regs: &mut R, pin: Gpio) -> State {
    regs.is_set(pin.register(GpioRegister::Odr), pin.mask()).into()
}

/// Invert the output level of a pin.
///
/// Read of `ODR` followed by a write, not atomic as a whole.
#[inline]
pub fn toggle<R: Registers>(regs: &mut R, pin: Gpio) {
    let state = output_state(regs, pin);
    write(regs, pin, !state);
}

/// Freeze the configuration of a pin until the next reset.
///
/// Runs the `LCKR` key sequence. Once a port is locked its lock set cannot be extended, locking a
/// further pin of that port fails.
///
/// # Errors
///
/// [`GpioError::LockFailed`] if the lock key did not latch for this pin, e.g. because the port
/// clock is off.
pub fn lock<R: Registers>(regs: &mut R, pin: Gpio) -> Result<(), GpioError> {
    let lckr = pin.register(GpioRegister::Lckr);
    let lck = pin.mask();

    regs.write(lckr, lck);
    regs.write(lckr, LCKK | lck);
    regs.write(lckr, lck);
    regs.write(lckr, LCKK | lck);
    // First read completes the sequence, second one reports the result.
    let _ = regs.read(lckr);
    let value = regs.read(lckr);

    if value & LCKK != 0 && value & lck != 0 {
        debug!("locked {}", pin);
        Ok(())
    } else {
        warn!("lock of {} failed", pin);
        Err(GpioError::LockFailed(pin))
    }
}

/// Single pin driver for `embedded-hal` users.
///
/// `R` may be a `&mut` to a register set, the driver then borrows it for its lifetime.
pub struct Driver<R: Registers> {
    regs: RefCell<R>,
    pin: Gpio,
}

impl<R: Registers> Driver<R> {
    /// Wrap a pin that was already configured with [`init`].
    #[inline]
    pub fn new(regs: R, pin: Gpio) -> Self {
        Self {
            regs: RefCell::new(regs),
            pin,
        }
    }

    #[inline]
    pub fn pin(&self) -> Gpio {
        self.pin
    }

    /// Give back the register set.
    #[inline]
    pub fn release(self) -> R {
        self.regs.into_inner()
    }
}

impl<R: Registers> OutputPin for Driver<R> {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        write(self.regs.get_mut(), self.pin, State::Reset);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        write(self.regs.get_mut(), self.pin, State::Set);
        Ok(())
    }
}

impl<R: Registers> StatefulOutputPin for Driver<R> {
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(output_state(&mut *self.regs.borrow_mut(), self.pin).is_set())
    }

    fn is_set_low(&self) -> Result<bool, Self::Error> {
        self.is_set_high().map(|high| !high)
    }
}

impl<R: Registers> ToggleableOutputPin for Driver<R> {
    type Error = Infallible;

    fn toggle(&mut self) -> Result<(), Self::Error> {
        toggle(self.regs.get_mut(), self.pin);
        Ok(())
    }
}

impl<R: Registers> InputPin for Driver<R> {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(read(&mut *self.regs.borrow_mut(), self.pin).is_set())
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}
