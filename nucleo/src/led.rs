use crate::error::GpioError;
use crate::gpio::{self, Gpio, GpioConfig, Mode, State};
use crate::rcc;
use crate::registers::Registers;

/// User LED LD2 of the Nucleo-F303RE board, on when PA5 is high.
pub const LD2: Gpio = gpio::PA5;

/// Led controller.
#[derive(Debug)]
pub struct Led {
    pin: Gpio,
    active_low: bool,
    on: bool,
}

impl Led {
    /// Configure `pin` as push-pull output with the led off.
    ///
    /// `active_low` is set when the led is on while the pin is low.
    #[inline]
    pub fn new<R: Registers>(
        regs: &mut R,
        pin: Gpio,
        active_low: bool,
    ) -> Result<Self, GpioError> {
        let led = Self {
            pin,
            active_low,
            on: false,
        };
        rcc::enable_gpio(regs, pin.0);
        led.update(regs);
        gpio::init(regs, &GpioConfig::new(pin, Mode::Output))?;
        Ok(led)
    }

    #[inline]
    fn update<R: Registers>(&self, regs: &mut R) {
        gpio::write(regs, self.pin, State::from(self.on != self.active_low));
    }

    #[inline]
    pub fn on<R: Registers>(&mut self, regs: &mut R) {
        self.on = true;
        self.update(regs);
    }

    #[inline]
    pub fn off<R: Registers>(&mut self, regs: &mut R) {
        self.on = false;
        self.update(regs);
    }

    #[inline]
    pub fn toggle<R: Registers>(&mut self, regs: &mut R) {
        self.on = !self.on;
        self.update(regs);
    }

    #[inline]
    pub fn write<R: Registers>(&mut self, regs: &mut R, on: bool) {
        if on {
            self.on(regs);
        } else {
            self.off(regs);
        }
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.on
    }

    #[inline]
    pub fn pin(&self) -> Gpio {
        self.pin
    }
}
