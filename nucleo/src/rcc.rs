//! Peripheral clock gating.
//!
//! A peripheral does not respond to register accesses while its bus clock is gated. All
//! operations are idempotent.

use crate::gpio::Port;
use crate::registers::bits::{ahbenr, apb1enr, apb2enr};
use crate::registers::{reg, Register, Registers};
use crate::uart::Usart;

/// Peripheral buses with a clock enable register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bus {
    Ahb,
    Apb1,
    Apb2,
}

impl Bus {
    /// Clock enable register of this bus.
    #[inline]
    pub const fn enable_register(self) -> Register {
        match self {
            Self::Ahb => reg::AHBENR,
            Self::Apb1 => reg::APB1ENR,
            Self::Apb2 => reg::APB2ENR,
        }
    }
}

/// `AHBENR` bit of a GPIO port.
#[inline]
pub(crate) const fn gpio_enable_bit(port: Port) -> u32 {
    match port {
        Port::A => ahbenr::IOPAEN,
        Port::B => ahbenr::IOPBEN,
        Port::C => ahbenr::IOPCEN,
        Port::D => ahbenr::IOPDEN,
        Port::E => ahbenr::IOPEEN,
        Port::F => ahbenr::IOPFEN,
        Port::G => ahbenr::IOPGEN,
        Port::H => ahbenr::IOPHEN,
    }
}

/// `APB1ENR` / `APB2ENR` bit of a USART.
#[inline]
pub(crate) const fn usart_enable_bit(usart: Usart) -> u32 {
    match usart {
        Usart::Usart1 => apb2enr::USART1EN,
        Usart::Usart2 => apb1enr::USART2EN,
        Usart::Usart3 => apb1enr::USART3EN,
        Usart::Uart4 => apb1enr::UART4EN,
        Usart::Uart5 => apb1enr::UART5EN,
    }
}

/// Enable the clock of a GPIO port.
#[inline]
pub fn enable_gpio<R: Registers>(regs: &mut R, port: Port) {
    regs.set_bits(reg::AHBENR, gpio_enable_bit(port));
}

/// Gate the clock of a GPIO port.
#[inline]
pub fn disable_gpio<R: Registers>(regs: &mut R, port: Port) {
    regs.clear_bits(reg::AHBENR, gpio_enable_bit(port));
}

#[inline]
pub fn is_gpio_enabled<R: Registers>(regs: &mut R, port: Port) -> bool {
    regs.is_set(reg::AHBENR, gpio_enable_bit(port))
}

/// Enable the clock of a USART.
#[inline]
pub fn enable_usart<R: Registers>(regs: &mut R, usart: Usart) {
    regs.set_bits(usart.bus().enable_register(), usart_enable_bit(usart));
}

/// Gate the clock of a USART.
#[inline]
pub fn disable_usart<R: Registers>(regs: &mut R, usart: Usart) {
    regs.clear_bits(usart.bus().enable_register(), usart_enable_bit(usart));
}

#[inline]
pub fn is_usart_enabled<R: Registers>(regs: &mut R, usart: Usart) -> bool {
    regs.is_set(usart.bus().enable_register(), usart_enable_bit(usart))
}
