//! Register access.
//!
//! The HAL never dereferences peripheral addresses itself. Every operation receives a
//! [`Registers`] implementation and names the register it wants through [`Register`].

#[cfg(feature = "device")]
mod device;
pub mod bits;
pub mod sim;

#[cfg(feature = "device")]
pub use device::Device;

use crate::gpio::Port;

/// Base address of the reset and clock control unit.
pub const RCC_BASE: usize = 0x4002_1000;
/// Base address of the flash interface.
pub const FLASH_BASE: usize = 0x4002_2000;
/// Base address of GPIO port A. Ports B to H follow at [`GPIO_PORT_STRIDE`] intervals.
pub const GPIO_BASE: usize = 0x4800_0000;
/// Address distance between two GPIO ports.
pub const GPIO_PORT_STRIDE: usize = 0x400;

/// Reset and clock control registers used by the HAL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RccRegister {
    Cr,
    Cfgr,
    Ahbenr,
    Apb2enr,
    Apb1enr,
    Cfgr2,
}

/// Flash interface registers used by the HAL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashRegister {
    Acr,
}

/// Registers of a single GPIO port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioRegister {
    Moder,
    Otyper,
    Ospeedr,
    Pupdr,
    Idr,
    Odr,
    Bsrr,
    Lckr,
    Afrl,
    Afrh,
    Brr,
}

/// A memory mapped register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    Rcc(RccRegister),
    Flash(FlashRegister),
    Gpio(Port, GpioRegister),
}

impl RccRegister {
    #[inline]
    pub const fn offset(self) -> usize {
        match self {
            Self::Cr => 0x00,
            Self::Cfgr => 0x04,
            Self::Ahbenr => 0x14,
            Self::Apb2enr => 0x18,
            Self::Apb1enr => 0x1C,
            Self::Cfgr2 => 0x2C,
        }
    }
}

impl GpioRegister {
    #[inline]
    pub const fn offset(self) -> usize {
        match self {
            Self::Moder => 0x00,
            Self::Otyper => 0x04,
            Self::Ospeedr => 0x08,
            Self::Pupdr => 0x0C,
            Self::Idr => 0x10,
            Self::Odr => 0x14,
            Self::Bsrr => 0x18,
            Self::Lckr => 0x1C,
            Self::Afrl => 0x20,
            Self::Afrh => 0x24,
            Self::Brr => 0x28,
        }
    }
}

impl Register {
    /// Memory mapped address of the register.
    #[inline]
    pub const fn address(self) -> usize {
        match self {
            Self::Rcc(reg) => RCC_BASE + reg.offset(),
            Self::Flash(FlashRegister::Acr) => FLASH_BASE,
            Self::Gpio(port, reg) => GPIO_BASE + port as usize * GPIO_PORT_STRIDE + reg.offset(),
        }
    }
}

/// Access to the peripheral register set.
///
/// Reads take `&mut self` because some reads have side effects on the hardware (reading `LCKR`
/// completes the pin lock sequence).
pub trait Registers {
    /// Read the full register value.
    fn read(&mut self, register: Register) -> u32;

    /// Write the full register value.
    fn write(&mut self, register: Register, value: u32);

    /// Read-modify-write. Not atomic.
    #[inline]
    fn modify<F>(&mut self, register: Register, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(register);
        self.write(register, f(value));
    }

    /// Set the bits in `mask`, leaving the others untouched.
    #[inline]
    fn set_bits(&mut self, register: Register, mask: u32) {
        self.modify(register, |value| value | mask);
    }

    /// Clear the bits in `mask`, leaving the others untouched.
    #[inline]
    fn clear_bits(&mut self, register: Register, mask: u32) {
        self.modify(register, |value| value & !mask);
    }

    /// Replace the field selected by `mask` with `value << shift`.
    #[inline]
    fn write_field(&mut self, register: Register, mask: u32, shift: u32, value: u32) {
        self.modify(register, |reg| (reg & !mask) | ((value << shift) & mask));
    }

    /// Whether any bit of `mask` is set.
    #[inline]
    fn is_set(&mut self, register: Register, mask: u32) -> bool {
        self.read(register) & mask != 0
    }
}

impl<R: Registers + ?Sized> Registers for &mut R {
    #[inline]
    fn read(&mut self, register: Register) -> u32 {
        (**self).read(register)
    }

    #[inline]
    fn write(&mut self, register: Register, value: u32) {
        (**self).write(register, value)
    }
}

/// Shorthands for the registers used by the clock components.
pub(crate) mod reg {
    use super::{FlashRegister, RccRegister, Register};

    pub const CR: Register = Register::Rcc(RccRegister::Cr);
    pub const CFGR: Register = Register::Rcc(RccRegister::Cfgr);
    pub const CFGR2: Register = Register::Rcc(RccRegister::Cfgr2);
    pub const AHBENR: Register = Register::Rcc(RccRegister::Ahbenr);
    pub const APB1ENR: Register = Register::Rcc(RccRegister::Apb1enr);
    pub const APB2ENR: Register = Register::Rcc(RccRegister::Apb2enr);
    pub const ACR: Register = Register::Flash(FlashRegister::Acr);
}
