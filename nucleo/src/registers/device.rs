use stm32f3xx_hal::pac::{FLASH, GPIOA, RCC};

use super::{FlashRegister, GpioRegister, RccRegister, Register, Registers, GPIO_PORT_STRIDE};
use crate::gpio::Port;

type GpioPtr = stm32f3xx_hal::pac::gpioa::RegisterBlock;

/// The memory mapped registers of the MCU.
///
/// Zero sized; every access goes straight to the peripheral through the PAC register blocks.
/// Write-only registers (`BSRR`, `BRR`) read as zero and writes to `IDR` are dropped.
#[derive(Debug)]
pub struct Device {
    _private: (),
}

impl Device {
    /// Create a handle to the peripheral registers.
    ///
    /// # Safety
    ///
    /// The HAL does no locking. The caller must make sure that no other execution context
    /// accesses RCC, FLASH or a GPIO port while an operation on this handle runs.
    #[inline]
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

/// All GPIO ports share the port A register layout.
#[inline]
fn port_ptr(port: Port) -> *const GpioPtr {
    (GPIOA::ptr() as usize + port as usize * GPIO_PORT_STRIDE) as *const GpioPtr
}

impl Registers for Device {
    #[inline]
    fn read(&mut self, register: Register) -> u32 {
        unsafe {
            match register {
                Register::Rcc(reg) => {
                    let rcc = &*RCC::ptr();
                    match reg {
                        RccRegister::Cr => rcc.cr.read().bits(),
                        RccRegister::Cfgr => rcc.cfgr.read().bits(),
                        RccRegister::Ahbenr => rcc.ahbenr.read().bits(),
                        RccRegister::Apb2enr => rcc.apb2enr.read().bits(),
                        RccRegister::Apb1enr => rcc.apb1enr.read().bits(),
                        RccRegister::Cfgr2 => rcc.cfgr2.read().bits(),
                    }
                }
                Register::Flash(FlashRegister::Acr) => (*FLASH::ptr()).acr.read().bits(),
                Register::Gpio(port, reg) => {
                    let gpio = &*port_ptr(port);
                    match reg {
                        GpioRegister::Moder => gpio.moder.read().bits(),
                        GpioRegister::Otyper => gpio.otyper.read().bits(),
                        GpioRegister::Ospeedr => gpio.ospeedr.read().bits(),
                        GpioRegister::Pupdr => gpio.pupdr.read().bits(),
                        GpioRegister::Idr => gpio.idr.read().bits(),
                        GpioRegister::Odr => gpio.odr.read().bits(),
                        GpioRegister::Lckr => gpio.lckr.read().bits(),
                        GpioRegister::Afrl => gpio.afrl.read().bits(),
                        GpioRegister::Afrh => gpio.afrh.read().bits(),
                        GpioRegister::Bsrr | GpioRegister::Brr => 0,
                    }
                }
            }
        }
    }

    #[inline]
    fn write(&mut self, register: Register, value: u32) {
        unsafe {
            match register {
                Register::Rcc(reg) => {
                    let rcc = &*RCC::ptr();
                    match reg {
                        RccRegister::Cr => rcc.cr.write(|w| w.bits(value)),
                        RccRegister::Cfgr => rcc.cfgr.write(|w| w.bits(value)),
                        RccRegister::Ahbenr => rcc.ahbenr.write(|w| w.bits(value)),
                        RccRegister::Apb2enr => rcc.apb2enr.write(|w| w.bits(value)),
                        RccRegister::Apb1enr => rcc.apb1enr.write(|w| w.bits(value)),
                        RccRegister::Cfgr2 => rcc.cfgr2.write(|w| w.bits(value)),
                    }
                }
                Register::Flash(FlashRegister::Acr) => {
                    (*FLASH::ptr()).acr.write(|w| w.bits(value))
                }
                Register::Gpio(port, reg) => {
                    let gpio = &*port_ptr(port);
                    match reg {
                        GpioRegister::Moder => gpio.moder.write(|w| w.bits(value)),
                        GpioRegister::Otyper => gpio.otyper.write(|w| w.bits(value)),
                        GpioRegister::Ospeedr => gpio.ospeedr.write(|w| w.bits(value)),
                        GpioRegister::Pupdr => gpio.pupdr.write(|w| w.bits(value)),
                        GpioRegister::Odr => gpio.odr.write(|w| w.bits(value)),
                        GpioRegister::Bsrr => gpio.bsrr.write(|w| w.bits(value)),
                        GpioRegister::Lckr => gpio.lckr.write(|w| w.bits(value)),
                        GpioRegister::Afrl => gpio.afrl.write(|w| w.bits(value)),
                        GpioRegister::Afrh => gpio.afrh.write(|w| w.bits(value)),
                        GpioRegister::Brr => gpio.brr.write(|w| w.bits(value)),
                        GpioRegister::Idr => (),
                    }
                }
            }
        }
    }
}
