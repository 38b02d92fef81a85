#![no_main]
#![no_std]

extern crate panic_halt;

use cortex_m_rt::entry;
use cortex_m_semihosting::hprintln;
use embedded_hal::blocking::delay::DelayMs;
use nucleo::clock::{self, ClockConfig, Frequencies};
use nucleo::delay::CycleDelay;
use nucleo::registers::Device;
use nucleo::{led, Led};
use stm32f3xx_hal as _;

/// Half period of the blinking.
const BLINK_DELAY_MS: u32 = 500;

/// No crystal is fitted for HSE on the Nucleo-F303RE, the ST-LINK MCO provides 8MHz.
const HSE_FREQ: fugit::HertzU32 = fugit::HertzU32::MHz(8);

/// Park the core after an unrecoverable setup failure.
fn trap() -> ! {
    loop {
        cortex_m::asm::nop();
    }
}

#[entry]
fn main() -> ! {
    if cfg!(debug_assertions) {
        hprintln!("Hello Nucleo!");
    }

    // Only this context touches the peripherals.
    let mut regs = unsafe { Device::steal() };
    let mut delay = CycleDelay::at_reset_clock();

    // System setup:

    let config = ClockConfig::hsi_pll_72mhz();
    if let Err(error) = clock::init(&mut regs, &mut delay, &config) {
        if cfg!(debug_assertions) {
            hprintln!("clock setup failed: {}", error);
        }
        trap();
    }

    let clocks = Frequencies::read(&mut regs, HSE_FREQ);
    if cfg!(debug_assertions) {
        hprintln!("SYSCLK {} Hz", clocks.sysclk.raw());
    }
    let mut delay = CycleDelay::new(clocks.sysclk);

    let mut led = match Led::new(&mut regs, led::LD2, false) {
        Ok(led) => led,
        Err(error) => {
            if cfg!(debug_assertions) {
                hprintln!("LED setup failed: {}", error);
            }
            trap();
        }
    };

    loop {
        led.toggle(&mut regs);
        delay.delay_ms(BLINK_DELAY_MS);
    }
}
