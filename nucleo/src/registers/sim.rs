//! Simulated register file.
//!
//! Models the parts of RCC, FLASH and GPIO the HAL relies on, close enough to the silicon that
//! the clock and GPIO sequences can be exercised on the host:
//!
//! - oscillator ready flags follow their enable bits, unless the oscillator was marked faulty;
//! - the system clock switch status only follows the switch when the requested source is ready;
//! - PLL configuration is write protected while the PLL runs, `HSEBYP` while HSE runs;
//! - GPIO ports read as zero and ignore writes while their bus clock is gated;
//! - the `LCKR` key sequence freezes pin configuration until [`RegisterFile::reset`].

use super::bits::{acr, ahbenr, cfgr, cfgr2, cr, gpio as gpio_bits};
use super::{FlashRegister, GpioRegister, RccRegister, Register, Registers};
use crate::clock::Oscillator;
use crate::gpio::{Gpio, Port};
use crate::rcc;

/// Register state of a single GPIO port.
#[derive(Clone, Copy, Debug, Default)]
struct PortState {
    moder: u32,
    otyper: u32,
    ospeedr: u32,
    pupdr: u32,
    odr: u32,
    afrl: u32,
    afrh: u32,
    lck: u32,
    lock_stage: u8,
    locked: bool,
    /// Externally driven pin levels.
    input: u32,
}

impl PortState {
    fn reset(port: Port) -> Self {
        match port {
            Port::A => Self {
                moder: gpio_bits::MODER_RESET_A,
                ospeedr: gpio_bits::OSPEEDR_RESET_A,
                pupdr: gpio_bits::PUPDR_RESET_A,
                ..Self::default()
            },
            Port::B => Self {
                moder: gpio_bits::MODER_RESET_B,
                ospeedr: gpio_bits::OSPEEDR_RESET_B,
                pupdr: gpio_bits::PUPDR_RESET_B,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Pins whose configuration is frozen.
    fn locked_pins(&self) -> u32 {
        if self.locked {
            self.lck & gpio_bits::LCK_MASK
        } else {
            0
        }
    }

    fn output_pins(&self) -> u32 {
        (0..16)
            .filter(|pin| (self.moder >> (pin * 2)) & 0b11 == 0b01)
            .fold(0, |mask, pin| mask | 1 << pin)
    }

    fn idr(&self) -> u32 {
        let outputs = self.output_pins();
        ((self.odr & outputs) | (self.input & !outputs)) & 0xFFFF
    }

    fn read_lckr(&mut self) -> u32 {
        if self.lock_stage == 3 {
            self.locked = true;
            self.lock_stage = 0;
        }
        if self.locked {
            self.lck | gpio_bits::LCKK
        } else {
            self.lck
        }
    }

    fn write_lckr(&mut self, value: u32) {
        if self.locked {
            return;
        }
        let lck = value & gpio_bits::LCK_MASK;
        let key = value & gpio_bits::LCKK != 0;
        self.lock_stage = match (self.lock_stage, key) {
            (1, false) if lck == self.lck => 2,
            (2, true) if lck == self.lck => 3,
            (_, true) => 1,
            (_, false) => 0,
        };
        self.lck = lck;
    }
}

/// Bit mask covering `width` bits for every pin set in `pins`, starting at pin `first`.
fn spread(pins: u32, width: u32, first: u32, count: u32) -> u32 {
    (first..first + count)
        .filter(|pin| pins & (1 << pin) != 0)
        .fold(0, |mask, pin| {
            mask | (((1u32 << width) - 1) << ((pin - first) * width))
        })
}

/// Replace `old` with `new`, except for the bits in `frozen`.
#[inline]
fn merge(old: u32, new: u32, frozen: u32) -> u32 {
    (old & frozen) | (new & !frozen)
}

/// Simulated RCC, FLASH and GPIO register set.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    cr: u32,
    cfgr: u32,
    cfgr2: u32,
    ahbenr: u32,
    apb1enr: u32,
    apb2enr: u32,
    acr: u32,
    ports: [PortState; 8],
    faulty: [bool; 3],
    refuse_switch: bool,
    writes: usize,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Register file in its power-on reset state.
    pub fn new() -> Self {
        Self {
            cr: cr::RESET,
            cfgr: 0,
            cfgr2: 0,
            ahbenr: ahbenr::RESET,
            apb1enr: 0,
            apb2enr: 0,
            acr: acr::RESET,
            ports: Port::ALL.map(PortState::reset),
            faulty: [false; 3],
            refuse_switch: false,
            writes: 0,
        }
    }

    /// Simulate an MCU reset.
    ///
    /// Every register goes back to its reset value and pin locks are released. Injected faults
    /// stay in place, they model the board rather than the register contents.
    pub fn reset(&mut self) {
        let faulty = self.faulty;
        let refuse_switch = self.refuse_switch;
        *self = Self::new();
        self.faulty = faulty;
        self.refuse_switch = refuse_switch;
        self.update_ready();
    }

    /// Make an oscillator never report ready, e.g. a missing crystal or a PLL that cannot lock.
    pub fn fail_oscillator(&mut self, oscillator: Oscillator) {
        self.faulty[oscillator as usize] = true;
        self.update_ready();
    }

    /// Make the system clock switch ignore requests.
    pub fn refuse_switch(&mut self, refuse: bool) {
        self.refuse_switch = refuse;
    }

    /// Drive the level of an input pin.
    pub fn set_input(&mut self, pin: Gpio, high: bool) {
        let port = &mut self.ports[pin.0 as usize];
        let mask = 1 << pin.1 as u32;
        if high {
            port.input |= mask;
        } else {
            port.input &= !mask;
        }
    }

    /// Number of register writes since reset, including ignored ones.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Register content without side effects and regardless of bus clock gating.
    pub fn peek(&self, register: Register) -> u32 {
        match register {
            Register::Rcc(reg) => self.rcc(reg),
            Register::Flash(FlashRegister::Acr) => self.acr,
            Register::Gpio(port, reg) => {
                let state = &self.ports[port as usize];
                match reg {
                    GpioRegister::Moder => state.moder,
                    GpioRegister::Otyper => state.otyper,
                    GpioRegister::Ospeedr => state.ospeedr,
                    GpioRegister::Pupdr => state.pupdr,
                    GpioRegister::Idr => state.idr(),
                    GpioRegister::Odr => state.odr,
                    GpioRegister::Lckr => {
                        state.lck | if state.locked { gpio_bits::LCKK } else { 0 }
                    }
                    GpioRegister::Afrl => state.afrl,
                    GpioRegister::Afrh => state.afrh,
                    GpioRegister::Bsrr | GpioRegister::Brr => 0,
                }
            }
        }
    }

    fn rcc(&self, reg: RccRegister) -> u32 {
        match reg {
            RccRegister::Cr => self.cr,
            RccRegister::Cfgr => self.cfgr,
            RccRegister::Ahbenr => self.ahbenr,
            RccRegister::Apb2enr => self.apb2enr,
            RccRegister::Apb1enr => self.apb1enr,
            RccRegister::Cfgr2 => self.cfgr2,
        }
    }

    fn is_faulty(&self, oscillator: Oscillator) -> bool {
        self.faulty[oscillator as usize]
    }

    fn port_clocked(&self, port: Port) -> bool {
        self.ahbenr & rcc::gpio_enable_bit(port) != 0
    }

    fn sws(&self) -> u32 {
        (self.cfgr & cfgr::SWS_MASK) >> cfgr::SWS_SHIFT
    }

    fn update_ready(&mut self) {
        let mut value = self.cr & !(cr::HSIRDY | cr::HSERDY | cr::PLLRDY);
        if value & cr::HSION != 0 && !self.is_faulty(Oscillator::Hsi) {
            value |= cr::HSIRDY;
        }
        if value & cr::HSEON != 0 && !self.is_faulty(Oscillator::Hse) {
            value |= cr::HSERDY;
        }
        let pll_input_ready = match (self.cfgr & cfgr::PLLSRC_MASK) >> cfgr::PLLSRC_SHIFT {
            0b10 => value & cr::HSERDY != 0,
            _ => value & cr::HSIRDY != 0,
        };
        if value & cr::PLLON != 0 && pll_input_ready && !self.is_faulty(Oscillator::Pll) {
            value |= cr::PLLRDY;
        }
        self.cr = value;
    }

    fn write_cr(&mut self, value: u32) {
        let writable =
            cr::HSION | cr::HSITRIM_MASK | cr::HSEON | cr::HSEBYP | cr::CSSON | cr::PLLON;
        let mut next = merge(self.cr, value, !writable);
        if self.cr & cr::HSEON != 0 {
            next = merge(next, self.cr, !cr::HSEBYP);
        }
        // The oscillator driving the system clock cannot be stopped.
        next |= match self.sws() {
            cfgr::SW_HSI => cr::HSION,
            cfgr::SW_HSE => cr::HSEON,
            cfgr::SW_PLL => cr::PLLON,
            _ => 0,
        };
        self.cr = next;
        self.update_ready();
    }

    fn write_cfgr(&mut self, value: u32) {
        let mut next = merge(self.cfgr, value, cfgr::SWS_MASK);
        if self.cr & cr::PLLON != 0 {
            next = merge(next, self.cfgr, !(cfgr::PLLSRC_MASK | cfgr::PLLMUL_MASK));
        }
        let sw = (next & cfgr::SW_MASK) >> cfgr::SW_SHIFT;
        let ready = match sw {
            cfgr::SW_HSI => cr::HSIRDY,
            cfgr::SW_HSE => cr::HSERDY,
            cfgr::SW_PLL => cr::PLLRDY,
            _ => 0,
        };
        if !self.refuse_switch && self.cr & ready != 0 {
            next = (next & !cfgr::SWS_MASK) | (sw << cfgr::SWS_SHIFT);
        }
        self.cfgr = next;
        self.update_ready();
    }

    fn write_gpio(&mut self, port: Port, reg: GpioRegister, value: u32) {
        if !self.port_clocked(port) {
            return;
        }
        let state = &mut self.ports[port as usize];
        let locked = state.locked_pins();
        match reg {
            GpioRegister::Moder => state.moder = merge(state.moder, value, spread(locked, 2, 0, 16)),
            GpioRegister::Otyper => {
                state.otyper = merge(state.otyper, value & 0xFFFF, locked)
            }
            GpioRegister::Ospeedr => {
                state.ospeedr = merge(state.ospeedr, value, spread(locked, 2, 0, 16))
            }
            GpioRegister::Pupdr => state.pupdr = merge(state.pupdr, value, spread(locked, 2, 0, 16)),
            GpioRegister::Afrl => state.afrl = merge(state.afrl, value, spread(locked, 4, 0, 8)),
            GpioRegister::Afrh => state.afrh = merge(state.afrh, value, spread(locked, 4, 8, 8)),
            GpioRegister::Odr => state.odr = value & 0xFFFF,
            GpioRegister::Bsrr => {
                let set = value & 0xFFFF;
                let reset = value >> 16;
                state.odr = (state.odr & !reset) | set;
            }
            GpioRegister::Brr => state.odr &= !(value & 0xFFFF),
            GpioRegister::Lckr => state.write_lckr(value),
            GpioRegister::Idr => (),
        }
    }
}

impl Registers for RegisterFile {
    fn read(&mut self, register: Register) -> u32 {
        match register {
            Register::Gpio(port, _) if !self.port_clocked(port) => 0,
            Register::Gpio(port, GpioRegister::Lckr) => self.ports[port as usize].read_lckr(),
            _ => self.peek(register),
        }
    }

    fn write(&mut self, register: Register, value: u32) {
        self.writes += 1;
        match register {
            Register::Rcc(RccRegister::Cr) => self.write_cr(value),
            Register::Rcc(RccRegister::Cfgr) => self.write_cfgr(value),
            Register::Rcc(RccRegister::Cfgr2) => {
                if self.cr & cr::PLLON == 0 {
                    self.cfgr2 = merge(self.cfgr2, value, !cfgr2::PREDIV_MASK);
                }
            }
            Register::Rcc(RccRegister::Ahbenr) => self.ahbenr = value,
            Register::Rcc(RccRegister::Apb1enr) => self.apb1enr = value,
            Register::Rcc(RccRegister::Apb2enr) => self.apb2enr = value,
            Register::Flash(FlashRegister::Acr) => {
                let writable = acr::LATENCY_MASK | acr::HLFCYA | acr::PRFTBE;
                let mut next = value & writable;
                if next & acr::PRFTBE != 0 {
                    next |= acr::PRFTBS;
                }
                self.acr = next;
            }
            Register::Gpio(port, reg) => self.write_gpio(port, reg, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::reg;

    #[test]
    fn spread_covers_field_width() {
        assert_eq!(spread(0b101, 2, 0, 16), 0b11_00_11);
        assert_eq!(spread(1 << 9, 4, 8, 8), 0xF0);
        assert_eq!(spread(1 << 9, 4, 0, 8), 0);
    }

    #[test]
    fn reset_state_runs_from_hsi() {
        let mut regs = RegisterFile::new();
        assert_eq!(regs.read(reg::CR) & (cr::HSION | cr::HSIRDY), cr::HSION | cr::HSIRDY);
        assert_eq!(regs.read(reg::CFGR) & cfgr::SWS_MASK, 0);
        assert_eq!(regs.write_count(), 0);
    }

    #[test]
    fn switch_needs_ready_source() {
        let mut regs = RegisterFile::new();
        regs.write(reg::CFGR, cfgr::SW_HSE);
        assert_eq!(regs.sws(), cfgr::SW_HSI);

        regs.write(reg::CR, regs.peek(reg::CR) | cr::HSEON);
        regs.write(reg::CFGR, cfgr::SW_HSE);
        assert_eq!(regs.sws(), cfgr::SW_HSE);
    }

    #[test]
    fn pll_configuration_is_frozen_while_running() {
        let mut regs = RegisterFile::new();
        regs.write(reg::CFGR, 7 << cfgr::PLLMUL_SHIFT);
        regs.write(reg::CR, regs.peek(reg::CR) | cr::PLLON);
        regs.write(reg::CFGR, 0);
        assert_eq!(regs.peek(reg::CFGR) & cfgr::PLLMUL_MASK, 7 << cfgr::PLLMUL_SHIFT);
    }

    #[test]
    fn gated_port_ignores_access() {
        let mut regs = RegisterFile::new();
        let odr = Register::Gpio(Port::C, GpioRegister::Odr);
        regs.write(odr, 0xFF);
        assert_eq!(regs.read(odr), 0);
        assert_eq!(regs.write_count(), 1);
    }
}
