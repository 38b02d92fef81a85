//! Clock sources: which bits enable them, report readiness and select them as system clock.

use super::config::PllSource;
use crate::registers::bits::{cfgr, cr};
use crate::registers::{reg, Registers};

/// Oscillators of the clock tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oscillator {
    /// Internal 8MHz RC oscillator.
    Hsi = 0,
    /// External crystal or clock signal.
    Hse = 1,
    /// Phase locked loop.
    Pll = 2,
}

/// System clock source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SysClkSource {
    #[default]
    Hsi,
    Hse,
    Pll,
}

impl Oscillator {
    /// Enable bit in `RCC_CR`.
    #[inline]
    pub const fn enable_bit(self) -> u32 {
        match self {
            Self::Hsi => cr::HSION,
            Self::Hse => cr::HSEON,
            Self::Pll => cr::PLLON,
        }
    }

    /// Ready flag in `RCC_CR`.
    #[inline]
    pub const fn ready_bit(self) -> u32 {
        match self {
            Self::Hsi => cr::HSIRDY,
            Self::Hse => cr::HSERDY,
            Self::Pll => cr::PLLRDY,
        }
    }

    #[inline]
    pub fn is_enabled<R: Registers>(self, regs: &mut R) -> bool {
        regs.is_set(reg::CR, self.enable_bit())
    }

    #[inline]
    pub fn is_ready<R: Registers>(self, regs: &mut R) -> bool {
        regs.is_set(reg::CR, self.ready_bit())
    }
}

impl SysClkSource {
    /// `SW` / `SWS` field value.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Hsi => cfgr::SW_HSI,
            Self::Hse => cfgr::SW_HSE,
            Self::Pll => cfgr::SW_PLL,
        }
    }

    /// Decode the `SWS` field. `0b11` is reserved.
    #[inline]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            cfgr::SW_HSI => Some(Self::Hsi),
            cfgr::SW_HSE => Some(Self::Hse),
            cfgr::SW_PLL => Some(Self::Pll),
            _ => None,
        }
    }

    /// Oscillator that has to run before this source can be used.
    ///
    /// For the PLL this is its input, the PLL itself is started separately once configured.
    #[inline]
    pub const fn oscillator(self, pll_source: PllSource) -> Oscillator {
        match (self, pll_source) {
            (Self::Hsi, _) => Oscillator::Hsi,
            (Self::Hse, _) => Oscillator::Hse,
            (Self::Pll, PllSource::Hse) => Oscillator::Hse,
            (Self::Pll, PllSource::HsiDiv2 | PllSource::Hsi) => Oscillator::Hsi,
        }
    }

    /// Source currently driving the system clock, as reported by the switch status.
    #[inline]
    pub fn current<R: Registers>(regs: &mut R) -> Option<Self> {
        Self::from_bits((regs.read(reg::CFGR) & cfgr::SWS_MASK) >> cfgr::SWS_SHIFT)
    }

    #[inline]
    pub fn is_selected<R: Registers>(self, regs: &mut R) -> bool {
        Self::current(regs) == Some(self)
    }

    /// Source requested in the switch. Differs from [`current`][Self::current] while a switch is
    /// pending or was not followed.
    #[inline]
    pub fn requested<R: Registers>(regs: &mut R) -> Option<Self> {
        Self::from_bits((regs.read(reg::CFGR) & cfgr::SW_MASK) >> cfgr::SW_SHIFT)
    }

    /// Request this source in the system clock switch.
    #[inline]
    pub(crate) fn select<R: Registers>(self, regs: &mut R) {
        regs.write_field(reg::CFGR, cfgr::SW_MASK, cfgr::SW_SHIFT, self.bits());
    }
}
