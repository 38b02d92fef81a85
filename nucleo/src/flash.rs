//! Flash access control.

use crate::registers::bits::acr;
use crate::registers::{reg, Registers};

/// Flash wait states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Latency {
    /// 0 < HCLK <= 24MHz
    #[default]
    ZeroWait = 0,
    /// 24MHz < HCLK <= 48MHz
    OneWait = 1,
    /// 48MHz < HCLK <= 72MHz
    TwoWait = 2,
}

impl Latency {
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(Self::ZeroWait),
            1 => Some(Self::OneWait),
            2 => Some(Self::TwoWait),
            _ => None,
        }
    }
}

/// Program the number of wait states. Prefetch and half cycle settings are kept.
#[inline]
pub fn set_latency<R: Registers>(regs: &mut R, latency: Latency) {
    regs.write_field(reg::ACR, acr::LATENCY_MASK, acr::LATENCY_SHIFT, latency.bits());
}

/// Currently programmed wait states, `None` for a reserved value.
#[inline]
pub fn latency<R: Registers>(regs: &mut R) -> Option<Latency> {
    Latency::from_bits((regs.read(reg::ACR) & acr::LATENCY_MASK) >> acr::LATENCY_SHIFT)
}
