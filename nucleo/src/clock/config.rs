use super::SysClkSource;
use crate::flash::Latency;

/// Default bound for every oscillator and switch readiness poll.
///
/// HSE crystals can take a couple of milliseconds to start, HSI and PLL lock within a few
/// hundred microseconds.
pub const STABILIZATION_TIMEOUT_US: u32 = 5_000;

/// HSE / HSI divider in front of the PLL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prediv {
    #[default]
    Div1,
    Div2,
    Div3,
    Div4,
    Div5,
    Div6,
    Div7,
    Div8,
    Div9,
    Div10,
    Div11,
    Div12,
    Div13,
    Div14,
    Div15,
    Div16,
}

/// PLL input clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PllSource {
    /// HSI divided by two, ignores the predivider.
    #[default]
    HsiDiv2,
    /// HSI through the predivider.
    Hsi,
    /// HSE through the predivider.
    Hse,
}

/// PLL multiplication factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PllMul {
    #[default]
    Mul2,
    Mul3,
    Mul4,
    Mul5,
    Mul6,
    Mul7,
    Mul8,
    Mul9,
    Mul10,
    Mul11,
    Mul12,
    Mul13,
    Mul14,
    Mul15,
    Mul16,
}

/// AHB (HCLK) prescaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AhbPrescaler {
    #[default]
    NotDivided,
    Div2,
    Div4,
    Div8,
    Div16,
    Div64,
    Div128,
    Div256,
    Div512,
}

/// APB1 / APB2 prescaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApbPrescaler {
    #[default]
    NotDivided,
    Div2,
    Div4,
    Div8,
    Div16,
}

impl Prediv {
    /// `PREDIV` field value.
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    #[inline]
    pub const fn divisor(self) -> u32 {
        self as u32 + 1
    }
}

impl PllSource {
    /// `PLLSRC` field value.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::HsiDiv2 => 0b00,
            Self::Hsi => 0b01,
            Self::Hse => 0b10,
        }
    }
}

impl PllMul {
    /// `PLLMUL` field value.
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    #[inline]
    pub const fn factor(self) -> u32 {
        self as u32 + 2
    }
}

impl AhbPrescaler {
    /// `HPRE` field value.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::NotDivided => 0b0000,
            Self::Div2 => 0b1000,
            Self::Div4 => 0b1001,
            Self::Div8 => 0b1010,
            Self::Div16 => 0b1011,
            Self::Div64 => 0b1100,
            Self::Div128 => 0b1101,
            Self::Div256 => 0b1110,
            Self::Div512 => 0b1111,
        }
    }
}

impl ApbPrescaler {
    /// `PPRE1` / `PPRE2` field value.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::NotDivided => 0b000,
            Self::Div2 => 0b100,
            Self::Div4 => 0b101,
            Self::Div8 => 0b110,
            Self::Div16 => 0b111,
        }
    }
}

/// Clock tree configuration, consumed by [`init`](super::init).
///
/// Field combinations are not validated: the caller is responsible for staying within the
/// frequency limits of the MCU (72MHz SYSCLK, 36MHz APB1) and for a flash latency that matches
/// the resulting HCLK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    pub source: SysClkSource,
    pub prediv: Prediv,
    pub pll_source: PllSource,
    pub pll_mul: PllMul,
    pub ahb: AhbPrescaler,
    pub apb1: ApbPrescaler,
    pub apb2: ApbPrescaler,
    pub flash_latency: Latency,
    /// HSE is driven by an external clock signal instead of a crystal.
    ///
    /// Only applied when HSE is started, i.e. HSE as system clock or as PLL input.
    pub hse_bypass: bool,
    /// Bound of each readiness poll in microseconds.
    pub timeout_us: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            source: SysClkSource::Hsi,
            prediv: Prediv::Div1,
            pll_source: PllSource::HsiDiv2,
            pll_mul: PllMul::Mul2,
            ahb: AhbPrescaler::NotDivided,
            apb1: ApbPrescaler::NotDivided,
            apb2: ApbPrescaler::NotDivided,
            flash_latency: Latency::ZeroWait,
            hse_bypass: false,
            timeout_us: STABILIZATION_TIMEOUT_US,
        }
    }
}

impl ClockConfig {
    /// Use HSI as SYSCLK.
    pub fn hsi() -> Self {
        Self::default()
    }

    /// Use HSE as SYSCLK.
    pub fn hse(bypass: bool) -> Self {
        Self {
            source: SysClkSource::Hse,
            hse_bypass: bypass,
            ..Self::default()
        }
    }

    /// Use the PLL as SYSCLK.
    pub fn pll(pll_source: PllSource, prediv: Prediv, pll_mul: PllMul) -> Self {
        Self {
            source: SysClkSource::Pll,
            pll_source,
            prediv,
            pll_mul,
            ..Self::default()
        }
    }

    /// 72MHz SYSCLK from HSI: 8MHz / 1 * 9, APB1 at 36MHz, two flash wait states.
    pub fn hsi_pll_72mhz() -> Self {
        Self::pll(PllSource::Hsi, Prediv::Div1, PllMul::Mul9)
            .with_apb1(ApbPrescaler::Div2)
            .with_flash_latency(Latency::TwoWait)
    }

    pub fn with_ahb(self, ahb: AhbPrescaler) -> Self {
        Self { ahb, ..self }
    }

    pub fn with_apb1(self, apb1: ApbPrescaler) -> Self {
        Self { apb1, ..self }
    }

    pub fn with_apb2(self, apb2: ApbPrescaler) -> Self {
        Self { apb2, ..self }
    }

    pub fn with_flash_latency(self, flash_latency: Latency) -> Self {
        Self {
            flash_latency,
            ..self
        }
    }

    pub fn with_timeout_us(self, timeout_us: u32) -> Self {
        Self { timeout_us, ..self }
    }
}
