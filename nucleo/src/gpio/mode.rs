use core::ops::Not;

/// GPIO pin mode, `MODER` encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Input = 0b00,
    Output = 0b01,
    Alternate = 0b10,
    Analog = 0b11,
}

/// Pull-up / pull-down resistors, `PUPDR` encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    #[default]
    None = 0b00,
    Up = 0b01,
    Down = 0b10,
}

/// Output driver, `OTYPER` encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputType {
    #[default]
    PushPull = 0,
    OpenDrain = 1,
}

/// GPIO switching speed, `OSPEEDR` encoding.
///
/// Lower speeds can reduce ringing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    Low = 0b00,
    Medium = 0b01,
    #[default]
    High = 0b11,
}

/// Alternate function selector, `AFRL` / `AFRH` encoding.
///
/// Which functions a pin offers is listed in [`af`](super::af).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AltFunction {
    Af0 = 0,
    Af1 = 1,
    Af2 = 2,
    Af3 = 3,
    Af4 = 4,
    Af5 = 5,
    Af6 = 6,
    Af7 = 7,
    Af8 = 8,
    Af9 = 9,
    Af10 = 10,
    Af11 = 11,
    Af12 = 12,
    Af13 = 13,
    Af14 = 14,
    Af15 = 15,
}

/// Logic level of a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Reset,
    Set,
}

impl Mode {
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

impl Pull {
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

impl OutputType {
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

impl Speed {
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

impl AltFunction {
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

impl State {
    #[inline]
    pub const fn is_set(self) -> bool {
        matches!(self, Self::Set)
    }
}

impl From<bool> for State {
    #[inline]
    fn from(high: bool) -> Self {
        if high {
            Self::Set
        } else {
            Self::Reset
        }
    }
}

impl Not for State {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            Self::Reset => Self::Set,
            Self::Set => Self::Reset,
        }
    }
}
