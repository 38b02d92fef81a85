/// Available GPIO ports.
///
/// Ports E and G are not bonded out on the LQFP64 package, only PD2 and PF0/PF1 of ports D and F
/// are.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

/// Available GPIO pins.
#[repr(u8)]
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pin {
    P0  = 0,
    P1  = 1,
    P2  = 2,
    P3  = 3,
    P4  = 4,
    P5  = 5,
    P6  = 6,
    P7  = 7,
    P8  = 8,
    P9  = 9,
    P10 = 10,
    P11 = 11,
    P12 = 12,
    P13 = 13,
    P14 = 14,
    P15 = 15,
}

impl Port {
    pub const ALL: [Port; 8] = [
        Port::A,
        Port::B,
        Port::C,
        Port::D,
        Port::E,
        Port::F,
        Port::G,
        Port::H,
    ];
}

impl Pin {
    #[rustfmt::skip]
    pub const ALL: [Pin; 16] = [
        Pin::P0,  Pin::P1,  Pin::P2,  Pin::P3,
        Pin::P4,  Pin::P5,  Pin::P6,  Pin::P7,
        Pin::P8,  Pin::P9,  Pin::P10, Pin::P11,
        Pin::P12, Pin::P13, Pin::P14, Pin::P15,
    ];

    /// Single bit mask of the pin in the 16 bit port registers.
    #[inline]
    pub const fn mask(self) -> u32 {
        1 << self as u32
    }
}
