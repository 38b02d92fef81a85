//! Alternate functions available per pin on the LQFP64 package (DS9118, tables 14 and 15).
//!
//! Each pin maps to a 16 bit mask with bit `n` set when `AFn` is connected to a peripheral
//! signal. Pins that are not bonded out have no entry.

use super::{AltFunction, Gpio, Pin, Port};

macro_rules! afs {
    ($($af:literal),* $(,)?) => {
        0u16 $(| 1 << $af)*
    };
}

#[rustfmt::skip]
const PORT_A: [u16; 16] = [
    afs!(1, 3, 7, 8, 9, 10, 15),            // PA0
    afs!(0, 1, 3, 7, 9, 15),                // PA1
    afs!(1, 3, 7, 8, 9, 15),                // PA2
    afs!(1, 3, 7, 9, 15),                   // PA3
    afs!(2, 3, 5, 6, 7, 15),                // PA4
    afs!(1, 3, 5, 15),                      // PA5
    afs!(1, 2, 3, 4, 5, 6, 8, 15),          // PA6
    afs!(1, 2, 3, 4, 5, 6, 8, 15),          // PA7
    afs!(0, 3, 4, 5, 6, 7, 8, 10, 15),      // PA8
    afs!(2, 3, 4, 5, 6, 7, 8, 9, 10, 15),   // PA9
    afs!(1, 3, 4, 5, 6, 7, 8, 10, 11, 15),  // PA10
    afs!(5, 6, 7, 8, 9, 10, 11, 12, 14, 15), // PA11
    afs!(1, 5, 6, 7, 8, 9, 10, 11, 14, 15), // PA12
    afs!(0, 1, 3, 5, 7, 10, 15),            // PA13
    afs!(0, 3, 4, 5, 6, 7, 15),             // PA14
    afs!(0, 1, 2, 3, 4, 5, 6, 7, 9, 15),    // PA15
];

#[rustfmt::skip]
const PORT_B: [u16; 16] = [
    afs!(2, 3, 4, 6, 15),                   // PB0
    afs!(2, 3, 4, 6, 8, 15),                // PB1
    afs!(3, 15),                            // PB2
    afs!(0, 1, 2, 3, 4, 5, 6, 7, 10, 15),   // PB3
    afs!(0, 1, 2, 3, 4, 5, 6, 7, 10, 15),   // PB4
    afs!(1, 2, 3, 4, 5, 6, 7, 8, 10, 15),   // PB5
    afs!(1, 2, 3, 4, 5, 6, 7, 10, 15),      // PB6
    afs!(1, 2, 3, 4, 5, 7, 10, 12, 15),     // PB7
    afs!(1, 2, 3, 4, 7, 8, 9, 10, 12, 15),  // PB8
    afs!(1, 2, 4, 6, 7, 8, 9, 10, 15),      // PB9
    afs!(1, 3, 7, 15),                      // PB10
    afs!(1, 3, 7, 15),                      // PB11
    afs!(3, 4, 5, 6, 7, 15),                // PB12
    afs!(3, 5, 6, 7, 15),                   // PB13
    afs!(1, 3, 5, 6, 7, 15),                // PB14
    afs!(0, 1, 2, 4, 5, 15),                // PB15
];

#[rustfmt::skip]
const PORT_C: [u16; 16] = [
    afs!(1, 2),                             // PC0
    afs!(1, 2),                             // PC1
    afs!(1, 2),                             // PC2
    afs!(1, 2, 6),                          // PC3
    afs!(1, 2, 7),                          // PC4
    afs!(1, 2, 3, 7),                       // PC5
    afs!(1, 2, 4, 6, 7),                    // PC6
    afs!(1, 2, 4, 6, 7),                    // PC7
    afs!(1, 2, 4, 7),                       // PC8
    afs!(1, 2, 3, 4, 5, 6),                 // PC9
    afs!(1, 4, 5, 6, 7),                    // PC10
    afs!(1, 4, 5, 6, 7),                    // PC11
    afs!(1, 4, 5, 6, 7),                    // PC12
    afs!(1, 4),                             // PC13
    afs!(1),                                // PC14
    afs!(1),                                // PC15
];

const PORT_D2: u16 = afs!(1, 2, 4, 5);
const PORT_F0: u16 = afs!(4, 5, 6);
const PORT_F1: u16 = afs!(4, 5);

/// Alternate functions of a pin, `None` if the pin is not available on the package.
pub const fn mask(pin: Gpio) -> Option<u16> {
    let mask = match (pin.0, pin.1) {
        (Port::A, pin) => PORT_A[pin as usize],
        (Port::B, pin) => PORT_B[pin as usize],
        (Port::C, pin) => PORT_C[pin as usize],
        (Port::D, Pin::P2) => PORT_D2,
        (Port::F, Pin::P0) => PORT_F0,
        (Port::F, Pin::P1) => PORT_F1,
        _ => 0,
    };
    if mask == 0 {
        None
    } else {
        Some(mask)
    }
}

/// Whether `af` connects `pin` to a peripheral.
#[inline]
pub const fn supports(pin: Gpio, af: AltFunction) -> bool {
    match mask(pin) {
        Some(mask) => mask & (1 << af as u16) != 0,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::{PA2, PA5, PB6, PC14, PD0, PD2, PH0};

    #[test]
    fn usart_pins() {
        assert!(supports(PA2, AltFunction::Af7));
        assert!(supports(PB6, AltFunction::Af7));
        assert!(!supports(PA5, AltFunction::Af7));
    }

    #[test]
    fn pins_outside_package() {
        assert_eq!(mask(PD0), None);
        assert_eq!(mask(PH0), None);
        assert!(!supports(PD0, AltFunction::Af1));
        assert_eq!(mask(PD2), Some(afs!(1, 2, 4, 5)));
        assert_eq!(mask(PC14), Some(1 << 1));
    }
}
