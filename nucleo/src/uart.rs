//! USART instances.
//!
//! Only the bus clock of a USART is handled (see [`rcc::enable_usart`](crate::rcc::enable_usart)),
//! data transfer is out of reach of this crate.

use crate::rcc::Bus;

/// Available USART peripherals.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Usart {
    Usart1,
    Usart2,
    Usart3,
    Uart4,
    Uart5,
}

impl Usart {
    /// Bus the peripheral is connected to.
    #[inline]
    pub const fn bus(self) -> Bus {
        match self {
            Self::Usart1 => Bus::Apb2,
            Self::Usart2 | Self::Usart3 | Self::Uart4 | Self::Uart5 => Bus::Apb1,
        }
    }
}
