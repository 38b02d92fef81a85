//! Bit fields of the registers used by the HAL (RM0316).

/// `RCC_CR`: clock control register.
pub mod cr {
    pub const HSION: u32 = 1 << 0;
    pub const HSIRDY: u32 = 1 << 1;
    pub const HSITRIM_MASK: u32 = 0x1F << 3;
    pub const HSICAL_MASK: u32 = 0xFF << 8;
    pub const HSEON: u32 = 1 << 16;
    pub const HSERDY: u32 = 1 << 17;
    pub const HSEBYP: u32 = 1 << 18;
    pub const CSSON: u32 = 1 << 19;
    pub const PLLON: u32 = 1 << 24;
    pub const PLLRDY: u32 = 1 << 25;

    /// Value after reset: HSI on and ready, trimming at its default of 16.
    pub const RESET: u32 = HSION | HSIRDY | (16 << 3);
}

/// `RCC_CFGR`: clock configuration register.
pub mod cfgr {
    pub const SW_SHIFT: u32 = 0;
    pub const SW_MASK: u32 = 0b11 << SW_SHIFT;
    pub const SWS_SHIFT: u32 = 2;
    pub const SWS_MASK: u32 = 0b11 << SWS_SHIFT;
    pub const HPRE_SHIFT: u32 = 4;
    pub const HPRE_MASK: u32 = 0xF << HPRE_SHIFT;
    pub const PPRE1_SHIFT: u32 = 8;
    pub const PPRE1_MASK: u32 = 0b111 << PPRE1_SHIFT;
    pub const PPRE2_SHIFT: u32 = 11;
    pub const PPRE2_MASK: u32 = 0b111 << PPRE2_SHIFT;
    /// Two bit PLL source selection on the xD/xE devices.
    pub const PLLSRC_SHIFT: u32 = 15;
    pub const PLLSRC_MASK: u32 = 0b11 << PLLSRC_SHIFT;
    pub const PLLMUL_SHIFT: u32 = 18;
    pub const PLLMUL_MASK: u32 = 0xF << PLLMUL_SHIFT;

    /// `SW` / `SWS` encodings.
    pub const SW_HSI: u32 = 0b00;
    pub const SW_HSE: u32 = 0b01;
    pub const SW_PLL: u32 = 0b10;
}

/// `RCC_CFGR2`: clock configuration register 2.
pub mod cfgr2 {
    pub const PREDIV_SHIFT: u32 = 0;
    pub const PREDIV_MASK: u32 = 0xF << PREDIV_SHIFT;
}

/// `RCC_AHBENR`: AHB peripheral clock enable register.
pub mod ahbenr {
    pub const SRAMEN: u32 = 1 << 2;
    pub const FLITFEN: u32 = 1 << 4;
    pub const IOPHEN: u32 = 1 << 16;
    pub const IOPAEN: u32 = 1 << 17;
    pub const IOPBEN: u32 = 1 << 18;
    pub const IOPCEN: u32 = 1 << 19;
    pub const IOPDEN: u32 = 1 << 20;
    pub const IOPEEN: u32 = 1 << 21;
    pub const IOPFEN: u32 = 1 << 22;
    pub const IOPGEN: u32 = 1 << 23;

    pub const RESET: u32 = SRAMEN | FLITFEN;
}

/// `RCC_APB1ENR`: APB1 peripheral clock enable register.
pub mod apb1enr {
    pub const USART2EN: u32 = 1 << 17;
    pub const USART3EN: u32 = 1 << 18;
    pub const UART4EN: u32 = 1 << 19;
    pub const UART5EN: u32 = 1 << 20;
}

/// `RCC_APB2ENR`: APB2 peripheral clock enable register.
pub mod apb2enr {
    pub const USART1EN: u32 = 1 << 14;
}

/// `FLASH_ACR`: flash access control register.
pub mod acr {
    pub const LATENCY_SHIFT: u32 = 0;
    pub const LATENCY_MASK: u32 = 0b111 << LATENCY_SHIFT;
    pub const HLFCYA: u32 = 1 << 3;
    pub const PRFTBE: u32 = 1 << 4;
    pub const PRFTBS: u32 = 1 << 5;

    /// Prefetch buffer enabled and active, zero wait states.
    pub const RESET: u32 = PRFTBE | PRFTBS;
}

/// GPIO port registers.
pub mod gpio {
    /// Lock key in `LCKR`.
    pub const LCKK: u32 = 1 << 16;
    /// Pin lock bits in `LCKR`.
    pub const LCK_MASK: u32 = 0xFFFF;

    /// Reset values of port A (SWD pins in alternate function mode).
    pub const MODER_RESET_A: u32 = 0xA800_0000;
    pub const OSPEEDR_RESET_A: u32 = 0x0C00_0000;
    pub const PUPDR_RESET_A: u32 = 0x6400_0000;

    /// Reset values of port B (SWO pin in alternate function mode).
    pub const MODER_RESET_B: u32 = 0x0000_0280;
    pub const OSPEEDR_RESET_B: u32 = 0x0000_00C0;
    pub const PUPDR_RESET_B: u32 = 0x0000_0100;
}
