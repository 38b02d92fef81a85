//! Block program for certain period of time.
//!
//! Clock stabilization waits are bounded polls against an injected
//! [`DelayUs`](embedded_hal::blocking::delay::DelayUs) time source. On target that is
//! [`CycleDelay`], which counts core cycles and is only as accurate as the core clock it was
//! created for.

use embedded_hal::blocking::delay::DelayUs;

/// Interval between two readiness checks.
pub const POLL_INTERVAL_US: u32 = 10;

/// Poll `ready` until it returns `true` or `timeout_us` microseconds were spent waiting.
///
/// The condition is always checked at least once, and once more after the last wait. The total
/// time handed to `delay` never exceeds `timeout_us`.
pub fn poll_until<D, F>(delay: &mut D, timeout_us: u32, mut ready: F) -> bool
where
    D: DelayUs<u32>,
    F: FnMut() -> bool,
{
    let mut waited = 0;
    loop {
        if ready() {
            return true;
        }
        if waited >= timeout_us {
            return false;
        }
        let step = POLL_INTERVAL_US.min(timeout_us - waited);
        delay.delay_us(step);
        waited += step;
    }
}

#[cfg(feature = "device")]
pub use cycle::CycleDelay;

#[cfg(feature = "device")]
mod cycle {
    use embedded_hal::blocking::delay::{DelayMs, DelayUs};
    use fugit::HertzU32;

    use crate::clock;

    /// Busy-wait delay counted in core clock cycles.
    ///
    /// Blocks for *at least* the requested time as long as the core runs at the frequency the
    /// delay was created with. Not calibrated against a timer.
    #[derive(Clone, Copy, Debug)]
    pub struct CycleDelay {
        cycles_per_us: u32,
    }

    impl CycleDelay {
        #[inline]
        pub fn new(sysclk: HertzU32) -> Self {
            Self {
                cycles_per_us: (sysclk.raw() / 1_000_000).max(1),
            }
        }

        /// Delay for a core running from HSI, the clock after reset.
        #[inline]
        pub fn at_reset_clock() -> Self {
            Self::new(clock::HSI_FREQ)
        }
    }

    impl DelayUs<u32> for CycleDelay {
        #[inline]
        fn delay_us(&mut self, us: u32) {
            cortex_m::asm::delay(self.cycles_per_us.saturating_mul(us));
        }
    }

    impl DelayMs<u32> for CycleDelay {
        #[inline]
        fn delay_ms(&mut self, ms: u32) {
            for _ in 0..ms {
                self.delay_us(1_000);
            }
        }
    }
}
