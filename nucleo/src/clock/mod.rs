//! System clock setup.
//!
//! [`init`] brings the clock tree from whatever state it is in into the state described by a
//! [`ClockConfig`]: bus prescalers, the oscillator behind the requested system clock, PLL
//! parameters and flash wait states. [`deinit`] returns it to the reset configuration, running
//! from HSI.

mod config;
mod source;

use embedded_hal::blocking::delay::DelayUs;
use fugit::HertzU32;

pub use config::{
    AhbPrescaler, ApbPrescaler, ClockConfig, PllMul, PllSource, Prediv, STABILIZATION_TIMEOUT_US,
};
pub use source::{Oscillator, SysClkSource};

use crate::delay::poll_until;
use crate::error::ClockError;
use crate::flash::{self, Latency};
use crate::registers::bits::{cfgr, cfgr2, cr};
use crate::registers::{reg, Registers};

/// Frequency of the internal RC oscillator.
pub const HSI_FREQ: HertzU32 = HertzU32::MHz(8);

/// Configure the clock tree.
///
/// The current configuration is reset with [`deinit`] first, so the result does not depend on
/// what ran before. Flash wait states are programmed before the system clock is switched to a
/// faster source.
///
/// Steps already done when an error is returned are not rolled back. The system clock then
/// still runs from HSI, or from the oscillator started for `config.source` if only the final
/// switch failed. [`is_consistent`] tells whether the hardware matches `config`.
///
/// # Errors
///
/// - [`ClockError::ClockSourceNotReady`] if the required oscillator (or the PLL) did not report
///   ready within `config.timeout_us`. Also returned with [`Oscillator::Hse`] if a running HSE
///   has to be stopped to change its bypass setting and does not stop in time.
/// - [`ClockError::ClockSourceNotSelected`] if the switch status does not follow the request.
pub fn init<R, D>(regs: &mut R, delay: &mut D, config: &ClockConfig) -> Result<(), ClockError>
where
    R: Registers,
    D: DelayUs<u32>,
{
    debug!("clock init: {}", config);
    reset_to_hsi(regs, delay, config.timeout_us)?;

    regs.modify(reg::CFGR, |value| {
        (value & !(cfgr::HPRE_MASK | cfgr::PPRE1_MASK | cfgr::PPRE2_MASK))
            | config.ahb.bits() << cfgr::HPRE_SHIFT
            | config.apb1.bits() << cfgr::PPRE1_SHIFT
            | config.apb2.bits() << cfgr::PPRE2_SHIFT
    });

    let oscillator = config.source.oscillator(config.pll_source);
    let bypass = oscillator == Oscillator::Hse && config.hse_bypass;
    // Bypass can only be changed while HSE is off. HSI drives the system clock here.
    if Oscillator::Hse.is_enabled(regs) && regs.is_set(reg::CR, cr::HSEBYP) != bypass {
        stop(regs, delay, Oscillator::Hse, config.timeout_us)?;
    }
    regs.clear_bits(reg::CR, cr::HSEBYP);
    if bypass {
        regs.set_bits(reg::CR, cr::HSEBYP);
    }
    start(regs, delay, oscillator, config.timeout_us)?;

    regs.modify(reg::CFGR, |value| {
        (value & !(cfgr::PLLSRC_MASK | cfgr::PLLMUL_MASK))
            | config.pll_source.bits() << cfgr::PLLSRC_SHIFT
            | config.pll_mul.bits() << cfgr::PLLMUL_SHIFT
    });
    regs.write_field(
        reg::CFGR2,
        cfgr2::PREDIV_MASK,
        cfgr2::PREDIV_SHIFT,
        config.prediv.bits(),
    );

    flash::set_latency(regs, config.flash_latency);

    if config.source == SysClkSource::Pll {
        start(regs, delay, Oscillator::Pll, config.timeout_us)?;
        if !(Oscillator::Pll.is_enabled(regs) && Oscillator::Pll.is_ready(regs)) {
            warn!("PLL lost lock");
            return Err(ClockError::ClockSourceNotReady(Oscillator::Pll));
        }
    }

    switch(regs, delay, config.source, config.timeout_us)
}

/// Return the clock tree to its reset configuration.
///
/// Does nothing (no register is written) if HSI already drives the system clock, no other source
/// is requested and the PLL is off. Otherwise HSI is started and selected, then PLL and HSE are
/// stopped, their configuration and the bus prescalers are cleared and flash goes back to zero
/// wait states.
///
/// # Errors
///
/// - [`ClockError::ClockSourceNotReady`] with [`Oscillator::Hsi`] if HSI does not start.
/// - [`ClockError::ClockSourceNotSelected`] with [`SysClkSource::Hsi`] if the switch fails.
///
/// In both cases the remaining configuration is left untouched.
pub fn deinit<R, D>(regs: &mut R, delay: &mut D) -> Result<(), ClockError>
where
    R: Registers,
    D: DelayUs<u32>,
{
    reset_to_hsi(regs, delay, STABILIZATION_TIMEOUT_US)
}

fn reset_to_hsi<R, D>(regs: &mut R, delay: &mut D, timeout_us: u32) -> Result<(), ClockError>
where
    R: Registers,
    D: DelayUs<u32>,
{
    if SysClkSource::Hsi.is_selected(regs)
        && SysClkSource::requested(regs) == Some(SysClkSource::Hsi)
        && !Oscillator::Pll.is_enabled(regs)
    {
        trace!("clock already at reset configuration");
        return Ok(());
    }

    start(regs, delay, Oscillator::Hsi, timeout_us)?;
    switch(regs, delay, SysClkSource::Hsi, timeout_us)?;

    // PLL and HSE first: their configuration is write protected while they run.
    regs.clear_bits(reg::CR, cr::PLLON | cr::HSEON);
    regs.clear_bits(reg::CR, cr::HSEBYP);
    regs.clear_bits(
        reg::CFGR,
        cfgr::HPRE_MASK
            | cfgr::PPRE1_MASK
            | cfgr::PPRE2_MASK
            | cfgr::PLLSRC_MASK
            | cfgr::PLLMUL_MASK,
    );
    regs.clear_bits(reg::CFGR2, cfgr2::PREDIV_MASK);
    flash::set_latency(regs, Latency::ZeroWait);

    debug!("clock reset to HSI");
    Ok(())
}

/// Enable an oscillator and wait until it reports ready.
fn start<R, D>(
    regs: &mut R,
    delay: &mut D,
    oscillator: Oscillator,
    timeout_us: u32,
) -> Result<(), ClockError>
where
    R: Registers,
    D: DelayUs<u32>,
{
    regs.set_bits(reg::CR, oscillator.enable_bit());
    if poll_until(delay, timeout_us, || oscillator.is_ready(regs)) {
        trace!("{} ready", oscillator);
        Ok(())
    } else {
        warn!("{} not ready after {} us", oscillator, timeout_us);
        Err(ClockError::ClockSourceNotReady(oscillator))
    }
}

/// Disable an oscillator and wait until its ready flag drops.
///
/// Must not be called for the oscillator behind the system clock.
fn stop<R, D>(
    regs: &mut R,
    delay: &mut D,
    oscillator: Oscillator,
    timeout_us: u32,
) -> Result<(), ClockError>
where
    R: Registers,
    D: DelayUs<u32>,
{
    regs.clear_bits(reg::CR, oscillator.enable_bit());
    if poll_until(delay, timeout_us, || !oscillator.is_ready(regs)) {
        trace!("{} stopped", oscillator);
        Ok(())
    } else {
        warn!("{} still ready after {} us", oscillator, timeout_us);
        Err(ClockError::ClockSourceNotReady(oscillator))
    }
}

/// Request a system clock source and wait for the switch status to follow.
fn switch<R, D>(
    regs: &mut R,
    delay: &mut D,
    source: SysClkSource,
    timeout_us: u32,
) -> Result<(), ClockError>
where
    R: Registers,
    D: DelayUs<u32>,
{
    source.select(regs);
    if poll_until(delay, timeout_us, || source.is_selected(regs)) {
        trace!("system clock switched to {}", source);
        Ok(())
    } else {
        warn!("system clock switch to {} failed", source);
        Err(ClockError::ClockSourceNotSelected(source))
    }
}

/// Whether the hardware currently runs the configuration in `config`.
///
/// PLL parameters are only compared when the PLL drives the system clock, the bypass flag only
/// when HSE runs.
pub fn is_consistent<R: Registers>(regs: &mut R, config: &ClockConfig) -> bool {
    let value = regs.read(reg::CFGR);
    let field = |mask: u32, shift: u32| (value & mask) >> shift;

    if !config.source.is_selected(regs)
        || field(cfgr::HPRE_MASK, cfgr::HPRE_SHIFT) != config.ahb.bits()
        || field(cfgr::PPRE1_MASK, cfgr::PPRE1_SHIFT) != config.apb1.bits()
        || field(cfgr::PPRE2_MASK, cfgr::PPRE2_SHIFT) != config.apb2.bits()
        || flash::latency(regs) != Some(config.flash_latency)
    {
        return false;
    }

    if config.source == SysClkSource::Pll {
        let prediv = (regs.read(reg::CFGR2) & cfgr2::PREDIV_MASK) >> cfgr2::PREDIV_SHIFT;
        if field(cfgr::PLLSRC_MASK, cfgr::PLLSRC_SHIFT) != config.pll_source.bits()
            || field(cfgr::PLLMUL_MASK, cfgr::PLLMUL_SHIFT) != config.pll_mul.bits()
            || prediv != config.prediv.bits()
        {
            return false;
        }
    }

    let oscillator = config.source.oscillator(config.pll_source);
    oscillator != Oscillator::Hse || regs.is_set(reg::CR, cr::HSEBYP) == config.hse_bypass
}

/// Clock frequencies of the system and its buses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frequencies {
    pub sysclk: HertzU32,
    pub hclk: HertzU32,
    pub pclk1: HertzU32,
    pub pclk2: HertzU32,
}

impl Frequencies {
    /// Decode the frequencies from the clock configuration registers.
    ///
    /// `hse` is the frequency of the external crystal or clock signal, the hardware has no way
    /// of knowing it.
    pub fn read<R: Registers>(regs: &mut R, hse: HertzU32) -> Self {
        let value = regs.read(reg::CFGR);
        let field = |mask: u32, shift: u32| (value & mask) >> shift;

        let sysclk = match SysClkSource::from_bits(field(cfgr::SWS_MASK, cfgr::SWS_SHIFT)) {
            Some(SysClkSource::Hse) => hse.raw(),
            Some(SysClkSource::Pll) => {
                let prediv = (regs.read(reg::CFGR2) & cfgr2::PREDIV_MASK) >> cfgr2::PREDIV_SHIFT;
                let input = match field(cfgr::PLLSRC_MASK, cfgr::PLLSRC_SHIFT) {
                    0b00 => HSI_FREQ.raw() / 2,
                    0b01 => HSI_FREQ.raw() / (prediv + 1),
                    _ => hse.raw() / (prediv + 1),
                };
                // 0b1111 multiplies by 16 as well.
                let mul = (field(cfgr::PLLMUL_MASK, cfgr::PLLMUL_SHIFT) + 2).min(16);
                input * mul
            }
            Some(SysClkSource::Hsi) | None => HSI_FREQ.raw(),
        };

        let hpre = field(cfgr::HPRE_MASK, cfgr::HPRE_SHIFT);
        let hclk = if hpre & 8 > 0 {
            const SHIFT: [u32; 8] = [1, 2, 3, 4, 6, 7, 8, 9];
            sysclk >> SHIFT[(hpre & 7) as usize]
        } else {
            sysclk
        };

        let apb = |ppre: u32| {
            if ppre & 4 > 0 {
                hclk >> ((ppre & 3) + 1)
            } else {
                hclk
            }
        };

        Self {
            sysclk: HertzU32::from_raw(sysclk),
            hclk: HertzU32::from_raw(hclk),
            pclk1: HertzU32::from_raw(apb(field(cfgr::PPRE1_MASK, cfgr::PPRE1_SHIFT))),
            pclk2: HertzU32::from_raw(apb(field(cfgr::PPRE2_MASK, cfgr::PPRE2_SHIFT))),
        }
    }
}
