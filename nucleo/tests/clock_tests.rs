//! Clock tree tests
//!
//! Runs the clock sequences against the simulated register file.
//! Run with: cargo test -p nucleo --test clock_tests

use embedded_hal::blocking::delay::DelayUs;
use fugit::HertzU32;
use nucleo::clock::{
    self, AhbPrescaler, ApbPrescaler, ClockConfig, Frequencies, Oscillator, PllMul, PllSource,
    Prediv, SysClkSource, STABILIZATION_TIMEOUT_US,
};
use nucleo::flash::{self, Latency};
use nucleo::registers::bits::{acr, cfgr, cr};
use nucleo::registers::sim::RegisterFile;
use nucleo::registers::{FlashRegister, RccRegister, Register};
use nucleo::{ClockError, Registers};

const CR: Register = Register::Rcc(RccRegister::Cr);
const CFGR: Register = Register::Rcc(RccRegister::Cfgr);
const CFGR2: Register = Register::Rcc(RccRegister::Cfgr2);
const ACR: Register = Register::Flash(FlashRegister::Acr);

/// Nucleo HSE is the 8MHz MCO of the on-board ST-LINK.
const HSE: HertzU32 = HertzU32::MHz(8);

/// Delay that only adds up the requested time.
#[derive(Default)]
struct CountingDelay {
    waited_us: u32,
}

impl DelayUs<u32> for CountingDelay {
    fn delay_us(&mut self, us: u32) {
        self.waited_us += us;
    }
}

/// Remembers whether the PLL was ever requested as system clock.
struct SwitchRecorder<'a> {
    regs: &'a mut RegisterFile,
    pll_requested: bool,
}

impl Registers for SwitchRecorder<'_> {
    fn read(&mut self, register: Register) -> u32 {
        self.regs.read(register)
    }

    fn write(&mut self, register: Register, value: u32) {
        if register == CFGR && (value & cfgr::SW_MASK) >> cfgr::SW_SHIFT == cfgr::SW_PLL {
            self.pll_requested = true;
        }
        self.regs.write(register, value);
    }
}

fn init(regs: &mut RegisterFile, config: &ClockConfig) -> Result<(), ClockError> {
    clock::init(regs, &mut CountingDelay::default(), config)
}

// =============================================================================
// Source selection
// =============================================================================

#[test]
fn hsi_as_system_clock() {
    let mut regs = RegisterFile::new();
    assert_eq!(init(&mut regs, &ClockConfig::hsi()), Ok(()));
    assert!(SysClkSource::Hsi.is_selected(&mut regs));
    assert_eq!(SysClkSource::current(&mut regs), Some(SysClkSource::Hsi));
}

#[test]
fn hse_as_system_clock() {
    let mut regs = RegisterFile::new();
    assert_eq!(init(&mut regs, &ClockConfig::hse(false)), Ok(()));
    assert!(SysClkSource::Hse.is_selected(&mut regs));
    assert!(Oscillator::Hse.is_ready(&mut regs));
    assert_eq!(regs.peek(CR) & cr::HSEBYP, 0);
    assert_eq!(Frequencies::read(&mut regs, HSE).sysclk, HSE);
}

#[test]
fn hse_bypass_is_set_before_start() {
    let mut regs = RegisterFile::new();
    let config = ClockConfig::hse(true);
    assert_eq!(init(&mut regs, &config), Ok(()));
    // HSEBYP is write protected once HSE runs, so it must have been set first.
    assert_ne!(regs.peek(CR) & cr::HSEBYP, 0);
    assert!(clock::is_consistent(&mut regs, &config));
}

#[test]
fn hse_bypass_applies_to_pll_input() {
    let mut regs = RegisterFile::new();
    let config = ClockConfig {
        hse_bypass: true,
        ..ClockConfig::pll(PllSource::Hse, Prediv::Div1, PllMul::Mul9)
            .with_apb1(ApbPrescaler::Div2)
            .with_flash_latency(Latency::TwoWait)
    };
    assert_eq!(init(&mut regs, &config), Ok(()));
    assert_ne!(regs.peek(CR) & cr::HSEBYP, 0);
    assert_eq!(Frequencies::read(&mut regs, HSE).sysclk, HertzU32::MHz(72));
}

#[test]
fn pll_as_system_clock() {
    let mut regs = RegisterFile::new();
    let config = ClockConfig::pll(PllSource::HsiDiv2, Prediv::Div1, PllMul::Mul16)
        .with_apb1(ApbPrescaler::Div2)
        .with_flash_latency(Latency::TwoWait);
    assert_eq!(init(&mut regs, &config), Ok(()));
    assert!(SysClkSource::Pll.is_selected(&mut regs));
    assert!(Oscillator::Pll.is_enabled(&mut regs));
    assert_eq!(Frequencies::read(&mut regs, HSE).sysclk, HertzU32::MHz(64));
}

// =============================================================================
// 72 MHz end-to-end
// =============================================================================

#[test]
fn pll_72mhz_from_hsi() {
    let mut regs = RegisterFile::new();
    let config = ClockConfig::hsi_pll_72mhz();
    assert_eq!(init(&mut regs, &config), Ok(()));

    let value = regs.peek(CFGR);
    assert_eq!((value & cfgr::SWS_MASK) >> cfgr::SWS_SHIFT, cfgr::SW_PLL);
    assert_eq!((value & cfgr::PLLSRC_MASK) >> cfgr::PLLSRC_SHIFT, 0b01);
    assert_eq!((value & cfgr::PLLMUL_MASK) >> cfgr::PLLMUL_SHIFT, 0b0111);
    assert_eq!((value & cfgr::PPRE1_MASK) >> cfgr::PPRE1_SHIFT, 0b100);
    assert_eq!((value & cfgr::PPRE2_MASK) >> cfgr::PPRE2_SHIFT, 0);
    assert_eq!((value & cfgr::HPRE_MASK) >> cfgr::HPRE_SHIFT, 0);
    assert_eq!(regs.peek(CFGR2), 0);
    assert_eq!(flash::latency(&mut regs), Some(Latency::TwoWait));

    let clocks = Frequencies::read(&mut regs, HSE);
    assert_eq!(clocks.sysclk, HertzU32::MHz(72));
    assert_eq!(clocks.hclk, HertzU32::MHz(72));
    assert_eq!(clocks.pclk1, HertzU32::MHz(36));
    assert_eq!(clocks.pclk2, HertzU32::MHz(72));
    assert!(clock::is_consistent(&mut regs, &config));
}

#[test]
fn reconfigure_from_pll_to_hsi() {
    let mut regs = RegisterFile::new();
    assert_eq!(init(&mut regs, &ClockConfig::hsi_pll_72mhz()), Ok(()));

    let config = ClockConfig::hsi().with_ahb(AhbPrescaler::Div2);
    assert_eq!(init(&mut regs, &config), Ok(()));
    assert!(SysClkSource::Hsi.is_selected(&mut regs));
    assert!(!Oscillator::Pll.is_enabled(&mut regs));
    assert_eq!(Frequencies::read(&mut regs, HSE).hclk, HertzU32::MHz(4));
    assert_eq!(flash::latency(&mut regs), Some(Latency::ZeroWait));
    assert!(clock::is_consistent(&mut regs, &config));
}

// =============================================================================
// Deinit
// =============================================================================

#[test]
fn deinit_at_reset_writes_nothing() {
    let mut regs = RegisterFile::new();
    assert_eq!(clock::deinit(&mut regs, &mut CountingDelay::default()), Ok(()));
    assert_eq!(regs.write_count(), 0);
}

#[test]
fn deinit_restores_reset_configuration() {
    let mut regs = RegisterFile::new();
    let mut delay = CountingDelay::default();
    let config = ClockConfig {
        hse_bypass: true,
        ..ClockConfig::pll(PllSource::Hse, Prediv::Div2, PllMul::Mul9)
            .with_ahb(AhbPrescaler::Div2)
            .with_apb2(ApbPrescaler::Div4)
            .with_flash_latency(Latency::OneWait)
    };
    assert_eq!(clock::init(&mut regs, &mut delay, &config), Ok(()));

    assert_eq!(clock::deinit(&mut regs, &mut delay), Ok(()));
    assert!(SysClkSource::Hsi.is_selected(&mut regs));
    assert_eq!(regs.peek(CR) & (cr::PLLON | cr::HSEON | cr::HSEBYP), 0);
    assert_eq!(regs.peek(CFGR), 0);
    assert_eq!(regs.peek(CFGR2), 0);
    assert_eq!(regs.peek(ACR) & acr::LATENCY_MASK, 0);
    assert_ne!(regs.peek(ACR) & acr::PRFTBE, 0);
    assert!(clock::is_consistent(&mut regs, &ClockConfig::default()));

    let writes = regs.write_count();
    assert_eq!(clock::deinit(&mut regs, &mut delay), Ok(()));
    assert_eq!(regs.write_count(), writes);
}

#[test]
fn deinit_reports_refused_switch() {
    let mut regs = RegisterFile::new();
    assert_eq!(init(&mut regs, &ClockConfig::hsi_pll_72mhz()), Ok(()));

    regs.refuse_switch(true);
    assert_eq!(
        clock::deinit(&mut regs, &mut CountingDelay::default()),
        Err(ClockError::ClockSourceNotSelected(SysClkSource::Hsi))
    );
    // Nothing past the failed switch was touched.
    assert!(SysClkSource::Pll.is_selected(&mut regs));
    assert!(Oscillator::Pll.is_ready(&mut regs));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn pll_not_ready_keeps_mux() {
    let mut regs = RegisterFile::new();
    regs.fail_oscillator(Oscillator::Pll);
    let mut recorder = SwitchRecorder {
        regs: &mut regs,
        pll_requested: false,
    };

    let result = clock::init(
        &mut recorder,
        &mut CountingDelay::default(),
        &ClockConfig::hsi_pll_72mhz(),
    );
    assert_eq!(result, Err(ClockError::ClockSourceNotReady(Oscillator::Pll)));
    assert!(!recorder.pll_requested);
    assert!(SysClkSource::Hsi.is_selected(&mut regs));
}

#[test]
fn faulty_hse_times_out() {
    let mut regs = RegisterFile::new();
    regs.fail_oscillator(Oscillator::Hse);
    let mut delay = CountingDelay::default();

    let result = clock::init(&mut regs, &mut delay, &ClockConfig::hse(false));
    assert_eq!(result, Err(ClockError::ClockSourceNotReady(Oscillator::Hse)));
    assert_eq!(delay.waited_us, STABILIZATION_TIMEOUT_US);
    assert!(SysClkSource::Hsi.is_selected(&mut regs));
}

#[test]
fn faulty_hse_stops_pll_setup() {
    let mut regs = RegisterFile::new();
    regs.fail_oscillator(Oscillator::Hse);
    let config = ClockConfig::pll(PllSource::Hse, Prediv::Div1, PllMul::Mul9);

    assert_eq!(
        init(&mut regs, &config),
        Err(ClockError::ClockSourceNotReady(Oscillator::Hse))
    );
    assert!(!Oscillator::Pll.is_enabled(&mut regs));
}

#[test]
fn timeout_is_configurable() {
    let mut regs = RegisterFile::new();
    regs.fail_oscillator(Oscillator::Hse);
    let mut delay = CountingDelay::default();
    let config = ClockConfig::hse(false).with_timeout_us(100);

    assert!(clock::init(&mut regs, &mut delay, &config).is_err());
    assert_eq!(delay.waited_us, 100);
}

#[test]
fn refused_switch_is_reported() {
    let mut regs = RegisterFile::new();
    regs.refuse_switch(true);
    let config = ClockConfig::hse(false);

    assert_eq!(
        init(&mut regs, &config),
        Err(ClockError::ClockSourceNotSelected(SysClkSource::Hse))
    );
    // The oscillator was started, the switch did not happen.
    assert!(Oscillator::Hse.is_ready(&mut regs));
    assert!(SysClkSource::Hsi.is_selected(&mut regs));
    assert!(!clock::is_consistent(&mut regs, &config));
}

#[test]
fn bypass_applied_on_retry_after_refused_switch() {
    let mut regs = RegisterFile::new();
    regs.refuse_switch(true);
    assert_eq!(
        init(&mut regs, &ClockConfig::hse(false)),
        Err(ClockError::ClockSourceNotSelected(SysClkSource::Hse))
    );
    assert!(Oscillator::Hse.is_enabled(&mut regs));

    regs.refuse_switch(false);
    let config = ClockConfig::hse(true);
    assert_eq!(init(&mut regs, &config), Ok(()));
    assert_ne!(regs.peek(CR) & cr::HSEBYP, 0);
    assert!(SysClkSource::Hse.is_selected(&mut regs));
    assert!(clock::is_consistent(&mut regs, &config));
}

#[test]
fn running_hse_is_stopped_to_change_bypass() {
    let mut regs = RegisterFile::new();
    // HSE started outside of `init` while HSI stays the system clock.
    regs.write(CR, regs.peek(CR) | cr::HSEON);
    assert!(Oscillator::Hse.is_ready(&mut regs));

    let config = ClockConfig::hse(true);
    assert_eq!(init(&mut regs, &config), Ok(()));
    assert_ne!(regs.peek(CR) & cr::HSEBYP, 0);
    assert!(clock::is_consistent(&mut regs, &config));

    regs.reset();
    regs.write(CR, regs.peek(CR) | cr::HSEBYP);
    regs.write(CR, regs.peek(CR) | cr::HSEON);

    let config = ClockConfig::hse(false);
    assert_eq!(init(&mut regs, &config), Ok(()));
    assert_eq!(regs.peek(CR) & cr::HSEBYP, 0);
    assert!(SysClkSource::Hse.is_selected(&mut regs));
    assert!(clock::is_consistent(&mut regs, &config));
}

#[test]
fn recovery_after_reset() {
    let mut regs = RegisterFile::new();
    regs.refuse_switch(true);
    assert!(init(&mut regs, &ClockConfig::hsi_pll_72mhz()).is_err());

    regs.refuse_switch(false);
    regs.reset();
    assert_eq!(init(&mut regs, &ClockConfig::hsi_pll_72mhz()), Ok(()));
}
