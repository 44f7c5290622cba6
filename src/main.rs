//! Firmware for the Tidegrow grow-light module.
//!
//! # Overview
//!
//! This firmware drives a PAM-style LED driver for a grow light:
//! - Repeating 24-hour light cycle starting at power-on (minute 0)
//! - Fixed output power: off, PWM-dimmed, or full (floating enable pin)
//! - Temperature sampling on an analog input
//! - 32-byte status register table on I2C
//!
//! # Hardware
//!
//! - **MCU**: STM32L031G6U6 (Cortex-M0+)
//! - **Core clock**: HSI16, no PLL
//! - **LED driver**: PAM2861-style, enable pin low = off, floating = full
//!
//! # Timekeeping
//!
//! SysTick fires once per second. Its handler owns the [`GrowController`],
//! which counts seconds and minutes and re-applies the schedule on every
//! minute boundary. The clock restarts at minute 0 on every boot.
//!
//! # Main Loop
//!
//! Every 5 seconds the main loop samples the temperature input and logs the
//! cycle position. It only reads the shared state.
//!
//! # Module Organization
//!
//! - [`hardware`] - Pin mappings, GPIO/TIM2 register drivers, ADC
//! - [`status_bus`] - I2C slave serving the status registers

#![no_std]
#![no_main]

mod hardware;
mod status_bus;

use core::cell::RefCell;
use core::fmt::Write;

use cortex_m::peripheral::{SYST, syst::SystClkSource};
use cortex_m_rt::exception;
use embassy_executor::Spawner;
use embassy_stm32::{
    Config,
    rcc::{AHBPrescaler, APBPrescaler, LsConfig, Sysclk, VoltageScale, mux::ClockMux},
};
use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embassy_time::Timer;
use heapless::String;
use {defmt_rtt as _, panic_probe as _};

use hardware::{Board, GrowPin, Tim2Pwm};
use status_bus::status_register_task;
use tidegrow::{GrowConfig, GrowController, Report, SharedState};

/// Minutes the light stays on per 24-hour cycle (14 hours).
const ON_DURATION_MINUTES: u16 = 14 * 60;

/// Output power while the light is on, in percent.
const POWER_PERCENT: u8 = 100;

const GROW_CONFIG: GrowConfig = match GrowConfig::new(ON_DURATION_MINUTES, POWER_PERCENT) {
    Ok(config) => config,
    Err(_) => panic!("grow configuration out of range"),
};

/// SysTick input clock (HCLK).
const CORE_CLOCK_HZ: u32 = 16_000_000;

/// Status report interval in seconds.
const REPORT_INTERVAL_SECS: u64 = 5;

/// Clock and light state, written by SysTick only.
static STATE: SharedState = SharedState::new();

type Controller = GrowController<'static, GrowPin, Tim2Pwm>;

/// Controller owned by the SysTick handler once the tick is running.
static CONTROLLER: Mutex<CriticalSectionRawMutex, RefCell<Option<Controller>>> =
    Mutex::new(RefCell::new(None));

/// Creates the clock configuration.
///
/// # Clock Settings
///
/// - **HSI16**: 16 MHz system clock (no PLL, no MSI)
/// - **Prescalers**: all DIV1, so TIM2 and SysTick run at 16 MHz
/// - **Voltage scale**: Range 1
///
/// # Returns
///
/// Configured RCC settings for embassy-stm32 initialization
fn create_clock_config() -> embassy_stm32::rcc::Config {
    embassy_stm32::rcc::Config {
        msi: None,
        hsi: true,
        hse: None,
        pll: None,
        sys: Sysclk::HSI,
        ahb_pre: AHBPrescaler::DIV1,
        apb1_pre: APBPrescaler::DIV1,
        apb2_pre: APBPrescaler::DIV1,
        ls: LsConfig::default(),
        voltage_scale: VoltageScale::RANGE1,
        mux: ClockMux::default(),
    }
}

/// Starts the 1 Hz SysTick interrupt.
fn start_tick(mut syst: SYST) {
    syst.disable_counter();
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(CORE_CLOCK_HZ - 1);
    syst.clear_current();
    syst.enable_interrupt();
    syst.enable_counter();
}

/// Once per second: advance the clock, re-apply the schedule on minute
/// boundaries.
#[exception]
fn SysTick() {
    CONTROLLER.lock(|controller| {
        if let Some(controller) = controller.borrow_mut().as_mut() {
            controller.on_tick();
        }
    });
}

fn print_banner(light_on: bool) {
    defmt::info!("grow console");
    defmt::info!("Power: {}%", GROW_CONFIG.power().percent());
    defmt::info!(
        "On-duration: {} minutes ({} hrs {} mins)",
        GROW_CONFIG.on_duration_minutes(),
        GROW_CONFIG.on_duration_minutes() / 60,
        GROW_CONFIG.on_duration_minutes() % 60
    );
    defmt::info!("Light initialized: {}", if light_on { "ON" } else { "OFF" });
    defmt::info!("24-hour cycle started at power-on");
    defmt::info!(
        "Lights ON for {} mins, OFF for {} mins",
        GROW_CONFIG.on_duration_minutes(),
        GROW_CONFIG.off_duration_minutes()
    );
}

/// Main entry point for the grow-light firmware.
///
/// # Initialization Sequence
///
/// 1. Configure clocks (16 MHz HSI)
/// 2. Initialize GPIO, TIM2, ADC and I2C
/// 3. Apply the schedule for minute 0, so the output pin is defined
/// 4. Hand the controller to SysTick and start the 1 Hz tick
/// 5. Spawn the status register task
/// 6. Enter the report loop
///
/// # Spawned Tasks
///
/// - **status_register_task**: Serves the I2C status register table
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut config = Config::default();
    config.rcc = create_clock_config();

    let p = embassy_stm32::init(config);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Initializing peripherals...");

    let Board {
        driver,
        mut sampler,
        status_bus,
    } = Board::new(p);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Applying initial light state...");

    let mut controller = GrowController::new(GROW_CONFIG, STATE.claim_writer().unwrap(), driver);
    let light_on = controller.boot();
    CONTROLLER.lock(|cell| cell.replace(Some(controller)));

    #[cfg(feature = "debug-mode")]
    defmt::info!("Starting 1 Hz tick...");

    // SAFETY: SYST is used by nothing else; embassy's time driver runs on TIM21.
    start_tick(unsafe { cortex_m::Peripherals::steal() }.SYST);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Spawning status register task...");

    spawner.spawn(status_register_task(status_bus)).unwrap();

    print_banner(light_on);

    loop {
        let temperature = sampler.sample().await;
        let report = Report::new(STATE.snapshot(), &GROW_CONFIG, Some(temperature));

        let mut line: String<128> = String::new();
        match write!(line, "{}", report) {
            Ok(()) => defmt::info!("{=str}", line.as_str()),
            Err(_) => defmt::warn!("Report line truncated"),
        }

        Timer::after_secs(REPORT_INTERVAL_SECS).await;
    }
}
