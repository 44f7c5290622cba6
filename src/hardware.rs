//! Hardware abstraction and peripheral initialization.
//!
//! This module defines the pin mappings and the register-level drivers for
//! the grow-light module. The library's capability traits are implemented
//! here against the STM32L031 PAC.
//!
//! # Pin Assignments
//!
//! ## LED Driver
//! - **PA1**: GROW_PWM - PAM driver enable, TIM2_CH2 on AF2
//!   (low = off, floating = full power, open-drain PWM = dimmed)
//!
//! ## Temperature
//! - **PA5**: GROW_TEMP - Temperature sense, 0 V - 1.1 V (ADC_IN5)
//!
//! ## Status Bus (I2C1)
//! - **PB6**: SCL (AF1)
//! - **PB7**: SDA (AF1)
//!
//! ## Debug (SWD)
//! - **PA13**: SWDIO
//! - **PA14**: SWCLK

use embassy_stm32::adc::{self, Adc, SampleTime};
use embassy_stm32::pac::{self, gpio::vals as gpio_vals, timer::vals as timer_vals};
use embassy_stm32::peripherals::{ADC1, PA1, PA5, TIM2};
use embassy_stm32::{Peri, bind_interrupts, i2c, peripherals};
use embedded_hal::PwmPin;
use tidegrow::{Level, PinControl, PinMode, Polarity, PowerDriver, PwmOutput};

use crate::status_bus::{self, StatusBus};

/// GPIOA pin number of GROW_PWM
const PWM_PIN: usize = 1;

/// Alternate function routing TIM2_CH2 to PA1
const PWM_PIN_AF: u8 = 2;

/// Zero-based TIM2 channel index (CH2)
const PWM_CHANNEL: usize = 1;

/// 16 MHz / (159 + 1) = 100 kHz timer clock
const PWM_PRESCALER: u16 = 159;

/// Auto-reload and full-scale compare value: 100 kHz / 256 = ~390 Hz PWM
pub const PWM_FULL_SCALE: u16 = 255;

bind_interrupts!(pub struct Irqs {
    ADC1_COMP => adc::InterruptHandler<peripherals::ADC1>;
    I2C1 => i2c::EventInterruptHandler<peripherals::I2C1>, i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

/// Top-level peripheral container for the grow-light module.
pub struct Board {
    /// LED driver output (pin + timer channel)
    pub driver: PowerDriver<GrowPin, Tim2Pwm>,
    /// Temperature input
    pub sampler: TemperatureSampler,
    /// I2C1 in slave mode, serving the status register table
    pub status_bus: StatusBus,
}

impl Board {
    /// Initializes all peripherals from the STM32 peripheral singleton.
    ///
    /// # Initial States
    ///
    /// - PA1 (GROW_PWM): reset state (floating input) until the controller
    ///   applies the schedule for minute 0
    /// - TIM2: running at ~390 Hz, CH2 output disabled, compare 0
    /// - ADC1: calibrated, 12.5 cycle sample time
    ///
    /// # Arguments
    ///
    /// * `p` - STM32 peripheral singleton from embassy_stm32::init()
    pub fn new(p: embassy_stm32::Peripherals) -> Self {
        Self {
            driver: PowerDriver::new(GrowPin::new(p.PA1), Tim2Pwm::new(p.TIM2)),
            sampler: TemperatureSampler::new(p.ADC1, p.PA5),
            status_bus: status_bus::new(p.I2C1, p.PB6, p.PB7, Irqs, p.DMA1_CH2, p.DMA1_CH3),
        }
    }
}

/// GROW_PWM pin, reconfigured through the GPIOA registers.
pub struct GrowPin {
    _pin: Peri<'static, PA1>,
}

impl GrowPin {
    pub fn new(pin: Peri<'static, PA1>) -> Self {
        Self { _pin: pin }
    }
}

impl PinControl for GrowPin {
    fn set_mode(&mut self, mode: PinMode) {
        let gpio = pac::GPIOA;
        match mode {
            PinMode::PushPullOutput => {
                gpio.pupdr().modify(|w| w.set_pupdr(PWM_PIN, gpio_vals::Pupdr::FLOATING));
                gpio.otyper().modify(|w| w.set_ot(PWM_PIN, gpio_vals::Ot::PUSH_PULL));
                gpio.moder().modify(|w| w.set_moder(PWM_PIN, gpio_vals::Moder::OUTPUT));
            }
            PinMode::FloatingInput => {
                gpio.moder().modify(|w| w.set_moder(PWM_PIN, gpio_vals::Moder::INPUT));
                gpio.pupdr().modify(|w| w.set_pupdr(PWM_PIN, gpio_vals::Pupdr::FLOATING));
            }
            PinMode::OpenDrainPwm => {
                gpio.afr(PWM_PIN / 8).modify(|w| w.set_afr(PWM_PIN % 8, PWM_PIN_AF));
                gpio.pupdr().modify(|w| w.set_pupdr(PWM_PIN, gpio_vals::Pupdr::FLOATING));
                gpio.otyper().modify(|w| w.set_ot(PWM_PIN, gpio_vals::Ot::OPEN_DRAIN));
                gpio.moder().modify(|w| w.set_moder(PWM_PIN, gpio_vals::Moder::ALTERNATE));
            }
        }
    }

    fn write(&mut self, level: Level) {
        pac::GPIOA.bsrr().write(|w| match level {
            Level::Low => w.set_br(PWM_PIN, true),
            Level::High => w.set_bs(PWM_PIN, true),
        });
    }

    fn read(&self) -> Level {
        if pac::GPIOA.idr().read().idr(PWM_PIN) == gpio_vals::Idr::HIGH {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// TIM2 channel 2 in PWM mode 1 with compare preload.
pub struct Tim2Pwm {
    _tim: Peri<'static, TIM2>,
}

impl Tim2Pwm {
    /// Resets and starts TIM2 with the channel output disabled.
    pub fn new(tim: Peri<'static, TIM2>) -> Self {
        pac::RCC.apb1enr().modify(|w| w.set_tim2en(true));
        pac::RCC.apb1rstr().modify(|w| w.set_tim2rst(true));
        pac::RCC.apb1rstr().modify(|w| w.set_tim2rst(false));

        let regs = pac::TIM2;
        regs.psc().write_value(PWM_PRESCALER);
        regs.arr().write(|w| w.set_arr(PWM_FULL_SCALE));

        // PWM mode 1; CCR writes land in the preload register and are
        // latched on the next update event
        regs.ccmr_output(PWM_CHANNEL / 2).modify(|w| {
            w.set_ocm(PWM_CHANNEL % 2, timer_vals::Ocm::PWM_MODE1);
            w.set_ocpe(PWM_CHANNEL % 2, true);
        });
        regs.ccr(PWM_CHANNEL).write(|w| w.set_ccr(0));
        regs.ccer().modify(|w| {
            w.set_ccp(PWM_CHANNEL, false);
            w.set_cce(PWM_CHANNEL, false);
        });
        regs.cr1().modify(|w| w.set_arpe(true));

        // Load prescaler and compare, then start counting
        regs.egr().write(|w| w.set_ug(true));
        regs.cr1().modify(|w| w.set_cen(true));

        Self { _tim: tim }
    }
}

impl PwmPin for Tim2Pwm {
    type Duty = u16;

    fn disable(&mut self) {
        pac::TIM2.ccer().modify(|w| w.set_cce(PWM_CHANNEL, false));
    }

    fn enable(&mut self) {
        pac::TIM2.ccer().modify(|w| w.set_cce(PWM_CHANNEL, true));
    }

    fn get_duty(&self) -> u16 {
        pac::TIM2.ccr(PWM_CHANNEL).read().ccr()
    }

    fn get_max_duty(&self) -> u16 {
        PWM_FULL_SCALE
    }

    fn set_duty(&mut self, duty: u16) {
        pac::TIM2.ccr(PWM_CHANNEL).write(|w| w.set_ccr(duty));
    }
}

impl PwmOutput for Tim2Pwm {
    fn set_polarity(&mut self, polarity: Polarity) {
        pac::TIM2
            .ccer()
            .modify(|w| w.set_ccp(PWM_CHANNEL, polarity == Polarity::Inverted));
    }
}

/// Single-shot conversions of the temperature input.
pub struct TemperatureSampler {
    adc: Adc<'static, ADC1>,
    pin: Peri<'static, PA5>,
}

impl TemperatureSampler {
    pub fn new(adc: Peri<'static, ADC1>, pin: Peri<'static, PA5>) -> Self {
        let mut adc = Adc::new(adc, Irqs);
        adc.set_sample_time(SampleTime::CYCLES12_5);
        Self { adc, pin }
    }

    /// Runs one conversion on ADC_IN5 and returns the raw 12-bit reading.
    ///
    /// The conversion takes a fixed number of ADC clock cycles. No averaging
    /// or retries.
    pub async fn sample(&mut self) -> u16 {
        self.adc.read(&mut self.pin).await
    }
}
