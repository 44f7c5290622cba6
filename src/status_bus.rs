//! I2C1 slave serving the status register table.
//!
//! The bus master writes a register index followed by data, and reads back
//! from the last selected index. Transactions are logged at debug level;
//! none of them change the light schedule or output power.

use embassy_stm32::i2c::{
    self, I2c, MultiMaster, SlaveAddrConfig, SlaveCommand, SlaveCommandKind,
};
use embassy_stm32::interrupt::typelevel::Binding;
use embassy_stm32::mode::Async;
use embassy_stm32::peripherals::{DMA1_CH2, DMA1_CH3, I2C1, PB6, PB7};
use embassy_stm32::{Peri, interrupt};
use tidegrow::registers::STATUS_REGISTER_COUNT;
use tidegrow::{RegisterObserver, StatusRegisters};

/// 7-bit slave address of the module
const STATUS_BUS_ADDR: u8 = 0x4C;

pub type StatusBus = I2c<'static, Async, MultiMaster>;

/// Configures I2C1 as a slave at [`STATUS_BUS_ADDR`].
pub fn new(
    i2c: Peri<'static, I2C1>,
    scl: Peri<'static, PB6>,
    sda: Peri<'static, PB7>,
    irqs: impl Binding<interrupt::typelevel::I2C1, i2c::EventInterruptHandler<I2C1>>
        + Binding<interrupt::typelevel::I2C1, i2c::ErrorInterruptHandler<I2C1>>
        + 'static,
    tx_dma: Peri<'static, DMA1_CH2>,
    rx_dma: Peri<'static, DMA1_CH3>,
) -> StatusBus {
    I2c::new(i2c, scl, sda, irqs, tx_dma, rx_dma, i2c::Config::default())
        .into_slave_multimaster(SlaveAddrConfig::basic(STATUS_BUS_ADDR))
}

/// Logs every register transaction.
struct LogObserver;

impl RegisterObserver for LogObserver {
    fn on_write(&mut self, index: u8, len: u8, registers: &[u8]) {
        defmt::debug!(
            "Status write reg: {=u8:#x} len: {} val: {=u8:#x}",
            index,
            len,
            registers[usize::from(index)]
        );
    }

    fn on_read(&mut self, index: u8, registers: &[u8]) {
        defmt::debug!(
            "Status read reg: {=u8:#x} val: {=u8:#x}",
            index,
            registers[usize::from(index)]
        );
    }
}

/// Serves bus transactions against the register table forever.
///
/// # Example
///
/// ```no_run
/// spawner.spawn(status_register_task(board.status_bus)).unwrap();
/// ```
#[embassy_executor::task]
pub async fn status_register_task(mut bus: StatusBus) {
    let mut registers = StatusRegisters::<STATUS_REGISTER_COUNT>::new();
    let mut observer = LogObserver;
    // Index byte plus one byte per register
    let mut frame = [0u8; STATUS_REGISTER_COUNT + 1];
    let mut reply = [0u8; STATUS_REGISTER_COUNT];

    loop {
        match bus.listen().await {
            Ok(SlaveCommand {
                kind: SlaveCommandKind::Write,
                ..
            }) => match bus.respond_to_write(&mut frame).await {
                Ok(len) => {
                    if let Err(e) = registers.master_write(&frame[..len], &mut observer) {
                        defmt::warn!("Status write rejected: {}", e);
                    }
                }
                Err(e) => defmt::warn!("Status bus write failed: {}", e),
            },
            Ok(SlaveCommand {
                kind: SlaveCommandKind::Read,
                ..
            }) => {
                registers.master_read(&mut reply, &mut observer);
                if let Err(e) = bus.respond_to_read(&reply).await {
                    defmt::warn!("Status bus read failed: {}", e);
                }
            }
            Err(e) => defmt::warn!("Status bus error: {}", e),
        }
    }
}
