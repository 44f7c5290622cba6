//! Status register table exposed to the bus master.
//!
//! A write transaction starts with the register index followed by data bytes
//! stored at consecutive indices. A read transaction returns bytes from the
//! last selected index onward. Bytes written past the end of the table are
//! dropped and reads past the end return `0x00`.
//!
//! No register affects scheduling or output power. The table is kept
//! consistent so registers can be given meaning later without changing the
//! transport.

use crate::error::RegisterError;

/// Registers in the firmware's table.
pub const STATUS_REGISTER_COUNT: usize = 32;

/// Notified after every completed bus transaction.
pub trait RegisterObserver {
    /// `len` data bytes were stored starting at `index`.
    fn on_write(&mut self, index: u8, len: u8, registers: &[u8]);

    /// The master read starting at `index`.
    fn on_read(&mut self, index: u8, registers: &[u8]);
}

/// Ignores all transactions.
impl RegisterObserver for () {
    fn on_write(&mut self, _index: u8, _len: u8, _registers: &[u8]) {}
    fn on_read(&mut self, _index: u8, _registers: &[u8]) {}
}

pub struct StatusRegisters<const N: usize = STATUS_REGISTER_COUNT> {
    registers: [u8; N],
    /// Index selected by the last write
    pointer: u8,
}

impl<const N: usize> StatusRegisters<N> {
    pub const fn new() -> Self {
        Self {
            registers: [0; N],
            pointer: 0,
        }
    }

    /// Handles a write transaction.
    ///
    /// # Arguments
    ///
    /// * `frame` - Register index followed by zero or more data bytes
    /// * `observer` - Notified with the index and number of stored bytes
    ///
    /// # Errors
    ///
    /// The table is left unchanged if the frame is empty or the index is out
    /// of range.
    pub fn master_write(
        &mut self,
        frame: &[u8],
        observer: &mut impl RegisterObserver,
    ) -> Result<(), RegisterError> {
        let (&index, data) = frame.split_first().ok_or(RegisterError::EmptyFrame)?;
        let start = usize::from(index);
        if start >= N {
            return Err(RegisterError::IndexOutOfRange { index, len: N });
        }

        let stored = data.len().min(N - start);
        self.registers[start..start + stored].copy_from_slice(&data[..stored]);
        self.pointer = index;

        if stored > 0 {
            observer.on_write(index, stored as u8, &self.registers);
        }
        Ok(())
    }

    /// Handles a read transaction, filling `buf` from the selected index.
    pub fn master_read(&self, buf: &mut [u8], observer: &mut impl RegisterObserver) {
        let start = usize::from(self.pointer);
        for (offset, byte) in buf.iter_mut().enumerate() {
            *byte = self.registers.get(start + offset).copied().unwrap_or(0);
        }
        observer.on_read(self.pointer, &self.registers);
    }

    pub fn get(&self, index: u8) -> Option<u8> {
        self.registers.get(usize::from(index)).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.registers
    }
}

impl<const N: usize> Default for StatusRegisters<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(u8, u8)>,
        reads: Vec<u8>,
    }

    impl RegisterObserver for Recorder {
        fn on_write(&mut self, index: u8, len: u8, registers: &[u8]) {
            assert_eq!(registers.len(), STATUS_REGISTER_COUNT);
            self.writes.push((index, len));
        }

        fn on_read(&mut self, index: u8, _registers: &[u8]) {
            self.reads.push(index);
        }
    }

    #[test]
    fn starts_zeroed() {
        let regs = StatusRegisters::<STATUS_REGISTER_COUNT>::new();
        assert!(regs.as_slice().iter().all(|&b| b == 0));
        assert_eq!(regs.get(31), Some(0));
        assert_eq!(regs.get(32), None);
    }

    #[test]
    fn write_auto_increments() {
        let mut regs = StatusRegisters::<STATUS_REGISTER_COUNT>::new();
        let mut rec = Recorder::default();

        regs.master_write(&[0x10, 0xaa, 0xbb, 0xcc], &mut rec).unwrap();

        assert_eq!(regs.get(0x10), Some(0xaa));
        assert_eq!(regs.get(0x11), Some(0xbb));
        assert_eq!(regs.get(0x12), Some(0xcc));
        assert_eq!(regs.get(0x13), Some(0));
        assert_eq!(rec.writes, [(0x10, 3)]);
    }

    #[test]
    fn write_past_end_is_truncated() {
        let mut regs = StatusRegisters::<STATUS_REGISTER_COUNT>::new();
        let mut rec = Recorder::default();

        regs.master_write(&[30, 1, 2, 3, 4], &mut rec).unwrap();

        assert_eq!(regs.get(30), Some(1));
        assert_eq!(regs.get(31), Some(2));
        assert_eq!(rec.writes, [(30, 2)]);
    }

    #[test]
    fn invalid_frames_leave_table_untouched() {
        let mut regs = StatusRegisters::<STATUS_REGISTER_COUNT>::new();
        let mut rec = Recorder::default();

        assert_eq!(regs.master_write(&[], &mut rec), Err(RegisterError::EmptyFrame));
        assert_eq!(
            regs.master_write(&[32, 0xff], &mut rec),
            Err(RegisterError::IndexOutOfRange { index: 32, len: 32 })
        );
        assert!(regs.as_slice().iter().all(|&b| b == 0));
        assert!(rec.writes.is_empty());
    }

    #[test]
    fn index_only_write_selects_read_start() {
        let mut regs = StatusRegisters::<STATUS_REGISTER_COUNT>::new();
        let mut rec = Recorder::default();
        regs.master_write(&[4, 7, 8, 9], &mut ()).unwrap();

        regs.master_write(&[5], &mut rec).unwrap();
        let mut buf = [0xee; 3];
        regs.master_read(&mut buf, &mut rec);

        assert_eq!(buf, [8, 9, 0]);
        assert!(rec.writes.is_empty());
        assert_eq!(rec.reads, [5]);
    }

    #[test]
    fn read_past_end_returns_zero() {
        let mut regs = StatusRegisters::<4>::new();
        regs.master_write(&[2, 0x11, 0x22], &mut ()).unwrap();
        regs.master_write(&[3], &mut ()).unwrap();

        let mut buf = [0xee; 3];
        regs.master_read(&mut buf, &mut ());

        assert_eq!(buf, [0x22, 0, 0]);
    }
}
