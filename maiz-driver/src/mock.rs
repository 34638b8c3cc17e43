//! Simulated board for driver tests
//!
//! `MockBoard` answers requests the way the real board does: it remembers
//! the last command written and frames a response for it on the next read.
//! Handles are cheap clones sharing one board, so a test can keep one while
//! the driver owns another.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use maiz_hal::SystemReset;
use maiz_protocol::{encode, CommandId, ErrorCode, DEVICE_ADDRESS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    Nack,
    Bus,
}

impl i2c::Error for MockError {
    fn kind(&self) -> ErrorKind {
        match self {
            MockError::Nack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            MockError::Bus => ErrorKind::Bus,
        }
    }
}

/// One bus operation that reached the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Write(Vec<u8>),
    Read(usize),
}

struct Board {
    present: bool,
    log: Vec<Transfer>,
    errors: VecDeque<ErrorCode>,
    done: VecDeque<bool>,
    sensors: VecDeque<u8>,
    front_distance: u16,
    version: u8,
    nacks: usize,
    fault: bool,
    corrupt: Option<(CommandId, usize, usize)>,
    misroute: Option<(CommandId, usize)>,
    pending: Option<CommandId>,
}

#[derive(Clone)]
pub struct MockBoard(Rc<RefCell<Board>>);

impl MockBoard {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Board {
            present: true,
            log: Vec::new(),
            errors: VecDeque::new(),
            done: VecDeque::new(),
            sensors: VecDeque::new(),
            front_distance: 0,
            version: 0,
            nacks: 0,
            fault: false,
            corrupt: None,
            misroute: None,
            pending: None,
        })))
    }

    pub fn set_present(&self, present: bool) {
        self.0.borrow_mut().present = present;
    }

    /// NACK the next `n` transactions
    pub fn nack_next(&self, n: usize) {
        self.0.borrow_mut().nacks = n;
    }

    /// Fail the next transaction with a bus fault
    pub fn fault_next(&self) {
        self.0.borrow_mut().fault = true;
    }

    /// Error register values for successive polls; `None` once drained
    pub fn queue_errors(&self, codes: &[ErrorCode]) {
        self.0.borrow_mut().errors.extend(codes.iter().copied());
    }

    /// Completion flags for successive polls; not outstanding once drained
    pub fn queue_done(&self, outstanding: &[bool]) {
        self.0.borrow_mut().done.extend(outstanding.iter().copied());
    }

    /// Sensor bitmasks for successive reads; 0 once drained
    pub fn queue_sensors(&self, masks: &[u8]) {
        self.0.borrow_mut().sensors.extend(masks.iter().copied());
    }

    pub fn set_front_distance(&self, raw: u16) {
        self.0.borrow_mut().front_distance = raw;
    }

    pub fn set_version(&self, version: u8) {
        self.0.borrow_mut().version = version;
    }

    /// Break the checksum of the next `n` responses to `command`
    pub fn corrupt_reads_for(&self, command: CommandId, n: usize) {
        self.corrupt_reads_after(command, 0, n);
    }

    /// Like `corrupt_reads_for`, leaving the first `skip` responses intact
    pub fn corrupt_reads_after(&self, command: CommandId, skip: usize, n: usize) {
        self.0.borrow_mut().corrupt = Some((command, skip, n));
    }

    /// Answer the next `n` requests for `command` with a different command id
    pub fn misroute_reads_for(&self, command: CommandId, n: usize) {
        self.0.borrow_mut().misroute = Some((command, n));
    }

    pub fn log(&self) -> Vec<Transfer> {
        self.0.borrow().log.clone()
    }

    /// Command ids of every frame written, in order
    pub fn commands(&self) -> Vec<CommandId> {
        self.writes()
            .iter()
            .filter_map(|w| w.get(1).copied().and_then(CommandId::from_byte))
            .collect()
    }

    /// Raw bytes of every frame written, in order
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.0
            .borrow()
            .log
            .iter()
            .filter_map(|t| match t {
                Transfer::Write(bytes) => Some(bytes.clone()),
                Transfer::Read(_) => None,
            })
            .collect()
    }
}

impl Board {
    fn respond(&mut self, buf: &mut [u8]) {
        let Some(command) = self.pending else {
            buf.fill(0);
            return;
        };

        let mut payload: Vec<u8> = match command {
            CommandId::Error => {
                let code = self.errors.pop_front().unwrap_or(ErrorCode::None);
                vec![code.to_byte().unwrap()]
            }
            CommandId::Done => vec![self.done.pop_front().unwrap_or(false) as u8],
            CommandId::Sensors => vec![self.sensors.pop_front().unwrap_or(0)],
            CommandId::FrontDistance => self.front_distance.to_le_bytes().to_vec(),
            CommandId::Version => vec![self.version],
            CommandId::CommsReset => vec![1],
            _ => vec![0],
        };
        payload.truncate(buf.len().saturating_sub(3).max(1));

        let mut reply_command = command;
        if let Some((target, n)) = self.misroute.as_mut() {
            if *target == command && *n > 0 {
                *n -= 1;
                reply_command = if command == CommandId::Version {
                    CommandId::Error
                } else {
                    CommandId::Version
                };
            }
        }

        let mut frame = encode(reply_command, &payload).unwrap().to_vec();
        if let Some((target, skip, n)) = self.corrupt.as_mut() {
            if *target == command {
                if *skip > 0 {
                    *skip -= 1;
                } else if *n > 0 {
                    *n -= 1;
                    let last = frame.len() - 1;
                    frame[last] ^= 0xFF;
                }
            }
        }

        let len = frame.len().min(buf.len());
        buf[..len].copy_from_slice(&frame[..len]);
    }
}

impl ErrorType for MockBoard {
    type Error = MockError;
}

impl I2c for MockBoard {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut board = self.0.borrow_mut();
        if address != DEVICE_ADDRESS || !board.present {
            return Err(MockError::Nack);
        }
        if board.fault {
            board.fault = false;
            return Err(MockError::Bus);
        }
        if board.nacks > 0 {
            board.nacks -= 1;
            return Err(MockError::Nack);
        }

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    board.log.push(Transfer::Write(bytes.to_vec()));
                    board.pending = bytes.get(1).copied().and_then(CommandId::from_byte);
                }
                Operation::Read(buf) => {
                    board.log.push(Transfer::Read(buf.len()));
                    board.respond(buf);
                }
            }
        }
        Ok(())
    }
}

/// Records every requested wait instead of sleeping
#[derive(Clone, Default)]
pub struct MockDelay(Rc<RefCell<Vec<u32>>>);

impl MockDelay {
    pub fn calls(&self) -> Vec<u32> {
        self.0.borrow().clone()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(ms);
    }
}

/// Counts resets, then unwinds in place of restarting the host
#[derive(Clone, Default)]
pub struct MockReset(Rc<Cell<u32>>);

impl MockReset {
    pub fn count(&self) -> u32 {
        self.0.get()
    }
}

impl SystemReset for MockReset {
    fn reset(&mut self) -> ! {
        self.0.set(self.0.get() + 1);
        panic!("host reset");
    }
}
