#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use async_i2c_master::{Ack, Completion, I2cController, I2cMaster, InterruptSignal, State};

/// Bus primitive as seen by the simulated peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Start,
    Stop,
    Transmit(u8),
    EnableReceive,
    Read(u8),
    SendAck(Ack),
}

/// Simulated master peripheral with a scripted slave.
///
/// Every operation that ends in a bus event raises the shared signal, right
/// away in auto mode or on [`fire`](Self::fire) otherwise.
pub struct SimController<'a> {
    signal: &'a InterruptSignal,
    auto_complete: bool,
    outstanding: usize,

    pub log: Vec<Op>,

    address_acks: VecDeque<Ack>,
    data_acks: VecDeque<Ack>,
    slave_bytes: VecDeque<u8>,
    default_address_ack: Ack,
    default_data_ack: Ack,

    expect_address: bool,
    last_ack: Ack,
    latched: u8,
}

impl<'a> SimController<'a> {
    pub fn new(signal: &'a InterruptSignal) -> Self {
        Self {
            signal,
            auto_complete: true,
            outstanding: 0,
            log: Vec::new(),
            address_acks: VecDeque::new(),
            data_acks: VecDeque::new(),
            slave_bytes: VecDeque::new(),
            default_address_ack: Ack::Ack,
            default_data_ack: Ack::Ack,
            expect_address: false,
            last_ack: Ack::Ack,
            latched: 0,
        }
    }

    /// Leaves bus events pending until [`fire`](Self::fire) is called.
    pub fn manual(mut self) -> Self {
        self.auto_complete = false;
        self
    }

    pub fn nack_every_address(mut self) -> Self {
        self.default_address_ack = Ack::Nack;
        self
    }

    pub fn nack_every_data_byte(mut self) -> Self {
        self.default_data_ack = Ack::Nack;
        self
    }

    pub fn with_address_acks(mut self, acks: &[Ack]) -> Self {
        self.address_acks.extend(acks.iter().copied());
        self
    }

    pub fn with_data_acks(mut self, acks: &[Ack]) -> Self {
        self.data_acks.extend(acks.iter().copied());
        self
    }

    pub fn with_slave_bytes(mut self, bytes: &[u8]) -> Self {
        self.slave_bytes.extend(bytes.iter().copied());
        self
    }

    /// Completes the oldest pending bus event.
    pub fn fire(&mut self) {
        if self.outstanding > 0 {
            self.outstanding -= 1;
            self.signal.raise();
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn count(&self, op: Op) -> usize {
        self.log.iter().filter(|&&o| o == op).count()
    }

    fn event(&mut self) {
        if self.auto_complete {
            self.signal.raise();
        } else {
            self.outstanding += 1;
        }
    }
}

impl I2cController for SimController<'_> {
    fn assert_start(&mut self) {
        self.log.push(Op::Start);
        self.expect_address = true;
        self.event();
    }

    fn assert_stop(&mut self) {
        self.log.push(Op::Stop);
        self.event();
    }

    fn transmit_byte(&mut self, byte: u8) {
        self.log.push(Op::Transmit(byte));
        self.last_ack = if self.expect_address {
            self.expect_address = false;
            self.address_acks
                .pop_front()
                .unwrap_or(self.default_address_ack)
        } else {
            self.data_acks.pop_front().unwrap_or(self.default_data_ack)
        };
        self.event();
    }

    fn enable_receive(&mut self) {
        self.log.push(Op::EnableReceive);
        self.latched = self.slave_bytes.pop_front().unwrap_or(0xFF);
        self.event();
    }

    fn read_received_byte(&mut self) -> u8 {
        self.log.push(Op::Read(self.latched));
        self.latched
    }

    fn set_outgoing_ack(&mut self, ack: Ack) {
        self.log.push(Op::SendAck(ack));
        self.event();
    }

    fn ack_status(&mut self) -> Ack {
        self.last_ack
    }
}

/// Shared log of transaction outcomes, in completion order.
#[derive(Clone, Default)]
pub struct Outcomes {
    log: Rc<RefCell<Vec<(u32, Option<Vec<u8>>)>>>,
}

impl Outcomes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorder(&self, id: u32) -> Recorder {
        Recorder {
            id,
            log: self.log.clone(),
        }
    }

    pub fn take(&self) -> Vec<(u32, Option<Vec<u8>>)> {
        self.log.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }
}

pub struct Recorder {
    id: u32,
    log: Rc<RefCell<Vec<(u32, Option<Vec<u8>>)>>>,
}

impl Completion for Recorder {
    fn complete(self, outcome: Option<&[u8]>) {
        self.log
            .borrow_mut()
            .push((self.id, outcome.map(<[u8]>::to_vec)));
    }
}

pub type SimMaster<'a> = I2cMaster<'a, SimController<'a>, Recorder>;

/// Calls `process` until the queue is drained and the master is back to
/// idle. Returns the number of calls, panics past `limit`.
pub fn drive<B: I2cController, C: Completion, const N: usize, const BUF: usize>(
    master: &mut I2cMaster<'_, B, C, N, BUF>,
    limit: usize,
) -> usize {
    let mut steps = 0;
    while master.pending_count() > 0 || master.state() != State::Idle {
        assert!(steps < limit, "master still busy after {limit} steps");
        master.process();
        steps += 1;
    }
    steps
}
