use crate::{
    interrupts::InterruptSignal,
    queue::TransactionQueue,
    retry::{RetryCounter, RetryPolicy, Verdict},
    state_holder::StateHolder,
    Ack, Completion, Direction, I2cController, QueueError, State, PAYLOAD_CAPACITY,
    QUEUE_CAPACITY,
};

pub const STATES_HISTORY_SIZE: usize = 8;

/// Snapshot of the master for post-mortem on a parked bus.
#[cfg(feature = "dump")]
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateDump {
    pub state_history: [State; STATES_HISTORY_SIZE],
    pub current_state: State,
    pub retries: u32,
    pub pending: usize,
}

#[cfg(feature = "dump")]
fn deque_into_array<T: Copy, const N: usize>(d: &heapless::Deque<T, N>, arr: &mut [T; N]) {
    let n = d.len();
    let (a, b) = d.as_slices();
    let s = N - n;

    arr[s..s + a.len()].copy_from_slice(a);
    arr[s + a.len()..].copy_from_slice(b);
}

/// Queue-driven I2C master.
///
/// Owns the controller, the transaction queue and the protocol state. Only
/// the [`InterruptSignal`] is shared, with the interrupt handler.
pub struct I2cMaster<
    'a,
    B: I2cController,
    C: Completion = fn(Option<&[u8]>),
    const N: usize = QUEUE_CAPACITY,
    const BUF: usize = PAYLOAD_CAPACITY,
> {
    controller: B,
    signal: &'a InterruptSignal,

    queue: TransactionQueue<C, N, BUF>,

    state_holder: StateHolder<STATES_HISTORY_SIZE>,
    retries: RetryCounter,
    policy: RetryPolicy,
}

impl<'a, B: I2cController, C: Completion, const N: usize, const BUF: usize>
    I2cMaster<'a, B, C, N, BUF>
{
    pub fn new(controller: B, signal: &'a InterruptSignal) -> Self {
        Self::with_retry_policy(controller, signal, RetryPolicy::default())
    }

    pub fn with_retry_policy(
        controller: B,
        signal: &'a InterruptSignal,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            controller,
            signal,
            queue: TransactionQueue::new(),
            state_holder: StateHolder::new(),
            retries: RetryCounter::new(),
            policy,
        }
    }

    /// Queues a transfer of `payload.len()` bytes.
    ///
    /// For reads only the length of `payload` matters, see [`enqueue_read`].
    ///
    /// [`enqueue_read`]: Self::enqueue_read
    pub fn enqueue(
        &mut self,
        address: u8,
        payload: &[u8],
        direction: Direction,
        completion: C,
    ) -> Result<(), QueueError> {
        self.enqueue_len(address, payload, payload.len(), direction, completion)
    }

    /// Queues a transfer of the first `length` bytes of `payload`.
    ///
    /// A write with `length` past the end of `payload` is rejected with
    /// [`QueueError::PayloadTooShort`]. Reads ignore the contents of `payload`.
    pub fn enqueue_len(
        &mut self,
        address: u8,
        payload: &[u8],
        length: usize,
        direction: Direction,
        completion: C,
    ) -> Result<(), QueueError> {
        let res = self
            .queue
            .enqueue(address, payload, length, direction, completion);

        #[cfg(feature = "defmt")]
        match res {
            Ok(()) => defmt::debug!(
                "i2c: queued {} of {} bytes for {:#x}",
                direction,
                length,
                address
            ),
            Err(err) => defmt::debug!("i2c: rejected {:#x}: {}", address, err),
        }

        res
    }

    pub fn enqueue_write(
        &mut self,
        address: u8,
        bytes: &[u8],
        completion: C,
    ) -> Result<(), QueueError> {
        self.enqueue(address, bytes, Direction::Write, completion)
    }

    /// Queues a read of `length` bytes.
    pub fn enqueue_read(
        &mut self,
        address: u8,
        length: usize,
        completion: C,
    ) -> Result<(), QueueError> {
        self.enqueue_len(address, &[], length, Direction::Read, completion)
    }

    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    pub fn state(&self) -> State {
        self.state_holder.get_state()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state(), State::Idle)
    }

    /// Whether the next [`process`] call has nothing to do until the
    /// interrupt handler raises the signal.
    ///
    /// [`process`]: Self::process
    pub fn is_waiting(&self) -> bool {
        self.state().awaits_signal() && !self.signal.is_raised()
    }

    pub fn retries(&self) -> u32 {
        self.retries.count()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn queue(&self) -> &TransactionQueue<C, N, BUF> {
        &self.queue
    }

    pub fn controller(&self) -> &B {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut B {
        &mut self.controller
    }

    /// Gives the controller back. Whatever is still queued is dropped
    /// without running its completion.
    pub fn release(self) -> B {
        self.controller
    }

    #[cfg(feature = "dump")]
    pub fn dump_state(&self) -> StateDump {
        let mut states = [State::Idle; STATES_HISTORY_SIZE];
        deque_into_array(self.state_holder.get_history(), &mut states);

        StateDump {
            state_history: states,
            current_state: self.state(),
            retries: self.retries.count(),
            pending: self.pending_count(),
        }
    }

    fn set_state(&mut self, state: State) {
        self.state_holder.set_state(state)
    }

    /// Advances the protocol by at most one step. Never blocks.
    pub fn process(&mut self) {
        let state = self.state();

        if state.awaits_signal() && !self.signal.take() {
            return;
        }

        let next = match state {
            State::Idle => {
                if self.queue.is_empty() {
                    return;
                }
                self.retries.reset();
                State::Start
            }
            State::Start => {
                self.controller.assert_start();
                State::Address
            }
            State::Address => {
                let Some(txn) = self.queue.head() else {
                    return self.set_state(State::Idle);
                };
                self.controller.transmit_byte(txn.address_byte());
                State::AddressAck
            }
            State::AddressAck => match self.controller.ack_status() {
                Ack::Ack => {
                    self.retries.reset();
                    match self.queue.head() {
                        Some(txn) if txn.is_finished() => State::Stop,
                        Some(txn) if txn.direction() == Direction::Read => State::DataReceive,
                        Some(_) => State::DataTransmit,
                        None => State::Idle,
                    }
                }
                Ack::Nack => self.on_nack(),
            },
            State::DataTransmit => {
                let Some(byte) = self.queue.head().and_then(|txn| txn.current_byte()) else {
                    return self.set_state(State::Stop);
                };
                self.controller.transmit_byte(byte);
                State::DataTransmitAck
            }
            State::DataTransmitAck => match self.controller.ack_status() {
                Ack::Ack => {
                    self.retries.reset();
                    match self.queue.head_mut() {
                        Some(txn) => {
                            txn.advance();
                            if txn.is_finished() {
                                State::Stop
                            } else {
                                State::DataTransmit
                            }
                        }
                        None => State::Idle,
                    }
                }
                Ack::Nack => self.on_nack(),
            },
            State::DataReceive => {
                self.controller.enable_receive();
                State::DataReceiveAck
            }
            State::DataReceiveAck => {
                let byte = self.controller.read_received_byte();
                let Some(txn) = self.queue.head_mut() else {
                    return self.set_state(State::Idle);
                };
                txn.store_received(byte);

                // The last byte is NACKed so the slave releases the bus.
                let ack = if txn.is_finished() { Ack::Nack } else { Ack::Ack };
                self.controller.set_outgoing_ack(ack);
                State::DataReceiveAckAck
            }
            State::DataReceiveAckAck => match self.queue.head() {
                Some(txn) if !txn.is_finished() => State::DataReceive,
                _ => State::Stop,
            },
            State::Stop => {
                self.controller.assert_stop();
                if let Some(txn) = self.queue.pop_head() {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("i2c: {:#x} done, {} bytes", txn.address(), txn.total());

                    txn.complete();
                }
                State::StopAck
            }
            State::StopAck => State::Idle,
            State::Retry => State::Start,
            State::Fail => {
                if let Some(txn) = self.queue.pop_head() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "i2c: {:#x} failed after {} retries",
                        txn.address(),
                        self.retries.count()
                    );

                    txn.fail();
                }
                State::Idle
            }
        };

        self.set_state(next);
    }

    fn on_nack(&mut self) -> State {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "i2c: NACK from {}, retry {}",
            self.queue.head().map(|txn| txn.address()),
            self.retries.count()
        );

        match self.retries.on_nack(&self.policy) {
            Verdict::Retry => State::Retry,
            Verdict::GiveUp => State::Fail,
        }
    }
}
