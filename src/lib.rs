#![cfg_attr(not(test), no_std)]

//! A non-blocking, queue-driven I2C master.
//!
//! Transactions are queued with [`I2cMaster::enqueue`] and driven to
//! completion by calling [`I2cMaster::process`] from the main loop. Each call
//! performs at most one protocol step; steps that wait on the bus only move
//! on once the interrupt handler has raised the shared [`InterruptSignal`].
//!
//! ```ignore
//! static SIGNAL: InterruptSignal = InterruptSignal::new();
//!
//! #[interrupt]
//! fn MI2C1() {
//!     SIGNAL.raise();
//!     clear_master_interrupt_flag();
//! }
//!
//! let mut master: I2cMaster<_> = I2cMaster::new(controller, &SIGNAL);
//! master.enqueue(0x27, &[0x01], Direction::Write, on_lcd_write)?;
//!
//! loop {
//!     master.process();
//! }
//! ```

mod completion;
mod controller;
mod interrupts;
mod master;
mod queue;
mod retry;
mod state_holder;
mod transaction;

pub use completion::Completion;
pub use controller::I2cController;
pub use interrupts::InterruptSignal;
pub use master::I2cMaster;
pub use queue::TransactionQueue;
pub use retry::{RetryPolicy, MAX_RETRIES};
pub use transaction::Transaction;

#[cfg(feature = "dump")]
pub use master::{StateDump, STATES_HISTORY_SIZE};

/// Default number of queue slots.
pub const QUEUE_CAPACITY: usize = 16;

/// Default size of a transaction's payload buffer, in bytes.
pub const PAYLOAD_CAPACITY: usize = 16;

/// Highest valid 7-bit device address.
pub const MAX_ADDRESS: u8 = 0x7F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Idle,
    Start,
    Address,
    AddressAck,
    DataTransmit,
    DataTransmitAck,
    DataReceive,
    DataReceiveAck,
    DataReceiveAckAck,
    Stop,
    StopAck,
    Retry,
    Fail,
}

impl State {
    /// Whether this state only advances once the interrupt signal is raised.
    pub const fn awaits_signal(self) -> bool {
        matches!(
            self,
            State::Address
                | State::AddressAck
                | State::DataTransmitAck
                | State::DataReceiveAck
                | State::DataReceiveAckAck
                | State::StopAck
        )
    }
}

/// Data direction, sent as the R/W bit of the address byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    Write = 0,
    Read = 1,
}

/// Acknowledge bit of a byte on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    Ack,
    Nack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueError {
    /// Every slot holds a pending transaction.
    QueueFull,
    /// The payload does not fit in a slot's buffer.
    PayloadTooLarge,
    /// A write asked for more bytes than the payload holds.
    PayloadTooShort,
    /// The address does not fit in 7 bits.
    InvalidAddress,
    /// A read must transfer at least one byte.
    EmptyRead,
}

impl core::fmt::Display for QueueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            QueueError::QueueFull => "transaction queue is full",
            QueueError::PayloadTooLarge => "payload exceeds the transaction buffer",
            QueueError::PayloadTooShort => "payload is shorter than the requested length",
            QueueError::InvalidAddress => "address is not a 7-bit address",
            QueueError::EmptyRead => "read transaction of zero bytes",
        })
    }
}
