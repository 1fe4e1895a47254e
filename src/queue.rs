use heapless::Deque;

use crate::{Completion, Direction, QueueError, Transaction};

/// Fixed-capacity FIFO of pending transactions.
///
/// The front slot is the transaction in flight. It stays in the queue until
/// the master finishes it, so [`pending_count`] counts queued and in-flight
/// transactions alike.
///
/// [`pending_count`]: Self::pending_count
pub struct TransactionQueue<C, const N: usize, const BUF: usize> {
    slots: Deque<Transaction<C, BUF>, N>,
}

impl<C: Completion, const N: usize, const BUF: usize> TransactionQueue<C, N, BUF> {
    pub const fn new() -> Self {
        Self {
            slots: Deque::new(),
        }
    }

    /// Queues a transaction moving `length` bytes to or from `address`.
    ///
    /// Leaves the queue untouched on error.
    pub fn enqueue(
        &mut self,
        address: u8,
        payload: &[u8],
        length: usize,
        direction: Direction,
        completion: C,
    ) -> Result<(), QueueError> {
        if self.slots.is_full() {
            return Err(QueueError::QueueFull);
        }

        let txn = Transaction::new(address, payload, length, direction, completion)?;
        self.slots
            .push_back(txn)
            .map_err(|_| QueueError::QueueFull)
    }

    pub fn pending_count(&self) -> usize {
        self.slots.len()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }

    /// The transaction in flight, if any.
    pub fn head(&self) -> Option<&Transaction<C, BUF>> {
        self.slots.front()
    }

    pub(crate) fn head_mut(&mut self) -> Option<&mut Transaction<C, BUF>> {
        self.slots.front_mut()
    }

    pub(crate) fn pop_head(&mut self) -> Option<Transaction<C, BUF>> {
        self.slots.pop_front()
    }
}

impl<C: Completion, const N: usize, const BUF: usize> Default for TransactionQueue<C, N, BUF> {
    fn default() -> Self {
        Self::new()
    }
}
