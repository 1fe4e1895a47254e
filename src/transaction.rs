use heapless::Vec;

use crate::{Completion, Direction, QueueError, MAX_ADDRESS};

/// One addressed read or write, as held by a queue slot.
pub struct Transaction<C, const BUF: usize> {
    address: u8,
    direction: Direction,
    payload: Vec<u8, BUF>,
    processed: usize,
    completion: C,
}

impl<C: Completion, const BUF: usize> Transaction<C, BUF> {
    /// Builds a transaction moving `length` bytes.
    ///
    /// Writes send the first `length` bytes of `payload`. Reads only use
    /// `length`, the buffer starts zeroed and is filled by the slave.
    pub(crate) fn new(
        address: u8,
        payload: &[u8],
        length: usize,
        direction: Direction,
        completion: C,
    ) -> Result<Self, QueueError> {
        if address > MAX_ADDRESS {
            return Err(QueueError::InvalidAddress);
        }
        if length > BUF {
            return Err(QueueError::PayloadTooLarge);
        }

        let payload = match direction {
            Direction::Write => {
                let bytes = payload.get(..length).ok_or(QueueError::PayloadTooShort)?;
                Vec::from_slice(bytes).map_err(|_| QueueError::PayloadTooLarge)?
            }
            Direction::Read => {
                if length == 0 {
                    return Err(QueueError::EmptyRead);
                }
                let mut buf = Vec::new();
                buf.resize(length, 0)
                    .map_err(|_| QueueError::PayloadTooLarge)?;
                buf
            }
        };

        Ok(Self {
            address,
            direction,
            payload,
            processed: 0,
            completion,
        })
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Bytes transferred so far.
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Bytes to transfer in total.
    pub fn total(&self) -> usize {
        self.payload.len()
    }

    pub fn is_finished(&self) -> bool {
        self.processed >= self.payload.len()
    }

    /// Address byte with the R/W bit in bit 0.
    pub(crate) fn address_byte(&self) -> u8 {
        (self.address << 1) | self.direction as u8
    }

    /// Byte under the cursor, `None` once everything was sent.
    pub(crate) fn current_byte(&self) -> Option<u8> {
        self.payload.get(self.processed).copied()
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_finished() {
            self.processed += 1;
        }
    }

    /// Stores a received byte under the cursor and moves past it.
    pub(crate) fn store_received(&mut self, byte: u8) {
        if let Some(slot) = self.payload.get_mut(self.processed) {
            *slot = byte;
            self.processed += 1;
        }
    }

    /// Hands the payload to the completion and releases the transaction.
    pub(crate) fn complete(self) {
        self.completion.complete(Some(&self.payload[..]))
    }

    /// Reports failure to the completion and releases the transaction.
    pub(crate) fn fail(self) {
        self.completion.complete(None)
    }
}
