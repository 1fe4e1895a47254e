/// Receives the outcome of a transaction.
///
/// The master consumes the value when the transaction finishes, so it runs
/// exactly once: with `Some(payload)` after the stop condition, or with
/// `None` once the retry ceiling is exceeded. The slice is only borrowed for
/// the duration of the call, its slot is reused right after.
///
/// Any `FnOnce(Option<&[u8]>)` is a `Completion`, which includes plain
/// `fn` pointers, the default completion type of [`I2cMaster`].
///
/// The master stays mutably borrowed while it dispatches, so a completion
/// cannot reach back into it to queue a follow-up transaction. Boxed
/// closures give every transaction the same completion type:
///
/// ```
/// use async_i2c_master::{Ack, Direction, I2cController, I2cMaster, InterruptSignal};
///
/// struct Bus;
///
/// impl I2cController for Bus {
///     fn assert_start(&mut self) {}
///     fn assert_stop(&mut self) {}
///     fn transmit_byte(&mut self, _: u8) {}
///     fn enable_receive(&mut self) {}
///     fn read_received_byte(&mut self) -> u8 { 0 }
///     fn set_outgoing_ack(&mut self, _: Ack) {}
///     fn ack_status(&mut self) -> Ack { Ack::Ack }
/// }
///
/// let signal = InterruptSignal::new();
/// let mut master: I2cMaster<Bus, Box<dyn FnOnce(Option<&[u8]>) + '_>> =
///     I2cMaster::new(Bus, &signal);
/// master
///     .enqueue(0x27, &[0x01], Direction::Write, Box::new(|_: Option<&[u8]>| {}))
///     .unwrap();
/// master
///     .enqueue_write(0x27, &[0x02], Box::new(|_: Option<&[u8]>| {}))
///     .unwrap();
/// assert_eq!(master.pending_count(), 2);
/// ```
///
/// but a completion that captures the master itself is rejected by the
/// borrow checker. Follow-ups are queued from the main loop instead:
///
/// ```compile_fail
/// use async_i2c_master::{Ack, Direction, I2cController, I2cMaster, InterruptSignal};
///
/// struct Bus;
///
/// impl I2cController for Bus {
///     fn assert_start(&mut self) {}
///     fn assert_stop(&mut self) {}
///     fn transmit_byte(&mut self, _: u8) {}
///     fn enable_receive(&mut self) {}
///     fn read_received_byte(&mut self) -> u8 { 0 }
///     fn set_outgoing_ack(&mut self, _: Ack) {}
///     fn ack_status(&mut self) -> Ack { Ack::Ack }
/// }
///
/// let signal = InterruptSignal::new();
/// let mut master: I2cMaster<Bus, Box<dyn FnOnce(Option<&[u8]>) + '_>> =
///     I2cMaster::new(Bus, &signal);
/// let master_ref = &mut master;
/// master_ref
///     .enqueue(
///         0x27,
///         &[0x01],
///         Direction::Write,
///         Box::new(|_: Option<&[u8]>| {
///             let _ = master_ref.enqueue_write(0x27, &[0x02], Box::new(|_: Option<&[u8]>| {}));
///         }),
///     )
///     .unwrap();
/// ```
///
/// [`I2cMaster`]: crate::I2cMaster
pub trait Completion {
    fn complete(self, outcome: Option<&[u8]>);
}

impl<F> Completion for F
where
    F: FnOnce(Option<&[u8]>),
{
    fn complete(self, outcome: Option<&[u8]>) {
        self(outcome)
    }
}
