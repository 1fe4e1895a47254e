use crate::Ack;

/// Register-level primitives of an I2C master peripheral.
///
/// Every operation only starts a bus event. Its completion is reported by
/// the interrupt handler through the [`InterruptSignal`] the master was
/// built with, never through a return value.
///
/// [`InterruptSignal`]: crate::InterruptSignal
pub trait I2cController {
    /// Generates a start condition. Also used to restart after a NACK.
    fn assert_start(&mut self);

    /// Generates a stop condition.
    fn assert_stop(&mut self);

    /// Shifts out one byte, either the address byte or a data byte.
    fn transmit_byte(&mut self, byte: u8);

    /// Clocks in one byte from the slave.
    fn enable_receive(&mut self);

    /// Byte latched by the last receive.
    fn read_received_byte(&mut self) -> u8;

    /// Starts the acknowledge sequence for the byte just received.
    fn set_outgoing_ack(&mut self, ack: Ack);

    /// Acknowledge bit returned by the slave for the last transmitted byte.
    fn ack_status(&mut self) -> Ack;
}

impl<T: I2cController + ?Sized> I2cController for &mut T {
    fn assert_start(&mut self) {
        T::assert_start(self)
    }

    fn assert_stop(&mut self) {
        T::assert_stop(self)
    }

    fn transmit_byte(&mut self, byte: u8) {
        T::transmit_byte(self, byte)
    }

    fn enable_receive(&mut self) {
        T::enable_receive(self)
    }

    fn read_received_byte(&mut self) -> u8 {
        T::read_received_byte(self)
    }

    fn set_outgoing_ack(&mut self, ack: Ack) {
        T::set_outgoing_ack(self, ack)
    }

    fn ack_status(&mut self) -> Ack {
        T::ack_status(self)
    }
}
