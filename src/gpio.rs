//! Discrete outputs that carry the accelerator configuration

use crate::ral::{self, gpio, Static};

/// A register of output pins wired into the accelerator's configuration port
pub trait DiscreteOutput {
    /// Drive all pins with `value`
    fn write(&self, value: u32);
}

impl<G: DiscreteOutput + ?Sized> DiscreteOutput for &G {
    fn write(&self, value: u32) {
        (**self).write(value)
    }
}

/// One of the two AXI GPIO channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioChannel {
    /// GPIO_DATA / GPIO_TRI
    One,
    /// GPIO2_DATA / GPIO2_TRI
    Two,
}

/// An AXI GPIO channel used as a 32-bit output port
pub struct AxiGpio {
    registers: Static<gpio::RegisterBlock>,
    channel: GpioChannel,
}

impl AxiGpio {
    /// Create the AXI GPIO driver, and drive every pin of `channel`
    /// as an output
    ///
    /// # Safety
    ///
    /// Caller must make sure that `registers` points to the start of an AXI GPIO
    /// register block, and that no other driver owns `channel`.
    pub unsafe fn new(registers: *const (), channel: GpioChannel) -> Self {
        let gpio = AxiGpio {
            registers: Static(registers.cast()),
            channel,
        };
        let regs = &*gpio.registers;
        match channel {
            GpioChannel::One => ral::write_reg!(crate::ral::gpio, regs, GPIO_TRI, 0),
            GpioChannel::Two => ral::write_reg!(crate::ral::gpio, regs, GPIO2_TRI, 0),
        }
        gpio
    }

    /// Returns the value last driven onto the pins
    pub fn value(&self) -> u32 {
        let regs = &*self.registers;
        match self.channel {
            GpioChannel::One => ral::read_reg!(crate::ral::gpio, regs, GPIO_DATA),
            GpioChannel::Two => ral::read_reg!(crate::ral::gpio, regs, GPIO2_DATA),
        }
    }
}

// Safety: the data register is written with single stores.
unsafe impl Send for AxiGpio {}
unsafe impl Sync for AxiGpio {}

impl DiscreteOutput for AxiGpio {
    fn write(&self, value: u32) {
        let regs = &*self.registers;
        match self.channel {
            GpioChannel::One => ral::write_reg!(crate::ral::gpio, regs, GPIO_DATA, value),
            GpioChannel::Two => ral::write_reg!(crate::ral::gpio, regs, GPIO2_DATA, value),
        }
    }
}
