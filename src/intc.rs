//! The interrupt controller interface
//!
//! The engine configures and unmasks the two DMA interrupt lines while it
//! brings up the hardware. The platform's interrupt dispatcher then routes
//! each line to [`Engine::on_interrupt`](crate::Engine::on_interrupt) with
//! the [`Channel`] recorded by [`connect`](InterruptController::connect).

use crate::channel::Channel;

use core::fmt::Debug;

/// What makes an interrupt line fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Active-high level sensitive
    Level,
    /// Rising-edge sensitive
    RisingEdge,
}

/// An interrupt controller, like the ARM GIC, that owns the DMA lines
pub trait InterruptController {
    /// Why the controller refused a request
    type Error: Debug;
    /// Set the priority and trigger type of `line`
    ///
    /// Lower numbers are more urgent.
    fn configure(&mut self, line: u32, priority: u8, trigger: Trigger) -> Result<(), Self::Error>;
    /// Route `line` to the handler for `channel`
    fn connect(&mut self, line: u32, channel: Channel) -> Result<(), Self::Error>;
    /// Unmask `line`
    fn enable(&mut self, line: u32);
    /// Mask `line`
    fn disable(&mut self, line: u32);
}
