//! The transfer engine
//!
//! [`Engine`] owns the DMA engine, the interrupt controller, and the flags
//! that the interrupt handlers share with the initiator. It runs one
//! blocking, bidirectional transfer per call: the outbound channel streams
//! the input buffer into the accelerator, and the inbound channel streams
//! the accelerator's results into the output buffer.

use crate::{
    cache::CacheMaintenance,
    channel::{Channel, Irq},
    dma::Dma,
    intc::{InterruptController, Trigger},
    interrupt::{self, HandlerAction, ResetPolicy, ENABLED},
    sample::Element,
    sync::SyncState,
    Error,
};

/// Transfer length, in samples, of a new engine
pub const DEFAULT_TRANSFER_LENGTH: usize = 1024;

/// The longest transfer, in samples
pub const MAX_TRANSFER_LENGTH: usize = 8192;

/// A length is legal if it's a power of two no larger than
/// [`MAX_TRANSFER_LENGTH`]. Zero isn't a power of two.
const fn is_legal_length(length: usize) -> bool {
    length.is_power_of_two() && length <= MAX_TRANSFER_LENGTH
}

/// Engine bring-up settings
///
/// Construct with [`Config::new`], then adjust fields as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Interrupt line of the outbound (MM2S) channel
    pub outbound_line: u32,
    /// Interrupt line of the inbound (S2MM) channel
    pub inbound_line: u32,
    /// Priority of the outbound interrupt line
    pub outbound_priority: u8,
    /// Priority of the inbound interrupt line
    pub inbound_priority: u8,
    /// Trigger type of both interrupt lines
    pub trigger: Trigger,
    /// Reset budget, used at bring-up and when a transfer fails
    pub reset: ResetPolicy,
}

impl Config {
    /// Settings for the given interrupt lines
    ///
    /// The inbound line gets the more urgent priority (0xA0, versus 0xA8
    /// for outbound), since inbound completion ends a transfer. Both lines
    /// are rising-edge triggered.
    pub const fn new(outbound_line: u32, inbound_line: u32) -> Self {
        Config {
            outbound_line,
            inbound_line,
            outbound_priority: 0xA8,
            inbound_priority: 0xA0,
            trigger: Trigger::RisingEdge,
            reset: ResetPolicy::new(ResetPolicy::DEFAULT_MAX_POLLS),
        }
    }

    /// Set the interrupt priorities
    pub const fn with_priorities(mut self, outbound: u8, inbound: u8) -> Self {
        self.outbound_priority = outbound;
        self.inbound_priority = inbound;
        self
    }

    /// Set the trigger type of both interrupt lines
    pub const fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Set the reset budget
    pub const fn with_reset_policy(mut self, reset: ResetPolicy) -> Self {
        self.reset = reset;
        self
    }

    /// Returns the interrupt line of `channel`
    pub const fn line(&self, channel: Channel) -> u32 {
        match channel {
            Channel::Outbound => self.outbound_line,
            Channel::Inbound => self.inbound_line,
        }
    }

    /// Returns the interrupt priority of `channel`
    pub const fn priority(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Outbound => self.outbound_priority,
            Channel::Inbound => self.inbound_priority,
        }
    }
}

/// A bidirectional DMA transfer engine
///
/// `Engine` isn't meant for concurrent callers. Only one transfer may be
/// outstanding, and nothing but caller discipline enforces that. The
/// interrupt handlers, on the other hand, are expected to run concurrently
/// with [`transfer`](Engine::transfer); they only need a shared reference.
pub struct Engine<D, I, C> {
    dma: D,
    intc: I,
    cache: C,
    flags: SyncState,
    config: Config,
    transfer_length: usize,
}

impl<D, I, C> Engine<D, I, C>
where
    D: Dma,
    I: InterruptController,
    C: CacheMaintenance,
{
    /// Bring up the DMA engine and its interrupts
    ///
    /// `new` checks that the DMA engine runs in simple mode, resets it,
    /// enables the completion and error interrupts of both channels, then
    /// configures, connects, and unmasks both interrupt lines.
    ///
    /// Returns [`Error::Initialization`] if the engine has scatter-gather,
    /// if the reset doesn't finish within the reset budget, or if the
    /// interrupt controller rejects a line.
    pub fn new(dma: D, mut intc: I, cache: C, config: Config) -> crate::Result<Self> {
        if dma.has_scatter_gather() {
            log::error!("DMA engine is configured for scatter-gather; simple mode required");
            return Err(Error::Initialization);
        }

        if !config.reset.reset(&dma) {
            log::error!(
                "DMA engine reset didn't finish within {} polls",
                config.reset.max_polls()
            );
            return Err(Error::Initialization);
        }

        for channel in Channel::ALL {
            dma.enable_interrupts(channel, ENABLED);
        }

        for channel in Channel::ALL {
            let line = config.line(channel);
            intc.configure(line, config.priority(channel), config.trigger)
                .map_err(|err| {
                    log::error!("Failed to configure interrupt line {}: {:?}", line, err);
                    Error::Initialization
                })?;
            intc.connect(line, channel).map_err(|err| {
                log::error!(
                    "Failed to connect interrupt line {} to the {:?} handler: {:?}",
                    line,
                    channel,
                    err
                );
                Error::Initialization
            })?;
        }

        for channel in Channel::ALL {
            intc.enable(config.line(channel));
        }

        log::info!(
            "DMA engine ready (outbound IRQ {}, inbound IRQ {})",
            config.outbound_line,
            config.inbound_line
        );

        Ok(Engine {
            dma,
            intc,
            cache,
            flags: SyncState::new(),
            config,
            transfer_length: DEFAULT_TRANSFER_LENGTH,
        })
    }

    /// Handle a DMA interrupt
    ///
    /// Call `on_interrupt` from the interrupt handler of `channel`'s line:
    ///
    /// ```
    /// use axi_fft_dma::{CacheMaintenance, Channel, Dma, Engine, InterruptController};
    ///
    /// fn s2mm_isr<D: Dma, I: InterruptController, C: CacheMaintenance>(
    ///     engine: &Engine<D, I, C>,
    /// ) {
    ///     engine.on_interrupt(Channel::Inbound);
    /// }
    /// ```
    ///
    /// The handler for one channel must not preempt itself. It may run
    /// concurrently with the other channel's handler.
    pub fn on_interrupt(&self, channel: Channel) -> HandlerAction {
        interrupt::handle(&self.dma, &self.flags, self.config.reset, channel)
    }

    /// Set the transfer length, in samples, used by [`transfer`](Engine::transfer)
    ///
    /// Returns [`Error::IllegalParameter`] if `length` isn't a power of two,
    /// or exceeds [`MAX_TRANSFER_LENGTH`]. The previous length stays in
    /// effect.
    pub fn set_transfer_length(&mut self, length: usize) -> crate::Result<()> {
        if !is_legal_length(length) {
            log::error!(
                "DMA transfer length {} is not a power of two up to {}",
                length,
                MAX_TRANSFER_LENGTH
            );
            return Err(Error::IllegalParameter);
        }
        self.transfer_length = length;
        Ok(())
    }

    /// Returns the transfer length, in samples
    pub fn transfer_length(&self) -> usize {
        self.transfer_length
    }

    /// Stream the first [`transfer_length`](Engine::transfer_length) samples
    /// of `input` through the accelerator into `output`
    ///
    /// See [`transfer_with_length`](Engine::transfer_with_length).
    pub fn transfer<E: Element>(&self, input: &[E], output: &mut [E]) -> crate::Result<()> {
        self.transfer_with_length(input, output, self.transfer_length)
    }

    /// Stream `length` samples of `input` through the accelerator into `output`
    ///
    /// Blocks until both channels complete, or until either reports an
    /// error. There's no timeout: if the accelerator never produces
    /// `length` samples, this never returns.
    ///
    /// After [`Error::TransferRuntime`], the interrupt handler may still be
    /// resetting the DMA engine when this returns; the handler sets the error
    /// flag before it resets. On a multi-core system, don't start the next
    /// transfer until that handler has returned. A reset that lands after
    /// the next transfer starts stops it, and that transfer then never
    /// returns.
    ///
    /// # Errors
    ///
    /// - [`Error::IllegalParameter`] if `length` isn't a power of two,
    ///   exceeds [`MAX_TRANSFER_LENGTH`], or exceeds either buffer. The
    ///   hardware isn't touched.
    /// - [`Error::TransferInitiation`] if the DMA engine refuses either
    ///   channel. If the outbound channel was already running, the engine
    ///   is reset.
    /// - [`Error::TransferRuntime`] if the DMA engine reports an error. The
    ///   interrupt handler has already attempted a reset. The contents of
    ///   `output` are unspecified.
    pub fn transfer_with_length<E: Element>(
        &self,
        input: &[E],
        output: &mut [E],
        length: usize,
    ) -> crate::Result<()> {
        if !is_legal_length(length) || input.len() < length || output.len() < length {
            log::error!(
                "Illegal DMA transfer of {} samples (input holds {}, output holds {})",
                length,
                input.len(),
                output.len()
            );
            return Err(Error::IllegalParameter);
        }

        // Can't overflow: both buffers hold at least this many bytes.
        let bytes = length * core::mem::size_of::<E>();
        let source = input.as_ptr() as usize;
        let destination = output.as_mut_ptr() as usize;

        self.cache.flush(source, bytes);
        self.cache.flush(destination, bytes);

        self.flags.clear();

        // Safety: the input buffer outlives this call, and this call doesn't
        // return while the transfer is in flight.
        if let Err(rejection) = unsafe { self.dma.start_transfer(Channel::Outbound, source, bytes) }
        {
            log::error!("Failed to start the outbound DMA transfer: {:?}", rejection);
            return Err(Error::TransferInitiation);
        }

        // Safety: same as above, for the output buffer.
        if let Err(rejection) =
            unsafe { self.dma.start_transfer(Channel::Inbound, destination, bytes) }
        {
            log::error!("Failed to start the inbound DMA transfer: {:?}", rejection);
            // The outbound transfer is already running. Stop it.
            self.recover();
            return Err(Error::TransferInitiation);
        }

        log::debug!("DMA transfer of {} bytes started", bytes);

        let outcome = self.flags.wait();
        match outcome {
            Ok(()) => self.cache.flush(destination, bytes),
            Err(err) => log::error!("DMA transfer failed: {}", err),
        }
        outcome
    }

    fn recover(&self) {
        if !self.config.reset.reset(&self.dma) {
            log::warn!(
                "DMA engine reset didn't finish within {} polls",
                self.config.reset.max_polls()
            );
        }
        for channel in Channel::ALL {
            self.dma.enable_interrupts(channel, ENABLED);
        }
    }

    /// Mask the DMA interrupts, and return the hardware
    pub fn release(mut self) -> (D, I, C) {
        for channel in Channel::ALL {
            self.intc.disable(self.config.line(channel));
            self.dma.disable_interrupts(channel, Irq::ALL);
        }
        (self.dma, self.intc, self.cache)
    }
}

impl<D, I, C> Engine<D, I, C> {
    /// Returns the flags shared with the interrupt handlers
    pub fn flags(&self) -> &SyncState {
        &self.flags
    }

    /// Returns the DMA engine
    pub fn dma(&self) -> &D {
        &self.dma
    }

    /// Returns the bring-up settings
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the reset budget shared by bring-up and error recovery
    pub fn reset_policy(&self) -> ResetPolicy {
        self.config.reset
    }
}
