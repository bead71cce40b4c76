//! Interrupt-driven AXI DMA driver for a streaming FFT accelerator
//!
//! `axi-fft-dma` provides
//!
//! - a transfer [`Engine`] that streams a buffer through an accelerator with
//!   one outbound and one inbound DMA channel, and blocks until both finish.
//! - the interrupt handler that the engine shares with the platform's
//!   interrupt dispatcher, including a bounded reset when the DMA engine
//!   reports an error.
//! - an [`Fft`] controller that validates transform parameters, packs them into
//!   the accelerator's configuration word, and runs transforms through the
//!   engine.
//!
//! The hardware is reached through small traits: [`Dma`], [`InterruptController`],
//! [`CacheMaintenance`], and [`DiscreteOutput`]. The crate implements them for
//! the AXI DMA ([`AxiDma`]), the AXI GPIO ([`AxiGpio`]), and the Cortex-M data
//! cache ([`ScbCache`]). You supply the interrupt controller.
//!
//! # Getting started
//!
//! Create the engine once, and keep it for the life of the program. Route the
//! two DMA interrupt lines to [`Engine::on_interrupt`]. Then, run transforms:
//!
//! ```no_run
//! use axi_fft_dma::{
//!     AxiDma, AxiGpio, Channel, ComplexSample, Config, Coherent, Direction, Engine, Fft,
//!     GpioChannel, InterruptController, Trigger,
//! };
//! # struct Gic;
//! # impl InterruptController for Gic {
//! #     type Error = ();
//! #     fn configure(&mut self, _: u32, _: u8, _: Trigger) -> Result<(), ()> { Ok(()) }
//! #     fn connect(&mut self, _: u32, _: Channel) -> Result<(), ()> { Ok(()) }
//! #     fn enable(&mut self, _: u32) {}
//! #     fn disable(&mut self, _: u32) {}
//! # }
//! # const AXI_DMA: *const () = 0x4040_0000 as _;
//! # const AXI_GPIO: *const () = 0x4120_0000 as _;
//!
//! # fn main() -> axi_fft_dma::Result<()> {
//! // Safety: addresses are valid for this design, and we own both IPs.
//! let dma = unsafe { AxiDma::new(AXI_DMA) };
//! let gpio = unsafe { AxiGpio::new(AXI_GPIO, GpioChannel::One) };
//!
//! let engine = Engine::new(dma, Gic, Coherent, Config::new(62, 61))?;
//! let mut fft = Fft::new(engine, gpio)?;
//! fft.set_direction(Direction::Forward);
//! fft.set_point_count(256)?;
//!
//! let input = [ComplexSample::new(1, 0); 256];
//! let mut output = [ComplexSample::default(); 256];
//! fft.execute(&input, &mut output)?;
//! # Ok(()) }
//! ```
//!
//! # Limitations
//!
//! There's no timeout. If the accelerator never produces a full block, the
//! transfer never returns; add a watchdog if you need bounded latency. The
//! engine runs one transfer at a time, and doesn't lock against concurrent
//! callers.
//!
//! ### License
//!
//! Licensed under either of
//!
//! - [Apache License, Version 2.0](http://www.apache.org/licenses/LICENSE-2.0) ([LICENSE-APACHE](./LICENSE-APACHE))
//! - [MIT License](http://opensource.org/licenses/MIT) ([LICENSE-MIT](./LICENSE-MIT))
//!
//! at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted
//! for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
//! dual licensed as above, without any additional terms or conditions.

#![cfg_attr(not(test), no_std)]

mod axi_dma;
pub mod cache;
mod channel;
pub mod dma;
pub mod engine;
mod error;
pub mod fft;
pub mod gpio;
pub mod intc;
mod interrupt;
mod ral;
mod sample;
pub mod sync;

pub use axi_dma::AxiDma;
pub use cache::{CacheMaintenance, Coherent, ScbCache};
pub use channel::{Channel, Irq};
pub use dma::{Dma, Rejection};
pub use engine::{Config, Engine};
pub use error::Error;
pub use fft::{ConfigWord, Direction, Fft, Params};
pub use gpio::{AxiGpio, DiscreteOutput, GpioChannel};
pub use intc::{InterruptController, Trigger};
pub use interrupt::{HandlerAction, ResetPolicy};
pub use sample::{ComplexSample, Element};
pub use sync::{Snapshot, SyncState};

/// A driver result
pub type Result<T> = core::result::Result<T, Error>;
