//! The FFT accelerator controller
//!
//! [`Fft`] holds the transform parameters, packs them into the core's
//! configuration word, and runs transforms through an [`Engine`].
//!
//! The configuration word has 23 significant bits:
//!
//! | Field                | Bits    | Meaning                          |
//! |----------------------|---------|----------------------------------|
//! | point-count exponent | [4:0]   | log2(point count)                |
//! | direction            | [8]     | 0 = inverse, 1 = forward         |
//! | scale schedule       | [22:9]  | per-stage scaling, passed as-is  |

use crate::{
    cache::CacheMaintenance,
    dma::Dma,
    engine::{Engine, MAX_TRANSFER_LENGTH},
    gpio::DiscreteOutput,
    intc::InterruptController,
    ral::fft::CONFIG::{FWD_INV, NFFT, SCALE_SCH},
    sample::ComplexSample,
    Error,
};

use core::fmt::{self, Display};

/// The largest supported transform, in points
pub const MAX_POINTS: usize = MAX_TRANSFER_LENGTH;

/// Transform size of a new [`Fft`]
pub const DEFAULT_POINTS: usize = 1024;

/// Scale schedule of a new [`Fft`]
pub const DEFAULT_SCALE_SCHEDULE: u16 = 0x2AB;

/// Transform direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Inverse transform
    Inverse = 0,
    /// Forward transform
    Forward = 1,
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Inverse => "inverse",
            Direction::Forward => "forward",
        })
    }
}

/// A packed configuration word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigWord(u32);

impl ConfigWord {
    /// Pack a configuration word
    ///
    /// `exponent` is log2 of the point count. Bits of `exponent` and
    /// `scale_schedule` that don't fit their fields are dropped.
    pub const fn new(direction: Direction, exponent: u32, scale_schedule: u16) -> Self {
        let mut word = (exponent << NFFT::offset) & NFFT::mask;
        word |= ((direction as u32) << FWD_INV::offset) & FWD_INV::mask;
        word |= ((scale_schedule as u32) << SCALE_SCH::offset) & SCALE_SCH::mask;
        ConfigWord(word)
    }

    /// Interpret a raw word
    ///
    /// Bits outside of the three fields are dropped.
    pub const fn from_raw(raw: u32) -> Self {
        ConfigWord(raw & (NFFT::mask | FWD_INV::mask | SCALE_SCH::mask))
    }

    /// Returns the raw word
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns log2 of the point count
    pub const fn exponent(self) -> u32 {
        (self.0 & NFFT::mask) >> NFFT::offset
    }

    /// Returns the transform direction
    pub const fn direction(self) -> Direction {
        if (self.0 & FWD_INV::mask) >> FWD_INV::offset == 1 {
            Direction::Forward
        } else {
            Direction::Inverse
        }
    }

    /// Returns the scale schedule
    pub const fn scale_schedule(self) -> u16 {
        ((self.0 & SCALE_SCH::mask) >> SCALE_SCH::offset) as u16
    }
}

/// Transform parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// Transform direction
    pub direction: Direction,
    /// Point count. Always a power of two, at most [`MAX_POINTS`].
    pub points: usize,
    /// Opaque per-stage scaling control
    pub scale_schedule: u16,
}

impl Params {
    /// Pack the parameters into a configuration word
    pub const fn config_word(&self) -> ConfigWord {
        // Exact for a power of two: the index of the only set bit.
        ConfigWord::new(
            self.direction,
            self.points.trailing_zeros(),
            self.scale_schedule,
        )
    }
}

impl Default for Params {
    fn default() -> Self {
        Params {
            direction: Direction::Forward,
            points: DEFAULT_POINTS,
            scale_schedule: DEFAULT_SCALE_SCHEDULE,
        }
    }
}

impl Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fwd_inv = {}, num_pts = {}, scale_sch = {:#X}",
            self.direction, self.points, self.scale_schedule
        )
    }
}

/// An FFT accelerator fed by a DMA [`Engine`]
///
/// `G` drives the accelerator's configuration port.
pub struct Fft<D, I, C, G> {
    engine: Engine<D, I, C>,
    gpio: G,
    params: Params,
}

impl<D, I, C, G> Fft<D, I, C, G>
where
    D: Dma,
    I: InterruptController,
    C: CacheMaintenance,
    G: DiscreteOutput,
{
    /// Create the controller with the default parameters
    ///
    /// A forward, 1024-point transform with scale schedule `0x2AB`.
    pub fn new(mut engine: Engine<D, I, C>, gpio: G) -> crate::Result<Self> {
        let params = Params::default();
        engine.set_transfer_length(params.points)?;
        Ok(Fft {
            engine,
            gpio,
            params,
        })
    }

    /// Set the transform direction
    pub fn set_direction(&mut self, direction: Direction) {
        self.params.direction = direction;
    }

    /// Set the point count
    ///
    /// Returns [`Error::IllegalParameter`] if `points` is larger than
    /// [`MAX_POINTS`] or isn't a power of two. The previous point count
    /// stays in effect.
    pub fn set_point_count(&mut self, points: usize) -> crate::Result<()> {
        if points > MAX_POINTS {
            log::error!(
                "FFT point count {} exceeds the maximum of {}",
                points,
                MAX_POINTS
            );
            return Err(Error::IllegalParameter);
        }
        if !points.is_power_of_two() {
            log::error!("FFT point count {} is not a power of two", points);
            return Err(Error::IllegalParameter);
        }
        self.engine.set_transfer_length(points)?;
        self.params.points = points;
        Ok(())
    }

    /// Set the scale schedule
    ///
    /// Only the low 14 bits reach the hardware.
    pub fn set_scale_schedule(&mut self, scale_schedule: u16) {
        self.params.scale_schedule = scale_schedule;
    }

    /// Run one transform of [`point_count`](Fft::point_count) samples
    ///
    /// Writes the configuration word, then streams `input` through the
    /// accelerator into `output`. Blocks until the transform completes or
    /// fails; see [`Engine::transfer_with_length`] for the errors.
    pub fn execute(
        &self,
        input: &[ComplexSample],
        output: &mut [ComplexSample],
    ) -> crate::Result<()> {
        let word = self.params.config_word();
        self.gpio.write(word.raw());
        log::debug!("FFT configured: {} ({:#08X})", self.params, word.raw());

        self.engine
            .transfer_with_length(input, output, self.params.points)
            .map_err(|err| {
                log::error!("FFT transform failed: {}", err);
                err
            })
    }

    /// Return the engine and the configuration port
    pub fn release(self) -> (Engine<D, I, C>, G) {
        (self.engine, self.gpio)
    }
}

impl<D, I, C, G> Fft<D, I, C, G> {
    /// Returns the transform direction
    pub fn direction(&self) -> Direction {
        self.params.direction
    }

    /// Returns the point count
    pub fn point_count(&self) -> usize {
        self.params.points
    }

    /// Returns the scale schedule
    pub fn scale_schedule(&self) -> u16 {
        self.params.scale_schedule
    }

    /// Returns all transform parameters
    pub fn params(&self) -> Params {
        self.params
    }

    /// Returns the configuration word for the current parameters
    pub fn config_word(&self) -> ConfigWord {
        self.params.config_word()
    }

    /// Returns the engine, for routing interrupts with
    /// [`Engine::on_interrupt`]
    pub fn engine(&self) -> &Engine<D, I, C> {
        &self.engine
    }
}
