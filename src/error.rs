//! Driver errors

use core::fmt::{self, Debug, Display};

/// The ways a DMA accelerator operation can fail
///
/// Every failure resolves synchronously to the call that caused it.
/// There's no richer payload; the log carries the details.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The DMA engine or interrupt controller is absent, misconfigured,
    /// or in an unsupported mode
    ///
    /// Only returned while constructing an [`Engine`](crate::Engine).
    Initialization,
    /// A length is zero, not a power of two, too large, or longer
    /// than the supplied buffers
    ///
    /// Nothing was changed.
    IllegalParameter,
    /// The DMA engine rejected a program-transfer request
    ///
    /// No transfer is left in flight.
    TransferInitiation,
    /// The DMA engine reported an error during the transfer
    ///
    /// The interrupt handler already attempted one bounded reset.
    TransferRuntime,
}

impl Error {
    /// Returns a stable numeric code for the error
    ///
    /// Useful when an error has to cross into a status register or
    /// a foreign interface.
    pub const fn code(self) -> i32 {
        match self {
            Error::Initialization => -1,
            Error::IllegalParameter => -2,
            Error::TransferInitiation => -3,
            Error::TransferRuntime => -4,
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Error::Initialization => "Initialization",
            Error::IllegalParameter => "IllegalParameter",
            Error::TransferInitiation => "TransferInitiation",
            Error::TransferRuntime => "TransferRuntime",
        };
        write!(f, "{}({})", name, self.code())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::Initialization => "DMA accelerator initialization failed",
            Error::IllegalParameter => "illegal transfer parameter",
            Error::TransferInitiation => "DMA engine rejected the transfer",
            Error::TransferRuntime => "DMA engine reported an error during the transfer",
        })
    }
}
