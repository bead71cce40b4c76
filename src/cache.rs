//! Data cache maintenance for DMA buffers
//!
//! The DMA engine doesn't snoop the processor's data cache on every
//! system. Before a transfer, the engine flushes both buffers so that the
//! hardware reads what the processor wrote. After the transfer, it flushes
//! the output again so that the processor reads what the hardware wrote.

/// Write back and invalidate cached copies of a memory range
pub trait CacheMaintenance {
    /// Clean and invalidate the data cache lines covering
    /// `bytes` bytes starting at `address`
    fn flush(&self, address: usize, bytes: usize);
}

impl<C: CacheMaintenance + ?Sized> CacheMaintenance for &C {
    fn flush(&self, address: usize, bytes: usize) {
        (**self).flush(address, bytes)
    }
}

/// Cache maintenance for systems where DMA is cache coherent
///
/// Also use this if the buffers live in uncached memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct Coherent;

impl CacheMaintenance for Coherent {
    #[inline(always)]
    fn flush(&self, _: usize, _: usize) {}
}

/// Cache maintenance through the Cortex-M system control block
///
/// Lines are cleaned and invalidated by address; partial lines at either
/// end of the range are included.
#[derive(Debug)]
pub struct ScbCache {
    _private: (),
}

impl ScbCache {
    /// # Safety
    ///
    /// The SCB cache maintenance registers are shared, global state. Caller
    /// must make sure that nothing else manages the data cache while the
    /// engine runs a transfer.
    pub const unsafe fn new() -> Self {
        ScbCache { _private: () }
    }
}

impl CacheMaintenance for ScbCache {
    fn flush(&self, address: usize, bytes: usize) {
        // Safety: clean + invalidate never discards data, and we only touch
        // the SCB for the duration of this call.
        let mut peripherals = unsafe { cortex_m::Peripherals::steal() };
        peripherals
            .SCB
            .clean_invalidate_dcache_by_address(address, bytes);
    }
}
