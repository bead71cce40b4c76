//! Sample types that can be moved by the DMA engine

/// A plain-old-data element that the DMA engine may read or write
///
/// # Safety
///
/// Every bit pattern must be a valid value of the type, and the type must
/// have no padding. The DMA engine writes raw bytes into output buffers.
pub unsafe trait Element: Copy + 'static {}

unsafe impl Element for u8 {}
unsafe impl Element for i8 {}
unsafe impl Element for u16 {}
unsafe impl Element for i16 {}
unsafe impl Element for u32 {}
unsafe impl Element for i32 {}
unsafe impl Element for u64 {}
unsafe impl Element for i64 {}

/// One complex sample as the FFT accelerator streams it
///
/// 16-bit signed real and imaginary parts, real part first. The
/// accelerator consumes and produces one `ComplexSample` per point.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ComplexSample {
    /// Real part
    pub re: i16,
    /// Imaginary part
    pub im: i16,
}

impl ComplexSample {
    /// Create a complex sample
    pub const fn new(re: i16, im: i16) -> Self {
        ComplexSample { re, im }
    }
}

// Safety: two i16s, repr(C), no padding.
unsafe impl Element for ComplexSample {}

const _: () = assert!(core::mem::size_of::<ComplexSample>() == 4);
