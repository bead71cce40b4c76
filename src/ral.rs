//! A RAL-like module for the AXI peripherals behind the accelerator
//!
//! There's no generated RAL for soft IP in the programmable logic, so
//! this module describes the register blocks by hand. Field modules
//! follow the RAL layout (`offset`, `mask`, `R`, `W`, `RW`) so that
//! the `ral-registers` macros work unchanged.

#![allow(
    non_snake_case, // Compatibility with RAL
    non_upper_case_globals, // Field `offset` and `mask`
)]

pub use ral_registers::{modify_reg, read_reg, write_reg};
use ral_registers::RWRegister;

/// Define single- or multi-bit fields of a 32-bit register
macro_rules! fields {
    ($($field:ident: $offset:expr, $width:expr;)+) => {
        $(
            pub mod $field {
                pub const offset: u32 = $offset;
                pub const mask: u32 = ((1 << $width) - 1) << offset;
                pub mod R {}
                pub mod W {}
                pub mod RW {}
            }
        )+
    };
}

pub mod dma;
pub mod fft;
pub mod gpio;

//
// Helper types for static memory
//
// Similar to the RAL's `Instance` type, but more copy.
//

pub(crate) struct Static<T>(pub(crate) *const T);
impl<T> core::ops::Deref for Static<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        // Safety: pointer points to static memory (peripheral memory)
        unsafe { &*self.0 }
    }
}
impl<T> Clone for Static<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Static<T> {}
