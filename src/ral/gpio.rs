//! AXI GPIO register block

use super::RWRegister;

/// AXI GPIO registers.
#[repr(C)]
pub struct RegisterBlock {
    /// Channel 1 data
    pub GPIO_DATA: RWRegister<u32>,
    /// Channel 1 three-state control. A set bit is an input.
    pub GPIO_TRI: RWRegister<u32>,
    /// Channel 2 data
    pub GPIO2_DATA: RWRegister<u32>,
    /// Channel 2 three-state control
    pub GPIO2_TRI: RWRegister<u32>,
}

const _: () = assert!(core::mem::offset_of!(RegisterBlock, GPIO2_TRI) == 0xC);
