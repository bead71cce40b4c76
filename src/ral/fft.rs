//! FFT core configuration channel
//!
//! The core's configuration port is wired to a GPIO data register. There's
//! no register block here, only the field layout of the word driven onto
//! those pins.

pub mod CONFIG {
    fields! {
        NFFT: 0, 5;
        FWD_INV: 8, 1;
        SCALE_SCH: 9, 14;
    }
}
