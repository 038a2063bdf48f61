//! Hardware Abstraction Layer (HAL) for the cascaded codec card
//!
//! This crate provides trait-based abstractions for every piece of hardware
//! the clock controller touches, enabling development and testing without
//! the physical board.
//!
//! # Architecture Layers
//!
//! ```text
//! Audio pipeline framework (stream + power events)
//!         ↓
//! Clock / power sequencing controller (card crate)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Codec drivers + SoC GPIO controller
//! ```
//!
//! # Abstractions
//!
//! - [`CodecEndpoint`] - clock tree and DAI capability surface of one codec
//! - [`HostInterface`] - the host SoC's serial audio port
//! - [`PinController`] - GPIO claim / drive / re-mux
//! - [`audio_types`] - sample rates, rate families, formats, bias levels
//!
//! # Features
//!
//! - `std`: Enable standard library support (mocks, `std::error::Error`)
//! - `defmt`: Enable `defmt::Format` derives on all platform types
//!
//! # Example
//!
//! ```no_run
//! use platform::{ClockDirection, ClockDomain, ClockSource, CodecEndpoint, CodecError};
//!
//! fn silence<C: CodecEndpoint>(codec: &mut C) -> Result<(), CodecError> {
//!     codec.set_sysclk(ClockDomain::SysClk, ClockSource::Fll1, 0, ClockDirection::In)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // chip and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod audio_types;
pub mod codec;
pub mod gpio;
pub mod mocks;

// Re-export main capability traits
pub use codec::{
    ClockDirection, ClockDivider, ClockDomain, ClockLoop, ClockSource, CodecEndpoint, CodecError,
    HostInterface,
};
pub use gpio::{AltFunction, Direction, GpioError, PinController, PinId, PinState};

// Re-export audio domain types
pub use audio_types::{
    BiasLevel, OutOfRangeError, RateFamily, SampleFormat, SampleRateHz, StreamDirection,
};
