//! Clock-domain and power sequencing for a two-codec sound card
//!
//! The card pairs an FLL-capable primary codec with an S/PDIF transceiver.
//! The transceiver's crystal clocks the primary codec, and while the digital
//! passthrough path is powered the primary codec's FLL locks to the bit clock
//! coming out of the transceiver instead. This crate owns that hand-off along
//! with everything that has to happen around it: the one-time transceiver
//! reset, per-stream clock negotiation and bias level transitions.
//!
//! # Bring-up
//!
//! ```text
//! reset_transceiver()  ──>  TransceiverReady
//!                                 │
//!              Links { primary, transceiver, host }
//!                                 │
//!                                 v
//!                      SoundCard::late_probe()
//!                                 │
//!                     SharedCard::new() (optional)
//! ```
//!
//! # Modules
//!
//! - [`reset`] - transceiver reset and strap sequence
//! - [`clocking`] - PLL / FLL / SYSCLK programming for both codecs
//! - [`sync`] - FLL1 free-running vs. bit-clock-synchronized state machine
//! - [`power`] - FLL1 enable / disable across bias transitions
//! - [`stream`] - BCLK ratio, TDM slots, open-stream bookkeeping
//! - [`fixup`] - passthrough link rate tracking
//! - [`context`] - the [`SoundCard`] device context
//! - [`shared`] - [`SharedCard`], the card behind an embassy mutex
//!
//! # Features
//!
//! - `defmt`: log through defmt and derive `defmt::Format` (target builds)
//! - `tracing`: log through tracing (host builds)
//! - `std`: `std::error::Error` impls

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
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)]
#![allow(clippy::doc_markdown)] // chip and clock names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

// Must come first so the log macros are visible to every module below.
mod fmt;

pub mod clocking;
pub mod config;
pub mod context;
pub mod error;
pub mod fixup;
pub mod power;
pub mod reset;
pub mod shared;
pub mod stream;
pub mod sync;

pub use config::{BoardRevision, ResetPins};
pub use context::{Links, MachineState, SoundCard};
pub use error::{ConfigStep, Endpoint, Error, PinRole, TopologyError};
pub use fixup::{LinkParams, WidgetEvent};
pub use power::PowerDomain;
pub use reset::{reset_transceiver, TransceiverReady};
pub use shared::SharedCard;
pub use stream::{HwParams, OpenStreamCounters, TdmSlots};
pub use sync::SyncState;
