//! FLL1 handling across bias level transitions.
//!
//! The audio pipeline reports every bias transition twice, once before the
//! hardware changes and once after. FLL1 must be running before the primary
//! codec reaches `On`, and can only be stopped safely once it has settled at
//! `Standby`.

use platform::{BiasLevel, CodecEndpoint, SampleRateHz};

use crate::clocking::{enable_fll1_free_running, reset_fll1};
use crate::error::Error;
use crate::sync::SyncState;

/// Power domain a bias transition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerDomain {
    /// The primary codec's own widgets.
    Primary,
    /// The transceiver's widgets.
    Transceiver,
    /// Card-level widgets (machine routes, passthrough link).
    Card,
}

/// Pre-transition hook. Returns `true` if the transition belongs to the
/// primary codec and should be recorded.
///
/// Entering `On` while free-running starts FLL1 from the 12 MHz reference at
/// the ceiling for `rate`. If the passthrough path already locked FLL1 to the
/// bit clock nothing is touched.
pub fn apply_bias_level<P: CodecEndpoint>(
    primary: &mut P,
    domain: PowerDomain,
    level: BiasLevel,
    sync: SyncState,
    rate: SampleRateHz,
) -> Result<bool, Error> {
    if domain != PowerDomain::Primary {
        return Ok(false);
    }
    debug!("bias -> {} (sync {})", level.as_str(), sync.is_synchronized());

    if level == BiasLevel::On && !sync.is_synchronized() {
        enable_fll1_free_running(primary, rate)?;
    }
    Ok(true)
}

/// Post-transition hook. Returns `true` if the transition belongs to the
/// primary codec and should be recorded.
///
/// Settling at `Standby` stops both FLL1 loops regardless of sync state.
pub fn apply_bias_level_post<P: CodecEndpoint>(
    primary: &mut P,
    domain: PowerDomain,
    level: BiasLevel,
) -> Result<bool, Error> {
    if domain != PowerDomain::Primary {
        return Ok(false);
    }
    debug!("bias settled at {}", level.as_str());

    if level == BiasLevel::Standby {
        reset_fll1(primary)?;
    }
    Ok(true)
}
