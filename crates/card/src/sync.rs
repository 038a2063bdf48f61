//! FLL1 source selection for the digital passthrough path.
//!
//! While the passthrough path is powered the primary codec must follow the
//! transceiver's bit clock rather than its own crystal-derived reference, or
//! the two chips drift apart and the link slips samples. FLL1 has two loops
//! for this: a reference loop fed from MCLK1 and a sync loop fed from the
//! inter-chip BCLK.
//!
//! ```text
//!              power_up (ok)                 power_down
//! FreeRunning ──────────────> Synchronized ─────────────> FreeRunning
//!      ^                            │
//!      └────── power_up (error) ────┘
//! ```

use platform::{ClockLoop, ClockSource, CodecEndpoint, SampleRateHz};

use crate::clocking::reset_loop;
use crate::config::{OSC_HZ, SYNC_BCLK_FS_RATIO};
use crate::error::{ConfigStep, Endpoint, Error};

// ─── State machine ───────────────────────────────────────────────────────────

/// Which loop FLL1 is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncState {
    /// FLL1 runs from the 12 MHz reference (or is stopped).
    #[default]
    FreeRunning,
    /// FLL1 tracks the inter-chip bit clock.
    Synchronized {
        /// Transceiver rate the loops were programmed for.
        rate: SampleRateHz,
    },
}

impl SyncState {
    /// `true` while FLL1 is locked to the inter-chip bit clock.
    pub const fn is_synchronized(&self) -> bool {
        matches!(self, Self::Synchronized { .. })
    }

    /// Passthrough path finished powering up: lock FLL1 to the bit clock of
    /// a link running at `rate`.
    ///
    /// Both loops are stopped first so neither carries a stale source into
    /// the new configuration. Calling this while already synchronized
    /// re-programs the loops. On error the state is left `FreeRunning`.
    pub fn power_up<P: CodecEndpoint>(
        &mut self,
        primary: &mut P,
        rate: SampleRateHz,
    ) -> Result<(), Error> {
        *self = Self::FreeRunning;

        let target = rate.family().max_sysclk_hz();
        let bclk = rate.times(SYNC_BCLK_FS_RATIO);
        debug!("FLL1 sync: fs={} bclk={} target={}", rate.get(), bclk, target);

        reset_loop(primary, ClockLoop::Fll1Refclk)
            .and_then(|()| reset_loop(primary, ClockLoop::Fll1))
            .and_then(|()| {
                primary
                    .set_pll(ClockLoop::Fll1Refclk, ClockSource::Mclk1, OSC_HZ, target)
                    .map_err(Error::at(Endpoint::Primary, ConfigStep::Fll1Refclk))
            })
            .and_then(|()| {
                primary
                    .set_pll(ClockLoop::Fll1, ClockSource::Aif2Bclk, bclk, target)
                    .map_err(Error::at(Endpoint::Primary, ConfigStep::Fll1Sync))
            })
            .inspect_err(|e| error!("FLL1 sync at {} Hz: {}", rate.get(), e))?;

        *self = Self::Synchronized { rate };
        info!("FLL1 synchronized to passthrough BCLK ({} Hz)", rate.get());
        Ok(())
    }

    /// Passthrough path finished powering down.
    ///
    /// Only the state changes. The loops keep running until the next bias
    /// transition reprograms or stops them.
    pub fn power_down(&mut self) {
        if self.is_synchronized() {
            info!("FLL1 back to free-running");
        }
        *self = Self::FreeRunning;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::{CodecCall, MockCodec};

    const CD: SampleRateHz = SampleRateHz::CD;

    #[test]
    fn starts_free_running() {
        assert_eq!(SyncState::default(), SyncState::FreeRunning);
        assert!(!SyncState::default().is_synchronized());
    }

    #[test]
    fn power_up_resets_then_programs_both_loops() {
        let mut codec = MockCodec::new();
        let mut sync = SyncState::default();
        sync.power_up(&mut codec, CD).unwrap();

        assert_eq!(sync, SyncState::Synchronized { rate: CD });
        assert_eq!(
            codec.calls(),
            &[
                CodecCall::SetPll {
                    loop_id: ClockLoop::Fll1Refclk,
                    source: ClockSource::None,
                    freq_in: 0,
                    freq_out: 0,
                },
                CodecCall::SetPll {
                    loop_id: ClockLoop::Fll1,
                    source: ClockSource::None,
                    freq_in: 0,
                    freq_out: 0,
                },
                CodecCall::SetPll {
                    loop_id: ClockLoop::Fll1Refclk,
                    source: ClockSource::Mclk1,
                    freq_in: 12_000_000,
                    freq_out: 45_158_400,
                },
                CodecCall::SetPll {
                    loop_id: ClockLoop::Fll1,
                    source: ClockSource::Aif2Bclk,
                    freq_in: 2_822_400,
                    freq_out: 45_158_400,
                },
            ]
        );
    }

    #[test]
    fn failed_sync_loop_leaves_free_running() {
        let mut codec = MockCodec::failing_when(|c| {
            matches!(
                c,
                CodecCall::SetPll {
                    source: ClockSource::Aif2Bclk,
                    ..
                }
            )
        });
        let mut sync = SyncState::Synchronized { rate: CD };
        let err = sync.power_up(&mut codec, CD).unwrap_err();
        assert!(matches!(
            err,
            Error::HardwareConfig {
                step: ConfigStep::Fll1Sync,
                ..
            }
        ));
        assert_eq!(sync, SyncState::FreeRunning);
    }

    #[test]
    fn failed_reference_loop_skips_sync_loop() {
        let mut codec = MockCodec::failing_when(|c| {
            matches!(
                c,
                CodecCall::SetPll {
                    source: ClockSource::Mclk1,
                    ..
                }
            )
        });
        let mut sync = SyncState::default();
        assert!(sync.power_up(&mut codec, CD).is_err());
        assert_eq!(codec.pll_calls().count(), 3);
    }

    #[test]
    fn power_down_only_clears_state() {
        let mut sync = SyncState::Synchronized { rate: CD };
        sync.power_down();
        assert_eq!(sync, SyncState::FreeRunning);
        sync.power_down();
        assert_eq!(sync, SyncState::FreeRunning);
    }
}
