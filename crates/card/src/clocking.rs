//! Clock tree programming for both codecs.
//!
//! # Clock Tree
//!
//! ```text
//!   12 MHz XTAL ─> transceiver PLL ─> MCLK (256 fs) ─> S/PDIF TX/RX
//!        │
//!        └──────> transceiver CLKOUT (12 MHz) ─> primary MCLK1
//!                                                   │
//!                     inter-chip BCLK (64 fs) ──┐   │
//!                                               v   v
//!                                        FLL1 (sync) (ref)
//!                                               │
//!                                            SYSCLK (49.152 / 45.1584 MHz)
//! ```
//!
//! The transceiver divider is pinned to 256 fs in both directions. Switching
//! between 128 fs and 256 fs when the link changes from transmit to receive
//! glitches the recovered clock, and receive mode only works at 256 fs.

use platform::{
    ClockDirection, ClockDivider, ClockDomain, ClockLoop, ClockSource, CodecEndpoint, SampleRateHz,
};

use crate::config::{MCLKDIV_256FS, MCLK_FS_RATIO, OSC_HZ, TRANSCEIVER_MIN_RATE_HZ};
use crate::error::{ConfigStep, Endpoint, Error};

/// `true` when the transceiver's clock path can run at `rate`.
pub const fn transceiver_supports(rate: SampleRateHz) -> bool {
    rate.get() >= TRANSCEIVER_MIN_RATE_HZ
}

/// Program the transceiver for `rate`: PLL 12 MHz → 256 fs, MCLK from the
/// PLL, divider fixed at 256 fs, CLKOUT back to the raw oscillator so the
/// primary codec keeps a stable reference.
///
/// Stops at the first failing step.
pub fn configure_transceiver_clocks<T: CodecEndpoint>(
    transceiver: &mut T,
    rate: SampleRateHz,
) -> Result<(), Error> {
    let mclk = rate.times(MCLK_FS_RATIO);
    trace!("transceiver clocks: fs={} mclk={}", rate.get(), mclk);

    transceiver
        .set_pll(ClockLoop::TransceiverPll, ClockSource::Oscillator, OSC_HZ, mclk)
        .map_err(Error::at(Endpoint::Transceiver, ConfigStep::TransceiverPll))
        .and_then(|()| {
            transceiver
                .set_sysclk(
                    ClockDomain::TransceiverMclk,
                    ClockSource::PllOutput,
                    mclk,
                    ClockDirection::In,
                )
                .map_err(Error::at(Endpoint::Transceiver, ConfigStep::TransceiverMclkSource))
        })
        .and_then(|()| {
            transceiver
                .set_clkdiv(ClockDivider::TransceiverMclkDiv, MCLKDIV_256FS)
                .map_err(Error::at(Endpoint::Transceiver, ConfigStep::TransceiverMclkDiv))
        })
        .and_then(|()| {
            transceiver
                .set_sysclk(
                    ClockDomain::TransceiverClkOut,
                    ClockSource::Oscillator,
                    OSC_HZ,
                    ClockDirection::In,
                )
                .map_err(Error::at(Endpoint::Transceiver, ConfigStep::TransceiverClkOut))
        })
        .inspect_err(|e| error!("transceiver clock setup at {} Hz: {}", rate.get(), e))
}

/// Source the primary codec's SYSCLK from FLL1 at the rate-family ceiling.
pub fn configure_primary_clocks<P: CodecEndpoint>(
    primary: &mut P,
    rate: SampleRateHz,
) -> Result<(), Error> {
    let sysclk = rate.family().max_sysclk_hz();
    trace!("primary SYSCLK: fs={} sysclk={}", rate.get(), sysclk);

    primary
        .set_sysclk(ClockDomain::SysClk, ClockSource::Fll1, sysclk, ClockDirection::In)
        .map_err(Error::at(Endpoint::Primary, ConfigStep::PrimarySysclk))
        .inspect_err(|e| error!("primary clock setup at {} Hz: {}", rate.get(), e))
}

/// Stop the primary codec's SYSCLK.
pub fn disable_primary_sysclk<P: CodecEndpoint>(primary: &mut P) -> Result<(), Error> {
    primary
        .set_sysclk(ClockDomain::SysClk, ClockSource::Fll1, 0, ClockDirection::In)
        .map_err(Error::at(Endpoint::Primary, ConfigStep::PrimarySysclkDisable))
        .inspect_err(|e| error!("{}", e))
}

/// Stop one FLL1 loop, leaving it inert with no stale configuration.
pub fn reset_loop<P: CodecEndpoint>(primary: &mut P, loop_id: ClockLoop) -> Result<(), Error> {
    let step = match loop_id {
        ClockLoop::Fll1Refclk => ConfigStep::Fll1RefclkReset,
        _ => ConfigStep::Fll1Reset,
    };
    primary
        .set_pll(loop_id, ClockSource::None, 0, 0)
        .map_err(Error::at(Endpoint::Primary, step))
}

/// Stop both FLL1 loops, main loop first.
///
/// Both resets are attempted even if the first fails; the first error is
/// returned.
pub fn reset_fll1<P: CodecEndpoint>(primary: &mut P) -> Result<(), Error> {
    let main = reset_loop(primary, ClockLoop::Fll1);
    let reference = reset_loop(primary, ClockLoop::Fll1Refclk);
    main.and(reference)
        .inspect_err(|e| error!("FLL1 teardown: {}", e))
}

/// Run FLL1 free from the 12 MHz reference on MCLK1 at the family ceiling.
pub fn enable_fll1_free_running<P: CodecEndpoint>(
    primary: &mut P,
    rate: SampleRateHz,
) -> Result<(), Error> {
    primary
        .set_pll(
            ClockLoop::Fll1,
            ClockSource::Mclk1,
            OSC_HZ,
            rate.family().max_sysclk_hz(),
        )
        .map_err(Error::at(Endpoint::Primary, ConfigStep::Fll1FreeRunning))
        .inspect_err(|e| error!("{}", e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::{CodecCall, MockCodec};
    use platform::CodecError;

    fn rate(hz: u32) -> SampleRateHz {
        SampleRateHz::new(hz).unwrap()
    }

    #[test]
    fn transceiver_threshold_is_32k() {
        assert!(!transceiver_supports(rate(31_999)));
        assert!(transceiver_supports(rate(32_000)));
        assert!(transceiver_supports(rate(192_000)));
    }

    #[test]
    fn transceiver_sequence_at_48k() {
        let mut codec = MockCodec::new();
        configure_transceiver_clocks(&mut codec, rate(48_000)).unwrap();
        assert_eq!(
            codec.calls(),
            &[
                CodecCall::SetPll {
                    loop_id: ClockLoop::TransceiverPll,
                    source: ClockSource::Oscillator,
                    freq_in: 12_000_000,
                    freq_out: 12_288_000,
                },
                CodecCall::SetSysclk {
                    domain: ClockDomain::TransceiverMclk,
                    source: ClockSource::PllOutput,
                    freq: 12_288_000,
                    direction: ClockDirection::In,
                },
                CodecCall::SetClkdiv {
                    divider: ClockDivider::TransceiverMclkDiv,
                    value: 0,
                },
                CodecCall::SetSysclk {
                    domain: ClockDomain::TransceiverClkOut,
                    source: ClockSource::Oscillator,
                    freq: 12_000_000,
                    direction: ClockDirection::In,
                },
            ]
        );
    }

    #[test]
    fn transceiver_stops_at_first_failure() {
        let mut codec = MockCodec::failing_when(|c| matches!(c, CodecCall::SetClkdiv { .. }));
        let err = configure_transceiver_clocks(&mut codec, rate(44_100)).unwrap_err();
        assert_eq!(
            err,
            Error::HardwareConfig {
                endpoint: Endpoint::Transceiver,
                step: ConfigStep::TransceiverMclkDiv,
                cause: CodecError::InvalidArgument,
            }
        );
        // CLKOUT never attempted
        assert_eq!(codec.calls().len(), 3);
    }

    #[test]
    fn primary_uses_family_ceiling() {
        let mut codec = MockCodec::new();
        configure_primary_clocks(&mut codec, rate(44_100)).unwrap();
        assert_eq!(codec.last_sysclk(ClockDomain::SysClk), Some(45_158_400));
        configure_primary_clocks(&mut codec, rate(96_000)).unwrap();
        assert_eq!(codec.last_sysclk(ClockDomain::SysClk), Some(49_152_000));
    }

    #[test]
    fn fll1_reset_attempts_both_loops() {
        let mut codec = MockCodec::failing_when(|c| {
            matches!(c, CodecCall::SetPll { loop_id: ClockLoop::Fll1, .. })
        });
        let err = reset_fll1(&mut codec).unwrap_err();
        assert!(matches!(
            err,
            Error::HardwareConfig {
                step: ConfigStep::Fll1Reset,
                ..
            }
        ));
        assert_eq!(codec.pll_calls().count(), 2);
    }
}
