//! Controller error taxonomy.

use platform::{CodecError, GpioError, PinId, StreamDirection};
use thiserror_no_std::Error;

/// Which device a hardware call was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Endpoint {
    /// FLL-capable primary codec.
    Primary,
    /// S/PDIF transceiver.
    Transceiver,
    /// Host serial audio port.
    Host,
}

impl core::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Primary => "primary codec",
            Self::Transceiver => "transceiver",
            Self::Host => "host port",
        })
    }
}

/// The individual programming step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigStep {
    /// Transceiver PLL, oscillator → 256 fs.
    TransceiverPll,
    /// Transceiver MCLK source = PLL output.
    TransceiverMclkSource,
    /// Transceiver MCLK divider = 256 fs.
    TransceiverMclkDiv,
    /// Transceiver CLKOUT = oscillator.
    TransceiverClkOut,
    /// Primary SYSCLK = FLL1 at the family ceiling.
    PrimarySysclk,
    /// Primary SYSCLK = 0.
    PrimarySysclkDisable,
    /// FLL1 reference loop stopped.
    Fll1RefclkReset,
    /// FLL1 main loop stopped.
    Fll1Reset,
    /// FLL1 reference loop programmed from MCLK1.
    Fll1Refclk,
    /// FLL1 sync loop programmed from the inter-chip BCLK.
    Fll1Sync,
    /// FLL1 programmed free-running from MCLK1.
    Fll1FreeRunning,
    /// Host BCLK / LRCLK ratio.
    BclkRatio,
    /// Primary AIF1 TDM slot assignment.
    TdmSlots,
    /// Primary AIF1 bound to the SYSCLK domain.
    Aif1ClockDomain,
    /// Primary AIF2 bound to the SYSCLK domain.
    Aif2ClockDomain,
}

impl core::fmt::Display for ConfigStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let step = match self {
            Self::TransceiverPll => "set transceiver PLL from oscillator",
            Self::TransceiverMclkSource => "set transceiver MCLK to PLL output",
            Self::TransceiverMclkDiv => "set transceiver MCLK divider to 256 fs",
            Self::TransceiverClkOut => "set transceiver CLKOUT to oscillator",
            Self::PrimarySysclk => "set SYSCLK from FLL1",
            Self::PrimarySysclkDisable => "set SYSCLK to zero",
            Self::Fll1RefclkReset => "reset FLL1 reference loop",
            Self::Fll1Reset => "reset FLL1",
            Self::Fll1Refclk => "enable FLL1 reference clock loop",
            Self::Fll1Sync => "enable FLL1 sync clock loop",
            Self::Fll1FreeRunning => "enable FLL1",
            Self::BclkRatio => "set BCLK ratio",
            Self::TdmSlots => "set TDM slots",
            Self::Aif1ClockDomain => "set AIF1 clock domain",
            Self::Aif2ClockDomain => "set AIF2 clock domain",
        };
        f.write_str(step)
    }
}

/// Logical role of a transceiver strap/reset line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    /// Reset
    Reset,
    /// Hardware/software mode strap
    ModeSelect,
    /// Two-/three-wire select
    WireSelect,
    /// I2C address strap
    AddressSelect,
}

impl PinRole {
    /// Consumer label used when claiming the line.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reset => "spdif_rst",
            Self::ModeSelect => "spdif_mode",
            Self::WireSelect => "spdif_sw_mode",
            Self::AddressSelect => "spdif_i2c_addr",
        }
    }
}

impl core::fmt::Display for PinRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Reset => "reset",
            Self::ModeSelect => "mode select",
            Self::WireSelect => "wire select",
            Self::AddressSelect => "address select",
        })
    }
}

/// A link or endpoint the card expects could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TopologyError {
    /// Primary codec not registered.
    MissingPrimary,
    /// Transceiver not registered.
    MissingTransceiver,
    /// Host serial port not registered.
    MissingHost,
}

impl core::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingPrimary => write!(f, "primary codec endpoint missing"),
            Self::MissingTransceiver => write!(f, "transceiver endpoint missing"),
            Self::MissingHost => write!(f, "host audio interface missing"),
        }
    }
}

/// Controller errors.
///
/// Every variant is fatal to the operation that produced it; nothing is
/// retried internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A strap/reset line does not exist on this board.
    #[error("{role} line {pin} is not available")]
    PinUnavailable {
        /// Line number
        pin: PinId,
        /// What the line is for
        role: PinRole,
    },
    /// A strap/reset line is claimed by another driver.
    #[error("{role} line {pin} is busy")]
    PinBusy {
        /// Line number
        pin: PinId,
        /// What the line is for
        role: PinRole,
    },
    /// A strap line could not be handed back to its peripheral function.
    #[error("{role} line {pin} could not be re-muxed: {cause}")]
    PinMux {
        /// Line number
        pin: PinId,
        /// What the line is for
        role: PinRole,
        /// Controller error
        cause: GpioError,
    },
    /// A clock programming call was rejected.
    #[error("{endpoint}: failed to {step}: {cause}")]
    HardwareConfig {
        /// Device the call went to
        endpoint: Endpoint,
        /// Step that failed
        step: ConfigStep,
        /// Driver error
        cause: CodecError,
    },
    /// An expected link or endpoint is absent.
    #[error("{0}")]
    Topology(TopologyError),
    /// The direction already has an open substream on this link.
    #[error("{} stream already open", .0.as_str())]
    StreamAlreadyOpen(StreamDirection),
    /// Close or negotiate on a direction that is not open.
    #[error("{} stream is not open", .0.as_str())]
    StreamNotOpen(StreamDirection),
    /// Capture and playback both open while one of them negotiates.
    #[error("simultaneous capture and playback negotiation is not supported")]
    UnsupportedDirections,
    /// An entry point was called while another one was still running.
    #[error("re-entrant call into the card controller")]
    Reentrant,
}

impl Error {
    /// `map_err` adapter tagging a driver error with where it happened.
    pub(crate) fn at(endpoint: Endpoint, step: ConfigStep) -> impl FnOnce(CodecError) -> Self {
        move |cause| Self::HardwareConfig {
            endpoint,
            step,
            cause,
        }
    }
}

impl From<TopologyError> for Error {
    fn from(e: TopologyError) -> Self {
        Self::Topology(e)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn hardware_error_names_the_step() {
        let err = Error::at(Endpoint::Transceiver, ConfigStep::TransceiverMclkDiv)(CodecError::Bus);
        assert_eq!(
            err.to_string(),
            "transceiver: failed to set transceiver MCLK divider to 256 fs: control bus transfer failed"
        );
    }

    #[test]
    fn pin_errors_name_role_and_line() {
        let err = Error::PinBusy {
            pin: PinId(23),
            role: PinRole::WireSelect,
        };
        assert_eq!(err.to_string(), "wire select line GPIO23 is busy");
    }

    #[test]
    fn stream_errors_name_direction() {
        assert_eq!(
            Error::StreamNotOpen(StreamDirection::Capture).to_string(),
            "capture stream is not open"
        );
        assert_eq!(
            Error::StreamAlreadyOpen(StreamDirection::Playback).to_string(),
            "playback stream already open"
        );
    }

    #[test]
    fn mux_error_carries_cause() {
        let err = Error::PinMux {
            pin: PinId(2),
            role: PinRole::ModeSelect,
            cause: GpioError::Io,
        };
        assert_eq!(
            err.to_string(),
            "mode select line GPIO2 could not be re-muxed: GPIO controller error"
        );
    }

    #[test]
    fn topology_converts() {
        let err: Error = TopologyError::MissingHost.into();
        assert_eq!(err, Error::Topology(TopologyError::MissingHost));
        assert_eq!(err.to_string(), "host audio interface missing");
    }
}
