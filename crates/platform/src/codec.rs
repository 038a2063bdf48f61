//! Codec endpoint abstraction.
//!
//! The register-level drivers for both chips live outside this workspace.
//! The controller only ever talks to them through [`CodecEndpoint`], and to
//! the host's serial audio port through [`HostInterface`].
//!
//! ```text
//!   host I2S ──BCLK/LRCLK──> primary AIF1
//!                            primary AIF2 <──S/PDIF link──> transceiver
//!   12 MHz osc ──> transceiver XTAL ──CLKOUT──> primary MCLK1
//! ```

/// Frequency-locked / phase-locked loops a caller can program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockLoop {
    /// Primary codec FLL1 main loop (sync loop when a reference loop runs).
    Fll1,
    /// Primary codec FLL1 reference loop.
    Fll1Refclk,
    /// Transceiver PLL (oscillator → MCLK).
    TransceiverPll,
}

/// Clock inputs / outputs a loop or domain can be sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Inert: loop stopped, configuration cleared.
    None,
    /// Primary codec MCLK1 pin, fed by the transceiver's CLKOUT.
    Mclk1,
    /// Bit clock of the primary codec's AIF2 (the inter-chip link).
    Aif2Bclk,
    /// Output of primary FLL1.
    Fll1,
    /// The primary codec's SYSCLK domain.
    SysClk,
    /// Output of the transceiver PLL.
    PllOutput,
    /// The transceiver's raw crystal oscillator.
    Oscillator,
}

/// Clock domains a caller can source with `set_sysclk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDomain {
    /// Primary codec SYSCLK.
    SysClk,
    /// Primary codec audio interface 1 (host link).
    Aif1,
    /// Primary codec audio interface 2 (inter-chip link).
    Aif2,
    /// Transceiver master clock.
    TransceiverMclk,
    /// Transceiver CLKOUT pin.
    TransceiverClkOut,
}

/// Whether a clock enters or leaves the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDirection {
    /// Clock consumed by the device.
    In,
    /// Clock driven by the device.
    Out,
}

/// Programmable dividers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDivider {
    /// Transceiver MCLK divider. `0` selects 256 fs, `1` selects 128 fs.
    TransceiverMclkDiv,
}

/// Error reported by a codec driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Control bus (I2C/SPI) transfer failed.
    Bus,
    /// The driver rejected the requested frequency or ratio.
    InvalidArgument,
    /// The operation is not available on this endpoint.
    Unsupported,
    /// The loop did not lock.
    NoLock,
}

#[cfg(feature = "std")]
impl std::error::Error for CodecError {}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus => write!(f, "control bus transfer failed"),
            Self::InvalidArgument => write!(f, "driver rejected the request"),
            Self::Unsupported => write!(f, "operation not supported"),
            Self::NoLock => write!(f, "clock loop failed to lock"),
        }
    }
}

/// Capability surface of one codec chip.
///
/// Every call is synchronous and either takes effect or reports an error.
pub trait CodecEndpoint {
    /// Program a clock loop. `source == ClockSource::None` with zero
    /// frequencies stops the loop.
    fn set_pll(
        &mut self,
        loop_id: ClockLoop,
        source: ClockSource,
        freq_in: u32,
        freq_out: u32,
    ) -> Result<(), CodecError>;

    /// Select the source and rate of a clock domain. A frequency of zero
    /// disables the domain.
    fn set_sysclk(
        &mut self,
        domain: ClockDomain,
        source: ClockSource,
        freq: u32,
        direction: ClockDirection,
    ) -> Result<(), CodecError>;

    /// Set a clock divider.
    fn set_clkdiv(&mut self, divider: ClockDivider, value: u32) -> Result<(), CodecError>;

    /// Set BCLK as a multiple of the frame rate.
    fn set_bclk_ratio(&mut self, ratio: u32) -> Result<(), CodecError>;

    /// Assign TDM slots. Masks are bit-per-slot.
    fn set_tdm_slot(
        &mut self,
        tx_mask: u32,
        rx_mask: u32,
        slots: u32,
        slot_width: u32,
    ) -> Result<(), CodecError>;
}

/// The host SoC's serial audio port driving the general link.
pub trait HostInterface {
    /// Set BCLK as a multiple of the frame rate.
    fn set_bclk_ratio(&mut self, ratio: u32) -> Result<(), CodecError>;
}

impl<T: CodecEndpoint + ?Sized> CodecEndpoint for &mut T {
    fn set_pll(
        &mut self,
        loop_id: ClockLoop,
        source: ClockSource,
        freq_in: u32,
        freq_out: u32,
    ) -> Result<(), CodecError> {
        (**self).set_pll(loop_id, source, freq_in, freq_out)
    }

    fn set_sysclk(
        &mut self,
        domain: ClockDomain,
        source: ClockSource,
        freq: u32,
        direction: ClockDirection,
    ) -> Result<(), CodecError> {
        (**self).set_sysclk(domain, source, freq, direction)
    }

    fn set_clkdiv(&mut self, divider: ClockDivider, value: u32) -> Result<(), CodecError> {
        (**self).set_clkdiv(divider, value)
    }

    fn set_bclk_ratio(&mut self, ratio: u32) -> Result<(), CodecError> {
        (**self).set_bclk_ratio(ratio)
    }

    fn set_tdm_slot(
        &mut self,
        tx_mask: u32,
        rx_mask: u32,
        slots: u32,
        slot_width: u32,
    ) -> Result<(), CodecError> {
        (**self).set_tdm_slot(tx_mask, rx_mask, slots, slot_width)
    }
}

impl<T: HostInterface + ?Sized> HostInterface for &mut T {
    fn set_bclk_ratio(&mut self, ratio: u32) -> Result<(), CodecError> {
        (**self).set_bclk_ratio(ratio)
    }
}
