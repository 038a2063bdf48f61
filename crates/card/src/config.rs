//! Board configuration and clocking constants.
//!
//! Everything here is fixed by the board or by a datasheet. The only value a
//! caller is expected to change is the pin map ([`ResetPins`]) when the
//! transceiver is wired differently.

use platform::{PinId, SampleRateHz};

/// Transceiver crystal, also routed out of CLKOUT to the primary codec's MCLK1.
pub const OSC_HZ: u32 = 12_000_000;

/// Rate both links come up at, and the rate the passthrough link falls back to.
pub const DEFAULT_RATE: SampleRateHz = SampleRateHz::CD;

/// Lowest rate the transceiver's clock path accepts. Below this its PLL
/// cannot be programmed and clock setup is skipped.
pub const TRANSCEIVER_MIN_RATE_HZ: u32 = 32_000;

/// Transceiver MCLK / fs. Receive mode always expects 256 fs.
pub const MCLK_FS_RATIO: u32 = 256;

/// `TransceiverMclkDiv` value selecting 256 fs.
pub const MCLKDIV_256FS: u32 = 0;

/// Inter-chip BCLK / fs, the input to FLL1's sync loop.
pub const SYNC_BCLK_FS_RATIO: u32 = 64;

/// Settling time around the transceiver reset pulse (datasheet power-up timing).
pub const RESET_SETTLE_MS: u32 = 500;

/// First board revision with the 40-pin header (B+ and later).
pub const BOARD_REVISION_B_PLUS: u32 = 0x10;

/// Only the low 24 bits of the revision word carry the board model.
pub const BOARD_REVISION_MASK: u32 = 0x00ff_ffff;

/// Board revision word as reported by the SoC firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardRevision(pub u32);

impl BoardRevision {
    /// `true` for B+ and later boards.
    pub const fn is_b_plus_or_later(self) -> bool {
        (self.0 & BOARD_REVISION_MASK) >= BOARD_REVISION_B_PLUS
    }
}

/// GPIO lines wired to the transceiver's strap and reset pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetPins {
    /// Active-low reset.
    pub reset: PinId,
    /// Hardware/software mode strap. Becomes I2C SDA after reset.
    pub mode: PinId,
    /// Two-wire (low) / three-wire (high) control interface select.
    pub wire_select: PinId,
    /// I2C address strap on boards before B+.
    pub address_legacy: PinId,
    /// I2C address strap on B+ and later.
    pub address_b_plus: PinId,
}

impl ResetPins {
    /// Address strap line for `revision`.
    pub const fn address_line(&self, revision: BoardRevision) -> PinId {
        if revision.is_b_plus_or_later() {
            self.address_b_plus
        } else {
            self.address_legacy
        }
    }
}

impl Default for ResetPins {
    fn default() -> Self {
        Self {
            reset: PinId(8),
            mode: PinId(2),
            wire_select: PinId(23),
            address_legacy: PinId(18),
            address_b_plus: PinId(13),
        }
    }
}
