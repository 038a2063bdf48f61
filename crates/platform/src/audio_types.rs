//! Audio domain newtypes shared by both codecs.
//!
//! - `SampleRateHz`: validates the 8 kHz – 192 kHz range the primary codec accepts
//! - `RateFamily`: 48 kHz vs 44.1 kHz family, derived from a rate, never stored
//! - `SampleFormat`: PCM sample formats with their physical slot width
//! - `StreamDirection` / `BiasLevel`: pipeline-side enums

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "value {} outside of [{}, {}]",
            self.value, self.min, self.max
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutOfRangeError {}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Sample rate in Hz, validated to the range the primary codec can clock.
///
/// Valid range: 8000–192000 Hz. The transceiver only handles the upper part
/// of this range (see `card::config::TRANSCEIVER_MIN_RATE_HZ`); that limit is
/// a clocking decision, not a validation one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate: 8000 Hz (telephony).
    pub const MIN_HZ: u32 = 8_000;

    /// Maximum supported sample rate: 192000 Hz.
    pub const MAX_HZ: u32 = 192_000;

    /// 44.1 kHz, the rate both links come up at.
    pub const CD: Self = Self(44_100);

    /// Create a `SampleRateHz`, returning an error if out of 8000–192000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 8000` or `hz > 192000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if (Self::MIN_HZ..=Self::MAX_HZ).contains(&hz) {
            Ok(Self(hz))
        } else {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        }
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The rate family this rate belongs to.
    #[must_use]
    pub const fn family(self) -> RateFamily {
        RateFamily::of(self.0)
    }

    /// `self × ratio`, e.g. MCLK = 256 fs or BCLK = 64 fs.
    ///
    /// Cannot overflow: 192 000 × 256 < `u32::MAX`, and no caller multiplies
    /// by more than 256.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn times(self, ratio: u32) -> u32 {
        self.0 * ratio
    }
}

impl From<SampleRateHz> for u32 {
    fn from(rate: SampleRateHz) -> Self {
        rate.0
    }
}

// ── RateFamily ───────────────────────────────────────────────────────────────

/// Maximum SYSCLK for the 48 kHz family (1024 × 48 kHz).
pub const MAX_SYSCLK_48K_FAMILY_HZ: u32 = 49_152_000;

/// Maximum SYSCLK for the 44.1 kHz family (1024 × 44.1 kHz).
pub const MAX_SYSCLK_44K1_FAMILY_HZ: u32 = 45_158_400;

/// Grouping of sample rates by their integer relationship to SYSCLK.
///
/// A rate is in the 48 kHz family when it is an exact multiple of 4000 Hz.
/// Everything else (11025, 22050, 44100, 88200, ...) is treated as the
/// 44.1 kHz family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RateFamily {
    /// 8k, 16k, 32k, 48k, 96k, 192k, ...
    Khz48,
    /// 11.025k, 22.05k, 44.1k, 88.2k, 176.4k, ...
    Khz44_1,
}

impl RateFamily {
    /// Classify a raw rate in Hz.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)] // `%` by a non-zero constant
    pub const fn of(rate_hz: u32) -> Self {
        if rate_hz % 4000 == 0 {
            Self::Khz48
        } else {
            Self::Khz44_1
        }
    }

    /// Highest legal SYSCLK (and FLL1 output) for this family.
    #[must_use]
    pub const fn max_sysclk_hz(self) -> u32 {
        match self {
            Self::Khz48 => MAX_SYSCLK_48K_FAMILY_HZ,
            Self::Khz44_1 => MAX_SYSCLK_44K1_FAMILY_HZ,
        }
    }
}

// ── SampleFormat ─────────────────────────────────────────────────────────────

/// PCM sample formats a link can negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleFormat {
    /// Signed 16-bit little endian.
    S16Le,
    /// Signed 24-bit in the low bits of a 32-bit container.
    S24Le,
    /// Signed 24-bit packed in three bytes.
    S24_3Le,
    /// Signed 32-bit little endian.
    S32Le,
}

impl SampleFormat {
    /// Bits one sample occupies on the wire, padding included.
    #[must_use]
    pub const fn physical_width(self) -> u32 {
        match self {
            Self::S16Le => 16,
            Self::S24_3Le => 24,
            Self::S24Le | Self::S32Le => 32,
        }
    }
}

// ── Stream / power enums ─────────────────────────────────────────────────────

/// Direction of a PCM substream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamDirection {
    /// Host → codec.
    Playback,
    /// Codec → host.
    Capture,
}

impl StreamDirection {
    /// The other direction on the same link.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Playback => Self::Capture,
            Self::Capture => Self::Playback,
        }
    }

    /// Short lowercase name for log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Playback => "playback",
            Self::Capture => "capture",
        }
    }
}

/// Pipeline-wide power state, ordered from fully off to fully on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BiasLevel {
    /// Unclocked and unpowered.
    #[default]
    Off,
    /// Powered, clocks silenced.
    Standby,
    /// About to go active; no clocking change.
    Prepare,
    /// Streaming.
    On,
}

impl BiasLevel {
    /// Short lowercase name for log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Standby => "standby",
            Self::Prepare => "prepare",
            Self::On => "on",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_bounds() {
        assert!(SampleRateHz::new(7_999).is_err());
        assert!(SampleRateHz::new(8_000).is_ok());
        assert!(SampleRateHz::new(192_000).is_ok());
        assert_eq!(
            SampleRateHz::new(192_001),
            Err(OutOfRangeError {
                value: 192_001,
                min: 8_000,
                max: 192_000
            })
        );
    }

    #[test]
    fn family_uses_exact_modulo() {
        assert_eq!(RateFamily::of(44_100), RateFamily::Khz44_1);
        assert_eq!(RateFamily::of(48_000), RateFamily::Khz48);
        // 16000 is a multiple of 4000
        assert_eq!(RateFamily::of(16_000), RateFamily::Khz48);
        assert_eq!(RateFamily::of(11_025), RateFamily::Khz44_1);
        assert_eq!(RateFamily::of(8_000), RateFamily::Khz48);
    }

    #[test]
    fn ceilings_are_1024_fs() {
        assert_eq!(RateFamily::Khz48.max_sysclk_hz(), 48_000 * 1024);
        assert_eq!(RateFamily::Khz44_1.max_sysclk_hz(), 44_100 * 1024);
    }

    #[test]
    fn max_rate_times_256_fits() {
        let max = SampleRateHz::new(SampleRateHz::MAX_HZ).unwrap();
        assert_eq!(max.times(256), 49_152_000);
    }

    #[test]
    fn physical_widths() {
        assert_eq!(SampleFormat::S16Le.physical_width(), 16);
        assert_eq!(SampleFormat::S24Le.physical_width(), 32);
        assert_eq!(SampleFormat::S24_3Le.physical_width(), 24);
        assert_eq!(SampleFormat::S32Le.physical_width(), 32);
    }

    #[test]
    fn bias_levels_are_ordered() {
        assert!(BiasLevel::Off < BiasLevel::Standby);
        assert!(BiasLevel::Standby < BiasLevel::Prepare);
        assert!(BiasLevel::Prepare < BiasLevel::On);
        assert_eq!(BiasLevel::default(), BiasLevel::Off);
    }

    #[test]
    fn opposite_direction() {
        assert_eq!(StreamDirection::Playback.opposite(), StreamDirection::Capture);
        assert_eq!(StreamDirection::Capture.opposite(), StreamDirection::Playback);
    }
}
