//! Stream parameters and open-stream bookkeeping for the general link.

use platform::{SampleFormat, SampleRateHz, StreamDirection};

use crate::error::Error;

/// Parameters the audio pipeline negotiates for one substream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HwParams {
    /// Frame rate.
    pub rate: SampleRateHz,
    /// Sample format.
    pub format: SampleFormat,
    /// Interleaved channel count.
    pub channels: u8,
}

/// Host BCLK / LRCLK ratio for `format`: two slots of its physical width.
pub const fn bclk_ratio(format: SampleFormat) -> u32 {
    format.physical_width().saturating_mul(2)
}

/// Primary codec TDM slot assignment for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TdmSlots {
    /// Transmit slot mask.
    pub tx_mask: u32,
    /// Receive slot mask.
    pub rx_mask: u32,
    /// Slots per frame.
    pub slots: u32,
    /// Bits per slot.
    pub slot_width: u32,
}

impl TdmSlots {
    /// One slot per frame, as wide as the physical sample. Capture receives
    /// on slot 0, playback transmits on it.
    pub const fn for_direction(direction: StreamDirection, format: SampleFormat) -> Self {
        let (tx_mask, rx_mask) = match direction {
            StreamDirection::Capture => (0, 1),
            StreamDirection::Playback => (1, 0),
        };
        Self {
            tx_mask,
            rx_mask,
            slots: 1,
            slot_width: format.physical_width(),
        }
    }
}

/// Open substreams per direction on the general link.
///
/// At most one substream per direction is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OpenStreamCounters {
    playback: bool,
    capture: bool,
}

impl OpenStreamCounters {
    /// Open substreams in `direction` (0 or 1).
    pub const fn count(&self, direction: StreamDirection) -> u8 {
        self.is_open(direction) as u8
    }

    /// Open substreams across both directions.
    pub const fn total(&self) -> u8 {
        (self.playback as u8).saturating_add(self.capture as u8)
    }

    /// `true` if `direction` has an open substream.
    pub const fn is_open(&self, direction: StreamDirection) -> bool {
        match direction {
            StreamDirection::Playback => self.playback,
            StreamDirection::Capture => self.capture,
        }
    }

    fn slot(&mut self, direction: StreamDirection) -> &mut bool {
        match direction {
            StreamDirection::Playback => &mut self.playback,
            StreamDirection::Capture => &mut self.capture,
        }
    }

    /// Record a new substream.
    pub fn open(&mut self, direction: StreamDirection) -> Result<(), Error> {
        let slot = self.slot(direction);
        if *slot {
            return Err(Error::StreamAlreadyOpen(direction));
        }
        *slot = true;
        Ok(())
    }

    /// Forget a substream. Returns `true` if it was the last one open on the
    /// link.
    pub fn close(&mut self, direction: StreamDirection) -> Result<bool, Error> {
        let slot = self.slot(direction);
        if !*slot {
            return Err(Error::StreamNotOpen(direction));
        }
        *slot = false;
        Ok(self.total() == 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn bclk_ratio_uses_physical_width() {
        assert_eq!(bclk_ratio(SampleFormat::S16Le), 32);
        assert_eq!(bclk_ratio(SampleFormat::S24Le), 64);
        assert_eq!(bclk_ratio(SampleFormat::S24_3Le), 48);
        assert_eq!(bclk_ratio(SampleFormat::S32Le), 64);
    }

    #[test]
    fn tdm_masks_mirror_direction() {
        let capture = TdmSlots::for_direction(StreamDirection::Capture, SampleFormat::S16Le);
        assert_eq!((capture.tx_mask, capture.rx_mask), (0, 1));
        let playback = TdmSlots::for_direction(StreamDirection::Playback, SampleFormat::S24Le);
        assert_eq!((playback.tx_mask, playback.rx_mask), (1, 0));
        assert_eq!(playback.slots, 1);
        assert_eq!(playback.slot_width, 32);
    }

    #[test]
    fn counters_reject_double_open_and_stray_close() {
        let mut counters = OpenStreamCounters::default();
        counters.open(StreamDirection::Playback).unwrap();
        assert_eq!(
            counters.open(StreamDirection::Playback),
            Err(Error::StreamAlreadyOpen(StreamDirection::Playback))
        );
        assert_eq!(
            counters.close(StreamDirection::Capture),
            Err(Error::StreamNotOpen(StreamDirection::Capture))
        );
        assert_eq!(counters.total(), 1);
    }

    #[test]
    fn close_reports_last_stream() {
        let mut counters = OpenStreamCounters::default();
        counters.open(StreamDirection::Playback).unwrap();
        counters.open(StreamDirection::Capture).unwrap();
        assert_eq!(counters.close(StreamDirection::Capture), Ok(false));
        assert_eq!(counters.count(StreamDirection::Capture), 0);
        assert_eq!(counters.close(StreamDirection::Playback), Ok(true));
    }
}
