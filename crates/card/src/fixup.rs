//! Passthrough link parameters.
//!
//! The inter-chip link has a fixed format and is not opened by user space,
//! so nothing negotiates its rate. While the passthrough path is powered the
//! rate is pinned to whatever the transceiver was last configured for.

use platform::{SampleFormat, SampleRateHz};

use crate::config::DEFAULT_RATE;

/// Transition reported for the passthrough widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetEvent {
    /// About to power up.
    PrePowerUp,
    /// Finished powering up.
    PostPowerUp,
    /// About to power down.
    PrePowerDown,
    /// Finished powering down.
    PostPowerDown,
}

impl WidgetEvent {
    /// `true` for events delivered before the hardware changes.
    pub const fn is_pre(self) -> bool {
        matches!(self, Self::PrePowerUp | Self::PrePowerDown)
    }
}

/// Fixed parameters of the inter-chip passthrough link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkParams {
    /// Always 24-bit in a 32-bit container.
    pub format: SampleFormat,
    /// Always stereo.
    pub channels: u8,
    /// Lowest rate the link accepts.
    pub rate_min: SampleRateHz,
    /// Highest rate the link accepts.
    pub rate_max: SampleRateHz,
}

impl LinkParams {
    /// Link parameters pinned to a single `rate`.
    pub const fn pinned(rate: SampleRateHz) -> Self {
        Self {
            format: SampleFormat::S24Le,
            channels: 2,
            rate_min: rate,
            rate_max: rate,
        }
    }

    /// The single rate the link currently accepts.
    pub const fn rate(&self) -> SampleRateHz {
        self.rate_min
    }
}

impl Default for LinkParams {
    fn default() -> Self {
        Self::pinned(DEFAULT_RATE)
    }
}

/// Adjust the passthrough link before a power transition.
///
/// Before power-up the link follows `transceiver_rate`. Before power-down it
/// returns to the default rate. Post events leave it alone.
pub fn apply_fixup(params: &mut LinkParams, event: WidgetEvent, transceiver_rate: SampleRateHz) {
    let rate = match event {
        WidgetEvent::PrePowerUp => transceiver_rate,
        WidgetEvent::PrePowerDown => DEFAULT_RATE,
        WidgetEvent::PostPowerUp | WidgetEvent::PostPowerDown => return,
    };
    debug!("passthrough link pinned to {} Hz", rate.get());
    params.rate_min = rate;
    params.rate_max = rate;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn rate(hz: u32) -> SampleRateHz {
        SampleRateHz::new(hz).unwrap()
    }

    #[test]
    fn default_link_is_24bit_stereo_cd() {
        let params = LinkParams::default();
        assert_eq!(params.format, SampleFormat::S24Le);
        assert_eq!(params.channels, 2);
        assert_eq!(params.rate_min, rate(44_100));
        assert_eq!(params.rate_max, rate(44_100));
    }

    #[test]
    fn power_up_tracks_transceiver_and_power_down_restores() {
        let mut params = LinkParams::default();
        apply_fixup(&mut params, WidgetEvent::PrePowerUp, rate(96_000));
        assert_eq!(params, LinkParams::pinned(rate(96_000)));
        apply_fixup(&mut params, WidgetEvent::PrePowerDown, rate(96_000));
        assert_eq!(params, LinkParams::default());
    }

    #[test]
    fn post_events_are_ignored() {
        let mut params = LinkParams::pinned(rate(48_000));
        apply_fixup(&mut params, WidgetEvent::PostPowerUp, rate(96_000));
        apply_fixup(&mut params, WidgetEvent::PostPowerDown, rate(96_000));
        assert_eq!(params.rate(), rate(48_000));
    }
}
