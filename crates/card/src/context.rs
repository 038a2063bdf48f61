//! Device context: endpoints, machine state and the card's entry points.
//!
//! # Event Flow
//!
//! ```text
//! reset_transceiver ──> TransceiverReady ──> SoundCard::late_probe
//!                                                  │
//!        stream events                             │          power events
//!  open_stream / hw_params / close_stream ─────────┼──── set_bias_level(_post)
//!                                                  │     passthrough_event
//!                                                  v
//!                                           MachineState
//! ```
//!
//! Every entry point takes `&mut self`, so one context never sees two events
//! at once. [`crate::shared::SharedCard`] provides the lock when events come
//! from more than one task.

use platform::{
    BiasLevel, ClockDirection, ClockDomain, ClockSource, CodecEndpoint, HostInterface,
    SampleRateHz, StreamDirection,
};

use crate::clocking::{
    configure_primary_clocks, configure_transceiver_clocks, disable_primary_sysclk,
    transceiver_supports,
};
use crate::config::DEFAULT_RATE;
use crate::error::{ConfigStep, Endpoint, Error, TopologyError};
use crate::fixup::{apply_fixup, LinkParams, WidgetEvent};
use crate::power::{apply_bias_level, apply_bias_level_post, PowerDomain};
use crate::reset::TransceiverReady;
use crate::stream::{bclk_ratio, HwParams, OpenStreamCounters, TdmSlots};
use crate::sync::SyncState;

// ─── Machine state ───────────────────────────────────────────────────────────

/// Clocking state shared by the stream and power paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineState {
    /// Rate the primary codec's SYSCLK was last configured for.
    pub primary_codec_rate: SampleRateHz,
    /// Rate the transceiver clocks were last configured for.
    pub transceiver_rate: SampleRateHz,
    /// FLL1 source selection.
    pub sync: SyncState,
    /// Last bias level the primary codec was moved to.
    pub bias_level: BiasLevel,
}

impl MachineState {
    /// `true` while FLL1 follows the passthrough bit clock.
    pub const fn sync_path_enabled(&self) -> bool {
        self.sync.is_synchronized()
    }
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            primary_codec_rate: DEFAULT_RATE,
            transceiver_rate: DEFAULT_RATE,
            sync: SyncState::FreeRunning,
            bias_level: BiasLevel::Off,
        }
    }
}

// ─── Link resolution ─────────────────────────────────────────────────────────

/// Endpoints as registered by the platform, any of which may be missing.
#[derive(Debug)]
pub struct Links<P, T, H> {
    /// FLL-capable primary codec.
    pub primary: Option<P>,
    /// S/PDIF transceiver.
    pub transceiver: Option<T>,
    /// Host serial audio port feeding the general link.
    pub host: Option<H>,
}

impl<P, T, H> Links<P, T, H> {
    /// All three endpoints present.
    pub const fn new(primary: P, transceiver: T, host: H) -> Self {
        Self {
            primary: Some(primary),
            transceiver: Some(transceiver),
            host: Some(host),
        }
    }

    /// Take every endpoint out, or report the first one missing.
    pub fn resolve(self) -> Result<(P, T, H), TopologyError> {
        let primary = self.primary.ok_or(TopologyError::MissingPrimary)?;
        let transceiver = self.transceiver.ok_or(TopologyError::MissingTransceiver)?;
        let host = self.host.ok_or(TopologyError::MissingHost)?;
        Ok((primary, transceiver, host))
    }
}

// ─── Sound card ──────────────────────────────────────────────────────────────

/// The card controller.
///
/// Owns both codec endpoints and the host port for its whole lifetime and
/// holds the only copy of [`MachineState`].
pub struct SoundCard<P, T, H> {
    primary: P,
    transceiver: T,
    host: H,
    state: MachineState,
    counters: OpenStreamCounters,
    passthrough: LinkParams,
}

impl<P, T, H> SoundCard<P, T, H>
where
    P: CodecEndpoint,
    T: CodecEndpoint,
    H: HostInterface,
{
    /// Bring the card up once every endpoint is registered.
    ///
    /// Both rates start at 44.1 kHz with FLL1 free-running. SYSCLK is parked
    /// at zero, the transceiver is clocked for 44.1 kHz, and both primary
    /// audio interfaces are bound to the SYSCLK domain. Requires proof that
    /// the transceiver reset already ran.
    pub fn late_probe(_ready: TransceiverReady, links: Links<P, T, H>) -> Result<Self, Error> {
        let (mut primary, mut transceiver, host) = links
            .resolve()
            .inspect_err(|e| error!("late probe: {}", e))?;
        let state = MachineState::default();

        disable_primary_sysclk(&mut primary)?;
        configure_transceiver_clocks(&mut transceiver, state.transceiver_rate)?;
        bind_to_sysclk(&mut primary, ClockDomain::Aif1, ConfigStep::Aif1ClockDomain)?;
        bind_to_sysclk(&mut primary, ClockDomain::Aif2, ConfigStep::Aif2ClockDomain)?;

        info!("card up at {} Hz", state.primary_codec_rate.get());
        Ok(Self {
            primary,
            transceiver,
            host,
            state,
            counters: OpenStreamCounters::default(),
            passthrough: LinkParams::default(),
        })
    }

    /// A substream was opened on the general link.
    pub fn open_stream(&mut self, direction: StreamDirection) -> Result<(), Error> {
        self.counters.open(direction)?;
        debug!("{} stream open ({} total)", direction.as_str(), self.counters.total());
        Ok(())
    }

    /// Negotiate hardware parameters for an open substream.
    ///
    /// Programs the host BCLK ratio, the transceiver clocks (32 kHz and up
    /// only), the primary SYSCLK and the primary TDM slots, in that order.
    /// Both rates are committed only if every step succeeds.
    pub fn hw_params(&mut self, direction: StreamDirection, params: &HwParams) -> Result<(), Error> {
        if !self.counters.is_open(direction) {
            return Err(Error::StreamNotOpen(direction));
        }
        if self.counters.is_open(direction.opposite()) {
            warn!("{} negotiation with both directions open", direction.as_str());
            return Err(Error::UnsupportedDirections);
        }

        let rate = params.rate;
        let ratio = bclk_ratio(params.format);
        self.host
            .set_bclk_ratio(ratio)
            .map_err(Error::at(Endpoint::Host, ConfigStep::BclkRatio))
            .inspect_err(|e| error!("{}", e))?;

        if transceiver_supports(rate) {
            configure_transceiver_clocks(&mut self.transceiver, rate)?;
        } else {
            debug!("{} Hz below transceiver range, leaving its clocks", rate.get());
        }

        configure_primary_clocks(&mut self.primary, rate)?;

        let slots = TdmSlots::for_direction(direction, params.format);
        self.primary
            .set_tdm_slot(slots.tx_mask, slots.rx_mask, slots.slots, slots.slot_width)
            .map_err(Error::at(Endpoint::Primary, ConfigStep::TdmSlots))
            .inspect_err(|e| error!("{}", e))?;

        self.state.primary_codec_rate = rate;
        self.state.transceiver_rate = rate;
        debug!(
            "{} negotiated: fs={} bclk ratio={} slot width={}",
            direction.as_str(),
            rate.get(),
            ratio,
            slots.slot_width
        );
        Ok(())
    }

    /// A substream on the general link was closed.
    ///
    /// Closing the last open substream stops SYSCLK. The substream is
    /// forgotten even if stopping SYSCLK fails.
    pub fn close_stream(&mut self, direction: StreamDirection) -> Result<(), Error> {
        if self.counters.close(direction)? {
            debug!("last stream closed, stopping SYSCLK");
            disable_primary_sysclk(&mut self.primary)?;
        }
        Ok(())
    }

    /// Bias transition about to happen in `domain`.
    pub fn set_bias_level(&mut self, domain: PowerDomain, level: BiasLevel) -> Result<(), Error> {
        if apply_bias_level(
            &mut self.primary,
            domain,
            level,
            self.state.sync,
            self.state.primary_codec_rate,
        )? {
            self.state.bias_level = level;
        }
        Ok(())
    }

    /// Bias transition in `domain` has completed.
    pub fn set_bias_level_post(
        &mut self,
        domain: PowerDomain,
        level: BiasLevel,
    ) -> Result<(), Error> {
        if apply_bias_level_post(&mut self.primary, domain, level)? {
            self.state.bias_level = level;
        }
        Ok(())
    }

    /// Passthrough widget transition.
    ///
    /// Pre events adjust the passthrough link rate; post events move FLL1
    /// between its reference and the passthrough bit clock.
    pub fn passthrough_event(&mut self, event: WidgetEvent) -> Result<(), Error> {
        match event {
            WidgetEvent::PrePowerUp | WidgetEvent::PrePowerDown => {
                apply_fixup(&mut self.passthrough, event, self.state.transceiver_rate);
                Ok(())
            }
            WidgetEvent::PostPowerUp => self
                .state
                .sync
                .power_up(&mut self.primary, self.state.transceiver_rate),
            WidgetEvent::PostPowerDown => {
                self.state.sync.power_down();
                Ok(())
            }
        }
    }

    /// Current machine state.
    pub const fn state(&self) -> &MachineState {
        &self.state
    }

    /// Open substreams on the general link.
    pub const fn counters(&self) -> &OpenStreamCounters {
        &self.counters
    }

    /// Current passthrough link parameters.
    pub const fn passthrough_params(&self) -> &LinkParams {
        &self.passthrough
    }

    /// Primary codec endpoint.
    pub const fn primary(&self) -> &P {
        &self.primary
    }

    /// Transceiver endpoint.
    pub const fn transceiver(&self) -> &T {
        &self.transceiver
    }

    /// Host serial port.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to all three endpoints.
    pub fn endpoints_mut(&mut self) -> (&mut P, &mut T, &mut H) {
        (&mut self.primary, &mut self.transceiver, &mut self.host)
    }

    /// Tear the card down, handing the endpoints back.
    pub fn into_parts(self) -> (P, T, H) {
        (self.primary, self.transceiver, self.host)
    }
}

fn bind_to_sysclk<P: CodecEndpoint>(
    primary: &mut P,
    domain: ClockDomain,
    step: ConfigStep,
) -> Result<(), Error> {
    primary
        .set_sysclk(domain, ClockSource::SysClk, 0, ClockDirection::In)
        .map_err(Error::at(Endpoint::Primary, step))
        .inspect_err(|e| error!("late probe: {}", e))
}
