//! Mock implementations for testing
//!
//! Recording doubles for the codec endpoints, the host serial port and the
//! GPIO controller. Each one logs every call (successful or not) so tests can
//! assert on ordering, and each can be told to fail selected calls.

#![cfg(any(test, feature = "std"))]

use crate::codec::{
    ClockDirection, ClockDivider, ClockDomain, ClockLoop, ClockSource, CodecEndpoint, CodecError,
    HostInterface,
};
use crate::gpio::{AltFunction, Direction, GpioError, PinController, PinId, PinState};

/// Capacity of every call log. Calls past this are still executed, not logged.
pub const LOG_CAPACITY: usize = 128;

// ── Codec ────────────────────────────────────────────────────────────────────

/// One call made against a [`MockCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecCall {
    /// `set_pll`
    SetPll {
        /// Loop programmed
        loop_id: ClockLoop,
        /// Reference source
        source: ClockSource,
        /// Reference frequency
        freq_in: u32,
        /// Target frequency
        freq_out: u32,
    },
    /// `set_sysclk`
    SetSysclk {
        /// Domain sourced
        domain: ClockDomain,
        /// Source selected
        source: ClockSource,
        /// Frequency
        freq: u32,
        /// Direction
        direction: ClockDirection,
    },
    /// `set_clkdiv`
    SetClkdiv {
        /// Divider
        divider: ClockDivider,
        /// Value
        value: u32,
    },
    /// `set_bclk_ratio`
    SetBclkRatio(u32),
    /// `set_tdm_slot`
    SetTdmSlot {
        /// Transmit mask
        tx_mask: u32,
        /// Receive mask
        rx_mask: u32,
        /// Slot count
        slots: u32,
        /// Slot width in bits
        slot_width: u32,
    },
}

/// Mock codec endpoint
pub struct MockCodec {
    calls: heapless::Vec<CodecCall, LOG_CAPACITY>,
    fail_when: Option<fn(&CodecCall) -> bool>,
    error: CodecError,
}

impl MockCodec {
    /// Create a mock that accepts everything.
    pub fn new() -> Self {
        Self {
            calls: heapless::Vec::new(),
            fail_when: None,
            error: CodecError::InvalidArgument,
        }
    }

    /// Create a mock that rejects every call matching `predicate`.
    pub fn failing_when(predicate: fn(&CodecCall) -> bool) -> Self {
        Self {
            fail_when: Some(predicate),
            ..Self::new()
        }
    }

    /// Change (or clear) the failure predicate.
    pub fn set_fail_when(&mut self, predicate: Option<fn(&CodecCall) -> bool>) {
        self.fail_when = predicate;
    }

    /// Error returned for rejected calls.
    pub fn set_error(&mut self, error: CodecError) {
        self.error = error;
    }

    /// Every call made so far, rejected ones included.
    pub fn calls(&self) -> &[CodecCall] {
        &self.calls
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// `set_pll` calls only, in order.
    pub fn pll_calls(&self) -> impl Iterator<Item = &CodecCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, CodecCall::SetPll { .. }))
    }

    /// Frequency of the most recent `set_sysclk` on `domain`.
    pub fn last_sysclk(&self, domain: ClockDomain) -> Option<u32> {
        self.calls.iter().rev().find_map(|c| match *c {
            CodecCall::SetSysclk { domain: d, freq, .. } if d == domain => Some(freq),
            _ => None,
        })
    }

    fn record(&mut self, call: CodecCall) -> Result<(), CodecError> {
        if self.calls.len() < self.calls.capacity() {
            let _ = self.calls.push(call);
        }
        match self.fail_when {
            Some(predicate) if predicate(&call) => Err(self.error),
            _ => Ok(()),
        }
    }
}

impl Default for MockCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecEndpoint for MockCodec {
    fn set_pll(
        &mut self,
        loop_id: ClockLoop,
        source: ClockSource,
        freq_in: u32,
        freq_out: u32,
    ) -> Result<(), CodecError> {
        self.record(CodecCall::SetPll {
            loop_id,
            source,
            freq_in,
            freq_out,
        })
    }

    fn set_sysclk(
        &mut self,
        domain: ClockDomain,
        source: ClockSource,
        freq: u32,
        direction: ClockDirection,
    ) -> Result<(), CodecError> {
        self.record(CodecCall::SetSysclk {
            domain,
            source,
            freq,
            direction,
        })
    }

    fn set_clkdiv(&mut self, divider: ClockDivider, value: u32) -> Result<(), CodecError> {
        self.record(CodecCall::SetClkdiv { divider, value })
    }

    fn set_bclk_ratio(&mut self, ratio: u32) -> Result<(), CodecError> {
        self.record(CodecCall::SetBclkRatio(ratio))
    }

    fn set_tdm_slot(
        &mut self,
        tx_mask: u32,
        rx_mask: u32,
        slots: u32,
        slot_width: u32,
    ) -> Result<(), CodecError> {
        self.record(CodecCall::SetTdmSlot {
            tx_mask,
            rx_mask,
            slots,
            slot_width,
        })
    }
}

// ── Host serial port ─────────────────────────────────────────────────────────

/// Mock host serial audio port
#[derive(Default)]
pub struct MockHost {
    ratios: heapless::Vec<u32, LOG_CAPACITY>,
    fail: bool,
}

impl MockHost {
    /// Create a port that accepts every ratio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail.
    pub fn set_failing(&mut self, fail: bool) {
        self.fail = fail;
    }

    /// Ratios requested so far.
    pub fn ratios(&self) -> &[u32] {
        &self.ratios
    }
}

impl HostInterface for MockHost {
    fn set_bclk_ratio(&mut self, ratio: u32) -> Result<(), CodecError> {
        if self.ratios.len() < self.ratios.capacity() {
            let _ = self.ratios.push(ratio);
        }
        if self.fail {
            Err(CodecError::InvalidArgument)
        } else {
            Ok(())
        }
    }
}

// ── GPIO ─────────────────────────────────────────────────────────────────────

/// Number of lines the mock controller exposes (BCM2835 has 54).
pub const MOCK_GPIO_LINES: usize = 54;

/// Electrical role a mock line is currently muxed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFunction {
    /// Plain GPIO in the given direction (`None` = never configured).
    Gpio(Option<Direction>),
    /// Peripheral function.
    Alt(AltFunction),
}

/// One operation seen by [`MockGpio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioEvent {
    /// Successful claim
    Acquired(PinId),
    /// Release
    Released(PinId),
    /// Direction change (logged even if it then fails)
    Direction(PinId, Direction),
    /// Level change
    Level(PinId, PinState),
    /// Re-mux
    Alternate(PinId, AltFunction),
}

#[derive(Debug, Clone, Copy)]
struct MockLine {
    exists: bool,
    owner: Option<&'static str>,
    foreign: bool,
    level: PinState,
    function: MockFunction,
    fail_direction: bool,
    fail_alternate: bool,
}

impl MockLine {
    const fn new() -> Self {
        Self {
            exists: true,
            owner: None,
            foreign: false,
            level: PinState::Low,
            function: MockFunction::Gpio(None),
            fail_direction: false,
            fail_alternate: false,
        }
    }
}

/// Mock GPIO controller
pub struct MockGpio {
    lines: [MockLine; MOCK_GPIO_LINES],
    events: heapless::Vec<GpioEvent, LOG_CAPACITY>,
}

impl MockGpio {
    /// All lines exist, none claimed.
    pub fn new() -> Self {
        Self {
            lines: [MockLine::new(); MOCK_GPIO_LINES],
            events: heapless::Vec::new(),
        }
    }

    /// Make `pin` report as non-existent.
    pub fn remove_line(&mut self, pin: PinId) {
        if let Some(line) = self.line_mut(pin) {
            line.exists = false;
        }
    }

    /// Mark `pin` as claimed by another driver.
    pub fn claim_elsewhere(&mut self, pin: PinId) {
        if let Some(line) = self.line_mut(pin) {
            line.foreign = true;
        }
    }

    /// Make direction changes on `pin` fail.
    pub fn fail_direction(&mut self, pin: PinId) {
        if let Some(line) = self.line_mut(pin) {
            line.fail_direction = true;
        }
    }

    /// Make re-muxing `pin` to a peripheral function fail.
    pub fn fail_alternate(&mut self, pin: PinId) {
        if let Some(line) = self.line_mut(pin) {
            line.fail_alternate = true;
        }
    }

    /// `true` while the caller holds `pin`.
    pub fn is_acquired(&self, pin: PinId) -> bool {
        self.line(pin).is_some_and(|l| l.owner.is_some())
    }

    /// Number of pins the caller currently holds.
    pub fn acquired_count(&self) -> usize {
        self.lines.iter().filter(|l| l.owner.is_some()).count()
    }

    /// Current output level of `pin`.
    pub fn level(&self, pin: PinId) -> Option<PinState> {
        self.line(pin).map(|l| l.level)
    }

    /// Current mux role of `pin`.
    pub fn function(&self, pin: PinId) -> Option<MockFunction> {
        self.line(pin).map(|l| l.function)
    }

    /// Every operation so far.
    pub fn events(&self) -> &[GpioEvent] {
        &self.events
    }

    fn line(&self, pin: PinId) -> Option<&MockLine> {
        self.lines.get(usize::from(pin.0)).filter(|l| l.exists)
    }

    fn line_mut(&mut self, pin: PinId) -> Option<&mut MockLine> {
        self.lines.get_mut(usize::from(pin.0)).filter(|l| l.exists)
    }

    fn log(&mut self, event: GpioEvent) {
        if self.events.len() < self.events.capacity() {
            let _ = self.events.push(event);
        }
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl PinController for MockGpio {
    fn is_valid(&self, pin: PinId) -> bool {
        self.line(pin).is_some()
    }

    fn acquire_pin(&mut self, pin: PinId, label: &'static str) -> Result<(), GpioError> {
        let line = self.line_mut(pin).ok_or(GpioError::Invalid)?;
        if line.foreign || line.owner.is_some() {
            return Err(GpioError::Busy);
        }
        line.owner = Some(label);
        self.log(GpioEvent::Acquired(pin));
        Ok(())
    }

    fn release_pin(&mut self, pin: PinId) {
        let released = match self.line_mut(pin) {
            Some(line) => line.owner.take().is_some(),
            None => false,
        };
        if released {
            self.log(GpioEvent::Released(pin));
        }
    }

    fn set_direction(&mut self, pin: PinId, direction: Direction) -> Result<(), GpioError> {
        self.log(GpioEvent::Direction(pin, direction));
        let line = self.line_mut(pin).ok_or(GpioError::Invalid)?;
        if line.owner.is_none() {
            return Err(GpioError::NotAcquired);
        }
        if line.fail_direction {
            return Err(GpioError::Io);
        }
        line.function = MockFunction::Gpio(Some(direction));
        if let Direction::Output(level) = direction {
            line.level = level;
        }
        Ok(())
    }

    fn set_level(&mut self, pin: PinId, state: PinState) -> Result<(), GpioError> {
        self.log(GpioEvent::Level(pin, state));
        let line = self.line_mut(pin).ok_or(GpioError::Invalid)?;
        if line.owner.is_none() {
            return Err(GpioError::NotAcquired);
        }
        line.level = state;
        Ok(())
    }

    fn set_alternate_function(
        &mut self,
        pin: PinId,
        function: AltFunction,
    ) -> Result<(), GpioError> {
        self.log(GpioEvent::Alternate(pin, function));
        let line = self.line_mut(pin).ok_or(GpioError::Invalid)?;
        if line.fail_alternate {
            return Err(GpioError::Io);
        }
        line.function = MockFunction::Alt(function);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_codec_records_and_fails() {
        let mut codec = MockCodec::failing_when(|c| matches!(c, CodecCall::SetClkdiv { .. }));
        codec
            .set_sysclk(ClockDomain::SysClk, ClockSource::Fll1, 42, ClockDirection::In)
            .unwrap();
        assert_eq!(
            codec.set_clkdiv(ClockDivider::TransceiverMclkDiv, 0),
            Err(CodecError::InvalidArgument)
        );
        assert_eq!(codec.calls().len(), 2);
        assert_eq!(codec.last_sysclk(ClockDomain::SysClk), Some(42));
        assert_eq!(codec.last_sysclk(ClockDomain::Aif1), None);
    }

    #[test]
    fn test_mock_host_fails_on_request() {
        let mut host = MockHost::new();
        host.set_bclk_ratio(64).unwrap();
        host.set_failing(true);
        assert!(host.set_bclk_ratio(32).is_err());
        assert_eq!(host.ratios(), &[64, 32]);
    }

    #[test]
    fn test_mock_gpio_ownership() {
        let mut gpio = MockGpio::new();
        let pin = PinId(8);
        gpio.acquire_pin(pin, "rst").unwrap();
        assert_eq!(gpio.acquire_pin(pin, "again"), Err(GpioError::Busy));
        gpio.set_direction(pin, Direction::Output(PinState::High)).unwrap();
        assert_eq!(gpio.level(pin), Some(PinState::High));
        gpio.release_pin(pin);
        assert!(!gpio.is_acquired(pin));
        assert_eq!(gpio.set_level(pin, PinState::Low), Err(GpioError::NotAcquired));
    }

    #[test]
    fn test_mock_gpio_missing_and_foreign_lines() {
        let mut gpio = MockGpio::new();
        gpio.remove_line(PinId(2));
        gpio.claim_elsewhere(PinId(3));
        assert!(!gpio.is_valid(PinId(2)));
        assert!(!gpio.is_valid(PinId(60)));
        assert_eq!(gpio.acquire_pin(PinId(3), "x"), Err(GpioError::Busy));
    }
}
