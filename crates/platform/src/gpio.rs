//! GPIO capability layer
//!
//! Pins are addressed by their SoC line number. The controller never touches
//! function-select registers itself; it asks a [`PinController`] to claim,
//! drive and re-mux lines.

/// SoC GPIO line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct PinId(pub u8);

impl core::fmt::Display for PinId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// Pin direction, with the initial level for outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// High-impedance input.
    Input,
    /// Push-pull output starting at the given level.
    Output(PinState),
}

/// Alternate (peripheral) pin functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AltFunction {
    /// ALT0 (I2C SDA on the mode-select line).
    Alt0,
    /// ALT1
    Alt1,
    /// ALT2
    Alt2,
    /// ALT3
    Alt3,
    /// ALT4
    Alt4,
    /// ALT5
    Alt5,
}

/// GPIO errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Line does not exist on this SoC / board.
    Invalid,
    /// Line already claimed by someone else.
    Busy,
    /// Line not claimed by the caller.
    NotAcquired,
    /// Controller rejected the operation.
    Io,
}

#[cfg(feature = "std")]
impl std::error::Error for GpioError {}

impl core::fmt::Display for GpioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Invalid => write!(f, "GPIO line does not exist"),
            Self::Busy => write!(f, "GPIO line already claimed"),
            Self::NotAcquired => write!(f, "GPIO line not claimed"),
            Self::Io => write!(f, "GPIO controller error"),
        }
    }
}

/// Claim-and-drive access to GPIO lines.
pub trait PinController {
    /// `true` if `pin` exists and may be requested.
    fn is_valid(&self, pin: PinId) -> bool;

    /// Claim exclusive ownership of `pin`. `label` names the consumer.
    fn acquire_pin(&mut self, pin: PinId, label: &'static str) -> Result<(), GpioError>;

    /// Give up ownership. Releasing an unclaimed pin is a no-op.
    fn release_pin(&mut self, pin: PinId);

    /// Configure direction (and initial level for outputs).
    fn set_direction(&mut self, pin: PinId, direction: Direction) -> Result<(), GpioError>;

    /// Drive an output pin.
    fn set_level(&mut self, pin: PinId, state: PinState) -> Result<(), GpioError>;

    /// Hand the pin to a peripheral. Does not require ownership.
    fn set_alternate_function(&mut self, pin: PinId, function: AltFunction)
        -> Result<(), GpioError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn pin_state_round_trips_bool() {
        assert_eq!(PinState::from(true), PinState::High);
        assert!(!bool::from(PinState::Low));
    }

    #[test]
    fn pin_id_display() {
        assert_eq!(PinId(23).to_string(), "GPIO23");
    }
}
