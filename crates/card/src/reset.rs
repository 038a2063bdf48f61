//! One-time transceiver reset and strap sequence.
//!
//! The transceiver samples its mode straps while coming out of reset:
//!
//! ```text
//! MODE  ──high (software mode)───────────────────────┐ → ALT0 (I2C SDA)
//! WIRE  ──low  (two-wire / I2C)──────────────────────┤
//! ADDR  ──low  (I2C address 0x3A)────────────────────┤ released
//! RST   ──high──┐ 500 ms ┌──high── 500 ms ───────────┘
//!               └───low──┘
//! ```
//!
//! After the pulse the mode strap is the same physical line as the I2C data
//! line, so it is handed to the I2C peripheral last. Running this a second
//! time once the bus is live corrupts addressing; [`TransceiverReady`] is the
//! proof that it ran exactly once before the card is built.

use embedded_hal::delay::DelayNs;
use platform::{AltFunction, Direction, GpioError, PinController, PinId, PinState};

use crate::config::{BoardRevision, ResetPins, RESET_SETTLE_MS};
use crate::error::{Error, PinRole};

/// Proof that the transceiver reset sequence completed.
///
/// Only [`reset_transceiver`] creates one; `SoundCard::late_probe` consumes it.
#[derive(Debug)]
#[must_use = "the card cannot be brought up without the reset token"]
pub struct TransceiverReady {
    _private: (),
}

/// Reset the transceiver and latch its straps.
///
/// `revision` picks the address strap line. Missing or busy lines abort the
/// sequence with every already-claimed line released. Failures while driving
/// a claimed line are logged and the sequence continues. A mode line that
/// cannot be handed back to I2C fails the reset, since the transceiver is
/// unreachable without it. Blocks for about one second.
pub fn reset_transceiver<G, D>(
    gpio: &mut G,
    delay: &mut D,
    pins: &ResetPins,
    revision: BoardRevision,
) -> Result<TransceiverReady, Error>
where
    G: PinController,
    D: DelayNs,
{
    let address = pins.address_line(revision);
    info!("resetting S/PDIF transceiver (address strap {})", address);

    let lines = [
        (pins.reset, PinRole::Reset),
        (pins.mode, PinRole::ModeSelect),
        (pins.wire_select, PinRole::WireSelect),
        (address, PinRole::AddressSelect),
    ];

    for &(pin, role) in &lines {
        if !gpio.is_valid(pin) {
            error!("{} ({}) is not available", pin, role.label());
            return Err(Error::PinUnavailable { pin, role });
        }
    }

    for (claimed, &(pin, role)) in lines.iter().enumerate() {
        if let Err(e) = gpio.acquire_pin(pin, role.label()) {
            error!("request for {} ({}) failed: {}", pin, role.label(), e);
            for &(held, _) in lines.iter().take(claimed).rev() {
                gpio.release_pin(held);
            }
            return Err(match e {
                GpioError::Invalid => Error::PinUnavailable { pin, role },
                _ => Error::PinBusy { pin, role },
            });
        }
    }

    // Straps first, reset line last so the chip sees them settled.
    drive(gpio, pins.mode, PinRole::ModeSelect, Direction::Output(PinState::High));
    drive(gpio, pins.wire_select, PinRole::WireSelect, Direction::Output(PinState::Low));
    drive(gpio, address, PinRole::AddressSelect, Direction::Output(PinState::Low));
    drive(gpio, pins.reset, PinRole::Reset, Direction::Output(PinState::High));

    level(gpio, pins.reset, PinState::Low);
    delay.delay_ms(RESET_SETTLE_MS);
    level(gpio, pins.reset, PinState::High);
    delay.delay_ms(RESET_SETTLE_MS);

    for &(pin, _) in &lines {
        gpio.release_pin(pin);
    }

    gpio.set_alternate_function(pins.mode, AltFunction::Alt0)
        .map_err(|cause| Error::PinMux {
            pin: pins.mode,
            role: PinRole::ModeSelect,
            cause,
        })
        .inspect_err(|e| error!("{}", e))?;

    info!("S/PDIF transceiver out of reset");
    Ok(TransceiverReady { _private: () })
}

fn drive<G: PinController>(gpio: &mut G, pin: PinId, role: PinRole, direction: Direction) {
    if let Err(e) = gpio.set_direction(pin, direction) {
        warn!("direction change on {} ({}) failed: {}", pin, role.label(), e);
    }
}

fn level<G: PinController>(gpio: &mut G, pin: PinId, state: PinState) {
    if let Err(e) = gpio.set_level(pin, state) {
        let level = match state {
            PinState::High => "high",
            PinState::Low => "low",
        };
        warn!("driving {} {} failed: {}", pin, level, e);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::{GpioEvent, MockFunction, MockGpio};

    #[derive(Default)]
    struct CountingDelay {
        total_ns: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    #[test]
    fn holds_reset_for_full_settle_time() {
        let mut gpio = MockGpio::new();
        let mut delay = CountingDelay::default();
        let _ready =
            reset_transceiver(&mut gpio, &mut delay, &ResetPins::default(), BoardRevision(0x10))
                .unwrap();
        assert_eq!(delay.total_ns, 2 * 500 * 1_000_000);
    }

    #[test]
    fn reset_pulse_is_low_then_high() {
        let mut gpio = MockGpio::new();
        let pins = ResetPins::default();
        let _ready =
            reset_transceiver(&mut gpio, &mut CountingDelay::default(), &pins, BoardRevision(0))
                .unwrap();
        let levels: std::vec::Vec<_> = gpio
            .events()
            .iter()
            .filter_map(|e| match *e {
                GpioEvent::Level(p, s) if p == pins.reset => Some(s),
                _ => None,
            })
            .collect();
        assert_eq!(levels, [PinState::Low, PinState::High]);
    }

    #[test]
    fn mode_line_ends_as_i2c_data() {
        let mut gpio = MockGpio::new();
        let pins = ResetPins::default();
        let _ready =
            reset_transceiver(&mut gpio, &mut CountingDelay::default(), &pins, BoardRevision(0))
                .unwrap();
        assert_eq!(gpio.function(pins.mode), Some(MockFunction::Alt(AltFunction::Alt0)));
        assert_eq!(gpio.acquired_count(), 0);
    }

    #[test]
    fn failed_remux_fails_reset() {
        let mut gpio = MockGpio::new();
        let pins = ResetPins::default();
        gpio.fail_alternate(pins.mode);
        let err = reset_transceiver(&mut gpio, &mut CountingDelay::default(), &pins, BoardRevision(0))
            .unwrap_err();
        assert_eq!(
            err,
            Error::PinMux {
                pin: pins.mode,
                role: PinRole::ModeSelect,
                cause: GpioError::Io,
            }
        );
        // the pulse still ran and every line was released
        assert_eq!(gpio.level(pins.reset), Some(PinState::High));
        assert_eq!(gpio.acquired_count(), 0);
    }
}
