use crate::PinId;
use crate::util::{error, warn};
use embedded_hal::digital::{OutputPin, PinState};

/// Sets digital output pins by id.
///
/// Called from the tick handler, so implementations must not block. Writes
/// are assumed to always succeed; failures can only be logged.
pub trait PinSink {
    fn set_pin(&mut self, pin: PinId, state: PinState);
}

impl<T: PinSink + ?Sized> PinSink for &mut T {
    fn set_pin(&mut self, pin: PinId, state: PinState) {
        (**self).set_pin(pin, state);
    }
}

/// [`PinSink`] over a fixed set of `embedded-hal` output pins, where a pin id
/// is the index into the set.
pub struct PinBank<P, const N: usize> {
    pins: [P; N],
}

impl<P: OutputPin, const N: usize> PinBank<P, N> {
    pub const fn new(pins: [P; N]) -> Self {
        Self { pins }
    }

    pub fn outputs(&self) -> &[P] {
        &self.pins
    }

    pub fn release(self) -> [P; N] {
        self.pins
    }
}

impl<P: OutputPin, const N: usize> PinSink for PinBank<P, N> {
    fn set_pin(&mut self, pin: PinId, state: PinState) {
        let Some(output) = self.pins.get_mut(usize::from(pin)) else {
            warn!("No output for pin {}", pin);
            return;
        };

        if output.set_state(state).is_err() {
            error!("Failed to set pin {}", pin);
        }
    }
}
