use crate::pin::PinSink;
use crate::{ChannelId, DUTY_FULL, MAX_CHANNELS, PinId, PinState, PwmError, Result};
use core::sync::atomic::{AtomicU8, Ordering};

/// State of one output channel of an instance.
///
/// The duty is double buffered: [`Channel::update_duty`] writes a pending
/// value which may happen from any context, while the engine renders the
/// committed value and only replaces it at a period boundary.
#[derive(Default)]
pub struct Channel {
    pub(crate) pin: PinId,
    pub(crate) duty: u8,
    pub(crate) update_duty: AtomicU8,
    pub(crate) active: bool,
}

impl Channel {
    #[must_use]
    pub fn pin(&self) -> PinId {
        self.pin
    }

    /// Duty rendered during the current period.
    #[must_use]
    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// Duty that will be latched at the next period boundary.
    #[must_use]
    pub fn pending_duty(&self) -> u8 {
        self.update_duty.load(Ordering::Relaxed)
    }

    /// Whether the pin is currently driven high.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Requests a new duty. Values of [`DUTY_FULL`] and above are latched as
    /// [`DUTY_FULL`] and keep the pin high for the whole period, zero keeps it
    /// low.
    pub fn update_duty(&self, duty: u8) {
        self.update_duty.store(duty, Ordering::SeqCst);
    }

    pub(crate) fn latch(&mut self) -> u8 {
        self.duty = self.update_duty.load(Ordering::SeqCst).min(DUTY_FULL);
        self.duty
    }

    pub(crate) fn drive(&mut self, pins: &mut impl PinSink, state: PinState) {
        self.active = state == PinState::High;
        pins.set_pin(self.pin, state);
    }

    /// Duty the channel still has to reach in the current period, if it is
    /// high and will ever be turned off.
    pub(crate) fn pending_invert(&self) -> Option<u8> {
        (self.active && self.duty < DUTY_FULL).then_some(self.duty)
    }
}

/// Fixed capacity table of the channels driven by one instance.
pub struct ChannelTable {
    channels: [Channel; MAX_CHANNELS],
    len: usize,
}

impl Default for ChannelTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: core::array::from_fn(|_| Channel::default()),
            len: 0,
        }
    }

    /// Replaces the channel set. Pins of the previous set are driven low and
    /// every new channel starts with a pending duty of zero.
    pub(crate) fn assign(&mut self, ids: &[PinId], pins: &mut impl PinSink) -> Result<()> {
        if ids.is_empty() || ids.len() > MAX_CHANNELS {
            return Err(PwmError::InvalidArgument);
        }

        self.force_low(pins);

        for (channel, &pin) in self.channels.iter_mut().zip(ids) {
            *channel = Channel {
                pin,
                ..Channel::default()
            };
        }
        self.len = ids.len();

        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn get(&self, channel: ChannelId) -> Option<&Channel> {
        self.as_slice().get(channel)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Channel> {
        self.as_slice().iter()
    }

    pub(crate) fn iter_mut(&mut self) -> core::slice::IterMut<'_, Channel> {
        self.channels[..self.len].iter_mut()
    }

    fn as_slice(&self) -> &[Channel] {
        &self.channels[..self.len]
    }

    pub(crate) fn force_low(&mut self, pins: &mut impl PinSink) {
        for channel in self.iter_mut() {
            channel.drive(pins, PinState::Low);
        }
    }

    pub(crate) fn clear(&mut self, pins: &mut impl PinSink) {
        self.force_low(pins);
        self.len = 0;
    }
}
