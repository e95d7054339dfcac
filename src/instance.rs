use crate::channel::ChannelTable;
use crate::config::Timing;
use crate::pin::PinSink;
use crate::tick::TickEvent;
use crate::util::trace;
use crate::{ChannelId, DUTY_FULL, PinId, PinState, PwmError, Result};

/// Lifecycle of an instance between `request` and the destroy event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InstanceState {
    /// Bound to a timer, no channels configured yet
    Unconfigured,
    /// Channels configured and timer armed, waiting for it to start
    Configured,
    /// Timer running, pins are being driven
    Running,
    /// Timer stopped by a reset; the next start resumes with a fresh period
    Stopped,
    /// Timer destruction requested, waiting for [`TickEvent::Destroyed`]
    Releasing,
}

/// One software PWM engine: a channel table driven by one timer.
pub struct PwmInstance<H> {
    handle: H,
    state: InstanceState,
    channels: ChannelTable,
    step: u8,
    tick_interval: u32,
    counter: u16,
    min_active_duty: u8,
    active_count: u8,
}

impl<H: Copy> PwmInstance<H> {
    pub(crate) fn new(handle: H) -> Self {
        Self {
            handle,
            state: InstanceState::Unconfigured,
            channels: ChannelTable::new(),
            step: 0,
            tick_interval: 0,
            counter: 0,
            min_active_duty: DUTY_FULL,
            active_count: 0,
        }
    }

    pub(crate) fn handle(&self) -> H {
        self.handle
    }

    #[must_use]
    pub fn state(&self) -> InstanceState {
        self.state
    }

    #[must_use]
    pub fn channels(&self) -> &ChannelTable {
        &self.channels
    }

    /// Duty units the period counter advances per tick.
    #[must_use]
    pub fn step(&self) -> u8 {
        self.step
    }

    #[must_use]
    pub fn tick_interval(&self) -> u32 {
        self.tick_interval
    }

    /// Position within the current period, in duty units.
    #[must_use]
    pub fn counter(&self) -> u16 {
        self.counter
    }

    /// Lower bound of the duty of the channels still high in this period.
    #[must_use]
    pub fn min_active_duty(&self) -> u8 {
        self.min_active_duty
    }

    #[must_use]
    pub fn active_count(&self) -> u8 {
        self.active_count
    }

    /// Committed duty of `channel`.
    pub fn duty(&self, channel: ChannelId) -> Result<u8> {
        self.channels
            .get(channel)
            .map(|c| c.duty())
            .ok_or(PwmError::InvalidArgument)
    }

    /// Stores a pending duty for `channel`, applied at the next period.
    pub fn update_duty(&self, channel: ChannelId, duty: u8) -> Result<()> {
        self.channels
            .get(channel)
            .ok_or(PwmError::InvalidArgument)?
            .update_duty(duty);

        Ok(())
    }

    pub(crate) fn setup(
        &mut self,
        period: u32,
        ids: &[PinId],
        pins: &mut impl PinSink,
    ) -> Result<Timing> {
        if self.state == InstanceState::Releasing {
            return Err(PwmError::InvalidArgument);
        }

        let timing = Timing::from_period(period)?;
        self.channels.assign(ids, pins)?;

        self.step = timing.step;
        self.tick_interval = timing.tick_interval;
        // Forces a reload on the first tick
        self.counter = u16::from(DUTY_FULL);
        self.active_count = 0;
        self.min_active_duty = DUTY_FULL;
        self.state = InstanceState::Configured;

        Ok(timing)
    }

    /// Rolls back a setup whose timer could not be armed.
    pub(crate) fn unconfigure(&mut self, pins: &mut impl PinSink) {
        self.channels.clear(pins);
        self.step = 0;
        self.tick_interval = 0;
        self.counter = 0;
        self.active_count = 0;
        self.min_active_duty = DUTY_FULL;
        self.state = InstanceState::Unconfigured;
    }

    pub(crate) fn stop(&mut self) {
        if matches!(
            self.state,
            InstanceState::Configured | InstanceState::Running
        ) {
            self.state = InstanceState::Stopped;
        }
    }

    pub(crate) fn begin_release(&mut self) {
        self.state = InstanceState::Releasing;
    }

    pub(crate) fn on_event(&mut self, event: TickEvent, pins: &mut impl PinSink) {
        match (self.state, event) {
            (_, TickEvent::Destroyed) => self.channels.force_low(pins),
            (
                InstanceState::Configured | InstanceState::Stopped | InstanceState::Running,
                TickEvent::Started,
            ) => {
                self.reload(pins);
                self.state = InstanceState::Running;
            }
            // A freshly configured instance waits at the end of a period, so
            // its first tick reloads even if the timer was already running
            (InstanceState::Configured | InstanceState::Running, TickEvent::TickRewind) => {
                if self.counter < u16::from(DUTY_FULL - 1) {
                    self.invert(pins);
                } else {
                    self.reload(pins);
                    self.state = InstanceState::Running;
                }
            }
            (state, event) => trace!("Ignoring {} in state {}", event, state),
        }
    }

    /// Starts a new period: latches the pending duties and drives every
    /// channel with a nonzero duty high.
    fn reload(&mut self, pins: &mut impl PinSink) {
        self.counter = 0;
        self.active_count = 0;
        self.min_active_duty = DUTY_FULL;

        for channel in self.channels.iter_mut() {
            let duty = channel.latch();

            if duty == 0 {
                channel.drive(pins, PinState::Low);
            } else {
                channel.drive(pins, PinState::High);
                self.active_count += 1;
                self.min_active_duty = self.min_active_duty.min(duty);
            }
        }
    }

    /// Advances the period and drives low every channel whose duty has been
    /// reached. Channels are only scanned once the counter reaches the
    /// smallest duty still pending.
    fn invert(&mut self, pins: &mut impl PinSink) {
        self.counter += u16::from(self.step);

        if self.active_count == 0 || self.counter < u16::from(self.min_active_duty) {
            return;
        }

        let mut min_active_duty = DUTY_FULL;

        for channel in self.channels.iter_mut() {
            if self.active_count == 0 {
                break;
            }

            // Full duty channels stay high until the next reload
            let Some(duty) = channel.pending_invert() else {
                continue;
            };

            if u16::from(duty) <= self.counter {
                channel.drive(pins, PinState::Low);
                self.active_count -= 1;
            } else {
                min_active_duty = min_active_duty.min(duty);
            }
        }

        self.min_active_duty = min_active_duty;
        trace!(
            "Counter {}: {} channels high, next invert at {}",
            self.counter, self.active_count, self.min_active_duty
        );
    }
}
