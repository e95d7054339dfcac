use crate::config::PwmConfig;
use crate::instance::{InstanceState, PwmInstance};
use crate::pin::PinSink;
use crate::tick::{TickEvent, TickSource};
use crate::util::{debug, error, info, trace, warn};
use crate::{ChannelId, InstanceId, MAX_INSTANCES, PinId, PwmError, Result};

/// Fixed table of [`MAX_INSTANCES`] PWM instance slots sharing one tick
/// source and one pin sink.
///
/// Exposes the generic driver operations (`request`, `release`, `setup`,
/// `reset`, `get`, `set`) by instance index, and [`Registry::on_tick`] for the
/// timer events.
pub struct Registry<T: TickSource, P> {
    ticks: T,
    pins: P,
    slots: [Option<PwmInstance<T::Handle>>; MAX_INSTANCES],
}

impl<T: TickSource, P: PinSink> Registry<T, P> {
    #[must_use]
    pub const fn new(ticks: T, pins: P) -> Self {
        Self {
            ticks,
            pins,
            slots: [const { None }; MAX_INSTANCES],
        }
    }

    /// Binds a timer to the empty slot `index`.
    pub fn request(&mut self, index: InstanceId) -> Result<()> {
        let slot = self.slots.get_mut(index).ok_or(PwmError::InvalidArgument)?;

        if slot.is_some() {
            return Err(PwmError::InvalidArgument);
        }

        let handle = self.ticks.bind(index).map_err(|_| {
            warn!("Failed to bind timer for instance {}", index);
            PwmError::ResourceExhausted
        })?;

        *slot = Some(PwmInstance::new(handle));
        info!("PWM instance {} requested", index);

        Ok(())
    }

    /// Requests destruction of the instance timer. The slot is freed once
    /// the tick source delivers [`TickEvent::Destroyed`].
    pub fn release(&mut self, index: InstanceId) -> Result<()> {
        let instance = self
            .slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(PwmError::InvalidArgument)?;

        if instance.state() == InstanceState::Releasing {
            return Err(PwmError::InvalidArgument);
        }

        if self.ticks.destroy(instance.handle()).is_err() {
            error!("Failed to destroy timer of instance {}", index);
            return Err(PwmError::Failure);
        }

        instance.begin_release();
        info!("PWM instance {} releasing", index);

        Ok(())
    }

    /// Configures the instance from `config` and arms its timer.
    pub fn setup(&mut self, index: InstanceId, config: &PwmConfig) -> Result<()> {
        self.setup_pins(index, config.period, &config.pins)
    }

    /// Configures `ids.len()` channels driving the given pins with `period`
    /// and arms the instance timer.
    pub fn setup_pins(&mut self, index: InstanceId, period: u32, ids: &[PinId]) -> Result<()> {
        let instance = self
            .slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(PwmError::InvalidArgument)?;

        let timing = instance.setup(period, ids, &mut self.pins)?;
        debug!(
            "PWM instance {}: {} channels, step {}, interval {}",
            index,
            ids.len(),
            timing.step,
            timing.tick_interval
        );

        if self.ticks.start(instance.handle(), timing.tick_interval).is_err() {
            error!("Failed to start timer of instance {}", index);
            instance.unconfigure(&mut self.pins);
            return Err(PwmError::Failure);
        }

        Ok(())
    }

    /// Stops the instance timer. Channel configuration and duties are kept.
    pub fn reset(&mut self, index: InstanceId) -> Result<()> {
        let instance = self
            .slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(PwmError::InvalidArgument)?;

        if instance.state() == InstanceState::Releasing {
            return Err(PwmError::InvalidArgument);
        }

        if self.ticks.stop(instance.handle()).is_err() {
            error!("Failed to stop timer of instance {}", index);
            return Err(PwmError::Failure);
        }

        instance.stop();
        debug!("PWM instance {} stopped", index);

        Ok(())
    }

    /// Duty currently rendered by `channel`.
    pub fn get(&self, index: InstanceId, channel: ChannelId) -> Result<u8> {
        self.instance(index)
            .ok_or(PwmError::InvalidArgument)?
            .duty(channel)
    }

    /// Requests a new duty for `channel`; it takes effect at the next period.
    pub fn set(&self, index: InstanceId, channel: ChannelId, duty: u8) -> Result<()> {
        self.instance(index)
            .ok_or(PwmError::InvalidArgument)?
            .update_duty(channel, duty)
    }

    /// Timer event handler for the instance bound at `index`.
    ///
    /// Events for empty or out of range slots are ignored.
    pub fn on_tick(&mut self, index: InstanceId, event: TickEvent) {
        let Some(slot) = self.slots.get_mut(index) else {
            trace!("Event {} for invalid instance {}", event, index);
            return;
        };
        let Some(instance) = slot.as_mut() else {
            trace!("Event {} for free instance {}", event, index);
            return;
        };

        instance.on_event(event, &mut self.pins);

        if event == TickEvent::Destroyed {
            *slot = None;
            info!("PWM instance {} destroyed", index);
        }
    }

    #[must_use]
    pub fn instance(&self, index: InstanceId) -> Option<&PwmInstance<T::Handle>> {
        self.slots.get(index)?.as_ref()
    }

    #[must_use]
    pub fn is_free(&self, index: InstanceId) -> bool {
        self.slots.get(index).is_some_and(Option::is_none)
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn ticks_mut(&mut self) -> &mut T {
        &mut self.ticks
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }

    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }
}
