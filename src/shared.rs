use crate::config::PwmConfig;
use crate::pin::PinSink;
use crate::registry::Registry;
use crate::tick::{TickEvent, TickSource};
use crate::{ChannelId, InstanceId, PinId, Result};
use core::cell::RefCell;
use critical_section::Mutex;

/// [`Registry`] behind a critical section, so it can be placed in a `static`
/// and driven from both the timer interrupt and application code.
///
/// ```ignore
/// static PWM: SharedRegistry<BoardTimers, BoardPins> =
///     SharedRegistry::new(BoardTimers::new(), BoardPins::new());
///
/// #[interrupt]
/// fn TIM2() {
///     PWM.on_tick(0, TickEvent::TickRewind);
/// }
/// ```
pub struct SharedRegistry<T: TickSource, P> {
    inner: Mutex<RefCell<Registry<T, P>>>,
}

impl<T: TickSource, P: PinSink> SharedRegistry<T, P> {
    #[must_use]
    pub const fn new(ticks: T, pins: P) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Registry::new(ticks, pins))),
        }
    }

    /// Runs `f` with exclusive access to the registry.
    pub fn with<R>(&self, f: impl FnOnce(&mut Registry<T, P>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    pub fn request(&self, index: InstanceId) -> Result<()> {
        self.with(|registry| registry.request(index))
    }

    pub fn release(&self, index: InstanceId) -> Result<()> {
        self.with(|registry| registry.release(index))
    }

    pub fn setup(&self, index: InstanceId, config: &PwmConfig) -> Result<()> {
        self.with(|registry| registry.setup(index, config))
    }

    pub fn setup_pins(&self, index: InstanceId, period: u32, ids: &[PinId]) -> Result<()> {
        self.with(|registry| registry.setup_pins(index, period, ids))
    }

    pub fn reset(&self, index: InstanceId) -> Result<()> {
        self.with(|registry| registry.reset(index))
    }

    pub fn get(&self, index: InstanceId, channel: ChannelId) -> Result<u8> {
        self.with(|registry| registry.get(index, channel))
    }

    pub fn set(&self, index: InstanceId, channel: ChannelId, duty: u8) -> Result<()> {
        self.with(|registry| registry.set(index, channel, duty))
    }

    pub fn on_tick(&self, index: InstanceId, event: TickEvent) {
        self.with(|registry| registry.on_tick(index, event));
    }
}
