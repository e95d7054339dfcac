use crate::InstanceId;

/// Events a [`TickSource`] delivers for a bound instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickEvent {
    /// The timer was started
    Started,
    /// One timer interval elapsed
    TickRewind,
    /// The timer was destroyed; the instance must be torn down
    Destroyed,
}

/// A periodic timer shared by all channels of one instance.
///
/// The platform forwards the events of a timer bound for `instance` to
/// [`Registry::on_tick`](crate::Registry::on_tick) with that same instance
/// index. Destruction may be asynchronous: [`TickSource::destroy`] only has to
/// arrange for [`TickEvent::Destroyed`] to be delivered eventually.
pub trait TickSource {
    type Handle: Copy;
    type Error: core::fmt::Debug;

    fn bind(&mut self, instance: InstanceId) -> Result<Self::Handle, Self::Error>;

    /// Starts (or restarts) the timer with `interval` in timer units.
    fn start(&mut self, handle: Self::Handle, interval: u32) -> Result<(), Self::Error>;

    fn stop(&mut self, handle: Self::Handle) -> Result<(), Self::Error>;

    fn destroy(&mut self, handle: Self::Handle) -> Result<(), Self::Error>;
}
