#![allow(dead_code)]

use spwm_mux::{InstanceId, MAX_INSTANCES, PinId, PinSink, PinState, TickSource};

pub const PIN_COUNT: usize = 32;

pub struct MockTicks {
    pub fail_bind: bool,
    pub fail_start: bool,
    pub bound: [bool; MAX_INSTANCES],
    pub intervals: [Option<u32>; MAX_INSTANCES],
    pub destroyed: [bool; MAX_INSTANCES],
}

impl MockTicks {
    pub const fn new() -> Self {
        Self {
            fail_bind: false,
            fail_start: false,
            bound: [false; MAX_INSTANCES],
            intervals: [None; MAX_INSTANCES],
            destroyed: [false; MAX_INSTANCES],
        }
    }
}

impl TickSource for MockTicks {
    type Handle = InstanceId;
    type Error = ();

    fn bind(&mut self, instance: InstanceId) -> Result<Self::Handle, Self::Error> {
        if self.fail_bind {
            return Err(());
        }

        self.bound[instance] = true;
        self.destroyed[instance] = false;
        Ok(instance)
    }

    fn start(&mut self, handle: Self::Handle, interval: u32) -> Result<(), Self::Error> {
        if self.fail_start {
            return Err(());
        }

        self.intervals[handle] = Some(interval);
        Ok(())
    }

    fn stop(&mut self, handle: Self::Handle) -> Result<(), Self::Error> {
        self.intervals[handle] = None;
        Ok(())
    }

    fn destroy(&mut self, handle: Self::Handle) -> Result<(), Self::Error> {
        self.intervals[handle] = None;
        self.bound[handle] = false;
        self.destroyed[handle] = true;
        Ok(())
    }
}

pub struct MockPins {
    pub levels: [PinState; PIN_COUNT],
    pub writes: usize,
}

impl MockPins {
    pub const fn new() -> Self {
        Self {
            levels: [PinState::Low; PIN_COUNT],
            writes: 0,
        }
    }

    pub fn is_high(&self, pin: PinId) -> bool {
        self.levels[usize::from(pin)] == PinState::High
    }
}

impl PinSink for MockPins {
    fn set_pin(&mut self, pin: PinId, state: PinState) {
        self.levels[usize::from(pin)] = state;
        self.writes += 1;
    }
}
