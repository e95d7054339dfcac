use crate::{
    DEFAULT_PERIOD, DUTY_FULL, FULL_RESOLUTION_PERIOD, MAX_CHANNELS, MIN_PERIOD, PinId, PwmError,
    Result, SHORT_PERIOD_INTERVAL,
};
use arrayvec::ArrayVec;
use core::marker::PhantomData;

/// Tick rate and duty resolution derived from a requested period.
///
/// A logical period always spans [`DUTY_FULL`] duty units. Long periods
/// advance the counter by one unit per tick. Short periods keep the timer at
/// [`SHORT_PERIOD_INTERVAL`] and advance by several units per tick instead,
/// trading duty resolution for a bounded interrupt rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    pub step: u8,
    pub tick_interval: u32,
}

impl Timing {
    pub fn from_period(period: u32) -> Result<Self> {
        if period >= FULL_RESOLUTION_PERIOD {
            Ok(Self {
                step: 1,
                tick_interval: period / u32::from(DUTY_FULL),
            })
        } else if period >= MIN_PERIOD {
            // period >= MIN_PERIOD keeps the step at or below 100
            Ok(Self {
                step: (FULL_RESOLUTION_PERIOD / period) as u8,
                tick_interval: SHORT_PERIOD_INTERVAL,
            })
        } else {
            Err(PwmError::InvalidArgument)
        }
    }

    /// Number of distinguishable duty levels.
    #[must_use]
    pub fn levels(&self) -> u8 {
        DUTY_FULL / self.step
    }
}

/// Instance configuration: the period and the pins of every channel, in
/// channel order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PwmConfig {
    pub period: u32,
    pub pins: ArrayVec<PinId, MAX_CHANNELS>,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            pins: ArrayVec::new(),
        }
    }
}

impl PwmConfig {
    #[must_use]
    pub fn builder() -> PwmConfigBuilder<PwmConfigEmptyBuildState> {
        PwmConfigBuilder::new()
    }

    pub fn timing(&self) -> Result<Timing> {
        Timing::from_period(self.period)
    }
}

pub struct PwmConfigEmptyBuildState {}
pub struct PwmConfigChannelsBuildState {}

pub struct PwmConfigBuilder<T> {
    period: u32,
    pins: ArrayVec<PinId, MAX_CHANNELS>,
    _phantom: PhantomData<T>,
}

impl<T> PwmConfigBuilder<T> {
    pub fn period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    pub fn channel(mut self, pin: PinId) -> Result<PwmConfigBuilder<PwmConfigChannelsBuildState>> {
        self.pins
            .try_push(pin)
            .map_err(|_| PwmError::InvalidArgument)?;

        Ok(PwmConfigBuilder {
            period: self.period,
            pins: self.pins,
            _phantom: PhantomData,
        })
    }

    pub fn channels(
        mut self,
        pins: &[PinId],
    ) -> Result<PwmConfigBuilder<PwmConfigChannelsBuildState>> {
        if pins.is_empty() {
            return Err(PwmError::InvalidArgument);
        }

        self.pins
            .try_extend_from_slice(pins)
            .map_err(|_| PwmError::InvalidArgument)?;

        Ok(PwmConfigBuilder {
            period: self.period,
            pins: self.pins,
            _phantom: PhantomData,
        })
    }
}

impl PwmConfigBuilder<PwmConfigEmptyBuildState> {
    pub(crate) fn new() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            pins: ArrayVec::new(),
            _phantom: PhantomData,
        }
    }
}

impl PwmConfigBuilder<PwmConfigChannelsBuildState> {
    pub fn build(self) -> Result<PwmConfig> {
        Timing::from_period(self.period)?;

        Ok(PwmConfig {
            period: self.period,
            pins: self.pins,
        })
    }
}
