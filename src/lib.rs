//! Software PWM multiplexed over a single periodic timer.
//!
//! Each [`PwmInstance`] drives up to [`MAX_CHANNELS`] output pins from one
//! [`TickSource`]. A logical period is always split into [`DUTY_FULL`] duty
//! units: every pin with a nonzero duty is driven high when the period
//! starts and low again once the period counter reaches its duty.
//!
//! Duty changes are double buffered. [`Registry::set`] only stores a pending
//! value which the engine latches at the next period boundary, so a change
//! requested mid-period never produces a truncated or stretched pulse.
#![no_std]
mod channel;
mod config;
mod instance;
mod pin;
mod registry;
mod shared;
mod tick;
mod util;

pub use channel::{Channel, ChannelTable};
pub use config::{
    PwmConfig, PwmConfigBuilder, PwmConfigChannelsBuildState, PwmConfigEmptyBuildState, Timing,
};
pub use embedded_hal::digital::PinState;
pub use instance::{InstanceState, PwmInstance};
pub use pin::{PinBank, PinSink};
pub use registry::Registry;
pub use shared::SharedRegistry;
pub use tick::{TickEvent, TickSource};

/// Number of instance slots in a [`Registry`].
pub const MAX_INSTANCES: usize = 4;

/// Number of channels a single instance can drive.
pub const MAX_CHANNELS: usize = 16;

/// Duty value rendering a channel high for the whole period.
///
/// Also the length of a logical period in duty units.
pub const DUTY_FULL: u8 = 200;

/// Period used when no other period was configured.
pub const DEFAULT_PERIOD: u32 = 20_000;

/// Shortest period that can be configured.
pub const MIN_PERIOD: u32 = 20;

/// Shortest period that still gets the full [`DUTY_FULL`] resolution.
pub const FULL_RESOLUTION_PERIOD: u32 = 2_000;

/// Timer interval used for periods below [`FULL_RESOLUTION_PERIOD`].
pub const SHORT_PERIOD_INTERVAL: u32 = 10;

/// Name the driver is registered under by device frameworks.
pub const DEVICE_NAME: &str = "pwm";

/// Identifier of an output pin.
pub type PinId = u8;

/// Index of an instance slot in a [`Registry`].
pub type InstanceId = usize;

/// Index of a channel within an instance.
pub type ChannelId = usize;

/// Errors that can occur during PWM operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// Bad instance or channel index, slot state conflict, empty or oversized
    /// channel list, or a period below [`MIN_PERIOD`]
    #[display("invalid argument")]
    InvalidArgument,
    /// The tick source could not bind a timer for a new instance
    #[display("resource exhausted")]
    ResourceExhausted,
    /// The tick source failed to start, stop or destroy its timer
    #[display("operation failed")]
    Failure,
}

pub type Result<T, E = PwmError> = core::result::Result<T, E>;
