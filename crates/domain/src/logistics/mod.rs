//! Logistics order aggregate and related types.

mod aggregate;
mod channel;
mod events;
mod state;

pub use aggregate::LogisticsOrder;
pub use channel::{LogisticsChannel, MeasureRange, Parcel, PriceRule};
pub use events::{
    LabelGeneratedData, LogisticsCompletedData, LogisticsOrderCreatedData,
    LogisticsStatusChangedData,
};
pub use state::LogisticsStatus;

use thiserror::Error;

use crate::value_objects::Money;

/// Errors that can occur during logistics operations.
#[derive(Debug, Error)]
pub enum LogisticsError {
    #[error("Logistics channel is required")]
    ChannelRequired,

    #[error("Invalid state transition: cannot move logistics order from {current} to {target}")]
    InvalidStateTransition {
        current: LogisticsStatus,
        target: LogisticsStatus,
    },

    #[error("Logistics order is closed ({status})")]
    Closed { status: LogisticsStatus },

    #[error("Invalid logistics fee: {fee}")]
    InvalidFee { fee: Money },

    #[error("Logistics channel {channel_id} is not configured")]
    UnknownChannel { channel_id: String },

    #[error("Logistics channel {channel_id} is inactive")]
    ChannelInactive { channel_id: String },

    #[error("Logistics channel {channel_id} does not ship to {country}")]
    UnsupportedCountry { channel_id: String, country: String },

    #[error("No price rule on {channel_id} for {weight_grams} g / {volume_cm3} cm3")]
    NoPriceRule {
        channel_id: String,
        weight_grams: u64,
        volume_cm3: u64,
    },
}
