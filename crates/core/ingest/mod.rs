//! Scheduled ingestion: fetch, stamp with the firing instant, store.

mod schedule;
mod scheduler;

pub use schedule::HourlySchedule;
pub use scheduler::{
    FiringReport, IngestionScheduler, PipelineOutcome, SchedulerState, StationSource,
    WeatherSource,
};
