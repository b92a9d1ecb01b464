use super::schedule::HourlySchedule;
use crate::clock::{Clock, SystemClock};
use crate::compute::temporal::HourPredicate;
use crate::error::{DockwatchError, Result};
use crate::fetch::Fetcher;
use crate::storage::Snapshots;
use crate::timing::Timing;
use chrono::{DateTime, Utc};
use dockwatch_types::{
    SnapshotKind, StationProperties, StationSnapshot, WeatherObservation, WeatherSnapshot,
};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

pub type StationSource = Arc<dyn Fetcher<Output = Vec<StationProperties>>>;
pub type WeatherSource = Arc<dyn Fetcher<Output = WeatherObservation>>;

/// In-memory state of the scheduler; nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// What one pipeline did during a firing.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Number of snapshots written.
    Stored(usize),
    Failed(DockwatchError),
    /// Another firing was in progress.
    Skipped,
}

impl PipelineOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, PipelineOutcome::Stored(_))
    }

    pub fn stored(&self) -> Option<usize> {
        match self {
            PipelineOutcome::Stored(count) => Some(*count),
            _ => None,
        }
    }
}

/// Result of one firing, one outcome per pipeline.
#[derive(Debug)]
pub struct FiringReport {
    pub fired_at: DateTime<Utc>,
    pub stations: PipelineOutcome,
    pub weather: PipelineOutcome,
}

impl FiringReport {
    fn skipped(fired_at: DateTime<Utc>) -> Self {
        Self {
            fired_at,
            stations: PipelineOutcome::Skipped,
            weather: PipelineOutcome::Skipped,
        }
    }

    pub fn was_skipped(&self) -> bool {
        matches!(self.stations, PipelineOutcome::Skipped)
            && matches!(self.weather, PipelineOutcome::Skipped)
    }
}

/// Hourly fetch, stamp and store of both datasets.
///
/// The two pipelines run one after the other. A failure in one is logged and
/// never prevents the other from running; there is no retry within a firing.
pub struct IngestionScheduler {
    stations: StationSource,
    weather: WeatherSource,
    snapshots: Snapshots,
    timing: Timing,
    clock: Arc<dyn Clock>,
    state: Mutex<SchedulerState>,
    /// Latest instant a firing started for; `run` never fires at or before it.
    last_fired: Mutex<Option<DateTime<Utc>>>,
}

/// Returns the scheduler to `Idle` when the firing ends, however it ends.
struct RunningGuard<'a> {
    state: &'a Mutex<SchedulerState>,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = SchedulerState::Idle;
    }
}

impl IngestionScheduler {
    pub fn new(stations: StationSource, weather: WeatherSource, snapshots: Snapshots) -> Self {
        Self {
            stations,
            weather,
            snapshots,
            timing: Timing::new(),
            clock: Arc::new(SystemClock),
            state: Mutex::new(SchedulerState::Idle),
            last_fired: Mutex::new(None),
        }
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    pub fn last_fired(&self) -> Option<DateTime<Utc>> {
        *self.last_fired.lock()
    }

    fn begin(&self) -> Option<RunningGuard<'_>> {
        let mut state = self.state.lock();
        if *state == SchedulerState::Running {
            return None;
        }
        *state = SchedulerState::Running;
        Some(RunningGuard { state: &self.state })
    }

    /// Run one firing stamped with the injected clock's current time.
    pub async fn fire_now(&self) -> FiringReport {
        self.fire(self.clock.now()).await
    }

    /// Fire now unless the current hour already holds snapshots of either
    /// kind, as after a restart within an hour that was already ingested.
    ///
    /// Returns `None` when the firing was not needed.
    pub async fn catch_up(&self) -> Result<Option<FiringReport>> {
        let now = self.clock.now();
        let hour = HourPredicate::of(now);
        let ingested = !self.snapshots.stations().find_exact(&hour, &[])?.is_empty()
            || !self.snapshots.weather().find_exact(&hour, &[])?.is_empty();
        if ingested {
            log::info!(
                "Hour of {} already ingested, not firing on start",
                now.to_rfc3339()
            );
            *self.last_fired.lock() = Some(now);
            return Ok(None);
        }
        Ok(Some(self.fire(now).await))
    }

    /// Run one firing; every stored snapshot is stamped with `fired_at`.
    pub async fn fire(&self, fired_at: DateTime<Utc>) -> FiringReport {
        let Some(_running) = self.begin() else {
            log::warn!(
                "Ingestion already running, skipping firing at {}",
                fired_at.to_rfc3339()
            );
            return FiringReport::skipped(fired_at);
        };
        {
            let mut last = self.last_fired.lock();
            *last = Some(last.map_or(fired_at, |prev| prev.max(fired_at)));
        }

        log::info!(
            "Updating stations and weather info for {}",
            fired_at.to_rfc3339()
        );

        let stations = self
            .timing
            .measure_async("update_stations", Self::update_stations, self, fired_at)
            .await;
        let stations = settle(SnapshotKind::Station, fired_at, stations);

        let weather = self
            .timing
            .measure_async("update_weather", Self::update_weather, self, fired_at)
            .await;
        let weather = settle(SnapshotKind::Weather, fired_at, weather);

        log::info!(
            "Firing at {} finished: stations {:?}, weather {:?}",
            fired_at.to_rfc3339(),
            stations.stored(),
            weather.stored()
        );

        FiringReport {
            fired_at,
            stations,
            weather,
        }
    }

    async fn update_stations(&self, fired_at: DateTime<Utc>) -> Result<usize> {
        let stations = self.stations.fetch().await?;
        let snapshots: Vec<StationSnapshot> = stations
            .into_iter()
            .map(|props| StationSnapshot::stamp(props, fired_at))
            .collect();
        Ok(self.snapshots.stations().insert_many(snapshots)?)
    }

    async fn update_weather(&self, fired_at: DateTime<Utc>) -> Result<usize> {
        let observation = self.weather.fetch().await?;
        let snapshot = WeatherSnapshot::stamp(observation, fired_at);
        Ok(self.snapshots.weather().insert_many(vec![snapshot])?)
    }

    /// Fire at every tick of `schedule` until `shutdown` resolves.
    ///
    /// Each firing is stamped with its scheduled instant. A tick at or before
    /// the last firing is never fired again, even if the clock steps back. A
    /// firing in progress is allowed to finish before shutdown is observed.
    pub async fn run<F>(&self, schedule: HourlySchedule, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        log::info!(
            "Ingestion scheduled hourly in {}",
            schedule.timezone().name()
        );

        loop {
            let (next, wait) =
                schedule.until_next_unfired(self.clock.now(), self.last_fired());
            log::debug!("Next ingestion at {}", next.to_rfc3339());

            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("Ingestion scheduler stopping");
                    break;
                }
                _ = tokio::time::sleep(wait) => {
                    self.fire(next).await;
                }
            }
        }
    }
}

fn settle(kind: SnapshotKind, fired_at: DateTime<Utc>, result: Result<usize>) -> PipelineOutcome {
    match result {
        Ok(count) => {
            log::info!("Stored {count} {kind} snapshot(s) for {}", fired_at.to_rfc3339());
            PipelineOutcome::Stored(count)
        }
        Err(e) => {
            log::error!(
                "Problem updating {kind} information for {}: {e}",
                fired_at.to_rfc3339()
            );
            PipelineOutcome::Failed(e)
        }
    }
}
