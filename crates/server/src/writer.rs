use dockwatch::{HourlySchedule, IngestionScheduler};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Run the hourly ingestion loop on the runtime until `stop` flips to `true`
/// (or its sender is dropped).
///
/// With `run_on_start` a firing stamped with the current time happens before
/// the first scheduled tick, unless the current hour is already in the store.
pub fn spawn_ingestion(
    scheduler: Arc<IngestionScheduler>,
    schedule: HourlySchedule,
    run_on_start: bool,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if run_on_start {
            match scheduler.catch_up().await {
                Ok(Some(report)) => tracing::info!(
                    stations = ?report.stations.stored(),
                    weather = ?report.weather.stored(),
                    "Initial ingestion finished"
                ),
                Ok(None) => tracing::info!("Current hour already ingested"),
                Err(e) => tracing::error!("Couldn't check for an ingested hour: {}", e),
            }
        }

        let shutdown = async move {
            // An error means the sender is gone, which also means stop.
            let _ = stop.wait_for(|stopped| *stopped).await;
        };
        scheduler.run(schedule, shutdown).await;
        tracing::info!("Ingestion worker shutting down");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockwatch::Snapshots;
    use dockwatch::error::FetchError;
    use dockwatch::fetch::Fetcher;
    use dockwatch::types::{SnapshotKind, StationProperties, WeatherObservation};

    struct Unreachable;

    #[async_trait::async_trait]
    impl Fetcher for Unreachable {
        type Output = Vec<StationProperties>;

        fn kind(&self) -> SnapshotKind {
            SnapshotKind::Station
        }

        async fn fetch(&self) -> Result<Self::Output, FetchError> {
            Err(FetchError::RemoteUnreachable {
                url: "http://stations.invalid".into(),
                reason: "connection refused".into(),
            })
        }
    }

    struct Calm;

    #[async_trait::async_trait]
    impl Fetcher for Calm {
        type Output = WeatherObservation;

        fn kind(&self) -> SnapshotKind {
            SnapshotKind::Weather
        }

        async fn fetch(&self) -> Result<Self::Output, FetchError> {
            Ok(WeatherObservation {
                name: "Philadelphia".into(),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_run_on_start_then_stop() {
        let snapshots = Snapshots::memory();
        let scheduler = Arc::new(IngestionScheduler::new(
            Arc::new(Unreachable),
            Arc::new(Calm),
            snapshots.clone(),
        ));
        let (stop_tx, stop_rx) = watch::channel(false);

        let worker = spawn_ingestion(scheduler, HourlySchedule::default(), true, stop_rx);
        while snapshots.weather().is_empty().unwrap() {
            tokio::task::yield_now().await;
        }
        stop_tx.send(true).unwrap();
        worker.await.unwrap();

        assert_eq!(snapshots.weather().len().unwrap(), 1);
        assert!(snapshots.stations().is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_dropping_sender_stops_worker() {
        let scheduler = Arc::new(IngestionScheduler::new(
            Arc::new(Unreachable),
            Arc::new(Calm),
            Snapshots::memory(),
        ));
        let (stop_tx, stop_rx) = watch::channel(false);

        let worker = spawn_ingestion(scheduler, HourlySchedule::default(), false, stop_rx);
        drop(stop_tx);
        worker.await.unwrap();
    }
}
