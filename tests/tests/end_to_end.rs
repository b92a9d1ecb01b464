use chrono::{DateTime, TimeZone, Utc};
use dockwatch::types::Frequency;
use dockwatch::{
    Filter, IngestionScheduler, PipelineOutcome, Snapshots, StationFetcher, WeatherFetcher,
};
use dockwatch_server::run_server;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn feature(kiosk_id: u32, bikes: u32) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [-75.16374, 39.95378] },
        "properties": {
            "kioskId": kiosk_id,
            "name": format!("Kiosk {kiosk_id}"),
            "totalDocks": 25,
            "docksAvailable": 25 - bikes,
            "bikesAvailable": bikes,
            "addressStreet": "1401 John F. Kennedy Blvd.",
            "addressCity": "Philadelphia",
            "addressState": "PA",
            "addressZipCode": "19102",
            "latitude": 39.95378,
            "longitude": -75.16374,
            "kioskStatus": "FullService"
        }
    })
}

fn weather_body(temp: f64) -> Value {
    json!({
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "main": { "temp": temp, "feels_like": temp - 1.5, "humidity": 80 },
        "clouds": { "all": 90 },
        "wind": { "speed": 3.6, "deg": 200 },
        "rain": { "1h": 0.3 },
        "name": "Philadelphia"
    })
}

async fn providers(stations: ResponseTemplate, weather: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stations/json/"))
        .respond_with(stations)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "integration-key"))
        .respond_with(weather)
        .mount(&server)
        .await;
    server
}

fn scheduler(server: &MockServer, snapshots: &Snapshots) -> IngestionScheduler {
    let client = reqwest::Client::new();
    IngestionScheduler::new(
        Arc::new(StationFetcher::new(
            client.clone(),
            format!("{}/stations/json/", server.uri()),
        )),
        Arc::new(WeatherFetcher::new(client, server.uri(), "integration-key")),
        snapshots.clone(),
    )
}

fn hour(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

#[tokio::test]
async fn test_ingest_persist_reopen_and_query() -> anyhow::Result<()> {
    init_logging();
    let dir = tempdir()?;
    let server = providers(
        ResponseTemplate::new(200)
            .set_body_json(json!({ "features": [feature(3004, 10), feature(3005, 3)] })),
        ResponseTemplate::new(200).set_body_json(weather_body(4.0)),
    )
    .await;

    {
        let snapshots = Snapshots::open(dir.path())?;
        let scheduler = scheduler(&server, &snapshots);
        for day in 1..=3 {
            for h in [6, 12, 18] {
                let report = scheduler.fire(hour(day, h)).await;
                assert_eq!(report.stations.stored(), Some(2));
                assert_eq!(report.weather.stored(), Some(1));
            }
        }
    }

    let snapshots = Snapshots::open(dir.path())?;
    assert_eq!(snapshots.stations().len()?, 18);
    assert_eq!(snapshots.weather().len()?, 9);

    let stations = snapshots.station_resolver();
    let at = stations
        .resolve_at(
            Utc.with_ymd_and_hms(2024, 1, 2, 12, 41, 7).unwrap(),
            &[Filter::KioskId(3005)],
        )?
        .expect("station stored at 12:00");
    assert_eq!(at.timestamp, hour(2, 12));
    assert_eq!(at.bikes_available, 3);

    let daily = stations.resolve_range(
        hour(1, 0),
        Utc.with_ymd_and_hms(2024, 1, 3, 23, 0, 0).unwrap(),
        Frequency::Daily,
        &[Filter::KioskId(3004)],
    )?;
    let days: Vec<DateTime<Utc>> = daily.iter().map(|s| s.timestamp).collect();
    assert_eq!(days, vec![hour(1, 6), hour(2, 6), hour(3, 6)]);

    let weather = snapshots
        .weather_resolver()
        .resolve_range(hour(1, 0), hour(3, 23), None::<&str>, &[])?;
    assert_eq!(weather.len(), 9);
    assert_eq!(weather[0].conditions.description, "light rain");
    assert_eq!(weather[0].rain.one_hour, Some(0.3));
    Ok(())
}

#[tokio::test]
async fn test_empty_station_feed_does_not_block_weather() -> anyhow::Result<()> {
    init_logging();
    let server = providers(
        ResponseTemplate::new(200).set_body_json(json!({ "features": [] })),
        ResponseTemplate::new(200).set_body_json(weather_body(-2.0)),
    )
    .await;
    let snapshots = Snapshots::memory();

    let report = scheduler(&server, &snapshots).fire(hour(10, 9)).await;

    match &report.stations {
        PipelineOutcome::Failed(e) => {
            assert!(e.to_string().starts_with("Couldn't find any station information"))
        }
        other => panic!("expected station failure, got {other:?}"),
    }
    assert_eq!(report.weather.stored(), Some(1));
    assert!(snapshots.stations().is_empty()?);
    Ok(())
}

#[tokio::test]
async fn test_rejected_weather_does_not_block_stations() -> anyhow::Result<()> {
    init_logging();
    let server = providers(
        ResponseTemplate::new(200).set_body_json(json!({ "features": [feature(3010, 7)] })),
        ResponseTemplate::new(401)
            .set_body_json(json!({ "cod": 401, "message": "Invalid API key" })),
    )
    .await;
    let snapshots = Snapshots::memory();

    let report = scheduler(&server, &snapshots).fire(hour(10, 9)).await;

    assert_eq!(report.stations.stored(), Some(1));
    match &report.weather {
        PipelineOutcome::Failed(e) => assert!(e.to_string().contains("responded with: 401")),
        other => panic!("expected weather failure, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_http_api_over_ingested_history() -> anyhow::Result<()> {
    init_logging();
    let server = providers(
        ResponseTemplate::new(200).set_body_json(json!({ "features": [feature(3004, 10)] })),
        ResponseTemplate::new(200).set_body_json(weather_body(12.5)),
    )
    .await;
    let snapshots = Snapshots::memory();
    let scheduler = scheduler(&server, &snapshots);
    scheduler.fire(hour(1, 8)).await;
    scheduler.fire(hour(1, 9)).await;
    scheduler.fire(hour(2, 8)).await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let api = {
        let snapshots = snapshots.clone();
        tokio::spawn(async move {
            run_server(listener, &snapshots, async {
                let _ = stop_rx.await;
            })
            .await
        })
    };

    let base = format!("http://{addr}/api/v1/stations");
    let client = reqwest::Client::new();

    let body: Value = client
        .get(&base)
        .query(&[("at", "2024-01-01T09:30:00")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["at"], "2024-01-01T09:00:00Z");
    assert_eq!(body["weather"]["main"]["feelsLike"], 11.0);
    assert_eq!(body["stations"][0]["address"]["zip"], "19102");

    let body: Value = client
        .get(format!("{base}/3004"))
        .query(&[
            ("from", "2024-01-01T00:00:00Z"),
            ("to", "2024-01-02T23:59:59Z"),
            ("frequency", "daily"),
        ])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["stations"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["weather"].as_array().map(Vec::len), Some(2));

    let missing = client
        .get(format!("{base}/4242"))
        .query(&[("at", "2024-01-01T08:00:00Z")])
        .send()
        .await?;
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    let _ = stop_tx.send(());
    api.await??;
    Ok(())
}
