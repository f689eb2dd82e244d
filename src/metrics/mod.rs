use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::Encoder;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use tokio::sync::watch;
use tracing::error;
use tracing::info;
use warp::Filter;
use warp::Rejection;
use warp::Reply;

lazy_static! {
    pub static ref STATE_TRANSITIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("lock_state_transitions", "Lock state machine transitions"),
        &["from", "to"]
    )
    .expect("metric can not be created");

    pub static ref REQUEST_REJECTIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("lock_request_rejections", "Claim and release requests refused"),
        &["reason"]
    )
    .expect("metric can not be created");

    pub static ref STORE_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("lock_store_failures", "Failed ownership store operations"),
        &["op"]
    )
    .expect("metric can not be created");

    pub static ref TAMPER_ALARM: IntGauge =
        IntGauge::new("lock_tamper_alarm", "1 while the tamper alarm is asserted")
            .expect("metric can not be created");

    pub static ref SENSOR_EDGES_DROPPED: IntCounter = IntCounter::new(
        "lock_sensor_edges_dropped",
        "Sensor edges dropped because the event queue was full"
    )
    .expect("metric can not be created");

    pub static ref SENSOR_EDGES_DEBOUNCED: IntCounter = IntCounter::new(
        "lock_sensor_edges_debounced",
        "Sensor edges discarded inside the quiet period"
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

static REGISTER: Once = Once::new();

fn register_custom_metrics(registry: &Registry) {
    registry
        .register(Box::new(STATE_TRANSITIONS.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(REQUEST_REJECTIONS.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(STORE_FAILURES.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(TAMPER_ALARM.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(SENSOR_EDGES_DROPPED.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(SENSOR_EDGES_DEBOUNCED.clone()))
        .expect("collector can be registered");
}

/// Registers the lock collectors with [`REGISTRY`]. Safe to call repeatedly.
pub fn init_metrics() {
    REGISTER.call_once(|| register_custom_metrics(&REGISTRY));
}

pub async fn start_server(
    port: u16,
    mut shutdown_signal: watch::Receiver<()>,
) {
    init_metrics();

    let metrics_route = warp::path!("metrics").and_then(metrics_handler);

    info!("metrics endpoint listening on 0.0.0.0:{}", port);
    let (_, server) = warp::serve(metrics_route).bind_with_graceful_shutdown(([0, 0, 0, 0], port), async move {
        let _ = shutdown_signal.changed().await;
    });
    server.await;
}

async fn metrics_handler() -> Result<impl Reply, Rejection> {
    Ok(gather_text())
}

/// Text exposition of every registered lock metric.
pub fn gather_text() -> String {
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("could not encode lock metrics: {}", e);
    }
    match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            error!("lock metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    }
}
