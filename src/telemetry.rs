//! Dashboard values. Subsystems push named values every tick; the HTTP side
//! serves the latest snapshot as JSON.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, RwLock};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Number(f64),
    String(String),
}

#[derive(Clone, Default)]
pub struct Telemetry {
    values: Arc<RwLock<HashMap<String, TelemetryValue>>>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire and forget. A poisoned store drops the write.
    pub fn put_number(&self, key: &str, value: f64) {
        self.put(key, TelemetryValue::Number(value));
    }

    pub fn put_string(&self, key: &str, value: impl Into<String>) {
        self.put(key, TelemetryValue::String(value.into()));
    }

    fn put(&self, key: &str, value: TelemetryValue) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_owned(), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<TelemetryValue> {
        self.values.read().ok()?.get(key).cloned()
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            TelemetryValue::Number(value) => Some(value),
            TelemetryValue::String(_) => None,
        }
    }

    pub fn snapshot(&self) -> HashMap<String, TelemetryValue> {
        self.values
            .read()
            .map(|values| values.clone())
            .unwrap_or_default()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/telemetry", get(all))
            .route("/telemetry/:key", get(one))
            .with_state(self.clone())
    }

    pub fn addr(port: u16) -> SocketAddr {
        SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), port)
    }
}

async fn all(State(telemetry): State<Telemetry>) -> Json<HashMap<String, TelemetryValue>> {
    Json(telemetry.snapshot())
}

async fn one(
    State(telemetry): State<Telemetry>,
    Path(key): Path<String>,
) -> Result<Json<TelemetryValue>, StatusCode> {
    telemetry.get(&key).map(Json).ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_write_wins() {
        let telemetry = Telemetry::new();
        telemetry.put_number("Loop Rate", 49.);
        telemetry.put_number("Loop Rate", 50.);

        assert_eq!(telemetry.get_number("Loop Rate"), Some(50.));
        assert_eq!(telemetry.get_number("missing"), None);
    }

    #[test]
    fn clones_share_the_store() {
        let telemetry = Telemetry::new();
        let other = telemetry.clone();
        other.put_string("state", "IDLE");

        assert_eq!(
            telemetry.get("state"),
            Some(TelemetryValue::String("IDLE".to_owned()))
        );
        assert_eq!(telemetry.get_number("state"), None);
    }

    #[tokio::test]
    async fn handlers_serve_values() {
        let telemetry = Telemetry::new();
        telemetry.put_number("odo_x", 1.5);

        let Json(values) = all(State(telemetry.clone())).await;
        assert_eq!(values.get("odo_x"), Some(&TelemetryValue::Number(1.5)));

        let found = one(State(telemetry.clone()), Path("odo_x".to_owned())).await;
        assert!(matches!(found, Ok(Json(TelemetryValue::Number(v))) if v == 1.5));

        let missing = one(State(telemetry), Path("odo_y".to_owned())).await;
        assert_eq!(missing.err(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn numbers_serialize_bare() {
        let json = serde_json::to_string(&TelemetryValue::Number(2.)).unwrap();
        assert_eq!(json, "2.0");
    }
}
