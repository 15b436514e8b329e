//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define the dice metrics
//! - Expose a Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `dice.rolls` (counter): number of rolls, labelled by `roll.value`
//!
//! # Design Decisions
//! - One counter handle per face, registered once at startup
//! - Handles are atomic, so concurrent requests never lose increments
//! - Handles are bound to whichever recorder was active at registration,
//!   which lets tests register against a local recorder

use metrics::{Counter, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

use crate::dice::{Roll, FACES};

pub const ROLL_COUNTER: &str = "dice.rolls";
pub const ROLL_COUNTER_DESCRIPTION: &str = "The number of rolls by roll value";
pub const ROLL_VALUE_LABEL: &str = "roll.value";

/// Install the Prometheus exporter as the global recorder and start its
/// HTTP listener. Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Counter handles for `dice.rolls`, one per face.
#[derive(Clone)]
pub struct RollMetrics {
    rolls: [Counter; FACES as usize],
}

impl RollMetrics {
    /// Describe and register the roll counters on the current recorder.
    pub fn register() -> Self {
        metrics::describe_counter!(ROLL_COUNTER, Unit::Count, ROLL_COUNTER_DESCRIPTION);

        let rolls = std::array::from_fn(|i| {
            metrics::counter!(ROLL_COUNTER, ROLL_VALUE_LABEL => (i + 1).to_string())
        });
        Self { rolls }
    }

    /// Count one roll.
    pub fn record(&self, roll: Roll) {
        self.rolls[roll.index()].increment(1);
    }
}
