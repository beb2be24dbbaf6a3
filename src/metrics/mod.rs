use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::Encoder;
use prometheus::IntCounterVec;
use prometheus::IntGaugeVec;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;
use tracing::warn;

use crate::Result;

lazy_static! {
    pub static ref OBSERVATIONS_PROCESSED: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "history_observations_processed",
            "Number of observations rotated into history buffers"
        ),
        &["module"]
    )
    .expect("metric can not be created");

    pub static ref UNMATCHED_OBSERVATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "history_unmatched_observations",
            "Number of observations whose source is not monitored"
        ),
        &["module"]
    )
    .expect("metric can not be created");

    pub static ref MONITORED_VARIABLES: IntGaugeVec = IntGaugeVec::new(
        Opts::new(
            "history_monitored_variables",
            "Number of variables monitored by live history modules"
        ),
        &["module", "kind"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

static REGISTER: Once = Once::new();

/// Registers the history collectors on [`REGISTRY`]. Safe to call repeatedly.
pub fn register_custom_metrics() {
    REGISTER.call_once(|| {
        let collectors: [Box<dyn prometheus::core::Collector>; 3] = [
            Box::new(OBSERVATIONS_PROCESSED.clone()),
            Box::new(UNMATCHED_OBSERVATIONS.clone()),
            Box::new(MONITORED_VARIABLES.clone()),
        ];
        for collector in collectors {
            if let Err(e) = REGISTRY.register(collector) {
                warn!("collector can not be registered: {:?}", e);
            }
        }
    });
}

/// Renders every registered metric in the Prometheus text format
pub fn gather_metrics() -> Result<String> {
    register_custom_metrics();

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;

    String::from_utf8(buffer).map_err(|e| crate::Error::Fatal(format!("metrics are not valid UTF-8: {e}")))
}

#[cfg(test)]
mod metrics_test;
