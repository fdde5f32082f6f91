//! Request handling over the stored aggregate.

use crate::aggregate::Aggregate;
use crate::error::{CoordinatorError, Result};
use crate::store::AggregateStore;
use pagelens_core::{AggregateConfig, CoordinatorRequest, CoordinatorResponse};
use url::Url;

/// Storage key for the single aggregate record.
const AGGREGATE_KEY: &str = "aggregate";

/// Handles panel and scanner requests against the persisted aggregate.
///
/// Every request is load-modify-store over one record, so the coordinator
/// itself is stateless between requests and cheap to share.
#[derive(Debug, Clone)]
pub struct Coordinator {
    store: AggregateStore,
    config: AggregateConfig,
}

impl Coordinator {
    /// Create a coordinator over an opened store.
    #[must_use]
    pub fn new(store: AggregateStore, config: AggregateConfig) -> Self {
        Self { store, config }
    }

    /// Dispatch one request.
    pub async fn handle(&self, request: CoordinatorRequest) -> Result<CoordinatorResponse> {
        match request {
            CoordinatorRequest::RecordResult(payload) => {
                let mut aggregate = self.load_aggregate().await?;
                let new_values = aggregate.fold(&payload, self.config.history_max_entries);
                self.save_aggregate(&aggregate).await?;

                if new_values > 0 && self.config.notify_on_new_values {
                    tracing::info!(
                        new_values,
                        source = source_domain(&payload.source_url),
                        "new contact values recorded"
                    );
                }

                Ok(CoordinatorResponse::Recorded { new_values })
            }
            CoordinatorRequest::GetStats => {
                let aggregate = self.load_aggregate().await?;
                Ok(CoordinatorResponse::Stats(aggregate.stats()))
            }
            CoordinatorRequest::ClearData => {
                self.store.delete(AGGREGATE_KEY).await?;
                tracing::info!("aggregate data cleared");
                Ok(CoordinatorResponse::Cleared)
            }
        }
    }

    async fn load_aggregate(&self) -> Result<Aggregate> {
        match self.store.get(AGGREGATE_KEY).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| CoordinatorError::Serialization(e.to_string())),
            None => Ok(Aggregate::default()),
        }
    }

    async fn save_aggregate(&self, aggregate: &Aggregate) -> Result<()> {
        let value = serde_json::to_value(aggregate)
            .map_err(|e| CoordinatorError::Serialization(e.to_string()))?;
        self.store.set(AGGREGATE_KEY, &value).await
    }
}

/// Host part of the scanned page's URL, for log lines and notifications.
fn source_domain(source_url: &str) -> String {
    Url::parse(source_url)
        .ok()
        .and_then(|url| url.host_str().map(ToString::to_string))
        .unwrap_or_else(|| source_url.to_string())
}
