use crate::dates::{DateNormalizer, YearMonth};
use crate::models::MonthlySummary;
use crate::storage::{RecordSource, fetch_snapshot};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Holds the most recently published summary.
///
/// Every refresh takes a generation number before it starts fetching. A
/// refresh that finishes after a newer one has already been published keeps
/// its result to itself instead of replacing the newer summary.
#[derive(Debug, Default)]
pub struct SummaryBoard {
    issued: AtomicU64,
    published: RwLock<Option<Arc<MonthlySummary>>>,
}

impl SummaryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_generation(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns `false` when `summary` is older than what is already shown.
    pub async fn publish(&self, summary: Arc<MonthlySummary>) -> bool {
        let mut slot = self.published.write().await;
        if let Some(current) = slot.as_ref() {
            if current.generation >= summary.generation {
                debug!(
                    stale = summary.generation,
                    current = current.generation,
                    "dropping stale summary"
                );
                return false;
            }
        }
        *slot = Some(summary);
        true
    }

    pub async fn latest(&self) -> Option<Arc<MonthlySummary>> {
        self.published.read().await.clone()
    }

    /// Fetches fresh inputs and recomputes the summary for `month` from
    /// scratch. The caller always gets its own result back, published or not.
    pub async fn refresh<S: RecordSource>(
        &self,
        source: &S,
        feeds: &[String],
        month: YearMonth,
        normalizer: &DateNormalizer,
    ) -> Arc<MonthlySummary> {
        let generation = self.next_generation();
        let snapshot = fetch_snapshot(source, feeds).await;
        let summary = Arc::new(snapshot.summarize(month, normalizer, generation));

        if self.publish(Arc::clone(&summary)).await {
            info!(
                %month,
                generation,
                rows = summary.rows.len(),
                "published summary"
            );
        }
        summary
    }
}
