use std::time::Duration;

use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Counters {
    pub total: u64,
    pub total_time: Duration,
    pub max_time: Duration,
}

/// Running response-latency statistics shared by every connection.
#[derive(Debug, Default)]
pub struct StatsCollector {
    inner: RwLock<Counters>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, elapsed: Duration) {
        let mut stats = self.inner.write().await;
        stats.total += 1;
        stats.total_time += elapsed;
        stats.max_time = stats.max_time.max(elapsed);
    }

    pub async fn total(&self) -> u64 {
        self.inner.read().await.total
    }

    /// Mean response time in seconds; zero before the first record.
    pub async fn average_secs(&self) -> f64 {
        let stats = self.inner.read().await;
        if stats.total == 0 {
            return 0.0;
        }
        stats.total_time.as_secs_f64() / stats.total as f64
    }

    pub async fn max_secs(&self) -> f64 {
        self.inner.read().await.max_time.as_secs_f64()
    }
}
