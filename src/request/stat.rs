use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::stats::StatsCollector;

/// Queries answered from the latency statistics, without the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIter)]
pub enum StatKind {
    #[strum(serialize = "STAT_REQS")]
    Requests,
    #[strum(serialize = "STAT_AVG_TIME")]
    AverageTime,
    #[strum(serialize = "STAT_MAX_TIME")]
    MaxTime,
}

impl StatKind {
    pub async fn value(self, stats: &StatsCollector) -> f64 {
        match self {
            StatKind::Requests => stats.total().await as f64,
            StatKind::AverageTime => stats.average_secs().await,
            StatKind::MaxTime => stats.max_secs().await,
        }
    }
}
