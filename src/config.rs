use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, num::NonZeroUsize, path::Path, time::Duration};

use crate::{Error, InternalResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Inner deadline: how long one pipeline may run before it is cancelled.
    #[serde(default = "default_computation_timeout", with = "duration_ms")]
    pub computation_timeout: Duration,

    /// Outer deadline: queue wait plus execution, as seen by the client.
    #[serde(default = "default_queue_timeout", with = "duration_ms")]
    pub queue_timeout: Duration,

    /// Pool size. `None` uses the available parallelism.
    #[serde(default)]
    pub worker_threads: Option<usize>,

    /// Maximum number of values generated across all variables of one request.
    #[serde(default = "default_max_domain_len")]
    pub max_domain_len: usize,

    #[serde(default = "default_quit_command")]
    pub quit_command: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            computation_timeout: default_computation_timeout(),
            queue_timeout: default_queue_timeout(),
            worker_threads: None,
            max_domain_len: default_max_domain_len(),
            quit_command: default_quit_command(),
        }
    }
}

impl ServerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> InternalResult<Self> {
        from_file(path)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_threads
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(NonZeroUsize::get)
                    .unwrap_or(1)
            })
            .max(1)
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path)
        .map_err(|e| Error::Internal(format!("Failed to open config file: {}", e)))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| Error::Internal(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| Error::Internal(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    10000
}
fn default_computation_timeout() -> Duration {
    Duration::from_secs(10)
}
fn default_queue_timeout() -> Duration {
    Duration::from_secs(120)
}
fn default_max_domain_len() -> usize {
    10_000_000
}
fn default_quit_command() -> String {
    "BYE".to_string()
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
