use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Used/total space in bytes, for disk or memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceUsage {
    pub used: u64,
    pub total: u64,
}

impl SpaceUsage {
    pub fn new(used: u64, total: u64) -> Self {
        Self { used, total }
    }

    pub fn zero() -> Self {
        Self { used: 0, total: 0 }
    }

    pub fn usage_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.used as f64 / self.total as f64) * 100.0
    }
}

/// One process as reported by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStat {
    pub name: String,
    pub pid: u32,
    pub cpu: f64,
}

impl ProcessStat {
    pub fn new(name: impl Into<String>, pid: u32, cpu: f64) -> Self {
        Self {
            name: name.into(),
            pid,
            cpu,
        }
    }
}

/// One resource snapshot pushed by an agent. Immutable once stored.
///
/// Agents may omit any field except the measurements they actually took;
/// a missing timestamp is stamped with the arrival time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    #[serde(default)]
    pub hostname: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub disk: SpaceUsage,
    #[serde(default)]
    pub memory: SpaceUsage,
    #[serde(default)]
    pub processes: Vec<ProcessStat>,
}

impl StatEntry {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            timestamp: Utc::now(),
            cpu: 0.0,
            disk: SpaceUsage::zero(),
            memory: SpaceUsage::zero(),
            processes: Vec::new(),
        }
    }

    pub fn with_cpu(mut self, cpu: f64) -> Self {
        self.cpu = cpu;
        self
    }

    pub fn with_disk(mut self, disk: SpaceUsage) -> Self {
        self.disk = disk;
        self
    }

    pub fn with_memory(mut self, memory: SpaceUsage) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_processes(mut self, processes: Vec<ProcessStat>) -> Self {
        self.processes = processes;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
