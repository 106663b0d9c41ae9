pub mod host;
pub mod pagination;
pub mod stats;

pub use host::{HostRecord, HostSummary};
pub use pagination::{Pagination, DEFAULT_LIMIT};
pub use stats::{ProcessStat, SpaceUsage, StatEntry};
