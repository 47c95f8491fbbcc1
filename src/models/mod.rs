mod stats;

pub use stats::{PageView, StatsRecord, VisitorStats};
