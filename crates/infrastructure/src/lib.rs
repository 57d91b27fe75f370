pub mod counters;
pub mod ctld_client;
pub mod uid;

pub use counters::CommandCounters;
pub use ctld_client::CtldClient;
pub use uid::SystemUidResolver;
