pub mod ctld;
pub mod entities;
pub mod mapper;
pub mod ports;
pub mod qos;

pub use ports::{CounterQuery, JobStateFilter, SchedulerClient, UidResolver};
pub use qos::UsableQos;
