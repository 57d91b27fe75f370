//! 可用QOS的解析。任何账户/用户变更前都必须先通过这里,
//! 保证不会在调度器侧留下半套变更。

use adapter_core::{AdapterError, AdapterResult};
use adapter_domain::{SchedulerClient, UsableQos};

/// 拉取全局QOS目录并剔除保留档位。剩余为空时返回
/// `QosNotFound`,因为默认QOS必须存在。
pub async fn resolve_usable_qos(scheduler: &dyn SchedulerClient) -> AdapterResult<UsableQos> {
    let response = scheduler.query_qos().await?;
    if !response.ok {
        return Err(AdapterError::SchedulerInternal(response.reason));
    }
    UsableQos::from_catalog(response.qos_list).ok_or(AdapterError::QosNotFound)
}
