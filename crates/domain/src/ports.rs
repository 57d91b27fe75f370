use adapter_core::AdapterResult;
use async_trait::async_trait;

use crate::ctld::{
    Ack, AddAccountRequest, AddUserRequest, BlockEntityRequest, CancelTasksRequest,
    DeleteEntityRequest, QueryEntityInfoRequest, QueryEntityInfoResponse,
    QueryPartitionInfoRequest, QueryPartitionInfoResponse, QueryQosResponse, QueryTasksRequest,
    QueryTasksResponse,
};

/// ctld RPC端口。传输层失败映射为 `SchedulerUnavailable`;
/// `ok=false` 的应答原样返回,由调用方选择错误类别。
#[async_trait]
pub trait SchedulerClient: Send + Sync {
    async fn query_entity_info(
        &self,
        request: &QueryEntityInfoRequest,
    ) -> AdapterResult<QueryEntityInfoResponse>;
    async fn add_account(&self, request: &AddAccountRequest) -> AdapterResult<Ack>;
    async fn add_user(&self, request: &AddUserRequest) -> AdapterResult<Ack>;
    async fn delete_entity(&self, request: &DeleteEntityRequest) -> AdapterResult<Ack>;
    async fn block_entity(&self, request: &BlockEntityRequest) -> AdapterResult<Ack>;
    async fn query_partition_info(
        &self,
        request: &QueryPartitionInfoRequest,
    ) -> AdapterResult<QueryPartitionInfoResponse>;
    async fn query_qos(&self) -> AdapterResult<QueryQosResponse>;
    async fn query_tasks(&self, request: &QueryTasksRequest) -> AdapterResult<QueryTasksResponse>;
    async fn cancel_tasks(&self, request: &CancelTasksRequest) -> AdapterResult<Ack>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStateFilter {
    Running,
    Pending,
}

/// 实时计数查询端口。原始命令输出在网关边界解析完毕,
/// 这里只出现整数结果。
#[async_trait]
pub trait CounterQuery: Send + Sync {
    async fn job_count(&self, partition: &str, state: JobStateFilter) -> AdapterResult<u32>;
    async fn allocated_node_count(&self, partition: &str) -> AdapterResult<u32>;
}

/// 用户名到uid的解析端口。失败即 `UserNotFound`。
pub trait UidResolver: Send + Sync {
    fn uid_by_name(&self, user_name: &str) -> AdapterResult<u32>;
}
