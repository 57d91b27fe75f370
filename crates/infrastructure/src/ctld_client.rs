//! ctld的HTTP RPC客户端。适配器里唯一向调度器发起结构化调用的组件。

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use adapter_core::config::SchedulerConfig;
use adapter_core::{AdapterError, AdapterResult};
use adapter_domain::ctld::{
    Ack, AddAccountRequest, AddUserRequest, BlockEntityRequest, CancelTasksRequest,
    DeleteEntityRequest, QueryEntityInfoRequest, QueryEntityInfoResponse,
    QueryPartitionInfoRequest, QueryPartitionInfoResponse, QueryQosResponse, QueryTasksRequest,
    QueryTasksResponse,
};
use adapter_domain::SchedulerClient;

pub struct CtldClient {
    base_url: String,
    http: reqwest::Client,
}

impl CtldClient {
    pub fn new(config: &SchedulerConfig) -> AdapterResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AdapterError::Configuration(format!("构建HTTP客户端失败: {e}")))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// 所有ctld调用共用的发送逻辑。连接/传输层失败一律映射为
    /// `SchedulerUnavailable`;应答体里的 `ok=false` 不在这里判定。
    async fn post<B, R>(&self, path: &str, body: &B) -> AdapterResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("调用ctld: {url}");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AdapterError::SchedulerUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AdapterError::SchedulerUnavailable(format!(
                "ctld返回HTTP {status}: {}",
                text.trim()
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| AdapterError::SchedulerUnavailable(format!("解析ctld应答失败: {e}")))
    }
}

#[async_trait]
impl SchedulerClient for CtldClient {
    async fn query_entity_info(
        &self,
        request: &QueryEntityInfoRequest,
    ) -> AdapterResult<QueryEntityInfoResponse> {
        self.post("/api/v1/entities/query", request).await
    }

    async fn add_account(&self, request: &AddAccountRequest) -> AdapterResult<Ack> {
        self.post("/api/v1/accounts", request).await
    }

    async fn add_user(&self, request: &AddUserRequest) -> AdapterResult<Ack> {
        self.post("/api/v1/users", request).await
    }

    async fn delete_entity(&self, request: &DeleteEntityRequest) -> AdapterResult<Ack> {
        self.post("/api/v1/entities/delete", request).await
    }

    async fn block_entity(&self, request: &BlockEntityRequest) -> AdapterResult<Ack> {
        self.post("/api/v1/entities/block", request).await
    }

    async fn query_partition_info(
        &self,
        request: &QueryPartitionInfoRequest,
    ) -> AdapterResult<QueryPartitionInfoResponse> {
        self.post("/api/v1/partitions/query", request).await
    }

    async fn query_qos(&self) -> AdapterResult<QueryQosResponse> {
        // QOS目录是全局的,查询体为空对象
        self.post("/api/v1/qos/query", &serde_json::json!({})).await
    }

    async fn query_tasks(&self, request: &QueryTasksRequest) -> AdapterResult<QueryTasksResponse> {
        self.post("/api/v1/tasks/query", request).await
    }

    async fn cancel_tasks(&self, request: &CancelTasksRequest) -> AdapterResult<Ack> {
        self.post("/api/v1/tasks/cancel", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> SchedulerConfig {
        SchedulerConfig {
            base_url: base_url.to_string(),
            request_timeout_seconds: 5,
        }
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = CtldClient::new(&config("http://ctld:8972/")).unwrap();
        assert_eq!(client.base_url, "http://ctld:8972");
    }

    #[tokio::test]
    async fn test_unreachable_ctld_maps_to_unavailable() {
        // 保留地址段,不会有监听者
        let client = CtldClient::new(&config("http://192.0.2.1:1")).unwrap();
        let err = client.query_qos().await.unwrap_err();
        assert_eq!(err.code(), "SCHEDULER_UNAVAILABLE");
    }
}
