use axum::extract::{Path, State};
use tracing::info;

use adapter_core::AdapterError;
use adapter_domain::ctld::QueryTasksRequest;
use adapter_domain::entities::AppConnectionInfo;

use crate::error::{ApiError, ApiResult};
use crate::response::{success, ApiResponse};
use crate::routes::AppState;

/// 交互式应用的连接信息:从运行中作业的记录里取出主机与端口
pub async fn get_app_connection_info(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<ApiResponse<AppConnectionInfo>> {
    info!("收到请求 GetAppConnectionInfo: job_id={id}");

    let request = QueryTasksRequest {
        task_ids: vec![id],
        ..Default::default()
    };
    let response = state.scheduler.query_tasks(&request).await?;
    if !response.ok {
        return Err(AdapterError::SchedulerInternal(response.reason).into());
    }

    let task = response
        .task_list
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(format!("作业 {id}")))?;
    Ok(success(AppConnectionInfo {
        host: task.exec_host,
        port: task.port,
    }))
}
