use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::info;

use adapter_core::AdapterError;
use adapter_domain::ctld::{CancelTasksRequest, QueryTasksRequest};
use adapter_domain::entities::JobInfo;

use crate::error::ApiResult;
use crate::response::{success, success_empty, ApiResponse};
use crate::routes::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListJobsParams {
    pub partition: Option<String>,
    pub account: Option<String>,
    pub state: Option<String>,
}

/// 作业列表直通转发,字段改名之外不做加工
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsParams>,
) -> ApiResult<ApiResponse<Vec<JobInfo>>> {
    info!("收到请求 ListJobs: {params:?}");

    let request = QueryTasksRequest {
        partition: params.partition,
        account: params.account,
        state: params.state,
        task_ids: Vec::new(),
    };
    let response = state.scheduler.query_tasks(&request).await?;
    if !response.ok {
        return Err(AdapterError::SchedulerInternal(response.reason).into());
    }

    let jobs = response
        .task_list
        .into_iter()
        .map(|t| JobInfo {
            job_id: t.task_id,
            name: t.name,
            account: t.account,
            partition: t.partition,
            user: t.username,
            state: t.state,
        })
        .collect();
    Ok(success(jobs))
}

/// 取消作业
pub async fn cancel_job(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<ApiResponse<()>> {
    info!("收到请求 CancelJob: job_id={id}");

    let request = CancelTasksRequest {
        uid: 0,
        task_ids: vec![id],
    };
    let ack = state.scheduler.cancel_tasks(&request).await?;
    if !ack.ok {
        return Err(AdapterError::SchedulerInternal(ack.reason).into());
    }
    Ok(success_empty())
}
