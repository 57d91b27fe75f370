use axum::extract::State;
use tracing::info;

use adapter_core::AdapterResult;
use adapter_domain::entities::{ClusterConfigInfo, ClusterInfo, Partition};

use crate::error::ApiResult;
use crate::response::{success, ApiResponse};
use crate::routes::AppState;
use crate::services::cluster::{compute_cluster_status, query_single_partition};
use crate::services::qos::resolve_usable_qos;

const SCHEDULER_NAME: &str = "ctld";

/// 配置声明的分区 + 调度器元数据 + 统一注入的QOS列表
async fn collect_partitions(state: &AppState) -> AdapterResult<Vec<Partition>> {
    let usable = resolve_usable_qos(state.scheduler.as_ref()).await?;

    let mut partitions = Vec::with_capacity(state.config.cluster.partitions.len());
    for part in &state.config.cluster.partitions {
        let meta = query_single_partition(state.scheduler.as_ref(), &part.name).await?;
        partitions.push(Partition {
            name: meta.name.clone(),
            mem_mb: meta.total_mem / (1024 * 1024),
            cores: meta.total_cpu as u32,
            nodes: meta.total_nodes,
            qos: usable.to_vec(),
        });
    }
    Ok(partitions)
}

/// 可用分区查询
pub async fn get_available_partitions(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<Partition>>> {
    info!("收到请求 GetAvailablePartitions");
    Ok(success(collect_partitions(&state).await?))
}

/// 集群静态配置查询
pub async fn get_cluster_config(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<ClusterConfigInfo>> {
    info!("收到请求 GetClusterConfig");
    let partitions = collect_partitions(&state).await?;
    Ok(success(ClusterConfigInfo {
        scheduler_name: SCHEDULER_NAME.to_string(),
        partitions,
    }))
}

/// 集群实时状态快照。每次请求重新聚合,不做缓存。
pub async fn get_cluster_info(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<ClusterInfo>> {
    info!("收到请求 GetClusterInfo");
    let partitions = compute_cluster_status(
        &state.config.cluster,
        state.scheduler.as_ref(),
        state.counters.as_ref(),
    )
    .await?;
    Ok(success(ClusterInfo {
        cluster_name: state.config.cluster.name.clone(),
        partitions,
    }))
}
