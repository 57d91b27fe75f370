//! 集群状态聚合:把分区元数据、实时计数与利用率计算合并成
//! 每个分区的状态记录。整个适配器里唯一真正的数据加工逻辑。

use tracing::debug;

use adapter_core::config::ClusterConfig;
use adapter_core::{AdapterError, AdapterResult};
use adapter_domain::ctld::{PartitionMeta, PartitionState, QueryPartitionInfoRequest};
use adapter_domain::entities::{PartitionInfo, PartitionStatus};
use adapter_domain::{CounterQuery, JobStateFilter, SchedulerClient};

/// 按名查询分区并强制"恰好一条记录"的前置条件。
/// 零条或多条都是后端契约破坏,按内部错误处理。
pub async fn query_single_partition(
    scheduler: &dyn SchedulerClient,
    partition_name: &str,
) -> AdapterResult<PartitionMeta> {
    let request = QueryPartitionInfoRequest {
        partition_name: partition_name.to_string(),
    };
    let response = scheduler.query_partition_info(&request).await?;
    if !response.ok {
        return Err(AdapterError::SchedulerInternal(response.reason));
    }
    let mut infos = response.partition_info;
    if infos.len() != 1 {
        return Err(AdapterError::SchedulerInternal(format!(
            "分区 {partition_name} 的信息记录数异常: {}条",
            infos.len()
        )));
    }
    Ok(infos.remove(0))
}

/// 计算整个集群的实时状态,每个配置分区一条记录,顺序跟随配置。
///
/// 单个分区的四个读取(分区信息 + 三个计数)相互独立,并发发出;
/// 四个值全部就绪才组装记录,绝不产出部分记录。任何子步骤失败
/// 都使整个聚合失败。
pub async fn compute_cluster_status(
    cluster: &ClusterConfig,
    scheduler: &dyn SchedulerClient,
    counters: &dyn CounterQuery,
) -> AdapterResult<Vec<PartitionInfo>> {
    let mut partitions = Vec::with_capacity(cluster.partitions.len());
    for part in &cluster.partitions {
        let (meta, running_jobs, pending_jobs, running_nodes) = tokio::try_join!(
            query_single_partition(scheduler, &part.name),
            counters.job_count(&part.name, JobStateFilter::Running),
            counters.job_count(&part.name, JobStateFilter::Pending),
            counters.allocated_node_count(&part.name),
        )?;
        partitions.push(assemble_partition_status(
            &meta,
            running_jobs,
            pending_jobs,
            running_nodes,
        )?);
    }
    Ok(partitions)
}

/// 从一组就绪的读取值推导分区状态记录。
///
/// 分区信息与计数不是原子读取,差值可能瞬时为负,
/// 推导计数统一钳到0。
fn assemble_partition_status(
    meta: &PartitionMeta,
    running_jobs: u32,
    pending_jobs: u32,
    running_nodes: u32,
) -> AdapterResult<PartitionInfo> {
    if meta.total_nodes == 0 {
        return Err(AdapterError::SchedulerInternal(format!(
            "分区 {} 报告总节点数为0",
            meta.name
        )));
    }
    if running_nodes > meta.alive_nodes {
        debug!(
            "分区 {} 观测偏差: 运行节点 {running_nodes} > 存活节点 {}",
            meta.name, meta.alive_nodes
        );
    }

    let total_cpu = meta.total_cpu as u32;
    let avail_cpu = meta.avail_cpu as u32;
    let alloc_cpu = meta.alloc_cpu as u32;

    let status = if meta.state == PartitionState::Up {
        PartitionStatus::Available
    } else {
        PartitionStatus::NotAvailable
    };

    Ok(PartitionInfo {
        partition_name: meta.name.clone(),
        node_count: meta.total_nodes,
        running_node_count: running_nodes,
        idle_node_count: meta.alive_nodes.saturating_sub(running_nodes),
        not_available_node_count: meta.total_nodes.saturating_sub(meta.alive_nodes),
        cpu_core_count: total_cpu,
        running_cpu_count: alloc_cpu,
        idle_cpu_count: total_cpu.saturating_sub(alloc_cpu),
        not_available_cpu_count: total_cpu
            .saturating_sub(avail_cpu)
            .saturating_sub(alloc_cpu),
        job_count: running_jobs + pending_jobs,
        running_job_count: running_jobs,
        pending_job_count: pending_jobs,
        usage_rate_percentage: running_nodes * 100 / meta.total_nodes,
        partition_status: status,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use adapter_core::config::PartitionConfig;
    use adapter_domain::ctld::{
        Ack, AddAccountRequest, AddUserRequest, BlockEntityRequest, CancelTasksRequest,
        DeleteEntityRequest, QueryEntityInfoRequest, QueryEntityInfoResponse,
        QueryPartitionInfoResponse, QueryQosResponse, QueryTasksRequest, QueryTasksResponse,
    };

    use super::*;

    fn meta(name: &str, total_nodes: u32, alive_nodes: u32, state: PartitionState) -> PartitionMeta {
        PartitionMeta {
            name: name.to_string(),
            state,
            total_nodes,
            alive_nodes,
            total_mem: 512 * 1024 * 1024 * 1024,
            total_cpu: 64.0,
            avail_cpu: 40.0,
            alloc_cpu: 16.0,
        }
    }

    struct MockScheduler {
        partitions: HashMap<String, QueryPartitionInfoResponse>,
    }

    impl MockScheduler {
        fn with_partition(name: &str, response: QueryPartitionInfoResponse) -> Self {
            let mut partitions = HashMap::new();
            partitions.insert(name.to_string(), response);
            Self { partitions }
        }
    }

    #[async_trait]
    impl SchedulerClient for MockScheduler {
        async fn query_entity_info(
            &self,
            _request: &QueryEntityInfoRequest,
        ) -> AdapterResult<QueryEntityInfoResponse> {
            unreachable!("聚合不应触达实体查询")
        }
        async fn add_account(&self, _request: &AddAccountRequest) -> AdapterResult<Ack> {
            unreachable!()
        }
        async fn add_user(&self, _request: &AddUserRequest) -> AdapterResult<Ack> {
            unreachable!()
        }
        async fn delete_entity(&self, _request: &DeleteEntityRequest) -> AdapterResult<Ack> {
            unreachable!()
        }
        async fn block_entity(&self, _request: &BlockEntityRequest) -> AdapterResult<Ack> {
            unreachable!()
        }
        async fn query_partition_info(
            &self,
            request: &QueryPartitionInfoRequest,
        ) -> AdapterResult<QueryPartitionInfoResponse> {
            Ok(self
                .partitions
                .get(&request.partition_name)
                .cloned()
                .unwrap_or(QueryPartitionInfoResponse {
                    ok: false,
                    reason: "unknown partition".to_string(),
                    partition_info: Vec::new(),
                }))
        }
        async fn query_qos(&self) -> AdapterResult<QueryQosResponse> {
            unreachable!()
        }
        async fn query_tasks(
            &self,
            _request: &QueryTasksRequest,
        ) -> AdapterResult<QueryTasksResponse> {
            unreachable!()
        }
        async fn cancel_tasks(&self, _request: &CancelTasksRequest) -> AdapterResult<Ack> {
            unreachable!()
        }
    }

    struct MockCounters {
        running_jobs: u32,
        pending_jobs: u32,
        running_nodes: u32,
    }

    #[async_trait]
    impl CounterQuery for MockCounters {
        async fn job_count(&self, _partition: &str, state: JobStateFilter) -> AdapterResult<u32> {
            Ok(match state {
                JobStateFilter::Running => self.running_jobs,
                JobStateFilter::Pending => self.pending_jobs,
            })
        }
        async fn allocated_node_count(&self, _partition: &str) -> AdapterResult<u32> {
            Ok(self.running_nodes)
        }
    }

    fn cluster(names: &[&str]) -> ClusterConfig {
        ClusterConfig {
            name: "test".to_string(),
            partitions: names
                .iter()
                .map(|n| PartitionConfig {
                    name: n.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_assemble_matches_expected_snapshot() {
        // 10节点8存活,3节点在跑,5运行2排队,分区up
        let info =
            assemble_partition_status(&meta("CPU", 10, 8, PartitionState::Up), 5, 2, 3).unwrap();
        assert_eq!(info.idle_node_count, 5);
        assert_eq!(info.not_available_node_count, 2);
        assert_eq!(info.job_count, 7);
        assert_eq!(info.usage_rate_percentage, 30);
        assert_eq!(info.partition_status, PartitionStatus::Available);
        // CPU推导: 64核, 40可用, 16已分配
        assert_eq!(info.cpu_core_count, 64);
        assert_eq!(info.running_cpu_count, 16);
        assert_eq!(info.idle_cpu_count, 48);
        assert_eq!(info.not_available_cpu_count, 8);
    }

    #[test]
    fn test_idle_cluster_utilization_is_zero() {
        let info =
            assemble_partition_status(&meta("CPU", 10, 10, PartitionState::Up), 0, 0, 0).unwrap();
        assert_eq!(info.usage_rate_percentage, 0);
        assert_eq!(info.partition_status, PartitionStatus::Available);

        let info =
            assemble_partition_status(&meta("CPU", 10, 10, PartitionState::Down), 0, 0, 0).unwrap();
        assert_eq!(info.usage_rate_percentage, 0);
        assert_eq!(info.partition_status, PartitionStatus::NotAvailable);
    }

    #[test]
    fn test_utilization_is_floored() {
        let info =
            assemble_partition_status(&meta("CPU", 3, 3, PartitionState::Up), 0, 0, 1).unwrap();
        assert_eq!(info.usage_rate_percentage, 33);
    }

    #[test]
    fn test_zero_total_nodes_fails_fast() {
        let err = assemble_partition_status(&meta("CPU", 0, 0, PartitionState::Up), 0, 0, 0)
            .unwrap_err();
        assert_eq!(err.code(), "SCHEDULER_INTERNAL_ERROR");
    }

    #[test]
    fn test_observation_skew_is_clamped() {
        // 计数路径看到5个节点在跑,分区信息只报2个存活
        let info =
            assemble_partition_status(&meta("CPU", 10, 2, PartitionState::Up), 0, 0, 5).unwrap();
        assert_eq!(info.idle_node_count, 0);
    }

    #[tokio::test]
    async fn test_compute_status_for_one_partition() {
        let scheduler = MockScheduler::with_partition(
            "CPU",
            QueryPartitionInfoResponse {
                ok: true,
                reason: String::new(),
                partition_info: vec![meta("CPU", 10, 8, PartitionState::Up)],
            },
        );
        let counters = MockCounters {
            running_jobs: 5,
            pending_jobs: 2,
            running_nodes: 3,
        };

        let result = compute_cluster_status(&cluster(&["CPU"]), &scheduler, &counters)
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].partition_name, "CPU");
        assert_eq!(result[0].running_job_count, 5);
        assert_eq!(result[0].pending_job_count, 2);
        assert_eq!(result[0].running_node_count, 3);
    }

    #[tokio::test]
    async fn test_not_ok_partition_query_fails_with_reason() {
        let scheduler = MockScheduler::with_partition(
            "CPU",
            QueryPartitionInfoResponse {
                ok: false,
                reason: "Partition table corrupted".to_string(),
                partition_info: Vec::new(),
            },
        );
        let counters = MockCounters {
            running_jobs: 0,
            pending_jobs: 0,
            running_nodes: 0,
        };

        let err = compute_cluster_status(&cluster(&["CPU"]), &scheduler, &counters)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "SCHEDULER_INTERNAL_ERROR");
        assert_eq!(err.detail(), Some("Partition table corrupted"));
    }

    #[tokio::test]
    async fn test_empty_partition_info_is_contract_violation() {
        let scheduler = MockScheduler::with_partition(
            "CPU",
            QueryPartitionInfoResponse {
                ok: true,
                reason: String::new(),
                partition_info: Vec::new(),
            },
        );
        let counters = MockCounters {
            running_jobs: 0,
            pending_jobs: 0,
            running_nodes: 0,
        };

        let err = compute_cluster_status(&cluster(&["CPU"]), &scheduler, &counters)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "SCHEDULER_INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_partition_order_follows_configuration() {
        let mut scheduler = MockScheduler::with_partition(
            "GPU",
            QueryPartitionInfoResponse {
                ok: true,
                reason: String::new(),
                partition_info: vec![meta("GPU", 4, 4, PartitionState::Up)],
            },
        );
        scheduler.partitions.insert(
            "CPU".to_string(),
            QueryPartitionInfoResponse {
                ok: true,
                reason: String::new(),
                partition_info: vec![meta("CPU", 10, 10, PartitionState::Up)],
            },
        );
        let counters = MockCounters {
            running_jobs: 0,
            pending_jobs: 0,
            running_nodes: 0,
        };

        let result = compute_cluster_status(&cluster(&["GPU", "CPU"]), &scheduler, &counters)
            .await
            .unwrap();
        assert_eq!(result[0].partition_name, "GPU");
        assert_eq!(result[1].partition_name, "CPU");
    }
}
