//! 面向门户的数据模型。与后端调度器的形状解耦,字段命名跟随
//! 门户侧的既有契约。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInAccount {
    pub user_id: String,
    pub user_name: String,
    pub blocked: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlockStatus {
    pub blocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterAccountInfo {
    pub account_name: String,
    pub blocked: bool,
    pub users: Vec<UserInAccount>,
}

/// 静态分区视图(配置 + 调度器元数据 + 统一注入的QOS列表)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partition {
    pub name: String,
    pub mem_mb: u64,
    pub cores: u32,
    pub nodes: u32,
    pub qos: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionStatus {
    #[serde(rename = "AVAILABLE")]
    Available,
    #[serde(rename = "NOT_AVAILABLE")]
    NotAvailable,
}

/// 单个分区的实时状态快照。没有持久身份,每次请求重新计算。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionInfo {
    pub partition_name: String,
    pub node_count: u32,
    pub running_node_count: u32,
    pub idle_node_count: u32,
    pub not_available_node_count: u32,
    pub cpu_core_count: u32,
    pub running_cpu_count: u32,
    pub idle_cpu_count: u32,
    pub not_available_cpu_count: u32,
    pub job_count: u32,
    pub running_job_count: u32,
    pub pending_job_count: u32,
    pub usage_rate_percentage: u32,
    pub partition_status: PartitionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub cluster_name: String,
    pub partitions: Vec<PartitionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfigInfo {
    pub scheduler_name: String,
    pub partitions: Vec<Partition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub job_id: u32,
    pub name: String,
    pub account: String,
    pub partition: String,
    pub user: String,
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConnectionInfo {
    pub host: String,
    pub port: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VersionInfo {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}
