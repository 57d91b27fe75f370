//! 调度器控制守护进程(ctld)的线上数据模型。
//!
//! 每个应答都携带 `ok` 标志与人类可读的 `reason`;`reason` 必须
//! 原样向上传递,网关本身不决定错误类别。

use serde::{Deserialize, Serialize};

/// 保留的QOS档位,永远不对外暴露
pub const RESERVED_QOS: &str = "UNLIMITED";

/// 默认关联的账户名尾部标记
pub const DEFAULT_ASSOCIATION_SENTINEL: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    #[serde(rename = "ACCOUNT")]
    Account,
    #[serde(rename = "USER")]
    User,
}

/// 适配器永远不授予调度器侧的管理权限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminLevel {
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "OPERATOR")]
    Operator,
    #[serde(rename = "ADMIN")]
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionState {
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub allowed_partitions: Vec<String>,
    #[serde(default)]
    pub default_qos: String,
    #[serde(default)]
    pub allowed_qos_list: Vec<String>,
    #[serde(default)]
    pub blocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowedPartitionQos {
    pub partition_name: String,
    pub qos_list: Vec<String>,
    pub default_qos: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub uid: u32,
    pub name: String,
    /// 所属账户。默认关联时ctld会在账户名尾部追加 `*`。
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub allowed_partition_qos_list: Vec<AllowedPartitionQos>,
    pub admin_level: AdminLevel,
}

/// 分区的静态与实时信息,按名查询返回
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionMeta {
    pub name: String,
    pub state: PartitionState,
    pub total_nodes: u32,
    pub alive_nodes: u32,
    /// 字节数
    pub total_mem: u64,
    pub total_cpu: f64,
    pub avail_cpu: f64,
    pub alloc_cpu: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInfo {
    pub task_id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub partition: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub exec_host: String,
    #[serde(default)]
    pub port: u32,
}

// ---- 请求体 ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryEntityInfoRequest {
    pub uid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAccountRequest {
    pub uid: u32,
    pub account: AccountInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUserRequest {
    pub uid: u32,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEntityRequest {
    pub uid: u32,
    pub entity_type: EntityType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockEntityRequest {
    pub uid: u32,
    pub block: bool,
    pub entity_type: EntityType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryPartitionInfoRequest {
    pub partition_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryTasksRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub task_ids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelTasksRequest {
    pub uid: u32,
    pub task_ids: Vec<u32>,
}

// ---- 应答体 ----

/// 变更类调用的通用应答
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryEntityInfoResponse {
    pub ok: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub account_list: Vec<AccountInfo>,
    #[serde(default)]
    pub user_list: Vec<UserInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryPartitionInfoResponse {
    pub ok: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub partition_info: Vec<PartitionMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryQosResponse {
    pub ok: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub qos_list: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryTasksResponse {
    pub ok: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub task_list: Vec<TaskInfo>,
}
