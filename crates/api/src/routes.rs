use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use adapter_core::AppConfig;
use adapter_domain::{CounterQuery, SchedulerClient, UidResolver};

use crate::handlers::{
    account::{
        block_account, create_account, get_all_accounts_with_users, list_accounts,
        query_account_block_status, unblock_account,
    },
    app::get_app_connection_info,
    cluster::{get_available_partitions, get_cluster_config, get_cluster_info},
    health::health_check,
    job::{cancel_job, list_jobs},
    user::{
        add_user_to_account, block_user_in_account, query_user_block_status,
        remove_user_from_account, unblock_user_in_account,
    },
    version::get_version,
};

/// 适配器的共享上下文:启动时显式构造,只读,
/// 以引用计数克隆进每个请求处理器。
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub scheduler: Arc<dyn SchedulerClient>,
    pub counters: Arc<dyn CounterQuery>,
    pub uids: Arc<dyn UidResolver>,
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 账户生命周期
        .route("/api/accounts", get(list_accounts).post(create_account))
        .route("/api/accounts/with-users", get(get_all_accounts_with_users))
        .route("/api/accounts/{name}/blocked", get(query_account_block_status))
        .route("/api/accounts/{name}/block", post(block_account))
        .route("/api/accounts/{name}/unblock", post(unblock_account))
        // 账户内的用户生命周期
        .route("/api/accounts/{name}/users", post(add_user_to_account))
        .route(
            "/api/accounts/{name}/users/{user_id}/remove",
            post(remove_user_from_account),
        )
        .route(
            "/api/accounts/{name}/users/{user_id}/block",
            post(block_user_in_account),
        )
        .route(
            "/api/accounts/{name}/users/{user_id}/unblock",
            post(unblock_user_in_account),
        )
        .route(
            "/api/accounts/{name}/users/{user_id}/blocked",
            get(query_user_block_status),
        )
        // 分区与集群查询
        .route("/api/cluster/partitions", get(get_available_partitions))
        .route("/api/cluster/config", get(get_cluster_config))
        .route("/api/cluster/info", get(get_cluster_info))
        // 作业与应用(直通转发)
        .route("/api/jobs", get(list_jobs))
        .route("/api/jobs/{id}/cancel", post(cancel_job))
        .route("/api/jobs/{id}/app-connection", get(get_app_connection_info))
        // 版本查询
        .route("/api/version", get(get_version))
        .with_state(state)
}
