use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use adapter_core::AdapterError;
use adapter_domain::ctld::{
    AddAccountRequest, AddUserRequest, BlockEntityRequest, EntityType, QueryEntityInfoRequest,
};
use adapter_domain::entities::{BlockStatus, ClusterAccountInfo};
use adapter_domain::mapper;

use crate::error::ApiResult;
use crate::response::{success, success_empty, ApiResponse};
use crate::routes::AppState;
use crate::services::qos::resolve_usable_qos;

#[derive(Debug, Deserialize)]
pub struct ListAccountsParams {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountBody {
    pub account_name: String,
    pub owner_user_id: String,
}

/// 列出用户所属的账户名。默认关联的尾部标记在这里剥掉,
/// 门户永远看不到它。
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(params): Query<ListAccountsParams>,
) -> ApiResult<ApiResponse<Vec<String>>> {
    info!("收到请求 ListAccounts: user_id={}", params.user_id);

    let request = QueryEntityInfoRequest {
        uid: 0,
        entity_type: Some(EntityType::User),
        name: Some(params.user_id),
        account: None,
    };
    let response = state.scheduler.query_entity_info(&request).await?;
    if !response.ok {
        return Err(AdapterError::SchedulerInternal(response.reason).into());
    }

    let accounts = response
        .user_list
        .iter()
        .map(|u| mapper::normalize_account_name(&u.account).to_string())
        .collect();
    Ok(success(accounts))
}

/// 创建账户,并把属主作为首个成员加入。
/// QOS前置检查与uid解析都在第一笔变更之前完成。
pub async fn create_account(
    State(state): State<AppState>,
    Json(body): Json<CreateAccountBody>,
) -> ApiResult<ApiResponse<()>> {
    info!(
        "收到请求 CreateAccount: account_name={} owner={}",
        body.account_name, body.owner_user_id
    );

    let usable = resolve_usable_qos(state.scheduler.as_ref()).await?;
    let uid = state.uids.uid_by_name(&body.owner_user_id)?;

    let account = mapper::build_account_info(
        &body.account_name,
        &state.config.cluster.partitions,
        &usable,
    );
    let ack = state
        .scheduler
        .add_account(&AddAccountRequest { uid: 0, account })
        .await?;
    if !ack.ok {
        return Err(AdapterError::SchedulerInternal(ack.reason).into());
    }

    // 账户建好后,把属主加入账户
    let user = mapper::new_member_user(
        uid,
        &body.owner_user_id,
        &body.account_name,
        &state.config.cluster.partitions,
        &usable,
    );
    let ack = state
        .scheduler
        .add_user(&AddUserRequest { uid: 0, user })
        .await?;
    if !ack.ok {
        return Err(AdapterError::AccountNotFound(ack.reason).into());
    }
    Ok(success_empty())
}

/// 封锁账户
pub async fn block_account(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    info!("收到请求 BlockAccount: account_name={name}");
    set_account_blocked(&state, &name, true).await
}

/// 解封账户
pub async fn unblock_account(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    info!("收到请求 UnblockAccount: account_name={name}");
    set_account_blocked(&state, &name, false).await
}

async fn set_account_blocked(
    state: &AppState,
    name: &str,
    block: bool,
) -> ApiResult<ApiResponse<()>> {
    let request = BlockEntityRequest {
        uid: 0,
        block,
        entity_type: EntityType::Account,
        name: name.to_string(),
        account: None,
    };
    let ack = state.scheduler.block_entity(&request).await?;
    if !ack.ok {
        return Err(AdapterError::AccountNotFound(ack.reason).into());
    }
    Ok(success_empty())
}

/// 查询账户封锁状态
pub async fn query_account_block_status(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<ApiResponse<BlockStatus>> {
    info!("收到请求 QueryAccountBlockStatus: account_name={name}");

    let request = QueryEntityInfoRequest {
        uid: 0,
        entity_type: Some(EntityType::Account),
        name: Some(name),
        account: None,
    };
    let response = state.scheduler.query_entity_info(&request).await?;
    if !response.ok {
        return Err(AdapterError::AccountNotFound(response.reason).into());
    }

    let blocked = response
        .account_list
        .first()
        .map(|a| a.blocked)
        .unwrap_or(false);
    Ok(success(BlockStatus { blocked }))
}

/// 列出所有账户及其成员用户。任一子查询失败都使整个请求失败,
/// 不报告部分结果。
pub async fn get_all_accounts_with_users(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<ClusterAccountInfo>>> {
    info!("收到请求 GetAllAccountsWithUsers");

    let request = QueryEntityInfoRequest {
        uid: 0,
        entity_type: None,
        name: None,
        account: None,
    };
    let response = state.scheduler.query_entity_info(&request).await?;
    if !response.ok {
        return Err(AdapterError::SchedulerInternal(response.reason).into());
    }

    let mut accounts = Vec::with_capacity(response.account_list.len());
    for account in &response.account_list {
        let request_users = QueryEntityInfoRequest {
            uid: 0,
            entity_type: Some(EntityType::User),
            name: None,
            account: Some(account.name.clone()),
        };
        let response_users = state.scheduler.query_entity_info(&request_users).await?;
        if !response_users.ok {
            return Err(AdapterError::SchedulerInternal(response_users.reason).into());
        }
        accounts.push(ClusterAccountInfo {
            account_name: mapper::normalize_account_name(&account.name).to_string(),
            blocked: account.blocked,
            users: mapper::users_in_account(&response_users.user_list),
        });
    }
    Ok(success(accounts))
}
