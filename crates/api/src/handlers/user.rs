use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use adapter_core::AdapterError;
use adapter_domain::ctld::{
    AddUserRequest, BlockEntityRequest, DeleteEntityRequest, EntityType, QueryEntityInfoRequest,
};
use adapter_domain::entities::BlockStatus;
use adapter_domain::mapper;

use crate::error::ApiResult;
use crate::response::{success, success_empty, ApiResponse};
use crate::routes::AppState;
use crate::services::qos::resolve_usable_qos;

#[derive(Debug, Deserialize)]
pub struct AddUserBody {
    pub user_id: String,
}

/// 把用户加入账户。QOS前置检查先行,uid解析失败不发出任何变更。
pub async fn add_user_to_account(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<AddUserBody>,
) -> ApiResult<ApiResponse<()>> {
    info!(
        "收到请求 AddUserToAccount: account_name={name} user_id={}",
        body.user_id
    );

    let usable = resolve_usable_qos(state.scheduler.as_ref()).await?;
    let uid = state.uids.uid_by_name(&body.user_id)?;

    let user = mapper::new_member_user(
        uid,
        &body.user_id,
        &name,
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

/// 把用户从账户移除。移除的是关联,不是用户本身。
pub async fn remove_user_from_account(
    State(state): State<AppState>,
    Path((name, user_id)): Path<(String, String)>,
) -> ApiResult<ApiResponse<()>> {
    info!("收到请求 RemoveUserFromAccount: account_name={name} user_id={user_id}");

    let request = DeleteEntityRequest {
        uid: 0,
        entity_type: EntityType::User,
        name: user_id,
        account: Some(name),
    };
    let ack = state.scheduler.delete_entity(&request).await?;
    if !ack.ok {
        return Err(AdapterError::AssociationNotFound(ack.reason).into());
    }
    Ok(success_empty())
}

/// 封锁账户内的用户
pub async fn block_user_in_account(
    State(state): State<AppState>,
    Path((name, user_id)): Path<(String, String)>,
) -> ApiResult<ApiResponse<()>> {
    info!("收到请求 BlockUserInAccount: account_name={name} user_id={user_id}");
    set_user_blocked(&state, &name, &user_id, true).await
}

/// 解封账户内的用户
pub async fn unblock_user_in_account(
    State(state): State<AppState>,
    Path((name, user_id)): Path<(String, String)>,
) -> ApiResult<ApiResponse<()>> {
    info!("收到请求 UnblockUserInAccount: account_name={name} user_id={user_id}");
    set_user_blocked(&state, &name, &user_id, false).await
}

async fn set_user_blocked(
    state: &AppState,
    account_name: &str,
    user_id: &str,
    block: bool,
) -> ApiResult<ApiResponse<()>> {
    let request = BlockEntityRequest {
        uid: 0,
        block,
        entity_type: EntityType::User,
        name: user_id.to_string(),
        account: Some(account_name.to_string()),
    };
    let ack = state.scheduler.block_entity(&request).await?;
    if !ack.ok {
        return Err(AdapterError::AssociationNotFound(ack.reason).into());
    }
    Ok(success_empty())
}

/// 查询账户内用户的封锁状态
pub async fn query_user_block_status(
    State(state): State<AppState>,
    Path((name, user_id)): Path<(String, String)>,
) -> ApiResult<ApiResponse<BlockStatus>> {
    info!("收到请求 QueryUserInAccountBlockStatus: account_name={name} user_id={user_id}");

    let request = QueryEntityInfoRequest {
        uid: 0,
        entity_type: Some(EntityType::User),
        name: Some(user_id),
        account: Some(name),
    };
    let response = state.scheduler.query_entity_info(&request).await?;
    if !response.ok {
        return Err(AdapterError::AssociationNotFound(response.reason).into());
    }

    let blocked = response
        .user_list
        .first()
        .map(|u| u.blocked)
        .unwrap_or(false);
    Ok(success(BlockStatus { blocked }))
}
