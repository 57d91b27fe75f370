use tracing::info;

use adapter_domain::entities::VersionInfo;

use crate::response::{success, ApiResponse};

/// 版本查询,无任何依赖
pub async fn get_version() -> ApiResponse<VersionInfo> {
    info!("收到请求 GetVersion");
    success(VersionInfo {
        major: 1,
        minor: 5,
        patch: 0,
    })
}
