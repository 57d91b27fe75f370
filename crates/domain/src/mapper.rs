//! 适配器实体与ctld实体之间的纯翻译,无任何I/O。

use adapter_core::config::PartitionConfig;

use crate::ctld::{
    AccountInfo, AdminLevel, AllowedPartitionQos, UserInfo, DEFAULT_ASSOCIATION_SENTINEL,
};
use crate::entities::UserInAccount;
use crate::qos::UsableQos;

/// 剥离账户名尾部的默认关联标记。只剥离一个,没有标记时原样返回。
pub fn normalize_account_name(name: &str) -> &str {
    name.strip_suffix(DEFAULT_ASSOCIATION_SENTINEL).unwrap_or(name)
}

/// 组装建账请求的AccountInfo:分区取自配置,
/// 默认QOS取可用序列的第一项,允许QOS为完整可用序列。
pub fn build_account_info(
    account_name: &str,
    partitions: &[PartitionConfig],
    usable: &UsableQos,
) -> AccountInfo {
    AccountInfo {
        name: account_name.to_string(),
        description: "Created by portal adapter.".to_string(),
        allowed_partitions: partitions.iter().map(|p| p.name.clone()).collect(),
        default_qos: usable.default_tier().to_string(),
        allowed_qos_list: usable.to_vec(),
        blocked: false,
    }
}

/// 每个配置分区统一注入完整的可用QOS序列。
/// QOS在这个模型里不随调度器的分区限制走。
pub fn partition_qos_list(
    partitions: &[PartitionConfig],
    usable: &UsableQos,
) -> Vec<AllowedPartitionQos> {
    partitions
        .iter()
        .map(|p| AllowedPartitionQos {
            partition_name: p.name.clone(),
            qos_list: usable.to_vec(),
            default_qos: usable.default_tier().to_string(),
        })
        .collect()
}

/// 组装把用户加入账户的UserInfo。管理级别固定为NONE,
/// 适配器不授予调度器侧权限。
pub fn new_member_user(
    uid: u32,
    user_name: &str,
    account_name: &str,
    partitions: &[PartitionConfig],
    usable: &UsableQos,
) -> UserInfo {
    UserInfo {
        uid,
        name: user_name.to_string(),
        account: account_name.to_string(),
        blocked: false,
        allowed_partition_qos_list: partition_qos_list(partitions, usable),
        admin_level: AdminLevel::None,
    }
}

/// ctld用户记录 → 账户下的用户视图。只暴露id/名称/封锁标志,
/// 管理级别与分区QOS细节不外泄。
pub fn users_in_account(user_list: &[UserInfo]) -> Vec<UserInAccount> {
    user_list
        .iter()
        .map(|u| UserInAccount {
            user_id: u.name.clone(),
            user_name: u.name.clone(),
            blocked: u.blocked,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partitions(names: &[&str]) -> Vec<PartitionConfig> {
        names
            .iter()
            .map(|n| PartitionConfig {
                name: n.to_string(),
            })
            .collect()
    }

    fn usable(tiers: &[&str]) -> UsableQos {
        UsableQos::from_catalog(tiers.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_normalize_strips_exactly_one_sentinel() {
        assert_eq!(normalize_account_name("acct*"), "acct");
        assert_eq!(normalize_account_name("acct"), "acct");
        assert_eq!(normalize_account_name("acct**"), "acct*");
    }

    #[test]
    fn test_normalize_is_idempotent_without_sentinel() {
        let once = normalize_account_name("proj_a*");
        assert_eq!(normalize_account_name(once), once);
    }

    #[test]
    fn test_build_account_info() {
        let info = build_account_info(
            "proj_a",
            &partitions(&["CPU", "GPU"]),
            &usable(&["low", "high"]),
        );
        assert_eq!(info.name, "proj_a");
        assert_eq!(info.allowed_partitions, vec!["CPU", "GPU"]);
        assert_eq!(info.default_qos, "low");
        assert_eq!(info.allowed_qos_list, vec!["low", "high"]);
        assert!(!info.blocked);
    }

    #[test]
    fn test_partition_qos_is_injected_uniformly() {
        let list = partition_qos_list(&partitions(&["CPU", "GPU"]), &usable(&["low", "high"]));
        assert_eq!(list.len(), 2);
        for entry in &list {
            assert_eq!(entry.qos_list, vec!["low", "high"]);
            assert_eq!(entry.default_qos, "low");
        }
        assert_eq!(list[0].partition_name, "CPU");
        assert_eq!(list[1].partition_name, "GPU");
    }

    #[test]
    fn test_new_member_user_never_elevates() {
        let user = new_member_user(
            1001,
            "alice",
            "proj_a",
            &partitions(&["CPU"]),
            &usable(&["low"]),
        );
        assert_eq!(user.uid, 1001);
        assert_eq!(user.admin_level, AdminLevel::None);
        assert!(!user.blocked);
        assert_eq!(user.allowed_partition_qos_list.len(), 1);
    }

    #[test]
    fn test_users_in_account_hides_detail() {
        let users = vec![UserInfo {
            uid: 1001,
            name: "alice".to_string(),
            account: "proj_a".to_string(),
            blocked: true,
            allowed_partition_qos_list: Vec::new(),
            admin_level: AdminLevel::None,
        }];
        let view = users_in_account(&users);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].user_id, "alice");
        assert_eq!(view[0].user_name, "alice");
        assert!(view[0].blocked);
    }
}
