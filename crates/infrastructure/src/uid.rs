//! 用户名到uid的解析,走适配器所在主机的账户数据库。
//! 集群内统一由LDAP/NSS保证用户视图一致。

use nix::unistd::User;

use adapter_core::{AdapterError, AdapterResult};
use adapter_domain::UidResolver;

#[derive(Debug, Clone, Default)]
pub struct SystemUidResolver;

impl SystemUidResolver {
    pub fn new() -> Self {
        Self
    }
}

impl UidResolver for SystemUidResolver {
    fn uid_by_name(&self, user_name: &str) -> AdapterResult<u32> {
        match User::from_name(user_name) {
            Ok(Some(user)) => Ok(user.uid.as_raw()),
            Ok(None) => Err(AdapterError::UserNotFound(user_name.to_string())),
            Err(e) => Err(AdapterError::UserNotFound(format!("{user_name}: {e}"))),
        }
    }
}
