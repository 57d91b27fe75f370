use thiserror::Error;

/// 适配器统一错误分类。每种错误携带一个稳定的错误码,
/// 后端返回的原因文本原样保留在错误详情中。
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("调度器不可用: {0}")]
    SchedulerUnavailable(String),
    #[error("调度器内部错误: {0}")]
    SchedulerInternal(String),
    #[error("可用的QOS不存在")]
    QosNotFound,
    #[error("用户不存在: {0}")]
    UserNotFound(String),
    #[error("账户不存在: {0}")]
    AccountNotFound(String),
    #[error("用户与账户的关联不存在: {0}")]
    AssociationNotFound(String),
    #[error("命令执行失败: {0}")]
    RunCommand(String),
    #[error("配置错误: {0}")]
    Configuration(String),
}

pub type AdapterResult<T> = Result<T, AdapterError>;

impl AdapterError {
    /// 对外暴露的稳定错误码
    pub fn code(&self) -> &'static str {
        match self {
            AdapterError::SchedulerUnavailable(_) => "SCHEDULER_UNAVAILABLE",
            AdapterError::SchedulerInternal(_) => "SCHEDULER_INTERNAL_ERROR",
            AdapterError::QosNotFound => "QOS_NOT_FOUND",
            AdapterError::UserNotFound(_) => "USER_NOT_FOUND",
            AdapterError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            AdapterError::AssociationNotFound(_) => "ASSOCIATION_NOT_FOUND",
            AdapterError::RunCommand(_) => "RUNCOMMAND_ERROR",
            AdapterError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// 后端的原始原因文本(若有)
    pub fn detail(&self) -> Option<&str> {
        match self {
            AdapterError::SchedulerUnavailable(s)
            | AdapterError::SchedulerInternal(s)
            | AdapterError::UserNotFound(s)
            | AdapterError::AccountNotFound(s)
            | AdapterError::AssociationNotFound(s)
            | AdapterError::RunCommand(s)
            | AdapterError::Configuration(s) => Some(s),
            AdapterError::QosNotFound => None,
        }
    }

    /// 是否为后端(调度器/计数路径)故障,区别于实体不存在类错误
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            AdapterError::SchedulerUnavailable(_)
                | AdapterError::SchedulerInternal(_)
                | AdapterError::RunCommand(_)
        )
    }
}
