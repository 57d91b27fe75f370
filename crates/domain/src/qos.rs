use crate::ctld::RESERVED_QOS;

/// 过滤掉保留档位之后的可用QOS序列。
///
/// 非空是类型保证:任何账户/用户变更都要求存在默认QOS,
/// 构造失败(空集)对应 `QOS_NOT_FOUND`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsableQos(Vec<String>);

impl UsableQos {
    /// 从ctld的QOS目录构造,剔除所有保留档位,保持相对顺序。
    /// 剩余为空时返回None。
    pub fn from_catalog(catalog: Vec<String>) -> Option<Self> {
        let tiers: Vec<String> = catalog.into_iter().filter(|q| q != RESERVED_QOS).collect();
        if tiers.is_empty() {
            None
        } else {
            Some(Self(tiers))
        }
    }

    /// 默认档位:可用序列的第一项
    pub fn default_tier(&self) -> &str {
        &self.0[0]
    }

    pub fn tiers(&self) -> &[String] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}
