use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{AdapterError, AdapterResult};

/// 适配器配置。启动时加载一次,进程生命周期内只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub scheduler: SchedulerConfig,
    pub cluster: ClusterConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub bind_address: String,
}

/// 调度器控制守护进程(ctld)的访问配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

/// 适配器管理的分区是配置声明的,不做自动发现
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub name: String,
    pub partitions: Vec<PartitionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                bind_address: "0.0.0.0:5000".to_string(),
            },
            scheduler: SchedulerConfig {
                base_url: "http://localhost:8972".to_string(),
                request_timeout_seconds: 30,
            },
            cluster: ClusterConfig {
                name: "hpc".to_string(),
                partitions: Vec::new(),
            },
            log: LogConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> AdapterResult<Self> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(AdapterError::Configuration(format!(
                    "配置文件不存在: {path}"
                )));
            }
        } else {
            let default_paths = [
                "config/adapter.toml",
                "adapter.toml",
                "/etc/portal-adapter/config.toml",
            ];
            for path in &default_paths {
                if Path::new(path).exists() {
                    builder = builder.add_source(File::new(path, FileFormat::Toml));
                    break;
                }
            }
        }

        let config: AppConfig = builder
            .set_default("api.bind_address", "0.0.0.0:5000")
            .and_then(|b| b.set_default("scheduler.base_url", "http://localhost:8972"))
            .and_then(|b| b.set_default("scheduler.request_timeout_seconds", 30))
            .and_then(|b| b.set_default("cluster.name", "hpc"))
            .and_then(|b| b.set_default("log.level", "info"))
            .and_then(|b| b.set_default("log.format", "pretty"))
            .map_err(|e| AdapterError::Configuration(format!("构建配置默认值失败: {e}")))?
            .add_source(
                Environment::with_prefix("ADAPTER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AdapterError::Configuration(format!("构建配置失败: {e}")))?
            .try_deserialize()
            .map_err(|e| AdapterError::Configuration(format!("反序列化配置失败: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(toml_str: &str) -> AdapterResult<Self> {
        let config: AppConfig = toml::from_str(toml_str)
            .map_err(|e| AdapterError::Configuration(format!("解析TOML配置失败: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AdapterResult<()> {
        if self.api.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(AdapterError::Configuration(format!(
                "无效的监听地址: {}",
                self.api.bind_address
            )));
        }
        if self.scheduler.base_url.is_empty() {
            return Err(AdapterError::Configuration(
                "scheduler.base_url 不能为空".to_string(),
            ));
        }
        if self.scheduler.request_timeout_seconds == 0 {
            return Err(AdapterError::Configuration(
                "scheduler.request_timeout_seconds 必须大于0".to_string(),
            ));
        }
        if self.cluster.name.is_empty() {
            return Err(AdapterError::Configuration(
                "cluster.name 不能为空".to_string(),
            ));
        }
        if self.cluster.partitions.is_empty() {
            return Err(AdapterError::Configuration(
                "cluster.partitions 至少需要声明一个分区".to_string(),
            ));
        }
        for part in &self.cluster.partitions {
            if part.name.is_empty() {
                return Err(AdapterError::Configuration(
                    "分区名不能为空".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// 配置声明的分区名列表,保持配置顺序
    pub fn partition_names(&self) -> Vec<String> {
        self.cluster
            .partitions
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[api]
bind_address = "0.0.0.0:5000"

[scheduler]
base_url = "http://ctld:8972"
request_timeout_seconds = 10

[cluster]
name = "test-cluster"
partitions = [{ name = "CPU" }, { name = "GPU" }]

[log]
level = "debug"
format = "json"
"#;

    #[test]
    fn test_from_toml() {
        let config = AppConfig::from_toml(SAMPLE).expect("解析示例配置失败");
        assert_eq!(config.api.bind_address, "0.0.0.0:5000");
        assert_eq!(config.scheduler.base_url, "http://ctld:8972");
        assert_eq!(config.cluster.name, "test-cluster");
        assert_eq!(config.partition_names(), vec!["CPU", "GPU"]);
        assert_eq!(config.log.format, "json");
    }

    #[test]
    fn test_partition_order_is_preserved() {
        let config = AppConfig::from_toml(SAMPLE).unwrap();
        let names = config.partition_names();
        assert_eq!(names[0], "CPU");
        assert_eq!(names[1], "GPU");
    }

    #[test]
    fn test_empty_partitions_rejected() {
        let toml_str = SAMPLE.replace("[{ name = \"CPU\" }, { name = \"GPU\" }]", "[]");
        let err = AppConfig::from_toml(&toml_str).unwrap_err();
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_bad_bind_address_rejected() {
        let toml_str = SAMPLE.replace("0.0.0.0:5000", "not-an-address");
        assert!(AppConfig::from_toml(&toml_str).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let toml_str = SAMPLE.replace("request_timeout_seconds = 10", "request_timeout_seconds = 0");
        assert!(AppConfig::from_toml(&toml_str).is_err());
    }
}
