use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use adapter_api::{create_routes, AppState};
use adapter_core::AppConfig;
use adapter_infrastructure::{CommandCounters, CtldClient, SystemUidResolver};

/// 组装好的适配器应用:共享上下文 + 路由
pub struct Application {
    bind_address: String,
    router: Router,
}

impl Application {
    pub fn new(config: AppConfig) -> Result<Self> {
        let scheduler = CtldClient::new(&config.scheduler).context("初始化ctld客户端失败")?;
        let bind_address = config.api.bind_address.clone();

        let state = AppState {
            config: Arc::new(config),
            scheduler: Arc::new(scheduler),
            counters: Arc::new(CommandCounters::new()),
            uids: Arc::new(SystemUidResolver::new()),
        };

        Ok(Self {
            bind_address,
            router: create_routes(state),
        })
    }

    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.bind_address)
            .await
            .with_context(|| format!("监听 {} 失败", self.bind_address))?;
        info!("适配器监听于 {}", self.bind_address);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown_signal())
            .await
            .context("HTTP服务退出异常")?;

        info!("HTTP服务已优雅关闭");
        Ok(())
    }
}

/// 等待关闭信号
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("安装Ctrl+C信号处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("安装SIGTERM信号处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("收到Ctrl+C信号");
        },
        _ = terminate => {
            info!("收到SIGTERM信号");
        },
    }
}
