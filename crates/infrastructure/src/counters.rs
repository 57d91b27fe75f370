//! 实时计数查询路径:通过调度器命令行工具的文本输出获取
//! 作业数与节点数。原始文本在这里解析完毕,不向上层泄漏。

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use adapter_core::{AdapterError, AdapterResult};
use adapter_domain::{CounterQuery, JobStateFilter};

/// 命令行工具在没有分区匹配时输出的固定提示
pub const NO_MATCH_SENTINEL: &str =
    "INFO[0000] No matching partitions were found for the given filter.";

/// 计数查询的类型化结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterOutput {
    Count(u32),
    NoMatch,
}

/// 解析计数命令的输出:十进制整数或无匹配提示。
/// 其余输出一律视为致命错误,不做静默兜底。
pub fn parse_counter_output(raw: &str) -> AdapterResult<CounterOutput> {
    let line = raw.trim();
    if line == NO_MATCH_SENTINEL {
        return Ok(CounterOutput::NoMatch);
    }
    line.parse::<u32>()
        .map(CounterOutput::Count)
        .map_err(|_| AdapterError::RunCommand(format!("无法解析计数输出: {line:?}")))
}

/// 通过 `sh -c` 执行调度器CLI管道的计数实现
#[derive(Debug, Clone, Default)]
pub struct CommandCounters;

impl CommandCounters {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, command_line: &str) -> AdapterResult<String> {
        debug!("执行计数命令: {command_line}");
        let output = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AdapterError::RunCommand(format!("启动命令失败: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(AdapterError::RunCommand(format!(
                "命令退出异常({}): {}",
                output.status,
                if stderr.is_empty() { &stdout } else { &stderr }
            )));
        }

        // 无匹配提示走stderr,管道会把stdout过滤成空
        if stdout.is_empty() && !stderr.is_empty() {
            Ok(stderr)
        } else {
            Ok(stdout)
        }
    }

    async fn count(&self, command_line: &str) -> AdapterResult<u32> {
        let raw = self.run(command_line).await?;
        match parse_counter_output(&raw)? {
            CounterOutput::Count(n) => Ok(n),
            CounterOutput::NoMatch => Ok(0),
        }
    }
}

#[async_trait]
impl CounterQuery for CommandCounters {
    async fn job_count(&self, partition: &str, state: JobStateFilter) -> AdapterResult<u32> {
        let state_flag = match state {
            JobStateFilter::Running => "r",
            JobStateFilter::Pending => "p",
        };
        let command_line =
            format!("cqueue -p {partition} -t {state_flag} --noheader | wc -l");
        self.count(&command_line).await
    }

    async fn allocated_node_count(&self, partition: &str) -> AdapterResult<u32> {
        let command_line = format!(
            "cinfo -p {partition} -t alloc,mix | awk 'NR>1 {{sum+=$4}} END {{print sum}}'"
        );
        self.count(&command_line).await
    }
}
