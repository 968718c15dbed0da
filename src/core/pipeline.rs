use crate::config::ExtractConfig;
use crate::core::workspace::Workspace;
use crate::domain::ports::Extractor;
use crate::utils::error::{ExtractError, Result, Stage};
use async_trait::async_trait;
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

/// 一次外部工具呼叫
#[derive(Debug, Clone)]
pub struct ToolCommand {
    stage: Stage,
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(stage: Stage, program: impl Into<PathBuf>) -> Self {
        Self {
            stage,
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// 錯誤訊息中用來重現的完整命令列
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn build(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::null());
        cmd
    }

    fn launch_error(&self, source: std::io::Error) -> ExtractError {
        ExtractError::ToolLaunchError {
            stage: self.stage,
            command: self.command_line(),
            source,
        }
    }

    fn check_status(&self, status: ExitStatus, stderr: &[u8]) -> Result<()> {
        if status.success() {
            return Ok(());
        }
        Err(ExtractError::PipelineError {
            stage: self.stage,
            command: self.command_line(),
            exit_code: status.code(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        })
    }

    /// stdout 直接寫入檔案（不經過記憶體），stderr 收集起來當診斷
    pub async fn run_to_file(&self, out_path: &Path) -> Result<()> {
        let out_file = tokio::fs::File::create(out_path).await?.into_std().await;

        tracing::debug!("Running {} (stdout -> {})", self.command_line(), out_path.display());
        let child = self
            .build()
            .stdout(Stdio::from(out_file))
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.launch_error(e))?;

        self.check_status(output.status, &output.stderr)
    }

    pub async fn run(&self) -> Result<()> {
        tracing::debug!("Running {}", self.command_line());
        let output = self
            .build()
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.launch_error(e))?;

        self.check_status(output.status, &output.stderr)
    }
}

/// gol 先粗選，osmium 再精確裁切成 PBF
#[derive(Debug, Clone)]
pub struct ToolPipeline {
    dataset_path: PathBuf,
    gol_path: PathBuf,
    osmium_path: PathBuf,
}

impl ToolPipeline {
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            dataset_path: config.dataset_path.clone(),
            gol_path: config.gol_path.clone(),
            osmium_path: config.osmium_path.clone(),
        }
    }

    pub fn query_command(&self, workspace: &Workspace) -> ToolCommand {
        ToolCommand::new(Stage::Query, &self.gol_path)
            .arg("query")
            .arg(&self.dataset_path)
            .arg("-a")
            .arg(workspace.input_path())
            .arg("-f")
            .arg("xml")
            .arg("*")
    }

    pub fn clip_command(&self, workspace: &Workspace) -> ToolCommand {
        ToolCommand::new(Stage::Clip, &self.osmium_path)
            .arg("extract")
            .arg("--polygon")
            .arg(workspace.input_path())
            .arg(workspace.intermediate_path())
            .arg("-o")
            .arg(workspace.output_path())
    }
}

#[async_trait]
impl Extractor for ToolPipeline {
    async fn extract(&self, workspace: &Workspace, boundary: &Value) -> Result<Vec<u8>> {
        // gol 只吃 geometry，整個 Feature 會讓它誤判
        tokio::fs::write(workspace.input_path(), serde_json::to_vec(boundary)?).await?;

        self.query_command(workspace)
            .run_to_file(workspace.intermediate_path())
            .await?;

        // gol 輸出的是 XML，且跨越邊界的長 way/relation 未被裁切，交給 osmium 再處理一次
        self.clip_command(workspace).run().await?;

        let payload = tokio::fs::read(workspace.output_path()).await?;
        tracing::debug!("Extract produced {} bytes", payload.len());
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::workspace::WorkspaceManager;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn pipeline() -> ToolPipeline {
        ToolPipeline::new(&ExtractConfig {
            dataset_path: PathBuf::from("/srv/england.gol"),
            gol_path: PathBuf::from("/opt/bin/gol"),
            osmium_path: PathBuf::from("/usr/bin/osmium"),
            ..ExtractConfig::default()
        })
    }

    #[tokio::test]
    async fn test_query_command_line() {
        let temp = TempDir::new().unwrap();
        let workspace = WorkspaceManager::new(temp.path(), "ws-")
            .acquire(Uuid::new_v4())
            .await
            .unwrap();

        let line = pipeline().query_command(&workspace).command_line();

        assert_eq!(
            line,
            format!(
                "/opt/bin/gol query /srv/england.gol -a {} -f xml *",
                workspace.input_path().display()
            )
        );
        workspace.release().await;
    }

    #[tokio::test]
    async fn test_clip_command_line() {
        let temp = TempDir::new().unwrap();
        let workspace = WorkspaceManager::new(temp.path(), "ws-")
            .acquire(Uuid::new_v4())
            .await
            .unwrap();

        let line = pipeline().clip_command(&workspace).command_line();

        assert_eq!(
            line,
            format!(
                "/usr/bin/osmium extract --polygon {} {} -o {}",
                workspace.input_path().display(),
                workspace.intermediate_path().display(),
                workspace.output_path().display()
            )
        );
        workspace.release().await;
    }

    #[tokio::test]
    async fn test_missing_binary_is_launch_error() {
        let temp = TempDir::new().unwrap();
        let command = ToolCommand::new(Stage::Query, temp.path().join("no-such-tool")).arg("query");

        let result = command.run_to_file(&temp.path().join("out.xml")).await;

        match result {
            Err(ExtractError::ToolLaunchError { stage, command, .. }) => {
                assert_eq!(stage, Stage::Query);
                assert!(command.ends_with("no-such-tool query"));
            }
            other => panic!("expected launch error, got {:?}", other),
        }
    }
}
