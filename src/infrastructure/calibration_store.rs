//! 校准配置的持久化

use crate::error::{AppResult, CalibrationError};
use crate::models::calibration::CalibrationConfig;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

/// 校准配置持久化使用的固定键
pub const CALIBRATION_KEY: &str = "pdf_calibration";

/// 校准配置存储
pub trait CalibrationStore: Send + Sync {
    /// 保存（覆盖）校准配置
    fn save<'a>(&'a self, config: &'a CalibrationConfig) -> BoxFuture<'a, AppResult<()>>;

    /// 读取最近一次保存的配置；从未保存过时返回 `None`
    fn load(&self) -> BoxFuture<'_, AppResult<Option<CalibrationConfig>>>;

    /// 读取配置，未校准时报错
    fn require(&self) -> BoxFuture<'_, AppResult<CalibrationConfig>> {
        self.load()
            .map(|loaded| {
                loaded.and_then(|config| config.ok_or_else(|| CalibrationError::NotConfigured.into()))
            })
            .boxed()
    }
}

fn warn_if_degenerate(config: &CalibrationConfig) {
    if config.has_empty_region() {
        warn!(
            "⚠️ 校准区域存在零面积框 (题目: {}, 答案: {})，输出质量会下降",
            config.question_box, config.answer_box
        );
    }
}

/// 以 JSON 文件保存在目录下的校准存储
pub struct FileCalibrationStore {
    path: PathBuf,
}

impl FileCalibrationStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", CALIBRATION_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist_err(&self, source: std::io::Error) -> CalibrationError {
        CalibrationError::Persist {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn malformed_err(&self, source: serde_json::Error) -> CalibrationError {
        CalibrationError::Malformed {
            path: self.path.display().to_string(),
            source,
        }
    }

    async fn write(&self, config: &CalibrationConfig) -> AppResult<()> {
        warn_if_degenerate(config);
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.persist_err(e))?;
        }
        let json = serde_json::to_string_pretty(config).map_err(|e| self.malformed_err(e))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.persist_err(e))?;
        info!("✓ 校准配置已保存: {}", self.path.display());
        Ok(())
    }

    async fn read(&self) -> AppResult<Option<CalibrationConfig>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.persist_err(e).into()),
        };
        let config = serde_json::from_str(&raw).map_err(|e| self.malformed_err(e))?;
        Ok(Some(config))
    }
}

impl CalibrationStore for FileCalibrationStore {
    fn save<'a>(&'a self, config: &'a CalibrationConfig) -> BoxFuture<'a, AppResult<()>> {
        self.write(config).boxed()
    }

    fn load(&self) -> BoxFuture<'_, AppResult<Option<CalibrationConfig>>> {
        self.read().boxed()
    }
}

/// 内存中的校准存储
#[derive(Default)]
pub struct MemoryCalibrationStore {
    config: Mutex<Option<CalibrationConfig>>,
}

impl MemoryCalibrationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CalibrationStore for MemoryCalibrationStore {
    fn save<'a>(&'a self, config: &'a CalibrationConfig) -> BoxFuture<'a, AppResult<()>> {
        warn_if_degenerate(config);
        *self.config.lock().unwrap_or_else(|e| e.into_inner()) = Some(*config);
        futures::future::ready(Ok(())).boxed()
    }

    fn load(&self) -> BoxFuture<'_, AppResult<Option<CalibrationConfig>>> {
        let config = *self.config.lock().unwrap_or_else(|e| e.into_inner());
        futures::future::ready(Ok(config)).boxed()
    }
}
