//! 任务队列中的任务模型

use crate::models::calibration::CalibrationConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 任务唯一标识（按提交顺序递增）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct JobId(pub u64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "等待中",
            JobStatus::Processing => "处理中",
            JobStatus::Completed => "已完成",
            JobStatus::Error => "失败",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// 待处理的源文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self { path, file_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 队列内部持有的任务
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub file: SourceFile,
    /// 提交时的校准快照
    pub calibration: CalibrationConfig,
    pub status: JobStatus,
    /// 0-100
    pub progress: u8,
    pub total_questions: usize,
}

impl Job {
    pub fn new(id: JobId, file: SourceFile, calibration: CalibrationConfig) -> Self {
        Self {
            id,
            file,
            calibration,
            status: JobStatus::Pending,
            progress: 0,
            total_questions: 0,
        }
    }

    pub fn view(&self) -> JobView {
        JobView {
            id: self.id,
            file_name: self.file.file_name.clone(),
            status: self.status,
            progress: self.progress,
            total_questions: self.total_questions,
        }
    }
}

/// 对外只读的任务视图，用于渲染进度
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub id: JobId,
    pub file_name: String,
    pub status: JobStatus,
    pub progress: u8,
    pub total_questions: usize,
}

/// 任务列表中是否仍有未结束的工作
pub fn any_working(jobs: &[JobView]) -> bool {
    jobs.iter().any(|j| !j.status.is_terminal())
}
