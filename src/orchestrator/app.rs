//! 应用装配 - 编排层
//!
//! 负责把基础设施、能力与调度器装配起来，并驱动一次批量运行：
//! 读取校准快照 → 提交全部文件 → 等待队列清空 → 输出统计。

use crate::config::Config;
use crate::infrastructure::{
    CalibrationStore, FileCalibrationStore, JsonDirSink, PdfBackend, PopplerBackend,
    TesseractRecognizer, TestSink, TextRecognizer,
};
use crate::models::job::{JobStatus, JobView, SourceFile};
use crate::models::loaders::load_vocabulary;
use crate::models::vocabulary::MarkerVocabulary;
use crate::orchestrator::file_processor::FileProcessor;
use crate::orchestrator::job_queue::JobQueue;
use crate::services::AnswerDetector;
use crate::utils::logging;
use crate::workflow::PageProcessor;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// 一次运行的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub questions: usize,
}

impl RunStats {
    pub fn from_jobs(jobs: &[JobView]) -> Self {
        jobs.iter().fold(Self::default(), |mut stats, job| {
            stats.total += 1;
            match job.status {
                JobStatus::Completed => {
                    stats.completed += 1;
                    stats.questions += job.total_questions;
                }
                JobStatus::Error => stats.failed += 1,
                JobStatus::Pending | JobStatus::Processing => {}
            }
            stats
        })
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    calibration: Arc<dyn CalibrationStore>,
    queue: JobQueue,
}

impl App {
    /// 使用默认外部能力（poppler、tesseract、JSON 目录）初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);

        let vocabulary = match &config.vocabulary_file {
            Some(path) => load_vocabulary(Path::new(path))
                .await
                .with_context(|| format!("无法加载词表: {}", path))?,
            None => MarkerVocabulary::default(),
        };

        let backend: Arc<dyn PdfBackend> = Arc::new(PopplerBackend::new(
            config.pdftoppm_bin.clone(),
            config.pdftotext_bin.clone(),
        ));
        let recognizer: Arc<dyn TextRecognizer> = Arc::new(TesseractRecognizer::new(
            config.tesseract_bin.clone(),
            config.ocr_language.clone(),
        ));
        let sink: Arc<dyn TestSink> = Arc::new(JsonDirSink::new(config.output_folder.clone()));
        let calibration: Arc<dyn CalibrationStore> =
            Arc::new(FileCalibrationStore::new(&config.calibration_dir));

        Ok(Self::with_parts(config, backend, recognizer, sink, calibration, vocabulary))
    }

    /// 使用指定的外部能力装配应用
    pub fn with_parts(
        config: Config,
        backend: Arc<dyn PdfBackend>,
        recognizer: Arc<dyn TextRecognizer>,
        sink: Arc<dyn TestSink>,
        calibration: Arc<dyn CalibrationStore>,
        vocabulary: MarkerVocabulary,
    ) -> Self {
        let detector = Arc::new(AnswerDetector::new(
            recognizer,
            vocabulary,
            config.binarize_threshold,
        ));
        let pages = PageProcessor::new(detector, config.jpeg_quality);
        let processor = FileProcessor::new(backend, pages, sink, config.page_batch_size);
        let queue = JobQueue::start(Arc::new(processor));

        Self {
            config,
            calibration,
            queue,
        }
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    /// 处理一批文件，等待全部结束后返回统计
    pub async fn run(&self, files: Vec<SourceFile>) -> Result<RunStats> {
        if files.is_empty() {
            warn!("⚠️ 没有找到待处理的PDF文件，程序结束");
            return Ok(RunStats::default());
        }

        // 提交时读取快照，之后重新校准不影响本批任务
        let calibration = self
            .calibration
            .require()
            .await
            .context("请先运行 calibrate 保存校准配置")?;

        logging::log_files_loaded(files.len(), self.config.page_batch_size);
        self.queue.submit(files, calibration).await?;
        self.queue.wait_idle().await?;

        let stats = RunStats::from_jobs(&self.queue.jobs());
        logging::print_final_stats(&stats, &self.config.output_log_file);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobId;

    fn view(id: u64, status: JobStatus, questions: usize) -> JobView {
        JobView {
            id: JobId(id),
            file_name: format!("{id}.pdf"),
            status,
            progress: 0,
            total_questions: questions,
        }
    }

    #[test]
    fn stats_count_terminal_states() {
        let stats = RunStats::from_jobs(&[
            view(1, JobStatus::Completed, 4),
            view(2, JobStatus::Error, 0),
            view(3, JobStatus::Completed, 2),
            view(4, JobStatus::Pending, 0),
        ]);
        assert_eq!(
            stats,
            RunStats {
                total: 4,
                completed: 2,
                failed: 1,
                questions: 6,
            }
        );
    }
}
