//! 单个文件处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个 PDF 的所有内容页，是文件级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **打开文档**：失败即文件级错误
//! 2. **跳过首页**：第 1 页为封面/说明
//! 3. **分批并发**：每批固定页数，整批完成后再开始下一批
//! 4. **进度汇报**：每批结束后按 已完成页数 / 总页数 汇报
//! 5. **结果交付**：全部批次完成后把试卷交给 `TestSink`

use crate::error::AppResult;
use crate::infrastructure::pdf_backend::PdfBackend;
use crate::infrastructure::test_sink::TestSink;
use crate::models::calibration::CalibrationConfig;
use crate::models::job::{Job, SourceFile};
use crate::models::question::ExtractedTest;
use crate::utils::logging;
use crate::workflow::{PageCtx, PageProcessor};
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 默认每批同时处理的页数
pub const DEFAULT_PAGE_BATCH_SIZE: usize = 3;

/// 第一张内容页（第 1 页总是跳过）
pub const FIRST_CONTENT_PAGE: usize = 2;

/// 试卷名称中的分隔符：名称取文件主名中第一个分隔符之前的部分
const NAME_SEPARATORS: &[char] = &['_', '-'];

/// 进度回调（0-100）
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Arc<dyn Fn(u8) + Send + Sync>,
}

impl ProgressReporter {
    pub fn new(callback: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn report(&self, percent: u8) {
        (self.callback)(percent)
    }
}

/// 已完成比例换算为百分比
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed.min(total) * 100) / total) as u8
}

/// 由文件名推导试卷名称
pub fn derive_test_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    let name = stem.split(NAME_SEPARATORS).next().unwrap_or_default().trim();
    if name.is_empty() {
        stem
    } else {
        name.to_string()
    }
}

/// 任务执行器：调度器只通过它运行任务
pub trait JobRunner: Send + Sync {
    /// 运行一个任务，返回产出的题目数量
    fn run<'a>(&'a self, job: &'a Job, progress: ProgressReporter) -> BoxFuture<'a, AppResult<usize>>;
}

/// 单个文件处理器
pub struct FileProcessor {
    backend: Arc<dyn PdfBackend>,
    pages: PageProcessor,
    sink: Arc<dyn TestSink>,
    batch_size: usize,
}

impl FileProcessor {
    pub fn new(
        backend: Arc<dyn PdfBackend>,
        pages: PageProcessor,
        sink: Arc<dyn TestSink>,
        batch_size: usize,
    ) -> Self {
        Self {
            backend,
            pages,
            sink,
            batch_size: batch_size.max(1),
        }
    }

    /// 抽取单个文件的全部题目（不交付）
    pub async fn extract(
        &self,
        file_index: u64,
        file: &SourceFile,
        config: &CalibrationConfig,
        progress: &ProgressReporter,
    ) -> AppResult<ExtractedTest> {
        let document = self.backend.open(file.path()).await?;
        let document = document.as_ref();
        let page_count = document.page_count();

        let pages: Vec<usize> = (FIRST_CONTENT_PAGE..=page_count).collect();
        let total = pages.len();
        logging::log_file_start(file_index, &file.file_name, page_count, total);

        let total_batches = total.div_ceil(self.batch_size);
        let mut questions = Vec::with_capacity(total);
        let mut completed = 0;

        for (batch_idx, batch) in pages.chunks(self.batch_size).enumerate() {
            logging::log_batch_start(file_index, batch_idx + 1, total_batches, batch);

            let tasks = batch.iter().map(|&page_number| {
                let ctx = PageCtx::new(file_index, file.file_name.clone(), page_number, page_count);
                async move { self.pages.process(document, &ctx, config).await }
            });
            // 整批完成后才开始下一批；join_all 保持页码顺序
            let results = join_all(tasks).await;

            completed += batch.len();
            let produced = results.iter().filter(|r| r.is_some()).count();
            questions.extend(results.into_iter().flatten());
            progress.report(percent(completed, total));

            logging::log_batch_complete(file_index, batch_idx + 1, produced, batch.len());
        }

        Ok(ExtractedTest {
            name: derive_test_name(&file.file_name),
            questions,
        })
    }

    /// 抽取并交付试卷
    pub async fn process(
        &self,
        file_index: u64,
        file: &SourceFile,
        config: &CalibrationConfig,
        progress: &ProgressReporter,
    ) -> AppResult<ExtractedTest> {
        let test = self.extract(file_index, file, config, progress).await?;

        let test_id = self.sink.add_test(&test.name).await?;
        self.sink
            .add_questions_to_test(&test_id, test.questions.clone())
            .await?;

        info!(
            "[文件 {}] 📤 试卷已交付: {} (ID: {})",
            file_index, test.name, test_id
        );
        logging::log_file_complete(file_index, &test);
        Ok(test)
    }
}

impl JobRunner for FileProcessor {
    fn run<'a>(&'a self, job: &'a Job, progress: ProgressReporter) -> BoxFuture<'a, AppResult<usize>> {
        async move {
            let test = self
                .process(job.id.0, &job.file, &job.calibration, &progress)
                .await?;
            Ok(test.questions.len())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_text_before_first_separator() {
        assert_eq!(derive_test_name("Math_2023_final.pdf"), "Math");
        assert_eq!(derive_test_name("رياضيات-الفصل الأول.pdf"), "رياضيات");
        assert_eq!(derive_test_name("exam.v2.pdf"), "exam.v2");
        assert_eq!(derive_test_name("_leading.pdf"), "_leading");
    }

    #[test]
    fn percent_is_bounded_and_floors() {
        assert_eq!(percent(0, 9), 0);
        assert_eq!(percent(3, 9), 33);
        assert_eq!(percent(9, 9), 100);
        assert_eq!(percent(12, 9), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn reporter_forwards_values() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = ProgressReporter::new(move |p| sink.lock().unwrap().push(p));
        reporter.report(33);
        reporter.clone().report(100);
        ProgressReporter::noop().report(50);
        assert_eq!(*seen.lock().unwrap(), vec![33, 100]);
    }
}
