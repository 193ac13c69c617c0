//! 集成测试共用的假实现：内存 PDF、计数 OCR、可控的任务执行器

#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use image::{GrayImage, Rgba, RgbaImage};
use pdf_question_extract::error::{AppError, AppResult};
use pdf_question_extract::infrastructure::{PdfBackend, PdfDocument, TextFragment, TextRecognizer};
use pdf_question_extract::models::job::{Job, JobStatus, JobView, SourceFile};
use pdf_question_extract::models::{CalibrationConfig, Rectangle};
use pdf_question_extract::orchestrator::{JobQueue, JobRunner, ProgressReporter};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

/// 渲染尺寸（参考缩放空间）
pub const PAGE_WIDTH: u32 = 600;
pub const PAGE_HEIGHT: u32 = 800;

pub fn calibration() -> CalibrationConfig {
    CalibrationConfig::new(
        Rectangle::new(20, 40, 400, 300),
        Rectangle::new(20, 600, 400, 80),
    )
}

/// 答案框内的文本层片段（文档空间坐标）
pub fn answer_fragment(text: &str) -> TextFragment {
    TextFragment::new(text, 30.0, 320.0)
}

#[derive(Clone, Default)]
pub struct FakePage {
    pub fragments: Vec<TextFragment>,
    pub render_fails: bool,
}

impl FakePage {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            fragments: vec![answer_fragment(text)],
            render_fails: false,
        }
    }

    /// 同一行的多个单词，`x` 为文档空间横坐标
    pub fn with_words(words: &[(&str, f32)]) -> Self {
        Self {
            fragments: words
                .iter()
                .map(|(text, x)| TextFragment::new(*text, *x, 320.0))
                .collect(),
            render_fails: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            fragments: Vec::new(),
            render_fails: true,
        }
    }
}

#[derive(Clone)]
struct FakeDocument {
    pages: Arc<Vec<FakePage>>,
}

impl FakeDocument {
    fn page(&self, page: usize) -> AppResult<&FakePage> {
        page.checked_sub(1)
            .and_then(|idx| self.pages.get(idx))
            .ok_or_else(|| AppError::render_failed(page, "页码超出范围"))
    }
}

impl PdfDocument for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn render_page(&self, page: usize, _scale: f32) -> BoxFuture<'_, AppResult<RgbaImage>> {
        let result = self.page(page).and_then(|p| {
            if p.render_fails {
                Err(AppError::render_failed(page, "模拟渲染失败"))
            } else {
                Ok(RgbaImage::from_pixel(
                    PAGE_WIDTH,
                    PAGE_HEIGHT,
                    Rgba([255, 255, 255, 255]),
                ))
            }
        });
        futures::future::ready(result).boxed()
    }

    fn text_fragments(&self, page: usize) -> BoxFuture<'_, AppResult<Vec<TextFragment>>> {
        let result = self.page(page).map(|p| p.fragments.clone());
        futures::future::ready(result).boxed()
    }
}

/// 按文件名提供文档的内存后端；未登记的文件打开失败
#[derive(Default)]
pub struct FakeBackend {
    documents: Mutex<HashMap<String, Arc<Vec<FakePage>>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, file_name: &str, pages: Vec<FakePage>) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(file_name.to_string(), Arc::new(pages));
        self
    }
}

impl PdfBackend for FakeBackend {
    fn open<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, AppResult<Box<dyn PdfDocument>>> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let result = match self.documents.lock().unwrap().get(&name) {
            Some(pages) => Ok(Box::new(FakeDocument {
                pages: pages.clone(),
            }) as Box<dyn PdfDocument>),
            None => Err(AppError::pdf_open_failed(name, "不是有效的 PDF")),
        };
        futures::future::ready(result).boxed()
    }
}

/// 返回固定文本并计数的 OCR
pub struct CountingOcr {
    reply: String,
    calls: AtomicUsize,
}

impl CountingOcr {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: text.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextRecognizer for CountingOcr {
    fn recognize<'a>(
        &'a self,
        _image: &'a GrayImage,
        _alphabet_hint: &'a str,
    ) -> BoxFuture<'a, AppResult<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        futures::future::ready(Ok(self.reply.clone())).boxed()
    }
}

/// 每个任务都要等一个许可才能结束的执行器，用于观察调度行为
pub struct GatedRunner {
    gate: Semaphore,
    active: AtomicUsize,
    max_active: AtomicUsize,
    started: Mutex<Vec<String>>,
    failing: HashSet<String>,
}

impl GatedRunner {
    pub fn new() -> Arc<Self> {
        Self::failing_on(&[])
    }

    pub fn failing_on(file_names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            gate: Semaphore::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            started: Mutex::new(Vec::new()),
            failing: file_names.iter().map(|n| n.to_string()).collect(),
        })
    }

    /// 放行 n 个任务
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl JobRunner for GatedRunner {
    fn run<'a>(&'a self, job: &'a Job, progress: ProgressReporter) -> BoxFuture<'a, AppResult<usize>> {
        async move {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            self.started.lock().unwrap().push(job.file.file_name.clone());

            progress.report(40);
            // 倒退的进度值不应被采纳
            progress.report(10);

            self.gate.acquire().await.expect("gate closed").forget();
            self.active.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(&job.file.file_name) {
                return Err(AppError::pdf_open_failed(&job.file.file_name, "模拟失败"));
            }
            Ok(1)
        }
        .boxed()
    }
}

pub fn files(names: &[&str]) -> Vec<SourceFile> {
    names.iter().map(|n| SourceFile::new(*n)).collect()
}

pub fn statuses(queue: &JobQueue) -> Vec<JobStatus> {
    queue.jobs().iter().map(|j| j.status).collect()
}

/// 等待任务列表满足条件（最多 5 秒）
pub async fn wait_for(queue: &JobQueue, predicate: impl Fn(&[JobView]) -> bool) {
    let mut view = queue.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if predicate(&view.borrow_and_update()) {
                return;
            }
            view.changed().await.expect("scheduler stopped");
        }
    })
    .await
    .expect("timed out waiting for queue state");
}
