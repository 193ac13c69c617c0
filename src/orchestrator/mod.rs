//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `job_queue` - 任务队列与调度器
//! - 持有任务列表（Vec<Job>），保证最多一个任务处理中
//! - 严格按提交顺序运行，支持取消等待中的任务
//! - 发布只读任务视图供进度展示
//!
//! ### `file_processor` - 单个文件处理器
//! - 打开 PDF，跳过首页
//! - 按固定批大小并发处理内容页
//! - 汇报进度并交付试卷
//!
//! ### `app` - 应用装配
//!
//! ## 层次关系
//!
//! ```text
//! job_queue (处理 Vec<Job>，跨文件串行)
//!     ↓
//! file_processor (处理 Vec<Page>，文件内分批并发)
//!     ↓
//! workflow::PageProcessor (处理单页)
//!     ↓
//! services (能力层：答案识别)
//!     ↓
//! infrastructure (基础设施：PDF / OCR / 存储)
//! ```

pub mod app;
pub mod file_processor;
pub mod job_queue;

// 重新导出主要类型
pub use app::{App, RunStats};
pub use file_processor::{derive_test_name, FileProcessor, JobRunner, ProgressReporter};
pub use job_queue::JobQueue;
