//! # PDF Question Extract
//!
//! 从固定版式的 PDF 试卷中批量抽取题目截图与正确答案
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部能力（poppler、tesseract、文件系统），只暴露接口
//! - `PdfBackend` / `PdfDocument` - 打开文档、渲染页面、读取文本层
//! - `TextRecognizer` - 单行 OCR
//! - `CalibrationStore` / `TestSink` - 校准配置与抽取结果的持久化
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 只处理单页的答案区域
//! - `alphabet` - 字母变体归一化
//! - `marker` - 标记短语定位与答案抽取
//! - `AnswerDetector` - 文本层优先，OCR 兜底
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一页"的完整处理流程
//! - `PageCtx` - 上下文封装（文件序号 + 页码）
//! - `PageProcessor` - 渲染 → 裁剪 → 识别 → 组装题目
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/job_queue` - 任务队列，跨文件严格串行
//! - `orchestrator/file_processor` - 单个文件处理器，文件内分批并发
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{PdfBackend, PdfDocument, TestSink, TextRecognizer};
pub use models::{CalibrationConfig, ExtractedQuestion, ExtractedTest, Rectangle};
pub use orchestrator::{App, FileProcessor, JobQueue, RunStats};
pub use services::AnswerDetector;
pub use workflow::{PageCtx, PageProcessor};
