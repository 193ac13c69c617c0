//! 流程层（Workflow）
//!
//! 定义"一页"的完整处理流程

pub mod page_ctx;
pub mod page_processor;

pub use page_ctx::PageCtx;
pub use page_processor::PageProcessor;
