//! 页面处理上下文
//!
//! 封装"我正在处理哪个文件的第几页"这一信息

use std::fmt::Display;

/// 页面处理上下文
#[derive(Debug, Clone)]
pub struct PageCtx {
    /// 文件在本次运行中的序号（仅用于日志显示）
    pub file_index: u64,

    pub file_name: String,

    /// 页码（从1开始）
    pub page_number: usize,

    pub total_pages: usize,
}

impl PageCtx {
    pub fn new(file_index: u64, file_name: String, page_number: usize, total_pages: usize) -> Self {
        Self {
            file_index,
            file_name,
            page_number,
            total_pages,
        }
    }
}

impl Display for PageCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[文件 {} 第 {}/{} 页]",
            self.file_index, self.page_number, self.total_pages
        )
    }
}
