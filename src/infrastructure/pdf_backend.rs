//! PDF 能力接口 - 基础设施层
//!
//! 只暴露"打开文档 / 渲染页面 / 读取文本层"三种能力，不认识题目与校准。

use crate::error::AppResult;
use crate::models::geometry::REFERENCE_SCALE;
use futures::future::BoxFuture;
use image::RgbaImage;
use std::path::Path;

/// 文本层中的一段文字
///
/// 坐标为文档空间（单位：点，原点在页面左上角），锚点是文字的左下角（基线附近）。
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }

    /// 转换到参考缩放的像素空间（与校准同一坐标系）
    pub fn to_reference_space(&self) -> (f32, f32) {
        (self.x * REFERENCE_SCALE, self.y * REFERENCE_SCALE)
    }
}

/// 已打开的 PDF 文档
///
/// 页码从 1 开始。
pub trait PdfDocument: Send + Sync {
    fn page_count(&self) -> usize;

    /// 以给定倍率渲染整页
    fn render_page(&self, page: usize, scale: f32) -> BoxFuture<'_, AppResult<RgbaImage>>;

    /// 读取整页的文本层；扫描件返回空列表
    fn text_fragments(&self, page: usize) -> BoxFuture<'_, AppResult<Vec<TextFragment>>>;
}

/// PDF 后端：负责打开文档
pub trait PdfBackend: Send + Sync {
    fn open<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, AppResult<Box<dyn PdfDocument>>>;
}

/// 页码合法性检查
pub(crate) fn check_page(page: usize, page_count: usize) -> AppResult<()> {
    if page == 0 || page > page_count {
        return Err(crate::error::PdfError::PageOutOfRange { page, page_count }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_scales_to_reference_space() {
        let fragment = TextFragment::new("ب", 100.0, 50.5);
        assert_eq!(fragment.to_reference_space(), (200.0, 101.0));
    }

    #[test]
    fn page_numbers_are_one_based() {
        assert!(check_page(0, 3).is_err());
        assert!(check_page(1, 3).is_ok());
        assert!(check_page(3, 3).is_ok());
        assert!(check_page(4, 3).is_err());
    }
}
