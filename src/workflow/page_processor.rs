//! 单页处理流程 - 流程层
//!
//! 流程顺序：
//! 1. 以参考倍率渲染整页（只渲染一次）
//! 2. 裁出题目区域与答案区域
//! 3. 读取文本层 → 答案识别（文本层 → OCR 兜底）
//! 4. 组装题目记录
//!
//! 渲染、裁剪、编码出错只影响本页：记录日志后返回 `None`，文件继续处理。

use crate::error::AppResult;
use crate::infrastructure::pdf_backend::PdfDocument;
use crate::infrastructure::raster;
use crate::models::calibration::CalibrationConfig;
use crate::models::geometry::REFERENCE_SCALE;
use crate::models::question::{answer_label, ExtractedQuestion};
use crate::services::{AnswerDetector, DetectionSource};
use crate::workflow::page_ctx::PageCtx;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 单页处理流程
///
/// - 不持有文档，由调用方传入
/// - 只依赖业务能力（AnswerDetector）
pub struct PageProcessor {
    detector: Arc<AnswerDetector>,
    jpeg_quality: u8,
}

impl PageProcessor {
    pub fn new(detector: Arc<AnswerDetector>, jpeg_quality: u8) -> Self {
        Self {
            detector,
            jpeg_quality,
        }
    }

    /// 处理单页，失败时返回 `None`
    pub async fn process(
        &self,
        document: &dyn PdfDocument,
        ctx: &PageCtx,
        config: &CalibrationConfig,
    ) -> Option<ExtractedQuestion> {
        match self.try_process(document, ctx, config).await {
            Ok(question) => Some(question),
            Err(e) => {
                error!("{} ❌ 页面处理失败，已跳过: {}", ctx, e);
                None
            }
        }
    }

    async fn try_process(
        &self,
        document: &dyn PdfDocument,
        ctx: &PageCtx,
        config: &CalibrationConfig,
    ) -> AppResult<ExtractedQuestion> {
        let page_raster = document.render_page(ctx.page_number, REFERENCE_SCALE).await?;
        debug!(
            "{} 渲染完成: {}x{}",
            ctx,
            page_raster.width(),
            page_raster.height()
        );

        let question_raster = raster::crop(&page_raster, &config.question_box)?;
        let answer_raster = raster::crop(&page_raster, &config.answer_box)?;
        drop(page_raster);

        let question_image = raster::encode_jpeg_data_url(&question_raster, self.jpeg_quality)?;
        let verification_image = raster::encode_jpeg_data_url(&answer_raster, self.jpeg_quality)?;

        // 文本层读不到时按扫描件处理，交给 OCR
        let fragments = match document.text_fragments(ctx.page_number).await {
            Ok(fragments) => fragments,
            Err(e) => {
                warn!("{} ⚠️ 文本层读取失败，改用 OCR: {}", ctx, e);
                Vec::new()
            }
        };

        let detection = self
            .detector
            .detect(&fragments, &config.answer_box, &answer_raster)
            .await;

        match detection.source {
            DetectionSource::TextLayer => {
                info!("{} ✓ 文本层识别答案: {}", ctx, answer_label(detection.letter))
            }
            DetectionSource::Ocr => {
                info!("{} ✓ OCR 识别答案: {}", ctx, answer_label(detection.letter))
            }
            DetectionSource::Undetected => warn!("{} ⚠️ 未能识别答案，记为 ?", ctx),
        }

        Ok(ExtractedQuestion::new(
            question_image,
            verification_image,
            detection.letter,
        ))
    }
}
