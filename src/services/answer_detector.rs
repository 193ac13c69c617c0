//! 答案识别服务 - 业务能力层
//!
//! 两段式识别：先用免费且精确的文本层，失败时才对答案区域二值化后做 OCR。
//! 文本层一旦命中就不再调用 OCR；两者都失败时返回未知，由人工复核。

use crate::infrastructure::pdf_backend::TextFragment;
use crate::infrastructure::raster;
use crate::infrastructure::recognizer::TextRecognizer;
use crate::models::geometry::Rectangle;
use crate::models::question::AnswerLetter;
use crate::models::vocabulary::MarkerVocabulary;
use crate::services::{alphabet, marker, text_layer};
use image::RgbaImage;
use std::sync::Arc;
use tracing::{debug, warn};

/// 答案来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    TextLayer,
    Ocr,
    Undetected,
}

/// 单页识别结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub letter: Option<AnswerLetter>,
    pub source: DetectionSource,
}

impl Detection {
    fn undetected() -> Self {
        Self {
            letter: None,
            source: DetectionSource::Undetected,
        }
    }
}

/// 答案识别服务
///
/// 职责：
/// - 只处理单页的答案区域
/// - 不关心文件、批次与进度
/// - 识别失败永远不是错误
pub struct AnswerDetector {
    recognizer: Arc<dyn TextRecognizer>,
    vocabulary: MarkerVocabulary,
    binarize_threshold: u8,
    ocr_hint: String,
}

impl AnswerDetector {
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        vocabulary: MarkerVocabulary,
        binarize_threshold: u8,
    ) -> Self {
        let mut hint: Vec<char> = alphabet::alphabet_chars()
            .chars()
            .chain(vocabulary.marker_chars().chars())
            .collect();
        hint.sort_unstable();
        hint.dedup();

        Self {
            recognizer,
            vocabulary,
            binarize_threshold,
            ocr_hint: hint.into_iter().collect(),
        }
    }

    /// OCR 白名单：选项字母表 + 标记短语字符
    pub fn ocr_hint(&self) -> &str {
        &self.ocr_hint
    }

    /// 文本层识别
    pub fn detect_from_text(
        &self,
        fragments: &[TextFragment],
        answer_box: &Rectangle,
    ) -> Option<AnswerLetter> {
        let text = text_layer::collect_answer_text(fragments, answer_box);
        if text.is_empty() {
            return None;
        }
        debug!("答案区域文本层: {}", text);
        marker::extract_answer(&text, &self.vocabulary)
    }

    /// 图像 OCR 识别；OCR 失败按未识别处理
    pub async fn detect_from_image(&self, answer_raster: &RgbaImage) -> Option<AnswerLetter> {
        let binary = raster::binarize(answer_raster, self.binarize_threshold);
        match self.recognizer.recognize(&binary, &self.ocr_hint).await {
            Ok(text) => {
                debug!("答案区域 OCR: {}", text);
                marker::extract_answer(&text, &self.vocabulary)
            }
            Err(e) => {
                warn!("⚠️ OCR 识别失败，答案记为未知: {}", e);
                None
            }
        }
    }

    /// 先文本层、后 OCR，第一个成功的结果生效
    pub async fn detect(
        &self,
        fragments: &[TextFragment],
        answer_box: &Rectangle,
        answer_raster: &RgbaImage,
    ) -> Detection {
        if let Some(letter) = self.detect_from_text(fragments, answer_box) {
            return Detection {
                letter: Some(letter),
                source: DetectionSource::TextLayer,
            };
        }

        match self.detect_from_image(answer_raster).await {
            Some(letter) => Detection {
                letter: Some(letter),
                source: DetectionSource::Ocr,
            },
            None => Detection::undetected(),
        }
    }
}
