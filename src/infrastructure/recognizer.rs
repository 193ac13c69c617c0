//! OCR 能力接口 - 基础设施层

use crate::error::{AppResult, OcrError};
use crate::infrastructure::raster;
use futures::future::BoxFuture;
use futures::FutureExt;
use image::GrayImage;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// 文字识别器
///
/// `alphabet_hint` 为允许出现的字符集合，引擎应尽量只输出这些字符。
pub trait TextRecognizer: Send + Sync {
    fn recognize<'a>(
        &'a self,
        image: &'a GrayImage,
        alphabet_hint: &'a str,
    ) -> BoxFuture<'a, AppResult<String>>;
}

/// 调用 tesseract 命令行的识别器（单行模式）
pub struct TesseractRecognizer {
    program: String,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(program: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
        }
    }

    fn build_args(&self, alphabet_hint: &str) -> Vec<String> {
        let mut args = vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "--psm".to_string(),
            "7".to_string(),
        ];
        if !alphabet_hint.is_empty() {
            args.push("-c".to_string());
            args.push(format!("tessedit_char_whitelist={}", alphabet_hint));
        }
        args
    }

    async fn run(&self, image: &GrayImage, alphabet_hint: &str) -> AppResult<String> {
        if image.width() == 0 || image.height() == 0 {
            debug!("OCR 输入为空图，跳过识别");
            return Ok(String::new());
        }
        let png = raster::encode_png(image)?;

        let mut child = Command::new(&self.program)
            .args(self.build_args(alphabet_hint))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| OcrError::SpawnFailed {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("OCR 输出: {}", text);
        Ok(text)
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize<'a>(
        &'a self,
        image: &'a GrayImage,
        alphabet_hint: &'a str,
    ) -> BoxFuture<'a, AppResult<String>> {
        self.run(image, alphabet_hint).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_use_single_line_mode_and_whitelist() {
        let recognizer = TesseractRecognizer::new("tesseract", "ara");
        let args = recognizer.build_args("أبجد");
        assert_eq!(&args[..6], &["stdin", "stdout", "-l", "ara", "--psm", "7"]);
        assert_eq!(args.last().unwrap(), "tessedit_char_whitelist=أبجد");
        assert_eq!(recognizer.build_args("").len(), 6);
    }

    #[tokio::test]
    async fn empty_image_short_circuits() {
        let recognizer = TesseractRecognizer::new("/nonexistent/tesseract", "ara");
        let text = recognizer.recognize(&GrayImage::new(0, 0), "أ").await.unwrap();
        assert!(text.is_empty());
    }
}
