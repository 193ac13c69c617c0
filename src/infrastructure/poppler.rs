//! 基于 lopdf + poppler 命令行工具的 PDF 后端
//!
//! lopdf 负责打开与计页，pdftoppm 负责渲染，pdftotext -bbox 负责文本层。

use crate::error::{AppError, AppResult, PdfError};
use crate::infrastructure::pdf_backend::{check_page, PdfBackend, PdfDocument, TextFragment};
use futures::future::BoxFuture;
use futures::FutureExt;
use image::RgbaImage;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::process::Command;
use tracing::debug;

/// PDF 原生单位：每英寸 72 点
const POINTS_PER_INCH: f32 = 72.0;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<word xMin="([\d.]+)" yMin="[\d.]+" xMax="[\d.]+" yMax="([\d.]+)">(.*?)</word>"#)
        .expect("word regex")
});

/// poppler 后端
#[derive(Debug, Clone)]
pub struct PopplerBackend {
    pdftoppm: String,
    pdftotext: String,
}

impl PopplerBackend {
    pub fn new(pdftoppm: impl Into<String>, pdftotext: impl Into<String>) -> Self {
        Self {
            pdftoppm: pdftoppm.into(),
            pdftotext: pdftotext.into(),
        }
    }

    async fn open_document(&self, path: &Path) -> AppResult<Box<dyn PdfDocument>> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::pdf_open_failed(path.display().to_string(), e))?;
        let document = lopdf::Document::load_mem(&bytes)
            .map_err(|e| AppError::pdf_open_failed(path.display().to_string(), e))?;
        let page_count = document.get_pages().len();
        debug!("已打开 {} ({} 页)", path.display(), page_count);

        Ok(Box::new(PopplerDocument {
            path: path.to_path_buf(),
            page_count,
            pdftoppm: self.pdftoppm.clone(),
            pdftotext: self.pdftotext.clone(),
        }))
    }
}

impl PdfBackend for PopplerBackend {
    fn open<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, AppResult<Box<dyn PdfDocument>>> {
        self.open_document(path).boxed()
    }
}

struct PopplerDocument {
    path: PathBuf,
    page_count: usize,
    pdftoppm: String,
    pdftotext: String,
}

impl PopplerDocument {
    async fn render(&self, page: usize, scale: f32) -> AppResult<RgbaImage> {
        check_page(page, self.page_count)?;
        let dpi = (POINTS_PER_INCH * scale).round().to_string();
        let page_arg = page.to_string();
        let path_arg = self.path.to_string_lossy().to_string();

        let png = run_tool(
            &self.pdftoppm,
            &["-f", &page_arg, "-l", &page_arg, "-r", &dpi, "-png", "-singlefile", &path_arg],
        )
        .await
        .map_err(|e| AppError::render_failed(page, e))?;

        let image = image::load_from_memory(&png).map_err(|e| AppError::render_failed(page, e))?;
        Ok(image.to_rgba8())
    }

    async fn words(&self, page: usize) -> AppResult<Vec<TextFragment>> {
        check_page(page, self.page_count)?;
        let page_arg = page.to_string();
        let path_arg = self.path.to_string_lossy().to_string();

        let html = run_tool(
            &self.pdftotext,
            &["-bbox", "-enc", "UTF-8", "-f", &page_arg, "-l", &page_arg, &path_arg, "-"],
        )
        .await
        .map_err(|e| PdfError::TextLayerFailed {
            page,
            reason: e.to_string(),
        })?;

        Ok(parse_bbox_words(&String::from_utf8_lossy(&html)))
    }
}

impl PdfDocument for PopplerDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(&self, page: usize, scale: f32) -> BoxFuture<'_, AppResult<RgbaImage>> {
        self.render(page, scale).boxed()
    }

    fn text_fragments(&self, page: usize) -> BoxFuture<'_, AppResult<Vec<TextFragment>>> {
        self.words(page).boxed()
    }
}

/// 运行外部工具并返回标准输出
async fn run_tool(program: &str, args: &[&str]) -> AppResult<Vec<u8>> {
    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| AppError::tool_failed(program, e))?;

    if !output.status.success() {
        return Err(AppError::tool_failed(
            program,
            format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }
    Ok(output.stdout)
}

/// 解析 `pdftotext -bbox` 输出中的单词，锚点取左下角
fn parse_bbox_words(html: &str) -> Vec<TextFragment> {
    WORD_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let x = cap[1].parse::<f32>().ok()?;
            let y = cap[2].parse::<f32>().ok()?;
            Some(TextFragment::new(unescape_html(&cap[3]), x, y))
        })
        .collect()
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_words_with_bottom_left_anchor() {
        let html = r#"<page width="595.276000" height="841.890000">
    <word xMin="56.800000" yMin="57.208000" xMax="88.456000" yMax="69.160000">الإجابة</word>
    <word xMin="90.000000" yMin="57.000000" xMax="99.500000" yMax="69.000000">A&amp;B</word>
</page>"#;
        let words = parse_bbox_words(html);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0], TextFragment::new("الإجابة", 56.8, 69.16));
        assert_eq!(words[1].text, "A&B");
    }

    #[test]
    fn empty_text_layer_yields_no_words() {
        assert!(parse_bbox_words("<page width=\"1\" height=\"1\">\n</page>").is_empty());
    }

    #[tokio::test]
    async fn unreadable_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let backend = PopplerBackend::new("pdftoppm", "pdftotext");
        let err = backend.open(&path).await.err().unwrap();
        assert!(matches!(err, AppError::Pdf(PdfError::OpenFailed { .. })));
    }
}
