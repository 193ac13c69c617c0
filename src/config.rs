use crate::orchestrator::file_processor::DEFAULT_PAGE_BATCH_SIZE;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 单个文件内同时处理的页数（每批页数）
    pub page_batch_size: usize,
    /// 待处理 PDF 存放目录
    pub input_folder: String,
    /// 抽取结果输出目录
    pub output_folder: String,
    /// 校准配置存放目录
    pub calibration_dir: String,
    /// 标记短语词表（TOML），为空时使用内置词表
    pub vocabulary_file: Option<String>,
    /// OCR 前二值化的亮度阈值
    pub binarize_threshold: u8,
    /// 题目截图的 JPEG 质量
    pub jpeg_quality: u8,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    // --- 外部工具 ---
    pub ocr_language: String,
    pub pdftoppm_bin: String,
    pub pdftotext_bin: String,
    pub tesseract_bin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_batch_size: DEFAULT_PAGE_BATCH_SIZE,
            input_folder: "input_pdf".to_string(),
            output_folder: "output_tests".to_string(),
            calibration_dir: ".calibration".to_string(),
            vocabulary_file: None,
            binarize_threshold: 150,
            jpeg_quality: 80,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            ocr_language: "ara".to_string(),
            pdftoppm_bin: "pdftoppm".to_string(),
            pdftotext_bin: "pdftotext".to_string(),
            tesseract_bin: "tesseract".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源构建配置，未设置或无法解析的项保留默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            page_batch_size: lookup("PAGE_BATCH_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(default.page_batch_size),
            input_folder: lookup("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: lookup("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            calibration_dir: lookup("CALIBRATION_DIR").unwrap_or(default.calibration_dir),
            vocabulary_file: lookup("VOCABULARY_FILE").or(default.vocabulary_file),
            binarize_threshold: lookup("BINARIZE_THRESHOLD").and_then(|v| v.parse().ok()).unwrap_or(default.binarize_threshold),
            jpeg_quality: lookup("JPEG_QUALITY")
                .and_then(|v| v.parse().ok())
                .filter(|q: &u8| (1..=100).contains(q))
                .unwrap_or(default.jpeg_quality),
            verbose_logging: lookup("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            ocr_language: lookup("OCR_LANGUAGE").unwrap_or(default.ocr_language),
            pdftoppm_bin: lookup("PDFTOPPM_BIN").unwrap_or(default.pdftoppm_bin),
            pdftotext_bin: lookup("PDFTOTEXT_BIN").unwrap_or(default.pdftotext_bin),
            tesseract_bin: lookup("TESSERACT_BIN").unwrap_or(default.tesseract_bin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_apply_and_bad_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PAGE_BATCH_SIZE", "5"),
            ("BINARIZE_THRESHOLD", "not-a-number"),
            ("JPEG_QUALITY", "0"),
            ("OCR_LANGUAGE", "ara+eng"),
        ]));

        assert_eq!(config.page_batch_size, 5);
        assert_eq!(config.binarize_threshold, 150);
        assert_eq!(config.jpeg_quality, 80);
        assert_eq!(config.ocr_language, "ara+eng");
        assert!(config.vocabulary_file.is_none());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = Config::from_lookup(lookup_from(&[("PAGE_BATCH_SIZE", "0")]));
        assert_eq!(config.page_batch_size, 3);
    }
}
