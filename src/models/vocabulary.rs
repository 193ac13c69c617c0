//! 答案标记短语词表
//!
//! 标记短语针对特定出题方的措辞，可通过 TOML 文件替换。

/// 内置标记短语（已去除空白，匹配发生在清洗后的文本上）
pub const DEFAULT_MARKERS: &[&str] = &[
    "الإجابةالصحيحةهي",
    "الاجابةالصحيحةهي",
    "الإجابةالصحيحة",
    "الاجابةالصحيحة",
    "الإجابهالصحيحه",
    "الاجابهالصحيحه",
    "الإجابةالصحيحه",
    "الاجابةالصحيحه",
    "الجوابالصحيح",
    "الإجابة",
    "الاجابة",
    "الجواب",
    "correctansweris",
    "correctanswer",
];

/// 标记短语词表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerVocabulary {
    pub markers: Vec<String>,
}

impl MarkerVocabulary {
    pub fn new(markers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let markers = markers
            .into_iter()
            .map(|m| normalize_marker(&m.into()))
            .filter(|m| !m.is_empty())
            .collect();
        Self { markers }
    }

    /// 标记短语中出现的全部字符（作为 OCR 白名单的一部分）
    pub fn marker_chars(&self) -> String {
        let mut chars: Vec<char> = self.markers.iter().flat_map(|m| m.chars()).collect();
        chars.sort_unstable();
        chars.dedup();
        chars.into_iter().collect()
    }
}

impl Default for MarkerVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_MARKERS.iter().copied())
    }
}

/// 标记短语与被搜索文本使用同样的规则：去空白、小写
fn normalize_marker(marker: &str) -> String {
    marker
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
