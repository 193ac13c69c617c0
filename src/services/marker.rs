//! 基于标记短语的答案抽取
//!
//! 文本先被清洗（去空白、不可见字符与分隔标点，转小写），再定位最后一个标记短语，
//! 取其后出现的第一个选项字母。

use crate::models::question::AnswerLetter;
use crate::models::vocabulary::MarkerVocabulary;
use crate::services::alphabet;
use regex::Regex;
use std::sync::LazyLock;

/// 清洗后短于此长度的文本视为只包含答案本身
pub const SHORT_TEXT_LIMIT: usize = 10;

static STRIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\s\p{Cf}\x{0640}:：\-–—_.,،؛;()\[\]{}/\\|*"'«»…]"#).expect("strip regex")
});

/// 去除空白、零宽/方向控制字符、Tatweel 与常见分隔标点，并转为小写
pub fn clean(text: &str) -> String {
    STRIP_RE.replace_all(text, "").to_lowercase()
}

/// 在已清洗文本中查找最后出现的标记短语
///
/// 返回 `(起始字节位置, 标记)`；起点相同时取较长的标记。
pub fn find_last_marker<'v>(cleaned: &str, vocabulary: &'v MarkerVocabulary) -> Option<(usize, &'v str)> {
    vocabulary
        .markers
        .iter()
        .filter_map(|marker| cleaned.rfind(marker.as_str()).map(|pos| (pos, marker.as_str())))
        .max_by(|(pos_a, m_a), (pos_b, m_b)| pos_a.cmp(pos_b).then(m_a.len().cmp(&m_b.len())))
}

/// 从原始文本中抽取答案字母
pub fn extract_answer(text: &str, vocabulary: &MarkerVocabulary) -> Option<AnswerLetter> {
    let cleaned = clean(text);
    if cleaned.is_empty() {
        return None;
    }

    match find_last_marker(&cleaned, vocabulary) {
        Some((pos, marker)) => alphabet::first_letter(&cleaned[pos + marker.len()..]),
        None if cleaned.chars().count() < SHORT_TEXT_LIMIT => alphabet::first_letter(&cleaned),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> MarkerVocabulary {
        MarkerVocabulary::default()
    }

    #[test]
    fn clean_removes_invisible_and_separator_chars() {
        assert_eq!(clean("الإجابة\u{200B} الصحيحة :\u{200F} ب"), "الإجابةالصحيحةب");
        assert_eq!(clean("Correct Answer - C."), "correctanswerc");
        assert_eq!(clean("جـــ"), "ج");
    }

    #[test]
    fn extracts_letter_after_marker() {
        assert_eq!(extract_answer("الإجابة الصحيحة: ب", &vocab()), Some(AnswerLetter::Ba));
        assert_eq!(extract_answer("الاجابة الصحيحة هي (د)", &vocab()), Some(AnswerLetter::Dal));
        assert_eq!(extract_answer("الجواب الصحيح ج", &vocab()), Some(AnswerLetter::Jim));
        assert_eq!(extract_answer("Correct answer: a", &vocab()), Some(AnswerLetter::Alif));
    }

    #[test]
    fn uses_last_marker_occurrence() {
        let text = "راجع الإجابة الصحيحة في نهاية الكتاب. الإجابة الصحيحة: د";
        assert_eq!(extract_answer(text, &vocab()), Some(AnswerLetter::Dal));
    }

    #[test]
    fn longer_marker_wins_at_same_position() {
        let vocab = vocab();
        let cleaned = clean("الإجابة الصحيحة هي ب");
        let (pos, marker) = find_last_marker(&cleaned, &vocab).unwrap();
        assert_eq!(pos, 0);
        assert_eq!(marker, "الإجابةالصحيحةهي");
        // "هي" 中没有选项字母，即使取较短标记结果也应一致
        assert_eq!(extract_answer("الإجابة الصحيحة هي ب", &vocab), Some(AnswerLetter::Ba));
    }

    #[test]
    fn short_text_without_marker_is_matched_directly() {
        assert_eq!(extract_answer(" ( ج ) ", &vocab()), Some(AnswerLetter::Jim));
        assert_eq!(extract_answer("ﺏ", &vocab()), Some(AnswerLetter::Ba));
    }

    #[test]
    fn long_text_without_marker_yields_nothing() {
        assert_eq!(extract_answer("هذا نص طويل جدا بدون أي علامة", &vocab()), None);
        assert_eq!(extract_answer("   ", &vocab()), None);
        assert_eq!(extract_answer("الإجابة الصحيحة: ", &vocab()), None);
    }

    #[test]
    fn stripped_chars_around_marker_do_not_change_result() {
        let noise = [" ", "\u{200B}", ":", " - ", "\u{200F}", "،", "\t", "."];
        let base = extract_answer("الإجابة الصحيحة ج", &vocab());
        for a in noise {
            for b in noise {
                let text = format!("{a}{a}الإجابة الصحيحة{b}ج{a}{b}");
                assert_eq!(extract_answer(&text, &vocab()), base, "{text:?}");
            }
        }
    }

    #[test]
    fn custom_vocabulary_is_honoured() {
        let vocab = MarkerVocabulary::new(["الحل"]);
        assert_eq!(extract_answer("الحل الصحيح: بلا شك", &vocab), Some(AnswerLetter::Alif));
        assert_eq!(extract_answer("الإجابة الصحيحة: هو ب جيد", &vocab), None);
    }
}
