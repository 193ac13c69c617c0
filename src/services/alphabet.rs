//! 选项字母表与归一化
//!
//! 每个接受的字符（含阿拉伯语表现形式与拉丁别名）都唯一映射到四个规范字母之一。

use crate::models::question::AnswerLetter;
use phf::phf_map;

static ALPHABET: phf::Map<char, AnswerLetter> = phf_map! {
    // أ
    'أ' => AnswerLetter::Alif,
    'ا' => AnswerLetter::Alif,
    'آ' => AnswerLetter::Alif,
    'إ' => AnswerLetter::Alif,
    'ٱ' => AnswerLetter::Alif,
    'ﺃ' => AnswerLetter::Alif,
    'ﺄ' => AnswerLetter::Alif,
    'ﺍ' => AnswerLetter::Alif,
    'ﺎ' => AnswerLetter::Alif,
    'ﺁ' => AnswerLetter::Alif,
    'ﺂ' => AnswerLetter::Alif,
    'ﺇ' => AnswerLetter::Alif,
    'ﺈ' => AnswerLetter::Alif,
    'A' => AnswerLetter::Alif,
    'a' => AnswerLetter::Alif,
    // ب
    'ب' => AnswerLetter::Ba,
    'ﺏ' => AnswerLetter::Ba,
    'ﺐ' => AnswerLetter::Ba,
    'ﺑ' => AnswerLetter::Ba,
    'ﺒ' => AnswerLetter::Ba,
    'B' => AnswerLetter::Ba,
    'b' => AnswerLetter::Ba,
    // ج
    'ج' => AnswerLetter::Jim,
    'ﺝ' => AnswerLetter::Jim,
    'ﺞ' => AnswerLetter::Jim,
    'ﺟ' => AnswerLetter::Jim,
    'ﺠ' => AnswerLetter::Jim,
    'C' => AnswerLetter::Jim,
    'c' => AnswerLetter::Jim,
    // د
    'د' => AnswerLetter::Dal,
    'ﺩ' => AnswerLetter::Dal,
    'ﺪ' => AnswerLetter::Dal,
    'D' => AnswerLetter::Dal,
    'd' => AnswerLetter::Dal,
};

/// 将字符归一化为规范字母；不在字母表中返回 `None`
pub fn normalize(c: char) -> Option<AnswerLetter> {
    ALPHABET.get(&c).copied()
}

/// 字符串中第一个属于字母表的字符
pub fn first_letter(text: &str) -> Option<AnswerLetter> {
    text.chars().find_map(normalize)
}

/// 某个规范字母的全部接受写法
pub fn variants_of(letter: AnswerLetter) -> Vec<char> {
    let mut chars: Vec<char> = ALPHABET
        .entries()
        .filter(|(_, l)| **l == letter)
        .map(|(c, _)| *c)
        .collect();
    chars.sort_unstable();
    chars
}

/// 字母表全部字符（排序后拼接，用作 OCR 白名单）
pub fn alphabet_chars() -> String {
    let mut chars: Vec<char> = ALPHABET.keys().copied().collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}
