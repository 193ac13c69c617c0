use serde::{Deserialize, Serialize};

/// 无法确定答案时写入的占位值，留待人工复核
pub const UNKNOWN_ANSWER: &str = "?";

/// 抽取题目使用的固定题干（题干本身只存在于截图中）
pub const PLACEHOLDER_QUESTION_TEXT: &str = "انظر الصورة";

/// 四个规范选项字母
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerLetter {
    /// أ
    Alif,
    /// ب
    Ba,
    /// ج
    Jim,
    /// د
    Dal,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; 4] = [
        AnswerLetter::Alif,
        AnswerLetter::Ba,
        AnswerLetter::Jim,
        AnswerLetter::Dal,
    ];

    /// 规范写法
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerLetter::Alif => "أ",
            AnswerLetter::Ba => "ب",
            AnswerLetter::Jim => "ج",
            AnswerLetter::Dal => "د",
        }
    }

    /// 选项序号（从 1 开始）
    pub fn ordinal(self) -> usize {
        self as usize + 1
    }
}

impl std::fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 答案字段的字符串形式：规范字母或 `?`
pub fn answer_label(letter: Option<AnswerLetter>) -> String {
    letter
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_ANSWER.to_string())
}

/// 从单页抽取出的题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedQuestion {
    pub question_text: String,
    /// 题目区域截图（JPEG data URL）
    pub question_image: String,
    /// 答案区域截图（JPEG data URL）
    pub verification_image: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    /// 人工复核改写后由外部置位
    #[serde(default)]
    pub manually_edited: bool,
}

impl ExtractedQuestion {
    pub fn new(
        question_image: String,
        verification_image: String,
        correct_answer: Option<AnswerLetter>,
    ) -> Self {
        Self {
            question_text: PLACEHOLDER_QUESTION_TEXT.to_string(),
            question_image,
            verification_image,
            options: AnswerLetter::ALL
                .iter()
                .map(|l| l.as_str().to_string())
                .collect(),
            correct_answer: answer_label(correct_answer),
            manually_edited: false,
        }
    }

    pub fn is_answer_unknown(&self) -> bool {
        self.correct_answer == UNKNOWN_ANSWER
    }
}

/// 一个文件抽取出的完整试卷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTest {
    pub name: String,
    pub questions: Vec<ExtractedQuestion>,
}

impl ExtractedTest {
    /// 未能确定答案的题目数量
    pub fn unknown_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answer_unknown()).count()
    }
}
