use crate::models::geometry::Rectangle;
use serde::{Deserialize, Serialize};

/// 校准配置：题目区域与答案区域
///
/// 由操作员在一张参考页上框选得到。提交任务时按值复制，之后重新校准不会影响已提交的任务。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationConfig {
    pub question_box: Rectangle,
    pub answer_box: Rectangle,
}

impl CalibrationConfig {
    pub fn new(question_box: Rectangle, answer_box: Rectangle) -> Self {
        Self {
            question_box,
            answer_box,
        }
    }

    /// 是否存在零面积的区域（只影响输出质量，不视为错误）
    pub fn has_empty_region(&self) -> bool {
        self.question_box.is_empty() || self.answer_box.is_empty()
    }
}
