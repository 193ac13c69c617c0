//! 业务能力层（Services）
//!
//! 描述"我能做什么"，只处理单页的答案区域。

pub mod alphabet;
pub mod answer_detector;
pub mod marker;
pub mod text_layer;

pub use answer_detector::{AnswerDetector, Detection, DetectionSource};
