pub mod calibration;
pub mod geometry;
pub mod job;
pub mod loaders;
pub mod question;
pub mod vocabulary;

pub use calibration::CalibrationConfig;
pub use geometry::{Rectangle, REFERENCE_SCALE};
pub use job::{Job, JobId, JobStatus, JobView, SourceFile};
pub use loaders::{collect_pdf_files, load_vocabulary};
pub use question::{AnswerLetter, ExtractedQuestion, ExtractedTest, UNKNOWN_ANSWER};
pub use vocabulary::MarkerVocabulary;
