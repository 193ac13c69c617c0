//! 基础设施层（Infrastructure）
//!
//! 持有外部能力（PDF 渲染、OCR、持久化），只暴露窄接口，不认识业务流程。

pub mod calibration_store;
pub mod pdf_backend;
pub mod poppler;
pub mod raster;
pub mod recognizer;
pub mod test_sink;

pub use calibration_store::{CalibrationStore, FileCalibrationStore, MemoryCalibrationStore};
pub use pdf_backend::{PdfBackend, PdfDocument, TextFragment};
pub use poppler::PopplerBackend;
pub use recognizer::{TesseractRecognizer, TextRecognizer};
pub use test_sink::{JsonDirSink, MemoryTestSink, TestSink};
