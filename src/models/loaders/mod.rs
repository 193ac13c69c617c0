pub mod pdf_loader;
pub mod vocabulary_loader;

pub use pdf_loader::{collect_pdf_files, resolve_inputs};
pub use vocabulary_loader::load_vocabulary;
