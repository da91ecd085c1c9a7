pub mod pdf_extractor;
pub mod table_detection;

pub use pdf_extractor::PdfExtractor;
