/// Spreadsheet output: one `Data` sheet, one block of columns per file, and
/// a scatter chart plotting the display columns.
pub mod xlsx;

pub use xlsx::{save, write_to_buffer, ExportError};
