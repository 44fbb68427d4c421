/// Data layer: core types, decoding, and XYDATA extraction.
///
/// Architecture:
/// ```text
///  JASCO .txt export (Shift_JIS)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  bytes → text, skip-and-continue batches
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  extract  │  XYDATA block → (x, y)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Spectrum  │  name, x, y
///   └──────────┘
/// ```
pub mod extract;
pub mod loader;
pub mod model;
