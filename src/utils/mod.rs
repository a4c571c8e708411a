pub mod text;

pub use text::{normalize_script_text, truncate_with_ellipsis, with_utf8_bom};
