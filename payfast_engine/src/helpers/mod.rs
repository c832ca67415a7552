mod text;

pub use text::{truncate_chars, DEBUG_INFO_MAX_LENGTH};
