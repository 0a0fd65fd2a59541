pub mod time_format;

pub use time_format::format_mm_ss;
