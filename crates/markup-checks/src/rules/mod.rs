//! The built-in checks.

pub mod avoid_html_comment;
pub mod complexity_threshold;
pub mod file_header;
pub mod img_without_alt;
pub mod unclosed_tag;

pub use avoid_html_comment::AvoidHtmlComment;
pub use complexity_threshold::ComplexityThreshold;
pub use file_header::FileHeader;
pub use img_without_alt::ImgWithoutAlt;
pub use unclosed_tag::UnclosedTag;
