/// Source image loading and scaling.
pub mod source;
