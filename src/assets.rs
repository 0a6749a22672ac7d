pub mod decode;
pub mod image;
pub mod loader;
