pub mod matrix3;
pub mod vector2;
