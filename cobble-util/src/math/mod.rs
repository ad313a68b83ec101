pub mod position;
pub mod vector2;
pub mod vector3;
