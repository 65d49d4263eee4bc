pub mod aabb;
pub mod ray;
