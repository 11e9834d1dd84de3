pub mod frame;
pub mod geometry;
pub mod scene;
