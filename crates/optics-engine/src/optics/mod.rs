// optics/mod.rs
//
// Bench physics: the object, elements, principal rays and image formation,
// plus the measurement overlay, data recorder and demo presets built on top of them.

pub mod element;
pub mod image;
pub mod measure;
pub mod object;
pub mod presets;
pub mod recorder;
pub mod ray;
