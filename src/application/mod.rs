// Training and serving pipeline
pub mod ml;
