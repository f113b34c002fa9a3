// Price ticks
pub mod market;

// Feature schema shared by training and serving
pub mod ml;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
