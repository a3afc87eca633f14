pub mod geometry;
pub mod particle;
pub mod pool;
pub mod raster;
pub mod text;
