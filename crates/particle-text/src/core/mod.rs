pub mod effect;
pub mod rng;
pub mod settle;
