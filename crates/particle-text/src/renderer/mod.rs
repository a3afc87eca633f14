pub mod instance;
pub mod traits;
