pub mod handle;
pub mod pause;
