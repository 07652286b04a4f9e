pub mod display;
pub mod led;
pub mod sensors;
