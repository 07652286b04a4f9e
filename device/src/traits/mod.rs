pub mod display;
pub mod i2c;
pub mod led;
pub mod publisher;
pub mod sensors;
pub mod system;
