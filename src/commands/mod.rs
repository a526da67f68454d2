pub mod fill;
pub mod set;
pub mod show;
