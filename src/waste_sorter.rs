pub mod camera_worker;
pub mod core;
pub mod input;
pub mod main;
pub mod render;
pub mod run_effect;
