//! 屏幕渲染

pub mod custom_name;
pub mod review;
pub mod summary;
