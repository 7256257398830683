pub mod dropdown;
pub mod map;
pub mod popup;
pub mod tables;
