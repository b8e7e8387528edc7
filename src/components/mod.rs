pub mod diff;
pub mod menu;
pub mod status_bar;
pub mod tree;
