pub mod config;
pub mod fs_tree;
