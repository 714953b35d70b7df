pub mod cli;
pub mod commands;
pub mod genome;
pub mod plots;
pub mod tree;
pub mod typing;
pub mod utils;
