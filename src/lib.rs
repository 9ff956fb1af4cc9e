pub mod config;
pub mod env;
pub mod error;
pub mod food;
pub mod game;
pub mod input;
pub mod observation;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod tile;
pub mod ui;
