//! Grid Snake: a classic snake engine on a discrete cell grid plus a
//! terminal front end.
//!
//! The engine ([`game::GameState`]) is pure state-machine logic in integer
//! cell coordinates and knows nothing about terminals; the driver in
//! `main.rs` owns the timer, key events, and drawing. Edge behavior is a
//! configuration choice ([`config::EdgePolicy`]): wrap around the board or
//! die at the wall.

pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod renderer;
pub mod snake;
