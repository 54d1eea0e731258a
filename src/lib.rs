//! A Galaga-style arcade shooter for the terminal.
//!
//! [`game`] holds the tick-driven model and knows nothing about the
//! terminal; [`app`], [`event`] and [`ui`] drive it with crossterm and
//! draw it with ratatui.

pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod game;
pub mod scores;
pub mod ui;
