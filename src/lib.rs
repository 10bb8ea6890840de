//! Core of a desktop audiobook player: chapter table construction,
//! position-to-chapter mapping, and the controller that keeps the player and
//! the interactive controls in sync without echoing programmatic writes back
//! as user input.
//!
//! The GUI shell and the audio backend live outside this crate. They connect
//! through the [`player::Player`] and [`controls::ControlSurface`] traits and
//! feed [`app::Message`]s into [`app::App::reduce`].

pub mod app;
pub mod chapters;
pub mod config;
pub mod container;
pub mod controls;
pub mod cover;
pub mod error;
pub mod player;
pub mod time_utils;
