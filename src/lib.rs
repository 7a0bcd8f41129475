pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod events;
pub mod geocode;
pub mod language;
pub mod location;
pub mod logging;
pub mod models;
pub mod summary;
pub mod ui;
