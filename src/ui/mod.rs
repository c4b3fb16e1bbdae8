//! Terminal front end: draws the project with ratatui and turns crossterm
//! key events into store actions.

pub mod app;
pub mod events;
pub mod footer;
pub mod input;
pub mod layout;
pub mod render;
pub mod runtime;
pub mod terminal;
pub mod theme;

pub use runtime::run;
