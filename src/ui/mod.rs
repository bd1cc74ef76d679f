//! Terminal front end: turns view states into text.

pub mod render;
pub mod theme;
