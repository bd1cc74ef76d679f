//! WavePoem: a random classical poem on a colour-of-the-moment wave.
//!
//! The [`app`] module holds the host-independent core (session reducer,
//! effect runner, settings store, poetry source, palette). [`ui`] renders
//! view states for the terminal.

pub mod app;
pub mod ui;
