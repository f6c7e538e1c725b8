// Library interface for tftclock so the formatting, layout and state logic
// can be unit tested without a panel attached.

pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod input;
pub mod screen;
