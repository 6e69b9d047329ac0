//! Headless host for the notification poller.

pub mod cli;
pub mod renderer;
