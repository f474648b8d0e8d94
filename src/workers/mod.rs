//! Background work driven by the dashboard controller

pub mod core;
pub mod poller;
pub mod refresher;
pub mod submitter;
