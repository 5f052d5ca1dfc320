//! tally — Slack poll bot
//!
//! A slash command creates a multiple-choice poll; members cast, toggle,
//! or withdraw votes through message buttons, and the poll message is
//! re-rendered in place after every vote.

pub mod cmd;
pub mod config;
pub mod notify;
pub mod poll;
pub mod server;
pub mod store;
pub mod view;
