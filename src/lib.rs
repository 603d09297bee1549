//! Finds the applications able to send email and starts them, either through a
//! chooser over all of them or directly in one picked by name.
//!
//! The installed-app registry and the thing that actually starts apps are ports
//! ([`registry::AppRegistry`], [`launcher::Launcher`]); [`service::MailApps`] wires
//! them to the five operations and [`channel`] routes method calls onto it.

pub mod channel;
pub mod chooser;
pub mod composer;
pub mod config;
pub mod domain;
pub mod error;
pub mod launcher;
pub mod registry;
pub mod resolver;
pub mod service;
