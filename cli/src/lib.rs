//! kpod CLI - build delegation and local image listing.

pub mod commands;
pub mod delegate;
pub mod output;
