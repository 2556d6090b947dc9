//! Night sky viewer application.
//!
//! Provides platform directory resolution, settings loading with hot reload,
//! and the paced frame loop that drives the sky against a scene host.

pub mod frame_loop;
pub mod platform;
pub mod settings;
