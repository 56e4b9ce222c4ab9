//! Character Pilot - conversational character profile builder
//!
//! Each user turn runs through a small workflow: classify the turn, assess
//! its relevance, extract attribute values, reflect on them, and either ask
//! for clarification or commit the profile to a durable sink.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
