//! Data models for the JobTrack application.
//!
//! These models match the frontend interfaces exactly for seamless interoperability.

mod application;
mod interview;
mod user;

pub use application::*;
pub use interview::*;
pub use user::*;
