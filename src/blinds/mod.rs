//! Blind escalation: the configured table and the per-hand alert schedule.

pub mod scheduler;
pub mod structure;

pub use scheduler::{schedule_blinds, ScheduledBlinds};
pub use structure::{BlindStructure, BlindStructureError, ScheduledAlert};
