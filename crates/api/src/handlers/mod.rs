//! Request handlers, one submodule per resource.
//!
//! Mutating handlers resolve the caller, check ownership of every record
//! they touch, write through the repository and then append to the activity
//! log. Read handlers collapse missing or foreign records to `null` or an
//! empty list.

pub mod activities;
pub mod auth;
pub mod campaigns;
pub mod customers;
pub mod dashboard;
pub mod deals;
pub mod features;
pub mod idea_comparisons;
pub mod idea_criteria;
pub mod ideas;
pub mod milestones;
pub mod notifications;
pub mod roadmaps;
pub mod tasks;
pub mod users;
