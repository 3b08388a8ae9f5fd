//! Domain logic for the OpsDeck dashboard.
//!
//! This crate has no database or HTTP dependencies. Callers load records
//! through the repository layer and hand plain values to the functions here.

pub mod activity;
pub mod campaigns;
pub mod dependency_graph;
pub mod development;
pub mod error;
pub mod ideas;
pub mod notifications;
pub mod ownership;
pub mod pagination;
pub mod ranking;
pub mod ratio;
pub mod roadmap;
pub mod sales;
pub mod scoring;
pub mod status_summary;
pub mod types;
pub mod users;
pub mod validation;
