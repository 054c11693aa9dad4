//! Data-shaping core of the ROI due-diligence dashboard.
//!
//! List views reduce their rows with [`filters`], render them through
//! [`presentation`], detail pages map route slugs onto KPI records with
//! [`kpi`], and the configuration page gates navigation with [`assessment`].

pub mod assessment;
pub mod config;
pub mod error;
pub mod filters;
pub mod kpi;
pub mod presentation;
pub mod storage;
pub mod telemetry;
