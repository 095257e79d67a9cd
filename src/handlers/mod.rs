pub mod app;
pub mod catalog;
pub mod drafts;
pub mod metrics;
