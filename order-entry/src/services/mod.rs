pub mod draft_store;
pub mod erp_client;
pub mod metrics;
pub mod submission;
