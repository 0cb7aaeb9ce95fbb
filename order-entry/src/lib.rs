pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use models::{CustomerSession, OrderSession};
use services::{draft_store::DraftStore, erp_client::ErpClient};
use std::sync::Arc;

/// Shared application state: the ERP client and the in-progress drafts
#[derive(Clone)]
pub struct AppState {
    pub erp_client: Arc<ErpClient>,
    pub orders: Arc<DraftStore<OrderSession>>,
    pub customers: Arc<DraftStore<CustomerSession>>,
}

impl AppState {
    pub fn new(erp_client: Arc<ErpClient>) -> Self {
        Self {
            erp_client,
            orders: Arc::new(DraftStore::new()),
            customers: Arc::new(DraftStore::new()),
        }
    }
}
