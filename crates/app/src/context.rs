//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        accounts::{AccountsService, PgAccountsService},
        outbox::{OutboxService, PgOutboxService},
        products::{PgProductsService, ProductsService},
        reports::{PgReportsService, ReportsService},
        sales::{PgSalesService, SalesService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("database role bypasses row-level security; connect as the app role")]
    RlsBypassed,
}

#[derive(Clone)]
pub struct AppContext {
    pub accounts: Arc<dyn AccountsService>,
    pub auth: Arc<dyn AuthService>,
    pub products: Arc<dyn ProductsService>,
    pub sales: Arc<dyn SalesService>,
    pub reports: Arc<dyn ReportsService>,
    pub outbox: Arc<dyn OutboxService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails, or when the
    /// connected role would not be subject to row-level security.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if !database::role_enforces_rls(&pool)
            .await
            .map_err(AppInitError::Database)?
        {
            return Err(AppInitError::RlsBypassed);
        }

        let db = Db::new(pool.clone());

        Ok(Self {
            accounts: Arc::new(PgAccountsService::new(pool.clone())),
            auth: Arc::new(PgAuthService::new(pool.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            sales: Arc::new(PgSalesService::new(db.clone())),
            reports: Arc::new(PgReportsService::new(db)),
            outbox: Arc::new(PgOutboxService::new(pool)),
        })
    }
}
