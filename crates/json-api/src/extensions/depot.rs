//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use tindahan_app::domain::accounts::records::AccountUuid;

const ACCOUNT_UUID_DEPOT_KEY: &str = "account_uuid";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Remember the authenticated account for downstream handlers.
    fn insert_account_uuid(&mut self, account: AccountUuid);

    /// The authenticated account, or 401 when the auth middleware did not run.
    fn account_uuid_or_401(&self) -> Result<AccountUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_account_uuid(&mut self, account: AccountUuid) {
        self.insert(ACCOUNT_UUID_DEPOT_KEY, account);
    }

    fn account_uuid_or_401(&self) -> Result<AccountUuid, StatusError> {
        self.get::<AccountUuid>(ACCOUNT_UUID_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
