//! Report Errors

use salvo::http::StatusError;
use tracing::error;

use tindahan_app::domain::reports::ReportsServiceError;

pub(crate) fn into_status_error(error: ReportsServiceError) -> StatusError {
    match error {
        ReportsServiceError::NothingToExport => {
            StatusError::not_found().brief("No products to export")
        }
        ReportsServiceError::Time(source) => {
            error!("failed to compute report window: {source}");

            StatusError::internal_server_error()
        }
        ReportsServiceError::Sql(source) => {
            error!("failed to build report: {source}");

            StatusError::internal_server_error()
        }
    }
}
