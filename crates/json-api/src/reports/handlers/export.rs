//! CSV Export Handler

use std::sync::Arc;

use salvo::{
    http::header::CONTENT_DISPOSITION,
    oapi::extract::QueryParam,
    prelude::*,
    writing::Text,
};

use tindahan_app::domain::reports::export::csv_file_name;

use crate::{
    extensions::*,
    reports::{errors::into_status_error, handlers::requested_window},
    state::State,
};

/// CSV Export Handler
///
/// Per-product sales for the period as a `text/csv` download.
#[endpoint(
    tags("reports"),
    summary = "Export Sales CSV",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "CSV report"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown period"),
        (status_code = StatusCode::NOT_FOUND, description = "No products to export"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    period: QueryParam<String, false>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;
    let window = requested_window(state, period)?;
    let file_name = csv_file_name(&window);

    let csv = state
        .app
        .reports
        .export_csv(account, window)
        .await
        .map_err(into_status_error)?;

    res.add_header(
        CONTENT_DISPOSITION,
        format!("attachment; filename=\"{file_name}\""),
        true,
    )
    .or_500("failed to set content disposition header")?;

    res.render(Text::Csv(csv));

    Ok(())
}
