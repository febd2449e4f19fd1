//! Reports service.

use async_trait::async_trait;
use jiff::Zoned;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        accounts::records::AccountUuid,
        reports::{
            chart::{ChartSeries, build_chart},
            errors::ReportsServiceError,
            export::render_csv,
            period::{ReportPeriod, ReportWindow},
            repository::PgReportsRepository,
            summary::{Dashboard, SalesSummary, TOP_PRODUCTS},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgReportsService {
    db: Db,
    repository: PgReportsRepository,
}

impl PgReportsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReportsRepository::new(),
        }
    }
}

#[async_trait]
impl ReportsService for PgReportsService {
    async fn summary(
        &self,
        account: AccountUuid,
        window: ReportWindow,
    ) -> Result<SalesSummary, ReportsServiceError> {
        let since = window.start.timestamp();

        let mut tx = self.db.begin_account_transaction(account).await?;

        let totals = self.repository.sales_totals(&mut tx, since).await?;
        let top_products = self
            .repository
            .top_products(&mut tx, since, TOP_PRODUCTS)
            .await?;

        tx.commit().await?;

        Ok(SalesSummary::new(totals, top_products))
    }

    async fn chart(
        &self,
        account: AccountUuid,
        window: ReportWindow,
    ) -> Result<ChartSeries, ReportsServiceError> {
        let since = window.chart_start()?.timestamp();

        let mut tx = self.db.begin_account_transaction(account).await?;

        let points = self.repository.sale_points(&mut tx, since).await?;

        tx.commit().await?;

        Ok(build_chart(&window, &points))
    }

    #[tracing::instrument(
        name = "reports.service.export_csv",
        skip(self, window),
        fields(account_uuid = %account, period = %window.period),
        err
    )]
    async fn export_csv(
        &self,
        account: AccountUuid,
        window: ReportWindow,
    ) -> Result<String, ReportsServiceError> {
        let mut tx = self.db.begin_account_transaction(account).await?;

        let rows = self
            .repository
            .product_sales(&mut tx, window.start.timestamp())
            .await?;

        tx.commit().await?;

        if rows.is_empty() {
            return Err(ReportsServiceError::NothingToExport);
        }

        Ok(render_csv(&window, &rows))
    }

    async fn dashboard(
        &self,
        account: AccountUuid,
        now: Zoned,
    ) -> Result<Dashboard, ReportsServiceError> {
        let today = ReportWindow::new(ReportPeriod::Today, now.clone())?;
        let month = ReportWindow::new(ReportPeriod::Month, now)?;

        let mut tx = self.db.begin_account_transaction(account).await?;

        let inventory = self.repository.inventory(&mut tx).await?;
        let today_totals = self
            .repository
            .sales_totals(&mut tx, today.start.timestamp())
            .await?;
        let month_totals = self
            .repository
            .sales_totals(&mut tx, month.start.timestamp())
            .await?;

        tx.commit().await?;

        Ok(Dashboard {
            product_count: inventory.product_count,
            low_stock_count: inventory.low_stock_count,
            inventory_value: inventory.inventory_value,
            today_sales: today_totals.gross,
            month_profit: month_totals.profit,
        })
    }
}

#[automock]
#[async_trait]
pub trait ReportsService: Send + Sync {
    /// Gross, profit, count, average and best sellers over active sales in the window.
    async fn summary(
        &self,
        account: AccountUuid,
        window: ReportWindow,
    ) -> Result<SalesSummary, ReportsServiceError>;

    /// Sales and profit series for the window's period.
    async fn chart(
        &self,
        account: AccountUuid,
        window: ReportWindow,
    ) -> Result<ChartSeries, ReportsServiceError>;

    /// Per-product sales as CSV text.
    async fn export_csv(
        &self,
        account: AccountUuid,
        window: ReportWindow,
    ) -> Result<String, ReportsServiceError>;

    /// Catalogue and sales headline numbers as of `now`.
    async fn dashboard(
        &self,
        account: AccountUuid,
        now: Zoned,
    ) -> Result<Dashboard, ReportsServiceError>;
}
