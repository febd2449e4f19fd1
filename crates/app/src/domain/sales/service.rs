//! Sales service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        accounts::records::AccountUuid,
        sales::{
            data::{CartLine, NewSale, SalesQuery},
            errors::SalesServiceError,
            records::{SaleItemRecord, SaleItemUuid, SaleRecord, SaleUuid},
            repositories::{
                NewSaleItem, PgSaleItemsRepository, PgSalesRepository, PgStockRepository,
            },
            totals::{PricedLine, sale_totals},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgSalesService {
    db: Db,
    sales_repository: PgSalesRepository,
    items_repository: PgSaleItemsRepository,
    stock_repository: PgStockRepository,
}

impl PgSalesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            sales_repository: PgSalesRepository::new(),
            items_repository: PgSaleItemsRepository::new(),
            stock_repository: PgStockRepository::new(),
        }
    }

    /// Work out why stock for `line` could not be taken.
    async fn stock_shortfall(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: CartLine,
    ) -> SalesServiceError {
        match self
            .stock_repository
            .available_stock(tx, line.product_uuid)
            .await
        {
            Ok(None) => SalesServiceError::ProductNotFound(line.product_uuid),
            Ok(Some(available)) => SalesServiceError::InsufficientStock {
                product: line.product_uuid,
                requested: line.quantity,
                available,
            },
            Err(error) => error.into(),
        }
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sales: &mut [SaleRecord],
    ) -> Result<(), SalesServiceError> {
        if sales.is_empty() {
            return Ok(());
        }

        let uuids: Vec<SaleUuid> = sales.iter().map(|sale| sale.uuid).collect();
        let items = self.items_repository.get_sale_items(tx, &uuids).await?;

        let mut by_sale: FxHashMap<SaleUuid, Vec<SaleItemRecord>> = FxHashMap::default();

        for item in items {
            by_sale.entry(item.sale_uuid).or_default().push(item);
        }

        for sale in sales {
            sale.items = by_sale.remove(&sale.uuid).unwrap_or_default();
        }

        Ok(())
    }
}

#[async_trait]
impl SalesService for PgSalesService {
    #[tracing::instrument(
        name = "sales.service.record_sale",
        skip(self, sale),
        fields(
            account_uuid = %account,
            sale_uuid = %sale.uuid,
            line_count = sale.lines.len()
        ),
        err
    )]
    async fn record_sale(
        &self,
        account: AccountUuid,
        sale: NewSale,
    ) -> Result<SaleRecord, SalesServiceError> {
        if sale.lines.is_empty() {
            return Err(SalesServiceError::EmptyCart);
        }

        if let Some(line) = sale.lines.iter().find(|line| !line.has_valid_quantity()) {
            return Err(SalesServiceError::InvalidQuantity {
                product: line.product_uuid,
            });
        }

        let mut tx = self.db.begin_account_transaction(account).await?;

        let mut items = Vec::with_capacity(sale.lines.len());
        let mut priced = Vec::with_capacity(sale.lines.len());

        for line in &sale.lines {
            let Some(taken) = self
                .stock_repository
                .take_stock(&mut tx, line.product_uuid, line.quantity)
                .await?
            else {
                return Err(self.stock_shortfall(&mut tx, *line).await);
            };

            priced.push(PricedLine {
                price: taken.price,
                cost: taken.cost,
                quantity: line.quantity,
            });

            items.push(NewSaleItem {
                uuid: SaleItemUuid::new(),
                product_uuid: taken.uuid,
                product_name: taken.name,
                quantity: line.quantity,
                price: taken.price,
                cost: taken.cost,
            });
        }

        let totals = sale_totals(&priced)?;

        let mut record = self
            .sales_repository
            .create_sale(&mut tx, sale.uuid, totals)
            .await?;

        record.items = self
            .items_repository
            .create_sale_items(&mut tx, sale.uuid, &items)
            .await?;

        tx.commit().await?;

        info!(sale_uuid = %record.uuid, total = record.total, "recorded sale");

        Ok(record)
    }

    #[tracing::instrument(
        name = "sales.service.void_sale",
        skip(self),
        fields(account_uuid = %account, sale_uuid = %sale),
        err
    )]
    async fn void_sale(
        &self,
        account: AccountUuid,
        sale: SaleUuid,
    ) -> Result<SaleRecord, SalesServiceError> {
        let mut tx = self.db.begin_account_transaction(account).await?;

        let Some(mut record) = self.sales_repository.void_sale(&mut tx, sale).await? else {
            // Either unknown (NotFound) or already voided, which is returned as is.
            let mut existing = self.sales_repository.get_sale(&mut tx, sale).await?;

            self.attach_items(&mut tx, std::slice::from_mut(&mut existing))
                .await?;

            tx.commit().await?;

            return Ok(existing);
        };

        let expected = self.stock_repository.count_sale_products(&mut tx, sale).await?;
        let restored = self.stock_repository.restore_stock(&mut tx, sale).await?;

        if restored != expected {
            warn!(expected, restored, "stock restore incomplete, void rolled back");

            return Err(SalesServiceError::StockNotRestored);
        }

        self.attach_items(&mut tx, std::slice::from_mut(&mut record))
            .await?;

        tx.commit().await?;

        info!(sale_uuid = %record.uuid, "voided sale");

        Ok(record)
    }

    async fn get_sale(
        &self,
        account: AccountUuid,
        sale: SaleUuid,
    ) -> Result<SaleRecord, SalesServiceError> {
        let mut tx = self.db.begin_account_transaction(account).await?;

        let mut record = self.sales_repository.get_sale(&mut tx, sale).await?;

        self.attach_items(&mut tx, std::slice::from_mut(&mut record))
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_sales(
        &self,
        account: AccountUuid,
        query: SalesQuery,
    ) -> Result<Vec<SaleRecord>, SalesServiceError> {
        let mut tx = self.db.begin_account_transaction(account).await?;

        let mut sales = self.sales_repository.list_sales(&mut tx, query).await?;

        self.attach_items(&mut tx, &mut sales).await?;

        tx.commit().await?;

        Ok(sales)
    }
}

#[automock]
#[async_trait]
pub trait SalesService: Send + Sync {
    /// Turn a cart into a sale, taking stock for every line. All or nothing.
    async fn record_sale(
        &self,
        account: AccountUuid,
        sale: NewSale,
    ) -> Result<SaleRecord, SalesServiceError>;

    /// Void a sale and put its stock back. Voiding a voided sale changes nothing.
    async fn void_sale(
        &self,
        account: AccountUuid,
        sale: SaleUuid,
    ) -> Result<SaleRecord, SalesServiceError>;

    /// Retrieve a sale with its items.
    async fn get_sale(
        &self,
        account: AccountUuid,
        sale: SaleUuid,
    ) -> Result<SaleRecord, SalesServiceError>;

    /// Recent sales with their items, newest first.
    async fn list_sales(
        &self,
        account: AccountUuid,
        query: SalesQuery,
    ) -> Result<Vec<SaleRecord>, SalesServiceError>;
}
