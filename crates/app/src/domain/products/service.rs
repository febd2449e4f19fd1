//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        accounts::records::AccountUuid,
        products::{
            data::{NewProduct, ProductDetails, ProductFilter},
            errors::ProductsServiceError,
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        account: AccountUuid,
        filter: ProductFilter,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin_account_transaction(account).await?;

        let products = self.repository.list_products(&mut tx, &filter).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn list_low_stock_products(
        &self,
        account: AccountUuid,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin_account_transaction(account).await?;

        let products = self.repository.list_low_stock_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(
        &self,
        account: AccountUuid,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_account_transaction(account).await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        account: AccountUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let details = product.details.normalised()?;

        let mut tx = self.db.begin_account_transaction(account).await?;

        let created = self
            .repository
            .create_product(&mut tx, product.uuid, &details)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        account: AccountUuid,
        product: ProductUuid,
        details: ProductDetails,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let details = details.normalised()?;

        let mut tx = self.db.begin_account_transaction(account).await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &details)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(
        &self,
        account: AccountUuid,
        product: ProductUuid,
    ) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_account_transaction(account).await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Live products, newest first.
    async fn list_products(
        &self,
        account: AccountUuid,
        filter: ProductFilter,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Live products whose stock is at or below their threshold.
    async fn list_low_stock_products(
        &self,
        account: AccountUuid,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(
        &self,
        account: AccountUuid,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Validates and creates a product.
    async fn create_product(
        &self,
        account: AccountUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Validates and replaces a product's editable fields.
    async fn update_product(
        &self,
        account: AccountUuid,
        product: ProductUuid,
        details: ProductDetails,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-deletes a product. Past sale items keep referencing it.
    async fn delete_product(
        &self,
        account: AccountUuid,
        product: ProductUuid,
    ) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::ProductValidationError,
        test::{TestContext, helpers::product_details},
    };

    use super::*;

    #[tokio::test]
    async fn create_product_persists_details() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        let product = ctx
            .products
            .create_product(
                ctx.account_uuid,
                NewProduct {
                    uuid,
                    details: product_details("Kopiko Brown", 1_200, 900, 30),
                },
            )
            .await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.name, "Kopiko Brown");
        assert_eq!(product.category, "Others");
        assert_eq!(product.price, 1_200);
        assert_eq!(product.cost, 900);
        assert_eq!(product.stock, 30);
        assert_eq!(product.low_stock_threshold, 5);
        assert!(product.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn create_product_zero_price_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(
                ctx.account_uuid,
                NewProduct {
                    uuid: ProductUuid::new(),
                    details: product_details("Freebie", 0, 0, 1),
                },
            )
            .await;

        assert!(
            matches!(
                result,
                Err(ProductsServiceError::Validation(
                    ProductValidationError::ZeroPrice
                ))
            ),
            "expected ZeroPrice, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.create_product(uuid, "Original", 100, 50, 1).await?;

        let result = ctx
            .products
            .create_product(
                ctx.account_uuid,
                NewProduct {
                    uuid,
                    details: product_details("Copy", 100, 50, 1),
                },
            )
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .get_product(ctx.account_uuid, ProductUuid::new())
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_products_applies_filters() -> TestResult {
        let ctx = TestContext::new().await;

        let mut coffee = product_details("Nescafe 3in1", 800, 600, 10);
        coffee.category = "Drinks".to_string();

        let mut sold_out = product_details("Great Taste White", 800, 600, 0);
        sold_out.category = "Drinks".to_string();

        let coffee_uuid = ProductUuid::new();
        let sold_out_uuid = ProductUuid::new();

        for (uuid, details) in [(coffee_uuid, coffee), (sold_out_uuid, sold_out)] {
            ctx.products
                .create_product(ctx.account_uuid, NewProduct { uuid, details })
                .await?;
        }

        ctx.create_product(ProductUuid::new(), "Safeguard Soap", 4_500, 3_800, 12)
            .await?;

        let drinks = ctx
            .products
            .list_products(
                ctx.account_uuid,
                ProductFilter {
                    category: Some("Drinks".to_string()),
                    ..ProductFilter::default()
                },
            )
            .await?;

        let searched = ctx
            .products
            .list_products(
                ctx.account_uuid,
                ProductFilter {
                    search: Some("NESCAFE".to_string()),
                    ..ProductFilter::default()
                },
            )
            .await?;

        let sellable_drinks = ctx
            .products
            .list_products(
                ctx.account_uuid,
                ProductFilter {
                    category: Some("Drinks".to_string()),
                    in_stock_only: true,
                    ..ProductFilter::default()
                },
            )
            .await?;

        assert_eq!(drinks.len(), 2, "two drinks expected");
        assert_eq!(
            searched.iter().map(|p| p.uuid).collect::<Vec<_>>(),
            vec![coffee_uuid]
        );
        assert_eq!(
            sellable_drinks.iter().map(|p| p.uuid).collect::<Vec<_>>(),
            vec![coffee_uuid]
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_products_search_treats_wildcards_literally() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.create_product(ProductUuid::new(), "Rice 25kg", 130_000, 120_000, 4)
            .await?;

        let products = ctx
            .products
            .list_products(
                ctx.account_uuid,
                ProductFilter {
                    search: Some("%".to_string()),
                    ..ProductFilter::default()
                },
            )
            .await?;

        assert!(products.is_empty(), "a bare % must not match everything");

        Ok(())
    }

    #[tokio::test]
    async fn list_low_stock_products_uses_each_threshold() -> TestResult {
        let ctx = TestContext::new().await;

        let low = ctx.create_product(ProductUuid::new(), "Eggs", 900, 750, 5).await?;
        ctx.create_product(ProductUuid::new(), "Bread", 6_000, 4_500, 6)
            .await?;

        let products = ctx
            .products
            .list_low_stock_products(ctx.account_uuid)
            .await?;

        assert_eq!(products.iter().map(|p| p.uuid).collect::<Vec<_>>(), vec![low.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn update_product_replaces_details() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(ProductUuid::new(), "Tide Bar", 1_500, 1_100, 10).await?;

        let mut details = product_details("Tide Bar 125g", 1_600, 1_150, 8);
        details.category = "Household".to_string();
        details.low_stock_threshold = 2;

        let updated = ctx
            .products
            .update_product(ctx.account_uuid, product.uuid, details)
            .await?;

        assert_eq!(updated.uuid, product.uuid);
        assert_eq!(updated.name, "Tide Bar 125g");
        assert_eq!(updated.category, "Household");
        assert_eq!(updated.price, 1_600);
        assert_eq!(updated.stock, 8);
        assert_eq!(updated.low_stock_threshold, 2);
        assert!(updated.updated_at >= product.updated_at);

        Ok(())
    }

    #[tokio::test]
    async fn update_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .update_product(
                ctx.account_uuid,
                ProductUuid::new(),
                product_details("Ghost", 100, 50, 1),
            )
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn delete_product_hides_it() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(ProductUuid::new(), "Yakult", 1_000, 800, 10).await?;

        ctx.products
            .delete_product(ctx.account_uuid, product.uuid)
            .await?;

        let get = ctx
            .products
            .get_product(ctx.account_uuid, product.uuid)
            .await;

        let listed = ctx
            .products
            .list_products(ctx.account_uuid, ProductFilter::default())
            .await?;

        let second_delete = ctx
            .products
            .delete_product(ctx.account_uuid, product.uuid)
            .await;

        assert!(
            matches!(get, Err(ProductsServiceError::NotFound)),
            "expected NotFound after deletion, got {get:?}"
        );
        assert!(listed.is_empty(), "deleted product should not be listed");
        assert!(
            matches!(second_delete, Err(ProductsServiceError::NotFound)),
            "expected NotFound on second delete, got {second_delete:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn product_not_visible_to_other_account() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(ProductUuid::new(), "Milo", 900, 700, 10).await?;

        let other = ctx.create_account("Other Store").await;

        let result = ctx.products.get_product(other, product.uuid).await;
        let listed = ctx
            .products
            .list_products(other, ProductFilter::default())
            .await?;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound for cross-account access, got {result:?}"
        );
        assert!(listed.is_empty(), "other account should see no products");

        Ok(())
    }
}
