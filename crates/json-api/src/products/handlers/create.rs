//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tindahan_app::domain::products::{data::NewProduct, records::ProductUuid};

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        handlers::{ProductDetailsRequest, ProductResponse},
    },
    state::State,
};

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    /// Client-chosen UUID; generated when absent
    #[serde(default)]
    pub uuid: Option<Uuid>,

    #[serde(flatten)]
    pub details: ProductDetailsRequest,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        NewProduct {
            uuid: request.uuid.map_or_else(ProductUuid::new, ProductUuid::from),
            details: request.details.into(),
        }
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::CONFLICT, description = "Product already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    let product = state
        .app
        .products
        .create_product(account, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use tindahan_app::domain::products::{
        MockProductsService, ProductValidationError, ProductsServiceError,
    };

    use crate::test_helpers::{Mocks, TEST_ACCOUNT_UUID, account_service};

    use super::{super::tests::make_product, *};

    fn make_service(products: MockProductsService) -> Service {
        account_service(
            Mocks::default().products(products),
            Router::with_path("products").post(handler),
        )
    }

    #[tokio::test]
    async fn create_returns_201_with_location() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .withf(move |account, new| {
                *account == TEST_ACCOUNT_UUID
                    && new.uuid == uuid
                    && new.details.name == "Coke Mismo"
                    && new.details.price == 2_000
                    && new.details.stock == 12
            })
            .return_once(move |_, _| Ok(make_product(uuid, 12)));

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({
                "uuid": uuid.into_uuid(),
                "name": "Coke Mismo",
                "category": "Drinks",
                "price": 2_000,
                "cost": 1_500,
                "stock": 12,
            }))
            .send(&make_service(products))
            .await;

        let body: ProductResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/products/{uuid}").as_str()));
        assert_eq!(body.uuid, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn omitted_fields_use_defaults() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .withf(|_, new| {
                new.details.category.is_empty()
                    && new.details.low_stock_threshold == 5
                    && new.details.cost == 0
                    && new.details.stock == 0
            })
            .returning(|_, new| Ok(make_product(new.uuid, 0)));

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Skyflakes", "price": 850 }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn zero_price_returns_400() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .return_once(|_, _| Err(ProductValidationError::ZeroPrice.into()));

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Freebie", "price": 0 }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_uuid_returns_409() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "uuid": Uuid::now_v7(), "name": "Coke Mismo", "price": 2_000 }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn negative_stock_is_rejected_before_service() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_create_product().never();

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Coke Mismo", "price": 2_000, "stock": -1 }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
