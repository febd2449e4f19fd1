//! Test helpers.

use std::sync::Arc;

use jiff::tz::TimeZone;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use tindahan_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        accounts::{MockAccountsService, records::AccountUuid},
        outbox::MockOutboxService,
        products::MockProductsService,
        reports::MockReportsService,
        sales::MockSalesService,
    },
    rate_limit::{RateLimitSettings, RateLimiters},
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_ACCOUNT_UUID: AccountUuid = AccountUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_account(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_account_uuid(TEST_ACCOUNT_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// Service mocks for a test state. Mocks left unset expect no calls.
#[derive(Default)]
pub(crate) struct Mocks {
    accounts: Option<MockAccountsService>,
    auth: Option<MockAuthService>,
    products: Option<MockProductsService>,
    sales: Option<MockSalesService>,
    reports: Option<MockReportsService>,
    outbox: Option<MockOutboxService>,
    limiters: Option<Arc<RateLimiters>>,
    trust_proxy_headers: bool,
}

impl Mocks {
    pub(crate) fn accounts(mut self, accounts: MockAccountsService) -> Self {
        self.accounts = Some(accounts);
        self
    }

    pub(crate) fn auth(mut self, auth: MockAuthService) -> Self {
        self.auth = Some(auth);
        self
    }

    pub(crate) fn products(mut self, products: MockProductsService) -> Self {
        self.products = Some(products);
        self
    }

    pub(crate) fn sales(mut self, sales: MockSalesService) -> Self {
        self.sales = Some(sales);
        self
    }

    pub(crate) fn reports(mut self, reports: MockReportsService) -> Self {
        self.reports = Some(reports);
        self
    }

    pub(crate) fn outbox(mut self, outbox: MockOutboxService) -> Self {
        self.outbox = Some(outbox);
        self
    }

    pub(crate) fn limiters(mut self, limiters: Arc<RateLimiters>) -> Self {
        self.limiters = Some(limiters);
        self
    }

    pub(crate) fn trust_proxy_headers(mut self) -> Self {
        self.trust_proxy_headers = true;
        self
    }

    pub(crate) fn into_state(self) -> Arc<State> {
        let app = AppContext {
            accounts: Arc::new(self.accounts.unwrap_or_default()),
            auth: Arc::new(self.auth.unwrap_or_default()),
            products: Arc::new(self.products.unwrap_or_default()),
            sales: Arc::new(self.sales.unwrap_or_default()),
            reports: Arc::new(self.reports.unwrap_or_default()),
            outbox: Arc::new(self.outbox.unwrap_or_default()),
        };

        let limiters = self
            .limiters
            .unwrap_or_else(|| Arc::new(RateLimiters::new(RateLimitSettings::default())));

        Arc::new(
            State::new(app, limiters, TimeZone::UTC)
                .with_trusted_proxy_headers(self.trust_proxy_headers),
        )
    }
}

/// Unauthenticated routes.
pub(crate) fn public_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .push(route),
    )
}

/// Routes that run as [`TEST_ACCOUNT_UUID`].
pub(crate) fn account_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_account)
            .push(route),
    )
}
