//! Sale Repositories

mod items;
mod sales;
mod stock;

pub(crate) use items::{NewSaleItem, PgSaleItemsRepository};
pub(crate) use sales::PgSalesRepository;
pub(crate) use stock::PgStockRepository;
