//! Extension traits

mod depot;
mod period;
mod result;

pub(crate) use depot::DepotExt as _;
pub(crate) use period::ReportPeriodExt as _;
pub(crate) use result::ResultExt as _;
