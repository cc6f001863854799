//! Handler feature groups
//!
//! Each group contributes its [`HandlerRecord`]s; [`all`] assembles them in
//! a fixed order for [`Registry::build`](crate::conversation::Registry::build).

mod category;
mod info;
pub mod payment;
mod sheet;

use crate::conversation::registry::HandlerRecord;

/// Every handler the bot ships with
pub fn all() -> Vec<HandlerRecord> {
    let mut records = info::records();
    records.extend(sheet::records());
    records.extend(category::records());
    records.extend(payment::records());
    records
}
