//! Freeform payment lines, the default handler
//!
//! Anything that is neither a command nor an expected stage input is read
//! as `<amount> <category>`, e.g. `42 groceries` or `-5.5 refund`.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use crate::conversation::registry::HandlerRecord;
use crate::conversation::reply::Reply;
use crate::conversation::session::{ChatSession, ChatStage};
use crate::core::messages;
use crate::storage::{BudgetStorage, NewPayment};

/// Optional minus, digits, optional fraction, one ASCII whitespace, category.
static PAYMENT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?[0-9]+(?:\.[0-9]+)?)[\t\n\f\r ](.*)$").expect("Failed to compile payment regex")
});

/// A payment line split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLine<'a> {
    /// Amount in minor units (cents), truncated toward zero
    pub amount_minor: i64,
    /// Category name exactly as typed
    pub category: &'a str,
}

/// Splits `text` into amount and category.
///
/// Returns `None` when the line does not have the expected shape or the
/// amount does not fit in minor units.
///
/// ```
/// use budgetbot::conversation::handlers::payment::parse_payment_line;
///
/// let line = parse_payment_line("-5.5 refund").unwrap();
/// assert_eq!(line.amount_minor, -550);
/// assert_eq!(line.category, "refund");
/// assert!(parse_payment_line("5groceries").is_none());
/// ```
pub fn parse_payment_line(text: &str) -> Option<PaymentLine<'_>> {
    let captures = PAYMENT_LINE.captures(text)?;
    let amount = Decimal::from_str(captures.get(1)?.as_str()).ok()?;
    let amount_minor = amount.checked_mul(Decimal::ONE_HUNDRED)?.trunc().to_i64()?;

    Some(PaymentLine {
        amount_minor,
        category: captures.get(2)?.as_str(),
    })
}

pub(super) fn records() -> Vec<HandlerRecord> {
    vec![HandlerRecord::fallback(false, record_payment)]
}

fn record_payment(storage: &dyn BudgetStorage, text: &str, session: &mut ChatSession) -> Reply {
    session.set_stage(ChatStage::None);

    let Some(line) = parse_payment_line(text) else {
        return Reply::text(messages::FAILURE_PARSING);
    };
    let Some(sheet_id) = session.connected_sheet else {
        return Reply::not_connected();
    };

    let category_id = match storage.find_category(sheet_id, line.category) {
        Ok(Some(id)) => id,
        Ok(None) => return Reply::text(messages::FAILURE_UNKNOWN_CATEGORY_NAME),
        Err(e) => {
            log::error!("Failed to look up category in sheet {}: {}", sheet_id, e);
            return Reply::server_error();
        }
    };

    let payment = NewPayment {
        sheet_id,
        category_id,
        payment_id: Uuid::new_v4(),
        amount_minor: line.amount_minor,
        comment: line.category.to_string(),
        occurred_at: Utc::now(),
    };
    if let Err(e) = storage.insert_payment(&payment) {
        log::error!("Failed to record payment in sheet {}: {}", sheet_id, e);
        return Reply::server_error();
    }

    log::info!(
        "Chat {} recorded {} minor units under {:?}",
        session.chat_id,
        payment.amount_minor,
        line.category
    );
    Reply::text(messages::SUCCESS_CREATE_PAYMENT)
}
