//! Event normalization: raw export records into typed [`Event`]s.
//!
//! The export is a JSON array of objects. Structural problems (top level is
//! not an array, an element is not an object, wallet or action missing) are
//! fatal [`InputError`]s. Numeric fields are tolerant: each of
//! `actionData.amount` and `actionData.assetPriceUSD` is read as
//!
//! - a JSON number, or
//! - a string holding a decimal number (exports usually quote amounts),
//!
//! and anything else (absent, null, unparseable, non-finite, negative)
//! becomes `0.0`. Defaulted fields are counted but never reported as errors.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::constants::{
    FIELD_ACTION, FIELD_ACTION_DATA, FIELD_AMOUNT, FIELD_PRICE_USD, FIELD_TX_HASH, FIELD_WALLET,
};
use crate::error::InputError;
use crate::types::{ActionKind, Event};

/// Result of normalizing an export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub events: Vec<Event>,
    /// Number of amount/price fields that fell back to `0.0`.
    pub defaulted_fields: usize,
}

/// Parse a JSON document and normalize it.
pub fn normalize_json(text: &str) -> Result<Normalized, InputError> {
    let value: Value = serde_json::from_str(text)?;
    normalize_records(&value)
}

/// Normalize an already-parsed export.
pub fn normalize_records(value: &Value) -> Result<Normalized, InputError> {
    let records = value.as_array().ok_or(InputError::NotAnArray)?;

    let mut out = Normalized {
        events: Vec::with_capacity(records.len()),
        defaulted_fields: 0,
    };

    for (index, record) in records.iter().enumerate() {
        let obj = record
            .as_object()
            .ok_or(InputError::RecordNotObject { index })?;
        let (event, defaulted) = normalize_record(index, obj)?;
        if defaulted > 0 {
            debug!(index, wallet = %event.wallet, defaulted, "normalize: numeric fields defaulted");
        }
        out.defaulted_fields += defaulted;
        out.events.push(event);
    }

    info!(
        records = out.events.len(),
        defaulted_fields = out.defaulted_fields,
        "normalize: export normalized"
    );
    Ok(out)
}

fn normalize_record(index: usize, obj: &Map<String, Value>) -> Result<(Event, usize), InputError> {
    let wallet = non_empty_str(obj.get(FIELD_WALLET)).ok_or(InputError::MissingWallet { index })?;
    let action = non_empty_str(obj.get(FIELD_ACTION)).ok_or(InputError::MissingAction { index })?;
    let tx_hash = non_empty_str(obj.get(FIELD_TX_HASH)).map(str::to_string);

    // A record without actionData is treated like one with an empty object.
    let data = obj.get(FIELD_ACTION_DATA).and_then(Value::as_object);
    let amount = data.and_then(|d| numeric_field(d.get(FIELD_AMOUNT)));
    let price = data.and_then(|d| numeric_field(d.get(FIELD_PRICE_USD)));
    let defaulted = usize::from(amount.is_none()) + usize::from(price.is_none());

    let event = Event {
        wallet: wallet.to_string(),
        action: ActionKind::parse(action),
        amount: amount.unwrap_or(0.0),
        price_usd: price.unwrap_or(0.0),
        tx_hash,
    };
    Ok((event, defaulted))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Read a non-negative finite number from a JSON number or numeric string.
fn numeric_field(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}
