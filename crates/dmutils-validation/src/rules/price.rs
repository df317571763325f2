//! Rules for price answers
//!
//! A price answer is the list `[min, max, unit, interval]`; missing
//! components read as empty strings. The checks record the components they
//! look at in dirty data whether they pass or not.

use super::{empty, format_price_to_number, is_a_float, less_than_5_decimal_places};
use crate::answer::{AnswerValue, PostedAnswer};
use crate::outcome::Accumulator;

fn is_price(value: &str) -> bool {
    is_a_float(value) && less_than_5_decimal_places(value)
}

pub fn no_min_price_specified(acc: &mut Accumulator, answer: &PostedAnswer) -> bool {
    let min_price = answer.component(0);
    acc.set_dirty("priceMin", min_price);
    !empty(min_price)
}

pub fn min_price_not_a_number(acc: &mut Accumulator, answer: &PostedAnswer) -> bool {
    let min_price = answer.component(0);
    acc.set_dirty("priceMin", min_price);
    is_price(min_price)
}

/// An empty maximum is allowed
pub fn max_price_not_a_number(acc: &mut Accumulator, answer: &PostedAnswer) -> bool {
    let max_price = answer.component(1);
    acc.set_dirty("priceMax", max_price);
    empty(max_price) || is_price(max_price)
}

/// An empty maximum is allowed; prices that are not numbers fail
pub fn max_less_than_min(answer: &PostedAnswer) -> bool {
    let max_price = answer.component(1);
    if empty(max_price) {
        return true;
    }

    let min = answer.component(0).trim().parse::<f64>();
    let max = max_price.trim().parse::<f64>();
    match (min, max) {
        (Ok(min), Ok(max)) => max > min,
        _ => false,
    }
}

pub fn no_unit_specified(acc: &mut Accumulator, answer: &PostedAnswer) -> bool {
    let price_unit = answer.component(2);
    acc.set_dirty("priceUnit", price_unit);
    !empty(price_unit)
}

/// Store the price components and the human-readable price string
///
/// Produces e.g. `£10 to £20 per unit per year`. An empty maximum is stored
/// as null.
pub fn price_string_can_be_composed(acc: &mut Accumulator, answer: &PostedAnswer) -> bool {
    let min_price = answer.component(0);
    let max_price = answer.component(1);
    let price_unit = answer.component(2);
    let price_interval = answer.component(3);

    let mut price_string = format!("£{}", min_price);
    acc.set_clean("priceMin", format_price_to_number(min_price));

    if !empty(max_price) {
        price_string.push_str(&format!(" to £{}", max_price));
        acc.set_clean("priceMax", format_price_to_number(max_price));
    } else {
        // TODO: store an absent maximum as a missing key once the data API accepts it
        acc.set_clean("priceMax", AnswerValue::Null);
    }

    price_string.push_str(&per(price_unit));
    acc.set_clean("priceUnit", price_unit);

    if !empty(price_interval) {
        price_string.push_str(&per(price_interval));
        acc.set_clean("priceInterval", price_interval);
    } else {
        acc.set_clean("priceInterval", "");
    }

    acc.set_clean("priceString", price_string);
    true
}

/// ` per {value}` in lower case; values already starting with "per " are kept
fn per(value: &str) -> String {
    let lower = value.to_lowercase();
    if lower.starts_with("per ") {
        format!(" {}", lower)
    } else {
        format!(" per {}", lower)
    }
}
