//! Parsing of the legacy name/value (URL-encoded) responses.

use std::collections::BTreeMap;

use adyen_types::domain::map_variant_to_method;
use adyen_types::{RecurringContract, RecurringType};
use percent_encoding::percent_decode_str;

const DETAILS_PREFIX: &str = "recurringDetailsResult_details_";
const RESULT_RECORD: &str = "recurringDetailsResult";

/// Decodes a URL-encoded response body into its pairs, in order.
pub(crate) fn decode_pairs(body: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body.trim().as_bytes())
        .into_owned()
        .collect()
}

/// URL-decodes a whole response body, keeping `&` and `=` as they are.
pub(crate) fn decode_body(body: &str) -> String {
    let body = body.trim().replace('+', " ");
    percent_decode_str(&body).decode_utf8_lossy().into_owned()
}

/// Turns a `Recurring.listRecurringDetails` response into contracts.
///
/// Keys such as `recurringDetailsResult.details.0.card.number` are
/// flattened with `_` and grouped by detail index; attributes of the
/// result itself (`creationDate`, `shopperReference`, ...) are copied into
/// every contract without overriding its own attributes.
pub(crate) fn parse_recurring_details(
    body: &str,
    recurring_type: RecurringType,
) -> Vec<RecurringContract> {
    let mut records: Vec<(String, RecurringContract)> = Vec::new();
    let mut shared: BTreeMap<String, String> = BTreeMap::new();

    for (key, mut value) in decode_pairs(body) {
        let key = key.replace(['.', ' '], "_");
        let key = key.strip_prefix(DETAILS_PREFIX).unwrap_or(&key);
        let Some((record_key, attribute)) = key.split_once('_') else {
            continue;
        };

        // Stored iDEAL details are charged as SEPA direct debit.
        if attribute == "variant" && value == "ideal" {
            value = "sepadirectdebit".to_string();
        }

        if record_key == RESULT_RECORD {
            shared.insert(attribute.to_string(), value);
            continue;
        }

        let idx = match records.iter().position(|(k, _)| k == record_key) {
            Some(idx) => idx,
            None => {
                records.push((record_key.to_string(), RecurringContract::default()));
                records.len() - 1
            }
        };
        let record = &mut records[idx].1;
        if attribute == "variant" {
            record.recurring_type = Some(recurring_type);
            record.payment_method = Some(map_variant_to_method(&value));
        }
        record.attributes.insert(attribute.to_string(), value);
    }

    records
        .into_iter()
        .map(|(_, mut contract)| {
            for (name, value) in &shared {
                contract
                    .attributes
                    .entry(name.clone())
                    .or_insert_with(|| value.clone());
            }
            contract
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "recurringDetailsResult.creationDate=2026-01-10T10%3A00%3A00%2B01%3A00\
&recurringDetailsResult.details.0.card.expiryMonth=3\
&recurringDetailsResult.details.0.card.holderName=J+Doe\
&recurringDetailsResult.details.0.recurringDetailReference=8313147988756818\
&recurringDetailsResult.details.0.variant=visa\
&recurringDetailsResult.details.1.recurringDetailReference=8413147988756819\
&recurringDetailsResult.details.1.variant=ideal\
&recurringDetailsResult.details.1.creationDate=2026-02-01\
&recurringDetailsResult.lastKnownShopperEmail=jane%40example.com\
&recurringDetailsResult.shopperReference=customer_42";

    #[test]
    fn test_parse_groups_by_detail() {
        let contracts = parse_recurring_details(LISTING, RecurringType::OneClick);
        assert_eq!(contracts.len(), 2);

        let visa = &contracts[0];
        assert_eq!(visa.recurring_detail_reference(), Some("8313147988756818"));
        assert_eq!(visa.variant(), Some("visa"));
        assert_eq!(visa.attribute("card_holderName"), Some("J Doe"));
        assert_eq!(visa.attribute("card_expiryMonth"), Some("3"));
        assert_eq!(visa.recurring_type, Some(RecurringType::OneClick));
        assert_eq!(visa.payment_method.as_deref(), Some("adyen_cc"));
    }

    #[test]
    fn test_parse_maps_ideal_to_sepa() {
        let contracts = parse_recurring_details(LISTING, RecurringType::Recurring);
        let sepa = &contracts[1];
        assert_eq!(sepa.variant(), Some("sepadirectdebit"));
        assert_eq!(sepa.payment_method.as_deref(), Some("adyen_sepa"));
    }

    #[test]
    fn test_shared_attributes_do_not_override() {
        let contracts = parse_recurring_details(LISTING, RecurringType::OneClick);
        assert_eq!(
            contracts[0].attribute("creationDate"),
            Some("2026-01-10T10:00:00+01:00")
        );
        assert_eq!(contracts[1].attribute("creationDate"), Some("2026-02-01"));
        assert_eq!(
            contracts[1].attribute("lastKnownShopperEmail"),
            Some("jane@example.com")
        );
        assert_eq!(contracts[0].attribute("shopperReference"), Some("customer_42"));
    }

    #[test]
    fn test_parse_empty_listing() {
        let body = "recurringDetailsResult.shopperReference=customer_42";
        assert!(parse_recurring_details(body, RecurringType::OneClick).is_empty());
        assert!(parse_recurring_details("", RecurringType::OneClick).is_empty());
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(
            decode_body("disableResult.response=%5Bdetail-successfully-disabled%5D\n"),
            "disableResult.response=[detail-successfully-disabled]"
        );
        assert_eq!(
            decode_body("Invalid+request%3A detail unknown"),
            "Invalid request: detail unknown"
        );
        assert_eq!(decode_body("a&b"), "a&b");
    }
}
