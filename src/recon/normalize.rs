//! Mapping of clearing-network field encodings onto the local schema.

use bigdecimal::BigDecimal;
use serde_json::Value;

use super::banks::BANK_CODES;
use super::error::ParseError;

/// Key/value pairs of one report line, after sentinel substitution.
pub type RawRecord = serde_json::Map<String, Value>;

const NONE_SENTINEL: &str = "None";

/// Beneficiary tax id: the sentinel becomes an empty string, not null.
const BLANK_WHEN_NONE: &str = "rfc_curp_beneficiario";

/// Parse one single-quoted key/value literal into a record.
pub fn parse_record(line: &str) -> Result<RawRecord, ParseError> {
    let normalized = line.trim().replace('\'', "\"");
    let Value::Object(mut record) = serde_json::from_str::<Value>(&normalized)? else {
        return Err(ParseError::NotAnObject);
    };

    for (key, value) in record.iter_mut() {
        if value.as_str() == Some(NONE_SENTINEL) {
            *value = if key == BLANK_WHEN_NONE {
                Value::String(String::new())
            } else {
                Value::Null
            };
        }
    }

    Ok(record)
}

/// SPEI participant code for a 3-digit CLABE institution prefix.
pub fn bank_code_for(prefix: &str) -> Option<&'static str> {
    BANK_CODES
        .binary_search_by(|(code, _)| (*code).cmp(prefix))
        .ok()
        .map(|idx| BANK_CODES[idx].1)
}

/// Two-character account type derived from an account's institution.
pub fn account_type_for(account: &str) -> Option<String> {
    let prefix = account.get(..3)?;
    let code = bank_code_for(prefix)?;
    Some(code.chars().take(2).collect())
}

/// Institution prefix of an 18-digit account number.
pub fn institution_prefix(account: &str) -> Option<String> {
    account.get(..3).map(str::to_string)
}

pub fn amount_from_minor_units(minor_units: i64) -> BigDecimal {
    (BigDecimal::from(minor_units) / BigDecimal::from(100)).with_scale(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_record_substitutes_sentinel() {
        let record = parse_record(
            "{'id': 99, 'rastreo': 'ABC123', 'rfc_curp_beneficiario': 'None', 'rfc_curp_ordenante': 'None'}",
        )
        .unwrap();

        assert_eq!(record["id"], 99);
        assert_eq!(record["rastreo"], "ABC123");
        assert_eq!(record["rfc_curp_beneficiario"], "");
        assert!(record["rfc_curp_ordenante"].is_null());
    }

    #[test]
    fn test_reserialized_record_keeps_blank_tax_id() {
        let record = parse_record("{'rfc_curp_beneficiario': 'None', 'concepto_pago': 'None'}").unwrap();
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains(r#""rfc_curp_beneficiario":"""#));
        assert!(json.contains(r#""concepto_pago":null"#));
    }

    #[test]
    fn test_parse_record_rejects_malformed_line() {
        assert!(matches!(
            parse_record("{'id': 99, 'rastreo': }"),
            Err(ParseError::MalformedRecord(_))
        ));
        assert!(matches!(parse_record("['a', 'b']"), Err(ParseError::NotAnObject)));
    }

    #[test]
    fn test_bank_code_lookup() {
        assert_eq!(bank_code_for("646"), Some("90646"));
        assert_eq!(bank_code_for("072"), Some("40072"));
        assert_eq!(bank_code_for("999"), None);
        assert_eq!(bank_code_for(""), None);
    }

    #[test]
    fn test_account_type_for() {
        assert_eq!(account_type_for("646180000000000001").as_deref(), Some("90"));
        assert_eq!(account_type_for("072691004495711499").as_deref(), Some("40"));
        assert_eq!(account_type_for("135000000000000000").as_deref(), Some("37"));
        assert_eq!(account_type_for("999000000000000000"), None);
        assert_eq!(account_type_for(""), None);
        assert_eq!(account_type_for("64"), None);
    }

    #[test]
    fn test_amount_from_minor_units() {
        let amount = amount_from_minor_units(150000);
        assert_eq!(amount, BigDecimal::from_str("1500.00").unwrap());
        assert_eq!(amount.to_string(), "1500.00");
        assert_eq!(amount_from_minor_units(1).to_string(), "0.01");
    }
}
