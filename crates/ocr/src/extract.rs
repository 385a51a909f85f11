use std::sync::OnceLock;

use regex::Regex;

/// Anchor string printed on telebirr receipts directly before the
/// transaction number.
pub const TRANSACTION_LABEL: &str = "Transaction Number";

fn label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!("(?i){}", regex::escape(TRANSACTION_LABEL))).expect("invalid regex")
    })
}

/// Locate the transaction number in linearized OCR text.
///
/// The text after the first (case-insensitive) label occurrence is trimmed,
/// stripped of every colon, and split on whitespace; the first token,
/// upper-cased, is the raw identifier. Returns `None` when the label is
/// absent or nothing usable follows it.
pub fn find_transaction_number(text: &str) -> Option<String> {
    let m = label_re().find(text)?;
    let remainder = text[m.end()..].trim().replace(':', "");

    match remainder.split_whitespace().next() {
        Some(token) => Some(token.to_uppercase()),
        None => {
            tracing::warn!("transaction label found but nothing follows it");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_after_label() {
        let text = "telebirr receipt\nTransaction Number: AB0123\nAmount 150.00";
        assert_eq!(find_transaction_number(text).as_deref(), Some("AB0123"));
    }

    #[test]
    fn label_lookup_is_case_insensitive() {
        assert_eq!(
            find_transaction_number("transaction number CH45TK9L0M").as_deref(),
            Some("CH45TK9L0M")
        );
        assert_eq!(
            find_transaction_number("TRANSACTION NUMBER ch45tk9l0m").as_deref(),
            Some("CH45TK9L0M")
        );
    }

    #[test]
    fn token_is_upper_cased() {
        assert_eq!(
            find_transaction_number("Transaction Number ab01o3").as_deref(),
            Some("AB01O3")
        );
    }

    #[test]
    fn takes_only_the_first_token() {
        let text = "Transaction Number AB0123 Date 2024-05-01";
        assert_eq!(find_transaction_number(text).as_deref(), Some("AB0123"));
    }

    #[test]
    fn strips_colons_from_remainder() {
        assert_eq!(
            find_transaction_number("Transaction Number:AB0123").as_deref(),
            Some("AB0123")
        );
        assert_eq!(
            find_transaction_number("Transaction Number : AB0123").as_deref(),
            Some("AB0123")
        );
    }

    #[test]
    fn no_label_returns_none() {
        assert_eq!(find_transaction_number("no label here"), None);
        assert_eq!(find_transaction_number(""), None);
    }

    #[test]
    fn label_with_empty_remainder_returns_none() {
        assert_eq!(find_transaction_number("Transaction Number"), None);
        assert_eq!(find_transaction_number("Transaction Number   "), None);
        assert_eq!(find_transaction_number("Transaction Number : : "), None);
    }

    #[test]
    fn label_spanning_lines_still_anchors_remainder() {
        // Linearized OCR puts the value on the next line; the newline is
        // ordinary whitespace to the tokenizer.
        let text = "Transaction Number\nCH45TK9LOM\nAmount";
        assert_eq!(find_transaction_number(text).as_deref(), Some("CH45TK9LOM"));
    }

    #[test]
    fn amharic_text_around_label_is_ignored() {
        let text = "የቴሌብር ክፍያ መረጃ\nTransaction Number: AB0123\nብር 150.00";
        assert_eq!(find_transaction_number(text).as_deref(), Some("AB0123"));
    }
}
