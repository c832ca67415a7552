//! Field metadata for inbound notifications.
//!
//! Every notification field that can be stored on an order is described here: how its value is interpreted, whether
//! it must be present and how long it may be. The validators are driven by this table, and the help texts double as
//! the field documentation.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_length: Option<usize>,
    pub help_text: &'static str,
}

const fn text(name: &'static str, max_length: usize, help_text: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Text, required: false, max_length: Some(max_length), help_text }
}

const fn required_text(name: &'static str, max_length: usize, help_text: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Text, required: true, max_length: Some(max_length), help_text }
}

const fn integer(name: &'static str, help_text: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Integer, required: false, max_length: None, help_text }
}

const fn decimal(name: &'static str, help_text: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Decimal, required: false, max_length: None, help_text }
}

const CUSTOM_STR: &str = "Custom string variable passed by the receiver during the payment request.";
const CUSTOM_INT: &str = "Custom integer variable passed by the receiver during the payment request.";

pub const NOTIFICATION_SCHEMA: [FieldSpec; 23] = [
    text("m_payment_id", 100, "Unique transaction ID on the receiver's system."),
    text("pf_payment_id", 40, "Unique transaction ID on PayFast."),
    text("payment_status", 20, "The status of the payment."),
    required_text("item_name", 100, "The name of the item being charged for."),
    text("item_description", 255, "The description of the item being charged for."),
    decimal("amount_gross", "The total amount which the payer paid."),
    decimal("amount_fee", "The total in fees which was deducted from the amount."),
    decimal("amount_net", "The net amount credited to the receiver's account."),
    text("custom_str1", 255, CUSTOM_STR),
    text("custom_str2", 255, CUSTOM_STR),
    text("custom_str3", 255, CUSTOM_STR),
    text("custom_str4", 255, CUSTOM_STR),
    text("custom_str5", 255, CUSTOM_STR),
    integer("custom_int1", CUSTOM_INT),
    integer("custom_int2", CUSTOM_INT),
    integer("custom_int3", CUSTOM_INT),
    integer("custom_int4", CUSTOM_INT),
    integer("custom_int5", CUSTOM_INT),
    text("name_first", 100, "First name of the payer."),
    text("name_last", 100, "Last name of the payer."),
    text("email_address", 100, "Email address of the payer."),
    required_text("merchant_id", 15, "The Merchant ID as given by the PayFast system."),
    text("signature", 32, "A security signature of the transmitted data"),
];

pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    NOTIFICATION_SCHEMA.iter().find(|spec| spec.name == name)
}

pub fn help_text(name: &str) -> Option<&'static str> {
    field_spec(name).map(|spec| spec.help_text)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::signature::{NOTIFICATION_FIELD_ORDER, SIGNATURE_FIELD};

    #[test]
    fn schema_covers_signed_fields() {
        // `token` is signed, but never stored
        for name in NOTIFICATION_FIELD_ORDER.iter().filter(|n| **n != "token") {
            assert!(field_spec(name).is_some(), "{name} has no metadata");
        }
        assert!(field_spec(SIGNATURE_FIELD).is_some());
        assert!(field_spec("token").is_none());
    }

    #[test]
    fn lookups() {
        assert_eq!(help_text("pf_payment_id"), Some("Unique transaction ID on PayFast."));
        let merchant = field_spec("merchant_id").unwrap();
        assert!(merchant.required);
        assert_eq!(merchant.max_length, Some(15));
        assert_eq!(field_spec("amount_fee").unwrap().kind, FieldKind::Decimal);
        assert_eq!(NOTIFICATION_SCHEMA.iter().filter(|s| s.required).count(), 2);
    }
}
