/// The reserved field carrying the signature itself. It is never part of the signed data.
pub const SIGNATURE_FIELD: &str = "signature";

/// Field order for checkout process submission signatures.
pub const CHECKOUT_FIELD_ORDER: [&str; 31] = [
    // Merchant details
    "merchant_id",
    "merchant_key",
    "return_url",
    "cancel_url",
    "notify_url",
    // Buyer details
    "name_first",
    "name_last",
    "email_address",
    "cell_number",
    // Transaction details
    "m_payment_id",
    "amount",
    "item_name",
    "item_description",
    "custom_int1",
    "custom_int2",
    "custom_int3",
    "custom_int4",
    "custom_int5",
    "custom_str1",
    "custom_str2",
    "custom_str3",
    "custom_str4",
    "custom_str5",
    // Transaction options
    "email_confirmation",
    "confirmation_address",
    // Payment method
    "payment_method",
    // Recurring billing
    "subscription_type",
    "billing_date",
    "recurring_amount",
    "frequency",
    "cycles",
];

/// Field order for ITN (notification) signatures.
pub const NOTIFICATION_FIELD_ORDER: [&str; 23] = [
    // Transaction details
    "m_payment_id",
    "pf_payment_id",
    "payment_status",
    "item_name",
    "item_description",
    "amount_gross",
    "amount_fee",
    "amount_net",
    "custom_str1",
    "custom_str2",
    "custom_str3",
    "custom_str4",
    "custom_str5",
    "custom_int1",
    "custom_int2",
    "custom_int3",
    "custom_int4",
    "custom_int5",
    // Buyer details
    "name_first",
    "name_last",
    "email_address",
    // Merchant details
    "merchant_id",
    // Recurring billing
    "token",
];
