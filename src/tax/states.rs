//! GST state codes and place-of-supply formatting

/// State and union territory codes as used in GSTINs and place of supply
pub const STATE_CODES: [(&str, &str); 39] = [
    ("01", "Jammu and Kashmir"),
    ("02", "Himachal Pradesh"),
    ("03", "Punjab"),
    ("04", "Chandigarh"),
    ("05", "Uttarakhand"),
    ("06", "Haryana"),
    ("07", "Delhi"),
    ("08", "Rajasthan"),
    ("09", "Uttar Pradesh"),
    ("10", "Bihar"),
    ("11", "Sikkim"),
    ("12", "Arunachal Pradesh"),
    ("13", "Nagaland"),
    ("14", "Manipur"),
    ("15", "Mizoram"),
    ("16", "Tripura"),
    ("17", "Meghalaya"),
    ("18", "Assam"),
    ("19", "West Bengal"),
    ("20", "Jharkhand"),
    ("21", "Odisha"),
    ("22", "Chhattisgarh"),
    ("23", "Madhya Pradesh"),
    ("24", "Gujarat"),
    ("25", "Daman and Diu"),
    ("26", "Dadra and Nagar Haveli and Daman and Diu"),
    ("27", "Maharashtra"),
    ("28", "Andhra Pradesh (Old)"),
    ("29", "Karnataka"),
    ("30", "Goa"),
    ("31", "Lakshadweep Islands"),
    ("32", "Kerala"),
    ("33", "Tamil Nadu"),
    ("34", "Puducherry"),
    ("35", "Andaman and Nicobar Islands"),
    ("36", "Telangana"),
    ("37", "Andhra Pradesh"),
    ("38", "Ladakh"),
    ("96", "Other Countries"),
];

/// Name of the state for a two digit code
pub fn state_name(code: &str) -> Option<&'static str> {
    STATE_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// State code of a GSTIN, its first two characters
pub fn gstin_state_code(gstin: &str) -> &str {
    gstin.get(..2).unwrap_or("")
}

/// Place of supply label from a government code, `"06"` to `"06-Haryana"`
///
/// Codes that are not in the table are returned unchanged.
pub fn place_of_supply_label(code: &str) -> String {
    match state_name(code) {
        Some(name) => format!("{code}-{name}"),
        None => code.to_string(),
    }
}

/// Government code from a place of supply label, `"06-Haryana"` to `"06"`
pub fn place_of_supply_code(label: &str) -> &str {
    label.split('-').next().unwrap_or(label)
}
