//! Unit Quantity Codes (UQC) accepted by the GST portal

/// UQC code and its description
pub const UOM_MAP: [(&str, &str); 44] = [
    ("BAG", "BAGS"),
    ("BAL", "BALE"),
    ("BDL", "BUNDLES"),
    ("BKL", "BUCKLES"),
    ("BOU", "BILLION OF UNITS"),
    ("BOX", "BOX"),
    ("BTL", "BOTTLES"),
    ("BUN", "BUNCHES"),
    ("CAN", "CANS"),
    ("CBM", "CUBIC METERS"),
    ("CCM", "CUBIC CENTIMETERS"),
    ("CMS", "CENTIMETERS"),
    ("CTN", "CARTONS"),
    ("DOZ", "DOZENS"),
    ("DRM", "DRUMS"),
    ("GGK", "GREAT GROSS"),
    ("GMS", "GRAMMES"),
    ("GRS", "GROSS"),
    ("GYD", "GROSS YARDS"),
    ("KGS", "KILOGRAMS"),
    ("KLR", "KILOLITRE"),
    ("KME", "KILOMETRE"),
    ("LTR", "LITRES"),
    ("MLT", "MILILITRE"),
    ("MTR", "METERS"),
    ("MTS", "METRIC TON"),
    ("NOS", "NUMBERS"),
    ("OTH", "OTHERS"),
    ("PAC", "PACKS"),
    ("PCS", "PIECES"),
    ("PRS", "PAIRS"),
    ("QTL", "QUINTAL"),
    ("ROL", "ROLLS"),
    ("SET", "SETS"),
    ("SQF", "SQUARE FEET"),
    ("SQM", "SQUARE METERS"),
    ("SQY", "SQUARE YARDS"),
    ("TBS", "TABLETS"),
    ("TGM", "TEN GROSS"),
    ("THD", "THOUSANDS"),
    ("TON", "TONNES"),
    ("TUB", "TUBES"),
    ("UGS", "US GALLONS"),
    ("UNT", "UNITS"),
];

fn description(code: &str) -> Option<&'static str> {
    UOM_MAP
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, description)| *description)
}

/// Toggle a UOM between its code and its `CODE-DESCRIPTION` label
///
/// A label is reduced to its code (`NA` for services, HSN codes starting with
/// 99). A code is expanded to its label, unknown codes become `OTH-OTHERS`.
pub fn map_uom(uom: &str, hsn_code: Option<&str>) -> String {
    let uom = uom.to_uppercase();

    if uom.contains('-') {
        if hsn_code.is_some_and(|hsn| hsn.starts_with("99")) {
            return "NA".to_string();
        }
        return uom.split('-').next().unwrap_or_default().to_string();
    }

    match description(&uom) {
        Some(description) => format!("{uom}-{description}"),
        None => "OTH-OTHERS".to_string(),
    }
}
