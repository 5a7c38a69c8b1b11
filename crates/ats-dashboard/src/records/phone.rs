/// Reformat a bare ten digit phone number as `NNN-NNN-NNNN`.
///
/// Any other input, including numbers that are already formatted, numbers with country codes
/// and free text, is returned unchanged. No further validation is performed.
pub fn format_phone_number(raw: &str) -> String {
    if raw.len() == 10 && raw.bytes().all(|byte| byte.is_ascii_digit()) {
        format!("{}-{}-{}", &raw[..3], &raw[3..6], &raw[6..])
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::format_phone_number;

    #[test]
    fn ten_digits_are_grouped() {
        assert_eq!(format_phone_number("5551234567"), "555-123-4567");
    }

    #[test]
    fn other_inputs_pass_through() {
        for raw in [
            "",
            "555-123-4567",
            "555123456",
            "55512345678",
            "+15551234567",
            "555 123 4567",
            "call me",
            "555123456x",
        ] {
            assert_eq!(format_phone_number(raw), raw, "{raw:?} should be untouched");
        }
    }
}
