use serde::de::DeserializeOwned;

/// Parse a `snake_case` enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use lode_core::enums::{AlertStatus, Severity};

    use super::parse_enum;

    #[test]
    fn parses_snake_case_enum() {
        let status: AlertStatus = parse_enum("dismissed", "status").expect("status should parse");
        assert_eq!(status, AlertStatus::Dismissed);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<Severity>("urgent", "severity").expect_err("should fail");
        assert!(err.to_string().contains("invalid severity 'urgent'"));
    }
}
