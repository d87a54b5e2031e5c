use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise piped stdin, trying JSON first and then YAML.
/// Returns None if stdin is a TTY or carries nothing.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => match serde_yaml::from_str(trimmed) {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(format!("Failed to parse stdin as JSON: {}", json_err).into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tsv_yield_core::yield_calc::YieldInput;

    #[test]
    fn test_blank_stdin_is_none() {
        assert!(parse_piped::<YieldInput>("  \n").unwrap().is_none());
    }

    #[test]
    fn test_piped_json_and_yaml() {
        let json: YieldInput = parse_piped(r#"{"buy": 200}"#).unwrap().unwrap();
        assert_eq!(json.buy, dec!(200));
        let yaml: YieldInput = parse_piped("buy: 300\n").unwrap().unwrap();
        assert_eq!(yaml.buy, dec!(300));
    }
}
