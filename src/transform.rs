//! Value transforms applied to extracted text

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::TransformError;

type TransformFn = dyn Fn(&str) -> Result<String, TransformError> + Send + Sync;

/// Post-processing step for an extracted value.
#[derive(Clone)]
pub enum Transform {
    Trim,
    Lowercase,
    Uppercase,
    /// Digits plus the first decimal separator, e.g. "€12,99" -> "12.99"
    ParsePrice,
    /// Thousands-separated number, e.g. "41,550.00" -> "41550.00"
    Number,
    Custom(Arc<TransformFn>),
}

impl Transform {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<String, TransformError> + Send + Sync + 'static,
    {
        Transform::Custom(Arc::new(f))
    }

    pub fn apply(&self, value: &str) -> Result<String, TransformError> {
        match self {
            Transform::Trim => Ok(value.trim().to_string()),
            Transform::Lowercase => Ok(value.to_lowercase()),
            Transform::Uppercase => Ok(value.to_uppercase()),
            Transform::ParsePrice => parse_price(value),
            Transform::Number => parse_number(value),
            Transform::Custom(f) => f(value),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::Trim => "trim",
            Transform::Lowercase => "lowercase",
            Transform::Uppercase => "uppercase",
            Transform::ParsePrice => "parse_price",
            Transform::Number => "number",
            Transform::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trim" => Ok(Transform::Trim),
            "lowercase" => Ok(Transform::Lowercase),
            "uppercase" => Ok(Transform::Uppercase),
            "parse_price" => Ok(Transform::ParsePrice),
            "number" => Ok(Transform::Number),
            other => Err(format!("unknown transform: {other}")),
        }
    }
}

// Extract numeric value from price string like "€12.99" or "12,99 €"
fn parse_price(value: &str) -> Result<String, TransformError> {
    let mut result = String::new();
    let mut has_decimal = false;
    for c in value.chars() {
        if c.is_ascii_digit() {
            result.push(c);
        } else if (c == '.' || c == ',') && !has_decimal && !result.is_empty() {
            result.push('.');
            has_decimal = true;
        }
    }

    if result.is_empty() {
        return Err(TransformError::NotNumeric(value.to_string()));
    }
    Ok(result)
}

fn parse_number(value: &str) -> Result<String, TransformError> {
    let cleaned: String = value
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(TransformError::Empty);
    }
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(cleaned),
        _ => Err(TransformError::NotNumeric(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(Transform::ParsePrice.apply("€12.99").unwrap(), "12.99");
        assert_eq!(Transform::ParsePrice.apply("12,99 €").unwrap(), "12.99");
        assert_eq!(
            Transform::ParsePrice.apply("n/a"),
            Err(TransformError::NotNumeric("n/a".to_string()))
        );
    }

    #[test]
    fn test_number() {
        assert_eq!(Transform::Number.apply(" 41,550.00 ").unwrap(), "41550.00");
        assert_eq!(Transform::Number.apply("-"), Err(TransformError::NotNumeric("-".to_string())));
        assert_eq!(Transform::Number.apply("   "), Err(TransformError::Empty));
    }

    #[test]
    fn test_case_and_trim() {
        assert_eq!(Transform::Trim.apply("  a b ").unwrap(), "a b");
        assert_eq!(Transform::Lowercase.apply("GOLD").unwrap(), "gold");
        assert_eq!(Transform::Uppercase.apply("gold").unwrap(), "GOLD");
    }

    #[test]
    fn test_custom() {
        let t = Transform::custom(|v| Ok(format!("{v} THB")));
        assert_eq!(t.apply("100").unwrap(), "100 THB");
        assert_eq!(format!("{t:?}"), "custom");
    }

    #[test]
    fn test_from_str() {
        assert!(matches!("parse_price".parse::<Transform>(), Ok(Transform::ParsePrice)));
        assert!(matches!("NUMBER".parse::<Transform>(), Ok(Transform::Number)));
        assert!("round".parse::<Transform>().is_err());
    }
}
