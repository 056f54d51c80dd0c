use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Deserializes a JSON object into `(key, value)` pairs in document order.
///
/// `HashMap` would lose the order in which the SEC lists unit groups, and callers rely on
/// "the first declared unit".
pub fn deserialize_ordered_map<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct OrderedVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a JSON object")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, V>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedVisitor(PhantomData))
}

/// Deserializes `null` as the type's default. `#[serde(default)]` alone only covers a
/// missing key.
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Integer part of a fiscal year that may arrive as `2023`, `2023.0` or `"2023"`.
pub fn fiscal_year_from_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.split('.').next()?.trim().parse().ok(),
        _ => None,
    }
}

/// Integer magnitude of a reported value, truncated toward zero.
pub fn magnitude_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize_ordered_map")]
        units: Vec<(String, u32)>,
    }

    #[derive(Deserialize)]
    struct Nullable {
        #[serde(default, deserialize_with = "deserialize_null_default")]
        sic: String,
        #[serde(default, deserialize_with = "deserialize_null_default")]
        tickers: Vec<String>,
    }

    #[test]
    fn null_becomes_default() {
        let nullable: Nullable = serde_json::from_str(r#"{"sic": null, "tickers": null}"#).unwrap();
        assert_eq!(nullable.sic, "");
        assert!(nullable.tickers.is_empty());

        let missing: Nullable = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.sic, "");

        let present: Nullable = serde_json::from_str(r#"{"sic": "3571", "tickers": ["AAPL"]}"#).unwrap();
        assert_eq!(present.sic, "3571");
        assert_eq!(present.tickers, vec!["AAPL"]);
    }

    #[test]
    fn keeps_declaration_order() {
        let holder: Holder =
            serde_json::from_str(r#"{"units": {"shares": 1, "USD": 2, "EUR": 3}}"#).unwrap();
        let keys: Vec<_> = holder.units.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["shares", "USD", "EUR"]);
    }

    #[test]
    fn fiscal_year_tolerates_fractions() {
        assert_eq!(fiscal_year_from_value(&json!(2023)), Some(2023));
        assert_eq!(fiscal_year_from_value(&json!(2023.0)), Some(2023));
        assert_eq!(fiscal_year_from_value(&json!("2023.0")), Some(2023));
        assert_eq!(fiscal_year_from_value(&Value::Null), None);
    }

    #[test]
    fn magnitude_truncates_floats() {
        assert_eq!(magnitude_from_value(&json!(1512000000)), Some(1512000000));
        assert_eq!(magnitude_from_value(&json!(-12.9)), Some(-12));
        assert_eq!(magnitude_from_value(&json!("abc")), None);
    }
}
