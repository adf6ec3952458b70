//! # 転送用シリアライズ
//!
//! JSON でそのまま表現できない値（日時、固定小数点数）を転送用の表現に変換する。
//!
//! ## 変換規則
//!
//! | 値 | JSON 表現 |
//! |----|-----------|
//! | 日時 | `"YYYY-MM-DD HH:MM:SS"`（秒未満は切り捨て、UTC） |
//! | エポック秒（固定小数点） | 日時と同じ文字列形式 |
//! | 固定小数点（小数部あり） | 浮動小数点数 |
//! | 固定小数点（小数部なし） | 整数 |
//!
//! ## 型タグ
//!
//! 値の種類は [`TransportValue`] のバリアントで明示する。
//! 桁数からエポック秒を推測する従来の判定は
//! [`TransportValue::from_untagged_decimal`] でのみ行い、既定の経路では使わない。

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

/// 転送用の日時フォーマット
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 未タグの固定小数点数をエポック秒とみなす整数部の最小桁数
pub const EPOCH_SECONDS_MIN_DIGITS: usize = 9;

/// 日時を転送用の文字列に変換する
pub fn format_datetime(value: &DateTime<Utc>) -> String {
   value.format(DATETIME_FORMAT).to_string()
}

/// 転送用の文字列から日時を復元する
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
   NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map(|naive| naive.and_utc())
}

/// `#[serde(with = "catalog_shared::transport::datetime")]` 用の日時シリアライザ
pub mod datetime {
   use chrono::{DateTime, Utc};
   use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

   pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
      serializer.serialize_str(&super::format_datetime(value))
   }

   pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
      let raw = String::deserialize(deserializer)?;
      super::parse_datetime(&raw).map_err(D::Error::custom)
   }
}

/// 型タグ付きの転送用の値
///
/// ペイロードをこの木構造で組み立て、[`TransportValue::to_json`] で
/// JSON に変換する。`Serialize` も同じ変換を通る。
#[derive(Debug, Clone, PartialEq)]
pub enum TransportValue {
   Null,
   Bool(bool),
   Integer(i64),
   Float(f64),
   Text(String),
   /// 日時
   Timestamp(DateTime<Utc>),
   /// エポック秒を表す固定小数点数
   EpochSeconds(Decimal),
   /// 金額などの固定小数点数
   Decimal(Decimal),
   List(Vec<TransportValue>),
   Map(BTreeMap<String, TransportValue>),
}

impl TransportValue {
   /// 型タグのない固定小数点数を分類する
   ///
   /// 整数部が [`EPOCH_SECONDS_MIN_DIGITS`] 桁以上ならエポック秒、
   /// それ以外は通常の固定小数点数とみなす。
   /// 大きな金額とエポック秒を区別できないため、値の出自が分かる場合は
   /// バリアントを直接指定すること。
   pub fn from_untagged_decimal(value: Decimal) -> Self {
      if integer_digits(&value) >= EPOCH_SECONDS_MIN_DIGITS {
         Self::EpochSeconds(value)
      } else {
         Self::Decimal(value)
      }
   }

   /// 値の木を走査して JSON に変換する
   pub fn to_json(&self) -> Value {
      match self {
         Self::Null => Value::Null,
         Self::Bool(b) => Value::Bool(*b),
         Self::Integer(n) => Value::from(*n),
         Self::Float(f) => float_to_json(*f),
         Self::Text(s) => Value::String(s.clone()),
         Self::Timestamp(dt) => Value::String(format_datetime(dt)),
         Self::EpochSeconds(seconds) => epoch_seconds_to_json(seconds),
         Self::Decimal(d) => decimal_to_json(d),
         Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
         Self::Map(entries) => Value::Object(
            entries
               .iter()
               .map(|(key, value)| (key.clone(), value.to_json()))
               .collect(),
         ),
      }
   }
}

impl Serialize for TransportValue {
   fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
      self.to_json().serialize(serializer)
   }
}

impl From<bool> for TransportValue {
   fn from(value: bool) -> Self {
      Self::Bool(value)
   }
}

impl From<i64> for TransportValue {
   fn from(value: i64) -> Self {
      Self::Integer(value)
   }
}

impl From<&str> for TransportValue {
   fn from(value: &str) -> Self {
      Self::Text(value.to_string())
   }
}

impl From<String> for TransportValue {
   fn from(value: String) -> Self {
      Self::Text(value)
   }
}

impl From<DateTime<Utc>> for TransportValue {
   fn from(value: DateTime<Utc>) -> Self {
      Self::Timestamp(value)
   }
}

impl<T: Into<TransportValue>> From<Option<T>> for TransportValue {
   fn from(value: Option<T>) -> Self {
      value.map_or(Self::Null, Into::into)
   }
}

impl<T: Into<TransportValue>> From<Vec<T>> for TransportValue {
   fn from(value: Vec<T>) -> Self {
      Self::List(value.into_iter().map(Into::into).collect())
   }
}

/// 符号を除いた整数部の桁数
fn integer_digits(value: &Decimal) -> usize {
   let text = value.abs().trunc().to_string();
   text
      .split('.')
      .next()
      .map_or(0, |digits| digits.chars().filter(char::is_ascii_digit).count())
}

fn float_to_json(value: f64) -> Value {
   Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// 固定小数点数を JSON の数値に変換する
///
/// 小数部が表記されている値（スケール > 0）は浮動小数点数、
/// それ以外は整数として出力する。
fn decimal_to_json(value: &Decimal) -> Value {
   if value.scale() > 0 {
      return value.to_f64().map_or(Value::Null, float_to_json);
   }
   match value.to_i64() {
      Some(n) => Value::from(n),
      None => value.to_f64().map_or(Value::Null, float_to_json),
   }
}

/// エポック秒を日時文字列に変換する
///
/// 表現可能な範囲外の値は通常の固定小数点数として出力する。
fn epoch_seconds_to_json(seconds: &Decimal) -> Value {
   seconds
      .trunc()
      .to_i64()
      .and_then(|secs| DateTime::from_timestamp(secs, 0))
      .map_or_else(
         || decimal_to_json(seconds),
         |dt| Value::String(format_datetime(&dt)),
      )
}

#[cfg(test)]
mod tests {
   use std::str::FromStr;

   use pretty_assertions::assert_eq;
   use rstest::rstest;
   use serde_json::json;

   use super::*;

   fn dec(value: &str) -> Decimal {
      Decimal::from_str(value).unwrap()
   }

   #[test]
   fn test_日時は秒未満を切り捨てた文字列になる() {
      let dt = DateTime::from_timestamp(1_700_000_000, 987_654_321).unwrap();

      assert_eq!(format_datetime(&dt), "2023-11-14 22:13:20");
      assert_eq!(TransportValue::Timestamp(dt).to_json(), json!("2023-11-14 22:13:20"));
   }

   #[test]
   fn test_日時文字列は所定のパターンに一致する() {
      let formatted = format_datetime(&Utc::now());
      let bytes = formatted.as_bytes();

      assert_eq!(formatted.len(), 19);
      for (i, b) in bytes.iter().enumerate() {
         match i {
            4 | 7 => assert_eq!(*b, b'-'),
            10 => assert_eq!(*b, b' '),
            13 | 16 => assert_eq!(*b, b':'),
            _ => assert!(b.is_ascii_digit(), "{formatted} の {i} 文字目が数字でない"),
         }
      }
   }

   #[test]
   fn test_日時文字列をパースして復元できる() {
      let dt = parse_datetime("2024-01-02 03:04:05").unwrap();

      assert_eq!(dt, DateTime::from_timestamp(1_704_164_645, 0).unwrap());
      assert!(parse_datetime("2024-01-02T03:04:05").is_err());
   }

   #[test]
   fn test_エポック秒は日時文字列になる() {
      let value = TransportValue::EpochSeconds(dec("1700000000.75"));

      assert_eq!(value.to_json(), json!("2023-11-14 22:13:20"));
   }

   #[rstest]
   #[case("12.50", json!(12.5))]
   #[case("0.1", json!(0.1))]
   #[case("42", json!(42))]
   #[case("-7", json!(-7))]
   fn test_固定小数点は小数部の有無で浮動小数点か整数になる(
      #[case] raw: &str,
      #[case] expected: Value,
   ) {
      assert_eq!(TransportValue::Decimal(dec(raw)).to_json(), expected);
   }

   #[rstest]
   #[case("123456789", true)]
   #[case("1700000000.5", true)]
   #[case("12345678", false)]
   #[case("99999999.99", false)]
   #[case("-123456789", true)]
   fn test_未タグの固定小数点は整数部の桁数でエポック秒と判定する(
      #[case] raw: &str,
      #[case] is_epoch: bool,
   ) {
      let value = TransportValue::from_untagged_decimal(dec(raw));

      assert_eq!(matches!(value, TransportValue::EpochSeconds(_)), is_epoch);
   }

   #[test]
   fn test_ネストした値の木を走査して変換する() {
      let created_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
      let mut record = BTreeMap::new();
      record.insert("name".to_string(), TransportValue::from("Caixa"));
      record.insert("symbol".to_string(), TransportValue::from(None::<String>));
      record.insert("created_at".to_string(), TransportValue::from(created_at));
      record.insert("weight".to_string(), TransportValue::Decimal(dec("1.25")));
      let payload = TransportValue::List(vec![TransportValue::Map(record)]);

      assert_eq!(
         serde_json::to_value(&payload).unwrap(),
         json!([{
            "name": "Caixa",
            "symbol": null,
            "created_at": "2023-11-14 22:13:20",
            "weight": 1.25,
         }])
      );
   }

   #[test]
   fn test_serde_withで日時フィールドを往復できる() {
      #[derive(Serialize, serde::Deserialize)]
      struct Record {
         #[serde(with = "datetime")]
         at: DateTime<Utc>,
      }

      let record = Record {
         at: DateTime::from_timestamp(1_700_000_000, 500).unwrap(),
      };
      let json = serde_json::to_value(&record).unwrap();
      assert_eq!(json, json!({ "at": "2023-11-14 22:13:20" }));

      let restored: Record = serde_json::from_value(json).unwrap();
      assert_eq!(restored.at, DateTime::from_timestamp(1_700_000_000, 0).unwrap());
   }
}
