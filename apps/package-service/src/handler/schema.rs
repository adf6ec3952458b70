//! # リクエストボディの検証
//!
//! 作成・更新のボディを次の契約で検証する。
//!
//! ```json
//! {
//!   "type": "object",
//!   "properties": {
//!     "name":   { "type": "string", "minLength": 1, "maxLength": 255 },
//!     "symbol": { "type": ["string", "null"], "maxLength": 50 }
//!   },
//!   "required": ["name"]
//! }
//! ```
//!
//! 長さは前後の空白を除いて数えるため、空白だけの名称も短すぎるエラーになる。
//! 上限は [`PackageName::MAX_LENGTH`] と [`PackageSymbol::MAX_LENGTH`] に合わせる。
//!
//! エラーメッセージは JSON Schema (draft-7) 検証器の文言に合わせる。
//! 値はメッセージ内で Python の `repr` 形式で表示する。

use catalog_domain::package::{PackageName, PackageSymbol};
use catalog_shared::FieldError;
use serde_json::{Map, Value};

/// 検証エラーに付けるエンティティ名
pub const ENTITY: &str = "packages";

/// 検証済みのボディ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageBody {
   pub name:   String,
   pub symbol: Option<String>,
}

/// ボディを検証する
///
/// エラーはメッセージ順に並べて返す。
pub fn validate_package_body(body: Option<&Value>) -> Result<PackageBody, Vec<FieldError>> {
   let Some(Value::Object(fields)) = body else {
      let repr = body.map_or_else(|| "None".to_string(), python_repr);
      let msg = format!("{repr} is not of type 'object'");
      return Err(vec![field_error(None, msg)]);
   };

   let mut errors = Vec::new();
   let name = check_name(fields, &mut errors);
   let symbol = check_symbol(fields, &mut errors);

   match name {
      Some(name) if errors.is_empty() => Ok(PackageBody { name, symbol }),
      _ => {
         errors.sort_by(|a, b| a.msg.cmp(&b.msg));
         Err(errors)
      }
   }
}

fn check_name(fields: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<String> {
   match fields.get("name") {
      None => {
         errors.push(field_error(None, "'name' is a required property".to_string()));
         None
      }
      Some(Value::String(name)) => match trimmed_len(name) {
         0 => {
            errors.push(length_error("name", name, "too short"));
            None
         }
         len if len > PackageName::MAX_LENGTH => {
            errors.push(length_error("name", name, "too long"));
            None
         }
         _ => Some(name.clone()),
      },
      Some(other) => {
         errors.push(field_error(
            Some("name"),
            format!("{} is not of type 'string'", python_repr(other)),
         ));
         None
      }
   }
}

fn check_symbol(fields: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<String> {
   match fields.get("symbol") {
      None | Some(Value::Null) => None,
      Some(Value::String(symbol)) if trimmed_len(symbol) > PackageSymbol::MAX_LENGTH => {
         errors.push(length_error("symbol", symbol, "too long"));
         None
      }
      Some(Value::String(symbol)) => Some(symbol.clone()),
      Some(other) => {
         errors.push(field_error(
            Some("symbol"),
            format!("{} is not of type 'string', 'null'", python_repr(other)),
         ));
         None
      }
   }
}

fn trimmed_len(value: &str) -> usize {
   value.trim().chars().count()
}

fn length_error(field: &str, value: &str, reason: &str) -> FieldError {
   field_error(Some(field), format!("{} is {reason}", repr_str(value)))
}

/// フィールドを特定してエラーを作る
///
/// パスがない場合（必須項目の欠落など）はメッセージ中の最初の `'…'` をフィールド名とする。
fn field_error(path: Option<&str>, msg: String) -> FieldError {
   let field = path
      .map(str::to_string)
      .or_else(|| first_quoted(&msg).map(str::to_string));
   match field {
      Some(field) => FieldError::invalid(ENTITY, field, msg),
      None => FieldError::invalid_entity(ENTITY, msg),
   }
}

fn first_quoted(msg: &str) -> Option<&str> {
   let start = msg.find('\'')? + 1;
   let len = msg[start..].find('\'')?;
   Some(&msg[start..start + len]).filter(|field| !field.is_empty())
}

/// 値を Python の `repr` 形式で表示する
pub fn python_repr(value: &Value) -> String {
   match value {
      Value::Null => "None".to_string(),
      Value::Bool(true) => "True".to_string(),
      Value::Bool(false) => "False".to_string(),
      Value::Number(n) => match n.as_f64() {
         Some(f) if n.is_f64() && f.fract() == 0.0 && f.is_finite() => format!("{f:.1}"),
         _ => n.to_string(),
      },
      Value::String(s) => repr_str(s),
      Value::Array(items) => {
         let items: Vec<_> = items.iter().map(python_repr).collect();
         format!("[{}]", items.join(", "))
      }
      Value::Object(entries) => {
         let entries: Vec<_> = entries
            .iter()
            .map(|(key, value)| format!("{}: {}", repr_str(key), python_repr(value)))
            .collect();
         format!("{{{}}}", entries.join(", "))
      }
   }
}

fn repr_str(s: &str) -> String {
   let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
   let mut out = String::with_capacity(s.len() + 2);
   out.push(quote);
   for c in s.chars() {
      match c {
         '\\' => out.push_str("\\\\"),
         '\n' => out.push_str("\\n"),
         '\r' => out.push_str("\\r"),
         '\t' => out.push_str("\\t"),
         c if c == quote => {
            out.push('\\');
            out.push(c);
         }
         c => out.push(c),
      }
   }
   out.push(quote);
   out
}
