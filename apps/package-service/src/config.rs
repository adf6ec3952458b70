//! # Package Service 設定
//!
//! 環境変数から設定を読み込む。
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `PACKAGE_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PACKAGE_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `DATABASE_MAX_CONNECTIONS` | No | 接続プールの最大接続数（デフォルト: `5`） |
//! | `PACKAGE_FUNCTION` | Lambda のみ | `create` / `get` / `update` / `delete` / `list` |
//! | `RUN_MIGRATIONS` | No | `true` なら起動時にマイグレーションを適用する |

use std::{env, fmt, str::FromStr};

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// 設定読み込みのエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   #[error("{0} が設定されていません")]
   Missing(&'static str),

   #[error("{name} の値が不正です: {value:?}")]
   Invalid { name: &'static str, value: String },
}

/// Lambda としてデプロイされたときに担当する操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFunction {
   Create,
   Get,
   Update,
   Delete,
   List,
}

impl FromStr for PackageFunction {
   type Err = ConfigError;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      match s.trim() {
         "create" => Ok(Self::Create),
         "get" => Ok(Self::Get),
         "update" => Ok(Self::Update),
         "delete" => Ok(Self::Delete),
         "list" => Ok(Self::List),
         other => Err(ConfigError::Invalid {
            name:  "PACKAGE_FUNCTION",
            value: other.to_string(),
         }),
      }
   }
}

impl fmt::Display for PackageFunction {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let name = match self {
         Self::Create => "create",
         Self::Get => "get",
         Self::Update => "update",
         Self::Delete => "delete",
         Self::List => "list",
      };
      f.write_str(name)
   }
}

/// Package Service の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageServiceConfig {
   /// バインドアドレス
   pub host:            String,
   /// ポート番号
   pub port:            u16,
   /// データベース接続 URL
   pub database_url:    String,
   /// 接続プールの最大接続数
   pub max_connections: u32,
   /// Lambda で担当する操作
   pub function:        Option<PackageFunction>,
   /// 起動時にマイグレーションを適用するか
   pub run_migrations:  bool,
}

impl PackageServiceConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 任意の参照関数から設定を読み込む
   ///
   /// 空文字の値は未設定として扱う。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

      let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
      let host = get("PACKAGE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
      let port = parse_or("PACKAGE_PORT", get("PACKAGE_PORT"), DEFAULT_PORT)?;
      let max_connections = parse_or(
         "DATABASE_MAX_CONNECTIONS",
         get("DATABASE_MAX_CONNECTIONS"),
         DEFAULT_MAX_CONNECTIONS,
      )?;
      let function = get("PACKAGE_FUNCTION")
         .map(|value| value.parse::<PackageFunction>())
         .transpose()?;
      let run_migrations = match get("RUN_MIGRATIONS") {
         None => false,
         Some(value) => parse_bool("RUN_MIGRATIONS", &value)?,
      };

      Ok(Self {
         host,
         port,
         database_url,
         max_connections,
         function,
         run_migrations,
      })
   }

   /// Lambda で担当する操作（未設定ならエラー）
   pub fn require_function(&self) -> Result<PackageFunction, ConfigError> {
      self.function.ok_or(ConfigError::Missing("PACKAGE_FUNCTION"))
   }
}

fn parse_or<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
   match value {
      None => Ok(default),
      Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { name, value }),
   }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
   match value.trim().to_ascii_lowercase().as_str() {
      "true" | "1" | "yes" => Ok(true),
      "false" | "0" | "no" => Ok(false),
      _ => Err(ConfigError::Invalid {
         name,
         value: value.to_string(),
      }),
   }
}
