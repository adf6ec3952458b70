//! # Observability 基盤
//!
//! HTTP サーバーと Lambda 関数で共通のトレーシング初期化。
//!
//! | 変数名 | 説明 |
//! |--------|------|
//! | `RUST_LOG` | ログレベル（デフォルト: `info,catalog=debug`） |
//! | `LOG_FORMAT` | `json` / `pretty`（大文字小文字は区別しない） |
//! | `AWS_LAMBDA_FUNCTION_NAME` | Lambda 上で設定される。`LOG_FORMAT` 未設定時は JSON・色なしになる |

use std::{env, fmt, str::FromStr};

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "info,catalog=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
   /// JSON 形式（CloudWatch Logs 向け）
   Json,
   /// 人間が読みやすい形式
   #[default]
   Pretty,
}

/// 未知のログ形式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLogFormat(pub String);

impl fmt::Display for UnknownLogFormat {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "未知のログ形式です: {:?}", self.0)
   }
}

impl std::error::Error for UnknownLogFormat {}

impl FromStr for LogFormat {
   type Err = UnknownLogFormat;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      match s.trim().to_ascii_lowercase().as_str() {
         "json" => Ok(Self::Json),
         "pretty" => Ok(Self::Pretty),
         _ => Err(UnknownLogFormat(s.to_string())),
      }
   }
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
   /// サービス名（起動ログに出力）
   pub service_name: String,
   pub log_format:   LogFormat,
   /// ANSI カラーを使うか
   pub ansi:         bool,
}

impl TracingConfig {
   pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
      Self {
         service_name: service_name.into(),
         log_format,
         ansi: log_format == LogFormat::Pretty,
      }
   }

   /// 環境変数から設定を読み取る
   pub fn from_env(service_name: impl Into<String>) -> Self {
      Self::from_lookup(service_name, |name| env::var(name).ok())
   }

   /// 任意の参照関数から設定を読み取る
   ///
   /// `LOG_FORMAT` が不正なら stderr に警告してデフォルトを使う。
   /// トレーシング初期化前なので `tracing` では出力できない。
   pub fn from_lookup(
      service_name: impl Into<String>,
      lookup: impl Fn(&str) -> Option<String>,
   ) -> Self {
      let on_lambda = lookup("AWS_LAMBDA_FUNCTION_NAME").is_some_and(|v| !v.is_empty());
      let fallback = if on_lambda {
         LogFormat::Json
      } else {
         LogFormat::Pretty
      };

      let log_format = match lookup("LOG_FORMAT") {
         None => fallback,
         Some(raw) => raw.parse().unwrap_or_else(|e: UnknownLogFormat| {
            eprintln!("WARNING: {e}, {fallback:?} を使います");
            fallback
         }),
      };

      let mut config = Self::new(service_name, log_format);
      config.ansi = config.ansi && !on_lambda;
      config
   }
}

/// トレーシングを初期化する
///
/// `ErrorLayer` を登録するため、`InfraError` が捕捉する `SpanTrace` に
/// リポジトリのスパンが記録される。プロセスで一度だけ呼ぶ。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
   use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

   let env_filter =
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

   let fmt_layer = match config.log_format {
      LogFormat::Json => tracing_subscriber::fmt::layer()
         .json()
         .flatten_event(true)
         .with_current_span(true)
         .with_span_list(false)
         .with_ansi(false)
         .boxed(),
      LogFormat::Pretty => tracing_subscriber::fmt::layer()
         .with_ansi(config.ansi)
         .boxed(),
   };

   tracing_subscriber::registry()
      .with(env_filter)
      .with(fmt_layer)
      .with(tracing_error::ErrorLayer::default())
      .init();

   tracing::info!(
      service = %config.service_name,
      format = ?config.log_format,
      "トレーシングを初期化しました"
   );
}

#[cfg(test)]
mod tests {
   use std::collections::HashMap;

   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   fn load(vars: &[(&str, &str)]) -> TracingConfig {
      let vars: HashMap<_, _> = vars
         .iter()
         .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
         .collect();
      TracingConfig::from_lookup("package-service", |name| vars.get(name).cloned())
   }

   #[rstest]
   #[case("json", LogFormat::Json)]
   #[case("JSON", LogFormat::Json)]
   #[case(" pretty ", LogFormat::Pretty)]
   fn test_ログ形式をパースできる(#[case] input: &str, #[case] expected: LogFormat) {
      assert_eq!(input.parse::<LogFormat>(), Ok(expected));
   }

   #[test]
   fn test_未知のログ形式はエラー() {
      assert_eq!(
         "xml".parse::<LogFormat>(),
         Err(UnknownLogFormat("xml".to_string()))
      );
   }

   #[test]
   fn test_ローカルでは既定でprettyかつ色付き() {
      assert_eq!(
         load(&[]),
         TracingConfig {
            service_name: "package-service".to_string(),
            log_format:   LogFormat::Pretty,
            ansi:         true,
         }
      );
   }

   #[test]
   fn test_lambda上では既定でjsonかつ色なし() {
      let config = load(&[("AWS_LAMBDA_FUNCTION_NAME", "create-package")]);

      assert_eq!(config.log_format, LogFormat::Json);
      assert!(!config.ansi);
   }

   #[test]
   fn test_lambda上でもprettyを指定できるが色は付けない() {
      let config = load(&[
         ("AWS_LAMBDA_FUNCTION_NAME", "create-package"),
         ("LOG_FORMAT", "pretty"),
      ]);

      assert_eq!(config.log_format, LogFormat::Pretty);
      assert!(!config.ansi);
   }

   #[test]
   fn test_不正なlog_formatは既定値になる() {
      assert_eq!(load(&[("LOG_FORMAT", "xml")]).log_format, LogFormat::Pretty);
   }
}
