//! # 時刻
//!
//! 作成日時・更新日時はすべて [`Clock`] から取得する（UTC）。
//! 本番は [`SystemClock`]、テストは任意に進められる [`FixedClock`] を注入する。

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 明示的に進めない限り同じ時刻を返す
#[derive(Debug)]
pub struct FixedClock {
   now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self {
         now: Mutex::new(now),
      }
   }

   /// 時刻を `by` だけ進める
   pub fn advance(&self, by: Duration) {
      let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
      *now += by;
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      *self.now.lock().unwrap_or_else(PoisonError::into_inner)
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_system_clockは呼び出し時点のutcを返す() {
      let before = Utc::now();
      let now = SystemClock.now();

      assert!(before <= now && now <= Utc::now());
   }

   #[test]
   fn test_fixed_clockは進めた分だけ時刻が変わる() {
      let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
      let clock = FixedClock::new(start);

      assert_eq!(clock.now(), start);
      assert_eq!(clock.now(), start);

      clock.advance(Duration::minutes(5));

      assert_eq!(clock.now(), start + Duration::minutes(5));
   }
}
