//! # ユーザー
//!
//! 操作を行ったユーザー（リクエスト上は `principal.id`）の識別子。
//! 梱包資材の `created_by` / `updated_by` に記録される。

define_uuid_id! {
   /// ユーザーの一意識別子
   pub struct UserId => "ユーザー ID";
}
