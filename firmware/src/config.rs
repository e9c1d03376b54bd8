//! Configuration module
//!
//! ボード固有の設定を提供します。
//! 駆動パラメータ（Hallテーブル、アライメント、ランプ）は `hall_bldc::config` にあります。

pub mod params;

// params.rsから主要な定数を再エクスポート
pub use params::*;

pub use hall_bldc::config::DriveConfig;
