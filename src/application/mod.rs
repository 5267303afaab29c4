//! アプリケーション層：ユースケースとサービス

pub mod services;
pub mod use_cases;
