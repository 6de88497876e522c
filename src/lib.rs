// Library target shared by the binary, the integration tests and the
// criterion benches.

rust_i18n::i18n!("locales", fallback = "sv");

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod i18n;
pub mod lesson;
pub mod session;
pub mod speech;
pub mod store;
pub mod support;
pub mod ui;
