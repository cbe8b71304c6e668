//! 계산/매칭 로직을 라이브러리로 분리하여 CLI 외의 전송 계층(HTTP 등)에서도 그대로 쓸 수 있게 한다.

pub mod admin;
pub mod app;
pub mod catalog;
pub mod config;
pub mod hydraulics;
pub mod i18n;
pub mod input;
pub mod logging;
pub mod matcher;
pub mod scenario;
pub mod ui_cli;
pub mod units;
