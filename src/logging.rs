use std::io::Write;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// 로거를 초기화한다.
///
/// 레벨 우선순위: 인자 > `RUST_LOG` > info.
/// 계산 결과(JSON)를 stdout에 쓰므로 로그는 stderr로 보낸다.
pub fn init(level: Option<&str>) {
    let log_level = level
        .and_then(|l| l.trim().parse::<LevelFilter>().ok())
        .or_else(|| {
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|v| v.parse::<LevelFilter>().ok())
        })
        .unwrap_or(LevelFilter::Info);

    let result = Builder::new()
        .filter_level(log_level)
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();

    // 테스트 등에서 두 번 호출되면 기존 로거를 유지한다
    if result.is_ok() {
        log::debug!("로거 초기화 (level: {log_level})");
    }
}
