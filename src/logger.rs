// src/logger.rs
//! `log` クレートのマクロ (info! や warn!) の出力先。
//!
//! ブラウザでは devtools のコンソールに、ネイティブ (cargo test) では標準エラーに出すよ。

use log::{LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

/// 1行分の文字列にする。 例: `[WARN card_table::table] something`
pub(crate) fn format_record(record: &Record<'_>) -> String {
    format!("[{} {}] {}", record.level(), record.target(), record.args())
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record);

        #[cfg(target_arch = "wasm32")]
        {
            let value = wasm_bindgen::JsValue::from_str(&line);
            match record.level() {
                log::Level::Error => web_sys::console::error_1(&value),
                log::Level::Warn => web_sys::console::warn_1(&value),
                _ => web_sys::console::log_1(&value),
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{}", line);
    }

    fn flush(&self) {}
}

/// ロガーを登録する。2回目以降は何もせず false を返す。
pub fn init(level: LevelFilter) -> bool {
    match log::set_logger(&LOGGER) {
        Ok(()) => {
            log::set_max_level(level);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record() {
        let line = format_record(
            &Record::builder()
                .args(format_args!("round {} with {} pairs", 1, 8))
                .level(log::Level::Info)
                .target("card_table::games::memory")
                .build(),
        );
        assert_eq!(line, "[INFO card_table::games::memory] round 1 with 8 pairs");
    }

    #[test]
    fn test_init_only_once() {
        // 他のテストが先に登録しているかもしれないので、2回目が false になることだけ確かめる
        init(LevelFilter::Warn);
        assert!(!init(LevelFilter::Debug), "2回目の登録は無視される");
    }
}
