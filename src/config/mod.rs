// src/config/mod.rs
//! 定数 (layout) と、JS 側から JSON で渡せる実行時設定 (TableConfig)。

pub mod layout;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// ゲーム起動時の設定だよ。JS から JSON 文字列で渡してもらう想定！
/// 足りないフィールドはデフォルト値で埋まる (`#[serde(default)]`)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub canvas: Size,
    pub card_size: Size,
    /// 神経衰弱のグリッドサイズ (列 x 行)。
    pub grid: Size,
    /// シャッフル用の乱数シード。None なら getrandom で決める。
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            canvas: Size::new(layout::DEFAULT_CANVAS_WIDTH, layout::DEFAULT_CANVAS_HEIGHT),
            card_size: Size::new(layout::DEFAULT_CARD_WIDTH, layout::DEFAULT_CARD_HEIGHT),
            grid: Size::new(4.0, 4.0),
            seed: None,
        }
    }
}

impl TableConfig {
    /// JSON 文字列から設定を読み込む。空文字列ならデフォルト設定。
    pub fn from_json(json: &str) -> Result<Self, String> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(|e| format!("Failed to parse TableConfig: {}", e))
    }
}
