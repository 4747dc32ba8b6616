// src/lib.rs
//! ブラウザ (Canvas) で動くカードゲームの土台だよ！
//!
//! - `card` / `animation`: カード1枚と、めくる・配る・揺れるといった効果
//! - `slot` / `container`: カードを置く枠と、円・扇・グリッド・スタックの並べ方
//! - `library`: カード定義の登録簿と山札
//! - `table` / `rules`: コンテナの登録簿と、ゲームのルールを動かすドライバ
//! - `app`: JS から呼ぶ入口 (`GameApp`)

// WASM と JavaScript を繋ぐための基本！
use wasm_bindgen::prelude::*;

pub mod animation;
pub mod app;
pub mod card;
pub mod config;
pub mod container;
pub mod drawable;
pub mod games;
pub mod geometry;
pub mod layouts;
pub mod library;
pub mod logger;
pub mod notation;
pub mod render;
pub mod rules;
pub mod slot;
pub mod table;

pub use animation::{Effect, EffectKind};
pub use app::GameApp;
pub use card::{Card, CardId};
pub use config::TableConfig;
pub use container::{CardContainer, CardRef, CardsSettingOptions, Circle, DealStyle, Fan, Grid, Stack, StackOptions, StackOrientation};
pub use drawable::{Action, Badge, Button, Drawable, Label};
pub use geometry::{Position, Size};
pub use layouts::{Anchor, TrickTakingOptions};
pub use library::{CardDefinition, CardLibrary, CardProducer, Deck, SubdeckOptions};
pub use render::{CardImage, DrawSurface};
pub use rules::{Game, GameStatus, RuleContext, Rules};
pub use slot::{CardSlot, InitFn, Payload};
pub use table::{ContainerRole, Table};

// main 関数の代わりに、Wasm がロードされた時に最初に実行される関数だよ。
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
    log::info!("card-table: panic hook and logger ready");
}
