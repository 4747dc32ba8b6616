// src/rules.rs
//! ゲームのルール (クライアントコード) と、それを動かすドライバ `Game`。
//!
//! ルール側はテーブルとライブラリと乱数を `RuleContext` 経由で受け取る。
//! タイマー (「1秒後に裏返す」みたいなの) は `tick` で締め切り時刻をポーリングして実現するよ。

use std::rc::Rc;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::drawable::Action;
use crate::geometry::Position;
use crate::library::CardLibrary;
use crate::render::DrawSurface;
use crate::table::{ContainerRole, Table};

/// ルールのフックに渡される、ゲームの共有部分。
pub struct RuleContext<'a, T> {
    pub table: &'a mut Table<T>,
    pub library: &'a Rc<CardLibrary>,
    pub rng: &'a mut StdRng,
    /// 最後に処理したフレームのタイムスタンプ (ミリ秒)。
    pub timestamp: f64,
}

pub trait Rules<T> {
    /// コンテナを作ってテーブルに登録し、カードを配る。新しいラウンドでも呼ばれる。
    fn init(&mut self, ctx: &mut RuleContext<'_, T>);

    /// カードのあるスロットがクリックされた。
    fn on_slot_click(&mut self, ctx: &mut RuleContext<'_, T>, role: ContainerRole, index: usize);

    /// Drawable (ボタンなど) からのアクション。
    fn on_action(&mut self, _ctx: &mut RuleContext<'_, T>, _action: &Action) {}

    /// 毎フレーム、描画の前に呼ばれる。
    fn tick(&mut self, _ctx: &mut RuleContext<'_, T>) {}

    fn is_game_over(&self, table: &Table<T>) -> bool;

    fn on_game_over(&mut self, _ctx: &mut RuleContext<'_, T>) {}

    fn score(&self) -> i64;

    /// 画面に出す短い状態表示。
    fn state(&self) -> String;
}

/// JS 側に渡すゲームの状態。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStatus {
    pub score: i64,
    pub state: String,
    pub game_over: bool,
}

pub struct Game<T, R> {
    table: Table<T>,
    library: Rc<CardLibrary>,
    rules: R,
    rng: StdRng,
    timestamp: f64,
    game_over_notified: bool,
}

impl<T: 'static, R: Rules<T>> Game<T, R> {
    /// `seed` が None なら OS (ブラウザでは crypto.getRandomValues) の乱数で初期化。
    pub fn new(table: Table<T>, library: Rc<CardLibrary>, rules: R, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { table, library, rules, rng, timestamp: 0.0, game_over_notified: false }
    }

    fn split(&mut self) -> (&mut R, RuleContext<'_, T>) {
        let ctx = RuleContext {
            table: &mut self.table,
            library: &self.library,
            rng: &mut self.rng,
            timestamp: self.timestamp,
        };
        (&mut self.rules, ctx)
    }

    pub fn start(&mut self) {
        info!("Game: start");
        let (rules, mut ctx) = self.split();
        rules.init(&mut ctx);
    }

    pub fn next_frame(&mut self, timestamp: f64, surface: &mut dyn DrawSurface) {
        self.timestamp = timestamp;
        {
            let (rules, mut ctx) = self.split();
            rules.tick(&mut ctx);
        }
        self.table.next_frame(timestamp, surface);

        let over = self.rules.is_game_over(&self.table);
        if over && !self.game_over_notified {
            self.game_over_notified = true;
            info!("Game over: {}", self.rules.state());
            let (rules, mut ctx) = self.split();
            rules.on_game_over(&mut ctx);
        } else if !over {
            self.game_over_notified = false;
        }
    }

    pub fn on_mouse_move(&mut self, position: Position) {
        self.table.on_mouse_move(position);
    }

    pub fn on_mouse_down(&mut self, position: Position) {
        let (hit, actions) = self.table.on_mouse_left_click(position);
        let (rules, mut ctx) = self.split();
        for action in &actions {
            rules.on_action(&mut ctx, action);
        }
        if let Some((role, index)) = hit {
            rules.on_slot_click(&mut ctx, role, index);
        }
    }

    pub fn on_mouse_up(&mut self, position: Position) {
        let actions = self.table.on_mouse_left_click_release(position);
        let (rules, mut ctx) = self.split();
        for action in &actions {
            debug!("Game: action {}", action.name);
            rules.on_action(&mut ctx, action);
        }
    }

    pub fn status(&self) -> GameStatus {
        GameStatus {
            score: self.rules.score(),
            state: self.rules.state(),
            game_over: self.rules.is_game_over(&self.table),
        }
    }

    pub fn table(&self) -> &Table<T> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table<T> {
        &mut self.table
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn library(&self) -> &Rc<CardLibrary> {
        &self.library
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }
}
