// src/games/memory.rs
//! 神経衰弱 (ペア探し)。
//!
//! 流れ:
//! 1. ライブラリの全カードをシャッフルして、`マス数 / 2` 種類を2枚ずつにしてグリッドに配る。
//! 2. 1枚目、2枚目とめくる。同じ名前ならペア成立、違えば 1 秒後に両方裏返す (その間は操作不可)。
//! 3. 全部表になったらゲームオーバー。少し待って全部裏返し、新しいラウンドを配り直す。

use log::{debug, info, warn};

use crate::config::layout::{FLIP_DURATION_MS, GRID_CELL_SIZE, MEMORY_MISMATCH_DELAY_MS, MEMORY_RESTART_DELAY_MS};
use crate::container::{CardContainer, CardsSettingOptions, Grid};
use crate::geometry::Size;
use crate::library::SubdeckOptions;
use crate::rules::{RuleContext, Rules};
use crate::table::{ContainerRole, Table};

/// ラウンドの終わりの演出。時刻はタイムスタンプ (ミリ秒) の締め切り。
#[derive(Debug, Clone, Copy, PartialEq)]
enum RoundPhase {
    Playing,
    FlipBackAt(f64),
    RedealAt(f64),
}

#[derive(Debug, Clone)]
pub struct MemoryRules {
    grid_size: Size,
    cell_size: f64,
    first: Option<usize>,
    second: Option<usize>,
    locked: bool,
    moves: u32,
    pairs_found: u32,
    rounds: u32,
    unflip_at: Option<f64>,
    phase: RoundPhase,
}

impl Default for MemoryRules {
    fn default() -> Self {
        Self::new(Size::new(4.0, 4.0), GRID_CELL_SIZE)
    }
}

impl MemoryRules {
    /// `grid_size` はマスの数 (列 x 行)。
    pub fn new(grid_size: Size, cell_size: f64) -> Self {
        Self {
            grid_size,
            cell_size,
            first: None,
            second: None,
            locked: false,
            moves: 0,
            pairs_found: 0,
            rounds: 0,
            unflip_at: None,
            phase: RoundPhase::Playing,
        }
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn pairs_found(&self) -> u32 {
        self.pairs_found
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn card_name(ctx: &RuleContext<'_, ()>, index: usize) -> Option<String> {
        ctx.table.slot(ContainerRole::Grid, index)?.card().map(|c| c.name().to_string())
    }

    fn check_match(&mut self, ctx: &mut RuleContext<'_, ()>) {
        let (Some(first), Some(second)) = (self.first, self.second) else {
            return;
        };
        let first_name = Self::card_name(ctx, first);
        let second_name = Self::card_name(ctx, second);
        debug!("Memory: comparing {:?} and {:?}", first_name, second_name);

        if first_name.is_some() && first_name == second_name {
            self.pairs_found += 1;
            self.first = None;
            self.second = None;
        } else {
            self.locked = true;
            self.unflip_at = Some(ctx.timestamp + MEMORY_MISMATCH_DELAY_MS);
        }
    }

    fn flip_selection_back(&mut self, ctx: &mut RuleContext<'_, ()>) {
        for index in [self.first.take(), self.second.take()].into_iter().flatten() {
            if let Some(card) = ctx.table.slot_mut(ContainerRole::Grid, index).and_then(|s| s.card_mut()) {
                card.flip_card();
            }
        }
        self.locked = false;
        self.unflip_at = None;
    }
}

impl Rules<()> for MemoryRules {
    fn init(&mut self, ctx: &mut RuleContext<'_, ()>) {
        let pairs = (self.grid_size.width * self.grid_size.height) as usize / 2;

        let mut deck = ctx.library.to_deck();
        deck.shuffle(ctx.rng);
        let in_game = deck.subdeck(pairs, SubdeckOptions { shuffled: true, doubled: true }, ctx.rng);
        if in_game.size() < pairs * 2 {
            warn!("Memory: library has only {} kinds of cards for {} pairs", in_game.size() / 2, pairs);
        }

        let mut grid: Grid<()> = Grid::new(self.cell_size);
        grid.set_grid_size(self.grid_size, ctx.table.canvas());
        grid.set_cards(in_game.get_cards(), CardsSettingOptions::default());
        ctx.table.register_container(ContainerRole::Grid, Box::new(grid));

        self.first = None;
        self.second = None;
        self.locked = false;
        self.unflip_at = None;
        self.pairs_found = 0;
        self.phase = RoundPhase::Playing;
        self.rounds += 1;
        info!("Memory: round {} with {} pairs", self.rounds, pairs);
    }

    fn on_slot_click(&mut self, ctx: &mut RuleContext<'_, ()>, role: ContainerRole, index: usize) {
        if role != ContainerRole::Grid || self.locked || self.phase != RoundPhase::Playing {
            return;
        }
        let Some(card) = ctx.table.slot_mut(role, index).and_then(|s| s.card_mut()) else {
            return;
        };
        if !card.safe_to_flip() {
            return;
        }

        card.reveal_card();
        self.moves += 1;
        debug!("Memory: {} revealed", card.name());

        match (self.first, self.second) {
            (None, _) => self.first = Some(index),
            (Some(first), None) if first != index => {
                self.second = Some(index);
                self.check_match(ctx);
            }
            _ => {}
        }
    }

    fn tick(&mut self, ctx: &mut RuleContext<'_, ()>) {
        if self.unflip_at.is_some_and(|deadline| ctx.timestamp >= deadline) {
            self.flip_selection_back(ctx);
        }

        match self.phase {
            RoundPhase::FlipBackAt(deadline) if ctx.timestamp >= deadline => {
                if let Some(grid) = ctx.table.container_mut(ContainerRole::Grid) {
                    for card in grid.slots_mut().iter_mut().filter_map(|s| s.card_mut()) {
                        card.flip_card();
                    }
                }
                self.phase = RoundPhase::RedealAt(ctx.timestamp + FLIP_DURATION_MS);
            }
            RoundPhase::RedealAt(deadline) if ctx.timestamp >= deadline => self.init(ctx),
            _ => {}
        }
    }

    fn is_game_over(&self, table: &Table<()>) -> bool {
        if self.locked || self.phase != RoundPhase::Playing {
            return false;
        }
        let Some(grid) = table.container(ContainerRole::Grid) else {
            return false;
        };
        let cards = grid.get_cards();
        !cards.is_empty() && cards.iter().all(|card| card.is_flipped())
    }

    fn on_game_over(&mut self, ctx: &mut RuleContext<'_, ()>) {
        info!("Memory: cleared in {} moves", self.moves);
        self.locked = true;
        self.phase = RoundPhase::FlipBackAt(ctx.timestamp + MEMORY_RESTART_DELAY_MS);
    }

    fn score(&self) -> i64 {
        self.moves as i64
    }

    fn state(&self) -> String {
        format!("Moves: {}, Pairs found: {}", self.moves, self.pairs_found)
    }
}
