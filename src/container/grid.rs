// src/container/grid.rs
//! 固定サイズのマス目に並べるコンテナ (神経衰弱の盤面とか)。
//!
//! スロットの `coord` は `(列, 行)` のマス番号。ピクセル位置は `coord * cell_size + offset`。

use std::rc::Rc;

use log::{debug, warn};

use super::{CardContainer, CardRef, CardsSettingOptions};
use crate::card::Card;
use crate::config::layout::{GRID_CELL_SIZE, GRID_DEAL_STAGGER_MS};
use crate::geometry::{Position, Size};
use crate::render::DrawSurface;
use crate::slot::{CardSlot, InitFn, Payload};

pub struct Grid<T> {
    cell_size: f64,
    columns: usize,
    rows: usize,
    /// z_index (中心からのマンハッタン距離) の小さい順に並んだスロット。
    slots: Vec<CardSlot<T>>,
    /// `列 * rows + 行` → `slots` の添字
    cells: Vec<usize>,
    offset: Position,
    hovered: Option<usize>,
    init_fn: Option<InitFn<T>>,
}

impl<T> Grid<T> {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            columns: 0,
            rows: 0,
            slots: Vec::new(),
            cells: Vec::new(),
            offset: Position::ZERO,
            hovered: None,
            init_fn: None,
        }
    }

    /// `size` はマスの数 (width = 列数, height = 行数)。盤面は Canvas の真ん中に置かれる。
    pub fn set_grid_size(&mut self, size: Size, canvas_size: Size) {
        self.columns = size.width.max(0.0) as usize;
        self.rows = size.height.max(0.0) as usize;

        let cx = (self.columns as f64 - 1.0) / 2.0;
        let cy = (self.rows as f64 - 1.0) / 2.0;

        let mut slots = Vec::with_capacity(self.columns * self.rows);
        for i in 0..self.columns {
            for j in 0..self.rows {
                let z_index = (i as f64 - cx).abs() + (j as f64 - cy).abs();
                let mut slot = CardSlot::new(Position::new(i as f64, j as f64), z_index, 0.0);
                if let Some(init_fn) = &self.init_fn {
                    slot.set_init_function(Rc::clone(init_fn));
                }
                slots.push(slot);
            }
        }
        // 安定ソートなので同じ距離のマスは列→行の順のまま
        slots.sort_by(|a, b| a.z_index.total_cmp(&b.z_index));

        self.cells = vec![0; slots.len()];
        for (index, slot) in slots.iter().enumerate() {
            let cell = slot.coord.x as usize * self.rows + slot.coord.y as usize;
            self.cells[cell] = index;
        }
        self.slots = slots;

        let pixel = self.pixel_size();
        self.offset = Position::new((canvas_size.width - pixel.width) / 2.0, (canvas_size.height - pixel.height) / 2.0);
        self.hovered = None;
        debug!("Grid: {}x{} cells, offset {:?}", self.columns, self.rows, self.offset);
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn offset(&self) -> Position {
        self.offset
    }

    pub fn pixel_size(&self) -> Size {
        Size::new(self.columns as f64 * self.cell_size, self.rows as f64 * self.cell_size)
    }

    pub fn slot_at(&self, column: usize, row: usize) -> Option<&CardSlot<T>> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.slots.get(self.cells[column * self.rows + row])
    }

    /// ポインタ位置 → マス番号。盤面の外なら None (右端・下端ちょうどは外)。
    pub fn position_to_cell(&self, position: Position) -> Option<(usize, usize)> {
        let rel_x = position.x - self.offset.x;
        let rel_y = position.y - self.offset.y;
        let pixel = self.pixel_size();
        if rel_x < 0.0 || rel_y < 0.0 || rel_x >= pixel.width || rel_y >= pixel.height {
            return None;
        }
        Some(((rel_x / self.cell_size).floor() as usize, (rel_y / self.cell_size).floor() as usize))
    }

    /// 盤面の中心から配る。外側のマスから先に着地して、真ん中が最後になる。
    fn deal_slot(&mut self, index: usize) {
        let cell = self.cell_size;
        let (columns, rows) = (self.columns as f64, self.rows as f64);
        let max_dist = ((columns - 1.0) / 2.0).abs() + ((rows - 1.0) / 2.0).abs();

        let slot = &mut self.slots[index];
        let (coord, z_index) = (slot.coord, slot.z_index);
        if let Some(card) = slot.card_mut() {
            let dx = -coord.x * cell + columns * cell / 2.0 - cell / 2.0;
            let dy = -coord.y * cell + rows * cell / 2.0 - cell / 2.0;
            card.deal(Position::new(dx, dy), (max_dist - z_index) * GRID_DEAL_STAGGER_MS);
        }
    }
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self::new(GRID_CELL_SIZE)
    }
}

impl<T> CardContainer<T> for Grid<T> {
    fn next_frame(&mut self, timestamp: f64, surface: &mut dyn DrawSurface) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.tick(timestamp, self.hovered == Some(i));
        }

        // slots は z 順に並んでいるのでそのまま描けばいい
        surface.save();
        surface.translate(self.offset.x + 0.5, self.offset.y + 0.5);
        for slot in &self.slots {
            slot.draw_card(surface, Position::new(slot.coord.x * self.cell_size, slot.coord.y * self.cell_size));
        }
        surface.restore();

        // Drawable はポインタと同じ Canvas 座標で描く
        for slot in &self.slots {
            let origin = self.offset.offset(Position::new(slot.coord.x * self.cell_size, slot.coord.y * self.cell_size));
            slot.draw_drawables(surface, origin);
        }
    }

    fn on_mouse_move(&mut self, position: Position) {
        self.hovered = self.hit_test(position);
    }

    fn hit_test(&self, position: Position) -> Option<usize> {
        let (column, row) = self.position_to_cell(position)?;
        let index = self.cells[column * self.rows + row];
        self.slots[index].has_card().then_some(index)
    }

    fn slots(&self) -> &[CardSlot<T>] {
        &self.slots
    }

    fn slots_mut(&mut self) -> &mut [CardSlot<T>] {
        &mut self.slots
    }

    /// マスの数より多いカードは置かれずに捨てられる。
    fn set_cards(&mut self, cards: Vec<Card>, options: CardsSettingOptions) {
        if cards.len() > self.slots.len() {
            warn!("Grid: {} cards for {} cells, extra cards dropped", cards.len(), self.slots.len());
        }
        let count = cards.len().min(self.slots.len());
        for (i, mut card) in cards.into_iter().take(count).enumerate() {
            if options.flipped {
                card.set_flipped(true);
            }
            self.slots[i].put_card(card, Payload::UseInitializer);
            self.deal_slot(i);
        }
        debug!("Grid: {} cards set", count);
    }

    /// 最初の空きマス (z 順) に置く。空きがなければ何もしない。
    fn add_card(&mut self, card: Card) {
        let Some(index) = self.slots.iter().position(|slot| !slot.has_card()) else {
            warn!("Grid: no empty cell for {}", card.name());
            return;
        };
        self.slots[index].put_card(card, Payload::UseInitializer);
        self.deal_slot(index);
    }

    /// マスは残る (盤面の形は変わらない)。
    fn remove_card(&mut self, target: CardRef<'_>) -> Option<Card> {
        self.slots
            .iter_mut()
            .find(|slot| slot.card().is_some_and(|c| target.matches(c)))
            .and_then(|slot| slot.remove_card())
    }

    fn clear(&mut self, remove_slots: bool) {
        if remove_slots {
            self.slots.clear();
            self.cells.clear();
            self.columns = 0;
            self.rows = 0;
        } else {
            for slot in self.slots.iter_mut() {
                slot.remove_card();
            }
        }
        self.hovered = None;
    }

    fn set_data_function(&mut self, init_fn: InitFn<T>) {
        for slot in self.slots.iter_mut() {
            slot.set_init_function(Rc::clone(&init_fn));
        }
        self.init_fn = Some(init_fn);
    }
}
