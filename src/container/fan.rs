// src/container/fan.rs
//! 手札みたいに扇形に広げるコンテナ。
//!
//! スロットの `coord` はカードの「中心 (回転の軸)」。描く時は軸まで移動 → 回転 → 半分ずらして描く。

use std::f64::consts::PI;
use std::rc::Rc;

use log::debug;

use super::{deal_in, draw_order, CardContainer, CardRef, CardsSettingOptions, DealStyle};
use crate::card::Card;
use crate::config::layout::{FAN_DEFAULT_MAX_CARDS, FAN_DEFAULT_RADIUS};
use crate::geometry::{Position, Size};
use crate::render::DrawSurface;
use crate::slot::{CardSlot, InitFn, Payload};

/// 曲線上の1点。`angle` はその点での接線の傾き (ラジアン)。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

/// `(t ∈ [0, 1], radius, center) -> CurvePoint`
pub type CurveFn = fn(f64, f64, Position) -> CurvePoint;

/// デフォルトの曲線: 中心の上側 ±45° の円弧。
pub fn default_arc(t: f64, radius: f64, center: Position) -> CurvePoint {
    let theta = -PI / 4.0 + t * PI / 2.0;
    CurvePoint {
        x: center.x + radius * theta.sin(),
        y: center.y - radius * theta.cos() + radius / 2.0,
        angle: theta,
    }
}

pub struct Fan<T> {
    center: Position,
    radius: f64,
    max_cards: usize,
    curve: CurveFn,
    slots: Vec<CardSlot<T>>,
    hovered: Option<usize>,
    draw_order: Vec<usize>,
    init_fn: Option<InitFn<T>>,
}

impl<T> Fan<T> {
    /// `center` は Circle と同じく Canvas の中心からのオフセット。
    pub fn new(center: Position, canvas_size: Size) -> Self {
        Self {
            center: canvas_size.center().offset(center),
            radius: FAN_DEFAULT_RADIUS,
            max_cards: FAN_DEFAULT_MAX_CARDS,
            curve: default_arc,
            slots: Vec::new(),
            hovered: None,
            draw_order: Vec::new(),
            init_fn: None,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_max_cards(mut self, max_cards: usize) -> Self {
        self.max_cards = max_cards;
        self
    }

    pub fn with_curve(mut self, curve: CurveFn) -> Self {
        self.curve = curve;
        self
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered
    }

    fn new_slot(&self) -> CardSlot<T> {
        let mut slot = CardSlot::new(Position::ZERO, 0.0, 0.0);
        if let Some(init_fn) = &self.init_fn {
            slot.set_init_function(Rc::clone(init_fn));
        }
        slot
    }

    /// `max_cards` 枚分の仮想的な扇の上で、実際の枚数ぶんを真ん中寄せで並べる。
    /// 枚数が `max_cards` を超えたら扇全体を使って詰める。
    fn position_slots(&mut self) {
        let n = self.slots.len();
        let effective = self.max_cards.max(n);
        let step = if effective > 1 { 1.0 / (effective - 1) as f64 } else { 0.0 };
        let start = (effective - n) as f64 / 2.0 * step;

        for (i, slot) in self.slots.iter_mut().enumerate() {
            let t = if effective > 1 { start + i as f64 * step } else { 0.5 };
            let point = (self.curve)(t, self.radius, self.center);
            slot.coord = Position::new(point.x, point.y);
            slot.angle = point.angle;
            slot.z_index = i as f64;
        }
        self.hovered = None;
        self.draw_order = draw_order(&self.slots);
    }

    fn deal_cards(&mut self, style: DealStyle) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let pivot = slot.coord;
            if let Some(card) = slot.card_mut() {
                let half = card.size().center();
                deal_in(card, Position::new(pivot.x - half.x, pivot.y - half.y), i, style);
            }
        }
    }
}

impl<T> CardContainer<T> for Fan<T> {
    fn next_frame(&mut self, timestamp: f64, surface: &mut dyn DrawSurface) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.tick(timestamp, self.hovered == Some(i));
        }
        for &i in &self.draw_order {
            let slot = &self.slots[i];
            let half = slot.card().map(|c| c.size().center()).unwrap_or(Position::ZERO);
            surface.save();
            surface.translate(slot.coord.x, slot.coord.y);
            surface.rotate(slot.angle);
            slot.draw_card(surface, Position::new(-half.x, -half.y));
            surface.restore();
            // Drawable は回転させずに、カードの (回転前の) 左上の Canvas 座標から
            slot.draw_drawables(surface, Position::new(slot.coord.x - half.x, slot.coord.y - half.y));
        }
    }

    fn on_mouse_move(&mut self, position: Position) {
        self.hovered = self.hit_test(position);
    }

    /// 扇のカードは重なっているので、上に見えているもの (後ろのスロット) から調べる。
    fn hit_test(&self, position: Position) -> Option<usize> {
        self.slots.iter().enumerate().rev().find_map(|(i, slot)| {
            let size = slot.card()?.size();
            let dx = position.x - slot.coord.x;
            let dy = position.y - slot.coord.y;
            // スロットの回転を打ち消して、カードのローカル座標へ
            let (sin, cos) = (-slot.angle).sin_cos();
            let local_x = dx * cos - dy * sin;
            let local_y = dx * sin + dy * cos;
            let inside = local_x.abs() <= size.width / 2.0 && local_y.abs() <= size.height / 2.0;
            inside.then_some(i)
        })
    }

    fn slots(&self) -> &[CardSlot<T>] {
        &self.slots
    }

    fn slots_mut(&mut self) -> &mut [CardSlot<T>] {
        &mut self.slots
    }

    fn set_cards(&mut self, cards: Vec<Card>, options: CardsSettingOptions) {
        self.slots.clear();
        for mut card in cards {
            if options.flipped {
                card.set_flipped(true);
            }
            let mut slot = self.new_slot();
            slot.put_card(card, Payload::UseInitializer);
            self.slots.push(slot);
        }
        debug!("Fan: {} cards set", self.slots.len());
        self.position_slots();
        self.deal_cards(options.deal);
    }

    fn add_card(&mut self, card: Card) {
        let mut slot = self.new_slot();
        slot.put_card(card, Payload::UseInitializer);
        self.slots.push(slot);
        self.position_slots();
        let index = self.slots.len() - 1;
        if let Some(card) = self.slots[index].card_mut() {
            deal_in(card, Position::ZERO, index, DealStyle::Settle);
        }
    }

    fn remove_card(&mut self, target: CardRef<'_>) -> Option<Card> {
        let index = self.slots.iter().position(|slot| slot.card().is_some_and(|c| target.matches(c)))?;
        let mut slot = self.slots.remove(index);
        self.position_slots();
        slot.remove_card()
    }

    fn clear(&mut self, remove_slots: bool) {
        if remove_slots {
            self.slots.clear();
            self.draw_order.clear();
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
