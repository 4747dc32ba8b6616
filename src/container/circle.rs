// src/container/circle.rs
//! 円形に並べるコンテナ。中心から放射状にカードが配られる演出付き！

use std::f64::consts::PI;
use std::rc::Rc;

use log::debug;

use super::{draw_order, CardContainer, CardRef, CardsSettingOptions};
use crate::animation::normalize_angle;
use crate::card::Card;
use crate::config::layout::CIRCLE_DEAL_STAGGER_MS;
use crate::geometry::{point_in_rect, Position, Size};
use crate::render::DrawSurface;
use crate::slot::{CardSlot, InitFn, Payload};

/// `n` 枚のカードを半径 `radius` の円周上に等間隔で並べる。
///
/// i 番目のスロットの角度は `2π·i/n + angle_offset` (デフォルトは真上 `-π/2` から時計回り)。
/// 後ろの番号ほど奥に描かれる (`z_index = n - i`)。
pub struct Circle<T> {
    center: Position,
    radius: f64,
    angle_offset: f64,
    slots: Vec<CardSlot<T>>,
    hovered: Option<usize>,
    draw_order: Vec<usize>,
    init_fn: Option<InitFn<T>>,
}

impl<T> Circle<T> {
    /// `center` は Canvas の中心からのオフセット。
    pub fn new(center: Position, canvas_size: Size, radius: f64) -> Self {
        Self {
            center: canvas_size.center().offset(center),
            radius,
            angle_offset: -PI / 2.0,
            slots: Vec::new(),
            hovered: None,
            draw_order: Vec::new(),
            init_fn: None,
        }
    }

    pub fn with_angle_offset(mut self, angle_offset: f64) -> Self {
        self.angle_offset = angle_offset;
        self
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
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

    /// 各スロットの位置を計算し直して、まだ配られていないカードを中心から配る。
    fn position_cards(&mut self) {
        let n = self.slots.len();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let Some(size) = slot.card().map(|c| c.size()) else {
                continue;
            };
            let angle = 2.0 * PI * i as f64 / n as f64 + self.angle_offset;

            slot.coord.x = self.center.x + self.radius * angle.cos() - size.width / 2.0;
            slot.coord.y = self.center.y + self.radius * angle.sin() - size.height / 2.0;
            slot.z_index = (n - i) as f64;

            let delta = Position::new(
                self.center.x - slot.coord.x - size.width / 2.0,
                self.center.y - slot.coord.y - size.height / 2.0,
            );
            if let Some(card) = slot.card_mut().filter(|c| !c.is_dealt()) {
                card.deal(delta, i as f64 * CIRCLE_DEAL_STAGGER_MS);
            }
        }
        self.hovered = None;
        self.draw_order = draw_order(&self.slots);
    }
}

impl<T> CardContainer<T> for Circle<T> {
    fn next_frame(&mut self, timestamp: f64, surface: &mut dyn DrawSurface) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.tick(timestamp, self.hovered == Some(i));
        }
        for &i in &self.draw_order {
            let slot = &self.slots[i];
            slot.draw(surface, slot.coord);
        }
    }

    fn on_mouse_move(&mut self, position: Position) {
        self.hovered = self.hit_test(position);
    }

    /// 極座標の角度から候補のスロットを直接求めて (等間隔なので O(1))、
    /// そのカードの矩形に本当に入っているかで確定する。
    fn hit_test(&self, position: Position) -> Option<usize> {
        let n = self.slots.len();
        if n == 0 {
            return None;
        }

        let dx = position.x - self.center.x;
        let dy = position.y - self.center.y;
        let angle = normalize_angle(dy.atan2(dx) - self.angle_offset);
        let step = 2.0 * PI / n as f64;
        let index = (angle / step).round() as usize % n;

        let slot = &self.slots[index];
        let card = slot.card()?;
        point_in_rect(position, slot.coord, card.size()).then_some(index)
    }

    fn slots(&self) -> &[CardSlot<T>] {
        &self.slots
    }

    fn slots_mut(&mut self) -> &mut [CardSlot<T>] {
        &mut self.slots
    }

    fn set_cards(&mut self, cards: Vec<Card>, options: CardsSettingOptions) {
        let count = cards.len();
        for (i, mut card) in cards.into_iter().enumerate() {
            if options.flipped {
                card.set_flipped(true);
            }
            if i >= self.slots.len() {
                let slot = self.new_slot();
                self.slots.push(slot);
            }
            self.slots[i].put_card(card, Payload::UseInitializer);
        }
        self.slots.truncate(count);
        debug!("Circle: {} cards set", count);
        self.position_cards();
    }

    fn add_card(&mut self, card: Card) {
        let mut slot = self.new_slot();
        slot.put_card(card, Payload::UseInitializer);
        self.slots.push(slot);
        self.position_cards();
    }

    fn remove_card(&mut self, target: CardRef<'_>) -> Option<Card> {
        let index = self.slots.iter().position(|slot| slot.card().is_some_and(|c| target.matches(c)))?;
        let mut slot = self.slots.remove(index);
        self.position_cards();
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
