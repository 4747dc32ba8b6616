// src/container/stack.rs
//! 一列に並べるコンテナ。手札、場に出たカード (トリック) なんかに使う。

use std::rc::Rc;

use log::debug;

use super::{deal_in, CardContainer, CardRef, CardsSettingOptions, DealStyle};
use crate::card::Card;
use crate::geometry::{Position, Size};
use crate::layouts::{adjust_to_anchor, Anchor};
use crate::render::DrawSurface;
use crate::slot::{CardSlot, InitFn, Payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOrientation {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StackOptions {
    pub orientation: StackOrientation,
    /// 並びの基準点。`anchor` が None なら最初のカードの左上。
    pub position: Position,
    /// 基準点が並び全体のどこに当たるか。
    pub anchor: Option<Anchor>,
    /// 想定する最大枚数。あれば間隔は `(width - カードの長さ) / (ideal - 1)` で固定になる。
    pub ideal_hand_length: Option<usize>,
}

pub struct Stack<T> {
    width: f64,
    card_size: Size,
    options: StackOptions,
    slots: Vec<CardSlot<T>>,
    hovered: Option<usize>,
    init_fn: Option<InitFn<T>>,
}

impl<T> Stack<T> {
    pub fn new(width: f64, card_size: Size, options: StackOptions) -> Self {
        Self { width, card_size, options, slots: Vec::new(), hovered: None, init_fn: None }
    }

    pub fn options(&self) -> &StackOptions {
        &self.options
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered
    }

    /// (並ぶ方向の長さ, 厚み方向の長さ)
    fn card_extent(&self) -> (f64, f64) {
        match self.options.orientation {
            StackOrientation::Horizontal => (self.card_size.width, self.card_size.height),
            StackOrientation::Vertical => (self.card_size.height, self.card_size.width),
        }
    }

    /// カード同士の間隔。
    pub fn step(&self) -> f64 {
        let (along, _) = self.card_extent();
        match self.options.ideal_hand_length {
            Some(ideal) if ideal > 1 => (self.width - along) / (ideal - 1) as f64,
            _ if self.slots.is_empty() => 0.0,
            _ => self.width / self.slots.len() as f64,
        }
    }

    /// 今の枚数で並べた時の、全体の大きさ。
    pub fn extent(&self) -> Size {
        let (along, across) = self.card_extent();
        let length = self.slots.len().saturating_sub(1) as f64 * self.step() + along;
        match self.options.orientation {
            StackOrientation::Horizontal => Size::new(length, across),
            StackOrientation::Vertical => Size::new(across, length),
        }
    }

    /// 最初のカードの左上。
    pub fn origin(&self) -> Position {
        let position = self.options.position;
        match self.options.anchor {
            Some(anchor) => {
                let shift = adjust_to_anchor(self.extent(), anchor);
                Position::new(position.x - shift.x, position.y - shift.y)
            }
            None => position,
        }
    }

    fn new_slot(&self) -> CardSlot<T> {
        let mut slot = CardSlot::new(Position::ZERO, 0.0, 0.0);
        if let Some(init_fn) = &self.init_fn {
            slot.set_init_function(Rc::clone(init_fn));
        }
        slot
    }

    /// 全スロットを詰め直す (取り除いた所に穴を残さない)。
    fn repack(&mut self) {
        let step = self.step();
        let origin = self.origin();
        let orientation = self.options.orientation;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let along = i as f64 * step;
            slot.coord = match orientation {
                StackOrientation::Horizontal => Position::new(origin.x + along, origin.y),
                StackOrientation::Vertical => Position::new(origin.x, origin.y + along),
            };
            slot.z_index = i as f64;
        }
        self.hovered = None;
    }

    fn deal_cards(&mut self, style: DealStyle) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let coord = slot.coord;
            if let Some(card) = slot.card_mut() {
                deal_in(card, coord, i, style);
            }
        }
    }
}

impl<T> CardContainer<T> for Stack<T> {
    fn next_frame(&mut self, timestamp: f64, surface: &mut dyn DrawSurface) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.tick(timestamp, self.hovered == Some(i));
        }
        for slot in self.slots.iter().filter(|slot| slot.has_card()) {
            slot.draw(surface, slot.coord);
        }
    }

    fn on_mouse_move(&mut self, position: Position) {
        self.hovered = self.hit_test(position);
    }

    /// 厚み方向の帯から外れていたら即 None。そのあと並ぶ方向の位置を間隔で割って番号を出す。
    fn hit_test(&self, position: Position) -> Option<usize> {
        let n = self.slots.len();
        if n == 0 {
            return None;
        }
        let origin = self.origin();
        let (along, across) = match self.options.orientation {
            StackOrientation::Horizontal => (position.x - origin.x, position.y - origin.y),
            StackOrientation::Vertical => (position.y - origin.y, position.x - origin.x),
        };
        let (card_along, card_across) = self.card_extent();

        if across < 0.0 || across > card_across {
            return None;
        }
        let step = self.step();
        if along < 0.0 || along > (n - 1) as f64 * step + card_along {
            return None;
        }

        let index = if step > 0.0 { ((along / step).floor() as usize).min(n - 1) } else { n - 1 };
        self.slots[index].has_card().then_some(index)
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
        debug!("Stack: {} cards set", self.slots.len());
        self.repack();
        self.deal_cards(options.deal);
    }

    fn add_card(&mut self, card: Card) {
        let mut slot = self.new_slot();
        slot.put_card(card, Payload::UseInitializer);
        self.slots.push(slot);
        self.repack();
        // 配り途中のカードには触らず、新しいカードだけ落ち着かせる
        let index = self.slots.len() - 1;
        let slot = &mut self.slots[index];
        let coord = slot.coord;
        if let Some(card) = slot.card_mut() {
            deal_in(card, coord, index, DealStyle::Settle);
        }
    }

    fn remove_card(&mut self, target: CardRef<'_>) -> Option<Card> {
        let index = self.slots.iter().position(|slot| slot.card().is_some_and(|c| target.matches(c)))?;
        let mut slot = self.slots.remove(index);
        self.repack();
        slot.remove_card()
    }

    fn clear(&mut self, remove_slots: bool) {
        if remove_slots {
            self.slots.clear();
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::card::tests::card_named;
    use crate::drawable::tests::{texts, TickCounter};
    use crate::render::RecordingSurface;

    const CARD: Size = Size { width: 80.0, height: 100.0 };

    fn row(names: &[&str]) -> Stack<()> {
        let mut stack = Stack::new(400.0, CARD, StackOptions { position: Position::new(100.0, 50.0), ..Default::default() });
        stack.set_cards(names.iter().map(|n| card_named(n)).collect(), CardsSettingOptions::default());
        stack
    }

    fn xs(stack: &Stack<()>) -> Vec<f64> {
        stack.slots().iter().map(|s| s.coord.x).collect()
    }

    #[test]
    fn test_even_spacing_from_width() {
        let stack = row(&["a", "b", "c", "d"]);
        assert_eq!(xs(&stack), vec![100.0, 200.0, 300.0, 400.0]);
        assert!(stack.slots().iter().all(|s| s.coord.y == 50.0));
        let names: Vec<&str> = stack.get_cards().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_ideal_hand_length_fixes_spacing() {
        // 13 枚想定: (12 * 25 + 80) の幅なら間隔は 25
        let options = StackOptions { ideal_hand_length: Some(13), ..Default::default() };
        let mut stack: Stack<()> = Stack::new(12.0 * 25.0 + 80.0, CARD, options);
        stack.set_cards(vec![card_named("a"), card_named("b"), card_named("c")], CardsSettingOptions::default());
        let xs: Vec<f64> = stack.slots().iter().map(|s| s.coord.x).collect();
        assert_eq!(xs, vec![0.0, 25.0, 50.0], "枚数が少なくても間隔は同じ");
    }

    #[test]
    fn test_center_anchor() {
        let options = StackOptions {
            position: Position::new(400.0, 300.0),
            anchor: Some(Anchor::Center),
            ideal_hand_length: Some(4),
            ..Default::default()
        };
        let mut stack: Stack<()> = Stack::new(3.0 * 25.0 + 80.0, CARD, options);
        stack.set_cards(vec![card_named("a"), card_named("b")], CardsSettingOptions::default());
        // 2 枚の幅は 25 + 80 = 105
        assert_eq!(stack.origin(), Position::new(400.0 - 52.5, 250.0));
    }

    #[test]
    fn test_hit_test_horizontal() {
        let stack = row(&["a", "b", "c", "d"]);
        assert_eq!(stack.hit_test(Position::new(150.0, 60.0)), Some(0));
        assert_eq!(stack.hit_test(Position::new(399.0, 149.0)), Some(2));
        assert_eq!(stack.hit_test(Position::new(470.0, 100.0)), Some(3), "最後のカードは全部見えている");
        assert_eq!(stack.hit_test(Position::new(490.0, 100.0)), None, "並びの外");
        assert_eq!(stack.hit_test(Position::new(150.0, 151.0)), None, "帯の外");
        let empty: Stack<()> = Stack::new(400.0, CARD, StackOptions::default());
        assert_eq!(empty.hit_test(Position::ZERO), None);
    }

    #[test]
    fn test_vertical_layout_and_hit_test() {
        let options = StackOptions { orientation: StackOrientation::Vertical, ..Default::default() };
        let mut stack: Stack<()> = Stack::new(300.0, CARD, options);
        stack.set_cards(vec![card_named("a"), card_named("b"), card_named("c")], CardsSettingOptions::default());
        let ys: Vec<f64> = stack.slots().iter().map(|s| s.coord.y).collect();
        assert_eq!(ys, vec![0.0, 100.0, 200.0]);
        assert_eq!(stack.hit_test(Position::new(10.0, 250.0)), Some(2));
        assert_eq!(stack.hit_test(Position::new(81.0, 250.0)), None, "横幅はカードの幅まで");
    }

    #[test]
    fn test_remove_card_repacks_without_gap() {
        let mut stack = row(&["a", "b", "c", "d"]);
        let b_id = stack.get_cards()[1].id();
        let removed = stack.remove_card(CardRef::Id(b_id)).expect("b はあるはず");
        assert_eq!(removed.name(), "b");
        let names: Vec<&str> = stack.get_cards().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "c", "d"], "残りの順番はそのまま");
        let step = 400.0 / 3.0;
        assert_eq!(xs(&stack), vec![100.0, 100.0 + step, 100.0 + 2.0 * step], "隙間なく詰め直す");

        assert!(stack.remove_card(CardRef::Name("zz")).is_none());
        let removed = stack.remove_card(CardRef::Name("d")).expect("d はあるはず");
        assert_eq!(removed.name(), "d");
        assert_eq!(stack.slots().len(), 2);
    }

    #[test]
    fn test_deal_from_point_and_settle() {
        let options = StackOptions { position: Position::new(0.0, 0.0), ..Default::default() };
        let mut stack: Stack<()> = Stack::new(160.0, CARD, options);
        let deal = DealStyle::FromPoint { origin: Position::new(400.0, 300.0), base_delay_ms: 50.0, stagger_ms: 200.0 };
        stack.set_cards(vec![card_named("a"), card_named("b")], CardsSettingOptions { flipped: true, deal });
        let deltas: Vec<Position> = stack.get_cards().iter().map(|c| c.draw_delta()).collect();
        assert_eq!(deltas, vec![Position::new(360.0, 250.0), Position::new(280.0, 250.0)]);

        let mut surface = RecordingSurface::new();
        stack.next_frame(0.0, &mut surface);
        stack.next_frame(350.0, &mut surface);
        let dealt: Vec<bool> = stack.get_cards().iter().map(|c| c.is_dealt()).collect();
        assert_eq!(dealt, vec![true, false], "2枚目は 250ms 待ってから");

        stack.add_card(card_named("c"));
        stack.next_frame(400.0, &mut surface);
        assert!(stack.get_cards()[2].is_dealt(), "追加したカードはその場で落ち着く");
    }

    #[test]
    fn test_ticks_every_slot_before_drawing() {
        let mut stack = row(&["a", "b", "c"]);
        let counter = Rc::new(Cell::new(0));
        for slot in stack.slots_mut() {
            slot.add_drawable(Box::new(TickCounter(Rc::clone(&counter))));
        }
        let mut surface = RecordingSurface::new();
        stack.next_frame(0.0, &mut surface);
        assert_eq!(texts(&surface), vec!["3", "3", "3"], "最初のスロットも全部の tick の後で描かれる");
    }
}
