// src/drawable.rs
//! スロットに重ねて描くおまけ要素 (ラベル、数字バッジ、ボタン)。

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::geometry::{point_in_rect, Position, Size};
use crate::render::DrawSurface;
use crate::slot::CardSlot;

/// Drawable がクリックされた時に返す「やりたいこと」。中身の解釈はルール側に任せる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub data: serde_json::Value,
}

impl Action {
    pub fn new(name: impl Into<String>, data: serde_json::Value) -> Self {
        Self { name: name.into(), data }
    }
}

/// スロットに付けられる描画要素。
///
/// `draw` にはスロット自身 (相対配置用) と、スロットが描かれた絶対位置 `offset` が渡される。
pub trait Drawable<T> {
    fn tick(&mut self, _timestamp: f64) {}

    fn draw(&self, surface: &mut dyn DrawSurface, slot: &CardSlot<T>, offset: Option<Position>);

    /// スロットの描画位置からの相対位置。
    fn position(&self) -> Position;

    fn on_mouse_move(&mut self, _position: Position) {}

    fn on_mouse_left_click(&mut self, _position: Position) -> Option<Action> {
        None
    }

    fn on_mouse_left_click_release(&mut self, _position: Position) -> Option<Action> {
        None
    }
}

/// ただの文字列ラベル。
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    relative: Position,
}

impl Label {
    pub fn new(text: impl Into<String>, relative: Position) -> Self {
        Self { text: text.into(), relative }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl<T> Drawable<T> for Label {
    fn draw(&self, surface: &mut dyn DrawSurface, _slot: &CardSlot<T>, offset: Option<Position>) {
        let origin = offset.unwrap_or(Position::ZERO).offset(self.relative);
        surface.fill_text(&self.text, origin.x, origin.y);
    }

    fn position(&self) -> Position {
        self.relative
    }
}

/// 数字を表示する小さな四角いバッジ (残り回数とか得点とか)。
/// スロットにカードがない時は描かない。
#[derive(Debug, Clone)]
pub struct Badge {
    value: i64,
    relative: Position,
    size: Size,
}

impl Badge {
    pub fn new(value: i64, relative: Position, size: Size) -> Self {
        Self { value, relative, size }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn set_value(&mut self, value: i64) {
        self.value = value;
    }

    pub fn increment(&mut self) {
        self.value += 1;
    }
}

impl<T> Drawable<T> for Badge {
    fn draw(&self, surface: &mut dyn DrawSurface, slot: &CardSlot<T>, offset: Option<Position>) {
        if !slot.has_card() {
            return;
        }
        let origin = offset.unwrap_or(Position::ZERO).offset(self.relative);
        surface.stroke_rect(origin.x, origin.y, self.size.width, self.size.height);
        surface.fill_text(&self.value.to_string(), origin.x + self.size.width / 2.0, origin.y + self.size.height / 2.0);
    }

    fn position(&self) -> Position {
        self.relative
    }
}

/// クリックすると `Action` を返すボタン。
///
/// 当たり判定には最後に描かれた絶対位置を使う (描かれる前は相対位置そのまま)。
#[derive(Debug, Clone)]
pub struct Button {
    label: String,
    relative: Position,
    size: Size,
    action: Action,
    hovered: bool,
    pressed: bool,
    last_origin: Cell<Position>,
}

impl Button {
    pub fn new(label: impl Into<String>, relative: Position, size: Size, action: Action) -> Self {
        Self {
            label: label.into(),
            relative,
            size,
            action,
            hovered: false,
            pressed: false,
            last_origin: Cell::new(relative),
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    fn contains(&self, position: Position) -> bool {
        point_in_rect(position, self.last_origin.get(), self.size)
    }
}

impl<T> Drawable<T> for Button {
    fn draw(&self, surface: &mut dyn DrawSurface, _slot: &CardSlot<T>, offset: Option<Position>) {
        let origin = offset.unwrap_or(Position::ZERO).offset(self.relative);
        self.last_origin.set(origin);
        if self.hovered {
            surface.fill_rect(origin.x, origin.y, self.size.width, self.size.height);
        } else {
            surface.stroke_rect(origin.x, origin.y, self.size.width, self.size.height);
        }
        surface.fill_text(&self.label, origin.x + 4.0, origin.y + self.size.height / 2.0);
    }

    fn position(&self) -> Position {
        self.relative
    }

    fn on_mouse_move(&mut self, position: Position) {
        self.hovered = self.contains(position);
    }

    fn on_mouse_left_click(&mut self, position: Position) -> Option<Action> {
        self.pressed = self.contains(position);
        None
    }

    /// 押した場所と離した場所が両方ボタンの上なら発火。
    fn on_mouse_left_click_release(&mut self, position: Position) -> Option<Action> {
        let fire = self.pressed && self.contains(position);
        self.pressed = false;
        fire.then(|| self.action.clone())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::card::tests::card_named;
    use crate::render::{DrawCommand, RecordingSurface};
    use crate::slot::Payload;

    /// tick のたびに共有カウンタを進めて、draw ではその時の値を書くだけ。
    /// コンテナが「全部 tick してから描く」かどうかを見る用。
    pub(crate) struct TickCounter(pub(crate) Rc<Cell<u32>>);

    impl<T> Drawable<T> for TickCounter {
        fn tick(&mut self, _timestamp: f64) {
            self.0.set(self.0.get() + 1);
        }

        fn draw(&self, surface: &mut dyn DrawSurface, _slot: &CardSlot<T>, offset: Option<Position>) {
            let origin = offset.unwrap_or(Position::ZERO);
            surface.fill_text(&self.0.get().to_string(), origin.x, origin.y);
        }

        fn position(&self) -> Position {
            Position::ZERO
        }
    }

    /// 記録された FillText の文字だけ抜き出す。
    pub(crate) fn texts(surface: &RecordingSurface) -> Vec<String> {
        surface
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_badge_only_draws_with_card() {
        let mut slot: CardSlot<()> = CardSlot::new(Position::ZERO, 0.0, 0.0);
        let badge = Badge::new(3, Position::new(60.0, 0.0), Size::new(20.0, 20.0));
        let mut surface = RecordingSurface::new();
        Drawable::<()>::draw(&badge, &mut surface, &slot, Some(Position::new(10.0, 10.0)));
        assert!(surface.commands().is_empty(), "カードがなければ描かない");

        slot.put_card(card_named("QS"), Payload::LeaveUnset);
        Drawable::<()>::draw(&badge, &mut surface, &slot, Some(Position::new(10.0, 10.0)));
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::StrokeRect { x: 70.0, y: 10.0, width: 20.0, height: 20.0 },
                DrawCommand::FillText { text: "3".into(), x: 80.0, y: 20.0 },
            ]
        );
    }

    #[test]
    fn test_button_fires_on_release_inside() {
        let slot: CardSlot<()> = CardSlot::new(Position::ZERO, 0.0, 0.0);
        let action = Action::new("use-skill", serde_json::json!({ "slot": 2 }));
        let mut button = Button::new("Skill", Position::new(0.0, 110.0), Size::new(80.0, 20.0), action.clone());
        let mut surface = RecordingSurface::new();
        Drawable::<()>::draw(&button, &mut surface, &slot, Some(Position::new(100.0, 100.0)));

        let inside = Position::new(120.0, 215.0);
        Drawable::<()>::on_mouse_move(&mut button, inside);
        assert!(button.is_hovered());
        assert_eq!(Drawable::<()>::on_mouse_left_click(&mut button, inside), None);
        assert_eq!(Drawable::<()>::on_mouse_left_click_release(&mut button, inside), Some(action));

        let outside = Position::new(0.0, 0.0);
        Drawable::<()>::on_mouse_left_click(&mut button, inside);
        assert_eq!(Drawable::<()>::on_mouse_left_click_release(&mut button, outside), None, "外で離したら発火しない");
    }
}
