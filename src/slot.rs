// src/slot.rs
//! カードを置く「枠」。カード 0〜1 枚と、ゲームごとのデータ `T` と、おまけの Drawable を持つよ。

use std::fmt;
use std::rc::Rc;

use crate::card::Card;
use crate::drawable::Drawable;
use crate::geometry::Position;
use crate::render::DrawSurface;

/// カード名からスロットの初期データを作る関数。コンテナ内の全スロットで共有する。
pub type InitFn<T> = Rc<dyn Fn(&str) -> T>;

/// `put_card` でデータをどう扱うか。
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<T> {
    /// 初期化関数があればそれで作る。なければデータはそのまま。
    UseInitializer,
    /// 渡した値をそのまま入れる。
    Explicit(T),
    /// データには触らない。
    LeaveUnset,
}

pub struct CardSlot<T> {
    data: Option<T>,
    card: Option<Card>,
    /// 位置。意味はコンテナ次第 (ピクセル座標、グリッドのマス番号など)。
    pub coord: Position,
    pub z_index: f64,
    /// 回転角 (ラジアン)。Fan で使う。
    pub angle: f64,
    init_fn: Option<InitFn<T>>,
    drawables: Vec<Box<dyn Drawable<T>>>,
}

impl<T> CardSlot<T> {
    pub fn new(coord: Position, z_index: f64, angle: f64) -> Self {
        Self { data: None, card: None, coord, z_index, angle, init_fn: None, drawables: Vec::new() }
    }

    pub fn set_init_function(&mut self, init_fn: InitFn<T>) {
        self.init_fn = Some(init_fn);
    }

    pub fn tick(&mut self, timestamp: f64, hovered: bool) {
        if let Some(card) = self.card.as_mut() {
            card.tick(timestamp, hovered);
        }
        for drawable in self.drawables.iter_mut() {
            drawable.tick(timestamp);
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface, position: Position) {
        self.draw_card(surface, position);
        self.draw_drawables(surface, position);
    }

    /// カードだけ描く。変形 (translate/rotate) の中で描くコンテナ用。
    pub fn draw_card(&self, surface: &mut dyn DrawSurface, position: Position) {
        if let Some(card) = &self.card {
            card.draw(surface, position);
        }
    }

    /// Drawable だけ描く。`origin` は Canvas 座標 (ボタンの当たり判定がこれを使う)。
    pub fn draw_drawables(&self, surface: &mut dyn DrawSurface, origin: Position) {
        for drawable in &self.drawables {
            drawable.draw(surface, self, Some(origin));
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    pub fn set_data(&mut self, data: Option<T>) {
        self.data = data;
    }

    pub fn has_card(&self) -> bool {
        self.card.is_some()
    }

    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    pub fn card_mut(&mut self) -> Option<&mut Card> {
        self.card.as_mut()
    }

    /// カードだけ外す。スロット自体とデータは残る。
    pub fn remove_card(&mut self) -> Option<Card> {
        self.card.take()
    }

    /// カードを置く。前のカードが返ってくるよ。
    ///
    /// 前のカードがアニメーション中だったら、その効果を新しいカードに乗せ換える
    /// (コンテナ間の移動中に見た目が途切れないように)。
    pub fn put_card(&mut self, mut card: Card, payload: Payload<T>) -> Option<Card> {
        let mut previous = self.card.take();
        if let Some(effect) = previous.as_mut().and_then(|old| old.take_animation()) {
            card.replace_animation(effect);
        }

        match payload {
            Payload::UseInitializer => {
                if let Some(init_fn) = &self.init_fn {
                    self.data = Some(init_fn(card.name()));
                }
            }
            Payload::Explicit(data) => self.data = Some(data),
            Payload::LeaveUnset => {}
        }
        self.card = Some(card);
        previous
    }

    pub fn add_drawable(&mut self, drawable: Box<dyn Drawable<T>>) {
        self.drawables.push(drawable);
    }

    pub fn drawables(&self) -> &[Box<dyn Drawable<T>>] {
        &self.drawables
    }

    pub fn drawables_mut(&mut self) -> &mut [Box<dyn Drawable<T>>] {
        &mut self.drawables
    }

    pub fn clean_drawables(&mut self) {
        self.drawables.clear();
    }
}

impl<T: fmt::Debug> fmt::Debug for CardSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardSlot")
            .field("card", &self.card.as_ref().map(|c| c.name()))
            .field("data", &self.data)
            .field("coord", &self.coord)
            .field("z_index", &self.z_index)
            .field("angle", &self.angle)
            .field("drawables", &self.drawables.len())
            .finish()
    }
}
