// src/container/mod.rs
//! カードを並べるレイアウト (コンテナ) たち。
//!
//! どのコンテナも `CardSlot<T>` の並びを持っていて、
//! - レイアウトアルゴリズムで各スロットの位置を計算する
//! - ポインタ座標からスロットを特定する (ヒットテスト)
//! - フレームごとに全スロットを tick してから、重なり順に描く
//!
//! という共通の仕事をするよ。

pub mod circle;
pub mod fan;
pub mod grid;
pub mod stack;

pub use circle::Circle;
pub use fan::{CurveFn, CurvePoint, Fan};
pub use grid::Grid;
pub use stack::{Stack, StackOptions, StackOrientation};

use crate::card::{Card, CardId};
use crate::geometry::Position;
use crate::render::DrawSurface;
use crate::slot::{CardSlot, InitFn};

/// `set_cards` で新しく置いたカードの配り方。Stack と Fan が使う
/// (Circle と Grid は自分のレイアウトに合わせた配り方を持っている)。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DealStyle {
    /// 移動量ゼロで配る。次の tick ですぐ配り終わる。
    #[default]
    Settle,
    /// `origin` (Canvas 座標) から滑り込ませる。i 枚目の待ち時間は `base_delay_ms + i * stagger_ms`。
    FromPoint { origin: Position, base_delay_ms: f64, stagger_ms: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardsSettingOptions {
    /// true なら置いたカードを表向きにする。
    pub flipped: bool,
    pub deal: DealStyle,
}

impl CardsSettingOptions {
    pub fn flipped() -> Self {
        Self { flipped: true, ..Self::default() }
    }
}

/// 取り除きたいカードの指定方法。ID (そのカード) か、名前 (最初に見つかった同名カード)。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardRef<'a> {
    Id(CardId),
    Name(&'a str),
}

impl CardRef<'_> {
    pub fn matches(&self, card: &Card) -> bool {
        match self {
            CardRef::Id(id) => card.id() == *id,
            CardRef::Name(name) => card.name() == *name,
        }
    }
}

impl From<&Card> for CardRef<'_> {
    fn from(card: &Card) -> Self {
        CardRef::Id(card.id())
    }
}

pub trait CardContainer<T> {
    /// 全スロットを tick してから描く。同じフレームの描画は必ず tick 後の状態になる。
    fn next_frame(&mut self, timestamp: f64, surface: &mut dyn DrawSurface);

    /// ホバー中のスロットを計算し直す。
    fn on_mouse_move(&mut self, position: Position);

    /// ポインタの下にあるスロットの番号。カードのない場所は None。
    fn hit_test(&self, position: Position) -> Option<usize>;

    fn on_mouse_left_click(&mut self, position: Position) -> Option<&mut CardSlot<T>> {
        let index = self.hit_test(position)?;
        self.slots_mut().get_mut(index)
    }

    fn on_mouse_left_click_release(&mut self, _position: Position) {}

    fn slots(&self) -> &[CardSlot<T>];

    fn slots_mut(&mut self) -> &mut [CardSlot<T>];

    /// 空でないスロットのカードを、スロットの並び順 (描画順ではない) で返す。
    fn get_cards<'a>(&'a self) -> Vec<&'a Card>
    where
        T: 'a,
    {
        self.slots().iter().filter_map(|slot| slot.card()).collect()
    }

    fn set_cards(&mut self, cards: Vec<Card>, options: CardsSettingOptions);

    fn add_card(&mut self, card: Card);

    fn remove_card(&mut self, target: CardRef<'_>) -> Option<Card>;

    /// 全部のカードを外す。`remove_slots` が true ならスロットごと消す。
    fn clear(&mut self, remove_slots: bool);

    fn set_data_function(&mut self, init_fn: InitFn<T>);
}

/// `set_cards` の共通処理: まだ配られていないカードに配りアニメーションを付ける。
pub(crate) fn deal_in(card: &mut Card, slot_origin: Position, index: usize, style: DealStyle) {
    if card.is_dealt() {
        return;
    }
    match style {
        DealStyle::Settle => card.deal(Position::ZERO, 0.0),
        DealStyle::FromPoint { origin, base_delay_ms, stagger_ms } => {
            let size = card.size();
            let delta = Position::new(
                origin.x - slot_origin.x - size.width / 2.0,
                origin.y - slot_origin.y - size.height / 2.0,
            );
            card.deal(delta, base_delay_ms + index as f64 * stagger_ms);
        }
    }
}

/// 重なり順 (z_index が小さい順) に並べたスロット番号。同じ z は元の順番を保つ。
pub(crate) fn draw_order<T>(slots: &[CardSlot<T>]) -> Vec<usize> {
    use itertools::Itertools;
    (0..slots.len()).sorted_by(|&a, &b| slots[a].z_index.total_cmp(&slots[b].z_index)).collect()
}
