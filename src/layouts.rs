// src/layouts.rs
//! よく使うテーブル配置のヘルパー。今のところトリックテイキング (ハーツみたいなゲーム) 用。

use std::f64::consts::PI;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::layout::{HAND_PADDING, POLYGON_RADIUS, TRICK_CARD_SPACING, TRICK_DEAL_STAGGER_MS};
use crate::container::{CardsSettingOptions, DealStyle, Stack, StackOptions, StackOrientation};
use crate::geometry::{Position, Size};
use crate::library::Deck;
use crate::table::{ContainerRole, Table};

/// 基準点が矩形のどこを指すか。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    #[default]
    LeftTop,
    Top,
    RightTop,
    Right,
    RightBottom,
    Bottom,
    LeftBottom,
    Left,
    Center,
}

/// 矩形の左上から見た、アンカーの位置。
pub fn adjust_to_anchor(size: Size, anchor: Anchor) -> Position {
    let (w, h) = (size.width, size.height);
    match anchor {
        Anchor::LeftTop => Position::new(0.0, 0.0),
        Anchor::Top => Position::new(w / 2.0, 0.0),
        Anchor::RightTop => Position::new(w, 0.0),
        Anchor::Right => Position::new(w, h / 2.0),
        Anchor::RightBottom => Position::new(w, h),
        Anchor::Bottom => Position::new(w / 2.0, h),
        Anchor::LeftBottom => Position::new(0.0, h),
        Anchor::Left => Position::new(0.0, h / 2.0),
        Anchor::Center => Position::new(w / 2.0, h / 2.0),
    }
}

/// Canvas の中心を囲む正 n 角形の i 番目の頂点。0 番は真下 (自分の席)。
pub fn regular_polygon(canvas: Size, n: usize, radius: f64, index: usize) -> Position {
    let center = canvas.center();
    let step = 2.0 * PI / n.max(1) as f64;
    let angle = PI / 2.0 + index as f64 * step;
    Position::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// プレイヤー i の手札の向き。自分 (0 番) は必ず横。
pub fn orientation_for(players: usize, index: usize) -> StackOrientation {
    let horizontal = match players {
        3 | 5 => index == 0,
        4 => index % 2 == 0,
        6 => index == 0 || index == 3,
        _ => true,
    };
    if horizontal {
        StackOrientation::Horizontal
    } else {
        StackOrientation::Vertical
    }
}

/// 4人までの席の位置 (下 → 右 → 上 → 左)。それ以外の番号は None。
pub fn hand_position(canvas: Size, card: Size, index: usize, hand_width: f64) -> Option<Position> {
    let (cw, ch) = (canvas.width, canvas.height);
    let position = match index {
        0 => Position::new(cw / 2.0 - hand_width / 2.0 - card.width / 2.0, ch - card.height - HAND_PADDING),
        1 => Position::new(cw - card.width - HAND_PADDING, ch / 2.0 - hand_width / 2.0 - card.height / 2.0),
        2 => Position::new(cw / 2.0 - hand_width / 2.0 - card.width / 2.0, HAND_PADDING),
        3 => Position::new(HAND_PADDING, ch / 2.0 - hand_width / 2.0 - card.height / 2.0),
        _ => return None,
    };
    Some(position)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrickTakingOptions {
    pub players: usize,
    /// 手札の枚数。None なら `deck_size / players`、それも無ければ 13。
    pub hand_size: Option<usize>,
    pub deck_size: Option<usize>,
    /// 席を正多角形の頂点に置く (5人以上は常にこれ)。
    pub polygon_placement: bool,
}

impl Default for TrickTakingOptions {
    fn default() -> Self {
        Self { players: 4, hand_size: None, deck_size: None, polygon_placement: false }
    }
}

impl TrickTakingOptions {
    pub fn hand_size(&self) -> usize {
        self.hand_size.or_else(|| self.deck_size.map(|d| d / self.players.max(1))).unwrap_or(13)
    }
}

fn check_players(players: usize) -> Result<(), String> {
    if (3..=6).contains(&players) {
        Ok(())
    } else {
        Err(format!("Trick-taking layout supports 3 to 6 players, got {}", players))
    }
}

/// 各プレイヤーの手札 (`Player(i)`) と、真ん中の場 (`Trick`) をテーブルに登録する。
pub fn trick_taking_layout<T: 'static>(
    table: &mut Table<T>,
    card: Size,
    options: &TrickTakingOptions,
) -> Result<(), String> {
    let players = options.players;
    check_players(players)?;
    let canvas = table.canvas();
    let hand_size = options.hand_size();
    let hand_width = hand_size.saturating_sub(1) as f64 * TRICK_CARD_SPACING + card.width;
    let polygon = options.polygon_placement || players > 4;

    for i in 0..players {
        let (position, anchor) = match hand_position(canvas, card, i, hand_width) {
            Some(position) if !polygon => (position, None),
            _ => (regular_polygon(canvas, players, POLYGON_RADIUS, i), Some(Anchor::Center)),
        };
        let stack = Stack::new(
            hand_width,
            card,
            StackOptions {
                orientation: orientation_for(players, i),
                position,
                anchor,
                ideal_hand_length: Some(hand_size),
            },
        );
        table.register_container(ContainerRole::Player(i as u8), Box::new(stack));
    }

    let trick_width = 3.0 * TRICK_CARD_SPACING + card.width;
    let trick = Stack::new(
        trick_width,
        card,
        StackOptions {
            position: Position::new(canvas.width / 2.0 - trick_width / 2.0, canvas.height / 2.0 - card.height / 2.0),
            ideal_hand_length: Some(4),
            ..Default::default()
        },
    );
    table.register_container(ContainerRole::Trick, Box::new(trick));
    info!("Trick-taking layout: {} players, {} cards each", players, hand_size);
    Ok(())
}

/// 山札から各プレイヤーに配る。自分 (0 番) の手札だけ表向き。
///
/// テーブルの中心から、1周ずつ順番に配っていく: `delay = (何枚目 * 人数 + 席) * 50ms`。
pub fn deal_trick_taking<T: 'static>(
    table: &mut Table<T>,
    deck: &mut Deck,
    players: usize,
    hand_size: Option<usize>,
) -> Result<(), String> {
    check_players(players)?;
    let origin = table.canvas().center();
    let hand_size = hand_size.unwrap_or(deck.size() / players);

    for i in 0..players {
        let Some(hand) = table.container_mut(ContainerRole::Player(i as u8)) else {
            warn!("deal_trick_taking: no container for player {}", i);
            continue;
        };
        let cards = deck.draw_cards(hand_size);
        let deal = DealStyle::FromPoint {
            origin,
            base_delay_ms: i as f64 * TRICK_DEAL_STAGGER_MS,
            stagger_ms: players as f64 * TRICK_DEAL_STAGGER_MS,
        };
        hand.set_cards(cards, CardsSettingOptions { flipped: i == 0, deal });
    }
    Ok(())
}
