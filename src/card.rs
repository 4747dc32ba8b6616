// src/card.rs

use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::animation::{Effect, EffectKind};
use crate::geometry::{Position, Size};
use crate::render::{CardImage, DrawSurface};

/// カード1枚ごとのユニークな ID だよ。
/// 同じ名前 ("10H" とか) のカードが何枚あっても、ID で「どのカードか」を区別できる！
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CardId(pub usize);

// 0 から順番に払い出す。Relaxed で十分 (一意であればいいだけ)。
static NEXT_CARD_ID: AtomicUsize = AtomicUsize::new(0);

impl CardId {
    fn next() -> Self {
        CardId(NEXT_CARD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// 画面上のカード1枚。見た目の状態 (表裏、配り済みか、ホバー中か) と、
/// 今動いているアニメーション効果を最大1つ持つ。
///
/// 状態遷移 (`tick` ごと):
/// 1. ホバー中で効果なし → 揺れ (Shake) を開始
/// 2. ホバーが外れて、効果が揺れ → clean して外す
/// 3. 効果があれば tick して、終わっていたら clean して外す
#[derive(Debug, Clone)]
pub struct Card {
    id: CardId,
    name: String,
    pub(crate) face: Option<Rc<CardImage>>,
    pub(crate) back: Option<Rc<CardImage>>,
    size: Size,
    pub(crate) flipped: bool,
    pub(crate) dealt: bool,
    hovered: bool,
    pub(crate) draw_delta: Position,
    animation: Option<Effect>,
}

impl Card {
    pub fn new(
        name: impl Into<String>,
        face: Option<Rc<CardImage>>,
        back: Option<Rc<CardImage>>,
        size: Size,
    ) -> Self {
        Self {
            id: CardId::next(),
            name: name.into(),
            face,
            back,
            size,
            flipped: false,
            dealt: false,
            hovered: false,
            draw_delta: Position::ZERO,
            animation: None,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// 向きを直接セットする (アニメーションなし)。
    pub fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
    }

    pub fn is_dealt(&self) -> bool {
        self.dealt
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn draw_delta(&self) -> Position {
        self.draw_delta
    }

    pub fn face_image(&self) -> Option<&Rc<CardImage>> {
        self.face.as_ref()
    }

    pub fn back_image(&self) -> Option<&Rc<CardImage>> {
        self.back.as_ref()
    }

    /// 今見えている面の画像。表向きなら face、裏向きなら back。
    pub fn current_image(&self) -> Option<&Rc<CardImage>> {
        if self.flipped {
            self.face.as_ref()
        } else {
            self.back.as_ref()
        }
    }

    pub fn animation(&self) -> Option<&Effect> {
        self.animation.as_ref()
    }

    pub fn is_animation_active(&self, kind: EffectKind) -> bool {
        self.animation.as_ref().is_some_and(|effect| effect.kind() == kind)
    }

    /// 名前で聞く版。スプライトは作成時の名前 ("burn" など)、それ以外は "flipping" などの種類名。
    pub fn is_animation_named(&self, name: &str) -> bool {
        self.animation.as_ref().is_some_and(|effect| effect.name() == name)
    }

    /// 効果を差し替える唯一の入り口。古い効果は必ず clean してから新しいのを付ける。
    pub fn replace_animation(&mut self, effect: Effect) {
        self.remove_animation();
        trace!("Card {} ({:?}): start {}", self.name, self.id, effect.name());
        self.animation = Some(effect);
    }

    pub fn remove_animation(&mut self) {
        if let Some(mut effect) = self.animation.take() {
            effect.clean(self);
        }
    }

    /// 効果を clean せずに取り外す。別のカードへ乗せ換える時 (`CardSlot::put_card`) 専用。
    pub(crate) fn take_animation(&mut self) -> Option<Effect> {
        let effect = self.animation.take();
        if effect.is_some() {
            self.draw_delta = Position::ZERO;
        }
        effect
    }

    pub fn tick(&mut self, timestamp: f64, hovered: bool) {
        self.hovered = hovered;

        if self.hovered && self.animation.is_none() {
            self.animation = Some(Effect::shake());
        } else if !self.hovered && self.is_animation_active(EffectKind::Shaking) {
            self.remove_animation();
        }

        // 効果はカード自身を書き換えるので、いったん取り出してから tick する
        if let Some(mut effect) = self.animation.take() {
            effect.tick(timestamp, self);
            if effect.is_finished() {
                debug!("Card {} ({:?}): {} finished", self.name, self.id, effect.name());
                effect.clean(self);
            } else {
                self.animation = Some(effect);
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface, position: Position) {
        let Some(image) = self.current_image() else {
            // 画像が無いカードは四角形で代用
            if self.hovered {
                surface.fill_rect(position.x, position.y, self.size.width, self.size.height);
            } else {
                surface.stroke_rect(position.x, position.y, self.size.width, self.size.height);
            }
            return;
        };

        if let Some(effect) = &self.animation {
            if effect.draw(surface, position, self) {
                return;
            }
        }
        surface.draw_image(
            image,
            position.x + self.draw_delta.x,
            position.y + self.draw_delta.y,
            self.size.width,
            self.size.height,
        );
    }

    /// 裏向きの時だけめくる。
    pub fn reveal_card(&mut self) {
        if self.flipped {
            return;
        }
        self.flip_card();
    }

    /// めくりアニメーションを開始する。配り終わっていないカードと、めくり途中のカードは無視。
    pub fn flip_card(&mut self) {
        if !self.dealt || self.is_animation_active(EffectKind::Flipping) {
            return;
        }
        self.replace_animation(Effect::flip());
    }

    /// プレイヤー操作でめくってもいいか。めくり中でなく、裏向きで、配り終わっていること。
    pub fn safe_to_flip(&self) -> bool {
        if self.is_animation_active(EffectKind::Flipping) {
            return false;
        }
        !self.flipped && self.dealt
    }

    /// `delta` だけずれた位置から定位置へ滑り込ませる。`delay_ms` の間は止まったまま。
    pub fn deal(&mut self, delta: Position, delay_ms: f64) {
        self.replace_animation(Effect::deal(delta, delay_ms));
        self.draw_delta = delta;
    }

    /// スプライトアニメーションで face をコマ送りする。
    pub fn play_sprite(&mut self, name: &str, frames: Vec<Rc<CardImage>>, times_to_loop: Option<u32>) {
        self.replace_animation(Effect::sprite(name, frames, times_to_loop));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingSurface};

    pub(crate) fn card_named(name: &str) -> Card {
        Card::new(
            name,
            Some(CardImage::new(format!("{}-face", name))),
            Some(CardImage::new("back")),
            Size::new(80.0, 100.0),
        )
    }

    /// 配り済みのカードを作る (dealt は Deal の clean 経由でしか立たない)。
    pub(crate) fn dealt_card(name: &str) -> Card {
        let mut card = card_named(name);
        card.deal(Position::ZERO, 0.0);
        card.tick(0.0, false);
        assert!(card.is_dealt());
        card
    }

    #[test]
    fn test_card_ids_are_unique() {
        let a = card_named("AH");
        let b = card_named("AH");
        assert_ne!(a.id(), b.id(), "同じ名前でも ID は別");
        assert_eq!(a.clone().id(), a.id(), "clone は同じカードを指す");
    }

    #[test]
    fn test_shake_lifecycle() {
        let mut card = card_named("2C");
        card.tick(0.0, true);
        assert!(card.is_animation_active(EffectKind::Shaking));
        assert_eq!(card.draw_delta(), Position::new(0.0, 1.0));
        card.tick(0.0, false);
        assert!(card.animation().is_none(), "ホバーが外れたら揺れは消える");
        assert_eq!(card.draw_delta(), Position::ZERO);
    }

    #[test]
    fn test_flip_completes() {
        let mut card = dealt_card("QH");
        assert!(card.safe_to_flip());
        card.flip_card();
        assert!(card.is_animation_active(EffectKind::Flipping));
        assert!(!card.safe_to_flip(), "めくり中はめくれない");

        let start = 1000.0;
        card.tick(start, false);
        assert!(!card.is_flipped());
        card.tick(start + 150.0, false);
        assert!(card.is_flipped(), "真ん中で表になる");
        card.tick(start + 300.0, false);
        assert!(!card.is_animation_active(EffectKind::Flipping), "終わったら片付けられる");
        assert!(card.is_flipped());
    }

    #[test]
    fn test_flip_retrigger_is_ignored() {
        let mut card = dealt_card("KD");
        card.flip_card();
        card.tick(0.0, false);
        card.tick(100.0, false);
        card.flip_card(); // めくり中の2回目は無視される
        card.tick(160.0, false);
        card.flip_card();
        card.tick(400.0, false);
        assert!(card.is_flipped(), "最終的に表1回分だけめくれているはず");
        assert!(card.animation().is_none());
    }

    #[test]
    fn test_undealt_card_cannot_flip() {
        let mut card = card_named("3S");
        assert!(!card.safe_to_flip());
        card.flip_card();
        assert!(card.animation().is_none(), "配り終わってないカードはめくれない");
    }

    #[test]
    fn test_deal_with_delay_sets_dealt_once() {
        let mut card = card_named("9H");
        let delta = Position::new(-120.0, 60.0);
        card.deal(delta, 450.0);
        assert_eq!(card.draw_delta(), delta);
        card.tick(0.0, false);
        card.tick(449.0, false);
        assert_eq!(card.draw_delta(), delta, "待ち時間中は動かない");
        assert!(!card.is_dealt());
        card.tick(450.0 + 300.0, false);
        assert_eq!(card.draw_delta(), Position::ZERO);
        assert!(card.is_dealt(), "delay + duration で配り終わる");
        assert!(card.animation().is_none());
    }

    #[test]
    fn test_hover_does_not_interrupt_deal() {
        let mut card = card_named("4C");
        card.deal(Position::new(10.0, 0.0), 0.0);
        card.tick(0.0, true);
        assert!(card.is_animation_active(EffectKind::Dealing), "配り中はホバーしても揺れない");
    }

    #[test]
    fn test_replace_cleans_previous_effect() {
        let mut card = card_named("5D");
        card.deal(Position::new(50.0, 50.0), 1000.0);
        card.tick(0.0, false);
        card.play_sprite("glow", vec![CardImage::new("glow0")], None);
        assert_eq!(card.draw_delta(), Position::ZERO, "配りの clean が走っているはず");
        assert!(!card.is_dealt(), "配り終わる前に差し替えたので dealt のまま立たない");
        assert!(card.is_animation_active(EffectKind::Sprite));
    }

    #[test]
    fn test_redeal_mid_slide_stays_undealt() {
        let mut card = card_named("7C");
        card.deal(Position::new(100.0, 0.0), 0.0);
        card.tick(0.0, false);
        card.tick(50.0, false);
        card.deal(Position::new(100.0, 0.0), 500.0);
        assert!(!card.is_dealt(), "配り直しで dealt が先に立ってはいけない");
        assert!(!card.safe_to_flip());
        assert!(card.is_animation_active(EffectKind::Dealing));

        card.tick(100.0, false);
        card.tick(100.0 + 500.0 + 300.0, false);
        assert!(card.is_dealt(), "配り直した分が終わったら dealt");
        assert!(card.safe_to_flip());
    }

    #[test]
    fn test_animation_named() {
        let mut card = dealt_card("8C");
        card.play_sprite("burn", vec![CardImage::new("burn0")], None);
        assert!(card.is_animation_named("burn"));
        assert!(!card.is_animation_named("glow"));
        card.flip_card();
        assert!(card.is_animation_named("flipping"), "組み込みの効果は種類名で引ける");
    }

    #[test]
    fn test_reveal_card_only_when_face_down() {
        let mut card = dealt_card("6S");
        card.set_flipped(true);
        card.reveal_card();
        assert!(card.animation().is_none(), "もう表なら何もしない");
    }

    #[test]
    fn test_draw_placeholder_without_images() {
        let mut card = Card::new("blank", None, None, Size::new(10.0, 20.0));
        let mut surface = RecordingSurface::new();
        card.draw(&mut surface, Position::new(1.0, 2.0));
        card.tick(0.0, true);
        card.draw(&mut surface, Position::new(1.0, 2.0));
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::StrokeRect { x: 1.0, y: 2.0, width: 10.0, height: 20.0 },
                DrawCommand::FillRect { x: 1.0, y: 2.0, width: 10.0, height: 20.0 },
            ]
        );
    }

    #[test]
    fn test_draw_applies_delta_and_flip_squash() {
        let mut card = dealt_card("7H");
        let mut surface = RecordingSurface::new();
        card.tick(0.0, true); // 揺れ: delta = (0, 1)
        card.draw(&mut surface, Position::new(10.0, 10.0));
        assert_eq!(
            surface.take_commands(),
            vec![DrawCommand::DrawImage { key: "back".into(), x: 10.0, y: 11.0, width: 80.0, height: 100.0 }]
        );

        card.flip_card();
        card.tick(100.0, false);
        card.tick(175.0, false); // 進捗 0.25 → 横幅 0.5 倍
        card.draw(&mut surface, Position::new(10.0, 10.0));
        assert_eq!(
            surface.take_commands(),
            vec![
                DrawCommand::Save,
                DrawCommand::Translate { x: 50.0, y: 60.0 },
                DrawCommand::Scale { x: 0.5, y: 1.0 },
                DrawCommand::DrawImage { key: "back".into(), x: -40.0, y: -50.0, width: 80.0, height: 100.0 },
                DrawCommand::Restore,
            ]
        );
    }
}
