// src/animation.rs
//! カード1枚ごとに動く、短命なアニメーション効果 (Effect) たち。
//!
//! 効果は enum のタグ付きユニオンで表現していて、トリガーのたびに新しく作り直すよ。
//! 呼び出し側は `match` で全部のバリアントを網羅的に扱える！
//!
//! 共通の約束ごと:
//! - `tick` は単調増加のタイムスタンプ (ミリ秒) で呼ばれて、カードの見た目 (主に `draw_delta`) を動かす。
//! - 終了条件を満たすと `is_finished()` が true になる。持ち主は `clean` を呼んで捨てること。
//! - `clean` はカードを静止状態に戻す。何回呼んでも同じ結果になる。
//! - 開始時刻は最初の `tick` で決まる (作った瞬間ではない)。

use std::f64::consts::PI;
use std::rc::Rc;

use crate::card::Card;
use crate::config::layout::{
    DEAL_DURATION_MS, FLIP_DURATION_MS, SHAKE_AMPLITUDE, SHAKE_FREQUENCY_X, SHAKE_FREQUENCY_Y,
    SPRITE_FRAME_MS,
};
use crate::geometry::Position;
use crate::render::{CardImage, DrawSurface};

/// 効果の種類。`Card::is_animation_active` で「今どの効果が動いてるか」を聞くのに使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Shaking,
    Flipping,
    Dealing,
    Sprite,
}

#[derive(Debug, Clone)]
pub enum Effect {
    Shake(Shake),
    Flip(Flip),
    Deal(Deal),
    Sprite(SpriteLoop),
}

impl Effect {
    pub fn shake() -> Self {
        Effect::Shake(Shake)
    }

    pub fn flip() -> Self {
        Effect::Flip(Flip::default())
    }

    pub fn deal(delta: Position, delay_ms: f64) -> Self {
        Effect::Deal(Deal::new(delta, delay_ms))
    }

    pub fn sprite(name: impl Into<String>, frames: Vec<Rc<CardImage>>, times_to_loop: Option<u32>) -> Self {
        Effect::Sprite(SpriteLoop::new(name, frames, times_to_loop))
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::Shake(_) => EffectKind::Shaking,
            Effect::Flip(_) => EffectKind::Flipping,
            Effect::Deal(_) => EffectKind::Dealing,
            Effect::Sprite(_) => EffectKind::Sprite,
        }
    }

    /// ログ用の名前。スプライトは作成時に付けた名前を返すよ。
    pub fn name(&self) -> &str {
        match self {
            Effect::Shake(_) => "shaking",
            Effect::Flip(_) => "flipping",
            Effect::Deal(_) => "dealing",
            Effect::Sprite(sprite) => &sprite.name,
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            Effect::Shake(_) => false, // 揺れはホバーが外れるまで終わらない
            Effect::Flip(flip) => flip.finished,
            Effect::Deal(deal) => deal.finished,
            Effect::Sprite(sprite) => sprite.finished,
        }
    }

    pub fn tick(&mut self, timestamp: f64, card: &mut Card) {
        match self {
            Effect::Shake(shake) => shake.tick(timestamp, card),
            Effect::Flip(flip) => flip.tick(timestamp, card),
            Effect::Deal(deal) => deal.tick(timestamp, card),
            Effect::Sprite(sprite) => sprite.tick(timestamp, card),
        }
    }

    pub fn clean(&mut self, card: &mut Card) {
        match self {
            Effect::Shake(_) | Effect::Flip(_) => {
                card.draw_delta = Position::ZERO;
            }
            Effect::Deal(deal) => {
                card.draw_delta = Position::ZERO;
                // `dealt` が true になるのはここだけ！ 途中で差し替えられた Deal は配り終わっていない
                if deal.finished {
                    card.dealt = true;
                }
            }
            Effect::Sprite(sprite) => sprite.clean(card),
        }
    }

    /// 独自の描画を持つ効果なら描いて true を返す。false ならカードの通常描画を使う。
    pub fn draw(&self, surface: &mut dyn DrawSurface, position: Position, card: &Card) -> bool {
        match self {
            Effect::Flip(flip) => flip.draw(surface, position, card),
            Effect::Shake(_) | Effect::Deal(_) | Effect::Sprite(_) => false,
        }
    }
}

/// ホバー中のカードをぷるぷる揺らす。振幅 1 の sin/cos。
#[derive(Debug, Clone, Copy, Default)]
pub struct Shake;

impl Shake {
    fn tick(&self, timestamp: f64, card: &mut Card) {
        card.draw_delta.x = (timestamp * SHAKE_FREQUENCY_X).sin() * SHAKE_AMPLITUDE;
        card.draw_delta.y = (timestamp * SHAKE_FREQUENCY_Y).cos() * SHAKE_AMPLITUDE;
    }
}

/// カードをくるっと裏返す。進捗 0.5 で表裏が入れ替わり、1.0 で終了。
#[derive(Debug, Clone, Default)]
pub struct Flip {
    started: Option<f64>,
    target_flipped: bool,
    progress: f64,
    finished: bool,
}

impl Flip {
    pub fn progress(&self) -> f64 {
        self.progress
    }

    fn tick(&mut self, timestamp: f64, card: &mut Card) {
        let start = match self.started {
            Some(start) => start,
            None => {
                // 最初の tick で目標の向きを決める
                self.target_flipped = !card.flipped;
                self.started = Some(timestamp);
                timestamp
            }
        };

        self.progress = ((timestamp - start) / FLIP_DURATION_MS).clamp(0.0, 1.0);

        if self.progress >= 0.5 && card.flipped != self.target_flipped {
            card.flipped = self.target_flipped;
        }
        if self.progress >= 1.0 {
            self.finished = true;
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface, position: Position, card: &Card) -> bool {
        let Some(image) = card.current_image() else {
            return false;
        };
        let size = card.size();
        // 真ん中で幅 0 になって、また元の幅に戻る
        let scale_x = (1.0 - self.progress * 2.0).abs();

        surface.save();
        surface.translate(position.x + size.width / 2.0, position.y + size.height / 2.0);
        surface.scale(scale_x, 1.0);
        surface.draw_image(image, -size.width / 2.0, -size.height / 2.0, size.width, size.height);
        surface.restore();
        true
    }
}

/// オフセット位置から (0, 0) まで滑り込んでくる配りアニメーション。
///
/// 待ち時間 (`delay_ms`) の間は `delta` の位置で止まったまま。
/// 待ち時間が終わった時刻 (`開始 + delay_ms`) から `DEAL_DURATION_MS` かけて線形に戻る。
#[derive(Debug, Clone)]
pub struct Deal {
    delta: Position,
    delay_ms: f64,
    started: Option<f64>,
    finished: bool,
}

impl Deal {
    pub fn new(delta: Position, delay_ms: f64) -> Self {
        Self { delta, delay_ms: delay_ms.max(0.0), started: None, finished: false }
    }

    pub fn delta(&self) -> Position {
        self.delta
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    fn tick(&mut self, timestamp: f64, card: &mut Card) {
        let start = match self.started {
            Some(start) => start,
            None => {
                card.draw_delta = self.delta;
                self.started = Some(timestamp);
                timestamp
            }
        };

        if self.delta.is_zero() {
            card.draw_delta = Position::ZERO;
            self.finished = true;
            return;
        }

        let move_start = start + self.delay_ms;
        if timestamp < move_start {
            card.draw_delta = self.delta;
            return;
        }

        let remaining = 1.0 - ((timestamp - move_start) / DEAL_DURATION_MS).min(1.0);
        card.draw_delta = Position::new(self.delta.x * remaining, self.delta.y * remaining);
        if remaining <= 0.0 {
            self.finished = true;
        }
    }
}

/// `card.face` をコマ送りで差し替えるスプライトアニメーション。
/// `times_to_loop` が `Some(n)` (n > 0) なら n 周で終了、それ以外はずっとループ。
#[derive(Debug, Clone)]
pub struct SpriteLoop {
    name: String,
    frames: Vec<Rc<CardImage>>,
    frame_ms: f64,
    times_to_loop: Option<u32>,
    started: Option<f64>,
    original_face: Option<Option<Rc<CardImage>>>,
    finished: bool,
}

impl SpriteLoop {
    pub fn new(name: impl Into<String>, frames: Vec<Rc<CardImage>>, times_to_loop: Option<u32>) -> Self {
        Self {
            name: name.into(),
            frames,
            frame_ms: SPRITE_FRAME_MS,
            times_to_loop,
            started: None,
            original_face: None,
            finished: false,
        }
    }

    fn tick(&mut self, timestamp: f64, card: &mut Card) {
        if self.frames.is_empty() {
            self.finished = true;
            return;
        }
        let start = match self.started {
            Some(start) => start,
            None => {
                self.original_face = Some(card.face.clone());
                self.started = Some(timestamp);
                timestamp
            }
        };
        if timestamp < start {
            return;
        }

        let elapsed = timestamp - start;
        let frame = (elapsed / self.frame_ms).floor() as usize % self.frames.len();
        card.face = Some(Rc::clone(&self.frames[frame]));

        if let Some(loops) = self.times_to_loop.filter(|&n| n > 0) {
            let loop_length = self.frames.len() as f64 * self.frame_ms;
            let current_loop = (elapsed / loop_length).floor();
            if current_loop >= loops as f64 {
                self.finished = true;
            }
        }
    }

    fn clean(&mut self, card: &mut Card) {
        // take() なので2回目以降は何もしない
        if let Some(face) = self.original_face.take() {
            card.face = face;
        }
    }
}

/// 角度を [0, 2π) に正規化する。Circle のヒットテストで使うよ。
pub(crate) fn normalize_angle(angle: f64) -> f64 {
    let full = 2.0 * PI;
    let a = angle % full;
    if a < 0.0 {
        a + full
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    fn test_card() -> Card {
        Card::new("AS", Some(CardImage::new("face")), Some(CardImage::new("back")), Size::new(80.0, 100.0))
    }

    #[test]
    fn test_shake_never_finishes() {
        let mut card = test_card();
        let mut effect = Effect::shake();
        effect.tick(0.0, &mut card);
        assert_eq!(card.draw_delta(), Position::new(0.0, 1.0), "sin(0)=0, cos(0)=1 のはず");
        effect.tick(10_000.0, &mut card);
        assert!(!effect.is_finished(), "揺れは自分では終わらない");
        effect.clean(&mut card);
        assert_eq!(card.draw_delta(), Position::ZERO);
    }

    #[test]
    fn test_flip_swaps_at_midpoint() {
        let mut card = test_card();
        let mut effect = Effect::flip();
        effect.tick(1000.0, &mut card);
        assert!(!card.is_flipped(), "開始直後はまだ裏のまま");
        effect.tick(1149.0, &mut card);
        assert!(!card.is_flipped(), "半分より前は裏のまま");
        effect.tick(1150.0, &mut card);
        assert!(card.is_flipped(), "半分で表になるはず");
        assert!(!effect.is_finished());
        effect.tick(1300.0, &mut card);
        assert!(effect.is_finished(), "300ms で終わるはず");
    }

    #[test]
    fn test_flip_progress_is_clamped() {
        let mut card = test_card();
        let mut flip = Flip::default();
        flip.tick(500.0, &mut card);
        flip.tick(400.0, &mut card); // 時間が巻き戻っても落ちない
        assert_eq!(flip.progress(), 0.0);
        flip.tick(5000.0, &mut card);
        assert_eq!(flip.progress(), 1.0);
    }

    #[test]
    fn test_deal_waits_then_slides() {
        let mut card = test_card();
        let delta = Position::new(40.0, -20.0);
        let mut effect = Effect::deal(delta, 500.0);
        effect.tick(0.0, &mut card);
        assert_eq!(card.draw_delta(), delta);
        effect.tick(499.0, &mut card);
        assert_eq!(card.draw_delta(), delta, "待ち時間中は動かない");
        effect.tick(650.0, &mut card);
        assert_eq!(card.draw_delta(), Position::new(20.0, -10.0), "移動の半分");
        assert!(!effect.is_finished());
        effect.tick(800.0, &mut card);
        assert_eq!(card.draw_delta(), Position::ZERO);
        assert!(effect.is_finished());
        assert!(!card.is_dealt(), "dealt になるのは clean の時だけ");
        effect.clean(&mut card);
        assert!(card.is_dealt());
    }

    #[test]
    fn test_unfinished_deal_clean_keeps_undealt() {
        let mut card = test_card();
        let mut effect = Effect::deal(Position::new(100.0, 0.0), 0.0);
        effect.tick(0.0, &mut card);
        effect.tick(50.0, &mut card);
        effect.clean(&mut card);
        assert_eq!(card.draw_delta(), Position::ZERO);
        assert!(!card.is_dealt(), "滑り込み途中で外されたら dealt にはならない");
    }

    #[test]
    fn test_zero_deal_finishes_immediately() {
        let mut card = test_card();
        let mut effect = Effect::deal(Position::ZERO, 300.0);
        effect.tick(42.0, &mut card);
        assert!(effect.is_finished(), "移動量ゼロならすぐ終わる");
    }

    #[test]
    fn test_sprite_loops_and_restores_face() {
        let mut card = test_card();
        let frames = vec![CardImage::new("f0"), CardImage::new("f1"), CardImage::new("f2")];
        let mut effect = Effect::sprite("burn", frames, Some(2));
        assert_eq!(effect.name(), "burn");

        effect.tick(100.0, &mut card);
        assert_eq!(card.face_image().map(|i| i.key()), Some("f0"));
        effect.tick(100.0 + 35.0, &mut card);
        assert_eq!(card.face_image().map(|i| i.key()), Some("f1"));
        effect.tick(100.0 + 95.0, &mut card);
        assert_eq!(card.face_image().map(|i| i.key()), Some("f0"), "1周して最初のコマに戻る");
        assert!(!effect.is_finished());
        effect.tick(100.0 + 180.0, &mut card);
        assert!(effect.is_finished(), "2周 (180ms) で終わるはず");

        effect.clean(&mut card);
        assert_eq!(card.face_image().map(|i| i.key()), Some("face"));
        effect.clean(&mut card);
        assert_eq!(card.face_image().map(|i| i.key()), Some("face"), "clean は何度呼んでも同じ");
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-12);
    }
}
