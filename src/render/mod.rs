// src/render/mod.rs
//! 描画先 (Canvas 2D みたいな即時モードの描画面) の抽象化だよ。
//!
//! コアのロジックは `DrawSurface` トレイトにだけ依存していて、
//! ブラウザでは `app::canvas_surface::CanvasSurface`、テストでは
//! `RecordingSurface` を差し込むんだ。

pub mod recording;

pub use recording::{DrawCommand, RecordingSurface};

use std::rc::Rc;

/// 読み込み済みの画像を指すハンドル。
///
/// 画像そのものは描画面側 (Canvas なら `HtmlImageElement`) が `key` で持っていて、
/// カードは `Rc<CardImage>` を共有するだけ。読み取り専用なので何枚のカードで共有しても OK！
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardImage {
    key: String,
}

impl CardImage {
    pub fn new(key: impl Into<String>) -> Rc<Self> {
        Rc::new(Self { key: key.into() })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// 即時モードの 2D 描画面。Canvas の `CanvasRenderingContext2d` と同じ形の操作だけを要求するよ。
///
/// どのメソッドもエラーを返さない。描画の失敗は実装側でログに出して握りつぶすこと
/// (フレームごとの tick/draw からは絶対に失敗を伝播させない)。
pub trait DrawSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn draw_image(&mut self, image: &CardImage, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, x: f64, y: f64);
}
