// src/app/canvas_surface.rs
//! `DrawSurface` のブラウザ実装。`CanvasRenderingContext2d` にそのまま流すだけ！
//!
//! 画像は JS 側で読み込んだ `HtmlImageElement` をキー付きで登録しておく。
//! 描画の失敗 (`Err(JsValue)`) はフレームを止めないように、ログに出して握りつぶすよ。

use std::collections::{HashMap, HashSet};

use log::{error, warn};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::render::{CardImage, DrawSurface};

pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
    images: HashMap<String, HtmlImageElement>,
    // 1回警告したキー (毎フレーム同じ警告を出さないため)
    missing: HashSet<String>,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Self { context, images: HashMap::new(), missing: HashSet::new() }
    }

    pub fn register_image(&mut self, key: impl Into<String>, image: HtmlImageElement) {
        let key = key.into();
        self.missing.remove(&key);
        self.images.insert(key, image);
    }

    pub fn has_image(&self, key: &str) -> bool {
        self.images.contains_key(key)
    }

    fn report(what: &str, result: Result<(), JsValue>) {
        if let Err(e) = result {
            error!("CanvasSurface: {} failed: {:?}", what, e);
        }
    }
}

impl DrawSurface for CanvasSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.clear_rect(x, y, width, height);
    }

    fn draw_image(&mut self, image: &CardImage, x: f64, y: f64, width: f64, height: f64) {
        let Some(element) = self.images.get(image.key()) else {
            if self.missing.insert(image.key().to_string()) {
                warn!("CanvasSurface: image '{}' is not registered", image.key());
            }
            self.context.stroke_rect(x, y, width, height);
            return;
        };
        let result = self.context.draw_image_with_html_image_element_and_dw_and_dh(element, x, y, width, height);
        Self::report("drawImage", result);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.fill_rect(x, y, width, height);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.stroke_rect(x, y, width, height);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let result = self.context.fill_text(text, x, y);
        Self::report("fillText", result);
    }

    fn save(&mut self) {
        self.context.save();
    }

    fn restore(&mut self) {
        self.context.restore();
    }

    fn translate(&mut self, x: f64, y: f64) {
        let result = self.context.translate(x, y);
        Self::report("translate", result);
    }

    fn rotate(&mut self, angle: f64) {
        let result = self.context.rotate(angle);
        Self::report("rotate", result);
    }

    fn scale(&mut self, x: f64, y: f64) {
        let result = self.context.scale(x, y);
        Self::report("scale", result);
    }
}
