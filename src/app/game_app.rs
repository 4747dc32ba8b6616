// src/app/game_app.rs
//! JS から触る入口。Canvas を見つけて、カードを登録して、神経衰弱を動かすよ。
//!
//! JS 側の使い方 (だいたい):
//! ```js
//! const app = new GameApp("table", JSON.stringify({ seed: 42 }));
//! app.register_image("red", redImg);
//! app.register_card("red", "red", null);
//! app.start();
//! requestAnimationFrame(function loop(t) { app.next_frame(t); requestAnimationFrame(loop); });
//! ```

use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::app::canvas_surface::CanvasSurface;
use crate::config::TableConfig;
use crate::games::MemoryRules;
use crate::geometry::Position;
use crate::library::CardLibrary;
use crate::render::CardImage;
use crate::rules::Game;
use crate::table::Table;

// JS 側では普通の Error として catch できる
fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

/// id から Canvas と 2D コンテキストを取ってくる。
fn find_canvas(canvas_id: &str) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| js_error("No document available"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| js_error(&format!("Canvas '{}' not found", canvas_id)))?
        .dyn_into()
        .map_err(|_| js_error(&format!("Element '{}' is not a canvas", canvas_id)))?;
    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| js_error("2d context is not available"))?
        .dyn_into()
        .map_err(|_| js_error("getContext('2d') returned something else"))?;
    Ok((canvas, context))
}

#[wasm_bindgen]
pub struct GameApp {
    config: TableConfig,
    surface: CanvasSurface,
    // start() まではここにカードを登録していく
    library: CardLibrary,
    game: Option<Game<(), MemoryRules>>,
}

#[wasm_bindgen]
impl GameApp {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_json: &str) -> Result<GameApp, JsValue> {
        let config = TableConfig::from_json(config_json).map_err(|e| js_error(&e))?;
        let (canvas, context) = find_canvas(canvas_id)?;
        canvas.set_width(config.canvas.width as u32);
        canvas.set_height(config.canvas.height as u32);

        let mut library = CardLibrary::new();
        library.set_default_size(config.card_size);
        info!("GameApp: canvas '{}' ready ({:?})", canvas_id, config.canvas);
        Ok(Self { config, surface: CanvasSurface::new(context), library, game: None })
    }

    pub fn register_image(&mut self, key: &str, image: HtmlImageElement) {
        self.surface.register_image(key, image);
    }

    /// 画像キーで表と裏を指定してカードを登録する。裏が null ならデフォルトの裏面。
    pub fn register_card(&mut self, name: &str, face_key: Option<String>, back_key: Option<String>) -> Result<(), JsValue> {
        if self.game.is_some() {
            return Err(js_error("Cards must be registered before start()"));
        }
        self.library.register_definition(name, face_key.map(CardImage::new), back_key.map(CardImage::new));
        Ok(())
    }

    pub fn set_default_reverse(&mut self, key: &str) {
        self.library.set_default_reverse(CardImage::new(key));
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.game.is_some() {
            warn!("GameApp: start() called twice");
            return Ok(());
        }
        if self.library.is_empty() {
            return Err(js_error("No cards registered"));
        }
        let library = Rc::new(std::mem::take(&mut self.library));
        let table = Table::new(self.config.canvas);
        let rules = MemoryRules::new(self.config.grid, self.config.card_size.width);
        let mut game = Game::new(table, library, rules, self.config.seed);
        game.start();
        self.game = Some(game);
        Ok(())
    }

    /// requestAnimationFrame のタイムスタンプで1フレーム進める。
    pub fn next_frame(&mut self, timestamp: f64) {
        if let Some(game) = self.game.as_mut() {
            game.next_frame(timestamp, &mut self.surface);
        }
    }

    pub fn on_mouse_move(&mut self, x: f64, y: f64) {
        if let Some(game) = self.game.as_mut() {
            game.on_mouse_move(Position::new(x, y));
        }
    }

    pub fn on_mouse_down(&mut self, x: f64, y: f64) {
        if let Some(game) = self.game.as_mut() {
            game.on_mouse_down(Position::new(x, y));
        }
    }

    pub fn on_mouse_up(&mut self, x: f64, y: f64) {
        if let Some(game) = self.game.as_mut() {
            game.on_mouse_up(Position::new(x, y));
        }
    }

    /// `{"score": .., "state": "..", "game_over": ..}` の JSON 文字列。
    pub fn status_json(&self) -> Result<String, JsValue> {
        let game = self.game.as_ref().ok_or_else(|| js_error("Game is not started"))?;
        serde_json::to_string(&game.status()).map_err(|e| js_error(&format!("Failed to serialize status: {}", e)))
    }
}
