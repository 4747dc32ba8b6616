// src/app/mod.rs
//! ブラウザとの境目。ここから下だけが web-sys (DOM と Canvas) を触るよ！

pub mod canvas_surface;
pub mod game_app;

pub use canvas_surface::CanvasSurface;
pub use game_app::GameApp;
