// src/config/layout.rs
//! 画面レイアウトとアニメーションのタイミングに関する定数を定義するよ！
//! 時間の単位はすべてミリ秒 (requestAnimationFrame のタイムスタンプと同じ)。

// --- カードと Canvas ---
pub const DEFAULT_CARD_WIDTH: f64 = 100.0; // CardLibrary のデフォルトのカード幅
pub const DEFAULT_CARD_HEIGHT: f64 = 100.0; // CardLibrary のデフォルトのカード高さ
pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

// --- アニメーション ---
pub const FLIP_DURATION_MS: f64 = 300.0; // めくりアニメーションの長さ
pub const DEAL_DURATION_MS: f64 = 300.0; // 配りアニメーションの移動時間 (待ち時間は含まない)
pub const SPRITE_FRAME_MS: f64 = 30.0; // スプライト1コマの長さ
pub const SHAKE_FREQUENCY_X: f64 = 0.02;
pub const SHAKE_FREQUENCY_Y: f64 = 0.03;
pub const SHAKE_AMPLITUDE: f64 = 1.0;

// --- コンテナ ---
pub const CIRCLE_DEAL_STAGGER_MS: f64 = 150.0; // Circle で i 番目のカードが配られるまでの遅れ (i 倍)
pub const GRID_DEAL_STAGGER_MS: f64 = 300.0; // Grid で中心からの距離1つ分の遅れ
pub const GRID_CELL_SIZE: f64 = 100.0;
pub const FAN_DEFAULT_RADIUS: f64 = 200.0;
pub const FAN_DEFAULT_MAX_CARDS: usize = 10;

// --- トリックテイキング用レイアウト ---
pub const TRICK_CARD_SPACING: f64 = 25.0; // 手札のカード同士の間隔
pub const TRICK_DEAL_STAGGER_MS: f64 = 50.0;
pub const HAND_PADDING: f64 = 20.0; // 手札と Canvas の端の余白
pub const POLYGON_RADIUS: f64 = 250.0; // 実験的配置での手札の距離

// --- 神経衰弱 ---
pub const MEMORY_MISMATCH_DELAY_MS: f64 = 1000.0; // 外れた2枚を裏返すまでの待ち時間
pub const MEMORY_RESTART_DELAY_MS: f64 = 500.0;
