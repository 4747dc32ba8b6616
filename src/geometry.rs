// src/geometry.rs
//! Canvas 座標系で使う小さな値型たち。

use serde::{Deserialize, Serialize};

/// Canvas 上の座標 (またはオフセット) だよ。
/// カードの描画位置にも、アニメーションのズレ (draw delta) にも使う。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ZERO: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, other: Position) -> Position {
        Position { x: self.x + other.x, y: self.y + other.y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// 幅と高さ。カードのサイズ、Canvas のサイズ、グリッドのマス数などに使う。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Position {
        Position { x: self.width / 2.0, y: self.height / 2.0 }
    }
}

/// 点が矩形 (左上 + サイズ) の中にあるか。境界線上も「中」として扱う。
pub fn point_in_rect(point: Position, top_left: Position, size: Size) -> bool {
    point.x >= top_left.x
        && point.x <= top_left.x + size.width
        && point.y >= top_left.y
        && point.y <= top_left.y + size.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_in_rect_edges() {
        let top_left = Position::new(10.0, 20.0);
        let size = Size::new(100.0, 50.0);
        assert!(point_in_rect(Position::new(10.0, 20.0), top_left, size), "左上の角は中のはず");
        assert!(point_in_rect(Position::new(110.0, 70.0), top_left, size), "右下の角も中のはず");
        assert!(!point_in_rect(Position::new(9.9, 30.0), top_left, size), "左にはみ出してる");
        assert!(!point_in_rect(Position::new(50.0, 70.1), top_left, size), "下にはみ出してる");
    }

    #[test]
    fn test_position_offset() {
        let p = Position::new(1.0, 2.0).offset(Position::new(-1.0, 3.0));
        assert_eq!(p, Position::new(0.0, 5.0));
        assert!(Position::ZERO.is_zero());
        assert_eq!(Size::new(80.0, 100.0).center(), Position::new(40.0, 50.0));
    }
}
