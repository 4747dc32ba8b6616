// src/table.rs
//! ゲーム画面 (テーブル) に置かれたコンテナたちの登録簿。
//!
//! コンテナは役割 (`ContainerRole`) で引けるようになっていて、
//! フレームもポインタ入力も登録した順番に配っていくよ。

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::container::CardContainer;
use crate::drawable::Action;
use crate::geometry::{Position, Size};
use crate::render::DrawSurface;
use crate::slot::CardSlot;

/// テーブル上のコンテナの役割。1つの役割に1つのコンテナ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerRole {
    /// 円形の盤面など、ゲームのメインの場。
    Board,
    /// 神経衰弱のマス目。
    Grid,
    /// プレイヤー1人だけのゲームの手札。
    Hand,
    /// トリックテイキングの i 番目のプレイヤーの手札。
    Player(u8),
    /// 場に出たカード。
    Trick,
}

pub struct Table<T> {
    canvas: Size,
    containers: Vec<(ContainerRole, Box<dyn CardContainer<T>>)>,
}

impl<T: 'static> Table<T> {
    pub fn new(canvas: Size) -> Self {
        Self { canvas, containers: Vec::new() }
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// 同じ役割のコンテナがもうあれば差し替える (順番はそのまま)。
    pub fn register_container(&mut self, role: ContainerRole, container: Box<dyn CardContainer<T>>) {
        match self.containers.iter_mut().find(|(r, _)| *r == role) {
            Some(entry) => {
                debug!("Table: replace container {:?}", role);
                entry.1 = container;
            }
            None => {
                info!("Table: register container {:?}", role);
                self.containers.push((role, container));
            }
        }
    }

    pub fn remove_container(&mut self, role: ContainerRole) -> Option<Box<dyn CardContainer<T>>> {
        let index = self.containers.iter().position(|(r, _)| *r == role)?;
        Some(self.containers.remove(index).1)
    }

    pub fn container(&self, role: ContainerRole) -> Option<&(dyn CardContainer<T> + 'static)> {
        self.containers.iter().find(|(r, _)| *r == role).map(|(_, c)| c.as_ref())
    }

    pub fn container_mut(&mut self, role: ContainerRole) -> Option<&mut (dyn CardContainer<T> + 'static)> {
        self.containers.iter_mut().find(|(r, _)| *r == role).map(|(_, c)| c.as_mut())
    }

    /// 登録順の役割一覧。
    pub fn roles(&self) -> Vec<ContainerRole> {
        self.containers.iter().map(|(role, _)| *role).collect()
    }

    pub fn slot(&self, role: ContainerRole, index: usize) -> Option<&CardSlot<T>> {
        self.container(role)?.slots().get(index)
    }

    pub fn slot_mut(&mut self, role: ContainerRole, index: usize) -> Option<&mut CardSlot<T>> {
        self.container_mut(role)?.slots_mut().get_mut(index)
    }

    pub fn clear(&mut self) {
        self.containers.clear();
    }

    /// 画面を消してから、登録順に各コンテナの tick + draw。
    pub fn next_frame(&mut self, timestamp: f64, surface: &mut dyn DrawSurface) {
        surface.clear_rect(0.0, 0.0, self.canvas.width, self.canvas.height);
        for (_, container) in self.containers.iter_mut() {
            container.next_frame(timestamp, surface);
        }
    }

    pub fn on_mouse_move(&mut self, position: Position) {
        for (_, container) in self.containers.iter_mut() {
            container.on_mouse_move(position);
            for slot in container.slots_mut() {
                for drawable in slot.drawables_mut() {
                    drawable.on_mouse_move(position);
                }
            }
        }
    }

    /// 最初にヒットしたコンテナで打ち切って、(役割, スロット番号) を返す。
    /// Drawable (ボタンなど) には全部押下を伝える。
    pub fn on_mouse_left_click(&mut self, position: Position) -> (Option<(ContainerRole, usize)>, Vec<Action>) {
        let mut actions = Vec::new();
        for (_, container) in self.containers.iter_mut() {
            for slot in container.slots_mut() {
                for drawable in slot.drawables_mut() {
                    actions.extend(drawable.on_mouse_left_click(position));
                }
            }
        }

        let hit = self
            .containers
            .iter()
            .find_map(|(role, container)| container.hit_test(position).map(|index| (*role, index)));
        if let Some((role, index)) = hit {
            debug!("Table: click on {:?} slot {}", role, index);
        }
        (hit, actions)
    }

    pub fn on_mouse_left_click_release(&mut self, position: Position) -> Vec<Action> {
        let mut actions = Vec::new();
        for (_, container) in self.containers.iter_mut() {
            container.on_mouse_left_click_release(position);
            for slot in container.slots_mut() {
                for drawable in slot.drawables_mut() {
                    actions.extend(drawable.on_mouse_left_click_release(position));
                }
            }
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::tests::card_named;
    use crate::container::{CardsSettingOptions, Grid, Stack, StackOptions};
    use crate::drawable::Button;
    use crate::render::{DrawCommand, RecordingSurface};

    fn stack_at(x: f64, names: &[&str]) -> Box<dyn CardContainer<()>> {
        let options = StackOptions { position: Position::new(x, 0.0), ..Default::default() };
        let mut stack = Stack::new(200.0, Size::new(80.0, 100.0), options);
        stack.set_cards(names.iter().map(|n| card_named(n)).collect(), CardsSettingOptions::flipped());
        Box::new(stack)
    }

    #[test]
    fn test_register_and_replace() {
        let mut table: Table<()> = Table::new(Size::new(800.0, 600.0));
        table.register_container(ContainerRole::Player(0), stack_at(0.0, &["AS"]));
        table.register_container(ContainerRole::Trick, stack_at(300.0, &["KS"]));
        table.register_container(ContainerRole::Player(0), stack_at(0.0, &["2S", "3S"]));
        assert_eq!(table.roles(), vec![ContainerRole::Player(0), ContainerRole::Trick], "差し替えても順番は同じ");
        assert_eq!(table.container(ContainerRole::Player(0)).map(|c| c.get_cards().len()), Some(2));
        assert!(table.container(ContainerRole::Board).is_none());
        assert!(table.remove_container(ContainerRole::Trick).is_some());
        assert_eq!(table.roles(), vec![ContainerRole::Player(0)]);
    }

    #[test]
    fn test_first_hit_wins() {
        let mut table: Table<()> = Table::new(Size::new(800.0, 600.0));
        // 2つのスタックが重なっている: 先に登録した方が勝つ
        table.register_container(ContainerRole::Hand, stack_at(0.0, &["AH", "KH"]));
        table.register_container(ContainerRole::Trick, stack_at(150.0, &["QH"]));
        let (hit, actions) = table.on_mouse_left_click(Position::new(160.0, 10.0));
        assert_eq!(hit, Some((ContainerRole::Hand, 1)));
        assert!(actions.is_empty());

        let (hit, _) = table.on_mouse_left_click(Position::new(200.0, 10.0));
        assert_eq!(hit, Some((ContainerRole::Trick, 0)), "Hand から外れたら次のコンテナ");
        let (hit, _) = table.on_mouse_left_click(Position::new(700.0, 500.0));
        assert_eq!(hit, None);
        assert_eq!(table.slot(ContainerRole::Trick, 0).and_then(|s| s.card()).map(|c| c.name()), Some("QH"));
    }

    #[test]
    fn test_frame_clears_then_draws_in_registration_order() {
        let mut table: Table<()> = Table::new(Size::new(800.0, 600.0));
        table.register_container(ContainerRole::Trick, stack_at(300.0, &["KS"]));
        table.register_container(ContainerRole::Hand, stack_at(0.0, &["AS"]));
        let mut surface = RecordingSurface::new();
        table.next_frame(0.0, &mut surface);
        assert_eq!(surface.commands()[0], DrawCommand::ClearRect { x: 0.0, y: 0.0, width: 800.0, height: 600.0 });
        assert_eq!(surface.image_keys(), vec!["KS-face", "AS-face"]);
    }

    #[test]
    fn test_button_action_on_release() {
        let mut table: Table<()> = Table::new(Size::new(800.0, 600.0));
        table.register_container(ContainerRole::Hand, stack_at(0.0, &["AS"]));
        let action = Action::new("pass", serde_json::Value::Null);
        let button = Button::new("Pass", Position::new(0.0, 110.0), Size::new(80.0, 20.0), action.clone());
        table.slot_mut(ContainerRole::Hand, 0).expect("スロット").add_drawable(Box::new(button));

        let mut surface = RecordingSurface::new();
        table.next_frame(0.0, &mut surface);
        let inside = Position::new(10.0, 120.0);
        let (hit, _) = table.on_mouse_left_click(inside);
        assert_eq!(hit, None, "ボタンはカードの外");
        assert_eq!(table.on_mouse_left_click_release(inside), vec![action]);
    }

    #[test]
    fn test_button_on_grid_slot_uses_canvas_position() {
        // 4x4 のマス目は Canvas の (200, 100) から始まる
        let mut grid: Grid<()> = Grid::new(100.0);
        grid.set_grid_size(Size::new(4.0, 4.0), Size::new(800.0, 600.0));
        grid.set_cards((0..16).map(|i| card_named(&i.to_string())).collect(), CardsSettingOptions::default());
        let index = grid.slots().iter().position(|s| s.coord == Position::new(1.0, 1.0)).expect("(1, 1) のマス");

        let mut table: Table<()> = Table::new(Size::new(800.0, 600.0));
        table.register_container(ContainerRole::Grid, Box::new(grid));
        let action = Action::new("peek", serde_json::json!({ "cell": [1, 1] }));
        let button = Button::new("Peek", Position::new(10.0, 10.0), Size::new(40.0, 20.0), action.clone());
        table.slot_mut(ContainerRole::Grid, index).expect("スロット").add_drawable(Box::new(button));

        let mut surface = RecordingSurface::new();
        table.next_frame(0.0, &mut surface);
        assert!(
            surface.commands().contains(&DrawCommand::StrokeRect { x: 310.0, y: 210.0, width: 40.0, height: 20.0 }),
            "ボタンはマスの Canvas 座標 + 相対位置に描かれる"
        );

        let inside = Position::new(310.0, 210.0);
        let (hit, _) = table.on_mouse_left_click(inside);
        assert_eq!(hit, Some((ContainerRole::Grid, index)), "下のカードにも当たる");
        assert_eq!(table.on_mouse_left_click_release(inside), vec![action]);

        // マス内のローカル座標 (10, 10) の所では押せない
        let local = Position::new(15.0, 15.0);
        table.on_mouse_left_click(local);
        assert!(table.on_mouse_left_click_release(local).is_empty());
    }
}
