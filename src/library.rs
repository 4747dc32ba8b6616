// src/library.rs
//! カード名 → 画像の辞書 (CardLibrary) と、名前の山札 (Deck)。
//!
//! Deck が持っているのは名前のリストだけ。`Card` は取り出す時に初めて作られる。

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::card::Card;
use crate::config::layout::{DEFAULT_CARD_HEIGHT, DEFAULT_CARD_WIDTH};
use crate::geometry::Size;
use crate::render::CardImage;

/// カードを作ってくれるもの。CardLibrary と Deck の両方がこれになる。
pub trait CardProducer {
    fn get_card(&self, name: &str) -> Option<Card>;

    /// 名前の一覧 (重複あり得る)。
    fn keys(&self) -> Vec<String>;

    fn get_random_card<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Card> {
        let keys = self.keys();
        let name = keys.choose(rng)?;
        self.get_card(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardDefinition {
    pub face: Option<Rc<CardImage>>,
    pub back: Option<Rc<CardImage>>,
}

#[derive(Debug, Clone)]
pub struct CardLibrary {
    definitions: HashMap<String, CardDefinition>,
    /// 登録順。`keys()` はこの順番で返す。
    order: Vec<String>,
    default_reverse: Option<Rc<CardImage>>,
    default_size: Size,
}

impl Default for CardLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl CardLibrary {
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
            order: Vec::new(),
            default_reverse: None,
            default_size: Size::new(DEFAULT_CARD_WIDTH, DEFAULT_CARD_HEIGHT),
        }
    }

    /// 裏面を指定しないで登録したカードが使う裏面。登録より前に設定しておくこと。
    pub fn set_default_reverse(&mut self, image: Rc<CardImage>) {
        self.default_reverse = Some(image);
    }

    pub fn set_default_size(&mut self, size: Size) {
        self.default_size = size;
    }

    pub fn default_size(&self) -> Size {
        self.default_size
    }

    /// 同じ名前で登録し直すと上書き (順番は最初の登録のまま)。
    pub fn register_definition(&mut self, name: impl Into<String>, face: Option<Rc<CardImage>>, back: Option<Rc<CardImage>>) {
        let name = name.into();
        let definition = CardDefinition { face, back: back.or_else(|| self.default_reverse.clone()) };
        if self.definitions.insert(name.clone(), definition).is_none() {
            self.order.push(name);
        }
    }

    pub fn definition(&self, name: &str) -> Option<&CardDefinition> {
        self.definitions.get(name)
    }

    pub fn has_definition(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear_library(&mut self) {
        self.definitions.clear();
        self.order.clear();
    }

    /// 指定した名前だけの山札を作る。
    pub fn extract_as_deck<I, S>(self: &Rc<Self>, names: I) -> Deck
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Deck::from_library(Rc::clone(self), names.into_iter().map(Into::into).collect())
    }

    /// 登録されている全部のカードを1枚ずつ入れた山札。
    pub fn to_deck(self: &Rc<Self>) -> Deck {
        Deck::from_library(Rc::clone(self), self.order.clone())
    }
}

impl CardProducer for CardLibrary {
    fn get_card(&self, name: &str) -> Option<Card> {
        let definition = self.definitions.get(name)?;
        Some(Card::new(name, definition.face.clone(), definition.back.clone(), self.default_size))
    }

    fn keys(&self) -> Vec<String> {
        self.order.clone()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubdeckOptions {
    pub shuffled: bool,
    /// 全部の名前を2枚ずつにする (神経衰弱のペア作り)。
    pub doubled: bool,
}

/// 名前の山札。一番上 = リストの最後。
#[derive(Debug, Clone)]
pub struct Deck {
    names: Vec<String>,
    library: Rc<CardLibrary>,
}

impl Deck {
    pub fn from_library(library: Rc<CardLibrary>, names: Vec<String>) -> Self {
        Self { names, library }
    }

    pub fn size(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// 一番上を1枚引く。ライブラリに無い名前だったら捨てて None。
    pub fn draw(&mut self) -> Option<Card> {
        let name = self.names.pop()?;
        let card = self.library.get_card(&name);
        if card.is_none() {
            warn!("Deck: no definition for {}", name);
        }
        card
    }

    /// 上から `n` 枚 (足りなければあるだけ) 引く。引いた順に並ぶ。
    pub fn draw_cards(&mut self, n: usize) -> Vec<Card> {
        (0..n.min(self.names.len())).filter_map(|_| self.draw()).collect()
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.names.shuffle(rng);
    }

    /// 上から `n` 枚の名前を抜き出して新しい山札にする (この山札からは無くなる)。
    pub fn subdeck<R: Rng + ?Sized>(&mut self, n: usize, options: SubdeckOptions, rng: &mut R) -> Deck {
        let at = self.names.len().saturating_sub(n);
        let mut names = self.names.split_off(at);
        if options.doubled {
            names = names.into_iter().flat_map(|name| [name.clone(), name]).collect();
        }
        if options.shuffled {
            names.shuffle(rng);
        }
        debug!("Deck: subdeck of {} names (doubled: {})", names.len(), options.doubled);
        Deck::from_library(Rc::clone(&self.library), names)
    }

    /// `other` を下に重ねる。
    pub fn join(&mut self, other: Deck) {
        let mut names = other.names;
        names.append(&mut self.names);
        self.names = names;
    }

    /// 最初に見つかった同名の1枚を抜く。
    pub fn remove_card(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(index) => {
                self.names.remove(index);
                true
            }
            None => false,
        }
    }

    /// 山札は変えずに、全部のカードを (リストの順で) 作る。
    pub fn get_cards(&self) -> Vec<Card> {
        self.names.iter().filter_map(|name| self.library.get_card(name)).collect()
    }
}

impl CardProducer for Deck {
    fn get_card(&self, name: &str) -> Option<Card> {
        if !self.names.iter().any(|n| n == name) {
            return None;
        }
        self.library.get_card(name)
    }

    fn keys(&self) -> Vec<String> {
        self.names.clone()
    }
}
