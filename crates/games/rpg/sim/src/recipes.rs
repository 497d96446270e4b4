//! Shaped 3x3 crafting recipes.
//!
//! Matching walks [`RECIPES`] in declaration order and takes the first full
//! match. Patterns are fixed in place: a recipe does not match a shifted copy
//! of itself.

use crate::items::Item;
use std::collections::BTreeMap;

pub type CraftGrid = [[Option<Item>; 3]; 3];

#[derive(Debug)]
pub struct Recipe {
    pub output: Item,
    pub count: u32,
    /// Three rows of three symbols; a space is an empty cell.
    pub pattern: [&'static str; 3],
    pub keys: &'static [(char, Item)],
}

impl Recipe {
    fn key(&self, symbol: char) -> Option<Item> {
        self.keys
            .iter()
            .find(|(c, _)| *c == symbol)
            .map(|(_, item)| *item)
    }

    fn cell(&self, row: usize, col: usize) -> Option<char> {
        self.pattern[row].chars().nth(col).filter(|c| *c != ' ')
    }

    pub fn matches(&self, grid: &CraftGrid) -> bool {
        for (row, cells) in grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let expected = match self.cell(row, col) {
                    Some(symbol) => match self.key(symbol) {
                        Some(item) => Some(item),
                        None => return false,
                    },
                    None => None,
                };
                if *cell != expected {
                    return false;
                }
            }
        }
        true
    }

    /// Items consumed by one craft.
    pub fn ingredients(&self) -> BTreeMap<Item, u32> {
        let mut needed = BTreeMap::new();
        for row in 0..3 {
            for col in 0..3 {
                if let Some(item) = self.cell(row, col).and_then(|s| self.key(s)) {
                    *needed.entry(item).or_insert(0) += 1;
                }
            }
        }
        needed
    }
}

pub static RECIPES: &[Recipe] = &[
    Recipe {
        output: Item::IronSword,
        count: 1,
        pattern: [" I ", " IS", " T "],
        keys: &[('I', Item::IronIngot), ('S', Item::String), ('T', Item::Stick)],
    },
    Recipe {
        output: Item::WoodenSword,
        count: 1,
        pattern: [" P ", " P ", " T "],
        keys: &[('P', Item::Planks), ('T', Item::Stick)],
    },
    Recipe {
        output: Item::Bow,
        count: 1,
        pattern: [" TS", "T S", " TS"],
        keys: &[('T', Item::Stick), ('S', Item::String)],
    },
    Recipe {
        output: Item::IronHelmet,
        count: 1,
        pattern: ["III", "I I", "   "],
        keys: &[('I', Item::IronIngot)],
    },
    Recipe {
        output: Item::IronChestplate,
        count: 1,
        pattern: ["I I", "III", "III"],
        keys: &[('I', Item::IronIngot)],
    },
    Recipe {
        output: Item::Planks,
        count: 4,
        pattern: ["   ", " L ", "   "],
        keys: &[('L', Item::Log)],
    },
    Recipe {
        output: Item::Stick,
        count: 4,
        pattern: ["   ", " P ", " P "],
        keys: &[('P', Item::Planks)],
    },
];

pub fn find_recipe(grid: &CraftGrid) -> Option<&'static Recipe> {
    RECIPES.iter().find(|recipe| recipe.matches(grid))
}

pub fn match_recipe(grid: &CraftGrid) -> Option<Item> {
    find_recipe(grid).map(|recipe| recipe.output)
}
