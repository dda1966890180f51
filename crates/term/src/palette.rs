//! Semantic color roles and the palette that maps them to colors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fb::Rgb;

/// Every color the renderer can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Background,
    Empty,
    Wall,
    Snake,
    SnakeHead,
    Apple,
    VisibleSnake,
    VisibleApple,
    VisibleWall,
    Vision,
    VisionApple,
    VisionSnake,
}

impl Role {
    pub const COUNT: usize = 12;

    pub const ALL: [Role; Role::COUNT] = [
        Role::Background,
        Role::Empty,
        Role::Wall,
        Role::Snake,
        Role::SnakeHead,
        Role::Apple,
        Role::VisibleSnake,
        Role::VisibleApple,
        Role::VisibleWall,
        Role::Vision,
        Role::VisionApple,
        Role::VisionSnake,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Background => "background",
            Role::Empty => "empty",
            Role::Wall => "wall",
            Role::Snake => "snake",
            Role::SnakeHead => "snake_head",
            Role::Apple => "apple",
            Role::VisibleSnake => "visible_snake",
            Role::VisibleApple => "visible_apple",
            Role::VisibleWall => "visible_wall",
            Role::Vision => "vision",
            Role::VisionApple => "vision_apple",
            Role::VisionSnake => "vision_snake",
        }
    }

    #[inline(always)]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette has no color for role `{0}`")]
    Missing(Role),
}

/// Immutable role -> color table. Every role always has a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb; Role::COUNT],
}

impl Palette {
    /// Build a palette from explicit entries, rejecting incomplete tables.
    ///
    /// Later entries for the same role win.
    pub fn from_entries<I>(entries: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = (Role, Rgb)>,
    {
        let mut slots: [Option<Rgb>; Role::COUNT] = [None; Role::COUNT];
        for (role, color) in entries {
            slots[role.index()] = Some(color);
        }

        let mut colors = [Rgb::default(); Role::COUNT];
        for role in Role::ALL {
            colors[role.index()] = slots[role.index()].ok_or(PaletteError::Missing(role))?;
        }
        Ok(Self { colors })
    }

    /// Copy of this palette with some roles replaced.
    pub fn with_overrides(mut self, overrides: &BTreeMap<Role, Rgb>) -> Self {
        for (&role, &color) in overrides {
            self.colors[role.index()] = color;
        }
        self
    }

    #[inline(always)]
    pub fn get(&self, role: Role) -> Rgb {
        self.colors[role.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, Rgb)> + '_ {
        Role::ALL.into_iter().map(|r| (r, self.get(r)))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: [
                Rgb::new(255, 255, 255), // background
                Rgb::new(37, 54, 69),    // empty
                Rgb::new(32, 44, 55),    // wall
                Rgb::new(46, 142, 212),  // snake
                Rgb::new(46, 142, 212),  // snake_head
                Rgb::new(227, 68, 52),   // apple
                Rgb::new(44, 112, 155),  // visible_snake
                Rgb::new(237, 37, 27),   // visible_apple
                Rgb::new(19, 28, 35),    // visible_wall
                Rgb::new(102, 119, 132), // vision
                Rgb::new(237, 37, 27),   // vision_apple
                Rgb::new(255, 0, 0),     // vision_snake
            ],
        }
    }
}
