//! Stroke lists: a serializable sequence of shapes brushed onto a canvas
//!
//! A [`Scene`] is plain data (circles and thick lines with a color each) that
//! can be saved to and loaded from JSON, then rasterized with a [`Pool`].

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::blend::{BlendMode, BlendTable};
use crate::error::{RasterError, Result};
use crate::geometry::IntVector2;
use crate::pixel::Color;
use crate::pool::Pool;
use crate::sprite::Sprite;

/// One shape brushed onto the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stroke {
    /// Filled disc centered on `center`
    Circle {
        center: IntVector2,
        diameter: i32,
        color: Color,
    },
    /// Round-capped line
    Line {
        start: IntVector2,
        end: IntVector2,
        thickness: i32,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default = "default_blend")]
    pub blend: BlendMode,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
}

fn default_background() -> Color {
    Color::WHITE
}

fn default_blend() -> BlendMode {
    BlendMode::Alpha
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: default_background(),
            blend: default_blend(),
            strokes: Vec::new(),
        }
    }

    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// The regression scene: a dot, two joined strokes, four small discs, a
    /// large disc, and a red/blue/green band laid over itself at `y = 3`.
    /// Laid out for a 64x64 canvas.
    pub fn reference() -> Self {
        let mut scene = Self::new("reference");
        let black = Color::BLACK;

        scene.add_stroke(Stroke::Circle {
            center: IntVector2::new(4, 4),
            diameter: 3,
            color: black,
        });
        for (start, end) in [((10, 10), (30, 20)), ((30, 20), (12, 40))] {
            scene.add_stroke(Stroke::Line {
                start: start.into(),
                end: end.into(),
                thickness: 3,
                color: black,
            });
        }
        for center in [(48, 10), (56, 10), (48, 18), (56, 18)] {
            scene.add_stroke(Stroke::Circle {
                center: center.into(),
                diameter: 4,
                color: black,
            });
        }
        scene.add_stroke(Stroke::Circle {
            center: IntVector2::new(40, 44),
            diameter: 16,
            color: black,
        });
        for (thickness, color) in [(6, Color::RED), (4, Color::BLUE), (2, Color::GREEN)] {
            scene.add_stroke(Stroke::Line {
                start: IntVector2::new(14, 3),
                end: IntVector2::new(58, 3),
                thickness,
                color,
            });
        }
        scene
    }

    /// Brush every stroke onto `canvas` (placed at the world origin), in
    /// order. Returns how many strokes touched the canvas.
    pub fn draw(&self, pool: &mut Pool<Color>, canvas: &Sprite<Color>) -> Result<usize> {
        let blend = Color::blend_fn(self.blend).ok_or_else(|| {
            RasterError::Config(format!("blend mode {:?} is not defined for colors", self.blend))
        })?;

        let mut landed = 0;
        for stroke in &self.strokes {
            let (brush, at) = match *stroke {
                Stroke::Circle {
                    center,
                    diameter,
                    color,
                } => (pool.get_circle(diameter, color)?, center),
                Stroke::Line {
                    start,
                    end,
                    thickness,
                    color,
                } => (pool.generate_line(start, end, color, thickness)?, start),
            };
            if canvas.blend(&brush, blend, IntVector2::ZERO, at) {
                landed += 1;
            }
            pool.free_sprite(brush)?;
        }

        debug!(
            "scene '{}': {} of {} strokes landed",
            self.name,
            landed,
            self.strokes.len()
        );
        Ok(landed)
    }

    /// Vend a `width x height` canvas filled with the background and draw
    /// the scene onto it
    pub fn rasterize(&self, pool: &mut Pool<Color>, width: i32, height: i32) -> Result<Sprite<Color>> {
        let canvas = pool.get_rect(width, height, IntVector2::ZERO, self.background)?;
        self.draw(pool, &canvas)?;
        Ok(canvas)
    }

    /// Save scene to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| RasterError::Config(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load scene from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| RasterError::Config(e.to_string()))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("untitled")
    }
}

/// Render a sprite one character per pixel, one line per row. Pixels that
/// match no palette entry exactly print as `unknown`.
pub fn to_ascii(sprite: &Sprite<Color>, palette: &[(Color, char)], unknown: char) -> String {
    let width = sprite.width().max(1) as usize;
    let mut out = String::with_capacity((width + 1) * sprite.height() as usize);
    for row in sprite.to_vec().chunks(width) {
        for pixel in row {
            let ch = palette
                .iter()
                .find(|(c, _)| c == pixel)
                .map_or(unknown, |&(_, ch)| ch);
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

/// Palette for the colors [`Scene::reference`] uses on a white canvas
pub const REFERENCE_PALETTE: [(Color, char); 5] = [
    (Color::WHITE, '.'),
    (Color::BLACK, '#'),
    (Color::RED, 'R'),
    (Color::GREEN, 'G'),
    (Color::BLUE, 'B'),
];
