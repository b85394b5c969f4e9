use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use plotters::style::RGBColor;

#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: HashMap<String, RGBColor>,
    order: Vec<String>,
}

impl Palette {
    pub fn builtin() -> Result<Self> {
        let content = include_str!("../../assets/palettes/variable_colors.tsv");
        parse_palette_tsv(content, "built-in palette")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read palette TSV {}", path.display()))?;
        parse_palette_tsv(&content, &path.display().to_string())
    }

    pub fn with_overlay(user: Option<&Path>) -> Result<Self> {
        let mut palette = Self::builtin()?;
        if let Some(path) = user {
            palette.merge(Self::load(path)?);
        }
        Ok(palette)
    }

    /// User entries replace built-ins by name; new names are appended.
    pub fn merge(&mut self, user: Palette) {
        for name in user.order {
            if let Some(color) = user.colors.get(&name) {
                if self.colors.insert(name.clone(), *color).is_none() {
                    self.order.push(name);
                }
            }
        }
    }

    pub fn get(&self, variable: &str) -> Option<RGBColor> {
        self.colors.get(&variable.to_lowercase()).copied()
    }

    pub fn color_for(&self, variable: &str, fallback_index: usize) -> RGBColor {
        self.get(variable)
            .unwrap_or(CYCLE[fallback_index % CYCLE.len()])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn parse_palette_tsv(content: &str, source: &str) -> Result<Palette> {
    let mut palette = Palette::default();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').collect();
        if parts.len() != 2 {
            bail!("{}:{} malformed TSV (expected 2 columns)", source, line_no);
        }
        let name = parts[0].trim().to_lowercase();
        let color = parse_color(parts[1].trim())
            .ok_or_else(|| anyhow::anyhow!("{}:{} unknown color '{}'", source, line_no, parts[1]))?;
        if palette.colors.insert(name.clone(), color).is_none() {
            palette.order.push(name);
        }
    }
    Ok(palette)
}

pub fn parse_color(s: &str) -> Option<RGBColor> {
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(RGBColor(channel(0)?, channel(2)?, channel(4)?));
    }
    let lower = s.to_lowercase();
    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, (r, g, b))| RGBColor(*r, *g, *b))
}

pub const CYCLE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

pub const SET2: [RGBColor; 8] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
    RGBColor(231, 138, 195),
    RGBColor(166, 216, 84),
    RGBColor(255, 217, 47),
    RGBColor(229, 196, 148),
    RGBColor(179, 179, 179),
];

pub fn group_color(index: usize) -> RGBColor {
    SET2[index % SET2.len()]
}

pub fn viridis(t: f64) -> RGBColor {
    const STOPS: [(f64, f64, f64); 5] = [
        (68.0, 1.0, 84.0),
        (59.0, 82.0, 139.0),
        (33.0, 145.0, 140.0),
        (94.0, 201.0, 98.0),
        (253.0, 231.0, 37.0),
    ];
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pos = t * (STOPS.len() - 1) as f64;
    let i = (pos.floor() as usize).min(STOPS.len() - 2);
    let f = pos - i as f64;
    let (a, b) = (STOPS[i], STOPS[i + 1]);
    let mix = |x: f64, y: f64| (x + (y - x) * f).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("gold", (255, 215, 0)),
    ("darkkhaki", (189, 183, 107)),
    ("olive", (128, 128, 0)),
    ("olivedrab", (107, 142, 35)),
    ("darkgreen", (0, 100, 0)),
    ("violet", (238, 130, 238)),
    ("dodgerblue", (30, 144, 255)),
    ("saddlebrown", (139, 69, 19)),
    ("deepskyblue", (0, 191, 255)),
    ("mediumblue", (0, 0, 205)),
    ("orangered", (255, 69, 0)),
    ("hotpink", (255, 105, 180)),
    ("dimgray", (105, 105, 105)),
    ("lightsalmon", (255, 160, 122)),
    ("slategray", (112, 128, 144)),
    ("darkcyan", (0, 139, 139)),
    ("chocolate", (210, 105, 30)),
    ("mediumorchid", (186, 85, 211)),
    ("darkred", (139, 0, 0)),
    ("deeppink", (255, 20, 147)),
    ("darkgoldenrod", (184, 134, 11)),
    ("crimson", (220, 20, 60)),
    ("cadetblue", (95, 158, 160)),
    ("rebeccapurple", (102, 51, 153)),
    ("mediumslateblue", (123, 104, 238)),
    ("lightslategrey", (119, 136, 153)),
    ("lightslategray", (119, 136, 153)),
    ("lightgrey", (211, 211, 211)),
    ("whitesmoke", (245, 245, 245)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("teal", (0, 128, 128)),
    ("navy", (0, 0, 128)),
];
