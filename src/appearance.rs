use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Accepts `#RRGGBB` or `#RGB`, the `#` being optional.
    pub fn parse_hex(s: &str) -> Option<Rgb> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                let channel =
                    |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Rgb::new(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => None,
        }
    }

    pub fn parse_or(s: Option<&str>, fallback: Rgb) -> Rgb {
        s.and_then(Rgb::parse_hex).unwrap_or(fallback)
    }

    /// `alpha` of 1.0 gives `self`, 0.0 gives `under`.
    pub fn blend(&self, under: Rgb, alpha: f64) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| {
            (top as f64 * alpha + bottom as f64 * (1.0 - alpha)).round() as u8
        };
        Rgb::new(mix(self.r, under.r), mix(self.g, under.g), mix(self.b, under.b))
    }
}

pub const DEFAULT_BACKGROUND: Rgb = Rgb::new(0x06, 0x06, 0x08);
pub const DEFAULT_FOOD: Rgb = Rgb::new(0x00, 0xE5, 0xFF);
pub const DEFAULT_HEAD: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
pub const DEFAULT_BODY: Rgb = Rgb::new(0x00, 0xE6, 0x76);

/// Raw colours as they come from config or flavor text. Anything may be missing or garbage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_color: Option<String>,
}

/// Resolved colours for the renderer. Never read by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Appearance {
    pub background: Rgb,
    pub grid: Rgb,
    pub food: Rgb,
    pub head: Rgb,
    pub body: Rgb,
}

impl Default for Appearance {
    fn default() -> Self {
        Appearance::with_background(DEFAULT_BACKGROUND, DEFAULT_FOOD, DEFAULT_HEAD, DEFAULT_BODY)
    }
}

impl Appearance {
    fn with_background(background: Rgb, food: Rgb, head: Rgb, body: Rgb) -> Self {
        Appearance {
            background,
            grid: grid_for(background),
            food,
            head,
            body,
        }
    }

    pub fn from_config(cfg: &AppearanceConfig) -> Self {
        Appearance::with_background(
            Rgb::parse_or(cfg.bg_color.as_deref(), DEFAULT_BACKGROUND),
            Rgb::parse_or(cfg.food_color.as_deref(), DEFAULT_FOOD),
            Rgb::parse_or(cfg.head_color.as_deref(), DEFAULT_HEAD),
            Rgb::parse_or(cfg.body_color.as_deref(), DEFAULT_BODY),
        )
    }

    /// Swaps the board colours, keeping the current ones for unusable input.
    pub fn apply_biome(&mut self, bg_color: &str, food_color: &str) {
        self.background = Rgb::parse_hex(bg_color).unwrap_or(self.background);
        self.grid = grid_for(self.background);
        self.food = Rgb::parse_hex(food_color).unwrap_or(self.food);
    }

    pub fn apply_snake(&mut self, head_color: &str, body_color: &str) {
        self.head = Rgb::parse_hex(head_color).unwrap_or(self.head);
        self.body = Rgb::parse_hex(body_color).unwrap_or(self.body);
    }

    /// Body colour for segment `index` of `len`, fading toward the background.
    pub fn segment_color(&self, index: usize, len: usize) -> Rgb {
        if index == 0 || len == 0 {
            return self.head;
        }
        let alpha = 1.0 - (index as f64 / len as f64) * 0.6;
        self.body.blend(self.background, alpha)
    }
}

// Faint white lines at 5% over the background.
fn grid_for(background: Rgb) -> Rgb {
    Rgb::new(0xFF, 0xFF, 0xFF).blend(background, 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Rgb::parse_hex("#00E5FF"), Some(Rgb::new(0, 0xE5, 0xFF)));
        assert_eq!(Rgb::parse_hex("00e5ff"), Some(Rgb::new(0, 0xE5, 0xFF)));
        assert_eq!(Rgb::parse_hex("#fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::parse_hex(" #123456 "), Some(Rgb::new(0x12, 0x34, 0x56)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        for bad in ["", "#", "#12345", "#GGGGGG", "neon green", "#1234567", "#ffé"] {
            assert_eq!(Rgb::parse_hex(bad), None, "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_missing_and_invalid_config_fall_back() {
        let cfg = AppearanceConfig {
            bg_color: None,
            food_color: Some("not a colour".to_string()),
            head_color: Some("#FF0000".to_string()),
            body_color: Some(String::new()),
        };
        let appearance = Appearance::from_config(&cfg);
        assert_eq!(appearance.background, DEFAULT_BACKGROUND);
        assert_eq!(appearance.food, DEFAULT_FOOD);
        assert_eq!(appearance.head, Rgb::new(255, 0, 0));
        assert_eq!(appearance.body, DEFAULT_BODY);
        assert_eq!(Appearance::from_config(&AppearanceConfig::default()), Appearance::default());
    }

    #[test]
    fn test_apply_biome_keeps_current_on_bad_input() {
        let mut appearance = Appearance::default();
        appearance.apply_biome("#101010", "oops");
        assert_eq!(appearance.background, Rgb::new(0x10, 0x10, 0x10));
        assert_eq!(appearance.food, DEFAULT_FOOD);
        assert_eq!(appearance.grid, grid_for(Rgb::new(0x10, 0x10, 0x10)));
    }

    #[test]
    fn test_segment_fade() {
        let appearance = Appearance::default();
        assert_eq!(appearance.segment_color(0, 4), DEFAULT_HEAD);
        let near = appearance.segment_color(1, 4);
        let far = appearance.segment_color(3, 4);
        assert!(near.g > far.g);
        assert!(far.g > appearance.background.g);
    }
}
