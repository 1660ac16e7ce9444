use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Clone, Debug, PartialEq)]
pub struct Biome {
    pub name: String,
    pub description: String,
    pub bg_color: String,
    pub food_color: String,
}

impl Biome {
    pub fn starting() -> Self {
        Biome {
            name: "Digital Void".to_string(),
            description: "Where every serpent begins.".to_string(),
            bg_color: "#060608".to_string(),
            food_color: "#00E5FF".to_string(),
        }
    }

    pub fn fallback() -> Self {
        Biome {
            name: "Backup Sector".to_string(),
            description: "Emergency power only.".to_string(),
            bg_color: "#050505".to_string(),
            food_color: "#00FF00".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Evolution {
    pub name: String,
    pub description: String,
    pub ability: String,
    pub head_color: String,
    pub body_color: String,
}

impl Evolution {
    pub fn fallback() -> Self {
        Evolution {
            name: "Glitch Serpent".to_string(),
            description: "System error detected. Safe mode engaged.".to_string(),
            ability: "Stability".to_string(),
            head_color: "#FFFFFF".to_string(),
            body_color: "#888888".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GuideEvent {
    GameStart,
    LevelUp { level: u32 },
    GameOver { reason: String, score: u32 },
}

pub const SIGNAL_LOST: &str = "Signal lost...";
pub const FLAVOR_DISABLED: &str = "System: flavor text disabled.";

/// Source of narration and cosmetic variety. Implementations must not fail:
/// anything they cannot produce comes back as a fallback value.
pub trait FlavorSource {
    fn biome(&mut self, level: u32) -> Biome;
    fn evolution(&mut self, score: u32, current: Option<&Evolution>) -> Evolution;
    fn guide_message(&mut self, event: &GuideEvent) -> String;
}

const BIOME_NAMES: &[&str] = &[
    "Neon Marsh",
    "Chrome Desert",
    "Static Reef",
    "Obsidian Grid",
    "Ion Jungle",
    "Photon Tundra",
    "Circuit Canyon",
    "Plasma Lagoon",
];

const BIOME_DESCRIPTIONS: &[&str] = &[
    "Humming wires under a violet haze.",
    "Heat shimmer over endless silicon.",
    "Packets drift like plankton here.",
    "Cold light, colder edges.",
    "Overgrown with forgotten cables.",
];

// Very dark backgrounds, bright food.
const BIOME_PALETTES: &[(&str, &str)] = &[
    ("#0B0014", "#FF00E5"),
    ("#140A00", "#FFB300"),
    ("#00100E", "#00FFC6"),
    ("#0A0A0A", "#FF3D00"),
    ("#001408", "#76FF03"),
    ("#000814", "#40C4FF"),
];

const EVOLUTION_NAMES: &[&str] = &[
    "Byte Viper",
    "Quantum Asp",
    "Neon Wyrm",
    "Kernel Cobra",
    "Flux Python",
    "Vector Mamba",
];

const EVOLUTION_DESCRIPTIONS: &[&str] = &[
    "Scales refract stray packets into light.",
    "Moves between clock cycles.",
    "Its hiss is pure white noise.",
    "Compiled for speed, linked for hunger.",
];

const ABILITIES: &[&str] =
    &["Speed Boost", "Shield", "Point Multiplier", "Phase Shift", "Echo Sense"];

// Head colour with a complementary body colour.
const SNAKE_PALETTES: &[(&str, &str)] = &[
    ("#FFFFFF", "#00E676"),
    ("#FFEB3B", "#7C4DFF"),
    ("#FF4081", "#00BFA5"),
    ("#18FFFF", "#FF6E40"),
    ("#EEFF41", "#D500F9"),
];

const START_LINES: &[&str] = &[
    "Helix online. Press a direction and try not to bite yourself.",
    "Fresh grid, fresh hunger. Move when ready.",
    "Boot sequence complete. The void is waiting for you.",
];

const LEVEL_UP_LINES: &[&str] = &[
    "Sector breached. The grid is rewriting itself around you.",
    "New zone unlocked. Keep your tail out of your teeth.",
    "Level up. The walls did not get any softer.",
];

const GAME_OVER_LINES: &[&str] = &[
    "Rebooting serpent. Try again, glorious disaster.",
    "Even the best code crashes. Go again.",
    "Connection terminated. Your legend buffers.",
];

/// Offline catalogue standing in for a text-generation service.
pub struct CatalogFlavor {
    rng: StdRng,
    enabled: bool,
}

impl CatalogFlavor {
    pub fn new(seed: u64, enabled: bool) -> Self {
        CatalogFlavor { rng: StdRng::seed_from_u64(seed), enabled }
    }

    fn pick(&mut self, options: &[&'static str]) -> Option<&'static str> {
        options.choose(&mut self.rng).copied()
    }
}

impl FlavorSource for CatalogFlavor {
    fn biome(&mut self, _level: u32) -> Biome {
        if !self.enabled {
            return Biome::fallback();
        }

        let palette = BIOME_PALETTES.choose(&mut self.rng).copied();
        match (self.pick(BIOME_NAMES), self.pick(BIOME_DESCRIPTIONS), palette) {
            (Some(name), Some(description), Some((bg, food))) => Biome {
                name: name.to_string(),
                description: description.to_string(),
                bg_color: bg.to_string(),
                food_color: food.to_string(),
            },
            _ => Biome::fallback(),
        }
    }

    fn evolution(&mut self, _score: u32, current: Option<&Evolution>) -> Evolution {
        if !self.enabled {
            return Evolution::fallback();
        }

        // Re-roll once so two evolutions in a row rarely share a name.
        let mut name = self.pick(EVOLUTION_NAMES);
        if let (Some(current), Some(picked)) = (current, name) {
            if current.name == picked {
                name = self.pick(EVOLUTION_NAMES);
            }
        }

        let palette = SNAKE_PALETTES.choose(&mut self.rng).copied();
        match (name, self.pick(EVOLUTION_DESCRIPTIONS), self.pick(ABILITIES), palette) {
            (Some(name), Some(description), Some(ability), Some((head, body))) => Evolution {
                name: name.to_string(),
                description: description.to_string(),
                ability: ability.to_string(),
                head_color: head.to_string(),
                body_color: body.to_string(),
            },
            _ => Evolution::fallback(),
        }
    }

    fn guide_message(&mut self, event: &GuideEvent) -> String {
        if !self.enabled {
            return FLAVOR_DISABLED.to_string();
        }

        let line = match event {
            GuideEvent::GameStart => self.pick(START_LINES),
            GuideEvent::LevelUp { .. } => self.pick(LEVEL_UP_LINES),
            GuideEvent::GameOver { .. } => self.pick(GAME_OVER_LINES),
        };

        match (event, line) {
            (GuideEvent::LevelUp { level }, Some(line)) => format!("Level {}. {}", level, line),
            (GuideEvent::GameOver { reason, score }, Some(line)) => {
                format!("{} Score {}. {}", reason, score, line)
            }
            (_, Some(line)) => line.to_string(),
            (_, None) => SIGNAL_LOST.to_string(),
        }
    }
}
