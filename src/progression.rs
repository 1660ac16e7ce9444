use crate::appearance::Appearance;
use crate::engine::GameEvents;
use crate::flavor::{Biome, Evolution, FlavorSource, GuideEvent};
use crate::log;
use crate::snake::DeathReason;

pub const POINTS_PER_LEVEL: u32 = 50;
pub const POINTS_PER_EVOLUTION: u32 = 100;

/// Host-side reaction to score and game-over events: levels, biomes,
/// evolutions and the guide's running commentary.
pub struct Progression<F: FlavorSource> {
    flavor: F,
    pub score: u32,
    pub level: u32,
    pub biome: Biome,
    pub evolution: Option<Evolution>,
    pub guide: String,
    pub appearance: Appearance,
    pub death: Option<DeathReason>,
}

impl<F: FlavorSource> Progression<F> {
    pub fn new(mut flavor: F, appearance: Appearance) -> Self {
        let guide = flavor.guide_message(&GuideEvent::GameStart);
        Progression {
            flavor,
            score: 0,
            level: 1,
            biome: Biome::starting(),
            evolution: None,
            guide,
            appearance,
            death: None,
        }
    }

    /// Back to level one for a fresh session. The flavor source is kept.
    pub fn reset(&mut self, appearance: Appearance) {
        self.score = 0;
        self.level = 1;
        self.biome = Biome::starting();
        self.evolution = None;
        self.appearance = appearance;
        self.death = None;
        self.guide = self.flavor.guide_message(&GuideEvent::GameStart);
    }

    fn level_up(&mut self, score: u32) {
        self.level = score / POINTS_PER_LEVEL + 1;
        self.guide = self.flavor.guide_message(&GuideEvent::LevelUp { level: self.level });

        let biome = self.flavor.biome(self.level);
        self.appearance.apply_biome(&biome.bg_color, &biome.food_color);
        log!("Level {}: entering biome {:?}", self.level, biome.name);
        self.biome = biome;
    }

    fn evolve(&mut self, score: u32) {
        let evolution = self.flavor.evolution(score, self.evolution.as_ref());
        self.appearance.apply_snake(&evolution.head_color, &evolution.body_color);
        self.guide = format!("EVOLUTION DETECTED: {}!", evolution.name);
        log!("Evolved into {:?} ({})", evolution.name, evolution.ability);
        self.evolution = Some(evolution);
    }
}

impl<F: FlavorSource> GameEvents for Progression<F> {
    fn on_score_changed(&mut self, score: u32) {
        self.score = score;

        if score > 0 && score % POINTS_PER_LEVEL == 0 {
            self.level_up(score);
        }

        if score > 0 && score % POINTS_PER_EVOLUTION == 0 {
            self.evolve(score);
        }
    }

    fn on_game_over(&mut self, reason: DeathReason) {
        self.death = Some(reason);
        self.guide = self.flavor.guide_message(&GuideEvent::GameOver {
            reason: reason.flavor_line().to_string(),
            score: self.score,
        });
    }
}
