//! Recipe model
//!
//! A recipe is an immutable, ordered list of stages. Both text dialects are
//! normalized into this one representation before anything executes.

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of actuation a stage performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StageKind {
    /// Open the water inlet (optionally dosing a chemical)
    Fill,
    /// Dose a chemical into the drum
    Dose,
    /// Drum agitation (reversing) at a speed
    Agitate,
    /// Run the drain pump
    Drain,
    /// High-speed spin with the drain open
    Spin,
    /// Action the machine has no mapping for; the timer still runs
    Custom,
}

impl StageKind {
    /// Classify a stage from its action name (case-insensitive)
    ///
    /// Unrecognized names map to [`StageKind::Custom`] so new actions never
    /// fail to parse.
    pub fn from_action(action: &str) -> Self {
        let action = action.trim();
        let is = |name: &str| action.eq_ignore_ascii_case(name);

        if is("prelavado") || is("lavado") || is("enjuague") || is("llenado") {
            StageKind::Fill
        } else if is("dosificar") || is("dosificacion") {
            StageKind::Dose
        } else if is("agitar") || is("agitacion") || is("balanceo") {
            StageKind::Agitate
        } else if is("drenaje") || is("drenado") || is("descarga") {
            StageKind::Drain
        } else if is("centrifugado") || is("spin") {
            StageKind::Spin
        } else {
            StageKind::Custom
        }
    }

    /// Speed applied when a stage of this kind does not name one
    pub fn default_speed(self) -> Speed {
        match self {
            StageKind::Spin => Speed::High,
            StageKind::Agitate => Speed::Low,
            _ => Speed::None,
        }
    }
}

/// Inlet water selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WaterTemperature {
    Cold,
    Hot,
    /// No water for this stage
    #[default]
    None,
}

/// Drum motor speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Speed {
    Low,
    Medium,
    High,
    /// Motor not used by this stage
    #[default]
    None,
}

/// Chemical dosing channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChemicalId {
    A,
    B,
    C,
    D,
}

impl ChemicalId {
    /// All channels, in dosing order
    pub const ALL: [ChemicalId; 4] = [ChemicalId::A, ChemicalId::B, ChemicalId::C, ChemicalId::D];

    /// Identifier as written in recipes and on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            ChemicalId::A => "A",
            ChemicalId::B => "B",
            ChemicalId::C => "C",
            ChemicalId::D => "D",
        }
    }

    /// Look up a channel by identifier (case-insensitive)
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(token))
    }
}

/// One actuation phase of a cycle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stage {
    /// What the machine does during this stage
    pub kind: StageKind,
    /// Action name as written (lowercase), kept for display and serialization
    pub label: String,
    /// Stage length in whole seconds
    pub duration_s: u32,
    /// Inlet water
    pub water: WaterTemperature,
    /// Chemical dosed during this stage
    pub chemical: Option<ChemicalId>,
    /// Motor speed
    pub speed: Speed,
}

impl Stage {
    /// Create a stage with no water, chemical or speed
    pub fn new(kind: StageKind, label: &str, duration_s: u32) -> Self {
        Self {
            kind,
            label: label.trim().to_ascii_lowercase(),
            duration_s,
            water: WaterTemperature::None,
            chemical: None,
            speed: Speed::None,
        }
    }

    /// Set the inlet water
    pub fn with_water(mut self, water: WaterTemperature) -> Self {
        self.water = water;
        self
    }

    /// Set the dosed chemical
    pub fn with_chemical(mut self, chemical: ChemicalId) -> Self {
        self.chemical = Some(chemical);
        self
    }

    /// Set the motor speed
    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    /// Check whether this stage opens the water inlet
    pub fn uses_water(&self) -> bool {
        self.water != WaterTemperature::None || self.kind == StageKind::Fill
    }
}

/// Immutable, validated cycle description
///
/// Produced only by the parser (or decoded from a repository that stored a
/// parsed recipe). The sequencer reads it but never changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Recipe {
    name: String,
    stages: Vec<Stage>,
}

impl Recipe {
    pub(crate) fn new(name: String, stages: Vec<Stage>) -> Self {
        Self { name, stages }
    }

    /// Recipe name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stages in execution order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Stage at `index`, if any
    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check whether the recipe has no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Sum of all stage durations in seconds
    ///
    /// Computed on every call.
    pub fn total_duration_s(&self) -> u64 {
        self.stages.iter().map(|s| u64::from(s.duration_s)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_kind_from_action() {
        assert_eq!(StageKind::from_action("Prelavado"), StageKind::Fill);
        assert_eq!(StageKind::from_action("ENJUAGUE"), StageKind::Fill);
        assert_eq!(StageKind::from_action("dosificar"), StageKind::Dose);
        assert_eq!(StageKind::from_action("balanceo"), StageKind::Agitate);
        assert_eq!(StageKind::from_action("descarga"), StageKind::Drain);
        assert_eq!(StageKind::from_action(" spin "), StageKind::Spin);
        assert_eq!(StageKind::from_action("secado"), StageKind::Custom);
    }

    #[test]
    fn test_default_speed() {
        assert_eq!(StageKind::Spin.default_speed(), Speed::High);
        assert_eq!(StageKind::Agitate.default_speed(), Speed::Low);
        assert_eq!(StageKind::Fill.default_speed(), Speed::None);
    }

    #[test]
    fn test_chemical_tokens() {
        assert_eq!(ChemicalId::from_token("b"), Some(ChemicalId::B));
        assert_eq!(ChemicalId::from_token(" D"), Some(ChemicalId::D));
        assert_eq!(ChemicalId::from_token("E"), None);
    }

    #[test]
    fn test_total_duration_tracks_stages() {
        let recipe = Recipe::new(
            String::from("demo"),
            vec![
                Stage::new(StageKind::Fill, "lavado", 120),
                Stage::new(StageKind::Custom, "pausa", 0),
                Stage::new(StageKind::Spin, "centrifugado", 180),
            ],
        );
        assert_eq!(recipe.total_duration_s(), 300);
        assert_eq!(recipe.len(), 3);
    }

    #[test]
    fn test_stage_label_normalized() {
        let stage = Stage::new(StageKind::Fill, "  LaVaDo ", 10);
        assert_eq!(stage.label, "lavado");
        assert!(stage.uses_water());
        assert!(!Stage::new(StageKind::Dose, "dosificar", 5).uses_water());
    }
}
