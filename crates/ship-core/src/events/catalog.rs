//! Event Catalog
//!
//! The fixed repertoire of things that can happen on board: everyday
//! incidents, ship-wide crises and the questions the passengers argue about.

use crate::components::character::{GroupIdentity, Ideology};

/// What an incident changes, and on whom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactKind {
    /// Trust in the captain of everyone affected
    Trust,
    /// Ship-wide philosophical tension; also erodes cohesion
    Tension,
    /// Ship-wide social cohesion
    Cohesion,
    /// Stress of everyone affected
    Stress,
    /// Named needs of everyone affected who has them
    Morality,
    Safety,
    Warmth,
    Food,
}

impl ImpactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactKind::Trust => "trust",
            ImpactKind::Tension => "tension",
            ImpactKind::Cohesion => "cohesion",
            ImpactKind::Stress => "stress",
            ImpactKind::Morality => "morality",
            ImpactKind::Safety => "safety",
            ImpactKind::Warmth => "warmth",
            ImpactKind::Food => "food",
        }
    }

    /// The need this impact acts on, if it targets a need
    pub fn need(&self) -> Option<&'static str> {
        match self {
            ImpactKind::Morality | ImpactKind::Safety | ImpactKind::Warmth | ImpactKind::Food => {
                Some(self.as_str())
            }
            _ => None,
        }
    }
}

/// Everyday incidents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentKind {
    Theft,
    Fight,
    Accident,
    DogAbuse,
    Scarcity,
    RationCut,
}

impl IncidentKind {
    /// Incidents that can strike on any day
    pub const RANDOM: [IncidentKind; 4] = [
        IncidentKind::Theft,
        IncidentKind::Fight,
        IncidentKind::Accident,
        IncidentKind::DogAbuse,
    ];

    pub fn subtype(&self) -> &'static str {
        match self {
            IncidentKind::Theft => "theft",
            IncidentKind::Fight => "fight",
            IncidentKind::Accident => "accident",
            IncidentKind::DogAbuse => "dog_abuse",
            IncidentKind::Scarcity => "scarcity",
            IncidentKind::RationCut => "ration_cut",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            IncidentKind::Theft => "Someone stole food from the kitchen",
            IncidentKind::Fight => "A fight broke out between crew members",
            IncidentKind::Accident => "A worker was injured on deck",
            IncidentKind::DogAbuse => "The dog was kicked by an officer",
            IncidentKind::Scarcity => "Blankets are running out due to extreme cold",
            IncidentKind::RationCut => "Food rations were cut again",
        }
    }

    pub fn affected_groups(&self) -> &'static [GroupIdentity] {
        match self {
            IncidentKind::Theft => &[GroupIdentity::Workers, GroupIdentity::Authority],
            IncidentKind::Fight | IncidentKind::Accident => &[GroupIdentity::Workers],
            IncidentKind::DogAbuse => &[GroupIdentity::Religious, GroupIdentity::Authority],
            IncidentKind::Scarcity => &[GroupIdentity::Women, GroupIdentity::Workers],
            IncidentKind::RationCut => &[GroupIdentity::Workers, GroupIdentity::Women],
        }
    }

    pub fn impacts(&self) -> &'static [(ImpactKind, f32)] {
        match self {
            IncidentKind::Theft => &[(ImpactKind::Trust, -5.0), (ImpactKind::Tension, 10.0)],
            IncidentKind::Fight => &[(ImpactKind::Cohesion, -8.0), (ImpactKind::Stress, 5.0)],
            IncidentKind::Accident => &[(ImpactKind::Safety, -10.0), (ImpactKind::Stress, 8.0)],
            IncidentKind::DogAbuse => &[(ImpactKind::Morality, -10.0), (ImpactKind::Tension, 8.0)],
            IncidentKind::Scarcity => &[(ImpactKind::Warmth, -15.0), (ImpactKind::Tension, 12.0)],
            IncidentKind::RationCut => &[(ImpactKind::Food, -10.0), (ImpactKind::Stress, 5.0)],
        }
    }

    /// Magnitude of the net impact; what a witness carries away emotionally
    pub fn emotional_impact(&self) -> f32 {
        self.impacts().iter().map(|(_, v)| v).sum::<f32>().abs()
    }

    pub fn is_scarcity(&self) -> bool {
        matches!(
            self,
            IncidentKind::Theft | IncidentKind::Scarcity | IncidentKind::RationCut
        )
    }
}

/// How each ideology makes sense of a disturbing incident
pub fn interpretation(ideology: Ideology) -> &'static str {
    match ideology {
        Ideology::Authoritarian => "This disrupts order. Authority must be maintained.",
        Ideology::Revolutionary => "This is systemic oppression. We must resist!",
        Ideology::Liberal => "This violates individual rights. We need reform.",
        Ideology::Conservative => "This shows moral decay. Return to tradition.",
        Ideology::Reformist => "This shows we need gradual improvements.",
        Ideology::Anarchist => "This proves all hierarchy is corrupt.",
    }
}

/// Who an ideology holds responsible when something goes wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blame {
    /// Whoever is in command
    Captain,
    /// The officers who carry out orders
    Officers,
    /// The crew member least loyal to the captain
    Troublemaker,
    /// The system, not a person
    Nobody,
}

pub fn blame(ideology: Ideology) -> Blame {
    match ideology {
        Ideology::Authoritarian | Ideology::Conservative => Blame::Troublemaker,
        Ideology::Revolutionary | Ideology::Anarchist => Blame::Captain,
        Ideology::Liberal => Blame::Officers,
        Ideology::Reformist => Blame::Nobody,
    }
}

/// Ship-wide crises, drawn by weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrisisKind {
    FoodShortage,
    SilentRebellion,
    EngineBreakdown,
    PhilosophicalDilemma,
}

/// Per-character effect of a crisis at full severity
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrisisEffects {
    /// Loss of physiological wellbeing (0..1)
    pub hunger: f32,
    /// Loss of psychological wellbeing (0..1)
    pub moral_distress: f32,
    /// Anger gained (0..1)
    pub conflict: f32,
    /// Stress gained, as a fraction of the 0..100 scale
    pub stress: f32,
    /// Trust in the captain lost, as a fraction of the 0..100 scale
    pub trust_loss: f32,
    pub cooperation_gain: f32,
    pub cooperation_loss: f32,
    pub rebellion_gain: f32,
}

impl CrisisKind {
    pub const ALL: [CrisisKind; 4] = [
        CrisisKind::FoodShortage,
        CrisisKind::SilentRebellion,
        CrisisKind::EngineBreakdown,
        CrisisKind::PhilosophicalDilemma,
    ];

    pub fn subtype(&self) -> &'static str {
        match self {
            CrisisKind::FoodShortage => "food_shortage",
            CrisisKind::SilentRebellion => "silent_rebellion",
            CrisisKind::EngineBreakdown => "engine_breakdown",
            CrisisKind::PhilosophicalDilemma => "philosophical_dilemma",
        }
    }

    pub fn weight(&self) -> f32 {
        match self {
            CrisisKind::FoodShortage => 3.0,
            CrisisKind::SilentRebellion => 1.0,
            CrisisKind::EngineBreakdown => 2.0,
            CrisisKind::PhilosophicalDilemma => 0.5,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CrisisKind::FoodShortage => {
                "Food supplies are running out faster than expected. Tensions are rising."
            }
            CrisisKind::SilentRebellion => {
                "Some of the crew secretly begin to sabotage, believing the leadership is unfair."
            }
            CrisisKind::EngineBreakdown => {
                "The engine has broken down. Volunteers are needed for repairs."
            }
            CrisisKind::PhilosophicalDilemma => {
                "Only one more person can be taken aboard. Should they be, or do the ship's morals come first?"
            }
        }
    }

    pub fn effects(&self) -> CrisisEffects {
        match self {
            CrisisKind::FoodShortage => CrisisEffects {
                hunger: 0.5,
                conflict: 0.3,
                cooperation_loss: 0.2,
                ..Default::default()
            },
            CrisisKind::SilentRebellion => CrisisEffects {
                trust_loss: 0.4,
                rebellion_gain: 0.5,
                ..Default::default()
            },
            CrisisKind::EngineBreakdown => CrisisEffects {
                stress: 0.3,
                cooperation_gain: 0.4,
                ..Default::default()
            },
            CrisisKind::PhilosophicalDilemma => CrisisEffects {
                moral_distress: 0.6,
                cooperation_loss: 0.1,
                ..Default::default()
            },
        }
    }
}

/// A question that splits the passengers along ideological lines
#[derive(Debug, Clone, Copy)]
pub struct PhilosophicalQuestion {
    pub question: &'static str,
    perspectives: &'static [(Ideology, &'static str)],
}

impl PhilosophicalQuestion {
    pub fn perspective(&self, ideology: Ideology) -> &'static str {
        self.perspectives
            .iter()
            .find(|(i, _)| *i == ideology)
            .map(|(_, answer)| *answer)
            .unwrap_or("No clear answer")
    }
}

pub const PHILOSOPHICAL_QUESTIONS: [PhilosophicalQuestion; 3] = [
    PhilosophicalQuestion {
        question: "What is the meaning of this voyage?",
        perspectives: &[
            (Ideology::Authoritarian, "To maintain order and hierarchy"),
            (Ideology::Revolutionary, "To overthrow oppressive structures"),
            (Ideology::Conservative, "To preserve traditional values"),
            (Ideology::Liberal, "To ensure everyone's rights are protected"),
            (Ideology::Anarchist, "To abolish all authority"),
        ],
    },
    PhilosophicalQuestion {
        question: "Is God punishing us?",
        perspectives: &[
            (Ideology::Conservative, "Yes, for abandoning traditional values"),
            (Ideology::Liberal, "God doesn't interfere in human affairs"),
            (Ideology::Revolutionary, "There is no God, only human struggle"),
            (Ideology::Authoritarian, "God supports legitimate authority"),
        ],
    },
    PhilosophicalQuestion {
        question: "What is justice?",
        perspectives: &[
            (Ideology::Authoritarian, "Justice is order and discipline"),
            (Ideology::Revolutionary, "Justice is equality and liberation"),
            (Ideology::Reformist, "Justice is gradual improvement"),
            (Ideology::Liberal, "Justice is protecting individual rights"),
        ],
    },
];
