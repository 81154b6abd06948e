use serde::{Deserialize, Serialize};

/// Personal parameters the coach tailors its advice to.
/// Every field is nullable on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<u32>,
    pub sport_goal: Option<String>,
    pub activity_level: Option<String>,
    pub gender: Option<String>,
    pub time_per_week_hours: Option<f64>,
    pub sleep_hours: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Unspecified,
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 4] = [Gender::Unspecified, Gender::Male, Gender::Female, Gender::Other];

    /// Value the backend stores
    pub fn as_wire(&self) -> &'static str {
        match self {
            Gender::Unspecified => "Non spécifié",
            Gender::Male => "Homme",
            Gender::Female => "Femme",
            Gender::Other => "Autre",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Unspecified => "Not specified",
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_wire() == value)
    }

    pub fn next(&self) -> Self {
        match self {
            Gender::Unspecified => Gender::Male,
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Other,
            Gender::Other => Gender::Unspecified,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Gender::Unspecified => Gender::Other,
            Gender::Male => Gender::Unspecified,
            Gender::Female => Gender::Male,
            Gender::Other => Gender::Female,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 4] = [
        ActivityLevel::Beginner,
        ActivityLevel::Intermediate,
        ActivityLevel::Advanced,
        ActivityLevel::Expert,
    ];

    /// Value the backend stores
    pub fn as_wire(&self) -> &'static str {
        match self {
            ActivityLevel::Beginner => "Débutant",
            ActivityLevel::Intermediate => "Intermédiaire",
            ActivityLevel::Advanced => "Avancé",
            ActivityLevel::Expert => "Expert",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Beginner => "Beginner (less than a year of running)",
            ActivityLevel::Intermediate => "Intermediate (regular, a few races)",
            ActivityLevel::Advanced => "Advanced (structured training, competitor)",
            ActivityLevel::Expert => "Expert (years of training, performance goals)",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_wire() == value)
    }

    pub fn next(&self) -> Self {
        match self {
            ActivityLevel::Beginner => ActivityLevel::Intermediate,
            ActivityLevel::Intermediate => ActivityLevel::Advanced,
            ActivityLevel::Advanced => ActivityLevel::Expert,
            ActivityLevel::Expert => ActivityLevel::Beginner,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ActivityLevel::Beginner => ActivityLevel::Expert,
            ActivityLevel::Intermediate => ActivityLevel::Beginner,
            ActivityLevel::Advanced => ActivityLevel::Intermediate,
            ActivityLevel::Expert => ActivityLevel::Advanced,
        }
    }
}
