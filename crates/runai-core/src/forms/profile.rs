use crate::models::{ActivityLevel, Gender, UserProfile};

use super::{is_valid_input_char, FormError};

/// Longest number a numeric field accepts, e.g. "300.25"
const MAX_NUMBER_LENGTH: usize = 6;

const MAX_SPORT_GOAL_LENGTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Age,
    WeightKg,
    HeightCm,
    Gender,
    TimePerWeek,
    SleepHours,
    SportGoal,
    ActivityLevel,
}

impl ProfileField {
    /// Display order of the form
    pub const ALL: [ProfileField; 8] = [
        ProfileField::Age,
        ProfileField::WeightKg,
        ProfileField::HeightCm,
        ProfileField::Gender,
        ProfileField::TimePerWeek,
        ProfileField::SleepHours,
        ProfileField::SportGoal,
        ProfileField::ActivityLevel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Age => "Age (years)",
            ProfileField::WeightKg => "Weight (kg)",
            ProfileField::HeightCm => "Height (cm)",
            ProfileField::Gender => "Gender",
            ProfileField::TimePerWeek => "Training time (hours/week)",
            ProfileField::SleepHours => "Sleep (hours/night)",
            ProfileField::SportGoal => "Main goal",
            ProfileField::ActivityLevel => "Activity level",
        }
    }

    /// Fields that must be filled before the form can be saved
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            ProfileField::Age
                | ProfileField::WeightKg
                | ProfileField::HeightCm
                | ProfileField::TimePerWeek
        )
    }

    /// Fields edited by cycling through fixed choices instead of typing
    pub fn is_selection(&self) -> bool {
        matches!(self, ProfileField::Gender | ProfileField::ActivityLevel)
    }

    pub fn is_numeric(&self) -> bool {
        !self.is_selection() && *self != ProfileField::SportGoal
    }

    pub fn next(&self) -> Self {
        let index = Self::position(*self);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let index = Self::position(*self);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn position(field: ProfileField) -> usize {
        Self::ALL.iter().position(|f| *f == field).unwrap_or(0)
    }
}

/// Editable copy of the user's profile, held as typed text
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileForm {
    pub age: String,
    pub weight_kg: String,
    pub height_cm: String,
    pub gender: Gender,
    pub time_per_week_hours: String,
    pub sleep_hours: String,
    pub sport_goal: String,
    pub activity_level: ActivityLevel,
    pub focus: ProfileField,
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self::from_profile(&UserProfile::default())
    }
}

impl ProfileForm {
    /// Fill the form from a fetched profile; nulls become empty fields
    pub fn from_profile(profile: &UserProfile) -> Self {
        fn text<T: ToString>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        Self {
            age: text(profile.age),
            weight_kg: text(profile.weight_kg),
            height_cm: text(profile.height_cm),
            gender: profile
                .gender
                .as_deref()
                .and_then(Gender::from_wire)
                .unwrap_or_default(),
            time_per_week_hours: text(profile.time_per_week_hours),
            sleep_hours: text(profile.sleep_hours),
            sport_goal: profile.sport_goal.clone().unwrap_or_default(),
            activity_level: profile
                .activity_level
                .as_deref()
                .and_then(ActivityLevel::from_wire)
                .unwrap_or_default(),
            focus: ProfileField::Age,
        }
    }

    /// Display value of any field
    pub fn value(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Gender => self.gender.label(),
            ProfileField::ActivityLevel => self.activity_level.label(),
            _ => self.text(field).map(String::as_str).unwrap_or_default(),
        }
    }

    fn text(&self, field: ProfileField) -> Option<&String> {
        match field {
            ProfileField::Age => Some(&self.age),
            ProfileField::WeightKg => Some(&self.weight_kg),
            ProfileField::HeightCm => Some(&self.height_cm),
            ProfileField::TimePerWeek => Some(&self.time_per_week_hours),
            ProfileField::SleepHours => Some(&self.sleep_hours),
            ProfileField::SportGoal => Some(&self.sport_goal),
            ProfileField::Gender | ProfileField::ActivityLevel => None,
        }
    }

    fn text_mut(&mut self, field: ProfileField) -> Option<&mut String> {
        match field {
            ProfileField::Age => Some(&mut self.age),
            ProfileField::WeightKg => Some(&mut self.weight_kg),
            ProfileField::HeightCm => Some(&mut self.height_cm),
            ProfileField::TimePerWeek => Some(&mut self.time_per_week_hours),
            ProfileField::SleepHours => Some(&mut self.sleep_hours),
            ProfileField::SportGoal => Some(&mut self.sport_goal),
            ProfileField::Gender | ProfileField::ActivityLevel => None,
        }
    }

    /// Type a character into the focused field. Returns false if rejected.
    pub fn push_char(&mut self, c: char) -> bool {
        let field = self.focus;
        let Some(text) = self.text_mut(field) else {
            return false;
        };

        let accepted = if field.is_numeric() {
            (c.is_ascii_digit() || c == '.' || c == ',') && text.len() < MAX_NUMBER_LENGTH
        } else {
            is_valid_input_char(c) && text.chars().count() < MAX_SPORT_GOAL_LENGTH
        };
        if accepted {
            text.push(c);
        }
        accepted
    }

    pub fn pop_char(&mut self) {
        let field = self.focus;
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
    }

    /// Step the focused selection field forward or backward
    pub fn cycle_selection(&mut self, forward: bool) {
        match (self.focus, forward) {
            (ProfileField::Gender, true) => self.gender = self.gender.next(),
            (ProfileField::Gender, false) => self.gender = self.gender.prev(),
            (ProfileField::ActivityLevel, true) => self.activity_level = self.activity_level.next(),
            (ProfileField::ActivityLevel, false) => {
                self.activity_level = self.activity_level.prev()
            }
            _ => {}
        }
    }

    /// Labels of required fields that are still empty
    pub fn missing_required(&self) -> Vec<&'static str> {
        ProfileField::ALL
            .iter()
            .filter(|f| f.is_required())
            .filter(|f| self.text(**f).map_or(true, |t| t.trim().is_empty()))
            .map(|f| f.label())
            .collect()
    }

    /// True once every required field holds something
    pub fn is_submittable(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Validate and convert into the payload sent to the backend.
    /// Empty optional fields are sent as null.
    pub fn to_profile(&self) -> Result<UserProfile, FormError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        let sport_goal = self.sport_goal.trim();
        if sport_goal.chars().count() > MAX_SPORT_GOAL_LENGTH {
            return Err(FormError::TooLong {
                field: ProfileField::SportGoal.label(),
                max: MAX_SPORT_GOAL_LENGTH,
            });
        }

        Ok(UserProfile {
            age: parse_whole(&self.age, ProfileField::Age, 1, 120)?,
            weight_kg: parse_decimal(&self.weight_kg, ProfileField::WeightKg, 20.0, 300.0)?,
            height_cm: parse_whole(&self.height_cm, ProfileField::HeightCm, 50, 250)?,
            sport_goal: Some(sport_goal.to_string()).filter(|s| !s.is_empty()),
            activity_level: Some(self.activity_level.as_wire().to_string()),
            gender: Some(self.gender.as_wire().to_string()),
            time_per_week_hours: parse_decimal(
                &self.time_per_week_hours,
                ProfileField::TimePerWeek,
                0.0,
                100.0,
            )?,
            sleep_hours: parse_decimal(&self.sleep_hours, ProfileField::SleepHours, 0.0, 24.0)?,
        })
    }
}

fn parse_whole(raw: &str, field: ProfileField, min: u32, max: u32) -> Result<Option<u32>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: u32 = raw.parse().map_err(|_| FormError::InvalidNumber {
        field: field.label(),
    })?;
    if !(min..=max).contains(&value) {
        return Err(FormError::OutOfRange {
            field: field.label(),
            min: f64::from(min),
            max: f64::from(max),
        });
    }
    Ok(Some(value))
}

fn parse_decimal(raw: &str, field: ProfileField, min: f64, max: f64) -> Result<Option<f64>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    // Accept a decimal comma as well as a decimal point
    let value: f64 = raw
        .replace(',', ".")
        .parse()
        .map_err(|_| FormError::InvalidNumber {
            field: field.label(),
        })?;
    if !value.is_finite() || value < min || value > max {
        return Err(FormError::OutOfRange {
            field: field.label(),
            min,
            max,
        });
    }
    Ok(Some(value))
}
