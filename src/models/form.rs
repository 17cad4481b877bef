use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateVariant {
    #[default]
    Modern,
    Classic,
    Minimal,
}

impl TemplateVariant {
    pub const ALL: [TemplateVariant; 3] = [Self::Modern, Self::Classic, Self::Minimal];

    pub fn token(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Classic => "classic",
            Self::Minimal => "minimal",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Modern => "Clean and contemporary design with a focus on visual hierarchy",
            Self::Classic => "Traditional layout perfect for conventional industries",
            Self::Minimal => "Simple and elegant design that lets your content shine",
        }
    }
}

impl FromStr for TemplateVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.token() == s)
            .ok_or_else(|| format!("unrecognized template '{}'", s))
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccentColor {
    #[default]
    #[serde(rename = "blue-600")]
    Blue,
    #[serde(rename = "emerald-600")]
    Emerald,
    #[serde(rename = "violet-600")]
    Violet,
    #[serde(rename = "rose-600")]
    Rose,
    #[serde(rename = "amber-600")]
    Amber,
}

impl AccentColor {
    pub const ALL: [AccentColor; 5] = [
        Self::Blue,
        Self::Emerald,
        Self::Violet,
        Self::Rose,
        Self::Amber,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Self::Blue => "blue-600",
            Self::Emerald => "emerald-600",
            Self::Violet => "violet-600",
            Self::Rose => "rose-600",
            Self::Amber => "amber-600",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Blue => "Blue",
            Self::Emerald => "Emerald",
            Self::Violet => "Violet",
            Self::Rose => "Rose",
            Self::Amber => "Amber",
        }
    }

    /// RGB hex without the leading `#`.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Blue => "2563EB",
            Self::Emerald => "059669",
            Self::Violet => "7C3AED",
            Self::Rose => "E11D48",
            Self::Amber => "D97706",
        }
    }
}

impl FromStr for AccentColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.token() == s)
            .ok_or_else(|| format!("unrecognized accent color '{}'", s))
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Everything the user typed into the form. Optional fields are empty strings,
/// never missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldModel {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
    pub job_title: String,
    pub years_of_experience: String,
    pub key_skills: String,
    pub previous_roles: String,
    pub education: String,
    pub template: TemplateVariant,
    pub accent_color: AccentColor,
}

/// Names of the free-text inputs, as used in form files and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    FullName,
    Email,
    Phone,
    Location,
    Linkedin,
    Website,
    JobTitle,
    YearsOfExperience,
    KeySkills,
    PreviousRoles,
    Education,
}

impl Input {
    pub fn key(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Location => "location",
            Self::Linkedin => "linkedin",
            Self::Website => "website",
            Self::JobTitle => "jobTitle",
            Self::YearsOfExperience => "yearsOfExperience",
            Self::KeySkills => "keySkills",
            Self::PreviousRoles => "previousRoles",
            Self::Education => "education",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Location => "Location",
            Self::Linkedin => "LinkedIn Profile",
            Self::Website => "Personal Website",
            Self::JobTitle => "Desired Job Title",
            Self::YearsOfExperience => "Years of Experience",
            Self::KeySkills => "Key Skills (comma separated)",
            Self::PreviousRoles => "Previous Roles and Responsibilities",
            Self::Education => "Education Background",
        }
    }

    pub fn required(self) -> bool {
        !matches!(self, Self::Location | Self::Linkedin | Self::Website)
    }
}

pub const ALL_INPUTS: [Input; 11] = [
    Input::FullName,
    Input::Email,
    Input::Phone,
    Input::Location,
    Input::Linkedin,
    Input::Website,
    Input::JobTitle,
    Input::YearsOfExperience,
    Input::KeySkills,
    Input::PreviousRoles,
    Input::Education,
];

impl FieldModel {
    pub fn get(&self, input: Input) -> &str {
        match input {
            Input::FullName => &self.full_name,
            Input::Email => &self.email,
            Input::Phone => &self.phone,
            Input::Location => &self.location,
            Input::Linkedin => &self.linkedin,
            Input::Website => &self.website,
            Input::JobTitle => &self.job_title,
            Input::YearsOfExperience => &self.years_of_experience,
            Input::KeySkills => &self.key_skills,
            Input::PreviousRoles => &self.previous_roles,
            Input::Education => &self.education,
        }
    }

    pub fn set(&mut self, input: Input, value: impl Into<String>) {
        let slot = match input {
            Input::FullName => &mut self.full_name,
            Input::Email => &mut self.email,
            Input::Phone => &mut self.phone,
            Input::Location => &mut self.location,
            Input::Linkedin => &mut self.linkedin,
            Input::Website => &mut self.website,
            Input::JobTitle => &mut self.job_title,
            Input::YearsOfExperience => &mut self.years_of_experience,
            Input::KeySkills => &mut self.key_skills,
            Input::PreviousRoles => &mut self.previous_roles,
            Input::Education => &mut self.education,
        };
        *slot = value.into();
    }

    /// Required inputs among `inputs` that are blank.
    pub fn blank_required(&self, inputs: &[Input]) -> Vec<&'static str> {
        inputs
            .iter()
            .filter(|i| i.required() && self.get(**i).trim().is_empty())
            .map(|i| i.key())
            .collect()
    }

    pub fn missing_required(&self) -> Vec<&'static str> {
        self.blank_required(&ALL_INPUTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::ada;

    #[test]
    fn test_default_is_modern_blue() {
        let form = FieldModel::default();
        assert_eq!(form.template, TemplateVariant::Modern);
        assert_eq!(form.accent_color, AccentColor::Blue);
    }

    #[test]
    fn test_missing_required_ignores_optional() {
        let form = ada();
        assert!(form.missing_required().is_empty());

        let mut form = ada();
        form.email = "   ".into();
        form.education.clear();
        assert_eq!(form.missing_required(), vec!["email", "education"]);
    }

    #[test]
    fn test_tokens_round_trip_through_from_str() {
        for t in TemplateVariant::ALL {
            assert_eq!(t.token().parse::<TemplateVariant>().unwrap(), t);
        }
        for c in AccentColor::ALL {
            assert_eq!(c.token().parse::<AccentColor>().unwrap(), c);
        }
        assert!("fancy".parse::<TemplateVariant>().is_err());
        assert!("teal-600".parse::<AccentColor>().is_err());
    }

    #[test]
    fn test_form_file_uses_camel_case_keys() {
        let form: FieldModel = toml::from_str(
            r#"
            fullName = "Ada Lovelace"
            jobTitle = "Engineer"
            template = "classic"
            accentColor = "rose-600"
            "#,
        )
        .unwrap();
        assert_eq!(form.full_name, "Ada Lovelace");
        assert_eq!(form.job_title, "Engineer");
        assert_eq!(form.template, TemplateVariant::Classic);
        assert_eq!(form.accent_color, AccentColor::Rose);
        assert_eq!(form.location, "");
    }
}
