use serde::{Deserialize, Serialize};

use crate::models::form::{AccentColor, TemplateVariant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub field: String,
    pub graduation_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub template: TemplateVariant,
    pub accent_color: AccentColor,
}

/// Validated resume content. Only the response validator builds one, and
/// nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(flatten)]
    header: Header,
    summary: String,
    experience: Vec<ExperienceEntry>,
    education: Vec<EducationEntry>,
    skills: Vec<String>,
    #[serde(flatten)]
    style: Style,
}

impl Document {
    pub(crate) fn new(
        header: Header,
        summary: String,
        experience: Vec<ExperienceEntry>,
        education: Vec<EducationEntry>,
        skills: Vec<String>,
        style: Style,
    ) -> Self {
        Self {
            header,
            summary,
            experience,
            education,
            skills,
            style,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn full_name(&self) -> &str {
        &self.header.full_name
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn experience(&self) -> &[ExperienceEntry] {
        &self.experience
    }

    pub fn education(&self) -> &[EducationEntry] {
        &self.education
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn style(&self) -> Style {
        self.style
    }
}

/// Resume produced in markup mode: a complete HTML document that passed the
/// size and structure checks.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupDocument {
    html: String,
}

impl MarkupDocument {
    pub(crate) fn new(html: String) -> Self {
        Self { html }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Whatever a successful generation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    Structured(Document),
    Markup(MarkupDocument),
}

impl Generated {
    pub fn document(&self) -> Option<&Document> {
        match self {
            Generated::Structured(doc) => Some(doc),
            Generated::Markup(_) => None,
        }
    }
}
