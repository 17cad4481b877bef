use crate::models::form::{AccentColor, TemplateVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Typeface {
    Sans,
    Serif,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Light,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    None,
    Thin,
    Thick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillsLayout {
    Pills,
    OutlinedPills,
    Grid { columns: u8 },
}

/// Presentation record for one template variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateStyle {
    pub typeface: Typeface,
    pub name_size_pt: u8,
    pub name_weight: Weight,
    pub header_align: Align,
    pub header_rule: bool,
    pub section_title_uppercase: bool,
    pub section_rule: Rule,
    pub skills: SkillsLayout,
}

static MODERN: TemplateStyle = TemplateStyle {
    typeface: Typeface::Sans,
    name_size_pt: 28,
    name_weight: Weight::Bold,
    header_align: Align::Center,
    header_rule: false,
    section_title_uppercase: false,
    section_rule: Rule::Thick,
    skills: SkillsLayout::Pills,
};

static CLASSIC: TemplateStyle = TemplateStyle {
    typeface: Typeface::Serif,
    name_size_pt: 24,
    name_weight: Weight::Bold,
    header_align: Align::Left,
    header_rule: true,
    section_title_uppercase: false,
    section_rule: Rule::Thin,
    skills: SkillsLayout::Grid { columns: 3 },
};

static MINIMAL: TemplateStyle = TemplateStyle {
    typeface: Typeface::Sans,
    name_size_pt: 24,
    name_weight: Weight::Light,
    header_align: Align::Left,
    header_rule: false,
    section_title_uppercase: true,
    section_rule: Rule::None,
    skills: SkillsLayout::OutlinedPills,
};

pub fn template_style(template: TemplateVariant) -> &'static TemplateStyle {
    match template {
        TemplateVariant::Modern => &MODERN,
        TemplateVariant::Classic => &CLASSIC,
        TemplateVariant::Minimal => &MINIMAL,
    }
}

/// Template record plus the accent it is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub template: TemplateVariant,
    pub accent: AccentColor,
    pub layout: &'static TemplateStyle,
}

impl ResolvedStyle {
    pub fn new(template: TemplateVariant, accent: AccentColor) -> Self {
        Self {
            template,
            accent,
            layout: template_style(template),
        }
    }

    pub fn accent_css(&self) -> String {
        format!("#{}", self.accent.hex())
    }
}
