//! Field list describing the structured resume the model must return.
//!
//! The prompt compiler and the response validator both walk [`RESUME_SCHEMA`];
//! neither keeps its own copy of the field names.

use serde_json::{Map, Value, json};

use crate::models::form::{AccentColor, FieldModel, TemplateVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextSequence,
    RecordSequence(&'static [Field]),
}

impl FieldKind {
    pub fn tag(self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::TextSequence => "string-sequence",
            FieldKind::RecordSequence(_) => "record-sequence",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Text must be non-blank; sequences must hold at least one element.
    pub non_empty: bool,
    /// Placeholder shown to the model when the value is not echoed from the form.
    pub hint: &'static str,
}

const fn text(name: &'static str, non_empty: bool, hint: &'static str) -> Field {
    Field {
        name,
        kind: FieldKind::Text,
        non_empty,
        hint,
    }
}

pub const EXPERIENCE_FIELDS: &[Field] = &[
    text("company", true, "Company Name"),
    text("position", true, "Position Title"),
    text("startDate", true, "Jan 2020"),
    text("endDate", true, "Present"),
    Field {
        name: "achievements",
        kind: FieldKind::TextSequence,
        non_empty: true,
        hint: "Achievement",
    },
];

pub const EDUCATION_FIELDS: &[Field] = &[
    text("school", true, "University Name"),
    text("degree", true, "Bachelor's/Master's"),
    text("field", false, "Field of Study"),
    text("graduationDate", true, "2020"),
];

#[derive(Debug)]
pub struct Schema {
    pub fields: &'static [Field],
}

pub static RESUME_SCHEMA: Schema = Schema {
    fields: &[
        text("fullName", true, "Full Name"),
        text("title", true, "Job Title"),
        text("email", true, "Email"),
        text("phone", true, "Phone"),
        text("location", false, "City, Country"),
        text("linkedin", false, "LinkedIn URL"),
        text("website", false, "Website URL"),
        text("summary", true, "Professional summary..."),
        Field {
            name: "experience",
            kind: FieldKind::RecordSequence(EXPERIENCE_FIELDS),
            non_empty: false,
            hint: "",
        },
        Field {
            name: "education",
            kind: FieldKind::RecordSequence(EDUCATION_FIELDS),
            non_empty: false,
            hint: "",
        },
        Field {
            name: "skills",
            kind: FieldKind::TextSequence,
            non_empty: false,
            hint: "Skill",
        },
        text("template", true, "modern"),
        text("accentColor", true, "blue-600"),
    ],
};

impl Schema {
    /// Every field name, nested ones as `parent.child`, in declaration order.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        for field in self.fields {
            out.push(field.name.to_string());
            if let FieldKind::RecordSequence(nested) = field.kind {
                out.extend(nested.iter().map(|n| format!("{}.{}", field.name, n.name)));
            }
        }
        out
    }

    /// Value the model must copy verbatim from the form, if the field is echoed.
    pub fn echo<'a>(&self, name: &str, form: &'a FieldModel) -> Option<&'a str> {
        Some(match name {
            "fullName" => form.full_name.as_str(),
            "title" => form.job_title.as_str(),
            "email" => form.email.as_str(),
            "phone" => form.phone.as_str(),
            "location" => form.location.as_str(),
            "linkedin" => form.linkedin.as_str(),
            "website" => form.website.as_str(),
            "template" => form.template.token(),
            "accentColor" => form.accent_color.token(),
            _ => return None,
        })
    }

    /// The `responseJsonSchema` object for Gemini structured output.
    pub fn to_json_schema(&self) -> Value {
        object_schema(self.fields)
    }
}

fn object_schema(fields: &[Field]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        properties.insert(field.name.to_string(), field_schema(field));
    }
    let required: Vec<&str> = fields.iter().map(|f| f.name).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn field_schema(field: &Field) -> Value {
    match field.kind {
        FieldKind::Text => match field.name {
            "template" => json!({
                "type": "string",
                "enum": TemplateVariant::ALL.map(TemplateVariant::token),
            }),
            "accentColor" => json!({
                "type": "string",
                "enum": AccentColor::ALL.map(AccentColor::token),
            }),
            _ => json!({ "type": "string" }),
        },
        FieldKind::TextSequence => json!({
            "type": "array",
            "items": { "type": "string" },
        }),
        FieldKind::RecordSequence(nested) => json!({
            "type": "array",
            "items": object_schema(nested),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_include_nested_records() {
        let paths = RESUME_SCHEMA.paths();
        assert_eq!(paths.first().map(String::as_str), Some("fullName"));
        assert!(paths.contains(&"experience.achievements".to_string()));
        assert!(paths.contains(&"education.graduationDate".to_string()));
        assert!(paths.contains(&"skills".to_string()));
        assert_eq!(paths.len(), 13 + 5 + 4);
    }

    #[test]
    fn test_json_schema_requires_every_field() {
        let schema = RESUME_SCHEMA.to_json_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), RESUME_SCHEMA.fields.len());
        assert_eq!(schema["properties"]["experience"]["type"], "array");
        assert_eq!(
            schema["properties"]["experience"]["items"]["required"][4],
            "achievements"
        );
        assert_eq!(schema["properties"]["template"]["enum"][2], "minimal");
    }
}
