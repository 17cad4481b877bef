//! Turns raw model output into a [`Generated`] resume or a typed rejection.
//!
//! Structured responses go through four passes over the shared schema:
//! parse, presence, shape, content. Any failure discards the whole response.

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::chat::prompt::OutputMode;
use crate::chat::schema::{Field, FieldKind, Schema};
use crate::errors::ValidationError;
use crate::models::document::{
    Document, EducationEntry, ExperienceEntry, Generated, Header, MarkupDocument, Style,
};
use crate::models::form::{AccentColor, TemplateVariant};

pub const MIN_MARKUP_BYTES: usize = 256;
pub const MAX_MARKUP_BYTES: usize = 512 * 1024;

pub fn validate(raw: &str, schema: &Schema, mode: OutputMode) -> Result<Generated, ValidationError> {
    match mode {
        OutputMode::Structured => validate_structured(raw, schema).map(Generated::Structured),
        OutputMode::Markup => validate_markup(raw).map(Generated::Markup),
    }
}

pub fn validate_structured(raw: &str, schema: &Schema) -> Result<Document, ValidationError> {
    debug!("validating structured response ({} bytes)", raw.len());

    let mut root = parse_object(raw)?;

    let missing = missing_fields(&root, schema.fields, "");
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    for field in schema.fields {
        if let Some(value) = root.get_mut(field.name) {
            normalize(value, field, field.name)?;
        }
    }

    check_content(&root, schema.fields, "")?;

    let wire: WireDocument = serde_json::from_value(Value::Object(root)).map_err(|e| {
        debug!("typed decode failed: {:?}", e.classify());
        ValidationError::Malformed("JSON (does not match the resume fields)".to_string())
    })?;
    let document = wire.into_document()?;

    debug!(
        "response accepted: {} experience, {} education, {} skills",
        document.experience().len(),
        document.education().len(),
        document.skills().len()
    );

    Ok(document)
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, ValidationError> {
    let start = raw
        .find('{')
        .ok_or_else(|| ValidationError::Malformed("JSON (no object found)".to_string()))?;

    // first complete value only; trailing prose or fences are ignored
    let mut values = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<Value>();
    match values.next() {
        Some(Ok(Value::Object(map))) => Ok(map),
        Some(Ok(_)) => Err(ValidationError::Malformed(
            "JSON (root is not an object)".to_string(),
        )),
        Some(Err(e)) => {
            debug!("JSON parsing failed at line {} column {}", e.line(), e.column());
            Err(ValidationError::Malformed(format!(
                "JSON (syntax error at line {} column {})",
                e.line(),
                e.column()
            )))
        }
        None => Err(ValidationError::Malformed("JSON (no object found)".to_string())),
    }
}

fn path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Absent names, top level first and then inside each well-formed record.
fn missing_fields(object: &Map<String, Value>, fields: &[Field], prefix: &str) -> Vec<String> {
    let mut missing: Vec<String> = fields
        .iter()
        .filter(|f| !object.contains_key(f.name))
        .map(|f| path(prefix, f.name))
        .collect();

    for field in fields {
        let (FieldKind::RecordSequence(nested), Some(Value::Array(items))) =
            (field.kind, object.get(field.name))
        else {
            continue;
        };
        for (i, item) in items.iter().enumerate() {
            if let Value::Object(record) = item {
                let record_path = format!("{}[{}]", path(prefix, field.name), i);
                missing.extend(missing_fields(record, nested, &record_path));
            }
        }
    }

    missing
}

/// Checks the container kind of `value` and coerces scalars into the text the
/// document expects.
fn normalize(value: &mut Value, field: &Field, at: &str) -> Result<(), ValidationError> {
    match field.kind {
        FieldKind::Text => normalize_text(value, field.non_empty, at),
        FieldKind::TextSequence => {
            let Value::Array(items) = value else {
                return Err(ValidationError::ShapeMismatch(at.to_string()));
            };
            for (i, item) in items.iter_mut().enumerate() {
                normalize_text(item, true, &format!("{}[{}]", at, i))?;
            }
            Ok(())
        }
        FieldKind::RecordSequence(nested) => {
            let Value::Array(items) = value else {
                return Err(ValidationError::ShapeMismatch(at.to_string()));
            };
            for (i, item) in items.iter_mut().enumerate() {
                let item_path = format!("{}[{}]", at, i);
                let Value::Object(record) = item else {
                    return Err(ValidationError::ShapeMismatch(item_path));
                };
                for nested_field in nested {
                    if let Some(nested_value) = record.get_mut(nested_field.name) {
                        normalize(
                            nested_value,
                            nested_field,
                            &path(&item_path, nested_field.name),
                        )?;
                    }
                }
            }
            Ok(())
        }
    }
}

fn normalize_text(value: &mut Value, non_empty: bool, at: &str) -> Result<(), ValidationError> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null if !non_empty => String::new(),
        _ => return Err(ValidationError::ShapeMismatch(at.to_string())),
    };
    *value = Value::String(text);
    Ok(())
}

fn check_content(
    object: &Map<String, Value>,
    fields: &[Field],
    prefix: &str,
) -> Result<(), ValidationError> {
    for field in fields {
        let at = path(prefix, field.name);
        match (field.kind, object.get(field.name)) {
            (FieldKind::Text, Some(Value::String(s))) if field.non_empty && s.is_empty() => {
                return Err(ValidationError::ContentPolicyViolation(format!(
                    "'{}' is empty",
                    at
                )));
            }
            (FieldKind::TextSequence, Some(Value::Array(items))) if field.non_empty => {
                if items.iter().all(|i| i.as_str().is_some_and(str::is_empty)) {
                    return Err(ValidationError::ContentPolicyViolation(format!(
                        "'{}' has no entries",
                        at
                    )));
                }
            }
            (FieldKind::RecordSequence(nested), Some(Value::Array(items))) => {
                for (i, item) in items.iter().enumerate() {
                    if let Value::Object(record) = item {
                        check_content(record, nested, &format!("{}[{}]", at, i))?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDocument {
    full_name: String,
    title: String,
    email: String,
    phone: String,
    location: String,
    linkedin: String,
    website: String,
    summary: String,
    experience: Vec<ExperienceEntry>,
    education: Vec<EducationEntry>,
    skills: Vec<String>,
    template: String,
    accent_color: String,
}

impl WireDocument {
    fn into_document(self) -> Result<Document, ValidationError> {
        let template: TemplateVariant = self.template.parse().map_err(|_| {
            ValidationError::ContentPolicyViolation(
                "'template' is not a recognized template".to_string(),
            )
        })?;
        let accent_color: AccentColor = self.accent_color.parse().map_err(|_| {
            ValidationError::ContentPolicyViolation(
                "'accentColor' is not a recognized accent color".to_string(),
            )
        })?;

        let mut experience = self.experience;
        for entry in &mut experience {
            entry.achievements.retain(|a| !a.is_empty());
        }
        let mut skills = self.skills;
        skills.retain(|s| !s.is_empty());

        Ok(Document::new(
            Header {
                full_name: self.full_name,
                title: self.title,
                email: self.email,
                phone: self.phone,
                location: self.location,
                linkedin: self.linkedin,
                website: self.website,
            },
            self.summary,
            experience,
            self.education,
            skills,
            Style {
                template,
                accent_color,
            },
        ))
    }
}

/// Relaxed checks for HTML output: it has to look like a styled document of
/// plausible size.
pub fn validate_markup(raw: &str) -> Result<MarkupDocument, ValidationError> {
    debug!("validating markup response ({} bytes)", raw.len());

    let html = strip_fences(raw);
    if html.is_empty() {
        return Err(ValidationError::Malformed("HTML (empty)".to_string()));
    }
    if !html.starts_with('<') || !html.contains("</") {
        return Err(ValidationError::Malformed("HTML (no markup found)".to_string()));
    }
    if html.len() < MIN_MARKUP_BYTES {
        return Err(ValidationError::ContentPolicyViolation(format!(
            "document is only {} bytes",
            html.len()
        )));
    }
    if html.len() > MAX_MARKUP_BYTES {
        return Err(ValidationError::ContentPolicyViolation(format!(
            "document is {} bytes, over the {} byte limit",
            html.len(),
            MAX_MARKUP_BYTES
        )));
    }
    if !html.to_ascii_lowercase().contains("<style") {
        return Err(ValidationError::ContentPolicyViolation(
            "document has no embedded stylesheet".to_string(),
        ));
    }

    Ok(MarkupDocument::new(html.to_string()))
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string (```html)
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::schema::RESUME_SCHEMA;
    use crate::models::fixtures::ADA_RESPONSE;

    fn ada_json() -> Value {
        let start = ADA_RESPONSE.find('{').unwrap();
        let end = ADA_RESPONSE.rfind('}').unwrap();
        serde_json::from_str(&ADA_RESPONSE[start..=end]).unwrap()
    }

    fn check(value: &Value) -> Result<Document, ValidationError> {
        validate_structured(&value.to_string(), &RESUME_SCHEMA)
    }

    #[test]
    fn test_conformant_response_builds_document() {
        let doc = validate_structured(ADA_RESPONSE, &RESUME_SCHEMA).unwrap();
        assert_eq!(doc.full_name(), "Ada Lovelace");
        assert_eq!(doc.experience().len(), 2);
        assert_eq!(doc.experience()[0].achievements.len(), 3);
        assert_eq!(doc.education()[0].graduation_date, "1835");
        assert_eq!(doc.skills(), ["Mathematics", "Algorithms", "Mathematics"]);
        assert_eq!(doc.style().template, TemplateVariant::Classic);
        assert_eq!(doc.style().accent_color, AccentColor::Violet);
        assert_eq!(doc.header().website, "");
    }

    #[test]
    fn test_missing_skills_is_reported_exactly() {
        let mut value = ada_json();
        value.as_object_mut().unwrap().remove("skills");
        assert_eq!(
            check(&value),
            Err(ValidationError::MissingFields(vec!["skills".to_string()]))
        );
    }

    #[test]
    fn test_missing_nested_fields_carry_their_path() {
        let mut value = ada_json();
        value["experience"][1]
            .as_object_mut()
            .unwrap()
            .remove("startDate");
        value.as_object_mut().unwrap().remove("summary");
        assert_eq!(
            check(&value),
            Err(ValidationError::MissingFields(vec![
                "summary".to_string(),
                "experience[1].startDate".to_string(),
            ]))
        );
    }

    #[test]
    fn test_experience_as_string_is_shape_mismatch() {
        let mut value = ada_json();
        value["experience"] = Value::String("Analyst at Babbage & Co.".into());
        assert_eq!(
            check(&value),
            Err(ValidationError::ShapeMismatch("experience".to_string()))
        );
    }

    #[test]
    fn test_skills_as_map_is_shape_mismatch() {
        let mut value = ada_json();
        value["skills"] = serde_json::json!({ "primary": "Mathematics" });
        assert_eq!(
            check(&value),
            Err(ValidationError::ShapeMismatch("skills".to_string()))
        );
    }

    #[test]
    fn test_record_that_is_not_an_object_is_shape_mismatch() {
        let mut value = ada_json();
        value["education"] = serde_json::json!(["Private tutoring"]);
        assert_eq!(
            check(&value),
            Err(ValidationError::ShapeMismatch("education[0]".to_string()))
        );
    }

    #[test]
    fn test_zero_achievements_is_content_violation() {
        let mut value = ada_json();
        value["experience"][0]["achievements"] = serde_json::json!([]);
        assert!(matches!(
            check(&value),
            Err(ValidationError::ContentPolicyViolation(_))
        ));
    }

    #[test]
    fn test_blank_achievements_are_content_violation() {
        let mut value = ada_json();
        value["experience"][1]["achievements"] = serde_json::json!(["  ", ""]);
        assert!(matches!(
            check(&value),
            Err(ValidationError::ContentPolicyViolation(_))
        ));
    }

    #[test]
    fn test_empty_date_is_content_violation() {
        let mut value = ada_json();
        value["experience"][0]["endDate"] = Value::String(" ".into());
        assert_eq!(
            check(&value),
            Err(ValidationError::ContentPolicyViolation(
                "'experience[0].endDate' is empty".to_string()
            ))
        );
    }

    #[test]
    fn test_unrecognized_style_tokens_are_rejected() {
        let mut value = ada_json();
        value["template"] = Value::String("futuristic".into());
        assert!(matches!(
            check(&value),
            Err(ValidationError::ContentPolicyViolation(_))
        ));

        let mut value = ada_json();
        value["accentColor"] = Value::String("teal-600".into());
        assert!(matches!(
            check(&value),
            Err(ValidationError::ContentPolicyViolation(_))
        ));
    }

    #[test]
    fn test_scalars_are_normalized_to_text() {
        let mut value = ada_json();
        value["education"][0]["graduationDate"] = serde_json::json!(1835);
        value["location"] = Value::Null;
        value["title"] = Value::String("  Engineer  ".into());

        let doc = check(&value).unwrap();
        assert_eq!(doc.education()[0].graduation_date, "1835");
        assert_eq!(doc.header().location, "");
        assert_eq!(doc.header().title, "Engineer");
    }

    #[test]
    fn test_null_required_text_is_shape_mismatch() {
        let mut value = ada_json();
        value["fullName"] = Value::Null;
        assert_eq!(
            check(&value),
            Err(ValidationError::ShapeMismatch("fullName".to_string()))
        );
    }

    #[test]
    fn test_unparseable_text_is_malformed() {
        for raw in ["", "   ", "Sorry, I can't help with that.", "{ \"fullName\": ", "[1, 2]"] {
            assert!(
                matches!(
                    validate_structured(raw, &RESUME_SCHEMA),
                    Err(ValidationError::Malformed(_))
                ),
                "{:?}",
                raw
            );
        }
    }

    #[test]
    fn test_trailing_prose_after_object_is_ignored() {
        let raw = format!(
            "{}\nLet me know if you want changes to {{section}} wording.",
            ADA_RESPONSE
        );
        let doc = validate_structured(&raw, &RESUME_SCHEMA).unwrap();
        assert_eq!(doc.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_rejected_style_token_is_not_echoed() {
        let mut value = ada_json();
        value["template"] = Value::String("futuristic".into());
        let Err(ValidationError::ContentPolicyViolation(reason)) = check(&value) else {
            panic!("expected a content violation");
        };
        assert!(reason.contains("'template'"));
        assert!(!reason.contains("futuristic"));
    }

    /// Every wire name of a decoded document, nested ones as `parent.child`,
    /// in the same form as `Schema::paths`.
    fn key_paths(value: &Value) -> Vec<String> {
        let mut out = Vec::new();
        for (name, child) in value.as_object().unwrap() {
            out.push(name.clone());
            if let Some(Value::Object(record)) = child.as_array().and_then(|a| a.first()) {
                out.extend(record.keys().map(|k| format!("{}.{}", name, k)));
            }
        }
        out.sort();
        out
    }

    #[test]
    fn test_typed_decode_uses_schema_names() {
        let doc = validate_structured(ADA_RESPONSE, &RESUME_SCHEMA).unwrap();
        let serialized = serde_json::to_value(&doc).unwrap();

        let mut expected = RESUME_SCHEMA.paths();
        expected.sort();
        assert_eq!(key_paths(&serialized), expected);
    }

    #[test]
    fn test_markup_mode_accepts_styled_document() {
        let html = format!(
            "```html\n<!DOCTYPE html><html><head><style>@page {{ size: A4 portrait; }}</style></head><body><h1>Ada Lovelace</h1><p>{}</p></body></html>\n```",
            "Mathematician. ".repeat(20)
        );
        let generated = validate(&html, &RESUME_SCHEMA, OutputMode::Markup).unwrap();
        let Generated::Markup(markup) = generated else {
            panic!("expected markup");
        };
        assert!(markup.html().starts_with("<!DOCTYPE html>"));
        assert!(markup.html().ends_with("</html>"));
    }

    #[test]
    fn test_markup_mode_rejects_bad_documents() {
        assert!(matches!(
            validate_markup(""),
            Err(ValidationError::Malformed(_))
        ));
        assert!(matches!(
            validate_markup("Here is your resume!"),
            Err(ValidationError::Malformed(_))
        ));
        assert!(matches!(
            validate_markup("<html><body>Ada</body></html>"),
            Err(ValidationError::ContentPolicyViolation(_))
        ));

        let unstyled = format!("<html><body>{}</body></html>", "<p>Ada</p>".repeat(40));
        assert!(matches!(
            validate_markup(&unstyled),
            Err(ValidationError::ContentPolicyViolation(_))
        ));
    }
}
