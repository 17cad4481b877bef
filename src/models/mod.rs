pub mod document;
pub mod form;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::form::FieldModel;

    pub fn ada() -> FieldModel {
        FieldModel {
            full_name: "Ada Lovelace".into(),
            email: "a@x.com".into(),
            phone: "5551234567".into(),
            job_title: "Engineer".into(),
            years_of_experience: "10".into(),
            key_skills: "Mathematics, Analytical Engines".into(),
            previous_roles: "Analyst at Babbage & Co.".into(),
            education: "Private tutoring in mathematics".into(),
            ..Default::default()
        }
    }

    /// A fully conformant structured response, wrapped the way models often
    /// wrap JSON.
    pub const ADA_RESPONSE: &str = r#"```json
{
  "fullName": "Ada Lovelace",
  "title": "Engineer",
  "email": "a@x.com",
  "phone": "5551234567",
  "location": "London, UK",
  "linkedin": "https://linkedin.com/in/ada",
  "website": "",
  "summary": "Mathematician who wrote the first published algorithm.",
  "experience": [
    {
      "company": "Babbage & Co.",
      "position": "Analyst",
      "startDate": "Jan 1842",
      "endDate": "Dec 1843",
      "achievements": [
        "Translated Menabrea's memoir on the Analytical Engine",
        "Authored Note G describing Bernoulli number computation",
        "Extended the notes to 3x the length of the original"
      ]
    },
    {
      "company": "Royal Society",
      "position": "Correspondent",
      "startDate": "Jan 1844",
      "endDate": "Present",
      "achievements": ["Corresponded with 5 leading scientists"]
    }
  ],
  "education": [
    {
      "school": "Private tutoring",
      "degree": "Independent study",
      "field": "Mathematics",
      "graduationDate": "1835"
    }
  ],
  "skills": ["Mathematics", "Algorithms", "Mathematics"],
  "template": "classic",
  "accentColor": "violet-600"
}
```"#;

    /// [`ADA_RESPONSE`] with every optional contact filled in.
    pub fn ada_response_with_contacts() -> String {
        ADA_RESPONSE.replace(r#""website": "","#, r#""website": "https://ada.dev","#)
    }
}
