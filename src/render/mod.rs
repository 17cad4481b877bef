pub mod html;
pub mod style;
pub mod tree;

use crate::models::document::{Document, EducationEntry, ExperienceEntry};
use crate::render::style::ResolvedStyle;
use crate::render::tree::{Node, Role, VisualTree};

pub const SUMMARY_HEADER: &str = "Professional Summary";
pub const EXPERIENCE_HEADER: &str = "Experience";
pub const EDUCATION_HEADER: &str = "Education";
pub const SKILLS_HEADER: &str = "Skills";

/// Lays the document out in the fixed order Header, Summary, Experience,
/// Education, Skills.
pub fn render(document: &Document) -> VisualTree {
    let style = document.style();

    VisualTree {
        style: ResolvedStyle::new(style.template, style.accent_color),
        root: Node::container(
            Role::Page,
            vec![
                header(document),
                section(
                    SUMMARY_HEADER,
                    vec![Node::text(Role::Paragraph, document.summary())],
                ),
                section(
                    EXPERIENCE_HEADER,
                    document.experience().iter().map(experience).collect(),
                ),
                section(
                    EDUCATION_HEADER,
                    document.education().iter().map(education).collect(),
                ),
                section(
                    SKILLS_HEADER,
                    vec![Node::container(
                        Role::Skills,
                        document
                            .skills()
                            .iter()
                            .map(|s| Node::text(Role::Skill, s.as_str()))
                            .collect(),
                    )],
                ),
            ],
        ),
    }
}

fn header(document: &Document) -> Node {
    let h = document.header();

    let mut contacts = vec![
        Node::text(Role::Contact, h.email.as_str()),
        Node::text(Role::Contact, h.phone.as_str()),
    ];
    if !h.location.is_empty() {
        contacts.push(Node::text(Role::Contact, h.location.as_str()));
    }
    if !h.linkedin.is_empty() {
        contacts.push(Node::link(h.linkedin.as_str()));
    }
    if !h.website.is_empty() {
        contacts.push(Node::link(h.website.as_str()));
    }

    Node::container(
        Role::Header,
        vec![
            Node::text(Role::Name, h.full_name.as_str()),
            Node::text(Role::Title, h.title.as_str()),
            Node::container(Role::Contacts, contacts),
        ],
    )
}

fn section(title: &str, mut body: Vec<Node>) -> Node {
    body.insert(0, Node::text(Role::SectionTitle, title));
    Node::container(Role::Section, body)
}

fn experience(entry: &ExperienceEntry) -> Node {
    Node::container(
        Role::Entry,
        vec![
            Node::text(Role::EntryTitle, entry.position.as_str()),
            Node::container(
                Role::Dates,
                vec![
                    Node::text(Role::Date, entry.start_date.as_str()),
                    Node::text(Role::Date, entry.end_date.as_str()),
                ],
            ),
            Node::text(Role::EntrySubtitle, entry.company.as_str()),
            Node::container(
                Role::Bullets,
                entry
                    .achievements
                    .iter()
                    .map(|a| Node::text(Role::Bullet, a.as_str()))
                    .collect(),
            ),
        ],
    )
}

fn education(entry: &EducationEntry) -> Node {
    let mut degree = vec![Node::text(Role::Span, entry.degree.as_str())];
    if !entry.field.is_empty() {
        degree.push(Node::text(Role::Span, entry.field.as_str()));
    }

    Node::container(
        Role::Entry,
        vec![
            Node::text(Role::EntryTitle, entry.school.as_str()),
            Node::container(
                Role::Dates,
                vec![Node::text(Role::Date, entry.graduation_date.as_str())],
            ),
            Node::container(Role::Degree, degree),
        ],
    )
}
