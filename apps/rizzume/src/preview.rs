//! Plain-text live preview of a document.
//!
//! Empty headline fields show a placeholder; blank bullets and skills are left out.

use std::fmt::Write;

use crate::models::resume::ResumeDocument;

fn or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

pub fn render_preview(doc: &ResumeDocument) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", or(&doc.name, "Your Name"));
    let mut contact = Vec::new();
    if let Some(phone) = non_empty(&doc.phone) {
        contact.push(phone.to_string());
    }
    contact.push(or(&doc.email, "your@email.com").to_string());
    if let Some(linkedin) = non_empty(&doc.linkedin) {
        contact.push(format!("linkedin.com/in/{linkedin}"));
    }
    if let Some(github) = non_empty(&doc.github) {
        contact.push(format!("github.com/{github}"));
    }
    let _ = writeln!(out, "{}", contact.join(" • "));

    if !doc.education.is_empty() {
        let _ = writeln!(out, "\nEDUCATION");
        for edu in &doc.education {
            let _ = writeln!(
                out,
                "  {} | {}",
                or(&edu.institution, "University"),
                or(&edu.dates, "Dates")
            );
            match non_empty(&edu.location) {
                Some(location) => {
                    let _ = writeln!(out, "  {} • {}", or(&edu.degree, "Degree"), location);
                }
                None => {
                    let _ = writeln!(out, "  {}", or(&edu.degree, "Degree"));
                }
            }
        }
    }

    if !doc.experience.is_empty() {
        let _ = writeln!(out, "\nEXPERIENCE");
        for exp in &doc.experience {
            let _ = writeln!(
                out,
                "  {} at {} | {}",
                or(&exp.position, "Position"),
                or(&exp.company, "Company"),
                or(&exp.dates, "Dates")
            );
            if let Some(location) = non_empty(&exp.location) {
                let _ = writeln!(out, "  {location}");
            }
            write_bullets(&mut out, &exp.bullets);
        }
    }

    if !doc.projects.is_empty() {
        let _ = writeln!(out, "\nPROJECTS");
        for proj in &doc.projects {
            let _ = writeln!(
                out,
                "  {} | {}",
                or(&proj.name, "Project Name"),
                or(&proj.dates, "Dates")
            );
            if let Some(technologies) = non_empty(&proj.technologies) {
                let _ = writeln!(out, "  {technologies}");
            }
            write_bullets(&mut out, &proj.bullets);
        }
    }

    if !doc.skills.is_empty() {
        let _ = writeln!(out, "\nSKILLS");
        for category in doc.skills.iter() {
            let skills: Vec<&str> = category.skills.iter().filter_map(|s| non_empty(s)).collect();
            let _ = writeln!(out, "  {}: {}", category.name, skills.join(", "));
        }
    }

    out
}

fn write_bullets(out: &mut String, bullets: &[String]) {
    for bullet in bullets.iter().filter_map(|b| non_empty(b)) {
        let _ = writeln!(out, "    - {bullet}");
    }
}
