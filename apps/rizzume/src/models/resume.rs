use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Category seeded into every new document.
pub const DEFAULT_SKILL_CATEGORY: &str = "Programming Languages";

/// The résumé being edited. Field names are the wire contract with the rendering service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: SkillCategories,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub location: String,
    pub degree: String,
    pub dates: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub position: String,
    pub company: String,
    pub location: String,
    pub dates: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub technologies: String,
    pub dates: String,
    pub bullets: Vec<String>,
}

impl Default for ExperienceEntry {
    fn default() -> Self {
        Self {
            position: String::new(),
            company: String::new(),
            location: String::new(),
            dates: String::new(),
            bullets: vec![String::new()],
        }
    }
}

impl Default for ProjectEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            technologies: String::new(),
            dates: String::new(),
            bullets: vec![String::new()],
        }
    }
}

impl ResumeDocument {
    /// A fresh document: one blank entry per collection and one default skill category.
    pub fn new() -> Self {
        let mut skills = SkillCategories::default();
        skills.push(DEFAULT_SKILL_CATEGORY, vec![String::new()]);

        Self {
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            linkedin: String::new(),
            github: String::new(),
            education: vec![EducationEntry::default()],
            experience: vec![ExperienceEntry::default()],
            projects: vec![ProjectEntry::default()],
            skills,
        }
    }
}

impl Default for ResumeDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

/// Skill groups keyed by category name.
///
/// Stored as ordered pairs so renames keep their position; serialized as a JSON object
/// in insertion order. Names are unique: every mutation goes through methods that check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillCategories(Vec<SkillCategory>);

impl SkillCategories {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillCategory> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|c| c.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.skills.as_slice())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.0
            .iter_mut()
            .find(|c| c.name == name)
            .map(|c| &mut c.skills)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|c| c.name == name)
    }

    /// Appends a category, or extends the existing one with the same name.
    pub fn push(&mut self, name: impl Into<String>, skills: Vec<String>) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(existing) => existing.extend(skills),
            None => self.0.push(SkillCategory { name, skills }),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<SkillCategory> {
        self.position(name).map(|idx| self.0.remove(idx))
    }

    /// Renames in place. Callers must ensure `new_name` is not already taken.
    pub(crate) fn rename_at(&mut self, idx: usize, new_name: String) {
        self.0[idx].name = new_name;
    }
}

impl Serialize for SkillCategories {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for category in &self.0 {
            map.serialize_entry(&category.name, &category.skills)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SkillCategories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CategoriesVisitor;

        impl<'de> Visitor<'de> for CategoriesVisitor {
            type Value = SkillCategories;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category name to a list of skills")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut categories = SkillCategories::default();
                while let Some((name, skills)) = access.next_entry::<String, Vec<String>>()? {
                    categories.push(name, skills);
                }
                Ok(categories)
            }
        }

        deserializer.deserialize_map(CategoriesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_document_has_one_of_everything() {
        let doc = ResumeDocument::new();
        assert_eq!(doc.education.len(), 1);
        assert_eq!(doc.experience.len(), 1);
        assert_eq!(doc.experience[0].bullets, vec![String::new()]);
        assert_eq!(doc.projects[0].bullets.len(), 1);
        assert_eq!(doc.skills.get(DEFAULT_SKILL_CATEGORY), Some(&[String::new()][..]));
    }

    #[test]
    fn test_skills_serialize_in_insertion_order() {
        let mut skills = SkillCategories::default();
        skills.push("Tools", vec!["Git".into()]);
        skills.push("Languages", vec!["Rust".into()]);

        let text = serde_json::to_string(&skills).unwrap();
        assert_eq!(text, r#"{"Tools":["Git"],"Languages":["Rust"]}"#);
    }

    #[test]
    fn test_skills_deserialize_from_object() {
        let skills: SkillCategories =
            serde_json::from_value(json!({"Languages": ["Go", "Rust"]})).unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(
            skills.get("Languages").unwrap(),
            &["Go".to_string(), "Rust".to_string()]
        );
    }

    #[test]
    fn test_push_existing_name_extends() {
        let mut skills = SkillCategories::default();
        skills.push("Languages", vec!["Go".into()]);
        skills.push("Languages", vec!["Rust".into()]);
        assert_eq!(skills.len(), 1);
        assert_eq!(skills.get("Languages").unwrap().len(), 2);
    }

    #[test]
    fn test_document_parses_original_payload() {
        let doc: ResumeDocument = serde_json::from_value(json!({
            "name": "", "phone": "", "email": "", "linkedin": "", "github": "",
            "education": [{"institution": "", "location": "", "degree": "", "dates": ""}],
            "experience": [{"position": "", "company": "", "location": "", "dates": "", "bullets": [""]}],
            "projects": [{"name": "", "technologies": "", "dates": "", "bullets": [""]}],
            "skills": {"Programming Languages": [""]}
        }))
        .unwrap();
        assert_eq!(doc, ResumeDocument::new());
    }
}
