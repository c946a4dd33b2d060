use tracing::debug;

use crate::form::{entry_mut, EditRejection};
use crate::models::resume::ResumeDocument;

pub const NEW_CATEGORY_NAME: &str = "New Category";

/// First free placeholder: `New Category`, then `New Category 2`, `New Category 3`, ...
pub fn placeholder_category_name(doc: &ResumeDocument) -> String {
    if !doc.skills.contains(NEW_CATEGORY_NAME) {
        return NEW_CATEGORY_NAME.to_string();
    }
    (2..)
        .map(|n| format!("{NEW_CATEGORY_NAME} {n}"))
        .find(|candidate| !doc.skills.contains(candidate))
        .unwrap_or_default()
}

pub fn add_skill_category(doc: &ResumeDocument) -> ResumeDocument {
    let mut next = doc.clone();
    let name = placeholder_category_name(doc);
    next.skills.push(name, vec![String::new()]);
    next
}

pub fn remove_skill_category(
    doc: &ResumeDocument,
    name: &str,
) -> Result<ResumeDocument, EditRejection> {
    let mut next = doc.clone();
    next.skills
        .remove(name)
        .ok_or_else(|| EditRejection::UnknownCategory(name.to_string()))?;
    Ok(next)
}

/// Renames `from` to `to`.
///
/// When `to` already exists the two lists merge into `to` at its current position:
/// its own skills first, then the ones moved in from `from`.
pub fn rename_skill_category(
    doc: &ResumeDocument,
    from: &str,
    to: &str,
) -> Result<ResumeDocument, EditRejection> {
    let mut next = doc.clone();
    let idx = next
        .skills
        .position(from)
        .ok_or_else(|| EditRejection::UnknownCategory(from.to_string()))?;

    if from == to {
        return Ok(next);
    }

    if next.skills.contains(to) {
        if let Some(moved) = next.skills.remove(from) {
            debug!(
                "Merging {} skill(s) from '{}' into existing '{}'",
                moved.skills.len(),
                from,
                to
            );
            next.skills.push(to, moved.skills);
        }
    } else {
        next.skills.rename_at(idx, to.to_string());
    }
    Ok(next)
}

pub fn add_skill(doc: &ResumeDocument, category: &str) -> Result<ResumeDocument, EditRejection> {
    let mut next = doc.clone();
    skills_mut(&mut next, category)?.push(String::new());
    Ok(next)
}

/// Removes one skill; a category left with no skills is deleted.
pub fn remove_skill(
    doc: &ResumeDocument,
    category: &str,
    index: usize,
) -> Result<ResumeDocument, EditRejection> {
    let mut next = doc.clone();
    let skills = skills_mut(&mut next, category)?;
    entry_mut(skills, index, "skills")?;
    skills.remove(index);

    if skills.is_empty() {
        next.skills.remove(category);
    }
    Ok(next)
}

pub fn update_skill(
    doc: &ResumeDocument,
    category: &str,
    index: usize,
    value: &str,
) -> Result<ResumeDocument, EditRejection> {
    let mut next = doc.clone();
    let skills = skills_mut(&mut next, category)?;
    *entry_mut(skills, index, "skills")? = value.to_string();
    Ok(next)
}

fn skills_mut<'a>(
    doc: &'a mut ResumeDocument,
    category: &str,
) -> Result<&'a mut Vec<String>, EditRejection> {
    doc.skills
        .get_mut(category)
        .ok_or_else(|| EditRejection::UnknownCategory(category.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::DEFAULT_SKILL_CATEGORY;

    fn doc_with(categories: &[(&str, &[&str])]) -> ResumeDocument {
        let mut doc = ResumeDocument::new();
        doc.skills = Default::default();
        for (name, skills) in categories {
            doc.skills
                .push(*name, skills.iter().map(|s| s.to_string()).collect());
        }
        doc
    }

    fn names(doc: &ResumeDocument) -> Vec<&str> {
        doc.skills.names().collect()
    }

    #[test]
    fn test_add_category_uses_placeholder() {
        let doc = add_skill_category(&ResumeDocument::new());
        assert_eq!(names(&doc), vec![DEFAULT_SKILL_CATEGORY, NEW_CATEGORY_NAME]);
        assert_eq!(doc.skills.get(NEW_CATEGORY_NAME).unwrap(), &[String::new()]);
    }

    #[test]
    fn test_add_category_disambiguates_placeholder() {
        let doc = add_skill_category(&ResumeDocument::new());
        let doc = add_skill_category(&doc);
        let doc = add_skill_category(&doc);
        assert_eq!(
            names(&doc),
            vec![
                DEFAULT_SKILL_CATEGORY,
                "New Category",
                "New Category 2",
                "New Category 3"
            ]
        );
    }

    #[test]
    fn test_remove_category() {
        let doc = doc_with(&[("Languages", &["Go"]), ("Tools", &["Git"])]);
        let next = remove_skill_category(&doc, "Languages").unwrap();
        assert_eq!(names(&next), vec!["Tools"]);
    }

    #[test]
    fn test_remove_unknown_category() {
        let doc = doc_with(&[("Languages", &["Go"])]);
        assert_eq!(
            remove_skill_category(&doc, "Tools").unwrap_err(),
            EditRejection::UnknownCategory("Tools".into())
        );
    }

    #[test]
    fn test_rename_keeps_position() {
        let doc = doc_with(&[("A", &["1"]), ("B", &["2"]), ("C", &["3"])]);
        let next = rename_skill_category(&doc, "B", "Frameworks").unwrap();
        assert_eq!(names(&next), vec!["A", "Frameworks", "C"]);
        assert_eq!(next.skills.get("Frameworks").unwrap(), &["2".to_string()]);
    }

    #[test]
    fn test_rename_onto_existing_merges() {
        let doc = doc_with(&[("Languages", &["Go", "Rust"]), ("Langs", &["C", "Zig"])]);
        let next = rename_skill_category(&doc, "Langs", "Languages").unwrap();

        assert_eq!(next.skills.len(), 1);
        assert!(!next.skills.contains("Langs"));
        assert_eq!(
            next.skills.get("Languages").unwrap(),
            &["Go", "Rust", "C", "Zig"].map(String::from)
        );
    }

    #[test]
    fn test_rename_onto_existing_keeps_destination_position() {
        let doc = doc_with(&[("Tools", &["Git"]), ("X", &["a"]), ("Y", &["b"])]);
        let next = rename_skill_category(&doc, "Y", "Tools").unwrap();
        assert_eq!(names(&next), vec!["Tools", "X"]);
        assert_eq!(next.skills.get("Tools").unwrap(), &["Git", "b"].map(String::from));
    }

    #[test]
    fn test_rename_to_same_name_is_noop() {
        let doc = doc_with(&[("Languages", &["Go"])]);
        assert_eq!(rename_skill_category(&doc, "Languages", "Languages").unwrap(), doc);
    }

    #[test]
    fn test_rename_unknown_category() {
        let doc = doc_with(&[("Languages", &["Go"])]);
        assert!(matches!(
            rename_skill_category(&doc, "Nope", "Languages"),
            Err(EditRejection::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_add_and_update_skill() {
        let doc = doc_with(&[("Languages", &["Go"])]);
        let doc = add_skill(&doc, "Languages").unwrap();
        let doc = update_skill(&doc, "Languages", 1, "Rust").unwrap();
        assert_eq!(doc.skills.get("Languages").unwrap(), &["Go", "Rust"].map(String::from));
    }

    #[test]
    fn test_remove_last_skill_drops_category() {
        let doc = doc_with(&[("Languages", &["Go"]), ("Tools", &["Git"])]);
        let next = remove_skill(&doc, "Languages", 0).unwrap();
        assert_eq!(next.skills.len(), doc.skills.len() - 1);
        assert!(!next.skills.contains("Languages"));
    }

    #[test]
    fn test_remove_skill_keeps_category_when_others_remain() {
        let doc = doc_with(&[("Languages", &["Go", "Rust"])]);
        let next = remove_skill(&doc, "Languages", 0).unwrap();
        assert_eq!(next.skills.get("Languages").unwrap(), &["Rust".to_string()]);
    }

    #[test]
    fn test_remove_skill_out_of_range() {
        let doc = doc_with(&[("Languages", &["Go"])]);
        let err = remove_skill(&doc, "Languages", 1).unwrap_err();
        assert_eq!(
            err,
            EditRejection::IndexOutOfRange {
                what: "skills",
                index: 1,
                len: 1
            }
        );
        assert_eq!(
            update_skill(&doc, "Tools", 0, "x").unwrap_err(),
            EditRejection::UnknownCategory("Tools".into())
        );
    }
}
