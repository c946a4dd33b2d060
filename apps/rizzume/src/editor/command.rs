use crate::errors::AppError;
use crate::form::{Collection, Edit, ScalarField};

pub const HELP: &str = "\
Personal info:
  set <name|phone|email|linkedin|github> <value>
Entries (education, experience, projects):
  add <collection>
  remove <collection> <i>
  edit <collection> <i> <field> <value>
Bullets (experience, projects):
  add-bullet <collection> <i>
  remove-bullet <collection> <i> <j>
  bullet <collection> <i> <j> <value>
Skills (quote names with spaces):
  add-category
  remove-category <name>
  rename-category <old> <new>
  add-skill <category>
  remove-skill <category> <i>
  skill <category> <i> <value>
Other:
  undo | redo | preview | json | submit | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(Edit),
    Undo,
    Redo,
    Preview,
    Json,
    Submit,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, AppError> {
    let tokens = tokenize(line)?;
    let Some((verb, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match verb.as_str() {
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "preview" => Command::Preview,
        "json" => Command::Json,
        "submit" => Command::Submit,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "set" => {
            let field: ScalarField = arg(args, 0, "field")?.parse()?;
            Command::Edit(Edit::SetScalar {
                field,
                value: rest(args, 1),
            })
        }
        "add" => Command::Edit(Edit::AddEntry(collection(args, 0)?)),
        "remove" => Command::Edit(Edit::RemoveEntry {
            collection: collection(args, 0)?,
            index: index(args, 1)?,
        }),
        "edit" => Command::Edit(Edit::UpdateEntryField {
            collection: collection(args, 0)?,
            index: index(args, 1)?,
            field: arg(args, 2, "field")?.to_string(),
            value: rest(args, 3),
        }),
        "add-bullet" => Command::Edit(Edit::AddBullet {
            collection: collection(args, 0)?,
            index: index(args, 1)?,
        }),
        "remove-bullet" => Command::Edit(Edit::RemoveBullet {
            collection: collection(args, 0)?,
            index: index(args, 1)?,
            bullet: index(args, 2)?,
        }),
        "bullet" => Command::Edit(Edit::UpdateBullet {
            collection: collection(args, 0)?,
            index: index(args, 1)?,
            bullet: index(args, 2)?,
            value: rest(args, 3),
        }),
        "add-category" => Command::Edit(Edit::AddSkillCategory),
        "remove-category" => {
            Command::Edit(Edit::RemoveSkillCategory(required_rest(args, 0, "category")?))
        }
        "rename-category" => {
            no_extra(args, 2, "rename-category")?;
            Command::Edit(Edit::RenameSkillCategory {
                from: arg(args, 0, "old name")?.to_string(),
                to: arg(args, 1, "new name")?.to_string(),
            })
        }
        "add-skill" => Command::Edit(Edit::AddSkill(required_rest(args, 0, "category")?)),
        "remove-skill" => Command::Edit(Edit::RemoveSkill {
            category: arg(args, 0, "category")?.to_string(),
            index: index(args, 1)?,
        }),
        "skill" => Command::Edit(Edit::UpdateSkill {
            category: arg(args, 0, "category")?.to_string(),
            index: index(args, 1)?,
            value: rest(args, 2),
        }),
        other => return Err(AppError::Command(format!("unknown command '{other}'"))),
    };
    Ok(Some(command))
}

/// Splits on whitespace; double quotes group words and may produce an empty token.
fn tokenize(line: &str) -> Result<Vec<String>, AppError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(AppError::Command("unterminated quote".to_string()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn arg<'a>(args: &'a [String], pos: usize, name: &str) -> Result<&'a str, AppError> {
    args.get(pos)
        .map(String::as_str)
        .ok_or_else(|| AppError::Command(format!("missing {name}")))
}

fn rest(args: &[String], from: usize) -> String {
    args.get(from..).map(|tail| tail.join(" ")).unwrap_or_default()
}

fn required_rest(args: &[String], from: usize, name: &str) -> Result<String, AppError> {
    arg(args, from, name)?;
    Ok(rest(args, from))
}

/// Rejects trailing tokens, usually an unquoted name with spaces.
fn no_extra(args: &[String], max: usize, verb: &str) -> Result<(), AppError> {
    if args.len() > max {
        return Err(AppError::Command(format!(
            "too many arguments for {verb}; quote names with spaces"
        )));
    }
    Ok(())
}

fn collection(args: &[String], pos: usize) -> Result<Collection, AppError> {
    Ok(arg(args, pos, "collection")?.parse()?)
}

fn index(args: &[String], pos: usize) -> Result<usize, AppError> {
    let raw = arg(args, pos, "index")?;
    raw.parse()
        .map_err(|_| AppError::Command(format!("'{raw}' is not a valid index")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::EditRejection;

    fn edit(line: &str) -> Edit {
        match parse(line).unwrap() {
            Some(Command::Edit(edit)) => edit,
            other => panic!("expected an edit, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_set_joins_value_words() {
        assert_eq!(
            edit("set name Jane Doe"),
            Edit::SetScalar {
                field: ScalarField::Name,
                value: "Jane Doe".into()
            }
        );
    }

    #[test]
    fn test_set_without_value_clears() {
        assert_eq!(
            edit("set linkedin"),
            Edit::SetScalar {
                field: ScalarField::Linkedin,
                value: String::new()
            }
        );
    }

    #[test]
    fn test_quoted_category_names() {
        assert_eq!(
            edit(r#"rename-category "Programming Languages" Languages"#),
            Edit::RenameSkillCategory {
                from: "Programming Languages".into(),
                to: "Languages".into()
            }
        );
        assert_eq!(
            edit(r#"skill "Programming Languages" 0 C++"#),
            Edit::UpdateSkill {
                category: "Programming Languages".into(),
                index: 0,
                value: "C++".into()
            }
        );
    }

    #[test]
    fn test_remove_category_accepts_unquoted_words() {
        assert_eq!(
            edit("remove-category New Category 2"),
            Edit::RemoveSkillCategory("New Category 2".into())
        );
    }

    #[test]
    fn test_rename_category_rejects_unquoted_multiword_names() {
        let err = parse("rename-category New Category 2 Tools").unwrap_err();
        assert!(matches!(err, AppError::Command(msg) if msg.contains("quote")));
        assert_eq!(
            edit(r#"rename-category "New Category 2" Tools"#),
            Edit::RenameSkillCategory {
                from: "New Category 2".into(),
                to: "Tools".into()
            }
        );
    }

    #[test]
    fn test_entry_commands() {
        assert_eq!(
            edit("edit experience 1 company Acme Corp"),
            Edit::UpdateEntryField {
                collection: Collection::Experience,
                index: 1,
                field: "company".into(),
                value: "Acme Corp".into()
            }
        );
        assert_eq!(
            edit("remove-bullet projects 0 2"),
            Edit::RemoveBullet {
                collection: Collection::Projects,
                index: 0,
                bullet: 2
            }
        );
    }

    #[test]
    fn test_empty_quoted_token() {
        assert_eq!(tokenize(r#"skill Tools 0 """#).unwrap(), vec!["skill", "Tools", "0", ""]);
    }

    #[test]
    fn test_bad_index() {
        let err = parse("remove education first").unwrap_err();
        assert!(matches!(err, AppError::Command(msg) if msg.contains("first")));
    }

    #[test]
    fn test_unknown_collection_surfaces_rejection() {
        let err = parse("add awards").unwrap_err();
        assert!(matches!(
            err,
            AppError::Edit(EditRejection::UnknownCollection(name)) if name == "awards"
        ));
    }

    #[test]
    fn test_unknown_command_and_unterminated_quote() {
        assert!(matches!(parse("frobnicate"), Err(AppError::Command(_))));
        assert!(matches!(parse(r#"add-skill "Tools"#), Err(AppError::Command(_))));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("submit").unwrap(), Some(Command::Submit));
        assert_eq!(parse("exit").unwrap(), Some(Command::Quit));
        assert_eq!(parse("undo").unwrap(), Some(Command::Undo));
    }
}
