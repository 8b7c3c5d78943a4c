use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::execution_config::EvaluationLimits;

/// On-disk description of one exam: answer key, numbering layout, scoring and fixtures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExamDefinition {
    pub name: String,
    /// Raw-index to question-number segments. `None` means sequential numbering from 1.
    #[serde(default)]
    pub layout: Option<Vec<LayoutSegment>>,
    /// Questions graded outside the automatic pass.
    #[serde(default)]
    pub manual_questions: Vec<u32>,
    pub questions: BTreeMap<u32, QuestionEntry>,
    pub scoring: Vec<ScoreRuleSpec>,
    /// Named SQLite fixtures, relative to the definition file.
    #[serde(default)]
    pub fixtures: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub limits: EvaluationLimits,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutSegment {
    pub first_question: u32,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionEntry {
    #[serde(flatten)]
    pub check: CheckSpec,
    /// Instructor feedback shown when the answer is not fully correct.
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckSpec {
    Exact {
        answer: String,
        #[serde(default)]
        case_sensitive: bool,
    },
    MultiSelect {
        answers: Vec<String>,
    },
    OneOf {
        answers: Vec<String>,
    },
    Sql(SqlCheckSpec),
    Command(CommandCheckSpec),
}

impl CheckSpec {
    pub fn is_executable(&self) -> bool {
        matches!(self, CheckSpec::Sql(_) | CheckSpec::Command(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SqlCheckSpec {
    /// Name of an entry in [`ExamDefinition::fixtures`].
    pub fixture: String,
    pub reference: String,
    #[serde(default)]
    pub comparison: SqlComparison,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SqlComparison {
    /// Order-insensitive multiset equality of rows.
    #[default]
    RowSet,
    /// Only the number of rows must agree.
    RowCount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandCheckSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// File name the submitted source is written to before the run.
    #[serde(default = "default_source_file_name")]
    pub source_file: String,
    pub cases: Vec<CommandCase>,
    #[serde(default)]
    pub comparison: OutputComparison,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandCase {
    #[serde(default)]
    pub stdin: String,
    pub expected: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputComparison {
    /// Normalized output must be identical.
    #[default]
    Structural,
    /// Only the number of non-empty output lines must agree.
    LineCount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreRuleSpec {
    #[serde(flatten)]
    pub questions: QuestionSelectorSpec,
    pub correct: u32,
    #[serde(default)]
    pub partial: u32,
    /// Defaults to `correct`.
    #[serde(default)]
    pub max: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSelectorSpec {
    /// Inclusive `[first, last]`.
    Range([u32; 2]),
    List(Vec<u32>),
}

fn default_source_file_name() -> String {
    "submission".to_string()
}

impl ExamDefinition {
    /// Resolves fixture paths relative to the directory holding the definition.
    pub fn fixture_paths(&self, base_dir: &Path) -> BTreeMap<String, PathBuf> {
        self.fixtures
            .iter()
            .map(|(name, path)| {
                let resolved = if path.is_relative() {
                    base_dir.join(path)
                } else {
                    path.clone()
                };
                (name.clone(), resolved)
            })
            .collect()
    }
}

/// Read an exam definition JSON file.
pub fn load_definition(path: &Path) -> Result<ExamDefinition, String> {
    use std::io::ErrorKind;

    // Short, standardized I/O errors
    let s = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = match e.kind() {
                ErrorKind::NotFound => format!("Exam definition not found: {}", path.display()),
                ErrorKind::PermissionDenied => {
                    "Permission denied reading exam definition".to_string()
                }
                ErrorKind::InvalidData => "Exam definition is not valid UTF-8".to_string(),
                _ => format!("Failed to read exam definition ({})", e.kind()),
            };
            tracing::warn!(path = %path.display(), "{msg}");
            return Err(msg);
        }
    };

    let definition = serde_json::from_str::<ExamDefinition>(&s)
        .map_err(|e| format!("Invalid exam definition JSON: {e}"))?;
    tracing::info!(
        exam = %definition.name,
        questions = definition.questions.len(),
        fixtures = definition.fixtures.len(),
        "Loaded exam definition from {}",
        path.display()
    );
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const M21: &str = r#"{
        "name": "M2.1",
        "questions": {
            "1": { "kind": "exact", "answer": "A" },
            "3": { "kind": "multi_select", "answers": ["C", "E"], "feedback": "Two options apply." },
            "4": { "kind": "one_of", "answers": ["A", "B"] },
            "6": { "kind": "sql", "fixture": "northwind", "reference": "SELECT 1" },
            "7": {
                "kind": "command",
                "program": "python3",
                "cases": [{ "stdin": "2", "expected": "4" }],
                "comparison": "line_count"
            }
        },
        "scoring": [
            { "range": [1, 8], "correct": 4, "partial": 2 },
            { "list": [10, 14, 15], "correct": 14 }
        ],
        "fixtures": { "northwind": "northwind.db" },
        "limits": { "timeout_ms": 2000 }
    }"#;

    #[test]
    fn test_parse_all_check_kinds() {
        let def: ExamDefinition = serde_json::from_str(M21).unwrap();
        assert_eq!(def.name, "M2.1");
        assert!(def.layout.is_none());
        assert_eq!(def.questions.len(), 5);

        assert_eq!(
            def.questions[&1].check,
            CheckSpec::Exact {
                answer: "A".into(),
                case_sensitive: false
            }
        );
        assert_eq!(def.questions[&3].feedback.as_deref(), Some("Two options apply."));

        match &def.questions[&6].check {
            CheckSpec::Sql(sql) => {
                assert_eq!(sql.fixture, "northwind");
                assert_eq!(sql.comparison, SqlComparison::RowSet);
            }
            other => panic!("expected sql check, got {other:?}"),
        }
        match &def.questions[&7].check {
            CheckSpec::Command(cmd) => {
                assert_eq!(cmd.source_file, "submission");
                assert_eq!(cmd.comparison, OutputComparison::LineCount);
                assert_eq!(cmd.cases[0].expected, "4");
            }
            other => panic!("expected command check, got {other:?}"),
        }
        assert!(def.questions[&7].check.is_executable());
        assert!(!def.questions[&4].check.is_executable());

        assert_eq!(def.scoring[0].questions, QuestionSelectorSpec::Range([1, 8]));
        assert_eq!(def.scoring[0].partial, 2);
        assert_eq!(def.scoring[1].questions, QuestionSelectorSpec::List(vec![10, 14, 15]));
        assert_eq!(def.scoring[1].max, None);
        assert_eq!(def.limits.timeout_ms, 2000);
    }

    #[test]
    fn test_fixture_paths_resolve_relative_to_base() {
        let def: ExamDefinition = serde_json::from_str(M21).unwrap();
        let paths = def.fixture_paths(Path::new("/exams/m21"));
        assert_eq!(paths["northwind"], PathBuf::from("/exams/m21/northwind.db"));
    }

    #[test]
    fn test_load_definition_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(M21.as_bytes()).unwrap();
        let def = load_definition(file.path()).unwrap();
        assert_eq!(def.scoring.len(), 2);
    }

    #[test]
    fn test_load_definition_missing_file() {
        let err = load_definition(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.contains("not found"), "got: {err}");
    }

    #[test]
    fn test_load_definition_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "name": "broken", "questions": 3 }"#).unwrap();
        let err = load_definition(file.path()).unwrap_err();
        assert!(err.starts_with("Invalid exam definition JSON"), "got: {err}");
    }
}
