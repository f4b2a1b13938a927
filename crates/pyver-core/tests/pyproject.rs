use pyver_core::policy::Modifier;
use pyver_core::pyproject::{multiline_array, Pyproject};
use toml_edit::Item;

fn project(content: &str) -> Pyproject {
    Pyproject::from_string("pyproject.toml", content).unwrap()
}

#[test]
fn parse_failure_is_reported() {
    let err = Pyproject::from_string("bad.toml", "not [ valid").unwrap_err();
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn requires_python_prefers_project_table() {
    let p = project(
        r#"
[project]
requires-python = ">=3.9"

[tool.poetry.dependencies]
python = ">=3.11"
"#,
    );
    assert_eq!(p.requires_python().as_deref(), Some(">=3.9"));
}

#[test]
fn requires_python_from_poetry() {
    let p = project(
        r#"
[tool.poetry.dependencies]
python = ">=3.9,<3.13"
"#,
    );
    assert_eq!(p.requires_python().as_deref(), Some(">=3.9,<3.13"));

    let p = project(
        r#"
[tool.poetry.dependencies]
python = { version = ">=3.9" }
"#,
    );
    assert_eq!(p.requires_python().as_deref(), Some(">=3.9"));
}

#[test]
fn policy_table_with_legacy_fallback() {
    let p = project(
        r#"
[tool.python-versions.dependencies]
requests = "major"
"#,
    );
    let policy = p.dependency_policy().unwrap();
    assert_eq!(*policy.modifier_for("requests"), Modifier::Major);

    let p = project(
        r#"
[tool.python-versions-hook]
requests = "minor"
"#,
    );
    let policy = p.dependency_policy().unwrap();
    assert_eq!(*policy.modifier_for("requests"), Modifier::Minor);

    let p = project("[project]\nname = \"x\"\n");
    assert!(p.dependency_policy().is_none());
}

#[test]
fn set_array_creates_missing_parents() {
    let mut p = project("[project]\nname = \"x\"\n");
    let mut array = toml_edit::Array::new();
    array.push("pkg==1.0");
    p.set_array(&["project", "optional-dependencies", "extra"], array)
        .unwrap();
    assert!(p.is_changed());
    let rendered = p.doc().to_string();
    assert!(rendered.contains("[project.optional-dependencies]"));
    assert!(rendered.contains("pkg==1.0"));
}

#[test]
fn set_array_replaces_an_existing_list() {
    let mut p = project("[project]\ndependencies = [\"old==1.0\"]\n");
    let mut array = toml_edit::Array::new();
    array.push("new==2.0");
    p.set_array(&["project", "dependencies"], array).unwrap();
    assert_eq!(p.project_dependencies().unwrap(), vec!["new==2.0"]);
}

#[test]
fn set_array_rejects_a_non_table_parent() {
    let mut p = project("project = 3\n");
    let err = p
        .set_array(&["project", "dependencies"], toml_edit::Array::new())
        .unwrap_err();
    assert!(err.to_string().contains("project is not a table"));
    assert!(!p.is_changed());

    let mut p = project("[project]\ndependencies = [\"x==1\"]\n");
    let err = p
        .set_array(
            &["project", "dependencies", "nested"],
            toml_edit::Array::new(),
        )
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("project.dependencies is not a table"));
}

#[test]
fn get_path_reaches_into_inline_tables() {
    let p = project("tool = { poetry = { dependencies = { python = \"^3.11\" } } }\n");
    let item = p
        .get_path(&["tool", "poetry", "dependencies", "python"])
        .unwrap();
    assert_eq!(item.as_str(), Some("^3.11"));
}

#[test]
fn unchanged_document_renders_identically() {
    let content = "# header\n[project]\nname = \"x\"  # inline\n";
    let p = project(content);
    assert!(!p.is_changed());
    assert_eq!(p.doc().to_string(), content);
}

#[test]
fn project_dependencies_reads_strings() {
    let p = project(
        r#"
[project]
dependencies = ["requests==2.31.0", "click>=8"]
"#,
    );
    assert_eq!(
        p.project_dependencies().unwrap(),
        vec!["requests==2.31.0", "click>=8"]
    );

    let p = project("[project]\nname = \"x\"\n");
    assert!(p.project_dependencies().unwrap().is_empty());
}

#[test]
fn non_string_dependency_entry_is_an_error() {
    let p = project(
        r#"
[project]
dependencies = ["ok==1.0", 3]
"#,
    );
    assert!(p.project_dependencies().is_err());
}

#[test]
fn optional_groups_keep_declared_order() {
    let p = project(
        r#"
[project.optional-dependencies]
docs = ["sphinx"]
test = ["pytest"]
"#,
    );
    let groups = p.optional_dependency_groups().unwrap();
    let names: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["docs", "test"]);
}

#[test]
fn string_array_distinguishes_absent_from_malformed() {
    let p = project(
        r#"
[project]
classifiers = ["Programming Language :: Python"]
"#,
    );
    assert_eq!(
        p.string_array(&["project", "classifiers"]).unwrap(),
        Some(vec!["Programming Language :: Python".to_string()])
    );
    assert_eq!(p.string_array(&["project", "keywords"]).unwrap(), None);

    let p = project("[project]\nclassifiers = [1, 2]\n");
    assert!(p.string_array(&["project", "classifiers"]).is_err());
}

#[test]
fn multiline_array_layout() {
    let array = multiline_array(&["a".to_string(), "b".to_string()]);
    let mut p = project("[project]\n");
    p.doc_mut()["project"]["classifiers"] = Item::Value(toml_edit::Value::Array(array));
    let rendered = p.doc().to_string();
    assert!(rendered.contains("classifiers = [\n  \"a\",\n  \"b\",\n]"));
}

#[test]
fn save_writes_only_on_change() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pyproject.toml");
    std::fs::write(&path, "[project]\nname = \"x\"\n").unwrap();

    let mut p = Pyproject::open(&path).unwrap();
    assert!(!p.save().unwrap());

    p.doc_mut()["project"]["name"] = toml_edit::value("y");
    assert!(p.save().unwrap());
    assert!(!p.save().unwrap());
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"y\""));
}
