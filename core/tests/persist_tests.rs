use entity_core::persist::{load_model, load_models};
use std::fs;
use tempfile::tempdir;

#[test]
fn it_loads_bare_and_stored_documents() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("person.json"), r#"{"attributes":{"name":{"type":"string","score":0.8}}}"#).unwrap();
    fs::create_dir_all(dir.path().join("nested")).unwrap();
    fs::write(
        dir.path().join("nested/doc.json"),
        r#"{"_id":"company","_source":{"resolvers":{"r":{"attributes":["name"]}}}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let models = load_models(dir.path()).unwrap();
    let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["company", "person"]);
    assert_eq!(models[1].model.attribute_score("name"), Some(0.8));
    assert_eq!(models[0].model.resolvers["r"].attributes, vec!["name"]);
}

#[test]
fn it_reports_the_failing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{not json").unwrap();
    let err = load_model(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
}
