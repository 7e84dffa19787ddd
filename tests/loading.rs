mod common;

use pretty_assertions::assert_eq;
use stache::{Context, Engine};
use tempfile::tempdir;

use common::write_file;

#[test]
fn can_load_templates_from_glob() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "hello.html", "Hello {{name}}");
    write_file(dir.path(), "nested/list.html", "{{for:x:xs}}{{x}}{{endfor}}");
    write_file(dir.path(), "ignored.txt", "nope");

    let mut engine = Engine::default();
    engine.load_glob(&format!("{}/**/*.html", dir.path().display())).unwrap();

    let mut names = engine.template_names().collect::<Vec<_>>();
    names.sort_unstable();
    assert_eq!(names, vec!["hello.html", "nested/list.html"]);

    let mut ctx = Context::new();
    ctx.insert("name", "<you>");
    ctx.insert("xs", &vec![1, 2]);
    assert_eq!(engine.render("hello.html", &ctx).unwrap(), "Hello &lt;you&gt;");
    assert_eq!(engine.render("nested/list.html", &ctx).unwrap(), "12");
}

#[test]
fn glob_keeps_raw_templates() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.html", "A");

    let mut engine = Engine::default();
    engine.add_raw_template("raw", "R");
    engine.load_glob(&format!("{}/*.html", dir.path().display())).unwrap();

    assert_eq!(engine.render("raw", &Context::new()).unwrap(), "R");
    assert_eq!(engine.render("a.html", &Context::new()).unwrap(), "A");
}

#[test]
fn glob_on_missing_dir_is_an_error() {
    let dir = tempdir().unwrap();
    let mut engine = Engine::default();
    assert!(engine.load_glob(&format!("{}/nothing/*.html", dir.path().display())).is_err());
}

#[test]
fn can_add_single_file() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "page.html", "{{if:ok}}yes{{endif}}");

    let mut engine = Engine::default();
    engine.add_template_file(dir.path().join("page.html"), Some("page")).unwrap();
    let tpl = engine.get_template("page").unwrap();
    assert!(tpl.path.as_deref().unwrap().ends_with("page.html"));

    let mut ctx = Context::new();
    ctx.insert("ok", &1);
    assert_eq!(engine.render("page", &ctx).unwrap(), "yes");
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let mut engine = Engine::default();
    let err = engine.add_template_file(dir.path().join("absent.html"), None).unwrap_err();
    assert!(err.to_string().starts_with("Couldn't open template"));
}
