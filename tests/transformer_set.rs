use modbump::modpath::{check_path, rewrite_import_path};
use modbump::transform::{run_transformers, FileKind, TransformerSet};
use std::path::Path;

fn transform(new_path: &str, file: &str, content: &str) -> Option<String> {
    let set = TransformerSet::new(new_path).unwrap();
    let kind = FileKind::detect(Path::new(file)).unwrap();
    run_transformers(content, set.for_kind(kind)).unwrap()
}

#[test]
fn every_file_kind_converges_after_one_pass() {
    let cases = [
        ("go.mod", "module example.org/foo/bar\n"),
        (
            "main.go",
            "package main\n\nimport \"example.org/foo/bar/sub\"\n",
        ),
        (
            "api.proto",
            "option go_package = \"example.org/foo/bar/api;api\";\n",
        ),
    ];

    for (file, content) in cases {
        let once = transform("example.org/foo/bar/v2", file, content)
            .unwrap_or_else(|| panic!("{} should change", file));
        assert!(once.contains("example.org/foo/bar/v2"), "{}: {}", file, once);
        assert_eq!(transform("example.org/foo/bar/v2", file, &once), None, "{}", file);
    }
}

#[test]
fn round_trip_restores_original_content() {
    let original = "package main\n\nimport (\n\t\"example.org/foo/bar\"\n\tx \"example.org/foo/bar/sub/dir\"\n)\n";

    let up = transform("example.org/foo/bar/v2", "main.go", original).unwrap();
    let down = transform("example.org/foo/bar", "main.go", &up).unwrap();

    assert_eq!(down, original);
}

#[test]
fn conflicting_tail_is_left_alone_everywhere() {
    let import = "example.org/foo/bar/v/v2v/v3";
    assert_eq!(rewrite_import_path("example.org/foo/bar/v2", import).unwrap(), None);

    let content = format!("package main\n\nimport \"{}\"\n", import);
    assert_eq!(transform("example.org/foo/bar/v2", "main.go", &content), None);
}

#[test]
fn targets_that_fail_validation_fail_every_transformer() {
    for target in ["example.org/foo/bar/v1", "example.org/foo/bar/v02"] {
        assert!(check_path(target).is_err());
        assert!(TransformerSet::new(target).is_ok());

        let set = TransformerSet::new(target).unwrap();
        let err = run_transformers("module example.org/foo/bar\n", set.for_kind(FileKind::GoMod))
            .unwrap_err();
        assert_eq!(err.code.as_str(), "modpath.invalid");
    }
}

#[test]
fn dotted_dialect_occurrences_become_the_new_path() {
    assert_eq!(
        rewrite_import_path("gopkg.in/yaml.v2", "gopkg.in/yaml.v1").unwrap().as_deref(),
        Some("gopkg.in/yaml.v2")
    );
    assert_eq!(
        rewrite_import_path("gopkg.in/yaml.v3", "gopkg.in/yaml.v2/sub").unwrap().as_deref(),
        Some("gopkg.in/yaml.v3")
    );
    assert!(check_path("gopkg.in/yaml.v3").is_ok());
}
