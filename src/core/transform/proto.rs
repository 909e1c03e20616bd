use regex::Regex;

use crate::error::{Error, Result};
use crate::modpath::rewrite_import_path;

use super::Transformer;

/// Updates Go module paths in a .proto file.
///
/// Two line shapes are recognized:
/// - `import "path/to/file.proto";` (also `import public` / `import weak`)
/// - `option go_package = "path";` with an optional `;alias` suffix, see
///   <https://protobuf.dev/reference/go/go-generated/#package>
///
/// Everything else, including line endings, is copied verbatim.
pub struct ProtoTransformer {
    new_path: String,
    import_re: Regex,
    go_package_re: Regex,
}

impl ProtoTransformer {
    pub fn new(new_path: impl Into<String>) -> Result<Self> {
        Ok(Self {
            new_path: new_path.into(),
            import_re: compile(r#"^(\s*import\s+(?:(?:public|weak)\s+)?")([^"]*)(".*)$"#)?,
            go_package_re: compile(r#"^(\s*option\s+go_package\s*=\s*")([^"]*)(".*)$"#)?,
        })
    }

    /// Rewrite the quoted value of one line, if the line is a recognized
    /// statement whose path matches.
    fn rewrite_line(&self, line: &str) -> Result<Option<String>> {
        if let Some(caps) = self.import_re.captures(line) {
            let path = &caps[2];
            return Ok(self
                .rewrite_path(path)?
                .map(|np| format!("{}{}{}", &caps[1], np, &caps[3])));
        }

        if let Some(caps) = self.go_package_re.captures(line) {
            let value = &caps[2];
            let (path, alias) = match value.split_once(';') {
                Some((path, alias)) => (path, Some(alias)),
                None => (value, None),
            };

            return Ok(self.rewrite_path(path)?.map(|np| {
                let value = match alias {
                    Some(alias) => format!("{};{}", np, alias),
                    None => np,
                };
                format!("{}{}{}", &caps[1], value, &caps[3])
            }));
        }

        Ok(None)
    }

    fn rewrite_path(&self, path: &str) -> Result<Option<String>> {
        Ok(rewrite_import_path(&self.new_path, path)?.filter(|np| np != path))
    }
}

impl Transformer for ProtoTransformer {
    fn format(&self) -> &'static str {
        "proto"
    }

    fn transform(&self, content: &str) -> Result<Option<String>> {
        let mut out = String::with_capacity(content.len());
        let mut modified = false;

        for raw_line in content.split_inclusive('\n') {
            let body = raw_line.trim_end_matches(['\n', '\r']);
            let ending = &raw_line[body.len()..];

            match self.rewrite_line(body)? {
                Some(updated) => {
                    modified = true;
                    out.push_str(&updated);
                    out.push_str(ending);
                }
                None => out.push_str(raw_line),
            }
        }

        Ok(modified.then_some(out))
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::internal_unexpected(format!("proto pattern: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proto_with(line: &str) -> String {
        format!(
            "syntax = \"proto3\";\npackage foobar;\n\n{}\n\nmessage FooBar{{\n\tstring foo = 1;\n}}\n",
            line
        )
    }

    fn run(new_path: &str, content: &str) -> Result<Option<String>> {
        ProtoTransformer::new(new_path)?.transform(content)
    }

    #[test]
    fn updates_import_to_newer_version() {
        let out = run(
            "example.org/foo/bar/v2",
            &proto_with("import \"example.org/foo/bar/blah/some.proto\";"),
        )
        .unwrap();
        assert_eq!(
            out,
            Some(proto_with("import \"example.org/foo/bar/v2/blah/some.proto\";"))
        );
    }

    #[test]
    fn updates_import_to_older_version() {
        let out = run(
            "example.org/foo/bar",
            &proto_with("import \"example.org/foo/bar/v2/blah/some.proto\";"),
        )
        .unwrap();
        assert_eq!(
            out,
            Some(proto_with("import \"example.org/foo/bar/blah/some.proto\";"))
        );
    }

    #[test]
    fn updates_public_import() {
        let out = run(
            "example.org/foo/bar/v3",
            &proto_with("import public \"example.org/foo/bar/v2/a.proto\";"),
        )
        .unwrap();
        assert_eq!(
            out,
            Some(proto_with("import public \"example.org/foo/bar/v3/a.proto\";"))
        );
    }

    #[test]
    fn does_not_update_partially_matching_import() {
        let content = proto_with("import \"example.org/bar/foo/blah/v2/some.proto\";");
        assert_eq!(run("example.org/foo/bar/v3", &content).unwrap(), None);
    }

    #[test]
    fn does_not_update_non_matching_import() {
        let content = proto_with("import \"example.org/bar/foo/blah/some.proto\";");
        assert_eq!(run("example.org/foo/bar/v2", &content).unwrap(), None);
    }

    #[test]
    fn updates_go_package_option() {
        let out = run(
            "example.org/foo/bar/v2",
            &proto_with("option go_package = \"example.org/foo/bar\";"),
        )
        .unwrap();
        assert_eq!(
            out,
            Some(proto_with("option go_package = \"example.org/foo/bar/v2\";"))
        );

        let out = run(
            "example.org/foo/bar",
            &proto_with("option go_package = \"example.org/foo/bar/v2\";"),
        )
        .unwrap();
        assert_eq!(
            out,
            Some(proto_with("option go_package = \"example.org/foo/bar\";"))
        );
    }

    #[test]
    fn keeps_go_package_alias() {
        let out = run(
            "example.org/foo/bar/v2",
            &proto_with("option go_package = \"example.org/foo/bar;foobar\";"),
        )
        .unwrap();
        assert_eq!(
            out,
            Some(proto_with("option go_package = \"example.org/foo/bar/v2;foobar\";"))
        );

        let out = run(
            "example.org/foo/bar",
            &proto_with("option go_package = \"example.org/foo/bar/v2;foobar\";"),
        )
        .unwrap();
        assert_eq!(
            out,
            Some(proto_with("option go_package = \"example.org/foo/bar;foobar\";"))
        );
    }

    #[test]
    fn does_not_update_non_matching_go_package() {
        let content = proto_with("option go_package = \"example.org/bar/foo\";");
        assert_eq!(run("example.org/foo/bar/v2", &content).unwrap(), None);
    }

    #[test]
    fn invalid_new_path_is_an_error() {
        let err = run(
            "example.org/foo/bar/v1",
            &proto_with("import \"example.org/bar/foo/blah/some.proto\";"),
        )
        .unwrap_err();
        assert_eq!(err.code.as_str(), "modpath.invalid");

        assert!(run(
            "example.org/foo/bar/v1",
            &proto_with("option go_package = \"example.org/foo/bar\";"),
        )
        .is_err());
    }

    #[test]
    fn preserves_crlf_and_missing_final_newline() {
        let content = "syntax = \"proto3\";\r\nimport \"example.org/foo/bar/a.proto\";";
        let out = run("example.org/foo/bar/v2", content).unwrap();
        assert_eq!(
            out.as_deref(),
            Some("syntax = \"proto3\";\r\nimport \"example.org/foo/bar/v2/a.proto\";")
        );
    }
}
