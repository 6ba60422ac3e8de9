//! # Applicator Import Rewriter
//!
//! File: cli/src/rewrite/imports.rs
//!
//! ## Overview
//!
//! Rewrites the module identity inside one Go compilation unit. Only tokens in
//! the file header are touched: the package name of files at the module root
//! and the string literals of matching imports. Everything else, including
//! formatting and comments, is copied through byte for byte.
//!
//! ## Rules
//!
//! Applied in header order, which is also ascending byte order:
//!
//! 1. **Root package rename.** For a file at the module root whose package is
//!    the source short name (or that name plus `_test`), the package becomes
//!    the destination short name with the same suffix. An illegal result is an
//!    error rather than a silent substitution.
//! 2. **Exact import.** `"<source>"` becomes `"<destination>"`. When the short
//!    names differ and the import has no alias, the source short name is added
//!    as an alias so unqualified references in the body keep resolving. Use
//!    sites are deliberately not renamed: doing that safely needs full symbol
//!    resolution, and a root package imported from its own subdirectories is
//!    rare in templates.
//! 3. **Prefix import.** `"<source>/rest"` becomes `"<destination>/rest"`.
//!
use crate::core::error::{ApplicatorError, RewriteResult};
use crate::rewrite::edit::EditBuffer;
use crate::rewrite::header::{parse_header, quote};
use crate::rewrite::naming::{check_identifier, short_name};

/// Package suffix used by external test packages.
pub const TEST_PACKAGE_SUFFIX: &str = "_test";

/// Rewrites `data`, a Go file at `file` (relative to the template root), from
/// `src_mod` to `dst_mod`. `is_root` marks files in the module root directory,
/// whose package name follows the module's short name.
pub fn rewrite_imports(
    data: &[u8],
    file: &str,
    src_mod: &str,
    dst_mod: &str,
    is_root: bool,
) -> RewriteResult<Vec<u8>> {
    let header = parse_header(data).map_err(|cause| ApplicatorError::Parse {
        file: file.to_string(),
        cause,
    })?;

    let src_name = short_name(src_mod);
    let dst_name = short_name(dst_mod);
    let mut buf = EditBuffer::new(data);

    if is_root {
        let package = &header.package;
        if let Some(suffix) = root_package_suffix(&package.name, src_name) {
            let new_name = format!("{dst_name}{suffix}");
            check_identifier(&new_name).map_err(|cause| ApplicatorError::InvalidIdentifier {
                file: file.to_string(),
                from: package.name.clone(),
                to: new_name.clone(),
                cause,
            })?;
            if new_name != package.name {
                buf.replace(package.span.start, package.span.end, new_name);
            }
        }
    }

    for import in &header.imports {
        let Some(path) = import.path.as_deref() else {
            continue;
        };
        let literal = &import.literal;
        if path == src_mod {
            if src_name != dst_name && import.alias.is_none() {
                buf.insert(literal.start, format!("{src_name} "));
            }
            buf.replace(literal.start, literal.end, quote(dst_mod));
        } else if let Some(rest) = path
            .strip_prefix(src_mod)
            .filter(|rest| rest.starts_with('/'))
        {
            buf.replace(literal.start, literal.end, quote(&format!("{dst_mod}{rest}")));
        }
    }

    Ok(buf.materialize())
}

/// Returns the suffix (`""` or `"_test"`) when `package` is the root package
/// named after `src_name`.
fn root_package_suffix<'a>(package: &'a str, src_name: &str) -> Option<&'a str> {
    let suffix = package.strip_prefix(src_name)?;
    (suffix.is_empty() || suffix == TEST_PACKAGE_SUFFIX).then_some(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "github.com/HardDie/tmpl";
    const DST: &str = "github.com/HardDie/newapp";

    fn rewrite(src: &str, is_root: bool) -> String {
        let out = rewrite_imports(src.as_bytes(), "file.go", SRC, DST, is_root).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_unrelated_file_is_unchanged() {
        let src = "package server\n\nimport (\n\t\"fmt\"\n\t\"github.com/other/tmpl\"\n\t\"github.com/HardDie/tmplx\"\n)\n\nfunc  odd( ) {\n}\n";
        assert_eq!(rewrite(src, false), src);
    }

    #[test]
    fn test_exact_import_gets_alias() {
        let src = "package handlers\n\nimport (\n\t\"fmt\"\n\t\"github.com/HardDie/tmpl\"\n)\n\nvar _ = tmpl.Version\n";
        let out = rewrite(src, false);
        assert_eq!(
            out,
            "package handlers\n\nimport (\n\t\"fmt\"\n\ttmpl \"github.com/HardDie/newapp\"\n)\n\nvar _ = tmpl.Version\n"
        );
        assert!(!out.contains("\t\"github.com/HardDie/tmpl\""));
    }

    #[test]
    fn test_exact_import_keeps_existing_alias() {
        let src = "package x\nimport t \"github.com/HardDie/tmpl\"\n";
        assert_eq!(rewrite(src, false), "package x\nimport t \"github.com/HardDie/newapp\"\n");

        let src = "package x\nimport _ `github.com/HardDie/tmpl`\n";
        assert_eq!(rewrite(src, false), "package x\nimport _ \"github.com/HardDie/newapp\"\n");
    }

    #[test]
    fn test_exact_import_same_short_name_has_no_alias() {
        let src = "package x\nimport \"github.com/old/tmpl\"\n";
        let out =
            rewrite_imports(src.as_bytes(), "x.go", "github.com/old/tmpl", "example.com/new/tmpl", false)
                .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "package x\nimport \"example.com/new/tmpl\"\n"
        );
    }

    #[test]
    fn test_prefix_import_keeps_suffix() {
        let src = "package x\n\nimport (\n\tcfg \"github.com/HardDie/tmpl/internal/config\" // settings\n\t\"github.com/HardDie/tmpl/pkg/log\"\n)\n";
        assert_eq!(
            rewrite(src, false),
            "package x\n\nimport (\n\tcfg \"github.com/HardDie/newapp/internal/config\" // settings\n\t\"github.com/HardDie/newapp/pkg/log\"\n)\n"
        );
    }

    #[test]
    fn test_prefix_import_with_self_similar_destination() {
        let out = rewrite_imports(
            b"package x\nimport \"example.com/a/sub\"\n",
            "x.go",
            "example.com/a",
            "example.com/a/b",
            false,
        )
        .unwrap();
        assert_eq!(out, b"package x\nimport \"example.com/a/b/sub\"\n".to_vec());
    }

    #[test]
    fn test_root_package_rename() {
        let src = "// Package tmpl is the root.\npackage tmpl\n\nimport \"fmt\"\n";
        assert_eq!(
            rewrite(src, true),
            "// Package tmpl is the root.\npackage newapp\n\nimport \"fmt\"\n"
        );
        // Outside the root directory the package clause is left alone.
        assert_eq!(rewrite(src, false), src);
    }

    #[test]
    fn test_root_test_package_keeps_suffix() {
        let src = "package tmpl_test\n\nimport (\n\t\"testing\"\n\n\t\"github.com/HardDie/tmpl\"\n)\n";
        assert_eq!(
            rewrite(src, true),
            "package newapp_test\n\nimport (\n\t\"testing\"\n\n\ttmpl \"github.com/HardDie/newapp\"\n)\n"
        );
    }

    #[test]
    fn test_root_package_with_other_name_is_kept() {
        let src = "package main\n\nimport \"github.com/HardDie/tmpl/internal/app\"\n";
        assert_eq!(
            rewrite(src, true),
            "package main\n\nimport \"github.com/HardDie/newapp/internal/app\"\n"
        );
        let src = "package tmplx\n";
        assert_eq!(rewrite(src, true), src);
    }

    #[test]
    fn test_invalid_package_name_is_reported() {
        let err = rewrite_imports(
            b"package tmpl\n",
            "tmpl.go",
            SRC,
            "github.com/HardDie/my-app",
            true,
        )
        .unwrap_err();
        match err {
            ApplicatorError::InvalidIdentifier { file, from, to, .. } => {
                assert_eq!(file, "tmpl.go");
                assert_eq!(from, "tmpl");
                assert_eq!(to, "my-app");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = rewrite_imports(b"not go", "internal/bad.go", SRC, DST, false).unwrap_err();
        assert!(matches!(err, ApplicatorError::Parse { .. }));
        assert!(err.to_string().starts_with("internal/bad.go: parsing source module: 1:1:"));

        let err = rewrite_imports(b"package type\n", "doc.go", SRC, DST, true).unwrap_err();
        assert!(matches!(err, ApplicatorError::Parse { .. }));
    }

    #[test]
    fn test_second_pass_is_noop() {
        let src = "package tmpl_test\n\nimport (\n\t\"github.com/HardDie/tmpl\"\n\t\"github.com/HardDie/tmpl/internal/x\"\n)\n";
        let once = rewrite(src, true);
        assert_ne!(once, src);
        assert_eq!(rewrite(&once, true), once);
    }

    #[test]
    fn test_body_is_not_scanned() {
        let src = "package main\n\nimport \"github.com/HardDie/tmpl/a\"\n\nfunc main() { s := \"github.com/HardDie/tmpl/b\"; _ = s }\n";
        assert_eq!(
            rewrite(src, false),
            "package main\n\nimport \"github.com/HardDie/newapp/a\"\n\nfunc main() { s := \"github.com/HardDie/tmpl/b\"; _ = s }\n"
        );
    }
}
