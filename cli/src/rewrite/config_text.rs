//! # Applicator Config Text Rewriter
//!
//! File: cli/src/rewrite/config_text.rs
//!
//! Replaces the template's slug with the new application name in files that
//! are neither Go sources nor the module descriptor (Dockerfiles, `.env`
//! files, Makefiles, YAML, README, ...).
//!
//! The substitution is a global, case-sensitive byte match with no word
//! boundary check: `my_harddie_go_template_extra` becomes `my_<app>_extra`.
//! This mirrors how template authors embed the slug in compound names
//! (`harddie_go_template_db`), at the cost of also rewriting unrelated tokens
//! that merely contain the slug.
//!

/// Replaces every occurrence of `slug` in `data` with `app_name`.
///
/// Works on raw bytes, so binary and non-UTF-8 files pass through intact
/// when they do not contain the slug. An empty slug matches nothing.
pub fn rewrite_config(data: &[u8], slug: &str, app_name: &str) -> Vec<u8> {
    let needle = slug.as_bytes();
    if needle.is_empty() || data.len() < needle.len() {
        return data.to_vec();
    }

    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i + needle.len() <= data.len() {
        if data[i..].starts_with(needle) {
            out.extend_from_slice(app_name.as_bytes());
            i += needle.len();
        } else {
            out.push(data[i]);
            i += 1;
        }
    }
    out.extend_from_slice(&data[i..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLUG: &str = "harddie_go_template";

    #[test]
    fn test_replaces_every_occurrence() {
        let src = b"APP_NAME=harddie_go_template\nDB=harddie_go_template_db\n";
        assert_eq!(
            rewrite_config(src, SLUG, "shop"),
            b"APP_NAME=shop\nDB=shop_db\n".to_vec()
        );
    }

    #[test]
    fn test_replaces_inside_longer_tokens() {
        let out = rewrite_config(b"name: my_harddie_go_template_extra", SLUG, "shop");
        assert_eq!(out, b"name: my_shop_extra".to_vec());
    }

    #[test]
    fn test_is_case_sensitive() {
        let src = b"HARDDIE_GO_TEMPLATE Harddie_go_template";
        assert_eq!(rewrite_config(src, SLUG, "shop"), src.to_vec());
    }

    #[test]
    fn test_no_occurrence_and_binary_data() {
        let src = [0xFFu8, 0x00, 0xFE, b'h', b'a'];
        assert_eq!(rewrite_config(&src, SLUG, "shop"), src.to_vec());
        assert_eq!(rewrite_config(b"", SLUG, "shop"), Vec::<u8>::new());
        assert_eq!(rewrite_config(b"abc", "", "shop"), b"abc".to_vec());
    }

    #[test]
    fn test_overlapping_candidates_and_trailing_bytes() {
        assert_eq!(rewrite_config(b"aaab", "aa", "x"), b"xab".to_vec());
        assert_eq!(rewrite_config(b"xharddie_go_templat", SLUG, "y"), b"xharddie_go_templat".to_vec());
    }
}
