//! Path translation between the two servers' mount namespaces.
//!
//! A translation table is an ordered list of prefix substitutions. Rules are
//! applied in sequence against the *current* value of the path, so a later
//! rule can rewrite the output of an earlier one (two-stage remaps such as a
//! volume mount remap followed by a library-internal remap). Pure and
//! deterministic; the table order is the caller's and is preserved exactly.

/// One `source prefix -> dest prefix` substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTranslation {
    pub source: String,
    pub dest: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathMapError {
    #[error("path map rule '{0}' is missing the ':' separator (expected SOURCE:DEST)")]
    MissingSeparator(String),
    #[error("path map rule '{0}' has an empty source prefix")]
    EmptySource(String),
}

/// Parse `SOURCE:DEST` rules into a translation table, preserving order.
/// Malformed rules are a fatal configuration error.
pub fn parse_path_map(rules: &[String]) -> Result<Vec<PathTranslation>, PathMapError> {
    rules
        .iter()
        .map(|rule| {
            let (source, dest) = rule
                .split_once(':')
                .ok_or_else(|| PathMapError::MissingSeparator(rule.clone()))?;
            if source.is_empty() {
                return Err(PathMapError::EmptySource(rule.clone()));
            }
            Ok(PathTranslation {
                source: source.to_string(),
                dest: dest.to_string(),
            })
        })
        .collect()
}

/// Apply every rule in table order. A rule fires when the current path starts
/// with its source prefix, replacing the prefix and keeping the suffix
/// verbatim. A path no rule matches is returned unchanged.
pub fn translate_path(path: &str, table: &[PathTranslation]) -> String {
    let mut current = path.to_string();
    for rule in table {
        if let Some(suffix) = current.strip_prefix(&rule.source) {
            current = format!("{}{}", rule.dest, suffix);
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_FILENAME: &str =
        "Meet the Press (1947)/Season 2020/S2020E01 - January 5, 2020 [SDTV x264 AAC].mp4";

    fn rule(source: &str, dest: &str) -> PathTranslation {
        PathTranslation {
            source: source.to_string(),
            dest: dest.to_string(),
        }
    }

    #[test]
    fn test_parse_path_map() {
        let rules = parse_path_map(&["/media:/mnt/media".to_string()]).unwrap();
        assert_eq!(rules, vec![rule("/media", "/mnt/media")]);
    }

    #[test]
    fn test_parse_path_map_missing_separator() {
        let err = parse_path_map(&["/media/mnt".to_string()]).unwrap_err();
        assert_eq!(err, PathMapError::MissingSeparator("/media/mnt".into()));
    }

    #[test]
    fn test_parse_path_map_empty_source() {
        let err = parse_path_map(&[":/mnt".to_string()]).unwrap_err();
        assert_eq!(err, PathMapError::EmptySource(":/mnt".into()));
    }

    #[test]
    fn test_translate_empty_table() {
        assert_eq!(translate_path("foo", &[]), "foo");
    }

    #[test]
    fn test_translate_no_rule_matches() {
        let table = vec![rule("/data", "/mnt/data")];
        assert_eq!(translate_path("/media/x.mp4", &table), "/media/x.mp4");
    }

    #[test]
    fn test_translate_simple() {
        let path = format!("/media/television/{}", EXAMPLE_FILENAME);
        let table = vec![rule("/media", "/mnt/media")];
        assert_eq!(
            translate_path(&path, &table),
            format!("/mnt/media/television/{}", EXAMPLE_FILENAME)
        );
    }

    #[test]
    fn test_translate_one_of_many() {
        let path = format!("/media/television/{}", EXAMPLE_FILENAME);
        let table = vec![
            rule("/media", "/mnt/media"),
            rule("/television", "/mnt/media/television"),
        ];
        assert_eq!(
            translate_path(&path, &table),
            format!("/mnt/media/television/{}", EXAMPLE_FILENAME)
        );
    }

    #[test]
    fn test_translate_chained_rules() {
        let path = format!("/media/television/{}", EXAMPLE_FILENAME);
        let table = vec![
            rule("/media", "/mnt/media"),
            rule("/mnt/media/television", "/tv"),
        ];
        assert_eq!(
            translate_path(&path, &table),
            format!("/tv/{}", EXAMPLE_FILENAME)
        );
    }

    #[test]
    fn test_translate_order_matters() {
        let forward = vec![rule("/a", "/b"), rule("/b", "/c")];
        let reverse = vec![rule("/b", "/c"), rule("/a", "/b")];
        assert_eq!(translate_path("/a/x", &forward), "/c/x");
        assert_eq!(translate_path("/a/x", &reverse), "/b/x");
    }

    #[test]
    fn test_translate_is_deterministic() {
        let table = vec![rule("/media", "/mnt/media")];
        let first = translate_path("/media/movies/a.mkv", &table);
        let second = translate_path("/media/movies/a.mkv", &table);
        assert_eq!(first, second);
    }

    #[test]
    fn test_translate_suffix_preserved_verbatim() {
        // The suffix is not reparsed, odd characters and all
        let table = vec![rule("/media", "/mnt")];
        assert_eq!(
            translate_path("/media/a b [x]/../c.mkv", &table),
            "/mnt/a b [x]/../c.mkv"
        );
    }
}
