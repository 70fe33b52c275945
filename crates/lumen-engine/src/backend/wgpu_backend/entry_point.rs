use crate::backend::types::ShaderStage;

/// Checks that `source` declares exactly one entry point for `stage`.
///
/// Pipelines pick the entry point implicitly, so a module with none or several
/// cannot be used. Attributes inside comments do not count.
pub(super) fn entry_point_error(stage: ShaderStage, source: &str) -> Option<String> {
    let code = strip_comments(source);
    if code.trim().is_empty() {
        return Some("empty shader source".to_string());
    }

    let attr = match stage {
        ShaderStage::Vertex => "@vertex",
        ShaderStage::Fragment => "@fragment",
    };
    let found = code
        .match_indices(attr)
        .filter(|(at, _)| !is_ident_char(code[at + attr.len()..].chars().next()))
        .count();

    (found != 1).then(|| format!("expected exactly one {attr} entry point, found {found}"))
}

fn is_ident_char(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Replaces WGSL comments with whitespace. Block comments nest.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut depth = 0usize;

    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        if depth > 0 {
            match (c, next) {
                ('*', Some('/')) => {
                    chars.next();
                    depth -= 1;
                    out.push(' ');
                }
                ('/', Some('*')) => {
                    chars.next();
                    depth += 1;
                }
                ('\n', _) => out.push('\n'),
                _ => {}
            }
            continue;
        }

        match (c, next) {
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                depth = 1;
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = "@vertex\nfn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {\n    return vec4<f32>(p, 1.0);\n}\n";

    #[test]
    fn single_entry_point_passes() {
        assert_eq!(entry_point_error(ShaderStage::Vertex, VS), None);
    }

    #[test]
    fn commented_attributes_are_ignored() {
        let src = format!("// @vertex entry below\n/* old: @vertex /* nested @vertex */ fn a() {{}} */\n{VS}");
        assert_eq!(entry_point_error(ShaderStage::Vertex, &src), None);
    }

    #[test]
    fn missing_and_duplicate_entry_points_are_reported() {
        let missing = entry_point_error(ShaderStage::Fragment, VS);
        assert!(missing.is_some_and(|e| e.contains("found 0")));

        let twice = format!("{VS}\n@vertex fn other() -> @builtin(position) vec4<f32> {{ return vec4<f32>(); }}");
        let dup = entry_point_error(ShaderStage::Vertex, &twice);
        assert!(dup.is_some_and(|e| e.contains("found 2")));
    }

    #[test]
    fn comment_only_source_is_empty() {
        let err = entry_point_error(ShaderStage::Vertex, "// nothing here\n/* @vertex */");
        assert_eq!(err.as_deref(), Some("empty shader source"));
    }
}
