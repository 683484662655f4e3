// Analysis prompt templates.
// Placeholders are substituted by `fill_template`.

pub const THREAT_SAFETY_PROMPT: &str = "\
Analyze this cybersecurity threat and determine if it's genuinely dangerous or safe: {threat_data}

Consider the threat type, severity, indicators, and attack vectors. \
Provide a detailed safety assessment.";

pub const FILE_ENCRYPTION_PROMPT: &str = "\
Analyze this file for encryption.
File name: {file_name}
Data sample: {file_sample}

Identify if the file is encrypted, what encryption method is used, \
assess encryption strength, and provide security recommendations.";

pub const DETAILED_ANALYSIS_PROMPT: &str = "\
Provide a comprehensive security analysis of this threat: {threat_description}

Include:
1) Threat overview
2) Attack vectors
3) Potential impact
4) Mitigation strategies
5) Detection methods";

/// Substitutes `{key}` placeholders in a single pass over `template`.
/// Inserted values are never scanned again, so user text that happens to
/// contain a placeholder is sent verbatim.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = values.iter().find_map(|&(key, value)| {
            tail.strip_prefix('{')?
                .strip_prefix(key)?
                .strip_prefix('}')
                .map(|after| (value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_substitutes_every_key() {
        let out = fill_template(
            FILE_ENCRYPTION_PROMPT,
            &[("file_name", "a.bin"), ("file_sample", "PK\u{3}\u{4}")],
        );
        assert!(out.contains("File name: a.bin\n"));
        assert!(out.contains("Data sample: PK\u{3}\u{4}\n"));
        assert!(!out.contains("{file_"));
    }

    #[test]
    fn test_fill_template_leaves_inserted_values_alone() {
        let out = fill_template(
            "name={file_name} sample={file_sample}",
            &[("file_name", "{file_sample}"), ("file_sample", "x {file_name} y")],
        );
        assert_eq!(out, "name={file_sample} sample=x {file_name} y");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let out = fill_template("{\"k\": {threat_data}} {other}", &[("threat_data", "1")]);
        assert_eq!(out, "{\"k\": 1} {other}");
    }
}
