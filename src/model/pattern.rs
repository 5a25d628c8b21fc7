//! Glob matching for repository file paths.
//!
//! Paths and patterns are split on `/`. `*` and `?` never cross a segment
//! boundary, while a `**` segment matches zero or more whole segments.

pub fn matches(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = pattern.trim_start_matches('/').split('/').collect();
    let path: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match_segments(&pattern, &path)
}

pub fn matches_any<S: AsRef<str>>(patterns: &[S], path: &str) -> bool {
    patterns.iter().any(|p| matches(p.as_ref(), path))
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => (0..=path.len()).any(|skip| match_segments(rest, &path[skip..])),
        Some((first, rest)) => match path.split_first() {
            Some((segment, remaining)) => {
                match_segment(first, segment) && match_segments(rest, remaining)
            }
            None => false,
        },
    }
}

fn match_segment(pattern: &str, segment: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = segment.chars().collect();

    let (mut pi, mut si) = (0, 0);
    // Position of the last `*` seen and the segment index it was tried at.
    let mut backtrack: Option<(usize, usize)> = None;

    while si < s.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == s[si]) {
            pi += 1;
            si += 1;
        } else if pi < p.len() && p[pi] == '*' {
            backtrack = Some((pi, si));
            pi += 1;
        } else if let Some((star, tried)) = backtrack {
            pi = star + 1;
            si = tried + 1;
            backtrack = Some((star, si));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_names() {
        assert!(matches("config.json", "config.json"));
        assert!(!matches("config.json", "onnx/config.json"));
        assert!(!matches("config.json", "generation_config.json"));
    }

    #[test]
    fn test_single_star_stays_in_segment() {
        assert!(matches("*.onnx", "model.onnx"));
        assert!(!matches("*.onnx", "onnx/model.onnx"));
        assert!(matches("onnx/*.onnx", "onnx/model_quantized.onnx"));
        assert!(!matches("onnx/*.onnx", "onnx/nested/model.onnx"));
        assert!(!matches("onnx/*.onnx", "model.onnx"));
    }

    #[test]
    fn test_double_star_descends() {
        assert!(matches("**/*.onnx", "model.onnx"));
        assert!(matches("**/*.onnx", "unet/model.onnx"));
        assert!(matches("**/*.onnx", "text_encoder/onnx/model.onnx"));
        assert!(!matches("**/*.onnx", "unet/model.onnx_data"));
        assert!(matches("unet/**", "unet/a/b/weights.pb"));
    }

    #[test]
    fn test_question_mark_and_backtracking() {
        assert!(matches("vocab.???", "vocab.txt"));
        assert!(!matches("vocab.???", "vocab.json"));
        assert!(matches("*_config*.json", "tokenizer_config.json"));
        assert!(matches("a*b*c", "aXbYbZc"));
        assert!(!matches("a*b*c", "aXbYbZ"));
    }

    #[test]
    fn test_matches_any() {
        let allow = vec!["onnx/*.onnx".to_string(), "config.json".to_string()];
        assert!(matches_any(&allow, "config.json"));
        assert!(matches_any(&allow, "onnx/model.onnx"));
        assert!(!matches_any(&allow, "README.md"));
        assert!(!matches_any::<String>(&[], "config.json"));
    }
}
