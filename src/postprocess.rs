//! Cleanup of raw model responses.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```([^\n`]*)\n(.*?)```").unwrap_or_else(|e| panic!("invalid fence pattern: {}", e))
});

struct FencedBlock<'a> {
    tag: &'a str,
    body: &'a str,
}

fn fenced_blocks(response: &str) -> Vec<FencedBlock<'_>> {
    FENCED_BLOCK
        .captures_iter(response)
        .filter_map(|caps| {
            Some(FencedBlock {
                tag: caps.get(1)?.as_str().trim(),
                body: caps.get(2)?.as_str(),
            })
        })
        .collect()
}

fn tag_matches(tag: &str, language: &str) -> bool {
    let tag = tag.to_ascii_lowercase();
    let language = language.to_ascii_lowercase();
    match language.as_str() {
        "python" | "py" => tag == "python" || tag == "py" || tag == "python3",
        _ => tag == language,
    }
}

/// Pull code out of a model response.
///
/// Preference: first block tagged with `language`, then the first untagged
/// block, then the first block of any tag. A response without fences is
/// returned as is. Only the first matching block is kept, so responses
/// that split code across several blocks lose the rest.
pub fn extract_code_block(response: &str, language: &str) -> String {
    let blocks = fenced_blocks(response);

    let chosen = blocks
        .iter()
        .find(|b| tag_matches(b.tag, language))
        .or_else(|| blocks.iter().find(|b| b.tag.is_empty()))
        .or_else(|| blocks.first());

    match chosen {
        Some(block) => block.body.trim().to_string(),
        None => response.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_block() {
        assert_eq!(extract_code_block("```python\nX\n```", "python"), "X");
    }

    #[test]
    fn test_tagged_block_preferred_over_untagged() {
        let response = "Here:\n```\nplain\n```\nand\n```python\ndef f():\n    pass\n```\n";
        assert_eq!(extract_code_block(response, "python"), "def f():\n    pass");
    }

    #[test]
    fn test_untagged_block_preferred_over_other_language() {
        let response = "```bash\npip install x\n```\n```\nprint(1)\n```";
        assert_eq!(extract_code_block(response, "python"), "print(1)");
    }

    #[test]
    fn test_any_block_as_last_resort() {
        let response = "```text\nsomething\n```";
        assert_eq!(extract_code_block(response, "python"), "something");
    }

    #[test]
    fn test_py_alias_and_case() {
        assert_eq!(extract_code_block("```Py\nx = 1\n```", "python"), "x = 1");
    }

    #[test]
    fn test_no_fence_passes_through() {
        let response = "  x = 1\n";
        assert_eq!(extract_code_block(response, "python"), response);
    }

    #[test]
    fn test_unterminated_fence_passes_through() {
        let response = "```python\nx = 1\n";
        assert_eq!(extract_code_block(response, "python"), response);
    }

    #[test]
    fn test_only_first_matching_block_is_kept() {
        let response = "```python\na = 1\n```\ntext\n```python\nb = 2\n```";
        assert_eq!(extract_code_block(response, "python"), "a = 1");
    }
}
