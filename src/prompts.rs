//! Prompt templates. Rendering is pure and never truncates its input.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{CodeIssue, CodeStructure, FunctionInfo};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStyle {
    #[default]
    Numpy,
    Google,
    Rest,
}

impl DocStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocStyle::Numpy => "numpy",
            DocStyle::Google => "google",
            DocStyle::Rest => "rest",
        }
    }
}

impl fmt::Display for DocStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn push_function(prompt: &mut String, label: &str, indent: &str, function: &FunctionInfo) {
    prompt.push_str(&format!("\n{}{}: {}\n", indent, label, function.signature()));
    prompt.push_str(&format!("{}Docstring: {}\n", indent, function.docstring));
    prompt.push_str(&format!("{}Source: {}\n", indent, function.source));
}

pub fn documentation_prompt(structure: &CodeStructure, style: DocStyle) -> String {
    let mut prompt = String::from(
        "You are a technical documentation writer. Generate professional documentation for the following code.\n\nCode Structure:\n",
    );

    if !structure.functions.is_empty() {
        prompt.push_str("\nFunctions:\n");
        for function in &structure.functions {
            push_function(&mut prompt, "Function", "", function);
        }
    }

    if !structure.classes.is_empty() {
        prompt.push_str("\nClasses:\n");
        for class in &structure.classes {
            prompt.push_str(&format!("\nClass: {}\n", class.name));
            prompt.push_str(&format!("Docstring: {}\n", class.docstring));
            prompt.push_str(&format!("Source: {}\n", class.source));

            if !class.methods.is_empty() {
                prompt.push_str("\nMethods:\n");
                for method in &class.methods {
                    push_function(&mut prompt, "Method", "  ", method);
                }
            }
        }
    }

    prompt.push_str(&format!(
        "\nPlease generate comprehensive documentation in {} style. Include detailed descriptions, parameters, return values, and examples where appropriate.\n",
        style
    ));
    prompt
}

const SUMMARY_INSTRUCTION: &str =
    "Provide a concise Markdown overview of the project's purpose, structure and key components.";

pub fn summary_prompt(file_listing: &str, code_snippets: &str) -> String {
    let mut prompt = String::from(
        "You are a senior software engineer.\nSummarize the purpose and structure of the following project:\n",
    );
    if !file_listing.is_empty() {
        prompt.push_str(&format!("\nFiles:\n{}\n", file_listing));
    }
    if !code_snippets.is_empty() {
        prompt.push_str(&format!("\nCode:\n{}\n", code_snippets));
    }
    prompt.push_str(&format!("\n{}\n", SUMMARY_INSTRUCTION));
    prompt
}

/// One line per issue: `- Line N: [SEVERITY] message Suggestion: ...`
pub fn format_issue_list(issues: &[CodeIssue]) -> String {
    issues
        .iter()
        .map(|issue| {
            let mut line = format!(
                "- Line {}: [{}] {}",
                issue.line,
                issue.severity.as_str().to_uppercase(),
                issue.message
            );
            if let Some(suggestion) = &issue.suggestion {
                line.push_str(&format!(" Suggestion: {}", suggestion));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn refactor_suggestions_prompt(code: &str, issues: &[CodeIssue]) -> String {
    format!(
        r#"You are an expert Python developer. Please provide specific refactoring suggestions for the following code.

Code:
```python
{code}
```

Issues found:
{issues}

Please provide specific, actionable refactoring suggestions. For each suggestion:
1. Explain the issue in detail
2. Provide the refactored code
3. Explain why this is an improvement

Focus on:
- Improving readability
- Following Python best practices
- Making the code more maintainable
- Improving performance if applicable

Please format your response in Markdown with clear sections for each suggestion."#,
        code = code,
        issues = format_issue_list(issues)
    )
}

pub fn refactor_apply_prompt(code: &str, suggestions: &str) -> String {
    format!(
        r#"You are an expert Python developer. Please refactor the following code based on the instructions.

Original code:
```python
{code}
```

Instructions:
{suggestions}

Please provide the refactored code in a single code block. Only include the refactored code, no explanations or markdown formatting."#,
        code = code,
        suggestions = suggestions
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassInfo, Severity};

    fn greet() -> FunctionInfo {
        FunctionInfo::new("greet".to_string())
            .with_args(vec!["name".to_string()])
            .with_returns(Some("str".to_string()))
            .with_docstring("Say hello.".to_string())
            .with_source("def greet(name) -> str:\n    return name".to_string())
    }

    #[test]
    fn test_empty_structure_has_no_headers() {
        let prompt = documentation_prompt(&CodeStructure::default(), DocStyle::Numpy);
        assert!(!prompt.contains("Function:"));
        assert!(!prompt.contains("Class:"));
        assert!(!prompt.contains("Functions:"));
        assert!(prompt.contains("in numpy style"));
    }

    #[test]
    fn test_documentation_prompt_sections() {
        let class = ClassInfo::new("Greeter".to_string())
            .with_docstring("Greets.".to_string())
            .with_methods(vec![FunctionInfo::new("hello".to_string()).with_args(vec!["who".to_string()])]);
        let structure = CodeStructure {
            functions: vec![greet()],
            classes: vec![class],
        };

        let prompt = documentation_prompt(&structure, DocStyle::Google);
        assert!(prompt.contains("Function: greet(name) -> str\nDocstring: Say hello.\nSource: def greet(name) -> str:"));
        assert!(prompt.contains("Class: Greeter\nDocstring: Greets.\n"));
        assert!(prompt.contains("\nMethods:\n\n  Method: hello(who)\n  Docstring: \n"));
        assert!(prompt.contains("in google style"));
        assert!(prompt.find("Functions:").unwrap() < prompt.find("Classes:").unwrap());
    }

    #[test]
    fn test_class_without_methods_has_no_methods_header() {
        let structure = CodeStructure {
            functions: Vec::new(),
            classes: vec![ClassInfo::new("Empty".to_string())],
        };
        let prompt = documentation_prompt(&structure, DocStyle::Rest);
        assert!(prompt.contains("Class: Empty"));
        assert!(!prompt.contains("Methods:"));
    }

    #[test]
    fn test_summary_prompt_omits_empty_sections() {
        let prompt = summary_prompt("a.py\nREADME.md", "");
        assert!(prompt.starts_with("You are a senior software engineer."));
        assert!(prompt.contains("Files:\na.py\nREADME.md\n"));
        assert!(!prompt.contains("Code:"));
        assert!(prompt.ends_with(&format!("\n{}\n", SUMMARY_INSTRUCTION)));

        let prompt = summary_prompt("", "");
        assert!(!prompt.contains("Files:"));
        assert!(prompt.trim_end().ends_with("key components."));
    }

    #[test]
    fn test_issue_list_format() {
        let issues = vec![
            CodeIssue::new(3, 0, "Too long".to_string(), Severity::Info).with_suggestion("Split it."),
            CodeIssue::new(9, 4, "Odd".to_string(), Severity::Warning),
        ];
        assert_eq!(
            format_issue_list(&issues),
            "- Line 3: [INFO] Too long Suggestion: Split it.\n- Line 9: [WARNING] Odd"
        );
    }

    #[test]
    fn test_refactor_prompts_embed_code_verbatim() {
        let code = "def f(a, b, c, d, e, g):\n    pass";
        let issues = vec![CodeIssue::new(1, 0, "many".to_string(), Severity::Warning)];
        let prompt = refactor_suggestions_prompt(code, &issues);
        assert!(prompt.contains(&format!("```python\n{}\n```", code)));
        assert!(prompt.contains("Issues found:\n- Line 1: [WARNING] many"));
        assert!(prompt.ends_with("clear sections for each suggestion."));

        let prompt = refactor_apply_prompt(code, "Use a dataclass.");
        assert!(prompt.contains(&format!("Original code:\n```python\n{}\n```", code)));
        assert!(prompt.contains("Instructions:\nUse a dataclass.\n"));
    }
}
