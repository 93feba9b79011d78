use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::ParseError;
use crate::types::{ClassInfo, CodeStructure, FunctionInfo};

use super::node_text;

/// Parses Python source with tree-sitter and extracts its structure.
pub struct PythonAnalyzer {
    language: Language,
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Parse `source`, failing on the first syntax error in the tree.
    pub fn parse<'src>(&self, source: &'src str) -> Result<ParsedModule<'src>, ParseError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language).map_err(|e| ParseError {
            line: 0,
            column: 0,
            message: format!("failed to load Python grammar: {}", e),
        })?;

        let tree = parser.parse(source, None).ok_or_else(|| ParseError {
            line: 1,
            column: 1,
            message: "parser produced no syntax tree".to_string(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(root));
        }
        // The grammar still accepts some Python 2 forms and misordered parameters
        if let Some(error) = invalid_construct(root) {
            return Err(error);
        }

        Ok(ParsedModule { tree, source })
    }

    pub fn extract_functions_and_classes(&self, source: &str) -> Result<CodeStructure, ParseError> {
        Ok(self.parse(source)?.structure())
    }
}

/// A syntactically valid module and the text it was parsed from
pub struct ParsedModule<'src> {
    tree: Tree,
    source: &'src str,
}

/// Size measurements of one function definition, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionMetrics {
    pub name: String,
    pub line: usize,
    pub col: usize,
    pub parameter_count: usize,
    pub line_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Parameter {
    Positional(String),
    KeywordOnly(String),
    VarPositional,
    VarKeyword,
}

// `node` is the definition itself; `span` includes its decorators, if any.
#[derive(Clone, Copy)]
struct Definition<'t> {
    node: Node<'t>,
    span: Node<'t>,
}

impl<'t> Definition<'t> {
    fn plain(node: Node<'t>) -> Self {
        Self { node, span: node }
    }
}

impl<'src> ParsedModule<'src> {
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Module-level functions and classes. Definitions nested in functions
    /// are skipped and methods only appear under their class.
    pub fn structure(&self) -> CodeStructure {
        let mut definitions = Vec::new();
        collect_definitions(self.tree.root_node(), &mut definitions);

        let mut structure = CodeStructure::default();
        for definition in definitions {
            match definition.node.kind() {
                "function_definition" => structure.functions.push(self.function_info(definition, false)),
                "class_definition" => structure.classes.push(self.class_info(definition)),
                _ => {}
            }
        }
        structure
    }

    /// Every function definition in the file, nested ones and methods included
    pub fn function_metrics(&self) -> Vec<FunctionMetrics> {
        let mut functions = Vec::new();
        collect_all_functions(self.tree.root_node(), &mut functions);

        functions
            .into_iter()
            .map(|definition| {
                let parameters = self.parameters(definition.node);
                let positional = parameters
                    .iter()
                    .filter(|p| matches!(p, Parameter::Positional(_)))
                    .count();
                let varargs = parameters.contains(&Parameter::VarPositional) as usize;
                let kwargs = parameters.contains(&Parameter::VarKeyword) as usize;
                let position = definition.node.start_position();

                FunctionMetrics {
                    name: self.field_text(definition.node, "name").unwrap_or_default(),
                    line: position.row + 1,
                    col: position.column,
                    parameter_count: positional + varargs + kwargs,
                    line_count: code_line_count(&self.definition_source(definition)),
                }
            })
            .collect()
    }

    fn function_info(&self, definition: Definition<'_>, is_method: bool) -> FunctionInfo {
        let node = definition.node;
        let mut args: Vec<String> = self
            .parameters(node)
            .into_iter()
            .filter_map(|p| match p {
                Parameter::Positional(name) => Some(name),
                _ => None,
            })
            .collect();

        if is_method && matches!(args.first().map(String::as_str), Some("self") | Some("cls")) {
            args.remove(0);
        }

        FunctionInfo::new(self.field_text(node, "name").unwrap_or_default())
            .with_args(args)
            .with_returns(self.field_text(node, "return_type"))
            .with_docstring(self.docstring(node))
            .with_source(self.definition_source(definition))
    }

    fn class_info(&self, definition: Definition<'_>) -> ClassInfo {
        let node = definition.node;
        let mut members = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            collect_definitions(body, &mut members);
        }

        let methods = members
            .into_iter()
            .filter(|member| member.node.kind() == "function_definition")
            .map(|member| self.function_info(member, true))
            .collect();

        ClassInfo::new(self.field_text(node, "name").unwrap_or_default())
            .with_methods(methods)
            .with_docstring(self.docstring(node))
            .with_source(self.definition_source(definition))
    }

    fn parameters(&self, function: Node<'_>) -> Vec<Parameter> {
        let Some(list) = function.child_by_field_name("parameters") else {
            return Vec::new();
        };

        let mut parameters = Vec::new();
        let mut keyword_only = false;
        let mut cursor = list.walk();
        for param in list.named_children(&mut cursor) {
            // `*args: T` and `**kw: T` wrap the splat in a typed_parameter
            let target = if param.kind() == "typed_parameter" {
                param.named_child(0).unwrap_or(param)
            } else {
                param
            };

            match target.kind() {
                "list_splat_pattern" => {
                    parameters.push(Parameter::VarPositional);
                    keyword_only = true;
                }
                "dictionary_splat_pattern" => parameters.push(Parameter::VarKeyword),
                "keyword_separator" => keyword_only = true,
                "positional_separator" | "comment" => {}
                _ => {
                    if let Some(name) = self.parameter_name(param) {
                        if keyword_only {
                            parameters.push(Parameter::KeywordOnly(name));
                        } else {
                            parameters.push(Parameter::Positional(name));
                        }
                    }
                }
            }
        }
        parameters
    }

    fn parameter_name(&self, param: Node<'_>) -> Option<String> {
        match param.kind() {
            "identifier" => Some(node_text(param, self.source)),
            "default_parameter" | "typed_default_parameter" => self.field_text(param, "name"),
            "typed_parameter" => param
                .named_child(0)
                .filter(|n| n.kind() == "identifier")
                .map(|n| node_text(n, self.source)),
            _ => None,
        }
    }

    fn docstring(&self, definition: Node<'_>) -> String {
        let Some(body) = definition.child_by_field_name("body") else {
            return String::new();
        };

        let mut cursor = body.walk();
        let first_statement = body
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment");

        let Some(statement) = first_statement.filter(|s| s.kind() == "expression_statement") else {
            return String::new();
        };

        match statement.named_child(0) {
            Some(literal) if literal.kind() == "string" => {
                let text = node_text(literal, self.source);
                if !is_docstring_literal(&text) {
                    return String::new();
                }
                clean_docstring(&string_literal_value(&text))
            }
            Some(literal) if literal.kind() == "concatenated_string" => {
                let mut parts_cursor = literal.walk();
                let parts: Vec<String> = literal
                    .named_children(&mut parts_cursor)
                    .filter(|part| part.kind() == "string")
                    .map(|part| node_text(part, self.source))
                    .collect();
                if !parts.iter().all(|part| is_docstring_literal(part)) {
                    return String::new();
                }
                let joined: String = parts.iter().map(|part| string_literal_value(part)).collect();
                clean_docstring(&joined)
            }
            _ => String::new(),
        }
    }

    /// Text of a definition, decorators included, with the indentation of
    /// its first line removed from every continuation line.
    fn definition_source(&self, definition: Definition<'_>) -> String {
        let text = node_text(definition.span, self.source);
        let indent = definition.span.start_position().column;
        if indent == 0 {
            return text;
        }

        text.split('\n')
            .enumerate()
            .map(|(i, line)| if i == 0 { line } else { strip_indent(line, indent) })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> Option<String> {
        node.child_by_field_name(field).map(|n| node_text(n, self.source))
    }
}

/// Definitions whose nearest enclosing definition is `scope`. Compound
/// statements (if/try/with/loops) are searched; definition bodies are not.
fn collect_definitions<'t>(scope: Node<'t>, out: &mut Vec<Definition<'t>>) {
    let mut cursor = scope.walk();
    for child in scope.named_children(&mut cursor) {
        match child.kind() {
            "function_definition" | "class_definition" => out.push(Definition::plain(child)),
            "decorated_definition" => {
                if let Some(node) = child.child_by_field_name("definition") {
                    out.push(Definition { node, span: child });
                }
            }
            _ => collect_definitions(child, out),
        }
    }
}

fn collect_all_functions<'t>(node: Node<'t>, out: &mut Vec<Definition<'t>>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "decorated_definition" => {
                if let Some(definition) = child.child_by_field_name("definition") {
                    if definition.kind() == "function_definition" {
                        out.push(Definition { node: definition, span: child });
                    }
                    collect_all_functions(definition, out);
                }
            }
            "function_definition" => {
                out.push(Definition::plain(child));
                collect_all_functions(child, out);
            }
            _ => collect_all_functions(child, out),
        }
    }
}

fn syntax_error(root: Node<'_>) -> ParseError {
    match find_error_node(root) {
        Some(node) => {
            let position = node.start_position();
            let message = if node.is_missing() {
                format!("expected '{}'", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            ParseError {
                line: position.row + 1,
                column: position.column + 1,
                message,
            }
        }
        None => ParseError {
            line: 1,
            column: 1,
            message: "invalid syntax".to_string(),
        },
    }
}

fn find_error_node(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_error_node(child) {
            return Some(found);
        }
    }
    None
}

fn invalid_construct(node: Node<'_>) -> Option<ParseError> {
    let found = match node.kind() {
        "print_statement" => Some((
            node,
            "Missing parentheses in call to 'print'. Did you mean print(...)?",
        )),
        "exec_statement" => Some((node, "Missing parentheses in call to 'exec'")),
        "parameters" | "lambda_parameters" => required_after_default(node)
            .map(|param| (param, "non-default argument follows default argument")),
        _ => None,
    };
    if let Some((at, message)) = found {
        let position = at.start_position();
        return Some(ParseError {
            line: position.row + 1,
            column: position.column + 1,
            message: message.to_string(),
        });
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(error) = invalid_construct(child) {
            return Some(error);
        }
    }
    None
}

/// First positional parameter without a default that follows one with a
/// default. Anything after `*` or `*args` is keyword-only and exempt.
fn required_after_default(parameters: Node<'_>) -> Option<Node<'_>> {
    let mut seen_default = false;
    let mut cursor = parameters.walk();
    for param in parameters.named_children(&mut cursor) {
        let inner = match param.kind() {
            "typed_parameter" => param.named_child(0).unwrap_or(param),
            _ => param,
        };
        match inner.kind() {
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => return None,
            "default_parameter" | "typed_default_parameter" => seen_default = true,
            "identifier" if seen_default => return Some(param),
            _ => {}
        }
    }
    None
}

/// Letters before the opening quote, e.g. `r`, `f` or `Rb`
fn string_prefix(literal: &str) -> &str {
    let end = literal
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(literal.len());
    &literal[..end]
}

/// f-strings and bytes are never docstrings
fn is_docstring_literal(literal: &str) -> bool {
    !string_prefix(literal)
        .chars()
        .any(|c| matches!(c.to_ascii_lowercase(), 'f' | 'b'))
}

/// Non-blank lines that are not comment-only
fn code_line_count(text: &str) -> usize {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .count()
}

/// Contents of a Python string literal without prefix or quotes
fn string_literal_value(literal: &str) -> String {
    let body = literal.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if body.len() >= 2 * quote.len() && body.starts_with(quote) && body.ends_with(quote) {
            return body[quote.len()..body.len() - quote.len()].to_string();
        }
    }
    body.to_string()
}

/// Normalize docstring indentation: the first line is left-stripped, the
/// common indentation of the remaining lines is removed and blank lines at
/// either end are dropped.
fn clean_docstring(raw: &str) -> String {
    let expanded = raw.replace('\t', "        ");
    let lines: Vec<&str> = expanded.split('\n').collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_spaces(line))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            cleaned.push(line.trim_start());
        } else {
            cleaned.push(strip_indent(line, margin).trim_end());
        }
    }

    while cleaned.last().is_some_and(|line| line.trim().is_empty()) {
        cleaned.pop();
    }
    let first_content = cleaned
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(cleaned.len());

    cleaned[first_content..].join("\n")
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn strip_indent(line: &str, indent: usize) -> &str {
    &line[indent.min(leading_spaces(line))..]
}
