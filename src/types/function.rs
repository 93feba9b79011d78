use serde::{Deserialize, Serialize};

/// A function (or method) definition found by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub args: Vec<String>,
    pub returns: Option<String>,
    pub docstring: String,
    pub source: String,
}

impl FunctionInfo {
    pub fn new(name: String) -> Self {
        Self {
            name,
            args: Vec::new(),
            returns: None,
            docstring: String::new(),
            source: String::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_returns(mut self, returns: Option<String>) -> Self {
        self.returns = returns;
        self
    }

    pub fn with_docstring(mut self, docstring: String) -> Self {
        self.docstring = docstring;
        self
    }

    pub fn with_source(mut self, source: String) -> Self {
        self.source = source;
        self
    }

    /// `name(a, b) -> ret`, the form used in prompts and terminal output
    pub fn signature(&self) -> String {
        let mut signature = format!("{}({})", self.name, self.args.join(", "));
        if let Some(returns) = &self.returns {
            signature.push_str(&format!(" -> {}", returns));
        }
        signature
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub methods: Vec<FunctionInfo>,
    pub docstring: String,
    pub source: String,
}

impl ClassInfo {
    pub fn new(name: String) -> Self {
        Self {
            name,
            methods: Vec::new(),
            docstring: String::new(),
            source: String::new(),
        }
    }

    pub fn with_methods(mut self, methods: Vec<FunctionInfo>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_docstring(mut self, docstring: String) -> Self {
        self.docstring = docstring;
        self
    }

    pub fn with_source(mut self, source: String) -> Self {
        self.source = source;
        self
    }
}

/// Module-level functions and classes of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeStructure {
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
}

impl CodeStructure {
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty()
    }

    /// Get summary stats for terminal display
    pub fn summary(&self) -> String {
        let methods: usize = self.classes.iter().map(|c| c.methods.len()).sum();
        format!(
            "Functions: {} | Classes: {} | Methods: {}",
            self.functions.len(),
            self.classes.len(),
            methods
        )
    }
}
