//! Rendering context — the variable mapping a template is evaluated against

use indexmap::IndexMap;

/// A value bound to a template variable
#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Bool(bool),
    /// A collection consumed by `{{#each}}`; each element is its own scope
    List(Vec<Context>),
}

impl Value {
    /// String form used for `{{field}}` output
    pub fn to_output_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::List(_) => String::new(),
        }
    }

    /// Truthiness used by `{{#if}}`
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::List(items) => !items.is_empty(),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Variable bindings for one render, insertion-ordered
#[derive(Debug, Clone, Default)]
pub struct Context {
    variables: IndexMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            variables: IndexMap::new(),
        }
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.variables.insert(name.to_string(), value.into());
    }

    pub fn set_list(&mut self, name: &str, items: Vec<Context>) {
        self.variables.insert(name.to_string(), Value::List(items));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Copy every binding from `other`, overwriting duplicates
    pub fn merge(&mut self, other: &Context) {
        for (k, v) in &other.variables {
            self.variables.insert(k.clone(), v.clone());
        }
    }
}
