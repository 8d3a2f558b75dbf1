//! Template engine — loads templates through the cache and evaluates
//! node trees against a context

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::cache::TemplateCache;
use super::context::{Context, Value};
use super::parser::{parse, Node};
use super::TemplateError;

/// Renders named templates from a directory, with partials resolved from
/// a `partials/` subdirectory. Holds the parsed-template cache.
pub struct TemplateEngine {
    templates_dir: PathBuf,
    partials_dir: PathBuf,
    cache: TemplateCache,
}

impl TemplateEngine {
    /// Create an engine rooted at a templates directory; partials live in
    /// `<templates_dir>/partials`.
    pub fn new<P: AsRef<Path>>(templates_dir: P) -> Self {
        let templates_dir = templates_dir.as_ref().to_path_buf();
        let partials_dir = templates_dir.join("partials");
        Self {
            templates_dir,
            partials_dir,
            cache: TemplateCache::new(),
        }
    }

    /// Render the named template (`<name>.html`) with the given context.
    ///
    /// A missing template is an error; a missing partial renders as empty.
    pub async fn render(&self, name: &str, context: &Context) -> Result<String, TemplateError> {
        let path = self.templates_dir.join(format!("{}.html", name));
        let nodes = self.cache.load(&path).await.map_err(|e| match e {
            TemplateError::TemplateNotFound(_) => TemplateError::TemplateNotFound(name.to_string()),
            other => other,
        })?;
        self.render_nodes(&nodes, context).await
    }

    /// Render an inline template source (used for content bodies that carry
    /// placeholders of their own). Not cached.
    pub async fn render_str(
        &self,
        source: &str,
        context: &Context,
    ) -> Result<String, TemplateError> {
        let nodes = parse(source)?;
        self.render_nodes(&nodes, context).await
    }

    async fn render_nodes(
        &self,
        nodes: &[Node],
        context: &Context,
    ) -> Result<String, TemplateError> {
        let partials = self.collect_partials(nodes).await?;
        let mut evaluator = Evaluator {
            partials: &partials,
            stack: Vec::new(),
        };
        let mut out = String::new();
        evaluator.render(nodes, context, &mut out);
        Ok(out)
    }

    /// Load every partial reachable from `nodes`, transitively, into a map.
    ///
    /// Partials are loaded through the cache, so this is a map lookup per
    /// name on the warm path. A missing partial maps to an empty tree.
    async fn collect_partials(
        &self,
        nodes: &[Node],
    ) -> Result<HashMap<String, Arc<Vec<Node>>>, TemplateError> {
        let mut partials: HashMap<String, Arc<Vec<Node>>> = HashMap::new();
        let mut pending: Vec<String> = Vec::new();
        collect_partial_names(nodes, &mut pending);

        while let Some(name) = pending.pop() {
            if partials.contains_key(&name) {
                continue;
            }
            let path = self.partials_dir.join(format!("{}.html", name));
            let loaded = match self.cache.load(&path).await {
                Ok(loaded) => loaded,
                Err(TemplateError::TemplateNotFound(_)) => {
                    tracing::warn!("Partial not found: {:?}", path);
                    Arc::new(Vec::new())
                }
                Err(e) => return Err(e),
            };
            collect_partial_names(&loaded, &mut pending);
            partials.insert(name, loaded);
        }

        Ok(partials)
    }
}

/// Gather the partial names referenced anywhere in a node tree
fn collect_partial_names(nodes: &[Node], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Partial(name) => out.push(name.clone()),
            Node::If { body, .. } | Node::Each { body, .. } => {
                collect_partial_names(body, out);
            }
            _ => {}
        }
    }
}

/// Walks a node tree emitting output for one context
struct Evaluator<'a> {
    partials: &'a HashMap<String, Arc<Vec<Node>>>,
    /// Partials currently being rendered; a name already on the stack is
    /// skipped so self-inclusion terminates
    stack: Vec<String>,
}

impl Evaluator<'_> {
    fn render(&mut self, nodes: &[Node], context: &Context, out: &mut String) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),

                // Unknown names resolve to empty; values are emitted
                // verbatim, never re-parsed
                Node::Variable(name) => {
                    if let Some(value) = context.get(name) {
                        out.push_str(&value.to_output_string());
                    }
                }

                Node::If { field, body } => {
                    if context.get(field).is_some_and(Value::is_truthy) {
                        self.render(body, context, out);
                    }
                }

                Node::Each { name, body } => {
                    if let Some(Value::List(items)) = context.get(name) {
                        for item in items {
                            // Element fields shadow the enclosing scope
                            let mut scope = context.clone();
                            scope.merge(item);
                            self.render(body, &scope, out);
                        }
                    }
                }

                Node::Partial(name) => {
                    if self.stack.iter().any(|active| active == name) {
                        tracing::debug!("Skipping recursive partial: {}", name);
                        continue;
                    }
                    if let Some(partial) = self.partials.get(name) {
                        let partial = partial.clone();
                        self.stack.push(name.clone());
                        self.render(&partial, context, out);
                        self.stack.pop();
                    }
                }
            }
        }
    }
}
