//! # Validation Rule Engine
//!
//! Evaluates normalized definitions against the documentation-quality
//! rules. Every rule runs; violations are collected, never short-circuited,
//! so one call surfaces every problem.
//!
//! ## Ordering
//!
//! Violations are ordered by rule (declaration order of [`RuleCode`]) and,
//! within a rule, by the traversal order of the definition: parameters in
//! declaration order, request body before responses, responses by
//! ascending status, object fields by name.

use std::sync::Arc;

use serde_json::Value;

use apidoc_core::{EndpointDefinition, HttpMethod, SchemaDefinition, SchemaKind, SchemaNode};

use crate::config::RuleConfig;
use crate::inject::required_error_statuses;
use crate::language::LanguagePredicate;
use crate::violation::{ResourceRef, RuleCode, ValidationViolation};

/// The rule engine. Cheap to clone; holds no mutable state.
#[derive(Clone)]
pub struct RuleEngine {
    config: RuleConfig,
    language: Arc<dyn LanguagePredicate>,
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("config", &self.config)
            .field("language", &self.language.language_name())
            .finish()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

impl RuleEngine {
    /// Build an engine using the language predicate named by `config`.
    pub fn new(config: RuleConfig) -> Self {
        let language = config.language.predicate();
        Self { config, language }
    }

    /// Replace the language predicate.
    pub fn with_language(mut self, language: Arc<dyn LanguagePredicate>) -> Self {
        self.language = language;
        self
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Evaluate every endpoint rule. Empty result means compliant.
    pub fn validate_endpoint(&self, def: &EndpointDefinition) -> Vec<ValidationViolation> {
        let mut out = Collector::new(ResourceRef::endpoint(def));

        self.check_title(&mut out, &def.title);
        self.check_description(&mut out, &def.description, true);

        for (index, param) in def.parameters.iter().enumerate() {
            let path = format!("$.parameters[{index}]");
            if param.description.trim().is_empty() {
                out.push(
                    RuleCode::ParameterDescriptionRequired,
                    &path,
                    format!(
                        "{} parameter \"{}\" has no description",
                        param.location.as_str(),
                        param.name
                    ),
                );
            }
            if let Some(Value::String(s)) = &param.example {
                if self.config.is_placeholder(s) {
                    out.push(
                        RuleCode::ExamplePlaceholder,
                        &path,
                        format!("example \"{s}\" is a type placeholder, use a realistic value"),
                    );
                }
            }
            if let Some(example) = &param.example {
                if !param.kind.accepts(example) {
                    out.push(
                        RuleCode::ExampleKindMismatch,
                        &path,
                        format!("example {example} is not a {}", param.kind),
                    );
                }
            }
        }

        match &def.request_body_schema {
            Some(body) => self.walk(&mut out, body, "$.request_body_schema", None, false, false),
            None if def.method.carries_body() => out.push(
                RuleCode::RequestBodyRequired,
                "$.request_body_schema",
                format!("{} requests must document a request body", def.method),
            ),
            None => {}
        }

        if !def.response_schema.keys().any(|status| status.is_success()) {
            out.push(
                RuleCode::SuccessResponseRequired,
                "$.responses",
                "no 2xx response is documented",
            );
        }
        for (status, schema) in &def.response_schema {
            self.walk(&mut out, schema, &format!("$.responses.{status}"), None, false, false);
        }

        self.check_error_responses(&mut out, def);

        out.finish()
    }

    /// Evaluate the schema-only subset of rules on a data schema.
    pub fn validate_schema_definition(&self, def: &SchemaDefinition) -> Vec<ValidationViolation> {
        let mut out = Collector::new(ResourceRef::schema(def));

        if def.name.trim().is_empty() {
            out.push(RuleCode::TitleRequired, "$.name", "schema name must not be empty");
        }
        self.check_description(&mut out, &def.description, false);
        self.walk(&mut out, &def.schema, "$.schema", None, false, false);

        out.finish()
    }

    /// Evaluate field rules on a bare schema tree rooted at `root_path`.
    pub fn validate_schema_node(
        &self,
        resource: ResourceRef,
        root_path: &str,
        node: &SchemaNode,
    ) -> Vec<ValidationViolation> {
        let mut out = Collector::new(resource);
        self.walk(&mut out, node, root_path, None, false, false);
        out.finish()
    }

    // -----------------------------------------------------------------------
    // Title and description
    // -----------------------------------------------------------------------

    fn check_title(&self, out: &mut Collector, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            out.push(RuleCode::TitleRequired, "$.title", "title must not be empty");
            return;
        }
        if !self.language.is_compliant(title) {
            out.push(
                RuleCode::TitleLanguage,
                "$.title",
                format!(
                    "title \"{title}\" is not written in {}",
                    self.language.language_name()
                ),
            );
        }
        if let Some(problem) = title_format_problem(title) {
            out.push(RuleCode::TitleFormat, "$.title", format!("title \"{title}\" {problem}"));
        }
    }

    /// `required` is false for data schemas, whose description is optional.
    fn check_description(&self, out: &mut Collector, description: &str, required: bool) {
        let description = description.trim();
        if description.is_empty() {
            if required {
                out.push(
                    RuleCode::DescriptionRequired,
                    "$.description",
                    "description must not be empty",
                );
            }
            return;
        }
        if !self.language.is_compliant(description) {
            out.push(
                RuleCode::DescriptionLanguage,
                "$.description",
                format!("description is not written in {}", self.language.language_name()),
            );
        }
    }

    // -----------------------------------------------------------------------
    // Schema walk
    // -----------------------------------------------------------------------

    /// Check `node` and its subtree.
    ///
    /// `inherited` is the slice of an ancestor's example that lands on this
    /// node, if any. `covered` is true when some ancestor carries an example,
    /// even one that omits this field.
    fn walk(
        &self,
        out: &mut Collector,
        node: &SchemaNode,
        path: &str,
        inherited: Option<&Value>,
        covered: bool,
        named: bool,
    ) {
        if named && node.description.is_none() {
            out.push(
                RuleCode::FieldDescriptionRequired,
                path,
                "field has no description",
            );
        }

        let example = node.example.as_ref().or(inherited);
        if let Some(value) = example {
            self.check_example(out, node, path, value);
        }
        let covered = covered || node.example.is_some();

        match &node.kind {
            SchemaKind::Object { properties, .. } => {
                for (name, child) in properties {
                    let sub = example.and_then(|v| v.get(name));
                    let child_path = format!("{path}.properties.{name}");
                    self.walk(out, child, &child_path, sub, covered, true);
                }
            }
            SchemaKind::Array { items } => {
                let sub = example.and_then(Value::as_array).and_then(|list| list.first());
                self.walk(out, items, &format!("{path}.items"), sub, covered, false);
            }
            SchemaKind::Primitive(_) => {
                if example.is_none() && !covered {
                    out.push(RuleCode::ExampleRequired, path, "leaf field has no example");
                }
            }
        }
    }

    /// Check one example value against the node it documents. Only this
    /// level is inspected; children are checked by the walk.
    fn check_example(&self, out: &mut Collector, node: &SchemaNode, path: &str, value: &Value) {
        // A null slice inside an ancestor example documents an absent value.
        if value.is_null() && node.example.is_none() {
            return;
        }

        let kind_ok = match &node.kind {
            SchemaKind::Object { .. } => value.is_object(),
            SchemaKind::Array { .. } => value.is_array(),
            SchemaKind::Primitive(ty) => ty.accepts(value),
        };
        if !kind_ok {
            out.push(
                RuleCode::ExampleKindMismatch,
                path,
                format!("example {value} is not of type {}", node.type_name()),
            );
        }

        if let (SchemaKind::Primitive(_), Value::String(s)) = (&node.kind, value) {
            if self.config.is_placeholder(s) {
                out.push(
                    RuleCode::ExamplePlaceholder,
                    path,
                    format!("example \"{s}\" is a type placeholder, use a realistic value"),
                );
            }
        }
    }

    fn check_error_responses(&self, out: &mut Collector, def: &EndpointDefinition) {
        for status in required_error_statuses(def.method) {
            if !def.response_schema.contains_key(status) {
                out.push(
                    RuleCode::ErrorResponseRequired,
                    &format!("$.responses.{status}"),
                    format!("standard error response {status} is not documented"),
                );
            }
        }
    }
}

/// English verbs that mark a title as a route description when followed
/// by a space.
const ROUTE_VERBS: [&str; 5] = ["get", "post", "put", "delete", "patch"];

/// Why `title` is not a business name, if it is not one.
fn title_format_problem(title: &str) -> Option<&'static str> {
    let lower = title.to_lowercase();
    let route_like = HttpMethod::ALL.iter().any(|m| {
        lower
            .strip_prefix(&m.as_str().to_lowercase())
            .map(|rest| rest.trim_start().starts_with('/'))
            .unwrap_or(false)
    });
    let verb_prefixed = ROUTE_VERBS
        .iter()
        .any(|verb| lower.strip_prefix(verb).is_some_and(|rest| rest.starts_with(' ')));
    if route_like || verb_prefixed || title.starts_with('/') {
        return Some("looks like a route; use a business name such as \"创建订单\"");
    }

    let identifier_like = title.contains('_')
        && title
            .chars()
            .filter(|c| *c != '_' && *c != '/')
            .all(char::is_alphabetic);
    if identifier_like {
        return Some("looks like an identifier; use a business name such as \"创建订单\"");
    }

    if title.contains('-') || title.contains('—') {
        return Some("must not carry a role prefix; write \"获取课程列表\", not \"学生-获取课程列表\"");
    }
    None
}

/// Accumulates violations for one resource.
struct Collector {
    resource: ResourceRef,
    violations: Vec<ValidationViolation>,
}

impl Collector {
    fn new(resource: ResourceRef) -> Self {
        Self {
            resource,
            violations: Vec::new(),
        }
    }

    fn push(&mut self, rule: RuleCode, path: &str, message: impl Into<String>) {
        self.violations.push(ValidationViolation {
            resource: self.resource.clone(),
            rule,
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn finish(mut self) -> Vec<ValidationViolation> {
        // Stable: traversal order is kept within each rule.
        self.violations.sort_by_key(|v| v.rule);
        self.violations
    }
}
