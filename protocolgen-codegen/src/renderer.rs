//! Template rendering.
//!
//! The emitter only depends on the [`Renderer`] trait. [`HandlebarsRenderer`]
//! is the stock implementation: it loads `<template_dir>/<id>.template` and
//! renders it with the emission context's helpers registered.

use crate::context::{EmissionContext, dash_to_camelcase, join_arrays, to_title_case};
use crate::error::CodegenError;
use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, RenderErrorReason,
    ScopedJson, handlebars_helper,
};
use protocolgen_schema::Property;
use protocolgen_schema::descriptor::apply_template;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// File suffix appended to template identifiers.
pub const TEMPLATE_SUFFIX: &str = ".template";

/// Renders a template identifier against an emission context.
pub trait Renderer {
    /// Renders `template_id` and returns the generated text.
    ///
    /// # Errors
    /// Returns `CodegenError` if the template is missing, malformed, or
    /// fails while rendering.
    fn render(
        &self,
        template_id: &str,
        context: &EmissionContext<'_>,
    ) -> Result<String, CodegenError>;
}

/// Handlebars renderer reading templates from a directory.
#[derive(Debug, Clone)]
pub struct HandlebarsRenderer {
    template_dir: PathBuf,
}

impl HandlebarsRenderer {
    /// Creates a renderer for templates under `template_dir`.
    #[must_use]
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
        }
    }

    /// Returns the template directory.
    #[must_use]
    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// Returns the file a template identifier maps to.
    #[must_use]
    pub fn template_path(&self, template_id: &str) -> PathBuf {
        self.template_dir
            .join(format!("{template_id}{TEMPLATE_SUFFIX}"))
    }

    fn load_template(&self, template_id: &str) -> Result<String, CodegenError> {
        let path = self.template_path(template_id);
        if !path.is_file() {
            return Err(CodegenError::TemplateNotFound {
                template: template_id.to_string(),
                path,
            });
        }
        std::fs::read_to_string(&path).map_err(|e| CodegenError::io(path, e))
    }
}

impl Renderer for HandlebarsRenderer {
    fn render(
        &self,
        template_id: &str,
        context: &EmissionContext<'_>,
    ) -> Result<String, CodegenError> {
        let source = self.load_template(template_id)?;

        let mut engine = Handlebars::new();
        engine.register_escape_fn(handlebars::no_escape);
        register_helpers(&mut engine, *context);
        engine.register_template_string(template_id, source)?;

        tracing::debug!(template = template_id, "rendering template");
        Ok(engine.render(template_id, &context.template_data())?)
    }
}

handlebars_helper!(TitleCaseHelper: |name: str| to_title_case(name));
handlebars_helper!(DashToCamelcaseHelper: |word: str| dash_to_camelcase(word));
handlebars_helper!(FormatTypeHelper: |template: str, expr: str| apply_template(template, expr));

/// Registers the protocol helpers on `engine`.
///
/// - `resolve_type property` returns the descriptor of a property object
/// - `type_definition name` returns the descriptor registered under `name`
/// - `join_arrays mapping key...` concatenates list fields of `mapping`
/// - `format_type template expr` applies a `%s` conversion template
/// - `to_title_case` and `dash_to_camelcase` adjust identifiers
/// - `concat value...` joins its parameters into one string
pub fn register_helpers<'a>(engine: &mut Handlebars<'a>, context: EmissionContext<'a>) {
    engine.register_helper("resolve_type", Box::new(ResolveTypeHelper { context }));
    engine.register_helper("type_definition", Box::new(TypeDefinitionHelper { context }));
    engine.register_helper("join_arrays", Box::new(JoinArraysHelper));
    engine.register_helper("format_type", Box::new(FormatTypeHelper));
    engine.register_helper("to_title_case", Box::new(TitleCaseHelper));
    engine.register_helper("dash_to_camelcase", Box::new(DashToCamelcaseHelper));
    engine.register_helper("concat", Box::new(ConcatHelper));
}

fn helper_error(helper: &str, message: impl std::fmt::Display) -> RenderError {
    RenderErrorReason::Other(format!("{helper}: {message}")).into()
}

fn param<'h>(h: &'h Helper<'_>, helper: &str, index: usize) -> Result<&'h Value, RenderError> {
    h.param(index)
        .map(|p| p.value())
        .ok_or_else(|| helper_error(helper, format!("missing parameter {index}")))
}

struct ResolveTypeHelper<'a> {
    context: EmissionContext<'a>,
}

impl HelperDef for ResolveTypeHelper<'_> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let value = param(h, "resolve_type", 0)?;
        let property: Property = serde_json::from_value(value.clone())
            .map_err(|e| helper_error("resolve_type", e))?;
        let descriptor = self
            .context
            .resolve_type(&property)
            .map_err(|e| helper_error("resolve_type", e))?;
        let json = serde_json::to_value(&*descriptor).map_err(|e| helper_error("resolve_type", e))?;
        Ok(ScopedJson::Derived(json))
    }
}

struct TypeDefinitionHelper<'a> {
    context: EmissionContext<'a>,
}

impl HelperDef for TypeDefinitionHelper<'_> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let name = param(h, "type_definition", 0)?
            .as_str()
            .ok_or_else(|| helper_error("type_definition", "name must be a string"))?;
        let descriptor = self
            .context
            .type_definition(name)
            .map_err(|e| helper_error("type_definition", e))?;
        let json =
            serde_json::to_value(descriptor).map_err(|e| helper_error("type_definition", e))?;
        Ok(ScopedJson::Derived(json))
    }
}

struct JoinArraysHelper;

impl HelperDef for JoinArraysHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let mapping = param(h, "join_arrays", 0)?;

        let mut keys = Vec::new();
        for p in h.params().iter().skip(1) {
            match p.value() {
                Value::String(key) => keys.push(key.as_str()),
                Value::Array(list) => keys.extend(list.iter().filter_map(Value::as_str)),
                other => {
                    return Err(helper_error(
                        "join_arrays",
                        format!("keys must be strings, got {other}"),
                    ));
                }
            }
        }

        Ok(ScopedJson::Derived(Value::Array(join_arrays(mapping, &keys))))
    }
}

struct ConcatHelper;

impl HelperDef for ConcatHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let joined: String = h
            .params()
            .iter()
            .map(|p| match p.value() {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect();
        Ok(ScopedJson::Derived(Value::String(joined)))
    }
}
