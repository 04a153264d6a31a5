//! Static evaluation of config modules.
//!
//! Modules are parsed with oxc and their exports are evaluated without
//! running any code:
//!
//! ```text
//! import type {AppConfig} from "./types.ts";
//!
//! const base = { retries: 3 };
//!
//! export const config = {
//!     ...base,
//!     port: 8080, // comments and trailing commas are fine
//!     hosts: ['a', `b`],
//! } satisfies AppConfig;
//! ```
//!
//! A value may be built from object and array literals, strings, numbers,
//! booleans, `null`, template strings, spreads, unary `-`/`+`, references to
//! other top-level bindings, and the type-level wrappers `as`, `satisfies`,
//! `!` and `<T>`. Anything else (calls, functions, imported values) fails
//! with an evaluation error naming its position. Type-only declarations are
//! ignored.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use oxc::allocator::Allocator;
use oxc::ast::ast::{
    ArrayExpressionElement, Declaration, ExportDefaultDeclarationKind, ExportNamedDeclaration,
    Expression, ImportDeclaration, ImportDeclarationSpecifier, ObjectPropertyKind, Program,
    PropertyKey, PropertyKind, Statement, TemplateLiteral, VariableDeclaration,
};
use oxc::parser::Parser;
use oxc::span::{GetSpan, SourceType, Span};
use oxc::syntax::identifier::is_identifier_name;
use oxc::syntax::operator::UnaryOperator;
use serde_json::{Map, Value};

use super::{ModuleError, DEFAULT_EXPORT};

/// An `import` declaration, or the source of an `export ... from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub specifier: String,
    pub type_only: bool,
    pub line: usize,
}

impl Import {
    /// Whether the specifier points at a file relative to the importing module.
    pub fn is_relative(&self) -> bool {
        self.specifier.starts_with("./") || self.specifier.starts_with("../")
    }
}

/// An exported binding. The default export is named [`DEFAULT_EXPORT`].
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub name: String,
    pub value: Value,
}

/// An evaluated module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub imports: Vec<Import>,
    pub exports: Vec<Export>,
}

impl Module {
    /// Renders the module's exports as plain module source. Imports are not
    /// emitted.
    pub fn to_script(&self) -> String {
        let mut out = String::new();
        for (index, export) in self.exports.iter().enumerate() {
            let literal = serde_json::to_string_pretty(&export.value)
                .unwrap_or_else(|_| export.value.to_string());
            if export.name == DEFAULT_EXPORT {
                out.push_str(&format!("export default {literal};\n"));
            } else if is_identifier_name(&export.name) {
                out.push_str(&format!("export const {} = {literal};\n", export.name));
            } else {
                let local = format!("__export{index}");
                let exported = serde_json::to_string(&export.name)
                    .unwrap_or_else(|_| format!("\"{}\"", export.name));
                out.push_str(&format!(
                    "const {local} = {literal};\nexport {{ {local} as {exported} }};\n"
                ));
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The text is not valid module syntax.
    Syntax,
    /// The syntax is valid but an export cannot be reduced to a value.
    Evaluation,
}

/// A parse or evaluation failure with a 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    pub kind: SourceErrorKind,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SourceError {
    fn at(kind: SourceErrorKind, source: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_column(source, offset);
        Self {
            kind,
            line,
            column,
            message: message.into(),
        }
    }

    /// Attaches the module path.
    pub fn into_module_error(self, path: &Path) -> ModuleError {
        match self.kind {
            SourceErrorKind::Syntax => ModuleError::Syntax {
                path: path.to_path_buf(),
                line: self.line,
                column: self.column,
                message: self.message,
            },
            SourceErrorKind::Evaluation => ModuleError::Evaluation {
                path: path.to_path_buf(),
                message: self.to_string(),
            },
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for SourceError {}

/// Parses `source` as an ES module of the given source type and evaluates
/// its exports.
///
/// Script source types are parsed as modules too, so `export` statements
/// are always accepted.
pub fn parse(source: &str, source_type: SourceType) -> Result<Module, SourceError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type.with_module(true)).parse();

    if let Some(error) = ret.errors.first() {
        let offset = error
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map_or(0, |label| label.offset());
        return Err(SourceError::at(
            SourceErrorKind::Syntax,
            source,
            offset,
            error.message.to_string(),
        ));
    }
    if ret.panicked {
        return Err(SourceError::at(
            SourceErrorKind::Syntax,
            source,
            0,
            "unrecoverable syntax error",
        ));
    }

    Evaluator::new(source).module(&ret.program)
}

/// What a top-level name is bound to.
#[derive(Debug, Clone)]
enum Binding {
    Value(Value),
    /// The initializer could not be evaluated; reported on first use.
    Failed(SourceError),
    Type,
    Opaque(&'static str),
}

struct Evaluator<'s> {
    source: &'s str,
    bindings: HashMap<String, Binding>,
}

impl<'s> Evaluator<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            bindings: HashMap::new(),
        }
    }

    fn module(mut self, program: &Program<'_>) -> Result<Module, SourceError> {
        let mut module = Module::default();

        // Declarations first, so exports may name bindings declared later.
        for statement in program.body.iter() {
            match statement {
                Statement::ImportDeclaration(import) => {
                    let import = self.import(import);
                    module.imports.push(import);
                }
                Statement::VariableDeclaration(declaration) => self.declare(declaration),
                Statement::ExportNamedDeclaration(export) => {
                    if let Some(declaration) = &export.declaration {
                        self.declare_exported(declaration);
                    }
                    if let Some(source) = &export.source {
                        module.imports.push(self.reexport(
                            source.value.as_str(),
                            export.export_kind.is_type(),
                            export.span,
                        ));
                    }
                }
                Statement::ExportAllDeclaration(export) => {
                    module.imports.push(self.reexport(
                        export.source.value.as_str(),
                        export.export_kind.is_type(),
                        export.span,
                    ));
                }
                Statement::TSTypeAliasDeclaration(alias) => {
                    self.bind(alias.id.name.as_str(), Binding::Type);
                }
                Statement::TSInterfaceDeclaration(interface) => {
                    self.bind(interface.id.name.as_str(), Binding::Type);
                }
                Statement::FunctionDeclaration(function) => {
                    if let Some(id) = &function.id {
                        self.bind(id.name.as_str(), Binding::Opaque("a function"));
                    }
                }
                Statement::ClassDeclaration(class) => {
                    if let Some(id) = &class.id {
                        self.bind(id.name.as_str(), Binding::Opaque("a class"));
                    }
                }
                _ => {}
            }
        }

        for statement in program.body.iter() {
            match statement {
                Statement::ExportNamedDeclaration(export) => {
                    self.named_export(export, &mut module)?;
                }
                Statement::ExportDefaultDeclaration(export) => {
                    let declaration = &export.declaration;
                    if let ExportDefaultDeclarationKind::TSInterfaceDeclaration(_) = declaration {
                        continue;
                    }
                    let Some(expression) = declaration.as_expression() else {
                        return Err(self.unsupported(
                            declaration.span(),
                            "exported functions and classes cannot be evaluated",
                        ));
                    };
                    let value = self.evaluate(expression)?;
                    self.push_export(&mut module, DEFAULT_EXPORT, value, export.span)?;
                }
                Statement::ExportAllDeclaration(export) if !export.export_kind.is_type() => {
                    return Err(self.unsupported(
                        export.span,
                        "re-exported bindings cannot be evaluated",
                    ));
                }
                _ => {}
            }
        }

        Ok(module)
    }

    fn import(&mut self, import: &ImportDeclaration<'_>) -> Import {
        let type_only = import.import_kind.is_type();
        if let Some(specifiers) = &import.specifiers {
            for specifier in specifiers.iter() {
                let local = match specifier {
                    ImportDeclarationSpecifier::ImportSpecifier(s) => &s.local,
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => &s.local,
                };
                let binding = if type_only {
                    Binding::Type
                } else {
                    Binding::Opaque("an imported binding")
                };
                self.bind(local.name.as_str(), binding);
            }
        }

        Import {
            specifier: import.source.value.to_string(),
            type_only,
            line: self.line_of(import.span),
        }
    }

    fn reexport(&self, specifier: &str, type_only: bool, span: Span) -> Import {
        Import {
            specifier: specifier.to_string(),
            type_only,
            line: self.line_of(span),
        }
    }

    fn declare_exported(&mut self, declaration: &Declaration<'_>) {
        match declaration {
            Declaration::VariableDeclaration(variables) => self.declare(variables),
            Declaration::TSTypeAliasDeclaration(alias) => {
                self.bind(alias.id.name.as_str(), Binding::Type);
            }
            Declaration::TSInterfaceDeclaration(interface) => {
                self.bind(interface.id.name.as_str(), Binding::Type);
            }
            _ => {}
        }
    }

    fn declare(&mut self, declaration: &VariableDeclaration<'_>) {
        if declaration.declare {
            return;
        }
        for declarator in declaration.declarations.iter() {
            let Some(name) = declarator.id.get_identifier_name() else {
                continue;
            };
            let binding = match &declarator.init {
                Some(init) => match self.evaluate(init) {
                    Ok(value) => Binding::Value(value),
                    Err(e) => Binding::Failed(e),
                },
                None => Binding::Value(Value::Null),
            };
            self.bind(name.as_str(), binding);
        }
    }

    fn bind(&mut self, name: &str, binding: Binding) {
        self.bindings.insert(name.to_string(), binding);
    }

    fn named_export(
        &self,
        export: &ExportNamedDeclaration<'_>,
        module: &mut Module,
    ) -> Result<(), SourceError> {
        if export.export_kind.is_type() {
            return Ok(());
        }
        if export.source.is_some() {
            return Err(self.unsupported(export.span, "re-exported bindings cannot be evaluated"));
        }

        match &export.declaration {
            Some(Declaration::VariableDeclaration(declaration)) if !declaration.declare => {
                for declarator in declaration.declarations.iter() {
                    let Some(name) = declarator.id.get_identifier_name() else {
                        return Err(self.unsupported(
                            declarator.span,
                            "destructured exports cannot be evaluated",
                        ));
                    };
                    let value = self.lookup(name.as_str(), declarator.span)?;
                    self.push_export(module, name.as_str(), value, declarator.span)?;
                }
            }
            Some(Declaration::FunctionDeclaration(function)) => {
                return Err(self.unsupported(function.span, "exported functions cannot be evaluated"));
            }
            Some(Declaration::ClassDeclaration(class)) => {
                return Err(self.unsupported(class.span, "exported classes cannot be evaluated"));
            }
            _ => {}
        }

        for specifier in export.specifiers.iter() {
            if specifier.export_kind.is_type() {
                continue;
            }
            let local = specifier.local.name();
            if let Some(Binding::Type) = self.bindings.get(local.as_str()) {
                continue;
            }
            let value = self.lookup(local.as_str(), specifier.span)?;
            let exported = specifier.exported.name();
            self.push_export(module, exported.as_str(), value, specifier.span)?;
        }
        Ok(())
    }

    fn push_export(
        &self,
        module: &mut Module,
        name: &str,
        value: Value,
        span: Span,
    ) -> Result<(), SourceError> {
        if module.exports.iter().any(|export| export.name == name) {
            return Err(SourceError::at(
                SourceErrorKind::Syntax,
                self.source,
                span.start as usize,
                format!("duplicate export '{name}'"),
            ));
        }
        module.exports.push(Export {
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn lookup(&self, name: &str, span: Span) -> Result<Value, SourceError> {
        match self.bindings.get(name) {
            Some(Binding::Value(value)) => Ok(value.clone()),
            Some(Binding::Failed(error)) => Err(error.clone()),
            Some(Binding::Type) => {
                Err(self.unsupported(span, format!("'{name}' only names a type")))
            }
            Some(Binding::Opaque(what)) => Err(self.unsupported(
                span,
                format!("'{name}' is {what} and cannot be evaluated"),
            )),
            None if name == "undefined" => Ok(Value::Null),
            None => Err(self.unsupported(span, format!("'{name}' is not defined"))),
        }
    }

    fn evaluate(&self, expression: &Expression<'_>) -> Result<Value, SourceError> {
        match expression {
            Expression::NullLiteral(_) => Ok(Value::Null),
            Expression::BooleanLiteral(literal) => Ok(Value::Bool(literal.value)),
            Expression::NumericLiteral(literal) => self.number(literal.value, literal.span),
            Expression::StringLiteral(literal) => Ok(Value::String(literal.value.to_string())),
            Expression::TemplateLiteral(template) => self.template(template),
            Expression::Identifier(identifier) => {
                self.lookup(identifier.name.as_str(), identifier.span)
            }
            Expression::ArrayExpression(array) => {
                let mut items = Vec::with_capacity(array.elements.len());
                for element in array.elements.iter() {
                    match element {
                        ArrayExpressionElement::SpreadElement(spread) => {
                            match self.evaluate(&spread.argument)? {
                                Value::Array(values) => items.extend(values),
                                _ => {
                                    return Err(self.unsupported(
                                        spread.span,
                                        "only arrays can be spread into an array",
                                    ))
                                }
                            }
                        }
                        ArrayExpressionElement::Elision(_) => items.push(Value::Null),
                        other => {
                            let Some(expression) = other.as_expression() else {
                                return Err(self.unsupported(other.span(), "unsupported element"));
                            };
                            items.push(self.evaluate(expression)?);
                        }
                    }
                }
                Ok(Value::Array(items))
            }
            Expression::ObjectExpression(object) => {
                let mut map = Map::new();
                for property in object.properties.iter() {
                    match property {
                        ObjectPropertyKind::ObjectProperty(property) => {
                            if property.method || !matches!(property.kind, PropertyKind::Init) {
                                return Err(self.unsupported(
                                    property.span,
                                    "methods and accessors cannot be evaluated",
                                ));
                            }
                            let key = self.property_key(&property.key)?;
                            let value = self.evaluate(&property.value)?;
                            map.insert(key, value);
                        }
                        ObjectPropertyKind::SpreadProperty(spread) => {
                            match self.evaluate(&spread.argument)? {
                                Value::Object(entries) => map.extend(entries),
                                Value::Null => {}
                                _ => {
                                    return Err(self.unsupported(
                                        spread.span,
                                        "only objects can be spread into an object",
                                    ))
                                }
                            }
                        }
                    }
                }
                Ok(Value::Object(map))
            }
            Expression::UnaryExpression(unary) => {
                let negate = match unary.operator {
                    UnaryOperator::UnaryNegation => true,
                    UnaryOperator::UnaryPlus => false,
                    _ => {
                        return Err(self.unsupported(
                            unary.span,
                            format!("operator '{}' cannot be evaluated", unary.operator.as_str()),
                        ))
                    }
                };
                let Some(n) = self.evaluate(&unary.argument)?.as_f64() else {
                    return Err(self.unsupported(unary.span, "unary sign on a non-number"));
                };
                self.number(if negate { -n } else { n }, unary.span)
            }
            Expression::ParenthesizedExpression(inner) => self.evaluate(&inner.expression),
            Expression::TSAsExpression(inner) => self.evaluate(&inner.expression),
            Expression::TSSatisfiesExpression(inner) => self.evaluate(&inner.expression),
            Expression::TSNonNullExpression(inner) => self.evaluate(&inner.expression),
            Expression::TSTypeAssertion(inner) => self.evaluate(&inner.expression),
            other => Err(self.unsupported(
                other.span(),
                "expression cannot be evaluated to a literal value",
            )),
        }
    }

    fn property_key(&self, key: &PropertyKey<'_>) -> Result<String, SourceError> {
        match key {
            PropertyKey::StaticIdentifier(identifier) => Ok(identifier.name.to_string()),
            PropertyKey::PrivateIdentifier(identifier) => Err(self.unsupported(
                identifier.span,
                "private names cannot be evaluated",
            )),
            other => {
                let Some(expression) = other.as_expression() else {
                    return Err(self.unsupported(other.span(), "unsupported property key"));
                };
                match self.evaluate(expression)? {
                    Value::String(key) => Ok(key),
                    Value::Number(n) => Ok(n.to_string()),
                    _ => Err(self.unsupported(
                        expression.span(),
                        "property keys must be strings or numbers",
                    )),
                }
            }
        }
    }

    fn template(&self, template: &TemplateLiteral<'_>) -> Result<Value, SourceError> {
        let mut out = String::new();
        for (index, quasi) in template.quasis.iter().enumerate() {
            let Some(cooked) = &quasi.value.cooked else {
                return Err(self.unsupported(quasi.span, "invalid escape in template string"));
            };
            out.push_str(cooked.as_str());

            if let Some(expression) = template.expressions.get(index) {
                match self.evaluate(expression)? {
                    Value::String(s) => out.push_str(&s),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(self.unsupported(
                            expression.span(),
                            "only primitives can be interpolated",
                        ))
                    }
                    other => out.push_str(&other.to_string()),
                }
            }
        }
        Ok(Value::String(out))
    }

    /// Integral values within the safe range become integers, so `8080`
    /// compares equal to `json!(8080)`.
    fn number(&self, value: f64, span: Span) -> Result<Value, SourceError> {
        const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
        if value.fract() == 0.0 && value.abs() <= MAX_SAFE {
            return Ok(Value::from(value as i64));
        }
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .ok_or_else(|| self.unsupported(span, "non-finite numbers cannot be represented"))
    }

    fn unsupported(&self, span: Span, message: impl Into<String>) -> SourceError {
        SourceError::at(
            SourceErrorKind::Evaluation,
            self.source,
            span.start as usize,
            message,
        )
    }

    fn line_of(&self, span: Span) -> usize {
        line_column(self.source, span.start as usize).0
    }
}

/// 1-based line and column of a byte offset in `src`.
pub(crate) fn line_column(src: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(src.len());
    while !src.is_char_boundary(end) {
        end -= 1;
    }
    let before = &src[..end];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(i) => before[i + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ts(source: &str) -> Result<Module, SourceError> {
        parse(source, SourceType::ts())
    }

    #[test]
    fn test_parse_generated_module() {
        let source = r#"import type {AppConfig} from "./types.ts";

// Please review and adjust these settings as needed for your project.

export const config:AppConfig = {
    "port": 8080,
    "hosts": ["a", "b"]
};
"#;
        let module = ts(source).unwrap();

        assert_eq!(module.imports.len(), 1);
        assert!(module.imports[0].type_only);
        assert!(module.imports[0].is_relative());
        assert_eq!(module.imports[0].specifier, "./types.ts");
        assert_eq!(module.imports[0].line, 1);
        assert_eq!(
            module.exports,
            vec![Export {
                name: "config".into(),
                value: json!({"port": 8080, "hosts": ["a", "b"]}),
            }]
        );
    }

    #[test]
    fn test_object_literal_syntax() {
        let source = r#"
export default {
    port: 8080, // inline comment
    'single': 'quoted',
    "nested": { enabled: true, ratio: -0.5, },
    [`computed`]: `t${1}`,
    1: null,
    list: [1, , 3,],
};
"#;
        let module = ts(source).unwrap();

        assert_eq!(
            module.exports[0].value,
            json!({
                "port": 8080,
                "single": "quoted",
                "nested": {"enabled": true, "ratio": -0.5},
                "computed": "t1",
                "1": null,
                "list": [1, null, 3]
            })
        );
    }

    #[test]
    fn test_bindings_spreads_and_type_wrappers() {
        let source = r#"
interface Cfg { port: number; tags: string[] }
const tags = ["a"] as const;
const base = { port: 1, tags };
const config = { ...base, port: 2 } satisfies Cfg;
export default config;
export { base as "base-config" };
"#;
        let module = ts(source).unwrap();

        assert_eq!(module.exports[0].name, DEFAULT_EXPORT);
        assert_eq!(module.exports[0].value, json!({"port": 2, "tags": ["a"]}));
        assert_eq!(module.exports[1].name, "base-config");
        assert_eq!(module.exports[1].value, json!({"port": 1, "tags": ["a"]}));
    }

    #[test]
    fn test_type_declarations_are_skipped() {
        let source = r#"
export interface Server {
    host: string;
    nested: { port: number };
}
type Mode = "a" | "b" // either mode
export type Handler = (x: number) => void;
export type { Mode };
export { Server };
export const config: Record<string, Server> = {main: {host: "h", nested: {port: 1}}};
"#;
        let module = ts(source).unwrap();

        assert_eq!(module.exports.len(), 1);
        assert_eq!(module.exports[0].name, "config");
    }

    #[test]
    fn test_script_rejects_type_annotation() {
        let err = parse("export const config: AppConfig = {};", SourceType::mjs()).unwrap_err();

        assert_eq!(err.kind, SourceErrorKind::Syntax);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_import_forms() {
        let source = r#"
import "./side-effect.js";
import Default, {a, b as c} from "pkg";
import * as ns from './other.mjs';
import type {T} from "./type.js";
"#;
        let module = ts(source).unwrap();
        let specifiers: Vec<&str> = module
            .imports
            .iter()
            .map(|i| i.specifier.as_str())
            .collect();

        assert_eq!(
            specifiers,
            vec!["./side-effect.js", "pkg", "./other.mjs", "./type.js"]
        );
        assert_eq!(
            module.imports.iter().map(|i| i.type_only).collect::<Vec<_>>(),
            vec![false, false, false, true]
        );
        assert_eq!(module.imports[3].line, 5);
    }

    #[test]
    fn test_unevaluable_exports_report_position() {
        let err = ts("const port = 1;\nexport default {\n  port: compute(port),\n};").unwrap_err();
        assert_eq!(err.kind, SourceErrorKind::Evaluation);
        assert_eq!((err.line, err.column), (3, 9));

        let err = ts("import {shared} from \"./shared.js\";\nexport default shared;").unwrap_err();
        assert_eq!(err.kind, SourceErrorKind::Evaluation);
        assert!(err.message.contains("'shared' is an imported binding"));

        let err = ts("export function config() { return {}; }").unwrap_err();
        assert_eq!(err.kind, SourceErrorKind::Evaluation);
    }

    #[test]
    fn test_unused_unevaluable_binding_is_ignored() {
        let module = ts("const now = Date.now();\nexport default {a: 1};").unwrap();
        assert_eq!(module.exports[0].value, json!({"a": 1}));
    }

    #[test]
    fn test_duplicate_export() {
        let err = ts("export const a = 1;\nconst b = 2;\nexport { b as a };").unwrap_err();
        assert_eq!(err.kind, SourceErrorKind::Syntax);
        assert!(err.message.to_lowercase().contains("duplicate"));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = ts("/* open").unwrap_err();
        assert_eq!(err.kind, SourceErrorKind::Syntax);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_to_script_round_trips() {
        let source = "export const config: Cfg = {a: [1, 2]};\nexport default {b: 'x'};\nconst c = {};\nexport { c as 'odd name' };";
        let module = ts(source).unwrap();
        let script = module.to_script();

        assert!(!script.contains("Cfg"));
        assert_eq!(parse(&script, SourceType::mjs()).unwrap().exports, module.exports);
    }
}
