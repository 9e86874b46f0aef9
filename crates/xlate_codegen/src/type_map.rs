//! Annotation to target type-name translation.

use xlate_ast::TypeAnnotation;
use xlate_core::FxMap;
use xlate_diagnostics::{format_message, messages, NodeContext, Result, TranspileError};

/// Placeholder standing for all generic arguments, comma separated.
const ALL_ARGS: &str = "{*}";

/// How one target spells source type names.
///
/// Primitive names map one to one. Generic bases map to templates whose
/// `{0}`, `{1}`, ... placeholders receive the translated arguments, or
/// `{*}` for all of them. Names with no entry pass through unchanged, so
/// user-declared classes keep their names.
#[derive(Debug, Clone)]
pub struct TypeMap {
    primitives: FxMap<&'static str, &'static str>,
    containers: FxMap<&'static str, &'static str>,
    default_type: &'static str,
}

impl TypeMap {
    /// An empty map; `default_type` is used when no annotation is present.
    pub fn new(default_type: &'static str) -> Self {
        Self {
            primitives: FxMap::default(),
            containers: FxMap::default(),
            default_type,
        }
    }

    pub fn primitive(mut self, source: &'static str, target: &'static str) -> Self {
        self.primitives.insert(source, target);
        self
    }

    pub fn container(mut self, base: &'static str, template: &'static str) -> Self {
        self.containers.insert(base, template);
        self
    }

    pub fn default_type(&self) -> &'static str {
        self.default_type
    }

    /// Whether `name` is one of the mapped primitive names.
    pub fn is_primitive(&self, name: &str) -> bool {
        self.primitives.contains_key(name)
    }

    /// Translate an optional annotation. `target` names the language in the
    /// unsupported-type message; `node` locates it.
    pub fn resolve(&self, ty: Option<&TypeAnnotation>, target: &str, node: NodeContext) -> Result<String> {
        match ty {
            None => Ok(self.default_type.to_string()),
            Some(ty) => self.translate(ty, target, node),
        }
    }

    fn translate(&self, ty: &TypeAnnotation, target: &str, node: NodeContext) -> Result<String> {
        match ty {
            TypeAnnotation::Name(name) => Ok(self
                .primitives
                .get(name.as_str())
                .map(|t| t.to_string())
                .unwrap_or_else(|| name.clone())),
            TypeAnnotation::Generic { base, args } => {
                let Some(template) = self.containers.get(base.as_str()) else {
                    return Err(TranspileError::unsupported(
                        &messages::TYPE_NOT_SUPPORTED,
                        &[target, &ty.to_string()],
                        node,
                    ));
                };
                let args = args
                    .iter()
                    .map(|arg| self.translate(arg, target, node))
                    .collect::<Result<Vec<_>>>()?;
                let template = template.replace(ALL_ARGS, &args.join(", "));
                let refs: Vec<&str> = args.iter().map(String::as_str).collect();
                Ok(format_message(&template, &refs))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xlate_core::TextRange;

    fn node() -> NodeContext {
        NodeContext::new(1, "AnnAssign", TextRange::new(0, 1))
    }

    fn map() -> TypeMap {
        TypeMap::new("T")
            .primitive("int", "i64")
            .primitive("str", "string")
            .container("List", "[]{0}")
            .container("Dict", "map[{0}]{1}")
            .container("Tuple", "({*})")
    }

    fn list(of: TypeAnnotation) -> TypeAnnotation {
        TypeAnnotation::generic("List", vec![of])
    }

    #[test]
    fn test_primitives_and_passthrough() {
        let map = map();
        let resolve = |ty: TypeAnnotation| map.resolve(Some(&ty), "V", node()).unwrap();
        assert_eq!(resolve(TypeAnnotation::name("int")), "i64");
        assert_eq!(resolve(TypeAnnotation::name("Point")), "Point");
        assert_eq!(map.resolve(None, "V", node()).unwrap(), "T");
    }

    #[test]
    fn test_nested_containers() {
        let map = map();
        let ty = TypeAnnotation::generic("Dict", vec![TypeAnnotation::name("str"), list(TypeAnnotation::name("int"))]);
        assert_eq!(map.resolve(Some(&ty), "V", node()).unwrap(), "map[string][]i64");
    }

    #[test]
    fn test_all_arguments_placeholder() {
        let ty = TypeAnnotation::generic("Tuple", vec![TypeAnnotation::name("int"), TypeAnnotation::name("str")]);
        assert_eq!(map().resolve(Some(&ty), "V", node()).unwrap(), "(i64, string)");
    }

    #[test]
    fn test_unknown_generic_base_is_unsupported() {
        let ty = TypeAnnotation::generic("Callable", vec![TypeAnnotation::name("int")]);
        let err = map().resolve(Some(&ty), "V", node()).unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(err.code(), 1030);
        assert_eq!(err.message(), "Type 'Callable[int]' is not supported in V.");
    }
}
