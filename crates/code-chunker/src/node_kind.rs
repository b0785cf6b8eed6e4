use serde::{Deserialize, Serialize};

/// Closed set of grammar node kinds the engine reasons about.
///
/// Every JavaScript/TypeScript kind that matters for classification, context
/// resolution or file-level extraction has its own variant; everything else
/// collapses into [`NodeKind::Other`]. Tree-sitter error nodes map to
/// [`NodeKind::Error`]. The raw grammar string is kept next to the kind on
/// every [`crate::syntax::SyntaxNode`], so nothing is lost for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Program,
    FunctionDeclaration,
    GeneratorFunctionDeclaration,
    ClassDeclaration,
    AbstractClassDeclaration,
    Class,
    ClassBody,
    MethodDefinition,
    MethodSignature,
    AbstractMethodSignature,
    InterfaceDeclaration,
    TypeAliasDeclaration,
    EnumDeclaration,
    InternalModule,
    Module,
    ArrowFunction,
    FunctionExpression,
    GeneratorFunction,
    ObjectPattern,
    ArrayPattern,
    LexicalDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    Object,
    Array,
    ExportStatement,
    ImportStatement,
    JsxElement,
    JsxSelfClosingElement,
    Decorator,
    SwitchStatement,
    SwitchCase,
    TryStatement,
    IfStatement,
    StatementBlock,
    CallExpression,
    Error,
    Other,
}

impl NodeKind {
    /// Kinds that have an entry in the chunk-worthiness predicate table.
    pub const CLASSIFIABLE: &'static [NodeKind] = &[
        NodeKind::FunctionDeclaration,
        NodeKind::ClassDeclaration,
        NodeKind::AbstractClassDeclaration,
        NodeKind::Class,
        NodeKind::MethodDefinition,
        NodeKind::InterfaceDeclaration,
        NodeKind::TypeAliasDeclaration,
        NodeKind::ArrowFunction,
        NodeKind::FunctionExpression,
        NodeKind::GeneratorFunctionDeclaration,
        NodeKind::GeneratorFunction,
        NodeKind::ObjectPattern,
        NodeKind::ArrayPattern,
        NodeKind::LexicalDeclaration,
        NodeKind::VariableDeclaration,
        NodeKind::ExportStatement,
        NodeKind::JsxElement,
        NodeKind::JsxSelfClosingElement,
        NodeKind::Decorator,
        NodeKind::SwitchCase,
        NodeKind::TryStatement,
        NodeKind::IfStatement,
        NodeKind::Object,
    ];

    /// Map a tree-sitter kind string onto the closed enumeration.
    #[must_use]
    pub fn from_grammar(kind: &str) -> Self {
        match kind {
            "program" => Self::Program,
            "function_declaration" => Self::FunctionDeclaration,
            "generator_function_declaration" => Self::GeneratorFunctionDeclaration,
            "class_declaration" => Self::ClassDeclaration,
            "abstract_class_declaration" => Self::AbstractClassDeclaration,
            "class" => Self::Class,
            "class_body" => Self::ClassBody,
            "method_definition" => Self::MethodDefinition,
            "method_signature" => Self::MethodSignature,
            "abstract_method_signature" => Self::AbstractMethodSignature,
            "interface_declaration" => Self::InterfaceDeclaration,
            "type_alias_declaration" => Self::TypeAliasDeclaration,
            "enum_declaration" => Self::EnumDeclaration,
            "internal_module" => Self::InternalModule,
            "module" => Self::Module,
            "arrow_function" => Self::ArrowFunction,
            // Older grammar releases named function expressions `function`.
            "function_expression" | "function" => Self::FunctionExpression,
            "generator_function" => Self::GeneratorFunction,
            "object_pattern" => Self::ObjectPattern,
            "array_pattern" => Self::ArrayPattern,
            "lexical_declaration" => Self::LexicalDeclaration,
            "variable_declaration" => Self::VariableDeclaration,
            "variable_declarator" => Self::VariableDeclarator,
            "object" => Self::Object,
            "array" => Self::Array,
            "export_statement" => Self::ExportStatement,
            "import_statement" => Self::ImportStatement,
            // Fragments (`<>...</>`) parse as `jsx_element` with an empty tag.
            "jsx_element" => Self::JsxElement,
            "jsx_self_closing_element" => Self::JsxSelfClosingElement,
            "decorator" => Self::Decorator,
            "switch_statement" => Self::SwitchStatement,
            "switch_case" => Self::SwitchCase,
            "try_statement" => Self::TryStatement,
            "if_statement" => Self::IfStatement,
            "statement_block" => Self::StatementBlock,
            "call_expression" => Self::CallExpression,
            "ERROR" => Self::Error,
            _ => Self::Other,
        }
    }

    /// Function-like kinds: bodies that open a new function scope.
    #[must_use]
    pub const fn is_function_like(self) -> bool {
        matches!(
            self,
            Self::FunctionDeclaration
                | Self::GeneratorFunctionDeclaration
                | Self::FunctionExpression
                | Self::GeneratorFunction
                | Self::ArrowFunction
                | Self::MethodDefinition
        )
    }

    /// Class-like containers whose methods are tagged `class_method`.
    #[must_use]
    pub const fn is_class_like(self) -> bool {
        matches!(
            self,
            Self::ClassDeclaration | Self::AbstractClassDeclaration | Self::Class
        )
    }

    /// Variable declaration statements (`var`, `let`, `const`).
    #[must_use]
    pub const fn is_variable_declaration(self) -> bool {
        matches!(self, Self::LexicalDeclaration | Self::VariableDeclaration)
    }

    /// Kinds eligible to act as the contextual ancestor of another node.
    ///
    /// Superset of the classifiable kinds: it adds the containers that are
    /// never chunks themselves but still give a node its scope.
    #[must_use]
    pub const fn is_significant(self) -> bool {
        match self {
            Self::FunctionDeclaration
            | Self::GeneratorFunctionDeclaration
            | Self::ClassDeclaration
            | Self::AbstractClassDeclaration
            | Self::Class
            | Self::MethodDefinition
            | Self::InterfaceDeclaration
            | Self::TypeAliasDeclaration
            | Self::EnumDeclaration
            | Self::InternalModule
            | Self::Module
            | Self::ArrowFunction
            | Self::FunctionExpression
            | Self::GeneratorFunction
            | Self::ObjectPattern
            | Self::ArrayPattern
            | Self::LexicalDeclaration
            | Self::VariableDeclaration
            | Self::Object
            | Self::ExportStatement
            | Self::JsxElement
            | Self::JsxSelfClosingElement
            | Self::Decorator
            | Self::SwitchStatement
            | Self::SwitchCase
            | Self::TryStatement
            | Self::IfStatement => true,
            Self::Program
            | Self::ClassBody
            | Self::MethodSignature
            | Self::AbstractMethodSignature
            | Self::VariableDeclarator
            | Self::Array
            | Self::ImportStatement
            | Self::StatementBlock
            | Self::CallExpression
            | Self::Error
            | Self::Other => false,
        }
    }

    /// Whether the kind has an entry in the predicate table.
    #[must_use]
    pub fn is_classifiable(self) -> bool {
        Self::CLASSIFIABLE.contains(&self)
    }
}
