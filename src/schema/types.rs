//! Schema node types
//!
//! A [`Definition`] describes the constraints for one value position. Every
//! option is optional at this layer; normalization fills the documented
//! defaults before traversal. Definitions are plain data plus shared
//! closures, so cloning one is cheap and validating against one never
//! mutates it.

use std::fmt;
use std::rc::Rc;

use crate::path::PathSeg;
use crate::value::Value;

/// Supported type tags.
///
/// The set is closed: dispatch in the engine is an exhaustive match, and an
/// out-of-set tag in a JSON schema description is rejected while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// No type check at all
    Any,
    String,
    Number,
    Boolean,
    Function,
    /// Instance of a named class
    Class,
    Date,
    /// Named, fixed fields
    Object,
    /// Arbitrary string keys with extra-key policies
    IndexObject,
    Array,
    /// Arbitrary string keys, uniform values, no extra-key policy
    SimpleObject,
}

impl Kind {
    /// The tag as written in schema descriptions and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Any => "any",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Function => "function",
            Kind::Class => "class",
            Kind::Date => "date",
            Kind::Object => "object",
            Kind::IndexObject => "indexObject",
            Kind::Array => "array",
            Kind::SimpleObject => "simpleObject",
        }
    }

    pub(crate) fn from_tag(tag: &str) -> Option<Kind> {
        Some(match tag {
            "any" => Kind::Any,
            "string" => Kind::String,
            "number" => Kind::Number,
            "boolean" => Kind::Boolean,
            "function" => Kind::Function,
            "class" => Kind::Class,
            "date" => Kind::Date,
            "object" => Kind::Object,
            "indexObject" => Kind::IndexObject,
            "array" => Kind::Array,
            "simpleObject" => Kind::SimpleObject,
            _ => return None,
        })
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field default: either a literal value or a computed one.
#[derive(Clone)]
pub enum DefaultSpec {
    /// Returned verbatim. Shared containers are not deep-copied, so a
    /// literal object default installed at two sites aliases one storage;
    /// use the computed form for a fresh value per site.
    Literal(Value),
    /// Invoked with the in-progress traversal context.
    Computed(Rc<dyn Fn(&DefaultArgs) -> Value>),
}

impl fmt::Debug for DefaultSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultSpec::Literal(value) => write!(f, "Literal({:?})", value),
            DefaultSpec::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

/// Argument bundle handed to computed defaults.
pub struct DefaultArgs<'a> {
    /// The root value of the whole validation, if one exists
    pub root: Option<&'a Value>,
    /// The value being defaulted (absent unless defaulting on invalid)
    pub value: Option<&'a Value>,
    /// The schema node being defaulted, so a computed default can reuse
    /// its own constraints
    pub def: &'a Definition,
    /// Path of the field being defaulted
    pub path: &'a [PathSeg],
    /// Nearest enclosing container
    pub current: Option<&'a Value>,
    /// When the enclosing container sits in an array, that element's index
    pub index: Option<usize>,
}

/// Argument bundle handed to custom checks.
pub struct CustomArgs<'a> {
    pub value: &'a Value,
    /// Nearest enclosing container
    pub current: Option<&'a Value>,
}

/// A labelled caller-supplied predicate, run after the structural type
/// check passes.
#[derive(Clone)]
pub struct CustomCheck {
    pub label: String,
    check: Rc<dyn Fn(&CustomArgs) -> bool>,
}

impl CustomCheck {
    pub fn new<F>(label: impl Into<String>, check: F) -> Self
    where
        F: Fn(&CustomArgs) -> bool + 'static,
    {
        CustomCheck {
            label: label.into(),
            check: Rc::new(check),
        }
    }

    pub(crate) fn run(&self, args: &CustomArgs) -> bool {
        (self.check)(args)
    }
}

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomCheck({:?})", self.label)
    }
}

/// Child schema shape: a single uniform node, or a list of named fields.
#[derive(Debug, Clone)]
pub enum ChildSchema {
    Node(Box<Definition>),
    Fields(Vec<Definition>),
}

/// Constraints for one value position.
///
/// Built with the constructors and chainable setters below, or parsed from
/// a JSON description with [`Definition::from_json`].
#[derive(Debug, Clone, Default)]
pub struct Definition {
    /// Type tag; absent means `any`
    pub kind: Option<Kind>,
    /// Field name, used only inside a parent's field list
    pub name: Option<String>,
    pub required: Option<bool>,
    pub default: Option<DefaultSpec>,
    /// Allowed literal values (strings only)
    pub enum_values: Option<Vec<String>>,
    /// Minimum length in characters (strings only)
    pub min: Option<usize>,
    /// Maximum length in characters (strings only)
    pub max: Option<usize>,
    /// Pattern the string must match
    pub regex: Option<String>,
    /// Expected class name (tag `class` only)
    pub class: Option<String>,
    /// Ordered custom checks
    pub custom: Vec<CustomCheck>,
    pub schema: Option<ChildSchema>,
    /// Object/indexObject only; defaults to true
    pub allow_extra_keys: Option<bool>,
    /// Object/indexObject only; deletion suppresses the extra-key error
    pub delete_extra_keys: Option<bool>,
    /// Replace an invalid value with a fresh default resolution
    pub default_on_invalid: Option<bool>,
    /// Remove an invalid field/entry/element instead of recording errors
    pub delete_on_invalid: Option<bool>,
    /// Raise the aggregated subtree error instead of returning it
    pub throw_on_invalid: Option<bool>,
}

impl Definition {
    pub fn new(kind: Kind) -> Self {
        Definition {
            kind: Some(kind),
            ..Definition::default()
        }
    }

    pub fn any() -> Self {
        Definition::new(Kind::Any)
    }

    pub fn string() -> Self {
        Definition::new(Kind::String)
    }

    pub fn number() -> Self {
        Definition::new(Kind::Number)
    }

    pub fn boolean() -> Self {
        Definition::new(Kind::Boolean)
    }

    pub fn function() -> Self {
        Definition::new(Kind::Function)
    }

    pub fn date() -> Self {
        Definition::new(Kind::Date)
    }

    /// An instance of the named class.
    pub fn class(name: impl Into<String>) -> Self {
        let mut def = Definition::new(Kind::Class);
        def.class = Some(name.into());
        def
    }

    /// An object with the given field list.
    pub fn object(fields: Vec<Definition>) -> Self {
        let mut def = Definition::new(Kind::Object);
        def.schema = Some(ChildSchema::Fields(fields));
        def
    }

    /// An object with no declared fields (shape check only).
    pub fn bare_object() -> Self {
        Definition::new(Kind::Object)
    }

    /// An indexed map whose every entry matches one uniform child schema.
    pub fn index_object(child: Definition) -> Self {
        let mut def = Definition::new(Kind::IndexObject);
        def.schema = Some(ChildSchema::Node(Box::new(child)));
        def
    }

    /// An indexed map whose every entry is an object with the given fields.
    pub fn index_object_fields(fields: Vec<Definition>) -> Self {
        let mut def = Definition::new(Kind::IndexObject);
        def.schema = Some(ChildSchema::Fields(fields));
        def
    }

    /// An array whose every element matches one child schema.
    pub fn array(element: Definition) -> Self {
        let mut def = Definition::new(Kind::Array);
        def.schema = Some(ChildSchema::Node(Box::new(element)));
        def
    }

    /// An array with no element schema (shape check only).
    pub fn bare_array() -> Self {
        Definition::new(Kind::Array)
    }

    /// A simple object: arbitrary keys, one uniform value schema.
    pub fn simple_object(child: Definition) -> Self {
        let mut def = Definition::new(Kind::SimpleObject);
        def.schema = Some(ChildSchema::Node(Box::new(child)));
        def
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// A literal default, returned verbatim when the field is absent.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultSpec::Literal(value.into()));
        self
    }

    /// A computed default with access to siblings, ancestors, and the
    /// enclosing array index.
    pub fn default_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&DefaultArgs) -> Value + 'static,
    {
        self.default = Some(DefaultSpec::Computed(Rc::new(f)));
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    /// Appends a custom check; checks run in insertion order.
    pub fn check<F>(mut self, label: impl Into<String>, f: F) -> Self
    where
        F: Fn(&CustomArgs) -> bool + 'static,
    {
        self.custom.push(CustomCheck::new(label, f));
        self
    }

    pub fn allow_extra_keys(mut self, allow: bool) -> Self {
        self.allow_extra_keys = Some(allow);
        self
    }

    pub fn delete_extra_keys(mut self, delete: bool) -> Self {
        self.delete_extra_keys = Some(delete);
        self
    }

    pub fn default_on_invalid(mut self, enable: bool) -> Self {
        self.default_on_invalid = Some(enable);
        self
    }

    pub fn delete_on_invalid(mut self, enable: bool) -> Self {
        self.delete_on_invalid = Some(enable);
        self
    }

    pub fn throw_on_invalid(mut self, enable: bool) -> Self {
        self.throw_on_invalid = Some(enable);
        self
    }
}
