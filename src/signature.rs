use std::collections::{BTreeMap, HashMap};

use crate::value::{digest_str, Value};

/// Declared parameter interface of an invocable.
///
/// Built once per wrapped function and immutable afterwards; the fingerprint
/// generator resolves every call against it. Ordered positional parameters,
/// keyword-only parameters, default values and variadic markers mirror what a
/// reflective language would read off the function at decoration time.
///
/// # Examples
///
/// ```
/// use supercache::{Signature, Value};
///
/// // fn format_data(data, print_messages=false, json_convert=true, **options)
/// let sig = Signature::builder()
///     .param("data")
///     .param_with_default("print_messages", Value::from(false))
///     .param_with_default("json_convert", Value::from(true))
///     .variadic_kwargs()
///     .build();
///
/// assert_eq!(sig.params(), ["data", "print_messages", "json_convert"]);
/// assert_eq!(sig.default_of("json_convert"), Some(&Value::from(true)));
/// ```
#[derive(Debug, Clone)]
pub struct Signature {
    params: Vec<String>,
    kwonly: Vec<String>,
    defaults: HashMap<String, Value>,
    variadic_args: bool,
    variadic_kwargs: bool,
}

impl Signature {
    pub fn builder() -> SignatureBuilder {
        SignatureBuilder {
            params: Vec::new(),
            kwonly: Vec::new(),
            defaults: HashMap::new(),
            variadic_args: false,
            variadic_kwargs: false,
        }
    }

    /// Declared positional parameter names, in order.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Keyword-only parameter names, in declaration order.
    pub fn kwonly(&self) -> &[String] {
        &self.kwonly
    }

    /// Default value for a parameter (positional or keyword-only), if any.
    pub fn default_of(&self, name: &str) -> Option<&Value> {
        self.defaults.get(name)
    }

    /// Position of a declared positional parameter.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p == name)
    }

    /// Whether extra positional values beyond the declared parameters are
    /// accepted (`*args`-style catch-all).
    pub fn has_variadic_args(&self) -> bool {
        self.variadic_args
    }

    /// Whether extra keyword values are accepted (`**kwargs`-style catch-all).
    pub fn has_variadic_kwargs(&self) -> bool {
        self.variadic_kwargs
    }
}

/// Builder for [`Signature`]; declaration order of `param`/`kwonly` calls is
/// preserved.
#[derive(Debug)]
pub struct SignatureBuilder {
    params: Vec<String>,
    kwonly: Vec<String>,
    defaults: HashMap<String, Value>,
    variadic_args: bool,
    variadic_kwargs: bool,
}

impl SignatureBuilder {
    pub fn param(mut self, name: &str) -> Self {
        self.params.push(name.to_string());
        self
    }

    pub fn param_with_default(mut self, name: &str, default: Value) -> Self {
        self.params.push(name.to_string());
        self.defaults.insert(name.to_string(), default);
        self
    }

    pub fn kwonly(mut self, name: &str) -> Self {
        self.kwonly.push(name.to_string());
        self
    }

    pub fn kwonly_with_default(mut self, name: &str, default: Value) -> Self {
        self.kwonly.push(name.to_string());
        self.defaults.insert(name.to_string(), default);
        self
    }

    pub fn variadic_args(mut self) -> Self {
        self.variadic_args = true;
        self
    }

    pub fn variadic_kwargs(mut self) -> Self {
        self.variadic_kwargs = true;
        self
    }

    pub fn build(self) -> Signature {
        Signature {
            params: self.params,
            kwonly: self.kwonly,
            defaults: self.defaults,
            variadic_args: self.variadic_args,
            variadic_kwargs: self.variadic_kwargs,
        }
    }
}

/// Concrete arguments of one invocation: positional values in order, keyword
/// values by name. Keywords are kept in a sorted map so every traversal is
/// deterministic.
///
/// # Examples
///
/// ```
/// use supercache::{Call, Value};
///
/// let call = Call::new().arg(1).kwarg("verbose", true);
/// assert_eq!(call.args().len(), 1);
/// assert_eq!(call.kwarg_of("verbose"), Some(&Value::from(true)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Call {
    args: Vec<Value>,
    kwargs: BTreeMap<String, Value>,
}

impl Call {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.to_string(), value.into());
        self
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn kwargs(&self) -> &BTreeMap<String, Value> {
        &self.kwargs
    }

    pub fn kwarg_of(&self, name: &str) -> Option<&Value> {
        self.kwargs.get(name)
    }
}

/// Stable identity of an invocable.
///
/// Unique per distinct function, stable across calls and process restarts, and
/// distinct across textually distinct definitions even when their bodies are
/// identical. The identity is `namespace.name`; the [`function_id!`] macro
/// derives the namespace from `module_path!` and, for closures, adds a
/// `file:line` discriminator.
///
/// [`function_id!`]: crate::function_id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionId {
    namespace: String,
    name: String,
}

impl FunctionId {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    /// Fully qualified `namespace.name` form.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// The digest this identity contributes as the first component of every
    /// fingerprint. The facade uses it to match all stored entries of one
    /// invocable.
    pub fn component(&self) -> String {
        digest_str(&self.qualified())
    }
}

impl std::fmt::Display for FunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Builds a [`FunctionId`] for the current module.
///
/// With a name, the identity is `module_path.name`. Without one (closures,
/// ad-hoc computations), the definition site `file:line` serves as the name,
/// which keeps two lambdas on different lines distinct.
///
/// # Examples
///
/// ```
/// use supercache::function_id;
///
/// let id = function_id!("fetch_user");
/// assert!(id.qualified().ends_with(".fetch_user"));
///
/// let anon_a = function_id!();
/// let anon_b = function_id!();
/// assert_ne!(anon_a, anon_b);
/// ```
#[macro_export]
macro_rules! function_id {
    ($name:expr) => {
        $crate::FunctionId::new(module_path!(), $name)
    };
    () => {
        $crate::FunctionId::new(
            module_path!(),
            concat!(file!(), ":", line!()),
        )
    };
}
