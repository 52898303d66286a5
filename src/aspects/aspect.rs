//! Aspect trait and helpers
//!
//! An aspect is an object exposing lifecycle methods named
//! `<targetMethod><Suffix>`, where the suffix is one of `Before`, `After`,
//! `Exception` or `Always`. It is registered under its type identifier.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context::{CallContext, Position};

/// Trait for aspects
pub trait Aspect: Send + Sync {
    /// Type identifier; a registry holds at most one aspect per name
    fn name(&self) -> &str;

    /// Every method name this aspect exposes (e.g. `saveBefore`)
    fn methods(&self) -> Vec<String>;

    /// Run the exposed method `method` against the call context
    fn advise(&self, method: &str, ctx: &mut CallContext);
}

type Advice = Arc<dyn Fn(&mut CallContext) + Send + Sync>;

/// An aspect assembled from closures
///
/// # Example
///
/// ```ignore
/// let audit = FnAspect::new("Audit")
///     .on("save", Position::Before, |ctx| tracing::info!("saving {:?}", ctx.args))
///     .on("save", Position::Exception, |ctx| tracing::warn!("save failed"));
/// ```
#[derive(Clone)]
pub struct FnAspect {
    name: String,
    // Kept in declaration order so `methods()` is stable
    advice: Vec<(String, Advice)>,
}

impl FnAspect {
    /// Create an aspect with no lifecycle methods
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            advice: Vec::new(),
        }
    }

    /// Expose `<target><Suffix>` running `f`
    pub fn on<F>(self, target: &str, position: Position, f: F) -> Self
    where
        F: Fn(&mut CallContext) + Send + Sync + 'static,
    {
        self.method(position.advice_name(target), f)
    }

    /// Expose an arbitrary method name running `f`; replaces an existing one
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut CallContext) + Send + Sync + 'static,
    {
        let name = name.into();
        let f: Advice = Arc::new(f);
        match self.advice.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = f,
            None => self.advice.push((name, f)),
        }
        self
    }

    /// Wrap into a shared trait object
    pub fn into_arc(self) -> Arc<dyn Aspect> {
        Arc::new(self)
    }
}

impl Aspect for FnAspect {
    fn name(&self) -> &str {
        &self.name
    }

    fn methods(&self) -> Vec<String> {
        self.advice.iter().map(|(n, _)| n.clone()).collect()
    }

    fn advise(&self, method: &str, ctx: &mut CallContext) {
        if let Some((_, f)) = self.advice.iter().find(|(n, _)| n == method) {
            f(ctx);
        }
    }
}

impl fmt::Debug for FnAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAspect")
            .field("name", &self.name)
            .field("methods", &self.methods())
            .finish()
    }
}

/// Constructs default aspect instances from type identifiers
pub trait AspectFactory: Send + Sync {
    /// Build an instance, or `None` if the identifier is unknown
    fn construct(&self, name: &str) -> Option<Arc<dyn Aspect>>;
}

type Constructor = Box<dyn Fn() -> Arc<dyn Aspect> + Send + Sync>;

/// Name → constructor table implementing [`AspectFactory`]
#[derive(Default)]
pub struct AspectCatalog {
    constructors: HashMap<String, Constructor>,
}

impl AspectCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `name`
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Arc<dyn Aspect> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Arc<dyn Aspect> + Send + Sync + 'static,
    {
        self.register(name, constructor);
        self
    }

    /// Whether `name` can be constructed
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }
}

impl AspectFactory for AspectCatalog {
    fn construct(&self, name: &str) -> Option<Arc<dyn Aspect>> {
        self.constructors.get(name).map(|c| c())
    }
}

/// An aspect given to bind/unbind: a live instance or a type identifier
#[derive(Clone)]
pub enum AspectRef {
    Instance(Arc<dyn Aspect>),
    Named(String),
}

impl AspectRef {
    /// The type identifier this reference names
    pub fn name(&self) -> &str {
        match self {
            AspectRef::Instance(aspect) => aspect.name(),
            AspectRef::Named(name) => name,
        }
    }
}

impl fmt::Debug for AspectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectRef::Instance(a) => f.debug_tuple("Instance").field(&a.name()).finish(),
            AspectRef::Named(n) => f.debug_tuple("Named").field(n).finish(),
        }
    }
}

impl From<Arc<dyn Aspect>> for AspectRef {
    fn from(aspect: Arc<dyn Aspect>) -> Self {
        AspectRef::Instance(aspect)
    }
}

impl From<FnAspect> for AspectRef {
    fn from(aspect: FnAspect) -> Self {
        AspectRef::Instance(Arc::new(aspect))
    }
}

impl From<&str> for AspectRef {
    fn from(name: &str) -> Self {
        AspectRef::Named(name.to_string())
    }
}

impl From<String> for AspectRef {
    fn from(name: String) -> Self {
        AspectRef::Named(name)
    }
}
