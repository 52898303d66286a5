//! Boundary operations over a binding slot
//!
//! `bind` and `bind_hooks` upgrade a plain object into a proxy in place,
//! the way a caller's variable is replaced by its proxy. Every operation
//! reports through a `bool` instead of an error.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::proxy::Proxy;
use crate::aspects::{AspectFactory, AspectRef};
use crate::config::ProxyConfig;
use crate::context::Position;
use crate::hooks::HookArg;
use crate::mandator::Mandator;

/// A slot holding a value, a plain object, or an object's proxy
pub enum Target {
    /// Not object-like; nothing can be bound to it
    Value(Value),
    /// A plain object, not yet proxied
    Object(Arc<dyn Mandator>),
    /// An object wrapped in a proxy
    Proxied(Proxy),
}

impl Target {
    /// Wrap an object
    pub fn object(mandator: Arc<dyn Mandator>) -> Self {
        Target::Object(mandator)
    }

    /// The proxy, if this slot holds one
    pub fn proxy(&self) -> Option<&Proxy> {
        match self {
            Target::Proxied(proxy) => Some(proxy),
            _ => None,
        }
    }

    /// Whether this slot holds a proxy
    pub fn is_proxy(&self) -> bool {
        matches!(self, Target::Proxied(_))
    }

    /// Whether this slot holds an object or a proxy
    pub fn is_object(&self) -> bool {
        !matches!(self, Target::Value(_))
    }

    /// Call a method through whatever the slot holds.
    ///
    /// A proxy dispatches through its hooks; a plain object is invoked
    /// directly when the method is public; a value yields `Null`.
    pub fn call(&self, method: &str, args: &[Value]) -> Value {
        match self {
            Target::Proxied(proxy) => proxy.call(method, args),
            Target::Object(mandator) => {
                if !mandator.visibility(method).is_some_and(|v| v.is_public()) {
                    return Value::Null;
                }
                mandator.invoke(method, args).unwrap_or_else(|e| {
                    tracing::debug!("{}::{} failed: {}", mandator.type_name(), method, e);
                    Value::Null
                })
            }
            Target::Value(_) => Value::Null,
        }
    }
}

impl From<Arc<dyn Mandator>> for Target {
    fn from(mandator: Arc<dyn Mandator>) -> Self {
        Target::Object(mandator)
    }
}

impl From<Value> for Target {
    fn from(value: Value) -> Self {
        Target::Value(value)
    }
}

impl From<Proxy> for Target {
    fn from(proxy: Proxy) -> Self {
        Target::Proxied(proxy)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Target::Object(m) => f.debug_tuple("Object").field(&m.type_name()).finish(),
            Target::Proxied(p) => f.debug_tuple("Proxied").field(p).finish(),
        }
    }
}

/// Performs bind/unbind with a shared configuration and aspect factory
#[derive(Clone, Default)]
pub struct Binder {
    config: ProxyConfig,
    factory: Option<Arc<dyn AspectFactory>>,
}

impl Binder {
    /// A binder with default configuration and no factory
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for proxies this binder creates
    pub fn with_config(mut self, config: ProxyConfig) -> Self {
        self.config = config;
        self
    }

    /// Factory for aspects bound by type identifier
    pub fn with_factory(mut self, factory: Arc<dyn AspectFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    fn ensure_proxy<'a>(&self, target: &'a mut Target) -> Option<&'a Proxy> {
        if let Target::Object(mandator) = target {
            let mut proxy = Proxy::with_config(Arc::clone(mandator), self.config.clone());
            if let Some(factory) = &self.factory {
                proxy = proxy.with_factory(Arc::clone(factory));
            }
            *target = Target::Proxied(proxy);
        }
        target.proxy()
    }

    /// Bind aspects, wrapping `target` in a proxy on first use.
    ///
    /// Returns `false` only if `target` is not object-like.
    pub fn bind<I>(&self, target: &mut Target, aspects: I) -> bool
    where
        I: IntoIterator<Item = AspectRef>,
    {
        let Some(proxy) = self.ensure_proxy(target) else {
            tracing::debug!("bind: target is not an object");
            return false;
        };
        proxy.add_aspects_with(self.factory.as_deref(), aspects);
        true
    }

    /// Unbind aspects. Returns `false` unless `target` is already a proxy.
    pub fn unbind<I>(&self, target: &mut Target, aspects: I) -> bool
    where
        I: IntoIterator<Item = AspectRef>,
    {
        match target.proxy() {
            Some(proxy) => {
                proxy.remove_aspects(aspects);
                true
            }
            None => false,
        }
    }

    /// Bind raw hooks under `(pattern, position)`.
    ///
    /// Returns `false` if `target` is not object-like or `pattern` is empty.
    pub fn bind_hooks<I>(&self, target: &mut Target, pattern: &str, position: Position, hooks: I) -> bool
    where
        I: IntoIterator<Item = HookArg>,
    {
        if pattern.is_empty() || !target.is_object() {
            return false;
        }
        match self.ensure_proxy(target) {
            Some(proxy) => {
                proxy.add_hooks(pattern, position, hooks);
                true
            }
            None => false,
        }
    }

    /// Unbind raw hooks under `pattern`, for one position or all.
    ///
    /// Returns `false` unless `target` is a proxy and `pattern` is non-empty.
    pub fn unbind_hooks(&self, target: &mut Target, pattern: &str, position: Option<Position>) -> bool {
        if pattern.is_empty() {
            return false;
        }
        match target.proxy() {
            Some(proxy) => {
                proxy.remove_hooks(pattern, position);
                true
            }
            None => false,
        }
    }
}

/// Bind aspects with a default [`Binder`]
pub fn bind<I>(target: &mut Target, aspects: I) -> bool
where
    I: IntoIterator<Item = AspectRef>,
{
    Binder::new().bind(target, aspects)
}

/// Unbind aspects with a default [`Binder`]
pub fn unbind<I>(target: &mut Target, aspects: I) -> bool
where
    I: IntoIterator<Item = AspectRef>,
{
    Binder::new().unbind(target, aspects)
}

/// Bind raw hooks with a default [`Binder`]
pub fn bind_hooks<I>(target: &mut Target, pattern: &str, position: Position, hooks: I) -> bool
where
    I: IntoIterator<Item = HookArg>,
{
    Binder::new().bind_hooks(target, pattern, position, hooks)
}

/// Unbind raw hooks with a default [`Binder`]
pub fn unbind_hooks(target: &mut Target, pattern: &str, position: Option<Position>) -> bool {
    Binder::new().unbind_hooks(target, pattern, position)
}
