//! The proxy and its invocation dispatcher
//!
//! A call goes through these phases:
//! - Resolve: check the method exists and is public, bind arguments by name
//! - Before: `<method>Before` aspects, then `before` hooks
//! - Invoke: call the mandator with the raw positional arguments
//! - After or Exception: exactly one, depending on the outcome
//! - Always: `<method>Always` aspects, then `always` hooks
//!
//! Calls that fail the resolve checks return `Null` and run no hooks.
//! Invocation errors are captured into the call context and never
//! propagate to the caller.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use crate::aspects::{Aspect, AspectFactory, AspectRef, AspectRegistry};
use crate::config::ProxyConfig;
use crate::context::{CallContext, Position};
use crate::hooks::{HookArg, HookFn, HookRegistry};
use crate::mandator::Mandator;
use crate::rules::ByPosition;
use crate::signature::{resolve, Signature, SignatureCache};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Everything that will run around one call, captured at dispatch start
struct DispatchPlan {
    aspects: BTreeMap<Position, Vec<Arc<dyn Aspect>>>,
    hooks: ByPosition<HookFn>,
}

impl DispatchPlan {
    fn run(&self, position: Position, ctx: &mut CallContext) -> usize {
        let mut ran = 0;
        if let Some(aspects) = self.aspects.get(&position) {
            let advice = position.advice_name(&ctx.method);
            for aspect in aspects {
                tracing::trace!("Running {}::{}", aspect.name(), advice);
                aspect.advise(&advice, ctx);
                ran += 1;
            }
        }
        if let Some(hooks) = self.hooks.get(&position) {
            for hook in hooks {
                hook(&mut *ctx);
                ran += 1;
            }
        }
        ran
    }
}

/// Intercepting wrapper around a mandator
pub struct Proxy {
    class: String,
    mandator: RwLock<Option<Arc<dyn Mandator>>>,
    config: ProxyConfig,
    aspects: RwLock<AspectRegistry>,
    hooks: RwLock<HookRegistry>,
    signatures: Arc<SignatureCache>,
    factory: Option<Arc<dyn AspectFactory>>,
}

impl Proxy {
    /// Wrap `mandator` with the default configuration
    pub fn new(mandator: Arc<dyn Mandator>) -> Self {
        Self::with_config(mandator, ProxyConfig::default())
    }

    /// Wrap `mandator` with an explicit configuration
    pub fn with_config(mandator: Arc<dyn Mandator>, config: ProxyConfig) -> Self {
        let class = mandator.type_name().to_string();
        tracing::debug!("Creating proxy for {}", class);
        Self {
            class,
            mandator: RwLock::new(Some(mandator)),
            config,
            aspects: RwLock::new(AspectRegistry::new()),
            hooks: RwLock::new(HookRegistry::new()),
            signatures: Arc::new(SignatureCache::new()),
            factory: None,
        }
    }

    /// Use `factory` to construct aspects bound by type identifier
    pub fn with_factory(mut self, factory: Arc<dyn AspectFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Share a signature cache with other proxies
    pub fn with_signature_cache(mut self, cache: Arc<SignatureCache>) -> Self {
        self.signatures = cache;
        self
    }

    /// Type identifier of the wrapped mandator
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// The configuration in effect
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// The signature cache in use
    pub fn signature_cache(&self) -> &Arc<SignatureCache> {
        &self.signatures
    }

    /// The wrapped mandator, unless released
    pub fn mandator(&self) -> Option<Arc<dyn Mandator>> {
        read(&self.mandator).clone()
    }

    /// Detach the mandator.
    ///
    /// Afterwards every call returns `Null` and property access is rejected.
    pub fn release(&self) -> Option<Arc<dyn Mandator>> {
        tracing::debug!("Releasing mandator of {} proxy", self.class);
        write(&self.mandator).take()
    }

    /// Bind aspects; named ones are constructed through the factory.
    ///
    /// A named aspect is registered under the name it was requested by, an
    /// instance under its own `name()`. Unknown names and already-bound
    /// identifiers are skipped. Returns the number of aspects actually added.
    pub fn add_aspects<I>(&self, aspects: I) -> usize
    where
        I: IntoIterator<Item = AspectRef>,
    {
        self.add_aspects_with(None, aspects)
    }

    /// Like [`Proxy::add_aspects`], trying `factory` before the proxy's own
    pub(crate) fn add_aspects_with<I>(&self, factory: Option<&dyn AspectFactory>, aspects: I) -> usize
    where
        I: IntoIterator<Item = AspectRef>,
    {
        let mut added = 0;
        for aspect in aspects {
            let Some((name, instance)) = self.instantiate(factory, aspect) else {
                continue;
            };
            if write(&self.aspects).add(&name, instance) {
                tracing::info!("Bound aspect '{}' to {}", name, self.class);
                added += 1;
            }
        }
        added
    }

    fn instantiate(
        &self,
        factory: Option<&dyn AspectFactory>,
        aspect: AspectRef,
    ) -> Option<(String, Arc<dyn Aspect>)> {
        match aspect {
            AspectRef::Instance(instance) => Some((instance.name().to_string(), instance)),
            AspectRef::Named(name) => {
                let built = factory
                    .and_then(|f| f.construct(&name))
                    .or_else(|| self.factory.as_ref().and_then(|f| f.construct(&name)));
                match built {
                    Some(instance) => Some((name, instance)),
                    None => {
                        tracing::debug!("Cannot construct aspect '{}', skipping", name);
                        None
                    }
                }
            }
        }
    }

    /// Unbind aspects by instance or identifier. Returns how many were removed.
    pub fn remove_aspects<I>(&self, aspects: I) -> usize
    where
        I: IntoIterator<Item = AspectRef>,
    {
        let mut registry = write(&self.aspects);
        let mut removed = 0;
        for aspect in aspects {
            if registry.remove(aspect.name()) {
                tracing::info!("Unbound aspect '{}' from {}", aspect.name(), self.class);
                removed += 1;
            }
        }
        removed
    }

    /// Register raw hooks under `(pattern, position)`; non-callables are dropped
    pub fn add_hooks<I>(&self, pattern: &str, position: Position, hooks: I) -> usize
    where
        I: IntoIterator<Item = HookArg>,
    {
        write(&self.hooks).add(pattern, position, hooks)
    }

    /// Remove raw hooks under `pattern`, for one position or all of them
    pub fn remove_hooks(&self, pattern: &str, position: Option<Position>) -> bool {
        write(&self.hooks).remove(pattern, position)
    }

    /// Bound aspect identifiers, in binding order
    pub fn aspect_names(&self) -> Vec<String> {
        read(&self.aspects).names().to_vec()
    }

    /// Whether an aspect with this identifier is bound
    pub fn has_aspect(&self, name: &str) -> bool {
        read(&self.aspects).contains(name)
    }

    /// Registered hook patterns, in registration order
    pub fn hook_patterns(&self) -> Vec<String> {
        read(&self.hooks)
            .patterns()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Read a property of the mandator; `None` when released or absent
    pub fn get(&self, name: &str) -> Option<Value> {
        self.mandator()?.get_property(name)
    }

    /// Write a property of the mandator; `false` when released or rejected
    pub fn set(&self, name: &str, value: Value) -> bool {
        match self.mandator() {
            Some(mandator) => mandator.set_property(name, value),
            None => false,
        }
    }

    fn signature_of(&self, mandator: &dyn Mandator, method: &str) -> Signature {
        if self.config.cache_signatures {
            self.signatures
                .get_or_insert_with(&self.class, method, || mandator.signature(method))
        } else {
            mandator.signature(method).into()
        }
    }

    fn plan(&self, method: &str) -> DispatchPlan {
        let aspects = {
            let registry = read(&self.aspects);
            Position::ALL
                .iter()
                .map(|p| (*p, registry.methods_for(&p.advice_name(method))))
                .filter(|(_, list)| !list.is_empty())
                .collect()
        };
        let hooks = read(&self.hooks).matching(method);
        DispatchPlan { aspects, hooks }
    }

    /// Dispatch `method` through the aspect and hook phases.
    ///
    /// Returns the call's return value, or `Null` if the method does not
    /// exist, is not public, or failed.
    pub fn call(&self, method: &str, args: &[Value]) -> Value {
        let Some(mandator) = self.mandator() else {
            tracing::debug!("{}::{} called on released proxy", self.class, method);
            return Value::Null;
        };

        match mandator.visibility(method) {
            Some(visibility) if visibility.is_public() => {}
            Some(visibility) => {
                tracing::debug!("{}::{} is {:?}, not dispatching", self.class, method, visibility);
                return Value::Null;
            }
            None => {
                tracing::debug!("{}::{} does not exist", self.class, method);
                return Value::Null;
            }
        }

        let _span = tracing::debug_span!("dispatch", class = %self.class, method).entered();

        let signature = self.signature_of(mandator.as_ref(), method);
        let mut ctx = CallContext::new(&self.class, method, resolve(&signature, args));

        // Snapshot under read locks; nothing below holds a registry lock
        let plan = self.plan(method);

        plan.run(Position::Before, &mut ctx);

        let succeeded = match mandator.invoke(method, args) {
            Ok(value) => {
                ctx.return_value = Some(value);
                plan.run(Position::After, &mut ctx);
                true
            }
            Err(err) => {
                tracing::debug!("{} failed: {:#}", ctx.signature(), err);
                ctx.exception = Some(err);
                if plan.run(Position::Exception, &mut ctx) == 0 {
                    tracing::warn!(
                        "{} failed with no exception handlers: {}",
                        ctx.signature(),
                        ctx.exception.as_ref().map(|e| e.to_string()).unwrap_or_default()
                    );
                }
                false
            }
        };

        plan.run(Position::Always, &mut ctx);

        if self.config.trace_calls {
            tracing::info!(
                call_id = %ctx.call_id,
                "{} {} in {}ms",
                ctx.signature(),
                if succeeded { "returned" } else { "failed" },
                ctx.elapsed_ms()
            );
        }

        if succeeded {
            ctx.return_value.take().unwrap_or(Value::Null)
        } else {
            Value::Null
        }
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("class", &self.class)
            .field("aspects", &self.aspect_names())
            .field("hook_patterns", &self.hook_patterns())
            .field("config", &self.config)
            .finish()
    }
}
