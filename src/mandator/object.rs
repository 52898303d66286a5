//! A mandator assembled at runtime
//!
//! `DynamicObject` declares its methods and their signatures at
//! registration time, for hosts that have no reflection to ask.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{bail, Result};
use serde_json::{Map, Value};

use super::{Mandator, Visibility};
use crate::signature::Parameter;

/// Method body: receives the object (for property access) and positional args
pub type MethodFn = Arc<dyn Fn(&DynamicObject, &[Value]) -> Result<Value> + Send + Sync>;

struct Method {
    visibility: Visibility,
    params: Vec<Parameter>,
    body: MethodFn,
}

/// Runtime-declared object implementing [`Mandator`]
pub struct DynamicObject {
    type_name: String,
    methods: HashMap<String, Method>,
    properties: RwLock<Map<String, Value>>,
}

impl DynamicObject {
    /// Create an object with no methods or properties
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            methods: HashMap::new(),
            properties: RwLock::new(Map::new()),
        }
    }

    /// Declare a public method
    pub fn method<F>(self, name: impl Into<String>, params: Vec<Parameter>, body: F) -> Self
    where
        F: Fn(&DynamicObject, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.method_with_visibility(name, Visibility::Public, params, body)
    }

    /// Declare a method with explicit visibility
    pub fn method_with_visibility<F>(
        mut self,
        name: impl Into<String>,
        visibility: Visibility,
        params: Vec<Parameter>,
        body: F,
    ) -> Self
    where
        F: Fn(&DynamicObject, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(
            name.into(),
            Method {
                visibility,
                params,
                body: Arc::new(body),
            },
        );
        self
    }

    /// Declare a property with an initial value
    pub fn property(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
        self
    }

    /// Call a method from inside another method body, bypassing visibility
    pub fn call_internal(&self, method: &str, args: &[Value]) -> Result<Value> {
        match self.methods.get(method) {
            Some(m) => (m.body)(self, args),
            None => bail!("Call to undefined method {}::{}()", self.type_name, method),
        }
    }

    /// Wrap into a shared trait object
    pub fn into_arc(self) -> Arc<dyn Mandator> {
        Arc::new(self)
    }
}

impl Mandator for DynamicObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn visibility(&self, method: &str) -> Option<Visibility> {
        self.methods.get(method).map(|m| m.visibility)
    }

    fn signature(&self, method: &str) -> Vec<Parameter> {
        self.methods
            .get(method)
            .map(|m| m.params.clone())
            .unwrap_or_default()
    }

    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value> {
        self.call_internal(method, args)
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        self.properties
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn set_property(&self, name: &str, value: Value) -> bool {
        self.properties
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
        true
    }
}

impl fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&String> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("DynamicObject")
            .field("type_name", &self.type_name)
            .field("methods", &methods)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counter() -> DynamicObject {
        DynamicObject::new("Counter")
            .property("count", 0)
            .method("increment", vec![Parameter::optional("by", 1)], |this, args| {
                let by = args.first().and_then(Value::as_i64).unwrap_or(1);
                let current = this.get_property("count").and_then(|v| v.as_i64()).unwrap_or(0);
                this.set_property("count", json!(current + by));
                this.call_internal("snapshot", &[])
            })
            .method_with_visibility("snapshot", Visibility::Private, vec![], |this, _| {
                Ok(this.get_property("count").unwrap_or(Value::Null))
            })
    }

    #[test]
    fn test_reflection_surface() {
        let obj = counter();
        assert_eq!(obj.type_name(), "Counter");
        assert_eq!(obj.visibility("increment"), Some(Visibility::Public));
        assert_eq!(obj.visibility("snapshot"), Some(Visibility::Private));
        assert_eq!(obj.visibility("reset"), None);
        assert_eq!(obj.signature("increment"), vec![Parameter::optional("by", 1)]);
        assert!(obj.signature("reset").is_empty());
    }

    #[test]
    fn test_invoke_mutates_properties() {
        let obj = counter();
        assert_eq!(obj.invoke("increment", &[json!(5)]).unwrap(), json!(5));
        assert_eq!(obj.invoke("increment", &[]).unwrap(), json!(6));
        assert_eq!(obj.get_property("count"), Some(json!(6)));
    }

    #[test]
    fn test_invoke_undefined_method_errors() {
        let obj = counter();
        let err = obj.invoke("reset", &[]).unwrap_err();
        assert!(err.to_string().contains("Counter::reset"));
    }
}
