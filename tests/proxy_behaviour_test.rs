// End-to-end tests for proxies, aspects and hooks
//
// Run with: cargo test --test proxy_behaviour_test

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow::anyhow;
    use aop_proxy::{
        bind, bind_hooks, unbind, unbind_hooks, AspectRef, CallContext, DynamicObject, FnAspect,
        HookArg, Parameter, Position, Target,
    };
    use serde_json::{json, Value};

    /// What a hook saw, copied out of the call context
    #[derive(Debug, Clone, PartialEq)]
    struct Seen {
        tag: String,
        args: serde_json::Map<String, Value>,
        return_value: Option<Value>,
        failed: bool,
    }

    type Journal = Arc<Mutex<Vec<Seen>>>;

    fn journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn record(journal: &Journal, tag: &str, ctx: &CallContext) {
        journal.lock().unwrap().push(Seen {
            tag: tag.to_string(),
            args: ctx.args.clone(),
            return_value: ctx.return_value.clone(),
            failed: ctx.exception.is_some(),
        });
    }

    fn tags(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().iter().map(|s| s.tag.clone()).collect()
    }

    fn recorder(journal: &Journal, tag: &str) -> HookArg {
        let journal = Arc::clone(journal);
        let tag = tag.to_string();
        HookArg::func(move |ctx| record(&journal, &tag, ctx))
    }

    fn full_aspect(journal: &Journal, name: &str, method: &str) -> AspectRef {
        let mut aspect = FnAspect::new(name);
        for position in Position::ALL {
            let journal = Arc::clone(journal);
            let tag = format!("{}:{}", name, position);
            aspect = aspect.on(method, position, move |ctx| record(&journal, &tag, ctx));
        }
        aspect.into()
    }

    fn mandator(journal: &Journal) -> Target {
        let invoked = Arc::clone(journal);
        Target::object(
            DynamicObject::new("Mandator")
                .method("foo", vec![], move |_, _| {
                    invoked.lock().unwrap().push(Seen {
                        tag: "invoke".to_string(),
                        args: Default::default(),
                        return_value: None,
                        failed: false,
                    });
                    Ok(json!(42))
                })
                .method(
                    "sum",
                    vec![Parameter::required("a"), Parameter::optional("b", 5)],
                    |_, args| {
                        let a = args.first().and_then(Value::as_i64).unwrap_or(0);
                        let b = args.get(1).and_then(Value::as_i64).unwrap_or(5);
                        Ok(json!(a + b))
                    },
                )
                .method("explode", vec![], |_, _| Err(anyhow!("exploded")))
                .into_arc(),
        )
    }

    #[test]
    fn test_after_aspect_sees_return_value() {
        let journal = journal();
        let mut target = mandator(&journal);

        let sink = Arc::clone(&journal);
        let aspect = FnAspect::new("Observer")
            .on("foo", Position::After, move |ctx| record(&sink, "fooAfter", ctx));
        assert!(bind(&mut target, [AspectRef::from(aspect)]));

        assert_eq!(target.call("foo", &[]), json!(42));

        let seen = journal.lock().unwrap().clone();
        let after: Vec<_> = seen.iter().filter(|s| s.tag == "fooAfter").collect();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].return_value, Some(json!(42)));
    }

    #[test]
    fn test_before_hook_sees_pristine_context() {
        let journal = journal();
        let mut target = mandator(&journal);
        assert!(bind_hooks(&mut target, "foo", Position::Before, [recorder(&journal, "before")]));

        target.call("foo", &[]);

        let seen = journal.lock().unwrap().clone();
        assert_eq!(tags(&journal), vec!["before", "invoke"]);
        assert!(seen[0].args.is_empty());
        assert_eq!(seen[0].return_value, None);
        assert!(!seen[0].failed);
    }

    #[test]
    fn test_failure_runs_exception_and_always_once() {
        let journal = journal();
        let mut target = mandator(&journal);
        bind(&mut target, [full_aspect(&journal, "Full", "explode")]);
        for position in Position::ALL {
            bind_hooks(
                &mut target,
                "explode",
                position,
                [recorder(&journal, &format!("hook:{}", position))],
            );
        }

        assert_eq!(target.call("explode", &[]), Value::Null);
        assert_eq!(
            tags(&journal),
            vec![
                "Full:before",
                "hook:before",
                "Full:exception",
                "hook:exception",
                "Full:always",
                "hook:always",
            ]
        );
        let seen = journal.lock().unwrap().clone();
        assert!(seen.iter().skip(2).all(|s| s.failed));
    }

    #[test]
    fn test_success_runs_after_and_always_once() {
        let journal = journal();
        let mut target = mandator(&journal);
        bind(&mut target, [full_aspect(&journal, "Full", "foo")]);

        assert_eq!(target.call("foo", &[]), json!(42));
        assert_eq!(
            tags(&journal),
            vec!["Full:before", "invoke", "Full:after", "Full:always"]
        );
    }

    #[test]
    fn test_missing_method_returns_null_without_hooks() {
        let journal = journal();
        let mut target = mandator(&journal);
        bind(&mut target, [full_aspect(&journal, "Full", "nope")]);
        bind_hooks(&mut target, "/.*/", Position::Always, [recorder(&journal, "any")]);

        assert_eq!(target.call("nope", &[]), Value::Null);
        assert!(tags(&journal).is_empty());
    }

    #[test]
    fn test_parameter_resolution_in_context() {
        let journal = journal();
        let mut target = mandator(&journal);
        bind_hooks(&mut target, "sum", Position::Always, [recorder(&journal, "always")]);

        assert_eq!(target.call("sum", &[json!(10)]), json!(15));

        let seen = journal.lock().unwrap().clone();
        assert_eq!(seen[0].args.get("a"), Some(&json!(10)));
        assert_eq!(seen[0].args.get("b"), Some(&json!(5)));
        assert_eq!(seen[0].return_value, Some(json!(15)));
    }

    #[test]
    fn test_regex_and_exact_rules() {
        let journal = journal();
        let mut target = mandator(&journal);
        bind_hooks(&mut target, "su", Position::Before, [recorder(&journal, "exact-su")]);
        bind_hooks(&mut target, "/^su/", Position::Before, [recorder(&journal, "regex-su")]);
        bind_hooks(&mut target, "sum", Position::Before, [recorder(&journal, "exact-sum")]);

        target.call("sum", &[json!(1), json!(2)]);
        assert_eq!(tags(&journal), vec!["regex-su", "exact-sum"]);
    }

    #[test]
    fn test_double_bind_and_ghost_unbind() {
        let journal = journal();
        let mut target = mandator(&journal);
        bind(&mut target, [full_aspect(&journal, "Full", "foo")]);
        bind(&mut target, [full_aspect(&journal, "Full", "foo")]);
        bind(&mut target, [full_aspect(&journal, "Other", "foo")]);

        // Unbinding something never bound leaves the rest intact
        assert!(unbind(&mut target, [AspectRef::from("Ghost")]));
        assert_eq!(
            target.proxy().unwrap().aspect_names(),
            vec!["Full".to_string(), "Other".to_string()]
        );

        target.call("foo", &[]);
        let befores = tags(&journal)
            .into_iter()
            .filter(|t| t.ends_with(":before"))
            .count();
        assert_eq!(befores, 2);
    }

    #[test]
    fn test_unbind_hooks_by_position() {
        let journal = journal();
        let mut target = mandator(&journal);
        bind_hooks(&mut target, "foo", Position::Before, [recorder(&journal, "before")]);
        bind_hooks(&mut target, "foo", Position::After, [recorder(&journal, "after")]);

        assert!(unbind_hooks(&mut target, "foo", Some(Position::Before)));
        target.call("foo", &[]);
        assert_eq!(tags(&journal), vec!["invoke", "after"]);

        journal.lock().unwrap().clear();
        assert!(unbind_hooks(&mut target, "foo", None));
        target.call("foo", &[]);
        assert_eq!(tags(&journal), vec!["invoke"]);
    }

    #[test]
    fn test_property_passthrough() {
        let mut target = Target::object(
            DynamicObject::new("Config")
                .property("retries", 3)
                .into_arc(),
        );
        bind(&mut target, Vec::<AspectRef>::new());

        let proxy = target.proxy().unwrap();
        assert_eq!(proxy.get("retries"), Some(json!(3)));
        assert!(proxy.set("retries", json!(5)));
        assert_eq!(proxy.mandator().unwrap().get_property("retries"), Some(json!(5)));
    }

    #[test]
    fn test_concurrent_calls_share_one_proxy() {
        let journal = journal();
        let mut target = mandator(&journal);
        bind_hooks(&mut target, "sum", Position::After, [recorder(&journal, "after")]);

        let Target::Proxied(proxy) = target else {
            panic!("expected a proxy");
        };
        let proxy = Arc::new(proxy);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let proxy = Arc::clone(&proxy);
                std::thread::spawn(move || proxy.call("sum", &[json!(i), json!(1)]))
            })
            .collect();

        let mut results: Vec<i64> = handles
            .into_iter()
            .map(|h| h.join().unwrap().as_i64().unwrap())
            .collect();
        results.sort_unstable();

        assert_eq!(results, (1..=8).collect::<Vec<i64>>());
        assert_eq!(tags(&journal).len(), 8);
    }
}
