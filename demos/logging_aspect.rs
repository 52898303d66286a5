//! Logging Aspect Demo
//!
//! Wraps a small account object in a proxy, binds a logging aspect and a
//! regex hook, and shows how failures are captured instead of propagated.

use anyhow::{bail, Result};
use aop_proxy::logging::init_logging;
use aop_proxy::{
    bind, bind_hooks, AspectRef, DynamicObject, FnAspect, HookArg, LoggingConfig, Mandator,
    Parameter, Position, Target,
};
use serde_json::{json, Value};

fn account() -> Target {
    DynamicObject::new("Account")
        .property("balance", 100)
        .method("balance", vec![], |this, _| {
            Ok(this.get_property("balance").unwrap_or(Value::Null))
        })
        .method(
            "withdraw",
            vec![Parameter::required("amount"), Parameter::optional("memo", "")],
            |this, args| {
                let amount = args.first().and_then(Value::as_i64).unwrap_or(0);
                let balance = this.get_property("balance").and_then(|v| v.as_i64()).unwrap_or(0);
                if amount > balance {
                    bail!("insufficient funds: {} > {}", amount, balance);
                }
                this.set_property("balance", json!(balance - amount));
                Ok(json!(balance - amount))
            },
        )
        .into_arc()
        .into()
}

fn main() -> Result<()> {
    let log_config = LoggingConfig::new()
        .with_directory(std::env::temp_dir().join("aop-proxy-demo"))
        .with_console(true);
    init_logging(&log_config)?;

    let mut target = account();

    let logger = FnAspect::new("Logger")
        .on("withdraw", Position::Before, |ctx| {
            tracing::info!("withdraw requested with {:?}", ctx.args);
        })
        .on("withdraw", Position::After, |ctx| {
            tracing::info!("withdraw ok, new balance {:?}", ctx.return_value);
        })
        .on("withdraw", Position::Exception, |ctx| {
            if let Some(err) = &ctx.exception {
                tracing::warn!("withdraw failed: {}", err);
            }
        });
    bind(&mut target, [AspectRef::from(logger)]);

    bind_hooks(
        &mut target,
        "/^(withdraw|balance)$/",
        Position::Always,
        [HookArg::func(|ctx| {
            println!("{} finished in {}ms", ctx.signature(), ctx.elapsed_ms());
        })],
    );

    println!("withdraw(30)  -> {}", target.call("withdraw", &[json!(30)]));
    println!("withdraw(500) -> {}", target.call("withdraw", &[json!(500)]));
    println!("balance()     -> {}", target.call("balance", &[]));
    println!("missing()     -> {}", target.call("missing", &[]));

    Ok(())
}
