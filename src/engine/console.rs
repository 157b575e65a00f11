use std::cell::RefCell;

use boa_engine::object::ObjectInitializer;
use boa_engine::{Context, JsObject, JsResult, JsValue, NativeFunction, js_string};

use crate::engine::{OutputKind, OutputLine};

// `NativeFunction::from_copy_closure` only accepts `Copy` closures, so the
// console methods cannot own the capture buffer. Runs are single-threaded and
// never nested, which makes a thread-local buffer safe here.
thread_local! {
    static CAPTURE: RefCell<Vec<OutputLine>> = const { RefCell::new(Vec::new()) };
}

/// Empties the capture buffer before a run
pub fn reset_capture() {
    CAPTURE.with(|lines| lines.borrow_mut().clear());
}

/// Takes everything captured since the last reset
pub fn take_capture() -> Vec<OutputLine> {
    CAPTURE.with(|lines| lines.take())
}

pub fn push_line(line: OutputLine) {
    CAPTURE.with(|lines| lines.borrow_mut().push(line));
}

/// Builds the substitute `console` object with `log`, `error`, `warn` and `info`
pub fn build_console(context: &mut Context) -> JsObject {
    ObjectInitializer::new(context)
        .function(console_method(OutputKind::Log), js_string!("log"), 0)
        .function(console_method(OutputKind::Error), js_string!("error"), 0)
        .function(console_method(OutputKind::Warn), js_string!("warn"), 0)
        .function(console_method(OutputKind::Info), js_string!("info"), 0)
        .build()
}

fn console_method(kind: OutputKind) -> NativeFunction {
    NativeFunction::from_copy_closure(move |_this, args, ctx| {
        let text = join_args(args, ctx)?;
        push_line(OutputLine::new(kind, text));
        Ok(JsValue::undefined())
    })
}

/// Stringifies every argument and joins them with single spaces
pub fn join_args(args: &[JsValue], context: &mut Context) -> JsResult<String> {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        parts.push(stringify(arg, context)?);
    }
    Ok(parts.join(" "))
}

/// Renders a value the way the playground prints it: objects and arrays as
/// two-space indented JSON, everything else through `String(value)`.
pub fn stringify(value: &JsValue, context: &mut Context) -> JsResult<String> {
    if value.is_object() && !value.is_callable() {
        return json_stringify(value, context);
    }

    if let Some(symbol) = value.as_symbol() {
        return Ok(symbol.descriptive_string().to_std_string_escaped());
    }

    Ok(value.to_string(context)?.to_std_string_escaped())
}

fn json_stringify(value: &JsValue, context: &mut Context) -> JsResult<String> {
    let json = context.global_object().get(js_string!("JSON"), context)?;
    let method = match json.as_object() {
        Some(json) => json.get(js_string!("stringify"), context)?,
        None => JsValue::undefined(),
    };

    let Some(stringify) = method.as_callable() else {
        return Ok(value.to_string(context)?.to_std_string_escaped());
    };

    let rendered = stringify.call(
        &JsValue::undefined(),
        &[value.clone(), JsValue::null(), JsValue::from(2)],
        context,
    )?;

    // `JSON.stringify` yields undefined for values like `{ toJSON() {} }`
    if rendered.is_undefined() {
        return Ok("undefined".to_string());
    }

    Ok(rendered.to_string(context)?.to_std_string_escaped())
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::Source;

    fn render(expr: &str) -> String {
        let mut context = Context::default();
        let value = context
            .eval(Source::from_bytes(expr.as_bytes()))
            .expect("expression evaluates");
        stringify(&value, &mut context).expect("value stringifies")
    }

    #[test]
    fn primitives_use_string_conversion() {
        assert_eq!(render("42"), "42");
        assert_eq!(render("'hi'"), "hi");
        assert_eq!(render("true"), "true");
        assert_eq!(render("null"), "null");
        assert_eq!(render("undefined"), "undefined");
        assert_eq!(render("0.1 + 0.2"), "0.30000000000000004");
    }

    #[test]
    fn objects_render_as_indented_json() {
        assert_eq!(render("({ a: 1, b: [true] })"), "{\n  \"a\": 1,\n  \"b\": [\n    true\n  ]\n}");
        assert_eq!(render("[1, 2]"), "[\n  1,\n  2\n]");
        assert_eq!(render("({})"), "{}");
    }

    #[test]
    fn symbols_use_descriptive_string() {
        assert_eq!(render("Symbol('tag')"), "Symbol(tag)");
    }

    #[test]
    fn capture_buffer_round_trip() {
        reset_capture();
        push_line(OutputLine::new(OutputKind::Info, "one"));
        assert_eq!(take_capture(), vec![OutputLine::new(OutputKind::Info, "one")]);
        assert!(take_capture().is_empty());
    }
}
