use std::time::Instant;

use boa_engine::{Context, JsError, JsObject, JsResult, JsString, JsValue, Script, Source, js_string};

use crate::engine::console::{self, build_console, stringify};
use crate::engine::{
    ExecutionResult, FAILED_HEADER, NO_CODE_MESSAGE, NO_OUTPUT_MESSAGE, OutputKind, OutputLine,
    RunState,
};

/// Parameter of the factory that closes over the source text
const SOURCE_BINDING: &str = "__jsplay_source";

/// Body of the factory used when the code parses as a script. The returned
/// function takes only `console`; direct eval keeps it bound and hands back
/// the completion value of the last statement.
const COMPLETION_FACTORY: &str =
    "return function (console) { return eval(__jsplay_source); };";

/// Runs user code one invocation at a time
#[derive(Debug, Default)]
pub struct Executor {
    state: RunState,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Executes `code` in a fresh context and collects its output.
    ///
    /// Whitespace-only input short-circuits to a sentinel without touching
    /// the engine. Exceptions thrown by user code never escape; they become
    /// the single fatal error of the result.
    pub fn execute(&mut self, code: &str) -> ExecutionResult {
        if code.trim().is_empty() {
            return ExecutionResult {
                lines: vec![OutputLine::comment(NO_CODE_MESSAGE)],
                ..Default::default()
            };
        }

        self.state = RunState::Running;
        let started = Instant::now();

        console::reset_capture();
        let mut context = Context::default();
        let outcome = invoke(code, &mut context);
        let mut lines = console::take_capture();

        let mut result = match outcome {
            Ok(return_value) => {
                if let Some(value) = return_value {
                    lines.push(OutputLine::new(OutputKind::Return, value));
                }
                if lines.is_empty() {
                    lines.push(OutputLine::comment(NO_OUTPUT_MESSAGE));
                }
                ExecutionResult {
                    lines,
                    ..Default::default()
                }
            }
            Err(error) => {
                let message = error_message(&error, &mut context);
                ExecutionResult {
                    lines: vec![
                        OutputLine::comment(FAILED_HEADER),
                        OutputLine::new(OutputKind::Error, message.clone()),
                    ],
                    fatal_errors: vec![message],
                    ..Default::default()
                }
            }
        };

        result.duration = started.elapsed();
        self.state = RunState::Idle;

        log::debug!(
            "run finished in {:?}: {} lines, {} fatal errors",
            result.duration,
            result.lines.len(),
            result.fatal_errors.len()
        );

        result
    }
}

/// Compiles the code, calls it once with the substitute console and returns
/// the stringified return value when it is not `undefined`.
fn invoke(code: &str, context: &mut Context) -> JsResult<Option<String>> {
    let substitute = build_console(context);

    let parses_as_script = Script::parse(Source::from_bytes(code.as_bytes()), None, context).is_ok();
    let function = if parses_as_script {
        let factory = construct_function(SOURCE_BINDING, COMPLETION_FACTORY, context)?;
        let source = JsValue::from(JsString::from(code));
        let wrapped = factory.call(&JsValue::undefined(), &[source], context)?;
        callable(wrapped)?
    } else {
        // Only a function body accepts a top-level `return`
        construct_function("console", code, context)?
    };

    let returned = function.call(&JsValue::undefined(), &[JsValue::from(substitute)], context)?;

    if returned.is_undefined() {
        return Ok(None);
    }

    stringify(&returned, context).map(Some)
}

/// Equivalent of `new Function(param, body)`
fn construct_function(param: &str, body: &str, context: &mut Context) -> JsResult<JsObject> {
    let global = context.global_object().get(js_string!("Function"), context)?;
    let Some(constructor) = global.as_callable() else {
        return Err(JsError::from_opaque(js_string!("Function constructor unavailable").into()));
    };

    let compiled = constructor.call(
        &JsValue::undefined(),
        &[
            JsValue::from(JsString::from(param)),
            JsValue::from(JsString::from(body)),
        ],
        context,
    )?;

    callable(compiled)
}

fn callable(value: JsValue) -> JsResult<JsObject> {
    match value.as_callable() {
        Some(function) => Ok(function.clone()),
        None => Err(JsError::from_opaque(
            js_string!("expected a callable value").into(),
        )),
    }
}

/// Message of an Error object, or the string form of any other thrown value
fn error_message(error: &JsError, context: &mut Context) -> String {
    if let Ok(native) = error.try_native(context) {
        return native.message().to_string();
    }

    match error.as_opaque() {
        Some(value) => match value.to_string(context) {
            Ok(text) => text.to_std_string_escaped(),
            Err(_) => value.display().to_string(),
        },
        None => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(code: &str) -> ExecutionResult {
        Executor::new().execute(code)
    }

    #[test]
    fn log_then_completion_value() {
        let result = run("console.log(\"hi\"); 42");
        assert_eq!(result.output_text(), "[LOG] hi\n[RETURN] 42");
        assert!(result.fatal_errors.is_empty());
    }

    #[test]
    fn thrown_error_becomes_fatal() {
        let result = run("throw new Error(\"boom\")");
        assert_eq!(result.fatal_errors, vec!["boom".to_string()]);
        assert_eq!(result.output_text(), "// Execution failed\n[ERROR] boom");
    }

    #[test]
    fn empty_input_is_not_executed() {
        for code in ["", "   \n\t "] {
            let result = run(code);
            assert_eq!(result.output_text(), "// No code to execute");
            assert!(result.fatal_errors.is_empty());
        }
    }

    #[test]
    fn one_line_per_console_call_in_order() {
        let result = run(
            "console.info('a', 1);\nconsole.warn('b');\nconsole.error('c', true);\nconsole.log({ x: 1 }, [2]);",
        );
        assert_eq!(
            result.output_text(),
            "[INFO] a 1\n[WARN] b\n[ERROR] c true\n[LOG] {\n  \"x\": 1\n} [\n  2\n]"
        );
        assert!(!result.failed());
    }

    #[test]
    fn no_output_reports_success_sentinel() {
        let result = run("let x = 1;");
        assert_eq!(result.output_text(), "// Code executed successfully (no output)");
    }

    #[test]
    fn top_level_return_is_supported() {
        let result = run("console.log('start');\nreturn { done: true };");
        assert_eq!(result.output_text(), "[LOG] start\n[RETURN] {\n  \"done\": true\n}");
    }

    #[test]
    fn thrown_non_error_uses_string_form() {
        let result = run("throw 'plain'");
        assert_eq!(result.fatal_errors, vec!["plain".to_string()]);

        let result = run("throw { code: 7 }");
        assert_eq!(result.fatal_errors, vec!["[object Object]".to_string()]);
    }

    #[test]
    fn output_before_a_throw_is_replaced() {
        let result = run("console.log('before'); null.x;");
        assert_eq!(result.fatal_errors.len(), 1);
        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.lines[0].text, FAILED_HEADER);
        assert_eq!(result.lines[1].kind, OutputKind::Error);
    }

    #[test]
    fn syntax_errors_are_fatal() {
        let result = run("function (");
        assert_eq!(result.fatal_errors.len(), 1);
        assert!(result.output_text().starts_with("// Execution failed\n[ERROR] "));
    }

    #[test]
    fn console_resolves_to_the_substitute() {
        let result = run("typeof console.info");
        assert_eq!(result.output_text(), "[RETURN] function");
    }

    #[test]
    fn user_code_sees_only_the_console_argument() {
        let result = run("arguments.length");
        assert_eq!(result.output_text(), "[RETURN] 1");

        let result = run("typeof arguments[1]");
        assert_eq!(result.output_text(), "[RETURN] undefined");

        let result = run("return arguments.length;");
        assert_eq!(result.output_text(), "[RETURN] 1");
    }

    #[test]
    fn runs_do_not_share_state() {
        let mut executor = Executor::new();
        executor.execute("var leaked = 1; globalThis.other = 2;");
        let result = executor.execute("typeof leaked + ' ' + typeof other");
        assert_eq!(result.output_text(), "[RETURN] undefined undefined");
    }

    #[test]
    fn state_returns_to_idle() {
        let mut executor = Executor::new();
        executor.execute("1 + 1");
        assert_eq!(executor.state(), RunState::Idle);
        executor.execute("throw new TypeError('bad')");
        assert!(!executor.is_running());
    }
}
