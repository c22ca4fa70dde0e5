//! Trace script synthesis.
//!
//! The runtime exposes no host-level tracing API, so a run is a generated
//! Python program: a fixed step-collector prelude followed by a short tail
//! that embeds the snippet, executes it in a fresh namespace and calls the
//! target function with the line hook installed. The program's final
//! expression statement is the transport string.
//!
//! Only the snippet lines and the function name are encoded as literals. The
//! argument is spliced in verbatim as source, so any expression (including a
//! malformed or hostile one) ends up in the generated call.

use crate::step::ExecutionConfig;

/// File name the snippet is compiled under. The hook only records frames
/// whose code object carries this name.
pub const SNIPPET_FILENAME: &str = "<snippet>";

/// Step collector and line hook, shared by every generated program.
const COLLECTOR_PRELUDE: &str = r#"import copy
import json
import sys


class StepCollector:
    def __init__(self, code_lines, filename):
        self.code_lines = code_lines
        self.filename = filename
        self.steps = []
        self.step_count = 0

    def snapshot(self, value):
        try:
            json.dumps(value, allow_nan=False)
            return copy.deepcopy(value)
        except Exception:
            try:
                return repr(value)
            except Exception:
                return "<unrepresentable {}>".format(type(value).__name__)

    def trace_function(self, frame, event, arg):
        if frame.f_code.co_filename != self.filename:
            return None

        if event == "line":
            index = frame.f_lineno - 1
            if 0 <= index < len(self.code_lines):
                code_line = self.code_lines[index]
            else:
                code_line = "Line number out of bounds (line: {})".format(frame.f_lineno)

            variables = {}
            for name, value in list(frame.f_locals.items()):
                variables[name] = self.snapshot(value)

            self.steps.append({
                "step": self.step_count,
                "line": frame.f_lineno,
                "code": code_line.strip(),
                "variables": variables,
            })
            self.step_count += 1

        return self.trace_function

    def run(self, func, *args):
        self.steps = []
        self.step_count = 0

        sys.settrace(self.trace_function)
        try:
            result = func(*args)
        finally:
            sys.settrace(None)
        return {"result": result, "steps": self.steps}

"#;

/// Builds the trace program for `source_lines`, calling `function_name`
/// with `argument_literal`.
///
/// The caller is responsible for checking that `function_name` is defined;
/// an unknown name surfaces as a lookup error when the program runs.
pub fn synthesize<S: AsRef<str>>(
    source_lines: &[S],
    function_name: &str,
    argument_literal: &str,
) -> String {
    let lines: Vec<serde_json::Value> = source_lines
        .iter()
        .map(|l| serde_json::Value::from(l.as_ref()))
        .collect();
    // A JSON array of strings is also a valid Python list literal.
    let lines_literal = serde_json::Value::Array(lines).to_string();
    let filename_literal = serde_json::Value::from(SNIPPET_FILENAME).to_string();
    let name_literal = serde_json::Value::from(function_name).to_string();

    let mut program = String::with_capacity(COLLECTOR_PRELUDE.len() + lines_literal.len() + 256);
    program.push_str(COLLECTOR_PRELUDE);
    program.push_str(&format!("code_lines = {}\n", lines_literal));
    program.push_str("namespace = {}\n");
    program.push_str(&format!(
        "compiled_code = compile(\"\\n\".join(code_lines), {}, \"exec\")\n",
        filename_literal
    ));
    program.push_str("exec(compiled_code, namespace)\n");
    program.push_str(&format!("func = namespace[{}]\n", name_literal));
    program.push_str(&format!(
        "tracer = StepCollector(code_lines, {})\n",
        filename_literal
    ));
    program.push_str(&format!(
        "trace_result = tracer.run(func, {})\n",
        argument_literal
    ));
    program.push_str("json.dumps(trace_result, allow_nan=False)\n");
    program
}

/// Splits `source` on newlines and synthesizes the program for `config`.
pub fn synthesize_for(source: &str, config: &ExecutionConfig) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    synthesize(&lines, &config.function_name, &config.parameter_value)
}
