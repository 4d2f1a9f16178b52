use std::fs::{self};

use pretty_assertions::assert_eq;
use tslite::{
    error::{CompileError, Error, ParseError, RuntimeError, TypeError},
    options::{Mode, Options},
    run_source,
};
use walkdir::WalkDir;

#[test]
fn example_programs_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/programs").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.path().extension().is_some_and(|ext| ext == "ts"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        if let Some(e) = run_source(&source, &Options::default()).error {
            panic!("Program {path:?} failed:\n{e}");
        }
    }

    assert!(count > 0, "No programs found in tests/programs");
}

fn run(src: &str) -> Vec<String> {
    match run_source(src, &Options::default()).into_result() {
        Ok(output) => output,
        Err(e) => panic!("Script failed: {e}"),
    }
}

fn assert_success(src: &str) {
    run(src);
}

fn assert_failure(src: &str) -> Error {
    match run_source(src, &Options::default()).error {
        Some(e) => e,
        None => panic!("Script succeeded but was expected to fail"),
    }
}

fn program(name: &str) -> String {
    fs::read_to_string(format!("tests/programs/{name}")).unwrap()
}

#[test]
fn fizzbuzz_prints_ten_lines() {
    assert_eq!(run(&program("fizzbuzz.ts")),
               vec!["1", "2", "fizz", "4", "buzz", "fizz", "7", "8", "fizz", "buzz"]);
}

#[test]
fn all_the_things() {
    assert_eq!(run(&program("all-the-things.ts")),
               vec!["hello, world!",
                    "in foo!",
                    "in baz!",
                    "in nested!",
                    "hello",
                    "world!",
                    "foo"]);
}

#[test]
fn counters() {
    assert_eq!(run(&program("counters.ts")),
               vec!["a: 12 b: 1 total: 39",
                    "{ count: 12, increment: [Function: increment] }"]);
}

#[test]
fn returned_functions_can_be_called_directly() {
    let output = run("function returnsFn() {
                          return function () { console.log('in nested!'); };
                      }
                      returnsFn()();");
    assert_eq!(output, vec!["in nested!"]);
}

#[test]
fn closures_keep_captured_bindings() {
    let output = run("function adder(n: number) {
                          return function (x: number): number { return x + n; };
                      }
                      let addTwo = adder(2);
                      let addTen = adder(10);
                      console.log(addTwo(1), addTen(1), addTwo(addTen(0)));");
    assert_eq!(output, vec!["3 11 12"]);
}

#[test]
fn this_follows_the_call_site() {
    let output = run("let a = { name: 'a', who: function (): string { return this.name; } };
                      let b = { name: 'b', who: a.who };
                      console.log(a.who(), b.who());");
    assert_eq!(output, vec!["a b"]);
}

#[test]
fn string_reassignment() {
    assert_success("let s: string = 'a';\ns = 'b';");
    assert_success("let s = 'a';\ns = s + 1;");

    let error = assert_failure("let s = 'a';\ns = 1;");
    let Error::Check(diagnostics) = error else {
        panic!("expected type errors, got {error}");
    };
    assert!(matches!(diagnostics.as_slice(), [TypeError::TypeMismatch { expected, found, .. }]
                     if expected == "string" && found == "number"));
}

#[test]
fn interfaces_accept_matching_literals() {
    assert_success("interface Foo { name: string; }\nlet foo: Foo = { name: 'hi' };");
    assert_success("interface Foo { name: string; }\nlet foo: Foo = { name: 'hi', extra: 1 };");

    let error = assert_failure("interface Foo { name: string; }\nlet foo: Foo = { title: 'hi' };");
    assert!(matches!(error, Error::Check(_)));
}

#[test]
fn runtime_errors_keep_earlier_output() {
    let execution = run_source("console.log('before');\nlet o = { a: 1 };\nconsole.log(o.a / 0);\nconsole.log('after');",
                               &Options::default());

    assert_eq!(execution.output, vec!["before"]);
    assert!(matches!(execution.error,
                     Some(Error::Runtime(RuntimeError::DivisionByZero { .. }))));
}

#[test]
fn unbounded_recursion_stops() {
    let options = Options::default().with_max_call_depth(32);
    let execution = run_source("function forever(n: number): number { return forever(n + 1); }\nforever(0);",
                               &options);

    assert!(matches!(execution.error,
                     Some(Error::Runtime(RuntimeError::StackOverflow { limit: 32, .. }))));
}

#[test]
fn unchecked_mode_skips_the_checker() {
    let source = "let n: number = 1;\nn = 'one';\nconsole.log(n);";
    assert!(matches!(assert_failure(source), Error::Check(_)));

    let unchecked = run_source(source, &Options::default().with_mode(Mode::Unchecked));
    assert_eq!(unchecked.into_result().unwrap(), vec!["one"]);
}

#[test]
fn unchecked_mode_still_fails_at_runtime() {
    let options = Options::default().with_mode(Mode::Unchecked);

    let execution = run_source("let o = 1;\nconsole.log(o.name);", &options);
    assert!(matches!(execution.error,
                     Some(Error::Runtime(RuntimeError::UnknownProperty { .. }))));

    let execution = run_source("console.log(missing);", &options);
    assert!(matches!(execution.error,
                     Some(Error::Runtime(RuntimeError::UnknownVariable { .. }))));

    let execution = run_source("if (1) { console.log('truthy'); }", &options);
    assert!(execution.output.is_empty());
    assert!(matches!(execution.error,
                     Some(Error::Runtime(RuntimeError::TypeMismatch { .. }))));
}

#[test]
fn missing_properties_read_as_undefined() {
    let output = run_source("let o = { a: 1 };\nconsole.log(o.b);\no.b = 2;\nconsole.log(o);",
                            &Options::default().with_mode(Mode::Unchecked)).into_result()
                                                                          .unwrap();
    assert_eq!(output, vec!["undefined", "{ a: 1, b: 2 }"]);
}

#[test]
fn printing_values() {
    let output = run("let o = { s: 'x', n: 2.5, b: true, u: undefined, f: function () {}, inner: { empty: {} } };
                      console.log(o);
                      console.log(1 / 4, 10, -0, 'raw');
                      console.log();");
    assert_eq!(output,
               vec!["{ s: 'x', n: 2.5, b: true, u: undefined, f: [Function: f], inner: { empty: {} } }",
                    "0.25 10 0 raw",
                    ""]);
}

#[test]
fn printing_extreme_numbers() {
    let output = run("let big = 1000000 * 1000000 * 1000000 * 1000;
                      console.log(big, big * big, -big, 1 / 10000000, 1 / 1000000);");
    assert_eq!(output, vec!["1e+21 1e+42 -1e+21 1e-7 0.000001"]);
}

#[test]
fn deeply_nested_programs_are_rejected() {
    let source = format!("let x = {}1{};", "(".repeat(50_000), ")".repeat(50_000));
    assert!(matches!(assert_failure(&source),
                     Error::Compile(CompileError::Parse(ParseError::TooDeeplyNested { .. }))));

    let source = format!("console.log({}1{});", "(".repeat(50), ")".repeat(50));
    assert_eq!(run(&source), vec!["1"]);
}

#[test]
fn syntax_errors_are_reported_with_positions() {
    let error = assert_failure("let x = 1;\nlet = 2;");
    assert_eq!(error.to_string(), "Error on line 2, column 5: Expected identifier, found '='.");
}
