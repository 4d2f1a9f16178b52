use pretty_assertions::assert_eq;
use tslite::{
    check, compile,
    error::TypeError,
    interpreter::types::{
        core::{FunctionType, ObjectType, Property, Type},
        env::TypeEnv,
    },
};

fn diagnostics(src: &str) -> Vec<TypeError> {
    check(&compile(src).unwrap())
}

fn assert_clean(src: &str) {
    let found = diagnostics(src);
    assert!(found.is_empty(), "unexpected diagnostics: {found:#?}");
}

fn env(src: &str) -> TypeEnv {
    let (env, errors) = TypeEnv::from_program(&compile(src).unwrap());
    assert!(errors.is_empty(), "{errors:?}");
    env
}

fn object(properties: &[(&str, Type)]) -> Type {
    Type::Object(ObjectType::new(properties.iter()
                                           .map(|(name, ty)| Property::required(*name, ty.clone()))
                                           .collect()))
}

#[test]
fn assignability_is_reflexive() {
    let env = env("interface Node { value: number; next?: Node; }");
    let samples = [Type::NUMBER,
                   Type::union(vec![Type::STRING, Type::BOOLEAN]),
                   object(&[("a", Type::NUMBER)]),
                   Type::Named("Node".to_string()),
                   Type::Function(FunctionType::new(vec![Type::STRING], Type::VOID))];

    for ty in &samples {
        assert!(env.is_assignable(ty, ty), "{ty} is not assignable to itself");
    }
}

#[test]
fn width_subtyping_is_transitive() {
    let env = TypeEnv::default();
    let narrow = object(&[("a", Type::NUMBER)]);
    let middle = object(&[("a", Type::NUMBER), ("b", Type::STRING)]);
    let wide = object(&[("a", Type::NUMBER), ("b", Type::STRING), ("c", Type::BOOLEAN)]);

    assert!(env.is_assignable(&wide, &middle));
    assert!(env.is_assignable(&middle, &narrow));
    assert!(env.is_assignable(&wide, &narrow));
    assert!(!env.is_assignable(&narrow, &wide));
}

#[test]
fn unions_as_source_and_as_target() {
    let env = TypeEnv::default();
    let string_or_number = Type::union(vec![Type::STRING, Type::NUMBER]);

    assert!(env.is_assignable(&Type::STRING, &string_or_number));
    assert!(!env.is_assignable(&Type::BOOLEAN, &string_or_number));

    assert!(!env.is_assignable(&string_or_number, &Type::STRING));
    let wider = Type::union(vec![Type::NUMBER, Type::BOOLEAN, Type::STRING]);
    assert!(env.is_assignable(&string_or_number, &wider));
}

#[test]
fn identical_interfaces_are_mutually_assignable() {
    let env = env("interface A { name: string; next?: A; }
                   interface B { name: string; next?: B; }");
    let a = Type::Named("A".to_string());
    let b = Type::Named("B".to_string());

    assert!(env.is_assignable(&a, &b));
    assert!(env.is_assignable(&b, &a));
}

#[test]
fn interface_accepts_matching_literal() {
    assert_clean("interface Foo { name: string; }\nlet foo: Foo = { name: \"hi\" };");

    let found = diagnostics("interface Foo { name: string; }\nlet foo: Foo = { name: 1 };");
    assert_eq!(found.len(), 1);
    assert!(matches!(found[0], TypeError::TypeMismatch { .. }));
}

#[test]
fn diagnostics_are_collected() {
    let found = diagnostics("let a: number = 'x';
                             let b: Missing = 1;
                             undefinedName;
                             let c = 1;
                             c();
                             function f(x: number): number { return x; }
                             f();
                             let o = { p: 1 };
                             o.q;
                             let c = 2;
                             return c;");

    let kinds = found.iter()
                     .map(|e| match e {
                         TypeError::TypeMismatch { .. } => "mismatch",
                         TypeError::UnknownType { .. } => "unknown type",
                         TypeError::UnknownName { .. } => "unknown name",
                         TypeError::NotCallable { .. } => "not callable",
                         TypeError::ArgumentCountMismatch { .. } => "arguments",
                         TypeError::UnknownProperty { .. } => "unknown property",
                         TypeError::DuplicateDeclaration { .. } => "duplicate",
                         TypeError::ReturnOutsideFunction { .. } => "return",
                     })
                     .collect::<Vec<_>>();
    assert_eq!(kinds,
               vec!["mismatch",
                    "unknown type",
                    "unknown name",
                    "not callable",
                    "arguments",
                    "unknown property",
                    "duplicate",
                    "return"]);
}

#[test]
fn hoisted_functions_see_later_variables() {
    assert_clean("console.log(describe());
                  let label = 'total';
                  function describe(): string { return label + ': ' + count(3); }
                  function count(n: number): number { return n; }");
}

#[test]
fn methods_type_this_as_the_literal() {
    assert_clean("let o = {
                      name: 'o',
                      greet: function (): string { return 'hi ' + this.getName(); },
                      getName: function (): string { return this.name; },
                  };
                  let s: string = o.greet();");

    let found = diagnostics("let o = { n: 1, m: function () { return this.missing; } };");
    assert!(matches!(found.as_slice(), [TypeError::UnknownProperty { property, .. }] if property == "missing"));
}

#[test]
fn inferred_return_types() {
    assert_clean("function pick(flag: boolean) { if (flag) { return 1; } return 'one'; }
                  function use() { let v: number | string = pick(true); }");

    let found = diagnostics("function pick(flag: boolean) { if (flag) { return 1; } return 'one'; }
                             function use() { let v: number = pick(true); }");
    assert_eq!(found.len(), 1);
    assert!(matches!(&found[0], TypeError::TypeMismatch { found, .. } if found == "number | string"));
}

#[test]
fn inferred_return_types_reach_top_level_uses() {
    let found = diagnostics("function one() { return 1; }\nlet s: string = one();");
    assert!(matches!(found.as_slice(), [TypeError::TypeMismatch { expected, found, .. }]
                     if expected == "string" && found == "number"));

    let found = diagnostics("function one() { return 1; }\nlet n = one();\nn = 'x';");
    assert!(matches!(found.as_slice(), [TypeError::TypeMismatch { expected, found, .. }]
                     if expected == "number" && found == "string"));

    let found = diagnostics("let early: number = name();\nfunction name() { return 'x'; }");
    assert_eq!(found.len(), 1);
}

#[test]
fn inference_at_first_use_handles_recursion_and_later_names() {
    let found = diagnostics("function fact(n: number) {
                                 if (n < 2) { return 1; }
                                 return n * fact(n - 1);
                             }
                             let s: string = fact(3);");
    assert!(matches!(found.as_slice(), [TypeError::TypeMismatch { found, .. }] if found == "number"));

    assert_clean("function isEven(n: number) { if (n === 0) { return true; } return isOdd(n - 1); }
                  function isOdd(n: number) { if (n === 0) { return false; } return isEven(n - 1); }
                  let b: boolean = isEven(4);");

    assert_clean("let first = describe();
                  let label = 'x';
                  function describe() { return label; }");
}

#[test]
fn body_diagnostics_are_reported_once() {
    let found = diagnostics("function broken() { return missing; }\nbroken();\nbroken();");
    assert!(matches!(found.as_slice(), [TypeError::UnknownName { name, .. }] if name == "missing"));
}

#[test]
fn this_outside_functions() {
    let found = diagnostics("let t = this;\nconsole.log(t);");
    assert!(matches!(found.as_slice(), [TypeError::UnknownName { name, .. }] if name == "this"));

    assert_clean("function plain() { return this; }");
}

#[test]
fn return_outside_functions() {
    assert!(matches!(diagnostics("return 1;").as_slice(),
                     [TypeError::ReturnOutsideFunction { .. }]));
    assert!(matches!(diagnostics("let done = true;\nif (done) { return; }").as_slice(),
                     [TypeError::ReturnOutsideFunction { .. }]));

    assert_clean("function f(): number { { return 1; } }");
}

#[test]
fn optional_parameters_and_properties() {
    assert_clean("interface Options { verbose?: boolean; depth: number; }
                  function configure(depth: number, verbose?: boolean): Options {
                      return { depth: depth };
                  }
                  configure(1);
                  configure(1, true);");

    let found = diagnostics("function f(a: number, b?: number) { }\nf();\nf(1, 2, 3);");
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|e| matches!(e, TypeError::ArgumentCountMismatch { .. })));
}

#[test]
fn conditions_must_be_boolean() {
    let found = diagnostics("let n = 1;\nif (n) { }\nwhile (n) { }");
    assert_eq!(found.len(), 2);
}

#[test]
fn conflicting_intersections() {
    let found = diagnostics("interface A { v: string; }
                             interface B { v: number; }
                             let x: A & B = { v: 'a' };");
    assert!(!found.is_empty());
    assert!(matches!(found[0], TypeError::TypeMismatch { .. }));
}

#[test]
fn messages_name_both_types_and_the_position() {
    let found = diagnostics("let s = 'a';\ns = 1;");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].to_string(),
               "Error on line 2, column 5: Type 'number' is not assignable to type 'string'.");
}
