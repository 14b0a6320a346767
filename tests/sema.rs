//! End-to-end semantic analysis tests: source text in, typed IR and
//! diagnostics out.

use minic::middle::tir::TypedInst;
use minic::middle::uir::{FunctionId, InstRef};
use minic::sema::{DiagnosticKind, Op, SemaOptions};
use minic::types::Type;
use minic::utils::Error;
use minic::{compile_source, Compilation};
use pretty_assertions::assert_eq;

fn compile(source: &str) -> Compilation {
    compile_source(source, &SemaOptions::default()).unwrap()
}

fn diagnostic_kinds(compilation: &Compilation) -> Vec<DiagnosticKind> {
    compilation
        .analysis
        .diagnostics
        .iter()
        .map(|diag| diag.kind.clone())
        .collect()
}

fn undefined(name: &str) -> DiagnosticKind {
    DiagnosticKind::UndefinedVariable { name: name.to_string() }
}

#[test]
fn test_undefined_variable_in_return() {
    let compilation = compile("fn foo() i32 { return x; }");

    assert_eq!(diagnostic_kinds(&compilation), vec![undefined("x")]);
    assert_eq!(
        compilation.analysis.functions[0].instructions,
        vec![TypedInst::Poison, TypedInst::Ret(InstRef(0))]
    );
}

#[test]
fn test_well_typed_add() {
    let compilation = compile("fn add(a: i32, b: i32) i32 { return a + b; }");

    assert!(compilation.analysis.is_ok());
    let func = &compilation.analysis.functions[0];
    assert_eq!(func.ret_type, Type::I32);
    assert_eq!(
        func.instructions,
        vec![
            TypedInst::ParamGet { index: 0, ty: Type::I32 },
            TypedInst::ParamGet { index: 1, ty: Type::I32 },
            TypedInst::AddI32 { lhs: InstRef(0), rhs: InstRef(1) },
            TypedInst::Ret(InstRef(2)),
        ]
    );
}

#[test]
fn test_mixed_width_add() {
    let compilation = compile("fn foo(a: i32, b: i64) i32 { return a + b; }");

    assert_eq!(
        diagnostic_kinds(&compilation),
        vec![DiagnosticKind::TypeMismatch { op: Op::Add, lhs: Type::I32, rhs: Type::I64 }]
    );
    assert_eq!(compilation.analysis.functions[0].instructions[2], TypedInst::Poison);
}

#[test]
fn test_duplicate_declaration() {
    let compilation = compile("fn foo() i32 { const x = 1; const x = 2; return x; }");

    assert_eq!(
        diagnostic_kinds(&compilation),
        vec![DiagnosticKind::DuplicateDeclaration { name: "x".to_string() }]
    );
    let func = &compilation.analysis.functions[0];
    assert_eq!(func.local_count, 1);
    assert_eq!(
        func.instructions,
        vec![
            TypedInst::ConstI32(1),
            TypedInst::LocalSet { slot: 0, value: InstRef(0) },
            TypedInst::ConstI32(2),
            TypedInst::Nop,
            TypedInst::LocalGet { slot: 0, ty: Type::I32 },
            TypedInst::Ret(InstRef(4)),
        ]
    );
}

#[test]
fn test_conflicting_inferred_returns() {
    let compilation = compile("fn foo(x: bool) { if x: return 42; return true; }");

    assert_eq!(
        diagnostic_kinds(&compilation),
        vec![DiagnosticKind::ConflictingInferredReturnTypes { first: Type::I32, second: Type::Bool }]
    );
    let func = &compilation.analysis.functions[0];
    assert_eq!(func.ret_type, Type::I32);
    assert_eq!(func.instructions[1], TypedInst::SkipUnless { cond: InstRef(0), skip: 2 });
}

#[test]
fn test_undefined_name_does_not_cascade() {
    let compilation = compile("fn foo() i32 { return -x * 2 + (x - 1) / x; }");

    assert_eq!(diagnostic_kinds(&compilation), vec![undefined("x"), undefined("x"), undefined("x")]);

    // One undefined reference chained through every operator
    let compilation = compile("fn foo() i64 { const y = -x; return ((y + 1) * 2 - 3) / 4; }");
    assert_eq!(diagnostic_kinds(&compilation), vec![undefined("x")]);
}

#[test]
fn test_error_operand_absorbed() {
    let compilation = compile("fn foo(a: bool) i32 { const x = nope + a; return x * 2; }");

    assert_eq!(diagnostic_kinds(&compilation), vec![undefined("nope")]);
}

#[test]
fn test_typed_ir_matches_untyped_length() {
    let sources = [
        "fn add(a: i32, b: i32) i32 { return a + b; }",
        "fn foo() i32 { return x; }",
        "fn foo(a: i32, b: i64) { const c = a * b; var d = c; d = true; return d; }",
        "fn foo(x: i32) { if x: return; x = 1; const x = 2; return -true; }",
    ];

    for source in sources {
        let compilation = compile(source);
        for (untyped, typed) in compilation.program.functions.iter().zip(&compilation.analysis.functions) {
            assert_eq!(untyped.instructions.len(), typed.instructions.len(), "{}", source);
        }
    }
}

#[test]
fn test_repeated_declarations_keep_first_slot() {
    for k in 1..6 {
        let mut source = String::from("fn foo() i32 {");
        for i in 0..k {
            source.push_str(&format!(" const x = {};", i));
        }
        source.push_str(" const y = 7; return x + y; }");

        let compilation = compile(&source);
        let kinds = diagnostic_kinds(&compilation);
        assert_eq!(kinds.len(), k - 1);
        assert!(kinds
            .iter()
            .all(|kind| *kind == DiagnosticKind::DuplicateDeclaration { name: "x".to_string() }));

        let func = &compilation.analysis.functions[0];
        assert_eq!(func.local_count, 2);
        assert!(func.instructions.contains(&TypedInst::LocalGet { slot: 0, ty: Type::I32 }));
        assert!(func.instructions.contains(&TypedInst::LocalGet { slot: 1, ty: Type::I32 }));
    }
}

#[test]
fn test_agreeing_returns_converge() {
    let compilation = compile(
        "fn pick(a: bool, b: i64, c: i64) {\n\
         \x20   if a: return b;\n\
         \x20   if a: return c * c - b;\n\
         \x20   return -c;\n\
         }",
    );

    assert!(compilation.analysis.is_ok());
    assert_eq!(compilation.analysis.functions[0].ret_type, Type::I64);
}

#[test]
fn test_conflict_reported_per_divergent_return() {
    let compilation = compile("fn f(a: bool) { if a: return 1; if a: return true; return 2; }");

    assert_eq!(
        diagnostic_kinds(&compilation),
        vec![DiagnosticKind::ConflictingInferredReturnTypes { first: Type::I32, second: Type::Bool }]
    );
}

#[test]
fn test_declared_return_mismatch() {
    let compilation = compile("fn f() bool { return 1; }\nfn g() void { return; }\nfn h() i64 { return; }");

    assert_eq!(
        diagnostic_kinds(&compilation),
        vec![
            DiagnosticKind::ReturnTypeMismatch { expected: Type::Bool, found: Type::I32 },
            DiagnosticKind::ReturnTypeMismatch { expected: Type::I64, found: Type::Void },
        ]
    );
    assert_eq!(compilation.analysis.diagnostics[0].function, FunctionId(0));
    assert_eq!(compilation.analysis.diagnostics[1].function, FunctionId(2));
}

#[test]
fn test_assignment_and_guard_diagnostics() {
    let compilation = compile(
        "fn f(p: i32) {\n\
         \x20   const c = 1;\n\
         \x20   var v = 2;\n\
         \x20   v = v + 1;\n\
         \x20   c = 3;\n\
         \x20   p = 4;\n\
         \x20   v = true;\n\
         \x20   if v: return;\n\
         }",
    );

    assert_eq!(
        diagnostic_kinds(&compilation),
        vec![
            DiagnosticKind::AssignToImmutable { name: "c".to_string() },
            DiagnosticKind::AssignToImmutable { name: "p".to_string() },
            DiagnosticKind::TypeMismatch { op: Op::Assign, lhs: Type::I32, rhs: Type::Bool },
            DiagnosticKind::NonBoolCondition { found: Type::I32 },
        ]
    );
}

#[test]
fn test_rendered_diagnostics() {
    let source = "fn foo() i32 {\n    const x = 1;\n    const x = true;\n    return x + y;\n}";
    let compilation = compile(source);

    assert_eq!(
        compilation.render_diagnostics(source),
        vec![
            "3:11: error: redeclaration of 'x'\n    const x = true;\n          ^".to_string(),
            "4:16: error: use of undeclared identifier 'y'\n    return x + y;\n               ^".to_string(),
        ]
    );
}

#[test]
fn test_parallel_matches_sequential() {
    let source = "fn a(x: i32) i32 { return x + 1; }\n\
                  fn b() { return y; }\n\
                  fn c(p: i64) { const q = p * 2; return q; }\n\
                  fn d(f: bool) { if f: return 1; return f; }\n\
                  fn e() i32 { const z = 1; const z = 2; return z; }";

    let parallel = compile_source(source, &SemaOptions { parallel: true }).unwrap();
    let sequential = compile_source(source, &SemaOptions { parallel: false }).unwrap();

    assert_eq!(parallel.analysis, sequential.analysis);
    assert_eq!(parallel.analysis.functions.len(), 5);
    assert_eq!(parallel.analysis.diagnostics.len(), 3);
}

#[test]
fn test_front_end_error_stops_before_analysis() {
    let error = compile_source("fn f() i32 { return 1 }", &SemaOptions::default()).unwrap_err();
    assert_eq!((error.span().line, error.span().column), (1, 23));
}

#[test]
fn test_duplicate_parameter_is_a_front_end_error() {
    let error = compile_source("fn f(a: i32, a: i64) i32 { return a; }", &SemaOptions::default())
        .unwrap_err();

    assert_eq!(
        error,
        Error::DuplicateParameter { name: "a".to_string(), span: error.span() }
    );
    assert_eq!((error.span().line, error.span().column), (1, 14));
}

#[test]
fn test_deep_nesting_is_a_front_end_error() {
    let source = format!("fn f() i32 {{ return {}1; }}", "-".repeat(10_000));
    let error = compile_source(&source, &SemaOptions::default()).unwrap_err();

    assert!(matches!(error, Error::NestingTooDeep { .. }));
}
