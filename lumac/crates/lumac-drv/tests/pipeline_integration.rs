//! End-to-end pipeline tests.
//!
//! The execution scenarios instantiate each compiled module in the wasmi
//! interpreter and invoke its exports, asserting the literal results; the
//! structural properties re-read the bytes through the lumac-wasm decoder.
//! Together they exercise generation, encoding, validation, and execution
//! in one pass.

use lumac_drv::{compile, CompileError};
use lumac_gen::CodegenError;
use lumac_wasm::{decode_module, opcodes, Limits, Module};
use wasmi::{Engine, Linker, Store};

fn compile_and_decode(source: &str) -> Module {
    let wasm = compile(source).expect("compilation failed");
    decode_module(&wasm).expect("emitted module failed to decode")
}

/// Validate and instantiate emitted bytes in a fresh engine.
fn instantiate(wasm: &[u8]) -> (Store<()>, wasmi::Instance) {
    let engine = Engine::default();
    let module = wasmi::Module::new(&engine, wasm).expect("engine rejected emitted module");
    let mut store = Store::new(&engine, ());
    let linker: Linker<()> = Linker::new(&engine);
    let instance = linker
        .instantiate(&mut store, &module)
        .expect("instantiation failed")
        .start(&mut store)
        .expect("start failed");
    (store, instance)
}

fn invoke0(wasm: &[u8], name: &str) -> i32 {
    let (mut store, instance) = instantiate(wasm);
    let func = instance
        .get_typed_func::<(), i32>(&store, name)
        .expect("export not found");
    func.call(&mut store, ()).expect("call trapped")
}

fn invoke1(wasm: &[u8], name: &str, a: i32) -> i32 {
    let (mut store, instance) = instantiate(wasm);
    let func = instance
        .get_typed_func::<i32, i32>(&store, name)
        .expect("export not found");
    func.call(&mut store, a).expect("call trapped")
}

fn invoke2(wasm: &[u8], name: &str, a: i32, b: i32) -> i32 {
    let (mut store, instance) = instantiate(wasm);
    let func = instance
        .get_typed_func::<(i32, i32), i32>(&store, name)
        .expect("export not found");
    func.call(&mut store, (a, b)).expect("call trapped")
}

#[test]
fn preamble_on_every_accepted_source() {
    let sources = [
        "",
        "func answer() -> i32 { return 42; }",
        "func add(a: i32, b: i32) -> i32 { return a + b; }",
    ];
    for source in sources {
        let wasm = compile(source).unwrap();
        assert_eq!(
            &wasm[..8],
            &[0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00],
            "bad preamble for {source:?}"
        );
    }
}

#[test]
fn section_order_and_uniqueness() {
    let module = compile_and_decode("func answer() -> i32 { return 42; }");
    let ids: Vec<u8> = module.sections.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 3, 5, 7, 10]);
}

#[test]
fn memory_is_one_fixed_page() {
    let module = compile_and_decode("func answer() -> i32 { return 42; }");
    assert_eq!(
        module.memories().unwrap(),
        &[Limits {
            min: 1,
            max: Some(1)
        }]
    );
}

#[test]
fn scenario_add() {
    let wasm = compile("func add(a: i32, b: i32) -> i32 { return a + b; }").unwrap();
    assert_eq!(invoke2(&wasm, "add", 5, 3), 8);
    assert_eq!(invoke2(&wasm, "add", -5, 7), 2);
}

#[test]
fn scenario_answer() {
    let wasm = compile("func answer() -> i32 { return 42; }").unwrap();
    assert_eq!(invoke0(&wasm, "answer"), 42);
}

#[test]
fn scenario_calc() {
    let wasm = compile("func calc(x: i32, y: i32) -> i32 { return x * y + 1; }").unwrap();
    assert_eq!(invoke2(&wasm, "calc", 6, 7), 43);
}

#[test]
fn scenario_abs() {
    let wasm =
        compile("func abs(x: i32) -> i32 { if (x > 0) { return x; } else { return 0 - x; } }")
            .unwrap();
    assert_eq!(invoke1(&wasm, "abs", -3), 3);
    assert_eq!(invoke1(&wasm, "abs", 9), 9);
}

#[test]
fn scenario_sum_to() {
    let wasm = compile(
        "func sum_to(n: i32) -> i32 { let s: i32 = 0; let i: i32 = 1; \
         while (i <= n) { s += i; i += 1; } return s; }",
    )
    .unwrap();
    assert_eq!(invoke1(&wasm, "sum_to", 10), 55);
    assert_eq!(invoke1(&wasm, "sum_to", 0), 0);
}

#[test]
fn fibonacci_executes() {
    let wasm = compile(
        "func fib(n: i32) -> i32 { let a: i32 = 0; let b: i32 = 1; let i: i32 = 0; \
         while (i < n) { b = a + b; a = b - a; i += 1; } return a; }",
    )
    .unwrap();
    assert_eq!(invoke1(&wasm, "fib", 0), 0);
    assert_eq!(invoke1(&wasm, "fib", 1), 1);
    assert_eq!(invoke1(&wasm, "fib", 10), 55);
}

#[test]
fn memory_sublanguage_executes() {
    // The memory operations must validate and run in a real engine.
    // Memory is fixed at one page, so every grow request fails and alloc
    // yields the null pointer; dereferencing null yields 0.
    let wasm = compile(
        "func element_size() -> i32 { return sizeof(i32); }\n\
         func make_buffer(count: i32) -> ptr<i32> { return alloc(i32, count); }\n\
         func read_at(p: ptr<i32>) -> i32 { return @p; }\n\
         func release(p: ptr<i32>) -> i32 { free(p); return 0; }",
    )
    .unwrap();

    assert_eq!(invoke0(&wasm, "element_size"), 4);
    assert_eq!(invoke1(&wasm, "make_buffer", 4), 0);
    assert_eq!(invoke1(&wasm, "make_buffer", 0), 0);
    assert_eq!(invoke1(&wasm, "read_at", 0), 0);
    assert_eq!(invoke1(&wasm, "release", 16), 0);
}

#[test]
fn export_completeness_and_declaration_order() {
    let module = compile_and_decode(
        "func a() -> i32 { return 1; }\n\
         func b() -> i32 { return 2; }\n\
         func c() -> i32 { return 3; }",
    );
    let exports = module.exports().unwrap();
    let names: Vec<&str> = exports.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"]);
    for (i, export) in exports.iter().enumerate() {
        assert_eq!(export.kind, opcodes::EXPORT_FUNC);
        assert_eq!(export.index as usize, i);
    }
}

#[test]
fn type_table_counts_distinct_signatures() {
    // Four functions, two distinct (params, result) signatures.
    let module = compile_and_decode(
        "func p(a: i32, b: i32) -> i32 { return a; }\n\
         func q(a: i32, b: i32) -> i32 { return b; }\n\
         func r(x: f64) -> i32 { return 0; }\n\
         func s(y: f64) -> i32 { return 1; }",
    );
    assert_eq!(module.func_types().unwrap().len(), 2);
    assert_eq!(module.type_indices().unwrap(), &[0, 0, 1, 1]);
}

#[test]
fn local_indices_are_contiguous() {
    let module = compile_and_decode(
        "func f(a: i32, b: i32) -> i32 { let x: i32 = 7; let y: i32 = 9; \
         x = a; y = b; return x + y; }",
    );
    let body = &module.bodies().unwrap()[0];

    let mut touched: Vec<i64> = body
        .instructions
        .iter()
        .filter(|i| i.name == "local.get" || i.name == "local.set")
        .map(|i| i.operands[0])
        .collect();
    touched.sort_unstable();
    touched.dedup();
    assert_eq!(touched, vec![0, 1, 2, 3]);
}

#[test]
fn pointer_signature_maps_to_i32() {
    let module = compile_and_decode("func first(p: ptr<i32>) -> i32 { return @p; }");
    let types = module.func_types().unwrap();
    assert_eq!(types[0].params, vec![opcodes::I32_TYPE]);
    assert_eq!(types[0].results, vec![opcodes::I32_TYPE]);
}

#[test]
fn error_undefined_variable() {
    let err = compile("func f() -> i32 { return x; }").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Codegen(CodegenError::Name { .. })
    ));
}

#[test]
fn error_unsupported_operator() {
    let err = compile("func f(a: i32, b: i32) -> i32 { return a % b; }").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Codegen(CodegenError::UnsupportedOperator { .. })
    ));
}

#[test]
fn error_missing_semicolon() {
    let err = compile("func f() -> i32 { return 42 }").unwrap_err();
    assert!(matches!(err, CompileError::Parse(_)));
}

#[test]
fn error_bare_dereference() {
    // '@' lexes as the dereference operator, so this fails in the
    // parser: the function has no return type and '@' has no operand.
    let err = compile("func test() { @ }").unwrap_err();
    assert!(matches!(err, CompileError::Parse(_)));
}

#[test]
fn error_unknown_character() {
    let err = compile("func f() -> i32 { return 1 ~ 2; }").unwrap_err();
    assert!(matches!(err, CompileError::Lex(_)));
}
