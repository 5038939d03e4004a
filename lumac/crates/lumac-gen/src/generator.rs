//! The AST-to-WASM generator.
//!
//! One [`Generator`] is constructed per compilation, mutated while it
//! walks the program, and consumed when the module bytes are returned.
//! Function signatures are deduplicated through an insertion-ordered map
//! (insertion order is type-section order); per-function local state is
//! rebuilt for every body.

use indexmap::IndexMap;
use lumac_par::{
    AllocExpr, AssignStmt, BinOp, Block, DerefExpr, Expr, Function, IfStmt, LetStmt, Program,
    Stmt, Ty, WhileStmt,
};
use lumac_util::{Span, Symbol};
use lumac_wasm::leb128;
use lumac_wasm::opcodes as op;
use rustc_hash::FxHashMap;

use crate::error::{CodegenError, Result};
use crate::module::{assemble, write_name, Section};

/// A function signature in WASM value types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FuncSig {
    params: Vec<u8>,
    results: Vec<u8>,
}

/// Generate a WASM module from a program.
pub fn generate(program: &Program) -> Result<Vec<u8>> {
    Generator::new(program).generate()
}

/// Short-lived builder that lowers one program to module bytes.
pub struct Generator<'a> {
    program: &'a Program,

    /// Deduplicated signature table; insertion order is emission order.
    func_types: IndexMap<FuncSig, u32>,

    /// Local-name to index map for the function being emitted.
    locals: FxHashMap<Symbol, u32>,

    /// Next free local index in the function being emitted.
    next_local: u32,

    /// Scratch local used by `alloc`/`deref` lowering, when the body
    /// needs one.
    scratch: Option<u32>,
}

impl<'a> Generator<'a> {
    /// Create a generator for `program`.
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            func_types: IndexMap::new(),
            locals: FxHashMap::default(),
            next_local: 0,
            scratch: None,
        }
    }

    /// Consume the generator, producing the module bytes.
    pub fn generate(mut self) -> Result<Vec<u8>> {
        let type_section = self.build_type_section()?;
        let function_section = self.build_function_section()?;
        let memory_section = build_memory_section();
        let export_section = self.build_export_section();
        let code_section = self.build_code_section()?;

        Ok(assemble(&[
            Section::new(op::TYPE_SECTION, type_section),
            Section::new(op::FUNCTION_SECTION, function_section),
            Section::new(op::MEMORY_SECTION, memory_section),
            Section::new(op::EXPORT_SECTION, export_section),
            Section::new(op::CODE_SECTION, code_section),
        ]))
    }

    // ------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------

    /// Build the type section, deduplicating signatures as they are seen.
    fn build_type_section(&mut self) -> Result<Vec<u8>> {
        let mut entries = Vec::new();

        for func in &self.program.functions {
            let sig = func_sig(func)?;
            if self.func_types.contains_key(&sig) {
                continue;
            }

            let mut entry = Vec::new();
            entry.push(op::FUNC_TYPE);
            leb128::write_unsigned(&mut entry, sig.params.len() as u64);
            entry.extend_from_slice(&sig.params);
            leb128::write_unsigned(&mut entry, sig.results.len() as u64);
            entry.extend_from_slice(&sig.results);
            entries.push(entry);

            let index = self.func_types.len() as u32;
            self.func_types.insert(sig, index);
        }

        let mut payload = Vec::new();
        leb128::write_unsigned(&mut payload, entries.len() as u64);
        for entry in entries {
            payload.extend_from_slice(&entry);
        }
        Ok(payload)
    }

    /// Build the function section: each function's signature index.
    fn build_function_section(&mut self) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        leb128::write_unsigned(&mut payload, self.program.functions.len() as u64);

        for func in &self.program.functions {
            let sig = func_sig(func)?;
            let index = self.func_types.get(&sig).copied().ok_or_else(|| {
                CodegenError::Internal(format!("signature for '{}' not in type table", func.name))
            })?;
            leb128::write_unsigned(&mut payload, u64::from(index));
        }

        Ok(payload)
    }

    /// Build the export section: every function under its source name.
    fn build_export_section(&mut self) -> Vec<u8> {
        let mut payload = Vec::new();
        leb128::write_unsigned(&mut payload, self.program.functions.len() as u64);

        for (index, func) in self.program.functions.iter().enumerate() {
            write_name(&mut payload, func.name.as_str());
            payload.push(op::EXPORT_FUNC);
            leb128::write_unsigned(&mut payload, index as u64);
        }

        payload
    }

    /// Build the code section: one body per function.
    fn build_code_section(&mut self) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        leb128::write_unsigned(&mut payload, self.program.functions.len() as u64);

        for func in &self.program.functions {
            let body = self.build_func_body(func)?;
            leb128::write_unsigned(&mut payload, body.len() as u64);
            payload.extend_from_slice(&body);
        }

        Ok(payload)
    }

    // ------------------------------------------------------------------
    // Function bodies
    // ------------------------------------------------------------------

    /// Build one function body: locals vector, instructions, `end`.
    fn build_func_body(&mut self, func: &Function) -> Result<Vec<u8>> {
        self.locals.clear();
        self.next_local = 0;
        self.scratch = None;

        // Parameters occupy local indices 0..n in declaration order.
        for param in &func.params {
            self.locals.insert(param.name, self.next_local);
            self.next_local += 1;
        }

        // Scan top-level statements for Let declarations; their locals
        // follow the parameters in source order.
        let mut let_count: u32 = 0;
        for stmt in &func.body.stmts {
            if let Stmt::Let(let_stmt) = stmt {
                self.locals.insert(let_stmt.name, self.next_local);
                self.next_local += 1;
                let_count += 1;
            }
        }

        // One scratch slot for alloc/deref lowering, after the user
        // locals and invisible to name lookup.
        if block_needs_scratch(&func.body) {
            self.scratch = Some(self.next_local);
            self.next_local += 1;
        }

        let mut code = Vec::new();
        let stmt_count = func.body.stmts.len();
        for (i, stmt) in func.body.stmts.iter().enumerate() {
            let tail = i + 1 == stmt_count;
            self.emit_stmt(stmt, &mut code, tail)?;
        }

        // A body that does not end in a top-level return would fall off
        // the end with an empty stack; `unreachable` keeps the body
        // well-typed and traps if control ever gets there.
        let ends_with_return = matches!(func.body.stmts.last(), Some(Stmt::Return(_)));
        if !ends_with_return {
            code.push(op::UNREACHABLE);
        }
        code.push(op::END);

        let mut body = Vec::new();
        let local_count = let_count + u32::from(self.scratch.is_some());
        if local_count > 0 {
            leb128::write_unsigned(&mut body, 1); // one run-length group
            leb128::write_unsigned(&mut body, u64::from(local_count));
            body.push(op::I32_TYPE);
        } else {
            leb128::write_unsigned(&mut body, 0);
        }
        body.extend_from_slice(&code);

        Ok(body)
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Emit one statement.
    ///
    /// `tail` is true only for the last top-level statement of a function
    /// body: a tail `return` relies on the implicit return at the
    /// function's closing `end`, every other `return` emits the explicit
    /// opcode so nested returns leave their enclosing blocks well-typed.
    fn emit_stmt(&mut self, stmt: &Stmt, code: &mut Vec<u8>, tail: bool) -> Result<()> {
        match stmt {
            Stmt::Return(ret) => {
                self.emit_expr(&ret.value, code)?;
                if !tail {
                    code.push(op::RETURN);
                }
                Ok(())
            },
            Stmt::Let(let_stmt) => self.emit_let(let_stmt, code),
            Stmt::Assign(assign) => self.emit_assign(assign, code),
            Stmt::If(if_stmt) => self.emit_if(if_stmt, code),
            Stmt::While(while_stmt) => self.emit_while(while_stmt, code),
            Stmt::Free(free) => {
                // Deallocation is a no-op: evaluate the pointer for its
                // effects and discard it.
                self.emit_expr(&free.ptr, code)?;
                code.push(op::DROP);
                Ok(())
            },
            Stmt::Expr(expr) => {
                self.emit_expr(expr, code)?;
                code.push(op::DROP);
                Ok(())
            },
        }
    }

    fn emit_let(&mut self, let_stmt: &LetStmt, code: &mut Vec<u8>) -> Result<()> {
        let index = self.lookup(let_stmt.name, let_stmt.span)?;
        self.emit_expr(&let_stmt.init, code)?;
        code.push(op::LOCAL_SET);
        leb128::write_unsigned(code, u64::from(index));
        Ok(())
    }

    fn emit_assign(&mut self, assign: &AssignStmt, code: &mut Vec<u8>) -> Result<()> {
        let index = self.lookup(assign.name, assign.span)?;

        match assign.op.compound_op() {
            None => {
                self.emit_expr(&assign.value, code)?;
            },
            Some(base) => {
                code.push(op::LOCAL_GET);
                leb128::write_unsigned(code, u64::from(index));
                self.emit_expr(&assign.value, code)?;
                // Compound assignment bases are +,-,*,/ - always lowerable.
                code.push(binop_opcode(base).ok_or_else(|| {
                    CodegenError::Internal(format!("compound op '{base}' has no opcode"))
                })?);
            },
        }

        code.push(op::LOCAL_SET);
        leb128::write_unsigned(code, u64::from(index));
        Ok(())
    }

    fn emit_if(&mut self, if_stmt: &IfStmt, code: &mut Vec<u8>) -> Result<()> {
        self.emit_expr(&if_stmt.cond, code)?;
        code.push(op::IF);
        code.push(op::VOID_TYPE);

        self.emit_block(&if_stmt.then_block, code)?;

        if let Some(else_block) = &if_stmt.else_block {
            code.push(op::ELSE);
            self.emit_block(else_block, code)?;
        }

        code.push(op::END);
        Ok(())
    }

    /// Lower a while loop to `block { loop { .. } }`.
    ///
    /// The branch polarity is inverted with `i32.eqz`: the loop exits
    /// (branches to the outer block) when the condition is zero, and
    /// `br 0` re-enters the loop after the body.
    fn emit_while(&mut self, while_stmt: &WhileStmt, code: &mut Vec<u8>) -> Result<()> {
        code.push(op::BLOCK);
        code.push(op::VOID_TYPE);
        code.push(op::LOOP);
        code.push(op::VOID_TYPE);

        self.emit_expr(&while_stmt.cond, code)?;
        code.push(op::I32_EQZ);
        code.push(op::BR_IF);
        leb128::write_unsigned(code, 1);

        self.emit_block(&while_stmt.body, code)?;

        code.push(op::BR);
        leb128::write_unsigned(code, 0);
        code.push(op::END);
        code.push(op::END);
        Ok(())
    }

    fn emit_block(&mut self, block: &Block, code: &mut Vec<u8>) -> Result<()> {
        for stmt in &block.stmts {
            self.emit_stmt(stmt, code, false)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Emit one expression, post-order, leaving its value on the stack.
    fn emit_expr(&mut self, expr: &Expr, code: &mut Vec<u8>) -> Result<()> {
        match expr {
            Expr::Number(num) => {
                // Float literals are truncated; i32.const is the only
                // constant currently lowered.
                code.push(op::I32_CONST);
                leb128::write_signed(code, i64::from(num.value as i32));
                Ok(())
            },
            Expr::Ident(ident) => {
                let index = self.lookup(ident.name, ident.span)?;
                code.push(op::LOCAL_GET);
                leb128::write_unsigned(code, u64::from(index));
                Ok(())
            },
            Expr::Binary(binary) => {
                self.emit_expr(&binary.left, code)?;
                self.emit_expr(&binary.right, code)?;
                match binop_opcode(binary.op) {
                    Some(opcode) => {
                        code.push(opcode);
                        Ok(())
                    },
                    None => Err(CodegenError::UnsupportedOperator {
                        op: binary.op.to_string(),
                        line: binary.span.line,
                        column: binary.span.column,
                    }),
                }
            },
            Expr::Sizeof(sizeof) => {
                code.push(op::I32_CONST);
                leb128::write_signed(code, i64::from(type_size(&sizeof.ty)));
                Ok(())
            },
            Expr::AddrOf(addr) => match &addr.expr {
                // The placeholder address of a variable is its local slot.
                Expr::Ident(ident) => {
                    let index = self.lookup(ident.name, ident.span)?;
                    code.push(op::I32_CONST);
                    leb128::write_signed(code, i64::from(index));
                    Ok(())
                },
                other => Err(CodegenError::InvalidAddressOf {
                    line: other.span().line,
                    column: other.span().column,
                }),
            },
            Expr::Deref(deref) => self.emit_deref(deref, code),
            Expr::Alloc(alloc) => self.emit_alloc(alloc, code),
            Expr::Str(lit) => Err(CodegenError::UnsupportedExpr {
                what: "string literal",
                line: lit.span.line,
                column: lit.span.column,
            }),
        }
    }

    /// Lower a dereference with null and bounds checks.
    ///
    /// The pointer is tee'd into the scratch local; a null pointer or a
    /// pointer at or beyond `memory.size * page_size` yields 0 instead of
    /// loading.
    fn emit_deref(&mut self, deref: &DerefExpr, code: &mut Vec<u8>) -> Result<()> {
        self.emit_expr(&deref.ptr, code)?;
        let scratch = self.scratch_local(deref.span)?;

        code.push(op::LOCAL_TEE);
        leb128::write_unsigned(code, u64::from(scratch));

        // null check
        code.push(op::I32_CONST);
        leb128::write_signed(code, 0);
        code.push(op::I32_NE);
        code.push(op::IF);
        code.push(op::I32_TYPE);

        // bounds check against current memory size in bytes
        code.push(op::LOCAL_GET);
        leb128::write_unsigned(code, u64::from(scratch));
        code.push(op::MEMORY_SIZE);
        code.push(0x00);
        code.push(op::I32_CONST);
        leb128::write_signed(code, i64::from(op::PAGE_SIZE));
        code.push(op::I32_MUL);
        code.push(op::I32_LT_S);
        code.push(op::IF);
        code.push(op::I32_TYPE);

        code.push(op::LOCAL_GET);
        leb128::write_unsigned(code, u64::from(scratch));
        code.push(op::I32_LOAD);
        leb128::write_unsigned(code, 2); // alignment
        leb128::write_unsigned(code, 0); // offset

        code.push(op::ELSE);
        code.push(op::I32_CONST);
        leb128::write_signed(code, 0);
        code.push(op::END);

        code.push(op::ELSE);
        code.push(op::I32_CONST);
        leb128::write_signed(code, 0);
        code.push(op::END);
        Ok(())
    }

    /// Lower an allocation to a checked `memory.grow`.
    ///
    /// The element count is tee'd and checked positive; the byte request
    /// is scaled by the element size and rounded up to a multiple of it;
    /// the grow result is tee'd and checked against -1. The yielded
    /// pointer is `previous_pages * page_size`, the first byte of the
    /// freshly grown region. Either check failing yields the null
    /// pointer 0.
    fn emit_alloc(&mut self, alloc: &AllocExpr, code: &mut Vec<u8>) -> Result<()> {
        let size = i64::from(type_size(&alloc.ty));

        self.emit_expr(&alloc.count, code)?;
        let scratch = self.scratch_local(alloc.span)?;

        code.push(op::LOCAL_TEE);
        leb128::write_unsigned(code, u64::from(scratch));

        // count > 0
        code.push(op::I32_CONST);
        leb128::write_signed(code, 0);
        code.push(op::I32_GT_S);
        code.push(op::IF);
        code.push(op::I32_TYPE);

        // request = round_up(count * size, size)
        code.push(op::LOCAL_GET);
        leb128::write_unsigned(code, u64::from(scratch));
        code.push(op::I32_CONST);
        leb128::write_signed(code, size);
        code.push(op::I32_MUL);
        code.push(op::I32_CONST);
        leb128::write_signed(code, size - 1);
        code.push(op::I32_ADD);
        code.push(op::I32_CONST);
        leb128::write_signed(code, size);
        code.push(op::I32_DIV_S);
        code.push(op::I32_CONST);
        leb128::write_signed(code, size);
        code.push(op::I32_MUL);

        code.push(op::MEMORY_GROW);
        code.push(0x00);
        code.push(op::LOCAL_TEE);
        leb128::write_unsigned(code, u64::from(scratch));

        // grow returns -1 on failure
        code.push(op::I32_CONST);
        leb128::write_signed(code, -1);
        code.push(op::I32_NE);
        code.push(op::IF);
        code.push(op::I32_TYPE);

        code.push(op::LOCAL_GET);
        leb128::write_unsigned(code, u64::from(scratch));
        code.push(op::I32_CONST);
        leb128::write_signed(code, i64::from(op::PAGE_SIZE));
        code.push(op::I32_MUL);

        code.push(op::ELSE);
        code.push(op::I32_CONST);
        leb128::write_signed(code, 0);
        code.push(op::END);

        code.push(op::ELSE);
        code.push(op::I32_CONST);
        leb128::write_signed(code, 0);
        code.push(op::END);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Resolve a variable name to its local index.
    fn lookup(&self, name: Symbol, span: Span) -> Result<u32> {
        self.locals
            .get(&name)
            .copied()
            .ok_or_else(|| CodegenError::Name {
                name: name.as_str().to_owned(),
                line: span.line,
                column: span.column,
            })
    }

    /// The scratch local reserved for this body.
    fn scratch_local(&self, span: Span) -> Result<u32> {
        self.scratch.ok_or_else(|| {
            CodegenError::Internal(format!(
                "no scratch local reserved for line {}, column {}",
                span.line, span.column
            ))
        })
    }
}

/// Build the memory section: one memory, min 1 page, max 1 page.
fn build_memory_section() -> Vec<u8> {
    let mut payload = Vec::new();
    leb128::write_unsigned(&mut payload, 1);
    payload.push(0x01); // limits flag: min and max present
    leb128::write_unsigned(&mut payload, 1);
    leb128::write_unsigned(&mut payload, 1);
    payload
}

/// Derive a function's WASM signature.
fn func_sig(func: &Function) -> Result<FuncSig> {
    let params = func
        .params
        .iter()
        .map(|p| valtype(&p.ty))
        .collect::<Result<Vec<u8>>>()?;
    let results = vec![valtype(&func.ret_ty)?];
    Ok(FuncSig { params, results })
}

/// Map a source type to its WASM value type; pointers are i32 offsets.
fn valtype(ty: &Ty) -> Result<u8> {
    match ty {
        Ty::I32 => Ok(op::I32_TYPE),
        Ty::I64 => Ok(op::I64_TYPE),
        Ty::F32 => Ok(op::F32_TYPE),
        Ty::F64 => Ok(op::F64_TYPE),
        Ty::Ptr(_) => Ok(op::I32_TYPE),
        Ty::Str => Err(CodegenError::UnsupportedType {
            ty: ty.to_string(),
        }),
    }
}

/// Byte size of a type for `sizeof` and allocation scaling.
///
/// Pointers are 4-byte offsets; `string` falls back to 4.
fn type_size(ty: &Ty) -> i32 {
    match ty {
        Ty::I32 | Ty::F32 | Ty::Ptr(_) | Ty::Str => 4,
        Ty::I64 | Ty::F64 => 8,
    }
}

/// The WASM opcode for a binary operator, if it has one.
fn binop_opcode(op_kind: BinOp) -> Option<u8> {
    match op_kind {
        BinOp::Add => Some(op::I32_ADD),
        BinOp::Sub => Some(op::I32_SUB),
        BinOp::Mul => Some(op::I32_MUL),
        BinOp::Div => Some(op::I32_DIV_S),
        BinOp::Lt => Some(op::I32_LT_S),
        BinOp::Gt => Some(op::I32_GT_S),
        BinOp::Eq => Some(op::I32_EQ),
        BinOp::Le => Some(op::I32_LE_S),
        BinOp::Ge => Some(op::I32_GE_S),
        BinOp::Mod => None,
    }
}

/// Whether a block contains an expression that needs the scratch local.
fn block_needs_scratch(block: &Block) -> bool {
    block.stmts.iter().any(stmt_needs_scratch)
}

fn stmt_needs_scratch(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return(ret) => expr_needs_scratch(&ret.value),
        Stmt::Let(let_stmt) => expr_needs_scratch(&let_stmt.init),
        Stmt::Assign(assign) => expr_needs_scratch(&assign.value),
        Stmt::Free(free) => expr_needs_scratch(&free.ptr),
        Stmt::Expr(expr) => expr_needs_scratch(expr),
        Stmt::If(if_stmt) => {
            expr_needs_scratch(&if_stmt.cond)
                || block_needs_scratch(&if_stmt.then_block)
                || if_stmt
                    .else_block
                    .as_ref()
                    .is_some_and(block_needs_scratch)
        },
        Stmt::While(while_stmt) => {
            expr_needs_scratch(&while_stmt.cond) || block_needs_scratch(&while_stmt.body)
        },
    }
}

fn expr_needs_scratch(expr: &Expr) -> bool {
    match expr {
        Expr::Alloc(_) | Expr::Deref(_) => true,
        Expr::Binary(binary) => {
            expr_needs_scratch(&binary.left) || expr_needs_scratch(&binary.right)
        },
        Expr::AddrOf(addr) => expr_needs_scratch(&addr.expr),
        Expr::Number(_) | Expr::Str(_) | Expr::Ident(_) | Expr::Sizeof(_) => false,
    }
}
