//! Cranelift JIT compiler for scalar condition expressions.
//!
//! # Calling Convention
//!
//! Every compiled function takes a **single parameter**, a pointer to the
//! first component of the point, and returns the condition value:
//!
//! ```text
//! x[i] = load.f64(point + i * 8)
//! ```
//!
//! One load per variable reference, no bounds checks: callers must pass a
//! point with at least `nvars` components, which `JitFn::call` enforces.

use cranelift_codegen::ir::condcodes::FloatCC;
use cranelift_codegen::ir::types::F64;
use cranelift_codegen::ir::{self, AbiParam, InstBuilder, MemFlags, UserFuncName};
use cranelift_codegen::settings::{self, Configurable};
use cranelift_codegen::Context;
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext};
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{Linkage, Module};
use thiserror::Error;

use crate::expr::{Expr, Function};

/// Why an expression was not compiled to native code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JitError {
    /// The expression uses a node the code generator does not handle.
    #[error("not compilable: {0}")]
    Unsupported(String),

    #[error("target ISA: {0}")]
    Isa(String),

    #[error("module: {0}")]
    Module(String),
}

impl From<cranelift_module::ModuleError> for JitError {
    fn from(e: cranelift_module::ModuleError) -> Self {
        JitError::Module(e.to_string())
    }
}

/// A JIT-compiled condition. Owns the Cranelift module (code memory) and
/// holds the raw function pointer.
pub struct JitFn {
    _module: JITModule,
    ptr: *const u8,
    nvars: usize,
}

// SAFETY: JITModule owns the code memory. ptr is valid for the module's lifetime,
// and the compiled code only reads through its argument.
unsafe impl Send for JitFn {}
unsafe impl Sync for JitFn {}

impl JitFn {
    /// Evaluates the compiled condition at `point`.
    ///
    /// Returns `None` when the point has fewer than `nvars` components.
    #[inline]
    pub fn call(&self, point: &[f64]) -> Option<f64> {
        if point.len() < self.nvars {
            return None;
        }
        let f: unsafe extern "C" fn(*const f64) -> f64 = unsafe { std::mem::transmute(self.ptr) };
        Some(unsafe { f(point.as_ptr()) })
    }

    /// Number of point components the compiled code reads.
    pub fn nvars(&self) -> usize {
        self.nvars
    }
}

impl std::fmt::Debug for JitFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JitFn").field("nvars", &self.nvars).finish()
    }
}

/// Whether `expr` is made only of nodes the code generator handles.
pub fn is_compilable(expr: &Expr) -> bool {
    unsupported(expr).is_none()
}

/// Byte offset of `x[index]`, if it fits a load immediate.
fn var_offset(index: usize) -> Option<i32> {
    index.checked_mul(8).and_then(|bytes| i32::try_from(bytes).ok())
}

fn unsupported(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Literal(_) => None,
        Expr::Var(i) => var_offset(*i)
            .is_none()
            .then(|| format!("variable index {i} out of range")),
        Expr::Neg(inner) => unsupported(inner),
        Expr::Add(l, r) | Expr::Sub(l, r) | Expr::Mul(l, r) | Expr::Div(l, r) => {
            unsupported(l).or_else(|| unsupported(r))
        }
        Expr::Call { function, args } => match function {
            Function::Abs | Function::Sqrt | Function::Floor | Function::Ceil | Function::Round
                if args.len() == 1 =>
            {
                unsupported(&args[0])
            }
            Function::Min | Function::Max if args.len() >= 2 => {
                args.iter().find_map(unsupported)
            }
            _ => Some(format!("function `{function}`")),
        },
        Expr::Point | Expr::Slice { .. } | Expr::List(_) => Some("vector operand".into()),
        Expr::Mod(..) => Some("`%`".into()),
        Expr::Pow(..) => Some("`**`".into()),
    }
}

/// Compiles a scalar expression to native code.
///
/// The compiled function reads `x[0..=max_index]`.
pub fn compile(expr: &Expr) -> Result<JitFn, JitError> {
    if let Some(reason) = unsupported(expr) {
        return Err(JitError::Unsupported(reason));
    }
    let nvars = expr.max_index().map_or(0, |i| i + 1);
    let (module, ptr) = compile_function(expr)?;
    Ok(JitFn {
        _module: module,
        ptr,
        nvars,
    })
}

// ---------------------------------------------------------------------------
// Internal codegen
// ---------------------------------------------------------------------------

fn isa_error(e: impl std::fmt::Display) -> JitError {
    JitError::Isa(e.to_string())
}

fn make_jit_module() -> Result<JITModule, JitError> {
    let mut flag_builder = settings::builder();
    flag_builder
        .set("use_colocated_libcalls", "false")
        .map_err(isa_error)?;
    flag_builder.set("is_pic", "false").map_err(isa_error)?;
    let isa = cranelift_native::builder()
        .map_err(isa_error)?
        .finish(settings::Flags::new(flag_builder))
        .map_err(isa_error)?;
    let builder = JITBuilder::with_isa(isa, cranelift_module::default_libcall_names());
    Ok(JITModule::new(builder))
}

fn compile_function(expr: &Expr) -> Result<(JITModule, *const u8), JitError> {
    let mut module = make_jit_module()?;
    let ptr_type = module.target_config().pointer_type();

    // Single parameter: *const f64 (the point)
    let mut sig = module.make_signature();
    sig.params.push(AbiParam::new(ptr_type));
    sig.returns.push(AbiParam::new(F64));

    let func_id = module.declare_function("jit_condition", Linkage::Local, &sig)?;
    let mut func = ir::Function::with_name_signature(UserFuncName::user(0, 0), sig);
    let mut func_ctx = FunctionBuilderContext::new();

    {
        let mut builder = FunctionBuilder::new(&mut func, &mut func_ctx);
        let entry = builder.create_block();
        builder.append_block_params_for_function_params(entry);
        builder.switch_to_block(entry);
        builder.seal_block(entry);

        let point = builder.block_params(entry)[0];
        let result = emit_expr(&mut builder, expr, point);
        builder.ins().return_(&[result]);
        builder.finalize();
    }

    let mut ctx = Context::for_function(func);
    module
        .define_function(func_id, &mut ctx)
        .map_err(|e| JitError::Module(e.to_string()))?;
    module.clear_context(&mut ctx);
    module.finalize_definitions()?;

    let ptr = module.get_finalized_function(func_id);
    Ok((module, ptr))
}

/// Emit Cranelift IR for an expression checked by `unsupported`. All values are f64.
fn emit_expr(builder: &mut FunctionBuilder, expr: &Expr, point: ir::Value) -> ir::Value {
    match expr {
        Expr::Literal(v) => builder.ins().f64const(*v),

        Expr::Var(i) => {
            let offset = var_offset(*i).unwrap_or_else(|| unreachable!("checked by `unsupported`"));
            builder.ins().load(F64, MemFlags::trusted(), point, offset)
        }

        Expr::Neg(inner) => {
            let v = emit_expr(builder, inner, point);
            builder.ins().fneg(v)
        }
        Expr::Add(l, r) => bin_op(builder, |b, x, y| b.ins().fadd(x, y), l, r, point),
        Expr::Sub(l, r) => bin_op(builder, |b, x, y| b.ins().fsub(x, y), l, r, point),
        Expr::Mul(l, r) => bin_op(builder, |b, x, y| b.ins().fmul(x, y), l, r, point),
        Expr::Div(l, r) => bin_op(builder, |b, x, y| b.ins().fdiv(x, y), l, r, point),

        Expr::Call { function, args } => {
            let mut values = args.iter().map(|arg| emit_expr(builder, arg, point));
            let first = values
                .next()
                .unwrap_or_else(|| unreachable!("checked by `unsupported`"));
            let rest: Vec<ir::Value> = values.collect();
            match function {
                Function::Abs => builder.ins().fabs(first),
                Function::Sqrt => builder.ins().sqrt(first),
                Function::Floor => builder.ins().floor(first),
                Function::Ceil => builder.ins().ceil(first),
                Function::Round => builder.ins().nearest(first),
                Function::Min => rest
                    .into_iter()
                    .fold(first, |acc, v| select_op(builder, FloatCC::LessThan, acc, v)),
                Function::Max => rest
                    .into_iter()
                    .fold(first, |acc, v| select_op(builder, FloatCC::GreaterThan, acc, v)),
                other => unreachable!("`{other}` is checked by `unsupported`"),
            }
        }

        other => unreachable!("{other:?} is checked by `unsupported`"),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bin_op(
    builder: &mut FunctionBuilder,
    op: impl FnOnce(&mut FunctionBuilder, ir::Value, ir::Value) -> ir::Value,
    left: &Expr,
    right: &Expr,
    point: ir::Value,
) -> ir::Value {
    let l = emit_expr(builder, left, point);
    let r = emit_expr(builder, right, point);
    op(builder, l, r)
}

/// `f64::min` / `f64::max` semantics: a NaN operand yields the other one.
fn select_op(builder: &mut FunctionBuilder, cc: FloatCC, l: ir::Value, r: ir::Value) -> ir::Value {
    let keep_left = builder.ins().fcmp(cc, l, r);
    let picked = builder.ins().select(keep_left, l, r);
    let right_is_nan = builder.ins().fcmp(FloatCC::Unordered, r, r);
    builder.ins().select(right_is_nan, l, picked)
}
