//! Property-based tests for the Haxe backend.
//!
//! 1. Init order: over random dependency DAGs, every class comes after each
//!    of its dependencies, exactly once, with nothing broken.
//! 2. Casts: every primitive pair has a rule and resolves the same way
//!    every time.
//! 3. Reflection: one proxy class per annotation type, however many times
//!    the type is used.
//! 4. Integer arithmetic: emitted `int`, `char`, `short` and `byte` results,
//!    evaluated with JavaScript number semantics, match wrapping arithmetic.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    reason = "The evaluator models 32-bit conversions with casts"
)]

use hxt_codegen::haxe::cast::cast;
use hxt_codegen::haxe::expr::emit_expr;
use hxt_codegen::{
    generate, init_order, static_dependencies, CodegenOptions, EmitCx, HaxeNames, MappingTable,
    Session,
};
use hxt_ir::{
    Annotation, BinaryOp, Body, Class, ClassKind, Expr, Field, FieldRef, FqName, Literal, Method,
    Modifiers, Param, PrimType, Program, Stmt, Type,
};
use proptest::prelude::*;

const STATIC: Modifiers = Modifiers::PUBLIC.union(Modifiers::STATIC);

fn class_name(i: usize) -> String {
    format!("app.C{i}")
}

fn static_method(name: &str, params: Vec<Param>, stmts: Vec<Stmt>) -> Method {
    Method::new(name, params, Type::Void, STATIC).with_body(Body::new(vec![], Stmt::Block(stmts)))
}

fn main_method() -> Method {
    static_method(
        "main",
        vec![Param::new("p0", Type::array(Type::string()))],
        vec![],
    )
}

/// Class `i` touches `app.Cj.V` in its `<clinit>` for every `j < i` whose
/// flag is set. The last class is the entry.
fn dag_program(adjacency: &[Vec<bool>]) -> Program {
    let count = adjacency.len();
    let mut program = Program::new(class_name(count - 1));
    for (i, row) in adjacency.iter().enumerate() {
        let touches = row
            .iter()
            .take(i)
            .enumerate()
            .filter(|&(_, &edge)| edge)
            .map(|(j, _)| {
                Stmt::Expr(Expr::StaticField(FieldRef::new(class_name(j), "V", Type::INT)))
            })
            .collect();
        let mut class = Class::new(class_name(i), ClassKind::Class)
            .with_field(Field::new("V", Type::INT, STATIC))
            .with_method(static_method("<clinit>", vec![], touches));
        if i == count - 1 {
            class = class.with_method(main_method());
        }
        program.add_class(class);
    }
    program
}

fn adjacency_strategy() -> impl Strategy<Value = Vec<Vec<bool>>> {
    (1usize..10).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(any::<bool>(), n), n)
    })
}

fn prim_strategy() -> impl Strategy<Value = PrimType> {
    prop::sample::select(PrimType::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_init_order_is_topological(adjacency in adjacency_strategy()) {
        let program = dag_program(&adjacency);
        let order = init_order(&program, program.entrypoint());

        prop_assert!(order.broken_edges.is_empty());
        prop_assert_eq!(order.order.last(), Some(program.entrypoint()));

        let position = |name: &FqName| order.order.iter().position(|c| c == name);
        for (index, name) in order.order.iter().enumerate() {
            prop_assert_eq!(position(name), Some(index), "listed twice: {}", name);
            let class = program.class(name).unwrap();
            for dep in static_dependencies(&program, class) {
                if program.class(&dep).is_some() {
                    let dep_index = position(&dep);
                    prop_assert!(dep_index.is_some_and(|d| d < index), "{} before {}", dep, name);
                }
            }
        }
    }

    #[test]
    fn prop_primitive_casts_are_total_and_stable(from in prim_strategy(), to in prim_strategy()) {
        let program = Program::new("app.Main");
        let names = HaxeNames::new(&program);
        let (from, to) = (Type::Prim(from), Type::Prim(to));
        let first = cast(&names, "x", &from, &to);
        prop_assert!(first.is_ok());
        prop_assert_eq!(&first, &cast(&names, "x", &from, &to));
        if from == to {
            prop_assert_eq!(first.unwrap(), "x");
        }
    }

    #[test]
    fn prop_one_proxy_per_annotation_type(uses in prop::collection::vec(0usize..4, 1..5)) {
        let mut program = Program::new("app.Main");
        let mut main = Class::new("app.Main", ClassKind::Class).with_method(main_method());
        for (t, &count) in uses.iter().enumerate() {
            let ty = format!("app.Tag{t}");
            program.add_class(
                Class::new(ty.as_str(), ClassKind::Interface)
                    .with_modifiers(Modifiers::PUBLIC | Modifiers::INTERFACE | Modifiers::ABSTRACT | Modifiers::ANNOTATION),
            );
            for k in 0..count {
                main = main.with_field(
                    Field::new(format!("f{t}_{k}"), Type::INT, Modifiers::PUBLIC)
                        .with_annotation(Annotation::new(ty.as_str())),
                );
            }
        }
        program.add_class(main);

        let names = HaxeNames::new(&program);
        let generated = generate(&program, &names, &MappingTable::new(), &CodegenOptions::default()).unwrap();
        let reflection = generated.unit("HaxeReflectionInfo.hx").unwrap();

        let used = uses.iter().filter(|&&count| count > 0).count();
        prop_assert_eq!(reflection.source.matches("// annotation type: ").count(), used);
        for (t, &count) in uses.iter().enumerate() {
            let header = format!("class AnnotationProxy_app_Tag{t}_ ");
            prop_assert_eq!(reflection.source.matches(header.as_str()).count(), usize::from(count > 0));
        }
    }
}

// Integer arithmetic

/// Evaluates emitted integer expressions the way the JavaScript target runs
/// them: every number is a double and bitwise operators convert through
/// 32-bit integers.
struct JsEval {
    tokens: Vec<String>,
    pos: usize,
}

/// Binary operator tiers, loosest first.
const TIERS: &[&[&str]] = &[
    &["|"],
    &["^"],
    &["&"],
    &["<<", ">>", ">>>"],
    &["+", "-"],
    &["*", "/", "%"],
];

fn to_int32(value: f64) -> i32 {
    let wrapped = value.trunc().rem_euclid(4_294_967_296.0);
    if wrapped >= 2_147_483_648.0 {
        (wrapped - 4_294_967_296.0) as i32
    } else {
        wrapped as i32
    }
}

fn to_uint32(value: f64) -> u32 {
    value.trunc().rem_euclid(4_294_967_296.0) as u32
}

fn tokenize(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '.') {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
        } else if text[i..].starts_with(">>>") {
            tokens.push(">>>".to_string());
            i += 3;
        } else if text[i..].starts_with(">>") || text[i..].starts_with("<<") {
            tokens.push(chars[i..i + 2].iter().collect());
            i += 2;
        } else {
            tokens.push(c.to_string());
            i += 1;
        }
    }
    tokens
}

impl JsEval {
    fn run(text: &str) -> f64 {
        let mut eval = JsEval { tokens: tokenize(text), pos: 0 };
        let value = eval.binary(0);
        assert_eq!(eval.pos, eval.tokens.len(), "trailing input in {text}");
        value
    }

    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> String {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    fn expect(&mut self, token: &str) {
        assert_eq!(self.next(), token);
    }

    fn binary(&mut self, tier: usize) -> f64 {
        if tier == TIERS.len() {
            return self.unary();
        }
        let mut left = self.binary(tier + 1);
        while self.peek().is_some_and(|t| TIERS[tier].contains(&t)) {
            let op = self.next();
            let right = self.binary(tier + 1);
            left = apply(&op, left, right);
        }
        left
    }

    fn unary(&mut self) -> f64 {
        if self.peek() == Some("-") {
            self.pos += 1;
            return -self.unary();
        }
        self.primary()
    }

    fn call_args(&mut self, count: usize) -> Vec<f64> {
        self.expect("(");
        let mut args = vec![self.binary(0)];
        while args.len() < count {
            self.expect(",");
            args.push(self.binary(0));
        }
        self.expect(")");
        args
    }

    fn primary(&mut self) -> f64 {
        let token = self.next();
        match token.as_str() {
            "(" => {
                let value = self.binary(0);
                self.expect(")");
                value
            }
            "Std.int" => f64::from(to_int32(self.call_args(1)[0])),
            "HaxeNatives.imul" => {
                let args = self.call_args(2);
                f64::from(to_int32(args[0]).wrapping_mul(to_int32(args[1])))
            }
            number => match number.strip_prefix("0x") {
                Some(hex) => f64::from(u32::from_str_radix(hex, 16).unwrap()),
                None => number.parse().unwrap(),
            },
        }
    }
}

fn apply(op: &str, l: f64, r: f64) -> f64 {
    match op {
        "+" => l + r,
        "-" => l - r,
        "*" => l * r,
        "/" => l / r,
        "%" => l % r,
        "&" => f64::from(to_int32(l) & to_int32(r)),
        "|" => f64::from(to_int32(l) | to_int32(r)),
        "^" => f64::from(to_int32(l) ^ to_int32(r)),
        "<<" => f64::from(to_int32(l).wrapping_shl(to_uint32(r))),
        ">>" => f64::from(to_int32(l).wrapping_shr(to_uint32(r))),
        ">>>" => f64::from(to_uint32(l).wrapping_shr(to_uint32(r))),
        other => panic!("unexpected operator {other}"),
    }
}

/// 32-bit result of `op`, narrowed to the width of `ty`.
fn wrapping(op: BinaryOp, ty: PrimType, a: i32, b: i32) -> i32 {
    let wide = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => a.wrapping_div(b),
        BinaryOp::Rem => a.wrapping_rem(b),
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::Shl => a.wrapping_shl(b as u32),
        BinaryOp::Shr => a.wrapping_shr(b as u32),
        BinaryOp::Ushr => (a as u32).wrapping_shr(b as u32) as i32,
        other => panic!("not an integer operator: {other:?}"),
    };
    narrow(ty, wide)
}

fn narrow(ty: PrimType, value: i32) -> i32 {
    match ty {
        PrimType::Char => i32::from(value as u16),
        PrimType::Short => i32::from(value as i16),
        PrimType::Byte => i32::from(value as i8),
        _ => value,
    }
}

fn literal(ty: PrimType, value: i32) -> Expr {
    Expr::literal(match ty {
        PrimType::Char => Literal::Char(value as u16),
        PrimType::Short => Literal::Short(value as i16),
        PrimType::Byte => Literal::Byte(value as i8),
        _ => Literal::Int(value),
    })
}

fn emit_in_main(expr: &Expr) -> String {
    let program = Program::new("app.Main").with_class(Class::new("app.Main", ClassKind::Class));
    let names = HaxeNames::new(&program);
    let mappings = MappingTable::new();
    let options = CodegenOptions::default();
    let session = Session::new(&program, &names, &mappings, &options);
    let class = program.class(&FqName::new("app.Main")).unwrap();
    let mut cx = EmitCx::for_class(session, class);
    emit_expr(&mut cx, expr).unwrap()
}

/// Emits `a op b` typed `ty` and evaluates the text.
fn evaluate(op: BinaryOp, ty: PrimType, a: i32, b: i32) -> f64 {
    let expr = Expr::binary(op, literal(ty, a), literal(ty, b), Type::Prim(ty));
    JsEval::run(&emit_in_main(&expr))
}

fn int_op_strategy() -> impl Strategy<Value = BinaryOp> {
    prop::sample::select(vec![
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Rem,
        BinaryOp::BitAnd,
        BinaryOp::BitOr,
        BinaryOp::BitXor,
        BinaryOp::Shl,
        BinaryOp::Shr,
        BinaryOp::Ushr,
    ])
}

fn int_like_strategy() -> impl Strategy<Value = PrimType> {
    prop::sample::select(vec![PrimType::Int, PrimType::Char, PrimType::Short, PrimType::Byte])
}

#[test]
fn int_add_overflow_wraps_to_min() {
    assert_eq!(evaluate(BinaryOp::Add, PrimType::Int, 0x7FFF_FFFF, 1), f64::from(i32::MIN));
    assert_eq!(evaluate(BinaryOp::Mul, PrimType::Int, 0x7FFF_FFFF, 0x7FFF_FFFF), 1.0);
    assert_eq!(evaluate(BinaryOp::Div, PrimType::Int, i32::MIN, -1), f64::from(i32::MIN));
    assert_eq!(evaluate(BinaryOp::Add, PrimType::Char, 0xFFFF, 1), 0.0);
    assert_eq!(evaluate(BinaryOp::Add, PrimType::Short, 0x7FFF, 1), -32768.0);
    assert_eq!(evaluate(BinaryOp::Sub, PrimType::Byte, -128, 1), 127.0);
}

proptest! {
    #[test]
    fn prop_integer_results_match_wrapping_arithmetic(
        op in int_op_strategy(),
        ty in int_like_strategy(),
        a in any::<i32>(),
        b in any::<i32>(),
    ) {
        let (a, b) = (narrow(ty, a), narrow(ty, b));
        prop_assume!(b != 0 || !matches!(op, BinaryOp::Div | BinaryOp::Rem));
        prop_assert_eq!(evaluate(op, ty, a, b), f64::from(wrapping(op, ty, a, b)));
    }
}
