//! Statement and expression trees.
//!
//! Method bodies arrive as structured trees: upstream has already recovered
//! control flow from bytecode, resolved every member reference and computed
//! the result type of every operator. Both trees are closed enums so the
//! backend matches them exhaustively.

mod operators;

use std::fmt;

pub use operators::{BinaryOp, UnaryOp};

use crate::known;
use crate::literal::Literal;
use crate::name::FqName;
use crate::types::{MethodType, Type};

/// A method-local variable.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Local {
    pub name: String,
    pub ty: Type,
}

impl Local {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Local {
            name: name.into(),
            ty,
        }
    }
}

/// A declared method parameter.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Param {
            name: name.into(),
            ty,
        }
    }
}

/// Symbolic reference to a method: owner, name and signature.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodRef {
    pub class: FqName,
    pub name: String,
    pub ty: MethodType,
}

impl MethodRef {
    pub fn new(class: impl Into<FqName>, name: impl Into<String>, ty: MethodType) -> Self {
        MethodRef {
            class: class.into(),
            name: name.into(),
            ty,
        }
    }

    #[inline]
    pub fn descriptor(&self) -> String {
        self.ty.descriptor()
    }

    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.name == known::CONSTRUCTOR
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}{}", self.class, self.name, self.ty.descriptor())
    }
}

/// Symbolic reference to a field.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldRef {
    pub class: FqName,
    pub name: String,
    pub ty: Type,
}

impl FieldRef {
    pub fn new(class: impl Into<FqName>, name: impl Into<String>, ty: Type) -> Self {
        FieldRef {
            class: class.into(),
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class, self.name)
    }
}

/// Dispatch kind of a call.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum CallKind {
    Static,
    Instance(Box<Expr>),
    Super,
}

/// Expression tree.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// `this`, typed as the enclosing class.
    This(FqName),
    Literal(Literal),
    Param(Param),
    Local(Local),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        ty: Type,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        ty: Type,
    },
    Call {
        kind: CallKind,
        method: MethodRef,
        args: Vec<Expr>,
    },
    InstanceField {
        object: Box<Expr>,
        field: FieldRef,
    },
    StaticField(FieldRef),
    ArrayLength(Box<Expr>),
    ArrayElement {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Cast {
        expr: Box<Expr>,
        to: Type,
    },
    /// Default construction; constructor bodies run through
    /// [`Stmt::SetNewWithConstructor`].
    New(FqName),
    /// `ty` is the array type; one count per created dimension.
    NewArray {
        ty: Type,
        counts: Vec<Expr>,
    },
    InstanceOf {
        expr: Box<Expr>,
        check: Type,
    },
    ClassLiteral(Type),
    /// The exception bound by the innermost catch-all.
    CaughtException(Type),
    /// A method reference converted to a functional interface.
    MethodClass {
        interface_method: MethodRef,
        target: MethodRef,
    },
}

impl Expr {
    pub fn literal(literal: Literal) -> Expr {
        Expr::Literal(literal)
    }

    pub fn int(value: i32) -> Expr {
        Expr::Literal(Literal::Int(value))
    }

    pub fn local(name: impl Into<String>, ty: Type) -> Expr {
        Expr::Local(Local::new(name, ty))
    }

    pub fn param(name: impl Into<String>, ty: Type) -> Expr {
        Expr::Param(Param::new(name, ty))
    }

    pub fn unary(op: UnaryOp, operand: Expr, ty: Type) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(operand),
            ty,
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr, ty: Type) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            ty,
        }
    }

    pub fn cast(expr: Expr, to: Type) -> Expr {
        Expr::Cast {
            expr: Box::new(expr),
            to,
        }
    }

    pub fn static_call(method: MethodRef, args: Vec<Expr>) -> Expr {
        Expr::Call {
            kind: CallKind::Static,
            method,
            args,
        }
    }

    pub fn instance_call(receiver: Expr, method: MethodRef, args: Vec<Expr>) -> Expr {
        Expr::Call {
            kind: CallKind::Instance(Box::new(receiver)),
            method,
            args,
        }
    }

    /// Type the expression produces.
    pub fn ty(&self) -> Type {
        match self {
            Expr::This(class) | Expr::New(class) => Type::Ref(class.clone()),
            Expr::Literal(literal) => literal.ty(),
            Expr::Param(param) => param.ty.clone(),
            Expr::Local(local) => local.ty.clone(),
            Expr::Unary { ty, .. }
            | Expr::Binary { ty, .. }
            | Expr::Cast { to: ty, .. }
            | Expr::NewArray { ty, .. }
            | Expr::CaughtException(ty) => ty.clone(),
            Expr::Call { method, .. } => method.ty.ret.clone(),
            Expr::InstanceField { field, .. } | Expr::StaticField(field) => field.ty.clone(),
            Expr::ArrayLength(_) => Type::INT,
            Expr::ArrayElement { array, .. } => match array.ty() {
                Type::Array(element) => *element,
                _ => Type::object(),
            },
            Expr::InstanceOf { .. } => Type::BOOL,
            Expr::ClassLiteral(_) => Type::reference(known::CLASS),
            Expr::MethodClass {
                interface_method, ..
            } => Type::Ref(interface_method.class.clone()),
        }
    }
}

/// One `case` arm of a switch.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchCase {
    pub value: i32,
    pub body: Stmt,
}

/// Statement tree.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Stmt {
    Nop,
    If {
        cond: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    Return(Option<Expr>),
    SetLocal {
        local: Local,
        expr: Expr,
    },
    /// `local = new target(args)` with constructor `constructor`.
    SetNewWithConstructor {
        local: Local,
        target: FqName,
        constructor: MethodRef,
        args: Vec<Expr>,
    },
    SetArray {
        array: Expr,
        index: Expr,
        value: Expr,
    },
    SetStaticField {
        field: FieldRef,
        expr: Expr,
    },
    SetInstanceField {
        object: Expr,
        field: FieldRef,
        expr: Expr,
    },
    Expr(Expr),
    Block(Vec<Stmt>),
    Label(String),
    Break,
    Continue,
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    /// Cases fall through unless their body exits.
    Switch {
        subject: Expr,
        cases: Vec<SwitchCase>,
        default: Box<Stmt>,
    },
    /// A single catch-all handler.
    TryCatch {
        body: Box<Stmt>,
        catch: Box<Stmt>,
    },
    Throw(Expr),
    /// Re-raise the exception bound by the enclosing catch-all.
    Rethrow,
    MonitorEnter(Expr),
    MonitorExit(Expr),
}

impl Stmt {
    pub fn set_local(local: Local, expr: Expr) -> Stmt {
        Stmt::SetLocal { local, expr }
    }

    pub fn if_else(cond: Expr, then: Stmt, otherwise: Option<Stmt>) -> Stmt {
        Stmt::If {
            cond,
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        }
    }

    pub fn while_loop(cond: Expr, body: Stmt) -> Stmt {
        Stmt::While {
            cond,
            body: Box::new(body),
        }
    }

    pub fn try_catch(body: Stmt, catch: Stmt) -> Stmt {
        Stmt::TryCatch {
            body: Box::new(body),
            catch: Box::new(catch),
        }
    }
}
