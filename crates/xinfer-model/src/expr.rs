//! Body and annotation-value expressions.

use crate::ids::{DeclId, ExprId};
use smallvec::SmallVec;
use xinfer_common::Span;

#[derive(Debug)]
pub struct Expression {
    pub kind: ExprKind,
    pub span: Span,
    pub parent: Option<ExprId>,
    /// Logical container of a root expression (the member whose body or
    /// annotation value it is). Only set on roots; nested expressions reach
    /// it through `parent`.
    pub owner: Option<DeclId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Str(Box<str>),
    Bool(bool),
    Null,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    Literal(Literal),
    /// Field read, method invocation or constructor call.
    FeatureCall {
        feature: DeclId,
        receiver: Option<ExprId>,
        args: Vec<ExprId>,
    },
    This,
    Super,
    /// Reference to parameter `index` of executable `owner`.
    Param { owner: DeclId, index: u32 },
    Block(Vec<ExprId>),
    If {
        condition: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
    },
    Return(Option<ExprId>),
}

impl ExprKind {
    /// Direct sub-expressions in evaluation order.
    pub fn children(&self) -> SmallVec<[ExprId; 4]> {
        let mut children = SmallVec::new();
        match self {
            Self::Literal(_) | Self::This | Self::Super | Self::Param { .. } => {}
            Self::FeatureCall { receiver, args, .. } => {
                children.extend(receiver.iter().copied());
                children.extend(args.iter().copied());
            }
            Self::Block(exprs) => children.extend(exprs.iter().copied()),
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => {
                children.push(*condition);
                children.push(*then_branch);
                children.extend(else_branch.iter().copied());
            }
            Self::Return(value) => children.extend(value.iter().copied()),
        }
        children
    }
}
