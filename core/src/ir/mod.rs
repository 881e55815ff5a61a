//! The intermediate representation: expression trees and the
//! query-operation tree they attach to, plus the parameter bag they bind
//! against.

pub mod expr;
pub mod insert;
pub mod op;
pub mod param;

pub use expr::{
    ArithOp, BoolExpr, BooleanMethod, CastType, CmpOp, Direction, InList, JoinSide, LiteralValue,
    LogicalOp, StringMethod, ValueExpr, WindowKind,
};
pub use insert::{DeleteStatement, InsertStatement, Returning, UpdateStatement};
pub use op::{CountExpr, Operation, Projection, Terminal};
pub use param::{param_bag_key, ParamBag, ParamValue, GENERATED_PREFIX};
