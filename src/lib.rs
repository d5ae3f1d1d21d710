pub mod calculator;
pub mod expression;
pub mod format;
pub mod presenter;
pub mod tokenizer;

pub use calculator::{EngineError, ExpressionEngine};
pub use expression::{Expression, Literal, Operator, Precedence, Token};
pub use format::format_result;
pub use presenter::{Notification, Presenter, Recorder};
pub use tokenizer::{keys, Key, KeyError};
