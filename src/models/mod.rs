//! Data models for the guestbook

pub mod comment;
pub mod visitor;

// Re-export commonly used types
pub use comment::{AdminComment, Comment, NewComment, OwnComment, PublicComment};
pub use visitor::{NewVisitor, Visitor, VisitorClaims, VisitorRole, VisitorSummary};
