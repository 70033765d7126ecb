//! Astrolabe Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Astrolabe
//! validator crates. It includes:
//!
//! - **Diagram kinds**: The closed set of diagram types ([`kind::DiagramKind`])
//! - **AST**: Node shapes produced by the grammars ([`ast`] module)
//!
//! Every value in this crate is created fresh for a single validation call
//! and is immutable once the parser hands it out.

pub mod ast;
pub mod kind;
