//! jgraft core
//!
//! Wraps a parsed Java compilation unit in a navigable node graph, splices
//! replacement subtrees into its persistent child lists, and prints the
//! result back to source with the original comments interleaved.

pub mod ast;
pub mod comments;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod frontend;
pub mod host;
pub mod printer;
pub mod result;
pub mod session;
pub mod splice;

// Re-export commonly used types
pub use ast::{AstKind, AstVisitor, JavaAst, JavaNode, NodeId};
pub use comments::{CaptureStrategy, CommentCatcher, CommentToken};
pub use config::{ConfigLoader, JGraftConfiguration};
pub use diagnostics::{DiagnosticCoordinator, DiagnosticRange};
pub use error::{ErrorKind, JGraftError};
pub use frontend::{JavaParser, ParsedUnit};
pub use host::{DiagnosticKind, DiagnosticLog, NodeList, Tree, TreeKind, TreeMaker};
pub use printer::PrinterOptions;
pub use result::{Result, ResultExt};
pub use session::Session;
pub use splice::SpliceSite;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jgraft=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
