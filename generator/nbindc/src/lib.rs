//! Native binding generator driver.
//!
//! Reads a scan manifest, merges every declared type into one canonical
//! type, resolves Java types for them and writes the generated sources.
//!
//! # Tracing
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=nbind::merge=info,nbindc=debug`) to get
//! log output on stderr. Set `NBIND_LOG_TREE=1` as well for indented,
//! span-nested output.

mod config;
mod error;
mod manifest;
mod observe;
mod pipeline;
mod resolve;
mod wrappers;

use std::sync::Once;

pub use config::{
    is_package_name, ConfigError, GeneratorConfig, DEFAULT_OUT_DIR, DEFAULT_RUNTIME_PACKAGE, RUNTIME_PACKAGE_ENV,
};
pub use error::{GenerateError, TypeError};
pub use manifest::{CopyEntry, Manifest, ManifestError, Observation, DEFAULT_PACKAGE};
pub use observe::{canonicalize, Canonicalized};
pub use pipeline::{generate, generate_into, GenerateSummary};
pub use resolve::{coder_stem, java_primitive, DefaultResolver, JavaCoderNaming};
pub use wrappers::{build_artifacts, java_identifier, java_string, wrapper_class_name, TYPES_CLASS_NAME};

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var("NBIND_LOG_TREE").is_ok() {
            let tree = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);
            tracing_subscriber::registry().with(filter).with(tree).init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(filter)
                .init();
        }
    });
}
