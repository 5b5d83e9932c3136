pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    MirrorSettings, handle_mirror, init_tracing, listen_for_interrupt, resolve_mirror_dir,
    settings_from_matches, validate_seed_url,
};

// Re-export session functionality from webmirror-core
pub use webmirror_core::crawl::{MirrorOptions, MirrorProgressCallback, execute_mirror};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
