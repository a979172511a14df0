//! TypeScript/JavaScript support for rehome
//!
//! Alias configuration (tsconfig.json / jsconfig.json), lexical import
//! scanning for plain sources and `.vue`/`.svelte` components, and specifier
//! resolution and rewriting.

pub mod component;
pub mod config_resolver;
pub mod import_scanner;
pub mod paths;
pub mod regex_patterns;
pub mod specifier;
pub mod tsconfig;

pub use config_resolver::{ConfigResolver, ConfigResolverOptions};
pub use import_scanner::{parse_imports, update_imports_in_content, ImportEdit, ImportRecord};
pub use specifier::SpecifierResolver;
pub use tsconfig::{parse_config, AliasRule, ConfigInfo};
