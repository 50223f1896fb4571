//! This crate implements the core transformation algorithms of the
//! [JSON-LD](https://www.w3.org/TR/json-ld/) data interchange format:
//! context processing, expansion and compaction, for both JSON-LD 1.1 and
//! JSON-LD 1.0 documents.
//!
//! [Linked Data (LD)](https://www.w3.org/standards/semanticweb/data)
//! is a [World Wide Web Consortium (W3C)](https://www.w3.org/) initiative
//! built upon standard Web technologies to create an interrelated network
//! of datasets across the Web. JSON-LD brings Linked Data semantics to
//! JSON documents.
//!
//! # Usage
//!
//! The entry point is the [`Processor`]: configure one once, then reuse it
//! for every document.
//!
//! [`Processor::expand`] turns incoming JSON into a list of [`Node`]s, the
//! expanded document form in which every property is a fully qualified IRI
//! and every value is explicitly tagged. [`Processor::compact`] performs
//! the inverse transformation, applying a context of your choosing to
//! produce short, human-friendly keys.
//!
//! ```
//! use json_syntax::Parse;
//! use lodestar::Processor;
//!
//! # #[async_std::main]
//! # async fn main() {
//! let (document, _) = json_syntax::Value::parse_str(
//! 	r#"{
//! 		"@context": {"name": "http://xmlns.com/foaf/0.1/name"},
//! 		"@id": "https://www.rust-lang.org",
//! 		"name": "Rust Programming Language"
//! 	}"#,
//! )
//! .unwrap();
//!
//! let processor = Processor::new();
//! let expanded = processor.expand(&document, None).await.unwrap();
//!
//! assert_eq!(
//! 	expanded[0].properties["http://xmlns.com/foaf/0.1/name"][0].value,
//! 	Some(json_syntax::Value::String("Rust Programming Language".into()))
//! );
//! # }
//! ```
//!
//! By default a [`Processor`] cannot load remote contexts. Install a
//! [`Loader`] with [`Processor::with_loader`]; to avoid depending on the
//! network while processing documents it is strongly recommended to
//! provide an implementation with the necessary contexts built in.
//!
//! # JSON typing
//!
//! Scalars are kept as [`json_syntax::Value`]s, so the source text of
//! numbers survives expansion and compaction untouched and `@json`
//! literals round-trip verbatim.

mod container;
mod direction;
mod error;
mod keyword;
mod node;
mod nullable;
mod processor;
mod syntax;
mod util;

pub mod compaction;
pub mod context;
pub mod expansion;
pub mod iri;
pub mod loader;
pub mod warning;

pub use container::{Container, ContainerKind};
pub use context::{Context, TermDefinition, REMOTE_CONTEXT_LIMIT};
pub use direction::Direction;
pub use error::Error;
pub use keyword::{is_keyword, is_keyword_like, Keyword, BLANK_NODE};
pub use loader::{LoadError, Loader, NoLoader, RemoteContext};
pub use node::{nodes_to_json, Node, Properties};
pub use nullable::Nullable;
pub use processor::{ProcessingMode, Processor};
pub use warning::{Warning, WarningHandler};
