//! Remote context loading.

use std::collections::HashMap;

use iref::{Iri, IriBuf};
use json_syntax::Value;

/// JSON-LD media types.
pub const APPLICATION_LD_JSON: &str = "application/ld+json";
pub const APPLICATION_JSON: &str = "application/json";

/// JSON-LD media type profiles.
pub const PROFILE_EXPANDED: &str = "http://www.w3.org/ns/json-ld#expanded";
pub const PROFILE_COMPACTED: &str = "http://www.w3.org/ns/json-ld#compacted";
pub const PROFILE_CONTEXT: &str = "http://www.w3.org/ns/json-ld#context";
pub const PROFILE_FLATTENED: &str = "http://www.w3.org/ns/json-ld#flattened";

/// A retrieved remote context.
#[derive(Clone, Debug)]
pub struct RemoteContext {
	/// The URL the context was retrieved from, after following redirects.
	pub url: IriBuf,

	/// The value of the `@context` entry of the retrieved document, or the
	/// empty map if the document has none.
	pub context: Value,
}

/// Error raised by a [`Loader`], carrying the requested URL and the
/// original cause.
#[derive(Debug, thiserror::Error)]
#[error("`{url}`: {cause}")]
pub struct LoadError {
	pub url: IriBuf,
	pub cause: Box<dyn std::error::Error + Send + Sync>,
}

impl LoadError {
	pub fn new(
		url: IriBuf,
		cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
	) -> Self {
		Self {
			url,
			cause: cause.into(),
		}
	}
}

/// Retrieves remote contexts.
///
/// The loader owns all HTTP-level behaviour: requesting
/// `application/ld+json` with the [`PROFILE_CONTEXT`] profile, following
/// redirects, caching, retries and request deduplication. It must return a
/// deterministic result for a given IRI. Contexts should not change for the
/// lifetime of the application, so caching the returned [`RemoteContext`]
/// is strongly recommended.
pub trait Loader {
	#[allow(async_fn_in_trait)]
	async fn load(&self, url: &Iri) -> Result<RemoteContext, LoadError>;
}

/// A loader that refuses to load anything.
///
/// This is the default: without a real loader, remote contexts and
/// `@import` cannot be processed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLoader;

#[derive(Debug, thiserror::Error)]
#[error("no loader")]
pub struct CannotLoad;

impl Loader for NoLoader {
	async fn load(&self, url: &Iri) -> Result<RemoteContext, LoadError> {
		Err(LoadError::new(url.to_owned(), CannotLoad))
	}
}

/// Error returned when using a [`HashMap`] as a [`Loader`] and the
/// requested context is not present.
#[derive(Debug, thiserror::Error)]
#[error("context not found")]
pub struct EntryNotFound;

impl Loader for HashMap<IriBuf, RemoteContext> {
	async fn load(&self, url: &Iri) -> Result<RemoteContext, LoadError> {
		match self.get(url) {
			Some(document) => Ok(document.clone()),
			None => Err(LoadError::new(url.to_owned(), EntryNotFound)),
		}
	}
}
