//! Processed contexts and the context processing algorithms.

mod definition;
pub(crate) mod define;
pub(crate) mod inverse;
pub(crate) mod iri_expansion;
pub(crate) mod processing;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use iref::{Iri, IriBuf};
use once_cell::sync::OnceCell;

use crate::Direction;

pub use definition::TermDefinition;
use inverse::InverseContext;

/// The recursion limit for resolving remote contexts.
pub const REMOTE_CONTEXT_LIMIT: usize = 10;

/// A processed JSON-LD context.
///
/// A context is mutated only during the context-processing call that builds
/// it; afterwards it is treated as immutable and may be shared. Descendant
/// processing calls clone it before mutating, so parent state stays intact.
pub struct Context {
	pub(crate) terms: HashMap<String, TermDefinition>,
	pub(crate) protected: HashSet<String>,
	pub(crate) current_base_iri: Option<IriBuf>,
	pub(crate) original_base_iri: Option<IriBuf>,
	pub(crate) vocab_mapping: Option<String>,
	pub(crate) default_language: Option<String>,
	pub(crate) default_direction: Option<Direction>,
	pub(crate) previous_context: Option<Arc<Context>>,
	pub(crate) inverse: OnceCell<InverseContext>,
}

impl Context {
	/// Creates a new context with the given document URL as both the
	/// current and the original base IRI.
	pub fn new(base_iri: Option<IriBuf>) -> Self {
		Self {
			terms: HashMap::new(),
			protected: HashSet::new(),
			current_base_iri: base_iri.clone(),
			original_base_iri: base_iri,
			vocab_mapping: None,
			default_language: None,
			default_direction: None,
			previous_context: None,
			inverse: OnceCell::new(),
		}
	}

	/// Returns the definition of the given term, if any.
	pub fn term(&self, term: &str) -> Option<&TermDefinition> {
		self.terms.get(term)
	}

	/// Returns an iterator over the term definitions.
	pub fn terms(&self) -> impl Iterator<Item = (&str, &TermDefinition)> {
		self.terms.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Returns a copy of the term map. Modifying it does not modify the
	/// context.
	pub fn term_map(&self) -> HashMap<String, TermDefinition> {
		self.terms.clone()
	}

	/// The current base IRI.
	pub fn base_iri(&self) -> Option<&Iri> {
		self.current_base_iri.as_deref()
	}

	/// The base IRI originally supplied for the document.
	pub fn original_base_iri(&self) -> Option<&Iri> {
		self.original_base_iri.as_deref()
	}

	/// The `@vocab` mapping.
	pub fn vocab_mapping(&self) -> Option<&str> {
		self.vocab_mapping.as_deref()
	}

	/// The default `@language`, lowercased.
	pub fn default_language(&self) -> Option<&str> {
		self.default_language.as_deref()
	}

	/// The default `@direction`.
	pub fn default_direction(&self) -> Option<Direction> {
		self.default_direction
	}

	/// The context restored when propagation is disabled.
	pub fn previous_context(&self) -> Option<&Context> {
		self.previous_context.as_deref()
	}

	/// Checks if the context contains any protected term definition.
	pub fn has_protected_terms(&self) -> bool {
		!self.protected.is_empty()
	}

	/// Checks if the context is in a state where it can be swapped out
	/// with a pre-processed cached context.
	pub(crate) fn is_blank(&self) -> bool {
		self.terms.is_empty()
			&& self.protected.is_empty()
			&& self.previous_context.is_none()
			&& self.vocab_mapping.is_none()
			&& self.default_language.is_none()
			&& self.default_direction.is_none()
			&& self.inverse.get().is_none()
	}

	/// The inverse of this context, built on first use.
	pub(crate) fn inverse(&self) -> &InverseContext {
		self.inverse.get_or_init(|| InverseContext::new(self))
	}
}

impl Clone for Context {
	fn clone(&self) -> Self {
		Self {
			terms: self.terms.clone(),
			protected: self.protected.clone(),
			current_base_iri: self.current_base_iri.clone(),
			original_base_iri: self.original_base_iri.clone(),
			vocab_mapping: self.vocab_mapping.clone(),
			default_language: self.default_language.clone(),
			default_direction: self.default_direction,
			previous_context: self.previous_context.clone(),
			inverse: OnceCell::new(),
		}
	}
}

impl PartialEq for Context {
	fn eq(&self, other: &Self) -> bool {
		self.terms == other.terms
			&& self.protected == other.protected
			&& self.current_base_iri == other.current_base_iri
			&& self.original_base_iri == other.original_base_iri
			&& self.vocab_mapping == other.vocab_mapping
			&& self.default_language == other.default_language
			&& self.default_direction == other.default_direction
			&& self.previous_context == other.previous_context
	}
}

impl std::fmt::Debug for Context {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("Context")
			.field("terms", &self.terms)
			.field("protected", &self.protected)
			.field("current_base_iri", &self.current_base_iri)
			.field("original_base_iri", &self.original_base_iri)
			.field("vocab_mapping", &self.vocab_mapping)
			.field("default_language", &self.default_language)
			.field("default_direction", &self.default_direction)
			.field("previous_context", &self.previous_context)
			.finish_non_exhaustive()
	}
}
