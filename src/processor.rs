use std::collections::HashMap;

use iref::IriBuf;
use json_syntax::Value;

use crate::loader::NoLoader;
use crate::warning::{Discard, Warning, WarningHandler};
use crate::Context;

/// JSON-LD processing mode.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum ProcessingMode {
	/// JSON-LD 1.0: rejects all 1.1-only constructs and preserves the 1.0
	/// error codes.
	JsonLd1_0,

	/// JSON-LD 1.1, which also handles JSON-LD 1.0 documents.
	#[default]
	JsonLd1_1,
}

/// Predicate called after every context build; returning `false` fails the
/// build.
pub type ValidateContext = dyn Fn(&Context) -> bool + Send + Sync;

/// A JSON-LD processor.
///
/// An application should only ever need one. A processor is reusable
/// across documents and may be used concurrently on distinct documents as
/// long as its configuration is not mutated after construction; configure
/// it once with the `with_*` methods.
///
/// By default:
///   - the processing mode is JSON-LD 1.1;
///   - no loader is configured, so remote contexts and `@import` cannot be
///     processed — see [`Processor::with_loader`];
///   - arrays are compacted;
///   - IRIs may compact to relative IRIs;
///   - warnings are discarded.
pub struct Processor<L = NoLoader> {
	pub(crate) processing_mode: ProcessingMode,
	pub(crate) ordered: bool,
	pub(crate) base_iri: Option<IriBuf>,
	pub(crate) compact_arrays: bool,
	pub(crate) compact_to_relative: bool,
	pub(crate) loader: L,
	pub(crate) warnings: Box<dyn WarningHandler>,
	pub(crate) expand_context: Option<Value>,
	pub(crate) exclude_iris_from_compaction: Vec<String>,
	pub(crate) remap_prefix_iris: HashMap<String, String>,
	pub(crate) validate_context: Option<Box<ValidateContext>>,
	pub(crate) processed_contexts: HashMap<IriBuf, Context>,
}

impl Processor<NoLoader> {
	pub fn new() -> Self {
		Self {
			processing_mode: ProcessingMode::default(),
			ordered: false,
			base_iri: None,
			compact_arrays: true,
			compact_to_relative: true,
			loader: NoLoader,
			warnings: Box::new(Discard),
			expand_context: None,
			exclude_iris_from_compaction: Vec::new(),
			remap_prefix_iris: HashMap::new(),
			validate_context: None,
			processed_contexts: HashMap::new(),
		}
	}
}

impl Default for Processor<NoLoader> {
	fn default() -> Self {
		Self::new()
	}
}

impl<L> Processor<L> {
	/// Replaces the remote-context loader.
	pub fn with_loader<M>(self, loader: M) -> Processor<M> {
		Processor {
			processing_mode: self.processing_mode,
			ordered: self.ordered,
			base_iri: self.base_iri,
			compact_arrays: self.compact_arrays,
			compact_to_relative: self.compact_to_relative,
			loader,
			warnings: self.warnings,
			expand_context: self.expand_context,
			exclude_iris_from_compaction: self.exclude_iris_from_compaction,
			remap_prefix_iris: self.remap_prefix_iris,
			validate_context: self.validate_context,
			processed_contexts: self.processed_contexts,
		}
	}

	/// Sets the processing mode.
	pub fn with_processing_mode(mut self, mode: ProcessingMode) -> Self {
		self.processing_mode = mode;
		self
	}

	/// Forces lexicographic iteration over object entries, language maps
	/// and index maps. Typically only needed to stabilise test suites.
	pub fn with_ordered(mut self, ordered: bool) -> Self {
		self.ordered = ordered;
		self
	}

	/// Overrides the document URL for relative-IRI resolution.
	pub fn with_base_iri(mut self, iri: IriBuf) -> Self {
		self.base_iri = Some(iri);
		self
	}

	/// Sets whether single-valued arrays are reduced to their value where
	/// possible during compaction.
	pub fn with_compact_arrays(mut self, compact_arrays: bool) -> Self {
		self.compact_arrays = compact_arrays;
		self
	}

	/// Sets whether IRIs may compact to IRIs relative to the base.
	pub fn with_compact_to_relative(mut self, compact_to_relative: bool) -> Self {
		self.compact_to_relative = compact_to_relative;
		self
	}

	/// Installs a warning handler. Without one, warnings are discarded.
	pub fn with_warning_handler(
		mut self,
		handler: impl WarningHandler + 'static,
	) -> Self {
		self.warnings = Box::new(handler);
		self
	}

	/// Provides an additional out-of-band context folded into the initial
	/// active context during expansion.
	pub fn with_expand_context(mut self, context: Value) -> Self {
		self.expand_context = Some(context);
		self
	}

	/// Disables IRI compaction for the given IRI.
	pub fn with_compaction_excluded_iri(mut self, iri: impl Into<String>) -> Self {
		self.exclude_iris_from_compaction.push(iri.into());
		self
	}

	/// Remaps a prefix IRI during term creation. Prefixes are only
	/// remapped on an exact match.
	///
	/// This is useful to remap the incorrect `schema.org#` to
	/// `schema.org/`.
	pub fn with_remapped_prefix_iri(
		mut self,
		from: impl Into<String>,
		to: impl Into<String>,
	) -> Self {
		self.remap_prefix_iris.insert(from.into(), to.into());
		self
	}

	/// Installs a predicate validating every processed context.
	///
	/// This can be used when both JSON-LD aware and JSON-LD unaware
	/// consumers process the same messages, to insist that the normative
	/// term definitions are protected.
	pub fn with_validate_context(
		mut self,
		validate: impl Fn(&Context) -> bool + Send + Sync + 'static,
	) -> Self {
		self.validate_context = Some(Box::new(validate));
		self
	}

	/// Stores a pre-processed context for an IRI.
	///
	/// The cached context is used if and only if no terms have been
	/// defined yet and the first entry of the document's `@context` is a
	/// remote reference to that IRI. This amortises context processing
	/// across documents sharing a well-known remote context.
	pub fn with_processed_context(mut self, iri: IriBuf, context: Context) -> Self {
		self.processed_contexts.insert(iri, context);
		self
	}

	pub(crate) fn mode_1_0(&self) -> bool {
		self.processing_mode == ProcessingMode::JsonLd1_0
	}

	pub(crate) fn warn(&self, warning: Warning) {
		self.warnings.handle(warning)
	}
}
