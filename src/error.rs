use crate::loader::LoadError;

/// Errors raised by the processing algorithms.
///
/// Every failure mode is an enumerated kind; the `#[error]` message is the
/// canonical string for that kind.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid local context")]
	InvalidLocalContext,

	#[error("invalid remote context")]
	InvalidRemoteContext,

	#[error("invalid term definition")]
	InvalidTermDefinition,

	#[error("invalid IRI mapping")]
	InvalidIriMapping,

	#[error("invalid type mapping")]
	InvalidTypeMapping,

	#[error("invalid reverse property")]
	InvalidReverseProperty,

	#[error("invalid reverse property value")]
	InvalidReversePropertyValue,

	#[error("invalid reverse property map")]
	InvalidReversePropertyMap,

	#[error("invalid @reverse value")]
	InvalidReverseValue,

	#[error("invalid container mapping")]
	InvalidContainerMapping,

	#[error("invalid language mapping")]
	InvalidLanguageMapping,

	#[error("invalid language-tagged value")]
	InvalidLanguageTaggedValue,

	#[error("invalid language-tagged string")]
	InvalidLanguageTaggedString,

	#[error("invalid language map value")]
	InvalidLanguageMapValue,

	#[error("invalid @index value")]
	InvalidIndexValue,

	#[error("invalid @included value")]
	InvalidIncludedValue,

	#[error("invalid @import value")]
	InvalidImportValue,

	#[error("invalid base IRI")]
	InvalidBaseIri,

	#[error("invalid base direction")]
	InvalidBaseDirection,

	#[error("invalid vocab mapping")]
	InvalidVocabMapping,

	#[error("invalid default language")]
	InvalidDefaultLanguage,

	#[error("invalid @version value")]
	InvalidVersionValue,

	#[error("invalid @propagate value")]
	InvalidPropagateValue,

	#[error("invalid @protected value")]
	InvalidProtectedValue,

	#[error("invalid @prefix value")]
	InvalidPrefixValue,

	#[error("invalid @nest value")]
	InvalidNestValue,

	#[error("invalid keyword alias")]
	InvalidKeywordAlias,

	#[error("invalid context entry")]
	InvalidContextEntry,

	#[error("invalid context nullification")]
	InvalidContextNullification,

	#[error("invalid scoped context")]
	InvalidScopedContext,

	#[error("invalid set or list object")]
	InvalidSetOrListObject,

	#[error("invalid value object")]
	InvalidValueObject,

	#[error("invalid value object value")]
	InvalidValueObjectValue,

	#[error("invalid typed value")]
	InvalidTypedValue,

	#[error("invalid @id value")]
	InvalidIdValue,

	#[error("invalid type value")]
	InvalidTypeValue,

	#[error("keyword redefinition")]
	KeywordRedefinition,

	#[error("colliding keywords")]
	CollidingKeywords,

	#[error("cyclic IRI mapping")]
	CyclicIriMapping,

	#[error("protected term redefinition")]
	ProtectedTermRedefinition,

	#[error("recursive context inclusion")]
	RecursiveContextInclusion,

	#[error("context overflow")]
	ContextOverflow,

	#[error("processing mode conflict")]
	ProcessingModeConflict,

	#[error("IRI confused with prefix")]
	IriConfusedWithPrefix,

	#[error("loading document failed")]
	LoadingDocumentFailed,

	#[error("loading remote context failed: {0}")]
	LoadingRemoteContextFailed(#[from] LoadError),

	#[error("compaction to list of lists")]
	CompactionToListOfLists,

	/// Compaction input carrying `@preserve` implies framing, which is
	/// out of scope.
	#[error("@preserve not supported")]
	PreserveNotSupported,

	/// Raised when the `validate_context` predicate rejects a processed
	/// context.
	#[error("invalid context")]
	InvalidContext,
}
