//! The IRI expansion algorithm.
//!
//! See <https://www.w3.org/TR/json-ld11-api/#iri-expansion>.

use indexmap::IndexMap;

use super::define::{DefineOptions, TermState};
use super::Context;
use crate::keyword::{is_keyword, is_keyword_like};
use crate::loader::Loader;
use crate::syntax::TermEntry;
use crate::warning::Warning;
use crate::{iri, Error, Processor};

impl<L> Processor<L> {
	/// Expands `value` to an IRI against the active context.
	///
	/// Returns `None` when the value must be dropped: keyword-lookalikes
	/// and terms explicitly mapped to nothing.
	pub(crate) fn expand_iri(
		&self,
		active: &Context,
		value: &str,
		document_relative: bool,
		vocab: bool,
	) -> Result<Option<String>, Error> {
		// 1) Keywords expand to themselves.
		if is_keyword(value) {
			return Ok(Some(value.to_string()));
		}

		// 2) Keyword lookalikes are dropped.
		if is_keyword_like(value) {
			self.warn(Warning::KeywordLikeValue(value.to_string()));
			return Ok(None);
		}

		// 4) 5) A term definition whose IRI is a keyword always applies,
		// any other definition only under vocab expansion.
		if let Some(def) = active.terms.get(value) {
			if def.iri.as_deref().map(is_keyword).unwrap_or(false) || vocab {
				return Ok(def.iri.clone());
			}
		}

		// 6) Compact IRI, blank node identifier, or already absolute.
		if let Some(i) = value.find(':') {
			if i >= 1 {
				let (prefix, rest) = value.split_at(i);
				let suffix = &rest[1..];

				// 6.2)
				if prefix == "_" || suffix.starts_with("//") {
					return Ok(Some(value.to_string()));
				}

				// 6.4)
				if let Some(def) = active.terms.get(prefix) {
					if def.prefix {
						if let Some(mapping) = &def.iri {
							return Ok(Some(format!("{mapping}{suffix}")));
						}
					}
				}

				// 6.5)
				if iri::is_absolute(value) {
					return Ok(Some(value.to_string()));
				}
			}
		}

		// 7)
		if vocab {
			if let Some(mapping) = &active.vocab_mapping {
				return Ok(Some(format!("{mapping}{value}")));
			}
		}

		// 8)
		if document_relative {
			if let Some(base) = active.base_iri() {
				if let Some(resolved) = iri::resolve(base, value) {
					return Ok(Some(resolved.to_string()));
				}
			}
		}

		Ok(Some(value.to_string()))
	}
}

impl<L: Loader> Processor<L> {
	/// IRI expansion during context processing: values naming pending
	/// local-context terms trigger their definition first.
	#[allow(clippy::too_many_arguments)]
	pub(crate) async fn expand_iri_with(
		&self,
		active: &mut Context,
		value: &str,
		document_relative: bool,
		vocab: bool,
		local: &IndexMap<String, TermEntry>,
		defined: &mut std::collections::HashMap<String, TermState>,
	) -> Result<Option<String>, Error> {
		// 1)
		if is_keyword(value) {
			return Ok(Some(value.to_string()));
		}

		// 2)
		if is_keyword_like(value) {
			self.warn(Warning::KeywordLikeValue(value.to_string()));
			return Ok(None);
		}

		// 3) Pending term definition.
		if local.contains_key(value) && defined.get(value) != Some(&TermState::Defined) {
			Box::pin(self.create_term(active, local, value, defined, DefineOptions::default()))
				.await?;
		}

		// 4) 5)
		if let Some(def) = active.terms.get(value) {
			if def.iri.as_deref().map(is_keyword).unwrap_or(false) || vocab {
				return Ok(def.iri.clone());
			}
		}

		// 6)
		if let Some(i) = value.find(':') {
			if i >= 1 {
				let (prefix, rest) = value.split_at(i);
				let suffix = &rest[1..];

				// 6.2)
				if prefix == "_" || suffix.starts_with("//") {
					return Ok(Some(value.to_string()));
				}

				// 6.3) Pending prefix definition.
				if local.contains_key(prefix)
					&& defined.get(prefix) != Some(&TermState::Defined)
				{
					Box::pin(self.create_term(
						active,
						local,
						prefix,
						defined,
						DefineOptions::default(),
					))
					.await?;
				}

				// 6.4)
				if let Some(def) = active.terms.get(prefix) {
					if def.prefix {
						if let Some(mapping) = &def.iri {
							return Ok(Some(format!("{mapping}{suffix}")));
						}
					}
				}

				// 6.5)
				if iri::is_absolute(value) {
					return Ok(Some(value.to_string()));
				}
			}
		}

		// 7)
		if vocab {
			if let Some(mapping) = &active.vocab_mapping {
				return Ok(Some(format!("{mapping}{value}")));
			}
		}

		// 8)
		if document_relative {
			if let Some(base) = active.base_iri() {
				if let Some(resolved) = iri::resolve(base, value) {
					return Ok(Some(resolved.to_string()));
				}
			}
		}

		Ok(Some(value.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use json_syntax::Parse;

	use crate::Processor;

	#[async_std::test]
	async fn prefix_concatenation() {
		let (context, _) =
			json_syntax::Value::parse_str(r#"{"ex": "https://example.org/ns#"}"#).unwrap();

		let processor = Processor::new();
		let context = processor.context(&context, None).await.unwrap().unwrap();

		for suffix in ["name", "a/b", "x?y"] {
			let value = format!("ex:{suffix}");
			let expanded = processor
				.expand_iri(&context, &value, false, true)
				.unwrap()
				.unwrap();
			assert_eq!(expanded, format!("https://example.org/ns#{suffix}"));
		}
	}

	#[async_std::test]
	async fn keywords_expand_to_themselves() {
		let processor = Processor::new();
		let context = crate::Context::new(None);

		assert_eq!(
			processor.expand_iri(&context, "@type", false, true).unwrap(),
			Some("@type".to_string())
		);
	}

	#[async_std::test]
	async fn keyword_lookalike_values_are_dropped() {
		let processor = Processor::new();
		let context = crate::Context::new(None);

		assert_eq!(
			processor.expand_iri(&context, "@foo", false, true).unwrap(),
			None
		);
	}

	#[async_std::test]
	async fn blank_node_identifiers_pass_through() {
		let processor = Processor::new();
		let context = crate::Context::new(None);

		assert_eq!(
			processor.expand_iri(&context, "_:b0", false, true).unwrap(),
			Some("_:b0".to_string())
		);
	}
}
