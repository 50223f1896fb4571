//! IRI compaction and term selection.
//!
//! See <https://www.w3.org/TR/json-ld11-api/#iri-compaction>.

use std::cmp::Ordering;

use iref::Iri;

use crate::context::inverse::{shortest_then_lexical, TypeLanguage};
use crate::keyword::is_keyword_like;
use crate::{iri, Context, Error, Node, Processor};

/// The value whose shape guides the term selection, when there is one.
///
/// An empty array is neither absent nor a node: it selects like a
/// reference but never wins the prefix-candidate tie-break.
#[derive(Clone, Copy)]
pub(crate) enum IriCompactionValue<'a> {
	None,
	Node(&'a Node),
	EmptyArray,
}

impl<L> Processor<L> {
	pub(crate) fn compact_iri(
		&self,
		active: &Context,
		key: &str,
		value: IriCompactionValue<'_>,
		vocab: bool,
		reverse: bool,
	) -> Result<String, Error> {
		// 1)
		if key.is_empty() {
			return Ok(String::new());
		}

		// Blank node identifiers and excluded IRIs bypass compaction.
		if key.starts_with("_:") {
			return Ok(key.to_string());
		}

		if self.exclude_iris_from_compaction.iter().any(|iri| iri == key) {
			return Ok(key.to_string());
		}

		// 2) 3)
		let inverse = active.inverse();

		let node = match value {
			IriCompactionValue::Node(node) => Some(node),
			_ => None,
		};

		// 4)
		if vocab && inverse.contains_iri(key) {
			// 4.1)
			let default_language = if let Some(direction) = active.default_direction {
				format!(
					"{}_{}",
					active.default_language.as_deref().unwrap_or(""),
					direction
				)
			} else if let Some(language) = &active.default_language {
				format!("_{language}")
			} else {
				"@none".to_string()
			};

			// 4.3)
			let mut containers: Vec<String> = Vec::with_capacity(8);

			// 4.4)
			let mut type_language = TypeLanguage::Language;
			let mut type_language_value = "@null".to_string();

			// 4.5)
			if let Some(object) = node {
				if object.index.is_some() && !object.is_graph() {
					containers.push("@index".to_string());
					containers.push("@index@set".to_string());
				}
			}

			if reverse {
				// 4.6)
				type_language = TypeLanguage::Type;
				type_language_value = "@reverse".to_string();
				containers.push("@set".to_string());
			} else if let Some(object) = node.filter(|o| o.is_list()) {
				// 4.7)
				if object.index.is_none() {
					containers.push("@list".to_string());
				}

				let list = object.list.as_deref().unwrap();

				// 4.7.3)
				let mut common_language: Option<String> = if list.is_empty() {
					Some(default_language.clone())
				} else {
					None
				};
				let mut common_type: Option<String> = None;

				// 4.7.4)
				for item in list {
					let mut item_language = "@none".to_string();
					let mut item_type = "@none".to_string();

					if item.is_value() {
						if let Some(direction) = item.direction {
							item_language = match &item.language {
								Some(language) => format!("{language}_{direction}"),
								None => format!("_{direction}"),
							};
						} else if let Some(language) = &item.language {
							item_language = language.clone();
						} else if !item.types.is_empty() {
							item_type = item.types[0].clone();
						} else {
							item_language = "@null".to_string();
						}
					} else {
						item_type = "@id".to_string();
					}

					match &common_language {
						None => common_language = Some(item_language),
						Some(common) if *common != item_language => {
							common_language = Some("@none".to_string())
						}
						_ => (),
					}

					match &common_type {
						None => common_type = Some(item_type),
						Some(common) if *common != item_type => {
							common_type = Some("@none".to_string())
						}
						_ => (),
					}

					// 4.7.4.8)
					if common_language.as_deref() == Some("@none")
						&& common_type.as_deref() == Some("@none")
					{
						break;
					}
				}

				let common_language =
					common_language.unwrap_or_else(|| "@none".to_string());
				let common_type = common_type.unwrap_or_else(|| "@none".to_string());

				if common_type != "@none" {
					// 4.7.7)
					type_language = TypeLanguage::Type;
					type_language_value = common_type;
				} else {
					// 4.7.8)
					type_language_value = common_language;
				}
			} else if let Some(object) = node.filter(|o| o.is_graph()) {
				// 4.8)
				if object.index.is_some() {
					containers.push("@graph@index".to_string());
					containers.push("@graph@index@set".to_string());
				}

				if object.id.is_some() {
					containers.push("@graph@id".to_string());
					containers.push("@graph@id@set".to_string());
				}

				containers.push("@graph".to_string());
				containers.push("@graph@set".to_string());
				containers.push("@set".to_string());

				if object.index.is_none() {
					containers.push("@graph@index".to_string());
					containers.push("@graph@index@set".to_string());
				}

				if object.id.is_none() {
					containers.push("@graph@id".to_string());
					containers.push("@graph@id@set".to_string());
				}

				containers.push("@index".to_string());
				containers.push("@index@set".to_string());

				type_language = TypeLanguage::Type;
				type_language_value = "@id".to_string();
			} else {
				// 4.9)
				if let Some(object) = node.filter(|o| o.is_value()) {
					if object.direction.is_some() && object.index.is_none() {
						let direction = object.direction.unwrap();
						type_language_value = match &object.language {
							Some(language) => format!("{language}_{direction}"),
							None => format!("_{direction}"),
						};
						containers.push("@language".to_string());
						containers.push("@language@set".to_string());
					} else if object.language.is_some() && object.index.is_none() {
						type_language_value = object.language.clone().unwrap();
						containers.push("@language".to_string());
						containers.push("@language@set".to_string());
					} else if !object.types.is_empty() {
						type_language = TypeLanguage::Type;
						type_language_value = object.types[0].clone();
					}
				} else {
					// 4.9.3)
					type_language = TypeLanguage::Type;
					type_language_value = "@id".to_string();
					containers.push("@id".to_string());
					containers.push("@id@set".to_string());
					containers.push("@type".to_string());
					containers.push("@set@type".to_string());
				}

				containers.push("@set".to_string());
			}

			// 4.10)
			containers.push("@none".to_string());

			// 4.11) 4.12)
			if !self.mode_1_0() {
				if node.map_or(true, |o| o.index.is_none()) {
					containers.push("@index".to_string());
					containers.push("@index@set".to_string());
				}

				if node.map_or(false, |o| o.is_value() && o.len() == 1) {
					containers.push("@language".to_string());
					containers.push("@language@set".to_string());
				}
			}

			// 4.13)
			if type_language_value.is_empty() {
				type_language_value = "@null".to_string();
			}

			// 4.14)
			let mut preferred: Vec<String> = Vec::with_capacity(4);

			// 4.15)
			if type_language_value == "@reverse" {
				preferred.push("@reverse".to_string());
			}

			let id_match = node.map_or(false, |o| o.id.is_some())
				&& (type_language_value == "@id" || type_language_value == "@reverse");

			if id_match {
				// 4.16) Pick the order based on whether the id already
				// compacts to a matching term.
				let id = node.unwrap().id.as_deref().unwrap();
				let compacted =
					self.compact_iri(active, id, IriCompactionValue::None, true, false)?;
				let id_has_term = active
					.terms
					.get(&compacted)
					.and_then(|d| d.iri.as_deref())
					== Some(id);

				if id_has_term {
					preferred.push("@vocab".to_string());
					preferred.push("@id".to_string());
					preferred.push("@none".to_string());
				} else {
					preferred.push("@id".to_string());
					preferred.push("@vocab".to_string());
					preferred.push("@none".to_string());
				}
			} else {
				// 4.17)
				preferred.push(type_language_value.clone());
				preferred.push("@none".to_string());

				if node.map_or(false, |o| {
					o.is_list() && o.list.as_deref().unwrap().is_empty()
				}) {
					type_language = TypeLanguage::Any;
				}
			}

			// 4.18)
			preferred.push("@any".to_string());

			// 4.19) Each lang_dir compound also contributes its bare
			// direction.
			let extra: Vec<String> = preferred
				.iter()
				.filter_map(|p| p.find('_').map(|i| p[i..].to_string()))
				.collect();
			preferred.extend(extra);

			// 4.20) 4.21)
			if let Some(term) = inverse.select(key, &containers, type_language, &preferred)
			{
				return Ok(term.to_string());
			}
		}

		// 5) Strip the vocabulary mapping if the remainder is not itself
		// a term.
		if vocab {
			if let Some(mapping) = &active.vocab_mapping {
				if !mapping.is_empty() && key.len() > mapping.len() {
					if let Some(suffix) = key.strip_prefix(mapping.as_str()) {
						if !active.terms.contains_key(suffix) {
							return Ok(suffix.to_string());
						}
					}
				}
			}
		}

		// 6) 7) The shortest compact IRI through any prefix term.
		let mut compact_iri = String::new();

		let mut term_names: Vec<&String> = active.terms.keys().collect();
		term_names.sort_by(|a, b| shortest_then_lexical(a, b));

		for term in term_names {
			let def = &active.terms[term.as_str()];

			// 7.1)
			let Some(mapping) = def.iri.as_deref() else {
				continue;
			};
			if mapping.is_empty() || mapping == key || !key.starts_with(mapping) || !def.prefix
			{
				continue;
			}

			// 7.2)
			let candidate = format!("{}:{}", term, &key[mapping.len()..]);

			// 7.3)
			match active.terms.get(&candidate) {
				None => {
					if compact_iri.is_empty()
						|| shortest_then_lexical(&candidate, &compact_iri)
							== Ordering::Less
					{
						compact_iri = candidate;
					}
				}
				Some(candidate_def) => {
					if candidate_def.iri.as_deref() == Some(key)
						&& matches!(value, IriCompactionValue::None)
					{
						compact_iri = candidate;
					}
				}
			}
		}

		// 8)
		if !compact_iri.is_empty() {
			return Ok(compact_iri);
		}

		if let Ok(key_iri) = Iri::new(key) {
			// 9) An IRI whose scheme collides with a prefix term cannot be
			// emitted verbatim.
			if key_iri.authority().is_none() {
				let scheme = key_iri.scheme().as_str();
				if let Some(def) = active.terms.get(scheme) {
					if def.prefix {
						return Err(Error::IriConfusedWithPrefix);
					}
				}
			}

			// 10) Relativise against the base.
			if !vocab && self.compact_to_relative {
				if let Some(base) = active.base_iri() {
					if let Some(relative) = iri::relative(base, key_iri) {
						if is_keyword_like(&relative) {
							return Ok(format!("./{relative}"));
						}
						return Ok(relative);
					}
				}
			}
		}

		// 11)
		Ok(key.to_string())
	}
}

#[cfg(test)]
mod tests {
	use json_syntax::Parse;

	use super::IriCompactionValue;
	use crate::Processor;

	#[async_std::test]
	async fn compaction_is_idempotent() {
		let (context, _) = json_syntax::Value::parse_str(
			r#"{"ex": "https://example.org/ns#", "name": "ex:name"}"#,
		)
		.unwrap();

		let processor = Processor::new();
		let context = processor.context(&context, None).await.unwrap().unwrap();

		for iri in [
			"https://example.org/ns#name",
			"https://example.org/ns#other",
			"https://unrelated.example/x",
		] {
			let compacted = processor
				.compact_iri(&context, iri, IriCompactionValue::None, true, false)
				.unwrap();
			let expanded = processor
				.expand_iri(&context, &compacted, true, true)
				.unwrap()
				.unwrap();
			let recompacted = processor
				.compact_iri(&context, &expanded, IriCompactionValue::None, true, false)
				.unwrap();

			assert_eq!(compacted, recompacted);
		}
	}

	#[async_std::test]
	async fn prefix_terms_yield_compact_iris() {
		let (context, _) =
			json_syntax::Value::parse_str(r#"{"ex": "https://example.org/ns#"}"#).unwrap();

		let processor = Processor::new();
		let context = processor.context(&context, None).await.unwrap().unwrap();

		assert_eq!(
			processor
				.compact_iri(
					&context,
					"https://example.org/ns#thing",
					IriCompactionValue::None,
					true,
					false,
				)
				.unwrap(),
			"ex:thing"
		);
	}
}
