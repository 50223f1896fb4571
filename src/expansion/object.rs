//! Object expansion.

use std::sync::Arc;

use iref::{Iri, IriBuf};
use json_syntax::Value;

use crate::context::processing::ContextOptions;
use crate::keyword::is_keyword;
use crate::loader::Loader;
use crate::node::Properties;
use crate::util;
use crate::warning::Warning;
use crate::{iri, ContainerKind, Context, Direction, Error, Node, Nullable, Processor};

impl<L: Loader> Processor<L> {
	pub(super) async fn expand_object(
		&self,
		active: &Arc<Context>,
		active_property: Option<&str>,
		object: &json_syntax::Object,
		base_url: Option<&Iri>,
		from_map: bool,
		prop_context: Option<(Value, Option<IriBuf>)>,
	) -> Result<Option<Vec<Node>>, Error> {
		let mut active = active.clone();

		// 7) Objects that did not arrive through a map container and do
		// not expand to a value or a lone reference revert to the
		// previous context.
		if active.previous_context.is_some() && !from_map {
			let has_value = self.expands_to_keyword(&active, "@value", object);
			let has_id = self.expands_to_keyword(&active, "@id", object);
			let entry_count = util::object_entries(object, false).len();

			if !has_value && !(entry_count == 1 && has_id) {
				active = active.previous_context.clone().unwrap();
			}
		}

		// 8) Property-scoped context.
		if let Some((context, context_base)) = prop_context {
			let opts = ContextOptions {
				override_protected: true,
				..ContextOptions::default()
			};

			if let Some(entered) = Box::pin(self.process_context_value(
				Some(&*active),
				&context,
				context_base.as_deref(),
				opts,
			))
			.await?
			{
				active = Arc::new(entered);
			}
		}

		// 9) Embedded context.
		if let Some(context) = util::get_entry(object, "@context") {
			if let Some(entered) = Box::pin(self.process_context_value(
				Some(&*active),
				context,
				base_url,
				ContextOptions::default(),
			))
			.await?
			{
				active = Arc::new(entered);
			}
		}

		// 10) The type-scoped context is the state at this point; `@type`
		// values are expanded against it.
		let type_scoped = active.clone();

		// 11) Find the `@type` entry and enter the scoped context of each
		// sorted type, with propagation disabled.
		let mut type_terms: Vec<String> = Vec::new();
		for (key, value) in util::object_entries(object, false) {
			match self.expand_iri(&active, key, false, true) {
				Ok(Some(expanded)) if expanded == "@type" => (),
				_ => continue,
			}

			match value {
				Value::String(s) => type_terms.push(s.as_str().to_string()),
				Value::Array(items) => {
					for item in items {
						match item {
							Value::String(s) => type_terms.push(s.as_str().to_string()),
							_ => return Err(Error::InvalidTypeValue),
						}
					}
				}
				_ => return Err(Error::InvalidTypeValue),
			}

			break;
		}

		type_terms.sort();

		for term in &type_terms {
			// The snapshot supplies the scoped context, the current
			// context supplies its base URL.
			let Some(context) = type_scoped.terms.get(term).and_then(|d| d.context.clone())
			else {
				continue;
			};
			let context_base = active.terms.get(term).and_then(|d| d.base_iri.clone());

			let opts = ContextOptions {
				propagate: false,
				..ContextOptions::default()
			};

			if let Some(entered) = Box::pin(self.process_context_value(
				Some(&*active),
				&context,
				context_base.as_deref(),
				opts,
			))
			.await?
			{
				active = Arc::new(entered);
			}
		}

		// 12) The input type decides `@json` literal handling.
		let input_type = match type_terms.last() {
			Some(term) => self.expand_iri(&active, term, false, true)?,
			None => None,
		};

		let mut result = Node::default();

		// 13) 14)
		self.expand_object_keys(
			&mut result,
			&active,
			&type_scoped,
			active_property,
			input_type.as_deref(),
			base_url,
			object,
		)
		.await?;

		// 15) Value object validation.
		if result.value.is_some() {
			if !result.is_value() {
				return Err(Error::InvalidValueObject);
			}

			if !result.types.is_empty()
				&& (result.language.is_some() || result.direction.is_some())
			{
				return Err(Error::InvalidValueObject);
			}

			if result.types != ["@json"] {
				if matches!(result.value, Some(Value::Null)) {
					return Ok(None);
				}

				if result.language.is_some()
					&& !matches!(result.value, Some(Value::String(_)))
				{
					return Err(Error::InvalidLanguageTaggedValue);
				}

				if result.types.len() > 1
					|| (result.types.len() == 1 && !iri::is_absolute(&result.types[0]))
				{
					return Err(Error::InvalidTypedValue);
				}
			}
		}

		// 17) Sets collapse; lists pass through.
		if result.set.is_some() || result.list.is_some() {
			if result.count_without(&["@index", "@list", "@set"]) != 0 {
				return Err(Error::InvalidSetOrListObject);
			}

			if let Some(set) = result.set.take() {
				return Ok(Some(set));
			}

			return Ok(Some(vec![result]));
		}

		// 18) A lone `@language` entry expands to nothing.
		if result.language.is_some() && result.len() == 1 {
			return Ok(None);
		}

		// 19)
		if active_property.is_none() || active_property == Some("@graph") {
			if result.is_empty()
				|| result.list.is_some()
				|| result.value.is_some()
				|| (result.len() == 1 && result.id.is_some())
			{
				return Ok(None);
			}
		}

		Ok(Some(vec![result]))
	}

	/// Steps 13 and 14 of object expansion: every key-value entry,
	/// followed by every collected `@nest`.
	#[allow(clippy::too_many_arguments)]
	async fn expand_object_keys(
		&self,
		result: &mut Node,
		active: &Arc<Context>,
		type_scoped: &Arc<Context>,
		active_property: Option<&str>,
		input_type: Option<&str>,
		base_url: Option<&Iri>,
		object: &json_syntax::Object,
	) -> Result<(), Error> {
		let entries = util::object_entries(object, self.ordered);
		let mut nests: Vec<&str> = Vec::new();

		// 13)
		'entries: for (key, value) in &entries {
			let key = *key;
			let value = *value;

			// 13.1)
			if key == "@context" {
				continue;
			}

			// 13.2)
			let Some(exp_prop) = self.expand_iri(&active, key, false, true)? else {
				continue;
			};

			// 13.3)
			if !is_keyword(&exp_prop) && !exp_prop.contains(':') {
				continue;
			}

			// 13.4)
			if is_keyword(&exp_prop) {
				// 13.4.1)
				if active_property == Some("@reverse") {
					return Err(Error::InvalidReversePropertyMap);
				}

				// 13.4.2) In 1.1 mode only `@included` and `@type` may
				// collide.
				if result.has(&exp_prop)
					&& (self.mode_1_0()
						|| (exp_prop != "@included" && exp_prop != "@type"))
				{
					return Err(Error::CollidingKeywords);
				}

				match exp_prop.as_str() {
					"@id" => {
						// 13.4.3)
						let id = match value {
							Value::String(s) => s.as_str(),
							_ => return Err(Error::InvalidIdValue),
						};

						if id.is_empty() {
							return Err(Error::InvalidIdValue);
						}

						// An expansion to nothing would stand in for a
						// null id, which expanded form cannot represent.
						let expanded = self
							.expand_iri(&active, id, true, false)?
							.ok_or(Error::InvalidIdValue)?;

						result.id = Some(expanded);
					}
					"@type" => {
						// 13.4.4)
						let values: Vec<&str> = match value {
							Value::String(s) => vec![s.as_str()],
							Value::Array(items) => {
								let mut values = Vec::with_capacity(items.len());
								for item in items {
									match item {
										Value::String(s) => values.push(s.as_str()),
										_ => return Err(Error::InvalidTypeValue),
									}
								}
								values
							}
							_ => return Err(Error::InvalidTypeValue),
						};

						for value in values {
							if let Some(expanded) =
								self.expand_iri(type_scoped, value, true, true)?
							{
								result.types.push(expanded);
							}
						}
					}
					"@graph" => {
						// 13.4.5)
						result.graph = Box::pin(self.expand_element(
							&active,
							Some("@graph"),
							value,
							base_url,
							false,
						))
						.await?;
					}
					"@included" => {
						// 13.4.6)
						if self.mode_1_0() {
							continue 'entries;
						}

						if !matches!(value, Value::Object(_) | Value::Array(_)) {
							return Err(Error::InvalidIncludedValue);
						}

						let included = Box::pin(self.expand_element(
							&active,
							None,
							value,
							base_url,
							false,
						))
						.await?
						.ok_or(Error::InvalidIncludedValue)?;

						for element in &included {
							if !element.is_node_object() {
								return Err(Error::InvalidIncludedValue);
							}
						}

						result
							.included
							.get_or_insert_with(Vec::new)
							.extend(included);
					}
					"@value" => {
						// 13.4.7) With an `@json` input type the raw
						// value is preserved verbatim.
						if input_type == Some("@json") {
							if self.mode_1_0() {
								return Err(Error::InvalidValueObjectValue);
							}
							result.value = Some(value.clone());
							continue 'entries;
						}

						if !util::is_scalar(value) && !matches!(value, Value::Null) {
							return Err(Error::InvalidValueObjectValue);
						}

						result.value = Some(value.clone());
					}
					"@language" => {
						// 13.4.8)
						let language = match value {
							Value::String(s) => s.as_str(),
							_ => return Err(Error::InvalidLanguageTaggedString),
						};

						result.language = Some(language.to_lowercase());
					}
					"@direction" => {
						// 13.4.9)
						if self.mode_1_0() {
							continue 'entries;
						}

						let direction = match value {
							Value::String(s) => s.as_str(),
							_ => return Err(Error::InvalidBaseDirection),
						};

						result.direction = Some(
							Direction::try_from(direction)
								.map_err(|_| Error::InvalidBaseDirection)?,
						);
					}
					"@index" => {
						// 13.4.10)
						let index = match value {
							Value::String(s) => s.as_str(),
							_ => return Err(Error::InvalidIndexValue),
						};

						result.index = Some(index.to_string());
					}
					"@list" => {
						// 13.4.11)
						if active_property.is_none()
							|| active_property == Some("@graph")
						{
							continue 'entries;
						}

						if matches!(value, Value::Array(items) if items.is_empty()) {
							result.list = Some(Vec::new());
						} else {
							result.list = Box::pin(self.expand_element(
								&active,
								active_property,
								value,
								base_url,
								false,
							))
							.await?;
						}
					}
					"@set" => {
						// 13.4.12)
						result.set = Box::pin(self.expand_element(
							&active,
							active_property,
							value,
							base_url,
							false,
						))
						.await?;
					}
					"@reverse" => {
						// 13.4.13)
						if !matches!(value, Value::Object(_)) {
							return Err(Error::InvalidReverseValue);
						}

						let expanded = Box::pin(self.expand_element(
							&active,
							Some("@reverse"),
							value,
							base_url,
							false,
						))
						.await?;

						for element in expanded.unwrap_or_default() {
							// 13.4.13.3) Reverse-of-reverse folds back
							// into forward properties.
							if let Some(reverse) = element.reverse {
								for (property, nodes) in reverse {
									result
										.properties
										.entry(property)
										.or_default()
										.extend(nodes);
								}
							}

							// 13.4.13.4)
							for (property, nodes) in element.properties {
								let reverse_map =
									result.reverse.get_or_insert_with(Properties::new);

								for item in nodes {
									if item.is_value() || item.is_list() {
										return Err(
											Error::InvalidReversePropertyValue,
										);
									}

									reverse_map
										.entry(property.clone())
										.or_default()
										.push(item);
								}
							}
						}

						continue 'entries;
					}
					"@nest" => {
						// 13.4.14) Remembered, expanded in step 14.
						if !nests.contains(&key) {
							nests.push(key);
						}

						continue 'entries;
					}
					other => {
						self.warn(Warning::UnhandledKeyword(other.to_string()));
					}
				}

				continue 'entries;
			}

			// 13.5)
			let term_def = active.terms.get(key);
			let container = term_def
				.map(|d| d.container.clone())
				.unwrap_or_default();
			let term_type = term_def.and_then(|d| d.typ.clone());
			let term_index = term_def.and_then(|d| d.index.clone());
			let term_reverse = term_def.map_or(false, |d| d.reverse);
			let term_direction = term_def.and_then(|d| d.direction.clone());

			let expanded_value: Option<Vec<Node>>;

			if term_type.as_deref() == Some("@json") {
				// 13.6) The value is an untouched JSON literal.
				expanded_value = Some(vec![Node {
					value: Some(value.clone()),
					types: vec!["@json".to_string()],
					..Default::default()
				}]);
			} else if container.contains(ContainerKind::Language)
				&& matches!(value, Value::Object(_))
			{
				// 13.7) Language map.
				let map = value.as_object().unwrap();
				let mut pairs = Vec::new();

				// 13.7.2)
				let direction = match &term_direction {
					Some(Nullable::Null) => None,
					Some(Nullable::Some(direction)) => Some(*direction),
					None => active.default_direction,
				};

				// 13.7.4)
				for (language_key, language_value) in
					util::object_entries(map, self.ordered)
				{
					let items: &[Value] = match language_value {
						Value::Array(items) => items,
						other => std::slice::from_ref(other),
					};

					for item in items {
						// 13.7.4.2.1)
						if matches!(item, Value::Null) {
							continue;
						}

						// 13.7.4.2.2)
						if !matches!(item, Value::String(_)) {
							return Err(Error::InvalidLanguageMapValue);
						}

						let mut node = Node {
							value: Some(item.clone()),
							..Default::default()
						};

						// 13.7.4.2.3) `@none` keys, aliased or not, omit
						// the language.
						let maps_to_none = active
							.terms
							.get(language_key)
							.and_then(|d| d.iri.as_deref())
							== Some("@none");

						if !maps_to_none && language_key != "@none" {
							// 13.7.4.2.4)
							node.language = Some(language_key.to_lowercase());
						}

						// 13.7.4.2.5)
						if let Some(direction) = direction {
							node.direction = Some(direction);
						}

						pairs.push(node);
					}
				}

				expanded_value = Some(pairs);
			} else if (container.contains(ContainerKind::Index)
				|| container.contains(ContainerKind::Type)
				|| container.contains(ContainerKind::Id))
				&& matches!(value, Value::Object(_))
			{
				// 13.8) Index, type or id map.
				let map = value.as_object().unwrap();
				let mut items_out = Vec::new();

				// 13.8.2)
				let index_key = term_index
					.clone()
					.unwrap_or_else(|| "@index".to_string());

				// 13.8.3)
				for (index, index_value) in util::object_entries(map, self.ordered) {
					// 13.8.3.1) 13.8.3.3) Id and type maps expand their
					// entries against the previous context.
					let mut map_ctx: Arc<Context> = if (container
						.contains(ContainerKind::Id)
						|| container.contains(ContainerKind::Type))
						&& active.previous_context.is_some()
					{
						active.previous_context.clone().unwrap()
					} else {
						active.clone()
					};

					// 13.8.3.2) A type map key carries its own scoped
					// context.
					if container.contains(ContainerKind::Type) {
						let scoped = map_ctx.terms.get(index).and_then(|d| {
							d.context.clone().map(|c| (c, d.base_iri.clone()))
						});

						if let Some((context, context_base)) = scoped {
							if let Some(entered) =
								Box::pin(self.process_context_value(
									Some(&*map_ctx),
									&context,
									context_base.as_deref(),
									ContextOptions::default(),
								))
								.await?
							{
								map_ctx = Arc::new(entered);
							}
						}
					}

					// 13.8.3.4)
					let exp_index = self.expand_iri(&active, index, false, true)?;

					// 13.8.3.5) 13.8.3.6)
					let wrapped = match index_value {
						Value::Array(_) => index_value.clone(),
						other => Value::Array(vec![other.clone()]),
					};

					let expanded_items = Box::pin(self.expand_element(
						&map_ctx,
						Some(key),
						&wrapped,
						base_url,
						true,
					))
					.await?
					.unwrap_or_default();

					// 13.8.3.7)
					for mut item in expanded_items {
						// 13.8.3.7.1)
						if container.contains(ContainerKind::Graph)
							&& item.graph.is_none()
						{
							item = Node {
								graph: Some(vec![item]),
								..Default::default()
							};
						}

						if exp_index.as_deref() != Some("@none") {
							if container.contains(ContainerKind::Index)
								&& index_key != "@index"
							{
								// 13.8.3.7.2) Property-valued index: the
								// index re-expands as a value of the
								// index property.
								let reexpanded = self.expand_value(
									&active,
									&index_key,
									&Value::String(index.into()),
								)?;

								let exp_index_key = self
									.expand_iri(&active, &index_key, false, true)?
									.unwrap_or_default();

								let mut values = vec![reexpanded];
								values.extend(
									item.properties
										.shift_remove(&exp_index_key)
										.unwrap_or_default(),
								);
								item.properties.insert(exp_index_key, values);

								// 13.8.3.7.2.5)
								if item.value.is_some() && !item.is_value() {
									return Err(Error::InvalidValueObject);
								}
							} else if container.contains(ContainerKind::Index)
								&& item.index.is_none()
							{
								// 13.8.3.7.3)
								item.index = Some(index.to_string());
							} else if container.contains(ContainerKind::Id)
								&& item.id.is_none()
							{
								// 13.8.3.7.4)
								item.id =
									self.expand_iri(&active, index, true, false)?;
							} else if container.contains(ContainerKind::Type) {
								// 13.8.3.7.5)
								if let Some(exp_index) = &exp_index {
									item.types.insert(0, exp_index.clone());
								}
							}
						}

						// 13.8.3.7.6)
						items_out.push(item);
					}
				}

				expanded_value = Some(items_out);
			} else {
				// 13.9)
				expanded_value = Box::pin(self.expand_element(
					&active,
					Some(key),
					value,
					base_url,
					false,
				))
				.await?;
			}

			// 13.10) `None` drops the entry; an empty sequence is kept.
			let Some(mut expanded_value) = expanded_value else {
				continue 'entries;
			};

			// 13.11)
			if container.contains(ContainerKind::List)
				&& !(expanded_value.len() == 1 && expanded_value[0].is_list())
			{
				expanded_value = vec![Node {
					list: Some(expanded_value),
					..Default::default()
				}];
			}

			// 13.12)
			if container.contains(ContainerKind::Graph)
				&& !container.contains(ContainerKind::Id)
				&& !container.contains(ContainerKind::Index)
			{
				expanded_value = expanded_value
					.into_iter()
					.map(|node| Node {
						graph: Some(vec![node]),
						..Default::default()
					})
					.collect();
			}

			// 13.13)
			if term_reverse {
				let reverse_map = result.reverse.get_or_insert_with(Properties::new);

				for node in expanded_value {
					// 13.13.4.1)
					if node.is_value() || node.is_list() {
						return Err(Error::InvalidReversePropertyValue);
					}

					reverse_map.entry(exp_prop.clone()).or_default().push(node);
				}
			} else {
				// 13.14) Also inserted when empty, so empty arrays are
				// preserved.
				match result.properties.get_mut(&exp_prop) {
					Some(existing) => existing.extend(expanded_value),
					None => {
						result.properties.insert(exp_prop.clone(), expanded_value);
					}
				}
			}
		}

		// 14) Nested properties.
		if self.ordered {
			nests.sort();
		}

		for nest_key in nests {
			let nest_value = util::get_entry(object, nest_key).unwrap();
			let nest_items: &[Value] = match nest_value {
				Value::Array(items) => items,
				other => std::slice::from_ref(other),
			};

			for item in nest_items {
				// 14.2.1)
				let Value::Object(nest_object) = item else {
					return Err(Error::InvalidNestValue);
				};

				if self.expands_to_keyword(active, "@value", nest_object) {
					return Err(Error::InvalidNestValue);
				}

				// 14.2.2)
				let scoped = active.terms.get(nest_key).and_then(|d| {
					d.context.clone().map(|c| (c, d.base_iri.clone()))
				});

				let nest_ctx = match scoped {
					Some((context, context_base)) => {
						let opts = ContextOptions {
							override_protected: true,
							..ContextOptions::default()
						};

						match Box::pin(self.process_context_value(
							Some(&*active),
							&context,
							context_base.as_deref(),
							opts,
						))
						.await?
						{
							Some(entered) => Arc::new(entered),
							None => active.clone(),
						}
					}
					None => active.clone(),
				};

				Box::pin(self.expand_object_keys(
					result,
					&nest_ctx,
					type_scoped,
					Some(nest_key),
					input_type,
					base_url,
					nest_object,
				))
				.await?;
			}
		}

		Ok(())
	}
}
