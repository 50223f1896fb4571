//! The compaction algorithm.
//!
//! See <https://www.w3.org/TR/json-ld11-api/#compaction-algorithm>.

mod iri;
mod value;

use std::sync::Arc;

use iref::Iri;
use json_syntax::Value;

use crate::context::processing::ContextOptions;
use crate::loader::Loader;
use crate::node::nodes_to_json;
use crate::util;
use crate::{ContainerKind, Context, Error, Node, Processor};

pub(crate) use iri::IriCompactionValue;

/// An expanded element under compaction.
#[derive(Clone, Copy)]
enum Element<'a> {
	Array(&'a [Node]),
	Node(&'a Node),
}

/// Checks whether the supplied compaction context is worth re-emitting.
fn context_has_content(context: &Value) -> bool {
	match context {
		Value::Null => false,
		Value::Object(object) => !object.is_empty(),
		Value::Array(items) => !items.is_empty(),
		_ => true,
	}
}

/// Appends `value` under `key`, promoting the slot to an array when a value
/// is already present. `keep_array` keeps an array `value` as-is instead of
/// wrapping it when the slot is empty.
fn push_map_value(
	map: &mut json_syntax::Object,
	key: &str,
	value: Value,
	as_array: bool,
	keep_array: bool,
) {
	match util::take_entry(map, key) {
		Some(existing) => {
			let mut items = match existing {
				Value::Array(items) => items,
				other => vec![other],
			};
			items.push(value);
			map.insert(key.into(), Value::Array(items));
		}
		None => {
			let value = if as_array {
				if keep_array && value.is_array() {
					value
				} else {
					Value::Array(vec![value])
				}
			} else {
				value
			};
			map.insert(key.into(), value);
		}
	}
}

impl<L: Loader> Processor<L> {
	/// Compacts an expanded document against the given context value.
	///
	/// The context is re-emitted verbatim under `@context` when it has
	/// content.
	pub async fn compact(
		&self,
		context: &Value,
		document: &[Node],
		url: Option<&Iri>,
	) -> Result<Value, Error> {
		let processed = self.context(context, url).await?;

		if document.is_empty() {
			return Ok(Value::Object(json_syntax::Object::default()));
		}

		let Some(processed) = processed else {
			return Ok(nodes_to_json(document));
		};

		let active = Arc::new(processed);
		let compacted = self
			.compact_element(
				&active,
				None,
				Element::Array(document),
				self.compact_arrays,
				self.ordered,
			)
			.await?;

		match compacted {
			Value::Object(mut object) if self.compact_arrays => {
				if context_has_content(context) {
					object.insert_front("@context".into(), context.clone());
				}
				Ok(Value::Object(object))
			}
			other => {
				// A top-level array sits under the graph alias.
				let alias =
					self.compact_iri(&active, "@graph", IriCompactionValue::None, true, false)?;

				let mut object = json_syntax::Object::default();
				object.insert(alias.into(), other);

				if context_has_content(context) {
					object.insert_front("@context".into(), context.clone());
				}

				Ok(Value::Object(object))
			}
		}
	}

	/// Resolves the nesting target for a compacted property: either the
	/// result itself, or the sub-object named by the term's `@nest`.
	fn nest_target<'r>(
		&self,
		active: &Context,
		result: &'r mut json_syntax::Object,
		item_active_property: &str,
	) -> Result<&'r mut json_syntax::Object, Error> {
		let Some(nest) = active
			.terms
			.get(item_active_property)
			.and_then(|d| d.nest.clone())
		else {
			return Ok(result);
		};

		// The nest term must expand to `@nest`.
		if self.expand_iri(active, &nest, false, true)?.as_deref() != Some("@nest") {
			return Err(Error::InvalidNestValue);
		}

		if util::get_entry(result, &nest).is_none() {
			result.insert(
				nest.as_str().into(),
				Value::Object(json_syntax::Object::default()),
			);
		}

		let target = result
			.get_unique_mut(nest.as_str())
			.ok()
			.unwrap()
			.unwrap();
		Ok(target.as_object_mut().unwrap())
	}

	async fn compact_element(
		&self,
		active: &Arc<Context>,
		active_property: Option<&str>,
		element: Element<'_>,
		compact_arrays: bool,
		ordered: bool,
	) -> Result<Value, Error> {
		// 1)
		let type_scoped = active.clone();

		// 3)
		if let Element::Array(items) = element {
			let mut result: Vec<Value> = Vec::with_capacity(items.len());

			// 3.2)
			for item in items {
				let compacted = Box::pin(self.compact_element(
					active,
					active_property,
					Element::Node(item),
					compact_arrays,
					ordered,
				))
				.await?;
				result.push(compacted);
			}

			// 3.3)
			if result.len() != 1
				|| !compact_arrays
				|| active_property == Some("@graph")
				|| active_property == Some("@set")
			{
				return Ok(Value::Array(result));
			}

			let container = active_property
				.and_then(|p| active.terms.get(p))
				.map(|d| d.container.clone())
				.unwrap_or_default();
			if container.contains(ContainerKind::List)
				|| container.contains(ContainerKind::Set)
			{
				return Ok(Value::Array(result));
			}

			// 3.4)
			return Ok(result.into_iter().next().unwrap());
		}

		let Element::Node(object) = element else {
			unreachable!()
		};

		let mut active = active.clone();

		// The active property's definition is resolved before any
		// previous-context restoration, i.e. in the type-scoped context.
		let mut term_def = active_property.and_then(|p| active.terms.get(p)).cloned();

		// 5) A term-scoped context does not apply when processing new
		// node objects.
		if active.previous_context.is_some()
			&& !object.has("@value")
			&& (!object.has("@id") || object.len() > 1)
		{
			let previous = active.previous_context.clone().unwrap();
			active = previous;
		}

		// 6) Property-scoped context.
		let scoped = term_def
			.as_ref()
			.and_then(|d| d.context.clone().map(|c| (c, d.base_iri.clone())));
		if let Some((context, context_base)) = scoped {
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
				term_def = active_property.and_then(|p| active.terms.get(p)).cloned();
			}
		}

		let container = term_def
			.as_ref()
			.map(|d| d.container.clone())
			.unwrap_or_default();
		let term_type = term_def.as_ref().and_then(|d| d.typ.clone());

		// 7)
		if object.has("@value") || object.has("@id") {
			if term_type.as_deref() == Some("@json") {
				if let Some(value) = &object.value {
					return Ok(value.clone());
				}
			}

			if let Some(compacted) = self.compact_value(&active, active_property, object)? {
				return Ok(compacted);
			}
		}

		// 8)
		if object.is_list() && container.contains(ContainerKind::List) {
			return Box::pin(self.compact_element(
				&active,
				active_property,
				Element::Array(object.list.as_deref().unwrap()),
				compact_arrays,
				ordered,
			))
			.await;
		}

		// 9)
		let inside_reverse = active_property == Some("@reverse");

		// 10)
		let mut result = json_syntax::Object::default();

		// 11) Type-scoped contexts of the sorted compacted types.
		if object.has("@type") {
			let mut compacted_types = Vec::with_capacity(object.types.len());
			for t in &object.types {
				compacted_types.push(self.compact_iri(
					&active,
					t,
					IriCompactionValue::None,
					true,
					false,
				)?);
			}
			compacted_types.sort();

			// 11.1)
			for t in &compacted_types {
				let Some((context, context_base)) =
					type_scoped.terms.get(t).and_then(|d| {
						d.context.clone().map(|c| (c, d.base_iri.clone()))
					})
				else {
					continue;
				};

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
		}

		// 12)
		let mut expanded_properties = object.property_names();
		if ordered {
			expanded_properties.sort();
		}

		for expanded_property in expanded_properties {
			// 12.1)
			if expanded_property == "@id" {
				let id = object.id.as_deref().unwrap();
				let compacted =
					self.compact_iri(&active, id, IriCompactionValue::None, false, false)?;
				let alias =
					self.compact_iri(&active, "@id", IriCompactionValue::None, true, false)?;
				result.insert(alias.into(), Value::String(compacted.into()));
				continue;
			}

			// 12.2)
			if expanded_property == "@type" {
				// 12.2.1) 12.2.2) `@type` values compact against the
				// type-scoped context.
				let mut compacted = Vec::with_capacity(object.types.len());
				for t in &object.types {
					compacted.push(self.compact_iri(
						&type_scoped,
						t,
						IriCompactionValue::None,
						true,
						false,
					)?);
				}

				// 12.2.3)
				let alias =
					self.compact_iri(&active, "@type", IriCompactionValue::None, true, false)?;

				// 12.2.4)
				let mut as_array = !compact_arrays;
				if !self.mode_1_0() {
					if let Some(def) = active.terms.get(&alias) {
						if def.container.contains(ContainerKind::Set) {
							as_array = true;
						}
					}
				}

				// 12.2.5)
				let value = if as_array || compacted.len() > 1 {
					Value::Array(
						compacted
							.into_iter()
							.map(|t| Value::String(t.into()))
							.collect(),
					)
				} else {
					Value::String(compacted.into_iter().next().unwrap().into())
				};
				result.insert(alias.into(), value);
				continue;
			}

			// 12.3)
			if expanded_property == "@reverse" {
				let reverse = object.reverse.as_ref().unwrap();
				let mut merged = json_syntax::Object::default();
				let mut has_entries = false;

				for (property, nodes) in reverse {
					let mut reverse_node = Node::default();
					reverse_node
						.properties
						.insert(property.clone(), nodes.clone());

					let compacted = Box::pin(self.compact_element(
						&active,
						Some("@reverse"),
						Element::Node(&reverse_node),
						compact_arrays,
						ordered,
					))
					.await?;

					// 12.3.2) Properties bound to reverse terms move up
					// into the parent object.
					if let Value::Object(compacted_object) = compacted {
						for entry in compacted_object {
							let property = entry.key;
							let value = entry.value;

							let reverse_def = active
								.terms
								.get(property.as_str())
								.filter(|d| d.reverse);

							match reverse_def {
								Some(def) => {
									let as_array = !compact_arrays
										|| def.container.contains(ContainerKind::Set);
									let value = if as_array && !value.is_array() {
										Value::Array(vec![value])
									} else {
										value
									};
									util::set_entry(&mut result, property.as_str(), value);
								}
								None => {
									util::set_entry(&mut merged, property.as_str(), value);
									has_entries = true;
								}
							}
						}
					}
				}

				// 12.3.3)
				if has_entries {
					let alias = self.compact_iri(
						&active,
						"@reverse",
						IriCompactionValue::None,
						true,
						false,
					)?;
					result.insert(alias.into(), Value::Object(merged));
				}

				// 12.3.4)
				continue;
			}

			// 12.4)
			if expanded_property == "@preserve" {
				return Err(Error::PreserveNotSupported);
			}

			// 12.5) The index of an index container is recreated by the
			// container itself.
			if container.contains(ContainerKind::Index) && expanded_property == "@index" {
				continue;
			}

			// 12.6)
			if matches!(
				expanded_property,
				"@direction" | "@index" | "@language" | "@value"
			) {
				let alias = self.compact_iri(
					&active,
					expanded_property,
					IriCompactionValue::None,
					true,
					false,
				)?;

				let value = match expanded_property {
					"@direction" => {
						Value::String(object.direction.unwrap().as_str().into())
					}
					"@index" => Value::String(object.index.as_deref().unwrap().into()),
					"@language" => {
						Value::String(object.language.as_deref().unwrap().into())
					}
					_ => object.value.clone().unwrap_or(Value::Null),
				};

				result.insert(alias.into(), value);
				continue;
			}

			let empty: Vec<Node> = Vec::new();
			let expanded_value: &[Node] = match expanded_property {
				"@list" => object.list.as_deref().unwrap_or(&empty),
				"@graph" => object.graph.as_deref().unwrap_or(&empty),
				"@included" => object.included.as_deref().unwrap_or(&empty),
				_ => object
					.properties
					.get(expanded_property)
					.map(Vec::as_slice)
					.unwrap_or(&empty),
			};

			// 12.7) Empty arrays are preserved.
			if expanded_value.is_empty() {
				let item_active_property = self.compact_iri(
					&active,
					expanded_property,
					IriCompactionValue::EmptyArray,
					true,
					inside_reverse,
				)?;

				let nest_result =
					self.nest_target(&active, &mut result, &item_active_property)?;
				util::set_entry(nest_result, &item_active_property, Value::Array(Vec::new()));
			}

			// 12.8)
			for expanded_item in expanded_value {
				// 12.8.1)
				let item_active_property = self.compact_iri(
					&active,
					expanded_property,
					IriCompactionValue::Node(expanded_item),
					true,
					inside_reverse,
				)?;

				let item_def = active.terms.get(&item_active_property);
				// 12.8.4)
				let item_container = item_def
					.map(|d| d.container.clone())
					.unwrap_or_default();
				let item_type = item_def.and_then(|d| d.typ.clone());
				let item_index_key = item_def.and_then(|d| d.index.clone());

				// 12.8.5)
				let as_array = !compact_arrays
					|| item_active_property == "@list"
					|| item_active_property == "@graph"
					|| item_container.contains(ContainerKind::Set);

				// 12.8.6)
				let item_element = if expanded_item.is_list() {
					Element::Array(expanded_item.list.as_deref().unwrap())
				} else if expanded_item.is_graph() {
					Element::Array(expanded_item.graph.as_deref().unwrap())
				} else {
					Element::Node(expanded_item)
				};

				let mut compacted_item = Box::pin(self.compact_element(
					&active,
					Some(&item_active_property),
					item_element,
					compact_arrays,
					ordered,
				))
				.await?;

				// 12.8.7) Lists.
				if expanded_item.is_list() {
					if !compacted_item.is_array() {
						compacted_item = Value::Array(vec![compacted_item]);
					}

					if !item_container.contains(ContainerKind::List) {
						// 12.8.7.2) Wrap in an explicit list object.
						let list_alias = self.compact_iri(
							&active,
							"@list",
							IriCompactionValue::None,
							true,
							false,
						)?;

						let mut map = json_syntax::Object::default();
						map.insert(list_alias.into(), compacted_item);

						// 12.8.7.2.2)
						if let Some(index) = &expanded_item.index {
							let index_alias = self.compact_iri(
								&active,
								"@index",
								IriCompactionValue::None,
								true,
								false,
							)?;
							map.insert(
								index_alias.into(),
								Value::String(index.as_str().into()),
							);
						}

						// 12.8.7.2.3)
						let nest_result = self.nest_target(
							&active,
							&mut result,
							&item_active_property,
						)?;
						push_map_value(
							nest_result,
							&item_active_property,
							Value::Object(map),
							as_array,
							false,
						);
					} else {
						// 12.8.7.3) Only one list may live in a `@list`
						// container in 1.0 mode.
						let nest_result = self.nest_target(
							&active,
							&mut result,
							&item_active_property,
						)?;

						if self.mode_1_0()
							&& util::get_entry(nest_result, &item_active_property)
								.is_some()
						{
							return Err(Error::CompactionToListOfLists);
						}

						util::set_entry(
							nest_result,
							&item_active_property,
							compacted_item,
						);
					}

					continue;
				}

				// 12.8.8) Graphs.
				if expanded_item.is_graph() {
					let graph_container = item_container.contains(ContainerKind::Graph);

					if graph_container && item_container.contains(ContainerKind::Id) {
						// 12.8.8.1) Map keyed by `@id`, `@none` when
						// absent.
						let (key, vocab) = match &expanded_item.id {
							Some(id) => (id.clone(), false),
							None => ("@none".to_string(), true),
						};
						let map_key = self.compact_iri(
							&active,
							&key,
							IriCompactionValue::None,
							vocab,
							false,
						)?;

						let nest_result = self.nest_target(
							&active,
							&mut result,
							&item_active_property,
						)?;
						let map_object =
							entry_as_object(nest_result, &item_active_property);
						push_map_value(map_object, &map_key, compacted_item, as_array, true);
					} else if graph_container
						&& item_container.contains(ContainerKind::Index)
						&& expanded_item.is_simple_graph()
					{
						// 12.8.8.2) Map keyed by `@index`.
						let map_key = expanded_item
							.index
							.clone()
							.unwrap_or_else(|| "@none".to_string());

						let nest_result = self.nest_target(
							&active,
							&mut result,
							&item_active_property,
						)?;
						let map_object =
							entry_as_object(nest_result, &item_active_property);
						push_map_value(map_object, &map_key, compacted_item, as_array, true);
					} else if graph_container && expanded_item.is_simple_graph() {
						// 12.8.8.3) A multi-element compaction needs an
						// `@included` wrapper.
						let compacted_item = match compacted_item {
							Value::Array(items) if items.len() > 1 => {
								let alias = self.compact_iri(
									&active,
									"@included",
									IriCompactionValue::None,
									true,
									false,
								)?;
								let mut map = json_syntax::Object::default();
								map.insert(alias.into(), Value::Array(items));
								Value::Object(map)
							}
							other => other,
						};

						// 12.8.8.3.2)
						let nest_result = self.nest_target(
							&active,
							&mut result,
							&item_active_property,
						)?;

						match util::take_entry(nest_result, &item_active_property) {
							Some(existing) => {
								let mut items = match existing {
									Value::Array(items) => items,
									other => vec![other],
								};
								match compacted_item {
									Value::Array(more) => items.extend(more),
									other => items.push(other),
								}
								nest_result.insert(
									item_active_property.as_str().into(),
									Value::Array(items),
								);
							}
							None => {
								let value = if as_array && !compacted_item.is_array() {
									Value::Array(vec![compacted_item])
								} else {
									compacted_item
								};
								nest_result
									.insert(item_active_property.as_str().into(), value);
							}
						}
					} else {
						// 12.8.8.4) Wrap in an explicit graph object.
						let graph_alias = self.compact_iri(
							&active,
							"@graph",
							IriCompactionValue::None,
							true,
							false,
						)?;

						let mut map = json_syntax::Object::default();
						map.insert(graph_alias.into(), compacted_item);

						// 12.8.8.4.2)
						if let Some(id) = &expanded_item.id {
							let alias = self.compact_iri(
								&active,
								"@id",
								IriCompactionValue::None,
								true,
								false,
							)?;
							let compacted_id = self.compact_iri(
								&active,
								id,
								IriCompactionValue::None,
								false,
								false,
							)?;
							map.insert(alias.into(), Value::String(compacted_id.into()));
						}

						// 12.8.8.4.3)
						if let Some(index) = &expanded_item.index {
							let alias = self.compact_iri(
								&active,
								"@index",
								IriCompactionValue::None,
								true,
								false,
							)?;
							map.insert(alias.into(), Value::String(index.as_str().into()));
						}

						// 12.8.8.4.4)
						let nest_result = self.nest_target(
							&active,
							&mut result,
							&item_active_property,
						)?;
						push_map_value(
							nest_result,
							&item_active_property,
							Value::Object(map),
							as_array,
							false,
						);
					}

					continue;
				}

				// 12.8.9) Language, index, id and type maps.
				if !item_container.contains(ContainerKind::Graph)
					&& (item_container.contains(ContainerKind::Language)
						|| item_container.contains(ContainerKind::Index)
						|| item_container.contains(ContainerKind::Id)
						|| item_container.contains(ContainerKind::Type))
				{
					let key_keyword = if item_container.contains(ContainerKind::Language)
					{
						"@language"
					} else if item_container.contains(ContainerKind::Index) {
						"@index"
					} else if item_container.contains(ContainerKind::Id) {
						"@id"
					} else {
						"@type"
					};

					// 12.8.9.2)
					let mut container_key = self.compact_iri(
						&active,
						key_keyword,
						IriCompactionValue::None,
						true,
						false,
					)?;

					// 12.8.9.3)
					let index_key = item_index_key
						.clone()
						.unwrap_or_else(|| "@index".to_string());

					let mut map_key = String::new();

					if item_container.contains(ContainerKind::Language)
						&& expanded_item.is_value()
					{
						// 12.8.9.4)
						compacted_item =
							expanded_item.value.clone().unwrap_or(Value::Null);
						if let Some(language) = &expanded_item.language {
							map_key = language.clone();
						}
					} else if item_container.contains(ContainerKind::Index)
						&& index_key == "@index"
					{
						// 12.8.9.5)
						if let Some(index) = &expanded_item.index {
							map_key = index.clone();
						}
					} else if item_container.contains(ContainerKind::Index) {
						// 12.8.9.6) Property-valued index: the map key is
						// extracted from the compacted child.
						let expanded_index = self
							.expand_iri(&active, &index_key, false, false)?
							.unwrap_or_default();
						container_key = self.compact_iri(
							&active,
							&expanded_index,
							IriCompactionValue::None,
							true,
							false,
						)?;

						// 12.8.9.6.2)
						if let Value::Object(ref mut compacted_object) = compacted_item {
							match util::take_entry(compacted_object, &container_key) {
								Some(Value::String(s)) => {
									map_key = s.as_str().to_string();
								}
								Some(Value::Array(mut items)) if !items.is_empty() => {
									if let Value::String(s) = &items[0] {
										map_key = s.as_str().to_string();
									}
									items.remove(0);
									match items.len() {
										0 => (),
										1 => {
											compacted_object.insert(
												container_key.as_str().into(),
												items.pop().unwrap(),
											);
										}
										_ => {
											compacted_object.insert(
												container_key.as_str().into(),
												Value::Array(items),
											);
										}
									}
								}
								Some(other) => {
									compacted_object
										.insert(container_key.as_str().into(), other);
								}
								None => (),
							}
						}
					} else if item_container.contains(ContainerKind::Id) {
						// 12.8.9.7)
						if let Value::Object(ref mut compacted_object) = compacted_item {
							match util::take_entry(compacted_object, &container_key) {
								Some(Value::String(s)) => {
									map_key = s.as_str().to_string();
								}
								Some(other) => {
									compacted_object
										.insert(container_key.as_str().into(), other);
								}
								None => (),
							}
						}
					} else if item_container.contains(ContainerKind::Type) {
						// 12.8.9.8)
						if let Value::Object(mut compacted_object) = compacted_item {
							match util::take_entry(&mut compacted_object, &container_key)
							{
								Some(Value::String(s)) => {
									map_key = s.as_str().to_string();
								}
								Some(Value::Array(mut items)) if !items.is_empty() => {
									if let Value::String(s) = &items[0] {
										map_key = s.as_str().to_string();
									}
									items.remove(0);
									match items.len() {
										0 => (),
										1 => {
											compacted_object.insert(
												container_key.as_str().into(),
												items.pop().unwrap(),
											);
										}
										_ => {
											compacted_object.insert(
												container_key.as_str().into(),
												Value::Array(items),
											);
										}
									}
								}
								Some(other) => {
									compacted_object
										.insert(container_key.as_str().into(), other);
								}
								None => (),
							}

							// 12.8.9.8.4) A lone `@id` entry recompacts
							// as a plain reference.
							let lone_id = compacted_object.len() == 1
								&& self
									.expand_iri(
										&active,
										compacted_object.entries()[0].key.as_str(),
										false,
										true,
									)?
									.as_deref() == Some("@id");

							if lone_id {
								let reference = Node {
									id: expanded_item.id.clone(),
									..Default::default()
								};
								compacted_item = Box::pin(self.compact_element(
									&active,
									Some(&item_active_property),
									Element::Node(&reference),
									false,
									false,
								))
								.await?;
							} else {
								compacted_item = Value::Object(compacted_object);
							}
						}
					}

					// 12.8.9.9)
					if map_key.is_empty() {
						map_key = self.compact_iri(
							&active,
							"@none",
							IriCompactionValue::None,
							true,
							false,
						)?;
					}

					// 12.8.9.10)
					let nest_result =
						self.nest_target(&active, &mut result, &item_active_property)?;
					let map_object = entry_as_object(nest_result, &item_active_property);
					push_map_value(map_object, &map_key, compacted_item, as_array, false);

					continue;
				}

				// 12.8.10)
				let json_array = item_type.as_deref() == Some("@json")
					&& matches!(&expanded_item.value, Some(Value::Array(_)));

				let nest_result =
					self.nest_target(&active, &mut result, &item_active_property)?;

				match util::take_entry(nest_result, &item_active_property) {
					Some(existing) => {
						let mut items = match existing {
							Value::Array(items) => items,
							other => vec![other],
						};
						items.push(compacted_item);
						nest_result.insert(
							item_active_property.as_str().into(),
							Value::Array(items),
						);
					}
					None => {
						let value = if as_array && !json_array {
							Value::Array(vec![compacted_item])
						} else {
							compacted_item
						};
						nest_result.insert(item_active_property.as_str().into(), value);
					}
				}
			}
		}

		Ok(Value::Object(result))
	}
}

/// Returns the object stored under `key`, replacing whatever non-object
/// value may sit there.
fn entry_as_object<'a>(
	map: &'a mut json_syntax::Object,
	key: &str,
) -> &'a mut json_syntax::Object {
	let needs_init = util::get_entry(map, key).map_or(true, |v| !v.is_object());
	if needs_init {
		util::set_entry(map, key, Value::Object(json_syntax::Object::default()));
	}

	map.get_unique_mut(key)
		.ok()
		.unwrap()
		.unwrap()
		.as_object_mut()
		.unwrap()
}
