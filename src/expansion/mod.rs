//! The expansion algorithm.
//!
//! See <https://www.w3.org/TR/json-ld11-api/#expansion-algorithm>.

mod object;
mod value;

use std::sync::Arc;

use iref::{Iri, IriBuf};
use json_syntax::Value;

use crate::context::processing::ContextOptions;
use crate::loader::Loader;
use crate::util;
use crate::{ContainerKind, Context, Error, Node, Processor};

impl<L: Loader> Processor<L> {
	/// Transforms a JSON document into expanded document form.
	///
	/// If the document was retrieved from a URL, pass it as `url`.
	pub async fn expand(
		&self,
		document: &Value,
		url: Option<&Iri>,
	) -> Result<Vec<Node>, Error> {
		let base = self.base_iri.as_deref().or(url);
		let initial = Context::new(base.map(ToOwned::to_owned));

		let active = match &self.expand_context {
			None => Arc::new(initial),
			Some(context) => {
				// The expansion context may be a bare context value or a
				// whole document carrying an `@context` entry.
				let raw = context
					.as_object()
					.and_then(|object| util::get_entry(object, "@context"))
					.unwrap_or(context);

				match self
					.process_context_value(
						Some(&initial),
						raw,
						base,
						ContextOptions::default(),
					)
					.await?
				{
					Some(folded) => Arc::new(folded),
					None => Arc::new(initial),
				}
			}
		};

		let expanded = self
			.expand_element(&active, None, document, url, false)
			.await?;
		let mut expanded = expanded.unwrap_or_default();

		// 19) A single top-level simple graph is hoisted.
		if expanded.len() == 1 && expanded[0].is_simple_graph() {
			expanded = expanded.remove(0).graph.unwrap_or_default();
		}

		// Values, lone subject references and empty nodes are dropped at
		// the top level.
		let mut result = Vec::with_capacity(expanded.len());
		for node in expanded {
			if node.is_empty() || node.is_value() {
				continue;
			}

			if node.has("@id") && node.len() == 1 {
				continue;
			}

			result.push(node);
		}

		Ok(result)
	}

	/// Expands a single element. Returns `None` when the element expands
	/// to nothing, which is distinct from an empty sequence.
	pub(crate) async fn expand_element(
		&self,
		active: &Arc<Context>,
		active_property: Option<&str>,
		element: &Value,
		base_url: Option<&Iri>,
		from_map: bool,
	) -> Result<Option<Vec<Node>>, Error> {
		// 3) The active property's scoped context, if any.
		let mut prop_context: Option<(Value, Option<IriBuf>)> = None;
		let mut list_container = false;
		if let Some(def) = active_property.and_then(|p| active.terms.get(p)) {
			prop_context = def.context.clone().map(|c| (c, def.base_iri.clone()));
			list_container = def.container.contains(ContainerKind::List);
		}

		match element {
			// 1)
			Value::Null => Ok(None),

			// 5)
			Value::Array(items) => {
				self.expand_array(
					active,
					active_property,
					items,
					base_url,
					from_map,
					list_container,
				)
				.await
			}

			Value::Object(object) => {
				self.expand_object(
					active,
					active_property,
					object,
					base_url,
					from_map,
					prop_context,
				)
				.await
			}

			// 4) scalar.
			scalar => {
				if active_property.is_none() || active_property == Some("@graph") {
					return Ok(None);
				}

				let scoped;
				let active = match prop_context {
					Some((context, context_base)) => {
						let opts = ContextOptions {
							override_protected: true,
							..ContextOptions::default()
						};

						match Box::pin(self.process_context_value(
							Some(&**active),
							&context,
							context_base.as_deref(),
							opts,
						))
						.await?
						{
							Some(entered) => {
								scoped = entered;
								&scoped
							}
							None => active.as_ref(),
						}
					}
					None => active.as_ref(),
				};

				let node = self.expand_value(active, active_property.unwrap(), scalar)?;
				Ok(Some(vec![node]))
			}
		}
	}

	async fn expand_array(
		&self,
		active: &Arc<Context>,
		active_property: Option<&str>,
		items: &[Value],
		base_url: Option<&Iri>,
		from_map: bool,
		list_container: bool,
	) -> Result<Option<Vec<Node>>, Error> {
		if items.is_empty() {
			// An empty array under a `@list` container is an empty list
			// node, not an empty sequence.
			if list_container {
				return Ok(Some(vec![Node {
					list: Some(Vec::new()),
					..Default::default()
				}]));
			}

			return Ok(Some(Vec::new()));
		}

		// 5.1)
		let mut result: Vec<Node> = Vec::with_capacity(items.len());
		let mut first = true;

		// 5.2)
		for item in items {
			let is_map = matches!(item, Value::Object(_));
			let expanded = Box::pin(self.expand_element(
				active,
				active_property,
				item,
				base_url,
				from_map,
			))
			.await?
			.unwrap_or_default();

			// 5.2.3)
			if !list_container {
				result.extend(expanded);
				continue;
			}

			// 5.2.2) The enclosing array becomes a single list node.
			if first {
				first = false;
				let already_list = is_map
					&& expanded.len() == 1
					&& expanded[0].list.as_ref().is_some_and(|l| !l.is_empty());
				if already_list {
					result = expanded;
				} else {
					result.push(Node {
						list: Some(expanded),
						..Default::default()
					});
				}
			} else {
				result[0]
					.list
					.get_or_insert_with(Vec::new)
					.extend(expanded);
			}
		}

		// 5.3)
		Ok(Some(result))
	}

	/// Checks if any key of the object expands to the given keyword.
	pub(crate) fn expands_to_keyword(
		&self,
		active: &Context,
		keyword: &str,
		object: &json_syntax::Object,
	) -> bool {
		for entry in object.entries() {
			match self.expand_iri(active, entry.key.as_str(), false, true) {
				Ok(Some(expanded)) if expanded == keyword => return true,
				Ok(_) => (),
				Err(_) => return false,
			}
		}

		false
	}
}
