//! The expanded document node model.

use indexmap::IndexMap;
use json_syntax::Value;

use crate::Direction;

/// A key-to-nodes map holding every property that is not a JSON-LD keyword.
pub type Properties = IndexMap<String, Vec<Node>>;

/// A node of a JSON-LD graph in expanded form.
///
/// Every supported keyword has a slot of its own; all remaining properties
/// live in [`Node::properties`]. The shape of a node (value, list, graph,
/// subject, ...) is determined by which slots are populated and is stable
/// under all operations.
///
/// Scalars are kept as [`json_syntax::Value`]s so that the source text of
/// numbers survives untouched; `@json` literals keep their whole subtree
/// verbatim.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
	/// `@id`.
	pub id: Option<String>,

	/// `@type`. An empty sequence means the slot is absent.
	pub types: Vec<String>,

	/// `@value`. `Some(Value::Null)` is the explicit `null` literal.
	pub value: Option<Value>,

	/// `@language`, lowercased.
	pub language: Option<String>,

	/// `@direction`.
	pub direction: Option<Direction>,

	/// `@index`.
	pub index: Option<String>,

	/// `@list`. An empty sequence is distinguished from an absent slot.
	pub list: Option<Vec<Node>>,

	/// `@set`. Ephemeral: sets collapse during expansion and never appear
	/// in a finished expanded document.
	pub set: Option<Vec<Node>>,

	/// `@graph`.
	pub graph: Option<Vec<Node>>,

	/// `@included`.
	pub included: Option<Vec<Node>>,

	/// `@reverse`.
	pub reverse: Option<Properties>,

	/// Everything else.
	pub properties: Properties,
}

/// The keyword slots a node can populate, in emission order.
const KEYWORD_SLOTS: [&str; 11] = [
	"@id",
	"@index",
	"@type",
	"@value",
	"@language",
	"@direction",
	"@list",
	"@set",
	"@graph",
	"@included",
	"@reverse",
];

impl Node {
	/// Checks if the node has the given property, which must be a keyword
	/// or an expanded IRI.
	pub fn has(&self, property: &str) -> bool {
		match property {
			"@id" => self.id.is_some(),
			"@type" => !self.types.is_empty(),
			"@value" => self.value.is_some(),
			"@language" => self.language.is_some(),
			"@direction" => self.direction.is_some(),
			"@index" => self.index.is_some(),
			"@list" => self.list.is_some(),
			"@set" => self.set.is_some(),
			"@graph" => self.graph.is_some(),
			"@included" => self.included.is_some(),
			"@reverse" => self.reverse.is_some(),
			_ => self.properties.contains_key(property),
		}
	}

	/// The set of populated properties: keyword slots plus property keys.
	pub fn property_names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = KEYWORD_SLOTS
			.iter()
			.copied()
			.filter(|slot| self.has(slot))
			.collect();
		names.extend(self.properties.keys().map(String::as_str));
		names
	}

	/// The number of populated properties.
	pub fn len(&self) -> usize {
		self.property_names().len()
	}

	/// Checks if no property is populated.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub(crate) fn count_without(&self, excluded: &[&str]) -> usize {
		self.property_names()
			.into_iter()
			.filter(|name| !excluded.contains(name))
			.count()
	}

	/// Checks if this is a node object: neither a value, a list nor a set.
	pub fn is_node_object(&self) -> bool {
		!self.has("@list") && !self.has("@value") && !self.has("@set")
	}

	/// A subject has an `@id` and at least one other non-`@index` property.
	pub fn is_subject(&self) -> bool {
		self.has("@id") && self.count_without(&["@id", "@index"]) != 0
	}

	/// A subject reference has an `@id`, optionally an `@type`, and nothing
	/// else.
	pub fn is_subject_reference(&self) -> bool {
		self.has("@id") && self.count_without(&["@id", "@type"]) == 0
	}

	/// A list has an `@list`, optionally an `@index`, and nothing else.
	pub fn is_list(&self) -> bool {
		self.has("@list") && self.count_without(&["@list", "@index"]) == 0
	}

	/// A value node has an `@value` and at most `@type`, `@language`,
	/// `@direction` and `@index` besides.
	pub fn is_value(&self) -> bool {
		self.has("@value")
			&& self.count_without(&[
				"@value",
				"@direction",
				"@index",
				"@language",
				"@type",
			]) == 0
	}

	/// A graph has an `@graph` and at most `@id` and `@index` besides.
	pub fn is_graph(&self) -> bool {
		self.has("@graph") && self.count_without(&["@id", "@index", "@graph"]) == 0
	}

	/// A simple graph is a graph without `@id`.
	pub fn is_simple_graph(&self) -> bool {
		self.has("@graph") && self.count_without(&["@index", "@graph"]) == 0
	}

	/// Returns the nodes stored in the given property.
	pub fn get(&self, property: &str) -> &[Node] {
		match property {
			"@graph" => self.graph.as_deref().unwrap_or(&[]),
			"@included" => self.included.as_deref().unwrap_or(&[]),
			"@list" => self.list.as_deref().unwrap_or(&[]),
			"@set" => self.set.as_deref().unwrap_or(&[]),
			_ => self.properties.get(property).map(Vec::as_slice).unwrap_or(&[]),
		}
	}

	/// Appends nodes to the given non-keyword property.
	pub fn add(&mut self, property: impl Into<String>, nodes: Vec<Node>) {
		self.properties.entry(property.into()).or_default().extend(nodes);
	}

	/// Overrides the nodes stored in the given non-keyword property.
	pub fn set(&mut self, property: impl Into<String>, nodes: Vec<Node>) {
		self.properties.insert(property.into(), nodes);
	}

	/// Encodes the node to expanded document form.
	pub fn to_json(&self) -> Value {
		let mut object = json_syntax::Object::default();

		if let Some(id) = &self.id {
			object.insert("@id".into(), Value::String(id.as_str().into()));
		}

		if let Some(index) = &self.index {
			object.insert("@index".into(), Value::String(index.as_str().into()));
		}

		if !self.types.is_empty() {
			// A value node with a single type keeps the string form.
			let types = if self.value.is_some() && self.types.len() == 1 {
				Value::String(self.types[0].as_str().into())
			} else {
				Value::Array(
					self.types
						.iter()
						.map(|t| Value::String(t.as_str().into()))
						.collect(),
				)
			};
			object.insert("@type".into(), types);
		}

		if let Some(value) = &self.value {
			object.insert("@value".into(), value.clone());
		}

		if let Some(language) = &self.language {
			object.insert("@language".into(), Value::String(language.as_str().into()));
		}

		if let Some(direction) = &self.direction {
			object.insert(
				"@direction".into(),
				Value::String(direction.as_str().into()),
			);
		}

		if let Some(list) = &self.list {
			object.insert("@list".into(), nodes_to_json(list));
		}

		if let Some(graph) = &self.graph {
			object.insert("@graph".into(), nodes_to_json(graph));
		}

		if let Some(included) = &self.included {
			object.insert("@included".into(), nodes_to_json(included));
		}

		if let Some(reverse) = &self.reverse {
			let mut map = json_syntax::Object::default();
			for (key, nodes) in reverse {
				map.insert(key.as_str().into(), nodes_to_json(nodes));
			}
			object.insert("@reverse".into(), Value::Object(map));
		}

		for (key, nodes) in &self.properties {
			object.insert(key.as_str().into(), nodes_to_json(nodes));
		}

		Value::Object(object)
	}
}

/// Encodes a sequence of nodes to expanded document form.
pub fn nodes_to_json(nodes: &[Node]) -> Value {
	Value::Array(nodes.iter().map(Node::to_json).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn value_node(s: &str) -> Node {
		Node {
			value: Some(Value::String(s.into())),
			..Default::default()
		}
	}

	#[test]
	fn classification() {
		let mut node = value_node("x");
		assert!(node.is_value());
		assert!(!node.is_list());
		assert!(!node.is_node_object());

		node.language = Some("en".to_string());
		node.index = Some("i".to_string());
		assert!(node.is_value());

		node.id = Some("https://example.com/x".to_string());
		assert!(!node.is_value());
	}

	#[test]
	fn subject_and_reference() {
		let mut node = Node {
			id: Some("https://example.com/x".to_string()),
			..Default::default()
		};
		assert!(node.is_subject_reference());
		assert!(!node.is_subject());

		node.types = vec!["https://example.com/T".to_string()];
		assert!(node.is_subject_reference());

		node.set("https://example.com/p", vec![value_node("y")]);
		assert!(node.is_subject());
		assert!(!node.is_subject_reference());
	}

	#[test]
	fn graphs() {
		let mut node = Node {
			graph: Some(vec![]),
			..Default::default()
		};
		assert!(node.is_graph());
		assert!(node.is_simple_graph());

		node.id = Some("https://example.com/g".to_string());
		assert!(node.is_graph());
		assert!(!node.is_simple_graph());
	}

	#[test]
	fn empty_list_is_preserved() {
		let node = Node {
			list: Some(vec![]),
			..Default::default()
		};
		assert!(node.is_list());
		assert!(!node.is_empty());
	}
}
