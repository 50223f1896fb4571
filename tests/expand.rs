//! Expansion tests.

mod common;

use std::sync::Mutex;

use common::{assert_json_eq, json, static_loader};
use json_syntax::Value;
use lodestar::{nodes_to_json, Error, Processor, Warning, WarningHandler};
use static_iref::iri;

#[async_std::test]
async fn basic_context_expansion() {
	let document = json(
		r#"{
			"@context": {"ex": "https://example.org#", "name": "ex:name"},
			"name": "Alice"
		}"#,
	);

	let processor = Processor::new();
	let expanded = processor.expand(&document, None).await.unwrap();

	assert_json_eq(
		&nodes_to_json(&expanded),
		&json(r#"[{"https://example.org#name": [{"@value": "Alice"}]}]"#),
	);
}

#[async_std::test]
async fn type_coercion() {
	let document = json(
		r#"{
			"@context": {
				"born": {"@id": "ex:born", "@type": "http://www.w3.org/2001/XMLSchema#dateTime"}
			},
			"born": "1970-01-01T00:00:00Z"
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();

	assert_json_eq(
		&nodes_to_json(&expanded),
		&json(
			r#"[{
				"ex:born": [{
					"@type": "http://www.w3.org/2001/XMLSchema#dateTime",
					"@value": "1970-01-01T00:00:00Z"
				}]
			}]"#,
		),
	);
}

#[async_std::test]
async fn language_map() {
	let document = json(
		r#"{
			"@context": {"@vocab": "ex:", "label": {"@container": "@language"}},
			"label": {"en": "Hi", "de": "Hallo"}
		}"#,
	);

	let expanded = Processor::new()
		.with_ordered(true)
		.expand(&document, None)
		.await
		.unwrap();

	assert_json_eq(
		&nodes_to_json(&expanded),
		&json(
			r#"[{
				"ex:label": [
					{"@value": "Hallo", "@language": "de"},
					{"@value": "Hi", "@language": "en"}
				]
			}]"#,
		),
	);
}

#[async_std::test]
async fn default_language_applies_lowercased() {
	let document = json(
		r#"{
			"@context": {"@vocab": "http://example.com/", "@language": "EN"},
			"name": "Alice"
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();
	let node = &expanded[0].properties["http://example.com/name"][0];

	assert_eq!(node.language.as_deref(), Some("en"));
}

#[async_std::test]
async fn list_container() {
	let document = json(
		r#"{
			"@context": {"list": {"@id": "http://example.com/list", "@container": "@list"}},
			"list": ["a", "b"]
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();

	assert_json_eq(
		&nodes_to_json(&expanded),
		&json(
			r#"[{
				"http://example.com/list": [
					{"@list": [{"@value": "a"}, {"@value": "b"}]}
				]
			}]"#,
		),
	);
}

#[async_std::test]
async fn empty_array_under_list_container_is_an_empty_list() {
	let document = json(
		r#"{
			"@context": {"list": {"@id": "http://example.com/list", "@container": "@list"}},
			"list": []
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();
	let node = &expanded[0].properties["http://example.com/list"][0];

	assert_eq!(node.list.as_deref(), Some(&[][..]));
}

#[async_std::test]
async fn json_literal_is_preserved_verbatim() {
	let document = json(
		r#"{
			"@context": {"data": {"@id": "http://example.com/data", "@type": "@json"}},
			"data": {"a": [1, 2.5, true], "b": null}
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();
	let node = &expanded[0].properties["http://example.com/data"][0];

	assert_eq!(node.types, ["@json"]);
	assert_eq!(
		node.value.as_ref().unwrap(),
		&json(r#"{"a": [1, 2.5, true], "b": null}"#)
	);
}

#[async_std::test]
async fn reverse_property() {
	let document = json(
		r#"{
			"@context": {"children": {"@reverse": "http://example.com/parent"}},
			"@id": "http://example.com/a",
			"children": [{"@id": "http://example.com/b"}]
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();

	assert_json_eq(
		&nodes_to_json(&expanded),
		&json(
			r#"[{
				"@id": "http://example.com/a",
				"@reverse": {
					"http://example.com/parent": [{"@id": "http://example.com/b"}]
				}
			}]"#,
		),
	);
}

#[async_std::test]
async fn type_scoped_context() {
	let document = json(
		r#"{
			"@context": {
				"T": {"@id": "http://example.com/T", "@context": {"name": "http://example.com/name"}}
			},
			"@type": "T",
			"name": "x"
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();

	assert_json_eq(
		&nodes_to_json(&expanded),
		&json(
			r#"[{
				"@type": ["http://example.com/T"],
				"http://example.com/name": [{"@value": "x"}]
			}]"#,
		),
	);
}

#[async_std::test]
async fn type_scoped_context_does_not_propagate() {
	let document = json(
		r#"{
			"@context": {
				"@vocab": "http://example.com/",
				"T": {
					"@id": "http://example.com/T",
					"@context": {"name": "http://example.com/scoped#name"}
				}
			},
			"@type": "T",
			"name": "parent",
			"child": {"name": "nested"}
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();
	let parent = &expanded[0];

	assert!(parent
		.properties
		.contains_key("http://example.com/scoped#name"));

	let child = &parent.properties["http://example.com/child"][0];
	assert!(child.properties.contains_key("http://example.com/name"));
}

#[async_std::test]
async fn property_scoped_context_applies_to_scalars() {
	let document = json(
		r#"{
			"@context": {
				"p": {"@id": "http://example.com/p", "@context": {"@language": "fr"}}
			},
			"p": "bonjour"
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();
	let node = &expanded[0].properties["http://example.com/p"][0];

	assert_eq!(node.language.as_deref(), Some("fr"));
}

#[async_std::test]
async fn nested_properties() {
	let document = json(
		r#"{
			"@context": {"@vocab": "http://example.com/", "info": "@nest"},
			"info": {"name": "x"},
			"other": "y"
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();
	let node = &expanded[0];

	assert!(node.properties.contains_key("http://example.com/name"));
	assert!(node.properties.contains_key("http://example.com/other"));
}

#[async_std::test]
async fn index_container() {
	let document = json(
		r#"{
			"@context": {"post": {"@id": "http://example.com/post", "@container": "@index"}},
			"post": {"en": {"@id": "http://example.com/p1"}}
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();

	assert_json_eq(
		&nodes_to_json(&expanded),
		&json(
			r#"[{
				"http://example.com/post": [
					{"@id": "http://example.com/p1", "@index": "en"}
				]
			}]"#,
		),
	);
}

#[async_std::test]
async fn id_map_container() {
	let document = json(
		r#"{
			"@context": {
				"@vocab": "http://example.com/",
				"post": {"@id": "http://example.com/post", "@container": "@id"}
			},
			"post": {
				"http://example.com/p1": {"title": "a"},
				"http://example.com/p2": {"title": "b"}
			}
		}"#,
	);

	let expanded = Processor::new()
		.with_ordered(true)
		.expand(&document, None)
		.await
		.unwrap();
	let posts = &expanded[0].properties["http://example.com/post"];

	assert_eq!(posts.len(), 2);
	assert_eq!(posts[0].id.as_deref(), Some("http://example.com/p1"));
	assert_eq!(posts[1].id.as_deref(), Some("http://example.com/p2"));
}

#[async_std::test]
async fn graph_container() {
	let document = json(
		r#"{
			"@context": {
				"claims": {"@id": "http://example.com/claims", "@container": "@graph"}
			},
			"claims": {"http://example.com/p": "v"}
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();
	let claim = &expanded[0].properties["http://example.com/claims"][0];

	assert!(claim.is_simple_graph());
}

#[async_std::test]
async fn top_level_graph_is_hoisted() {
	let document = json(
		r#"{
			"@graph": [{"@id": "http://example.com/a", "http://example.com/p": "v"}]
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();

	assert_eq!(expanded.len(), 1);
	assert_eq!(expanded[0].id.as_deref(), Some("http://example.com/a"));
}

#[async_std::test]
async fn lone_subject_reference_is_dropped() {
	let document = json(r#"{"@id": "http://example.com/a"}"#);
	let expanded = Processor::new().expand(&document, None).await.unwrap();
	assert!(expanded.is_empty());
}

#[async_std::test]
async fn empty_document() {
	let expanded = Processor::new().expand(&json("{}"), None).await.unwrap();
	assert!(expanded.is_empty());
}

#[async_std::test]
async fn relative_iris_resolve_against_document_url() {
	let document = json(
		r#"{
			"@id": "fragment",
			"http://example.com/p": "v"
		}"#,
	);

	let expanded = Processor::new()
		.expand(&document, Some(iri!("https://example.org/base/doc")))
		.await
		.unwrap();

	assert_eq!(
		expanded[0].id.as_deref(),
		Some("https://example.org/base/fragment")
	);
}

#[async_std::test]
async fn expand_context_option() {
	let document = json(r#"{"name": "x"}"#);

	let expanded = Processor::new()
		.with_expand_context(json(r#"{"@vocab": "http://example.com/"}"#))
		.expand(&document, None)
		.await
		.unwrap();

	assert!(expanded[0]
		.properties
		.contains_key("http://example.com/name"));
}

#[async_std::test]
async fn colliding_keywords() {
	let document = json(
		r#"{
			"@context": {"id": "@id"},
			"@id": "http://example.com/a",
			"id": "http://example.com/b",
			"http://example.com/p": "v"
		}"#,
	);

	let err = Processor::new().expand(&document, None).await.unwrap_err();
	assert!(matches!(err, Error::CollidingKeywords));
}

#[async_std::test]
async fn invalid_value_object() {
	let document = json(r#"{"http://example.com/p": {"@value": "a", "@list": []}}"#);

	let err = Processor::new().expand(&document, None).await.unwrap_err();
	assert!(matches!(err, Error::InvalidValueObject));
}

#[async_std::test]
async fn invalid_language_tagged_value() {
	let document = json(r#"{"http://example.com/p": {"@value": 5, "@language": "en"}}"#);

	let err = Processor::new().expand(&document, None).await.unwrap_err();
	assert!(matches!(err, Error::InvalidLanguageTaggedValue));
}

#[async_std::test]
async fn null_value_node_is_dropped() {
	let document = json(
		r#"{
			"@id": "http://example.com/a",
			"http://example.com/p": {"@value": null},
			"http://example.com/q": "v"
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();

	assert!(!expanded[0].properties.contains_key("http://example.com/p"));
	assert!(expanded[0].properties.contains_key("http://example.com/q"));
}

struct Collect(Mutex<Vec<Warning>>);

impl WarningHandler for &'static Collect {
	fn handle(&self, warning: Warning) {
		self.0.lock().unwrap().push(warning);
	}
}

#[async_std::test]
async fn keyword_lookalikes_are_dropped_with_a_warning() {
	static COLLECTED: Collect = Collect(Mutex::new(Vec::new()));

	let document = json(
		r#"{
			"@context": {"@fancy": "http://example.com/fancy"},
			"@id": "http://example.com/a",
			"http://example.com/p": "v"
		}"#,
	);

	let expanded = Processor::new()
		.with_warning_handler(&COLLECTED)
		.expand(&document, None)
		.await
		.unwrap();

	assert_eq!(expanded.len(), 1);
	let warnings = COLLECTED.0.lock().unwrap();
	assert!(warnings
		.iter()
		.any(|w| matches!(w, Warning::KeywordLikeTerm(t) if t == "@fancy")));
}

#[async_std::test]
async fn remote_context() {
	let loader = static_loader(&[(
		"https://example.org/ctx",
		r#"{"name": "http://example.com/name"}"#,
	)]);

	let document = json(r#"{"@context": "https://example.org/ctx", "name": "Alice"}"#);

	let expanded = Processor::new()
		.with_loader(loader)
		.expand(&document, None)
		.await
		.unwrap();

	assert!(expanded[0]
		.properties
		.contains_key("http://example.com/name"));
}

#[async_std::test]
async fn set_collapses_on_expansion() {
	let document = json(
		r#"{
			"@id": "http://example.com/a",
			"http://example.com/p": {"@set": ["x", "y"]}
		}"#,
	);

	let expanded = Processor::new().expand(&document, None).await.unwrap();
	let values = &expanded[0].properties["http://example.com/p"];

	assert_eq!(values.len(), 2);
	assert_eq!(values[0].value, Some(Value::String("x".into())));
}
